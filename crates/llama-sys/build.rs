use std::env;
use std::path::{Path, PathBuf};

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let llama_cpp_dir = env::var("LLAMA_CPP_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| manifest_dir.join("../../reference/llama.cpp"));
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();

    println!("cargo:rerun-if-env-changed=LLAMA_PREBUILT_DIR");
    println!("cargo:rerun-if-env-changed=LLAMA_CPP_DIR");

    // ── Determine build mode ──────────────────────────────────────────
    //
    // Mode A, **Prebuilt**: `LLAMA_PREBUILT_DIR` points at a directory
    //   with `lib/{libllama.a, libggml*.a}` and `include/`.
    //
    // Mode B, **CMake** (default): build llama.cpp from source found at
    //   `LLAMA_CPP_DIR` or `reference/llama.cpp`.
    //
    // Only model metadata is ever read through these bindings, so the
    // library is always built CPU-only.

    let (lib_dir, include_dir) = if let Ok(prebuilt) = env::var("LLAMA_PREBUILT_DIR") {
        let prebuilt = PathBuf::from(&prebuilt);
        assert!(
            prebuilt.exists(),
            "LLAMA_PREBUILT_DIR={} does not exist",
            prebuilt.display()
        );
        println!(
            "cargo:warning=Using prebuilt llama.cpp from {}",
            prebuilt.display()
        );
        (lib_subdir(&prebuilt), prebuilt.join("include"))
    } else {
        assert!(
            llama_cpp_dir.join("CMakeLists.txt").exists(),
            "llama.cpp source not found at {}. \
             Set LLAMA_CPP_DIR or LLAMA_PREBUILT_DIR.",
            llama_cpp_dir.display()
        );

        let dst = cmake::Config::new(&llama_cpp_dir)
            .define("BUILD_SHARED_LIBS", "OFF")
            .define("LLAMA_BUILD_SERVER", "OFF")
            .define("LLAMA_BUILD_TESTS", "OFF")
            .define("LLAMA_BUILD_EXAMPLES", "OFF")
            .define("LLAMA_BUILD_TOOLS", "OFF")
            .define("LLAMA_BUILD_COMMON", "OFF")
            .define("LLAMA_CURL", "OFF")
            .define("GGML_METAL", "OFF")
            .define("GGML_OPENMP", "OFF")
            .build();

        (lib_subdir(&dst), dst.join("include"))
    };

    // ── Link libraries ────────────────────────────────────────────────
    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    println!("cargo:rustc-link-lib=static=llama");
    for name in &["ggml", "ggml-base", "ggml-cpu", "ggml-blas"] {
        if lib_dir.join(format!("lib{name}.a")).exists() {
            println!("cargo:rustc-link-lib=static={name}");
        }
    }

    match target_os.as_str() {
        "linux" => {
            println!("cargo:rustc-link-lib=stdc++");
            println!("cargo:rustc-link-lib=m");
            println!("cargo:rustc-link-lib=pthread");
        }
        "macos" => {
            for fw in &["Accelerate", "Foundation"] {
                println!("cargo:rustc-link-lib=framework={fw}");
            }
            println!("cargo:rustc-link-lib=c++");
        }
        "windows" => {
            println!("cargo:rustc-link-lib=msvcrt");
        }
        _ => {}
    }

    // ── Generate Rust bindings ────────────────────────────────────────
    let mut builder = bindgen::Builder::default()
        .header("wrapper.h")
        .clang_arg(format!("-I{}", include_dir.display()));

    let ggml_include = llama_cpp_dir.join("ggml/include");
    if ggml_include.exists() {
        builder = builder.clang_arg(format!("-I{}", ggml_include.display()));
    }

    let bindings = builder
        .allowlist_function("llama_backend_.*")
        .allowlist_function("llama_log_set")
        .allowlist_function("llama_model_.*")
        .allowlist_type("llama_model.*")
        .allowlist_type("ggml_log_level")
        .derive_default(true)
        .size_t_is_usize(true)
        .generate()
        .expect("Failed to generate bindings");

    let out = PathBuf::from(env::var("OUT_DIR").unwrap());
    bindings
        .write_to_file(out.join("bindings.rs"))
        .expect("Failed to write bindings");

    println!("cargo:rerun-if-changed=wrapper.h");
}

fn lib_subdir(root: &Path) -> PathBuf {
    if root.join("lib64").exists() {
        root.join("lib64")
    } else {
        root.join("lib")
    }
}
