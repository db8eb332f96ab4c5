//! Global llama.cpp backend initialization.

use std::ffi::CStr;
use std::sync::Once;
use tracing::{Level, debug, info};

static BACKEND_INIT: Once = Once::new();

/// RAII guard for the llama.cpp backend.
///
/// The first call to [`LlamaBackend::init`] initializes the C backend and
/// routes its log output into `tracing`; subsequent calls are no-ops. The
/// backend is freed at process exit.
pub struct LlamaBackend {
    _private: (),
}

impl LlamaBackend {
    /// Initialize the llama.cpp backend (idempotent).
    pub fn init() -> Self {
        BACKEND_INIT.call_once(|| {
            unsafe {
                llama_sys::llama_backend_init();
                llama_sys::llama_log_set(Some(log_callback), std::ptr::null_mut());
            }
            info!("llama.cpp backend initialized");
            debug!("llama.cpp log callback installed");
        });
        Self { _private: () }
    }
}

/// Bridges llama.cpp log lines to the `tracing` subsystem.
unsafe extern "C" fn log_callback(
    level: llama_sys::ggml_log_level,
    text: *const std::ffi::c_char,
    _user_data: *mut std::ffi::c_void,
) {
    if text.is_null() {
        return;
    }
    let msg = unsafe { CStr::from_ptr(text) }.to_string_lossy();
    let msg = msg.trim();
    if msg.is_empty() {
        return;
    }
    match tracing_level(level) {
        Level::ERROR => tracing::error!(target: "llama.cpp", "{msg}"),
        Level::WARN => tracing::warn!(target: "llama.cpp", "{msg}"),
        Level::INFO => tracing::info!(target: "llama.cpp", "{msg}"),
        _ => tracing::debug!(target: "llama.cpp", "{msg}"),
    }
}

// ggml_log_level: DEBUG=1, INFO=2, WARN=3, ERROR=4
fn tracing_level(level: llama_sys::ggml_log_level) -> Level {
    match level {
        4 => Level::ERROR,
        3 => Level::WARN,
        2 => Level::INFO,
        _ => Level::DEBUG,
    }
}
