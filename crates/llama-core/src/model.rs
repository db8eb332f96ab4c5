//! Safe RAII wrapper around `llama_model`, opened for metadata only.

use std::ffi::{CString, c_char};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{LlamaError, Result};

/// Owns a `llama_model` pointer and frees it on drop.
pub struct LlamaModel {
    ptr: *mut llama_sys::llama_model,
}

// Safety: llama_model is internally read-only after creation.
unsafe impl Send for LlamaModel {}
unsafe impl Sync for LlamaModel {}

impl LlamaModel {
    /// Load a GGUF model from `path`.
    pub fn load_from_file(path: &Path, params: &ModelParams) -> Result<Self> {
        let path_str = path.to_str().ok_or_else(|| LlamaError::ModelLoadFailed {
            path: path.display().to_string(),
            reason: "Invalid UTF-8 in path".into(),
        })?;
        let c_path = CString::new(path_str).map_err(|_| LlamaError::ModelLoadFailed {
            path: path_str.into(),
            reason: "Path contains null byte".into(),
        })?;

        let mut raw = unsafe { llama_sys::llama_model_default_params() };
        raw.n_gpu_layers = params.n_gpu_layers;
        raw.use_mmap = params.use_mmap;
        raw.use_mlock = false;
        raw.vocab_only = params.vocab_only;

        info!(path = %path.display(), vocab_only = params.vocab_only, "Loading model…");
        let model = unsafe { llama_sys::llama_model_load_from_file(c_path.as_ptr(), raw) };

        if model.is_null() {
            return Err(LlamaError::ModelLoadFailed {
                path: path_str.into(),
                reason: "llama_model_load_from_file returned null".into(),
            });
        }

        debug!(path = %path.display(), "Model opened");
        Ok(Self { ptr: model })
    }

    pub fn meta_count(&self) -> i32 {
        unsafe { llama_sys::llama_model_meta_count(self.ptr) }
    }

    /// Every metadata entry as `(key, value)` text, in llama.cpp's
    /// enumeration order.
    pub fn metadata(&self) -> Result<Vec<(String, String)>> {
        (0..self.meta_count())
            .map(|i| -> Result<(String, String)> {
                let key = read_c_string(|buf, len| unsafe {
                    llama_sys::llama_model_meta_key_by_index(self.ptr, i, buf, len)
                })
                .ok_or(LlamaError::MetadataUnreadable { index: i })?;
                let value = read_c_string(|buf, len| unsafe {
                    llama_sys::llama_model_meta_val_str_by_index(self.ptr, i, buf, len)
                })
                .ok_or(LlamaError::MetadataUnreadable { index: i })?;
                Ok((key, value))
            })
            .collect()
    }
}

impl Drop for LlamaModel {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            debug!("Freeing llama model");
            unsafe { llama_sys::llama_model_free(self.ptr) }
        }
    }
}

/// Call an snprintf-style accessor, growing the buffer when the value was
/// truncated. A negative return means "no such entry".
fn read_c_string(mut fill: impl FnMut(*mut c_char, usize) -> i32) -> Option<String> {
    let mut buf = vec![0u8; 512];
    loop {
        let len = fill(buf.as_mut_ptr() as *mut c_char, buf.len());
        let len = usize::try_from(len).ok()?;
        if len < buf.len() {
            buf.truncate(len);
            return Some(String::from_utf8_lossy(&buf).into_owned());
        }
        buf.resize(len + 1, 0);
    }
}

//  ModelParams

/// Parameters for [`LlamaModel::load_from_file`].
#[derive(Debug, Clone)]
pub struct ModelParams {
    /// Layers to offload to GPU. -1 = all.
    pub n_gpu_layers: i32,
    /// Use memory-mapped I/O.
    pub use_mmap: bool,
    /// Load hyper-parameters and vocabulary only, skipping tensor weights.
    pub vocab_only: bool,
}

impl ModelParams {
    /// Zero GPU layers, vocabulary only: the cheapest load that still
    /// populates the metadata table.
    pub fn metadata_only() -> Self {
        Self {
            n_gpu_layers: 0,
            use_mmap: true,
            vocab_only: true,
        }
    }
}
