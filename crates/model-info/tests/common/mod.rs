//! Builds small GGUF files on disk for integration tests.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const MAGIC: &[u8; 4] = b"GGUF";

/// A metadata value in wire form.
pub enum Val {
    U32(u32),
    U64(u64),
    Str(&'static str),
    Bytes(&'static [u8]),
}

pub struct GgufBuilder {
    kvs: Vec<(&'static str, Val)>,
}

impl GgufBuilder {
    pub fn new() -> Self {
        Self { kvs: Vec::new() }
    }

    pub fn kv(mut self, key: &'static str, value: Val) -> Self {
        self.kvs.push((key, value));
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&3u32.to_le_bytes());
        buf.extend_from_slice(&0u64.to_le_bytes());
        buf.extend_from_slice(&(self.kvs.len() as u64).to_le_bytes());
        for (key, value) in &self.kvs {
            put_str(&mut buf, key);
            match value {
                Val::U32(v) => {
                    buf.extend_from_slice(&4u32.to_le_bytes());
                    buf.extend_from_slice(&v.to_le_bytes());
                }
                Val::U64(v) => {
                    buf.extend_from_slice(&10u32.to_le_bytes());
                    buf.extend_from_slice(&v.to_le_bytes());
                }
                Val::Str(s) => {
                    buf.extend_from_slice(&8u32.to_le_bytes());
                    put_str(&mut buf, s);
                }
                Val::Bytes(bytes) => {
                    buf.extend_from_slice(&9u32.to_le_bytes());
                    buf.extend_from_slice(&0u32.to_le_bytes());
                    buf.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
                    buf.extend_from_slice(bytes);
                }
            }
        }
        buf
    }

    /// Write to `dir/name`, padding the file to `len` bytes (sparse) when
    /// given.
    pub fn write(&self, dir: &Path, name: &str, len: Option<u64>) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&self.to_bytes()).unwrap();
        if let Some(len) = len {
            file.set_len(len).unwrap();
        }
        path
    }
}

fn put_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u64).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

/// A plausible Qwen2 header.
pub fn qwen2() -> GgufBuilder {
    GgufBuilder::new()
        .kv("general.architecture", Val::Str("qwen2"))
        .kv("general.name", Val::Str("Qwen2 7B"))
        .kv("general.file_type", Val::U32(15))
        .kv("qwen2.block_count", Val::U32(28))
        .kv("qwen2.context_length", Val::U32(32768))
        .kv("qwen2.embedding_length", Val::U32(3584))
        .kv("qwen2.attention.head_count", Val::U32(28))
        .kv("qwen2.attention.head_count_kv", Val::U32(4))
}
