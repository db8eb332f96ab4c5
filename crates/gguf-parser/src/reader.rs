//! GGUF file reader: header and metadata KV section only.
//!
//! Tensor infos and tensor data are never touched; reading stops at the
//! end of the KV table (or earlier, see [`DEFAULT_SCAN_LIMIT`]).

use std::fs;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::*;

/// Stop reading new KV entries once the stream passes this offset.
/// For models with large tokenizer arrays (e.g. 151k tokens), 256 KiB is
/// insufficient.  We use 8 MiB which covers virtually all metadata while
/// still being fast with a warm page cache.
pub const DEFAULT_SCAN_LIMIT: u64 = 8 * 1024 * 1024;

const MAX_STRING_LEN: u64 = 1_000_000;
const MAX_ARRAY_LEN: u64 = 10_000_000;

//  Public result type

/// Header plus every metadata KV that fit in the scan window, in file order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GGUFMetadata {
    pub header: GGUFHeader,
    pub metadata: Vec<GGUFMetadataKV>,
    /// `false` when the scan window cut the table short.
    pub complete: bool,
}

impl GGUFMetadata {
    pub fn get(&self, key: &str) -> Option<&GGUFValue> {
        self.metadata
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| &kv.value)
    }

    pub fn architecture(&self) -> Option<&str> {
        self.get("general.architecture").and_then(|v| v.as_str())
    }
}

/// Read the metadata section of the GGUF file at `path`.
pub fn read_metadata(path: &Path, scan_limit: u64) -> Result<GGUFMetadata, GGUFError> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);

    let parsed = parse_metadata(&mut reader, scan_limit)?;

    debug!(
        path = %path.display(),
        version = parsed.header.version,
        kv_read = parsed.metadata.len(),
        kv_total = parsed.header.metadata_kv_count,
        architecture = ?parsed.architecture(),
        "metadata read"
    );
    Ok(parsed)
}

/// Parse header and KV table from any seekable byte stream.
pub fn parse_metadata<R: Read + Seek>(
    reader: &mut R,
    scan_limit: u64,
) -> Result<GGUFMetadata, GGUFError> {
    //  Magic
    let magic = u32::from_le_bytes(header_bytes(reader)?);
    if magic != GGUF_MAGIC {
        return Err(GGUFError::InvalidMagic(magic));
    }

    //  Version
    let version = u32::from_le_bytes(header_bytes(reader)?);
    if !(GGUF_VERSION_MIN..=GGUF_VERSION_MAX).contains(&version) {
        return Err(GGUFError::UnsupportedVersion(version));
    }

    //  Counts (32-bit in v1)
    let (tensor_count, metadata_kv_count) = if version == 1 {
        (
            u64::from(u32::from_le_bytes(header_bytes(reader)?)),
            u64::from(u32::from_le_bytes(header_bytes(reader)?)),
        )
    } else {
        (
            u64::from_le_bytes(header_bytes(reader)?),
            u64::from_le_bytes(header_bytes(reader)?),
        )
    };

    let header = GGUFHeader {
        version,
        tensor_count,
        metadata_kv_count,
    };

    //  Read metadata KVs (within the scan window)
    let mut kv_reader = KvReader {
        inner: reader,
        wide_lengths: version >= 2,
    };
    let mut metadata = Vec::new();
    let mut complete = true;
    for _ in 0..metadata_kv_count {
        if kv_reader.inner.stream_position()? >= scan_limit {
            complete = false;
            break;
        }
        match kv_reader.read_kv() {
            Ok(kv) => metadata.push(kv),
            Err(GGUFError::Io(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(GGUFError::TruncatedMetadata {
                    read: metadata.len(),
                    declared: metadata_kv_count,
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(GGUFMetadata {
        header,
        metadata,
        complete,
    })
}

//  Binary reading primitives

fn header_bytes<const N: usize>(r: &mut impl Read) -> Result<[u8; N], GGUFError> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf)
        .map_err(|_| GGUFError::TruncatedHeader)?;
    Ok(buf)
}

struct KvReader<'a, R> {
    inner: &'a mut R,
    /// v2+ stores string lengths and array counts as u64, v1 as u32.
    wide_lengths: bool,
}

impl<R: Read> KvReader<'_, R> {
    fn bytes<const N: usize>(&mut self) -> Result<[u8; N], GGUFError> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn length(&mut self) -> Result<u64, GGUFError> {
        if self.wide_lengths {
            Ok(u64::from_le_bytes(self.bytes()?))
        } else {
            Ok(u64::from(u32::from_le_bytes(self.bytes()?)))
        }
    }

    fn read_string(&mut self) -> Result<String, GGUFError> {
        let len = self.length()?;
        if len > MAX_STRING_LEN {
            return Err(GGUFError::Other(format!("string length {len} too large")));
        }
        let mut buf = vec![0u8; len as usize];
        self.inner.read_exact(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn read_value(&mut self, vtype: GGUFValueType) -> Result<GGUFValue, GGUFError> {
        Ok(match vtype {
            GGUFValueType::Uint8 => GGUFValue::Uint8(u8::from_le_bytes(self.bytes()?)),
            GGUFValueType::Int8 => GGUFValue::Int8(i8::from_le_bytes(self.bytes()?)),
            GGUFValueType::Uint16 => GGUFValue::Uint16(u16::from_le_bytes(self.bytes()?)),
            GGUFValueType::Int16 => GGUFValue::Int16(i16::from_le_bytes(self.bytes()?)),
            GGUFValueType::Uint32 => GGUFValue::Uint32(u32::from_le_bytes(self.bytes()?)),
            GGUFValueType::Int32 => GGUFValue::Int32(i32::from_le_bytes(self.bytes()?)),
            GGUFValueType::Float32 => GGUFValue::Float32(f32::from_le_bytes(self.bytes()?)),
            GGUFValueType::Bool => GGUFValue::Bool(self.bytes::<1>()?[0] != 0),
            GGUFValueType::String => GGUFValue::String(self.read_string()?),
            GGUFValueType::Array => {
                let elem_type = GGUFValueType::try_from(u32::from_le_bytes(self.bytes()?))?;
                let count = self.length()?;
                if count > MAX_ARRAY_LEN {
                    return Err(GGUFError::Other(format!("array length {count} too large")));
                }
                let mut arr = Vec::with_capacity((count as usize).min(1024));
                for _ in 0..count {
                    arr.push(self.read_value(elem_type)?);
                }
                GGUFValue::Array(arr)
            }
            GGUFValueType::Uint64 => GGUFValue::Uint64(u64::from_le_bytes(self.bytes()?)),
            GGUFValueType::Int64 => GGUFValue::Int64(i64::from_le_bytes(self.bytes()?)),
            GGUFValueType::Float64 => GGUFValue::Float64(f64::from_le_bytes(self.bytes()?)),
        })
    }

    fn read_kv(&mut self) -> Result<GGUFMetadataKV, GGUFError> {
        let key = self.read_string()?;
        let vtype = GGUFValueType::try_from(u32::from_le_bytes(self.bytes()?))?;
        let value = self.read_value(vtype)?;
        Ok(GGUFMetadataKV {
            key,
            value_type: vtype,
            value,
        })
    }
}
