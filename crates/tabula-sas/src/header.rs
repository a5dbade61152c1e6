//! File header parsing.

use std::fmt;

use crate::error::{SasError, SasResult};
use crate::format::parser::{read_bytes, read_i32, read_u8};
use crate::format::records::*;
use crate::format::text::decode_trimmed;
use crate::options::{LayoutPolicy, SasReadOptions};

/// Decoded 1024-byte file prologue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// SAS release that wrote the file (e.g. `9.0101M3`)
    pub release: String,
    /// Host the file was written on (e.g. `XP_PRO`)
    pub host: String,
    /// Size of every page in bytes
    pub page_size: u32,
    /// Declared number of pages
    pub page_count: u32,
    /// Byte 32 flags a 64-bit layout
    pub is_64bit: bool,
    /// Byte 37 flags big-endian values
    pub big_endian: bool,
    /// Padding (0 or 4) applied to the page size/count offsets
    pub alignment_padding: usize,
}

impl fmt::Display for FileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "release={}, host={}, page size={}, page count={}",
            self.release, self.host, self.page_size, self.page_count
        )
    }
}

/// Check whether `data` starts with the SAS7BDAT magic number.
///
/// Only the first 32 bytes are compared; shorter inputs never match.
pub fn is_magic_number(data: &[u8]) -> bool {
    data.len() >= MAGIC.len() && data[..MAGIC.len()] == MAGIC
}

/// Parse the file header from its first [`HEADER_LEN`] bytes.
pub fn parse_header(data: &[u8], options: &SasReadOptions) -> SasResult<FileHeader> {
    if !is_magic_number(data) {
        return Err(SasError::invalid("magic number mismatch"));
    }

    let is_64bit = read_u8(data, HDR_U64_FLAG)? == FLAG_SET;
    let alignment_padding = if read_u8(data, HDR_ALIGN_FLAG)? == FLAG_SET {
        ALIGN_PADDING
    } else {
        0
    };
    let big_endian = read_u8(data, HDR_ENDIAN_FLAG)? == ENDIAN_BIG;

    log::debug!(
        "layout hints: endianness={}, u64={}, a1={}",
        if big_endian { "big" } else { "little" },
        is_64bit,
        alignment_padding
    );

    if is_64bit || big_endian {
        let variant = match (is_64bit, big_endian) {
            (true, true) => "64-bit big-endian",
            (true, false) => "64-bit",
            _ => "big-endian",
        };
        match options.layout {
            LayoutPolicy::Strict => {
                return Err(SasError::UnsupportedVariant(format!(
                    "{variant} layout is not supported"
                )));
            }
            LayoutPolicy::AssumeLittleEndian32 => {
                log::warn!("header declares a {variant} layout, decoding as little-endian 32-bit");
            }
        }
    }

    let page_size = read_i32(data, HDR_PAGE_SIZE + alignment_padding)?;
    if page_size < 0 {
        return Err(SasError::invalid(format!(
            "page size is negative: {page_size}"
        )));
    }

    let page_count = read_i32(data, HDR_PAGE_COUNT + alignment_padding)?;
    if page_count < 1 {
        return Err(SasError::invalid(format!(
            "page count is not positive: {page_count}"
        )));
    }

    let release = decode_trimmed(read_bytes(data, HDR_RELEASE, HDR_TEXT_LEN)?);
    let host = decode_trimmed(read_bytes(data, HDR_HOST, HDR_TEXT_LEN)?);

    Ok(FileHeader {
        release,
        host,
        page_size: page_size as u32,
        page_count: page_count as u32,
        is_64bit,
        big_endian,
        alignment_padding,
    })
}
