//! Page reading and subheader extraction.
//!
//! Pages are read one at a time from a forward-only stream. Meta and mixed
//! pages start with a directory of 12-byte pointers, each locating one
//! subheader inside the page.

use std::fmt;
use std::io::{ErrorKind, Read};

use crate::error::{SasError, SasResult};
use crate::format::parser::{read_bytes, read_i32, read_u8};
use crate::format::records::*;
use crate::format::SubHeader;

/// Page type from byte 17 of the page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Subheaders only
    Meta,
    /// Row records only
    Data,
    /// Subheaders followed by row records
    Mixed,
    /// Recognized, but neither subheaders nor rows are extracted
    Amd,
}

impl PageKind {
    /// Classify a page type code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            PAGE_META => Some(PageKind::Meta),
            PAGE_DATA => Some(PageKind::Data),
            PAGE_MIX => Some(PageKind::Mixed),
            PAGE_AMD => Some(PageKind::Amd),
            _ => None,
        }
    }

    /// Whether pages of this kind carry a subheader directory.
    pub fn has_subheaders(&self) -> bool {
        matches!(self, PageKind::Meta | PageKind::Mixed)
    }

    /// Whether pages of this kind carry row records.
    pub fn has_rows(&self) -> bool {
        matches!(self, PageKind::Data | PageKind::Mixed)
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PageKind::Meta => "meta",
            PageKind::Data => "data",
            PageKind::Mixed => "mix",
            PageKind::Amd => "amd",
        })
    }
}

/// One page of the file.
#[derive(Debug, Clone)]
pub struct Page {
    /// 0-based page number (the header is not counted).
    pub index: u32,
    pub kind: PageKind,
    pub data: Vec<u8>,
}

impl Page {
    /// Classify a raw page buffer.
    pub fn parse(index: u32, data: Vec<u8>) -> SasResult<Self> {
        let code = read_u8(&data, PAGE_TYPE)?;
        let kind = PageKind::from_code(code).ok_or_else(|| {
            SasError::invalid(format!("page {index} has unknown type: {code}"))
        })?;
        Ok(Self { index, kind, data })
    }

    /// Number of entries in the subheader directory.
    pub fn subheader_count(&self) -> SasResult<usize> {
        let count = read_i32(&self.data, PAGE_SUBHEADER_COUNT)?;
        usize::try_from(count).map_err(|_| {
            SasError::invalid(format!(
                "page {} has a negative subheader count: {count}",
                self.index
            ))
        })
    }

    /// Rows stored on a data page, from its block count field.
    pub fn block_count(&self) -> SasResult<i32> {
        read_i32(&self.data, PAGE_BLOCK_COUNT)
    }

    /// Slice every non-empty subheader out of the directory, in directory
    /// order.
    ///
    /// Pages without a directory yield nothing.
    pub fn subheaders(&self) -> SasResult<Vec<SubHeader>> {
        if !self.kind.has_subheaders() {
            return Ok(Vec::new());
        }

        let count = self.subheader_count()?;
        // the whole directory must fit on the page before anything is sized by it
        read_bytes(
            &self.data,
            PAGE_SUBHEADER_DIR,
            count.saturating_mul(SUBHEADER_POINTER_LEN),
        )?;
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let base = PAGE_SUBHEADER_DIR + i * SUBHEADER_POINTER_LEN;
            let offset = read_i32(&self.data, base)?;
            let length = read_i32(&self.data, base + 4)?;
            if length <= 0 {
                continue;
            }
            let offset = usize::try_from(offset).map_err(|_| {
                SasError::invalid(format!(
                    "page {} subheader {i} has a negative offset: {offset}",
                    self.index
                ))
            })?;
            let raw = read_bytes(&self.data, offset, length as usize)?;
            out.push(SubHeader::from_raw(raw.to_vec(), self.index)?);
        }
        Ok(out)
    }
}

/// Read the next page from `reader`.
///
/// Returns `Ok(None)` when the stream ends before a full page, whether it
/// was already exhausted or the page is cut short.
pub fn read_page<R: Read>(reader: &mut R, page_size: usize, index: u32) -> SasResult<Option<Page>> {
    let mut buf = vec![0u8; page_size];
    let filled = fill(reader, &mut buf)?;

    if filled < page_size {
        if filled > 0 {
            log::info!("page {index} is truncated: read {filled} of {page_size} bytes");
        }
        return Ok(None);
    }

    Page::parse(index, buf).map(Some)
}

/// Read until `buf` is full or the stream ends; returns the bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> SasResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SasError::Io(e)),
        }
    }
    Ok(filled)
}
