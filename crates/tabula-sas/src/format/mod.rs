//! SAS7BDAT binary layout.
//!
//! A SAS7BDAT file is a 1024-byte header followed by fixed-size pages. Meta
//! and mixed pages carry a directory of subheaders: self-describing records
//! identified by a 4-byte signature that together make up the column catalog.
//! Data and mixed pages carry fixed-width row records.

pub mod parser;
pub mod records;
pub mod text;

use std::fmt;

/// The subheader kinds the reader resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubheaderKind {
    RowSize,
    ColumnSize,
    ColumnText,
    ColumnAttributes,
    ColumnName,
    ColumnLabels,
}

impl SubheaderKind {
    /// Signature identifying this kind.
    pub fn signature(&self) -> [u8; 4] {
        match self {
            SubheaderKind::RowSize => records::SIG_ROWSIZE,
            SubheaderKind::ColumnSize => records::SIG_COLSIZE,
            SubheaderKind::ColumnText => records::SIG_COLTEXT,
            SubheaderKind::ColumnAttributes => records::SIG_COLATTR,
            SubheaderKind::ColumnName => records::SIG_COLNAME,
            SubheaderKind::ColumnLabels => records::SIG_COLLABS,
        }
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            SubheaderKind::RowSize => "ROWSIZE",
            SubheaderKind::ColumnSize => "COLSIZE",
            SubheaderKind::ColumnText => "COLTEXT",
            SubheaderKind::ColumnAttributes => "COLATTR",
            SubheaderKind::ColumnName => "COLNAME",
            SubheaderKind::ColumnLabels => "COLLABS",
        }
    }
}

impl fmt::Display for SubheaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A subheader sliced out of a page (signature included in `data`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubHeader {
    /// First 4 bytes of the raw span.
    pub signature: [u8; 4],
    /// Raw subheader bytes.
    pub data: Vec<u8>,
    /// Page the subheader was found on (for debugging).
    pub page_index: u32,
}

impl SubHeader {
    /// Build a subheader from its raw bytes; spans shorter than a signature
    /// are rejected.
    pub fn from_raw(data: Vec<u8>, page_index: u32) -> crate::SasResult<Self> {
        let mut signature = [0u8; 4];
        signature.copy_from_slice(parser::read_bytes(&data, 0, 4)?);
        Ok(Self {
            signature,
            data,
            page_index,
        })
    }

    /// Whether this subheader is of the given kind.
    pub fn is(&self, kind: SubheaderKind) -> bool {
        self.signature == kind.signature()
    }
}
