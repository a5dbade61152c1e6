//! SAS7BDAT layout constants.
//!
//! Offsets are for the little-endian, 32-bit layout. Header offsets marked
//! "+a1" shift by the alignment padding derived from byte 35.

// ── File header ─────────────────────────────────────────────────────────
pub const HEADER_LEN: usize = 1024;

/// 32-byte magic number at the start of every file.
pub const MAGIC: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xc2, 0xea, 0x81, 0x60,
    0xb3, 0x14, 0x11, 0xcf, 0xbd, 0x92, 0x08, 0x00, 0x09, 0xc7, 0x31, 0x8c, 0x18, 0x1f, 0x10, 0x11,
];

pub const HDR_U64_FLAG: usize = 32; // 0x33 = 64-bit layout
pub const HDR_ALIGN_FLAG: usize = 35; // 0x33 = 4 bytes of padding before page fields
pub const HDR_ENDIAN_FLAG: usize = 37; // 0x00 = big-endian
pub const FLAG_SET: u8 = 0x33;
pub const ENDIAN_BIG: u8 = 0x00;
pub const ALIGN_PADDING: usize = 4;

pub const HDR_PAGE_SIZE: usize = 200; // +a1
pub const HDR_PAGE_COUNT: usize = 204; // +a1
pub const HDR_RELEASE: usize = 216;
pub const HDR_HOST: usize = 224;
pub const HDR_TEXT_LEN: usize = 8;

// ── Page header ─────────────────────────────────────────────────────────
pub const PAGE_TYPE: usize = 17;
pub const PAGE_BLOCK_COUNT: usize = 18; // rows on a data page
pub const PAGE_SUBHEADER_COUNT: usize = 20;
pub const PAGE_SUBHEADER_DIR: usize = 24;
pub const SUBHEADER_POINTER_LEN: usize = 12; // offset(4) + length(4) + flags(4)
pub const DATA_PAGE_ROW_BASE: usize = 24;

pub const PAGE_META: u8 = 0;
pub const PAGE_DATA: u8 = 1;
pub const PAGE_MIX: u8 = 2;
pub const PAGE_AMD: u8 = 4;

// ── Subheader signatures ────────────────────────────────────────────────
pub const SIG_ROWSIZE: [u8; 4] = [0xF7, 0xF7, 0xF7, 0xF7];
pub const SIG_COLSIZE: [u8; 4] = [0xF6, 0xF6, 0xF6, 0xF6];
pub const SIG_COLTEXT: [u8; 4] = [0xFD, 0xFF, 0xFF, 0xFF];
pub const SIG_COLATTR: [u8; 4] = [0xFC, 0xFF, 0xFF, 0xFF];
pub const SIG_COLNAME: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
pub const SIG_COLLABS: [u8; 4] = [0xFE, 0xFB, 0xFF, 0xFF];

// ── ROWSIZE fields ──────────────────────────────────────────────────────
pub const ROWSIZE_ROW_LENGTH: usize = 20;
pub const ROWSIZE_ROW_COUNT: usize = 24;
pub const ROWSIZE_COL_COUNT: usize = 36;
pub const ROWSIZE_ROW_COUNT_FP: usize = 60; // rows on each mixed page

// ── COLSIZE fields ──────────────────────────────────────────────────────
pub const COLSIZE_COL_COUNT: usize = 4;

// ── Per-column tables ───────────────────────────────────────────────────
pub const COLUMN_TABLE_START: usize = 12;
pub const COLNAME_ENTRY_LEN: usize = 8; // discriminator(1) pad(1) offset(2) length(2) pad(2)
pub const COLATTR_ENTRY_LEN: usize = 12; // offset(4) length(4) pad(2) type(2)
pub const COLATTR_TRAILER: usize = 8;

/// COLTEXT references skip the 4-byte signature of the text blob.
pub const COLTEXT_BIAS: usize = 4;

// ── COLLABS fields ──────────────────────────────────────────────────────
pub const COLLABS_FORMAT_OFFSET: usize = 36;
pub const COLLABS_FORMAT_LEN: usize = 38;
pub const COLLABS_LABEL_OFFSET: usize = 42;
pub const COLLABS_LABEL_LEN: usize = 44;

/// Column type code for the numeric family in COLUMNATTR.
pub const COLTYPE_NUMERIC: i16 = 1;

/// Display formats that refine a numeric column into a temporal one.
pub const FORMAT_DATE: &str = "DATE";
pub const FORMAT_TIME: &str = "TIME";
