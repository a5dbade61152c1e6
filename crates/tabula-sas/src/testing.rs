//! In-memory SAS7BDAT images for tests.
//!
//! [`SasFileBuilder`] lays out a little-endian 32-bit file: the header, one
//! or more meta pages holding the column catalog (the last of which can be
//! a mixed page carrying the first rows), optional AMD pages, then data
//! pages. The subheader helpers are public so malformed catalogs can be
//! assembled by hand.

use std::io;
use std::path::Path;

use crate::format::records::*;

fn put_i32(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_i16(buf: &mut [u8], offset: usize, value: i16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// A 1024-byte header for the given page geometry.
pub fn header(page_size: usize, page_count: i32) -> Vec<u8> {
    let mut h = vec![0u8; HEADER_LEN];
    h[..MAGIC.len()].copy_from_slice(&MAGIC);
    h[HDR_ENDIAN_FLAG] = 0x01;
    put_i32(&mut h, HDR_PAGE_SIZE, page_size as i32);
    put_i32(&mut h, HDR_PAGE_COUNT, page_count);
    h[HDR_RELEASE..HDR_RELEASE + 8].copy_from_slice(b"9.0101M3");
    h[HDR_HOST..HDR_HOST + 8].copy_from_slice(b"X64_7PRO");
    h
}

/// ROWSIZE subheader.
pub fn rowsize_subheader(row_length: i32, row_count: i32, column_count: i32, row_count_fp: i32) -> Vec<u8> {
    let mut sh = vec![0u8; 128];
    sh[..4].copy_from_slice(&SIG_ROWSIZE);
    put_i32(&mut sh, ROWSIZE_ROW_LENGTH, row_length);
    put_i32(&mut sh, ROWSIZE_ROW_COUNT, row_count);
    put_i32(&mut sh, ROWSIZE_COL_COUNT, column_count);
    put_i32(&mut sh, ROWSIZE_ROW_COUNT_FP, row_count_fp);
    sh
}

/// COLSIZE subheader.
pub fn colsize_subheader(column_count: i32) -> Vec<u8> {
    let mut sh = vec![0u8; 12];
    sh[..4].copy_from_slice(&SIG_COLSIZE);
    put_i32(&mut sh, COLSIZE_COL_COUNT, column_count);
    sh
}

/// Accumulates the COLTEXT blob and hands out the `(offset, length)` pairs
/// other subheaders store to reference it.
#[derive(Debug, Clone)]
pub struct ColumnText {
    data: Vec<u8>,
}

impl Default for ColumnText {
    fn default() -> Self {
        let mut data = vec![0u8; 8];
        data[..4].copy_from_slice(&SIG_COLTEXT);
        Self { data }
    }
}

impl ColumnText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text`, returning the stored reference.
    pub fn push(&mut self, text: &str) -> (u16, u16) {
        let start = self.data.len();
        self.data.extend_from_slice(text.as_bytes());
        while self.data.len() % 4 != 0 {
            self.data.push(b' ');
        }
        ((start - COLTEXT_BIAS) as u16, text.len() as u16)
    }

    /// The finished subheader.
    pub fn into_subheader(self) -> Vec<u8> {
        self.data
    }
}

/// COLNAME subheader. `None` entries get a nonzero discriminator so the
/// reader synthesizes a positional name.
pub fn colname_subheader(entries: &[Option<(u16, u16)>]) -> Vec<u8> {
    let mut sh = vec![0u8; COLUMN_TABLE_START + entries.len() * COLNAME_ENTRY_LEN + 8];
    sh[..4].copy_from_slice(&SIG_COLNAME);
    for (i, entry) in entries.iter().enumerate() {
        let base = COLUMN_TABLE_START + i * COLNAME_ENTRY_LEN;
        match entry {
            Some((offset, len)) => {
                put_u16(&mut sh, base + 2, *offset);
                put_u16(&mut sh, base + 4, *len);
            }
            None => sh[base] = 1,
        }
    }
    sh
}

/// COLUMNATTR subheader from `(offset, length, type code)` triples.
pub fn colattr_subheader(entries: &[(i32, i32, i16)]) -> Vec<u8> {
    let mut sh = vec![0u8; COLUMN_TABLE_START + entries.len() * COLATTR_ENTRY_LEN + COLATTR_TRAILER];
    sh[..4].copy_from_slice(&SIG_COLATTR);
    for (i, (offset, length, type_code)) in entries.iter().enumerate() {
        let base = COLUMN_TABLE_START + i * COLATTR_ENTRY_LEN;
        put_i32(&mut sh, base, *offset);
        put_i32(&mut sh, base + 4, *length);
        put_i16(&mut sh, base + 10, *type_code);
    }
    sh
}

/// COLLABS subheader for one column; a zero length means absent.
pub fn collabs_subheader(format: (u16, u16), label: (u16, u16)) -> Vec<u8> {
    let mut sh = vec![0u8; 52];
    sh[..4].copy_from_slice(&SIG_COLLABS);
    put_u16(&mut sh, COLLABS_FORMAT_OFFSET, format.0);
    put_u16(&mut sh, COLLABS_FORMAT_LEN, format.1);
    put_u16(&mut sh, COLLABS_LABEL_OFFSET, label.0);
    put_u16(&mut sh, COLLABS_LABEL_LEN, label.1);
    sh
}

/// Lay out `subheaders` on a page of `kind`: pointers from offset 24, bodies
/// packed against the end of the page.
pub fn subheader_page(page_size: usize, kind: u8, subheaders: &[Vec<u8>]) -> Vec<u8> {
    let mut page = vec![0u8; page_size];
    page[PAGE_TYPE] = kind;
    put_i32(&mut page, PAGE_SUBHEADER_COUNT, subheaders.len() as i32);
    let mut end = page_size;
    for (i, sh) in subheaders.iter().enumerate() {
        end -= sh.len();
        page[end..end + sh.len()].copy_from_slice(sh);
        let dir = PAGE_SUBHEADER_DIR + i * SUBHEADER_POINTER_LEN;
        put_i32(&mut page, dir, end as i32);
        put_i32(&mut page, dir + 4, sh.len() as i32);
    }
    page
}

/// First row byte on a mixed page with `subheader_count` pointers.
pub fn mixed_row_base(subheader_count: usize) -> usize {
    let base = PAGE_SUBHEADER_DIR + subheader_count * SUBHEADER_POINTER_LEN;
    (base + 7) / 8 * 8
}

/// Storage class of a test column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestColumnKind {
    Numeric,
    Character,
}

/// A column definition for [`SasFileBuilder`].
#[derive(Debug, Clone)]
pub struct TestColumn {
    pub name: Option<String>,
    pub label: Option<String>,
    pub format: Option<String>,
    pub kind: TestColumnKind,
    pub length: usize,
}

impl TestColumn {
    pub fn numeric(name: &str, length: usize) -> Self {
        Self {
            name: Some(name.to_string()),
            label: None,
            format: None,
            kind: TestColumnKind::Numeric,
            length,
        }
    }

    pub fn character(name: &str, length: usize) -> Self {
        Self {
            kind: TestColumnKind::Character,
            ..Self::numeric(name, length)
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Store no name; readers fall back to a positional one.
    pub fn unnamed(mut self) -> Self {
        self.name = None;
        self
    }

    fn type_code(&self) -> i16 {
        match self.kind {
            TestColumnKind::Numeric => COLTYPE_NUMERIC,
            TestColumnKind::Character => 2,
        }
    }
}

/// A stored field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A double, truncated to the column length by dropping low-order bytes
    Number(f64),
    /// Text, space-padded or cut to the column length
    Text(String),
    /// Exact bytes, zero-padded or cut to the column length
    Raw(Vec<u8>),
}

impl Cell {
    pub fn text(s: &str) -> Self {
        Cell::Text(s.to_string())
    }

    fn encode(&self, length: usize) -> Vec<u8> {
        let mut out = match self {
            Cell::Number(v) => {
                let full = v.to_le_bytes();
                full[8usize.saturating_sub(length)..].to_vec()
            }
            Cell::Text(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.resize(length.max(bytes.len()), b' ');
                bytes
            }
            Cell::Raw(bytes) => bytes.clone(),
        };
        out.resize(length, 0);
        out
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::text(s)
    }
}

/// Builds complete SAS7BDAT byte images.
#[derive(Debug, Clone)]
pub struct SasFileBuilder {
    page_size: usize,
    columns: Vec<TestColumn>,
    rows: Vec<Vec<Cell>>,
    rows_per_page: usize,
    colattr_chunk: usize,
    subheaders_per_page: usize,
    mixed_rows: usize,
    amd_page: bool,
    declared_rows: Option<i32>,
    declared_pages: Option<i32>,
    colsize_count: Option<i32>,
}

impl Default for SasFileBuilder {
    fn default() -> Self {
        Self {
            page_size: 4096,
            columns: Vec::new(),
            rows: Vec::new(),
            rows_per_page: 10,
            colattr_chunk: usize::MAX,
            subheaders_per_page: usize::MAX,
            mixed_rows: 0,
            amd_page: false,
            declared_rows: None,
            declared_pages: None,
            colsize_count: None,
        }
    }
}

impl SasFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn column(mut self, column: TestColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn row<C: Into<Cell>>(mut self, cells: Vec<C>) -> Self {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Rows stored on each data page.
    pub fn rows_per_page(mut self, rows: usize) -> Self {
        self.rows_per_page = rows.max(1);
        self
    }

    /// Split COLUMNATTR into subheaders of at most `columns` entries.
    pub fn colattr_chunk(mut self, columns: usize) -> Self {
        self.colattr_chunk = columns.max(1);
        self
    }

    /// Spread subheaders over several meta pages.
    pub fn subheaders_per_page(mut self, count: usize) -> Self {
        self.subheaders_per_page = count.max(1);
        self
    }

    /// Store the first `rows` rows on the last meta page, making it mixed.
    pub fn mixed_rows(mut self, rows: usize) -> Self {
        self.mixed_rows = rows;
        self
    }

    /// Insert an AMD page between the catalog and the data pages.
    pub fn amd_page(mut self) -> Self {
        self.amd_page = true;
        self
    }

    /// Override the row count declared in ROWSIZE.
    pub fn declared_rows(mut self, rows: i32) -> Self {
        self.declared_rows = Some(rows);
        self
    }

    /// Override the page count declared in the header.
    pub fn declared_pages(mut self, pages: i32) -> Self {
        self.declared_pages = Some(pages);
        self
    }

    /// Make COLSIZE disagree with ROWSIZE.
    pub fn colsize_count(mut self, count: i32) -> Self {
        self.colsize_count = Some(count);
        self
    }

    fn row_length(&self) -> usize {
        self.columns.iter().map(|c| c.length).sum()
    }

    fn encode_row(&self, cells: &[Cell]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.row_length());
        for (column, cell) in self.columns.iter().zip(cells) {
            out.extend(cell.encode(column.length));
        }
        out.resize(self.row_length(), 0);
        out
    }

    /// All catalog subheaders in discovery order.
    pub fn subheaders(&self) -> Vec<Vec<u8>> {
        let column_count = self.columns.len() as i32;
        let mixed_rows = self.mixed_rows.min(self.rows.len());
        let mut text = ColumnText::new();

        let names: Vec<Option<(u16, u16)>> = self
            .columns
            .iter()
            .map(|c| c.name.as_deref().map(|n| text.push(n)))
            .collect();

        let with_labels = self
            .columns
            .iter()
            .any(|c| c.label.is_some() || c.format.is_some());
        let labels: Vec<Vec<u8>> = if with_labels {
            self.columns
                .iter()
                .map(|c| {
                    let format = c.format.as_deref().map_or((0, 0), |f| text.push(f));
                    let label = c.label.as_deref().map_or((0, 0), |l| text.push(l));
                    collabs_subheader(format, label)
                })
                .collect()
        } else {
            Vec::new()
        };

        let mut attrs = Vec::with_capacity(self.columns.len());
        let mut offset = 0;
        for column in &self.columns {
            attrs.push((offset as i32, column.length as i32, column.type_code()));
            offset += column.length;
        }

        let mut out = vec![
            rowsize_subheader(
                self.row_length() as i32,
                self.declared_rows.unwrap_or(self.rows.len() as i32),
                column_count,
                mixed_rows as i32,
            ),
            colsize_subheader(self.colsize_count.unwrap_or(column_count)),
            text.into_subheader(),
            colname_subheader(&names),
        ];
        for chunk in attrs.chunks(self.colattr_chunk.min(attrs.len().max(1))) {
            out.push(colattr_subheader(chunk));
        }
        out.extend(labels);
        out
    }

    /// The finished file image.
    pub fn build(&self) -> Vec<u8> {
        let subheaders = self.subheaders();
        let groups: Vec<&[Vec<u8>]> = subheaders.chunks(self.subheaders_per_page).collect();
        let mixed_rows = self.mixed_rows.min(self.rows.len());
        let row_length = self.row_length();

        let mut pages = Vec::new();
        for (i, group) in groups.iter().enumerate() {
            let is_last = i + 1 == groups.len();
            if is_last && mixed_rows > 0 {
                let mut page = subheader_page(self.page_size, PAGE_MIX, group);
                let base = mixed_row_base(group.len());
                for (r, cells) in self.rows[..mixed_rows].iter().enumerate() {
                    let at = base + r * row_length;
                    page[at..at + row_length].copy_from_slice(&self.encode_row(cells));
                }
                pages.push(page);
            } else {
                pages.push(subheader_page(self.page_size, PAGE_META, group));
            }
        }

        if self.amd_page {
            let mut page = vec![0u8; self.page_size];
            page[PAGE_TYPE] = PAGE_AMD;
            pages.push(page);
        }

        for chunk in self.rows[mixed_rows..].chunks(self.rows_per_page) {
            let mut page = vec![0u8; self.page_size];
            page[PAGE_TYPE] = PAGE_DATA;
            put_i32(&mut page, PAGE_BLOCK_COUNT, chunk.len() as i32);
            for (r, cells) in chunk.iter().enumerate() {
                let at = DATA_PAGE_ROW_BASE + r * row_length;
                page[at..at + row_length].copy_from_slice(&self.encode_row(cells));
            }
            pages.push(page);
        }

        let page_count = self.declared_pages.unwrap_or(pages.len() as i32);
        let mut out = header(self.page_size, page_count);
        for page in pages {
            out.extend(page);
        }
        out
    }

    /// Write the image to `path`.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        std::fs::write(path, self.build())
    }
}
