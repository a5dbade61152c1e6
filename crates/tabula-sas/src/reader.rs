//! SAS7BDAT reader.
//!
//! Reads the header, then walks the pages in order. Subheaders are collected
//! until the first page holding rows; at that point the column catalog is
//! resolved and handed to the callback, and rows are decoded page by page
//! until the file ends or the callback asks to stop.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::callback::SasReaderCallback;
use crate::error::SasResult;
use crate::format::records::HEADER_LEN;
use crate::format::SubHeader;
use crate::header::{parse_header, FileHeader};
use crate::metadata::{self, ResolvedMetadata};
use crate::options::SasReadOptions;
use crate::page::{read_page, Page, PageKind};
use crate::rows::{decode_row, page_rows};

/// SAS7BDAT file reader.
///
/// A reader holds only its options; every call to [`SasReader::read`]
/// starts from a fresh state, so one reader can be reused for many files.
#[derive(Debug, Clone, Default)]
pub struct SasReader {
    options: SasReadOptions,
}

/// Outcome of a completed read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadSummary {
    pub header: FileHeader,
    /// Pages actually read (may be fewer than declared if the stream ended)
    pub pages_read: u32,
    /// Rows delivered to the callback
    pub rows_read: u64,
    /// Whether the callback ended the read
    pub stopped_early: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// State threaded through one read.
#[derive(Debug, Default)]
struct ReaderState {
    subheaders: Vec<SubHeader>,
    metadata: Option<ResolvedMetadata>,
    rows_read: u64,
}

impl ReaderState {
    fn process_page<C>(&mut self, page: &Page, callback: &mut C) -> SasResult<Flow>
    where
        C: SasReaderCallback + ?Sized,
    {
        if self.metadata.is_none() && page.kind.has_subheaders() {
            let found = page.subheaders()?;
            log::debug!("page {}: {} subheaders", page.index, found.len());
            self.subheaders.extend(found);
        }

        if !page.kind.has_rows() {
            return Ok(Flow::Continue);
        }

        if self.metadata.is_none() {
            let resolved = metadata::resolve(&self.subheaders)?;
            self.subheaders.clear();
            for column in &resolved.columns {
                callback.column(column);
            }
            self.metadata = Some(resolved);

            if !callback.read_data() {
                log::info!("callback decided not to read data");
                return Ok(Flow::Stop);
            }
        }

        let Some(meta) = &self.metadata else {
            return Ok(Flow::Continue);
        };

        let rows = page_rows(page, &meta.layout, self.rows_read)?;
        for r in 0..rows.count as usize {
            let start = rows.base + r * meta.layout.row_length;
            let values = decode_row(&page.data, start, &meta.columns)?;
            self.rows_read += 1;
            log::trace!("row {}: {:?}", self.rows_read, values);

            if !callback.row(self.rows_read, &values) {
                log::info!("callback decided to stop iteration");
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }
}

impl SasReader {
    /// Create a reader with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with custom options
    pub fn with_options(options: SasReadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SasReadOptions {
        &self.options
    }

    /// Read a SAS7BDAT file from a filesystem path.
    pub fn read_file<P, C>(&self, path: P, callback: &mut C) -> SasResult<ReadSummary>
    where
        P: AsRef<Path>,
        C: SasReaderCallback + ?Sized,
    {
        let path = path.as_ref();
        log::info!("({}) reading", path.display());
        let file = File::open(path)?;
        let summary = self.read(BufReader::new(file), callback)?;
        log::info!(
            "({}) done: {} pages, {} rows",
            path.display(),
            summary.pages_read,
            summary.rows_read
        );
        Ok(summary)
    }

    /// Read a SAS7BDAT file from any forward-only byte stream.
    pub fn read<R, C>(&self, mut reader: R, callback: &mut C) -> SasResult<ReadSummary>
    where
        R: Read,
        C: SasReaderCallback + ?Sized,
    {
        let mut header_buf = vec![0u8; HEADER_LEN];
        reader.read_exact(&mut header_buf)?;
        let header = parse_header(&header_buf, &self.options)?;
        log::info!("header: {header}");

        let page_size = header.page_size as usize;
        let mut state = ReaderState::default();
        let mut pages_read = 0;
        let mut stopped_early = false;

        for index in 0..header.page_count {
            let page = match read_page(&mut reader, page_size, index)? {
                Some(page) => page,
                None => {
                    log::info!(
                        "stream ended after {index} of {} declared pages",
                        header.page_count
                    );
                    break;
                }
            };
            pages_read += 1;

            if page.kind == PageKind::Amd {
                log::info!("page {index} type not fully supported: {}", page.kind);
            } else {
                log::debug!("page {index}: {}", page.kind);
            }

            if state.process_page(&page, callback)? == Flow::Stop {
                stopped_early = true;
                break;
            }
        }

        Ok(ReadSummary {
            header,
            pages_read,
            rows_read: state.rows_read,
            stopped_early,
        })
    }
}
