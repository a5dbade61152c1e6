//! Row record decoding.

use tabula_core::{ColumnDescriptor, ColumnType, Value};

use crate::datetime;
use crate::error::{DateConversionError, SasResult};
use crate::format::parser::{read_bytes, widen_to_f64};
use crate::format::records::*;
use crate::format::text::decode_trimmed;
use crate::metadata::RowLayout;
use crate::page::{Page, PageKind};

/// Where a page's rows start and how many of them to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRows {
    pub base: usize,
    pub count: u64,
}

/// First row byte on a mixed page: just past the subheader directory,
/// aligned to 8 bytes.
///
/// Counts this page's own directory entries, including empty ones. Readers
/// that use the running count of non-empty subheaders plus one spare entry
/// agree only for a lone subheader page with exactly one empty pointer.
pub fn mixed_row_base(subheader_count: usize) -> usize {
    let end = PAGE_SUBHEADER_DIR + subheader_count * SUBHEADER_POINTER_LEN;
    (end + 7) & !7
}

/// Locate the rows of `page`, given `delivered` rows already read.
///
/// The page's own row count is capped by what remains of the declared
/// total, so trailing slack on the last page is never decoded.
pub fn page_rows(page: &Page, layout: &RowLayout, delivered: u64) -> SasResult<PageRows> {
    let (base, stored) = match page.kind {
        PageKind::Data => (
            DATA_PAGE_ROW_BASE,
            u64::try_from(page.block_count()?).unwrap_or(0),
        ),
        PageKind::Mixed => (mixed_row_base(page.subheader_count()?), layout.row_count_fp),
        PageKind::Meta | PageKind::Amd => (0, 0),
    };
    let remaining = layout.row_count.saturating_sub(delivered);
    Ok(PageRows {
        base,
        count: stored.min(remaining),
    })
}

/// Decode the row starting at `start` in `data`.
pub fn decode_row(data: &[u8], start: usize, columns: &[ColumnDescriptor]) -> SasResult<Vec<Value>> {
    columns
        .iter()
        .map(|column| {
            let raw = read_bytes(data, start + column.offset, column.length)?;
            decode_value(column, raw)
        })
        .collect()
}

/// Decode one field.
pub fn decode_value(column: &ColumnDescriptor, raw: &[u8]) -> SasResult<Value> {
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    match column.column_type {
        ColumnType::Character => Ok(Value::Character(decode_trimmed(raw))),
        t if t.is_temporal() => decode_temporal(t, widen_to_f64(raw)),
        _ => Ok(Value::Numeric(widen_to_f64(raw))),
    }
}

/// Convert a stored day/second count for a Date or Time column.
///
/// Non-finite numbers (SAS missing values) are `Null`. A count the strict
/// conversion rejects is read again as seconds since the epoch: Date columns
/// keep the calendar date of that timestamp, Time columns keep all of it.
pub fn decode_temporal(column_type: ColumnType, number: f64) -> SasResult<Value> {
    if !number.is_finite() {
        return Ok(Value::Null);
    }
    // Saturates for magnitudes beyond i64, which every range check rejects.
    let count = number.floor() as i64;

    match strict_temporal(column_type, count) {
        Ok(value) => Ok(value),
        Err(err) => {
            log::warn!("{err}; value {count} was labeled {column_type} but appears to be a datetime");
            Ok(reinterpret_as_datetime(column_type, count)?)
        }
    }
}

fn strict_temporal(column_type: ColumnType, count: i64) -> Result<Value, DateConversionError> {
    match column_type {
        ColumnType::Time => datetime::second_count_to_time_of_day(count).map(Value::Time),
        _ => datetime::day_count_to_date(count).map(Value::Date),
    }
}

fn reinterpret_as_datetime(column_type: ColumnType, seconds: i64) -> Result<Value, DateConversionError> {
    let timestamp = datetime::second_count_to_datetime(seconds)?;
    Ok(match column_type {
        ColumnType::Date => Value::Date(timestamp.date()),
        _ => Value::DateTime(timestamp),
    })
}
