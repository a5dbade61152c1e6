//! Column catalog resolution.
//!
//! The catalog is spread over several subheader kinds. ROWSIZE and COLSIZE
//! give the row geometry, COLTEXT holds every name/label/format string,
//! COLNAME and COLLABS point into COLTEXT, and COLUMNATTR holds each
//! column's position, width and storage type. Wide tables split COLUMNATTR
//! into several subheaders that are spliced back into one table here.

use tabula_core::{ColumnDescriptor, ColumnType};

use crate::error::{SasError, SasResult};
use crate::format::parser::{concat, read_bytes, read_i16, read_i32, read_text, read_u16, read_u8};
use crate::format::records::*;
use crate::format::{SubHeader, SubheaderKind};

/// Row geometry from ROWSIZE/COLSIZE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    /// Bytes per row record
    pub row_length: usize,
    /// Total rows declared for the file
    pub row_count: u64,
    /// Rows stored on a mixed page
    pub row_count_fp: u64,
    /// Authoritative column count (COLSIZE)
    pub column_count: usize,
}

/// Everything needed to decode rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetadata {
    pub layout: RowLayout,
    pub columns: Vec<ColumnDescriptor>,
}

fn non_negative(value: i32, what: &str) -> SasResult<usize> {
    usize::try_from(value).map_err(|_| SasError::invalid(format!("{what} is negative: {value}")))
}

/// All subheaders of `kind`, in discovery order.
pub fn find_all(subheaders: &[SubHeader], kind: SubheaderKind) -> Vec<&SubHeader> {
    subheaders.iter().filter(|sh| sh.is(kind)).collect()
}

/// The single subheader of `kind`.
pub fn find_unique(subheaders: &[SubHeader], kind: SubheaderKind) -> SasResult<&SubHeader> {
    match find_all(subheaders, kind).as_slice() {
        [] => Err(SasError::MissingSubheader(kind.name())),
        [one] => Ok(*one),
        many => Err(SasError::DuplicateSubheader {
            name: kind.name(),
            count: many.len(),
        }),
    }
}

/// Join COLUMNATTR subheaders into one table indexed like a single
/// subheader.
///
/// The first part keeps its 12-byte prefix; every part loses its 8-byte
/// trailer and later parts also lose their prefix.
pub fn splice_column_attributes(parts: &[&SubHeader]) -> SasResult<Vec<u8>> {
    let (first, rest) = parts
        .split_first()
        .ok_or(SasError::MissingSubheader(SubheaderKind::ColumnAttributes.name()))?;
    if rest.is_empty() {
        return Ok(first.data.clone());
    }

    log::info!("splicing {} column attribute subheaders", parts.len());
    let mut table = attribute_body(first, 0)?.to_vec();
    for part in rest {
        table = concat(&table, attribute_body(part, COLUMN_TABLE_START)?);
    }
    Ok(table)
}

fn attribute_body(sh: &SubHeader, start: usize) -> SasResult<&[u8]> {
    let end = sh
        .data
        .len()
        .checked_sub(COLATTR_TRAILER)
        .filter(|end| *end >= start)
        .ok_or_else(|| {
            SasError::invalid(format!(
                "column attribute subheader on page {} is too short: {} bytes",
                sh.page_index,
                sh.data.len()
            ))
        })?;
    read_bytes(&sh.data, start, end - start)
}

/// A string referenced by a `(u16 offset, u16 length)` pair at `at`.
/// Zero length means absent.
fn text_ref(source: &[u8], at: usize, coltext: &[u8]) -> SasResult<Option<String>> {
    let offset = read_u16(source, at)? as usize + COLTEXT_BIAS;
    let len = read_u16(source, at + 2)? as usize;
    if len == 0 {
        return Ok(None);
    }
    read_text(coltext, offset, len).map(Some)
}

fn column_name(colname: &[u8], coltext: &[u8], index: usize) -> SasResult<String> {
    let base = COLUMN_TABLE_START + index * COLNAME_ENTRY_LEN;
    if read_u8(colname, base)? != 0 {
        return Ok(format!("COL{index}"));
    }
    Ok(text_ref(colname, base + 2, coltext)?.unwrap_or_default())
}

fn column_type(type_code: i16, format: Option<&str>) -> ColumnType {
    if type_code != COLTYPE_NUMERIC {
        return ColumnType::Character;
    }
    match format {
        Some(FORMAT_DATE) => ColumnType::Date,
        Some(FORMAT_TIME) => ColumnType::Time,
        _ => ColumnType::Numeric,
    }
}

/// Read the row geometry from ROWSIZE and COLSIZE.
pub fn read_layout(subheaders: &[SubHeader]) -> SasResult<RowLayout> {
    let rowsize = &find_unique(subheaders, SubheaderKind::RowSize)?.data;
    let row_length = non_negative(read_i32(rowsize, ROWSIZE_ROW_LENGTH)?, "row length")?;
    let row_count = non_negative(read_i32(rowsize, ROWSIZE_ROW_COUNT)?, "row count")?;
    let secondary_count = read_i32(rowsize, ROWSIZE_COL_COUNT)?;
    let row_count_fp = non_negative(read_i32(rowsize, ROWSIZE_ROW_COUNT_FP)?, "mixed page row count")?;

    let colsize = &find_unique(subheaders, SubheaderKind::ColumnSize)?.data;
    let column_count = read_i32(colsize, COLSIZE_COL_COUNT)?;
    if column_count != secondary_count {
        log::warn!("column count mismatch: {column_count} vs. {secondary_count}");
    }

    Ok(RowLayout {
        row_length,
        row_count: row_count as u64,
        row_count_fp: row_count_fp as u64,
        column_count: non_negative(column_count, "column count")?,
    })
}

/// Resolve the column catalog from every subheader collected so far.
pub fn resolve(subheaders: &[SubHeader]) -> SasResult<ResolvedMetadata> {
    let layout = read_layout(subheaders)?;
    let count = layout.column_count;

    let coltext = &find_unique(subheaders, SubheaderKind::ColumnText)?.data;
    let attributes = splice_column_attributes(&find_all(subheaders, SubheaderKind::ColumnAttributes))?;
    let colname = &find_unique(subheaders, SubheaderKind::ColumnName)?.data;

    let labels = find_all(subheaders, SubheaderKind::ColumnLabels);
    if !labels.is_empty() && labels.len() != count {
        return Err(SasError::invalid(format!(
            "unexpected column label count ({}), expected 0 or {count}",
            labels.len()
        )));
    }

    // both column tables must hold `count` entries before anything is sized by it
    read_bytes(colname, COLUMN_TABLE_START, count.saturating_mul(COLNAME_ENTRY_LEN))?;
    read_bytes(&attributes, COLUMN_TABLE_START, count.saturating_mul(COLATTR_ENTRY_LEN))?;

    let mut columns = Vec::with_capacity(count);
    for i in 0..count {
        let name = column_name(colname, coltext, i)?;

        let (format, label) = match labels.get(i) {
            Some(collabs) => (
                text_ref(&collabs.data, COLLABS_FORMAT_OFFSET, coltext)?,
                text_ref(&collabs.data, COLLABS_LABEL_OFFSET, coltext)?,
            ),
            None => (None, None),
        };

        let base = COLUMN_TABLE_START + i * COLATTR_ENTRY_LEN;
        let offset = non_negative(read_i32(&attributes, base)?, "column offset")?;
        let length = non_negative(read_i32(&attributes, base + 4)?, "column length")?;
        let type_code = read_i16(&attributes, base + 10)?;
        let column_type = column_type(type_code, format.as_deref());

        log::debug!(
            "column {i}: name={name}, label={label:?}, type code={type_code}, type={column_type}, \
             offset={offset}, length={length}, format={format:?}"
        );

        columns.push(ColumnDescriptor {
            index: i,
            name,
            label,
            column_type,
            offset,
            length,
            format,
        });
    }

    Ok(ResolvedMetadata { layout, columns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use pretty_assertions::assert_eq;

    fn parse_all(raw: Vec<Vec<u8>>) -> Vec<SubHeader> {
        raw.into_iter()
            .map(|data| SubHeader::from_raw(data, 0).unwrap())
            .collect()
    }

    fn three_columns() -> SasFileBuilder {
        SasFileBuilder::new()
            .column(TestColumn::numeric("price", 8).with_label("Unit price"))
            .column(TestColumn::character("brand", 12))
            .column(TestColumn::numeric("sold", 4).with_format("DATE"))
    }

    #[test]
    fn test_resolve_columns() {
        let subheaders = parse_all(three_columns().subheaders());
        let meta = resolve(&subheaders).unwrap();

        assert_eq!(
            meta.layout,
            RowLayout {
                row_length: 24,
                row_count: 0,
                row_count_fp: 0,
                column_count: 3,
            }
        );
        assert_eq!(
            meta.columns,
            vec![
                ColumnDescriptor::new(0, "price", ColumnType::Numeric)
                    .with_length(8)
                    .with_label("Unit price"),
                ColumnDescriptor::new(1, "brand", ColumnType::Character)
                    .with_offset(8)
                    .with_length(12),
                ColumnDescriptor::new(2, "sold", ColumnType::Date)
                    .with_offset(20)
                    .with_length(4)
                    .with_format("DATE"),
            ]
        );
    }

    #[test]
    fn test_format_refinement_is_exact() {
        let builder = SasFileBuilder::new()
            .column(TestColumn::numeric("a", 8).with_format("TIME"))
            .column(TestColumn::numeric("b", 8).with_format("date"))
            .column(TestColumn::numeric("c", 8).with_format("DATETIME"))
            .column(TestColumn::character("d", 8).with_format("DATE"));
        let meta = resolve(&parse_all(builder.subheaders())).unwrap();
        let types: Vec<ColumnType> = meta.columns.iter().map(|c| c.column_type).collect();
        assert_eq!(
            types,
            vec![
                ColumnType::Time,
                ColumnType::Numeric,
                ColumnType::Numeric,
                ColumnType::Character,
            ]
        );
    }

    #[test]
    fn test_positional_name_fallback() {
        let builder = SasFileBuilder::new()
            .column(TestColumn::numeric("x", 8))
            .column(TestColumn::numeric("y", 8).unnamed());
        let meta = resolve(&parse_all(builder.subheaders())).unwrap();
        assert_eq!(meta.columns[0].name, "x");
        assert_eq!(meta.columns[1].name, "COL1");
    }

    #[test]
    fn test_splice_matches_single_table() {
        let mut builder = SasFileBuilder::new();
        for i in 0..7 {
            let column = if i % 2 == 0 {
                TestColumn::numeric(&format!("n{i}"), 8 - i)
            } else {
                TestColumn::character(&format!("c{i}"), 3 + i)
            };
            builder = builder.column(column);
        }

        let unsplit = parse_all(builder.subheaders());
        let single = resolve(&unsplit).unwrap();
        let spliced = parse_all(builder.clone().colattr_chunk(3).subheaders());
        let parts = find_all(&spliced, SubheaderKind::ColumnAttributes);
        assert_eq!(parts.len(), 3);

        let joined = splice_column_attributes(&parts).unwrap();
        let whole = &find_unique(&unsplit, SubheaderKind::ColumnAttributes).unwrap().data;
        assert_eq!(&joined[..], &whole[..whole.len() - COLATTR_TRAILER]);

        assert_eq!(resolve(&spliced).unwrap().columns, single.columns);
    }

    #[test]
    fn test_missing_subheaders() {
        let all = three_columns().subheaders();
        for (skip, name) in [(0, "ROWSIZE"), (1, "COLSIZE"), (2, "COLTEXT"), (3, "COLNAME")] {
            let mut raw = all.clone();
            raw.remove(skip);
            match resolve(&parse_all(raw)) {
                Err(SasError::MissingSubheader(n)) => assert_eq!(n, name),
                other => panic!("expected missing {name}, got {other:?}"),
            }
        }

        let raw: Vec<Vec<u8>> = all.into_iter().filter(|sh| sh[..4] != SIG_COLATTR).collect();
        assert!(matches!(
            resolve(&parse_all(raw)),
            Err(SasError::MissingSubheader("COLATTR"))
        ));
    }

    #[test]
    fn test_duplicate_subheader() {
        let mut raw = three_columns().subheaders();
        raw.push(colsize_subheader(3));
        match resolve(&parse_all(raw)) {
            Err(SasError::DuplicateSubheader { name, count }) => {
                assert_eq!((name, count), ("COLSIZE", 2));
            }
            other => panic!("expected duplicate COLSIZE, got {other:?}"),
        }
    }

    #[test]
    fn test_label_count_must_match() {
        let mut raw = three_columns().subheaders();
        raw.pop();
        let err = resolve(&parse_all(raw)).unwrap_err();
        assert!(matches!(err, SasError::InvalidFormat(m) if m.contains("label count (2)")));
    }

    #[test]
    fn test_column_count_mismatch_is_tolerated() {
        let builder = three_columns().colsize_count(2);
        let raw = builder.subheaders();
        // COLSIZE wins; the label count must then agree with it
        let raw: Vec<Vec<u8>> = raw
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != 7)
            .map(|(_, sh)| sh)
            .collect();
        let meta = resolve(&parse_all(raw)).unwrap();
        assert_eq!(meta.layout.column_count, 2);
        assert_eq!(meta.columns.len(), 2);
    }

    #[test]
    fn test_column_count_beyond_tables() {
        let builder = SasFileBuilder::new()
            .column(TestColumn::numeric("a", 8))
            .column(TestColumn::character("b", 4))
            .colsize_count(i32::MAX);
        let err = resolve(&parse_all(builder.subheaders())).unwrap_err();
        assert!(matches!(
            err,
            SasError::OutOfRange { offset: COLUMN_TABLE_START, .. }
        ));
    }

    #[test]
    fn test_out_of_range_text_reference() {
        let mut raw = three_columns().subheaders();
        // Point the first name past the end of COLTEXT
        raw[3][COLUMN_TABLE_START + 2..COLUMN_TABLE_START + 4].copy_from_slice(&500u16.to_le_bytes());
        assert!(matches!(
            resolve(&parse_all(raw)),
            Err(SasError::OutOfRange { .. })
        ));
    }
}
