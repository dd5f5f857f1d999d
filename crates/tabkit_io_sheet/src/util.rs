//! Stateless helper utilities shared by the reader and writer kernels.

use std::path::Path;

use calamine::{Data, Range};

use crate::conf::{C_EXT_XLS, C_EXT_XLSX, N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL};
use crate::spec::EnumWorkbookKind;

////////////////////////////////////////////////////////////////////////////////
// #region CellValueCoercion

/// Coerce one cell of unknown declared type into its canonical string.
///
/// `value` is the cached cell value (absent when no cell exists at that
/// position); `formula` is the cell's formula source text, which takes
/// precedence over the cached value when present. Exactly one branch applies
/// and the function always returns a string:
/// - formula cell: the formula source text, not its computed result;
/// - absent or blank cell: empty string;
/// - numeric cell: zero-fraction decimal string (see
///   [`convert_numeric_to_string`]); date/time cells coerce through their
///   numeric serial value;
/// - text cell: the text verbatim;
/// - boolean cell: `"true"` or `"false"`;
/// - error cell or any other kind: empty string.
pub fn convert_cell_to_string(value: Option<&Data>, formula: Option<&str>) -> String {
    if let Some(text_formula) = formula {
        return text_formula.to_string();
    }

    match value {
        None => String::new(),
        Some(Data::Empty) => String::new(),
        Some(Data::Float(x)) => convert_numeric_to_string(*x),
        Some(Data::Int(x)) => x.to_string(),
        Some(Data::String(text)) => text.clone(),
        Some(Data::Bool(x)) => x.to_string(),
        Some(Data::DateTime(stamp)) => convert_numeric_to_string(stamp.as_f64()),
        Some(Data::Error(_)) => String::new(),
        Some(Data::DateTimeIso(_)) | Some(Data::DurationIso(_)) => String::new(),
    }
}

/// Format a numeric cell value with zero fractional digits.
///
/// Ties round half away from zero (`2.5` -> `"3"`). The output never carries
/// a decimal point, scientific notation, or thousands separators.
pub fn convert_numeric_to_string(x: f64) -> String {
    format!("{:.0}", x.round())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WorkbookDispatch

/// Select the workbook kind from the path extension, case-insensitive.
///
/// Returns `None` for a missing or unrecognized extension.
pub fn derive_workbook_kind(path: &Path) -> Option<EnumWorkbookKind> {
    let c_ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if c_ext == C_EXT_XLS {
        return Some(EnumWorkbookKind::Xls);
    }
    if c_ext == C_EXT_XLSX {
        return Some(EnumWorkbookKind::Xlsx);
    }
    None
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderAndRowScan

/// Inclusive `(row_end, col_end)` of the used area across the value range
/// and the optional formula range, or `None` when both are empty.
pub fn derive_used_extent(
    range: &Range<Data>,
    range_formula: Option<&Range<String>>,
) -> Option<(u32, u32)> {
    let end_data = range.end();
    let end_formula = range_formula.and_then(Range::end);
    match (end_data, end_formula) {
        (None, None) => None,
        (Some(end), None) => Some(end),
        (None, Some(end)) => Some(end),
        (Some(end_a), Some(end_b)) => {
            Some((u32::max(end_a.0, end_b.0), u32::max(end_a.1, end_b.1)))
        }
    }
}

/// Formula source text at an absolute position, when present and non-empty.
pub fn derive_formula_text<'a>(
    range_formula: Option<&'a Range<String>>,
    n_idx_row: u32,
    n_idx_col: u32,
) -> Option<&'a str> {
    let c_formula = range_formula?.get_value((n_idx_row, n_idx_col))?;
    if c_formula.is_empty() {
        None
    } else {
        Some(c_formula.as_str())
    }
}

/// Scan physical row 0 left-to-right and collect the effective column names.
///
/// The scan stops at the first cell that is absent or coerces to an empty
/// string; that cell fixes the effective column count and is not part of the
/// schema even when later header cells physically exist.
pub fn derive_effective_columns(
    range: &Range<Data>,
    range_formula: Option<&Range<String>>,
) -> Vec<String> {
    let Some((_, n_col_end)) = derive_used_extent(range, range_formula) else {
        return vec![];
    };

    let mut l_columns = Vec::new();
    for n_idx_col in 0..=n_col_end {
        let c_cell = convert_cell_to_string(
            range.get_value((0, n_idx_col)),
            derive_formula_text(range_formula, 0, n_idx_col),
        );
        if c_cell.is_empty() {
            break;
        }
        l_columns.push(c_cell);
    }
    l_columns
}

/// True when at least one cell on the physical row holds a value or formula.
///
/// Rows failing this test have no backing data and produce no record.
pub fn is_physical_row(
    range: &Range<Data>,
    range_formula: Option<&Range<String>>,
    n_idx_row: u32,
) -> bool {
    let Some((_, n_col_end)) = derive_used_extent(range, range_formula) else {
        return false;
    };

    (0..=n_col_end).any(|n_idx_col| {
        let if_has_value = !matches!(
            range.get_value((n_idx_row, n_idx_col)),
            None | Some(Data::Empty)
        );
        if_has_value || derive_formula_text(range_formula, n_idx_row, n_idx_col).is_some()
    })
}

/// Assemble one row's values over the effective column span.
///
/// Absent cells inside the span contribute an empty string so gaps stay
/// explicit; cells beyond the span are ignored.
pub fn derive_row_values(
    range: &Range<Data>,
    range_formula: Option<&Range<String>>,
    n_idx_row: u32,
    n_cols_effective: usize,
) -> Vec<String> {
    (0..n_cols_effective)
        .map(|n_idx_col| {
            convert_cell_to_string(
                range.get_value((n_idx_row, n_idx_col as u32)),
                derive_formula_text(range_formula, n_idx_row, n_idx_col as u32),
            )
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to a valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region IndexCasts

/// Cast a row index for the worksheet API.
pub fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

/// Cast a column index for the worksheet API.
pub fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn build_range(cells: &[((u32, u32), Data)]) -> Range<Data> {
        let n_row_end = cells.iter().map(|((r, _), _)| *r).max().unwrap_or(0);
        let n_col_end = cells.iter().map(|((_, c), _)| *c).max().unwrap_or(0);
        let mut range = Range::new((0, 0), (n_row_end, n_col_end));
        for (position, value) in cells {
            range.set_value(*position, value.clone());
        }
        range
    }

    #[test]
    fn test_convert_numeric_to_string_has_no_fraction_or_exponent() {
        assert_eq!(convert_numeric_to_string(3.0), "3");
        assert_eq!(convert_numeric_to_string(2.5), "3");
        assert_eq!(convert_numeric_to_string(2.4), "2");
        assert_eq!(convert_numeric_to_string(-7.0), "-7");
        assert_eq!(convert_numeric_to_string(1_234_567_890_123.0), "1234567890123");

        for x in [0.1, 99.999, 1.0e15, 123_456.789] {
            let c_text = convert_numeric_to_string(x);
            assert!(!c_text.contains('.'), "unexpected decimal point in {c_text:?}");
            assert!(!c_text.contains('E') && !c_text.contains('e'));
        }
    }

    #[test]
    fn test_convert_cell_to_string_by_declared_type() {
        assert_eq!(convert_cell_to_string(None, None), "");
        assert_eq!(convert_cell_to_string(Some(&Data::Empty), None), "");
        assert_eq!(convert_cell_to_string(Some(&Data::Float(3.0)), None), "3");
        assert_eq!(convert_cell_to_string(Some(&Data::Int(7)), None), "7");
        assert_eq!(
            convert_cell_to_string(Some(&Data::String("  spaced ".to_string())), None),
            "  spaced "
        );
        assert_eq!(convert_cell_to_string(Some(&Data::Bool(true)), None), "true");
        assert_eq!(convert_cell_to_string(Some(&Data::Bool(false)), None), "false");
        assert_eq!(
            convert_cell_to_string(
                Some(&Data::Error(calamine::CellErrorType::Div0)),
                None
            ),
            ""
        );
    }

    #[test]
    fn test_convert_cell_to_string_prefers_formula_source_text() {
        assert_eq!(
            convert_cell_to_string(Some(&Data::Float(42.0)), Some("A1+B1")),
            "A1+B1"
        );
        assert_eq!(convert_cell_to_string(None, Some("SUM(A1:A9)")), "SUM(A1:A9)");
    }

    #[test]
    fn test_derive_workbook_kind_is_case_insensitive() {
        assert_eq!(
            derive_workbook_kind(Path::new("/tmp/a.xls")),
            Some(EnumWorkbookKind::Xls)
        );
        assert_eq!(
            derive_workbook_kind(Path::new("/tmp/a.XLSX")),
            Some(EnumWorkbookKind::Xlsx)
        );
        assert_eq!(derive_workbook_kind(Path::new("/tmp/a.csv")), None);
        assert_eq!(derive_workbook_kind(Path::new("/tmp/noext")), None);
    }

    #[test]
    fn test_derive_effective_columns_stops_at_first_blank_header_cell() {
        let range = build_range(&[
            ((0, 0), Data::String("Name".to_string())),
            ((0, 1), Data::String("Age".to_string())),
            ((0, 3), Data::String("Extra".to_string())),
            ((1, 0), Data::String("alice".to_string())),
        ]);

        assert_eq!(
            derive_effective_columns(&range, None),
            vec!["Name".to_string(), "Age".to_string()]
        );
    }

    #[test]
    fn test_derive_effective_columns_empty_without_header_cells() {
        let range = build_range(&[((2, 0), Data::String("late".to_string()))]);
        assert!(derive_effective_columns(&range, None).is_empty());

        let range_empty = Range::<Data>::new((0, 0), (0, 0));
        assert!(derive_effective_columns(&range_empty, None).is_empty());
    }

    #[test]
    fn test_is_physical_row_requires_value_or_formula() {
        let range = build_range(&[
            ((0, 0), Data::String("Name".to_string())),
            ((1, 0), Data::String("alice".to_string())),
            ((3, 0), Data::String("bob".to_string())),
        ]);

        assert!(is_physical_row(&range, None, 1));
        assert!(!is_physical_row(&range, None, 2));
        assert!(is_physical_row(&range, None, 3));

        let mut range_formula = Range::<String>::new((0, 0), (2, 0));
        range_formula.set_value((2, 0), "A1*2".to_string());
        assert!(is_physical_row(&range, Some(&range_formula), 2));
    }

    #[test]
    fn test_derive_row_values_pads_and_truncates_to_span() {
        let range = build_range(&[
            ((1, 0), Data::String("a".to_string())),
            ((1, 3), Data::String("overflow".to_string())),
        ]);

        assert_eq!(
            derive_row_values(&range, None, 1, 3),
            vec!["a".to_string(), String::new(), String::new()]
        );
    }

    #[test]
    fn test_sanitize_sheet_name_replaces_illegal_chars_and_caps_length() {
        assert_eq!(sanitize_sheet_name("q1:budget/plan", "_"), "q1_budget_plan");
        assert_eq!(sanitize_sheet_name("   ", "_"), "Sheet");

        let c_long = "x".repeat(64);
        assert_eq!(
            sanitize_sheet_name(&c_long, "_").chars().count(),
            N_LEN_EXCEL_SHEET_NAME_MAX
        );
    }

    #[test]
    fn test_cast_index_helpers_reject_overflow() {
        assert_eq!(cast_row_num(5), Ok(5));
        assert_eq!(cast_col_num(5), Ok(5));
        assert!(cast_row_num(usize::MAX).is_err());
        assert!(cast_col_num(70_000).is_err());
    }
}
