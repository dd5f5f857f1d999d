//! Workbook opening and sheet-to-row extraction kernel.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use calamine::{Data, Range, Reader, Sheets, Xls, Xlsx, open_workbook};

use crate::conf::N_IDX_SHEET_READ;
use crate::spec::{EnumWorkbookKind, SpecTableRow, TableIoError};
use crate::util::{
    derive_effective_columns, derive_row_values, derive_used_extent, derive_workbook_kind,
    is_physical_row,
};

/// Resolve `path` to an open, type-appropriate workbook handle.
///
/// The path extension selects between the legacy binary reader and the
/// zip/XML reader; the file must exist before an open is attempted. The
/// returned handle owns the underlying byte stream and releases it when
/// dropped, on every exit path.
pub fn open_table_workbook(path: &Path) -> Result<Sheets<BufReader<File>>, TableIoError> {
    if !path.exists() {
        log::error!("Sheet file does not exist: {}", path.display());
        return Err(TableIoError::FileNotFound(path.to_path_buf()));
    }

    let Some(kind_workbook) = derive_workbook_kind(path) else {
        let c_extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default();
        log::error!(
            "Unrecognized sheet file extension {:?}: {}",
            c_extension,
            path.display()
        );
        return Err(TableIoError::UnsupportedExtension {
            path: path.to_path_buf(),
            extension: c_extension,
        });
    };

    match kind_workbook {
        EnumWorkbookKind::Xls => {
            let workbook: Xls<_> =
                open_workbook(path).map_err(|err| derive_parse_failure(path, err))?;
            Ok(Sheets::Xls(workbook))
        }
        EnumWorkbookKind::Xlsx => {
            let workbook: Xlsx<_> =
                open_workbook(path).map_err(|err| derive_parse_failure(path, err))?;
            Ok(Sheets::Xlsx(workbook))
        }
    }
}

/// Read sheet 0 of the workbook at `path` into ordered table rows.
///
/// Physical row 0 supplies the column names and fixes the effective column
/// count; every following physical row becomes one [`SpecTableRow`] sharing
/// the column sequence. Rows with no backing cells are skipped entirely, so
/// `n_row_physical` values may have gaps.
pub fn read_table_file<P: AsRef<Path>>(path: P) -> Result<Vec<SpecTableRow>, TableIoError> {
    let path = path.as_ref();
    let mut workbook = open_table_workbook(path)?;

    let range_data: Range<Data> = match workbook.worksheet_range_at(N_IDX_SHEET_READ) {
        Some(Ok(range_data)) => range_data,
        Some(Err(err)) => return Err(derive_parse_failure(path, err)),
        None => {
            return Err(derive_parse_failure(
                path,
                format!("workbook has no sheet at index {N_IDX_SHEET_READ}"),
            ));
        }
    };

    // Formula layer is best-effort: a sheet without one reads as values only.
    let l_sheet_names = workbook.sheet_names();
    let range_formula: Option<Range<String>> = l_sheet_names
        .get(N_IDX_SHEET_READ)
        .and_then(|c_name| workbook.worksheet_formula(c_name).ok());

    Ok(collect_table_rows(&range_data, range_formula.as_ref()))
}

fn collect_table_rows(
    range_data: &Range<Data>,
    range_formula: Option<&Range<String>>,
) -> Vec<SpecTableRow> {
    let columns: Arc<[String]> = derive_effective_columns(range_data, range_formula).into();
    let n_cols_effective = columns.len();

    let Some((n_row_end, _)) = derive_used_extent(range_data, range_formula) else {
        return vec![];
    };

    let mut l_rows = Vec::new();
    for n_idx_row in 1..=n_row_end {
        if !is_physical_row(range_data, range_formula, n_idx_row) {
            continue;
        }
        l_rows.push(SpecTableRow {
            columns: Arc::clone(&columns),
            values: derive_row_values(range_data, range_formula, n_idx_row, n_cols_effective),
            n_row_physical: n_idx_row as usize,
        });
    }
    l_rows
}

fn derive_parse_failure(path: &Path, err: impl std::fmt::Display) -> TableIoError {
    let c_message = err.to_string();
    log::error!("Failed to parse sheet file {}: {c_message}", path.display());
    TableIoError::ParseFailure {
        path: path.to_path_buf(),
        message: c_message,
    }
}
