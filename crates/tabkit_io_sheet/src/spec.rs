//! Shared sheet-table specification models and top-level error types.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification used for styled header rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WorkbookDispatch

/// Workbook container kind selected from the path extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumWorkbookKind {
    /// Legacy binary workbook (`.xls`).
    Xls,
    /// Zip/XML workbook (`.xlsx`).
    Xlsx,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TableRowModel

/// One data record extracted from a sheet.
///
/// Every row produced by one read call shares the same column-name sequence;
/// the sequence is fixed when the header row is parsed and never mutated
/// per-row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTableRow {
    /// Header names, insertion order = column order.
    pub columns: Arc<[String]>,
    /// Cell values coerced to strings; same length as `columns`.
    pub values: Vec<String>,
    /// Zero-based physical row index in the source sheet (header is row 0).
    ///
    /// Indices are not guaranteed contiguous: rows with no backing cells are
    /// skipped during extraction.
    pub n_row_physical: usize,
}

impl SpecTableRow {
    /// Number of columns this row carries.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Value at the first column position whose name equals `name`.
    pub fn value_by_column(&self, name: &str) -> Option<&str> {
        let n_idx = self.columns.iter().position(|c_name| c_name == name)?;
        self.values.get(n_idx).map(String::as_str)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Writer-level options controlling sheet naming and cell layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTableWriteOptions {
    /// Explicit sheet name; `None` keeps the workbook default.
    pub sheet_name: Option<String>,
    /// Zero-based column index where header/data cells begin.
    ///
    /// The legacy layout leaves column 0 blank and starts at 1; `0` writes a
    /// dense table starting at the first column.
    pub n_col_start: usize,
}

impl Default for SpecTableWriteOptions {
    fn default() -> Self {
        Self {
            sheet_name: None,
            n_col_start: 1,
        }
    }
}

/// Per-write call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecTableWriteReport {
    /// Actual sheet name the rows were written to.
    pub sheet_name: String,
    /// Number of data rows written (header row excluded).
    pub n_rows_written: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecTableWriteReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Table IO failure kinds reported to the caller.
///
/// Every failure is a returned value the caller can branch on; no operation
/// panics on user input.
#[derive(Debug)]
pub enum TableIoError {
    /// Input path does not exist.
    FileNotFound(PathBuf),
    /// Path extension is not a recognized workbook kind.
    UnsupportedExtension {
        /// Offending input path.
        path: PathBuf,
        /// Extension as found on the path (may be empty).
        extension: String,
    },
    /// Stream exists but content is corrupt or unreadable.
    ParseFailure {
        /// Offending input path.
        path: PathBuf,
        /// Underlying parser error text.
        message: String,
    },
    /// Write called with zero rows; the header lookup is undefined.
    EmptyInput,
    /// IO error during file creation or serialization.
    WriteFailure {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

impl fmt::Display for TableIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound(path) => {
                write!(f, "Sheet file does not exist: {}", path.display())
            }
            Self::UnsupportedExtension { path, extension } => write!(
                f,
                "Unrecognized sheet file extension {:?}: {}",
                extension,
                path.display()
            ),
            Self::ParseFailure { path, message } => {
                write!(f, "Failed to parse sheet file {}: {message}", path.display())
            }
            Self::EmptyInput => write!(f, "Table write requires at least one row."),
            Self::WriteFailure { path, message } => {
                write!(f, "Failed to write table file {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for TableIoError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
