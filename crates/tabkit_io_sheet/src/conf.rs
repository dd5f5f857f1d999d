//! Sheet-table constants and default preset factories.

use crate::spec::{SpecCellFormat, SpecTableWriteOptions};

/// Recognized legacy binary workbook extension.
pub const C_EXT_XLS: &str = "xls";
/// Recognized zip/XML workbook extension.
pub const C_EXT_XLSX: &str = "xlsx";

/// Sheet index consumed by the read path.
pub const N_IDX_SHEET_READ: usize = 0;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Build the default styled header format used by [`crate::writer::TableWriter`].
pub fn derive_default_header_format() -> SpecCellFormat {
    SpecCellFormat {
        bold: Some(true),
        border: Some(1),
        bg_color: Some("#C0C0C0".to_string()),
        font_color: Some("#000000".to_string()),
        ..Default::default()
    }
}

/// Build default table write options.
pub fn derive_default_table_write_options() -> SpecTableWriteOptions {
    SpecTableWriteOptions::default()
}
