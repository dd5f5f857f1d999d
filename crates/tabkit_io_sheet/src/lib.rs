//! `tabkit_io_sheet` v1:
//! Rust-side sheet-table IO kernel.
//!
//! Converts `.xls`/`.xlsx` workbooks into row-oriented string records and
//! serializes such records back under a styled header:
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/errors
//! - `util`   : pure helper functions
//! - `reader` : workbook open + row extraction kernel
//! - `writer` : table writer kernel
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_EXT_XLS, C_EXT_XLSX, N_IDX_SHEET_READ, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX,
    N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL, derive_default_header_format,
    derive_default_table_write_options,
};
pub use reader::{open_table_workbook, read_table_file};
pub use spec::{
    EnumWorkbookKind, SpecCellFormat, SpecTableRow, SpecTableWriteOptions, SpecTableWriteReport,
    TableIoError,
};
pub use util::{
    convert_cell_to_string, convert_numeric_to_string, derive_effective_columns,
    derive_row_values, derive_workbook_kind, is_physical_row, sanitize_sheet_name,
};
pub use writer::{TableWriter, write_table_file};
