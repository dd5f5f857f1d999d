//! Table writer kernel that serializes row records into workbook output.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};

use crate::conf::{
    N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, derive_default_header_format,
    derive_default_table_write_options,
};
use crate::spec::{
    SpecCellFormat, SpecTableRow, SpecTableWriteOptions, SpecTableWriteReport, TableIoError,
};
use crate::util::{cast_col_num, cast_row_num, sanitize_sheet_name};

/// Stateful table writer bound to one output path.
///
/// Each [`Self::write_rows`] call emits one sheet: a styled header row built
/// from the first record's column names, then every record's values in input
/// order. The workbook is buffered in memory until [`Self::close`] is called.
pub struct TableWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    fmt_header: SpecCellFormat,
    options: SpecTableWriteOptions,
    l_reports: Vec<SpecTableWriteReport>,
    if_closed: bool,
}

impl TableWriter {
    /// Create a writer bound to the output path, header format and layout
    /// options.
    pub fn new(
        path_file_out: PathBuf,
        fmt_header: SpecCellFormat,
        options: SpecTableWriteOptions,
    ) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            fmt_header,
            options,
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Return immutable snapshot of per-call write reports.
    pub fn report(&self) -> Vec<SpecTableWriteReport> {
        self.l_reports.clone()
    }

    /// Flush the workbook to disk, creating or overwriting the destination.
    /// Idempotent.
    pub fn close(&mut self) -> Result<(), TableIoError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook
            .save(&self.path_file_out)
            .map_err(|err| derive_write_failure(&self.path_file_out, err))?;
        self.if_closed = true;
        Ok(())
    }

    /// Write one sheet of homogeneous rows.
    ///
    /// Column names are read from the first record only; records whose value
    /// count differs from the header width are written as-is and recorded as
    /// warnings in the call report. Header and data cells begin at the column
    /// index configured by [`SpecTableWriteOptions::n_col_start`].
    pub fn write_rows(&mut self, rows: &[SpecTableRow]) -> Result<(), TableIoError> {
        if self.if_closed {
            return Err(derive_write_failure(
                &self.path_file_out,
                "cannot write after close()",
            ));
        }
        let Some(row_first) = rows.first() else {
            log::error!(
                "Table write called with zero rows: {}",
                self.path_file_out.display()
            );
            return Err(TableIoError::EmptyInput);
        };

        let path_file_out = self.path_file_out.clone();
        let columns = row_first.columns.clone();
        let n_col_start = self.options.n_col_start;
        let n_width_widest = rows
            .iter()
            .map(|row| row.values.len())
            .max()
            .unwrap_or(0)
            .max(columns.len());

        if n_col_start + n_width_widest > N_NCOLS_EXCEL_MAX {
            return Err(derive_write_failure(
                &path_file_out,
                format!(
                    "column span {} exceeds Excel limit {N_NCOLS_EXCEL_MAX}",
                    n_col_start + n_width_widest
                ),
            ));
        }
        if rows.len() + 1 > N_NROWS_EXCEL_MAX {
            return Err(derive_write_failure(
                &path_file_out,
                format!(
                    "row count {} exceeds Excel limit {N_NROWS_EXCEL_MAX}",
                    rows.len() + 1
                ),
            ));
        }

        let fmt_header = derive_rust_xlsx_format(&self.fmt_header);
        let worksheet = self.workbook.add_worksheet();
        if let Some(c_sheet_name) = &self.options.sheet_name {
            worksheet
                .set_name(sanitize_sheet_name(c_sheet_name, "_"))
                .map_err(|err| derive_write_failure(&path_file_out, err))?;
        }

        let mut report = SpecTableWriteReport {
            sheet_name: worksheet.name(),
            n_rows_written: 0,
            warnings: vec![],
        };

        for (n_idx_col, c_column) in columns.iter().enumerate() {
            worksheet
                .write_string_with_format(
                    0,
                    cast_col(n_col_start + n_idx_col, &path_file_out)?,
                    c_column,
                    &fmt_header,
                )
                .map_err(|err| derive_write_failure(&path_file_out, err))?;
        }

        for (n_idx_row, row) in rows.iter().enumerate() {
            if row.values.len() != columns.len() {
                report.warn(format!(
                    "Row {}: {} values for {} header columns.",
                    row.n_row_physical,
                    row.values.len(),
                    columns.len()
                ));
            }
            for (n_idx_col, c_value) in row.values.iter().enumerate() {
                worksheet
                    .write_string(
                        cast_row(n_idx_row + 1, &path_file_out)?,
                        cast_col(n_col_start + n_idx_col, &path_file_out)?,
                        c_value,
                    )
                    .map_err(|err| derive_write_failure(&path_file_out, err))?;
            }
        }

        report.n_rows_written = rows.len();
        self.l_reports.push(report);
        Ok(())
    }
}

/// One-shot write: create a workbook, write one sheet of rows under the
/// default styled header and layout, and save it to `path`.
///
/// Zero rows yield [`TableIoError::EmptyInput`] without touching the
/// destination.
pub fn write_table_file<P: AsRef<Path>>(
    path: P,
    rows: &[SpecTableRow],
) -> Result<SpecTableWriteReport, TableIoError> {
    let mut writer = TableWriter::new(
        path.as_ref().to_path_buf(),
        derive_default_header_format(),
        derive_default_table_write_options(),
    );
    writer.write_rows(rows)?;
    writer.close()?;
    Ok(writer.l_reports.pop().unwrap_or_default())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        0 => FormatBorder::None,
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "justify" => Some(FormatAlign::Justify),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row(value: usize, path: &Path) -> Result<u32, TableIoError> {
    cast_row_num(value).map_err(|c_msg| derive_write_failure(path, c_msg))
}

fn cast_col(value: usize, path: &Path) -> Result<u16, TableIoError> {
    cast_col_num(value).map_err(|c_msg| derive_write_failure(path, c_msg))
}

fn derive_write_failure(path: &Path, err: impl std::fmt::Display) -> TableIoError {
    let c_message = err.to_string();
    log::error!("Failed to write table file {}: {c_message}", path.display());
    TableIoError::WriteFailure {
        path: path.to_path_buf(),
        message: c_message,
    }
}
