//! Render an [`XlsxDocument`] through `rust_xlsxwriter`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use log::debug;
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatPattern, FormatScript, FormatUnderline,
    Workbook, Worksheet,
};

use crate::conf::{
    N_COLUMN_WIDTH_DEFAULT, N_ROTATION_STACKED, N_ROW_HEIGHT_DEFAULT, N_TWIPS_PER_POINT,
    derive_default_font,
};
use crate::document::{XlsxDocument, XlsxSheet};
use crate::spec::{
    EnumBorderStyle, EnumCellValue, EnumColor, EnumDataFormat, EnumFillPattern,
    EnumFontTypeOffset, EnumFontUnderline, EnumHorizontalAlignment, EnumVerticalAlignment,
    SpecCellStyle, SpecFont, XlsxDslError,
};
use crate::util::{derive_cell_reference, derive_rgb_from_color};

/// Rotation `rust_xlsxwriter` uses for stacked text.
const N_ROTATION_STACKED_XLSXWRITER: i16 = 270;

impl XlsxDocument {
    /// Write the workbook to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), XlsxDslError> {
        let mut workbook = self.render_workbook()?;
        workbook.save(path.as_ref())?;
        debug!("saved workbook to {}", path.as_ref().display());
        Ok(())
    }

    /// Render the workbook into an in-memory `.xlsx` byte buffer.
    pub fn save_to_buffer(&self) -> Result<Vec<u8>, XlsxDslError> {
        let mut workbook = self.render_workbook()?;
        Ok(workbook.save_to_buffer()?)
    }

    fn render_workbook(&self) -> Result<Workbook, XlsxDslError> {
        let mut workbook = Workbook::new();
        for sheet in self.sheets() {
            let worksheet = workbook.add_worksheet();
            write_sheet(worksheet, sheet, self.default_font())?;
        }
        Ok(workbook)
    }
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &XlsxSheet,
    default_font: &SpecFont,
) -> Result<(), XlsxDslError> {
    worksheet.set_name(sheet.name())?;
    worksheet.set_zoom(sheet.zoom());

    let n_height_default = sheet.default_row_height_in_points();
    if n_height_default > 0.0 && n_height_default != N_ROW_HEIGHT_DEFAULT {
        worksheet.set_default_row_height(n_height_default);
    }

    write_column_widths(worksheet, sheet)?;

    if let Some(pane) = sheet.freeze_pane() {
        worksheet
            .set_freeze_panes(cast_row_num(pane.row_split)?, cast_col_num(pane.col_split)?)?;
        if pane.top_row != pane.row_split || pane.leftmost_column != pane.col_split {
            worksheet.set_freeze_panes_top_cell(
                cast_row_num(pane.top_row)?,
                cast_col_num(pane.leftmost_column)?,
            )?;
        }
    }

    if let Some((n_col_first, n_col_last)) = sheet.repeating_columns() {
        worksheet.set_repeat_columns(cast_col_num(n_col_first)?, cast_col_num(n_col_last)?)?;
    }

    for (n_idx_row, row) in sheet.rows() {
        if let Some(n_height) = row.height_in_points() {
            worksheet.set_row_height(cast_row_num(n_idx_row)?, n_height)?;
        }
        if let Some(style) = row.style() {
            let format = derive_rust_xlsx_format(style, default_font)?;
            worksheet.set_row_format(cast_row_num(n_idx_row)?, &format)?;
        }
    }

    let set_merge_anchors = write_merged_regions(worksheet, sheet, default_font)?;

    for (n_idx_row, row) in sheet.rows() {
        for (n_idx_col, cell) in row.cells() {
            let style = row.derive_effective_style(n_idx_col);
            let format = derive_rust_xlsx_format(&style, default_font)?;

            let if_anchor = set_merge_anchors.contains(&(n_idx_row, n_idx_col));
            let if_covered = !if_anchor
                && sheet
                    .merged_regions()
                    .iter()
                    .any(|range| range.contains(n_idx_row, n_idx_col));

            // Cells under a merged region keep only their format.
            if if_covered {
                if !matches!(cell.value(), EnumCellValue::Blank) {
                    debug!(
                        "sheet {:?}: dropping value of {} covered by a merged region",
                        sheet.name(),
                        derive_cell_reference(n_idx_row, n_idx_col)
                    );
                }
                write_cell_with_format(
                    worksheet,
                    n_idx_row,
                    n_idx_col,
                    &EnumCellValue::Blank,
                    &format,
                )?;
                continue;
            }
            // Text anchors were written by `merge_range`.
            if if_anchor
                && matches!(cell.value(), EnumCellValue::String(_) | EnumCellValue::Blank)
            {
                continue;
            }
            write_cell_with_format(worksheet, n_idx_row, n_idx_col, cell.value(), &format)?;
        }
    }

    debug!(
        "rendered sheet {:?}: {} rows, {} merged regions",
        sheet.name(),
        sheet.physical_number_of_rows(),
        sheet.merged_regions().len()
    );
    Ok(())
}

/// Column widths: explicit ones, then the sheet default for other used columns.
fn write_column_widths(worksheet: &mut Worksheet, sheet: &XlsxSheet) -> Result<(), XlsxDslError> {
    let dict_widths: BTreeMap<usize, f64> = sheet.column_widths().collect();
    for (n_idx_col, n_width) in &dict_widths {
        worksheet.set_column_width(cast_col_num(*n_idx_col)?, *n_width)?;
    }

    if sheet.default_column_width() == N_COLUMN_WIDTH_DEFAULT {
        return Ok(());
    }

    let mut set_cols_used: BTreeSet<usize> = BTreeSet::new();
    for (_, row) in sheet.rows() {
        set_cols_used.extend(row.cells().map(|(n_idx_col, _)| n_idx_col));
    }
    for range in sheet.merged_regions() {
        set_cols_used.extend(range.first_col..=range.last_col);
    }

    let n_width_default = f64::from(sheet.default_column_width());
    for n_idx_col in set_cols_used {
        if !dict_widths.contains_key(&n_idx_col) {
            worksheet.set_column_width(cast_col_num(n_idx_col)?, n_width_default)?;
        }
    }
    Ok(())
}

/// Write every merged region; returns the anchor cells.
fn write_merged_regions(
    worksheet: &mut Worksheet,
    sheet: &XlsxSheet,
    default_font: &SpecFont,
) -> Result<BTreeSet<(usize, usize)>, XlsxDslError> {
    let mut set_anchors = BTreeSet::new();

    for range in sheet.merged_regions() {
        let (style, c_text) = match sheet.row(range.first_row) {
            Some(row) => {
                let c_text = match row.cell(range.first_col).map(|cell| cell.value()) {
                    Some(EnumCellValue::String(val)) => val.as_str(),
                    _ => "",
                };
                (row.derive_effective_style(range.first_col), c_text)
            }
            None => (SpecCellStyle::default(), ""),
        };
        let format = derive_rust_xlsx_format(&style, default_font)?;

        worksheet.merge_range(
            cast_row_num(range.first_row)?,
            cast_col_num(range.first_col)?,
            cast_row_num(range.last_row)?,
            cast_col_num(range.last_col)?,
            c_text,
            &format,
        )?;
        set_anchors.insert((range.first_row, range.first_col));
    }

    Ok(set_anchors)
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), XlsxDslError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::Blank => {
            worksheet.write_blank(n_row, n_col, format)?;
        }
        EnumCellValue::String(val) => {
            worksheet.write_string_with_format(n_row, n_col, val, format)?;
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val, format)?;
        }
        EnumCellValue::Boolean(val) => {
            worksheet.write_boolean_with_format(n_row, n_col, *val, format)?;
        }
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// #region FormatMapping

/// Map a resolved style to a `rust_xlsxwriter` format.
///
/// `style.font == None` renders with `default_font`. Font attributes equal to
/// the writer's built-in font are left unset.
pub(crate) fn derive_rust_xlsx_format(
    style: &SpecCellStyle,
    default_font: &SpecFont,
) -> Result<Format, XlsxDslError> {
    let font = style.font.as_ref().unwrap_or(default_font);
    let mut format = derive_font_format(Format::new(), font);

    match &style.data_format {
        EnumDataFormat::Builtin(0) => {}
        EnumDataFormat::Builtin(n_idx) => {
            let n_idx_format = u8::try_from(*n_idx).map_err(|_| {
                XlsxDslError::InvalidAttribute(format!(
                    "Built-in data format {n_idx} is out of range."
                ))
            })?;
            format = format.set_num_format_index(n_idx_format);
        }
        EnumDataFormat::Custom(val) => {
            format = format.set_num_format(val.as_str());
        }
    }

    if style.hidden {
        format = format.set_hidden();
    }
    if !style.locked {
        format = format.set_unlocked();
    }
    if style.quote_prefixed {
        format = format.set_quote_prefix();
    }

    if let Some(align) = derive_format_align(style.alignment) {
        format = format.set_align(align);
    }
    if let Some(align) = derive_format_valign(style.vertical_alignment) {
        format = format.set_align(align);
    }
    if style.wrap_text {
        format = format.set_text_wrap();
    }
    if style.rotation == N_ROTATION_STACKED {
        format = format.set_rotation(N_ROTATION_STACKED_XLSXWRITER);
    } else if style.rotation != 0 {
        format = format.set_rotation(style.rotation);
    }
    if style.indention > 0 {
        format = format.set_indent(style.indention);
    }
    if style.shrink_to_fit {
        format = format.set_shrink();
    }

    if style.border_top != EnumBorderStyle::None {
        format = format.set_border_top(derive_format_border(style.border_top));
    }
    if style.border_bottom != EnumBorderStyle::None {
        format = format.set_border_bottom(derive_format_border(style.border_bottom));
    }
    if style.border_left != EnumBorderStyle::None {
        format = format.set_border_left(derive_format_border(style.border_left));
    }
    if style.border_right != EnumBorderStyle::None {
        format = format.set_border_right(derive_format_border(style.border_right));
    }
    if let Some(color) = derive_color(style.top_border_color) {
        format = format.set_border_top_color(color);
    }
    if let Some(color) = derive_color(style.bottom_border_color) {
        format = format.set_border_bottom_color(color);
    }
    if let Some(color) = derive_color(style.left_border_color) {
        format = format.set_border_left_color(color);
    }
    if let Some(color) = derive_color(style.right_border_color) {
        format = format.set_border_right_color(color);
    }

    format = derive_fill_format(format, style);

    Ok(format)
}

fn derive_font_format(mut format: Format, font: &SpecFont) -> Format {
    let font_builtin = derive_default_font();

    if font.name != font_builtin.name {
        format = format.set_font_name(font.name.as_str());
    }
    if font.height != font_builtin.height {
        format = format.set_font_size(f64::from(font.height) / f64::from(N_TWIPS_PER_POINT));
    }
    if font.bold {
        format = format.set_bold();
    }
    if font.italic {
        format = format.set_italic();
    }
    if font.strikeout {
        format = format.set_font_strikethrough();
    }
    if font.underline != EnumFontUnderline::None {
        format = format.set_underline(derive_format_underline(font.underline));
    }
    match font.type_offset {
        EnumFontTypeOffset::None => {}
        EnumFontTypeOffset::Superscript => {
            format = format.set_font_script(FormatScript::Superscript);
        }
        EnumFontTypeOffset::Subscript => {
            format = format.set_font_script(FormatScript::Subscript);
        }
    }
    if font.charset != 0 {
        format = format.set_font_charset(font.charset);
    }
    if let Some(color) = derive_color(font.color) {
        format = format.set_font_color(color);
    }
    format
}

/// Solid fills show the foreground color, which `rust_xlsxwriter` takes as
/// the background color of a solid pattern.
fn derive_fill_format(mut format: Format, style: &SpecCellStyle) -> Format {
    match style.fill_pattern {
        EnumFillPattern::None => {}
        EnumFillPattern::Solid => {
            format = format.set_pattern(FormatPattern::Solid);
            if let Some(color) = derive_color(style.fill_foreground_color) {
                format = format.set_background_color(color);
            }
        }
        pattern => {
            format = format.set_pattern(derive_format_pattern(pattern));
            if let Some(color) = derive_color(style.fill_foreground_color) {
                format = format.set_foreground_color(color);
            }
            if let Some(color) = derive_color(style.fill_background_color) {
                format = format.set_background_color(color);
            }
        }
    }
    format
}

fn derive_color(color: EnumColor) -> Option<Color> {
    derive_rgb_from_color(color).map(Color::RGB)
}

fn derive_format_border(border: EnumBorderStyle) -> FormatBorder {
    match border {
        EnumBorderStyle::None => FormatBorder::None,
        EnumBorderStyle::Thin => FormatBorder::Thin,
        EnumBorderStyle::Medium => FormatBorder::Medium,
        EnumBorderStyle::Dashed => FormatBorder::Dashed,
        EnumBorderStyle::Dotted => FormatBorder::Dotted,
        EnumBorderStyle::Thick => FormatBorder::Thick,
        EnumBorderStyle::Double => FormatBorder::Double,
        EnumBorderStyle::Hair => FormatBorder::Hair,
        EnumBorderStyle::MediumDashed => FormatBorder::MediumDashed,
        EnumBorderStyle::DashDot => FormatBorder::DashDot,
        EnumBorderStyle::MediumDashDot => FormatBorder::MediumDashDot,
        EnumBorderStyle::DashDotDot => FormatBorder::DashDotDot,
        EnumBorderStyle::MediumDashDotDot => FormatBorder::MediumDashDotDot,
        EnumBorderStyle::SlantedDashDot => FormatBorder::SlantDashDot,
    }
}

fn derive_format_align(align: EnumHorizontalAlignment) -> Option<FormatAlign> {
    match align {
        EnumHorizontalAlignment::General => None,
        EnumHorizontalAlignment::Left => Some(FormatAlign::Left),
        EnumHorizontalAlignment::Center => Some(FormatAlign::Center),
        EnumHorizontalAlignment::Right => Some(FormatAlign::Right),
        EnumHorizontalAlignment::Fill => Some(FormatAlign::Fill),
        EnumHorizontalAlignment::Justify => Some(FormatAlign::Justify),
        EnumHorizontalAlignment::CenterSelection => Some(FormatAlign::CenterAcross),
        EnumHorizontalAlignment::Distributed => Some(FormatAlign::Distributed),
    }
}

fn derive_format_valign(align: EnumVerticalAlignment) -> Option<FormatAlign> {
    match align {
        EnumVerticalAlignment::Bottom => None,
        EnumVerticalAlignment::Top => Some(FormatAlign::Top),
        EnumVerticalAlignment::Center => Some(FormatAlign::VerticalCenter),
        EnumVerticalAlignment::Justify => Some(FormatAlign::VerticalJustify),
        EnumVerticalAlignment::Distributed => Some(FormatAlign::VerticalDistributed),
    }
}

fn derive_format_underline(underline: EnumFontUnderline) -> FormatUnderline {
    match underline {
        EnumFontUnderline::None => FormatUnderline::None,
        EnumFontUnderline::Single => FormatUnderline::Single,
        EnumFontUnderline::Double => FormatUnderline::Double,
        EnumFontUnderline::SingleAccounting => FormatUnderline::SingleAccounting,
        EnumFontUnderline::DoubleAccounting => FormatUnderline::DoubleAccounting,
    }
}

fn derive_format_pattern(pattern: EnumFillPattern) -> FormatPattern {
    match pattern {
        EnumFillPattern::None => FormatPattern::None,
        EnumFillPattern::Solid => FormatPattern::Solid,
        EnumFillPattern::MediumGray => FormatPattern::MediumGray,
        EnumFillPattern::DarkGray => FormatPattern::DarkGray,
        EnumFillPattern::LightGray => FormatPattern::LightGray,
        EnumFillPattern::DarkHorizontal => FormatPattern::DarkHorizontal,
        EnumFillPattern::DarkVertical => FormatPattern::DarkVertical,
        EnumFillPattern::DarkDown => FormatPattern::DarkDown,
        EnumFillPattern::DarkUp => FormatPattern::DarkUp,
        EnumFillPattern::DarkGrid => FormatPattern::DarkGrid,
        EnumFillPattern::DarkTrellis => FormatPattern::DarkTrellis,
        EnumFillPattern::LightHorizontal => FormatPattern::LightHorizontal,
        EnumFillPattern::LightVertical => FormatPattern::LightVertical,
        EnumFillPattern::LightDown => FormatPattern::LightDown,
        EnumFillPattern::LightUp => FormatPattern::LightUp,
        EnumFillPattern::LightGrid => FormatPattern::LightGrid,
        EnumFillPattern::LightTrellis => FormatPattern::LightTrellis,
        EnumFillPattern::Gray125 => FormatPattern::Gray125,
        EnumFillPattern::Gray0625 => FormatPattern::Gray0625,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

fn cast_row_num(value: usize) -> Result<u32, XlsxDslError> {
    u32::try_from(value)
        .map_err(|_| XlsxDslError::InvalidRange(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, XlsxDslError> {
    u16::try_from(value)
        .map_err(|_| XlsxDslError::InvalidRange(format!("column index overflow: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::workbook;

    #[test]
    fn test_default_style_maps_to_plain_format() {
        let format =
            derive_rust_xlsx_format(&SpecCellStyle::default(), &derive_default_font()).unwrap();
        assert_eq!(format, Format::new());
    }

    #[test]
    fn test_style_without_font_uses_document_default_font() {
        let mut font_default = derive_default_font();
        font_default.name = "Meiryo UI".to_string();
        font_default.set_height_in_points(10);

        let format = derive_rust_xlsx_format(&SpecCellStyle::default(), &font_default).unwrap();
        assert_eq!(
            format,
            Format::new().set_font_name("Meiryo UI").set_font_size(10.0)
        );

        let style = SpecCellStyle {
            font: Some(SpecFont {
                bold: true,
                ..derive_default_font()
            }),
            ..Default::default()
        };
        let format = derive_rust_xlsx_format(&style, &font_default).unwrap();
        assert_eq!(format, Format::new().set_bold());
    }

    #[test]
    fn test_style_attributes_map_to_format() {
        let style = SpecCellStyle {
            data_format: EnumDataFormat::Custom("0.00%".to_string()),
            alignment: EnumHorizontalAlignment::Center,
            vertical_alignment: EnumVerticalAlignment::Center,
            wrap_text: true,
            border_bottom: EnumBorderStyle::Thick,
            fill_pattern: EnumFillPattern::Solid,
            fill_foreground_color: EnumColor::Indexed(22),
            shrink_to_fit: true,
            ..Default::default()
        };

        let format = derive_rust_xlsx_format(&style, &derive_default_font()).unwrap();
        let format_expected = Format::new()
            .set_num_format("0.00%")
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_shrink()
            .set_border_bottom(FormatBorder::Thick)
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(0xC0C0C0));
        assert_eq!(format, format_expected);
    }

    #[test]
    fn test_stacked_rotation_uses_writer_code() {
        let style = SpecCellStyle {
            rotation: N_ROTATION_STACKED,
            ..Default::default()
        };
        let format = derive_rust_xlsx_format(&style, &derive_default_font()).unwrap();
        assert_eq!(format, Format::new().set_rotation(270));
    }

    #[test]
    fn test_builtin_data_format_over_u8_is_rejected() {
        let style = SpecCellStyle {
            data_format: EnumDataFormat::Builtin(300),
            ..Default::default()
        };
        assert!(matches!(
            derive_rust_xlsx_format(&style, &derive_default_font()),
            Err(XlsxDslError::InvalidAttribute(_))
        ));
    }

    #[test]
    fn test_save_to_buffer_renders_zip_container() {
        let doc = workbook(|wb| {
            wb.new_sheet("Summary", |sheet| {
                sheet.set_default_column_width(12);
                sheet.create_freeze_pane(1, 1)?;
                sheet.new_row(|row| {
                    row.new_cell(|cell| {
                        cell.value(42);
                        cell.merge(2, 2)
                    })?;
                    row.new_cell(|cell| {
                        cell.value(true);
                        Ok(())
                    })
                })
            })
        })
        .unwrap();

        let v_bytes = doc.save_to_buffer().unwrap();
        assert!(v_bytes.starts_with(b"PK"));
    }
}
