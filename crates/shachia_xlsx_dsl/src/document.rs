//! In-memory workbook object model that the builders drive.
//!
//! `rust_xlsxwriter` is write-only, so sheet/row/cell state, merged regions
//! and border-region stamping live here until [`crate::writer`] renders them.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::conf::{
    N_COLUMN_WIDTH_DEFAULT, N_COLUMN_WIDTH_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    N_ROW_HEIGHT_DEFAULT, N_ZOOM_DEFAULT, N_ZOOM_MAX, N_ZOOM_MIN, derive_default_font,
};
use crate::spec::{
    EnumBorderEdge, EnumCellValue, SpecBorderStamp, SpecCellRange, SpecCellStyle, SpecFont,
    SpecFreezePane, XlsxDslError,
};
use crate::util::{derive_cell_reference, validate_cell_range, validate_sheet_name};

////////////////////////////////////////////////////////////////////////////////
// #region Cell

/// One cell: scalar value plus optional style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XlsxCell {
    value: EnumCellValue,
    style: Option<SpecCellStyle>,
}

impl XlsxCell {
    pub fn value(&self) -> &EnumCellValue {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<EnumCellValue>) {
        self.value = value.into();
    }

    pub fn style(&self) -> Option<&SpecCellStyle> {
        self.style.as_ref()
    }

    pub fn set_style(&mut self, style: Option<SpecCellStyle>) {
        self.style = style;
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Row

/// One row: cells keyed by column index, optional height and row style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XlsxRow {
    cells: BTreeMap<usize, XlsxCell>,
    height_in_points: Option<f32>,
    style: Option<SpecCellStyle>,
}

impl XlsxRow {
    /// Number of cells that exist in this row.
    pub fn physical_number_of_cells(&self) -> usize {
        self.cells.len()
    }

    /// Create (or replace) the cell at `col_idx`.
    pub fn create_cell(&mut self, col_idx: usize) -> Result<&mut XlsxCell, XlsxDslError> {
        if col_idx >= N_NCOLS_EXCEL_MAX {
            return Err(XlsxDslError::InvalidRange(format!(
                "Column index {col_idx} exceeds Excel limit {N_NCOLS_EXCEL_MAX}."
            )));
        }
        let cell = self.cells.entry(col_idx).or_default();
        *cell = XlsxCell::default();
        Ok(cell)
    }

    pub fn cell(&self, col_idx: usize) -> Option<&XlsxCell> {
        self.cells.get(&col_idx)
    }

    pub fn cell_mut(&mut self, col_idx: usize) -> Option<&mut XlsxCell> {
        self.cells.get_mut(&col_idx)
    }

    /// Iterate `(col_idx, cell)` in column order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, &XlsxCell)> {
        self.cells.iter().map(|(n_idx, cell)| (*n_idx, cell))
    }

    /// Explicit height; `None` renders with the sheet default.
    pub fn height_in_points(&self) -> Option<f32> {
        self.height_in_points
    }

    pub fn set_height_in_points(&mut self, height: Option<f32>) {
        self.height_in_points = height;
    }

    pub fn style(&self) -> Option<&SpecCellStyle> {
        self.style.as_ref()
    }

    pub fn set_style(&mut self, style: Option<SpecCellStyle>) {
        self.style = style;
    }

    /// Style a cell renders with: its own, else the row style, else default.
    pub fn derive_effective_style(&self, col_idx: usize) -> SpecCellStyle {
        self.cells
            .get(&col_idx)
            .and_then(|cell| cell.style.clone())
            .or_else(|| self.style.clone())
            .unwrap_or_default()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Sheet

/// One worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct XlsxSheet {
    name: String,
    rows: BTreeMap<usize, XlsxRow>,
    zoom: u16,
    default_row_height_in_points: f32,
    default_column_width: u32,
    column_widths: BTreeMap<usize, f64>,
    repeating_columns: Option<(usize, usize)>,
    freeze_pane: Option<SpecFreezePane>,
    merged_regions: Vec<SpecCellRange>,
}

impl XlsxSheet {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: BTreeMap::new(),
            zoom: N_ZOOM_DEFAULT,
            default_row_height_in_points: N_ROW_HEIGHT_DEFAULT,
            default_column_width: N_COLUMN_WIDTH_DEFAULT,
            column_widths: BTreeMap::new(),
            repeating_columns: None,
            freeze_pane: None,
            merged_regions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows that exist in this sheet.
    pub fn physical_number_of_rows(&self) -> usize {
        self.rows.len()
    }

    /// Create (or replace) the row at `row_idx`.
    pub fn create_row(&mut self, row_idx: usize) -> Result<&mut XlsxRow, XlsxDslError> {
        if row_idx >= N_NROWS_EXCEL_MAX {
            return Err(XlsxDslError::InvalidRange(format!(
                "Row index {row_idx} exceeds Excel limit {N_NROWS_EXCEL_MAX}."
            )));
        }
        let row = self.rows.entry(row_idx).or_default();
        *row = XlsxRow::default();
        Ok(row)
    }

    pub fn row(&self, row_idx: usize) -> Option<&XlsxRow> {
        self.rows.get(&row_idx)
    }

    pub fn row_mut(&mut self, row_idx: usize) -> Option<&mut XlsxRow> {
        self.rows.get_mut(&row_idx)
    }

    /// Iterate `(row_idx, row)` in row order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &XlsxRow)> {
        self.rows.iter().map(|(n_idx, row)| (*n_idx, row))
    }

    /// Row at `row_idx`, created blank when missing.
    pub(crate) fn derive_row_mut(&mut self, row_idx: usize) -> &mut XlsxRow {
        self.rows.entry(row_idx).or_default()
    }

    /// Cell at `(row_idx, col_idx)`, created blank (with its row) when missing.
    pub(crate) fn derive_cell_mut(&mut self, row_idx: usize, col_idx: usize) -> &mut XlsxCell {
        self.derive_row_mut(row_idx)
            .cells
            .entry(col_idx)
            .or_default()
    }

    /// Cell at `(row_idx, col_idx)` if both exist.
    pub fn cell(&self, row_idx: usize, col_idx: usize) -> Option<&XlsxCell> {
        self.rows.get(&row_idx).and_then(|row| row.cell(col_idx))
    }

    pub fn zoom(&self) -> u16 {
        self.zoom
    }

    /// Set zoom percentage (`10..=400`).
    pub fn set_zoom(&mut self, zoom: u16) -> Result<(), XlsxDslError> {
        if !(N_ZOOM_MIN..=N_ZOOM_MAX).contains(&zoom) {
            return Err(XlsxDslError::InvalidAttribute(format!(
                "Zoom {zoom} is outside {N_ZOOM_MIN}..={N_ZOOM_MAX}."
            )));
        }
        self.zoom = zoom;
        Ok(())
    }

    pub fn default_row_height_in_points(&self) -> f32 {
        self.default_row_height_in_points
    }

    pub fn set_default_row_height_in_points(&mut self, height: f32) {
        self.default_row_height_in_points = height;
    }

    /// Default column width in characters.
    pub fn default_column_width(&self) -> u32 {
        self.default_column_width
    }

    pub fn set_default_column_width(&mut self, width: u32) {
        self.default_column_width = width;
    }

    /// Explicit width of `col_idx` in characters, if any.
    pub fn column_width(&self, col_idx: usize) -> Option<f64> {
        self.column_widths.get(&col_idx).copied()
    }

    /// Iterate explicit `(col_idx, width)` pairs in column order.
    pub fn column_widths(&self) -> impl Iterator<Item = (usize, f64)> {
        self.column_widths.iter().map(|(n_idx, n_width)| (*n_idx, *n_width))
    }

    /// Set width of `col_idx` in characters (`0..=255`).
    pub fn set_column_width(&mut self, col_idx: usize, width: f64) -> Result<(), XlsxDslError> {
        if col_idx >= N_NCOLS_EXCEL_MAX {
            return Err(XlsxDslError::InvalidRange(format!(
                "Column index {col_idx} exceeds Excel limit {N_NCOLS_EXCEL_MAX}."
            )));
        }
        if !(0.0..=N_COLUMN_WIDTH_MAX).contains(&width) {
            return Err(XlsxDslError::InvalidAttribute(format!(
                "Column width {width} is outside 0..={N_COLUMN_WIDTH_MAX}."
            )));
        }
        self.column_widths.insert(col_idx, width);
        Ok(())
    }

    /// Columns repeated on every printed page, as inclusive `(first, last)`.
    pub fn repeating_columns(&self) -> Option<(usize, usize)> {
        self.repeating_columns
    }

    pub fn set_repeating_columns(
        &mut self,
        columns: Option<(usize, usize)>,
    ) -> Result<(), XlsxDslError> {
        if let Some((n_col_first, n_col_last)) = columns {
            validate_cell_range(&SpecCellRange::new(0, 0, n_col_first, n_col_last))?;
        }
        self.repeating_columns = columns;
        Ok(())
    }

    pub fn freeze_pane(&self) -> Option<&SpecFreezePane> {
        self.freeze_pane.as_ref()
    }

    /// Freeze `col_split` columns and `row_split` rows.
    ///
    /// `(0, 0)` removes an existing pane.
    pub fn create_freeze_pane(
        &mut self,
        col_split: usize,
        row_split: usize,
        leftmost_column: usize,
        top_row: usize,
    ) -> Result<(), XlsxDslError> {
        if col_split == 0 && row_split == 0 {
            self.freeze_pane = None;
            return Ok(());
        }
        validate_cell_range(&SpecCellRange::new(
            0,
            row_split.max(top_row),
            0,
            col_split.max(leftmost_column),
        ))?;
        self.freeze_pane = Some(SpecFreezePane {
            col_split,
            row_split,
            leftmost_column,
            top_row,
        });
        Ok(())
    }

    pub fn merged_regions(&self) -> &[SpecCellRange] {
        &self.merged_regions
    }

    /// Register a merged region; returns its index.
    pub fn add_merged_region(&mut self, range: SpecCellRange) -> Result<usize, XlsxDslError> {
        validate_cell_range(&range)?;
        if range.cell_count() < 2 {
            return Err(XlsxDslError::InvalidRange(format!(
                "Merged region {range} must contain 2 or more cells."
            )));
        }
        if let Some(existing) = self.merged_regions.iter().find(|r| r.intersects(&range)) {
            return Err(XlsxDslError::OverlappingRegion {
                range,
                existing: *existing,
            });
        }
        debug!("sheet {:?}: merged region {range}", self.name);
        self.merged_regions.push(range);
        Ok(self.merged_regions.len() - 1)
    }

    /// Stamp one edge of `stamp.range` with a border style.
    ///
    /// Missing rows and cells on the edge are created blank. Each touched cell
    /// gets a copy of its effective style with only that edge replaced.
    pub fn apply_border_stamp(&mut self, stamp: &SpecBorderStamp) -> Result<(), XlsxDslError> {
        let range = stamp.range;
        validate_cell_range(&range)?;

        let l_cells: Vec<(usize, usize)> = match stamp.edge {
            EnumBorderEdge::Top => (range.first_col..=range.last_col)
                .map(|n_col| (range.first_row, n_col))
                .collect(),
            EnumBorderEdge::Bottom => (range.first_col..=range.last_col)
                .map(|n_col| (range.last_row, n_col))
                .collect(),
            EnumBorderEdge::Left => (range.first_row..=range.last_row)
                .map(|n_row| (n_row, range.first_col))
                .collect(),
            EnumBorderEdge::Right => (range.first_row..=range.last_row)
                .map(|n_row| (n_row, range.last_col))
                .collect(),
        };

        for (n_row, n_col) in l_cells {
            let style_base = self.derive_row_mut(n_row).derive_effective_style(n_col);
            self.derive_cell_mut(n_row, n_col).style =
                Some(style_base.with_border(stamp.edge, stamp.style));
            trace!(
                "sheet {:?}: {:?} border {:?} at {}",
                self.name,
                stamp.edge,
                stamp.style,
                derive_cell_reference(n_row, n_col)
            );
        }
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Document

/// Whole workbook: ordered sheets plus the default font.
#[derive(Debug, Clone, PartialEq)]
pub struct XlsxDocument {
    sheets: Vec<XlsxSheet>,
    default_font: SpecFont,
}

impl Default for XlsxDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl XlsxDocument {
    pub fn new() -> Self {
        Self {
            sheets: Vec::new(),
            default_font: derive_default_font(),
        }
    }

    /// Font used by every style without its own font (index 0).
    pub fn default_font(&self) -> &SpecFont {
        &self.default_font
    }

    pub fn default_font_mut(&mut self) -> &mut SpecFont {
        &mut self.default_font
    }

    pub fn sheets(&self) -> &[XlsxSheet] {
        &self.sheets
    }

    /// Look up a sheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&XlsxSheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut XlsxSheet> {
        self.sheets.iter_mut().find(|sheet| sheet.name == name)
    }

    /// Append a new sheet.
    ///
    /// Names are unique case-insensitively, as in Excel.
    pub fn create_sheet(&mut self, name: &str) -> Result<&mut XlsxSheet, XlsxDslError> {
        validate_sheet_name(name)?;
        let c_name_lower = name.to_lowercase();
        if self
            .sheets
            .iter()
            .any(|sheet| sheet.name.to_lowercase() == c_name_lower)
        {
            return Err(XlsxDslError::DuplicateName {
                name: name.to_string(),
            });
        }

        debug!("creating sheet {name:?} at index {}", self.sheets.len());
        self.sheets.push(XlsxSheet::new(name));
        let n_idx_last = self.sheets.len() - 1;
        Ok(&mut self.sheets[n_idx_last])
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::EnumBorderStyle;

    #[test]
    fn test_create_sheet_rejects_duplicates_case_insensitively() {
        let mut doc = XlsxDocument::new();
        doc.create_sheet("Data").unwrap();

        let err = doc.create_sheet("DATA").unwrap_err();
        assert!(matches!(err, XlsxDslError::DuplicateName { ref name } if name == "DATA"));
        assert_eq!(doc.sheets().len(), 1);
        assert_eq!(doc.sheets()[0].name(), "Data");
    }

    #[test]
    fn test_add_merged_region_rejects_single_cell_and_overlap() {
        let mut doc = XlsxDocument::new();
        let sheet = doc.create_sheet("S").unwrap();

        assert!(matches!(
            sheet.add_merged_region(SpecCellRange::new(0, 0, 0, 0)),
            Err(XlsxDslError::InvalidRange(_))
        ));
        assert_eq!(sheet.add_merged_region(SpecCellRange::new(0, 1, 0, 1)).unwrap(), 0);

        let err = sheet
            .add_merged_region(SpecCellRange::new(1, 2, 1, 2))
            .unwrap_err();
        assert!(matches!(
            err,
            XlsxDslError::OverlappingRegion { existing, .. } if existing == SpecCellRange::new(0, 1, 0, 1)
        ));
        assert_eq!(sheet.merged_regions().len(), 1);
    }

    #[test]
    fn test_apply_border_stamp_creates_missing_cells_on_edge_only() {
        let mut doc = XlsxDocument::new();
        let sheet = doc.create_sheet("S").unwrap();
        sheet.create_row(0).unwrap().create_cell(0).unwrap();

        sheet
            .apply_border_stamp(&SpecBorderStamp {
                edge: EnumBorderEdge::Left,
                style: EnumBorderStyle::Thin,
                range: SpecCellRange::new(0, 2, 1, 3),
            })
            .unwrap();

        assert_eq!(sheet.physical_number_of_rows(), 3);
        for n_row in 0..=2 {
            let cell = sheet.cell(n_row, 1).unwrap();
            assert_eq!(cell.style().unwrap().border_left, EnumBorderStyle::Thin);
            assert!(sheet.cell(n_row, 2).is_none());
        }
    }

    #[test]
    fn test_apply_border_stamp_keeps_other_style_attributes() {
        let mut doc = XlsxDocument::new();
        let sheet = doc.create_sheet("S").unwrap();
        let row = sheet.create_row(0).unwrap();
        row.set_style(Some(SpecCellStyle {
            wrap_text: true,
            ..Default::default()
        }));
        row.create_cell(0).unwrap();

        sheet
            .apply_border_stamp(&SpecBorderStamp {
                edge: EnumBorderEdge::Top,
                style: EnumBorderStyle::Double,
                range: SpecCellRange::new(0, 0, 0, 0),
            })
            .unwrap();

        let style = sheet.cell(0, 0).unwrap().style().unwrap();
        assert!(style.wrap_text);
        assert_eq!(style.border_top, EnumBorderStyle::Double);
    }

    #[test]
    fn test_set_zoom_and_column_width_validate_domain() {
        let mut doc = XlsxDocument::new();
        let sheet = doc.create_sheet("S").unwrap();

        assert!(sheet.set_zoom(5).is_err());
        assert!(sheet.set_zoom(150).is_ok());
        assert_eq!(sheet.zoom(), 150);
        assert!(sheet.set_column_width(0, 300.0).is_err());
        assert!(sheet.set_column_width(2, 20.5).is_ok());
        assert_eq!(sheet.column_width(2), Some(20.5));
    }

    #[test]
    fn test_create_freeze_pane_with_zero_split_clears_pane() {
        let mut doc = XlsxDocument::new();
        let sheet = doc.create_sheet("S").unwrap();

        sheet.create_freeze_pane(1, 2, 1, 2).unwrap();
        assert_eq!(
            sheet.freeze_pane().copied(),
            Some(SpecFreezePane {
                col_split: 1,
                row_split: 2,
                leftmost_column: 1,
                top_row: 2,
            })
        );
        assert!(sheet.create_freeze_pane(1, N_NROWS_EXCEL_MAX, 1, 0).is_err());

        sheet.create_freeze_pane(0, 0, 0, 0).unwrap();
        assert!(sheet.freeze_pane().is_none());
    }
}
