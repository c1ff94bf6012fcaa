//! Nested closure builders: workbook -> sheet -> row -> cell.
//!
//! Each level creates its child in the document, runs the caller's closure
//! against a child builder and then finalizes it. Finalizing flushes the
//! deferred border stamps recorded during configuration, in enqueue order.

use log::debug;

use crate::conf::N_ZOOM_DEFAULT;
use crate::document::{XlsxDocument, XlsxSheet};
use crate::spec::{
    EnumBorderEdge, EnumBorderStyle, EnumCellValue, SpecBorderStamp, SpecCellRange,
    SpecCellStyle, SpecFont, XlsxDslError,
};
use crate::style::{FontBuilder, StyleBuilder, font, style};

/// Build a document by running `configure` against a fresh [`WorkbookBuilder`].
///
/// ```
/// use shachia_xlsx_dsl::workbook;
///
/// let doc = workbook(|wb| {
///     wb.new_sheet("Report", |sheet| {
///         sheet.new_row(|row| {
///             row.new_cell(|cell| {
///                 cell.text("Total");
///                 cell.merge(1, 2)
///             })
///         })
///     })
/// })?;
/// assert_eq!(doc.sheets()[0].merged_regions().len(), 1);
/// # Ok::<(), shachia_xlsx_dsl::XlsxDslError>(())
/// ```
pub fn workbook<F>(configure: F) -> Result<XlsxDocument, XlsxDslError>
where
    F: FnOnce(&mut WorkbookBuilder) -> Result<(), XlsxDslError>,
{
    let mut builder = WorkbookBuilder::new();
    configure(&mut builder)?;
    Ok(builder.build())
}

////////////////////////////////////////////////////////////////////////////////
// #region Styleable

/// Anything that accepts a style built on top of its current one.
pub trait Styleable {
    /// Configure a [`StyleBuilder`] and apply it over the current style.
    fn style<F>(&mut self, configure: F) -> Result<(), XlsxDslError>
    where
        F: FnOnce(&mut StyleBuilder),
    {
        let mut builder = StyleBuilder::new();
        configure(&mut builder);
        self.apply_style(&builder)
    }

    /// Build `builder` with the current style as base and assign the result.
    fn apply_style(&mut self, builder: &StyleBuilder) -> Result<(), XlsxDslError>;
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WorkbookBuilder

/// Top-level builder owning the document under construction.
#[derive(Debug, Default)]
pub struct WorkbookBuilder {
    document: XlsxDocument,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_font_height_in_points(&self) -> u16 {
        self.document.default_font().height_in_points()
    }

    pub fn set_default_font_height_in_points(&mut self, points: u16) {
        self.document.default_font_mut().set_height_in_points(points);
    }

    pub fn default_font_name(&self) -> &str {
        &self.document.default_font().name
    }

    pub fn set_default_font_name(&mut self, name: impl Into<String>) {
        self.document.default_font_mut().name = name.into();
    }

    /// Create sheet `name`, configure it, finalize it.
    ///
    /// Fails with [`XlsxDslError::DuplicateName`] when the name is taken; the
    /// existing sheet is left untouched.
    pub fn new_sheet<F>(&mut self, name: &str, configure: F) -> Result<(), XlsxDslError>
    where
        F: FnOnce(&mut SheetBuilder<'_>) -> Result<(), XlsxDslError>,
    {
        let sheet = self.document.create_sheet(name)?;
        let mut builder = SheetBuilder::new(sheet);
        configure(&mut builder)?;
        builder.build()
    }

    /// Build a shareable style; see [`crate::style::style`].
    pub fn new_style<F>(
        &self,
        base: Option<&SpecCellStyle>,
        mixins: &[&dyn Fn(&mut StyleBuilder)],
        configure: F,
    ) -> Result<SpecCellStyle, XlsxDslError>
    where
        F: FnOnce(&mut StyleBuilder),
    {
        style(base, mixins, configure)
    }

    /// Build a shareable font.
    pub fn new_font<F>(&self, configure: F) -> SpecFont
    where
        F: FnOnce(&mut FontBuilder),
    {
        font(configure)
    }

    /// Hand back the assembled document.
    pub fn build(self) -> XlsxDocument {
        self.document
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetBuilder

/// Builder for one sheet.
#[derive(Debug)]
pub struct SheetBuilder<'a> {
    sheet: &'a mut XlsxSheet,
    /// Blank rows kept above the first configured row.
    pub offset_row: usize,
    /// Blank cells prepended to every configured row.
    pub offset_column: usize,
    /// Zoom percentage applied on finalize.
    pub zoom: u16,
    border_stamps_pending: Vec<SpecBorderStamp>,
}

impl<'a> SheetBuilder<'a> {
    fn new(sheet: &'a mut XlsxSheet) -> Self {
        Self {
            sheet,
            offset_row: 0,
            offset_column: 0,
            zoom: N_ZOOM_DEFAULT,
            border_stamps_pending: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.sheet.name()
    }

    pub fn default_row_height_in_points(&self) -> f32 {
        self.sheet.default_row_height_in_points()
    }

    pub fn set_default_row_height_in_points(&mut self, height: f32) {
        self.sheet.set_default_row_height_in_points(height);
    }

    pub fn default_column_width(&self) -> u32 {
        self.sheet.default_column_width()
    }

    pub fn set_default_column_width(&mut self, width: u32) {
        self.sheet.set_default_column_width(width);
    }

    pub fn repeating_columns(&self) -> Option<(usize, usize)> {
        self.sheet.repeating_columns()
    }

    pub fn set_repeating_columns(
        &mut self,
        columns: Option<(usize, usize)>,
    ) -> Result<(), XlsxDslError> {
        self.sheet.set_repeating_columns(columns)
    }

    /// Set width of `col_idx` in characters.
    pub fn set_column_width(&mut self, col_idx: usize, width: f64) -> Result<(), XlsxDslError> {
        self.sheet.set_column_width(col_idx, width)
    }

    /// Freeze `col_split` columns and `row_split` rows.
    pub fn create_freeze_pane(
        &mut self,
        col_split: usize,
        row_split: usize,
    ) -> Result<(), XlsxDslError> {
        self.sheet
            .create_freeze_pane(col_split, row_split, col_split, row_split)
    }

    /// Freeze panes and scroll the lower-right pane to `(top_row, leftmost_column)`.
    pub fn create_freeze_pane_at(
        &mut self,
        col_split: usize,
        row_split: usize,
        leftmost_column: usize,
        top_row: usize,
    ) -> Result<(), XlsxDslError> {
        self.sheet
            .create_freeze_pane(col_split, row_split, leftmost_column, top_row)
    }

    /// Append the next row.
    ///
    /// Pads with blank rows up to `offset_row` first; the padding loop is
    /// bounded by the physical row count, so later calls never pad again.
    pub fn new_row<F>(&mut self, configure: F) -> Result<(), XlsxDslError>
    where
        F: FnOnce(&mut RowBuilder<'_>) -> Result<(), XlsxDslError>,
    {
        let n_height_default = self.sheet.default_row_height_in_points();

        while self.sheet.physical_number_of_rows() < self.offset_row {
            let n_idx_row_pad = self.sheet.physical_number_of_rows();
            let row = self.sheet.create_row(n_idx_row_pad)?;
            if n_height_default != 0.0 {
                row.set_height_in_points(Some(n_height_default));
            }
        }

        let n_idx_row = self.sheet.physical_number_of_rows();
        let row = self.sheet.create_row(n_idx_row)?;
        if n_height_default != 0.0 {
            row.set_height_in_points(Some(n_height_default));
        }

        let mut builder = RowBuilder::new(&mut *self.sheet, n_idx_row);
        for _ in 0..self.offset_column {
            builder.new_cell(|_| Ok(()))?;
        }
        configure(&mut builder)?;
        builder.build()
    }

    fn push_border_stamp(
        &mut self,
        edge: EnumBorderEdge,
        style: EnumBorderStyle,
        range: SpecCellRange,
    ) {
        self.border_stamps_pending.push(SpecBorderStamp { edge, style, range });
    }

    /// Defer a top-edge stamp over the inclusive range.
    pub fn set_border_top(
        &mut self,
        style: EnumBorderStyle,
        first_row: usize,
        last_row: usize,
        first_col: usize,
        last_col: usize,
    ) {
        let range = SpecCellRange::new(first_row, last_row, first_col, last_col);
        self.push_border_stamp(EnumBorderEdge::Top, style, range);
    }

    /// Defer a bottom-edge stamp over the inclusive range.
    pub fn set_border_bottom(
        &mut self,
        style: EnumBorderStyle,
        first_row: usize,
        last_row: usize,
        first_col: usize,
        last_col: usize,
    ) {
        let range = SpecCellRange::new(first_row, last_row, first_col, last_col);
        self.push_border_stamp(EnumBorderEdge::Bottom, style, range);
    }

    /// Defer a left-edge stamp over the inclusive range.
    pub fn set_border_left(
        &mut self,
        style: EnumBorderStyle,
        first_row: usize,
        last_row: usize,
        first_col: usize,
        last_col: usize,
    ) {
        let range = SpecCellRange::new(first_row, last_row, first_col, last_col);
        self.push_border_stamp(EnumBorderEdge::Left, style, range);
    }

    /// Defer a right-edge stamp over the inclusive range.
    pub fn set_border_right(
        &mut self,
        style: EnumBorderStyle,
        first_row: usize,
        last_row: usize,
        first_col: usize,
        last_col: usize,
    ) {
        let range = SpecCellRange::new(first_row, last_row, first_col, last_col);
        self.push_border_stamp(EnumBorderEdge::Right, style, range);
    }

    /// Apply zoom, then flush border stamps in enqueue order.
    pub fn build(self) -> Result<(), XlsxDslError> {
        self.sheet.set_zoom(self.zoom)?;
        debug!(
            "sheet {:?}: flushing {} deferred border stamps",
            self.sheet.name(),
            self.border_stamps_pending.len()
        );
        for stamp in &self.border_stamps_pending {
            self.sheet.apply_border_stamp(stamp)?;
        }
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RowBuilder

/// Builder for one row.
#[derive(Debug)]
pub struct RowBuilder<'a> {
    sheet: &'a mut XlsxSheet,
    n_idx_row: usize,
    border_stamps_pending: Vec<SpecBorderStamp>,
}

impl<'a> RowBuilder<'a> {
    fn new(sheet: &'a mut XlsxSheet, n_idx_row: usize) -> Self {
        Self {
            sheet,
            n_idx_row,
            border_stamps_pending: Vec::new(),
        }
    }

    /// Zero-based row index.
    pub fn row_number(&self) -> usize {
        self.n_idx_row
    }

    /// Append the next cell at the row's physical cell count.
    pub fn new_cell<F>(&mut self, configure: F) -> Result<(), XlsxDslError>
    where
        F: FnOnce(&mut CellBuilder<'_>) -> Result<(), XlsxDslError>,
    {
        let row = self.sheet.derive_row_mut(self.n_idx_row);
        let n_idx_col = row.physical_number_of_cells();
        row.create_cell(n_idx_col)?;

        let mut builder = CellBuilder {
            sheet: &mut *self.sheet,
            n_idx_row: self.n_idx_row,
            n_idx_col,
        };
        configure(&mut builder)
    }

    /// Row height, falling back to the sheet default when none was set.
    pub fn height_in_points(&self) -> f32 {
        self.sheet
            .row(self.n_idx_row)
            .and_then(|row| row.height_in_points())
            .unwrap_or_else(|| self.sheet.default_row_height_in_points())
    }

    /// Set row height; `None` resets it to the sheet default.
    pub fn set_height_in_points(&mut self, height: Option<f32>) {
        let n_height = height.unwrap_or_else(|| self.sheet.default_row_height_in_points());
        self.sheet
            .derive_row_mut(self.n_idx_row)
            .set_height_in_points(Some(n_height));
    }

    pub fn row_style(&self) -> Option<&SpecCellStyle> {
        self.sheet.row(self.n_idx_row).and_then(|row| row.style())
    }

    pub fn set_row_style(&mut self, style: Option<SpecCellStyle>) {
        self.sheet.derive_row_mut(self.n_idx_row).set_style(style);
    }

    /// Defer a top-edge stamp on this row over `first_col..=last_col`.
    pub fn set_border_top(&mut self, style: EnumBorderStyle, first_col: usize, last_col: usize) {
        self.border_stamps_pending.push(SpecBorderStamp {
            edge: EnumBorderEdge::Top,
            style,
            range: SpecCellRange::new(self.n_idx_row, self.n_idx_row, first_col, last_col),
        });
    }

    /// Defer a bottom-edge stamp on this row over `first_col..=last_col`.
    pub fn set_border_bottom(&mut self, style: EnumBorderStyle, first_col: usize, last_col: usize) {
        self.border_stamps_pending.push(SpecBorderStamp {
            edge: EnumBorderEdge::Bottom,
            style,
            range: SpecCellRange::new(self.n_idx_row, self.n_idx_row, first_col, last_col),
        });
    }

    /// Flush row-scoped border stamps in enqueue order.
    pub fn build(self) -> Result<(), XlsxDslError> {
        for stamp in &self.border_stamps_pending {
            self.sheet.apply_border_stamp(stamp)?;
        }
        Ok(())
    }
}

impl Styleable for RowBuilder<'_> {
    fn apply_style(&mut self, builder: &StyleBuilder) -> Result<(), XlsxDslError> {
        let row = self.sheet.derive_row_mut(self.n_idx_row);
        let style = builder.build(row.style())?;
        row.set_style(Some(style));
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellBuilder

/// Builder for one cell.
#[derive(Debug)]
pub struct CellBuilder<'a> {
    sheet: &'a mut XlsxSheet,
    n_idx_row: usize,
    n_idx_col: usize,
}

impl CellBuilder<'_> {
    pub fn row_index(&self) -> usize {
        self.n_idx_row
    }

    pub fn column_index(&self) -> usize {
        self.n_idx_col
    }

    /// Assign a scalar value.
    pub fn value(&mut self, value: impl Into<EnumCellValue>) {
        self.sheet
            .derive_cell_mut(self.n_idx_row, self.n_idx_col)
            .set_value(value);
    }

    /// Shorthand for a text literal.
    pub fn text(&mut self, text: &str) {
        self.value(text);
    }

    pub fn cell_style(&self) -> Option<&SpecCellStyle> {
        self.sheet
            .cell(self.n_idx_row, self.n_idx_col)
            .and_then(|cell| cell.style())
    }

    pub fn set_cell_style(&mut self, style: Option<SpecCellStyle>) {
        self.sheet
            .derive_cell_mut(self.n_idx_row, self.n_idx_col)
            .set_style(style);
    }

    /// Merge `row_span` x `col_span` cells anchored here; `(1, 1)` does nothing.
    pub fn merge(&mut self, row_span: usize, col_span: usize) -> Result<(), XlsxDslError> {
        if row_span == 1 && col_span == 1 {
            return Ok(());
        }
        if row_span == 0 || col_span == 0 {
            return Err(XlsxDslError::InvalidRange(format!(
                "Merge spans must be >= 1, got {row_span}x{col_span}."
            )));
        }

        let n_idx_row_last = self.n_idx_row.checked_add(row_span - 1);
        let n_idx_col_last = self.n_idx_col.checked_add(col_span - 1);
        let (Some(n_idx_row_last), Some(n_idx_col_last)) = (n_idx_row_last, n_idx_col_last) else {
            return Err(XlsxDslError::InvalidRange(format!(
                "Merge of {row_span}x{col_span} at row {}, column {} overflows.",
                self.n_idx_row, self.n_idx_col
            )));
        };

        self.sheet.add_merged_region(SpecCellRange::new(
            self.n_idx_row,
            n_idx_row_last,
            self.n_idx_col,
            n_idx_col_last,
        ))?;
        Ok(())
    }
}

impl Styleable for CellBuilder<'_> {
    fn apply_style(&mut self, builder: &StyleBuilder) -> Result<(), XlsxDslError> {
        let cell = self.sheet.derive_cell_mut(self.n_idx_row, self.n_idx_col);
        let style = builder.build(cell.style())?;
        cell.set_style(Some(style));
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
