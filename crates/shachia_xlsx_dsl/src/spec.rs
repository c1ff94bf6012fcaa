//! Style/font value models, range models and the crate error type.

use std::fmt;

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

use crate::conf::{N_TWIPS_PER_POINT, derive_default_font};
use crate::util::derive_cell_reference;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Cell border line style.
///
/// Discriminants follow the legacy border codes (`0..=13`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumBorderStyle {
    /// No border.
    #[default]
    None,
    /// Thin line.
    Thin,
    /// Medium line.
    Medium,
    /// Dashed line.
    Dashed,
    /// Dotted line.
    Dotted,
    /// Thick line.
    Thick,
    /// Double line.
    Double,
    /// Hairline.
    Hair,
    /// Medium dashed line.
    MediumDashed,
    /// Dash-dot line.
    DashDot,
    /// Medium dash-dot line.
    MediumDashDot,
    /// Dash-dot-dot line.
    DashDotDot,
    /// Medium dash-dot-dot line.
    MediumDashDotDot,
    /// Slanted dash-dot line.
    SlantedDashDot,
}

/// One edge of a cell or range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumBorderEdge {
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
    /// Left edge.
    Left,
    /// Right edge.
    Right,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumHorizontalAlignment {
    /// Text left, numbers right.
    #[default]
    General,
    /// Left aligned.
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
    /// Repeat content to fill the cell.
    Fill,
    /// Justified.
    Justify,
    /// Centered across the selection.
    CenterSelection,
    /// Distributed.
    Distributed,
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumVerticalAlignment {
    /// Top aligned.
    Top,
    /// Centered.
    Center,
    /// Bottom aligned.
    #[default]
    Bottom,
    /// Justified.
    Justify,
    /// Distributed.
    Distributed,
}

/// Cell fill pattern (OOXML pattern names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumFillPattern {
    /// No fill.
    #[default]
    None,
    /// Solid foreground color.
    Solid,
    MediumGray,
    DarkGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
    Gray125,
    Gray0625,
}

/// Font underline style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumFontUnderline {
    /// No underline.
    #[default]
    None,
    /// Single underline.
    Single,
    /// Double underline.
    Double,
    /// Single accounting underline.
    SingleAccounting,
    /// Double accounting underline.
    DoubleAccounting,
}

/// Font baseline offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumFontTypeOffset {
    /// Normal baseline.
    #[default]
    None,
    /// Superscript.
    Superscript,
    /// Subscript.
    Subscript,
}

/// Color reference used by fonts, borders and fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumColor {
    /// Let Excel pick the color.
    #[default]
    Automatic,
    /// Legacy palette index (`0..=63`, `64`/`65` are system colors).
    Indexed(u8),
    /// Explicit `0xRRGGBB`.
    Rgb(u32),
}

/// Number format of a style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnumDataFormat {
    /// Built-in format index (`0` = General).
    Builtin(u16),
    /// Custom format code, e.g. `"0.00%"`.
    Custom(String),
}

impl Default for EnumDataFormat {
    fn default() -> Self {
        Self::Builtin(0)
    }
}

/// Scalar cell content.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnumCellValue {
    /// Cell exists but holds no value.
    #[default]
    Blank,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for EnumCellValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for EnumCellValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for EnumCellValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FontAndStyleSpecification

/// Resolved font.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecFont {
    /// Font family name.
    pub name: String,
    /// Font height in twips (1/20 pt).
    pub height: u16,
    /// Bold weight.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
    /// Strikeout.
    pub strikeout: bool,
    /// Superscript/subscript.
    pub type_offset: EnumFontTypeOffset,
    /// Underline style.
    pub underline: EnumFontUnderline,
    /// Character set code (`0` = ANSI).
    pub charset: u8,
    /// Font color.
    pub color: EnumColor,
}

impl Default for SpecFont {
    fn default() -> Self {
        derive_default_font()
    }
}

impl SpecFont {
    /// Font height in points.
    pub fn height_in_points(&self) -> u16 {
        self.height / N_TWIPS_PER_POINT
    }

    /// Set font height in points.
    pub fn set_height_in_points(&mut self, points: u16) {
        self.height = points.saturating_mul(N_TWIPS_PER_POINT);
    }
}

/// Resolved cell style.
///
/// `font: None` renders with the document default font, so changes to the
/// default font reach every style that never picked its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecCellStyle {
    /// Number format.
    pub data_format: EnumDataFormat,
    /// Font override.
    pub font: Option<SpecFont>,
    /// Hide formulas when the sheet is protected.
    pub hidden: bool,
    /// Lock the cell when the sheet is protected.
    pub locked: bool,
    /// Store text with a leading apostrophe.
    pub quote_prefixed: bool,
    /// Horizontal alignment.
    pub alignment: EnumHorizontalAlignment,
    /// Wrap text.
    pub wrap_text: bool,
    /// Vertical alignment.
    pub vertical_alignment: EnumVerticalAlignment,
    /// Text rotation in degrees (`-90..=90`, or `255` for stacked text).
    pub rotation: i16,
    /// Indentation level.
    pub indention: u8,

    /// Left border style.
    pub border_left: EnumBorderStyle,
    /// Right border style.
    pub border_right: EnumBorderStyle,
    /// Top border style.
    pub border_top: EnumBorderStyle,
    /// Bottom border style.
    pub border_bottom: EnumBorderStyle,
    /// Left border color.
    pub left_border_color: EnumColor,
    /// Right border color.
    pub right_border_color: EnumColor,
    /// Top border color.
    pub top_border_color: EnumColor,
    /// Bottom border color.
    pub bottom_border_color: EnumColor,

    /// Fill pattern.
    pub fill_pattern: EnumFillPattern,
    /// Pattern background color.
    pub fill_background_color: EnumColor,
    /// Pattern foreground color.
    pub fill_foreground_color: EnumColor,
    /// Shrink text to fit the cell.
    pub shrink_to_fit: bool,
}

impl Default for SpecCellStyle {
    fn default() -> Self {
        Self {
            data_format: EnumDataFormat::default(),
            font: None,
            hidden: false,
            locked: true,
            quote_prefixed: false,
            alignment: EnumHorizontalAlignment::General,
            wrap_text: false,
            vertical_alignment: EnumVerticalAlignment::Bottom,
            rotation: 0,
            indention: 0,
            border_left: EnumBorderStyle::None,
            border_right: EnumBorderStyle::None,
            border_top: EnumBorderStyle::None,
            border_bottom: EnumBorderStyle::None,
            left_border_color: EnumColor::Automatic,
            right_border_color: EnumColor::Automatic,
            top_border_color: EnumColor::Automatic,
            bottom_border_color: EnumColor::Automatic,
            fill_pattern: EnumFillPattern::None,
            fill_background_color: EnumColor::Automatic,
            fill_foreground_color: EnumColor::Automatic,
            shrink_to_fit: false,
        }
    }
}

impl SpecCellStyle {
    /// Return a copy with one border edge replaced.
    pub fn with_border(&self, edge: EnumBorderEdge, border: EnumBorderStyle) -> SpecCellStyle {
        let mut style = self.clone();
        match edge {
            EnumBorderEdge::Top => style.border_top = border,
            EnumBorderEdge::Bottom => style.border_bottom = border,
            EnumBorderEdge::Left => style.border_left = border,
            EnumBorderEdge::Right => style.border_right = border,
        }
        style
    }

    /// Border style on `edge`.
    pub fn border(&self, edge: EnumBorderEdge) -> EnumBorderStyle {
        match edge {
            EnumBorderEdge::Top => self.border_top,
            EnumBorderEdge::Bottom => self.border_bottom,
            EnumBorderEdge::Left => self.border_left,
            EnumBorderEdge::Right => self.border_right,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RangeSpecification

/// Inclusive rectangular cell range (zero-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpecCellRange {
    /// First row (inclusive).
    pub first_row: usize,
    /// Last row (inclusive).
    pub last_row: usize,
    /// First column (inclusive).
    pub first_col: usize,
    /// Last column (inclusive).
    pub last_col: usize,
}

impl SpecCellRange {
    /// Create a range from inclusive bounds.
    pub fn new(first_row: usize, last_row: usize, first_col: usize, last_col: usize) -> Self {
        Self {
            first_row,
            last_row,
            first_col,
            last_col,
        }
    }

    /// Number of cells covered.
    pub fn cell_count(&self) -> usize {
        (self.last_row.saturating_sub(self.first_row) + 1)
            * (self.last_col.saturating_sub(self.first_col) + 1)
    }

    /// Whether both ranges share at least one cell.
    pub fn intersects(&self, other: &SpecCellRange) -> bool {
        self.first_row <= other.last_row
            && other.first_row <= self.last_row
            && self.first_col <= other.last_col
            && other.first_col <= self.last_col
    }

    /// Whether `(row, col)` lies inside the range.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }
}

impl fmt::Display for SpecCellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            derive_cell_reference(self.first_row, self.first_col),
            derive_cell_reference(self.last_row, self.last_col)
        )
    }
}

/// Frozen pane split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecFreezePane {
    /// Number of frozen columns.
    pub col_split: usize,
    /// Number of frozen rows.
    pub row_split: usize,
    /// First visible column of the scrolling pane.
    pub leftmost_column: usize,
    /// First visible row of the scrolling pane.
    pub top_row: usize,
}

/// Deferred border-edge stamp over a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecBorderStamp {
    /// Range edge to stamp.
    pub edge: EnumBorderEdge,
    /// Border line style.
    pub style: EnumBorderStyle,
    /// Target range.
    pub range: SpecCellRange,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Errors raised while building or rendering a workbook.
///
/// Every error aborts the enclosing build; the partial document is discarded.
#[derive(Debug, Error)]
pub enum XlsxDslError {
    /// A sheet with the same name already exists.
    #[error("Sheet name already exists in workbook: {name:?}")]
    DuplicateName {
        /// Rejected sheet name.
        name: String,
    },
    /// A merged region intersects one already registered.
    #[error("Merged region {range} overlaps existing merged region {existing}")]
    OverlappingRegion {
        /// Rejected region.
        range: SpecCellRange,
        /// Region already registered on the sheet.
        existing: SpecCellRange,
    },
    /// Malformed or out-of-limit range/index.
    #[error("{0}")]
    InvalidRange(String),
    /// Attribute value out of its accepted domain.
    #[error("{0}")]
    InvalidAttribute(String),
    /// Rendering through `rust_xlsxwriter` failed.
    #[error("xlsx write error: {0}")]
    Write(#[from] XlsxError),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
