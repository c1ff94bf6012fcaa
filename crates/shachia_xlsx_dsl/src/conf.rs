//! XLSX constants and default preset factories.

use crate::spec::{
    EnumColor, EnumFontTypeOffset, EnumFontUnderline, SpecCellStyle, SpecFont,
};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Sheet zoom applied when the builder leaves it untouched.
pub const N_ZOOM_DEFAULT: u16 = 100;
/// Smallest zoom Excel accepts.
pub const N_ZOOM_MIN: u16 = 10;
/// Largest zoom Excel accepts.
pub const N_ZOOM_MAX: u16 = 400;

/// Default row height in points for new sheets.
pub const N_ROW_HEIGHT_DEFAULT: f32 = 15.0;
/// Default column width in characters for new sheets.
pub const N_COLUMN_WIDTH_DEFAULT: u32 = 8;
/// Largest column width Excel accepts, in characters.
pub const N_COLUMN_WIDTH_MAX: f64 = 255.0;

/// Default font family of a fresh document.
pub const C_FONT_NAME_DEFAULT: &str = "Calibri";
/// Default font height of a fresh document, in twips (1/20 pt).
pub const N_FONT_HEIGHT_DEFAULT: u16 = 220;
/// Twips per point.
pub const N_TWIPS_PER_POINT: u16 = 20;

/// Rotation value meaning "letters stacked top to bottom".
pub const N_ROTATION_STACKED: i16 = 255;
/// Largest cell indentation level.
pub const N_INDENTION_MAX: u8 = 250;

/// Legacy indexed color palette (`0..=63`) as `0xRRGGBB`.
///
/// Entries `0..=7` duplicate `8..=15`. Indices `64` and `65` are the system
/// foreground/background and resolve to automatic color.
pub const TUP_INDEXED_COLOR_RGB: [u32; 64] = [
    0x000000, 0xFFFFFF, 0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00, 0xFF00FF, 0x00FFFF, // 0-7
    0x000000, 0xFFFFFF, 0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00, 0xFF00FF, 0x00FFFF, // 8-15
    0x800000, 0x008000, 0x000080, 0x808000, 0x800080, 0x008080, 0xC0C0C0, 0x808080, // 16-23
    0x9999FF, 0x993366, 0xFFFFCC, 0xCCFFFF, 0x660066, 0xFF8080, 0x0066CC, 0xCCCCFF, // 24-31
    0x000080, 0xFF00FF, 0xFFFF00, 0x00FFFF, 0x800080, 0x800000, 0x008080, 0x0000FF, // 32-39
    0x00CCFF, 0xCCFFFF, 0xCCFFCC, 0xFFFF99, 0x99CCFF, 0xFF99CC, 0xCC99FF, 0xFFCC99, // 40-47
    0x3366FF, 0x33CCCC, 0x99CC00, 0xFFCC00, 0xFF9900, 0xFF6600, 0x666699, 0x969696, // 48-55
    0x003366, 0x339966, 0x003300, 0x333300, 0x993300, 0x993366, 0x333399, 0x333333, // 56-63
];

/// Build the font a fresh document starts with (font index 0).
pub fn derive_default_font() -> SpecFont {
    SpecFont {
        name: C_FONT_NAME_DEFAULT.to_string(),
        height: N_FONT_HEIGHT_DEFAULT,
        bold: false,
        italic: false,
        strikeout: false,
        type_offset: EnumFontTypeOffset::None,
        underline: EnumFontUnderline::None,
        charset: 0,
        color: EnumColor::Automatic,
    }
}

/// Build the style every unstyled cell renders with.
pub fn derive_default_cell_style() -> SpecCellStyle {
    SpecCellStyle::default()
}
