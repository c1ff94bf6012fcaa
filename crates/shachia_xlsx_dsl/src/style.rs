//! Optional-attribute builders for cell styles and fonts.
//!
//! Every attribute is an `Option`; `None` keeps whatever the base (or the
//! default) already carries. Finalizing is a fixed list of "if set, apply".

use crate::conf::{N_INDENTION_MAX, N_ROTATION_STACKED, derive_default_cell_style, derive_default_font};
use crate::spec::{
    EnumBorderStyle, EnumColor, EnumDataFormat, EnumFillPattern, EnumFontTypeOffset,
    EnumFontUnderline, EnumHorizontalAlignment, EnumVerticalAlignment, SpecCellStyle, SpecFont,
    XlsxDslError,
};

////////////////////////////////////////////////////////////////////////////////
// #region StyleBuilder

/// Pending style attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleBuilder {
    /// Built-in number format index.
    pub data_format: Option<u16>,
    /// Custom number format code; wins over `data_format` when both are set.
    pub data_format_string: Option<String>,
    /// Font override.
    pub font: Option<SpecFont>,
    /// Hide formulas when protected.
    pub hidden: Option<bool>,
    /// Lock cell when protected.
    pub locked: Option<bool>,
    /// Leading apostrophe.
    pub quote_prefixed: Option<bool>,
    /// Horizontal alignment.
    pub alignment: Option<EnumHorizontalAlignment>,
    /// Wrap text.
    pub wrap_text: Option<bool>,
    /// Vertical alignment.
    pub vertical_alignment: Option<EnumVerticalAlignment>,
    /// Rotation in degrees (`-90..=90`, or `255` for stacked).
    pub rotation: Option<i16>,
    /// Indentation level (`0..=250`).
    pub indention: Option<u8>,

    pub border_left: Option<EnumBorderStyle>,
    pub border_right: Option<EnumBorderStyle>,
    pub border_top: Option<EnumBorderStyle>,
    pub border_bottom: Option<EnumBorderStyle>,
    pub left_border_color: Option<EnumColor>,
    pub right_border_color: Option<EnumColor>,
    pub top_border_color: Option<EnumColor>,
    pub bottom_border_color: Option<EnumColor>,

    /// Fill pattern.
    pub fill_pattern: Option<EnumFillPattern>,
    /// Pattern background color.
    pub fill_background_color: Option<EnumColor>,
    /// Pattern foreground color (the visible color of a solid fill).
    pub fill_foreground_color: Option<EnumColor>,
    /// Shrink to fit.
    pub shrink_to_fit: Option<bool>,
}

impl StyleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all four border edges at once.
    pub fn set_border(&mut self, border: EnumBorderStyle) -> &mut Self {
        self.border_left = Some(border);
        self.border_right = Some(border);
        self.border_top = Some(border);
        self.border_bottom = Some(border);
        self
    }

    /// Solid fill with `color`.
    pub fn set_solid_fill(&mut self, color: EnumColor) -> &mut Self {
        self.fill_pattern = Some(EnumFillPattern::Solid);
        self.fill_foreground_color = Some(color);
        self
    }

    /// Clone `base` (or the default style) and apply every set attribute.
    pub fn build(&self, base: Option<&SpecCellStyle>) -> Result<SpecCellStyle, XlsxDslError> {
        let mut style = base.cloned().unwrap_or_else(derive_default_cell_style);

        if let Some(val) = self.data_format {
            style.data_format = EnumDataFormat::Builtin(val);
        }
        if let Some(val) = &self.data_format_string {
            style.data_format = EnumDataFormat::Custom(val.clone());
        }
        if let Some(val) = &self.font {
            style.font = Some(val.clone());
        }
        if let Some(val) = self.hidden {
            style.hidden = val;
        }
        if let Some(val) = self.locked {
            style.locked = val;
        }
        if let Some(val) = self.quote_prefixed {
            style.quote_prefixed = val;
        }
        if let Some(val) = self.alignment {
            style.alignment = val;
        }
        if let Some(val) = self.wrap_text {
            style.wrap_text = val;
        }
        if let Some(val) = self.vertical_alignment {
            style.vertical_alignment = val;
        }
        if let Some(val) = self.rotation {
            validate_rotation(val)?;
            style.rotation = val;
        }
        if let Some(val) = self.indention {
            if val > N_INDENTION_MAX {
                return Err(XlsxDslError::InvalidAttribute(format!(
                    "Indention {val} exceeds {N_INDENTION_MAX}."
                )));
            }
            style.indention = val;
        }

        if let Some(val) = self.border_left {
            style.border_left = val;
        }
        if let Some(val) = self.border_right {
            style.border_right = val;
        }
        if let Some(val) = self.border_top {
            style.border_top = val;
        }
        if let Some(val) = self.border_bottom {
            style.border_bottom = val;
        }
        if let Some(val) = self.left_border_color {
            style.left_border_color = val;
        }
        if let Some(val) = self.right_border_color {
            style.right_border_color = val;
        }
        if let Some(val) = self.top_border_color {
            style.top_border_color = val;
        }
        if let Some(val) = self.bottom_border_color {
            style.bottom_border_color = val;
        }

        if let Some(val) = self.fill_pattern {
            style.fill_pattern = val;
        }
        if let Some(val) = self.fill_background_color {
            style.fill_background_color = val;
        }
        if let Some(val) = self.fill_foreground_color {
            style.fill_foreground_color = val;
        }
        if let Some(val) = self.shrink_to_fit {
            style.shrink_to_fit = val;
        }

        Ok(style)
    }
}

fn validate_rotation(rotation: i16) -> Result<(), XlsxDslError> {
    if (-90..=90).contains(&rotation) || rotation == N_ROTATION_STACKED {
        return Ok(());
    }
    Err(XlsxDslError::InvalidAttribute(format!(
        "Rotation {rotation} must be within -90..=90 or {N_ROTATION_STACKED}."
    )))
}

/// Build a standalone style: mixins in order, then `configure`, then `base`.
///
/// Later configuration wins for any attribute it sets.
pub fn style<F>(
    base: Option<&SpecCellStyle>,
    mixins: &[&dyn Fn(&mut StyleBuilder)],
    configure: F,
) -> Result<SpecCellStyle, XlsxDslError>
where
    F: FnOnce(&mut StyleBuilder),
{
    let mut builder = StyleBuilder::new();
    for mixin in mixins {
        mixin(&mut builder);
    }
    configure(&mut builder);
    builder.build(base)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FontBuilder

/// Pending font attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontBuilder {
    /// Font family name.
    pub font_name: Option<String>,
    /// Height in twips (1/20 pt).
    pub font_height: Option<u16>,
    /// Height in points; wins over `font_height` when both are set.
    pub font_height_in_points: Option<u16>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub strikeout: Option<bool>,
    pub type_offset: Option<EnumFontTypeOffset>,
    pub underline: Option<EnumFontUnderline>,
    pub charset: Option<u8>,
    pub color: Option<EnumColor>,
}

impl FontBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the default font and apply every set attribute.
    pub fn build(&self) -> SpecFont {
        let mut font = derive_default_font();

        if let Some(val) = &self.font_name {
            font.name = val.clone();
        }
        if let Some(val) = self.font_height {
            font.height = val;
        }
        if let Some(val) = self.font_height_in_points {
            font.set_height_in_points(val);
        }
        if let Some(val) = self.bold {
            font.bold = val;
        }
        if let Some(val) = self.italic {
            font.italic = val;
        }
        if let Some(val) = self.strikeout {
            font.strikeout = val;
        }
        if let Some(val) = self.type_offset {
            font.type_offset = val;
        }
        if let Some(val) = self.underline {
            font.underline = val;
        }
        if let Some(val) = self.charset {
            font.charset = val;
        }
        if let Some(val) = self.color {
            font.color = val;
        }

        font
    }
}

/// Build a standalone font.
pub fn font<F>(configure: F) -> SpecFont
where
    F: FnOnce(&mut FontBuilder),
{
    let mut builder = FontBuilder::new();
    configure(&mut builder);
    builder.build()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn derive_base_style() -> SpecCellStyle {
        SpecCellStyle {
            alignment: EnumHorizontalAlignment::Center,
            border_bottom: EnumBorderStyle::Medium,
            fill_pattern: EnumFillPattern::Solid,
            fill_foreground_color: EnumColor::Indexed(22),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_without_overrides_clones_base() {
        let base = derive_base_style();
        assert_eq!(StyleBuilder::new().build(Some(&base)).unwrap(), base);
        assert_eq!(
            StyleBuilder::new().build(None).unwrap(),
            SpecCellStyle::default()
        );
    }

    #[test]
    fn test_build_with_one_override_changes_only_that_attribute() {
        let base = derive_base_style();
        let built = style(Some(&base), &[], |s| s.wrap_text = Some(true)).unwrap();

        assert!(built.wrap_text);
        assert_eq!(
            SpecCellStyle {
                wrap_text: false,
                ..built
            },
            base
        );
    }

    #[test]
    fn test_later_mixins_and_configure_win() {
        let mixin_thin = |s: &mut StyleBuilder| {
            s.set_border(EnumBorderStyle::Thin);
            s.alignment = Some(EnumHorizontalAlignment::Left);
        };
        let mixin_right = |s: &mut StyleBuilder| {
            s.alignment = Some(EnumHorizontalAlignment::Right);
        };

        let built = style(None, &[&mixin_thin, &mixin_right], |s| {
            s.border_top = Some(EnumBorderStyle::Double);
        })
        .unwrap();

        assert_eq!(built.alignment, EnumHorizontalAlignment::Right);
        assert_eq!(built.border_top, EnumBorderStyle::Double);
        assert_eq!(built.border_left, EnumBorderStyle::Thin);
        assert_eq!(built.border_bottom, EnumBorderStyle::Thin);
    }

    #[test]
    fn test_custom_data_format_wins_over_builtin_index() {
        let built = style(None, &[], |s| {
            s.data_format = Some(14);
            s.data_format_string = Some("0.00%".to_string());
        })
        .unwrap();
        assert_eq!(built.data_format, EnumDataFormat::Custom("0.00%".to_string()));

        let built = style(None, &[], |s| s.data_format = Some(14)).unwrap();
        assert_eq!(built.data_format, EnumDataFormat::Builtin(14));
    }

    #[test]
    fn test_build_rejects_out_of_range_rotation_and_indention() {
        assert!(matches!(
            style(None, &[], |s| s.rotation = Some(91)),
            Err(XlsxDslError::InvalidAttribute(_))
        ));
        assert!(matches!(
            style(None, &[], |s| s.indention = Some(251)),
            Err(XlsxDslError::InvalidAttribute(_))
        ));
        assert_eq!(
            style(None, &[], |s| s.rotation = Some(N_ROTATION_STACKED))
                .unwrap()
                .rotation,
            N_ROTATION_STACKED
        );
    }

    #[test]
    fn test_font_builder_prefers_points_over_twips() {
        let built = font(|f| {
            f.font_name = Some("Meiryo".to_string());
            f.font_height = Some(200);
            f.font_height_in_points = Some(14);
            f.bold = Some(true);
        });

        assert_eq!(built.name, "Meiryo");
        assert_eq!(built.height, 280);
        assert!(built.bold);
        assert!(!built.italic);
    }

    #[test]
    fn test_font_builder_defaults_match_document_default_font() {
        assert_eq!(font(|_| {}), derive_default_font());
    }
}
