//! Stateless helper utilities shared by the document model and writer.

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
    TUP_INDEXED_COLOR_RGB,
};
use crate::spec::{EnumColor, SpecCellRange, XlsxDslError};

////////////////////////////////////////////////////////////////////////////////
// #region CellReference

/// Convert zero-based column index to Excel letters (`0` -> `A`, `27` -> `AB`).
pub fn derive_column_name(col_idx: usize) -> String {
    let mut l_chars = Vec::new();
    let mut n_rest = col_idx + 1;
    while n_rest > 0 {
        let n_rem = (n_rest - 1) % 26;
        l_chars.push(char::from(b'A' + n_rem as u8));
        n_rest = (n_rest - 1) / 26;
    }
    l_chars.iter().rev().collect()
}

/// Convert zero-based `(row, col)` to A1 notation.
pub fn derive_cell_reference(row_idx: usize, col_idx: usize) -> String {
    format!("{}{}", derive_column_name(col_idx), row_idx + 1)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Validation

/// Validate an Excel sheet name.
///
/// Unlike a sanitizer, invalid names are rejected rather than rewritten.
pub fn validate_sheet_name(name: &str) -> Result<(), XlsxDslError> {
    if name.is_empty() {
        return Err(XlsxDslError::InvalidAttribute(
            "Sheet name must not be empty.".to_string(),
        ));
    }
    let n_len_name = name.chars().count();
    if n_len_name > N_LEN_EXCEL_SHEET_NAME_MAX {
        return Err(XlsxDslError::InvalidAttribute(format!(
            "Sheet name {name:?} has {n_len_name} chars; max is {N_LEN_EXCEL_SHEET_NAME_MAX}."
        )));
    }
    if let Some(c_illegal) = TUP_EXCEL_ILLEGAL.iter().find(|c| name.contains(**c)) {
        return Err(XlsxDslError::InvalidAttribute(format!(
            "Sheet name {name:?} contains illegal character {c_illegal:?}."
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(XlsxDslError::InvalidAttribute(format!(
            "Sheet name {name:?} must not start or end with an apostrophe."
        )));
    }
    Ok(())
}

/// Validate that `range` is ordered and inside Excel sheet limits.
pub fn validate_cell_range(range: &SpecCellRange) -> Result<(), XlsxDslError> {
    if range.first_row > range.last_row || range.first_col > range.last_col {
        return Err(XlsxDslError::InvalidRange(format!(
            "Range bounds are reversed: rows {}..={}, cols {}..={}.",
            range.first_row, range.last_row, range.first_col, range.last_col
        )));
    }
    if range.last_row >= N_NROWS_EXCEL_MAX {
        return Err(XlsxDslError::InvalidRange(format!(
            "Row index {} exceeds Excel limit {N_NROWS_EXCEL_MAX}.",
            range.last_row
        )));
    }
    if range.last_col >= N_NCOLS_EXCEL_MAX {
        return Err(XlsxDslError::InvalidRange(format!(
            "Column index {} exceeds Excel limit {N_NCOLS_EXCEL_MAX}.",
            range.last_col
        )));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColorResolution

/// Resolve a color reference to `0xRRGGBB`; `None` means automatic.
pub fn derive_rgb_from_color(color: EnumColor) -> Option<u32> {
    match color {
        EnumColor::Automatic => None,
        EnumColor::Rgb(n_rgb) => Some(n_rgb & 0x00FF_FFFF),
        EnumColor::Indexed(n_idx) => TUP_INDEXED_COLOR_RGB.get(usize::from(n_idx)).copied(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_column_name_rolls_over_letters() {
        assert_eq!(derive_column_name(0), "A");
        assert_eq!(derive_column_name(25), "Z");
        assert_eq!(derive_column_name(26), "AA");
        assert_eq!(derive_column_name(701), "ZZ");
        assert_eq!(derive_column_name(702), "AAA");
        assert_eq!(derive_cell_reference(9, 2), "C10");
    }

    #[test]
    fn test_validate_sheet_name_rejects_excel_illegal_names() {
        assert!(validate_sheet_name("Report 2024").is_ok());
        assert!(validate_sheet_name("").is_err());
        assert!(validate_sheet_name("a/b").is_err());
        assert!(validate_sheet_name("'quoted").is_err());
        assert!(validate_sheet_name(&"x".repeat(32)).is_err());
        assert!(validate_sheet_name(&"x".repeat(31)).is_ok());
    }

    #[test]
    fn test_validate_cell_range_checks_order_and_limits() {
        assert!(validate_cell_range(&SpecCellRange::new(0, 0, 0, 0)).is_ok());
        assert!(matches!(
            validate_cell_range(&SpecCellRange::new(2, 1, 0, 0)),
            Err(XlsxDslError::InvalidRange(_))
        ));
        assert!(matches!(
            validate_cell_range(&SpecCellRange::new(0, 0, 0, N_NCOLS_EXCEL_MAX)),
            Err(XlsxDslError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_derive_rgb_from_color_uses_indexed_palette() {
        assert_eq!(derive_rgb_from_color(EnumColor::Automatic), None);
        assert_eq!(derive_rgb_from_color(EnumColor::Indexed(10)), Some(0xFF0000));
        assert_eq!(derive_rgb_from_color(EnumColor::Indexed(22)), Some(0xC0C0C0));
        assert_eq!(derive_rgb_from_color(EnumColor::Indexed(64)), None);
        assert_eq!(
            derive_rgb_from_color(EnumColor::Rgb(0xFF12_3456)),
            Some(0x12_3456)
        );
    }
}
