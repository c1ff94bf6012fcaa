//! `shachia_xlsx_dsl` v1:
//! Nested closure DSL for building styled XLSX workbooks.
//!
//! Modules:
//! - `conf`     : constants and default presets
//! - `spec`     : style/font/range models and the error type
//! - `util`     : pure helper functions
//! - `style`    : optional-attribute style and font builders
//! - `document` : in-memory workbook object model
//! - `builder`  : workbook -> sheet -> row -> cell builders
//! - `writer`   : rendering through `rust_xlsxwriter`
pub mod builder;
pub mod conf;
pub mod document;
pub mod spec;
pub mod style;
pub mod util;
pub mod writer;

pub use builder::{CellBuilder, RowBuilder, SheetBuilder, Styleable, WorkbookBuilder, workbook};
pub use conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
pub use document::{XlsxCell, XlsxDocument, XlsxRow, XlsxSheet};
pub use spec::{
    EnumBorderEdge, EnumBorderStyle, EnumCellValue, EnumColor, EnumDataFormat, EnumFillPattern,
    EnumFontTypeOffset, EnumFontUnderline, EnumHorizontalAlignment, EnumVerticalAlignment,
    SpecBorderStamp, SpecCellRange, SpecCellStyle, SpecFont, SpecFreezePane, XlsxDslError,
};
pub use style::{FontBuilder, StyleBuilder, font, style};
pub use util::{derive_cell_reference, derive_column_name};
