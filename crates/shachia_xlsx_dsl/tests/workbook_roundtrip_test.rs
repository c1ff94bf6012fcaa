use std::error::Error;
use std::io::Cursor;

use calamine::{Data, Reader, Xlsx, open_workbook, open_workbook_from_rs};
use shachia_xlsx_dsl::{
    EnumBorderStyle, EnumCellValue, EnumColor, EnumHorizontalAlignment, Styleable, XlsxDslError,
    workbook,
};

fn derive_reader(v_bytes: Vec<u8>) -> Result<Xlsx<Cursor<Vec<u8>>>, Box<dyn Error>> {
    Ok(open_workbook_from_rs::<Xlsx<_>, _>(Cursor::new(v_bytes))?)
}

#[test]
fn test_report_layout_reads_back() -> Result<(), Box<dyn Error>> {
    let doc = workbook(|wb| {
        wb.set_default_font_name("Arial");
        let header = wb.new_style(None, &[], |s| {
            s.alignment = Some(EnumHorizontalAlignment::Center);
            s.font = Some(wb.new_font(|f| f.bold = Some(true)));
            s.set_solid_fill(EnumColor::Indexed(22));
        })?;

        wb.new_sheet("Summary", |sheet| {
            sheet.offset_row = 1;
            sheet.offset_column = 1;
            sheet.zoom = 85;
            sheet.set_column_width(1, 24.0)?;
            sheet.create_freeze_pane(0, 2)?;
            sheet.set_border_bottom(EnumBorderStyle::Thin, 1, 3, 1, 3);

            sheet.new_row(|row| {
                row.new_cell(|cell| {
                    cell.set_cell_style(Some(header.clone()));
                    cell.text("Quarterly totals");
                    cell.merge(1, 3)
                })
            })?;
            for (c_label, n_value) in [("North", 120.5), ("South", 98.0)] {
                sheet.new_row(|row| {
                    row.style(|s| s.wrap_text = Some(true))?;
                    row.new_cell(|cell| {
                        cell.text(c_label);
                        Ok(())
                    })?;
                    row.new_cell(|cell| {
                        cell.value(n_value);
                        Ok(())
                    })?;
                    row.new_cell(|cell| {
                        cell.value(n_value > 100.0);
                        Ok(())
                    })
                })?;
            }
            Ok(())
        })?;

        wb.new_sheet("Notes", |sheet| {
            sheet.new_row(|row| {
                row.new_cell(|cell| {
                    cell.text("see Summary");
                    Ok(())
                })
            })
        })
    })?;

    let mut reader = derive_reader(doc.save_to_buffer()?)?;
    assert_eq!(reader.sheet_names(), vec!["Summary", "Notes"]);

    let range = reader.worksheet_range("Summary")?;
    assert_eq!(
        range.get_value((1, 1)),
        Some(&Data::String("Quarterly totals".to_string()))
    );
    assert_eq!(range.get_value((2, 1)), Some(&Data::String("North".to_string())));
    assert_eq!(range.get_value((3, 2)), Some(&Data::Float(98.0)));
    assert_eq!(range.get_value((2, 3)), Some(&Data::Bool(true)));
    assert_eq!(range.get_value((3, 3)), Some(&Data::Bool(false)));

    let range = reader.worksheet_range("Notes")?;
    assert_eq!(
        range.get_value((0, 0)),
        Some(&Data::String("see Summary".to_string()))
    );

    reader.load_merged_regions()?;
    let l_merges = reader.merged_regions_by_sheet("Summary");
    assert_eq!(l_merges.len(), 1);
    assert_eq!(l_merges[0].2.start, (1, 1));
    assert_eq!(l_merges[0].2.end, (1, 3));
    Ok(())
}

#[test]
fn test_save_writes_file_to_disk() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path_out = dir.path().join("numbers.xlsx");

    let doc = workbook(|wb| {
        wb.new_sheet("Numbers", |sheet| {
            for n_idx in 0..5 {
                sheet.new_row(|row| {
                    row.new_cell(|cell| {
                        cell.value(n_idx);
                        Ok(())
                    })
                })?;
            }
            Ok(())
        })
    })?;
    doc.save(&path_out)?;

    let mut reader: Xlsx<_> = open_workbook(&path_out)?;
    let range = reader.worksheet_range("Numbers")?;
    assert_eq!(range.height(), 5);
    assert_eq!(range.get_value((4, 0)), Some(&Data::Float(4.0)));
    Ok(())
}

#[test]
fn test_failed_build_yields_no_document() {
    let result = workbook(|wb| {
        wb.new_sheet("Data", |_| Ok(()))?;
        wb.new_sheet("data", |_| Ok(()))
    });

    assert!(matches!(
        result,
        Err(XlsxDslError::DuplicateName { ref name }) if name == "data"
    ));
}

#[test]
fn test_merged_region_renders_anchor_value_only() -> Result<(), Box<dyn Error>> {
    let doc = workbook(|wb| {
        wb.new_sheet("Merged", |sheet| {
            sheet.new_row(|row| {
                row.new_cell(|cell| {
                    cell.text("kept");
                    cell.merge(1, 2)
                })?;
                row.new_cell(|cell| {
                    cell.text("hidden");
                    Ok(())
                })
            })
        })
    })?;

    let sheet = doc.sheet("Merged").ok_or("missing sheet")?;
    assert_eq!(
        sheet.cell(0, 1).map(|cell| cell.value()),
        Some(&EnumCellValue::String("hidden".to_string()))
    );

    let mut reader = derive_reader(doc.save_to_buffer()?)?;
    let range = reader.worksheet_range("Merged")?;
    assert_eq!(range.get_value((0, 0)), Some(&Data::String("kept".to_string())));
    assert_ne!(
        range.get_value((0, 1)),
        Some(&Data::String("hidden".to_string()))
    );
    Ok(())
}
