use rust_xlsxwriter::Workbook;
use serde_json::Value;
use std::path::Path;

// Re-export shared test utilities from src/test_utils.rs
pub use taxid_lib::test_utils::{
    client_record, complete_cnpj, complete_cpf, sample_client_records,
};

/// Write a workbook with one sheet: a header row followed by `rows`.
/// `Value::Null` cells and empty headers are left empty.
#[allow(dead_code)]
pub fn write_input_workbook(
    path: &Path,
    sheet_name: &str,
    headers: &[&str],
    rows: &[Vec<Value>],
) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).unwrap();

    for (col, header) in headers.iter().enumerate() {
        if header.is_empty() {
            continue;
        }
        worksheet.write_string(0, col as u16, *header).unwrap();
    }

    for (index, row) in rows.iter().enumerate() {
        let row_number = (index + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Value::Null => {}
                Value::String(s) => {
                    worksheet.write_string(row_number, col, s).unwrap();
                }
                Value::Number(n) => {
                    worksheet
                        .write_number(row_number, col, n.as_f64().unwrap())
                        .unwrap();
                }
                Value::Bool(b) => {
                    worksheet.write_boolean(row_number, col, *b).unwrap();
                }
                other => panic!("unsupported test cell: {other}"),
            }
        }
    }

    workbook.save(path).unwrap();
}
