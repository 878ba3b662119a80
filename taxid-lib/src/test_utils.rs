// Test utilities available to both unit and integration tests
// Only compiled when testing

use serde_json::{Map, Value, json};

use crate::DOCUMENT_COLUMN;
use crate::batch::RawRecord;
use crate::checksum::{CNPJ_FIRST_WEIGHTS, CNPJ_SECOND_WEIGHTS, cnpj_check_digit, cpf_check_digit};

/// Append both CPF check digits to a 9 digit base
#[allow(dead_code)]
pub fn complete_cpf(base: &str) -> String {
    let mut digits = to_digits(base);
    assert_eq!(digits.len(), 9, "CPF base must have 9 digits: {base}");

    digits.push(cpf_check_digit(&digits));
    digits.push(cpf_check_digit(&digits));
    from_digits(&digits)
}

/// Append both CNPJ check digits to a 12 digit base
#[allow(dead_code)]
pub fn complete_cnpj(base: &str) -> String {
    let mut digits = to_digits(base);
    assert_eq!(digits.len(), 12, "CNPJ base must have 12 digits: {base}");

    digits.push(cnpj_check_digit(&digits, &CNPJ_FIRST_WEIGHTS));
    digits.push(cnpj_check_digit(&digits, &CNPJ_SECOND_WEIGHTS));
    from_digits(&digits)
}

/// Build a client record with a name, a document and a city column
#[allow(dead_code)]
pub fn client_record(row_number: usize, name: &str, document: Value) -> RawRecord {
    let mut fields = Map::new();
    fields.insert("Nome".to_string(), json!(name));
    if !document.is_null() {
        fields.insert(DOCUMENT_COLUMN.to_string(), document);
    }
    fields.insert("Cidade".to_string(), json!("São Paulo"));
    RawRecord::new(row_number, fields)
}

/// A small client table: rows 2..=7, three of them invalid
/// (row 3 bad CPF, row 5 bad CNPJ, row 7 truncated document)
#[allow(dead_code)]
pub fn sample_client_records() -> Vec<RawRecord> {
    vec![
        client_record(2, "Ana Souza", json!("111.444.777-35")),
        client_record(3, "Bruno Lima", json!("123.456.789-00")),
        client_record(4, "Comercial Alfa Ltda", json!("11.222.333/0001-81")),
        client_record(5, "Distribuidora Beta SA", json!("11.222.333/0001-99")),
        client_record(6, "Carla Dias", json!(52998224725_i64)),
        client_record(7, "Eduardo Reis", json!("529.982.247")),
    ]
}

fn to_digits(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn from_digits(digits: &[u32]) -> String {
    digits
        .iter()
        .filter_map(|d| char::from_digit(*d, 10))
        .collect()
}
