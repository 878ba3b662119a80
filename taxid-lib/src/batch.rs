use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::document::{DocumentType, validate_document};

/// A row of the input table: column name to cell value.
///
/// Implemented for the usual map types so callers can hand over whatever
/// shape they read their table into; the batch processor only needs field
/// lookup and the ability to copy the whole record into the output.
pub trait Record: Clone {
    fn field(&self, column: &str) -> Option<&Value>;

    /// All cells of the record, in the record's own column order
    fn cells(&self) -> Vec<(&str, &Value)>;

    /// 1-based spreadsheet row the record was read from, when known
    fn row_number(&self) -> Option<usize> {
        None
    }

    fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .cells()
            .into_iter()
            .map(|(column, value)| (column.to_string(), value.clone()))
            .collect();
        Value::Object(object)
    }
}

impl Record for Map<String, Value> {
    fn field(&self, column: &str) -> Option<&Value> {
        self.get(column)
    }

    fn cells(&self) -> Vec<(&str, &Value)> {
        self.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }
}

/// Column order is the map's iteration order, which is arbitrary: the header
/// row written for these records can differ between runs. Use
/// `serde_json::Map` or `BTreeMap` when the exported column order matters.
impl<K, S> Record for HashMap<K, Value, S>
where
    K: Borrow<str> + Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    fn field(&self, column: &str) -> Option<&Value> {
        self.get(column)
    }

    fn cells(&self) -> Vec<(&str, &Value)> {
        self.iter()
            .map(|(k, v)| (<K as Borrow<str>>::borrow(k), v))
            .collect()
    }
}

impl<K> Record for BTreeMap<K, Value>
where
    K: Borrow<str> + Ord + Clone,
{
    fn field(&self, column: &str) -> Option<&Value> {
        self.get(column)
    }

    fn cells(&self) -> Vec<(&str, &Value)> {
        self.iter()
            .map(|(k, v)| (<K as Borrow<str>>::borrow(k), v))
            .collect()
    }
}

/// A record read from a spreadsheet, keeping the row it came from.
///
/// Columns keep the order of the sheet header; empty cells are not stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRecord {
    pub row_number: usize,
    pub fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new(row_number: usize, fields: Map<String, Value>) -> Self {
        RawRecord { row_number, fields }
    }
}

impl Record for RawRecord {
    fn field(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    fn cells(&self) -> Vec<(&str, &Value)> {
        self.fields.cells()
    }

    fn row_number(&self) -> Option<usize> {
        Some(self.row_number)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<R> {
    /// Records with an invalid document, in input order
    pub invalid_records: Vec<R>,
    pub cpf_invalid_count: usize,
    pub cnpj_invalid_count: usize,
    pub total_count: usize,
}

impl<R> BatchOutcome<R> {
    pub fn invalid_count(&self) -> usize {
        self.invalid_records.len()
    }

    pub fn has_invalid_records(&self) -> bool {
        !self.invalid_records.is_empty()
    }
}

/// Validate the document column of every record.
///
/// A record without the column is validated as an empty value, so it is
/// reported as an invalid CPF.
pub fn process_records<R: Record>(records: &[R], column: &str) -> BatchOutcome<R> {
    let mut invalid_records = Vec::new();
    let mut cpf_invalid_count = 0;
    let mut cnpj_invalid_count = 0;

    for record in records {
        let document = record.field(column).unwrap_or(&Value::Null);
        let result = validate_document(document);

        if !result.is_valid {
            invalid_records.push(record.clone());

            match result.document_type {
                DocumentType::Cpf => cpf_invalid_count += 1,
                DocumentType::Cnpj => cnpj_invalid_count += 1,
            }
        }
    }

    BatchOutcome {
        invalid_records,
        cpf_invalid_count,
        cnpj_invalid_count,
        total_count: records.len(),
    }
}
