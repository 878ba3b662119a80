use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::checksum::{CNPJ_LENGTH, CPF_LENGTH, CnpjChecksum, CpfChecksum, DocumentChecksum};
use crate::normalizer::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentType {
    #[serde(rename = "CPF")]
    Cpf,
    #[serde(rename = "CNPJ")]
    Cnpj,
}

impl DocumentType {
    /// Classify a normalized digit string by its length alone.
    ///
    /// Anything shorter than a CNPJ is reported as a CPF, which means empty
    /// and truncated values land in the CPF tally.
    pub fn from_length(length: usize) -> Self {
        if length < CNPJ_LENGTH {
            DocumentType::Cpf
        } else {
            DocumentType::Cnpj
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Cpf => write!(f, "CPF"),
            DocumentType::Cnpj => write!(f, "CNPJ"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub document_type: DocumentType,
    pub is_valid: bool,
}

/// Normalize a raw cell value and validate it as a CPF or CNPJ.
///
/// Never fails: malformed, empty or missing values produce an invalid result.
pub fn validate_document(raw_value: &Value) -> ValidationResult {
    let digits = normalize(raw_value);

    match digits.len() {
        CPF_LENGTH => ValidationResult {
            document_type: DocumentType::Cpf,
            is_valid: CpfChecksum.is_valid(&digits),
        },
        CNPJ_LENGTH => ValidationResult {
            document_type: DocumentType::Cnpj,
            is_valid: CnpjChecksum.is_valid(&digits),
        },
        length => ValidationResult {
            document_type: DocumentType::from_length(length),
            is_valid: false,
        },
    }
}
