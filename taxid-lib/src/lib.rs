#![allow(clippy::needless_return)]

mod batch;
mod checksum;
mod document;
mod normalizer;
pub mod report;
pub mod spreadsheet;
pub mod utils;

// Test utilities - only compiled when testing or with test feature
// #[cfg(test)] alone doesn't work for integration tests (they're external crates)
// The feature flag makes it available to integration tests via dev-dependencies
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use batch::{BatchOutcome, RawRecord, Record, process_records};
pub use checksum::{CnpjChecksum, CpfChecksum, DocumentChecksum, is_valid_cnpj, is_valid_cpf};
pub use document::{DocumentType, ValidationResult, validate_document};
pub use normalizer::{normalize, normalize_str};

pub const ERRORS_LOG_FILE: &str = "errors.log";

/// Column holding the taxpayer document in the client spreadsheet
pub const DOCUMENT_COLUMN: &str = "CPF/CNPJ";

/// Sheet name used for the exported invalid records
pub const INVALID_SHEET_NAME: &str = "Clientes Inválidos";
