use serde_json::Value;
use std::fmt;

use crate::batch::{BatchOutcome, Record};
use crate::document::validate_document;

const RULE_WIDTH: usize = 50;

/// Title block printed before the spreadsheet is read
pub fn render_banner() -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\nVALIDADOR DE CPF/CNPJ - CLIENTES\n{rule}\n\n")
}

/// Console summary of a validation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub total_count: usize,
    pub invalid_count: usize,
    pub cpf_invalid_count: usize,
    pub cnpj_invalid_count: usize,
    /// Path of the generated spreadsheet, `None` when nothing was written
    pub output_file: Option<String>,
}

impl SummaryReport {
    pub fn from_outcome<R>(outcome: &BatchOutcome<R>, output_file: Option<&str>) -> Self {
        SummaryReport {
            total_count: outcome.total_count,
            invalid_count: outcome.invalid_count(),
            cpf_invalid_count: outcome.cpf_invalid_count,
            cnpj_invalid_count: outcome.cnpj_invalid_count,
            output_file: output_file.map(str::to_string),
        }
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let thin_rule = "-".repeat(RULE_WIDTH);

        writeln!(f, "RESULTADO DA VALIDAÇÃO:")?;
        writeln!(f, "{thin_rule}")?;
        writeln!(f, "Total de registros processados: {}", self.total_count)?;
        writeln!(f, "Total de CPF/CNPJ inválidos: {}", self.invalid_count)?;
        writeln!(f, "  - CPFs inválidos: {}", self.cpf_invalid_count)?;
        writeln!(f, "  - CNPJs inválidos: {}", self.cnpj_invalid_count)?;
        writeln!(f, "{thin_rule}")?;
        writeln!(f)?;

        match &self.output_file {
            Some(output_file) => {
                writeln!(f, "✓ Arquivo \"{output_file}\" gerado com sucesso!")?;
                writeln!(
                    f,
                    "  Contém {} registros com CPF/CNPJ inválido.",
                    self.invalid_count
                )?;
            }
            None => writeln!(f, "✓ Todos os CPF/CNPJ são válidos! Nenhum arquivo gerado.")?,
        }

        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))
    }
}

/// Format the invalid records into a structured string for the errors log
pub fn format_invalid_report<R: Record>(records: &[R], column: &str) -> String {
    let mut report = String::new();

    report.push_str("=============================\n");

    let now = chrono::Utc::now().to_rfc3339();
    report.push_str(&format!("Generated at: {}\n\n", now));

    report.push_str(&format!(
        "Total records with invalid {}: {}\n\n",
        column,
        records.len()
    ));

    for record in records {
        let document = record.field(column).unwrap_or(&Value::Null);
        let result = validate_document(document);

        match record.row_number() {
            Some(row_number) => report.push_str(&format!("Row {}: ", row_number)),
            None => report.push_str("Row ?: "),
        }
        report.push_str(&format!(
            "invalid {} {}\n",
            result.document_type,
            describe_value(document)
        ));

        match serde_json::to_string(&record.to_json()) {
            Ok(json_data) => report.push_str(&format!("Row data: {}\n", json_data)),
            Err(_) => report.push_str("Row data: [Error serializing data]\n"),
        }
        report.push('\n');
    }

    report
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "(empty)".to_string(),
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::RawRecord;
    use serde_json::{Map, json};

    fn outcome(cpf: usize, cnpj: usize, total: usize) -> BatchOutcome<RawRecord> {
        BatchOutcome {
            invalid_records: (0..cpf + cnpj)
                .map(|i| RawRecord::new(i + 2, Map::new()))
                .collect(),
            cpf_invalid_count: cpf,
            cnpj_invalid_count: cnpj,
            total_count: total,
        }
    }

    #[test]
    fn test_banner() {
        let banner = render_banner();
        assert!(banner.starts_with(&"=".repeat(50)));
        assert!(banner.contains("VALIDADOR DE CPF/CNPJ - CLIENTES"));
    }

    #[test]
    fn test_summary_with_output_file() {
        let report = SummaryReport::from_outcome(&outcome(2, 1, 10), Some("clientes_invalidos.xlsx"));
        let text = report.to_string();

        assert!(text.contains("Total de registros processados: 10"));
        assert!(text.contains("Total de CPF/CNPJ inválidos: 3"));
        assert!(text.contains("  - CPFs inválidos: 2"));
        assert!(text.contains("  - CNPJs inválidos: 1"));
        assert!(text.contains("✓ Arquivo \"clientes_invalidos.xlsx\" gerado com sucesso!"));
        assert!(text.contains("  Contém 3 registros com CPF/CNPJ inválido."));
        assert!(!text.contains("Nenhum arquivo gerado"));
    }

    #[test]
    fn test_summary_all_valid() {
        let report = SummaryReport::from_outcome(&outcome(0, 0, 4), None);
        let text = report.to_string();

        assert!(text.contains("Total de CPF/CNPJ inválidos: 0"));
        assert!(text.contains("✓ Todos os CPF/CNPJ são válidos! Nenhum arquivo gerado."));
        assert!(!text.contains("gerado com sucesso"));
    }

    #[test]
    fn test_invalid_report_lists_rows() {
        let mut fields = Map::new();
        fields.insert("Nome".to_string(), json!("Bruno"));
        fields.insert("CPF/CNPJ".to_string(), json!("111.444.777-00"));
        let records = vec![
            RawRecord::new(3, fields),
            RawRecord::new(5, Map::new()),
        ];

        let report = format_invalid_report(&records, "CPF/CNPJ");

        assert!(report.contains("Total records with invalid CPF/CNPJ: 2"));
        assert!(report.contains("Row 3: invalid CPF \"111.444.777-00\""));
        assert!(report.contains("Row 5: invalid CPF (empty)"));
        assert!(report.contains("\"Nome\":\"Bruno\""));
    }

    #[test]
    fn test_invalid_report_without_row_numbers() {
        let mut record = Map::new();
        record.insert("CPF/CNPJ".to_string(), json!("11.222.333/0001-00"));

        let report = format_invalid_report(&[record], "CPF/CNPJ");
        assert!(report.contains("Row ?: invalid CNPJ \"11.222.333/0001-00\""));
    }
}
