// reset; cargo run -p taxid-validator
// reset; cargo run -p taxid-validator -- --input ./data/clientes.xlsx --sheet-name Clientes --csv-output invalidos.csv

use clap::Parser;
use taxid_lib::{
    process_records,
    report::{format_invalid_report, render_banner, SummaryReport},
    spreadsheet::{export_to_csv, write_invalid_records, SheetReader},
    utils::write_error_to_log,
    DOCUMENT_COLUMN, ERRORS_LOG_FILE,
};

const DEFAULT_INPUT_FILE: &str = "clientes.xlsx";
const DEFAULT_OUTPUT_FILE: &str = "clientes_invalidos.xlsx";

#[derive(Parser)]
#[command(name = "taxid-validator")]
#[command(about = "Validates the CPF/CNPJ column of a client spreadsheet and exports the invalid records")]
#[command(version)]
struct Args {
    /// Path to the Excel file with the client records
    #[arg(short, long, default_value = DEFAULT_INPUT_FILE)]
    input: String,

    /// Path of the Excel file generated with the invalid records (only written when there are any)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: String,

    /// Optional sheet name to validate (if not specified, validates the first sheet)
    #[arg(long)]
    sheet_name: Option<String>,

    /// Name of the column holding the CPF/CNPJ
    #[arg(long, default_value = DOCUMENT_COLUMN)]
    column: String,

    /// Also export the invalid records to this CSV file
    #[arg(long)]
    csv_output: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let arguments = Args::parse();

    print!("{}", render_banner());

    let sheet = match SheetReader::new(&arguments.input)
        .sheet_name(arguments.sheet_name.as_deref())
        .read()
    {
        Ok(sheet) => sheet,
        Err(e) => {
            write_error_to_log("Spreadsheet Read Error", &e.to_string());
            eprintln!("❌ Failed to read {}: {e}", arguments.input);
            eprintln!("❌ Check {} for details.", ERRORS_LOG_FILE);
            std::process::exit(1);
        }
    };

    if !sheet.has_column(&arguments.column) {
        eprintln!(
            "⚠ Column '{}' not found in sheet '{}'; every record will be reported as invalid.",
            arguments.column, sheet.name
        );
    }

    let outcome = process_records(sheet.records(), &arguments.column);

    let output_file = if outcome.has_invalid_records() {
        write_error_to_log(
            "Invalid Document Report",
            &format_invalid_report(&outcome.invalid_records, &arguments.column),
        );

        if let Err(e) = write_invalid_records(&arguments.output, &outcome.invalid_records) {
            write_error_to_log("Spreadsheet Write Error", &e.to_string());
            eprintln!("❌ Failed to write {}: {e}", arguments.output);
            eprintln!("❌ Check {} for details.", ERRORS_LOG_FILE);
            std::process::exit(1);
        }

        if let Some(csv_output) = &arguments.csv_output {
            if let Err(e) = export_to_csv(csv_output, &outcome.invalid_records) {
                write_error_to_log("CSV Export Error", &format!("{e:#}"));
                eprintln!("❌ Failed to create CSV file {csv_output}: {e:#}");
                eprintln!("❌ Check {} for details.", ERRORS_LOG_FILE);
                std::process::exit(1);
            }
            println!("✅ CSV file created: {csv_output}");
        }

        Some(arguments.output.as_str())
    } else {
        None
    };

    print!("{}", SummaryReport::from_outcome(&outcome, output_file));

    Ok(())
}
