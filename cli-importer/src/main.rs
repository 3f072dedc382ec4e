use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use g11_parser::{FixedWidthFile, G11Import, G11Parser, ParseError};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "cli_importer",
    version,
    about = "Разбирает выписку Postfinance G11 и выводит операции.",
    long_about = None,
)]
struct Args {
    /// Входной файл
    #[arg(long)]
    input: PathBuf,

    /// Формат вывода
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output_format: OutputFormat,

    /// Дата выписки YYYY-MM-DD (по умолчанию сегодня)
    #[arg(long)]
    statement_date: Option<NaiveDate>,

    /// Завершаться с кодом 2, если число операций не сходится с трейлером
    #[arg(long)]
    strict: bool,
}

/// Поддерживаемые форматы вывода
#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
}

fn main() {
    env_logger::init();

    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(2),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}

fn write_text<W: Write>(mut out: W, import: &G11Import) -> io::Result<()> {
    writeln!(out, "type: {}", import.ftype)?;
    writeln!(out, "currency: {}", import.currency_code)?;
    for statement in &import.statements {
        write!(out, "{statement}")?;
    }
    writeln!(out, "valid: {}", import.valid)
}

/// `Ok(false)` только при несовпадении счётчиков в режиме `--strict`
fn run() -> Result<bool, ParseError> {
    let args = Args::parse();

    if !args.input.exists() {
        eprintln!("input file does not exist: {}", args.input.display());
        process::exit(1)
    }

    let file = File::open(&args.input).unwrap_or_else(|err| {
        eprintln!("failed to open input file {}: {err}", args.input.display());
        process::exit(1);
    });

    let data = FixedWidthFile::parse(io::BufReader::new(file))?;

    let mut parser = G11Parser::new();
    if let Some(date) = args.statement_date {
        parser = parser.with_statement_date(date);
    }

    if !parser.file_is_known(&data) {
        eprintln!("not a G11 file: {}", args.input.display());
        process::exit(1)
    }

    let import = parser.import(&data)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match args.output_format {
        OutputFormat::Text => write_text(&mut handle, &import)?,
        OutputFormat::Csv => {
            for statement in &import.statements {
                statement.write_csv(&mut handle)?;
            }
        }
    }

    if !import.valid {
        eprintln!("warning: transaction count does not match the trailer");
        return Ok(!args.strict);
    }

    Ok(true)
}
