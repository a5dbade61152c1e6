//! Tabula CLI - SAS7BDAT inspection and export tool

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tabula::prelude::*;
use tabula::ColumnCollector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tabula")]
#[command(author, version, about = "SAS7BDAT dataset inspection and export tool")]
struct Cli {
    /// Log progress to stderr (repeat for more detail; RUST_LOG overrides)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show header fields, page and row counts of a dataset
    Info {
        /// Input .sas7bdat file
        input: PathBuf,
    },

    /// List the columns of a dataset
    Columns {
        /// Input .sas7bdat file
        input: PathBuf,

        /// Print the schema as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the first rows of a dataset as CSV
    #[command(aliases = ["csv", "to-csv"])]
    Head {
        /// Input .sas7bdat file
        input: PathBuf,

        /// Number of rows (0 for all rows)
        #[arg(short = 'n', long, default_value = "10")]
        rows: u64,

        /// Comma-separated column names (default: all columns)
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Count the rows of a dataset
    Count {
        /// Input .sas7bdat file
        input: PathBuf,
    },

    /// List the datasets in a directory
    Tables {
        /// Directory holding .sas7bdat files
        directory: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Info { input } => show_info(&input),
        Commands::Columns { input, json } => list_columns(&input, json),
        Commands::Head {
            input,
            rows,
            columns,
            delimiter,
            output,
        } => head(&input, rows, columns, delimiter, output.as_deref()),
        Commands::Count { input } => count_rows(&input),
        Commands::Tables { directory } => list_tables(&directory),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn open_table(input: &Path) -> Result<SasTable> {
    if !input.is_file() {
        anyhow::bail!("'{}' is not a file", input.display());
    }
    Ok(SasTable::open(input))
}

fn show_info(input: &Path) -> Result<()> {
    let table = open_table(input)?;
    let mut columns = ColumnCollector::new();
    let summary = table
        .read(&mut columns)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    let rows = table
        .count()
        .with_context(|| format!("Failed to count rows of '{}'", input.display()))?;

    let header = &summary.header;
    println!("File: {}", input.display());
    println!("Table: {}", table.name());
    println!("SAS release: {}", header.release);
    println!("Host: {}", header.host);
    println!("Page size: {} bytes", header.page_size);
    println!("Pages: {}", header.page_count);
    println!("Columns: {}", columns.columns().len());
    println!("Rows: {}", rows);

    Ok(())
}

fn list_columns(input: &Path, json: bool) -> Result<()> {
    let table = open_table(input)?;
    let schema = table
        .columns()
        .with_context(|| format!("Failed to read '{}'", input.display()))?;

    if json {
        let text = serde_json::to_string_pretty(schema.columns())
            .context("Failed to serialize columns")?;
        println!("{text}");
        return Ok(());
    }

    for column in schema.columns() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            column.index,
            column.name,
            column.column_type,
            column.length,
            column.label.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn head(
    input: &Path,
    rows: u64,
    columns: Vec<String>,
    delimiter: char,
    output: Option<&Path>,
) -> Result<()> {
    let table = open_table(input)?;

    let mut query = TableQuery::all();
    if !columns.is_empty() {
        query = query.with_columns(columns);
    }
    if rows > 0 {
        query = query.with_max_rows(rows);
    }

    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(|d| d.is_ascii())
        .with_context(|| format!("Delimiter '{delimiter}' is not a single ASCII character"))?;

    let result = table
        .rows(&query)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;

    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create '{}'", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(sink);

    writer
        .write_record(result.columns.iter().map(|c| c.name.as_str()))
        .context("Failed to write CSV header")?;
    for row in &result.rows {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush output")?;

    if let Some(path) = output {
        eprintln!("Wrote {} rows to '{}'", result.rows.len(), path.display());
    }
    Ok(())
}

fn count_rows(input: &Path) -> Result<()> {
    let table = open_table(input)?;
    let rows = table
        .count()
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    println!("{rows}");
    Ok(())
}

fn list_tables(directory: &Path) -> Result<()> {
    let catalog = SasCatalog::open(directory)
        .with_context(|| format!("Failed to open '{}'", directory.display()))?;

    for table in catalog.tables()? {
        match table.columns() {
            Ok(schema) => println!("{}\t{}", table.name(), schema.len()),
            Err(err) => {
                tracing::warn!("skipping {}: {err}", table.path().display());
            }
        }
    }
    Ok(())
}
