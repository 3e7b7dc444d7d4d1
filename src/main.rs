use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;

use record_parser::{AppConfig, LineParser, Record, RecordCollection, SortOrder};

/// Load person records from text files, drop duplicates, print sorted listings.
#[derive(Debug, Parser)]
#[command(name = "record-parser", version = record_parser::VERSION)]
struct Cli {
    /// Input files (override the configured sources)
    files: Vec<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (csv requires --sort)
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print only this ordering: gender, birthdate, lastname_desc, name, color
    #[arg(short, long, value_parser = parse_sort)]
    sort: Option<SortOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Csv,
    Json,
}

fn parse_sort(name: &str) -> Result<SortOrder, String> {
    SortOrder::from_name(name).ok_or_else(|| format!("unknown sort order: {}", name))
}

/// CSV output is one document with one header row, so it holds a single ordering.
fn check_format(format: Format, sort: Option<SortOrder>) -> Result<()> {
    if format == Format::Csv && sort.is_none() {
        anyhow::bail!("--format csv needs --sort to pick one ordering");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    check_format(cli.format, cli.sort)?;

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.override_sources(cli.files);

    let parser = LineParser::new();
    let mut collection = RecordCollection::new();
    let report = collection.ingest(&config.line_sources(), &parser);

    let sections: Vec<(&str, Vec<&Record>)> = match cli.sort {
        Some(order) => vec![(order.title(), collection.sorted(order))],
        None => vec![
            ("Original collection of distinct records", collection.iter().collect()),
            (SortOrder::GenderThenLastName.title(), collection.sort_by_gender_then_last_name()),
            (SortOrder::DateOfBirth.title(), collection.sort_by_date_of_birth()),
            (SortOrder::LastNameDescending.title(), collection.sort_by_last_name_descending()),
        ],
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (title, records) in &sections {
        write_section(&mut out, cli.format, title, records)
            .with_context(|| format!("Failed to write section: {}", title))?;
    }

    if cli.format == Format::Text {
        writeln!(out, "\n{}", report.summary())?;
    }

    Ok(())
}

fn write_section(out: &mut impl Write, format: Format, title: &str, records: &[&Record]) -> Result<()> {
    match format {
        Format::Text => {
            writeln!(out, "\n{}:", title)?;
            for record in records {
                writeln!(out, "{}", record)?;
            }
        }
        Format::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        Format::Json => {
            let section = serde_json::json!({ "title": title, "records": records });
            serde_json::to_writer(&mut *out, &section)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
