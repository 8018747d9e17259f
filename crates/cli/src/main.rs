use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use meeting_core::{AgencyConfig, FetchedPage, MeetingPageParser};
use schemars::schema_for;
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bcpc")]
#[command(about = "Burleigh County Planning & Zoning Commission meeting scraper", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an already-fetched meetings page and print one JSON record per line
    Parse {
        /// HTML file to read, or "-" for stdin
        #[arg(long)]
        html: PathBuf,
        /// URL the page was fetched from (base for relative links)
        #[arg(long)]
        url: Option<String>,
        /// Agency override file (.toml, .yaml or .yml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Local wall-clock time used for status, e.g. 2023-07-01T00:00:00
        #[arg(long)]
        now: Option<NaiveDateTime>,
    },
    /// Export canonical JSON Schemas to the ./schemas directory
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Export JSON Schema files for the record types
    Export {
        /// Output directory (default: ./schemas)
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            html,
            url,
            config,
            now,
        } => parse(html, url, config, now),
        Commands::Schema { command } => match command {
            SchemaCommands::Export { out_dir } => schema_export(out_dir),
        },
    }
}

fn parse(
    html_path: PathBuf,
    url: Option<String>,
    config_path: Option<PathBuf>,
    now: Option<NaiveDateTime>,
) -> Result<()> {
    let agency = match config_path {
        Some(path) => AgencyConfig::load_from_path(&path)?,
        None => AgencyConfig::default(),
    };
    let url = url.unwrap_or_else(|| agency.start_url.clone());

    let html = if html_path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read html from stdin")?;
        buf
    } else {
        fs::read_to_string(&html_path)
            .with_context(|| format!("failed to read {}", html_path.display()))?
    };

    let page = FetchedPage::new(&url, &html)?;
    let parser = MeetingPageParser::new(agency);
    let now = now.unwrap_or_else(|| Local::now().naive_local());
    let records = parser
        .parse_at(&page, now)
        .with_context(|| format!("failed to parse meetings from {url}"))?;

    let mut out = BufWriter::new(io::stdout().lock());
    for record in &records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    tracing::info!(count = records.len(), %url, "wrote meetings");
    Ok(())
}

fn schema_export(out_dir: PathBuf) -> Result<()> {
    fs::create_dir_all(&out_dir)?;

    let record_schema = schema_for!(meeting_core::MeetingRecord);
    let record_json = serde_json::to_string_pretty(&record_schema)?;
    fs::write(out_dir.join("MeetingRecord.schema.json"), record_json)?;

    let link_schema = schema_for!(meeting_core::Link);
    let link_json = serde_json::to_string_pretty(&link_schema)?;
    fs::write(out_dir.join("Link.schema.json"), link_json)?;

    let location_schema = schema_for!(meeting_core::Location);
    let location_json = serde_json::to_string_pretty(&location_schema)?;
    fs::write(out_dir.join("Location.schema.json"), location_json)?;

    let agency_schema = schema_for!(meeting_core::AgencyConfig);
    let agency_json = serde_json::to_string_pretty(&agency_schema)?;
    fs::write(out_dir.join("AgencyConfig.schema.json"), agency_json)?;

    println!("Exported schemas to {}", out_dir.display());
    Ok(())
}
