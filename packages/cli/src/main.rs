#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for parliamentary contact extraction.
//!
//! Without a subcommand an interactive menu is shown. Log output is routed
//! through `indicatif::MultiProgress` (via
//! [`parl_contacts_cli_utils::init_logger`]) so that log lines and
//! progress bars never fight for the terminal.

mod interactive;
mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use parl_contacts_models::Role;

use crate::pipeline::ScrapeSources;

#[derive(Parser)]
#[command(
    name = "parl_contacts",
    about = "Contact records from the parliamentary members directories"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a directory that has already been downloaded
    Parse {
        /// Extracted directory text, or the PDF itself (by `.pdf` extension)
        input: PathBuf,
        /// Chamber the directory belongs to (`senator` or `representative`)
        #[arg(long)]
        role: Role,
        /// Layout TOML to use instead of the embedded one
        #[arg(long)]
        layout: Option<PathBuf>,
        /// Write JSON to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Download a directory PDF and extract its records
    Fetch {
        /// URL of the directory PDF
        url: String,
        /// Chamber the directory belongs to (`senator` or `representative`)
        #[arg(long)]
        role: Role,
        /// Layout TOML to use instead of the embedded one
        #[arg(long)]
        layout: Option<PathBuf>,
        /// Write JSON to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Merge the member listing CSV with the web table and the directories
    Scrape {
        /// URL of the member listing CSV (the base record set)
        #[arg(long)]
        csv_url: String,
        /// Phone column of the CSV
        #[arg(long, default_value = "Phone")]
        csv_phone_column: String,
        /// The CSV is gzip-compressed
        #[arg(long)]
        csv_gzip: bool,
        /// Field delimiter of the CSV
        #[arg(long, default_value_t = ',')]
        csv_delimiter: char,
        /// URL of the web page holding the member table
        #[arg(long)]
        web_url: Option<String>,
        /// CSS selector of the member table on the web page
        #[arg(long, default_value = "table")]
        web_table_selector: String,
        /// Phone column of the web table
        #[arg(long, default_value = "Phone")]
        web_phone_column: String,
        /// URL of the Senate directory PDF
        #[arg(long)]
        senate_url: Option<String>,
        /// Layout TOML for the Senate directory
        #[arg(long)]
        senate_layout: Option<PathBuf>,
        /// URL of the House of Representatives directory PDF
        #[arg(long)]
        representatives_url: Option<String>,
        /// Layout TOML for the House of Representatives directory
        #[arg(long)]
        representatives_layout: Option<PathBuf>,
        /// Write JSON to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Do not draw progress bars
        #[arg(long)]
        no_progress: bool,
    },
    /// Print the embedded directory layouts as TOML
    Layouts {
        /// Only print the layout for this chamber
        #[arg(long)]
        role: Option<Role>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = parl_contacts_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi).await;
    };

    match command {
        Commands::Parse {
            input,
            role,
            layout,
            output,
        } => {
            let layout = pipeline::resolve_layout(role, layout.as_deref())?;
            let text = parl_contacts_pdf::download::read_document_text(&input)?;
            let parsed = parl_contacts_pdf::parse_document(&text, &layout)?;
            pipeline::write_json(&parsed.records, output.as_deref())?;
        }
        Commands::Fetch {
            url,
            role,
            layout,
            output,
        } => {
            let layout = pipeline::resolve_layout(role, layout.as_deref())?;
            let parsed = pipeline::fetch_directory(&multi, &url, layout).await?;
            pipeline::write_json(&parsed.records, output.as_deref())?;
        }
        Commands::Scrape {
            csv_url,
            csv_phone_column,
            csv_gzip,
            csv_delimiter,
            web_url,
            web_table_selector,
            web_phone_column,
            senate_url,
            senate_layout,
            representatives_url,
            representatives_layout,
            output,
            no_progress,
        } => {
            let csv_delimiter = u8::try_from(csv_delimiter)
                .map_err(|_| format!("CSV delimiter {csv_delimiter:?} is not a single byte"))?;
            let sources = ScrapeSources {
                csv_url,
                csv_phone_column,
                csv_gzip,
                csv_delimiter,
                web_url,
                web_table_selector,
                web_phone_column,
                senate_url,
                senate_layout,
                representatives_url,
                representatives_layout,
            };
            let progress = if no_progress { None } else { Some(&multi) };
            let merged = pipeline::scrape(progress, &sources).await?;
            pipeline::write_json(&merged, output.as_deref())?;
        }
        Commands::Layouts { role } => {
            let roles = role.map_or_else(|| Role::all().to_vec(), |role| vec![role]);
            for role in roles {
                let layout = parl_contacts_pdf::default_layout(role);
                println!("# {role}");
                println!("{}", parl_contacts_pdf::render_layout(&layout)?);
            }
        }
    }

    Ok(())
}
