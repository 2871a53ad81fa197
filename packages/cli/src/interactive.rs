//! Interactive menu for the contact extraction tool.
//!
//! Provides a menu-driven interface using `dialoguer` for running the
//! subcommands without memorizing their flags.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use parl_contacts_cli_utils::MultiProgress;
use parl_contacts_models::Role;

use crate::pipeline::{self, ScrapeSources};

/// Top-level actions available in the interactive menu.
enum Action {
    ParseFile,
    FetchDirectory,
    MergeSources,
    ShowLayouts,
}

impl Action {
    const ALL: &[Self] = &[
        Self::ParseFile,
        Self::FetchDirectory,
        Self::MergeSources,
        Self::ShowLayouts,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ParseFile => "Parse a downloaded directory",
            Self::FetchDirectory => "Fetch a directory PDF",
            Self::MergeSources => "Merge all sources",
            Self::ShowLayouts => "Show directory layouts",
        }
    }
}

/// Runs the interactive menu, prompting the user to select and configure
/// an action.
///
/// # Errors
///
/// Returns an error if a prompt or the selected action fails.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::ParseFile => {
            let input: String = Input::new()
                .with_prompt("Directory text or PDF file")
                .interact_text()?;
            let role = prompt_role()?;
            let layout = pipeline::resolve_layout(role, None)?;
            let text = parl_contacts_pdf::download::read_document_text(&PathBuf::from(input))?;
            let parsed = parl_contacts_pdf::parse_document(&text, &layout)?;
            pipeline::write_json(&parsed.records, prompt_output()?.as_deref())?;
        }
        Action::FetchDirectory => {
            let role = prompt_role()?;
            let url: String = Input::new()
                .with_prompt("Directory PDF URL")
                .interact_text()?;
            let layout = pipeline::resolve_layout(role, None)?;
            let parsed = pipeline::fetch_directory(multi, &url, layout).await?;
            pipeline::write_json(&parsed.records, prompt_output()?.as_deref())?;
        }
        Action::MergeSources => {
            let sources = ScrapeSources {
                csv_url: Input::new()
                    .with_prompt("Member listing CSV URL")
                    .interact_text()?,
                csv_phone_column: Input::new()
                    .with_prompt("CSV phone column")
                    .default("Phone".to_owned())
                    .interact_text()?,
                csv_gzip: Confirm::new()
                    .with_prompt("Is the CSV gzip-compressed?")
                    .default(false)
                    .interact()?,
                csv_delimiter: b',',
                web_url: prompt_optional("Web member table URL (empty to skip)")?,
                web_table_selector: Input::new()
                    .with_prompt("Member table CSS selector")
                    .default("table".to_owned())
                    .interact_text()?,
                web_phone_column: Input::new()
                    .with_prompt("Web table phone column")
                    .default("Phone".to_owned())
                    .interact_text()?,
                senate_url: prompt_optional("Senate directory URL (empty to skip)")?,
                senate_layout: None,
                representatives_url: prompt_optional(
                    "House of Representatives directory URL (empty to skip)",
                )?,
                representatives_layout: None,
            };
            let merged = pipeline::scrape(Some(multi), &sources).await?;
            pipeline::write_json(&merged, prompt_output()?.as_deref())?;
        }
        Action::ShowLayouts => {
            for &role in Role::all() {
                println!("# {role}");
                println!(
                    "{}",
                    parl_contacts_pdf::render_layout(&parl_contacts_pdf::default_layout(role))?
                );
            }
        }
    }

    Ok(())
}

fn prompt_role() -> Result<Role, Box<dyn std::error::Error>> {
    let labels: Vec<String> = Role::all().iter().map(ToString::to_string).collect();

    let idx = Select::new()
        .with_prompt("Which chamber?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(Role::all()[idx])
}

fn prompt_output() -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let to_file = Confirm::new()
        .with_prompt("Write the JSON to a file?")
        .default(false)
        .interact()?;

    if !to_file {
        return Ok(None);
    }

    let path: String = Input::new().with_prompt("Output path").interact_text()?;
    Ok(Some(PathBuf::from(path)))
}

fn prompt_optional(prompt: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_owned()))
    }
}
