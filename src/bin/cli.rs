#![cfg(not(tarpaulin_include))]

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use deck_upload::config::PanelConfig;
use deck_upload::form::SortColumn;
use deck_upload::preview::{check_submission, preview_reply};
use deck_upload::sample::write_sample_workbook;
use deck_upload::selection::SelectedFile;

#[derive(Parser)]
#[command(name = "deck-upload")]
#[command(about = "Offline companion for the workbook upload page")]
struct Cli {
    /// JSON file with upload_url / download_prefix / fallback_error
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a workbook and visit fields the way the page does
    Check {
        file: PathBuf,

        #[arg(long, default_value = "code site")]
        sort_column: String,

        /// Visit start date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        from: String,

        /// Visit end date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        to: String,

        #[arg(long, default_value = "")]
        purpose: String,
    },
    /// Print what the page shows for a saved upload reply
    Preview {
        response: PathBuf,

        #[arg(long)]
        download_prefix: Option<String>,
    },
    /// Write a test workbook with the columns the server expects
    Sample {
        out: PathBuf,

        /// 27 rows, three of them with a missing value
        #[arg(long)]
        rich: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<PanelConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(PanelConfig::from_json(&fs::read_to_string(path)?)?),
        None => Ok(PanelConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Check {
            file,
            sort_column,
            from,
            to,
            purpose,
        } => {
            let column = SortColumn::from_value(&sort_column)
                .ok_or_else(|| format!("unknown sort column: {}", sort_column))?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let bytes = fs::read(&file)?;
            let report = check_submission(
                SelectedFile::new(name, bytes),
                column,
                &from,
                &to,
                &purpose,
                &config,
            )?;
            print!("{}", report);
        }
        Command::Preview {
            response,
            download_prefix,
        } => {
            if let Some(prefix) = download_prefix {
                config.download_prefix = prefix;
            }
            let body = fs::read_to_string(&response)?;
            print!("{}", preview_reply(&body, &config));
        }
        Command::Sample { out, rich } => {
            let written = write_sample_workbook(&out, rich)?;
            println!("{} ({} octets)", out.display(), written);
        }
    }

    Ok(())
}
