//! Print or write the TasteTrail OpenAPI document as pretty JSON.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tastetrail::ApiDoc;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Emit the OpenAPI document for the TasteTrail API",
    version
)]
struct CliArgs {
    /// Write to this file instead of standard output.
    #[arg(long, short, value_name = "path")]
    output: Option<PathBuf>,
}

fn write_document(path: &Path, document: &str) -> Result<()> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| color_eyre::eyre::eyre!("{} has no file name", path.display()))?;
    Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.write(name, document))
        .wrap_err_with(|| format!("failed to write {}", path.display()))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let document = ApiDoc::openapi().to_pretty_json()?;
    match args.output {
        Some(path) => write_document(&path, &document),
        None => {
            println!("{document}");
            Ok(())
        }
    }
}
