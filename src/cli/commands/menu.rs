use std::fs;
use std::path::PathBuf;

use clap::Subcommand;
use serde_json::Value;

use crate::cli::utils::{format_menu_tree, output_success};
use crate::cli::OutputFormat;
use crate::menu::{build_menu_tree_from_value, count_nodes};

#[derive(Subcommand)]
pub enum MenuCommands {
    #[command(about = "Build a menu tree from a JSON array of flat menu records")]
    Tree {
        #[arg(help = "Path to the JSON file, or - for stdin")]
        file: PathBuf,
    },
}

pub async fn handle(cmd: MenuCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        MenuCommands::Tree { file } => {
            let content = if file.as_os_str() == "-" {
                std::io::read_to_string(std::io::stdin())?
            } else {
                fs::read_to_string(&file)?
            };
            let payload: Value = serde_json::from_str(&content)?;
            let tree = build_menu_tree_from_value(&payload);

            match output_format {
                OutputFormat::Json => {
                    let message = format!("{} menu records", count_nodes(&tree));
                    output_success(&output_format, &message, Some(serde_json::to_value(&tree)?))
                }
                OutputFormat::Text => {
                    print!("{}", format_menu_tree(&tree));
                    Ok(())
                }
            }
        }
    }
}
