use std::io::{self, Write};

use crate::config::Config;
use crate::error::{PlanError, Result};

pub fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        print!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Caplan Configuration");
    println!("====================\n");

    let site = prompt("Tracker site URL (e.g. https://acme.atlassian.net): ")?;
    if site.is_empty() {
        return Err(PlanError::MissingSite);
    }

    let email = prompt("Account email: ")?;
    if email.is_empty() {
        return Err(PlanError::MissingEmail);
    }

    let api_token = prompt("API token: ")?;
    if api_token.is_empty() {
        return Err(PlanError::MissingApiToken);
    }

    let default_project = prompt("Default project key (e.g. PROJ) [optional]: ")?;
    let board = prompt("Agile board id for sprint data [optional]: ")?;

    // Create config directory if it doesn't exist
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PlanError::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;
    }

    let mut config_content = format!(
        "site = \"{site}\"\nemail = \"{email}\"\napi_token = \"{api_token}\"\n"
    );
    if !default_project.is_empty() {
        config_content.push_str(&format!("default_project = \"{default_project}\"\n"));
    }
    if let Ok(board) = board.parse::<u64>() {
        config_content.push_str(&format!("board = {board}\n"));
    }

    std::fs::write(&config_path, config_content).map_err(|e| PlanError::ConfigRead {
        path: config_path.clone(),
        source: e,
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("Connect a project with 'caplan source connect <PROJECT>'");

    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
