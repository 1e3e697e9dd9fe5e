use anyhow::{Context, Result};
use colored::Colorize;
use sitelens::commands::command_argument_builder;
use sitelens::handlers::{
    handle_delete, handle_list, handle_reanalyze, handle_show, handle_submit, handle_ui,
    log_file_path, print_banner, quiet_from_args,
};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// The TUI owns the terminal, so its logs go to a file instead of stderr.
fn init_tracing(ui: bool, quiet: bool) -> Result<()> {
    if ui {
        let path = log_file_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter("info"))
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter(if quiet { "error" } else { "warn" }))
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = quiet_from_args(&chosen_command);
    let ui = matches!(chosen_command.subcommand(), Some(("ui", _)));

    if let Err(e) = init_tracing(ui, quiet) {
        eprintln!("{} {:#}", "⚠".yellow().bold(), e);
    }

    // Show banner unless --quiet flag is set
    if !quiet && !ui {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("ui", primary_command)) => handle_ui(primary_command).await,
        Some(("submit", primary_command)) => handle_submit(primary_command, quiet).await,
        Some(("list", primary_command)) => handle_list(primary_command, quiet).await,
        Some(("show", primary_command)) => handle_show(primary_command, quiet).await,
        Some(("delete", primary_command)) => handle_delete(primary_command, quiet).await,
        Some(("reanalyze", primary_command)) => handle_reanalyze(primary_command, quiet).await,
        // No subcommand provided, just show the banner
        None => Ok(()),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

