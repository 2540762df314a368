//! Chatdown - render untrusted chat-message markdown into sanitized HTML.
//!
//! # Usage
//!
//! ```bash
//! chatdown message.md
//! chatdown --fragment message.md
//! chatdown --copy 0 message.md
//! cat message.md | chatdown -
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use chatdown::clipboard::{copy_code, copy_targets};
use chatdown::config::{
    clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags, ConfigFlags, ThemeMode,
};
use chatdown::document::{page, render_message};
use chatdown::highlight::HighlightBackground;

/// Render untrusted chat-message markdown into sanitized HTML
#[derive(Parser, Debug)]
#[command(name = "chatdown", version, about, long_about = None)]
struct Cli {
    /// Markdown file to render, or '-' for stdin
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the sanitized fragment without the page wrapper
    #[arg(long)]
    fragment: bool,

    /// Page title for the full-page wrapper
    #[arg(long, default_value = "Message")]
    title: String,

    /// Highlight stylesheet background
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Copy code block N (zero-based) to the system clipboard instead of printing
    #[arg(long, value_name = "N")]
    copy: Option<usize>,

    /// Save current command-line flags as defaults in .chatdownrc
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in .chatdownrc
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let source = read_source(&cli.file)?;
    let html = render_message(&source);

    if let Some(index) = cli.copy {
        let targets = copy_targets(&html);
        let Some(target) = targets.get(index) else {
            anyhow::bail!("no code block {index} (document has {})", targets.len());
        };
        copy_code(target);
        eprintln!("Copied code block {index}");
        return Ok(());
    }

    if effective.fragment {
        println!("{html}");
    } else {
        let mode = match effective.theme.unwrap_or(ThemeMode::Dark) {
            ThemeMode::Light => HighlightBackground::Light,
            ThemeMode::Dark => HighlightBackground::Dark,
        };
        print!("{}", page(&html, &cli.title, mode));
    }

    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
