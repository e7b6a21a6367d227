use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tagmark_core::{RenderSettings, markdown_to_html_sanitized, markdown_to_rich_text_with};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "tagmark")]
#[command(about = "Convert lightweight markdown into rich text tags")]
#[command(version)]
struct Cli {
    /// Settings file (TOML); may name a preset of its own
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Built-in settings preset: rich-text or html (a config file names its own)
    #[arg(short, long, default_value = "rich-text", value_name = "NAME", conflicts_with = "config")]
    preset: String,

    /// Render with the HTML preset and strip anything outside the allow-list
    #[arg(long, conflicts_with_all = ["config", "preset"])]
    sanitized: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Markdown file to convert (reads stdin when omitted)
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(cli.verbose);

    let source = read_source(cli.input.as_deref())?;
    let output = if cli.sanitized {
        markdown_to_html_sanitized(&source)
    } else {
        let settings = load_settings(&cli)?;
        markdown_to_rich_text_with(&source, &settings)
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("failed to write output")?;
    stdout.flush().context("failed to flush output")?;
    Ok(())
}

fn load_settings(cli: &Cli) -> Result<RenderSettings> {
    match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "loading settings");
            RenderSettings::load(path)
                .with_context(|| format!("invalid settings in {}", path.display()))
        }
        None => RenderSettings::preset(&cli.preset).context("failed to select preset"),
    }
}

fn read_source(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn initialize_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = if verbose {
        EnvFilter::new("tagmark_core=debug,tagmark_cli=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tagmark_core=info,tagmark_cli=info"))
    };

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init();
}
