//! Command-line front end for article extraction.
//!
//! JSON and rendered prompts go to stdout; logs and the status summary go to
//! stderr.

mod config;

use anyhow::{Context, Result};
use article_extraction::{
    truncate_text, ExtractionResult, FieldStatus, Pipeline, PromptVariables,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CliConfig;

/// Characters of each value shown by `variables`.
const PREVIEW_CHARS: usize = 100;

#[derive(Parser)]
#[command(name = "article-cli")]
#[command(about = "Extract article text, outline, bylines and internal links")]
struct Cli {
    /// TOML file with [pipeline] and [profile] tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one article and print the result as JSON
    Extract {
        url: String,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the prompt variables for an article
    Variables { url: String },

    /// Render a prompt template with an article's variables
    Render {
        url: String,
        /// Template file using {name} placeholders
        #[arg(long)]
        template: PathBuf,
        /// Extra variable, as key=value
        #[arg(long = "var", value_parser = parse_key_value)]
        vars: Vec<(String, String)>,
        /// Extra variable read from a file, as key=path
        #[arg(long = "var-file", value_parser = parse_key_value)]
        var_files: Vec<(String, String)>,
    },
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {:?}", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in {:?}", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,article_extraction=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    tracing::debug!(
        config = ?cli.config,
        profile = %config.profile.name,
        "Loaded configuration"
    );
    let pipeline = Pipeline::http(config.pipeline, config.profile)
        .context("Failed to build extraction pipeline")?;

    match cli.command {
        Commands::Extract { url, compact } => {
            let result = pipeline.run(&url).await;
            print_status(&result);
            let json = if compact {
                serde_json::to_string(&result)?
            } else {
                serde_json::to_string_pretty(&result)?
            };
            println!("{}", json);
        }

        Commands::Variables { url } => {
            let result = pipeline.run(&url).await;
            print_status(&result);
            let vars = PromptVariables::from_result(&result);
            for (name, value) in vars.iter() {
                println!(
                    "{} {}",
                    format!("{}:", name).bright_cyan().bold(),
                    truncate_text(value, PREVIEW_CHARS).replace('\n', " ")
                );
            }
        }

        Commands::Render {
            url,
            template,
            vars,
            var_files,
        } => {
            let template_text = std::fs::read_to_string(&template)
                .with_context(|| format!("Failed to read template {}", template.display()))?;

            let result = pipeline.run(&url).await;
            print_status(&result);

            let mut variables = PromptVariables::from_result(&result);
            for (key, value) in vars {
                variables.insert(key, value);
            }
            for (key, path) in var_files {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read variable file {}", path))?;
                variables.insert(key, contents);
            }

            let rendered = variables
                .render(&template_text)
                .with_context(|| format!("Failed to render {}", template.display()))?;
            println!("{}", rendered);
        }
    }

    Ok(())
}

fn print_status(result: &ExtractionResult) {
    let groups = [
        ("page", &result.status.page),
        ("contributors", &result.status.contributors),
        ("headers", &result.status.headers),
        ("internal_links", &result.status.internal_links),
    ];

    eprintln!("{}", result.article_url.bold());
    for (name, status) in groups {
        let label = match status {
            FieldStatus::Ok => "ok".green().to_string(),
            FieldStatus::Absent => "absent".yellow().to_string(),
            FieldStatus::Failed { reason } => format!("failed: {}", reason).red().to_string(),
        };
        eprintln!("  {:<15} {}", name, label);
    }
}
