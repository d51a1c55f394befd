//! Command-line interface for the Markus client.

use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use crate::binder::Args;
use crate::client::MarkusClient;
use crate::config::{ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL, HTTP_TIMEOUT_SECS};
use crate::error::Result;
use crate::normalize::ITEMS_KEY;
use crate::registry::Operation;

/// Markus - Query cinema listings from a Markus XML API.
#[derive(Parser)]
#[command(name = "markus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the Markus API
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = HTTP_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format of the result document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List theatre areas.
    Areas,

    /// List languages.
    Languages,

    /// List news article categories.
    ArticleCategories,

    /// List news articles.
    Articles {
        /// Theatre area ID
        #[arg(short, long)]
        area: Option<String>,

        /// Event ID
        #[arg(short, long)]
        event: Option<String>,

        /// Article category ID
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List events now in theatres or coming soon.
    Events {
        /// Theatre area ID
        #[arg(short, long)]
        area: Option<String>,

        /// Event ID
        #[arg(short, long)]
        event: Option<String>,

        /// List upcoming events instead of current ones
        #[arg(long)]
        coming_soon: bool,

        /// Include videos, links, gallery and pictures
        #[arg(long)]
        include_media: bool,
    },

    /// List shows for a period.
    Shows {
        /// First day in YYYY-MM-DD format (default: today on the server)
        #[arg(short, long)]
        date: Option<String>,

        /// Number of days starting at the date
        #[arg(long)]
        days: Option<u32>,

        /// Theatre area ID
        #[arg(short, long)]
        area: Option<String>,

        /// Event ID
        #[arg(short, long)]
        event: Option<String>,
    },

    /// List dates that have shows.
    Schedule {
        /// Theatre area ID
        #[arg(short, long)]
        area: Option<String>,
    },
}

impl Commands {
    /// Operation invoked and the arguments passed to it.
    pub fn to_call(&self) -> (Operation, Args) {
        let mut args = Args::new();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                args.insert(key.to_string(), value);
            }
        };

        let operation = match self {
            Self::Areas => Operation::Areas,
            Self::Languages => Operation::Languages,
            Self::ArticleCategories => Operation::ArticleCategories,
            Self::Articles {
                area,
                event,
                category,
            } => {
                put("area", area.clone().map(Value::from));
                put("event", event.clone().map(Value::from));
                put("category", category.clone().map(Value::from));
                Operation::Articles
            }
            Self::Events {
                area,
                event,
                coming_soon,
                include_media,
            } => {
                put("area", area.clone().map(Value::from));
                put("event", event.clone().map(Value::from));
                put("coming_soon", Some(Value::Bool(*coming_soon)));
                for key in [
                    "include_videos",
                    "include_links",
                    "include_gallery",
                    "include_pictures",
                ] {
                    put(key, Some(Value::Bool(*include_media)));
                }
                Operation::Events
            }
            Self::Shows {
                date,
                days,
                area,
                event,
            } => {
                put("date", date.clone().map(Value::from));
                put("days_from_date", days.map(Value::from));
                put("area", area.clone().map(Value::from));
                put("event", event.clone().map(Value::from));
                Operation::Shows
            }
            Self::Schedule { area } => {
                put("area", area.clone().map(Value::from));
                Operation::Schedule
            }
        };

        (operation, args)
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config =
        ClientConfig::new(&cli.base_url).with_timeout(Duration::from_secs(cli.timeout));
    let client = MarkusClient::from_config(&config)?;
    let (operation, args) = cli.command.to_call();

    query_command(&client, operation, &args, cli.format)
}

/// Execute one operation and print its result.
fn query_command(
    client: &MarkusClient,
    operation: Operation,
    args: &Args,
    format: OutputFormat,
) -> Result<()> {
    eprintln!(
        "{} {} from {}",
        style("Fetching").bold(),
        style(operation).cyan(),
        style(client.base_url()).green()
    );

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Waiting for response...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = match client.call(operation.as_str(), args) {
        Ok(result) => result,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_and_clear();

    let count = result
        .get(ITEMS_KEY)
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    eprintln!("  Items: {}", style(count).green().bold());

    println!("{}", render(&result, format)?);

    Ok(())
}

/// Serialize a result document in the requested format.
pub fn render(result: &Value, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Yaml => serde_yaml_ng::to_string(result)?,
    };
    Ok(text.trim_end().to_string())
}
