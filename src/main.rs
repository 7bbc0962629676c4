//! lexifetch - dictionary, translation, and slang lookups as launcher items
//!
//! Each invocation answers one query and writes a single JSON document to
//! stdout. Any failure while producing items is converted into an error
//! item rather than a crash; diagnostics go to stderr so stdout stays
//! machine-readable.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lexifetch::adapters::{DictionaryClient, SlangClient, TargetLang, TranslateClient};
use lexifetch::cache::Fetcher;
use lexifetch::config::{self, FetchConfig, Settings};
use lexifetch::error::QueryError;
use lexifetch::output::{Item, Response};
use lexifetch::player;

/// Dictionary, translation, and slang lookups for a launcher UI
#[derive(Parser, Debug)]
#[command(name = "lexifetch")]
#[command(about = "Look up definitions, translations, and slang as launcher items")]
#[command(version)]
struct Cli {
    /// Cache directory for API responses (overrides the cachedir env var)
    #[arg(long, value_name = "DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// Cache responses in the platform default cache directory
    #[arg(long, global = true)]
    cache: bool,

    /// Cache expiry: integer seconds or <number><unit>, unit one of w/d/h/m/s
    #[arg(long, value_name = "DURATION", global = true)]
    cache_timeout: Option<String>,

    /// Proxy URL, applied to both http and https
    #[arg(long, value_name = "URL", global = true)]
    proxy: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look a word up in the Merriam-Webster collegiate dictionary
    Define {
        /// Word to define; omit for an empty result list
        word: Option<String>,
    },
    /// Translate text via Google Translate
    Translate {
        /// Target language code: en or zh-CN
        lang: String,
        /// Text to translate; omit for an empty result list
        query: Option<String>,
    },
    /// Look a term up on Urban Dictionary
    Slang {
        /// Term to look up; omit for an empty result list
        term: Option<String>,
    },
    /// Play a downloaded pronunciation audio file
    Play {
        /// Path of the audio file to play
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // Playback is an action on an already-produced item; it runs outside the
    // JSON response boundary.
    if let Command::Play { path } = &cli.command {
        player::play(path)?;
        return Ok(());
    }

    let response = match run(&cli) {
        Ok(items) => Response::new(items),
        Err(err) => Response::from_error(&err),
    };

    // The launcher consumes stdout; emit the document without a trailing newline
    let json = serde_json::to_string(&response)?;
    print!("{json}");
    io::stdout().flush()?;
    Ok(())
}

/// Produces the display items for the requested query
fn run(cli: &Cli) -> Result<Vec<Item>, QueryError> {
    let settings = Settings::from_env()?;
    let fetcher = Fetcher::new(fetch_config(cli, &settings)?)?;

    match &cli.command {
        Command::Define { word: None }
        | Command::Translate { query: None, .. }
        | Command::Slang { term: None } => Ok(Vec::new()),
        Command::Define { word: Some(word) } => {
            DictionaryClient::new().query(&fetcher, settings.mw_api_key.as_deref(), word)
        }
        Command::Translate {
            lang,
            query: Some(query),
        } => {
            let lang = TargetLang::parse(lang)?;
            TranslateClient::new().query(&fetcher, lang, query)
        }
        Command::Slang { term: Some(term) } => SlangClient::new().query(&fetcher, term),
        Command::Play { .. } => Ok(Vec::new()), // handled before the boundary
    }
}

/// Merges CLI flags over environment settings into a fetch configuration
fn fetch_config(cli: &Cli, settings: &Settings) -> Result<FetchConfig, QueryError> {
    let requested_dir = match (&cli.cache_dir, &settings.cache_dir, cli.cache) {
        (Some(dir), _, _) => Some(dir.clone()),
        (None, Some(dir), _) => Some(dir.clone()),
        (None, None, true) => Some(config::default_cache_dir()?),
        (None, None, false) => None,
    };
    let cache_dir = requested_dir
        .map(|dir| config::resolve_cache_dir(&dir))
        .transpose()?;

    let cache_timeout = match &cli.cache_timeout {
        Some(raw) => Some(config::parse_cache_timeout(raw)?),
        None => settings.cache_timeout,
    };

    Ok(FetchConfig {
        cache_dir,
        cache_timeout,
        proxy: cli.proxy.clone().or_else(|| settings.proxy.clone()),
        eviction: settings.eviction,
    })
}
