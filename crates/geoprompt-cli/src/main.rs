// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use geoprompt_core::history::HistoryManager;
use geoprompt_core::{AppConfig, ConversationContext, QueryProcessor, SceneRecorder};
use geoprompt_nlp::{Clarifier, IntentResult, IntentSource, PatternExtractor, Vocabulary};
use serde_json::json;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config.json (defaults to the user config directory)
    #[arg(long, env = "GEOPROMPT_CONFIG")]
    config: Option<PathBuf>,

    /// Mapbox access token for geocoding and directions [env: MAPBOX_ACCESS_TOKEN]
    #[arg(long)]
    mapbox_token: Option<String>,

    /// Gemini API key for the remote intent classifier [env: GEMINI_API_KEY]
    #[arg(long)]
    gemini_key: Option<String>,

    /// Use only the built-in gazetteer and pattern rules
    #[arg(long)]
    offline: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pattern rules only and print the intent as JSON
    Parse {
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// Run the full pipeline and print the intent and the drawn map scene
    Show {
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// Interactive session with follow-ups ("add Lyon", "same but by bike")
    Repl,
    /// List recent queries
    History {
        /// Delete the stored history
        #[arg(long)]
        clear: bool,
    },
}

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logging")
}

/// Config file, then environment, then command-line flags.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            log::debug!("[CLI] Loading config from {:?}", path);
            let mut config = AppConfig::load_from(path)?;
            config.apply_env();
            config
        }
        None => {
            log::debug!("[CLI] Loading config from {:?}", AppConfig::default_path());
            AppConfig::load()?
        }
    };
    if let Some(token) = &cli.mapbox_token {
        config.mapbox_token = Some(token.clone());
    }
    if let Some(key) = &cli.gemini_key {
        config.gemini_api_key = Some(key.clone());
    }
    if cli.offline {
        log::info!("[CLI] Offline mode: gazetteer and pattern rules only");
        config.mapbox_token = None;
        config.remote_classifier_enabled = false;
    }
    Ok(config)
}

fn describe(result: &IntentResult) -> String {
    let mut line = format!(
        "{:?} ({:?}): {}",
        result.visualization_type,
        result.source,
        result.location_names().join(" -> ")
    );
    if let Some(mode) = result.travel_mode {
        line.push_str(&format!(" [{:?}]", mode));
    }
    line
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    let config = load_config(&cli)?;
    let vocab = Vocabulary::load();

    match &cli.command {
        Commands::Parse { query } => {
            let query = query.join(" ");
            let extractor = PatternExtractor::with_vocabulary(vocab.clone());
            let clarifier = Clarifier::new(vocab);
            let mut result = extractor.extract_or_default(&query);
            clarifier.apply(&query, &mut result);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Show { query } => {
            let query = query.join(" ");
            let processor = QueryProcessor::from_config(&config, vocab)?;
            let result = processor.process(&query).await;
            if result.source == IntentSource::Default {
                eprintln!("{}", result.message);
            }
            let mut map = SceneRecorder::new();
            let output = match processor.render(&result, &mut map).await {
                Ok(outcome) => json!({
                    "intent": result,
                    "render": outcome,
                    "summary": outcome.summary(),
                    "scene": map.to_json(),
                }),
                Err(e) => json!({"intent": result, "error": e.to_string()}),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Repl => {
            let processor = QueryProcessor::from_config(&config, vocab)?;
            let mut ctx = ConversationContext::new();
            let mut map = SceneRecorder::new();
            println!("geoprompt session {} (:reset, :quit)", ctx.session_id);
            let stdin = io::stdin();
            loop {
                print!("> ");
                io::stdout().flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                match line.trim() {
                    "" => continue,
                    ":quit" | ":q" | "exit" => break,
                    ":reset" => {
                        ctx.reset();
                        println!("new session {}", ctx.session_id);
                        continue;
                    }
                    query => {
                        let result = processor.process_in_context(query, &mut ctx).await;
                        println!("{}", describe(&result));
                        if let Some(clarification) = &result.clarification {
                            println!("  ? {}", clarification.message);
                            for alt in &clarification.alternatives {
                                println!("    - {}", alt);
                            }
                        }
                        match processor.render(&result, &mut map).await {
                            Ok(outcome) => {
                                println!("  {}", outcome.summary());
                                if let Some(message) = &outcome.message {
                                    println!("  ! {}", message);
                                }
                            }
                            Err(e) => println!("  ! {}", e),
                        }
                    }
                }
            }
        }
        Commands::History { clear } => {
            let history = HistoryManager::new().with_limit(config.history_limit);
            if *clear {
                history.clear()?;
                println!("Search history cleared.");
            } else {
                let entries = history.load()?;
                if entries.is_empty() {
                    println!("No searches yet.");
                }
                for (i, entry) in entries.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, entry);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"mapbox_token": "from-file", "gemini_model": "gemini-test"}"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "geoprompt",
            "--config",
            path.to_str().unwrap(),
            "--mapbox-token",
            "from-flag",
            "history",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.mapbox_token.as_deref(), Some("from-flag"));
        assert_eq!(config.gemini_model, "gemini-test");

        let cli = Cli::parse_from([
            "geoprompt",
            "--config",
            path.to_str().unwrap(),
            "--offline",
            "history",
        ]);
        let config = load_config(&cli).unwrap();
        assert!(config.mapbox_token.is_none());
        assert!(!config.remote_classifier_enabled);
    }
}
