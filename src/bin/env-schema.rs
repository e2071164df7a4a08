//! env-schema CLI — check a deployment's environment before it boots.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use env_schema::config::schema::RULES;
use env_schema::telemetry::init_logging;
use env_schema::{Config, RawEnv};

#[derive(Parser)]
#[command(name = "env-schema", about = "Validate service configuration from the environment")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the environment and print the resolved configuration
    Check {
        /// Dotenv file layered under the process environment
        #[arg(long)]
        env_file: Option<PathBuf>,
        /// Print the redacted configuration as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print every recognized key with its type and default
    Schema,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check { env_file, json } => cmd_check(env_file, json),
        Command::Schema => {
            cmd_schema();
            Ok(())
        }
    }
}

fn cmd_check(env_file: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let raw = match env_file {
        Some(path) => RawEnv::from_std_env().overlay(RawEnv::from_dotenv_file(&path)?),
        None => {
            dotenvy::dotenv().ok();
            RawEnv::from_std_env()
        }
    };

    let config = match Config::from_raw(&raw) {
        Ok(config) => config,
        Err(failure) => {
            eprintln!("{failure}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging)?;
    tracing::info!(
        node_env = %config.app.node_env,
        port = config.app.port,
        llm_provider = %config.llm.provider,
        "configuration valid"
    );
    if config.llm.api_key().is_none() {
        tracing::warn!(provider = %config.llm.provider, "no API key set for LLM provider");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&config.to_redacted_json())?);
    } else {
        println!(
            "OK: {} on port {} (db {}@{}:{}/{}, redis {}:{})",
            config.app.node_env,
            config.app.port,
            config.database.username,
            config.database.host,
            config.database.port,
            config.database.name,
            config.cache.host,
            config.cache.port,
        );
    }

    Ok(())
}

fn cmd_schema() {
    println!(
        "{:<24}  {:<11}  {:<36}  {:<24}  NOTES",
        "KEY", "GROUP", "TYPE", "DEFAULT"
    );
    println!("{}", "-".repeat(110));

    for rule in RULES {
        let mut notes = rule.help.to_string();
        if rule.secret {
            if !notes.is_empty() {
                notes.push_str("; ");
            }
            notes.push_str("secret");
        }
        println!(
            "{:<24}  {:<11}  {:<36}  {:<24}  {}",
            rule.key,
            rule.group.to_string(),
            rule.describe_type(),
            rule.describe_default(),
            notes
        );
    }

    println!("\n{} key(s)", RULES.len());
}
