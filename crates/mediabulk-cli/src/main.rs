//! Mediabulk CLI: plan upload forms and run bulk uploads from a JSON catalog.
//!
//! Storage settings come from the environment (see `Config::from_env`).

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mediabulk_cli::{build_context, init_tracing, load_catalog, parse_values, uploaded_files};
use mediabulk_core::models::Principal;
use mediabulk_core::Config;
use mediabulk_services::{AccessGate, ConfigStore};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "mediabulk", about = "Bulk media upload tool")]
struct Cli {
    /// Catalog of bulk configs, content types, form displays and servers
    #[arg(long, default_value = "catalog.json")]
    catalog: PathBuf,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the upload form plan for a bulk config
    Plan {
        /// Bulk config ID
        config: String,
    },
    /// Upload files through a bulk config
    Upload {
        /// Bulk config ID
        config: String,
        /// Files to upload, processed in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Shared field values as a JSON object keyed by field name
        #[arg(long)]
        values: Option<String>,
    },
    /// Check Solr admin access to a search server
    Access {
        /// Search server ID
        server: String,
        /// Principal ID (defaults to anonymous)
        #[arg(long)]
        principal: Option<String>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = Config::from_env().context("Invalid configuration")?;
    tracing::debug!(
        environment = %config.environment,
        production = config.is_production(),
        storage_backend = %config.storage_backend,
        "Configuration loaded"
    );

    let catalog = load_catalog(&cli.catalog).await?;
    let context = build_context(&config, catalog).await?;

    match cli.command {
        Commands::Plan { config } => {
            let plan = context.service.build_form(&config).await?;
            print_json(&plan)?;
        }
        Commands::Upload {
            config,
            files,
            values,
        } => {
            let values = parse_values(values.as_deref())?;
            let files = uploaded_files(&files).await;
            let report = context.service.submit(&config, &files, &values).await?;
            print_json(&report)?;
        }
        Commands::Access { server, principal } => {
            let principal = match principal {
                Some(id) => Principal {
                    id,
                    roles: Vec::new(),
                },
                None => Principal::anonymous(),
            };
            let resolved = context.configs.search_server(&server).await?;
            let result = AccessGate::solr_admin().check_access(&principal, resolved.as_ref());
            print_json(&serde_json::json!({
                "server": server,
                "principal": principal.id,
                "result": result,
            }))?;
        }
    }

    Ok(())
}
