use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{error, info};

use entity_search::config::{init_tracing, LogFormat};
use entity_search::records::{load_records, render_summary};
use entity_search::Dependencies;
use entity_search_repository::{IndexSettings, QueryBuilderConfig};

#[derive(Parser)]
#[command(name = "entity-search")]
#[command(about = "Build OpenSearch candidate queries from entity configurations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Entity configuration file (JSON)
    #[arg(long, env = "ENTITY_CONFIG_PATH", global = true)]
    config: Option<PathBuf>,

    /// Number of candidate hits requested per query
    #[arg(long, env = "ENTITY_SEARCH_SIZE", default_value_t = 10, global = true)]
    size: usize,

    /// minimum_should_match applied to optional field clauses
    #[arg(long, default_value = "1", global = true)]
    minimum_should_match: String,

    /// Maximum number of records per batch (0 disables the limit)
    #[arg(long, env = "ENTITY_SEARCH_MAX_BATCH_SIZE", default_value_t = 1000, global = true)]
    max_batch_size: usize,

    /// Keep the source record among its own candidates
    #[arg(long, global = true)]
    include_self: bool,

    /// Log output format (text|json)
    #[arg(long, env = "LOG_FORMAT", default_value = "text", global = true)]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one query per record
    Query {
        /// Records file: one record object or an array of records
        records: PathBuf,
    },
    /// Print index settings and mappings for the entity
    Mappings {
        /// Number of primary shards
        #[arg(long, default_value_t = 1)]
        shards: u32,

        /// Number of replicas
        #[arg(long, default_value_t = 1)]
        replicas: u32,
    },
    /// Validate the entity configuration
    Validate,
}

impl Cli {
    fn query_config(&self) -> QueryBuilderConfig {
        QueryBuilderConfig {
            size: self.size,
            minimum_should_match: Some(self.minimum_should_match.clone()),
            max_batch_size: (self.max_batch_size > 0).then_some(self.max_batch_size),
            exclude_self: !self.include_self,
            ..QueryBuilderConfig::default()
        }
    }
}

fn main() {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let log_format = match cli.log_format.parse::<LogFormat>() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    init_tracing(log_format);

    if let Err(e) = run(cli) {
        error!("Run failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(config_path) = cli.config.clone() else {
        bail!("an entity configuration is required (--config or ENTITY_CONFIG_PATH)");
    };

    let mut query_config = cli.query_config();
    if let Commands::Mappings { shards, replicas } = cli.command {
        query_config.index = IndexSettings {
            number_of_shards: shards,
            number_of_replicas: replicas,
        };
    }

    let deps = Dependencies::new(&config_path, query_config)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    match cli.command {
        Commands::Query { records } => {
            let records = load_records(&records)
                .with_context(|| format!("failed to read records from {}", records.display()))?;

            let summary = deps.client.batch_build(&deps.entity, &records)?;
            print_json(&render_summary(&summary))?;

            info!(
                total = summary.total,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Built queries"
            );
            if summary.failed > 0 {
                bail!("{} of {} records failed", summary.failed, summary.total);
            }
        }
        Commands::Mappings { .. } => {
            print_json(&deps.client.index_settings(&deps.entity)?)?;
        }
        Commands::Validate => {
            info!(
                entity = %deps.entity.name,
                field_count = deps.entity.fields.len(),
                "Entity configuration is valid"
            );
        }
    }

    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
