//! Command-line host for the template overlay services.
//!
//! Plays the overlay host's role against a local LMDB index: classifies
//! transactions with the topic manager and feeds admission, spend and
//! eviction notifications to the lookup service.

mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use overlay_lookup::{
    AdmissionPayload, LookupQuestion, LookupService, OutputAdmittedByTopic, OutputSpent,
    TemplateLookupService, SERVICE_NAME,
};
use overlay_store_lmdb::{LmdbEnvironment, LmdbRecordStore, Migrator};
use overlay_topic::{TemplateTopicManager, TopicManager};
use overlay_types::TxId;
use overlay_utils::LogFormat;

use crate::config::DaemonConfig;

const DEFAULT_TOPIC: &str = "tm_template";

#[derive(Parser)]
#[command(name = "overlay-template", about = "Template overlay topic manager and lookup service")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "OVERLAY_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the record index.
    #[arg(long, env = "OVERLAY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "OVERLAY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "OVERLAY_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print which outputs of a transaction the topic admits.
    Classify {
        /// Hex-encoded BEEF envelope.
        #[arg(long)]
        beef: String,

        /// Previously admitted outputs the transaction spends.
        #[arg(long, value_delimiter = ',')]
        previous_coins: Vec<u32>,
    },
    /// Index an admitted output.
    Admit(AdmitArgs),
    /// Drop a spent output from the index.
    Spend(OutpointArgs),
    /// Drop an evicted output from the index.
    Evict(OutpointArgs),
    /// Answer a lookup question.
    Lookup {
        #[arg(long, default_value = SERVICE_NAME)]
        service: String,

        /// Query as JSON, e.g. '"findAll"' or '{"type":"findAll"}'.
        #[arg(long)]
        query: String,
    },
    /// Print documentation and metadata for both services.
    Docs,
    /// Print the effective configuration as TOML.
    ShowConfig,
}

#[derive(Args)]
#[group(required = true, multiple = false, id = "source")]
struct AdmitSource {
    /// Hex-encoded atomic BEEF of the admitting transaction.
    #[arg(long)]
    beef: Option<String>,

    /// Transaction id, when only the outpoint is known.
    #[arg(long)]
    txid: Option<String>,
}

#[derive(Args)]
struct AdmitArgs {
    #[command(flatten)]
    source: AdmitSource,

    #[arg(long)]
    output: u32,

    #[arg(long, default_value = DEFAULT_TOPIC)]
    topic: String,
}

#[derive(Args)]
struct OutpointArgs {
    #[arg(long)]
    txid: String,

    #[arg(long)]
    output: u32,

    #[arg(long, default_value = DEFAULT_TOPIC)]
    topic: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = cli.config.as_deref().map(DaemonConfig::from_toml_file);
    let (mut config, config_error) = match loaded {
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (DaemonConfig::default(), Some(e)),
        None => (DaemonConfig::default(), None),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_format) = cli.log_format {
        config.log_format = log_format;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    overlay_utils::init_logging(config.log_format, &config.log_level);
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "ignoring config file, using defaults");
    }

    match cli.command {
        Command::Classify {
            beef,
            previous_coins,
        } => {
            let beef = hex::decode(beef.trim()).context("--beef is not valid hex")?;
            let instructions =
                TemplateTopicManager::new().identify_admissible_outputs(&beef, &previous_coins)?;
            println!("{}", serde_json::to_string_pretty(&instructions)?);
        }
        Command::Admit(args) => {
            let payload = match (args.source.beef, args.source.txid) {
                (Some(beef), _) => AdmissionPayload::Envelope {
                    atomic_beef: hex::decode(beef.trim()).context("--beef is not valid hex")?,
                    output_index: args.output,
                },
                (None, Some(txid)) => AdmissionPayload::DirectId {
                    txid: parse_txid(&txid)?,
                    output_index: args.output,
                },
                (None, None) => anyhow::bail!("one of --beef or --txid is required"),
            };
            open_service(&config)?.output_admitted_by_topic(OutputAdmittedByTopic {
                topic: args.topic,
                payload,
            })?;
        }
        Command::Spend(args) => {
            open_service(&config)?.output_spent(&OutputSpent {
                topic: args.topic,
                txid: parse_txid(&args.txid)?,
                output_index: args.output,
            })?;
        }
        Command::Evict(args) => {
            open_service(&config)?.output_evicted(&parse_txid(&args.txid)?, args.output)?;
        }
        Command::Lookup { service, query } => {
            let query = serde_json::from_str(&query).context("--query is not valid JSON")?;
            let answer = open_service(&config)?.lookup(&LookupQuestion::new(service, query))?;
            println!("{}", serde_json::to_string_pretty(&answer)?);
        }
        Command::Docs => print_docs(),
        Command::ShowConfig => print!("{}", config.to_toml_string()?),
    }

    Ok(())
}

fn parse_txid(s: &str) -> anyhow::Result<TxId> {
    TxId::from_hex(s.trim()).with_context(|| format!("invalid txid {s:?}"))
}

fn open_service(config: &DaemonConfig) -> anyhow::Result<TemplateLookupService<LmdbRecordStore>> {
    let env = LmdbEnvironment::open(&config.data_dir, config.max_dbs, config.map_size)
        .with_context(|| format!("cannot open index at {}", config.data_dir.display()))?;
    Migrator::run(&env.meta_store())?;
    Ok(TemplateLookupService::new(env.record_store()))
}

fn print_docs() {
    let topic = TemplateTopicManager::new();
    let summary = json!({
        "topicManager": topic.metadata(),
        "lookupService": overlay_lookup::service_metadata(),
    });
    println!("{summary:#}");
    println!();
    println!("{}", topic.documentation());
    println!("{}", overlay_lookup::DOCUMENTATION);
}
