//! SkyDNS record CLI
//!
//! Lists and edits the records of a zone stored in etcd, using the same key
//! layout the SkyDNS server reads.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::Table;

use skydns_provider::dns::context::ProviderConfig;
use skydns_provider::dns::logging;
use skydns_provider::dns::{
    Record, RecordAppender, RecordDeleter, RecordGetter, RecordSetter, RecordType, SkyDnsProvider,
};
use skydns_provider::store::etcd::EtcdStore;

/// Manage DNS records kept in etcd for SkyDNS
#[derive(Parser)]
#[command(name = "skydns-cli")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, env = "SKYDNS_CONFIG")]
    config: Option<PathBuf>,

    /// etcd endpoints, overriding the configuration file
    #[arg(short, long, env = "SKYDNS_ENDPOINTS", value_delimiter = ',')]
    endpoints: Vec<String>,

    /// Root of the SkyDNS key space
    #[arg(short, long, env = "SKYDNS_PREFIX")]
    prefix: Option<String>,

    /// Zone to operate on, e.g. example.com
    #[arg(short, long, env = "SKYDNS_ZONE")]
    zone: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List the records of the zone
    List,
    /// Create a record unless its key already exists
    Append(RecordArgs),
    /// Create or replace a record
    Set(RecordArgs),
    /// Remove a record
    Delete(RecordArgs),
}

#[derive(Args)]
struct RecordArgs {
    /// Record type (A, AAAA, CNAME, MX, NS, SRV, TXT)
    #[arg(short = 't', long = "type")]
    rtype: RecordType,

    /// Record name relative to the zone
    name: String,

    /// Host or text value
    #[arg(default_value = "")]
    value: String,

    /// TTL in seconds
    #[arg(long, default_value_t = 300)]
    ttl: u64,
}

impl RecordArgs {
    fn to_record(&self) -> Record {
        Record::new(
            self.rtype,
            self.name.clone(),
            self.value.clone(),
            Duration::from_secs(self.ttl),
        )
    }
}

fn load_config(cli: &Cli) -> Result<ProviderConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => ProviderConfig::load(path)?,
        None => ProviderConfig::default(),
    };

    if !cli.endpoints.is_empty() {
        config.endpoints = cli.endpoints.clone();
    }
    if let Some(prefix) = &cli.prefix {
        config.prefix = prefix.clone();
    }

    config.validate()?;
    Ok(config)
}

fn print_records(records: &[Record], output: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(vec!["Name", "Type", "TTL", "Value"]);
            for record in records {
                table.add_row(vec![
                    record.name.clone(),
                    record.rtype.to_string(),
                    record.ttl.as_secs().to_string(),
                    record.value.clone(),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init(&config.logging);

    let store = EtcdStore::connect(&config).await?;
    let provider = SkyDnsProvider::new(store, &config);
    let zone = cli.zone.as_str();

    let records = match &cli.command {
        Commands::List => provider.get_records(zone).await?,
        Commands::Append(args) => provider.append_records(zone, &[args.to_record()]).await?,
        Commands::Set(args) => provider.set_records(zone, &[args.to_record()]).await?,
        Commands::Delete(args) => provider.delete_records(zone, &[args.to_record()]).await?,
    };

    print_records(&records, cli.output)
}
