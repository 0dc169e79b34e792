//! CLI command definitions, routing, and tracing setup.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use catalogbridge_parser::JsonEntityParser;
use catalogbridge_processor::{ProcessorChain, ResultSink};
use catalogbridge_reader::DefaultUrlReader;
use catalogbridge_shared::{
    AppConfig, LocationSpec, ProcessingResult, ReaderOptions, init_config, load_config,
    load_config_from,
};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// CatalogBridge — read catalog entities from bridge locations.
#[derive(Parser)]
#[command(
    name = "catalogbridge",
    version,
    about = "Read catalog entities from external locations and print them as JSON lines.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.catalogbridge/catalogbridge.toml.
    #[arg(long, global = true, env = "CATALOGBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Read one location through the processor chain.
    Read {
        /// Location type (e.g. catalog-bridge).
        #[arg(long = "type")]
        location_type: String,

        /// Location target URL or path.
        #[arg(long)]
        target: String,

        /// Mark the location as optional.
        #[arg(long)]
        optional: bool,

        /// Request timeout in seconds (overrides config).
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries results.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "catalogbridge=info",
        1 => "catalogbridge=debug",
        _ => "catalogbridge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Command::Read {
            location_type,
            target,
            optional,
            timeout_secs,
        } => cmd_read(&config, location_type, target, optional, timeout_secs).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(&config).await,
        },
    }
}

fn resolve_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

async fn cmd_read(
    config: &AppConfig,
    location_type: String,
    target: String,
    optional: bool,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let mut opts = ReaderOptions::from(config);
    if let Some(secs) = timeout_secs {
        if secs == 0 {
            return Err(eyre!("--timeout-secs must be greater than 0"));
        }
        opts.timeout_secs = secs;
    }

    let reader = DefaultUrlReader::new(&opts)?;
    let chain = ProcessorChain::with_builtin(Arc::new(reader));
    let location = LocationSpec::new(location_type, target);

    info!(%location, optional, "reading location");

    let mut sink = JsonLinesSink::new(std::io::stdout());
    let claimed = chain
        .read_location(&location, optional, &mut sink, &JsonEntityParser)
        .await;

    if !claimed {
        return Err(eyre!(
            "no processor handles location type '{}' (available: {})",
            location.location_type,
            chain.processor_names().join(", ")
        ));
    }

    info!(
        entities = sink.entities,
        errors = sink.errors,
        "location processed"
    );
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON-lines sink
// ---------------------------------------------------------------------------

/// Writes each emission as one line of JSON.
struct JsonLinesSink<W> {
    out: W,
    entities: usize,
    errors: usize,
}

impl<W: Write> JsonLinesSink<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            entities: 0,
            errors: 0,
        }
    }
}

impl<W: Write + Send> ResultSink for JsonLinesSink<W> {
    fn emit(&mut self, result: ProcessingResult) {
        match &result {
            ProcessingResult::Entity { .. } => self.entities += 1,
            r if r.is_error() => self.errors += 1,
            _ => {}
        }

        let written = serde_json::to_string(&result)
            .map_err(std::io::Error::other)
            .and_then(|line| writeln!(self.out, "{line}"));
        if let Err(e) = written {
            warn!(error = %e, "failed to write result");
        }
    }
}
