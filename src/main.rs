use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use maas_raid::config::Config;
use maas_raid::host;
use maas_raid::maas::client::MaasClient;
use maas_raid::resource::{self, raid, schema, Plan, RaidConfig, RaidState};
use maas_raid::store::{StateStore, DEFAULT_STATE_FILE};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Declarative management of MAAS machine RAID arrays
#[derive(Parser, Debug)]
#[command(name = "maas-raid", version, about, long_about = None)]
struct Args {
    /// MAAS URL, e.g. http://maas:5240/MAAS
    #[arg(long, global = true)]
    url: Option<String>,

    /// MAAS API key (consumer_key:token_key:token_secret)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// MAAS API version
    #[arg(long, global = true)]
    api_version: Option<String>,

    /// State file holding the managed RAID record
    #[arg(long, global = true, default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    /// Log level for debugging
    #[arg(long, global = true, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save connection settings to the config file
    Configure,
    /// Print the resource schema
    Schema,
    /// Show what applying a RAID configuration would do
    Plan {
        /// RAID configuration file (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Create, update or replace the RAID to match a configuration
    Apply {
        /// RAID configuration file (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Refresh the state record from MAAS
    Refresh,
    /// Print the state record
    Show,
    /// Adopt an existing RAID as MACHINE:RAID
    Import {
        /// MACHINE:RAID, each half an ID or a name
        id: String,
    },
    /// Delete the managed RAID
    Destroy,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("maas-raid started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("maas-raid").join("maas-raid.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".maas-raid").join("maas-raid.log");
    }
    PathBuf::from("maas-raid.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let overrides = Config {
        api_url: args.url.clone(),
        api_key: args.api_key.clone(),
        api_version: args.api_version.clone(),
    };
    let config = Config::load().merge(overrides);
    let store = StateStore::new(&args.state);

    match args.command {
        Command::Configure => configure(&config),
        Command::Schema => {
            print_schema();
            Ok(())
        }
        Command::Plan { file } => {
            let client = connect(&config)?;
            let desired = load_raid_config(&file)?;
            let (plan, _) = host::plan(&client, &store, &desired).await?;
            println!("{}", describe_plan(&plan));
            Ok(())
        }
        Command::Apply { file } => {
            let client = connect(&config)?;
            let desired = load_raid_config(&file)?;
            let applied = host::apply(&client, &store, &desired).await?;
            println!("{}", describe_plan(&applied.plan));
            match applied.state {
                Some(state) if applied.plan != Plan::NoChange => print_state(&state),
                _ => Ok(()),
            }
        }
        Command::Refresh => {
            let client = connect(&config)?;
            require_state(&store)?;
            match host::refresh(&client, &store).await? {
                Some(state) => print_state(&state),
                None => {
                    println!("RAID no longer exists; state cleared");
                    Ok(())
                }
            }
        }
        Command::Show => print_state(&require_state(&store)?),
        Command::Import { id } => {
            let client = connect(&config)?;
            if store.load()?.is_some() {
                anyhow::bail!(
                    "State file {:?} already manages a RAID; destroy it or use another --state",
                    store.path()
                );
            }
            let state = raid::import(&client, &id).await?;
            store.save(&state)?;
            print_state(&state)
        }
        Command::Destroy => {
            let client = connect(&config)?;
            let state = require_state(&store)?;
            raid::delete(&client, &state).await?;
            store.clear()?;
            println!("Deleted RAID {} on {}", state.id, state.machine);
            Ok(())
        }
    }
}

fn configure(config: &Config) -> Result<()> {
    config.save()?;
    match Config::config_path() {
        Some(path) => println!("Saved configuration to {:?}", path),
        None => println!("No config directory available; nothing saved"),
    }
    Ok(())
}

fn connect(config: &Config) -> Result<MaasClient> {
    let url = config
        .effective_url()
        .context("No MAAS URL configured. Set MAAS_API_URL or use --url")?;
    let api_key = config
        .effective_api_key()
        .context("No MAAS API key configured. Set MAAS_API_KEY or use --api-key")?;
    let version = config.effective_api_version();

    tracing::info!("Using MAAS at {} (API {})", url, version);
    Ok(MaasClient::new(&url, &api_key, &version)?)
}

fn load_raid_config(path: &Path) -> Result<RaidConfig> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    // YAML is a superset of JSON, so one parser covers both
    let config: RaidConfig =
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))?;
    resource::validate(&config)?;
    Ok(config)
}

fn require_state(store: &StateStore) -> Result<RaidState> {
    store
        .load()?
        .with_context(|| format!("No RAID managed by state file {:?}", store.path()))
}

fn describe_plan(plan: &Plan) -> String {
    match plan {
        Plan::Create => format!("{} will be created", schema::RESOURCE_TYPE),
        Plan::Replace(attrs) => format!(
            "{} must be replaced ({} changed)",
            schema::RESOURCE_TYPE,
            attrs.join(", ")
        ),
        Plan::Update(attrs) => format!(
            "{} will be updated in place ({})",
            schema::RESOURCE_TYPE,
            attrs.join(", ")
        ),
        Plan::NoChange => "No changes.".to_string(),
    }
}

fn print_state(state: &RaidState) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(state)?);
    Ok(())
}

fn print_schema() {
    println!("{}", schema::RESOURCE_TYPE);
    for attr in schema::RAID_SCHEMA {
        let mut flags = Vec::new();
        if attr.required {
            flags.push("required");
        } else {
            flags.push("optional");
        }
        if attr.computed {
            flags.push("computed");
        }
        if attr.force_new {
            flags.push("forces replacement");
        }
        println!(
            "  {:<17} {:<7} [{}] {}",
            attr.name,
            format!("{:?}", attr.kind).to_lowercase(),
            flags.join(", "),
            attr.description
        );
    }
}
