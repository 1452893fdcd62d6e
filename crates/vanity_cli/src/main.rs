//! Vanity Registry Command Line Interface
//!
//! Operates a registry whose state lives in a local JSON file. Each command
//! loads the file, applies one registry operation, prints the resulting
//! events as JSON lines and writes the file back.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vanity_registry::transfer::PaidBalances;
use vanity_registry::{
    commitment_hash, AccountId, Amount, Clock, InMemoryBalances, ManualClock, NameRegistry,
    RegistryConfig, RegistrySnapshot, SystemClock,
};

#[derive(Parser)]
#[command(name = "vanity-cli")]
#[command(about = "Vanity name registry command line interface", long_about = None)]
#[command(version)]
struct Cli {
    /// Registry state file
    #[arg(long, default_value = "vanity-state.json")]
    state: PathBuf,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the current time (seconds since the UNIX epoch)
    #[arg(long)]
    now: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty registry state file
    Init {
        /// Administrator identity (hex); defaults to the configured admin
        #[arg(long)]
        admin: Option<String>,
    },
    /// Publish a commitment for a later registration
    Commit(SubmitterName),
    /// Register a committed name
    Register(Payment),
    /// Renew an owned name
    Renew(Payment),
    /// Check whether a name is available
    Available { name: String },
    /// Show the price and registration cost of a name
    Price { name: String },
    /// Show a name record, or the whole registry when no name is given
    Show { name: Option<String> },
    /// Release a name and refund its deposit
    WithdrawDeposit(SubmitterName),
    /// Claim a refund left pending by a failed deposit withdrawal
    ClaimRefund {
        #[arg(long)]
        caller: String,
    },
    /// Withdraw accumulated fees (admin only)
    WithdrawFees {
        #[arg(long)]
        caller: String,
    },
    /// Set the refundable lock fee (admin only)
    SetLockFee(AdminValue),
    /// Set the lock duration in seconds (admin only)
    SetLockDuration(AdminValue),
    /// Set the per-byte name price (admin only)
    SetUnitPrice(AdminValue),
    /// Transfer administration (admin only)
    TransferAdmin {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        new_admin: String,
    },
    /// Show the amount paid out to an account
    Balance { account: String },
}

#[derive(Args)]
struct SubmitterName {
    /// Acting account (hex)
    #[arg(long, alias = "caller")]
    submitter: String,
    #[arg(long)]
    name: String,
}

#[derive(Args)]
struct Payment {
    /// Acting account (hex)
    #[arg(long, alias = "caller")]
    submitter: String,
    #[arg(long)]
    name: String,
    /// Attached payment; defaults to the exact amount required
    #[arg(long)]
    payment: Option<Amount>,
}

#[derive(Args)]
struct AdminValue {
    #[arg(long)]
    caller: String,
    value: u128,
}

/// On-disk layout of the state file
#[derive(Serialize, Deserialize)]
struct StateFile {
    registry: RegistrySnapshot,
    #[serde(default)]
    balances: PaidBalances,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RegistryConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_logging(&config);

    let clock: Arc<dyn Clock> = match cli.now {
        Some(now) => Arc::new(ManualClock::new(now)),
        None => Arc::new(SystemClock),
    };

    if let Commands::Init { admin } = &cli.command {
        return init_state(&cli.state, &config, admin.as_deref(), clock);
    }

    let state = load_state(&cli.state)?;
    let bank = Arc::new(InMemoryBalances::from_map(state.balances.0));
    let registry = NameRegistry::from_snapshot(state.registry, clock, bank.clone())?;

    run(&cli.command, &registry, &bank)?;

    for event in registry.take_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    save_state(
        &cli.state,
        &StateFile {
            registry: registry.snapshot(),
            balances: bank.snapshot(),
        },
    )
}

fn run(command: &Commands, registry: &NameRegistry, bank: &InMemoryBalances) -> Result<()> {
    match command {
        Commands::Init { .. } => unreachable!("handled before the state file is loaded"),
        Commands::Commit(args) => {
            let submitter = parse_account(&args.submitter)?;
            let hash = commitment_hash(&submitter, args.name.as_bytes());
            registry.commit(hash);
            println!("commitment {}", hex::encode(hash));
        }
        Commands::Register(args) => {
            let submitter = parse_account(&args.submitter)?;
            let name = args.name.as_bytes();
            let payment = match args.payment {
                Some(payment) => payment,
                None => registry.get_register_price(name)?,
            };
            let record = registry.register(submitter, name, payment)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Renew(args) => {
            let caller = parse_account(&args.submitter)?;
            let name = args.name.as_bytes();
            let payment = match args.payment {
                Some(payment) => payment,
                None => registry.get_name_price(name)?,
            };
            let expires_at = registry.renew(caller, name, payment)?;
            println!("{} renewed until {}", args.name, expires_at);
        }
        Commands::Available { name } => {
            println!("{}", registry.is_name_available(name.as_bytes())?);
        }
        Commands::Price { name } => {
            let price = registry.get_name_price(name.as_bytes())?;
            let cost = registry.get_register_price(name.as_bytes())?;
            println!("price {} registration {}", price, cost);
        }
        Commands::Show { name: Some(name) } => match registry.record(name.as_bytes()) {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => println!("{} has never been registered", name),
        },
        Commands::Show { name: None } => {
            println!("{}", registry.snapshot().to_json()?);
        }
        Commands::WithdrawDeposit(args) => {
            let caller = parse_account(&args.submitter)?;
            let amount = registry.withdraw_locked_deposit(caller, args.name.as_bytes())?;
            println!("refunded {}", amount);
        }
        Commands::ClaimRefund { caller } => {
            let amount = registry.claim_refund(parse_account(caller)?)?;
            println!("refunded {}", amount);
        }
        Commands::WithdrawFees { caller } => {
            let amount = registry.withdraw_fees(parse_account(caller)?)?;
            println!("withdrew {}", amount);
        }
        Commands::SetLockFee(args) => {
            registry.set_lock_fee(parse_account(&args.caller)?, args.value)?;
        }
        Commands::SetLockDuration(args) => {
            let secs = u64::try_from(args.value).context("lock duration out of range")?;
            registry.set_lock_duration(parse_account(&args.caller)?, secs)?;
        }
        Commands::SetUnitPrice(args) => {
            registry.set_unit_byte_price(parse_account(&args.caller)?, args.value)?;
        }
        Commands::TransferAdmin { caller, new_admin } => {
            registry.transfer_admin(parse_account(caller)?, parse_account(new_admin)?)?;
        }
        Commands::Balance { account } => {
            println!("{}", bank.balance_of(&parse_account(account)?));
        }
    }
    Ok(())
}

fn init_state(
    path: &Path,
    config: &RegistryConfig,
    admin: Option<&str>,
    clock: Arc<dyn Clock>,
) -> Result<()> {
    if path.exists() {
        anyhow::bail!("State file {} already exists", path.display());
    }
    let admin = match admin {
        Some(admin) => parse_account(admin)?,
        None => config
            .admin()?
            .context("no administrator given (use --admin or VANITY_ADMIN)")?,
    };

    let registry = NameRegistry::new(
        admin,
        config.params()?,
        clock,
        Arc::new(InMemoryBalances::new()),
    )?;
    save_state(
        path,
        &StateFile {
            registry: registry.snapshot(),
            balances: PaidBalances::default(),
        },
    )?;
    info!("Initialized registry state at {} (admin {})", path.display(), admin);
    Ok(())
}

fn load_state(path: &Path) -> Result<StateFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading state file {} (run `init` first?)", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing state file {}", path.display()))
}

fn save_state(path: &Path, state: &StateFile) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json).with_context(|| format!("writing state file {}", path.display()))?;
    debug!("Saved registry state to {}", path.display());
    Ok(())
}

fn parse_account(value: &str) -> Result<AccountId> {
    AccountId::from_hex(value).with_context(|| format!("invalid account id {value}"))
}

fn init_logging(config: &RegistryConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Logs go to stderr so stdout stays machine readable.
    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
