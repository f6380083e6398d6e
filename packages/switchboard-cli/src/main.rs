//! Switchboard CLI
//!
//! Replays the start menu scenarios on the console. Status lines go to
//! stdout; tracing output goes to stderr (tune with `RUST_LOG`).

mod config;

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use switchboard::{
    boot, Backup, Bios, Console, Dispatch, OsChoice, ServiceManager, ShadowProtect, Shutdown,
    Sleep, StartMenu, Stdout, SystemTimeService, SystemUpdateService,
};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(about = "Handler chains and a mediator-routed start menu, on the console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed software requests through the boot chain
    Chain {
        /// Software to start (defaults to SWITCHBOARD_BOOT_REQUESTS)
        requests: Vec<String>,
        /// Print one JSON object per request instead of status lines
        #[arg(long)]
        json: bool,
        /// Delay between requests in milliseconds (overrides SWITCHBOARD_PACING_MS)
        #[arg(long)]
        pacing_ms: Option<u64>,
    },

    /// Trigger a start menu option
    Mediator {
        #[arg(value_enum)]
        option: PowerOption,
    },

    /// Run the service manager and notify its services
    Observer {
        #[arg(long, default_value_t = 2)]
        rounds: usize,
        /// Seed for reproducible state changes
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Take backups, list them and roll back
    Memento {
        #[arg(long, default_value_t = 3)]
        rounds: usize,
    },

    /// Boot an operating system through the BIOS
    Strategy {
        /// ubuntu or arch
        os: String,
    },

    /// Run every scenario in order
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum PowerOption {
    Shutdown,
    Sleep,
}

#[derive(Serialize)]
struct ChainLine<'a> {
    request: &'a str,
    #[serde(flatten)]
    dispatch: &'a Dispatch,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,switchboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let console: Rc<dyn Console> = Rc::new(Stdout);

    run(cli.command, load_config, console)
}

fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

/// Dispatch a subcommand. Only `chain` and `all` read the configuration.
fn run(
    command: Commands,
    load: impl FnOnce() -> Result<Config>,
    console: Rc<dyn Console>,
) -> Result<()> {
    match command {
        Commands::Chain {
            requests,
            json,
            pacing_ms,
        } => {
            let mut config = load()?;
            if let Some(ms) = pacing_ms {
                config.pacing = std::time::Duration::from_millis(ms);
            }
            let requests = if requests.is_empty() {
                config.boot_requests.clone()
            } else {
                requests
            };
            cmd_chain(&config, &requests, json, console.as_ref())
        }
        Commands::Mediator { option } => cmd_mediator(option, console),
        Commands::Observer { rounds, seed } => cmd_observer(rounds, seed, console),
        Commands::Memento { rounds } => cmd_memento(rounds, console),
        Commands::Strategy { os } => cmd_strategy(&os, console),
        Commands::All => cmd_all(&load()?, console),
    }
}

fn section(title: &str) {
    println!();
    println!("{}", format!("== {title} ==").bright_cyan().bold());
}

fn cmd_chain(config: &Config, requests: &[String], json: bool, console: &dyn Console) -> Result<()> {
    let chain = boot::boot_chain();
    tracing::info!(handlers = ?chain.names(), requests = requests.len(), "starting software");

    for (i, request) in requests.iter().enumerate() {
        if i > 0 && !config.pacing.is_zero() {
            thread::sleep(config.pacing);
        }
        if json {
            let dispatch = chain.handle_traced(request);
            let line = ChainLine {
                request: request.as_str(),
                dispatch: &dispatch,
            };
            println!("{}", serde_json::to_string(&line)?);
        } else {
            boot::start(&chain, request, console);
        }
    }
    Ok(())
}

fn cmd_mediator(option: PowerOption, console: Rc<dyn Console>) -> Result<()> {
    let manager = Rc::new(RefCell::new(ServiceManager::new(console.clone())));
    let update = manager.borrow_mut().attach(SystemUpdateService);
    manager.borrow_mut().attach(SystemTimeService);

    let shutdown = Shutdown::new(console.clone());
    let sleep = Sleep::new(console.clone());
    sleep.disable_on_suspend(manager.clone(), update);
    let menu = StartMenu::wire(shutdown, sleep, console);

    match option {
        PowerOption::Shutdown => menu.shutdown().shutdown()?,
        PowerOption::Sleep => {
            menu.sleep().suspend()?;
            manager.borrow_mut().work();
        }
    }
    Ok(())
}

fn cmd_observer(rounds: usize, seed: Option<u64>, console: Rc<dyn Console>) -> Result<()> {
    let mut manager = match seed {
        Some(seed) => ServiceManager::with_seed(console, seed),
        None => ServiceManager::new(console),
    };
    manager.attach(SystemUpdateService);
    manager.attach(SystemTimeService);

    for _ in 0..rounds {
        manager.work();
    }
    Ok(())
}

fn cmd_memento(rounds: usize, console: Rc<dyn Console>) -> Result<()> {
    let backup = Backup::new("initial", console.clone());
    let mut caretaker = ShadowProtect::new(backup, console);

    for _ in 0..rounds {
        caretaker.backup();
        caretaker.originator_mut().work();
    }
    caretaker.show_history();

    caretaker.undo();
    caretaker.undo();
    Ok(())
}

fn cmd_strategy(os: &str, console: Rc<dyn Console>) -> Result<()> {
    let choice: OsChoice = os.parse()?;
    let bios = Bios::new(choice.into_os(), console);
    bios.boot_loader();
    Ok(())
}

fn cmd_all(config: &Config, console: Rc<dyn Console>) -> Result<()> {
    section("Chain of responsibility");
    cmd_chain(config, &config.boot_requests, false, console.as_ref())?;

    section("Mediator: sleep");
    cmd_mediator(PowerOption::Sleep, console.clone())?;

    section("Mediator: shutdown");
    cmd_mediator(PowerOption::Shutdown, console.clone())?;

    section("Observer");
    cmd_observer(2, None, console.clone())?;

    section("Memento");
    cmd_memento(3, console.clone())?;

    section("Strategy");
    cmd_strategy("ubuntu", console)?;
    Ok(())
}
