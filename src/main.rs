use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use termswallow::process::{self, ProcessTable, StaticProcessTable, SysinfoProcessTable};
use termswallow::wm::RecordingWindowManager;
use termswallow::{replay, ClientInfo, Config, NotificationEmitter, SwallowReactor, WindowHandle};

#[derive(Parser, Debug)]
#[command(name = "termswallow")]
#[command(about = "Terminal window swallowing for tiling window managers", long_about = None)]
struct Args {
    /// Config file (defaults to the standard search paths)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the ancestry chain of a running process
    Ancestry {
        pid: u32,

        /// Maximum parent hops (defaults to the configured depth)
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Check whether a window would be treated as a terminal
    Classify {
        /// WM_CLASS entry, may be repeated
        #[arg(long = "class")]
        classes: Vec<String>,

        /// Executable name
        #[arg(long)]
        exe: Option<String>,
    },

    /// Replay a JSON-lines event script and print the outcome
    Replay {
        file: PathBuf,

        /// Deliver restore notifications to the desktop
        #[arg(long)]
        notify: bool,
    },

    /// Print the effective configuration
    Config,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "termswallow=debug"
    } else {
        "termswallow=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    match args.command {
        Command::Ancestry { pid, depth } => {
            let table = SysinfoProcessTable::new();
            let depth = depth.unwrap_or(config.swallow.max_ancestry_depth);
            let chain = process::resolve(&table, pid, depth);

            if chain.is_empty() {
                println!("{pid}: no ancestors found");
            }
            for ancestor in chain {
                let name = table.name_of(ancestor).unwrap_or_else(|| "?".to_string());
                println!("{ancestor}\t{name}");
            }
        }

        Command::Classify { classes, exe } => {
            let client = ClientInfo {
                window: WindowHandle(0),
                pid: None,
                wm_class: classes,
            };
            let classifier = config.swallow.classifier();
            let verdict = if classifier.is_terminal(&client, exe.as_deref()) {
                "terminal"
            } else {
                "not a terminal"
            };
            println!("{verdict}");
        }

        Command::Replay { file, notify } => {
            let events = replay::load_script(&file)?;
            let emitter = if notify {
                NotificationEmitter::desktop(config.notify.clone())
            } else {
                NotificationEmitter::disabled()
            };
            let mut reactor = SwallowReactor::new(
                &config.swallow,
                RecordingWindowManager::new(),
                StaticProcessTable::new(),
                emitter,
            );

            let report = replay::run(&mut reactor, &events);
            let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
            println!("{json}");
        }

        Command::Config => {
            let text = toml::to_string_pretty(&config).context("Failed to encode config")?;
            print!("{text}");
        }
    }

    Ok(())
}
