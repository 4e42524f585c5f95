use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lightlimit::config::{Config, LogTarget, LoggingConfig};
use lightlimit::manager::limits::{self, CgroupLimits};
use lightlimit::manager::permissions::warn_if_unprivileged;
use lightlimit::manager::system::{self, InfoReport};
use lightlimit::manager::Manager;
use lightlimit::tui;
use lightlimit::user::User;

/// LightLimit: CPU budget control and an interactive process monitor.
///
/// Most commands require root privileges.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Minimum log level; overrides the config file.
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sets total CPU limit for all processes (0-100%)
    Total {
        #[arg(allow_hyphen_values = true)]
        cpu_percentage: i64,
    },
    /// Sets CPU affinity of this process (e.g., '0,1,3')
    Preference { core_list: String },
    /// Resets CPU limits and cgroup
    Reset,
    /// Displays CPU and memory info
    Info,
    /// Interactive process monitor with task management
    #[command(alias = "htop")]
    Monitor,
    /// Removes the cgroup that lightlimit creates
    Uninstall,
}

fn init_logging(logging: &LoggingConfig, level: Option<&str>, interactive: bool) -> Result<()> {
    let level = level.unwrap_or(logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match logging.target(interactive) {
        LogTarget::File(path) => {
            let file = open_log(&path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        LogTarget::Discard => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init();
        }
    }
    Ok(())
}

fn open_log(path: &Path) -> Result<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed opening log file {}", path.display()))
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.config.as_deref())?;
    let interactive = matches!(cli.command, Command::Monitor);
    init_logging(&config.logging, cli.log_level.as_deref(), interactive)?;

    let user = User::current();
    let cgroup = CgroupLimits::new(config.limits.cgroup_base.clone(), config.limits.period_us);

    match cli.command {
        Command::Total { cpu_percentage } => {
            let percent = limits::validate_percent(cpu_percentage)?;
            warn_if_unprivileged(&user);
            let cores = system::cpu_count();
            cgroup.install_total(percent, cores)?;
            println!("Total CPU limit set to {}% across {} cores/threads.", percent, cores);
        }
        Command::Preference { core_list } => {
            let cores = limits::parse_core_list(&core_list)?;
            limits::set_preference(&cores)?;
            println!("CPU affinity set to cores: {}", core_list);
        }
        Command::Reset => {
            warn_if_unprivileged(&user);
            cgroup.reset()?;
            println!("CPU limit reset.");
        }
        Command::Uninstall => {
            warn_if_unprivileged(&user);
            cgroup.remove()?;
            println!("LightLimit cgroup removed successfully.");
        }
        Command::Info => {
            println!("{}", InfoReport::current()?);
        }
        Command::Monitor => {
            let manager = Manager::new(user, &config.monitor);
            tui::run_monitor(manager, &config.monitor)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
