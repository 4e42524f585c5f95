use std::path::PathBuf;

use tracing::debug;

use crate::config::MonitorConfig;
use crate::user::User;

pub mod limits;
pub mod monitoring;
pub mod operations;
pub mod permissions;
pub mod ranking;
pub mod system;

pub use monitoring::Snapshot;

/// Produces a fresh, ranked snapshot on every call.
pub trait Sampler {
    fn sample(&mut self) -> Snapshot;
}

#[derive(Debug)]
pub struct Manager {
    pub active_user: User,
    pub proc_root: PathBuf,
    pub max_processes: usize,
    pub command_width: usize,
    clock_ticks: u64,
}

impl Manager {
    pub fn new(active_user: User, config: &MonitorConfig) -> Self {
        Manager {
            active_user,
            proc_root: config.proc_root.clone(),
            max_processes: config.max_processes,
            command_width: config.command_width,
            clock_ticks: system::clock_ticks(),
        }
    }
}

impl Sampler for Manager {
    //Reads live data from the Linux system; nothing carries over from the previous call
    fn sample(&mut self) -> Snapshot {
        let globals = match system::read_globals() {
            Ok(g) => Some(g),
            Err(e) => {
                debug!("system stats unavailable: {}", e);
                None
            }
        };
        monitoring::take_snapshot(
            &self.proc_root,
            self.max_processes,
            self.command_width,
            globals,
            self.clock_ticks,
        )
    }
}
