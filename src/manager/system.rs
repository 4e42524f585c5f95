use std::fmt;

use nix::sys::sysinfo::{self, SysInfo};

use crate::error::{Error, Result};
use crate::process::Readings;

const MB: u64 = 1024 * 1024;

/// Number of online cores, at least 1.
pub fn cpu_count() -> u32 {
    let cores = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
    if cores > 0 { cores as u32 } else { 1 }
}

/// Get the system HZ (clock ticks per second) for CPU time calculation.
/// Most Linux systems use 100, which is also the fallback.
pub fn clock_ticks() -> u64 {
    let hz = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if hz > 0 { hz as u64 } else { 100 }
}

/// Machine-wide figures shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemStats {
    /// 1-minute load average over core count; not the sum of process CPU.
    pub load_percent: f64,
    pub used_mb: u64,
    pub total_mb: u64,
    pub mem_percent: f64,
}

impl SystemStats {
    pub fn from_counters(load_1m: f64, cores: u32, total_bytes: u64, free_bytes: u64) -> Self {
        let total_mb = total_bytes / MB;
        let used_mb = total_bytes.saturating_sub(free_bytes) / MB;
        let mem_percent = if total_mb > 0 {
            used_mb as f64 / total_mb as f64 * 100.0
        } else {
            0.0
        };
        SystemStats {
            load_percent: load_1m / cores.max(1) as f64 * 100.0,
            used_mb,
            total_mb,
            mem_percent,
        }
    }

    pub fn cpu_label(stats: Option<&SystemStats>) -> String {
        match stats {
            Some(s) => format!("CPU: {:.1}%", s.load_percent),
            None => "CPU: N/A".to_string(),
        }
    }

    pub fn mem_label(stats: Option<&SystemStats>) -> String {
        match stats {
            Some(s) => format!("Mem: {}/{} MB ({:.1}%)", s.used_mb, s.total_mb, s.mem_percent),
            None => "Mem: N/A".to_string(),
        }
    }
}

/// Both global views derived from a single sysinfo(2) call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Globals {
    pub readings: Readings,
    pub stats: SystemStats,
}

impl Globals {
    pub fn from_sysinfo(info: &SysInfo, cores: u32, clock_ticks_per_second: u64) -> Self {
        let (load_1m, _, _) = info.load_average();
        Globals {
            readings: Readings {
                uptime_seconds: info.uptime().as_secs_f64(),
                clock_ticks_per_second,
                total_ram_bytes: info.ram_total(),
            },
            stats: SystemStats::from_counters(load_1m, cores, info.ram_total(), info.ram_unused()),
        }
    }
}

pub fn read_globals() -> Result<Globals> {
    let info = sysinfo::sysinfo().map_err(Error::SystemInfo)?;
    Ok(Globals::from_sysinfo(&info, cpu_count(), clock_ticks()))
}

/// One-shot, non-interactive machine summary for the `info` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoReport {
    pub cores: u32,
    pub total_ram_mb: u64,
    pub free_ram_mb: u64,
    pub uptime_secs: u64,
}

impl InfoReport {
    pub fn current() -> Result<Self> {
        let info = sysinfo::sysinfo().map_err(Error::SystemInfo)?;
        Ok(InfoReport {
            cores: cpu_count(),
            total_ram_mb: info.ram_total() / MB,
            free_ram_mb: info.ram_unused() / MB,
            uptime_secs: info.uptime().as_secs(),
        })
    }
}

impl fmt::Display for InfoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CPU Cores: {}", self.cores)?;
        writeln!(f, "Total RAM: {} MB", self.total_ram_mb)?;
        writeln!(f, "Free RAM: {} MB", self.free_ram_mb)?;
        write!(f, "Uptime: {}", format_uptime(self.uptime_secs))
    }
}

pub fn format_uptime(secs: u64) -> String {
    format!(
        "{} days, {} hours, {} minutes",
        secs / 86_400,
        (secs % 86_400) / 3_600,
        (secs % 3_600) / 60
    )
}
