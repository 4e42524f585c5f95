use std::fs;
use std::path::{Path, PathBuf};

use nix::sched::{sched_setaffinity, CpuSet};
use nix::unistd::Pid;
use tracing::info;

use crate::error::{Error, Result};

const PERIOD_FILE: &str = "cpu.cfs_period_us";
const QUOTA_FILE: &str = "cpu.cfs_quota_us";

/// Rejects percentages outside 0..=100 before anything is touched.
pub fn validate_percent(percent: i64) -> Result<u32> {
    if (0..=100).contains(&percent) {
        Ok(percent as u32)
    } else {
        Err(Error::InvalidPercent(percent))
    }
}

/// Quota in microseconds per period that caps all cores at `percent`.
pub fn quota_for(period_us: u64, percent: u32, cores: u32) -> u64 {
    period_us * percent as u64 * cores as u64 / 100
}

/// The CFS bandwidth cgroup (v1 cpu controller) that lightlimit manages.
#[derive(Debug, Clone)]
pub struct CgroupLimits {
    base: PathBuf,
    period_us: u64,
}

impl CgroupLimits {
    pub fn new(base: impl Into<PathBuf>, period_us: u64) -> Self {
        CgroupLimits {
            base: base.into(),
            period_us,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn cgroup_err(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
        move |source| Error::Cgroup {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn create(&self) -> Result<()> {
        if !self.base.is_dir() {
            fs::create_dir_all(&self.base).map_err(Self::cgroup_err(&self.base))?;
        }
        Ok(())
    }

    /// Removes the cgroup directory. Returns false if it was not there.
    pub fn remove(&self) -> Result<bool> {
        if !self.base.exists() {
            return Ok(false);
        }
        // cgroupfs only supports rmdir; its control files go with the directory
        fs::remove_dir(&self.base).map_err(Self::cgroup_err(&self.base))?;
        Ok(true)
    }

    /// Writes period and quota so the group gets `percent` of every core.
    /// Returns the quota written.
    pub fn install_total(&self, percent: u32, cores: u32) -> Result<u64> {
        self.create()?;

        let quota = quota_for(self.period_us, percent, cores);
        let period_path = self.base.join(PERIOD_FILE);
        let quota_path = self.base.join(QUOTA_FILE);
        fs::write(&period_path, self.period_us.to_string())
            .map_err(Self::cgroup_err(&period_path))?;
        fs::write(&quota_path, quota.to_string()).map_err(Self::cgroup_err(&quota_path))?;

        info!(percent, cores, quota, period = self.period_us, "installed CPU quota");
        Ok(quota)
    }

    pub fn reset(&self) -> Result<()> {
        self.remove()?;
        self.create()?;
        info!(base = %self.base.display(), "CPU limit reset");
        Ok(())
    }
}

/// Parses "0,1,3" into core indices.
pub fn parse_core_list(list: &str) -> Result<Vec<usize>> {
    let cores: Vec<usize> = list
        .split(',')
        .map(|token| token.trim().parse::<usize>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| Error::InvalidCoreList(list.to_string()))?;
    if cores.is_empty() {
        return Err(Error::InvalidCoreList(list.to_string()));
    }
    Ok(cores)
}

/// Pins the calling process to `cores`. Indices beyond the CPU set size are ignored.
pub fn set_preference(cores: &[usize]) -> Result<()> {
    let mut mask = CpuSet::new();
    for &core in cores {
        if core < CpuSet::count() {
            mask.set(core).map_err(Error::Affinity)?;
        }
    }
    sched_setaffinity(Pid::from_raw(0), &mask).map_err(Error::Affinity)?;
    info!(?cores, "CPU affinity set");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_bounds() {
        assert_eq!(validate_percent(0).unwrap(), 0);
        assert_eq!(validate_percent(100).unwrap(), 100);
        assert!(matches!(validate_percent(101), Err(Error::InvalidPercent(101))));
        assert!(matches!(validate_percent(-1), Err(Error::InvalidPercent(-1))));
    }

    #[test]
    fn quota_scales_with_cores() {
        assert_eq!(quota_for(100_000, 50, 4), 200_000);
        assert_eq!(quota_for(100_000, 100, 1), 100_000);
        assert_eq!(quota_for(100_000, 0, 8), 0);
    }

    #[test]
    fn core_list_parsing() {
        assert_eq!(parse_core_list("0,1,3").unwrap(), vec![0, 1, 3]);
        assert_eq!(parse_core_list(" 2 , 5").unwrap(), vec![2, 5]);
        assert!(parse_core_list("0,x").is_err());
        assert!(parse_core_list("").is_err());
        assert!(parse_core_list("-1").is_err());
    }

    #[test]
    fn install_writes_period_and_quota() {
        let dir = tempfile::tempdir().unwrap();
        let limits = CgroupLimits::new(dir.path().join("lightlimit"), 100_000);
        let quota = limits.install_total(25, 4).unwrap();
        assert_eq!(quota, 100_000);
        let base = limits.base();
        assert_eq!(fs::read_to_string(base.join(PERIOD_FILE)).unwrap(), "100000");
        assert_eq!(fs::read_to_string(base.join(QUOTA_FILE)).unwrap(), "100000");
    }

    #[test]
    fn remove_and_reset_empty_group() {
        let dir = tempfile::tempdir().unwrap();
        let limits = CgroupLimits::new(dir.path().join("lightlimit"), 100_000);
        assert!(!limits.remove().unwrap());
        limits.create().unwrap();
        limits.reset().unwrap();
        assert!(limits.base().is_dir());
        assert!(limits.remove().unwrap());
        assert!(!limits.base().exists());
    }
}
