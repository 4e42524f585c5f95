
/// Raw scheduler and memory counters read from the kernel via /proc/[pid]/stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcbData {
    pub state: char,
    pub user_ticks: u64,   // utime
    pub kernel_ticks: u64, // stime
    pub start_ticks: u64,  // starttime, ticks since boot
    pub vsize_bytes: u64,
}

impl PcbData {
    /// Total CPU time (utime + stime) in jiffies
    pub fn cpu_ticks(&self) -> u64 {
        self.user_ticks.saturating_add(self.kernel_ticks)
    }
}
