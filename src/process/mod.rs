
// 1. Declare submodules
mod pcb;
pub mod stat;

// 2. Re-export the raw counter struct
pub use pcb::PcbData;

pub const UNKNOWN_COMMAND: &str = "unknown";

/// One candidate process as read from the registry, before any derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProcessRecord {
    pub pid: u32,
    pub command: String,
    pub pcb_data: PcbData,
}

/// Global readings taken once per refresh and shared by every derivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readings {
    pub uptime_seconds: f64,
    pub clock_ticks_per_second: u64,
    pub total_ram_bytes: u64,
}

impl Readings {
    /// Used when the global counters cannot be read: every process then
    /// derives to zero CPU and memory instead of being hidden.
    pub fn unavailable(clock_ticks_per_second: u64) -> Self {
        Readings {
            uptime_seconds: 0.0,
            clock_ticks_per_second,
            total_ram_bytes: 0,
        }
    }
}

/// Represents a single process at one sampling instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub command: String,
    /// Lifetime average, may exceed 100 for multi-threaded processes.
    pub cpu_percent: f64,
    /// Virtual size against physical RAM, may exceed 100.
    pub mem_percent: f64,
    pub vsize_mb: u64,
}

impl ProcessSample {
    pub fn derive(raw: &RawProcessRecord, readings: &Readings, command_width: usize) -> Self {
        let hz = readings.clock_ticks_per_second.max(1) as f64;
        let cpu_seconds = raw.pcb_data.cpu_ticks() as f64 / hz;
        let age_seconds = readings.uptime_seconds - raw.pcb_data.start_ticks as f64 / hz;

        let cpu_percent = if age_seconds > 0.0 {
            100.0 * cpu_seconds / age_seconds
        } else {
            0.0
        };

        let mem_percent = if readings.total_ram_bytes > 0 {
            100.0 * raw.pcb_data.vsize_bytes as f64 / readings.total_ram_bytes as f64
        } else {
            0.0
        };

        ProcessSample {
            pid: raw.pid,
            command: truncate(&raw.command, command_width),
            cpu_percent,
            mem_percent,
            vsize_mb: raw.pcb_data.vsize_bytes / (1024 * 1024),
        }
    }
}

fn truncate(command: &str, width: usize) -> String {
    command.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(user: u64, kernel: u64, start: u64, vsize: u64) -> RawProcessRecord {
        RawProcessRecord {
            pid: 7,
            command: "worker".to_string(),
            pcb_data: PcbData {
                state: 'R',
                user_ticks: user,
                kernel_ticks: kernel,
                start_ticks: start,
                vsize_bytes: vsize,
            },
        }
    }

    fn readings(uptime: f64) -> Readings {
        Readings {
            uptime_seconds: uptime,
            clock_ticks_per_second: 100,
            total_ram_bytes: 8000 * 1024 * 1024,
        }
    }

    #[test]
    fn cpu_is_lifetime_average() {
        // 10s of CPU over a 40s lifetime
        let sample = ProcessSample::derive(&raw(800, 200, 6000, 0), &readings(100.0), 50);
        assert!((sample.cpu_percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn cpu_is_not_clamped() {
        let sample = ProcessSample::derive(&raw(3000, 1000, 9000, 0), &readings(100.0), 50);
        assert!((sample.cpu_percent - 400.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_age_yields_zero_cpu() {
        let started_now = ProcessSample::derive(&raw(50, 50, 10_000, 0), &readings(100.0), 50);
        assert_eq!(started_now.cpu_percent, 0.0);
        let clock_skew = ProcessSample::derive(&raw(50, 50, 20_000, 0), &readings(100.0), 50);
        assert_eq!(clock_skew.cpu_percent, 0.0);
    }

    #[test]
    fn memory_scenario() {
        let sample = ProcessSample::derive(&raw(0, 0, 0, 4_000_000_000), &readings(100.0), 50);
        assert_eq!(sample.vsize_mb, 3814);
        let expected = 100.0 * 4_000_000_000f64 / (8000.0 * 1024.0 * 1024.0);
        assert!((sample.mem_percent - expected).abs() < 1e-9);
        assert!((sample.mem_percent - 47.68).abs() < 0.01);
    }

    #[test]
    fn derivation_is_idempotent() {
        let r = raw(1234, 567, 890, 123_456_789);
        let a = ProcessSample::derive(&r, &readings(5000.0), 50);
        let b = ProcessSample::derive(&r, &readings(5000.0), 50);
        assert_eq!(a.cpu_percent.to_bits(), b.cpu_percent.to_bits());
        assert_eq!(a.mem_percent.to_bits(), b.mem_percent.to_bits());
        assert_eq!(a.vsize_mb, b.vsize_mb);
    }

    #[test]
    fn unavailable_readings_derive_zero() {
        let sample = ProcessSample::derive(&raw(500, 500, 10, 1 << 30), &Readings::unavailable(100), 50);
        assert_eq!(sample.cpu_percent, 0.0);
        assert_eq!(sample.mem_percent, 0.0);
        assert_eq!(sample.vsize_mb, 1024);
    }

    #[test]
    fn command_is_truncated_to_width() {
        let mut r = raw(0, 0, 0, 0);
        r.command = "abcdefghij".to_string();
        assert_eq!(ProcessSample::derive(&r, &readings(1.0), 4).command, "abcd");
    }
}
