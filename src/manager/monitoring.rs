use std::io::Read;
use std::path::Path;

use procfs::process::Process;
use tracing::debug;

use crate::manager::ranking;
use crate::manager::system::{Globals, SystemStats};
use crate::process::stat::parse_stat;
use crate::process::{ProcessSample, RawProcessRecord, Readings, UNKNOWN_COMMAND};

/// The ranked result of one refresh. Never mutated after creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub samples: Vec<ProcessSample>,
    pub stats: Option<SystemStats>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProcessSample> {
        self.samples.get(index)
    }
}

/// Up-front buffer size; larger caps grow the list on demand.
const PREALLOC_RECORDS: usize = 512;

// Walks the process registry under `root` and returns at most `max_count` raw records.
// Processes that vanish or carry a malformed status record are skipped.
pub fn enumerate(root: &Path, max_count: usize) -> Vec<RawProcessRecord> {
    let mut records = Vec::with_capacity(max_count.min(PREALLOC_RECORDS));

    let procfs_processes = match procfs::process::all_processes_with_root(root) {
        Ok(p) => p,
        Err(e) => {
            debug!("Failed to read process list under {}: {}", root.display(), e);
            return records;
        }
    };

    for p in procfs_processes {
        if records.len() >= max_count {
            break;
        }
        let procfs_proc = match p {
            Ok(p) => p,
            Err(_) => continue, //Skip listing errors
        };

        if let Some(record) = read_record(&procfs_proc) {
            records.push(record);
        }
    }

    records
}

// Reads through the directory handle procfs already holds for the process.
fn read_relative(process: &Process, name: &str) -> Option<Vec<u8>> {
    let mut file = process.open_relative(name).ok()?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).ok()?;
    Some(bytes)
}

fn read_record(process: &Process) -> Option<RawProcessRecord> {
    let pid = u32::try_from(process.pid).ok()?;

    // comm and stat may hold non-UTF-8 bytes
    let command = read_relative(process, "comm")
        .map(|c| String::from_utf8_lossy(&c).trim_end_matches('\n').to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| UNKNOWN_COMMAND.to_string());

    //Ignore the error if a process vanished between listing and reading its data
    let stat_bytes = read_relative(process, "stat")?;
    let stat = parse_stat(&String::from_utf8_lossy(&stat_bytes))?;

    Some(RawProcessRecord {
        pid,
        command,
        pcb_data: stat.pcb,
    })
}

/// Enumerate, derive and rank in one pass.
pub fn take_snapshot(
    root: &Path,
    max_count: usize,
    command_width: usize,
    globals: Option<Globals>,
    clock_ticks_per_second: u64,
) -> Snapshot {
    let readings = globals
        .map(|g| g.readings)
        .unwrap_or_else(|| Readings::unavailable(clock_ticks_per_second));

    let mut samples: Vec<ProcessSample> = enumerate(root, max_count)
        .iter()
        .map(|raw| ProcessSample::derive(raw, &readings, command_width))
        .collect();
    ranking::rank(&mut samples);

    debug!(count = samples.len(), "snapshot taken");

    Snapshot {
        samples,
        stats: globals.map(|g| g.stats),
    }
}
