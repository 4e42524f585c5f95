//! Parser for the single-record `/proc/[pid]/stat` format.

use super::pcb::PcbData;

// Field positions counted from the first token after the closing parenthesis.
const STATE: usize = 0;
const UTIME: usize = 11;
const STIME: usize = 12;
const STARTTIME: usize = 19;
const VSIZE: usize = 20;

/// A successfully parsed status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRecord {
    pub command: String,
    pub pcb: PcbData,
}

/// Parses a status record. The command sits between the first `(` and the
/// last `)` and may itself contain spaces, parentheses or newlines.
///
/// Returns `None` for anything malformed, including too few trailing fields.
pub fn parse_stat(line: &str) -> Option<StatRecord> {
    let open = line.find('(')?;
    let close = line.rfind(')')?;
    if close <= open {
        return None;
    }

    let command = line[open + 1..close].to_string();
    let fields: Vec<&str> = line[close + 1..].split_whitespace().collect();
    if fields.len() <= VSIZE {
        return None;
    }

    let mut state_chars = fields[STATE].chars();
    let state = state_chars.next()?;
    if state_chars.next().is_some() {
        return None;
    }

    Some(StatRecord {
        command,
        pcb: PcbData {
            state,
            user_ticks: fields[UTIME].parse().ok()?,
            kernel_ticks: fields[STIME].parse().ok()?,
            start_ticks: fields[STARTTIME].parse().ok()?,
            vsize_bytes: fields[VSIZE].parse().ok()?,
        },
    })
}
