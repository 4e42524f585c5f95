use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Delivers a termination request to a process.
pub trait Terminator {
    /// Returns the signal that was delivered.
    fn terminate(&mut self, pid: u32) -> Result<Signal>;
}

/// Sends real signals through kill(2).
#[derive(Debug, Default, Clone, Copy)]
pub struct SignalTerminator;

impl Terminator for SignalTerminator {
    fn terminate(&mut self, pid: u32) -> Result<Signal> {
        terminate_process(pid)
    }
}

//Terminate (Graceful stop, then force)
//Sends SIGTERM; only if that cannot be delivered is SIGKILL tried
pub fn terminate_process(pid: u32) -> Result<Signal> {
    let nix_pid = Pid::from_raw(pid as i32);

    if let Err(term_err) = signal::kill(nix_pid, Signal::SIGTERM) {
        warn!(pid, error = %term_err, "SIGTERM failed, escalating to SIGKILL");
        return signal::kill(nix_pid, Signal::SIGKILL)
            .map(|_| Signal::SIGKILL)
            .map_err(|source| Error::Signal {
                pid,
                signal: "SIGKILL",
                source,
            });
    }

    info!(pid, "sent SIGTERM");
    Ok(Signal::SIGTERM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn terminates_a_child() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        let sent = SignalTerminator.terminate(child.id()).unwrap();
        assert_eq!(sent, Signal::SIGTERM);
        let status = child.wait().unwrap();
        assert!(!status.success());
    }

    #[test]
    fn missing_pid_is_reported() {
        // pid_max never reaches this value
        let err = terminate_process(i32::MAX as u32).unwrap_err();
        assert!(matches!(err, Error::Signal { signal: "SIGKILL", .. }));
    }
}
