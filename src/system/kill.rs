use sysinfo::{Pid, Signal, System};

use super::host::SysinfoHost;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillResult {
    Sent(u32),
    Failed(u32, String),
    NotFound(u32),
}

impl KillResult {
    /// Status line for a kill aimed at `name`.
    pub fn message(&self, name: &str) -> String {
        match self {
            KillResult::Sent(pid) => format!("Sent SIGTERM to {name} (PID: {pid})"),
            KillResult::Failed(_, reason) => format!("Failed to kill {name}: {reason}"),
            KillResult::NotFound(pid) => format!("Process {pid} not found"),
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, KillResult::Sent(_))
    }
}

/// Asks a process to terminate.
pub trait ProcessSignaller {
    fn terminate(&mut self, pid: u32) -> KillResult;
}

impl ProcessSignaller for SysinfoHost {
    fn terminate(&mut self, pid: u32) -> KillResult {
        terminate_process(self.system(), pid)
    }
}

/// SIGTERM where the platform has it, otherwise the platform's plain kill.
/// Only processes present in the last table refresh can be reached.
pub fn terminate_process(sys: &System, pid: u32) -> KillResult {
    if pid == 0 {
        return KillResult::NotFound(pid);
    }
    let Some(process) = sys.process(Pid::from_u32(pid)) else {
        return KillResult::NotFound(pid);
    };

    match process.kill_with(Signal::Term) {
        Some(true) => KillResult::Sent(pid),
        Some(false) => KillResult::Failed(pid, "permission denied?".to_string()),
        None if process.kill() => KillResult::Sent(pid),
        None => KillResult::Failed(pid, "signal not supported".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_pid_is_not_found() {
        let host = SysinfoHost::new();
        assert_eq!(
            terminate_process(host.system(), u32::MAX - 1),
            KillResult::NotFound(u32::MAX - 1)
        );
        assert_eq!(terminate_process(host.system(), 0), KillResult::NotFound(0));
    }

    #[test]
    fn messages_name_the_process() {
        assert_eq!(
            KillResult::Sent(42).message("cc1"),
            "Sent SIGTERM to cc1 (PID: 42)"
        );
        assert_eq!(
            KillResult::Failed(42, "permission denied?".into()).message("launchd"),
            "Failed to kill launchd: permission denied?"
        );
        assert!(!KillResult::NotFound(7).is_sent());
    }
}
