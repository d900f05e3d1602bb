use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound for any single platform sub-read.
pub const COMMAND_TIMEOUT: Duration = Duration::from_millis(400);

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Run `cmd` and return its trimmed stdout, or `None` if it fails to spawn,
/// exits non-zero, prints nothing, or is still running after `timeout`.
/// A timed-out child is killed and reaped before returning.
///
/// Stdout is drained on a reader thread while the child runs, so output
/// larger than the pipe buffer cannot stall the child.
pub fn run_command(cmd: &str, args: &[&str], timeout: Duration) -> Option<String> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let mut stdout = child.stdout.take()?;
    let reader = thread::spawn(move || {
        let mut out = Vec::new();
        let _ = stdout.read_to_end(&mut out);
        out
    });

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) if start.elapsed() >= timeout => {
                tracing::debug!(cmd, ?timeout, "platform command timed out");
                break None;
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(_) => break None,
        }
    };

    let Some(status) = status else {
        // The reader is detached: a grandchild may still hold the pipe open.
        let _ = child.kill();
        let _ = child.wait();
        return None;
    };

    let out = reader.join().ok()?;
    if !status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&out).trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout() {
        let out = run_command("sh", &["-c", "echo 16384"], COMMAND_TIMEOUT);
        assert_eq!(out.as_deref(), Some("16384"));
    }

    #[test]
    fn non_zero_exit_is_none() {
        assert!(run_command("sh", &["-c", "exit 3"], COMMAND_TIMEOUT).is_none());
    }

    #[test]
    fn missing_binary_is_none() {
        assert!(run_command("monarx-no-such-binary", &[], COMMAND_TIMEOUT).is_none());
    }

    #[test]
    fn hung_command_is_cut_off() {
        let start = Instant::now();
        let out = run_command("sh", &["-c", "sleep 5"], Duration::from_millis(50));
        assert!(out.is_none());
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn output_larger_than_pipe_buffer_is_read() {
        let out = run_command(
            "sh",
            &["-c", "head -c 200000 /dev/zero | tr '\\0' a"],
            Duration::from_secs(5),
        );
        let text = out.expect("large output");
        assert_eq!(text.len(), 200_000);
        assert!(text.bytes().all(|b| b == b'a'));
    }
}
