//! Reachability probe over the host's ping utility.
//!
//! Four echo requests, a fixed overall deadline, and a classifier that
//! understands both the Unix and Windows output families. A zero exit
//! status is not enough to call a host reachable: some utilities exit 0
//! after total packet loss, so the output is inspected for loss and
//! unreachable markers.

use std::io::Read;
use std::net::Ipv4Addr;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::ProbeError;

/// Echo requests per probe run.
pub const ECHO_COUNT: u32 = 4;

/// Overall deadline for one probe run. The session must never hang on an
/// unreachable host.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What a finished probe run means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// At least one echo reply came back.
    Success,
    /// The utility exited cleanly but every probe was lost.
    SoftFailure,
    /// The utility reported failure (non-zero exit).
    HardFailure,
}

/// Raw material of a finished probe run, for display alongside the verdict.
#[derive(Debug)]
pub struct ProbeReport {
    pub outcome: ProbeOutcome,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Probe `ip` with the platform ping utility.
pub fn ping(ip: Ipv4Addr) -> Result<ProbeReport, ProbeError> {
    let count_flag = if cfg!(windows) { "-n" } else { "-c" };

    let mut child = Command::new("ping")
        .arg(count_flag)
        .arg(ECHO_COUNT.to_string())
        .arg(ip.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ProbeError::UtilityMissing
            } else {
                ProbeError::Io(err)
            }
        })?;

    tracing::debug!(%ip, count = ECHO_COUNT, "probe started");

    let deadline = Instant::now() + PROBE_TIMEOUT;
    let status = loop {
        match child.try_wait().map_err(ProbeError::Io)? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProbeError::Timeout {
                    timeout_secs: PROBE_TIMEOUT.as_secs(),
                });
            }
            None => std::thread::sleep(POLL_INTERVAL),
        }
    };

    let mut stdout = String::new();
    if let Some(mut pipe) = child.stdout.take() {
        pipe.read_to_string(&mut stdout).map_err(ProbeError::Io)?;
    }
    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        pipe.read_to_string(&mut stderr).map_err(ProbeError::Io)?;
    }

    let outcome = classify(status.success(), &stdout);
    tracing::debug!(%ip, ?outcome, code = ?status.code(), "probe finished");
    Ok(ProbeReport {
        outcome,
        exit_code: status.code(),
        stdout,
        stderr,
    })
}

/// Classify a finished run from its exit status and standard output.
///
/// Handles two utility output families: the Unix summary line
/// ("4 packets transmitted, 0 received, 100% packet loss") and the
/// Windows per-probe/summary text ("Request timed out", "Destination
/// host unreachable", "Received = 0").
fn classify(exit_ok: bool, stdout: &str) -> ProbeOutcome {
    if !exit_ok {
        return ProbeOutcome::HardFailure;
    }

    // Unix family: the summary line is authoritative.
    if stdout.contains("0 received")
        || stdout.contains("100% packet loss")
        || stdout.contains("100.0% packet loss")
    {
        return ProbeOutcome::SoftFailure;
    }

    // Windows family: "unreachable"/"timed out" lines come from
    // intermediate hops too, so require the zero-received summary.
    let lower = stdout.to_lowercase();
    let windows_loss_marker = lower.contains("unreachable") || lower.contains("timed out");
    let zero_received = stdout.contains("Received = 0");
    if windows_loss_marker && zero_received {
        return ProbeOutcome::SoftFailure;
    }

    // No reply marker at all in a Windows-style transcript.
    let has_reply_marker =
        lower.contains("ttl=") || lower.contains("bytes=") || lower.contains("time=");
    if zero_received && !has_reply_marker {
        return ProbeOutcome::SoftFailure;
    }

    ProbeOutcome::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const UNIX_OK: &str = "PING 10.0.0.1 (10.0.0.1) 56(84) bytes of data.\n\
        64 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=0.3 ms\n\
        --- 10.0.0.1 ping statistics ---\n\
        4 packets transmitted, 4 received, 0% packet loss, time 3004ms\n";

    const UNIX_TOTAL_LOSS: &str = "PING 10.0.0.9 (10.0.0.9) 56(84) bytes of data.\n\
        --- 10.0.0.9 ping statistics ---\n\
        4 packets transmitted, 0 received, 100% packet loss, time 3065ms\n";

    const WINDOWS_OK: &str = "Pinging 10.0.0.1 with 32 bytes of data:\n\
        Reply from 10.0.0.1: bytes=32 time=1ms TTL=64\n\
        Packets: Sent = 4, Received = 4, Lost = 0 (0% loss),\n";

    const WINDOWS_TIMED_OUT: &str = "Pinging 10.0.0.9 with 32 bytes of data:\n\
        Request timed out.\n\
        Request timed out.\n\
        Request timed out.\n\
        Request timed out.\n\
        Packets: Sent = 4, Received = 0, Lost = 4 (100% loss),\n";

    const WINDOWS_UNREACHABLE: &str = "Pinging 10.0.0.9 with 32 bytes of data:\n\
        Destination host unreachable.\n\
        Packets: Sent = 4, Received = 0, Lost = 4 (100% loss),\n";

    #[test]
    fn replies_classify_as_success() {
        assert_eq!(classify(true, UNIX_OK), ProbeOutcome::Success);
        assert_eq!(classify(true, WINDOWS_OK), ProbeOutcome::Success);
    }

    #[test]
    fn clean_exit_with_total_loss_is_a_soft_failure() {
        assert_eq!(classify(true, UNIX_TOTAL_LOSS), ProbeOutcome::SoftFailure);
        assert_eq!(classify(true, WINDOWS_TIMED_OUT), ProbeOutcome::SoftFailure);
        assert_eq!(
            classify(true, WINDOWS_UNREACHABLE),
            ProbeOutcome::SoftFailure
        );
    }

    #[test]
    fn nonzero_exit_is_a_hard_failure_regardless_of_output() {
        assert_eq!(classify(false, UNIX_OK), ProbeOutcome::HardFailure);
        assert_eq!(classify(false, ""), ProbeOutcome::HardFailure);
    }
}
