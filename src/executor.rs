use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Exit code reported for timeouts and spawn failures
pub const SYNTHETIC_FAILURE_CODE: i32 = -1;

/// Result of running a command in capture mode
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Build the shell invocation for a command string
fn shell_command(command: &str) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    };
    cmd.kill_on_drop(true);
    cmd
}

/// Run a command capturing stdout and stderr.
///
/// An elapsed timeout or a spawn failure is reported as a synthetic failure
/// with exit code -1 and the reason in stderr; this function never errors.
/// The CLI path streams instead; this mode is kept for scripted callers.
#[allow(dead_code)]
pub async fn execute_command(command: &str, timeout: Option<Duration>) -> CaptureResult {
    let mut cmd = shell_command(command);
    cmd.stdin(Stdio::null());

    let output_future = cmd.output();

    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, output_future).await {
            Ok(result) => result,
            Err(_) => {
                return CaptureResult {
                    exit_code: SYNTHETIC_FAILURE_CODE,
                    stdout: String::new(),
                    stderr: format!("Command timed out after {} seconds", limit.as_secs()),
                };
            }
        },
        None => output_future.await,
    };

    match output {
        Ok(output) => CaptureResult {
            exit_code: output.status.code().unwrap_or(SYNTHETIC_FAILURE_CODE),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
        Err(e) => CaptureResult {
            exit_code: SYNTHETIC_FAILURE_CODE,
            stdout: String::new(),
            stderr: e.to_string(),
        },
    }
}

/// Run a command with stdout/stderr inherited from the terminal.
///
/// Returns the command's exit code, or -1 when it could not be started or
/// was killed by a signal.
pub async fn stream_command(command: &str) -> i32 {
    let mut cmd = shell_command(command);
    cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());

    match cmd.status().await {
        Ok(status) => status.code().unwrap_or(SYNTHETIC_FAILURE_CODE),
        Err(e) => {
            eprintln!("Error: {}", e);
            SYNTHETIC_FAILURE_CODE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_capture_success() {
        let result = execute_command("echo hello", None).await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout.trim(), "hello");
        assert!(result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_capture_nonzero_exit() {
        let result = execute_command("exit 3", None).await;
        assert_eq!(result.exit_code, 3);
    }

    #[tokio::test]
    async fn test_capture_stderr() {
        let result = execute_command("echo oops >&2", None).await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_capture_timeout_is_synthetic_failure() {
        let result = execute_command("sleep 5", Some(Duration::from_millis(100))).await;
        assert_eq!(result.exit_code, SYNTHETIC_FAILURE_CODE);
        assert!(result.stdout.is_empty());
        assert!(result.stderr.contains("timed out"));
    }

    #[tokio::test]
    async fn test_capture_within_timeout() {
        let result = execute_command("echo quick", Some(Duration::from_secs(10))).await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout.trim(), "quick");
    }

    #[tokio::test]
    async fn test_stream_returns_exit_code() {
        assert_eq!(stream_command("true").await, 0);
        assert_eq!(stream_command("false").await, 1);
    }
}
