use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Operating system families the prompt template distinguishes between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OsKind {
    Linux,
    MacOs,
    Windows,
    Unknown,
}

impl OsKind {
    /// Detect the OS family of the running process
    pub fn detect() -> Self {
        match env::consts::OS {
            "linux" => OsKind::Linux,
            "macos" => OsKind::MacOs,
            "windows" => OsKind::Windows,
            _ => OsKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OsKind::Linux => "linux",
            OsKind::MacOs => "macos",
            OsKind::Windows => "windows",
            OsKind::Unknown => "unknown",
        }
    }
}

/// CLI tools the prompt mentions when they are installed
const TOOLS_TO_CHECK: &[&str] = &[
    "aws",
    "kubectl",
    "docker",
    "git",
    "terraform",
    "helm",
    "gcloud",
    "az",
];

/// How long to wait for `kubectl config current-context`
const KUBECTL_TIMEOUT: Duration = Duration::from_secs(5);

/// Immutable snapshot of the runtime environment, taken once per invocation.
///
/// Every field is best-effort: a failed lookup degrades to `None` or an
/// omission, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub os: OsKind,
    pub shell: String,
    pub cwd: String,
    pub aws_profile: Option<String>,
    pub k8s_context: Option<String>,
    pub tools: Vec<String>,
}

impl Environment {
    /// Probe the current environment
    pub async fn detect() -> Self {
        let os = OsKind::detect();
        let shell = detect_shell();
        let cwd = env::current_dir()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| ".".to_string());

        let aws_profile = non_empty_var("AWS_PROFILE").or_else(|| non_empty_var("AWS_DEFAULT_PROFILE"));

        let tools: Vec<String> = TOOLS_TO_CHECK
            .iter()
            .filter(|tool| tool_on_path(tool))
            .map(|tool| tool.to_string())
            .collect();

        let k8s_context = if tools.iter().any(|t| t == "kubectl") {
            current_k8s_context().await
        } else {
            None
        };

        Environment {
            os,
            shell,
            cwd,
            aws_profile,
            k8s_context,
            tools,
        }
    }
}

/// Basename of `$SHELL`, defaulting to bash
fn detect_shell() -> String {
    env::var("SHELL")
        .ok()
        .and_then(|path| path.rsplit('/').next().map(|s| s.to_string()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "bash".to_string())
}

/// Check whether an executable with this name exists on the search path
fn tool_on_path(tool: &str) -> bool {
    let Some(path_var) = env::var_os("PATH") else {
        return false;
    };

    env::split_paths(&path_var).any(|dir| {
        let candidate = dir.join(tool);
        if candidate.is_file() {
            return true;
        }
        // Windows executables carry an extension
        if cfg!(windows) {
            for ext in ["exe", "cmd", "bat"] {
                if dir.join(format!("{}.{}", tool, ext)).is_file() {
                    return true;
                }
            }
        }
        false
    })
}

/// Ask kubectl for the active context, swallowing every failure mode
async fn current_k8s_context() -> Option<String> {
    let mut cmd = tokio::process::Command::new("kubectl");
    cmd.args(["config", "current-context"])
        .stdin(std::process::Stdio::null());

    let output = tokio::time::timeout(KUBECTL_TIMEOUT, cmd.output())
        .await
        .ok()?
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let context = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if context.is_empty() {
        None
    } else {
        Some(context)
    }
}

/// Read an environment variable, treating empty values as unset
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_environment_detection() {
        let env = Environment::detect().await;

        // OS kind is always one of the fixed set
        assert!(matches!(
            env.os,
            OsKind::Linux | OsKind::MacOs | OsKind::Windows | OsKind::Unknown
        ));
        assert!(!env.os.as_str().is_empty());

        // Working directory is never null
        assert!(!env.cwd.is_empty());

        // Shell falls back to bash rather than being empty
        assert!(!env.shell.is_empty());
    }

    #[test]
    fn test_os_kind_matches_build_target() {
        let kind = OsKind::detect();
        if cfg!(target_os = "linux") {
            assert_eq!(kind, OsKind::Linux);
        }
        if cfg!(target_os = "macos") {
            assert_eq!(kind, OsKind::MacOs);
        }
    }

    #[test]
    fn test_shell_detection_is_basename() {
        let shell = detect_shell();
        assert!(!shell.contains('/'));
    }

    #[test]
    fn test_tool_on_path_finds_common_binary() {
        // `ls` exists on every unix PATH; the check must not panic either way
        if cfg!(unix) {
            assert!(tool_on_path("ls"));
        }
        assert!(!tool_on_path("definitely-not-a-real-tool-name"));
    }

    #[tokio::test]
    async fn test_k8s_context_probe_never_panics() {
        // kubectl may or may not be installed; either way this must complete
        let _ = current_k8s_context().await;
    }
}
