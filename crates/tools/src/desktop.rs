//! Desktop effector: hand URLs and application names to the OS.
//!
//! Requests are fire-and-forget: the launcher process is spawned and not
//! awaited, so success only means the OS accepted the request.
//!
//! Values reaching this module may come from an LLM reply, so URLs are
//! limited to `http`/`https` and applications to an explicit allowlist.
//! Nothing is passed through a shell.

use async_trait::async_trait;
use jarvis_core::effector::Desktop;
use jarvis_core::error::ToolError;
use reqwest::Url;
use tokio::process::Command;
use tracing::{debug, warn};

/// Opens things with the platform launcher (`open`, `xdg-open`, `rundll32`).
#[derive(Debug, Default, Clone)]
pub struct SystemDesktop {
    /// Only these applications may be launched. Empty means none.
    allowed_apps: Vec<String>,
}

impl SystemDesktop {
    pub fn new(allowed_apps: Vec<String>) -> Self {
        Self { allowed_apps }
    }

    /// The allowlisted spelling of `app_name`, matched case-insensitively.
    fn allowed_app(&self, app_name: &str) -> Option<&str> {
        let wanted = app_name.trim();
        self.allowed_apps
            .iter()
            .find(|a| a.eq_ignore_ascii_case(wanted))
            .map(String::as_str)
    }
}

/// Parse `raw` and accept only web URLs.
fn web_url(raw: &str) -> Result<Url, ToolError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ToolError::InvalidArguments(format!("invalid URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ToolError::InvalidArguments(format!(
            "refusing to open '{other}' URL"
        ))),
    }
}

fn url_command(url: &Url) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url.as_str());
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("rundll32");
        cmd.args(["url.dll,FileProtocolHandler", url.as_str()]);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url.as_str());
        cmd
    }
}

fn app_command(app_name: &str) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.args(["-a", app_name]);
        cmd
    } else {
        // No app bundle registry here; run the lower-cased name as a program
        let program = app_name.to_lowercase().replace(' ', "-");
        Command::new(program)
    }
}

fn spawn(tool_name: &str, mut cmd: Command) -> Result<(), ToolError> {
    cmd.stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null());
    cmd.spawn().map(|_| ()).map_err(|e| ToolError::ExecutionFailed {
        tool_name: tool_name.into(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl Desktop for SystemDesktop {
    async fn open_url(&self, url: &str) -> Result<(), ToolError> {
        if url.trim().is_empty() {
            return Err(ToolError::InvalidArguments("empty URL".into()));
        }
        let url = web_url(url)?;
        debug!(url = %url, "Opening URL");
        spawn("open_url", url_command(&url))
    }

    async fn launch_app(&self, app_name: &str) -> Result<(), ToolError> {
        if app_name.trim().is_empty() {
            return Err(ToolError::InvalidArguments("empty application name".into()));
        }
        let Some(app) = self.allowed_app(app_name) else {
            warn!(app = %app_name, "Application not in allowlist");
            return Err(ToolError::InvalidArguments(format!(
                "application '{app_name}' is not allowed"
            )));
        };
        debug!(app = %app, "Launching application");
        spawn("launch_app", app_command(app))
    }
}
