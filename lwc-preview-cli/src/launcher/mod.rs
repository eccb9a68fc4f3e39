//! Opening a running preview on the target platform.
//!
//! Mobile launchers drive the platform tools (`xcrun simctl`, `adb`). Each
//! one turns a [`LaunchContext`] into a list of [`ToolCommand`]s first, so
//! the command lines can be checked without a simulator.

mod android;
mod browser;
mod ios;
pub mod requirements;

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::process::Command;

pub use android::AndroidLauncher;
pub use browser::BrowserLauncher;
pub use ios::IosLauncher;

use crate::app_config::AppEntry;

/// App id that means "the platform's web browser".
pub const BROWSER_TARGET: &str = "browser";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    Desktop,
    Ios,
    Android,
}

impl Platform {
    pub fn is_mobile(self) -> bool {
        !matches!(self, Self::Desktop)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Desktop => write!(f, "desktop"),
            Self::Ios => write!(f, "ios"),
            Self::Android => write!(f, "android"),
        }
    }
}

/// What a launcher needs to know about the running preview.
#[derive(Debug, Clone)]
pub struct LaunchContext {
    pub component_name: String,
    pub project_dir: PathBuf,
    pub port: u16,
    /// Native app to launch; `None` opens the browser.
    pub app: Option<AppEntry>,
    pub app_bundle: Option<PathBuf>,
    pub device_name: Option<String>,
}

impl LaunchContext {
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Arguments handed to a native app: its configured arguments, then the
    /// preview location when the app asks for it.
    pub fn app_arguments(&self) -> Vec<(String, String)> {
        let Some(app) = &self.app else {
            return Vec::new();
        };
        let mut args: Vec<(String, String)> = app
            .launch_arguments
            .iter()
            .map(|arg| (arg.name.clone(), arg.value.clone()))
            .collect();
        if app.preview_server_enabled {
            args.push(("ComponentName".to_string(), self.component_name.clone()));
            args.push((
                "ProjectDir".to_string(),
                self.project_dir.to_string_lossy().into_owned(),
            ));
            args.push(("ServerPort".to_string(), self.port.to_string()));
            args.push(("ServerUrl".to_string(), self.url()));
        }
        args
    }
}

/// One external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: &'static str,
    pub args: Vec<String>,
    /// Failure is logged and the launch continues.
    pub allow_failure: bool,
}

impl ToolCommand {
    pub fn new(program: &'static str, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program,
            args: args.into_iter().map(Into::into).collect(),
            allow_failure: false,
        }
    }

    pub fn allow_failure(mut self) -> Self {
        self.allow_failure = true;
        self
    }

    fn run(&self) -> Result<()> {
        tracing::debug!("Running {} {}", self.program, self.args.join(" "));
        let output = Command::new(self.program)
            .args(&self.args)
            .output()
            .with_context(|| format!("Failed to run {}", self.program))?;

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if self.allow_failure {
            tracing::debug!("{} {} failed: {}", self.program, self.args.join(" "), stderr.trim());
            return Ok(());
        }
        anyhow::bail!(
            "{} {} failed: {}",
            self.program,
            self.args.join(" "),
            stderr.trim()
        )
    }
}

/// Opens a running preview.
pub trait Launcher {
    fn launch(&self, ctx: &LaunchContext) -> Result<()>;
}

/// Run `commands` in order, stopping at the first required failure.
pub fn run_all(commands: &[ToolCommand]) -> Result<()> {
    for command in commands {
        command.run()?;
    }
    Ok(())
}

/// Launcher for `platform`.
pub fn for_platform(platform: Platform) -> Box<dyn Launcher> {
    match platform {
        Platform::Desktop => Box::new(BrowserLauncher),
        Platform::Ios => Box::new(IosLauncher),
        Platform::Android => Box::new(AndroidLauncher),
    }
}
