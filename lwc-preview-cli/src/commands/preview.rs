//! Preview command - serve one component and open it on a platform

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use colored::Colorize;
use lwc_preview::server::DEFAULT_IDLE_TIMEOUT_MINUTES;
use lwc_preview::{build_config, PreviewServer, ServerOptions};
use std::path::{Path, PathBuf};

use crate::app_config::{AppEntry, AppPreviewConfig};
use crate::launcher::{self, requirements, LaunchContext, Launcher, Platform, BROWSER_TARGET};

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Component directory, relative to the project directory
    #[arg(short = 'n', long)]
    pub name: String,

    /// Salesforce DX project directory
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,

    /// Where to open the preview
    #[arg(long, value_enum, default_value_t = Platform::Desktop)]
    pub platform: Platform,

    /// App preview configuration (required for ios and android)
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// App id from the configuration file, or `browser`
    #[arg(long, default_value = BROWSER_TARGET)]
    pub target_app: String,

    /// Minutes without requests before the server exits
    #[arg(
        long,
        env = "LWC_PREVIEW_IDLE_TIMEOUT",
        default_value_t = DEFAULT_IDLE_TIMEOUT_MINUTES,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub idle_timeout: u64,

    /// Simulator or emulator to use
    #[arg(long)]
    pub device_name: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// The app a preview opens in, after validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchTarget {
    pub app: Option<AppEntry>,
    pub app_bundle: Option<PathBuf>,
}

/// Check argument combinations and look up the target app.
pub fn resolve_target(args: &PreviewArgs) -> Result<LaunchTarget> {
    if args.name.trim().is_empty() {
        bail!("Component name must not be empty");
    }

    if !args.platform.is_mobile() {
        if args.target_app != BROWSER_TARGET {
            bail!(
                "--target-app '{}' needs --platform ios or android",
                args.target_app
            );
        }
        return Ok(LaunchTarget::default());
    }

    let Some(config_file) = &args.config_file else {
        bail!("--config-file is required for --platform {}", args.platform);
    };
    let config = AppPreviewConfig::load(config_file)?;

    if args.target_app == BROWSER_TARGET {
        return Ok(LaunchTarget::default());
    }

    let app = config
        .find(args.platform, &args.target_app)
        .cloned()
        .ok_or_else(|| {
            anyhow!(
                "App '{}' is not configured for {} in {}",
                args.target_app,
                args.platform,
                config_file.display()
            )
        })?;

    let config_dir = config_file.parent().unwrap_or_else(|| Path::new("."));
    let app_bundle = app.bundle_path(config_dir);
    if let Some(bundle) = &app_bundle {
        if !bundle.exists() {
            bail!("App bundle {} does not exist", bundle.display());
        }
    }

    Ok(LaunchTarget {
        app: Some(app),
        app_bundle,
    })
}

/// Run the preview. Returns the exit status once the server stops.
pub async fn execute(args: PreviewArgs) -> Result<i32> {
    let target = resolve_target(&args)?;

    println!("\n{}", "Starting LWC Preview".bright_cyan().bold());
    println!("{}", "─────────────────────────────────".bright_cyan());

    requirements::check(args.platform)?;

    let config = build_config(&args.name, &args.project_dir, None)
        .context("Failed to build preview configuration")?;
    let component_name = config.component.name().to_string();
    let project_dir = config.component.project_dir.clone();
    let root_component = config.component.root_component_id.clone();

    let handle = PreviewServer::start(config, ServerOptions::with_idle_minutes(args.idle_timeout))
        .await
        .context("Failed to start preview server")?;

    println!("  {} Component: {}", "→".blue(), root_component.bright_yellow());
    println!(
        "  {} Preview URL: {} ({} mode)",
        "→".blue(),
        handle.url().bright_green(),
        handle.mode()
    );
    println!(
        "  {} Platform: {}{}",
        "→".blue(),
        args.platform.to_string().bright_magenta(),
        target
            .app
            .as_ref()
            .map(|app| format!(" ({})", app.name))
            .unwrap_or_default()
    );
    println!(
        "  {} Stops after {} idle minute(s)",
        "→".blue(),
        args.idle_timeout
    );
    println!();

    let ctx = LaunchContext {
        component_name,
        project_dir,
        port: handle.port(),
        app: target.app,
        app_bundle: target.app_bundle,
        device_name: args.device_name,
    };
    let platform = args.platform;
    let launched =
        tokio::task::spawn_blocking(move || launcher::for_platform(platform).launch(&ctx))
            .await
            .context("Launcher task failed")?;
    if let Err(err) = launched {
        eprintln!("{} {:#}", "Failed to open preview:".red(), err);
        eprintln!("  Open {} manually.", handle.url());
    }

    Ok(handle.wait().await)
}
