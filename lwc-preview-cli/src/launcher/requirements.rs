//! Platform tool checks run before the server starts.

use anyhow::Result;
use colored::Colorize;
use std::process::Command;

use super::Platform;

/// An external tool a platform needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub program: &'static str,
    pub version_arg: &'static str,
    pub install_hint: &'static str,
}

const XCRUN: Requirement = Requirement {
    program: "xcrun",
    version_arg: "--version",
    install_hint: "Install Xcode and its command line tools:\n  xcode-select --install",
};

const ADB: Requirement = Requirement {
    program: "adb",
    version_arg: "version",
    install_hint: "Install the Android SDK platform tools and add them to PATH:\n  https://developer.android.com/tools/releases/platform-tools",
};

pub fn requirements(platform: Platform) -> &'static [Requirement] {
    match platform {
        Platform::Desktop => &[],
        Platform::Ios => &[XCRUN],
        Platform::Android => &[ADB],
    }
}

/// Fail with an install hint when a tool for `platform` is missing.
pub fn check(platform: Platform) -> Result<()> {
    for requirement in requirements(platform) {
        check_installed(requirement)?;
    }
    Ok(())
}

fn check_installed(requirement: &Requirement) -> Result<()> {
    let output = Command::new(requirement.program)
        .arg(requirement.version_arg)
        .output();

    match output {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout);
            let first_line = version.lines().next().unwrap_or_default();
            println!(
                "  {} {} found: {}",
                "✓".green(),
                requirement.program,
                first_line.trim()
            );
            Ok(())
        },
        _ => anyhow::bail!(
            "{} not found. {}",
            requirement.program,
            requirement.install_hint
        ),
    }
}
