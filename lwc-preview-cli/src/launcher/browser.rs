use anyhow::{Context, Result};

use super::{LaunchContext, Launcher};

/// Opens the preview in the default desktop browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserLauncher;

impl Launcher for BrowserLauncher {
    fn launch(&self, ctx: &LaunchContext) -> Result<()> {
        let url = ctx.url();
        open::that(&url).with_context(|| format!("Failed to open browser at {url}"))
    }
}
