//! Android emulator launcher
//!
//! `adb reverse` forwards the emulator's `localhost:<port>` to the host, so
//! the same preview URL works on both sides.

use anyhow::Result;

use super::{run_all, LaunchContext, Launcher, ToolCommand};

#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidLauncher;

impl AndroidLauncher {
    fn adb(ctx: &LaunchContext, args: impl IntoIterator<Item = String>) -> ToolCommand {
        let mut full = Vec::new();
        if let Some(device) = &ctx.device_name {
            full.push("-s".to_string());
            full.push(device.clone());
        }
        full.extend(args);
        ToolCommand::new("adb", full)
    }

    /// Tool commands that open the preview, in order.
    pub fn plan(&self, ctx: &LaunchContext) -> Vec<ToolCommand> {
        let tcp = format!("tcp:{}", ctx.port);
        let mut commands = vec![Self::adb(
            ctx,
            ["reverse".to_string(), tcp.clone(), tcp],
        )];

        if let Some(bundle) = &ctx.app_bundle {
            commands.push(Self::adb(
                ctx,
                [
                    "install".to_string(),
                    "-r".to_string(),
                    bundle.to_string_lossy().into_owned(),
                ],
            ));
        }

        let mut start: Vec<String> = ["shell", "am", "start"].map(String::from).to_vec();
        match &ctx.app {
            Some(app) => {
                start.extend(
                    [
                        "-a",
                        "android.intent.action.MAIN",
                        "-c",
                        "android.intent.category.LAUNCHER",
                        "-p",
                    ]
                    .map(String::from),
                );
                start.push(app.id.clone());
                for (name, value) in ctx.app_arguments() {
                    start.push("--es".to_string());
                    start.push(name);
                    start.push(value);
                }
            },
            None => {
                start.extend(["-a", "android.intent.action.VIEW", "-d"].map(String::from));
                start.push(ctx.url());
            },
        }
        commands.push(Self::adb(ctx, start));

        commands
    }
}

impl Launcher for AndroidLauncher {
    fn launch(&self, ctx: &LaunchContext) -> Result<()> {
        run_all(&self.plan(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::test_support::{app, context};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_browser_target_views_url() {
        let plan = AndroidLauncher.plan(&context(None));

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].args, vec!["reverse", "tcp:3002", "tcp:3002"]);
        assert_eq!(
            plan[1].args,
            vec![
                "shell",
                "am",
                "start",
                "-a",
                "android.intent.action.VIEW",
                "-d",
                "http://localhost:3002"
            ]
        );
    }

    #[test]
    fn test_app_target_passes_extras_on_selected_device() {
        let mut ctx = context(Some(app(false)));
        ctx.device_name = Some("emulator-5554".to_string());

        let plan = AndroidLauncher.plan(&ctx);
        let start = &plan[1].args;

        assert_eq!(&start[..2], &["-s", "emulator-5554"]);
        assert!(start.contains(&"com.example.previewer".to_string()));
        assert_eq!(&start[start.len() - 3..], &["--es", "theme", "dark"]);
    }
}
