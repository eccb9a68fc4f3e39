//! iOS simulator launcher

use anyhow::Result;

use super::{run_all, LaunchContext, Launcher, ToolCommand};

/// Simulator used when no device name is given.
pub const DEFAULT_IOS_DEVICE: &str = "iPhone 15";

#[derive(Debug, Clone, Copy, Default)]
pub struct IosLauncher;

impl IosLauncher {
    /// Tool commands that open the preview, in order.
    pub fn plan(&self, ctx: &LaunchContext) -> Vec<ToolCommand> {
        let device = ctx.device_name.as_deref().unwrap_or(DEFAULT_IOS_DEVICE);

        // Booting an already booted simulator fails harmlessly.
        let mut commands = vec![
            ToolCommand::new("xcrun", ["simctl", "boot", device]).allow_failure(),
            ToolCommand::new("open", ["-a", "Simulator"]).allow_failure(),
        ];

        if let Some(bundle) = &ctx.app_bundle {
            commands.push(ToolCommand::new(
                "xcrun",
                [
                    "simctl".to_string(),
                    "install".to_string(),
                    device.to_string(),
                    bundle.to_string_lossy().into_owned(),
                ],
            ));
        }

        match &ctx.app {
            Some(app) => {
                let mut args = vec![
                    "simctl".to_string(),
                    "launch".to_string(),
                    device.to_string(),
                    app.id.clone(),
                ];
                for (name, value) in ctx.app_arguments() {
                    args.push(format!("-{name}"));
                    args.push(value);
                }
                commands.push(ToolCommand::new("xcrun", args));
            },
            None => commands.push(ToolCommand::new(
                "xcrun",
                ["simctl".to_string(), "openurl".to_string(), device.to_string(), ctx.url()],
            )),
        }

        commands
    }
}

impl Launcher for IosLauncher {
    fn launch(&self, ctx: &LaunchContext) -> Result<()> {
        run_all(&self.plan(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::test_support::{app, context};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_browser_target_opens_url() {
        let plan = IosLauncher.plan(&context(None));

        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].args, vec!["simctl", "boot", DEFAULT_IOS_DEVICE]);
        assert!(plan[0].allow_failure);
        assert_eq!(
            plan[2].args,
            vec!["simctl", "openurl", DEFAULT_IOS_DEVICE, "http://localhost:3002"]
        );
    }

    #[test]
    fn test_app_target_installs_and_launches() {
        let mut ctx = context(Some(app(true)));
        ctx.device_name = Some("iPad Pro".to_string());
        ctx.app_bundle = Some(PathBuf::from("/build/Previewer.app"));

        let plan = IosLauncher.plan(&ctx);

        assert_eq!(
            plan[2].args,
            vec!["simctl", "install", "iPad Pro", "/build/Previewer.app"]
        );
        let launch = &plan[3].args;
        assert_eq!(&launch[..4], &["simctl", "launch", "iPad Pro", "com.example.previewer"]);
        assert_eq!(&launch[4..6], &["-theme", "dark"]);
        assert!(launch.contains(&"-ServerPort".to_string()));
        assert!(!plan[3].allow_failure);
    }
}
