//! Server configuration: the optional project file and the effective merge.

pub mod builder;
pub mod file;

pub use builder::{build_config, ConfigBuilder, ServerConfig};
pub use file::{
    LwcSection, ModuleRecord, ProviderSpec, RouteConfig, ServerMode, UserConfig, CONFIG_FILE,
};
