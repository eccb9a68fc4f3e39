//! LWC Preview Server
//!
//! Serves a single Lightning Web Component from a local Salesforce DX project
//! so it can be previewed in a desktop browser or a mobile simulator.
//!
//! # Usage
//!
//! ```bash
//! lwc-preview preview --name force-app/main/default/lwc/helloWorld
//! ```
//!
//! # Features
//!
//! - `c/<name>` component imports resolved from the project's package directories
//! - `@salesforce/label/*` served from `*.labels-meta.xml` files
//! - `@salesforce/resourceUrl/*` and `@salesforce/contentAssetUrl/*` mapped to project paths
//! - Optional `lwr.config.json` merged over computed defaults
//! - Self-terminates after a configurable idle period
//!
//! # Embedding
//!
//! ```no_run
//! use lwc_preview::{build_config, PreviewServer, ServerOptions};
//! use std::path::Path;
//!
//! # async fn run() -> lwc_preview::Result<()> {
//! let config = build_config("force-app/main/default/lwc/helloWorld", Path::new("."), None)?;
//! let handle = PreviewServer::start(config, ServerOptions::with_idle_minutes(30)).await?;
//! println!("Preview at {}", handle.url());
//! handle.wait().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod labels;
pub mod locator;
pub mod port;
pub mod project;
pub mod resolver;
pub mod server;

pub use config::{build_config, ConfigBuilder, ServerConfig, ServerMode, UserConfig};
pub use error::{PreviewError, Result};
pub use locator::{Diagnostic, DiagnosticKind, ProjectIndex};
pub use project::ComponentRef;
pub use resolver::{ModuleProvider, ProviderChain, ProviderRegistry};
pub use server::{start_server, PreviewServer, ProcessExit, ServerHandle, ServerOptions};
