//! Project manifest and component reference handling.
//!
//! A Salesforce DX project declares its source roots in `sfdx-project.json`.
//! Components are referenced by a path relative to the project directory,
//! e.g. `force-app/main/default/lwc/helloWorld`.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::error::{PreviewError, Result};

/// File name of the project manifest in the project root.
pub const PROJECT_MANIFEST: &str = "sfdx-project.json";

/// Folder name that conventionally contains LWC component bundles.
pub const LWC_FOLDER: &str = "lwc";

/// The subset of `sfdx-project.json` the preview server reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    #[serde(default)]
    pub package_directories: Vec<PackageDirectory>,
}

/// One entry of `packageDirectories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDirectory {
    pub path: String,
    #[serde(default)]
    pub default: bool,
}

impl ProjectManifest {
    /// Load the manifest from `project_root`.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(PROJECT_MANIFEST);
        let content = std::fs::read_to_string(&path).map_err(|source| PreviewError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| PreviewError::ConfigParse { path, source })
    }

    /// Declared package directory paths, in manifest order.
    pub fn package_paths(&self) -> Vec<&str> {
        self.package_directories
            .iter()
            .map(|dir| dir.path.trim_end_matches(['/', '\\']))
            .filter(|path| !path.is_empty())
            .collect()
    }
}

/// A component reference decomposed against its project directory.
///
/// `modules_root_dir` is always two levels above `component_path`
/// (`<modules_root>/lwc/<name>`). When the component's parent folder is not
/// named `lwc` the layout is flagged as unconventional rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    pub project_dir: PathBuf,
    pub component_path: PathBuf,
    pub modules_root_dir: PathBuf,
    /// Path of the component relative to `modules_root_dir`, `/`-separated.
    pub root_component_id: String,
    pub conventional_layout: bool,
}

impl ComponentRef {
    /// Decompose `component` (relative to `project_dir`, or absolute).
    ///
    /// This is pure path computation; use [`validate`](Self::validate) to
    /// check that the component exists on disk.
    pub fn resolve(component: &str, project_dir: &Path) -> Result<Self> {
        let trimmed = component.trim();
        if trimmed.is_empty() {
            return Err(PreviewError::InvalidComponent {
                path: PathBuf::from(component),
                reason: "component reference is empty".to_string(),
            });
        }

        let project_dir = normalize(&absolute(project_dir)?);
        let component_path = normalize(&project_dir.join(trimmed));

        let modules_root_dir = component_path
            .parent()
            .and_then(Path::parent)
            .filter(|root| root.starts_with(&project_dir) && root.parent().is_some())
            .map(Path::to_path_buf)
            .ok_or_else(|| PreviewError::InvalidComponent {
                path: component_path.clone(),
                reason: "component must live at least two levels below the project directory"
                    .to_string(),
            })?;

        let root_component_id = relative_id(&component_path, &modules_root_dir);
        let conventional_layout = component_path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|name| name == LWC_FOLDER);

        if !conventional_layout {
            tracing::warn!(
                "Component {} is not inside an '{}' folder; root component id '{}' may be wrong",
                component_path.display(),
                LWC_FOLDER,
                root_component_id
            );
        }

        Ok(Self {
            project_dir,
            component_path,
            modules_root_dir,
            root_component_id,
            conventional_layout,
        })
    }

    /// Check that the component directory exists.
    pub fn validate(&self) -> Result<()> {
        if self.component_path.is_dir() {
            Ok(())
        } else {
            Err(PreviewError::InvalidComponent {
                path: self.component_path.clone(),
                reason: "component directory does not exist".to_string(),
            })
        }
    }

    /// Bare component name (the directory basename).
    pub fn name(&self) -> &str {
        self.component_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    /// Root component id with `/` replaced by `-`, used in route ids.
    pub fn dashed_id(&self) -> String {
        self.root_component_id.replace('/', "-")
    }
}

/// Join path components below `base` with `/`, independent of platform.
pub(crate) fn relative_id(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::path::absolute(path)?)
    }
}

/// Lexically resolve `.` and `..` without touching the filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                out.pop();
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
