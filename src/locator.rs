//! Component and label discovery.
//!
//! [`ProjectIndex::locate`] reads `sfdx-project.json`, scans every declared
//! package directory for LWC component bundles and custom-label files, and
//! builds the lookup maps the module providers consult.
//!
//! # Failure policy
//!
//! Locating never fails. A missing or unreadable manifest yields an empty
//! index; a malformed label file is skipped on its own. Each degradation is
//! logged at debug level and recorded as a [`Diagnostic`] so it can be
//! surfaced by the status endpoint.
//!
//! The index is built once per server start and is read-only afterwards.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::labels::{CustomLabel, CustomLabels, LABELS_SUFFIX};
use crate::project::{relative_id, ProjectManifest, LWC_FOLDER, PROJECT_MANIFEST};

/// File suffixes that mark a component bundle when the stem matches the
/// bundle folder name. Longer suffixes first.
const COMPONENT_SUFFIXES: &[&str] = &[".js-meta.xml", ".js", ".css", ".html"];

/// Category of a discovery or startup degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ManifestUnreadable,
    ManifestInvalid,
    NoPackageDirectories,
    GlobFailed,
    LabelFileUnreadable,
    LabelFileMalformed,
    DuplicateComponent,
    UnknownProvider,
}

/// A structured record of something the locator skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub path: PathBuf,
    pub message: String,
}

/// Lookup maps for one project.
#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    root: PathBuf,
    /// Component name -> bundle directory.
    components: BTreeMap<String, PathBuf>,
    /// Project-relative label file path -> parsed document.
    labels: BTreeMap<String, CustomLabels>,
    diagnostics: Vec<Diagnostic>,
}

impl ProjectIndex {
    /// An index with no entries for `root`.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Scan the project rooted at `project_root`.
    pub fn locate(project_root: &Path) -> Self {
        let mut index = Self::empty(project_root);

        let manifest = match ProjectManifest::load(project_root) {
            Ok(manifest) => manifest,
            Err(err) => {
                let kind = match err {
                    crate::error::PreviewError::ConfigParse { .. } => {
                        DiagnosticKind::ManifestInvalid
                    },
                    _ => DiagnosticKind::ManifestUnreadable,
                };
                index.record(kind, project_root.join(PROJECT_MANIFEST), err.to_string());
                return index;
            },
        };

        let package_dirs = manifest.package_paths();
        if package_dirs.is_empty() {
            index.record(
                DiagnosticKind::NoPackageDirectories,
                project_root.join(PROJECT_MANIFEST),
                "manifest declares no package directories".to_string(),
            );
            return index;
        }

        for package_dir in package_dirs {
            let base = project_root.join(package_dir);
            index.scan_components(&base);
            index.scan_labels(&base);
        }

        tracing::debug!(
            "Located {} component(s) and {} label file(s) in {}",
            index.components.len(),
            index.labels.len(),
            project_root.display()
        );

        index
    }

    /// Project root this index was built for.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Bundle directory of the component named `name`.
    pub fn component(&self, name: &str) -> Option<&Path> {
        self.components.get(name).map(PathBuf::as_path)
    }

    /// First label named `name` across all label files.
    pub fn label(&self, name: &str) -> Option<&CustomLabel> {
        self.labels.values().find_map(|doc| doc.find(name))
    }

    pub fn components(&self) -> &BTreeMap<String, PathBuf> {
        &self.components
    }

    pub fn label_files(&self) -> &BTreeMap<String, CustomLabels> {
        &self.labels
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn scan_components(&mut self, base: &Path) {
        let pattern = format!(
            "{}/**/{}/**/*",
            glob::Pattern::escape(&base.to_string_lossy()),
            LWC_FOLDER
        );

        for path in self.glob_files(&pattern) {
            let Some(dir) = path.parent() else { continue };
            let (Some(file_name), Some(dir_name)) = (
                path.file_name().and_then(|n| n.to_str()),
                dir.file_name().and_then(|n| n.to_str()),
            ) else {
                continue;
            };

            let is_bundle_file = COMPONENT_SUFFIXES
                .iter()
                .filter_map(|suffix| file_name.strip_suffix(suffix))
                .next()
                .is_some_and(|stem| stem == dir_name);
            if !is_bundle_file {
                continue;
            }

            match self.components.get(dir_name) {
                Some(existing) if existing != dir => {
                    let message = format!(
                        "component '{}' already located at {}",
                        dir_name,
                        existing.display()
                    );
                    self.record(DiagnosticKind::DuplicateComponent, dir.to_path_buf(), message);
                },
                Some(_) => {},
                None => {
                    self.components
                        .insert(dir_name.to_string(), dir.to_path_buf());
                },
            }
        }
    }

    fn scan_labels(&mut self, base: &Path) {
        let pattern = format!(
            "{}/**/*{}",
            glob::Pattern::escape(&base.to_string_lossy()),
            LABELS_SUFFIX
        );

        for path in self.glob_files(&pattern) {
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    self.record(DiagnosticKind::LabelFileUnreadable, path, err.to_string());
                    continue;
                },
            };

            match CustomLabels::parse(&content) {
                Ok(doc) => {
                    let key = relative_id(&path, &self.root);
                    self.labels.insert(key, doc);
                },
                Err(err) => {
                    self.record(DiagnosticKind::LabelFileMalformed, path, err.to_string());
                },
            }
        }
    }

    fn glob_files(&mut self, pattern: &str) -> Vec<PathBuf> {
        let paths = match glob::glob(pattern) {
            Ok(paths) => paths,
            Err(err) => {
                self.record(DiagnosticKind::GlobFailed, PathBuf::from(pattern), err.to_string());
                return Vec::new();
            },
        };

        let mut files = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {},
                Err(err) => {
                    let path = err.path().to_path_buf();
                    self.record(DiagnosticKind::GlobFailed, path, err.to_string());
                },
            }
        }
        files
    }

    fn record(&mut self, kind: DiagnosticKind, path: PathBuf, message: String) {
        tracing::debug!("Discovery skipped {} ({:?}): {}", path.display(), kind, message);
        self.diagnostics.push(Diagnostic {
            kind,
            path,
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "sfdx-project.json",
            r#"{"packageDirectories":[{"path":"force-app","default":true},{"path":"shared"}]}"#,
        );
        dir
    }

    #[test]
    fn test_locate_components_across_package_dirs() {
        let dir = project();
        write(dir.path(), "force-app/main/default/lwc/helloWorld/helloWorld.js", "");
        write(dir.path(), "force-app/main/default/lwc/helloWorld/helloWorld.html", "");
        write(dir.path(), "force-app/main/default/lwc/helloWorld/util.js", "");
        write(dir.path(), "shared/lwc/sharedStyles/sharedStyles.css", "");
        write(dir.path(), "shared/lwc/meta/meta.js-meta.xml", "");
        write(dir.path(), "outside/lwc/ignored/ignored.js", "");

        let index = ProjectIndex::locate(dir.path());

        assert_eq!(
            index.component("helloWorld"),
            Some(dir.path().join("force-app/main/default/lwc/helloWorld").as_path())
        );
        assert!(index.component("sharedStyles").is_some());
        assert!(index.component("meta").is_some());
        assert!(index.component("util").is_none());
        assert!(index.component("ignored").is_none());
        assert!(index.diagnostics().is_empty());
    }

    #[test]
    fn test_locate_labels_skips_malformed_files() {
        let dir = project();
        write(
            dir.path(),
            "force-app/main/default/labels/CustomLabels.labels-meta.xml",
            "<CustomLabels><labels><fullName>greeting</fullName><value>Hello</value></labels></CustomLabels>",
        );
        write(
            dir.path(),
            "shared/labels/Broken.labels-meta.xml",
            "<CustomLabels><labels>",
        );

        let index = ProjectIndex::locate(dir.path());

        assert_eq!(index.label("greeting").unwrap().value, "Hello");
        assert!(index.label("missing").is_none());
        assert_eq!(index.label_files().len(), 1);
        assert!(index
            .label_files()
            .contains_key("force-app/main/default/labels/CustomLabels.labels-meta.xml"));
        assert_eq!(index.diagnostics().len(), 1);
        assert_eq!(index.diagnostics()[0].kind, DiagnosticKind::LabelFileMalformed);
    }

    #[test]
    fn test_locate_without_manifest_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "force-app/lwc/helloWorld/helloWorld.js", "");

        let index = ProjectIndex::locate(dir.path());

        assert!(index.components().is_empty());
        assert_eq!(index.diagnostics()[0].kind, DiagnosticKind::ManifestUnreadable);
    }

    #[test]
    fn test_locate_with_invalid_manifest_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "sfdx-project.json", "{ not json");

        let index = ProjectIndex::locate(dir.path());

        assert!(index.components().is_empty());
        assert_eq!(index.diagnostics()[0].kind, DiagnosticKind::ManifestInvalid);
    }

    #[test]
    fn test_duplicate_component_keeps_first() {
        let dir = project();
        write(dir.path(), "force-app/lwc/card/card.js", "");
        write(dir.path(), "shared/lwc/card/card.js", "");

        let index = ProjectIndex::locate(dir.path());

        assert_eq!(
            index.component("card"),
            Some(dir.path().join("force-app/lwc/card").as_path())
        );
        assert_eq!(index.diagnostics()[0].kind, DiagnosticKind::DuplicateComponent);
    }
}
