//! Custom labels metadata (`*.labels-meta.xml`).

use serde::Deserialize;

/// Suffix of custom-label metadata files.
pub const LABELS_SUFFIX: &str = ".labels-meta.xml";

/// A parsed `CustomLabels` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename = "CustomLabels")]
pub struct CustomLabels {
    #[serde(rename = "labels", default)]
    pub labels: Vec<CustomLabel>,
}

/// One `<labels>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLabel {
    pub full_name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
}

impl CustomLabels {
    /// Parse a labels document.
    pub fn parse(xml: &str) -> Result<Self, quick_xml::DeError> {
        quick_xml::de::from_str(xml)
    }

    /// Look up a label by its `fullName`.
    pub fn find(&self, name: &str) -> Option<&CustomLabel> {
        self.labels.iter().find(|label| label.full_name == name)
    }
}
