use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DatasetFormat {
    Csv,
    Json,
    Tsv,
    Xlsx,
}

impl DatasetFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetFormat::Csv => "CSV",
            DatasetFormat::Json => "JSON",
            DatasetFormat::Tsv => "TSV",
            DatasetFormat::Xlsx => "XLSX",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetStatus {
    Available,
    Unavailable,
    #[default]
    Unknown,
    Checking,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,                     // "/data/x.csv" (local) or "https://..." (remote)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub format: DatasetFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, alias = "keywords")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub filters: serde_json::Value,      // hand-authored: a string or a list of strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,            // declared, e.g. "48KB"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,    // declared ISO date
    #[serde(default)]
    pub status: DatasetStatus,           // declared, never updated by probes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,
}

/// Where a descriptor's bytes live. Decided from the shape of `url` alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceClass<'a> {
    /// Root-relative path into the static asset tree, leading `/` kept.
    Local(&'a str),
    Remote(&'a str),
}

impl DatasetDescriptor {
    pub fn resource_class(&self) -> ResourceClass<'_> {
        let url = self.url.as_str();
        // "//host/x" is protocol-relative, not a local path
        if url.starts_with('/') && !url.starts_with("//") {
            ResourceClass::Local(url)
        } else {
            ResourceClass::Remote(url)
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self.resource_class(), ResourceClass::Local(_))
    }

    pub fn display_name(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.name)
    }

    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

/// Splits a root-relative url path into its segments, refusing anything that
/// could climb out of the asset root. `None` means the path is unsafe.
///
/// Percent-escapes are refused: the static file server decodes them, so an
/// escaped path would name a different file than the one checked here.
pub fn safe_segments(path: &str) -> Option<Vec<&str>> {
    if path.contains(['\\', '\0', '%']) {
        return None;
    }
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut out = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" => continue,
            "." | ".." => return None,
            s if s.contains(':') => return None,
            s => out.push(s),
        }
    }
    if out.is_empty() {
        return None;
    }
    Some(out)
}
