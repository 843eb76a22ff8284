use std::collections::HashMap;
use std::path::Path;

use crate::{safe_segments, DatasetDescriptor, ResourceClass};
use thiserror::Error;

const BUILTIN: &str = include_str!("../data/datasets.json");

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error reading registry {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse registry: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Dataset at position {index} has an empty id")]
    EmptyId { index: usize },

    #[error("Duplicate dataset id: {id}")]
    DuplicateId { id: String },

    #[error("Dataset {id} has an unsafe local url: {url}")]
    UnsafePath { id: String, url: String },
}

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Immutable, validated list of dataset descriptors.
///
/// Insertion order is display order. Ids are unique; a registry with
/// duplicates never gets built.
#[derive(Clone, Debug)]
pub struct Registry {
    datasets: Vec<DatasetDescriptor>,
    by_id: HashMap<String, usize>,
}

impl Registry {
    pub fn from_descriptors(datasets: Vec<DatasetDescriptor>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(datasets.len());

        for (index, d) in datasets.iter().enumerate() {
            if d.id.trim().is_empty() {
                return Err(RegistryError::EmptyId { index });
            }
            if by_id.insert(d.id.clone(), index).is_some() {
                return Err(RegistryError::DuplicateId { id: d.id.clone() });
            }
            if let ResourceClass::Local(path) = d.resource_class() {
                if safe_segments(path).is_none() {
                    return Err(RegistryError::UnsafePath {
                        id: d.id.clone(),
                        url: d.url.clone(),
                    });
                }
            }
        }

        Ok(Self { datasets, by_id })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let datasets: Vec<DatasetDescriptor> = serde_json::from_str(json)?;
        Self::from_descriptors(datasets)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The registry compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN)
    }

    pub fn list(&self) -> &[DatasetDescriptor] {
        &self.datasets
    }

    pub fn lookup(&self, id: &str) -> Option<&DatasetDescriptor> {
        self.by_id.get(id).map(|&i| &self.datasets[i])
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, url: &str) -> String {
        format!(r#"{{"id":"{id}","name":"{id}","description":"","url":"{url}","format":"CSV"}}"#)
    }

    #[test]
    fn test_builtin_registry_loads() {
        let reg = Registry::builtin().unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.list()[0].id, "uvm-professors-2023");
        let d = reg.lookup("uvm-departments-colleges").unwrap();
        assert_eq!(d.url, "/data/uvm_depts_to_colleges.csv");
        assert_eq!(d.content_type_or_default(), "text/csv");
    }

    #[test]
    fn test_duplicate_id_fails_fast() {
        let json = format!("[{},{}]", entry("a", "/a.csv"), entry("a", "/b.csv"));
        match Registry::from_json(&json) {
            Err(RegistryError::DuplicateId { id }) => assert_eq!(id, "a"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_id_rejected() {
        let json = format!("[{},{}]", entry("a", "/a.csv"), entry(" ", "/b.csv"));
        assert!(matches!(
            Registry::from_json(&json),
            Err(RegistryError::EmptyId { index: 1 })
        ));
    }

    #[test]
    fn test_traversal_url_rejected_at_load() {
        let json = format!("[{}]", entry("evil", "/../secrets.txt"));
        assert!(matches!(
            Registry::from_json(&json),
            Err(RegistryError::UnsafePath { .. })
        ));
    }

    #[test]
    fn test_percent_escaped_url_rejected_at_load() {
        let json = format!("[{}]", entry("spaced", "/data/a%20b.csv"));
        assert!(matches!(
            Registry::from_json(&json),
            Err(RegistryError::UnsafePath { .. })
        ));
    }

    #[test]
    fn test_lookup_and_order() {
        let json = format!(
            "[{},{},{}]",
            entry("c", "/c.csv"),
            entry("a", "https://example.org/a.csv"),
            entry("b", "/b.csv")
        );
        let reg = Registry::from_json(&json).unwrap();
        let ids: Vec<&str> = reg.list().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert!(reg.lookup("a").is_some());
        assert!(reg.lookup("missing").is_none());
    }
}
