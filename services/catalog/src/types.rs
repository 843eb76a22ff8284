use chrono::{DateTime, Utc};
use registry::{DatasetDescriptor, DatasetStatus};
use serde::{Deserialize, Serialize};

pub const UNAVAILABLE_MESSAGE: &str = "resource not accessible";

/// Live state of a dataset's backing resource. Computed per request, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetProbeResult {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub status: DatasetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub checked_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatasetProbeResult {
    pub fn available(
        d: &DatasetDescriptor,
        file_size: u64,
        last_modified: Option<DateTime<Utc>>,
        etag: String,
    ) -> Self {
        Self {
            status: DatasetStatus::Available,
            last_modified,
            file_size: Some(file_size),
            content_type: Some(d.content_type_or_default().to_string()),
            etag: Some(etag),
            error: None,
            ..Self::base(d)
        }
    }

    pub fn unavailable(d: &DatasetDescriptor) -> Self {
        Self {
            status: DatasetStatus::Unavailable,
            error: Some(UNAVAILABLE_MESSAGE.to_string()),
            ..Self::base(d)
        }
    }

    fn base(d: &DatasetDescriptor) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            description: d.description.clone(),
            url: d.url.clone(),
            status: DatasetStatus::Unknown,
            last_modified: None,
            file_size: None,
            content_type: None,
            etag: None,
            checked_at: Utc::now(),
            error: None,
        }
    }
}
