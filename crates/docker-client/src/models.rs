//! Docker data models
//!
//! Only the fields the checker reads are kept. Everything else the Engine API
//! returns for a container summary is dropped on conversion.

use chrono::{DateTime, Utc};

/// A running container as reported by the Docker daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Full container ID (64 hex characters on a stock daemon)
    pub id: String,
    /// Image reference the container was started from (e.g. `nginx:1.25`)
    pub image: String,
    /// Resolved image ID (`sha256:...`)
    pub image_id: String,
    /// Creation time, when the daemon reported one
    pub created: Option<DateTime<Utc>>,
}

impl Container {
    /// Create a container record with no creation timestamp.
    pub fn new(id: impl Into<String>, image: impl Into<String>, image_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image: image.into(),
            image_id: image_id.into(),
            created: None,
        }
    }

    /// Time elapsed since the container was created, if known.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.created.map(|created| now - created)
    }
}

impl TryFrom<bollard::models::ContainerSummary> for Container {
    type Error = bollard::models::ContainerSummary;

    /// Summaries without an ID are handed back so the caller can log and skip them.
    fn try_from(summary: bollard::models::ContainerSummary) -> Result<Self, Self::Error> {
        let Some(id) = summary.id.clone().filter(|id| !id.is_empty()) else {
            return Err(summary);
        };

        Ok(Self {
            id,
            image: summary.image.unwrap_or_default(),
            image_id: summary.image_id.unwrap_or_default(),
            created: summary
                .created
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        })
    }
}
