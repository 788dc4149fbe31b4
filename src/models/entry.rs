use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier shared by every entry of one duplicate/similar-file cluster
pub type GroupId = u64;

/// Set of entry paths currently marked by the user.
///
/// Engines only ever read a `Selection` and return a new one.
pub type Selection = HashSet<String>;

/// Represents a single scanned file as produced by the duplicate scanner
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Absolute path, also the selection key
    pub path: String,
    /// Cluster this file belongs to (None for tools without grouping)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Reference/protected file that should survive cleanup
    #[serde(default)]
    pub is_ref: bool,
    /// Numeric facts reported by the scanner
    #[serde(default)]
    pub raw: RawMetadata,
    /// Pre-formatted size, e.g. "1.50 MB"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Pre-formatted modification date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<String>,
    /// Pre-formatted similarity, e.g. "95%"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<String>,
    /// Pre-formatted dimensions, e.g. "1920x1080"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
}

/// Raw scanner metadata. Field names follow the scanner's wire format.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawMetadata {
    /// File size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Last modified timestamp (milliseconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<i64>,
    /// Created timestamp (milliseconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Content hash as reported by the scanner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Number of hard links to the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardlinks: Option<u64>,
}

impl Entry {
    /// Create an ungrouped entry with no metadata
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Place the entry in a group
    pub fn in_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Mark the entry as a reference (protected) file
    pub fn as_reference(mut self) -> Self {
        self.is_ref = true;
        self
    }

    pub fn with_size(mut self, bytes: u64) -> Self {
        self.raw.size = Some(bytes);
        self
    }

    pub fn with_modified(mut self, millis: i64) -> Self {
        self.raw.modified_date = Some(millis);
        self
    }

    pub fn with_created(mut self, millis: i64) -> Self {
        self.raw.created_date = Some(millis);
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.raw.width = Some(width);
        self.raw.height = Some(height);
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.raw.hash = Some(hash.into());
        self
    }

    pub fn with_similarity(mut self, similarity: impl Into<String>) -> Self {
        self.similarity = Some(similarity.into());
        self
    }
}
