use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::category::Category;

/// Stable identifier assigned when a resource is created, rendered `R-001`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{:03}", self.0)
    }
}

/// Error for a string that is not a resource ID
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid resource id: {0} (expected R-<number>)")]
pub struct InvalidId(pub String);

impl FromStr for ResourceId {
    type Err = InvalidId;

    /// Accepts `R-007`, `r-7` and a bare `7`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let digits = t
            .strip_prefix("R-")
            .or_else(|| t.strip_prefix("r-"))
            .unwrap_or(t);
        digits
            .parse::<u64>()
            .map(ResourceId)
            .map_err(|_| InvalidId(s.to_string()))
    }
}

impl Serialize for ResourceId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The four user-editable fields of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFields {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
}

impl ResourceFields {
    /// An empty buffer with the given category, used to reset the draft
    pub fn blank(category: Category) -> Self {
        ResourceFields {
            title: String::new(),
            link: String::new(),
            description: String::new(),
            category,
        }
    }

    /// Required fields that are empty, in form order
    pub fn missing_required(&self) -> Vec<DraftField> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push(DraftField::Title);
        }
        if self.link.is_empty() {
            missing.push(DraftField::Link);
        }
        missing
    }
}

impl Default for ResourceFields {
    fn default() -> Self {
        ResourceFields::blank(Category::default())
    }
}

/// A stored resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    #[serde(flatten)]
    pub fields: ResourceFields,
    /// `YYYY-MM-DD` the resource was first stored (absent on migrated records)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<String>,
}

impl Resource {
    pub fn new(id: ResourceId, fields: ResourceFields) -> Self {
        Resource {
            id,
            fields,
            added: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.fields.title
    }

    pub fn link(&self) -> &str {
        &self.fields.link
    }

    pub fn description(&self) -> &str {
        &self.fields.description
    }

    pub fn category(&self) -> Category {
        self.fields.category
    }
}

/// A named field of the draft buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Link,
    Description,
    Category,
}

impl DraftField {
    /// Form order
    pub const ALL: [DraftField; 4] = [
        DraftField::Title,
        DraftField::Link,
        DraftField::Description,
        DraftField::Category,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Link => "link",
            DraftField::Description => "description",
            DraftField::Category => "category",
        }
    }

    pub fn next(self) -> DraftField {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> DraftField {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(DraftField::Title),
            "link" => Ok(DraftField::Link),
            "description" => Ok(DraftField::Description),
            "category" => Ok(DraftField::Category),
            _ => Err(s.to_string()),
        }
    }
}
