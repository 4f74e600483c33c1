use std::collections::HashMap;

use serde::Serialize;

use crate::model::resource::{Resource, ResourceId};

/// Structured result from `rh check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// Something that breaks a stored-resource invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    #[serde(rename = "empty_title")]
    EmptyTitle { id: ResourceId },
    #[serde(rename = "empty_link")]
    EmptyLink { id: ResourceId },
    /// Two or more resources share an id
    #[serde(rename = "duplicate_id")]
    DuplicateId { id: ResourceId, count: usize },
}

/// Worth a look, but not invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Several resources point at the same link
    #[serde(rename = "duplicate_link")]
    DuplicateLink { link: String, ids: Vec<ResourceId> },
    /// Resources identical in every field but their id
    #[serde(rename = "identical_resources")]
    IdenticalResources { ids: Vec<ResourceId> },
}

/// Validate a collection. Read-only.
pub fn check_resources(resources: &[Resource]) -> CheckResult {
    let mut result = CheckResult::default();

    for r in resources {
        if r.title().trim().is_empty() {
            result.errors.push(CheckError::EmptyTitle { id: r.id });
        }
        if r.link().trim().is_empty() {
            result.errors.push(CheckError::EmptyLink { id: r.id });
        }
    }

    let mut id_counts: HashMap<ResourceId, usize> = HashMap::new();
    for r in resources {
        *id_counts.entry(r.id).or_default() += 1;
    }
    let mut dup_ids: Vec<(ResourceId, usize)> =
        id_counts.into_iter().filter(|(_, n)| *n > 1).collect();
    dup_ids.sort();
    for (id, count) in dup_ids {
        result.errors.push(CheckError::DuplicateId { id, count });
    }

    // Group in collection order so output is stable
    let mut by_link: Vec<(&str, Vec<&Resource>)> = Vec::new();
    for r in resources.iter().filter(|r| !r.link().is_empty()) {
        match by_link.iter_mut().find(|(link, _)| *link == r.link()) {
            Some((_, group)) => group.push(r),
            None => by_link.push((r.link(), vec![r])),
        }
    }

    for (link, group) in by_link.into_iter().filter(|(_, g)| g.len() > 1) {
        result.warnings.push(CheckWarning::DuplicateLink {
            link: link.to_string(),
            ids: group.iter().map(|r| r.id).collect(),
        });

        let mut seen: Vec<Vec<ResourceId>> = Vec::new();
        let mut reps: Vec<&Resource> = Vec::new();
        for r in group {
            match reps.iter().position(|rep| rep.fields == r.fields) {
                Some(i) => seen[i].push(r.id),
                None => {
                    reps.push(r);
                    seen.push(vec![r.id]);
                }
            }
        }
        for ids in seen.into_iter().filter(|ids| ids.len() > 1) {
            result
                .warnings
                .push(CheckWarning::IdenticalResources { ids });
        }
    }

    result.valid = result.errors.is_empty();
    result
}
