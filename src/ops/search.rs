use std::ops::Range;

use regex::Regex;

use crate::model::category::Filter;
use crate::model::resource::{Resource, ResourceId};

/// Which field of a resource matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Link,
    Description,
}

impl MatchField {
    pub fn name(self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Link => "link",
            MatchField::Description => "description",
        }
    }
}

/// A search hit on one field of one resource
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub resource_id: ResourceId,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Compile a case-insensitive pattern. Input that is not a valid regex is
/// matched literally.
pub fn build_pattern(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){}", pattern)).unwrap_or_else(|_| {
        Regex::new(&format!("(?i){}", regex::escape(pattern)))
            .unwrap_or_else(|_| Regex::new("$^").expect("static regex"))
    })
}

fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search title, link and description of every resource passing `filter`.
/// Hits are in collection order, one per matching field.
pub fn search_resources<'a>(
    resources: impl IntoIterator<Item = &'a Resource>,
    re: &Regex,
    filter: Filter,
) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for resource in resources {
        if !filter.matches(resource.category()) {
            continue;
        }
        let fields = [
            (MatchField::Title, resource.title()),
            (MatchField::Link, resource.link()),
            (MatchField::Description, resource.description()),
        ];
        for (field, text) in fields {
            let spans = find_matches(re, text);
            if !spans.is_empty() {
                hits.push(SearchHit {
                    resource_id: resource.id,
                    field,
                    spans,
                });
            }
        }
    }
    hits
}

/// Distinct resource ids among `hits`, in first-hit order
pub fn matching_ids(hits: &[SearchHit]) -> Vec<ResourceId> {
    let mut ids: Vec<ResourceId> = Vec::new();
    for hit in hits {
        if !ids.contains(&hit.resource_id) {
            ids.push(hit.resource_id);
        }
    }
    ids
}
