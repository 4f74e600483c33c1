use serde::Serialize;

use crate::model::category::{Category, Filter};
use crate::model::resource::{Resource, ResourceId};
use crate::ops::search::SearchHit;
use crate::util::unicode::truncate_to_width;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ResourceJson {
    pub id: ResourceId,
    pub title: String,
    pub link: String,
    pub description: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added: Option<String>,
}

#[derive(Serialize)]
pub struct ResourceListJson {
    pub filter: String,
    pub resources: Vec<ResourceJson>,
}

#[derive(Serialize)]
pub struct CategoryCountJson {
    pub category: String,
    pub count: usize,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub id: ResourceId,
    pub title: String,
    pub field: String,
}

pub fn resource_to_json(resource: &Resource) -> ResourceJson {
    ResourceJson {
        id: resource.id,
        title: resource.title().to_string(),
        link: resource.link().to_string(),
        description: resource.description().to_string(),
        category: resource.category(),
        added: resource.added.clone(),
    }
}

pub fn list_to_json<'a>(
    filter: Filter,
    resources: impl IntoIterator<Item = &'a Resource>,
) -> ResourceListJson {
    ResourceListJson {
        filter: filter.label().to_string(),
        resources: resources.into_iter().map(resource_to_json).collect(),
    }
}

pub fn counts_to_json(counts: &[(Filter, usize)]) -> Vec<CategoryCountJson> {
    counts
        .iter()
        .map(|(f, n)| CategoryCountJson {
            category: f.label().to_string(),
            count: *n,
        })
        .collect()
}

pub fn hit_to_json(hit: &SearchHit, title: &str) -> SearchHitJson {
    SearchHitJson {
        id: hit.resource_id,
        title: title.to_string(),
        field: hit.field.name().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Longest title shown in one-line summaries
const TITLE_WIDTH: usize = 40;

/// `R-004 [Design]       Figma  https://figma.com`
pub fn format_resource_line(resource: &Resource) -> String {
    format!(
        "{} {:<15} {}  {}",
        resource.id,
        format!("[{}]", resource.category()),
        truncate_to_width(resource.title(), TITLE_WIDTH),
        resource.link()
    )
}

pub fn format_resource_detail(resource: &Resource) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", resource.id, resource.title()),
        format!("link: {}", resource.link()),
        format!("category: {}", resource.category()),
    ];
    if let Some(added) = &resource.added {
        lines.push(format!("added: {}", added));
    }
    if !resource.description().is_empty() {
        lines.push("description:".to_string());
        for line in resource.description().lines() {
            lines.push(format!("  {}", line));
        }
    }
    lines
}

pub fn format_counts(counts: &[(Filter, usize)]) -> Vec<String> {
    counts
        .iter()
        .map(|(f, n)| format!("{:<14}{:>4}", f.label(), n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::resource::ResourceFields;

    fn sample() -> Resource {
        let mut r = Resource::new(
            ResourceId(4),
            ResourceFields {
                title: "Figma".into(),
                link: "https://figma.com".into(),
                description: "Design tool\nCollaborative".into(),
                category: Category::Design,
            },
        );
        r.added = Some("2026-10-16".into());
        r
    }

    #[test]
    fn resource_line() {
        assert_eq!(
            format_resource_line(&sample()),
            "R-004 [Design]        Figma  https://figma.com"
        );
    }

    #[test]
    fn resource_detail_indents_description() {
        let lines = format_resource_detail(&sample());
        assert_eq!(lines[0], "R-004 Figma");
        assert_eq!(lines[3], "added: 2026-10-16");
        assert_eq!(lines[4], "description:");
        assert_eq!(lines[5], "  Design tool");
        assert_eq!(lines[6], "  Collaborative");
    }

    #[test]
    fn list_json_shape() {
        let r = sample();
        let json = serde_json::to_value(list_to_json(Filter::Only(Category::Design), [&r])).unwrap();
        assert_eq!(json["filter"], "Design");
        assert_eq!(json["resources"][0]["id"], "R-004");
        assert_eq!(json["resources"][0]["category"], "Design");
    }

    #[test]
    fn counts_formatting() {
        let lines = format_counts(&[(Filter::All, 3), (Filter::Only(Category::Design), 12)]);
        assert_eq!(lines[0], "All              3");
        assert_eq!(lines[1], "Design          12");
    }
}
