use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::hub_io::{self, HUB_DIR_NAME};
use crate::io::storage;
use crate::model::category::Category;

const HUB_TOML_TEMPLATE: &str = r##"[hub]
name = {name}

[storage]
# Resources are stored in reshub/<key>.json
key = "resources"

[form]
# Category a new resource starts with: Design, Development, Productivity or Inspiration
default_category = "{category}"

# --- UI Customization ---
# Uncomment and edit to override defaults.

[ui]
show_key_hints = true

# [ui.colors]
# background = "#0A0A0A"
# text = "#D4D4D4"
# text_bright = "#FFFFFF"
# highlight = "#6366F1"
# dim = "#737373"
# red = "#F87171"
# green = "#4ADE80"
#
# [ui.category_colors]
# Design = "#A5B4FC"
# Development = "#67E8F9"
# Productivity = "#FCD34D"
# Inspiration = "#F9A8D4"
"##;

/// Infer a hub name from a directory name: hyphens and underscores become
/// spaces, words are title-cased.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_hub_toml(name: &str, category: Category) -> String {
    // A JSON string literal is also a valid TOML basic string
    let quoted = serde_json::to_string(name).unwrap_or_else(|_| "\"Untitled\"".to_string());
    HUB_TOML_TEMPLATE
        .replace("{name}", &quoted)
        .replace("{category}", category.label())
}

pub fn cmd_init(args: InitArgs, dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match dir {
        Some(d) => fs::canonicalize(d).map_err(|e| format!("cannot resolve -C path '{}': {}", d, e))?,
        None => std::env::current_dir()?,
    };
    init_hub(&root, args)
}

fn init_hub(root: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let hub_dir = root.join(HUB_DIR_NAME);

    if hub_dir.join("hub.toml").exists() && !args.force {
        return Err("a hub already exists in ./reshub/ (use --force to rewrite hub.toml)".into());
    }

    if let Some(parent) = root.parent()
        && let Ok(parent_root) = hub_io::discover_hub(parent)
    {
        eprintln!(
            "note: parent hub found at {}/",
            parent_root.join(HUB_DIR_NAME).display()
        );
    }

    let category = match &args.default_category {
        Some(c) => c.parse::<Category>()?,
        None => Category::default(),
    };

    let name = args.name.unwrap_or_else(|| {
        root.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Untitled".to_string())
    });

    fs::create_dir_all(&hub_dir)?;
    fs::write(hub_dir.join("hub.toml"), render_hub_toml(&name, category))?;

    // Never clobber stored resources, even with --force
    let record = hub_dir.join("resources.json");
    if !record.exists() {
        fs::write(&record, storage::encode(&[], 1))?;
    }

    println!("Initialized resource hub: {}", name);
    Ok(())
}
