mod init;
pub use init::cmd_init;

use std::collections::HashSet;
use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::hub_io::{self, HubError};
use crate::io::recovery;
use crate::io::storage::HubStorage;
use crate::model::category::{Category, Filter};
use crate::model::hub::Hub;
use crate::model::resource::{DraftField, ResourceId};
use crate::ops::store::{ResourceStore, StoreError};
use crate::ops::{check, search};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Options shared by every subcommand
struct Context {
    hub_dir: Option<PathBuf>,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let hub_dir = match &cli.hub_dir {
        Some(dir) => Some(
            std::fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        ),
        None => None,
    };
    let ctx = Context {
        hub_dir,
        json: cli.json,
    };

    match cli.command {
        None => Err("no subcommand given (try `rh --help`)".into()),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args, cli.hub_dir.as_deref()),

            // Read commands
            Commands::List(args) => cmd_list(&ctx, args),
            Commands::Show(args) => cmd_show(&ctx, args),
            Commands::Search(args) => cmd_search(&ctx, args),
            Commands::Categories => cmd_categories(&ctx),
            Commands::Check => cmd_check(&ctx),

            // Write commands
            Commands::Add(args) => cmd_add(&ctx, args),
            Commands::Edit(args) => cmd_edit(&ctx, args),
            Commands::Delete(args) => cmd_delete(&ctx, args),
            Commands::DefaultCategory(args) => cmd_default_category(&ctx, args),

            // Maintenance
            Commands::Recovery(args) => cmd_recovery(&ctx, args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_hub_ctx(ctx: &Context) -> Result<Hub, HubError> {
    let start = match &ctx.hub_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let root = hub_io::discover_hub(&start)?;
    hub_io::load_hub(&root)
}

/// Open the hub's store, reporting (but not failing on) an unreadable record.
fn open_store(hub: &Hub) -> ResourceStore {
    let (store, warning) =
        ResourceStore::open(HubStorage::for_hub(hub), hub.config.form.default_category);
    if let Some(e) = warning {
        eprintln!("warning: {}", e);
        if e.content_logged() {
            eprintln!("warning: starting with no resources; the unreadable record was copied to the recovery log");
        } else {
            eprintln!("warning: starting with no resources; the next change will overwrite the record");
        }
    }
    store
}

fn parse_filter(category: Option<&str>) -> Result<Filter, Box<dyn std::error::Error>> {
    Ok(match category {
        Some(c) => c.parse::<Filter>()?,
        None => Filter::All,
    })
}

fn parse_id(s: &str) -> Result<ResourceId, Box<dyn std::error::Error>> {
    Ok(s.parse::<ResourceId>()?)
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: ListArgs) -> CmdResult {
    let hub = load_hub_ctx(ctx)?;
    let mut store = open_store(&hub);
    store.set_filter(parse_filter(args.category.as_deref())?);

    if ctx.json {
        return print_json(&list_to_json(store.filter(), store.view()));
    }
    for resource in store.view() {
        println!("{}", format_resource_line(resource));
    }
    Ok(())
}

fn cmd_show(ctx: &Context, args: ShowArgs) -> CmdResult {
    let hub = load_hub_ctx(ctx)?;
    let store = open_store(&hub);
    let id = parse_id(&args.id)?;
    let resource = store
        .get(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    if ctx.json {
        return print_json(&resource_to_json(resource));
    }
    for line in format_resource_detail(resource) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_search(ctx: &Context, args: SearchArgs) -> CmdResult {
    let hub = load_hub_ctx(ctx)?;
    let store = open_store(&hub);
    let filter = parse_filter(args.category.as_deref())?;
    let re = search::build_pattern(&args.pattern);
    let hits = search::search_resources(store.resources(), &re, filter);

    let title_of = |id: ResourceId| store.get(id).map(|r| r.title()).unwrap_or("");

    if ctx.json {
        let json: Vec<SearchHitJson> = hits
            .iter()
            .map(|h| hit_to_json(h, title_of(h.resource_id)))
            .collect();
        return print_json(&json);
    }

    for id in search::matching_ids(&hits) {
        if let Some(resource) = store.get(id) {
            println!("{}", format_resource_line(resource));
        }
    }
    Ok(())
}

fn cmd_categories(ctx: &Context) -> CmdResult {
    let hub = load_hub_ctx(ctx)?;
    let store = open_store(&hub);
    let counts = store.category_counts();

    if ctx.json {
        return print_json(&counts_to_json(&counts));
    }
    for line in format_counts(&counts) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_check(ctx: &Context) -> CmdResult {
    let hub = load_hub_ctx(ctx)?;
    let store = open_store(&hub);
    let result = check::check_resources(store.resources());

    if ctx.json {
        print_json(&result)?;
    } else {
        for err in &result.errors {
            println!("error: {}", describe_check_error(err));
        }
        for warn in &result.warnings {
            println!("warning: {}", describe_check_warning(warn));
        }
        if result.valid && result.warnings.is_empty() {
            println!("ok: {} resources", store.len());
        }
    }

    if !result.valid {
        std::process::exit(1);
    }
    Ok(())
}

fn describe_check_error(err: &check::CheckError) -> String {
    match err {
        check::CheckError::EmptyTitle { id } => format!("{} has an empty title", id),
        check::CheckError::EmptyLink { id } => format!("{} has an empty link", id),
        check::CheckError::DuplicateId { id, count } => {
            format!("{} is used by {} resources", id, count)
        }
    }
}

fn describe_check_warning(warn: &check::CheckWarning) -> String {
    let join = |ids: &[ResourceId]| {
        ids.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    match warn {
        check::CheckWarning::DuplicateLink { link, ids } => {
            format!("{} is stored {} times ({})", link, ids.len(), join(ids))
        }
        check::CheckWarning::IdenticalResources { ids } => {
            format!("{} are identical", join(ids))
        }
    }
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs) -> CmdResult {
    let hub = load_hub_ctx(ctx)?;
    let mut store = open_store(&hub);

    store.begin_add();
    store.update_draft_field(DraftField::Title, &args.title)?;
    store.update_draft_field(DraftField::Link, &args.link)?;
    if let Some(description) = &args.description {
        store.update_draft_field(DraftField::Description, description)?;
    }
    if let Some(category) = &args.category {
        store.update_draft_field(DraftField::Category, category)?;
    }
    let id = store.submit()?;

    if ctx.json {
        if let Some(resource) = store.get(id) {
            return print_json(&resource_to_json(resource));
        }
    }
    println!("{}", id);
    Ok(())
}

fn cmd_edit(ctx: &Context, args: EditArgs) -> CmdResult {
    let hub = load_hub_ctx(ctx)?;
    let mut store = open_store(&hub);
    let id = parse_id(&args.id)?;

    let changes: Vec<(DraftField, &String)> = [
        (DraftField::Title, args.title.as_ref()),
        (DraftField::Link, args.link.as_ref()),
        (DraftField::Description, args.description.as_ref()),
        (DraftField::Category, args.category.as_ref()),
    ]
    .into_iter()
    .filter_map(|(field, value)| value.map(|v| (field, v)))
    .collect();

    if changes.is_empty() {
        return Err("nothing to change (pass --title, --link, --description or --category)".into());
    }

    store.begin_edit(id)?;
    for (field, value) in changes {
        store.update_draft_field(field, value)?;
    }
    store.submit()?;

    if ctx.json {
        if let Some(resource) = store.get(id) {
            return print_json(&resource_to_json(resource));
        }
    }
    println!("{}", id);
    Ok(())
}

fn cmd_delete(ctx: &Context, args: DeleteArgs) -> CmdResult {
    let hub = load_hub_ctx(ctx)?;
    let mut store = open_store(&hub);

    // Resolve every id before deleting anything
    let ids = args
        .ids
        .iter()
        .map(|s| parse_id(s))
        .collect::<Result<Vec<_>, _>>()?;
    let mut seen = HashSet::new();
    let ids: Vec<ResourceId> = ids.into_iter().filter(|id| seen.insert(*id)).collect();
    if let Some(missing) = ids.iter().find(|id| store.get(**id).is_none()) {
        return Err(StoreError::NotFound(missing.to_string()).into());
    }

    for id in ids {
        let removed = store.delete(id)?;
        println!("deleted {} {}", removed.id, removed.title());
    }
    Ok(())
}

fn cmd_default_category(ctx: &Context, args: DefaultCategoryArgs) -> CmdResult {
    let hub = load_hub_ctx(ctx)?;
    let category: Category = args.category.parse()?;

    let (_config, mut doc) = config_io::read_config(&hub.hub_dir)?;
    config_io::set_default_category(&mut doc, category);
    config_io::write_config(&hub.hub_dir, &doc)?;

    println!("default category: {}", category);
    Ok(())
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>, Box<dyn std::error::Error>> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&chrono::Utc));
    }
    let date = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid timestamp '{}' (use RFC 3339 or YYYY-MM-DD)", s))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

fn cmd_recovery(ctx: &Context, args: RecoveryCmd) -> CmdResult {
    let hub = load_hub_ctx(ctx)?;

    match args.action {
        Some(RecoveryAction::Path) => {
            println!("{}", recovery::recovery_log_path(&hub.hub_dir).display());
            Ok(())
        }
        Some(RecoveryAction::Prune(prune)) => {
            let before = prune.before.as_deref().map(parse_timestamp).transpose()?;
            let removed = recovery::prune_recovery(&hub.hub_dir, before, prune.all)?;
            println!("removed {} recovery entries", removed);
            Ok(())
        }
        None => {
            let since = args.since.as_deref().map(parse_timestamp).transpose()?;
            let entries = recovery::read_recovery_entries(&hub.hub_dir, Some(args.limit), since);
            if ctx.json {
                let json: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
                return print_json(&json);
            }
            if entries.is_empty() {
                println!("recovery log is empty");
            }
            for entry in entries {
                print!("{}", entry.to_display_markdown());
            }
            Ok(())
        }
    }
}
