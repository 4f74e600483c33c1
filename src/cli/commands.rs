use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rh", about = concat!("reshub v", env!("CARGO_PKG_VERSION"), " - every link worth keeping, in one place"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different hub directory
    #[arg(short = 'C', long = "hub-dir", global = true)]
    pub hub_dir: Option<String>,

    /// Print diagnostic logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new hub in the current directory
    Init(InitArgs),
    /// List resources, newest first
    List(ListArgs),
    /// Show one resource
    Show(ShowArgs),
    /// Add a resource
    Add(AddArgs),
    /// Change fields of a resource
    Edit(EditArgs),
    /// Delete a resource
    Delete(DeleteArgs),
    /// Search titles, links and descriptions by regex
    Search(SearchArgs),
    /// Count resources per category
    Categories,
    /// Validate the stored resources
    Check,
    /// Set the category new resources start with
    DefaultCategory(DefaultCategoryArgs),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

#[derive(Args)]
pub struct InitArgs {
    /// Hub name (default: the directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Category new resources start with
    #[arg(long)]
    pub default_category: Option<String>,
    /// Reinitialize even if reshub/ already exists (keeps stored resources)
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only this category (All, Design, Development, Productivity, Inspiration)
    #[arg(long, short)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Resource ID (e.g. R-004)
    pub id: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Resource title
    pub title: String,
    /// Link (usually a URL)
    pub link: String,
    /// Optional description
    #[arg(long, short)]
    pub description: Option<String>,
    /// Category (default: from hub.toml)
    #[arg(long, short)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Resource ID (e.g. R-004)
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub link: Option<String>,
    #[arg(long, short)]
    pub description: Option<String>,
    #[arg(long, short)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Resource ID(s) to delete
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern (case-insensitive)
    pub pattern: String,
    /// Only search this category
    #[arg(long, short)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct DefaultCategoryArgs {
    /// Design, Development, Productivity or Inspiration
    pub category: String,
}

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show
    #[arg(long, default_value = "10")]
    pub limit: usize,
    /// Show entries after this timestamp (RFC 3339)
    #[arg(long)]
    pub since: Option<String>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the absolute path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this timestamp (default: 30 days ago)
    #[arg(long)]
    pub before: Option<String>,
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}
