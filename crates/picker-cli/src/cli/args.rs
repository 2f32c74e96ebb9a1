use super::*;

#[derive(Parser)]
#[command(author, version, about = "Search and pick GitHub repositories")]
pub(super) struct Cli {
    #[arg(long, global = true, help = "Path to the config file")]
    pub(super) config: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (RUST_LOG overrides)"
    )]
    pub(super) verbose: u8,
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(clap::Subcommand)]
pub(super) enum Commands {
    #[command(about = "Run one repository search and print the merged list")]
    Search(SearchArgs),
    #[command(about = "Pick a repository interactively from stdin input")]
    Pick(PickArgs),
    #[command(about = "Show whether the preview app is being served")]
    ServedApp(ServedAppArgs),
}

#[derive(Parser)]
pub(super) struct SearchArgs {
    #[arg(help = "Repository name or URL")]
    pub(super) query: String,
    #[arg(long, help = "JSON file with the known repositories")]
    pub(super) repos: Option<PathBuf>,
}

#[derive(Parser)]
pub(super) struct PickArgs {
    #[arg(long, help = "JSON file with the known repositories")]
    pub(super) repos: Option<PathBuf>,
    #[arg(long, help = "Override the debounce window in milliseconds")]
    pub(super) debounce_ms: Option<u64>,
}

#[derive(Parser)]
pub(super) struct ServedAppArgs {
    #[arg(long, help = "Active host URL; omit when nothing is served")]
    pub(super) host: Option<String>,
}

pub(super) fn command_label(command: &Commands) -> &'static str {
    match command {
        Commands::Search(_) => "search",
        Commands::Pick(_) => "pick",
        Commands::ServedApp(_) => "served-app",
    }
}
