use crate::logging;
use anyhow::Context;
use clap::Parser;
use picker_core::config::{PickerConfig, default_config_path, load_repositories};
use picker_core::model::{MergedEntry, RepositoryRecord};
use picker_core::picker::{RepoPicker, install_link};
use picker_core::search::fetch;
use picker_core::selection::SharedSelection;
use picker_core::served_app::ServedAppStatus;
use picker_providers::GitHubSearchProvider;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

mod app;
mod args;
mod pick_cmd;
mod search_cmd;
mod shared;

use args::*;

use pick_cmd::handle_pick;
use search_cmd::{handle_search, handle_served_app};
use shared::{build_provider, known_repositories, render_entries};

pub async fn run() -> anyhow::Result<()> {
    app::run().await
}
