#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod info;
mod load;
mod prelude;
mod preview;
mod search;
mod text;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Search and preview the text layer of typeset documents"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "TEXTLOUPE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Search every page for normalized text
    Search(crate::search::Options),

    /// Plan an orientation-aware preview crop for a page or a hit
    Preview(crate::preview::Options),

    /// Per-page statistics of the extracted text layer
    Info(crate::info::Options),

    /// Dump a page's extracted text
    Text(crate::text::Options),
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Search(options) => crate::search::run(options, app.global),
        SubCommands::Preview(options) => crate::preview::run(options, app.global),
        SubCommands::Info(options) => crate::info::run(options, app.global),
        SubCommands::Text(options) => crate::text::run(options, app.global),
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
