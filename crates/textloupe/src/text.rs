use anstream::print;
use serde::{Deserialize, Serialize};
use textlayer::extract::index_page;
use textlayer::provider::{StextFile, StructureProvider};

use crate::prelude::{println, *};

/// Options for dumping a page's extracted text
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
#[command(after_help = "EXAMPLES:
  # Reading layout, one line per structural line:
  textloupe text book.stext.json 3

  # The normalized, separator-free form that search runs against:
  textloupe text book.stext.json 3 --search-form")]
pub struct Options {
    /// Path to the structured-text JSON file
    path: std::path::PathBuf,

    /// 1-based page number to dump
    page: u32,

    /// Print the concatenated search form instead of the line layout
    #[arg(long)]
    search_form: bool,
}

pub fn run(options: Options, _global: crate::Global) -> Result<()> {
    let provider = StextFile::open(&options.path).map_err(|e| eyre!(e))?;
    let page = provider.page_structure(options.page).map_err(|e| eyre!(e))?;
    let index = index_page(&page);

    if options.search_form {
        println!("{}", index.search_text);
    } else {
        // display_text already carries one newline per line.
        print!("{}", index.display_text);
    }

    Ok(())
}
