use serde::{Deserialize, Serialize};
use textlayer::extract::{body_size_threshold, index_page};
use textlayer::provider::{StextFile, StructureProvider};

use crate::prelude::{eprintln, println, *};

/// Options for inspecting a document's text layer
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct Options {
    /// Path to the structured-text JSON file
    path: std::path::PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub page: u32,
    pub spans: usize,
    /// Font size below which spans are dropped from search, if the page
    /// has any text at all.
    pub body_size_cut: Option<f32>,
    pub searchable_chars: usize,
    pub display_lines: usize,
}

#[derive(Debug, Serialize)]
pub struct InfoOutput {
    pub path: String,
    pub pages: Vec<PageInfo>,
}

pub fn run(options: Options, _global: crate::Global) -> Result<()> {
    let provider = StextFile::open(&options.path).map_err(|e| eyre!(e))?;

    let mut pages = Vec::with_capacity(provider.page_count());
    for number in 1..=provider.page_count() as u32 {
        match provider.page_structure(number) {
            Ok(page) => {
                let index = index_page(&page);
                pages.push(PageInfo {
                    page: number,
                    spans: page.spans().count(),
                    body_size_cut: body_size_threshold(page.spans()),
                    searchable_chars: index.search_text.chars().count(),
                    display_lines: index.display_text.lines().count(),
                });
            }
            Err(err) => {
                eprintln!("Warning: {err}");
                pages.push(PageInfo {
                    page: number,
                    spans: 0,
                    body_size_cut: None,
                    searchable_chars: 0,
                    display_lines: 0,
                });
            }
        }
    }

    if options.json {
        let output = InfoOutput {
            path: options.path.display().to_string(),
            pages,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row![
        "Page",
        "Spans",
        "Body cut",
        "Chars",
        "Lines"
    ]);

    let mut total_chars = 0;
    for info in &pages {
        let cut = match info.body_size_cut {
            Some(size) => f!("{size:.2}"),
            None => "-".to_string(),
        };
        table.add_row(prettytable::row![
            f!("P.{}", info.page),
            info.spans,
            cut,
            info.searchable_chars,
            info.display_lines
        ]);
        total_chars += info.searchable_chars;
    }

    table.printstd();
    println!("\n{} page(s), {} searchable char(s)", pages.len(), total_chars);

    Ok(())
}
