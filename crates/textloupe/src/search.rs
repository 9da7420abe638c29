use colored::Colorize;
use serde::{Deserialize, Serialize};
use textlayer::{DocumentText, Hit};

use crate::prelude::{eprintln, println, *};

/// Options for searching a document's text layer
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
#[command(after_help = "EXAMPLES:
  # Find a phrase; matching ignores case and character width:
  textloupe search book.stext.json \"springtime\"

  # Full-width input still matches half-width text and vice versa:
  textloupe search book.stext.json \"ＴＯＫＹＯ\"

  # Cap the number of printed hits:
  textloupe search book.stext.json \"the\" --limit 10

  # Machine-readable output:
  textloupe search book.stext.json \"springtime\" --json

NOTES:
  - Queries and page text are NFKC-normalized and lowercased before
    matching, so case and width differences never hide a hit.
  - Text below a page's body size cut (ruby gloss, captions, footnotes)
    is invisible to search.
  - Occurrence numbers are 0-based and local to their page; pass one to
    `textloupe preview --occurrence` to zoom in on that hit.")]
pub struct Options {
    /// Path to the structured-text JSON file
    path: std::path::PathBuf,

    /// Text to search for
    #[clap(env = "TEXTLOUPE_QUERY")]
    query: String,

    /// Maximum number of hits to print
    #[arg(short, long)]
    limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub total_hits: usize,
    pub pages_with_hits: usize,
    pub hits: Vec<Hit>,
}

pub fn run(options: Options, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!(
            "Searching {} for {:?}",
            options.path.display(),
            options.query
        );
        println!();
    }

    let document = crate::load::load_document(&options.path, global.verbose)?;
    let output = search_document(&document, &options.query);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if output.hits.is_empty() {
        println!("No hits for {:?}.", output.query);
        return Ok(());
    }

    println!(
        "Found {} hit(s) on {} page(s):\n",
        output.total_hits, output.pages_with_hits
    );

    let shown = options.limit.unwrap_or(output.hits.len()).min(output.hits.len());
    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row!["Page", "#", "Context"]);

    for hit in &output.hits[..shown] {
        table.add_row(prettytable::row![
            f!("P.{}", hit.page_number).cyan(),
            hit.occurrence_index,
            hit.context
        ]);
    }

    table.printstd();

    if shown < output.hits.len() {
        eprintln!(
            "\nShowing the first {} of {} hit(s); raise --limit to see the rest.",
            shown,
            output.hits.len()
        );
    }

    Ok(())
}

/// Search with the query trimmed of surrounding whitespace and gather
/// hit statistics. Padding around a pasted query is never meaningful;
/// page text carries no separators for it to match.
fn search_document(document: &DocumentText, raw_query: &str) -> SearchOutput {
    let query = raw_query.trim();
    let hits = document.search(query);

    // Hits arrive in page order, so counting distinct pages is one dedup.
    let pages_with_hits = {
        let mut pages: Vec<u32> = hits.iter().map(|hit| hit.page_number).collect();
        pages.dedup();
        pages.len()
    };

    SearchOutput {
        query: query.to_string(),
        total_hits: hits.len(),
        pages_with_hits,
        hits,
    }
}
