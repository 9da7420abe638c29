use serde::{Deserialize, Serialize};
use textlayer::preview::plan_preview;
use textlayer::provider::StextFile;
use textlayer::Rect;

use crate::prelude::{eprintln, println, *};

/// Options for planning a preview crop
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
#[command(after_help = "EXAMPLES:
  # Full-page thumbnail plan for page 3:
  textloupe preview book.stext.json 3

  # Zoomed crop around the first occurrence of a phrase on page 3:
  textloupe preview book.stext.json 3 \"springtime\"

  # Target the second occurrence on the page:
  textloupe preview book.stext.json 3 \"springtime\" --occurrence 1

  # Machine-readable output:
  textloupe preview book.stext.json 3 \"springtime\" --json

NOTES:
  - Vertical text keeps the page's full height and pads sideways;
    horizontal text keeps the full width and pads up and down.
  - A query that cannot be located on the page falls back to a
    full-page thumbnail instead of failing.")]
pub struct Options {
    /// Path to the structured-text JSON file
    path: std::path::PathBuf,

    /// 1-based page number to preview
    page: u32,

    /// Text to zoom in on; omitted, the plan is a full-page thumbnail
    query: Option<String>,

    /// Which occurrence of the query on the page to target (0-based)
    #[arg(short, long, default_value = "0")]
    occurrence: usize,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(options: Options, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Planning preview for {}", options.path.display());
        println!();
    }

    let query = effective_query(options.query.as_deref());

    let provider = StextFile::open(&options.path).map_err(|e| eyre!(e))?;
    let plan = plan_preview(&provider, options.page, query, options.occurrence)
        .map_err(|e| eyre!(e))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("Preview plan for page {}:\n", plan.page_number);

    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row!["Clip", format_rect(&plan.clip)]);
    table.add_row(prettytable::row!["Zoom", f!("{:.1}x", plan.zoom)]);
    match &plan.highlight {
        Some(rect) => table.add_row(prettytable::row!["Highlight", format_rect(rect)]),
        None => table.add_row(prettytable::row!["Highlight", "(none)"]),
    };
    table.printstd();

    if plan.highlight.is_none() {
        if let Some(query) = query {
            eprintln!(
                "\n{:?} was not located on page {}; the plan is a full-page thumbnail.",
                query, options.page
            );
        }
    }

    Ok(())
}

/// Trim the raw query; a blank query counts as no query at all.
fn effective_query(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|query| !query.is_empty())
}

fn format_rect(rect: &Rect) -> String {
    f!(
        "({:.1}, {:.1}) .. ({:.1}, {:.1})",
        rect.x0,
        rect.y0,
        rect.x1,
        rect.y1
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_query_trims_padding() {
        assert_eq!(effective_query(Some(" 本文 ")), Some("本文"));
        assert_eq!(effective_query(Some("\u{3000}本文\u{3000}")), Some("本文"));
    }

    #[test]
    fn test_effective_query_treats_blank_as_absent() {
        assert_eq!(effective_query(Some("   ")), None);
        assert_eq!(effective_query(None), None);
    }
}
