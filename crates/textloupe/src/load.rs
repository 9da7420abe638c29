use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use textlayer::provider::StextFile;
use textlayer::session::{Session, SessionEvent};
use textlayer::DocumentText;

use crate::prelude::{println, *};

/// Open a structured-text file and index every page, with a progress bar.
///
/// Indexing runs on the session's worker thread; this pumps its events
/// until the document is installed or the load fails.
pub fn load_document(path: &Path, verbose: bool) -> Result<DocumentText> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:30.cyan/blue} {percent:>3}% {msg}")
            .unwrap(),
    );
    bar.set_message("indexing pages");

    let mut session = Session::new();
    let open_path = path.to_path_buf();
    session.start_load(move || StextFile::open(open_path));

    while let Some(event) = session.next_event() {
        match event {
            SessionEvent::Progress(fraction) => {
                bar.set_position((fraction * 100.0).round() as u64);
            }
            SessionEvent::Loaded(pages) => {
                bar.finish_and_clear();
                if verbose {
                    println!("Indexed {} page(s) from {}", pages, path.display());
                    println!();
                }
            }
            SessionEvent::Cancelled => {
                bar.finish_and_clear();
                return Err(eyre!("document load was cancelled"));
            }
            SessionEvent::Failed(err) => {
                bar.finish_and_clear();
                return Err(eyre!(err));
            }
        }
    }

    session
        .document()
        .cloned()
        .ok_or_else(|| eyre!("no document was loaded"))
}
