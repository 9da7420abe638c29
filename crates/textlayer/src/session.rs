//! Background document loading.
//!
//! Loading walks every page, classifies and normalizes its text, and
//! builds the per-page index. It is the only long-running operation, so it
//! runs on one worker thread, reports coalesced progress over a channel,
//! and checks a cancellation flag between pages. A session owns at most
//! one in-flight load; starting another abandons the previous one, so the
//! newest load always wins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::extract::{degraded_page, index_page, PageIndex};
use crate::provider::StructureProvider;
use crate::{DocumentText, TextLayerError};

/// Pages between coalesced progress notifications.
const PROGRESS_STRIDE: usize = 10;

/// Events delivered while a load runs.
#[derive(Debug)]
pub enum LoadEvent {
    /// Fraction of pages processed so far, in `0.0..=1.0`.
    Progress(f32),
    /// The load reached a terminal state.
    Finished(LoadOutcome),
}

/// Terminal state of one load.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Every page processed, in page order.
    Loaded(Vec<PageIndex>),
    /// The cancellation flag was raised before the last page.
    Cancelled,
    /// The document could not be opened at all.
    Failed(TextLayerError),
}

// ---------------------------------------------------------------------------
// Page walk
// ---------------------------------------------------------------------------

/// Walk and index every page of `provider`.
///
/// `progress` receives coalesced fractions: after the first page, after
/// every [`PROGRESS_STRIDE`]th page, and after the last. A page whose
/// structure cannot be read degrades to an empty index instead of failing
/// the walk. Returns `None` when `cancel` was raised between pages.
pub fn load_pages<P, F>(provider: &P, cancel: &AtomicBool, mut progress: F) -> Option<Vec<PageIndex>>
where
    P: StructureProvider + ?Sized,
    F: FnMut(f32),
{
    let total = provider.page_count();
    let mut pages = Vec::with_capacity(total);

    for i in 0..total {
        if cancel.load(Ordering::Relaxed) {
            log::info!("load cancelled after {i} of {total} pages");
            return None;
        }

        let number = i as u32 + 1;
        let page = match provider.page_structure(number) {
            Ok(structure) => index_page(&structure),
            Err(err) => {
                log::warn!("page {number}: extraction degraded: {err}");
                degraded_page(number)
            }
        };
        pages.push(page);

        if i % PROGRESS_STRIDE == 0 || i + 1 == total {
            progress((i + 1) as f32 / total as f32);
        }
    }

    log::info!("indexed {total} page(s)");
    Some(pages)
}

// ---------------------------------------------------------------------------
// Worker task
// ---------------------------------------------------------------------------

/// Handle to one in-flight load.
///
/// Dropping the handle raises the cancellation flag and detaches the
/// worker; it stops before its next page.
pub struct LoadTask {
    events: Receiver<LoadEvent>,
    cancel: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl LoadTask {
    /// Spawn a worker that opens a provider and walks its pages.
    ///
    /// Opening happens on the worker, so a slow or failing open never
    /// blocks the caller; an open failure arrives as
    /// [`LoadOutcome::Failed`].
    pub fn spawn<P, F>(open: F) -> Self
    where
        P: StructureProvider + 'static,
        F: FnOnce() -> Result<P, TextLayerError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);

        let worker = thread::spawn(move || {
            let outcome = match open() {
                Ok(provider) => {
                    let walked = load_pages(&provider, &flag, |fraction| {
                        let _ = tx.send(LoadEvent::Progress(fraction));
                    });
                    match walked {
                        Some(pages) => LoadOutcome::Loaded(pages),
                        None => LoadOutcome::Cancelled,
                    }
                }
                Err(err) => LoadOutcome::Failed(err),
            };
            let _ = tx.send(LoadEvent::Finished(outcome));
        });

        LoadTask {
            events: rx,
            cancel,
            worker: Some(worker),
        }
    }

    /// Raise the cancellation flag; the worker stops before its next page.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Next event, blocking. `None` once the channel is closed.
    pub fn recv(&self) -> Option<LoadEvent> {
        self.events.recv().ok()
    }

    /// Drain events until the terminal one and return it.
    pub fn wait(mut self) -> LoadOutcome {
        loop {
            match self.events.recv() {
                Ok(LoadEvent::Finished(outcome)) => {
                    self.join();
                    return outcome;
                }
                Ok(LoadEvent::Progress(_)) => {}
                Err(_) => {
                    self.join();
                    return LoadOutcome::Failed(TextLayerError::WorkerExited);
                }
            }
        }
    }

    fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for LoadTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// What a session reports while its active load is pumped.
#[derive(Debug)]
pub enum SessionEvent {
    /// Fraction of pages processed, in `0.0..=1.0`.
    Progress(f32),
    /// The load finished and its document was installed; carries the page
    /// count.
    Loaded(usize),
    /// The load was cancelled; the previous document (if any) remains.
    Cancelled,
    /// The load failed; the previous document (if any) remains.
    Failed(TextLayerError),
}

/// Owns the loaded document and at most one in-flight load.
///
/// Replacing the active load drops the old task, which cancels its worker
/// and discards its channel, so a stale load can never install its result
/// over a newer one.
#[derive(Default)]
pub struct Session {
    document: Option<DocumentText>,
    pending: Option<LoadTask>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Cancel any in-flight load and start a new one.
    pub fn start_load<P, F>(&mut self, open: F)
    where
        P: StructureProvider + 'static,
        F: FnOnce() -> Result<P, TextLayerError> + Send + 'static,
    {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
        self.pending = Some(LoadTask::spawn(open));
    }

    /// Blocking pump of the active load.
    ///
    /// Returns `None` when no load is active. On a terminal event the task
    /// is retired, and a successful outcome replaces the session document.
    pub fn next_event(&mut self) -> Option<SessionEvent> {
        let task = self.pending.as_ref()?;
        let event = match task.recv() {
            Some(event) => event,
            None => {
                self.pending = None;
                return Some(SessionEvent::Failed(TextLayerError::WorkerExited));
            }
        };

        match event {
            LoadEvent::Progress(fraction) => Some(SessionEvent::Progress(fraction)),
            LoadEvent::Finished(outcome) => {
                self.pending = None;
                match outcome {
                    LoadOutcome::Loaded(pages) => {
                        let count = pages.len();
                        self.document = Some(DocumentText::from_pages(pages));
                        Some(SessionEvent::Loaded(count))
                    }
                    LoadOutcome::Cancelled => Some(SessionEvent::Cancelled),
                    LoadOutcome::Failed(err) => Some(SessionEvent::Failed(err)),
                }
            }
        }
    }

    /// The most recently loaded document, if any load has completed.
    pub fn document(&self) -> Option<&DocumentText> {
        self.document.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}
