// Driver - capability interface between page objects and the browser
//
// Page objects never touch Playwright types directly. They depend on two traits:
// - BrowserPage: one browser tab (navigation, load state, locators, dialogs, close)
// - ElementLocator: a lazily re-resolved reference to zero or more elements
//
// The production implementation lives in `playwright`; unit tests use the
// in-memory page in `fake`.

pub mod playwright;

#[cfg(test)]
pub(crate) mod fake;

use crate::error::{DriverError, DriverResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

pub use self::playwright::{PlaywrightLocator, PlaywrightPage};

/// Default timeout for polled waits (matches Playwright's 30s default)
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Default polling interval for polled waits
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A single browser tab, owned by exactly one page object for the duration of a test.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Locator type produced by this page
    type Locator: ElementLocator;

    /// Navigates to an absolute URL.
    async fn goto(&self, url: &str) -> DriverResult<()>;

    /// Suspends until the document has finished parsing (DOMContentLoaded).
    async fn wait_for_load_state(&self) -> DriverResult<()>;

    /// Creates a locator for `selector`. Nothing is resolved until an action runs.
    fn locator(&self, selector: &str) -> Self::Locator;

    /// Arms a one-shot watcher that accepts the next dialog.
    ///
    /// Must be called before the action that opens the dialog: the watcher is
    /// edge-triggered and does not see dialogs that were already showing.
    async fn arm_dialog_acceptance(&self) -> DriverResult<DialogWatch>;

    /// Closes the tab.
    async fn close(&self) -> DriverResult<()>;
}

/// Deferred reference to DOM element(s), re-resolved on every call.
#[async_trait]
pub trait ElementLocator: Clone + Send + Sync {
    /// Selector this locator resolves
    fn selector(&self) -> &str;

    /// Sub-locator scoped to this locator's subtree
    fn locator(&self, selector: &str) -> Self;

    /// The `index`-th match (0-based)
    fn nth(&self, index: usize) -> Self;

    async fn count(&self) -> DriverResult<usize>;

    /// Suspends until the element is visible.
    async fn wait_for_visible(&self) -> DriverResult<()>;

    async fn click(&self) -> DriverResult<()>;

    /// Replaces the field content with `text`.
    async fn fill(&self, text: &str) -> DriverResult<()>;

    async fn text_content(&self) -> DriverResult<Option<String>>;

    async fn get_attribute(&self, name: &str) -> DriverResult<Option<String>>;

    /// Snapshot visibility. A selector that matches nothing is simply not visible.
    async fn is_visible(&self) -> DriverResult<bool>;

    async fn is_checked(&self) -> DriverResult<bool>;

    async fn check(&self) -> DriverResult<()>;

    async fn uncheck(&self) -> DriverResult<()>;

    /// Selects the `<option>` whose value is `value`.
    async fn select_option(&self, value: &str) -> DriverResult<()>;
}

/// Single-resolution completion signal for an armed dialog watcher.
///
/// Resolves with the accepted dialog's message, or with the acceptance failure.
#[derive(Debug)]
pub struct DialogWatch {
    rx: oneshot::Receiver<DriverResult<String>>,
}

impl DialogWatch {
    /// Creates a watch and the sender half the driver resolves it through.
    pub fn channel() -> (oneshot::Sender<DriverResult<String>>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// Suspends until the dialog has been accepted.
    pub async fn resolved(self) -> DriverResult<String> {
        self.rx
            .await
            .map_err(|_| DriverError::DialogListenerClosed)?
    }
}

type DialogSender = oneshot::Sender<DriverResult<String>>;

/// Armed dialog watchers of one page, served first-armed first.
///
/// Each dialog goes to exactly one watcher. Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub(crate) struct DialogQueue {
    pending: Arc<Mutex<VecDeque<DialogSender>>>,
}

impl DialogQueue {
    /// Queues a new watcher behind the ones already armed.
    pub(crate) fn arm(&self) -> DialogWatch {
        let (tx, watch) = DialogWatch::channel();
        self.lock().push_back(tx);
        watch
    }

    /// Takes the watcher the next dialog belongs to, skipping dropped ones.
    pub(crate) fn next(&self) -> Option<DialogSender> {
        let mut pending = self.lock();
        while let Some(tx) = pending.pop_front() {
            if !tx.is_closed() {
                return Some(tx);
            }
        }
        None
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<DialogSender>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// How long and how often polled waits run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitPolicy {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Polls `probe` until it yields a value or the timeout elapses.
    ///
    /// The probe always runs at least once. Probe errors abort the wait immediately.
    pub async fn poll<T, F, Fut>(&self, condition: &str, mut probe: F) -> DriverResult<T>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = DriverResult<Option<T>>> + Send,
        T: Send,
    {
        let start = tokio::time::Instant::now();

        loop {
            if let Some(value) = probe().await? {
                return Ok(value);
            }

            if start.elapsed() >= self.timeout {
                return Err(DriverError::Timeout {
                    condition: condition.to_string(),
                    timeout: self.timeout,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
