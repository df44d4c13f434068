// Element actions - failure-safe primitives shared by every page object
//
// Each primitive runs one or two driver calls through `guarded`, which turns a
// driver fault into the page-level error for that operation. Page objects
// hold an ElementActions by composition and never call the driver directly
// for these operations.

use crate::driver::{BrowserPage, ElementLocator, WaitPolicy};
use crate::error::{DriverError, DriverResult, Error, Result};
use std::future::Future;
use url::Url;

/// Runs a driver call and tags its failure with the page-level error built by `tag`.
pub(crate) async fn guarded<T>(
    operation: &'static str,
    selector: &str,
    call: impl Future<Output = DriverResult<T>>,
    tag: impl FnOnce(DriverError) -> Error,
) -> Result<T> {
    call.await.map_err(|cause| {
        tracing::debug!(operation, selector, error = %cause, "Driver call failed");
        tag(cause)
    })
}

/// Shared action wrapper over one page handle
pub struct ElementActions<P: BrowserPage> {
    page: P,
    base_url: Url,
    policy: WaitPolicy,
}

impl<P: BrowserPage> ElementActions<P> {
    pub fn new(page: P, base_url: Url, policy: WaitPolicy) -> Self {
        Self {
            page,
            base_url,
            policy,
        }
    }

    /// The page handle
    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Creates a locator on this page
    pub fn locator(&self, selector: &str) -> P::Locator {
        self.page.locator(selector)
    }

    /// Resolves `route` against the base URL.
    pub fn url_for(&self, route: &str) -> Result<String> {
        self.base_url
            .join(route)
            .map(String::from)
            .map_err(|e| Error::Navigation {
                url: route.to_string(),
                source: DriverError::Other(e.to_string()),
            })
    }

    /// Navigates to `route` (absolute, or relative to the base URL).
    pub async fn goto(&self, route: &str) -> Result<()> {
        let url = self.url_for(route)?;
        tracing::info!(%url, "Navigating");

        guarded("goto", &url, self.page.goto(&url), |source| {
            Error::Navigation {
                url: url.clone(),
                source,
            }
        })
        .await
    }

    /// Navigates to `route`, then waits for the page to load.
    pub async fn open(&self, route: &str) -> Result<()> {
        self.goto(route).await?;
        self.wait_for_page_load().await
    }

    /// Suspends until the document is ready.
    pub async fn wait_for_page_load(&self) -> Result<()> {
        guarded(
            "wait_for_page_load",
            "document",
            self.page.wait_for_load_state(),
            Error::PageLoad,
        )
        .await
    }

    /// Suspends until the element is visible.
    pub async fn wait_for_element(&self, locator: &P::Locator) -> Result<()> {
        guarded(
            "wait_for_element",
            locator.selector(),
            locator.wait_for_visible(),
            Error::ElementNotVisible,
        )
        .await
    }

    /// Waits for visibility, then clicks.
    pub async fn click_element(&self, locator: &P::Locator) -> Result<()> {
        tracing::debug!(selector = locator.selector(), "Clicking");
        let call = async {
            locator.wait_for_visible().await?;
            locator.click().await
        };
        guarded(
            "click_element",
            locator.selector(),
            call,
            Error::ElementNotClickable,
        )
        .await
    }

    /// Waits for visibility, then replaces the field content with `text`.
    pub async fn fill_input(&self, locator: &P::Locator, text: &str) -> Result<()> {
        tracing::debug!(selector = locator.selector(), "Filling input");
        let call = async {
            locator.wait_for_visible().await?;
            locator.fill(text).await
        };
        guarded("fill_input", locator.selector(), call, |source| Error::Fill {
            text: text.to_string(),
            source,
        })
        .await
    }

    /// Waits for visibility, then returns the trimmed text content.
    ///
    /// An element without text content yields an empty string, not an error.
    pub async fn get_text(&self, locator: &P::Locator) -> Result<String> {
        let call = async {
            locator.wait_for_visible().await?;
            locator.text_content().await
        };
        let text = guarded(
            "get_text",
            locator.selector(),
            call,
            Error::TextRetrieval,
        )
        .await?;

        Ok(text.map(|t| t.trim().to_string()).unwrap_or_default())
    }

    /// Snapshot visibility. Only driver faults are errors; "not found" is `false`.
    pub async fn is_visible(&self, locator: &P::Locator) -> Result<bool> {
        guarded(
            "is_visible",
            locator.selector(),
            locator.is_visible(),
            Error::VisibilityCheck,
        )
        .await
    }

    /// Waits for visibility, then polls the trimmed text until `accept` holds.
    pub async fn wait_for_text(
        &self,
        locator: &P::Locator,
        accept: impl Fn(&str) -> bool + Send + Sync,
    ) -> Result<String> {
        self.wait_for_element(locator).await?;

        let condition = format!("text of '{}' to settle", locator.selector());
        let accept = &accept;
        let probe = move || async move {
            let text = locator.text_content().await?.unwrap_or_default();
            let text = text.trim();
            Ok::<_, DriverError>(accept(text).then(|| text.to_string()))
        };

        guarded(
            "wait_for_text",
            locator.selector(),
            self.policy.poll(&condition, probe),
            Error::TextRetrieval,
        )
        .await
    }

    /// Runs any other driver call under the generic `Driver` error.
    pub async fn driver_call<T>(
        &self,
        operation: &'static str,
        locator: &P::Locator,
        call: impl Future<Output = DriverResult<T>>,
    ) -> Result<T> {
        guarded(operation, locator.selector(), call, |source| Error::Driver {
            operation,
            source,
        })
        .await
    }

    /// Releases the page handle.
    ///
    /// Consumes the wrapper, so a page can only be cleaned up once.
    pub async fn cleanup(self) -> Result<()> {
        tracing::info!("Closing page");
        guarded("cleanup", "page", self.page.close(), |source| {
            Error::Driver {
                operation: "close page",
                source,
            }
        })
        .await
    }
}
