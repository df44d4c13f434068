// Playwright adapter - BrowserPage/ElementLocator over playwright-rs
//
// playwright-rs has no waitFor()/waitForLoadState(), so visibility and
// document-ready waits are polled here under the session's WaitPolicy.
//
// Locators keep the page and a selector string and ask the page for a fresh
// Playwright locator on every call, so each action re-resolves against the
// live DOM. Sub-locators chain with ` >> ` the same way Playwright does.
//
// playwright-rs cannot unregister dialog handlers and runs every handler on
// every dialog, so a page installs exactly one handler, on first use. It hands
// each dialog to the oldest armed watch and dismisses dialogs nobody armed for.

use super::{BrowserPage, DialogQueue, DialogWatch, ElementLocator, WaitPolicy};
use crate::error::{DriverError, DriverResult};
use async_trait::async_trait;
use playwright_rs::protocol::Dialog;
use playwright_rs::{GotoOptions, Page, SelectOption, WaitUntil};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A Playwright page seen through the capability interface
///
/// Clones share the page, its dialog queue and its dialog handler.
#[derive(Clone)]
pub struct PlaywrightPage {
    page: Page,
    policy: WaitPolicy,
    dialogs: DialogQueue,
    dialog_handler: Arc<OnceCell<()>>,
}

impl PlaywrightPage {
    pub fn new(page: Page, policy: WaitPolicy) -> Self {
        Self {
            page,
            policy,
            dialogs: DialogQueue::default(),
            dialog_handler: Arc::new(OnceCell::new()),
        }
    }

    async fn install_dialog_handler(&self) -> DriverResult<()> {
        let dialogs = self.dialogs.clone();
        self.page
            .on_dialog(move |dialog| route_dialog(dialogs.clone(), dialog))
            .await?;
        tracing::debug!("Dialog handler installed");
        Ok(())
    }

    /// The wrapped Playwright page
    pub fn inner(&self) -> &Page {
        &self.page
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        self.policy
    }
}

impl std::fmt::Debug for PlaywrightPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaywrightPage")
            .field("url", &self.page.url())
            .field("policy", &self.policy)
            .finish()
    }
}

#[async_trait]
impl BrowserPage for PlaywrightPage {
    type Locator = PlaywrightLocator;

    async fn goto(&self, url: &str) -> DriverResult<()> {
        let options = GotoOptions::new()
            .timeout(self.policy.timeout)
            .wait_until(WaitUntil::DomContentLoaded);
        self.page.goto(url, Some(options)).await?;
        Ok(())
    }

    async fn wait_for_load_state(&self) -> DriverResult<()> {
        let page = &self.page;

        self.policy
            .poll("document to finish loading", move || async move {
                let state = page.evaluate_value("document.readyState").await?;
                let ready = state == "interactive" || state == "complete";
                Ok::<_, DriverError>(ready.then_some(()))
            })
            .await
    }

    fn locator(&self, selector: &str) -> PlaywrightLocator {
        PlaywrightLocator {
            page: self.page.clone(),
            selector: selector.to_string(),
            policy: self.policy,
        }
    }

    async fn arm_dialog_acceptance(&self) -> DriverResult<DialogWatch> {
        self.dialog_handler
            .get_or_try_init(|| self.install_dialog_handler())
            .await?;
        Ok(self.dialogs.arm())
    }

    async fn close(&self) -> DriverResult<()> {
        self.page.close().await?;
        Ok(())
    }
}

async fn route_dialog(dialogs: DialogQueue, dialog: Dialog) -> playwright_rs::Result<()> {
    let message = dialog.message().to_string();

    let Some(tx) = dialogs.next() else {
        tracing::warn!(kind = dialog.type_(), %message, "Dismissing dialog nobody is waiting for");
        return dialog.dismiss().await;
    };

    tracing::debug!(kind = dialog.type_(), %message, "Accepting dialog");
    let outcome = dialog
        .accept(None)
        .await
        .map(|()| message)
        .map_err(DriverError::from);
    let _ = tx.send(outcome);
    Ok(())
}

/// Lazily resolved Playwright locator
#[derive(Clone)]
pub struct PlaywrightLocator {
    page: Page,
    selector: String,
    policy: WaitPolicy,
}

impl PlaywrightLocator {
    async fn resolve(&self) -> playwright_rs::Locator {
        self.page.locator(&self.selector).await
    }

    fn chained(&self, selector: String) -> Self {
        Self {
            page: self.page.clone(),
            selector,
            policy: self.policy,
        }
    }
}

impl std::fmt::Debug for PlaywrightLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaywrightLocator")
            .field("selector", &self.selector)
            .finish()
    }
}

#[async_trait]
impl ElementLocator for PlaywrightLocator {
    fn selector(&self) -> &str {
        &self.selector
    }

    fn locator(&self, selector: &str) -> Self {
        self.chained(format!("{} >> {}", self.selector, selector))
    }

    fn nth(&self, index: usize) -> Self {
        self.chained(format!("{} >> nth={}", self.selector, index))
    }

    async fn count(&self) -> DriverResult<usize> {
        Ok(self.resolve().await.count().await?)
    }

    async fn wait_for_visible(&self) -> DriverResult<()> {
        let locator = &self.resolve().await;
        let condition = format!("'{}' to be visible", self.selector);

        self.policy
            .poll(&condition, move || async move {
                Ok::<_, DriverError>(locator.is_visible().await?.then_some(()))
            })
            .await
    }

    async fn click(&self) -> DriverResult<()> {
        self.resolve().await.click(None).await?;
        Ok(())
    }

    async fn fill(&self, text: &str) -> DriverResult<()> {
        self.resolve().await.fill(text, None).await?;
        Ok(())
    }

    async fn text_content(&self) -> DriverResult<Option<String>> {
        Ok(self.resolve().await.text_content().await?)
    }

    async fn get_attribute(&self, name: &str) -> DriverResult<Option<String>> {
        Ok(self.resolve().await.get_attribute(name).await?)
    }

    async fn is_visible(&self) -> DriverResult<bool> {
        Ok(self.resolve().await.is_visible().await?)
    }

    async fn is_checked(&self) -> DriverResult<bool> {
        Ok(self.resolve().await.is_checked().await?)
    }

    async fn check(&self) -> DriverResult<()> {
        self.resolve().await.check(None).await?;
        Ok(())
    }

    async fn uncheck(&self) -> DriverResult<()> {
        self.resolve().await.uncheck(None).await?;
        Ok(())
    }

    async fn select_option(&self, value: &str) -> DriverResult<()> {
        self.resolve()
            .await
            .select_option(SelectOption::Value(value.to_string()), None)
            .await?;
        Ok(())
    }
}
