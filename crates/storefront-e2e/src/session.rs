// Browser session - Playwright server, one browser, one page
//
// The session owns the Playwright server and the browser. Page objects borrow
// the page through cheap clones of the adapter; closing the session tears
// down the browser and then the server.

use crate::actions::ElementActions;
use crate::config::{BrowserKind, StorefrontConfig};
use crate::driver::PlaywrightPage;
use crate::error::{DriverError, Error, Result};
use crate::pages::{CheckoutPage, GridPage, LoginPage, SearchPage};
use playwright_rs::{Browser, LaunchOptions, Playwright};

/// A running browser with one page, configured for the storefront
pub struct StorefrontSession {
    playwright: Playwright,
    browser: Browser,
    page: PlaywrightPage,
    config: StorefrontConfig,
}

impl StorefrontSession {
    /// Launches Playwright, the configured browser, and a fresh page.
    pub async fn launch(config: &StorefrontConfig) -> Result<Self> {
        tracing::info!(
            browser = ?config.browser,
            headless = config.headless,
            base_url = %config.base_url,
            "Launching browser session"
        );

        let playwright = Playwright::launch().await.map_err(launch_error)?;
        let browser_type = match config.browser {
            BrowserKind::Chromium => playwright.chromium(),
            BrowserKind::Firefox => playwright.firefox(),
            BrowserKind::Webkit => playwright.webkit(),
        };

        let options = LaunchOptions::new().headless(config.headless);
        let browser = match browser_type.launch_with_options(options).await {
            Ok(browser) => browser,
            Err(e) => {
                shutdown_quietly(&playwright).await;
                return Err(launch_error(e));
            }
        };

        let page = match browser.new_page().await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                shutdown_quietly(&playwright).await;
                return Err(launch_error(e));
            }
        };

        Ok(Self {
            page: PlaywrightPage::new(page, config.wait_policy()),
            playwright,
            browser,
            config: config.clone(),
        })
    }

    /// The page adapter, carrying the configured wait policy
    pub fn page(&self) -> PlaywrightPage {
        self.page.clone()
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Action wrapper over the session page, rooted at the configured base URL.
    pub fn actions(&self) -> ElementActions<PlaywrightPage> {
        ElementActions::new(
            self.page(),
            self.config.base_url.clone(),
            self.config.wait_policy(),
        )
    }

    pub fn login_page(&self) -> LoginPage<PlaywrightPage> {
        LoginPage::new(self.actions())
    }

    pub fn grid_page(&self) -> GridPage<PlaywrightPage> {
        GridPage::new(self.actions())
    }

    pub fn search_page(&self) -> SearchPage<PlaywrightPage> {
        SearchPage::new(self.actions())
    }

    pub fn checkout_page(&self) -> CheckoutPage<PlaywrightPage> {
        CheckoutPage::new(self.actions())
    }

    /// Closes the browser (and with it every page), then stops the Playwright server.
    pub async fn close(self) -> Result<()> {
        tracing::info!("Closing browser session");

        let closed = self.browser.close().await;
        shutdown_quietly(&self.playwright).await;

        closed.map_err(|e| Error::Driver {
            operation: "close browser",
            source: DriverError::from(e),
        })
    }
}

impl std::fmt::Debug for StorefrontSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontSession")
            .field("page", &self.page)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn launch_error(e: playwright_rs::Error) -> Error {
    Error::Launch(DriverError::from(e))
}

async fn shutdown_quietly(playwright: &Playwright) {
    if let Err(e) = playwright.shutdown().await {
        tracing::warn!(error = %e, "Playwright server did not shut down cleanly");
    }
}
