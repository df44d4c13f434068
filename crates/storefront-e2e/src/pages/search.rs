// Search page - /search
//
// Results are filled in asynchronously after submit: `#result` first shows a
// "searching..." placeholder, then the final message.

use crate::actions::ElementActions;
use crate::driver::BrowserPage;
use crate::error::{Result, ResultExt};

pub const ROUTE: &str = "/search";

/// Placeholder rendered while a search is in flight
pub const SEARCHING_PLACEHOLDER: &str = "searching...";

const SEARCH_INPUT: &str = r#"input[name="searchWord"]"#;
const SEARCH_BUTTON: &str = r#"button[type="submit"]"#;
const SEARCH_RESULTS: &str = "#result";

/// Page object for the search form
pub struct SearchPage<P: BrowserPage> {
    actions: ElementActions<P>,
    search_input: P::Locator,
    search_button: P::Locator,
    search_results: P::Locator,
}

impl<P: BrowserPage> SearchPage<P> {
    pub fn new(actions: ElementActions<P>) -> Self {
        Self {
            search_input: actions.locator(SEARCH_INPUT),
            search_button: actions.locator(SEARCH_BUTTON),
            search_results: actions.locator(SEARCH_RESULTS),
            actions,
        }
    }

    pub fn actions(&self) -> &ElementActions<P> {
        &self.actions
    }

    pub async fn goto(&self) -> Result<()> {
        self.actions
            .open(ROUTE)
            .await
            .context("Failed to navigate to search page")
    }

    /// Fills the search field (the empty string included) and submits.
    pub async fn search(&self, term: &str) -> Result<()> {
        tracing::info!(term, "Searching");
        async {
            self.actions.fill_input(&self.search_input, term).await?;
            self.actions.click_element(&self.search_button).await
        }
        .await
        .with_context(|| format!("Search failed for term \"{term}\""))
    }

    /// Final results text, once the placeholder has been replaced.
    pub async fn search_results_text(&self) -> Result<String> {
        self.actions
            .wait_for_text(&self.search_results, is_settled)
            .await
            .context("Failed to get search results")
    }

    pub async fn cleanup(self) -> Result<()> {
        self.actions.cleanup().await
    }
}

fn is_settled(text: &str) -> bool {
    !text.is_empty() && text != SEARCHING_PLACEHOLDER
}
