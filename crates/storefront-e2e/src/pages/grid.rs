// Grid page - /grid
//
// Menu cards are `.item` elements. Each card renders its 1-based position in a
// `[data-test-id="card-number"]` marker; positions follow that marker, not DOM order.

use crate::actions::ElementActions;
use crate::driver::{BrowserPage, ElementLocator};
use crate::error::{Error, Result, ResultExt};

pub const ROUTE: &str = "/grid";

const MENU_ITEM: &str = ".item";
const ITEM_NAME: &str = r#"[data-test-id="item-name"]"#;
const ITEM_PRICE: &str = "#item-price";
const ITEM_IMAGE: &str = "img";
const ADD_TO_CART_BUTTON: &str = "button";

/// Selector for the card whose position marker reads exactly `position`
fn item_at_position(position: i64) -> String {
    format!(r#".item:has([data-test-id="card-number"]:text-is("{position}"))"#)
}

/// Page object for the product grid
pub struct GridPage<P: BrowserPage> {
    actions: ElementActions<P>,
    menu_item: P::Locator,
}

impl<P: BrowserPage> GridPage<P> {
    pub fn new(actions: ElementActions<P>) -> Self {
        Self {
            menu_item: actions.locator(MENU_ITEM),
            actions,
        }
    }

    pub fn actions(&self) -> &ElementActions<P> {
        &self.actions
    }

    /// Navigates to the grid route and waits for the page to load.
    pub async fn goto(&self) -> Result<()> {
        self.actions
            .open(ROUTE)
            .await
            .context("Failed to navigate to grid page")
    }

    /// Locator for the card at `position` (1-based).
    pub fn menu_item_by_position(&self, position: i64) -> Result<P::Locator> {
        if position <= 0 {
            return Err(Error::InvalidPosition(position));
        }
        Ok(self.actions.locator(&item_at_position(position)))
    }

    /// Name of the card at `position`.
    pub async fn menu_item_name(&self, position: i64) -> Result<String> {
        self.read_in_item(position, ITEM_NAME)
            .await
            .with_context(|| format!("Failed to get menu item name at position {position}"))
    }

    /// Price text of the card at `position`, e.g. `"$10"`.
    pub async fn menu_item_price(&self, position: i64) -> Result<String> {
        self.read_in_item(position, ITEM_PRICE)
            .await
            .with_context(|| format!("Failed to get menu item price at position {position}"))
    }

    async fn read_in_item(&self, position: i64, selector: &str) -> Result<String> {
        let item = self.menu_item_by_position(position)?;
        self.actions.get_text(&item.locator(selector)).await
    }

    /// Every card currently rendered.
    ///
    /// This is a snapshot: cards added after the call are not included.
    pub async fn all_menu_items(&self) -> Result<Vec<P::Locator>> {
        let count = self
            .actions
            .driver_call("count menu items", &self.menu_item, self.menu_item.count())
            .await?;

        Ok((0..count).map(|i| self.menu_item.nth(i)).collect())
    }

    /// True iff every card has a name, a price, an image source and a visible
    /// add-to-cart button. Stops at the first card missing any of them.
    pub async fn validate_all_items_have_required_properties(&self) -> Result<bool> {
        let items = self
            .all_menu_items()
            .await
            .context("Failed to validate menu items")?;

        for (index, item) in items.iter().enumerate() {
            if !self
                .has_required_properties(item)
                .await
                .context("Failed to validate menu items")?
            {
                tracing::warn!(index, "Menu item is missing a required property");
                return Ok(false);
            }
        }

        Ok(true)
    }

    async fn has_required_properties(&self, item: &P::Locator) -> Result<bool> {
        let name = self.actions.get_text(&item.locator(ITEM_NAME)).await?;
        let price = self.actions.get_text(&item.locator(ITEM_PRICE)).await?;
        let image = item.locator(ITEM_IMAGE);
        let image_src = self
            .actions
            .driver_call("read image source", &image, image.get_attribute("src"))
            .await?;
        let button = self
            .actions
            .is_visible(&item.locator(ADD_TO_CART_BUTTON))
            .await?;

        let has_image = image_src.is_some_and(|src| !src.trim().is_empty());
        Ok(!name.is_empty() && !price.is_empty() && has_image && button)
    }

    pub async fn cleanup(self) -> Result<()> {
        self.actions.cleanup().await
    }
}
