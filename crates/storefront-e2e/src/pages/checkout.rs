// Checkout page - /checkout
//
// Billing form, payment form, cart summary and order confirmation.
//
// Cart summary layout: the `.price` elements are, in order, the quantity badge
// in the "Cart" heading, one price per cart line, and the grand total last.

use crate::actions::ElementActions;
use crate::amounts::{extract_amount, is_price_line, parse_quantity};
use crate::driver::{BrowserPage, DialogWatch, ElementLocator};
use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};

pub const ROUTE: &str = "/checkout";

const FULL_NAME_INPUT: &str = "#fname";
const EMAIL_INPUT: &str = "#email";
const ADDRESS_INPUT: &str = "#adr";
const CITY_INPUT: &str = "#city";
const STATE_INPUT: &str = "#state";
const ZIP_INPUT: &str = "#zip";
const SAME_ADDRESS_CHECKBOX: &str = r#"role=checkbox[name="Shipping address same as billing"]"#;
const NAME_ON_CARD_INPUT: &str = "#cname";
const CARD_NUMBER_INPUT: &str = "#ccnum";
const EXP_MONTH_SELECT: &str = "#expmonth";
const EXP_YEAR_INPUT: &str = "#expyear";
const CVV_INPUT: &str = "#cvv";
const PRODUCT_IN_CART: &str = r#"role=link[name=/Product\d+/]"#;
const PRODUCT_PRICE: &str = ".price";
const PRODUCT_QUANTITY: &str = r#"h4:has-text("Cart") .price b"#;
const PRODUCT_TOTAL: &str = r#"p:has-text("Total") .price"#;
const CONTINUE_BUTTON: &str = r#"role=button[name="Continue to checkout"]"#;
const ORDER_CONFIRMATION: &str = "#order-confirmation";
const ORDER_NUMBER: &str = r#"[data-id="ordernumber"]"#;
const ALERT_DIALOG: &str = "dialog";

/// Billing and payment details for one order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub name_on_card: String,
    pub card_number: String,
    /// Value of the expiration month option, e.g. "December"
    pub exp_month: String,
    pub exp_year: String,
    pub cvv: String,
}

impl CheckoutForm {
    fn fields(&self) -> [(&'static str, &str); 11] {
        [
            ("full_name", self.full_name.as_str()),
            ("email", self.email.as_str()),
            ("address", self.address.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
            ("zip", self.zip.as_str()),
            ("name_on_card", self.name_on_card.as_str()),
            ("card_number", self.card_number.as_str()),
            ("exp_month", self.exp_month.as_str()),
            ("exp_year", self.exp_year.as_str()),
            ("cvv", self.cvv.as_str()),
        ]
    }

    /// Names of the fields that are empty after trimming
    pub fn blank_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let blank = self.blank_fields();
        if blank.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "All form fields are required (blank: {})",
                blank.join(", ")
            )))
        }
    }
}

/// An armed dialog watcher returned by [`CheckoutPage::handle_alert`]
#[derive(Debug)]
pub struct PendingAlert {
    watch: DialogWatch,
}

impl PendingAlert {
    /// Suspends until the dialog has been accepted; returns its message.
    pub async fn accepted(self) -> Result<String> {
        self.watch.resolved().await.map_err(|source| Error::Driver {
            operation: "accept alert",
            source,
        })
    }
}

/// Page object for checkout
pub struct CheckoutPage<P: BrowserPage> {
    actions: ElementActions<P>,
    full_name_input: P::Locator,
    email_input: P::Locator,
    address_input: P::Locator,
    city_input: P::Locator,
    state_input: P::Locator,
    zip_input: P::Locator,
    same_address_checkbox: P::Locator,
    name_on_card_input: P::Locator,
    card_number_input: P::Locator,
    exp_month_select: P::Locator,
    exp_year_input: P::Locator,
    cvv_input: P::Locator,
    product_in_cart: P::Locator,
    product_price: P::Locator,
    product_quantity: P::Locator,
    product_total: P::Locator,
    continue_button: P::Locator,
    order_confirmation: P::Locator,
    order_number: P::Locator,
    alert_dialog: P::Locator,
}

impl<P: BrowserPage> CheckoutPage<P> {
    pub fn new(actions: ElementActions<P>) -> Self {
        Self {
            full_name_input: actions.locator(FULL_NAME_INPUT),
            email_input: actions.locator(EMAIL_INPUT),
            address_input: actions.locator(ADDRESS_INPUT),
            city_input: actions.locator(CITY_INPUT),
            state_input: actions.locator(STATE_INPUT),
            zip_input: actions.locator(ZIP_INPUT),
            same_address_checkbox: actions.locator(SAME_ADDRESS_CHECKBOX),
            name_on_card_input: actions.locator(NAME_ON_CARD_INPUT),
            card_number_input: actions.locator(CARD_NUMBER_INPUT),
            exp_month_select: actions.locator(EXP_MONTH_SELECT),
            exp_year_input: actions.locator(EXP_YEAR_INPUT),
            cvv_input: actions.locator(CVV_INPUT),
            product_in_cart: actions.locator(PRODUCT_IN_CART),
            product_price: actions.locator(PRODUCT_PRICE),
            product_quantity: actions.locator(PRODUCT_QUANTITY),
            product_total: actions.locator(PRODUCT_TOTAL),
            continue_button: actions.locator(CONTINUE_BUTTON),
            order_confirmation: actions.locator(ORDER_CONFIRMATION),
            order_number: actions.locator(ORDER_NUMBER),
            alert_dialog: actions.locator(ALERT_DIALOG),
            actions,
        }
    }

    pub fn actions(&self) -> &ElementActions<P> {
        &self.actions
    }

    /// The in-page `dialog` element
    pub fn alert_dialog_locator(&self) -> &P::Locator {
        &self.alert_dialog
    }

    pub async fn goto(&self) -> Result<()> {
        self.actions
            .open(ROUTE)
            .await
            .context("Failed to navigate to checkout page")
    }

    /// Fills billing and payment details.
    ///
    /// Every field is validated before the first one is written, so a blank field
    /// leaves the form untouched.
    pub async fn fill_checkout_form(&self, form: &CheckoutForm) -> Result<()> {
        form.validate().context("Failed to fill checkout form")?;

        self.write_form(form)
            .await
            .context("Failed to fill checkout form")
    }

    async fn write_form(&self, form: &CheckoutForm) -> Result<()> {
        let text_fields = [
            (&self.full_name_input, &form.full_name),
            (&self.email_input, &form.email),
            (&self.address_input, &form.address),
            (&self.city_input, &form.city),
            (&self.state_input, &form.state),
            (&self.zip_input, &form.zip),
            (&self.name_on_card_input, &form.name_on_card),
            (&self.card_number_input, &form.card_number),
        ];
        for (input, value) in text_fields {
            self.actions.fill_input(input, value).await?;
        }

        self.actions
            .driver_call(
                "select expiration month",
                &self.exp_month_select,
                self.exp_month_select.select_option(&form.exp_month),
            )
            .await?;

        self.actions
            .fill_input(&self.exp_year_input, &form.exp_year)
            .await?;
        self.actions.fill_input(&self.cvv_input, &form.cvv).await
    }

    /// Sets the "shipping address same as billing" checkbox.
    ///
    /// Toggles only when the current state differs from `should_be_checked`.
    pub async fn set_shipping_address_checkbox(&self, should_be_checked: bool) -> Result<()> {
        let checkbox = &self.same_address_checkbox;
        let result = async {
            let is_checked = self
                .actions
                .driver_call("read checkbox state", checkbox, checkbox.is_checked())
                .await?;

            match (should_be_checked, is_checked) {
                (true, false) => {
                    self.actions
                        .driver_call("check checkbox", checkbox, checkbox.check())
                        .await
                }
                (false, true) => {
                    self.actions
                        .driver_call("uncheck checkbox", checkbox, checkbox.uncheck())
                        .await
                }
                _ => Ok(()),
            }
        }
        .await;

        result.context("Failed to set shipping address checkbox")
    }

    /// Clicks "Continue to checkout".
    pub async fn submit_checkout_form(&self) -> Result<()> {
        self.actions
            .click_element(&self.continue_button)
            .await
            .context("Failed to submit checkout form")
    }

    pub async fn wait_for_order_confirmation(&self) -> Result<()> {
        self.actions
            .wait_for_element(&self.order_confirmation)
            .await
            .context("Failed to wait for order confirmation")
    }

    pub async fn order_confirmation_number(&self) -> Result<String> {
        async {
            self.actions.wait_for_element(&self.order_number).await?;
            self.actions.get_text(&self.order_number).await
        }
        .await
        .context("Failed to get order confirmation number")
    }

    /// Arms acceptance of the next dialog.
    ///
    /// Call this before the action that opens the dialog, then await
    /// [`PendingAlert::accepted`] after that action.
    pub async fn handle_alert(&self) -> Result<PendingAlert> {
        let watch = self
            .actions
            .page()
            .arm_dialog_acceptance()
            .await
            .map_err(|source| Error::Driver {
                operation: "listen for alert",
                source,
            })?;

        Ok(PendingAlert { watch })
    }

    /// Whether a `dialog` element is showing right now.
    pub async fn is_alert_visible(&self) -> Result<bool> {
        self.actions
            .is_visible(&self.alert_dialog)
            .await
            .context("Failed to check if alert dialog is visible")
    }

    /// Quantity shown in the cart heading.
    pub async fn number_of_items(&self) -> Result<i64> {
        async {
            let text = self.actions.get_text(&self.product_quantity).await?;
            parse_quantity(&text)
        }
        .await
        .context("Failed to get number of items")
    }

    /// Number of cart lines actually rendered.
    pub async fn sum_of_items_present_in_cart(&self) -> Result<usize> {
        self.actions
            .driver_call(
                "count cart lines",
                &self.product_in_cart,
                self.product_in_cart.count(),
            )
            .await
            .context("Failed to get sum of items in cart")
    }

    /// Sum of the per-line prices, leaving out the grand-total row (the last
    /// `.price`) and any `.price` without a `$` marker.
    pub async fn sum_of_product_prices(&self) -> Result<f64> {
        async {
            let count = self
                .actions
                .driver_call(
                    "count price elements",
                    &self.product_price,
                    self.product_price.count(),
                )
                .await?;

            let mut sum = 0.0;
            for index in 0..count.saturating_sub(1) {
                let text = self.actions.get_text(&self.product_price.nth(index)).await?;
                if !is_price_line(&text) {
                    continue;
                }
                if let Some(amount) = extract_amount(&text)? {
                    sum += amount;
                }
            }

            tracing::debug!(lines = count.saturating_sub(1), sum, "Summed cart prices");
            Ok(sum)
        }
        .await
        .context("Failed to get sum of product prices")
    }

    /// Displayed grand total; an empty or absent total row reads as zero.
    pub async fn total_price(&self) -> Result<f64> {
        async {
            if !self.actions.is_visible(&self.product_total).await? {
                tracing::debug!("Total row not rendered");
                return Ok(0.0);
            }
            let text = self.actions.get_text(&self.product_total).await?;
            if text.is_empty() {
                return Ok(0.0);
            }
            Ok(extract_amount(&text)?.unwrap_or(0.0))
        }
        .await
        .context("Failed to get total price")
    }

    pub async fn cleanup(self) -> Result<()> {
        self.actions.cleanup().await
    }
}
