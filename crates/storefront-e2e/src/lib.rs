//! storefront-e2e: page objects for end-to-end testing of the storefront web app
//!
//! Each storefront route (login, product grid, search, checkout) gets a page object
//! that exposes the user-level steps a scenario needs. Page objects never talk to
//! the browser directly: they go through [`ElementActions`], which turns driver
//! faults into the named [`Error`] variants, over the [`BrowserPage`] capability
//! trait. [`PlaywrightPage`] implements that trait on top of `playwright-rs`.
//!
//! # Example
//!
//! ```ignore
//! use storefront_e2e::{StorefrontConfig, StorefrontSession};
//!
//! #[tokio::main]
//! async fn main() -> storefront_e2e::Result<()> {
//!     let config = StorefrontConfig::from_env()?;
//!     let session = StorefrontSession::launch(&config).await?;
//!
//!     let login = session.login_page();
//!     login.goto().await?;
//!     login.login("johndoe19", Some("supersecret")).await?;
//!     println!("{:?}", login.welcome_message().await);
//!
//!     let checkout = session.checkout_page();
//!     checkout.goto().await?;
//!     let alert = checkout.handle_alert().await?;
//!     checkout.set_shipping_address_checkbox(false).await?;
//!     checkout.submit_checkout_form().await?;
//!     println!("alert said: {}", alert.accepted().await?);
//!
//!     session.close().await
//! }
//! ```
//!
//! # Configuration
//!
//! [`StorefrontConfig::from_env`] reads `STOREFRONT_BASE_URL`, `STOREFRONT_BROWSER`,
//! `STOREFRONT_HEADLESS`, `STOREFRONT_TIMEOUT_MS` and `STOREFRONT_POLL_MS`.

pub mod actions;
pub mod amounts;
pub mod config;
pub mod driver;
pub mod error;
pub mod pages;
pub mod session;

pub use actions::ElementActions;
pub use config::{BrowserKind, StorefrontConfig};
pub use driver::{
    BrowserPage, DialogWatch, ElementLocator, PlaywrightLocator, PlaywrightPage, WaitPolicy,
};
pub use error::{DriverError, Error, Result};
pub use pages::{CheckoutForm, CheckoutPage, GridPage, LoginPage, PendingAlert, SearchPage};
pub use session::StorefrontSession;
