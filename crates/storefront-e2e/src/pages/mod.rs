// Page objects, one per storefront route

pub mod checkout;
pub mod grid;
pub mod login;
pub mod search;

pub use checkout::{CheckoutForm, CheckoutPage, PendingAlert};
pub use grid::GridPage;
pub use login::LoginPage;
pub use search::SearchPage;
