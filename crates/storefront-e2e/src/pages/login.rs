// Login page - /login

use crate::actions::ElementActions;
use crate::driver::BrowserPage;
use crate::error::{Error, Result, ResultExt};

pub const ROUTE: &str = "/login";

const USERNAME_INPUT: &str = "#username";
const PASSWORD_INPUT: &str = "#password";
const SIGN_IN_BUTTON: &str = r#"button[id="signin-button"]"#;
const WELCOME_MESSAGE: &str = "#welcome-message";
const ERROR_MESSAGE: &str = "#message";

/// Page object for the sign-in form
pub struct LoginPage<P: BrowserPage> {
    actions: ElementActions<P>,
    username_input: P::Locator,
    password_input: P::Locator,
    sign_in_button: P::Locator,
    welcome_message: P::Locator,
    error_message: P::Locator,
}

impl<P: BrowserPage> LoginPage<P> {
    pub fn new(actions: ElementActions<P>) -> Self {
        Self {
            username_input: actions.locator(USERNAME_INPUT),
            password_input: actions.locator(PASSWORD_INPUT),
            sign_in_button: actions.locator(SIGN_IN_BUTTON),
            welcome_message: actions.locator(WELCOME_MESSAGE),
            error_message: actions.locator(ERROR_MESSAGE),
            actions,
        }
    }

    pub fn actions(&self) -> &ElementActions<P> {
        &self.actions
    }

    pub fn welcome_message_locator(&self) -> &P::Locator {
        &self.welcome_message
    }

    pub fn error_message_locator(&self) -> &P::Locator {
        &self.error_message
    }

    /// Navigates to the login route and waits for the page to load.
    pub async fn goto(&self) -> Result<()> {
        self.actions
            .open(ROUTE)
            .await
            .context("Failed to navigate to login page")
    }

    /// Fills the form and clicks sign-in.
    ///
    /// The password field is only touched when `password` is non-empty, which keeps
    /// the blank-password path reachable. The outcome is not awaited; read
    /// [`welcome_message`](Self::welcome_message) or
    /// [`error_message`](Self::error_message) afterwards.
    pub async fn login(&self, username: &str, password: Option<&str>) -> Result<()> {
        if username.trim().is_empty() {
            return Err(Error::Validation("Username is required".into()));
        }

        tracing::info!(username, "Signing in");
        self.actions.fill_input(&self.username_input, username).await?;
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            self.actions.fill_input(&self.password_input, password).await?;
        }
        self.click_sign_in().await
    }

    /// Clicks sign-in without touching the form.
    pub async fn click_sign_in(&self) -> Result<()> {
        self.actions.click_element(&self.sign_in_button).await
    }

    /// Current text of the welcome banner, `None` if it cannot be read.
    pub async fn welcome_message(&self) -> Option<String> {
        self.banner_text(&self.welcome_message).await
    }

    /// Current text of the error banner, `None` if it cannot be read.
    pub async fn error_message(&self) -> Option<String> {
        self.banner_text(&self.error_message).await
    }

    async fn banner_text(&self, banner: &P::Locator) -> Option<String> {
        match self.actions.get_text(banner).await {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::warn!(error = %err, "Banner text unavailable");
                None
            }
        }
    }

    pub async fn cleanup(self) -> Result<()> {
        self.actions.cleanup().await
    }
}
