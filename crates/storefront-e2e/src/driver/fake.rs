// In-memory BrowserPage for unit tests
//
// Elements are keyed by the exact selector string a page object builds
// (including ` >> ` chains and `nth=` suffixes). Every side-effecting call is
// appended to an action log so tests can assert what was (not) written.

use super::{BrowserPage, DialogQueue, DialogWatch, ElementLocator};
use crate::error::{DriverError, DriverResult};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Goto(String),
    Click(String),
    Fill(String, String),
    Check(String),
    Uncheck(String),
    Select(String, String),
    AcceptDialog(String),
    DismissDialog(String),
    Close,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeElement {
    texts: VecDeque<Option<String>>,
    visible: bool,
    checked: bool,
    count: Option<usize>,
    attributes: HashMap<String, String>,
    dialog_on_click: Option<String>,
}

impl FakeElement {
    pub(crate) fn visible() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    pub(crate) fn hidden() -> Self {
        Self::default()
    }

    pub(crate) fn with_text(text: &str) -> Self {
        Self::visible().text(text)
    }

    pub(crate) fn text(mut self, text: &str) -> Self {
        self.texts = VecDeque::from([Some(text.to_string())]);
        self
    }

    pub(crate) fn no_text(mut self) -> Self {
        self.texts = VecDeque::from([None]);
        self
    }

    /// Successive `text_content` reads walk through `texts`; the last one sticks.
    pub(crate) fn text_sequence(mut self, texts: &[&str]) -> Self {
        self.texts = texts.iter().map(|t| Some((*t).to_string())).collect();
        self
    }

    pub(crate) fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub(crate) fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub(crate) fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub(crate) fn opens_dialog(mut self, message: &str) -> Self {
        self.dialog_on_click = Some(message.to_string());
        self
    }
}

#[derive(Debug, Default)]
struct FakeState {
    elements: HashMap<String, FakeElement>,
    failures: HashMap<String, String>,
    goto_failure: Option<String>,
    load_failure: Option<String>,
    actions: Vec<Action>,
    closed: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakePage {
    state: Arc<Mutex<FakeState>>,
    dialogs: DialogQueue,
}

impl FakePage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(self, selector: &str, element: FakeElement) -> Self {
        self.state()
            .elements
            .insert(selector.to_string(), element);
        self
    }

    /// Every call on `selector` fails with `message`.
    pub(crate) fn failing(self, selector: &str, message: &str) -> Self {
        self.state()
            .failures
            .insert(selector.to_string(), message.to_string());
        self
    }

    pub(crate) fn failing_goto(self, message: &str) -> Self {
        self.state().goto_failure = Some(message.to_string());
        self
    }

    pub(crate) fn failing_load(self, message: &str) -> Self {
        self.state().load_failure = Some(message.to_string());
        self
    }

    pub(crate) fn actions(&self) -> Vec<Action> {
        self.state().actions.clone()
    }

    pub(crate) fn is_checked(&self, selector: &str) -> bool {
        self.state()
            .elements
            .get(selector)
            .is_some_and(|element| element.checked)
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_open(state: &FakeState) -> DriverResult<()> {
        if state.closed {
            return Err(DriverError::Other("Target page has been closed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserPage for FakePage {
    type Locator = FakeLocator;

    async fn goto(&self, url: &str) -> DriverResult<()> {
        let mut state = self.state();
        Self::ensure_open(&state)?;
        if let Some(message) = &state.goto_failure {
            return Err(DriverError::Other(message.clone()));
        }
        state.actions.push(Action::Goto(url.to_string()));
        Ok(())
    }

    async fn wait_for_load_state(&self) -> DriverResult<()> {
        let state = self.state();
        Self::ensure_open(&state)?;
        match &state.load_failure {
            Some(message) => Err(DriverError::Other(message.clone())),
            None => Ok(()),
        }
    }

    fn locator(&self, selector: &str) -> FakeLocator {
        FakeLocator {
            page: self.clone(),
            selector: selector.to_string(),
        }
    }

    async fn arm_dialog_acceptance(&self) -> DriverResult<DialogWatch> {
        Ok(self.dialogs.arm())
    }

    async fn close(&self) -> DriverResult<()> {
        let mut state = self.state();
        Self::ensure_open(&state)?;
        state.closed = true;
        state.actions.push(Action::Close);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FakeLocator {
    page: FakePage,
    selector: String,
}

impl FakeLocator {
    /// Runs `f` against the element, failing like a strict Playwright locator
    /// when nothing matches.
    fn with_element<T>(
        &self,
        f: impl FnOnce(&mut FakeElement, &mut Vec<Action>) -> T,
    ) -> DriverResult<T> {
        let mut guard = self.page.state();
        let state = &mut *guard;
        FakePage::ensure_open(state)?;
        if let Some(message) = state.failures.get(&self.selector) {
            return Err(DriverError::Other(message.clone()));
        }
        match state.elements.get_mut(&self.selector) {
            Some(element) => Ok(f(element, &mut state.actions)),
            None => Err(DriverError::Other(format!(
                "No element matches selector '{}'",
                self.selector
            ))),
        }
    }

    fn chained(&self, selector: String) -> Self {
        Self {
            page: self.page.clone(),
            selector,
        }
    }
}

#[async_trait]
impl ElementLocator for FakeLocator {
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
        match self.with_element(|element, _| element.count.unwrap_or(1)) {
            Ok(count) => Ok(count),
            Err(DriverError::Other(message)) if message.starts_with("No element") => Ok(0),
            Err(err) => Err(err),
        }
    }

    async fn wait_for_visible(&self) -> DriverResult<()> {
        let visible = self.is_visible().await?;
        if visible {
            Ok(())
        } else {
            Err(DriverError::Timeout {
                condition: format!("'{}' to be visible", self.selector),
                timeout: std::time::Duration::ZERO,
            })
        }
    }

    async fn click(&self) -> DriverResult<()> {
        let selector = self.selector.clone();
        let dialog = self.with_element(|element, actions| {
            actions.push(Action::Click(selector));
            element.dialog_on_click.clone()
        })?;

        // Same routing as the Playwright adapter: the oldest armed watch takes
        // the dialog, and a dialog nobody armed for is dismissed.
        if let Some(message) = dialog {
            match self.page.dialogs.next() {
                Some(tx) => {
                    self.page.state().actions.push(Action::AcceptDialog(message.clone()));
                    let _ = tx.send(Ok(message));
                }
                None => self.page.state().actions.push(Action::DismissDialog(message)),
            }
        }
        Ok(())
    }

    async fn fill(&self, text: &str) -> DriverResult<()> {
        let selector = self.selector.clone();
        self.with_element(|element, actions| {
            element.texts = VecDeque::from([Some(text.to_string())]);
            actions.push(Action::Fill(selector, text.to_string()));
        })
    }

    async fn text_content(&self) -> DriverResult<Option<String>> {
        self.with_element(|element, _| {
            if element.texts.len() > 1 {
                element.texts.pop_front().flatten()
            } else {
                element.texts.front().cloned().flatten()
            }
        })
    }

    async fn get_attribute(&self, name: &str) -> DriverResult<Option<String>> {
        self.with_element(|element, _| element.attributes.get(name).cloned())
    }

    async fn is_visible(&self) -> DriverResult<bool> {
        match self.with_element(|element, _| element.visible) {
            Ok(visible) => Ok(visible),
            Err(DriverError::Other(message)) if message.starts_with("No element") => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn is_checked(&self) -> DriverResult<bool> {
        self.with_element(|element, _| element.checked)
    }

    async fn check(&self) -> DriverResult<()> {
        let selector = self.selector.clone();
        self.with_element(|element, actions| {
            element.checked = true;
            actions.push(Action::Check(selector));
        })
    }

    async fn uncheck(&self) -> DriverResult<()> {
        let selector = self.selector.clone();
        self.with_element(|element, actions| {
            element.checked = false;
            actions.push(Action::Uncheck(selector));
        })
    }

    async fn select_option(&self, value: &str) -> DriverResult<()> {
        let selector = self.selector.clone();
        self.with_element(|element, actions| {
            element.texts = VecDeque::from([Some(value.to_string())]);
            actions.push(Action::Select(selector, value.to_string()));
        })
    }
}
