//! State-mutating interactions against the browser session.
//!
//! Every action follows the same pipeline: resolve the selector, apply an
//! implicit bounded wait where interaction needs the element rendered, invoke
//! the driver primitive, and on failure log the raw driver error at warn
//! level before raising a contextual assertion failure. Actions never retry;
//! the step-matching layer owns the single retry point.

use std::sync::Arc;

use crate::assert;
use crate::driver::{Browser, Cookie, Element};
use crate::error::{StepError, StepResult};
use crate::logger;
use crate::selector::Locator;
use crate::wait::{TargetState, Waiter, INTERACTION_WAIT_MS};

/// Wait applied before dropdown selection, longer than the plain
/// interaction wait because options often render late.
const SELECT_WAIT_MS: u64 = 20_000;

/// Which click gesture a step asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Single,
    Double,
}

impl ClickAction {
    /// Map the step verb onto a gesture. Anything that is not literally
    /// "click" is treated as a double click, mirroring the phrasing the
    /// step grammar allows.
    pub fn parse(verb: &str) -> Self {
        if verb.eq_ignore_ascii_case("click") {
            ClickAction::Single
        } else {
            ClickAction::Double
        }
    }
}

/// Whether input steps replace or append to the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMethod {
    Set,
    Add,
}

impl InputMethod {
    pub fn parse(verb: &str) -> Self {
        if verb.eq_ignore_ascii_case("add") {
            InputMethod::Add
        } else {
            InputMethod::Set
        }
    }
}

/// What to do with an open modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    Accept,
    Dismiss,
}

/// The modal flavors the step grammar distinguishes. They all ride the same
/// driver alert commands; the distinction only feeds log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    AlertBox,
    ConfirmBox,
    Prompt,
}

impl std::fmt::Display for ModalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModalKind::AlertBox => "alertbox",
            ModalKind::ConfirmBox => "confirmbox",
            ModalKind::Prompt => "prompt",
        };
        f.write_str(name)
    }
}

/// How analytics data-layer entries are selected: by their `event` field, or
/// by a set of fields that must all match exactly.
#[derive(Debug, Clone)]
pub enum EventFilter {
    Event(String),
    Fields(serde_json::Map<String, serde_json::Value>),
}

impl From<&str> for EventFilter {
    fn from(event: &str) -> Self {
        EventFilter::Event(event.to_string())
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for EventFilter {
    fn from(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        EventFilter::Fields(fields)
    }
}

/// How a dropdown option is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionType {
    Name,
    Value,
    Text,
}

impl SelectionType {
    /// Strict keyword parse. An unknown keyword is a programming error in
    /// the step definition and is raised immediately, without touching the
    /// log/assert pipeline.
    pub fn parse(keyword: &str) -> StepResult<Self> {
        match keyword {
            "name" => Ok(SelectionType::Name),
            "value" => Ok(SelectionType::Value),
            "text" => Ok(SelectionType::Text),
            other => Err(StepError::UnknownSelectionType(other.to_string())),
        }
    }
}

/// The action executor for one browser session.
pub struct Actions {
    browser: Arc<dyn Browser>,
    waiter: Waiter,
}

impl Actions {
    pub fn new(browser: Arc<dyn Browser>) -> Self {
        let waiter = Waiter::new(Arc::clone(&browser));
        Self { browser, waiter }
    }

    /// Log the raw driver error, then raise the contextual failure.
    fn report(&self, error: anyhow::Error, context: &str) -> StepError {
        logger::warn(&error.to_string());
        assert::fail(context)
    }

    async fn resolve(&self, locator: &Locator, context: &str) -> StepResult<Arc<dyn Element>> {
        locator
            .resolve(self.browser.as_ref())
            .await
            .map_err(|error| self.report(error, context))
    }

    /// Resolve and wait for the element to be rendered before interacting.
    async fn resolve_displayed(
        &self,
        locator: &Locator,
        wait_ms: u64,
        context: &str,
    ) -> StepResult<Arc<dyn Element>> {
        let element = self.resolve(locator, context).await?;
        element
            .wait_until(TargetState::Displayed, wait_ms, false)
            .await
            .map_err(|error| self.report(error, context))?;
        Ok(element)
    }

    pub async fn click(&self, selector: impl Into<Locator>, selector_name: &str) -> StepResult<()> {
        self.click_element(ClickAction::Single, selector, selector_name)
            .await
    }

    pub async fn double_click(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
    ) -> StepResult<()> {
        self.click_element(ClickAction::Double, selector, selector_name)
            .await
    }

    /// Perform a click or double click on the element.
    pub async fn click_element(
        &self,
        action: ClickAction,
        selector: impl Into<Locator>,
        selector_name: &str,
    ) -> StepResult<()> {
        let locator = selector.into();
        logger::info(&format!("Clicking on the {selector_name}"));
        let context = format!("{selector_name} is not clickable");
        let element = self
            .resolve_displayed(&locator, INTERACTION_WAIT_MS, &context)
            .await?;
        let result = match action {
            ClickAction::Single => element.click().await,
            ClickAction::Double => element.double_click().await,
        };
        result.map_err(|error| self.report(error, &context))
    }

    /// Clear the value of an input field.
    pub async fn clear_input_field(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
    ) -> StepResult<()> {
        let locator = selector.into();
        logger::info(&format!("Clearing the {selector_name}"));
        let context = format!("{selector_name} is not cleared");
        let element = self
            .resolve_displayed(&locator, INTERACTION_WAIT_MS, &context)
            .await?;
        element
            .clear_value()
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Replace or append to an input field's value.
    pub async fn set_input_field(
        &self,
        method: InputMethod,
        value: &str,
        selector: impl Into<Locator>,
        selector_name: &str,
    ) -> StepResult<()> {
        let locator = selector.into();
        logger::info(&format!("Setting the {value} to {selector_name}"));
        let context = format!("Unable to set the value to {selector_name}");
        let element = self
            .resolve_displayed(&locator, INTERACTION_WAIT_MS, &context)
            .await?;
        let result = match method {
            InputMethod::Add => element.add_value(value).await,
            InputMethod::Set => element.set_value(value).await,
        };
        result.map_err(|error| self.report(error, &context))
    }

    pub async fn set_value(
        &self,
        value: &str,
        selector: impl Into<Locator>,
        selector_name: &str,
    ) -> StepResult<()> {
        let locator = selector.into();
        logger::info(&format!("Setting the {value} to {selector_name}"));
        let context = format!("Unable to setValue for {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        element
            .set_value(value)
            .await
            .map_err(|error| self.report(error, &context))
    }

    pub async fn add_value(
        &self,
        value: &str,
        selector: impl Into<Locator>,
        selector_name: &str,
    ) -> StepResult<()> {
        let locator = selector.into();
        logger::info(&format!("Adding the {value} to {selector_name}"));
        let context = format!("Unable to addValue for {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        element
            .add_value(value)
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Drag the source element onto the destination element.
    pub async fn drag_element(
        &self,
        source: impl Into<Locator>,
        destination: impl Into<Locator>,
        source_name: &str,
        destination_name: &str,
    ) -> StepResult<()> {
        let source = source.into();
        let destination = destination.into();
        logger::info(&format!(
            "Dragging the {source_name} to {destination_name}"
        ));
        let context = format!("Unable to drag element {source_name}");
        let source_element = self.resolve(&source, &context).await?;
        let destination_element = self.resolve(&destination, &context).await?;
        source_element
            .drag_and_drop(destination_element)
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Move the pointer to the element, with an optional offset.
    pub async fn move_to(
        &self,
        selector: impl Into<Locator>,
        x: Option<&str>,
        y: Option<&str>,
        selector_name: &str,
    ) -> StepResult<()> {
        let locator = selector.into();
        let x = x.and_then(|raw| raw.trim().parse::<i32>().ok());
        let y = y.and_then(|raw| raw.trim().parse::<i32>().ok());
        logger::info(&format!("Moving to the {selector_name}"));
        let context = format!("Unable to moveTo {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        element
            .move_to(x, y)
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Scroll the page until the element is in view.
    pub async fn scroll(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
    ) -> StepResult<()> {
        let locator = selector.into();
        logger::info(&format!("Scrolling to the element {selector_name}"));
        let context = format!("Unable to scroll to the element {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        element
            .scroll_into_view()
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Scroll the viewport to an absolute coordinate.
    pub async fn scroll_by_coordinate(&self, x: i64, y: i64) -> StepResult<()> {
        let context = "Unable to scroll the page".to_string();
        self.browser
            .execute_script(
                "window.scrollTo(arguments[0], arguments[1]);",
                &[x.into(), y.into()],
            )
            .await
            .map(|_| ())
            .map_err(|error| self.report(error, &context))
    }

    /// Scale the page body to simulate zooming. 100 resets to the default.
    pub async fn zoom_by_percentage(&self, percentage: u32) -> StepResult<()> {
        let context = format!("Unable to zoom to {percentage}%");
        if percentage == 100 {
            self.browser
                .execute_script("document.body.style.zoom = 1;", &[])
                .await
                .map(|_| ())
                .map_err(|error| self.report(error, &context))?;
            return Ok(());
        }
        let factor = f64::from(percentage) / 100.0;
        self.browser
            .execute_script(
                "document.body.style.transform = `scale(${arguments[0]})`;",
                &[factor.into()],
            )
            .await
            .map_err(|error| self.report(error, &context))?;
        logger::info(&format!("Zoomed to {percentage}%"));
        Ok(())
    }

    /// Select a dropdown option addressed by name, value or visible text.
    pub async fn select_option(
        &self,
        selector: impl Into<Locator>,
        selection_type: &str,
        selection_value: &str,
    ) -> StepResult<()> {
        // Unknown keywords fail fast, before any logging or resolution.
        let selection = SelectionType::parse(selection_type)?;
        let locator = selector.into();
        logger::info(&format!(
            "Selecting the {selection_value} from the dropdown"
        ));
        let context = format!("Unable to select the option: {selection_value}");
        let element = self
            .resolve_displayed(&locator, SELECT_WAIT_MS, &context)
            .await?;
        let result = match selection {
            SelectionType::Name => element.select_by_attribute("name", selection_value).await,
            SelectionType::Value => element.select_by_attribute("value", selection_value).await,
            SelectionType::Text => element.select_by_visible_text(selection_value).await,
        };
        result.map_err(|error| self.report(error, &context))?;
        if let Ok(selected) = element.is_selected().await {
            logger::debug(&format!("Option selected state: {selected}"));
        }
        Ok(())
    }

    /// Select a dropdown option by its zero-based index.
    pub async fn select_option_by_index(
        &self,
        selector: impl Into<Locator>,
        index: &str,
        selector_name: &str,
    ) -> StepResult<()> {
        let locator = selector.into();
        logger::info(&format!("Selecting the option at index {index}"));
        let context = format!("Unable to select option by index on {selector_name}");
        let index: usize = index
            .trim()
            .parse()
            .map_err(|_| assert::fail(&context))?;
        let element = self
            .resolve_displayed(&locator, SELECT_WAIT_MS, &context)
            .await?;
        element
            .select_by_index(index)
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Navigate to a URL and maximize the window.
    pub async fn open_website(&self, page: &str) -> StepResult<()> {
        logger::info(&format!("Opening the URL {page}"));
        let context = format!("Unable to open website {page}");
        self.browser
            .goto(page)
            .await
            .map_err(|error| self.report(error, &context))?;
        self.browser
            .maximize_window()
            .await
            .map_err(|error| self.report(error, &context))?;
        let current = self
            .browser
            .current_url()
            .await
            .map_err(|error| self.report(error, &context))?;
        if current.contains(page) {
            logger::log("Url is matching");
        } else {
            logger::warn("Url is not matching");
        }
        Ok(())
    }

    /// Open a URL in a new window, focus it and verify the address.
    pub async fn new_window(&self, url: &str, url_name: &str) -> StepResult<()> {
        logger::info(&format!("Opening a new window in browser {url}"));
        let context = format!("{url_name} is not opened in a new window");
        self.browser
            .new_window(url)
            .await
            .map_err(|error| self.report(error, &context))?;
        self.focus_last_opened_window(url_name).await?;
        let current = self
            .browser
            .current_url()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            current.as_str(),
            url,
            &format!("verifying if url {url_name} is matched"),
        )
    }

    /// Switch focus to the window whose URL or title matches the pattern.
    pub async fn switch_window(&self, window_name: &str) -> StepResult<()> {
        logger::info(&format!("Switching to the window/tab {window_name}"));
        let context = format!("{window_name} is not switched in a new window/tab");
        self.browser
            .switch_window(window_name)
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Switch focus to a window by its raw handle.
    pub async fn switch_to_window_handle(&self, handle: &str) -> StepResult<()> {
        logger::info(&format!("Switching to the window handle {handle}"));
        let context = format!("Unable to switch to window {handle}");
        self.browser
            .switch_to_window(handle)
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Handles of every open top-level browsing context.
    pub async fn window_handles(&self) -> StepResult<Vec<String>> {
        logger::info("Getting the info of opened windows");
        self.browser
            .window_handles()
            .await
            .map_err(|error| self.report(error, "Unable to get the window handles"))
    }

    /// Focus the most-recently-opened window.
    pub async fn focus_last_opened_window(&self, page: &str) -> StepResult<()> {
        logger::info("Focusing on the last opened window");
        let context = format!("Unable to focus on the last opened {page}");
        let handles = self
            .browser
            .window_handles()
            .await
            .map_err(|error| self.report(error, &context))?;
        let Some(last) = handles.last() else {
            return Err(assert::fail(&context));
        };
        self.browser
            .switch_to_window(last)
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Close the most-recently-created window and refocus the new last one.
    pub async fn close_last_opened_window(&self, tab_name: &str) -> StepResult<()> {
        logger::info("Closing the last opened window");
        let context = format!("Error in closing the {tab_name}");
        let handles = self
            .browser
            .window_handles()
            .await
            .map_err(|error| self.report(error, &context))?;
        let Some(last) = handles.last() else {
            return Err(assert::fail(&context));
        };
        self.browser
            .switch_to_window(last)
            .await
            .map_err(|error| self.report(error, &context))?;
        self.browser
            .close_window()
            .await
            .map_err(|error| self.report(error, &context))?;
        let remaining = self
            .browser
            .window_handles()
            .await
            .map_err(|error| self.report(error, &context))?;
        if let Some(new_last) = remaining.last() {
            self.browser
                .switch_to_window(new_last)
                .await
                .map_err(|error| self.report(error, &context))?;
        }
        Ok(())
    }

    /// Close every window except the first one and leave it focused.
    pub async fn close_all_but_first_tab(&self, tab_name: &str) -> StepResult<()> {
        logger::info("Closing all tabs apart from the first tab");
        let context = format!("Error in closing all tabs apart from {tab_name}");
        let handles = self
            .browser
            .window_handles()
            .await
            .map_err(|error| self.report(error, &context))?;
        let Some(first) = handles.first().cloned() else {
            return Err(assert::fail(&context));
        };
        for handle in handles.iter().skip(1) {
            self.browser
                .switch_to_window(handle)
                .await
                .map_err(|error| self.report(error, &context))?;
            self.browser
                .close_window()
                .await
                .map_err(|error| self.report(error, &context))?;
        }
        self.browser
            .switch_to_window(&first)
            .await
            .map_err(|error| self.report(error, &context))?;
        let current = self
            .browser
            .current_window_handle()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(current, first, "verifying the first window handle is focused")
    }

    /// Close every window except the currently focused one.
    pub async fn close_all_but_current_tab(&self, tab_name: &str) -> StepResult<()> {
        logger::info("Closing all tabs apart from the current tab");
        let context = format!("Error in closing all tabs apart from {tab_name}");
        let current = self
            .browser
            .current_window_handle()
            .await
            .map_err(|error| self.report(error, &context))?;
        let handles = self
            .browser
            .window_handles()
            .await
            .map_err(|error| self.report(error, &context))?;
        for handle in handles.iter().filter(|handle| **handle != current) {
            self.browser
                .switch_to_window(handle)
                .await
                .map_err(|error| self.report(error, &context))?;
            self.browser
                .close_window()
                .await
                .map_err(|error| self.report(error, &context))?;
        }
        self.browser
            .switch_to_window(&current)
            .await
            .map_err(|error| self.report(error, &context))
    }

    pub async fn maximize_window(&self) -> StepResult<()> {
        logger::info("Maximizing the window");
        self.browser
            .maximize_window()
            .await
            .map_err(|error| self.report(error, "Window is not maximized"))
    }

    /// Resize the window and verify the session reports the new size.
    pub async fn set_window_size(&self, width: &str, height: &str) -> StepResult<()> {
        logger::info(&format!(
            "Setting the window size to {width} and {height}"
        ));
        let context = format!("Unable to set window size to {width} and {height}");
        let (width, height): (u32, u32) = match (width.trim().parse(), height.trim().parse()) {
            (Ok(w), Ok(h)) => (w, h),
            _ => return Err(assert::fail(&context)),
        };
        self.browser
            .set_window_size(width, height)
            .await
            .map_err(|error| self.report(error, &context))?;
        let (new_width, new_height) = self
            .browser
            .window_size()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(new_width, width, "verifying window width")?;
        assert::verify(new_height, height, "verifying window height")
    }

    /// Switch into the given iframe.
    pub async fn switch_to_frame(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
    ) -> StepResult<()> {
        let locator = selector.into();
        logger::info(&format!("Switching into the {selector_name} frame"));
        let context = format!("Unable to switch to frame {selector_name}");
        let frame = self.resolve(&locator, &context).await?;
        self.browser
            .switch_to_frame(frame)
            .await
            .map_err(|error| self.report(error, &context))
    }

    pub async fn switch_to_parent_frame(&self, selector_name: &str) -> StepResult<()> {
        logger::info("Switching to the parent frame");
        let context = format!("Unable to switch to {selector_name} parent frame");
        self.browser
            .switch_to_parent_frame()
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Set a cookie, creating it when absent.
    pub async fn set_cookie(&self, cookie_name: &str, cookie_content: &str) -> StepResult<()> {
        logger::info(&format!(
            "Setting the cookie {cookie_name} to {cookie_content}"
        ));
        let context = format!("Unable to setCookie {cookie_name}");
        self.browser
            .set_cookie(Cookie::new(cookie_name, cookie_content))
            .await
            .map_err(|error| self.report(error, &context))
    }

    pub async fn delete_cookies(&self, name: &str) -> StepResult<()> {
        logger::info(&format!("Deleting the cookie {name}"));
        let context = format!("{name} cookie is not deleted");
        self.browser
            .delete_cookie(name)
            .await
            .map_err(|error| self.report(error, &context))
    }

    pub async fn delete_all_cookies(&self, page: &str) -> StepResult<()> {
        logger::info("Deleting all cookies");
        let context = format!("All cookies are not deleted on {page}");
        self.browser
            .delete_all_cookies()
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Accept or dismiss an open modal. Every modal kind rides the same two
    /// driver alert commands; the kind only colors the messages.
    pub async fn handle_modal(&self, action: ModalAction, modal: ModalKind) -> StepResult<()> {
        logger::info(&format!("Handling the {modal}"));
        let context = format!("Unable to handle modal {modal}");
        let result = match action {
            ModalAction::Accept => self.browser.accept_alert().await,
            ModalAction::Dismiss => self.browser.dismiss_alert().await,
        };
        result.map_err(|error| self.report(error, &context))
    }

    /// Text of the currently open modal.
    pub async fn get_alert_text(&self, alertbox_name: &str) -> StepResult<String> {
        logger::info(&format!("Fetching the text of {alertbox_name} alert box"));
        let context = format!("Unable to fetch the {alertbox_name} alert box text");
        self.browser
            .alert_text()
            .await
            .map_err(|error| self.report(error, &context))
    }

    pub async fn accept_alert(&self, alertbox_name: &str) -> StepResult<()> {
        logger::info(&format!("Accepting the {alertbox_name} alert box"));
        let context = format!("{alertbox_name} alert box is not displayed");
        self.browser
            .accept_alert()
            .await
            .map_err(|error| self.report(error, &context))
    }

    pub async fn dismiss_alert(&self, alertbox_name: &str) -> StepResult<()> {
        logger::info(&format!("Dismissing the {alertbox_name} alert box"));
        let context = format!("{alertbox_name} alert box is not displayed");
        self.browser
            .dismiss_alert()
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Type into the currently open prompt.
    pub async fn set_prompt_text(&self, modal_text: &str, modal_name: &str) -> StepResult<()> {
        logger::info(&format!("Setting the {modal_text} to the modal"));
        let context =
            format!("A {modal_name} prompt was not open when it should have been open");
        self.browser
            .send_alert_text(modal_text)
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Press a key chord at the session level.
    pub async fn press_button(&self, key: &str) -> StepResult<()> {
        logger::info(&format!("Pressing the {key} key"));
        let context = format!("Unable to press button: {key}");
        self.browser
            .press_keys(key)
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Reload the current page. A failed reload is reported but not fatal.
    pub async fn refresh(&self, page_name: &str) {
        logger::info(&format!("Refreshing the {page_name} tab"));
        if let Err(error) = self.browser.refresh().await {
            logger::warn(&error.to_string());
            logger::warn(&format!("Unable to refresh the page {page_name}"));
        }
    }

    /// Suspend the scenario for a fixed amount of time.
    pub async fn pause(&self, ms: Option<&str>) {
        let ms = ms
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(5_000);
        logger::info(&format!("Pausing the execution for {ms} ms"));
        if let Err(error) = self.browser.pause(ms).await {
            logger::warn(&error.to_string());
            logger::warn("Issue with the browser session");
        }
    }

    /// Snapshot of the page's analytics data layer, taken once the document
    /// reports a complete ready state. A page that never pushed one yields
    /// an empty snapshot.
    pub async fn fetch_data_layer(&self, page: &str) -> StepResult<Vec<serde_json::Value>> {
        logger::info(&format!("Fetching the dataLayer of {page}"));
        self.waiter.wait_until_page_load(page).await?;
        let context = format!("Unable to fetch the dataLayer of {page}");
        let data_layer = self
            .browser
            .execute_script("return window.dataLayer;", &[])
            .await
            .map_err(|error| self.report(error, &context))?;
        match data_layer {
            serde_json::Value::Array(entries) => Ok(entries),
            serde_json::Value::Null => Ok(Vec::new()),
            _ => Err(assert::fail(&context)),
        }
    }

    /// Entries of a data-layer snapshot matching the given filter.
    pub fn get_events_details(
        &self,
        data_layer: &[serde_json::Value],
        filter: &EventFilter,
    ) -> Vec<serde_json::Value> {
        match filter {
            EventFilter::Event(event) => {
                logger::debug("Looking for results via event name");
                data_layer
                    .iter()
                    .filter(|entry| {
                        entry.get("event").and_then(|value| value.as_str()) == Some(event)
                    })
                    .cloned()
                    .collect()
            }
            EventFilter::Fields(fields) => {
                logger::debug("Looking for results via field filter");
                data_layer
                    .iter()
                    .filter(|entry| fields.iter().all(|(key, value)| entry.get(key) == Some(value)))
                    .cloned()
                    .collect()
            }
        }
    }

    /// How many elements the locator currently matches.
    pub async fn element_count(&self, selector: &str) -> StepResult<usize> {
        logger::info("Getting the length of the selector");
        match self.browser.find_all(selector).await {
            Ok(elements) => Ok(elements.len()),
            Err(error) => Err(self.report(error, "Unable to get the length of selector")),
        }
    }

    pub async fn get_text(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
    ) -> StepResult<String> {
        let locator = selector.into();
        logger::info(&format!("Getting the text of {selector_name}"));
        let context = format!("Unable to get text of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        element
            .text()
            .await
            .map_err(|error| self.report(error, &context))
    }

    pub async fn get_value(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
    ) -> StepResult<Option<String>> {
        let locator = selector.into();
        logger::info(&format!("Getting the value of {selector_name}"));
        let context = format!("Unable to get value of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        element
            .value()
            .await
            .map_err(|error| self.report(error, &context))
    }

    pub async fn get_attribute(
        &self,
        selector: impl Into<Locator>,
        attribute_name: &str,
        selector_name: &str,
    ) -> StepResult<Option<String>> {
        let locator = selector.into();
        logger::info(&format!(
            "Getting the {attribute_name} attribute of {selector_name}"
        ));
        let context = format!("Unable to get attribute of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        element
            .attribute(attribute_name)
            .await
            .map_err(|error| self.report(error, &context))
    }

    pub async fn get_property(
        &self,
        selector: impl Into<Locator>,
        property_name: &str,
        selector_name: &str,
    ) -> StepResult<Option<String>> {
        let locator = selector.into();
        logger::info(&format!(
            "Getting the {property_name} property of {selector_name}"
        ));
        let context = format!("Unable to get property of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        element
            .property(property_name)
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Title of the current page. Soft: a driver failure logs a warning and
    /// yields `None`.
    pub async fn get_title(&self) -> Option<String> {
        logger::info("Fetching the title");
        match self.browser.title().await {
            Ok(title) => Some(title),
            Err(error) => {
                logger::warn(&error.to_string());
                logger::warn("Unable to get title of current opened website/page");
                None
            }
        }
    }

    /// Soft probe: `false` both when the condition fails and when the driver
    /// errors out, so steps can branch without failing the scenario.
    pub async fn is_displayed(&self, selector: impl Into<Locator>, selector_name: &str) -> bool {
        self.probe(selector.into(), selector_name, "displayed", |element| {
            Box::pin(async move { element.is_displayed().await })
        })
        .await
    }

    pub async fn is_enabled(&self, selector: impl Into<Locator>, selector_name: &str) -> bool {
        self.probe(selector.into(), selector_name, "enabled", |element| {
            Box::pin(async move { element.is_enabled().await })
        })
        .await
    }

    pub async fn is_clickable(&self, selector: impl Into<Locator>, selector_name: &str) -> bool {
        self.probe(selector.into(), selector_name, "clickable", |element| {
            Box::pin(async move { element.is_clickable().await })
        })
        .await
    }

    pub async fn is_selected(&self, selector: impl Into<Locator>, selector_name: &str) -> bool {
        self.probe(selector.into(), selector_name, "selected", |element| {
            Box::pin(async move { element.is_selected().await })
        })
        .await
    }

    pub async fn is_existing(&self, selector: impl Into<Locator>, selector_name: &str) -> bool {
        self.probe(selector.into(), selector_name, "existing", |element| {
            Box::pin(async move { element.is_existing().await })
        })
        .await
    }

    pub async fn is_displayed_in_viewport(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
    ) -> bool {
        self.probe(
            selector.into(),
            selector_name,
            "displayed in viewport",
            |element| Box::pin(async move { element.is_displayed_in_viewport().await }),
        )
        .await
    }

    async fn probe<F>(
        &self,
        locator: Locator,
        selector_name: &str,
        condition: &str,
        check: F,
    ) -> bool
    where
        F: FnOnce(
            Arc<dyn Element>,
        ) -> std::pin::Pin<
            Box<dyn std::future::Future<Output = anyhow::Result<bool>> + Send>,
        >,
    {
        logger::info(&format!(
            "Checking whether the {selector_name} is {condition} or not"
        ));
        let element = match locator.resolve(self.browser.as_ref()).await {
            Ok(element) => element,
            Err(error) => {
                logger::warn(&error.to_string());
                logger::warn(&format!("{selector_name} is not {condition}"));
                return false;
            }
        };
        match check(element).await {
            Ok(verdict) => verdict,
            Err(error) => {
                logger::warn(&error.to_string());
                logger::warn(&format!("{selector_name} is not {condition}"));
                false
            }
        }
    }

    /// The wait engine bound to this session.
    pub fn waiter(&self) -> &Waiter {
        &self.waiter
    }
}
