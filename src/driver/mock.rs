//! In-memory browser session used by the unit tests.
//!
//! Fixtures are registered per locator and the mock owns the wait poll loop,
//! the same way a real driver binding does: the step layer only hands over a
//! timeout and a polarity. All mutating interactions are recorded so tests
//! can assert what the driver was told to do.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::traits::{Axis, Browser, Cookie, CssProperty, Element, Size};
use crate::wait::TargetState;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Scriptable state for one element locator.
#[derive(Clone)]
pub struct Fixture {
    exists: bool,
    displayed: bool,
    /// When set, the displayed flag flips once this instant passes.
    displayed_flips_at: Option<Instant>,
    in_viewport: bool,
    enabled: bool,
    clickable: bool,
    selected: bool,
    focused: bool,
    text: String,
    value: Option<String>,
    attrs: HashMap<String, String>,
    props: HashMap<String, String>,
    css: HashMap<String, CssProperty>,
    size: Size,
    location: (i32, i32),
    /// How many matches `find_all` reports.
    count: usize,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            exists: true,
            displayed: true,
            displayed_flips_at: None,
            in_viewport: true,
            enabled: true,
            clickable: true,
            selected: false,
            focused: false,
            text: String::new(),
            value: None,
            attrs: HashMap::new(),
            props: HashMap::new(),
            css: HashMap::new(),
            size: Size {
                width: 100,
                height: 50,
            },
            location: (0, 0),
            count: 1,
        }
    }
}

impl Fixture {
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn prop(mut self, name: &str, value: &str) -> Self {
        self.props.insert(name.to_string(), value.to_string());
        self
    }

    pub fn css(mut self, name: &str, value: CssProperty) -> Self {
        self.css.insert(name.to_string(), value);
        self
    }

    pub fn displayed(mut self, displayed: bool) -> Self {
        self.displayed = displayed;
        self
    }

    pub fn displayed_after(mut self, delay: Duration) -> Self {
        self.displayed = false;
        self.displayed_flips_at = Some(Instant::now() + delay);
        self
    }

    pub fn hidden_after(mut self, delay: Duration) -> Self {
        self.displayed = true;
        self.displayed_flips_at = Some(Instant::now() + delay);
        self
    }

    pub fn in_viewport(mut self, in_viewport: bool) -> Self {
        self.in_viewport = in_viewport;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn exists(mut self, exists: bool) -> Self {
        self.exists = exists;
        self
    }

    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.size = Size { width, height };
        self
    }

    pub fn location(mut self, x: i32, y: i32) -> Self {
        self.location = (x, y);
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    fn displayed_now(&self) -> bool {
        match self.displayed_flips_at {
            Some(at) if Instant::now() >= at => !self.displayed,
            _ => self.displayed,
        }
    }

    fn meets(&self, state: TargetState) -> bool {
        match state {
            TargetState::Exist => self.exists,
            TargetState::Displayed => self.exists && self.displayed_now(),
            TargetState::Enabled => self.exists && self.enabled,
            TargetState::Clickable => self.exists && self.displayed_now() && self.clickable,
            TargetState::Stable => self.exists && self.displayed_now(),
        }
    }
}

#[derive(Clone)]
struct Window {
    handle: String,
    url: String,
    title: String,
}

/// Everything the mock session remembers, including the interaction log.
#[derive(Default)]
struct PageState {
    elements: HashMap<String, Fixture>,
    windows: Vec<Window>,
    current_window: Option<usize>,
    next_handle: usize,
    cookies: Vec<Cookie>,
    alert: Option<String>,
    frame_stack: Vec<String>,
    window_size: (u32, u32),
    maximized: bool,
    ready: bool,

    clicks: Vec<String>,
    double_clicks: Vec<String>,
    cleared: Vec<String>,
    set_values: Vec<(String, String)>,
    added_values: Vec<(String, String)>,
    drags: Vec<(String, String)>,
    moves: Vec<(String, Option<i32>, Option<i32>)>,
    scrolled: Vec<String>,
    selections: Vec<(String, String, String)>,
    keys: Vec<String>,
    pauses: Vec<u64>,
    scripts: Vec<(String, Vec<serde_json::Value>)>,
    script_results: Vec<serde_json::Value>,
    alert_inputs: Vec<String>,
    accepted_alerts: usize,
    dismissed_alerts: usize,
}

pub struct MockBrowser {
    state: Arc<Mutex<PageState>>,
}

impl MockBrowser {
    pub fn new() -> Self {
        let mut state = PageState::default();
        state.windows.push(Window {
            handle: "window-0".to_string(),
            url: "about:blank".to_string(),
            title: String::new(),
        });
        state.current_window = Some(0);
        state.next_handle = 1;
        state.window_size = (1280, 720);
        state.ready = true;
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn add_element(&self, locator: &str, configure: impl FnOnce(Fixture) -> Fixture) {
        let fixture = configure(Fixture::default());
        self.state
            .lock()
            .unwrap()
            .elements
            .insert(locator.to_string(), fixture);
    }

    pub fn open_alert(&self, text: &str) {
        self.state.lock().unwrap().alert = Some(text.to_string());
    }

    pub fn set_ready(&self, ready: bool) {
        self.state.lock().unwrap().ready = ready;
    }

    /// Queue a value for the next `execute_script` call to return. Unqueued
    /// calls return `Null`.
    pub fn push_script_result(&self, value: serde_json::Value) {
        self.state.lock().unwrap().script_results.push(value);
    }

    pub fn set_page(&self, url: &str, title: &str) {
        let mut state = self.state.lock().unwrap();
        let index = state.current_window.expect("no focused window");
        state.windows[index].url = url.to_string();
        state.windows[index].title = title.to_string();
    }

    /// Open an extra window without moving focus, as if a page had popped it.
    pub fn popup_window(&self, url: &str, title: &str) {
        let mut state = self.state.lock().unwrap();
        let handle = format!("window-{}", state.next_handle);
        state.next_handle += 1;
        state.windows.push(Window {
            handle,
            url: url.to_string(),
            title: title.to_string(),
        });
    }

    pub fn handles(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.windows.iter().map(|w| w.handle.clone()).collect()
    }

    pub fn focused_handle(&self) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .current_window
            .map(|index| state.windows[index].handle.clone())
    }

    pub fn cookie_jar(&self) -> Vec<Cookie> {
        self.state.lock().unwrap().cookies.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn double_clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().double_clicks.clone()
    }

    pub fn cleared(&self) -> Vec<String> {
        self.state.lock().unwrap().cleared.clone()
    }

    pub fn set_values(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().set_values.clone()
    }

    pub fn added_values(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().added_values.clone()
    }

    pub fn drags(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().drags.clone()
    }

    pub fn moves(&self) -> Vec<(String, Option<i32>, Option<i32>)> {
        self.state.lock().unwrap().moves.clone()
    }

    pub fn scrolled(&self) -> Vec<String> {
        self.state.lock().unwrap().scrolled.clone()
    }

    pub fn selections(&self) -> Vec<(String, String, String)> {
        self.state.lock().unwrap().selections.clone()
    }

    pub fn pressed_keys(&self) -> Vec<String> {
        self.state.lock().unwrap().keys.clone()
    }

    pub fn scripts(&self) -> Vec<(String, Vec<serde_json::Value>)> {
        self.state.lock().unwrap().scripts.clone()
    }

    pub fn alert_inputs(&self) -> Vec<String> {
        self.state.lock().unwrap().alert_inputs.clone()
    }

    pub fn accepted_alerts(&self) -> usize {
        self.state.lock().unwrap().accepted_alerts
    }

    pub fn dismissed_alerts(&self) -> usize {
        self.state.lock().unwrap().dismissed_alerts
    }

    pub fn frame_stack(&self) -> Vec<String> {
        self.state.lock().unwrap().frame_stack.clone()
    }

    pub fn is_maximized(&self) -> bool {
        self.state.lock().unwrap().maximized
    }

    pub fn current_window_size(&self) -> (u32, u32) {
        self.state.lock().unwrap().window_size
    }

    pub fn pauses(&self) -> Vec<u64> {
        self.state.lock().unwrap().pauses.clone()
    }
}

impl Default for MockBrowser {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MockElement {
    locator: String,
    state: Arc<Mutex<PageState>>,
}

impl MockElement {
    fn with_fixture<T>(&self, f: impl FnOnce(&Fixture) -> T) -> Result<T> {
        let state = self.state.lock().unwrap();
        match state.elements.get(&self.locator) {
            Some(fixture) => Ok(f(fixture)),
            None => bail!("no such element: {}", self.locator),
        }
    }

    fn require_existing(&self) -> Result<()> {
        if self.with_fixture(|fixture| fixture.exists)? {
            Ok(())
        } else {
            bail!("stale element reference: {}", self.locator)
        }
    }
}

#[async_trait]
impl Element for MockElement {
    fn selector(&self) -> &str {
        &self.locator
    }

    async fn click(&self) -> Result<()> {
        self.require_existing()?;
        if !self.with_fixture(|f| f.meets(TargetState::Clickable))? {
            bail!("element not interactable: {}", self.locator);
        }
        self.state.lock().unwrap().clicks.push(self.locator.clone());
        Ok(())
    }

    async fn double_click(&self) -> Result<()> {
        self.require_existing()?;
        self.state
            .lock()
            .unwrap()
            .double_clicks
            .push(self.locator.clone());
        Ok(())
    }

    async fn clear_value(&self) -> Result<()> {
        self.require_existing()?;
        let mut state = self.state.lock().unwrap();
        if let Some(fixture) = state.elements.get_mut(&self.locator) {
            fixture.value = Some(String::new());
        }
        state.cleared.push(self.locator.clone());
        Ok(())
    }

    async fn set_value(&self, text: &str) -> Result<()> {
        self.require_existing()?;
        let mut state = self.state.lock().unwrap();
        if let Some(fixture) = state.elements.get_mut(&self.locator) {
            fixture.value = Some(text.to_string());
        }
        state
            .set_values
            .push((self.locator.clone(), text.to_string()));
        Ok(())
    }

    async fn add_value(&self, text: &str) -> Result<()> {
        self.require_existing()?;
        let mut state = self.state.lock().unwrap();
        if let Some(fixture) = state.elements.get_mut(&self.locator) {
            let mut value = fixture.value.clone().unwrap_or_default();
            value.push_str(text);
            fixture.value = Some(value);
        }
        state
            .added_values
            .push((self.locator.clone(), text.to_string()));
        Ok(())
    }

    async fn text(&self) -> Result<String> {
        self.with_fixture(|f| f.text.clone())
    }

    async fn value(&self) -> Result<Option<String>> {
        self.with_fixture(|f| f.value.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.with_fixture(|f| f.attrs.get(name).cloned())
    }

    async fn property(&self, name: &str) -> Result<Option<String>> {
        self.with_fixture(|f| f.props.get(name).cloned())
    }

    async fn css_property(&self, name: &str) -> Result<CssProperty> {
        self.with_fixture(|f| {
            f.css
                .get(name)
                .cloned()
                .unwrap_or_else(|| CssProperty::plain(""))
        })
    }

    async fn is_displayed(&self) -> Result<bool> {
        self.with_fixture(|f| f.exists && f.displayed_now())
    }

    async fn is_displayed_in_viewport(&self) -> Result<bool> {
        self.with_fixture(|f| f.exists && f.displayed_now() && f.in_viewport)
    }

    async fn is_enabled(&self) -> Result<bool> {
        self.with_fixture(|f| f.enabled)
    }

    async fn is_selected(&self) -> Result<bool> {
        self.with_fixture(|f| f.selected)
    }

    async fn is_clickable(&self) -> Result<bool> {
        self.with_fixture(|f| f.meets(TargetState::Clickable))
    }

    async fn is_focused(&self) -> Result<bool> {
        self.with_fixture(|f| f.focused)
    }

    async fn is_existing(&self) -> Result<bool> {
        self.with_fixture(|f| f.exists)
    }

    async fn size(&self) -> Result<Size> {
        self.with_fixture(|f| f.size)
    }

    async fn location(&self, axis: Axis) -> Result<i32> {
        self.with_fixture(|f| match axis {
            Axis::X => f.location.0,
            Axis::Y => f.location.1,
        })
    }

    async fn drag_and_drop(&self, target: Arc<dyn Element>) -> Result<()> {
        self.require_existing()?;
        self.state
            .lock()
            .unwrap()
            .drags
            .push((self.locator.clone(), target.selector().to_string()));
        Ok(())
    }

    async fn move_to(&self, x: Option<i32>, y: Option<i32>) -> Result<()> {
        self.require_existing()?;
        self.state
            .lock()
            .unwrap()
            .moves
            .push((self.locator.clone(), x, y));
        Ok(())
    }

    async fn scroll_into_view(&self) -> Result<()> {
        self.require_existing()?;
        self.state
            .lock()
            .unwrap()
            .scrolled
            .push(self.locator.clone());
        Ok(())
    }

    async fn select_by_attribute(&self, attribute: &str, value: &str) -> Result<()> {
        self.require_existing()?;
        let mut state = self.state.lock().unwrap();
        if let Some(fixture) = state.elements.get_mut(&self.locator) {
            fixture.selected = true;
        }
        state.selections.push((
            self.locator.clone(),
            format!("attribute:{attribute}"),
            value.to_string(),
        ));
        Ok(())
    }

    async fn select_by_visible_text(&self, text: &str) -> Result<()> {
        self.require_existing()?;
        let mut state = self.state.lock().unwrap();
        if let Some(fixture) = state.elements.get_mut(&self.locator) {
            fixture.selected = true;
        }
        state
            .selections
            .push((self.locator.clone(), "text".to_string(), text.to_string()));
        Ok(())
    }

    async fn select_by_index(&self, index: usize) -> Result<()> {
        self.require_existing()?;
        let mut state = self.state.lock().unwrap();
        if let Some(fixture) = state.elements.get_mut(&self.locator) {
            fixture.selected = true;
        }
        state
            .selections
            .push((self.locator.clone(), "index".to_string(), index.to_string()));
        Ok(())
    }

    async fn wait_until(&self, state: TargetState, timeout_ms: u64, reverse: bool) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            let met = self.with_fixture(|f| f.meets(state))?;
            if met != reverse {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!(
                    "timed out after {timeout_ms}ms waiting for {} to be {state:?} (reverse: {reverse})",
                    self.locator
                );
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl Browser for MockBrowser {
    async fn find_element(&self, locator: &str) -> Result<Arc<dyn Element>> {
        let state = self.state.lock().unwrap();
        if !state.elements.contains_key(locator) {
            bail!("no such element: {locator}");
        }
        Ok(Arc::new(MockElement {
            locator: locator.to_string(),
            state: Arc::clone(&self.state),
        }))
    }

    async fn find_all(&self, locator: &str) -> Result<Vec<Arc<dyn Element>>> {
        let count = {
            let state = self.state.lock().unwrap();
            state
                .elements
                .get(locator)
                .map(|fixture| if fixture.exists { fixture.count } else { 0 })
                .unwrap_or(0)
        };
        Ok((0..count)
            .map(|_| {
                Arc::new(MockElement {
                    locator: locator.to_string(),
                    state: Arc::clone(&self.state),
                }) as Arc<dyn Element>
            })
            .collect())
    }

    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let index = state.current_window.expect("no focused window");
        state.windows[index].url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let state = self.state.lock().unwrap();
        match state.current_window {
            Some(index) => Ok(state.windows[index].url.clone()),
            None => bail!("no such window"),
        }
    }

    async fn title(&self) -> Result<String> {
        let state = self.state.lock().unwrap();
        match state.current_window {
            Some(index) => Ok(state.windows[index].title.clone()),
            None => bail!("no such window"),
        }
    }

    async fn refresh(&self) -> Result<()> {
        Ok(())
    }

    async fn maximize_window(&self) -> Result<()> {
        self.state.lock().unwrap().maximized = true;
        Ok(())
    }

    async fn set_window_size(&self, width: u32, height: u32) -> Result<()> {
        self.state.lock().unwrap().window_size = (width, height);
        Ok(())
    }

    async fn window_size(&self) -> Result<(u32, u32)> {
        Ok(self.state.lock().unwrap().window_size)
    }

    async fn window_handles(&self) -> Result<Vec<String>> {
        Ok(self.handles())
    }

    async fn current_window_handle(&self) -> Result<String> {
        match self.focused_handle() {
            Some(handle) => Ok(handle),
            None => bail!("no such window"),
        }
    }

    async fn switch_to_window(&self, handle: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match state.windows.iter().position(|w| w.handle == handle) {
            Some(index) => {
                state.current_window = Some(index);
                Ok(())
            }
            None => bail!("no such window: {handle}"),
        }
    }

    async fn switch_window(&self, pattern: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match state
            .windows
            .iter()
            .position(|w| w.url.contains(pattern) || w.title.contains(pattern))
        {
            Some(index) => {
                state.current_window = Some(index);
                Ok(())
            }
            None => bail!("no window matching: {pattern}"),
        }
    }

    async fn close_window(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match state.current_window {
            Some(index) => {
                state.windows.remove(index);
                state.current_window = None;
                Ok(())
            }
            None => bail!("no such window"),
        }
    }

    async fn new_window(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let handle = format!("window-{}", state.next_handle);
        state.next_handle += 1;
        state.windows.push(Window {
            handle,
            url: url.to_string(),
            title: String::new(),
        });
        state.current_window = Some(state.windows.len() - 1);
        Ok(())
    }

    async fn switch_to_frame(&self, frame: Arc<dyn Element>) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .frame_stack
            .push(frame.selector().to_string());
        Ok(())
    }

    async fn switch_to_parent_frame(&self) -> Result<()> {
        self.state.lock().unwrap().frame_stack.pop();
        Ok(())
    }

    async fn cookies(&self, name: &str) -> Result<Vec<Cookie>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .cookies
            .iter()
            .filter(|cookie| cookie.name == name)
            .cloned()
            .collect())
    }

    async fn set_cookie(&self, cookie: Cookie) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.cookies.retain(|existing| existing.name != cookie.name);
        state.cookies.push(cookie);
        Ok(())
    }

    async fn delete_cookie(&self, name: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .cookies
            .retain(|cookie| cookie.name != name);
        Ok(())
    }

    async fn delete_all_cookies(&self) -> Result<()> {
        self.state.lock().unwrap().cookies.clear();
        Ok(())
    }

    async fn alert_text(&self) -> Result<String> {
        match self.state.lock().unwrap().alert.clone() {
            Some(text) => Ok(text),
            None => bail!("no such alert"),
        }
    }

    async fn accept_alert(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.alert.take().is_none() {
            bail!("no such alert");
        }
        state.accepted_alerts += 1;
        Ok(())
    }

    async fn dismiss_alert(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.alert.take().is_none() {
            bail!("no such alert");
        }
        state.dismissed_alerts += 1;
        Ok(())
    }

    async fn send_alert_text(&self, text: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.alert.is_none() {
            bail!("no such alert");
        }
        state.alert_inputs.push(text.to_string());
        Ok(())
    }

    async fn press_keys(&self, keys: &str) -> Result<()> {
        self.state.lock().unwrap().keys.push(keys.to_string());
        Ok(())
    }

    async fn pause(&self, ms: u64) -> Result<()> {
        self.state.lock().unwrap().pauses.push(ms);
        Ok(())
    }

    async fn execute_script(
        &self,
        script: &str,
        args: &[serde_json::Value],
    ) -> Result<serde_json::Value> {
        let mut state = self.state.lock().unwrap();
        state.scripts.push((script.to_string(), args.to_vec()));
        if state.script_results.is_empty() {
            Ok(serde_json::Value::Null)
        } else {
            Ok(state.script_results.remove(0))
        }
    }

    async fn wait_until_ready(&self, timeout_ms: u64) -> Result<()> {
        if self.state.lock().unwrap().ready {
            Ok(())
        } else {
            bail!("timed out after {timeout_ms}ms waiting for document ready")
        }
    }
}
