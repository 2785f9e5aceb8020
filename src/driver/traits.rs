use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::wait::TargetState;

/// Axis for element location queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Rendered size of an element, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// A browser cookie as the session reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A computed CSS property. Drivers report these in a structured shape: the
/// raw string plus, for properties like `color` and `font-weight`, a parsed
/// representation. Comparisons use the raw `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssProperty {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<serde_json::Value>,
}

impl CssProperty {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            parsed: None,
        }
    }
}

/// A resolved UI element inside a browser session.
///
/// Handles are owned by the session and never cached across steps; every
/// operation re-resolves its selector so a stale handle cannot leak from one
/// step into the next.
#[async_trait]
pub trait Element: Send + Sync {
    /// The locator this handle was resolved from, for reporting.
    fn selector(&self) -> &str;

    async fn click(&self) -> Result<()>;
    async fn double_click(&self) -> Result<()>;

    async fn clear_value(&self) -> Result<()>;
    /// Replace the current value of a form element.
    async fn set_value(&self, text: &str) -> Result<()>;
    /// Append to the current value of a form element.
    async fn add_value(&self, text: &str) -> Result<()>;

    async fn text(&self) -> Result<String>;
    async fn value(&self) -> Result<Option<String>>;
    async fn attribute(&self, name: &str) -> Result<Option<String>>;
    async fn property(&self, name: &str) -> Result<Option<String>>;
    async fn css_property(&self, name: &str) -> Result<CssProperty>;

    async fn is_displayed(&self) -> Result<bool>;
    async fn is_displayed_in_viewport(&self) -> Result<bool>;
    async fn is_enabled(&self) -> Result<bool>;
    async fn is_selected(&self) -> Result<bool>;
    async fn is_clickable(&self) -> Result<bool>;
    async fn is_focused(&self) -> Result<bool>;
    async fn is_existing(&self) -> Result<bool>;

    async fn size(&self) -> Result<Size>;
    async fn location(&self, axis: Axis) -> Result<i32>;

    async fn drag_and_drop(&self, target: Arc<dyn Element>) -> Result<()>;
    async fn move_to(&self, x: Option<i32>, y: Option<i32>) -> Result<()>;
    async fn scroll_into_view(&self) -> Result<()>;

    async fn select_by_attribute(&self, attribute: &str, value: &str) -> Result<()>;
    async fn select_by_visible_text(&self, text: &str) -> Result<()>;
    async fn select_by_index(&self, index: usize) -> Result<()>;

    /// Block until the element reaches (or, with `reverse`, leaves) the given
    /// state. The driver owns the poll loop; this layer only supplies the
    /// timeout and polarity. Errors when the deadline passes unmet.
    async fn wait_until(&self, state: TargetState, timeout_ms: u64, reverse: bool) -> Result<()>;
}

/// One browser session. The unit of isolation: a scenario holds exactly one
/// and runs its steps sequentially against it.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Resolve a locator to its first matching element.
    async fn find_element(&self, locator: &str) -> Result<Arc<dyn Element>>;
    /// Resolve a locator to every matching element.
    async fn find_all(&self, locator: &str) -> Result<Vec<Arc<dyn Element>>>;

    async fn goto(&self, url: &str) -> Result<()>;
    async fn current_url(&self) -> Result<String>;
    async fn title(&self) -> Result<String>;
    async fn refresh(&self) -> Result<()>;

    async fn maximize_window(&self) -> Result<()>;
    async fn set_window_size(&self, width: u32, height: u32) -> Result<()>;
    async fn window_size(&self) -> Result<(u32, u32)>;

    async fn window_handles(&self) -> Result<Vec<String>>;
    async fn current_window_handle(&self) -> Result<String>;
    async fn switch_to_window(&self, handle: &str) -> Result<()>;
    /// Switch to the window whose URL or title matches the given pattern.
    async fn switch_window(&self, pattern: &str) -> Result<()>;
    async fn close_window(&self) -> Result<()>;
    async fn new_window(&self, url: &str) -> Result<()>;

    async fn switch_to_frame(&self, frame: Arc<dyn Element>) -> Result<()>;
    async fn switch_to_parent_frame(&self) -> Result<()>;

    /// Cookies matching the given name.
    async fn cookies(&self, name: &str) -> Result<Vec<Cookie>>;
    async fn set_cookie(&self, cookie: Cookie) -> Result<()>;
    async fn delete_cookie(&self, name: &str) -> Result<()>;
    async fn delete_all_cookies(&self) -> Result<()>;

    /// Text of the currently open modal. Errors when no modal is open.
    async fn alert_text(&self) -> Result<String>;
    async fn accept_alert(&self) -> Result<()>;
    async fn dismiss_alert(&self) -> Result<()>;
    async fn send_alert_text(&self, text: &str) -> Result<()>;

    async fn press_keys(&self, keys: &str) -> Result<()>;
    async fn pause(&self, ms: u64) -> Result<()>;
    async fn execute_script(
        &self,
        script: &str,
        args: &[serde_json::Value],
    ) -> Result<serde_json::Value>;

    /// Block until the document reports a complete ready state. The driver
    /// owns the poll loop. Errors when the deadline passes unmet.
    async fn wait_until_ready(&self, timeout_ms: u64) -> Result<()>;
}
