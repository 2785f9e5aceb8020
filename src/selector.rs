//! Selector normalization.
//!
//! Step arguments arrive either as a raw locator string (CSS, XPath, platform
//! query) or as an element handle that an earlier collaborator already
//! resolved. Every operation funnels that union through [`Locator::resolve`]
//! so the rest of the pipeline only ever sees one handle.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::driver::{Browser, Element};

/// A step's element argument: a locator string, or an already-resolved handle.
#[derive(Clone)]
pub enum Locator {
    Raw(String),
    Resolved(Arc<dyn Element>),
}

impl Locator {
    /// Resolve to a single element handle, first match wins.
    ///
    /// Resolution is idempotent for an already-resolved handle and is never
    /// cached for a raw locator: callers re-resolve on every step so DOM
    /// changes between steps cannot leave them holding a stale handle.
    /// Driver lookup errors propagate; the caller decides whether that is a
    /// soft wait miss or a hard failure.
    pub async fn resolve(&self, browser: &dyn Browser) -> Result<Arc<dyn Element>> {
        match self {
            Locator::Raw(locator) => browser.find_element(locator).await,
            Locator::Resolved(element) => Ok(Arc::clone(element)),
        }
    }

    /// The locator string, for log messages.
    pub fn describe(&self) -> &str {
        match self {
            Locator::Raw(locator) => locator,
            Locator::Resolved(element) => element.selector(),
        }
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Raw(locator) => f.debug_tuple("Raw").field(locator).finish(),
            Locator::Resolved(element) => {
                f.debug_tuple("Resolved").field(&element.selector()).finish()
            }
        }
    }
}

impl From<&str> for Locator {
    fn from(locator: &str) -> Self {
        Locator::Raw(locator.to_string())
    }
}

impl From<String> for Locator {
    fn from(locator: String) -> Self {
        Locator::Raw(locator)
    }
}

impl From<Arc<dyn Element>> for Locator {
    fn from(element: Arc<dyn Element>) -> Self {
        Locator::Resolved(element)
    }
}
