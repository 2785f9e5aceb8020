//! Timeout-bounded waits against element and session state.
//!
//! The polling loop itself lives in the driver; this layer normalizes the
//! raw phrase fragments a step hands over (an optional millisecond string, an
//! optional "be displayed"-style state phrase, an optional reverse flag) into
//! a [`WaitSpec`] and reports the outcome. A missed wait is a soft signal:
//! it logs a warning and returns `false`, and steps that need a hard failure
//! assert on the result explicitly.

use std::fmt;
use std::sync::Arc;

use crate::assert;
use crate::driver::Browser;
use crate::error::StepResult;
use crate::logger;
use crate::selector::Locator;

/// Default timeout for the targeted waits (exist/displayed/enabled/clickable).
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 120_000;

/// Default timeout for the composite `wait_for` step.
pub const COMPOSITE_WAIT_TIMEOUT_MS: u64 = 15_000;

/// Implicit wait applied before state-mutating interactions.
pub const INTERACTION_WAIT_MS: u64 = 10_000;

/// Upper bound for the page ready-state wait.
pub const PAGE_LOAD_TIMEOUT_MS: u64 = 240_000;

/// The element condition a wait targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetState {
    /// Present in the DOM.
    #[default]
    Exist,
    Displayed,
    Enabled,
    Clickable,
    /// Not animating and interactable.
    Stable,
}

impl TargetState {
    /// Derive the target state from a step phrase. Multi-word phrases like
    /// "be enabled" select on their final word only; anything missing or
    /// unrecognized falls back to [`TargetState::Exist`].
    pub fn parse(phrase: Option<&str>) -> Self {
        let Some(phrase) = phrase else {
            return TargetState::Exist;
        };
        match phrase.split_whitespace().last().unwrap_or("") {
            "displayed" | "visible" => TargetState::Displayed,
            "enabled" => TargetState::Enabled,
            "clickable" => TargetState::Clickable,
            "stable" => TargetState::Stable,
            _ => TargetState::Exist,
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            TargetState::Exist => "existing",
            TargetState::Displayed => "displayed",
            TargetState::Enabled => "enabled",
            TargetState::Clickable => "clickable",
            TargetState::Stable => "stable",
        };
        f.write_str(word)
    }
}

/// Fully normalized wait parameters, built per call and consumed immediately.
#[derive(Debug, Clone, Copy)]
pub struct WaitSpec {
    pub timeout_ms: u64,
    pub target: TargetState,
    pub reverse: bool,
}

impl WaitSpec {
    /// Build a spec from raw step fragments. The timeout string is parsed
    /// leniently, falling back to the given default; the reverse flag is
    /// coerced canonically so that only an explicit `true` reverses the wait.
    pub fn from_fragments(
        ms: Option<&str>,
        reverse: Option<bool>,
        state: Option<&str>,
        default_timeout_ms: u64,
    ) -> Self {
        Self {
            reverse: matches!(reverse, Some(true)),
            ..Self::for_target(TargetState::parse(state), ms, default_timeout_ms)
        }
    }

    /// Build a spec for a known target state, with the same lenient timeout
    /// parse as [`WaitSpec::from_fragments`].
    pub fn for_target(target: TargetState, ms: Option<&str>, default_timeout_ms: u64) -> Self {
        let timeout_ms = ms
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(default_timeout_ms);
        Self {
            timeout_ms,
            target,
            reverse: false,
        }
    }
}

/// The wait engine for one browser session.
pub struct Waiter {
    browser: Arc<dyn Browser>,
}

impl Waiter {
    pub fn new(browser: Arc<dyn Browser>) -> Self {
        Self { browser }
    }

    /// The composite wait behind "I wait on ... to (not) be ...". Returns
    /// `true` when the condition was met in time and `false` otherwise,
    /// never raising: callers that need a hard failure assert afterwards.
    pub async fn wait_for(
        &self,
        selector: impl Into<Locator>,
        ms: Option<&str>,
        reverse: Option<bool>,
        state: Option<&str>,
        selector_name: &str,
    ) -> bool {
        let locator = selector.into();
        let spec = WaitSpec::from_fragments(ms, reverse, state, COMPOSITE_WAIT_TIMEOUT_MS);
        logger::info(&format!(
            "Waiting up to {} ms for {} to be {}",
            spec.timeout_ms, selector_name, spec.target
        ));
        self.run(&locator, spec, selector_name).await
    }

    /// Wait for DOM presence, defaulting to the long targeted timeout.
    pub async fn wait_for_exist(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
        ms: Option<&str>,
    ) -> bool {
        self.targeted(selector.into(), TargetState::Exist, ms, selector_name)
            .await
    }

    pub async fn wait_for_displayed(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
        ms: Option<&str>,
    ) -> bool {
        self.targeted(selector.into(), TargetState::Displayed, ms, selector_name)
            .await
    }

    pub async fn wait_for_enabled(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
        ms: Option<&str>,
    ) -> bool {
        self.targeted(selector.into(), TargetState::Enabled, ms, selector_name)
            .await
    }

    pub async fn wait_for_clickable(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
        ms: Option<&str>,
    ) -> bool {
        self.targeted(selector.into(), TargetState::Clickable, ms, selector_name)
            .await
    }

    /// The one wait that escalates: a missed display deadline is a hard
    /// failure rather than a soft signal.
    pub async fn wait_until_displayed(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
        ms: Option<&str>,
    ) -> StepResult<()> {
        let locator = selector.into();
        let spec = WaitSpec::from_fragments(ms, None, Some("displayed"), DEFAULT_WAIT_TIMEOUT_MS);
        logger::info(&format!(
            "Waiting on {selector_name} until it's displayed"
        ));
        if self.run(&locator, spec, selector_name).await {
            Ok(())
        } else {
            Err(assert::fail(&format!("{selector_name} is not displayed")))
        }
    }

    /// Wait until the document reports a complete ready state.
    pub async fn wait_until_page_load(&self, page: &str) -> StepResult<()> {
        logger::info(&format!("Waiting for {page} to load"));
        match self.browser.wait_until_ready(PAGE_LOAD_TIMEOUT_MS).await {
            Ok(()) => Ok(()),
            Err(error) => {
                logger::warn(&error.to_string());
                Err(assert::fail(&format!(
                    "{page} did not finish loading, check your connection"
                )))
            }
        }
    }

    async fn targeted(
        &self,
        locator: Locator,
        target: TargetState,
        ms: Option<&str>,
        selector_name: &str,
    ) -> bool {
        let spec = WaitSpec::for_target(target, ms, DEFAULT_WAIT_TIMEOUT_MS);
        logger::info(&format!(
            "Waiting on {selector_name} till it's {target}"
        ));
        self.run(&locator, spec, selector_name).await
    }

    async fn run(&self, locator: &Locator, spec: WaitSpec, selector_name: &str) -> bool {
        let element = match locator.resolve(self.browser.as_ref()).await {
            Ok(element) => element,
            Err(error) => {
                logger::warn(&error.to_string());
                logger::warn(&format!("{selector_name} is not {}", spec.target));
                return false;
            }
        };
        match element
            .wait_until(spec.target, spec.timeout_ms, spec.reverse)
            .await
        {
            Ok(()) => true,
            Err(error) => {
                logger::warn(&error.to_string());
                logger::warn(&format!("{selector_name} is not {}", spec.target));
                false
            }
        }
    }
}
