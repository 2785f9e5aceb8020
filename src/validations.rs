//! Read-only checks against the browser session.
//!
//! Every check observes one fact, feeds the verdict through
//! [`assert::verify`] and hands the raw observed value back so chained steps
//! can reuse it. Polarity comes in as the raw optional flag a step captures
//! and is normalized through [`Polarity`]: only an explicit negative flips
//! the expectation.

use std::sync::Arc;

use regex::Regex;

use crate::actions::ModalKind;
use crate::assert;
use crate::driver::{Axis, Browser, Element};
use crate::error::{StepError, StepResult};
use crate::logger;
use crate::polarity::Polarity;
use crate::selector::Locator;

/// Which side of the element box a dimension check measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Width.
    Broad,
    /// Height.
    Tall,
}

impl Dimension {
    /// Map the step adjective onto a side. Anything that is not literally
    /// "broad" measures the height.
    pub fn parse(word: &str) -> Self {
        if word.eq_ignore_ascii_case("broad") {
            Dimension::Broad
        } else {
            Dimension::Tall
        }
    }
}

/// The validation engine for one browser session.
pub struct Checks {
    browser: Arc<dyn Browser>,
}

impl Checks {
    pub fn new(browser: Arc<dyn Browser>) -> Self {
        Self { browser }
    }

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

    /// Form controls carry their content in the value attribute; everything
    /// else carries it as text. Prefer the value and fall back to the text
    /// when the attribute is absent or empty.
    async fn element_content(
        &self,
        element: &Arc<dyn Element>,
        context: &str,
    ) -> StepResult<String> {
        let value = element
            .attribute("value")
            .await
            .map_err(|error| self.report(error, context))?;
        match value {
            Some(value) if !value.is_empty() => Ok(value),
            _ => element
                .text()
                .await
                .map_err(|error| self.report(error, context)),
        }
    }

    /// Check whether the element's class attribute contains the given class.
    pub async fn check_class(
        &self,
        selector: impl Into<Locator>,
        expected_class: &str,
        selector_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<String> {
        let locator = selector.into();
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the class attribute of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        let class_attribute = element
            .attribute("class")
            .await
            .map_err(|error| self.report(error, &context))?
            .unwrap_or_default();
        assert::verify(
            class_attribute.contains(expected_class),
            polarity.expected(),
            polarity.message(
                &format!("verifying if {selector_name} contains class attribute"),
                &format!("verifying if {selector_name} not contains class attribute"),
            ),
        )?;
        Ok(class_attribute)
    }

    /// Check whether the element carries any content at all.
    pub async fn check_contains_any_text(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<String> {
        let locator = selector.into();
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the content of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        let content = self.element_content(&element, &context).await?;
        assert::verify(
            !content.is_empty(),
            polarity.expected(),
            polarity.message(
                &format!("verifying if {selector_name} contains any text"),
                &format!("verifying if {selector_name} does not contain any text"),
            ),
        )?;
        Ok(content)
    }

    /// Check whether the element is empty.
    pub async fn check_is_empty(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<String> {
        let locator = selector.into();
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the content of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        let content = self.element_content(&element, &context).await?;
        assert::verify(
            content.is_empty(),
            polarity.expected(),
            polarity.message(
                &format!("verifying if {selector_name} is empty"),
                &format!("verifying if {selector_name} is not empty"),
            ),
        )?;
        Ok(content)
    }

    /// Check whether the element's content contains the given fragment.
    pub async fn check_contains_text(
        &self,
        selector: impl Into<Locator>,
        expected_text: &str,
        polarity: Option<bool>,
        selector_name: &str,
    ) -> StepResult<String> {
        let locator = selector.into();
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the content of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        let content = self.element_content(&element, &context).await?;
        assert::verify(
            content.contains(expected_text),
            polarity.expected(),
            &format!("verifying if the {selector_name} contains the text"),
        )?;
        Ok(content)
    }

    /// Check whether a cookie with the given name exists.
    pub async fn check_cookie_exists(
        &self,
        cookie_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<()> {
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the cookie {cookie_name}");
        let cookies = self
            .browser
            .cookies(cookie_name)
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            !cookies.is_empty(),
            polarity.expected(),
            &format!("verifying if the cookie {cookie_name} exists"),
        )
    }

    /// Check whether the cookie's value contains the given fragment.
    pub async fn check_cookie_contains(
        &self,
        cookie_name: &str,
        expected_value: &str,
        polarity: Option<bool>,
    ) -> StepResult<()> {
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the cookie {cookie_name}");
        let cookies = self
            .browser
            .cookies(cookie_name)
            .await
            .map_err(|error| self.report(error, &context))?;
        let Some(cookie) = cookies.first() else {
            return Err(assert::fail(&format!(
                "The cookie {cookie_name} does not exist"
            )));
        };
        assert::verify(
            cookie.value.contains(expected_value),
            polarity.expected(),
            &format!("verifying if the cookie {cookie_name} contains value {expected_value}"),
        )
    }

    /// Check whether the element has keyboard focus.
    pub async fn check_focus(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<bool> {
        let locator = selector.into();
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the focus state of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        let has_focus = element
            .is_focused()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            has_focus,
            polarity.expected(),
            &format!("verifying if the {selector_name} is focused"),
        )?;
        Ok(has_focus)
    }

    /// Check whether the locator matches at least one element in the DOM.
    pub async fn check_if_element_exists(
        &self,
        selector: &str,
        selector_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<()> {
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to look up {selector_name}");
        let elements = self
            .browser
            .find_all(selector)
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            !elements.is_empty(),
            polarity.expected(),
            &format!("verifying if {selector_name} exists"),
        )
    }

    /// Check that the given URL was opened in a new window, then close it.
    pub async fn check_is_opened_in_new_window(&self, expected_url: &str) -> StepResult<()> {
        let context = format!("Unable to inspect the window opened for {expected_url}");
        let handles = self
            .browser
            .window_handles()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(handles.len() != 1, true, "A popup was not opened")?;
        let Some(last) = handles.last() else {
            return Err(assert::fail("A popup was not opened"));
        };
        self.browser
            .switch_to_window(last)
            .await
            .map_err(|error| self.report(error, &context))?;
        let url = self
            .browser
            .current_url()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            url.contains(expected_url),
            true,
            "The popup has an incorrect url",
        )?;
        self.browser
            .close_window()
            .await
            .map_err(|error| self.report(error, &context))
    }

    /// Check whether a modal is open. An absent modal is not a failure on
    /// its own: the driver error is swallowed and an empty text is returned,
    /// so an affirmative check simply reports the modal as closed.
    pub async fn check_modal(
        &self,
        modal: ModalKind,
        polarity: Option<bool>,
    ) -> StepResult<String> {
        let polarity = Polarity::from(polarity);
        match self.browser.alert_text().await {
            Ok(text) => {
                assert::verify(
                    !text.is_empty(),
                    polarity.expected(),
                    polarity.message(
                        &format!("verify if Modal window {modal} is opened"),
                        &format!("verify if Modal window {modal} is not opened"),
                    ),
                )?;
                Ok(text)
            }
            Err(_) => {
                logger::info("No Modal is displayed");
                Ok(String::new())
            }
        }
    }

    /// Check the text of the open modal.
    pub async fn check_modal_text(
        &self,
        modal: ModalKind,
        expected_text: &str,
        polarity: Option<bool>,
    ) -> StepResult<String> {
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the text of the {modal}");
        let text = self
            .browser
            .alert_text()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            text == expected_text,
            polarity.expected(),
            polarity.message(
                &format!("verifying if the modal text of {modal} is matched"),
                &format!("verifying if the modal text of {modal} is not matched"),
            ),
        )?;
        Ok(text)
    }

    /// Check whether any modal is open at all.
    pub async fn check_modal_open(
        &self,
        modal: ModalKind,
        polarity: Option<bool>,
    ) -> StepResult<bool> {
        let polarity = Polarity::from(polarity);
        let is_open = self.browser.alert_text().await.is_ok();
        assert::verify(
            is_open,
            polarity.expected(),
            polarity.message(
                &format!("verifying if the {modal} is opened"),
                &format!("verifying if the {modal} is not opened"),
            ),
        )?;
        Ok(is_open)
    }

    /// Check whether more than one window is open.
    pub async fn check_new_window(
        &self,
        window_info: &str,
        polarity: Option<bool>,
    ) -> StepResult<bool> {
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the window handles for {window_info}");
        let handles = self
            .browser
            .window_handles()
            .await
            .map_err(|error| self.report(error, &context))?;
        let opened = handles.len() > 1;
        assert::verify(
            opened,
            polarity.expected(),
            polarity.message(
                &format!("verifying if the new window {window_info} is open"),
                &format!("verifying if the new window {window_info} is not open"),
            ),
        )?;
        Ok(opened)
    }

    /// Check the element's position on the given axis, in exact pixels.
    pub async fn check_offset(
        &self,
        selector: impl Into<Locator>,
        expected_position: &str,
        axis: Axis,
        selector_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<i32> {
        let locator = selector.into();
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the position of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        let position = element
            .location(axis)
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            position.to_string() == expected_position,
            polarity.expected(),
            polarity.message(
                &format!("verifying if the {selector_name} position is matched"),
                &format!("verifying if the {selector_name} position is not matched"),
            ),
        )?;
        Ok(position)
    }

    /// Check one side of the element box against an exact pixel size. The
    /// affirmative failure message carries both the expected and the actual
    /// size.
    pub async fn check_dimension(
        &self,
        selector: impl Into<Locator>,
        expected_size: &str,
        dimension: Dimension,
        polarity: Option<bool>,
    ) -> StepResult<i32> {
        let locator = selector.into();
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the size of {}", locator.describe());
        let expected: i32 = expected_size
            .trim()
            .parse()
            .map_err(|_| assert::fail(&format!("{expected_size} is not a pixel size")))?;
        let element = self.resolve(&locator, &context).await?;
        let size = element
            .size()
            .await
            .map_err(|error| self.report(error, &context))?;
        let (actual, label) = match dimension {
            Dimension::Broad => (size.width, "width"),
            Dimension::Tall => (size.height, "height"),
        };
        let described = locator.describe();
        assert::verify(
            actual == expected,
            polarity.expected(),
            polarity.message(
                &format!(
                    "Element \"{described}\" should have a {label} of {expected}px, but is {actual}px"
                ),
                &format!("Element \"{described}\" should not have a {label} of {expected}px"),
            ),
        )?;
        Ok(actual)
    }

    /// Check an attribute or CSS property of the element against an expected
    /// value. CSS lookups compare the plain computed string.
    pub async fn check_property(
        &self,
        is_css: bool,
        selector: impl Into<Locator>,
        property_name: &str,
        expected_value: &str,
        selector_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<()> {
        let locator = selector.into();
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read {property_name} of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        let actual = if is_css {
            Some(
                element
                    .css_property(property_name)
                    .await
                    .map_err(|error| self.report(error, &context))?
                    .value,
            )
        } else {
            element
                .attribute(property_name)
                .await
                .map_err(|error| self.report(error, &context))?
        };
        assert::verify(
            actual.as_deref() == Some(expected_value),
            polarity.expected(),
            polarity.message(
                &format!("verify if the property of selector {selector_name} is {expected_value}"),
                &format!(
                    "verify if the property of selector {selector_name} is not {expected_value}"
                ),
            ),
        )
    }

    /// Check the selected state of a checkbox, radio or option.
    pub async fn check_selected(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<bool> {
        let locator = selector.into();
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the selected state of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        let selected = element
            .is_selected()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            selected,
            polarity.expected(),
            polarity.message(
                &format!("verifying if the {selector_name} is checked"),
                &format!("verifying if the {selector_name} is not checked"),
            ),
        )?;
        Ok(selected)
    }

    /// Check the title of the current page for an exact match.
    pub async fn check_title(
        &self,
        expected_title: &str,
        title_info: &str,
        polarity: Option<bool>,
    ) -> StepResult<String> {
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the title of {title_info}");
        let title = self
            .browser
            .title()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            title == expected_title,
            polarity.expected(),
            polarity.message(
                &format!("verifying if title {title_info} is matched"),
                &format!("verifying if title {title_info} is not matched"),
            ),
        )?;
        Ok(title)
    }

    /// Check the full URL of the current page for an exact match.
    pub async fn check_url(
        &self,
        expected_url: &str,
        url_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<String> {
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the url of {url_name}");
        let url = self
            .browser
            .current_url()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            url == expected_url,
            polarity.expected(),
            polarity.message(
                &format!("verifying if url {url_name} is matched"),
                &format!("verifying if url {url_name} is not matched"),
            ),
        )?;
        Ok(url)
    }

    /// Check the path portion of the current URL, with scheme, host, query
    /// and fragment stripped.
    pub async fn check_url_path(
        &self,
        expected_path: &str,
        path_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<String> {
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the url of {path_name}");
        let url = self
            .browser
            .current_url()
            .await
            .map_err(|error| self.report(error, &context))?;
        let path = url_path(&url);
        assert::verify(
            path == expected_path,
            polarity.expected(),
            polarity.message(
                &format!("verifying if path name {path_name} is matched"),
                &format!("verifying if path name {path_name} is not matched"),
            ),
        )?;
        Ok(path)
    }

    /// Check whether the element is visible inside the current viewport.
    pub async fn check_within_viewport(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<bool> {
        let locator = selector.into();
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the viewport state of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        let in_viewport = element
            .is_displayed_in_viewport()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            in_viewport,
            polarity.expected(),
            polarity.message(
                &format!("verifying if {selector_name} is displayed in view"),
                &format!("verifying if {selector_name} is not displayed in view"),
            ),
        )?;
        Ok(in_viewport)
    }

    /// Compare the text content of two elements.
    pub async fn compare_text(
        &self,
        first: impl Into<Locator>,
        second: impl Into<Locator>,
        polarity: Option<bool>,
    ) -> StepResult<bool> {
        let first = first.into();
        let second = second.into();
        let polarity = Polarity::from(polarity);
        let context = "Unable to read the text of the provided selectors".to_string();
        let first_element = self.resolve(&first, &context).await?;
        let second_element = self.resolve(&second, &context).await?;
        let first_text = self.element_content(&first_element, &context).await?;
        let second_text = self.element_content(&second_element, &context).await?;
        let equal = first_text == second_text;
        assert::verify(
            equal,
            polarity.expected(),
            "verifying if text of the provided selectors is equal",
        )?;
        Ok(equal)
    }

    /// Assert the clickable state of the element.
    pub async fn is_clickable(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<bool> {
        let locator = selector.into();
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the clickable state of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        let clickable = element
            .is_clickable()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            clickable,
            polarity.expected(),
            polarity.message(
                &format!("verifying if {selector_name} is clickable"),
                &format!("verifying if {selector_name} is not clickable"),
            ),
        )?;
        Ok(clickable)
    }

    /// Assert the display state of the element.
    pub async fn is_displayed(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<bool> {
        let locator = selector.into();
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the display state of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        let displayed = element
            .is_displayed()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            displayed,
            polarity.expected(),
            polarity.message(
                &format!("verifying if {selector_name} is displayed"),
                &format!("verifying if {selector_name} is not displayed"),
            ),
        )?;
        Ok(displayed)
    }

    /// Assert the enabled state of the element.
    pub async fn is_enabled(
        &self,
        selector: impl Into<Locator>,
        selector_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<bool> {
        let locator = selector.into();
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to read the enabled state of {selector_name}");
        let element = self.resolve(&locator, &context).await?;
        let enabled = element
            .is_enabled()
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            enabled,
            polarity.expected(),
            polarity.message(
                &format!("verifying if {selector_name} is enabled"),
                &format!("verifying if {selector_name} is not enabled"),
            ),
        )?;
        Ok(enabled)
    }

    /// Assert DOM presence of the locator, by match count.
    pub async fn is_existing(
        &self,
        selector: &str,
        selector_name: &str,
        polarity: Option<bool>,
    ) -> StepResult<()> {
        let polarity = Polarity::from(polarity);
        let context = format!("Unable to look up {selector_name}");
        let elements = self
            .browser
            .find_all(selector)
            .await
            .map_err(|error| self.report(error, &context))?;
        assert::verify(
            !elements.is_empty(),
            polarity.expected(),
            polarity.message(
                &format!("verifying if {selector_name} exists"),
                &format!("verifying {selector_name} does not exist"),
            ),
        )
    }
}

/// Path portion of a URL: scheme, host, query and fragment stripped.
fn url_path(url: &str) -> String {
    let scheme = Regex::new(r"^http(s?)://").unwrap();
    let without_scheme = scheme.replace(url, "");
    let path = match without_scheme.find('/') {
        Some(index) => &without_scheme[index..],
        None => "/",
    };
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.to_string()
}
