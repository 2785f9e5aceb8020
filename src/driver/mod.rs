//! Capability interface to the external browser automation driver.
//!
//! This crate never talks a wire protocol itself: everything goes through the
//! [`Browser`] and [`Element`] traits, and a concrete driver binding (a
//! WebDriver client, a CDP client, an Appium session) implements them.

pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use traits::{Axis, Browser, Cookie, CssProperty, Element, Size};
