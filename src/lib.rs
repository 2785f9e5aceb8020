pub mod actions;
pub mod assert;
pub mod driver;
pub mod error;
pub mod logger;
pub mod polarity;
pub mod selector;
pub mod validations;
pub mod wait;

// Re-export common items
pub use actions::{
    Actions, ClickAction, EventFilter, InputMethod, ModalAction, ModalKind, SelectionType,
};
pub use error::{StepError, StepResult};
pub use polarity::Polarity;
pub use selector::Locator;
pub use validations::{Checks, Dimension};
pub use wait::{TargetState, WaitSpec, Waiter};
