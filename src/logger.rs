//! Leveled, colored console output for step reporting.
//!
//! This is a pure sink: nothing here fails a scenario. Raising a failure is
//! the job of [`crate::assert`], which callers invoke explicitly after
//! logging.

use colored::Colorize;

/// Initialize the global logger. Safe to call more than once; later calls are
/// no-ops. Tests call this from their setup so output shows up under
/// `RUST_LOG`.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(cfg!(test))
        .try_init();
}

/// Plain progress output, cyan.
pub fn log(message: &str) {
    log::info!("{}", message.cyan());
}

/// Step narration ("Clicking on the ..."), green.
pub fn info(message: &str) {
    log::info!("{}", message.green());
}

pub fn debug(message: &str) {
    log::debug!("{}", message.magenta());
}

/// Recoverable trouble: raw driver errors, soft wait timeouts.
pub fn warn(message: &str) {
    log::warn!("{}", message.yellow());
}

/// Hard failure narration. Callers pair this with [`crate::assert::fail`] or
/// an `Err` return; the log line itself has no control-flow effect.
pub fn error(message: &str) {
    log::error!("{}", message.red());
}
