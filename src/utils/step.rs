use std::fmt::Display;
use std::time::Instant;

use log::{error, info};

/// Runs one named step of a pass and logs how it went.
///
/// Logs `"<step>..."` before running `action`, then `"<step>: <summary> (<elapsed>)"`
/// on success or the error on failure. The result is passed through unchanged.
///
/// # Errors
/// * Whatever `action` returns
pub fn do_and_log<T, E, A, S>(step: &str, action: A, summary: S) -> Result<T, E>
where
    E: Display,
    A: FnOnce() -> Result<T, E>,
    S: FnOnce(&T) -> String,
{
    info!("{step}...");
    let started = Instant::now();
    match action() {
        Ok(value) => {
            info!("{step}: {} ({:?})", summary(&value), started.elapsed());
            Ok(value)
        }
        Err(e) => {
            error!("{step} failed: {e}");
            Err(e)
        }
    }
}
