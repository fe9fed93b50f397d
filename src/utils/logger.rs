use chrono::Local;
use eyre::Result;
use fern::Dispatch;
use log::LevelFilter;

/// Sets up the application logger on stderr, keeping stdout for results.
///
/// # Arguments
/// * `fallback` - Level used when `RUST_LOG` is unset or unparsable
///
/// # Errors
/// * If a logger has already been installed
pub fn setup_logger(fallback: LevelFilter) -> Result<()> {
    Dispatch::new()
        .level(
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|level| level.parse().ok())
                .unwrap_or(fallback),
        )
        .chain(std::io::stderr())
        // Format log messages with time and log level
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ));
        })
        .apply()?;
    Ok(())
}
