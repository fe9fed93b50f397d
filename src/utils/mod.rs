/// Logger
pub mod logger;
/// Logged pass steps
pub mod step;
