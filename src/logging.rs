use flexi_logger::{LogSpecification, Logger, LoggerHandle};
use log::warn;

pub fn get_log_spec(log_level: &str) -> LogSpecification {
    LogSpecification::parse(log_level).unwrap_or_else(|err| {
        warn!("Failed to parse log level {log_level:?}: {err}, falling back to info");
        LogSpecification::info()
    })
}

/// Start the process-wide logger. Keep the handle alive and use
/// [`LoggerHandle::set_new_spec`] with [`get_log_spec`] when the level changes.
pub fn init(log_level: &str) -> anyhow::Result<LoggerHandle> {
    let handle = Logger::with(get_log_spec(log_level))
        .log_to_stdout()
        .format(flexi_logger::default_format)
        .start()?;

    Ok(handle)
}
