//! Logging setup and error-reporting helpers shared by the binaries.
use std::iter::successors;

use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt};

/// Collect the `Display` representations of an error's sources, outermost
/// first.
pub fn iter_sources<T: std::error::Error>(
    error: &T,
) -> impl std::iter::Iterator<Item = String> + use<'_, T> {
    successors(error.source(), |&error| error.source()).map(ToString::to_string)
}

pub const ERROR: tracing::Level = tracing::Level::ERROR;
pub const WARN: tracing::Level = tracing::Level::WARN;

/// Separator between error sources in the `source` field.
pub const SEP: &str = " | ";

/// Emit an event for an error with `error`, `source` and `debug` fields.
///
/// ```no_run
/// use diary_bootstrap::utils::o11y::{log_error, WARN};
/// use std::io::{Error, ErrorKind};
///
/// let error = Error::new(ErrorKind::Other, "borked");
/// log_error!(error);
/// log_error!(error, "bootstrap failed");
/// log_error!(WARN, error, "skipping {}", "users");
/// ```
#[macro_export]
macro_rules! log_error {
    // NOTE: keep the error-first arms before the level-first ones
    ($error:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        tracing::event!(
            $crate::utils::o11y::ERROR,
            error = %$error,
            source = %$crate::utils::o11y::iter_sources(&$error).collect::<Vec<_>>().join($crate::utils::o11y::SEP),
            debug = ?$error,
            $fmt $(, $arg)*
        )
    };
    ($lvl:expr, $error:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        tracing::event!(
            $lvl,
            error = %$error,
            source = %$crate::utils::o11y::iter_sources(&$error).collect::<Vec<_>>().join($crate::utils::o11y::SEP),
            debug = ?$error,
            $fmt $(, $arg)*
        )
    };
    ($error:expr) => {
        tracing::event!(
            $crate::utils::o11y::ERROR,
            error = %$error,
            source = %$crate::utils::o11y::iter_sources(&$error).collect::<Vec<_>>().join($crate::utils::o11y::SEP),
            debug = ?$error
        )
    };
}

pub use log_error;

/// Closure form of `log_error!` for `inspect_err` and friends.
///
/// ```no_run
/// use diary_bootstrap::utils::o11y::{as_error, WARN};
/// use std::io::{Error, ErrorKind};
///
/// let result: Result<(), Error> = Err(Error::new(ErrorKind::Other, "borked"));
/// let _ = result.inspect_err(as_error!(WARN, "wipe failed"));
/// ```
#[macro_export]
macro_rules! as_error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        |error| $crate::log_error!(error, $fmt $(, $arg)*)
    };
    ($lvl:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        |error| $crate::log_error!($lvl, error, $fmt $(, $arg)*)
    };
    () => {
        |error| $crate::log_error!(error)
    };
}

pub use as_error;

#[derive(Debug, thiserror::Error)]
pub enum BuildSubscriberError {
    #[error("failed to parse filtering directive")]
    Parse(#[from] tracing_subscriber::filter::ParseError),
    #[error("failed to install the global subscriber")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Parse `RUST_LOG_SPAN_EVENTS` (comma separated: new, enter, exit, close,
/// none, active, full). Unknown parts are ignored.
pub fn parse_span_events(value: &str) -> Option<FmtSpan> {
    value
        .split(',')
        .filter_map(|part| match part.trim().to_lowercase().as_str() {
            "new" => Some(FmtSpan::NEW),
            "enter" => Some(FmtSpan::ENTER),
            "exit" => Some(FmtSpan::EXIT),
            "close" => Some(FmtSpan::CLOSE),
            "none" => Some(FmtSpan::NONE),
            "active" => Some(FmtSpan::ACTIVE),
            "full" => Some(FmtSpan::FULL),
            _ => None,
        })
        .reduce(|lhs, rhs| lhs | rhs)
}

pub fn build_subscriber() -> Result<impl Subscriber, BuildSubscriberError> {
    let mut fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

    if let Some(kind) = std::env::var("RUST_LOG_SPAN_EVENTS")
        .ok()
        .as_deref()
        .and_then(parse_span_events)
    {
        fmt_layer = fmt_layer.with_span_events(kind);
    }

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    Ok(tracing_subscriber::registry().with(fmt_layer.with_filter(env_filter)))
}

/// Build the subscriber and install it as the global default.
pub fn init_tracing() -> Result<(), BuildSubscriberError> {
    let subscriber = build_subscriber()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_span_events() {
        assert_eq!(parse_span_events("close"), Some(FmtSpan::CLOSE));
        assert_eq!(
            parse_span_events("new, Close"),
            Some(FmtSpan::NEW | FmtSpan::CLOSE)
        );
        assert_eq!(parse_span_events("bogus,full"), Some(FmtSpan::FULL));
        assert_eq!(parse_span_events("bogus"), None);
    }

    #[test]
    fn test_iter_sources() {
        let error = crate::conf::BuildDbError::InvalidValue(
            "port",
            config::ConfigError::Message("not a number".to_string()),
        );
        let sources: Vec<String> = iter_sources(&error).collect();
        assert_eq!(sources, vec!["not a number".to_string()]);
    }
}
