#![forbid(unsafe_code)]

//! Process-wide log subscriber.
//!
//! The filter comes from `DICE_LOG`, then `RUST_LOG`, then `info`. JSON
//! output needs the `tracing-json` feature; without it a JSON request falls
//! back to the compact text format.

use std::env;

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

pub const LOG_ENV: &str = "DICE_LOG";
pub const DEFAULT_DIRECTIVE: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("log subscriber already installed: {0}")]
    Install(String),
}

/// Pick the filter directive. Blank values count as unset.
#[must_use]
pub fn filter_directive(dice_log: Option<String>, rust_log: Option<String>) -> String {
    let non_blank = |value: &String| !value.trim().is_empty();
    dice_log
        .filter(non_blank)
        .or_else(|| rust_log.filter(non_blank))
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_owned())
}

pub fn env_filter() -> Result<EnvFilter, LoggingError> {
    let directive = filter_directive(env::var(LOG_ENV).ok(), env::var("RUST_LOG").ok());
    Ok(EnvFilter::try_new(directive)?)
}

/// Install the global subscriber.
pub fn try_install(format: LogFormat) -> Result<(), LoggingError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter()?)
        .with_target(false);
    let installed = match format {
        LogFormat::Plain => builder.compact().try_init(),
        #[cfg(feature = "tracing-json")]
        LogFormat::Json => builder.json().try_init(),
        #[cfg(not(feature = "tracing-json"))]
        LogFormat::Json => {
            let installed = builder.compact().try_init();
            tracing::warn!("json logging requested without the tracing-json feature");
            installed
        }
    };
    installed.map_err(|err| LoggingError::Install(err.to_string()))
}

/// Like [`try_install`], but a failure is only reported, never returned.
pub fn install_subscriber(format: LogFormat) {
    if let Err(err) = try_install(format) {
        tracing::warn!(error = %err, "keeping existing log subscriber");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[test]
    fn directive_precedence() {
        assert_eq!(filter_directive(None, None), "info");
        assert_eq!(
            filter_directive(Some("debug".into()), Some("warn".into())),
            "debug"
        );
        assert_eq!(filter_directive(Some("  ".into()), Some("warn".into())), "warn");
        assert_eq!(filter_directive(None, Some(String::new())), "info");
    }

    struct LevelCapture {
        levels: Arc<Mutex<Vec<tracing::Level>>>,
    }

    impl<S: Subscriber> Layer<S> for LevelCapture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            self.levels.lock().unwrap().push(*event.metadata().level());
        }
    }

    #[test]
    fn directive_filters_events() {
        let levels = Arc::new(Mutex::new(Vec::new()));
        let filter = EnvFilter::try_new(filter_directive(None, Some("warn".into()))).unwrap();
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(LevelCapture {
                levels: Arc::clone(&levels),
            });

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("dropped");
            tracing::warn!("kept");
        });

        assert_eq!(*levels.lock().unwrap(), vec![tracing::Level::WARN]);
    }

    #[test]
    fn bad_directive_is_rejected() {
        let err = EnvFilter::try_new("dice_runtime=loud").map_err(LoggingError::from);
        assert!(matches!(err, Err(LoggingError::Filter(_))));
    }
}
