//! crates/logging/src/tracing_bridge.rs
//! Bridge feeding `tracing` events into a [`Logger`].
//!
//! [`PipelineLayer`] is a `tracing-subscriber` layer. Each event becomes one
//! record: the event target is used as the module name (so module overrides
//! apply to it), the `tracing` level is mapped onto [`Level`], the `message`
//! field becomes the message text and any other fields are appended as
//! `name=value` pairs.
//!
//! Events under the pipeline's own [`INTERNAL_TARGET`] are skipped so that
//! internal diagnostics can never loop back into the pipeline.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{LogConfig, tracing_bridge};
//!
//! logging::init(LogConfig::default()).unwrap();
//! tracing_bridge::init_tracing().unwrap();
//!
//! tracing::warn!(target: "disk", "usage at {}%", 87);
//! ```

use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;

use crate::INTERNAL_TARGET;
use crate::global::global;
use crate::level::Level;
use crate::logger::Logger;
use crate::record::Location;

#[derive(Clone, Debug)]
enum Destination {
    Global,
    Shared(Arc<Logger>),
}

/// A tracing layer that forwards events into a [`Logger`].
#[derive(Clone, Debug)]
pub struct PipelineLayer {
    destination: Destination,
}

impl PipelineLayer {
    /// Forwards to the default logger returned by [`global`].
    #[must_use]
    pub const fn global() -> Self {
        Self {
            destination: Destination::Global,
        }
    }

    /// Forwards to an explicit logger instance.
    #[must_use]
    pub const fn new(logger: Arc<Logger>) -> Self {
        Self {
            destination: Destination::Shared(logger),
        }
    }

    fn logger(&self) -> &Logger {
        match &self.destination {
            Destination::Global => global(),
            Destination::Shared(logger) => logger,
        }
    }

    /// Map a tracing level onto a pipeline level.
    const fn map_level(level: &tracing::Level) -> Level {
        match *level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }

    fn is_internal(target: &str) -> bool {
        target
            .strip_prefix(INTERNAL_TARGET)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    }
}

impl<S> Layer<S> for PipelineLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if Self::is_internal(target) {
            return;
        }

        let level = Self::map_level(metadata.level());
        let logger = self.logger();
        if !logger.is_enabled(level, Some(target)) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let location = Location::new(
            metadata.file().unwrap_or_default(),
            metadata.line().unwrap_or_default(),
            metadata.module_path().unwrap_or_default(),
        );
        let _ = logger.write(
            level,
            Some(target),
            location,
            format_args!("{}", visitor.finish()),
        );
    }
}

/// Visitor collecting the message and remaining fields of an event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", field.name(), value);
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field, format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            self.push_field(field, format_args!("{value}"));
        }
    }
}

/// Installs a global `tracing` subscriber whose only layer forwards to the
/// default logger.
pub fn init_tracing() -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(PipelineLayer::global())
        .try_init()
}

/// Like [`init_tracing`] with an additional filter layer in front.
///
/// ```rust,ignore
/// use tracing_subscriber::EnvFilter;
///
/// logging::tracing_bridge::init_tracing_with_filter(EnvFilter::from_default_env()).unwrap();
/// ```
pub fn init_tracing_with_filter<F>(filter: F) -> Result<(), TryInitError>
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(PipelineLayer::global())
        .try_init()
}
