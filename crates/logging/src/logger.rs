//! crates/logging/src/logger.rs
//! The pipeline facade: lifecycle, filtering, rendering and delivery.
//!
//! A [`Logger`] is either uninitialized or holds one session. The session owns
//! the settings, the level registry, the backend dispatcher and, in async
//! mode, the queue. [`Logger::deinit`] tears the session down completely, so
//! a later [`Logger::init`] starts from the configuration it is given and
//! nothing else.

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::backend::Backend;
use crate::config::LogConfig;
use crate::dispatch::Dispatcher;
use crate::error::{LogError, LogResult};
use crate::filter::{LevelRegistry, ModuleFilterEntry};
use crate::format::{self, Pattern};
use crate::level::Level;
use crate::printf::{self, Arg};
use crate::queue::{AsyncQueue, OverflowPolicy, PushOutcome, QueueStats};
use crate::record::{Location, Record};
use crate::registry::BackendInfo;

/// Rendering settings read on every emitted record.
#[derive(Debug)]
struct Settings {
    pattern: Pattern,
    max_msg_len: usize,
    color_enabled: bool,
    async_policy: OverflowPolicy,
}

/// Everything that exists only while the logger is initialized.
#[derive(Debug)]
struct Session {
    settings: RwLock<Settings>,
    levels: RwLock<LevelRegistry>,
    dispatcher: Arc<Dispatcher>,
    queue: Option<AsyncQueue>,
}

impl Session {
    fn open(config: &LogConfig) -> LogResult<Self> {
        config.validate()?;
        let pattern = Pattern::parse(&config.format)?;
        let levels = config.level_registry()?;
        let dispatcher = Arc::new(Dispatcher::new());

        let queue = if config.async_mode {
            Some(AsyncQueue::start(
                config.async_queue_size,
                config.async_policy,
                Arc::clone(&dispatcher),
            )?)
        } else {
            None
        };

        Ok(Self {
            settings: RwLock::new(Settings {
                pattern,
                max_msg_len: config.max_msg_len,
                color_enabled: config.color_enabled,
                async_policy: config.async_policy,
            }),
            levels: RwLock::new(levels),
            dispatcher,
            queue,
        })
    }

    fn settings(&self) -> RwLockReadGuard<'_, Settings> {
        read(&self.settings)
    }

    fn settings_mut(&self) -> RwLockWriteGuard<'_, Settings> {
        write(&self.settings)
    }

    fn passes(&self, level: Level, module: Option<&str>) -> bool {
        level.passes(read(&self.levels).effective_level(module))
    }

    fn emit(&self, record: &Record<'_>) {
        let text = {
            let settings = self.settings();
            format::render(
                &settings.pattern,
                record,
                settings.max_msg_len,
                settings.color_enabled,
            )
        };

        match &self.queue {
            Some(queue) => {
                if queue.push(record.level, text) == PushOutcome::Dropped {
                    internal_debug!("async queue dropped a {} record", record.level);
                }
            }
            None => {
                self.dispatcher.fanout(record.level, &text);
            }
        }
    }

    fn close(&self) {
        if let Some(queue) = &self.queue {
            queue.shutdown();
        }
        if let Err(error) = self.dispatcher.shutdown() {
            internal_warn!("backend teardown reported: {}", error);
        }
    }
}

/// A logging pipeline instance.
///
/// Every method other than [`init`](Self::init) returns
/// [`LogError::NotInit`] while the logger is uninitialized. The logger is
/// `Sync`; producers on any thread may share one instance.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use logging::{Backend, BackendError, Level, LogConfig, Logger, location};
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct Lines(Mutex<Vec<String>>);
///
/// impl Backend for Lines {
///     fn name(&self) -> &str { "lines" }
///     fn write(&self, bytes: &[u8]) -> Result<(), BackendError> {
///         self.0.lock().unwrap().push(String::from_utf8_lossy(bytes).into_owned());
///         Ok(())
///     }
/// }
///
/// let logger = Logger::new();
/// logger.init(LogConfig::default().with_format("[%L] %m")).unwrap();
/// let lines = Arc::new(Lines::default());
/// logger.backend_register(lines.clone()).unwrap();
///
/// logger
///     .write(Level::Warn, None, location!(), format_args!("disk at {}%", 87))
///     .unwrap();
/// logger.deinit().unwrap();
///
/// assert_eq!(*lines.0.lock().unwrap(), ["[WARN] disk at 87%"]);
/// ```
#[derive(Debug, Default)]
pub struct Logger {
    session: RwLock<Option<Arc<Session>>>,
}

impl Logger {
    /// Creates an uninitialized logger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session: RwLock::new(None),
        }
    }

    /// Initializes the logger from `config`.
    pub fn init(&self, config: LogConfig) -> LogResult<()> {
        let mut slot = write(&self.session);
        if slot.is_some() {
            return Err(LogError::AlreadyInit);
        }
        *slot = Some(Arc::new(Session::open(&config)?));
        internal_debug!(
            "logger initialized: level {}, async {}",
            config.level,
            config.async_mode
        );
        Ok(())
    }

    /// Tears the logger down.
    ///
    /// Drains and stops the async queue, flushes and de-initializes every
    /// backend (unregistering all of them) and discards settings and module
    /// overrides. Backend teardown failures do not fail the call.
    pub fn deinit(&self) -> LogResult<()> {
        let session = write(&self.session).take().ok_or(LogError::NotInit)?;
        session.close();
        internal_debug!("logger deinitialized");
        Ok(())
    }

    /// Reports whether [`init`](Self::init) has succeeded and no
    /// [`deinit`](Self::deinit) followed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        read(&self.session).is_some()
    }

    /// Reports whether a record at `level` for `module` would be emitted.
    ///
    /// Always `false` while uninitialized.
    #[must_use]
    pub fn is_enabled(&self, level: Level, module: Option<&str>) -> bool {
        self.session()
            .is_ok_and(|session| session.passes(level, module))
    }

    /// Emits one record whose message is built from `args`.
    ///
    /// Records below the effective level return `Ok` without formatting.
    /// Messages the async queue drops are not errors.
    pub fn write(
        &self,
        level: Level,
        module: Option<&str>,
        location: Location,
        args: fmt::Arguments<'_>,
    ) -> LogResult<()> {
        self.write_with(level, module, location, || match args.as_str() {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Owned(fmt::format(args)),
        })
    }

    /// Emits one record whose message is built from a C-style format string.
    pub fn write_printf(
        &self,
        level: Level,
        module: Option<&str>,
        location: Location,
        format: &str,
        args: &[Arg<'_>],
    ) -> LogResult<()> {
        self.write_with(level, module, location, || {
            Cow::Owned(printf::sprintf(format, args))
        })
    }

    /// Sends `bytes` to every enabled backend, bypassing filtering and
    /// formatting.
    pub fn write_raw(&self, bytes: &[u8]) -> LogResult<()> {
        if bytes.is_empty() {
            return Err(LogError::InvalidParam("raw write must not be empty"));
        }
        let session = self.session()?;
        match &session.queue {
            Some(queue) => {
                queue.push_raw(bytes.to_vec());
            }
            None => {
                session.dispatcher.fanout_raw(bytes);
            }
        }
        Ok(())
    }

    fn write_with<'m, F>(
        &self,
        level: Level,
        module: Option<&str>,
        location: Location,
        message: F,
    ) -> LogResult<()>
    where
        F: FnOnce() -> Cow<'m, str>,
    {
        if !level.is_emittable() {
            return Err(LogError::InvalidParam("records cannot be written at level None"));
        }
        let session = self.session()?;
        if !session.passes(level, module) {
            return Ok(());
        }

        let message = message();
        session.emit(&Record::new(level, module, location, &message));
        Ok(())
    }

    /// Waits for the async queue to drain, then flushes every backend.
    pub fn flush(&self) -> LogResult<()> {
        let session = self.session()?;
        if let Some(queue) = &session.queue {
            queue.flush();
        }
        session.dispatcher.flush_all()
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    /// Sets the global threshold.
    pub fn set_level(&self, level: Level) -> LogResult<()> {
        write(&self.session()?.levels).set_level(level);
        Ok(())
    }

    /// Returns the global threshold.
    pub fn level(&self) -> LogResult<Level> {
        Ok(read(&self.session()?.levels).level())
    }

    /// Replaces the output pattern.
    pub fn set_format(&self, format: &str) -> LogResult<()> {
        let session = self.session()?;
        let pattern = Pattern::parse(format)?;
        session.settings_mut().pattern = pattern;
        Ok(())
    }

    /// Returns the output pattern text.
    pub fn format(&self) -> LogResult<String> {
        Ok(self.session()?.settings().pattern.as_str().to_owned())
    }

    /// Sets the message length limit; zero is rejected.
    pub fn set_max_msg_len(&self, max_msg_len: usize) -> LogResult<()> {
        let session = self.session()?;
        if max_msg_len == 0 {
            return Err(LogError::InvalidParam("max_msg_len must be non-zero"));
        }
        session.settings_mut().max_msg_len = max_msg_len;
        Ok(())
    }

    /// Returns the message length limit.
    pub fn max_msg_len(&self) -> LogResult<usize> {
        Ok(self.session()?.settings().max_msg_len)
    }

    /// Enables or disables color sequences.
    pub fn set_color_enabled(&self, enabled: bool) -> LogResult<()> {
        self.session()?.settings_mut().color_enabled = enabled;
        Ok(())
    }

    /// Reports whether color sequences are emitted.
    pub fn color_enabled(&self) -> LogResult<bool> {
        Ok(self.session()?.settings().color_enabled)
    }

    // ---------------------------------------------------------------------
    // Module overrides
    // ---------------------------------------------------------------------

    /// Installs or updates a per-module override.
    pub fn module_set_level(&self, pattern: &str, level: Level) -> LogResult<()> {
        write(&self.session()?.levels).set_module_level(pattern, level)
    }

    /// Returns the threshold that applies to `module`.
    pub fn module_level(&self, module: &str) -> LogResult<Level> {
        Ok(read(&self.session()?.levels).effective_level(Some(module)))
    }

    /// Removes a per-module override.
    pub fn module_clear_level(&self, pattern: &str) -> LogResult<()> {
        write(&self.session()?.levels).clear_module_level(pattern)
    }

    /// Removes every per-module override.
    pub fn module_clear_all(&self) -> LogResult<()> {
        write(&self.session()?.levels).clear_all_module_levels();
        Ok(())
    }

    /// Snapshot of installed overrides.
    pub fn module_filters(&self) -> LogResult<Vec<ModuleFilterEntry>> {
        Ok(read(&self.session()?.levels).entries())
    }

    /// Applies a directive list such as `"warn,net.*=debug"`.
    pub fn apply_directives(&self, spec: &str) -> LogResult<()> {
        write(&self.session()?.levels).apply_spec(spec)
    }

    // ---------------------------------------------------------------------
    // Backends
    // ---------------------------------------------------------------------

    /// Registers a backend.
    pub fn backend_register(&self, backend: Arc<dyn Backend>) -> LogResult<()> {
        self.session()?.dispatcher.register(backend)
    }

    /// Unregisters a backend after running its `deinit` callback.
    ///
    /// In async mode, messages still queued are not delivered to the removed
    /// backend; call [`async_flush`](Self::async_flush) first to deliver them.
    pub fn backend_unregister(&self, name: &str) -> LogResult<()> {
        self.session()?.dispatcher.unregister(name)
    }

    /// Returns a snapshot of the named backend.
    pub fn backend_get(&self, name: &str) -> LogResult<Option<BackendInfo>> {
        Ok(self.session()?.dispatcher.get(name))
    }

    /// Enables or disables a backend.
    pub fn backend_enable(&self, name: &str, enabled: bool) -> LogResult<()> {
        self.session()?.dispatcher.enable(name, enabled)
    }

    /// Changes a backend's threshold.
    pub fn backend_set_min_level(&self, name: &str, level: Level) -> LogResult<()> {
        self.session()?.dispatcher.set_min_level(name, level)
    }

    /// Names of registered backends in registration order.
    pub fn backend_names(&self) -> LogResult<Vec<String>> {
        Ok(self.session()?.dispatcher.names())
    }

    // ---------------------------------------------------------------------
    // Async queue
    // ---------------------------------------------------------------------

    /// Reports whether records are delivered through the async queue.
    pub fn is_async_mode(&self) -> LogResult<bool> {
        Ok(self.session()?.queue.is_some())
    }

    /// Messages waiting in the queue; zero in synchronous mode.
    pub fn async_pending(&self) -> LogResult<usize> {
        Ok(self
            .session()?
            .queue
            .as_ref()
            .map_or(0, AsyncQueue::pending))
    }

    /// Blocks until every message queued before the call is dispatched.
    ///
    /// Returns immediately in synchronous mode.
    pub fn async_flush(&self) -> LogResult<()> {
        if let Some(queue) = &self.session()?.queue {
            queue.flush();
        }
        Ok(())
    }

    /// Changes the overflow policy.
    ///
    /// In synchronous mode the policy is only recorded.
    pub fn async_set_policy(&self, policy: OverflowPolicy) -> LogResult<()> {
        let session = self.session()?;
        session.settings_mut().async_policy = policy;
        if let Some(queue) = &session.queue {
            queue.set_policy(policy);
        }
        Ok(())
    }

    /// Returns the overflow policy.
    pub fn async_policy(&self) -> LogResult<OverflowPolicy> {
        Ok(self.session()?.settings().async_policy)
    }

    /// Queue counters; all zero in synchronous mode.
    pub fn async_stats(&self) -> LogResult<QueueStats> {
        Ok(self
            .session()?
            .queue
            .as_ref()
            .map(AsyncQueue::stats)
            .unwrap_or_default())
    }

    fn session(&self) -> LogResult<Arc<Session>> {
        read(&self.session).clone().ok_or(LogError::NotInit)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        let session = self
            .session
            .get_mut()
            .unwrap_or_else(|poison| poison.into_inner())
            .take();
        if let Some(session) = session {
            session.close();
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poison| poison.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poison| poison.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const HERE: Location = Location::new("src/main.rs", 7, "app::main");

    #[derive(Default)]
    struct Lines {
        name: &'static str,
        lines: Mutex<Vec<String>>,
        flushes: AtomicUsize,
        deinits: AtomicUsize,
    }

    impl Lines {
        fn named(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                ..Self::default()
            })
        }

        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.lines.lock().unwrap())
        }
    }

    impl Backend for Lines {
        fn name(&self) -> &str {
            self.name
        }

        fn write(&self, bytes: &[u8]) -> Result<(), BackendError> {
            self.lines
                .lock()
                .unwrap()
                .push(String::from_utf8_lossy(bytes).into_owned());
            Ok(())
        }

        fn flush(&self) -> Result<(), BackendError> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn deinit(&self) -> Result<(), BackendError> {
            self.deinits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn started(config: LogConfig) -> (Logger, Arc<Lines>) {
        let logger = Logger::new();
        logger.init(config).unwrap();
        let lines = Lines::named("lines");
        logger.backend_register(lines.clone()).unwrap();
        (logger, lines)
    }

    fn plain() -> LogConfig {
        LogConfig::default().with_format("[%L] %m")
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn every_accessor_requires_init() {
            let logger = Logger::new();
            assert!(!logger.is_initialized());
            assert!(matches!(logger.level(), Err(LogError::NotInit)));
            assert!(matches!(logger.set_level(Level::Warn), Err(LogError::NotInit)));
            assert!(matches!(logger.format(), Err(LogError::NotInit)));
            assert!(matches!(logger.set_format("%m"), Err(LogError::NotInit)));
            assert!(matches!(logger.max_msg_len(), Err(LogError::NotInit)));
            assert!(matches!(logger.color_enabled(), Err(LogError::NotInit)));
            assert!(matches!(logger.module_level("x"), Err(LogError::NotInit)));
            assert!(matches!(logger.module_clear_all(), Err(LogError::NotInit)));
            assert!(matches!(logger.backend_names(), Err(LogError::NotInit)));
            assert!(matches!(logger.is_async_mode(), Err(LogError::NotInit)));
            assert!(matches!(logger.async_flush(), Err(LogError::NotInit)));
            assert!(matches!(logger.flush(), Err(LogError::NotInit)));
            assert!(matches!(logger.write_raw(b"x"), Err(LogError::NotInit)));
            assert!(matches!(
                logger.write(Level::Info, None, HERE, format_args!("x")),
                Err(LogError::NotInit)
            ));
            assert!(matches!(logger.deinit(), Err(LogError::NotInit)));
            assert!(!logger.is_enabled(Level::Fatal, None));
        }

        #[test]
        fn double_init_is_rejected() {
            let logger = Logger::new();
            logger.init(LogConfig::default()).unwrap();
            assert!(matches!(
                logger.init(LogConfig::default()),
                Err(LogError::AlreadyInit)
            ));
        }

        #[test]
        fn invalid_config_leaves_logger_uninitialized() {
            let logger = Logger::new();
            for config in [
                LogConfig::default().with_format(""),
                LogConfig::default().with_max_msg_len(0),
                LogConfig::default().with_async(0, OverflowPolicy::Drop),
            ] {
                assert!(matches!(logger.init(config), Err(LogError::InvalidParam(_))));
                assert!(!logger.is_initialized());
            }
        }

        #[test]
        fn deinit_tears_everything_down() {
            let (logger, lines) = started(plain().with_level(Level::Debug));
            logger.module_set_level("net", Level::Error).unwrap();
            logger.deinit().unwrap();

            assert_eq!(lines.flushes.load(Ordering::SeqCst), 1);
            assert_eq!(lines.deinits.load(Ordering::SeqCst), 1);

            logger.init(LogConfig::default()).unwrap();
            assert_eq!(logger.level().unwrap(), Level::Info);
            assert_eq!(logger.format().unwrap(), "[%T] [%L] [%M] %m");
            assert!(logger.module_filters().unwrap().is_empty());
            assert!(logger.backend_names().unwrap().is_empty());
        }

        #[test]
        fn dropping_logger_deinits_backends() {
            let (logger, lines) = started(plain());
            drop(logger);
            assert_eq!(lines.deinits.load(Ordering::SeqCst), 1);
        }
    }

    mod write_tests {
        use super::*;

        #[test]
        fn renders_and_dispatches() {
            let (logger, lines) = started(plain());
            logger
                .write(Level::Warn, None, HERE, format_args!("disk at {}%", 87))
                .unwrap();
            assert_eq!(lines.take(), ["[WARN] disk at 87%"]);
        }

        #[test]
        fn printf_entry_point() {
            let (logger, lines) = started(plain());
            logger
                .write_printf(Level::Warn, None, HERE, "disk at %d%%", &[Arg::Int(87)])
                .unwrap();
            assert_eq!(lines.take(), ["[WARN] disk at 87%"]);
        }

        #[test]
        fn level_none_is_invalid() {
            let (logger, _lines) = started(plain());
            assert!(matches!(
                logger.write(Level::None, None, HERE, format_args!("x")),
                Err(LogError::InvalidParam(_))
            ));
        }

        #[test]
        fn below_threshold_is_silent_success() {
            let (logger, lines) = started(plain().with_level(Level::Warn));
            logger
                .write(Level::Info, None, HERE, format_args!("quiet"))
                .unwrap();
            assert!(lines.take().is_empty());
        }

        #[test]
        fn filtered_records_are_not_formatted() {
            struct Loud;
            impl fmt::Display for Loud {
                fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    panic!("formatted a filtered record");
                }
            }

            let (logger, _lines) = started(plain().with_level(Level::Error));
            logger
                .write(Level::Debug, None, HERE, format_args!("{}", Loud))
                .unwrap();
        }

        #[test]
        fn module_overrides_apply() {
            let (logger, lines) = started(plain().with_level(Level::Info));
            logger.module_set_level("test.*", Level::Debug).unwrap();
            logger.module_set_level("test.specific", Level::Warn).unwrap();

            logger
                .write(Level::Debug, Some("test.other"), HERE, format_args!("a"))
                .unwrap();
            logger
                .write(Level::Debug, Some("test.specific"), HERE, format_args!("b"))
                .unwrap();
            logger
                .write(Level::Warn, Some("test.specific"), HERE, format_args!("c"))
                .unwrap();

            assert_eq!(lines.take(), ["[DEBUG] a", "[WARN] c"]);
            assert_eq!(logger.module_level("test.specific").unwrap(), Level::Warn);
            assert_eq!(logger.module_level("elsewhere").unwrap(), Level::Info);
        }

        #[test]
        fn truncation_uses_current_limit() {
            let (logger, lines) = started(plain());
            logger.set_max_msg_len(5).unwrap();
            logger
                .write(Level::Info, None, HERE, format_args!("Hello World"))
                .unwrap();
            assert_eq!(lines.take(), ["[INFO] He..."]);
            assert!(matches!(logger.set_max_msg_len(0), Err(LogError::InvalidParam(_))));
            assert_eq!(logger.max_msg_len().unwrap(), 5);
        }

        #[test]
        fn format_changes_apply_to_later_records() {
            let (logger, lines) = started(plain());
            logger.set_format("%l:%M:%m").unwrap();
            assert!(matches!(logger.set_format(""), Err(LogError::InvalidParam(_))));
            logger
                .write(Level::Error, Some("db"), HERE, format_args!("down"))
                .unwrap();
            assert_eq!(lines.take(), ["E:db:down"]);
            assert_eq!(logger.format().unwrap(), "%l:%M:%m");
        }

        #[test]
        fn color_follows_setting() {
            let (logger, lines) = started(LogConfig::default().with_format("%c%L%C"));
            logger.write(Level::Info, None, HERE, format_args!("")).unwrap();
            logger.set_color_enabled(true).unwrap();
            logger.write(Level::Info, None, HERE, format_args!("")).unwrap();
            assert_eq!(lines.take(), ["INFO", "\x1b[32mINFO\x1b[0m"]);
        }

        #[test]
        fn raw_write_bypasses_filter_and_format() {
            let (logger, lines) = started(plain().with_level(Level::None));
            logger.write_raw(b"AT+RESET\r\n").unwrap();
            assert!(matches!(logger.write_raw(b""), Err(LogError::InvalidParam(_))));
            assert_eq!(lines.take(), ["AT+RESET\r\n"]);
        }

        #[test]
        fn backend_min_level_filters_after_global() {
            let (logger, lines) = started(plain().with_level(Level::Trace));
            let errors = Lines::named("errors");
            logger.backend_register(errors.clone()).unwrap();
            logger.backend_set_min_level("errors", Level::Error).unwrap();

            logger.write(Level::Info, None, HERE, format_args!("i")).unwrap();
            logger.write(Level::Error, None, HERE, format_args!("e")).unwrap();

            assert_eq!(lines.take(), ["[INFO] i", "[ERROR] e"]);
            assert_eq!(errors.take(), ["[ERROR] e"]);
        }

        #[test]
        fn disabled_backend_receives_nothing() {
            let (logger, lines) = started(plain());
            logger.backend_enable("lines", false).unwrap();
            logger.write(Level::Fatal, None, HERE, format_args!("x")).unwrap();
            logger.write_raw(b"raw").unwrap();
            assert!(lines.take().is_empty());
            assert!(!logger.backend_get("lines").unwrap().unwrap().enabled);
        }
    }

    mod async_tests {
        use super::*;

        #[test]
        fn async_mode_delivers_in_order_after_flush() {
            let (logger, lines) = started(plain().with_async(64, OverflowPolicy::Block));
            assert!(logger.is_async_mode().unwrap());
            for index in 0..20 {
                logger
                    .write(Level::Info, None, HERE, format_args!("{index}"))
                    .unwrap();
            }
            logger.write_raw(b"raw").unwrap();
            logger.async_flush().unwrap();

            let mut expected: Vec<String> = (0..20).map(|index| format!("[INFO] {index}")).collect();
            expected.push("raw".to_owned());
            assert_eq!(lines.take(), expected);
            assert_eq!(logger.async_pending().unwrap(), 0);
            assert_eq!(logger.async_stats().unwrap().dispatched, 21);
        }

        #[test]
        fn deinit_drains_queue() {
            let (logger, lines) = started(plain().with_async(64, OverflowPolicy::Block));
            for index in 0..10 {
                logger
                    .write(Level::Info, None, HERE, format_args!("{index}"))
                    .unwrap();
            }
            logger.deinit().unwrap();
            assert_eq!(lines.take().len(), 10);
        }

        #[test]
        fn sync_mode_async_accessors_are_inert() {
            let (logger, _lines) = started(plain());
            assert!(!logger.is_async_mode().unwrap());
            assert_eq!(logger.async_pending().unwrap(), 0);
            logger.async_flush().unwrap();
            assert_eq!(logger.async_stats().unwrap(), QueueStats::default());
            logger.async_set_policy(OverflowPolicy::Block).unwrap();
            assert_eq!(logger.async_policy().unwrap(), OverflowPolicy::Block);
        }
    }
}
