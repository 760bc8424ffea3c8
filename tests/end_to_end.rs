//! End-to-end scenarios through the facade crate and the stock backends.

use std::fs::{self, File};
use std::io::BufWriter;
use std::sync::Arc;
use std::time::Duration;

use diaglog::sinks::{LineMode, MemoryBackend, WriterBackend};
use diaglog::{
    Level, LogConfig, LogError, Logger, OverflowPolicy, location, log_debug, log_error, log_info,
    log_printf, log_warn, log_write,
};
use test_support::{CaptureBackend, SlowBackend};

fn with_memory(config: LogConfig) -> (Logger, Arc<MemoryBackend>) {
    let logger = Logger::new();
    logger.init(config).expect("init");
    let ring = Arc::new(MemoryBackend::new(4096).with_line_mode(LineMode::WithoutNewline));
    logger.backend_register(ring.clone()).expect("register");
    (logger, ring)
}

#[test]
fn warn_with_printf_substitution() {
    let (logger, ring) = with_memory(LogConfig::default().with_format("[%L] %m"));
    log_printf!(logger: &logger, Level::Warn, "disk at %d%%", 87);
    assert_eq!(ring.contents_lossy(), "[WARN] disk at 87%");
    logger.deinit().expect("deinit");
}

#[test]
fn long_message_is_cut_to_the_limit() {
    let (logger, ring) = with_memory(
        LogConfig::default()
            .with_format("[%L] %m")
            .with_max_msg_len(5),
    );
    log_info!(logger: &logger, "Hello, World!");
    assert_eq!(ring.contents_lossy(), "[INFO] He...");
    logger.deinit().expect("deinit");
}

#[test]
fn default_pattern_carries_timestamp_level_and_module() {
    let (logger, ring) = with_memory(LogConfig::default());
    log_warn!(logger: &logger, module: "power", "brownout");
    let line = ring.contents_lossy();

    // "[YYYY-MM-DD HH:MM:SS.mmm] [WARN] [power] brownout"
    let (stamp, rest) = line.split_at(25);
    assert!(stamp.starts_with('[') && stamp.ends_with(']'), "{line}");
    assert_eq!(stamp.len(), "[2024-03-05 07:08:09.123]".len());
    assert_eq!(rest, " [WARN] [power] brownout");
    logger.deinit().expect("deinit");
}

#[test]
fn drop_oldest_overflow_keeps_the_latest_messages() {
    const CAPACITY: usize = 4;
    let logger = Logger::new();
    logger
        .init(
            LogConfig::default()
                .with_format("%m")
                .with_async(CAPACITY, OverflowPolicy::DropOldest),
        )
        .expect("init");
    let gate = SlowBackend::gated("gate");
    logger.backend_register(gate.clone()).expect("register");

    log_info!(logger: &logger, "held");
    assert!(gate.wait_until_busy(Duration::from_secs(5)));
    for index in 1..=CAPACITY + 1 {
        log_info!(logger: &logger, "m{index}");
    }
    gate.release();
    logger.flush().expect("flush");

    assert_eq!(gate.lines(), ["held", "m2", "m3", "m4", "m5"]);
    let stats = logger.async_stats().expect("stats");
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.dispatched, 5);
    logger.deinit().expect("deinit");
}

#[test]
fn async_delivery_preserves_fifo_order() {
    let logger = Logger::new();
    logger
        .init(
            LogConfig::default()
                .with_format("%m")
                .with_async(4, OverflowPolicy::Block),
        )
        .expect("init");
    let capture = CaptureBackend::new("capture");
    logger.backend_register(capture.clone()).expect("register");

    for index in 0..64 {
        log_info!(logger: &logger, "{index}");
    }
    logger.deinit().expect("deinit drains the queue");

    let expected: Vec<String> = (0..64).map(|index| index.to_string()).collect();
    assert_eq!(capture.lines(), expected);
}

#[test]
fn disabled_backend_receives_nothing() {
    let (logger, ring) = with_memory(LogConfig::default().with_format("%m"));
    let capture = CaptureBackend::new("capture");
    logger.backend_register(capture.clone()).expect("register");
    logger.backend_enable("capture", false).expect("disable");

    log_error!(logger: &logger, "only memory");
    logger.write_raw(b" raw").expect("raw");

    assert_eq!(capture.count(), 0);
    assert_eq!(ring.contents_lossy(), "only memory raw");
    let info = logger
        .backend_get("capture")
        .expect("initialized")
        .expect("registered");
    assert!(!info.enabled);
    logger.deinit().expect("deinit");
}

#[test]
fn lifecycle_round_trip() {
    let logger = Logger::new();
    for round in 0..3 {
        logger
            .init(LogConfig::default().with_format("%m"))
            .expect("init");
        assert!(logger.is_initialized());
        let capture = CaptureBackend::new("capture");
        logger.backend_register(capture.clone()).expect("register");
        log_info!(logger: &logger, "round {round}");
        logger.deinit().expect("deinit");

        assert!(!logger.is_initialized());
        assert_eq!(capture.lines(), [format!("round {round}")]);
        assert_eq!(capture.calls().deinit(), 1);
    }
    assert!(matches!(logger.level(), Err(LogError::NotInit)));
}

#[test]
fn module_override_precedence() {
    let (logger, ring) = with_memory(
        LogConfig::default()
            .with_format("%M:%l ")
            .with_level(Level::Warn)
            .with_module_level("*", Level::Error)
            .with_module_level("drv.*", Level::Info)
            .with_module_level("drv.spi", Level::Debug),
    );

    log_debug!(logger: &logger, module: "drv.spi", "");
    log_debug!(logger: &logger, module: "drv.i2c", "");
    log_info!(logger: &logger, module: "drv.i2c", "");
    log_warn!(logger: &logger, module: "app", "");
    log_error!(logger: &logger, module: "app", "");
    log_warn!(logger: &logger, "");

    assert_eq!(ring.contents_lossy(), "drv.spi:D drv.i2c:I app:E :W ");

    logger.module_clear_level("drv.spi").expect("clear");
    assert_eq!(logger.module_level("drv.spi").expect("level"), Level::Info);
    logger.module_clear_all().expect("clear all");
    assert_eq!(logger.module_level("drv.spi").expect("level"), Level::Warn);
    assert!(matches!(
        logger.module_clear_level("drv.spi"),
        Err(LogError::InvalidParam(_))
    ));
    logger.deinit().expect("deinit");
}

#[test]
fn backend_min_level_and_file_destination() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("errors.log");
    let file = File::create(&path).expect("create");

    let (logger, ring) = with_memory(LogConfig::default().with_format("%L %m"));
    let errors = Arc::new(
        WriterBackend::new("errors", BufWriter::new(file)).with_min_level(Level::Error),
    );
    logger.backend_register(errors).expect("register");

    log_info!(logger: &logger, "starting");
    log_error!(logger: &logger, "sensor timeout");
    log_write!(logger: &logger, Level::Fatal, "halting");
    logger.deinit().expect("deinit");

    assert_eq!(
        ring.contents_lossy(),
        "INFO startingERROR sensor timeoutFATAL halting"
    );
    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "ERROR sensor timeout\nFATAL halting\n"
    );
}

#[test]
fn is_enabled_mirrors_the_filter() {
    let (logger, _ring) = with_memory(
        LogConfig::default()
            .with_level(Level::Info)
            .with_module_level("verbose", Level::Trace),
    );
    assert!(logger.is_enabled(Level::Info, None));
    assert!(!logger.is_enabled(Level::Debug, None));
    assert!(logger.is_enabled(Level::Trace, Some("verbose")));
    assert!(
        logger
            .write(Level::Trace, Some("quiet"), location!(), format_args!("skipped"))
            .is_ok()
    );
    logger.deinit().expect("deinit");
}
