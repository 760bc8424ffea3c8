//! Async queue behavior driven through a gated backend.
//!
//! The gated backend holds the consumer inside its first write, which leaves
//! the queue empty and idle so each test can fill it deterministically.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use logging::{Level, LogConfig, Logger, OverflowPolicy, QueueStats, log_info, log_write};
use test_support::{CaptureBackend, SlowBackend};

const WAIT: Duration = Duration::from_secs(5);

fn async_logger(capacity: usize, policy: OverflowPolicy) -> (Arc<Logger>, Arc<SlowBackend>) {
    let logger = Arc::new(Logger::new());
    logger
        .init(
            LogConfig::default()
                .with_format("%m")
                .with_async(capacity, policy),
        )
        .expect("init");
    let gate = SlowBackend::gated("gate");
    logger.backend_register(gate.clone()).expect("register");
    (logger, gate)
}

/// Sends `m0` and waits until the consumer is stuck delivering it.
fn hold_consumer(logger: &Logger, gate: &SlowBackend) {
    log_info!(logger: logger, "m0");
    assert!(gate.wait_until_busy(WAIT), "consumer never picked up m0");
}

#[test]
fn drop_oldest_keeps_the_newest_capacity_messages() {
    let (logger, gate) = async_logger(4, OverflowPolicy::DropOldest);
    hold_consumer(&logger, &gate);

    for index in 1..=6 {
        log_info!(logger: &logger, "m{index}");
    }
    assert_eq!(logger.async_pending().expect("pending"), 4);

    gate.release();
    logger.async_flush().expect("flush");

    assert_eq!(gate.lines(), ["m0", "m3", "m4", "m5", "m6"]);
    assert_eq!(
        logger.async_stats().expect("stats"),
        QueueStats {
            accepted: 7,
            dropped: 2,
            dispatched: 5,
        }
    );
    logger.deinit().expect("deinit");
}

#[test]
fn drop_discards_arrivals_when_full() {
    for policy in [OverflowPolicy::Drop, OverflowPolicy::DropNewest] {
        let (logger, gate) = async_logger(2, policy);
        hold_consumer(&logger, &gate);

        for index in 1..=5 {
            log_info!(logger: &logger, "m{index}");
        }
        gate.release();
        logger.async_flush().expect("flush");

        assert_eq!(gate.lines(), ["m0", "m1", "m2"], "{policy}");
        let stats = logger.async_stats().expect("stats");
        assert_eq!(stats.dropped, 3, "{policy}");
        logger.deinit().expect("deinit");
    }
}

#[test]
fn block_waits_for_space_and_loses_nothing() {
    let (logger, gate) = async_logger(1, OverflowPolicy::Block);
    hold_consumer(&logger, &gate);
    log_info!(logger: &logger, "m1");

    let producer = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || log_info!(logger: &logger, "m2"))
    };
    thread::sleep(Duration::from_millis(20));
    assert!(!producer.is_finished(), "producer should block on a full queue");

    gate.release();
    producer.join().expect("producer thread");
    logger.async_flush().expect("flush");

    assert_eq!(gate.lines(), ["m0", "m1", "m2"]);
    assert_eq!(logger.async_stats().expect("stats").dropped, 0);
    logger.deinit().expect("deinit");
}

#[test]
fn occupancy_never_exceeds_capacity() {
    let (logger, gate) = async_logger(3, OverflowPolicy::Drop);
    hold_consumer(&logger, &gate);
    for index in 0..50 {
        log_info!(logger: &logger, "burst {index}");
        assert!(logger.async_pending().expect("pending") <= 3);
    }
    gate.release();
    logger.deinit().expect("deinit");
}

#[test]
fn single_producer_order_is_preserved() {
    let logger = Logger::new();
    logger
        .init(
            LogConfig::default()
                .with_format("%m")
                .with_async(8, OverflowPolicy::Block),
        )
        .expect("init");
    let capture = CaptureBackend::new("capture");
    logger.backend_register(capture.clone()).expect("register");

    for index in 0..200 {
        if index % 10 == 0 {
            logger.write_raw(format!("raw {index}").as_bytes()).expect("raw");
        } else {
            log_info!(logger: &logger, "rec {index}");
        }
    }
    logger.async_flush().expect("flush");

    let expected: Vec<String> = (0..200)
        .map(|index| {
            if index % 10 == 0 {
                format!("raw {index}")
            } else {
                format!("rec {index}")
            }
        })
        .collect();
    assert_eq!(capture.lines(), expected);
    logger.deinit().expect("deinit");
}

#[test]
fn many_producers_keep_per_thread_order() {
    let logger = Arc::new(Logger::new());
    logger
        .init(
            LogConfig::default()
                .with_format("%M %m")
                .with_async(16, OverflowPolicy::Block),
        )
        .expect("init");
    let capture = CaptureBackend::new("capture");
    logger.backend_register(capture.clone()).expect("register");

    let producers: Vec<_> = ["p0", "p1", "p2", "p3"]
        .into_iter()
        .map(|name| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for index in 0..100 {
                    log_write!(logger: &logger, Level::Info, module: name, "{index}");
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().expect("producer");
    }
    logger.async_flush().expect("flush");

    let lines = capture.lines();
    assert_eq!(lines.len(), 400);
    for name in ["p0", "p1", "p2", "p3"] {
        let sequence: Vec<u32> = lines
            .iter()
            .filter_map(|line| line.strip_prefix(name)?.trim().parse().ok())
            .collect();
        assert_eq!(sequence, (0..100).collect::<Vec<_>>(), "{name}");
    }
    logger.deinit().expect("deinit");
}

#[test]
fn deinit_drains_queued_messages() {
    let (logger, gate) = async_logger(8, OverflowPolicy::Block);
    hold_consumer(&logger, &gate);
    for index in 1..=3 {
        log_info!(logger: &logger, "m{index}");
    }

    let releaser = {
        let gate = Arc::clone(&gate);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            gate.release();
        })
    };
    logger.deinit().expect("deinit");
    releaser.join().expect("releaser");

    assert_eq!(gate.lines(), ["m0", "m1", "m2", "m3"]);
}

#[test]
fn policy_can_change_at_runtime() {
    let (logger, gate) = async_logger(2, OverflowPolicy::Drop);
    assert_eq!(logger.async_policy().expect("policy"), OverflowPolicy::Drop);
    hold_consumer(&logger, &gate);

    log_info!(logger: &logger, "m1");
    log_info!(logger: &logger, "m2");
    logger
        .async_set_policy(OverflowPolicy::DropOldest)
        .expect("set policy");
    log_info!(logger: &logger, "m3");

    gate.release();
    logger.async_flush().expect("flush");
    assert_eq!(gate.lines(), ["m0", "m2", "m3"]);
    assert_eq!(logger.async_policy().expect("policy"), OverflowPolicy::DropOldest);
    logger.deinit().expect("deinit");
}

#[test]
fn sync_mode_reports_empty_queue() {
    let logger = Logger::new();
    logger.init(LogConfig::default()).expect("init");
    assert!(!logger.is_async_mode().expect("mode"));
    assert_eq!(logger.async_pending().expect("pending"), 0);
    logger.async_flush().expect("flush is a no-op");
    logger
        .async_set_policy(OverflowPolicy::Block)
        .expect("recorded only");
    assert_eq!(logger.async_policy().expect("policy"), OverflowPolicy::Block);
    assert_eq!(logger.async_stats().expect("stats"), QueueStats::default());
    logger.deinit().expect("deinit");
}

#[test]
fn zero_capacity_is_rejected_in_async_mode() {
    let logger = Logger::new();
    assert!(
        logger
            .init(LogConfig::default().with_async(0, OverflowPolicy::Drop))
            .is_err()
    );
    assert!(!logger.is_initialized());
}
