//! Named asynchronous logger
//!
//! Each [`AsyncLogger`] owns a FIFO queue and one worker thread. Callers push
//! messages onto the queue (taking the queue lock through the configured
//! [`LockRetryPolicy`]) and signal the worker; the worker drains the queue in
//! arrival order, publishes the formatted line to the [`Broadcaster`] and
//! forwards the message to its appenders.
//!
//! Lifecycle: `Running` from construction, `ExitRequested` once
//! [`dispose`](AsyncLogger::dispose) starts, `Terminated` after the worker
//! thread has exited. There is no way back to `Running`.

use super::{
    appender::Appender,
    broadcaster::Broadcaster,
    call_site::CallSite,
    config::{LevelGate, LoggerConfig},
    error::{LoggerError, Result},
    lock_policy::LockRetryPolicy,
    log::Log,
    log_entry::LogEntry,
    log_message::LogMessage,
    metrics::LoggerMetrics,
    severity::Severity,
};
use crossbeam_channel::{bounded, select, Receiver, Sender};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;

const RUNNING: u8 = 0;
const EXIT_REQUESTED: u8 = 1;
const TERMINATED: u8 = 2;

/// Lifecycle state of a logger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerState {
    Running,
    ExitRequested,
    Terminated,
}

impl LoggerState {
    fn from_u8(value: u8) -> Self {
        match value {
            RUNNING => LoggerState::Running,
            EXIT_REQUESTED => LoggerState::ExitRequested,
            _ => LoggerState::Terminated,
        }
    }
}

/// State shared between the logger handle and its worker thread
struct Shared {
    name: String,
    queue: Mutex<VecDeque<LogMessage>>,
    state: AtomicU8,
    debug_enabled: AtomicBool,
    error_enabled: AtomicBool,
    fatal_enabled: AtomicBool,
    config: LoggerConfig,
    appenders: Mutex<Vec<Box<dyn Appender>>>,
    broadcaster: Arc<Broadcaster>,
    metrics: LoggerMetrics,
    /// Auto-reset "new item" signal; capacity one so repeated signals coalesce
    wake: Sender<()>,
}

impl Shared {
    fn state(&self) -> LoggerState {
        LoggerState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn gate_switch(&self, severity: Severity) -> Option<&AtomicBool> {
        match severity {
            Severity::Debug => Some(&self.debug_enabled),
            Severity::Error => Some(&self.error_enabled),
            Severity::Fatal => Some(&self.fatal_enabled),
            _ => None,
        }
    }

    fn is_enabled(&self, severity: Severity) -> bool {
        match severity {
            Severity::None => false,
            Severity::Info | Severity::Warn => true,
            gated => self
                .gate_switch(gated)
                .map(|switch| switch.load(Ordering::Relaxed))
                .unwrap_or(false),
        }
    }
}

pub struct AsyncLogger {
    shared: Arc<Shared>,
    /// Dropping the sender is the exit signal
    exit: Mutex<Option<Sender<()>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    worker_id: thread::ThreadId,
}

impl AsyncLogger {
    /// Create a builder for a logger called `name`
    ///
    /// # Example
    /// ```
    /// use relay_log::prelude::*;
    ///
    /// let logger = AsyncLogger::builder("Grid")
    ///     .gate(LevelGate::from_threshold(Severity::Info))
    ///     .build()
    ///     .unwrap();
    /// logger.info("bound 12 columns");
    /// logger.dispose();
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> AsyncLoggerBuilder {
        AsyncLoggerBuilder::new(name)
    }

    fn spawn(
        name: String,
        config: LoggerConfig,
        appenders: Vec<Box<dyn Appender>>,
        broadcaster: Arc<Broadcaster>,
    ) -> Result<Self> {
        config.validate()?;

        let (wake_tx, wake_rx) = bounded(1);
        let (exit_tx, exit_rx) = bounded::<()>(1);

        let shared = Arc::new(Shared {
            name: name.clone(),
            queue: Mutex::new(VecDeque::new()),
            state: AtomicU8::new(RUNNING),
            debug_enabled: AtomicBool::new(config.gate.debug),
            error_enabled: AtomicBool::new(config.gate.error),
            fatal_enabled: AtomicBool::new(config.gate.fatal),
            config,
            appenders: Mutex::new(appenders),
            broadcaster,
            metrics: LoggerMetrics::new(),
            wake: wake_tx,
        });
        let shared_clone = Arc::clone(&shared);

        let handle = thread::Builder::new()
            .name(format!("relay-log:{}", name))
            .spawn(move || Self::run(shared_clone, wake_rx, exit_rx))
            .map_err(|e| LoggerError::spawn_failed(name, e))?;

        Ok(Self {
            shared,
            exit: Mutex::new(Some(exit_tx)),
            worker_id: handle.thread().id(),
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Worker loop: wait for either a new item or the exit signal.
    ///
    /// Messages queued before the exit signal get one last drain before the
    /// thread ends; nothing can be queued after it.
    fn run(shared: Arc<Shared>, wake: Receiver<()>, exit: Receiver<()>) {
        loop {
            select! {
                recv(wake) -> signal => {
                    if signal.is_err() {
                        break;
                    }
                    Self::drain(&shared);
                }
                recv(exit) -> _ => break,
            }
        }

        Self::drain(&shared);
        shared.state.store(TERMINATED, Ordering::Release);
    }

    /// Process queued messages one at a time in FIFO order.
    ///
    /// The queue lock is held only to pop; broadcasting and appending happen
    /// without it so callers are never blocked behind slow appenders.
    fn drain(shared: &Shared) {
        let mut processed_any = false;
        loop {
            let next = shared.queue.lock().pop_front();
            match next {
                Some(message) => {
                    Self::process(shared, &message);
                    processed_any = true;
                }
                None => break,
            }
        }

        if processed_any {
            Self::flush_appenders(&mut shared.appenders.lock());
        }
    }

    /// Publish one message and forward it to the appenders
    ///
    /// **Per-Appender Panic Isolation**: each appender is wrapped in
    /// catch_unwind so a failing appender cannot stop the worker or starve
    /// the other appenders.
    fn process(shared: &Shared, message: &LogMessage) {
        let line = message.broadcast_line(&shared.name);
        let subscriber_failures = shared.broadcaster.publish(&line);
        if subscriber_failures > 0 {
            shared
                .metrics
                .record_subscriber_failures(subscriber_failures as u64);
        }

        let entry = LogEntry::from_message(&shared.name, message);
        let mut appenders = shared.appenders.lock();

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(&entry)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) of logger '{}' failed: {}",
                        idx,
                        appender.name(),
                        shared.name,
                        e
                    );
                    shared.metrics.record_sink_failure();
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} of logger '{}' panicked: {}. \
                         Other appenders continue to function.",
                        idx, shared.name, panic_msg
                    );
                    shared.metrics.record_sink_failure();
                }
            }
        }

        shared.metrics.record_processed();
    }

    fn flush_appenders(appenders: &mut [Box<dyn Appender>]) {
        for (idx, appender) in appenders.iter_mut().enumerate() {
            let flush_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.flush()
            }));

            match flush_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Appender #{} flush failed: {}", idx, e);
                }
                Err(_) => {
                    eprintln!("[LOGGER CRITICAL] Appender #{} panicked during flush", idx);
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn state(&self) -> LoggerState {
        self.shared.state()
    }

    /// `true` once the worker thread has exited
    pub fn is_terminated(&self) -> bool {
        self.state() == LoggerState::Terminated
    }

    pub fn is_enabled(&self, severity: Severity) -> bool {
        self.shared.is_enabled(severity)
    }

    /// Switch a gated level on or off. Info and Warn cannot be disabled;
    /// the call is ignored for them.
    pub fn set_enabled(&self, severity: Severity, enabled: bool) {
        if let Some(switch) = self.shared.gate_switch(severity) {
            switch.store(enabled, Ordering::Relaxed);
        }
    }

    /// Current gate switches
    pub fn gate(&self) -> LevelGate {
        LevelGate {
            debug: self.is_enabled(Severity::Debug),
            error: self.is_enabled(Severity::Error),
            fatal: self.is_enabled(Severity::Fatal),
        }
    }

    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.shared.broadcaster
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Add an appender; it sees messages processed from now on
    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.shared.appenders.lock().push(appender);
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.shared.appenders.lock();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    /// Queue a message, reporting every reason it was not queued.
    ///
    /// A disabled level is not an error: the call returns `Ok(())` and only
    /// the `suppressed` counter moves. The call site is kept for Error and
    /// Fatal and discarded otherwise.
    pub fn try_log(
        &self,
        severity: Severity,
        text: impl Into<String>,
        call_site: Option<CallSite>,
    ) -> Result<()> {
        if !self.is_enabled(severity) {
            self.shared.metrics.record_suppressed();
            return Ok(());
        }
        self.enqueue(LogMessage::new(severity, text, call_site))
    }

    fn enqueue(&self, message: LogMessage) -> Result<()> {
        let policy = &self.shared.config.lock_policy;
        let Some(mut queue) = policy.acquire(&self.shared.queue) else {
            return Err(LoggerError::lock_exhausted(
                self.shared.name.as_str(),
                policy.max_attempts,
                policy.attempt_timeout,
            ));
        };

        // Checked under the queue lock: dispose flips the state under the same
        // lock, so no message can slip in after the exit signal.
        if self.shared.state() != LoggerState::Running {
            drop(queue);
            self.shared.metrics.record_rejected();
            return Err(LoggerError::disposed(self.shared.name.as_str()));
        }

        queue.push_back(message);
        self.shared.metrics.record_enqueued();
        drop(queue);

        // A full signal channel already means "work pending"
        let _ = self.shared.wake.try_send(());
        Ok(())
    }

    /// Fire-and-forget path behind the severity methods
    fn submit(&self, severity: Severity, text: String, call_site: Option<CallSite>) {
        match self.enqueue(LogMessage::new(severity, text, call_site)) {
            Ok(()) | Err(LoggerError::LoggerDisposed { .. }) => {}
            Err(e) if e.is_fatal() => self.shared.config.lock_policy.escalate(&e),
            Err(e) => eprintln!("[LOGGER ERROR] Failed to queue message: {}", e),
        }
    }

    fn is_suppressed(&self, severity: Severity) -> bool {
        if self.is_enabled(severity) {
            return false;
        }
        self.shared.metrics.record_suppressed();
        true
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        if !self.is_suppressed(Severity::Debug) {
            self.submit(Severity::Debug, message.into(), None);
        }
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.submit(Severity::Info, message.into(), None);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.submit(Severity::Warn, message.into(), None);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        if !self.is_suppressed(Severity::Error) {
            let call_site = CallSite::capture();
            self.submit(Severity::Error, message.into(), Some(call_site));
        }
    }

    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        if !self.is_suppressed(Severity::Fatal) {
            let call_site = CallSite::capture();
            self.submit(Severity::Fatal, message.into(), Some(call_site));
        }
    }

    pub fn error_at(&self, message: impl Into<String>, call_site: CallSite) {
        if !self.is_suppressed(Severity::Error) {
            self.submit(Severity::Error, message.into(), Some(call_site));
        }
    }

    pub fn fatal_at(&self, message: impl Into<String>, call_site: CallSite) {
        if !self.is_suppressed(Severity::Fatal) {
            self.submit(Severity::Fatal, message.into(), Some(call_site));
        }
    }

    /// Stop the worker: signal exit, then wait for the thread to finish.
    ///
    /// Waits without a timeout. Repeated calls return immediately; a
    /// concurrent caller blocks until the first one has joined. Called from
    /// the logger's own worker thread (e.g. inside a broadcast subscriber) it
    /// only requests the exit, and a later call from another thread joins.
    pub fn dispose(&self) {
        if self.is_worker_thread() {
            self.request_exit();
            return;
        }

        let mut worker = self.worker.lock();
        let Some(handle) = worker.take() else {
            return;
        };
        self.request_exit();

        if let Err(e) = handle.join() {
            eprintln!(
                "[LOGGER ERROR] Worker thread of logger '{}' panicked: {:?}",
                self.shared.name, e
            );
        }
        self.shared.state.store(TERMINATED, Ordering::Release);

        Self::flush_appenders(&mut self.shared.appenders.lock());

        let pending = self.shared.queue.lock().len();
        if pending > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger '{}' disposed with {} unprocessed messages",
                self.shared.name, pending
            );
        }
    }

    /// Whether the calling thread is this logger's worker
    pub(crate) fn is_worker_thread(&self) -> bool {
        thread::current().id() == self.worker_id
    }

    fn request_exit(&self) {
        {
            let _queue = self.shared.queue.lock();
            let _ = self.shared.state.compare_exchange(
                RUNNING,
                EXIT_REQUESTED,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
        }
        drop(self.exit.lock().take());
    }
}

impl Log for AsyncLogger {
    fn debug(&self, message: &str) {
        AsyncLogger::debug(self, message);
    }

    fn info(&self, message: &str) {
        AsyncLogger::info(self, message);
    }

    fn warn(&self, message: &str) {
        AsyncLogger::warn(self, message);
    }

    #[track_caller]
    fn error(&self, message: &str) {
        AsyncLogger::error(self, message);
    }

    #[track_caller]
    fn fatal(&self, message: &str) {
        AsyncLogger::fatal(self, message);
    }

    fn error_at(&self, message: &str, call_site: CallSite) {
        AsyncLogger::error_at(self, message, call_site);
    }

    fn fatal_at(&self, message: &str, call_site: CallSite) {
        AsyncLogger::fatal_at(self, message, call_site);
    }

    fn dispose(&self) {
        AsyncLogger::dispose(self);
    }
}

impl Drop for AsyncLogger {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for AsyncLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncLogger")
            .field("name", &self.shared.name)
            .field("state", &self.state())
            .finish()
    }
}

/// Builder for [`AsyncLogger`]
pub struct AsyncLoggerBuilder {
    name: String,
    config: LoggerConfig,
    appenders: Vec<Box<dyn Appender>>,
    broadcaster: Option<Arc<Broadcaster>>,
}

impl AsyncLoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: LoggerConfig::default(),
            appenders: Vec::new(),
            broadcaster: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn gate(mut self, gate: LevelGate) -> Self {
        self.config.gate = gate;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn lock_policy(mut self, policy: LockRetryPolicy) -> Self {
        self.config.lock_policy = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appenders(mut self, appenders: Vec<Box<dyn Appender>>) -> Self {
        self.appenders.extend(appenders);
        self
    }

    /// Publish to `broadcaster` instead of a private one
    #[must_use = "builder methods return a new value"]
    pub fn broadcaster(mut self, broadcaster: Arc<Broadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    /// Start the worker thread
    pub fn build(self) -> Result<AsyncLogger> {
        let broadcaster = self
            .broadcaster
            .unwrap_or_else(|| Arc::new(Broadcaster::new()));
        AsyncLogger::spawn(self.name, self.config, self.appenders, broadcaster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::lock_policy::Escalation;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    fn recv_lines(rx: &Receiver<String>, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| rx.recv_timeout(WAIT).expect("line not broadcast in time"))
            .collect()
    }

    #[test]
    fn test_info_warn_scenario() {
        let logger = AsyncLogger::builder("A").build().unwrap();
        let (_id, rx) = logger.broadcaster().subscribe_channel();

        logger.info("1");
        logger.info("2");
        logger.warn("3");

        assert_eq!(recv_lines(&rx, 3), vec!["[I]A - 1", "[I]A - 2", "[W]A - 3"]);
        logger.dispose();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_error_line_carries_call_site() {
        let logger = AsyncLogger::builder("A").build().unwrap();
        let (_id, rx) = logger.broadcaster().subscribe_channel();

        let line = line!() + 1;
        logger.error("boom");

        let received = recv_lines(&rx, 1).remove(0);
        assert!(received.starts_with("[E]A - boom - "), "got {}", received);
        assert!(received.ends_with(&format!("logger.rs:{}", line)), "got {}", received);
    }

    #[test]
    fn test_error_at_uses_given_call_site() {
        let logger = AsyncLogger::builder("A").build().unwrap();
        let (_id, rx) = logger.broadcaster().subscribe_channel();

        logger.fatal_at("gone", CallSite::new("Foo", 42));
        assert_eq!(recv_lines(&rx, 1), vec!["[F]A - gone - Foo(42)"]);
    }

    #[test]
    fn test_debug_routed_to_warn_appender() {
        let memory = MemoryAppender::new();
        let logger = AsyncLogger::builder("A")
            .appender(memory.clone())
            .build()
            .unwrap();
        let (_id, rx) = logger.broadcaster().subscribe_channel();

        logger.debug("x");
        // Broadcast keeps the D tag...
        assert_eq!(recv_lines(&rx, 1), vec!["[D]A - x"]);
        logger.dispose();

        // ...while the sink sees a warn-level entry
        let entries = memory.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, Severity::Warn);
        assert_eq!(entries[0].severity, Severity::Debug);
    }

    #[test]
    fn test_disabled_levels_are_not_queued() {
        let logger = AsyncLogger::builder("A")
            .gate(LevelGate {
                debug: false,
                error: false,
                fatal: false,
            })
            .build()
            .unwrap();
        let (_id, rx) = logger.broadcaster().subscribe_channel();

        logger.debug("d");
        logger.error("e");
        logger.fatal("f");
        logger.info("i");

        assert_eq!(recv_lines(&rx, 1), vec!["[I]A - i"]);
        logger.dispose();

        assert!(rx.try_recv().is_err());
        assert_eq!(logger.metrics().suppressed(), 3);
        assert_eq!(logger.metrics().enqueued(), 1);
    }

    #[test]
    fn test_set_enabled_at_runtime() {
        let logger = AsyncLogger::builder("A").build().unwrap();
        assert!(logger.is_enabled(Severity::Debug));

        logger.set_enabled(Severity::Debug, false);
        logger.set_enabled(Severity::Info, false);

        assert!(!logger.is_enabled(Severity::Debug));
        assert!(logger.is_enabled(Severity::Info));
        assert!(!logger.gate().debug);
    }

    #[test]
    fn test_lock_exhaustion_reported_by_try_log() {
        let logger = AsyncLogger::builder("A")
            .lock_policy(LockRetryPolicy::new(2, Duration::from_millis(10)))
            .build()
            .unwrap();

        let held = logger.shared.queue.lock();
        let result = logger.try_log(Severity::Info, "stuck", None);
        drop(held);

        match result {
            Err(LoggerError::QueueLockExhausted { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("expected lock exhaustion, got {:?}", other),
        }
        assert_eq!(logger.metrics().enqueued(), 0);
    }

    #[test]
    fn test_lock_exhaustion_escalates_to_callback() {
        let escalations = Arc::new(AtomicUsize::new(0));
        let escalations_clone = Arc::clone(&escalations);
        let policy = LockRetryPolicy::new(1, Duration::from_millis(5)).with_escalation(
            Escalation::Callback(Arc::new(move |_| {
                escalations_clone.fetch_add(1, Ordering::Relaxed);
            })),
        );
        let logger = AsyncLogger::builder("A").lock_policy(policy).build().unwrap();

        let held = logger.shared.queue.lock();
        logger.warn("stuck");
        drop(held);

        assert_eq!(escalations.load(Ordering::Relaxed), 1);
    }

    #[test]
    #[should_panic(expected = "Cannot lock queue of logger 'A'")]
    fn test_lock_exhaustion_panics_by_default() {
        let logger = AsyncLogger::builder("A")
            .lock_policy(LockRetryPolicy::new(1, Duration::from_millis(5)))
            .build()
            .unwrap();

        let _held = logger.shared.queue.lock();
        logger.info("stuck");
    }

    #[test]
    fn test_dispose_joins_and_is_idempotent() {
        let logger = AsyncLogger::builder("A").build().unwrap();
        assert_eq!(logger.state(), LoggerState::Running);

        logger.dispose();
        assert_eq!(logger.state(), LoggerState::Terminated);

        logger.dispose();
        assert!(logger.is_terminated());
    }

    #[test]
    fn test_log_after_dispose_is_dropped() {
        let logger = AsyncLogger::builder("A").build().unwrap();
        logger.dispose();

        logger.info("late");
        logger.error("late");

        assert_eq!(logger.metrics().rejected_after_dispose(), 2);
        assert!(matches!(
            logger.try_log(Severity::Warn, "late", None),
            Err(LoggerError::LoggerDisposed { .. })
        ));
    }

    #[test]
    fn test_messages_queued_before_dispose_are_drained() {
        let memory = MemoryAppender::new();
        let logger = AsyncLogger::builder("A")
            .appender(memory.clone())
            .build()
            .unwrap();

        for i in 0..100 {
            logger.info(format!("m{}", i));
        }
        logger.dispose();

        let texts: Vec<String> = memory.entries().into_iter().map(|e| e.message).collect();
        let expected: Vec<String> = (0..100).map(|i| format!("m{}", i)).collect();
        assert_eq!(texts, expected);
        assert_eq!(logger.metrics().pending(), 0);
    }

    #[test]
    fn test_dispose_from_subscriber_does_not_deadlock() {
        let logger = Arc::new(AsyncLogger::builder("A").build().unwrap());
        let weak = Arc::downgrade(&logger);
        let (done_tx, done_rx) = bounded(1);

        logger.broadcaster().subscribe(move |_| {
            if let Some(logger) = weak.upgrade() {
                logger.dispose();
                let _ = done_tx.try_send(());
            }
        });

        logger.info("stop");
        done_rx.recv_timeout(WAIT).expect("subscriber ran");

        // Exit was only requested from the worker thread; this call joins
        logger.dispose();
        assert!(logger.is_terminated());
    }

    #[test]
    fn test_appender_failure_isolated() {
        struct Broken;

        impl Appender for Broken {
            fn append(&mut self, _entry: &LogEntry) -> Result<()> {
                Err(LoggerError::writer("closed"))
            }

            fn flush(&mut self) -> Result<()> {
                Ok(())
            }

            fn name(&self) -> &str {
                "broken"
            }
        }

        let memory = MemoryAppender::new();
        let logger = AsyncLogger::builder("A")
            .appender(Broken)
            .appender(memory.clone())
            .build()
            .unwrap();

        logger.info("still delivered");
        logger.dispose();

        assert_eq!(memory.len(), 1);
        assert_eq!(logger.metrics().sink_failures(), 1);
        assert_eq!(logger.metrics().processed(), 1);
    }

    #[test]
    fn test_dispose_survives_panicking_flush() {
        struct PanicOnFlush;

        impl Appender for PanicOnFlush {
            fn append(&mut self, _entry: &LogEntry) -> Result<()> {
                Ok(())
            }

            fn flush(&mut self) -> Result<()> {
                panic!("flush failed")
            }

            fn name(&self) -> &str {
                "panic-on-flush"
            }
        }

        let logger = AsyncLogger::builder("A")
            .appender(PanicOnFlush)
            .build()
            .unwrap();
        logger.info("x");

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| logger.dispose()));

        assert!(result.is_ok());
        assert!(logger.is_terminated());
        assert_eq!(logger.metrics().processed(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = AsyncLogger::builder("A")
            .lock_policy(LockRetryPolicy::new(0, Duration::from_millis(5)))
            .build();
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_worker_thread_is_named() {
        let logger = AsyncLogger::builder("Grid").build().unwrap();
        let (_id, rx) = logger.broadcaster().subscribe_channel();
        let names = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let names_clone = Arc::clone(&names);
        logger.broadcaster().subscribe(move |_| {
            names_clone
                .lock()
                .push(thread::current().name().map(String::from));
        });

        logger.info("x");
        recv_lines(&rx, 1);
        logger.dispose();

        assert_eq!(*names.lock(), vec![Some("relay-log:Grid".to_string())]);
    }
}
