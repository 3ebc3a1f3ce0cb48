//! Registry of named loggers
//!
//! A [`LogRegistry`] owns one global logger plus one logger per distinct name,
//! all publishing to the same [`Broadcaster`]. Applications construct it at
//! startup and pass it (or an `Arc` of it) to whoever needs a logger; it
//! disposes every logger when dropped. [`LogRegistry::instance`] gives the
//! process-wide registry for code that cannot be handed one.

use super::{
    appender::Appender,
    broadcaster::Broadcaster,
    call_site::CallSite,
    config::{LevelGate, LoggerConfig},
    error::{LoggerError, Result},
    lock_policy::LockRetryPolicy,
    log::Log,
    logger::AsyncLogger,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Name of the registry's unnamed logger
pub const GLOBAL_LOGGER_NAME: &str = "Global";

/// Builds the appenders of each logger the registry creates
pub type AppenderFactory = Arc<dyn Fn(&str) -> Vec<Box<dyn Appender>> + Send + Sync>;

static INSTANCE: OnceLock<LogRegistry> = OnceLock::new();

pub struct LogRegistry {
    global: Arc<AsyncLogger>,
    named: Mutex<HashMap<String, Arc<AsyncLogger>>>,
    broadcaster: Arc<Broadcaster>,
    config: LoggerConfig,
    appender_factory: Option<AppenderFactory>,
    disposed: AtomicBool,
    /// Held for the whole dispose cascade
    dispose_lock: Mutex<()>,
}

impl LogRegistry {
    /// Registry with default configuration and no appenders
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> LogRegistryBuilder {
        LogRegistryBuilder::new()
    }

    /// The process-wide registry, created on first use.
    ///
    /// Concurrent first calls construct it exactly once; every caller sees
    /// the same fully built instance. It is never dropped, so call
    /// [`dispose`](Self::dispose) on it before the process exits.
    ///
    /// # Panics
    ///
    /// Panics if the global logger's worker thread cannot be started.
    pub fn instance() -> &'static LogRegistry {
        INSTANCE.get_or_init(|| match LogRegistry::new() {
            Ok(registry) => registry,
            Err(e) => panic!("failed to initialise the process-wide log registry: {}", e),
        })
    }

    fn spawn_logger(&self, name: &str) -> Result<AsyncLogger> {
        let appenders = self
            .appender_factory
            .as_ref()
            .map(|factory| factory(name))
            .unwrap_or_default();

        AsyncLogger::builder(name)
            .config(self.config.clone())
            .appenders(appenders)
            .broadcaster(Arc::clone(&self.broadcaster))
            .build()
    }

    /// Logger for `name`, created on first request.
    ///
    /// The first caller for a name creates the logger under the registry lock;
    /// every later caller gets the same instance.
    pub fn get_logger(&self, name: &str) -> Result<Arc<AsyncLogger>> {
        let mut named = self.named.lock();
        if self.is_disposed() {
            return Err(LoggerError::RegistryDisposed);
        }

        if let Some(logger) = named.get(name) {
            return Ok(Arc::clone(logger));
        }

        let logger = Arc::new(self.spawn_logger(name)?);
        named.insert(name.to_string(), Arc::clone(&logger));
        Ok(logger)
    }

    /// Logger keyed by the canonical name of `T`
    ///
    /// ```
    /// use relay_log::LogRegistry;
    ///
    /// struct GridBinding;
    ///
    /// let registry = LogRegistry::new().unwrap();
    /// let logger = registry.get_logger_for::<GridBinding>().unwrap();
    /// assert!(logger.name().ends_with("GridBinding"));
    /// ```
    pub fn get_logger_for<T: ?Sized>(&self) -> Result<Arc<AsyncLogger>> {
        self.get_logger(std::any::type_name::<T>())
    }

    /// The unnamed logger behind the registry's own logging methods
    pub fn global(&self) -> &Arc<AsyncLogger> {
        &self.global
    }

    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }

    /// Names of the loggers created so far
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.named.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Dispose every named logger, then the global one.
    ///
    /// Returns once every worker thread has been joined. After this no new
    /// logger can be created; handles obtained earlier stay valid but drop
    /// whatever they are asked to log. Repeated calls only join workers that
    /// are still running.
    ///
    /// A call made while another one is running waits for it to finish,
    /// except on one of the registry's own worker threads: there it returns
    /// at once, since the running dispose is joining that very thread.
    pub fn dispose(&self) {
        let _cascade = if self.on_worker_thread() {
            match self.dispose_lock.try_lock() {
                Some(guard) => guard,
                None => return,
            }
        } else {
            self.dispose_lock.lock()
        };

        // Every logger is visited even on repeated calls: a logger that
        // disposed itself from its own worker still needs a join.
        let loggers: Vec<Arc<AsyncLogger>> = {
            let named = self.named.lock();
            self.disposed.store(true, Ordering::Release);
            named.values().cloned().collect()
        };

        for logger in &loggers {
            logger.dispose();
        }
        self.global.dispose();
    }

    fn on_worker_thread(&self) -> bool {
        self.global.is_worker_thread()
            || self
                .named
                .lock()
                .values()
                .any(|logger| logger.is_worker_thread())
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.global.debug(message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.global.info(message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.global.warn(message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.global.error(message);
    }

    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.global.fatal(message);
    }

    pub fn error_at(&self, message: impl Into<String>, call_site: CallSite) {
        self.global.error_at(message, call_site);
    }

    pub fn fatal_at(&self, message: impl Into<String>, call_site: CallSite) {
        self.global.fatal_at(message, call_site);
    }
}

impl Log for LogRegistry {
    fn debug(&self, message: &str) {
        LogRegistry::debug(self, message);
    }

    fn info(&self, message: &str) {
        LogRegistry::info(self, message);
    }

    fn warn(&self, message: &str) {
        LogRegistry::warn(self, message);
    }

    #[track_caller]
    fn error(&self, message: &str) {
        LogRegistry::error(self, message);
    }

    #[track_caller]
    fn fatal(&self, message: &str) {
        LogRegistry::fatal(self, message);
    }

    fn error_at(&self, message: &str, call_site: CallSite) {
        LogRegistry::error_at(self, message, call_site);
    }

    fn fatal_at(&self, message: &str, call_site: CallSite) {
        LogRegistry::fatal_at(self, message, call_site);
    }

    fn dispose(&self) {
        LogRegistry::dispose(self);
    }
}

impl Drop for LogRegistry {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for LogRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogRegistry")
            .field("loggers", &self.logger_names())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Builder for [`LogRegistry`]
///
/// # Example
/// ```
/// use relay_log::prelude::*;
///
/// let registry = LogRegistry::builder()
///     .gate(LevelGate::from_threshold(Severity::Info))
///     .appenders(|_name| vec![Box::new(MemoryAppender::new()) as Box<dyn Appender>])
///     .build()
///     .unwrap();
///
/// registry.get_logger("Grid").unwrap().info("ready");
/// registry.dispose();
/// ```
pub struct LogRegistryBuilder {
    config: LoggerConfig,
    broadcaster: Option<Arc<Broadcaster>>,
    appender_factory: Option<AppenderFactory>,
}

impl LogRegistryBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            broadcaster: None,
            appender_factory: None,
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

    /// Share an existing broadcaster instead of creating one
    #[must_use = "builder methods return a new value"]
    pub fn broadcaster(mut self, broadcaster: Arc<Broadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    /// Appenders for each logger, built once per logger from its name
    #[must_use = "builder methods return a new value"]
    pub fn appenders<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> Vec<Box<dyn Appender>> + Send + Sync + 'static,
    {
        self.appender_factory = Some(Arc::new(factory));
        self
    }

    /// Validate the configuration and start the global logger
    pub fn build(self) -> Result<LogRegistry> {
        self.config.validate()?;

        let broadcaster = self
            .broadcaster
            .unwrap_or_else(|| Arc::new(Broadcaster::new()));
        let appenders = self
            .appender_factory
            .as_ref()
            .map(|factory| factory(GLOBAL_LOGGER_NAME))
            .unwrap_or_default();

        let global = AsyncLogger::builder(GLOBAL_LOGGER_NAME)
            .config(self.config.clone())
            .appenders(appenders)
            .broadcaster(Arc::clone(&broadcaster))
            .build()?;

        Ok(LogRegistry {
            global: Arc::new(global),
            named: Mutex::new(HashMap::new()),
            broadcaster,
            config: self.config,
            appender_factory: self.appender_factory,
            disposed: AtomicBool::new(false),
            dispose_lock: Mutex::new(()),
        })
    }
}

impl Default for LogRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
