//! Logging interface shared by loggers and the registry

use super::call_site::CallSite;

/// The five-method logging interface plus disposal.
///
/// `error` and `fatal` record the caller's location: through `#[track_caller]`
/// when called directly, or explicitly via `error_at` / `fatal_at` (which the
/// [`error!`](crate::error) and [`fatal!`](crate::fatal) macros use to record
/// the enclosing function name).
pub trait Log: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    #[track_caller]
    fn error(&self, message: &str);
    #[track_caller]
    fn fatal(&self, message: &str);
    fn error_at(&self, message: &str, call_site: CallSite);
    fn fatal_at(&self, message: &str, call_site: CallSite);
    fn dispose(&self);
}
