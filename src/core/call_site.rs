//! Call-site capture
//!
//! A [`CallSite`] has to be taken on the thread that issues the logging call:
//! once the message is queued the worker thread has no way to recover where it
//! came from. Both constructors are therefore evaluated eagerly at the call
//! boundary.

use serde::Serialize;
use std::fmt;
use std::panic::Location;

/// Source location of a logging call.
///
/// Displayed as `method(line)` when the enclosing function is known and as
/// `file:line` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CallSite {
    /// Enclosing function name
    pub method: Option<&'static str>,
    /// Source file; empty when unknown
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    pub const fn new(method: &'static str, line: u32) -> Self {
        Self {
            method: Some(method),
            file: "",
            line,
        }
    }

    #[must_use]
    pub const fn with_file(mut self, file: &'static str) -> Self {
        self.file = file;
        self
    }

    /// Capture the file and line of the caller.
    ///
    /// Through a chain of `#[track_caller]` functions this resolves to the
    /// first caller without the attribute. The function name is not available
    /// here; the [`error!`](crate::error) and [`fatal!`](crate::fatal) macros
    /// record it.
    #[track_caller]
    #[inline]
    pub fn capture() -> Self {
        let location = Location::caller();
        Self {
            method: None,
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.method {
            Some(method) => write!(f, "{}({})", method, self.line),
            None => write!(f, "{}:{}", self.file, self.line),
        }
    }
}

/// Strip the helper suffix and closure segments from a `type_name` path and
/// return the innermost named function.
#[doc(hidden)]
pub fn innermost_function(path: &'static str) -> &'static str {
    let path = path.strip_suffix("::__f").unwrap_or(path);
    path.rsplit("::")
        .find(|segment| *segment != "{{closure}}")
        .unwrap_or(path)
}

/// Name of the enclosing function, as a `&'static str`.
///
/// ```
/// fn connect() -> &'static str {
///     relay_log::function_name!()
/// }
/// assert_eq!(connect(), "connect");
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __f() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::core::call_site::innermost_function(__type_name_of(__f))
    }};
}

/// [`CallSite`] for the enclosing function and current line.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new($crate::function_name!(), line!()).with_file(file!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_reports_this_file_and_line() {
        let expected_line = line!() + 1;
        let site = CallSite::capture();
        assert_eq!(site.method, None);
        assert!(site.file.ends_with("call_site.rs"), "file was {}", site.file);
        assert_eq!(site.line, expected_line);
        assert_eq!(site.to_string(), format!("{}:{}", site.file, expected_line));
    }

    #[test]
    fn test_capture_through_track_caller() {
        #[track_caller]
        fn wrapper() -> CallSite {
            CallSite::capture()
        }

        let expected_line = line!() + 1;
        let site = wrapper();
        assert_eq!(site.line, expected_line);
    }

    #[test]
    fn test_function_name() {
        fn load_settings() -> &'static str {
            crate::function_name!()
        }
        assert_eq!(load_settings(), "load_settings");
    }

    #[test]
    fn test_function_name_inside_closure() {
        fn run_job() -> &'static str {
            let inner = || crate::function_name!();
            inner()
        }
        assert_eq!(run_job(), "run_job");
    }

    #[test]
    fn test_call_site_macro() {
        let expected_line = line!() + 1;
        let site = crate::call_site!();
        assert_eq!(site.method, Some("test_call_site_macro"));
        assert!(site.file.ends_with("call_site.rs"));
        assert_eq!(site.line, expected_line);
        assert_eq!(site.to_string(), format!("test_call_site_macro({})", expected_line));
    }

    #[test]
    fn test_innermost_function() {
        assert_eq!(innermost_function("app::ui::Grid::refresh::__f"), "refresh");
        assert_eq!(innermost_function("app::load::{{closure}}::__f"), "load");
        assert_eq!(innermost_function("plain"), "plain");
    }
}
