//! Exit codes for the aipack CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing and
//! are a stable contract for automation.

/// Exit codes for aipack operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Run completed and the archive was written
    Success = 0,

    /// A fatal validation invariant failed; nothing was written
    ValidationFailed = 2,

    /// A resource failure (template, staging, copy, archive) halted the run
    ResourceFailed = 3,

    /// Invalid arguments or configuration
    ConfigError = 4,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.code()
    }
}
