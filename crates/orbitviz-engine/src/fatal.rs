//! Process-terminating error policy.
//!
//! The library reports failures as values. Binaries that want the classic
//! debug-tool behavior (print the error, exit immediately) opt in here.

use std::fmt::Display;
use std::sync::{Mutex, PoisonError};

static EXIT_LOCK: Mutex<()> = Mutex::new(());

/// Exits the process while holding a process-wide lock.
///
/// Two threads failing at the same time cannot interleave their final
/// messages with the exit; the second one blocks until the process is gone.
pub fn exit_thread_safe(code: i32) -> ! {
    let _guard = EXIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    log::logger().flush();
    std::process::exit(code);
}

/// Logs `err` at error level and exits with status 1.
pub fn fatal(err: impl Display) -> ! {
    log::error!("{err:#}");
    exit_thread_safe(1);
}

/// Converts a recoverable result into the fatal policy.
pub trait OrExit<T> {
    /// Returns the success value or terminates the process.
    fn or_exit(self) -> T;
}

impl<T, E: Display> OrExit<T> for Result<T, E> {
    fn or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => fatal(e),
        }
    }
}
