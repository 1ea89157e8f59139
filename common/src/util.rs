use std::ffi::CString;
use std::fmt::Display;

use log::{Level, LevelFilter, Log, Metadata, Record};

pub trait AsCString {
    fn as_c_string(&self) -> CString;
}

impl AsCString for String {
    fn as_c_string(&self) -> CString {
        CString::new(self.clone()).unwrap_or_default()
    }
}

impl AsCString for &str {
    fn as_c_string(&self) -> CString {
        self.to_string().as_c_string()
    }
}

/// Writes to the debugger output channel, never to stdout.
#[cfg(windows)]
pub fn output_debug_string(s: &str) {
    use windows::{core::PCSTR, Win32::System::Diagnostics::Debug::OutputDebugStringA};

    let message = s.as_c_string();
    unsafe {
        OutputDebugStringA(PCSTR(message.as_ptr() as _));
    }
}

#[cfg(not(windows))]
pub fn output_debug_string(s: &str) {
    eprint!("{s}");
}

pub fn format_record(level: Level, target: &str, message: impl Display) -> String {
    format!("[{level:<5} {target}] {message}\n")
}

/// `log` backend that forwards every record to [`output_debug_string`].
pub struct DebugOutputLogger;

impl Log for DebugOutputLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            output_debug_string(&format_record(
                record.level(),
                record.target(),
                record.args(),
            ));
        }
    }

    fn flush(&self) {}
}

static LOGGER: DebugOutputLogger = DebugOutputLogger;

pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Installs [`DebugOutputLogger`]. Later calls leave the first logger in place.
pub fn init_logging() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(default_level());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_format() {
        assert_eq!(
            format_record(Level::Error, "common::d3d11", "VSMain failed"),
            "[ERROR common::d3d11] VSMain failed\n"
        );
        assert_eq!(
            format_record(Level::Info, "minimal_d3d11", 3),
            "[INFO  minimal_d3d11] 3\n"
        );
    }

    #[test]
    fn interior_nul_yields_empty_c_string() {
        assert_eq!("ab\0c".as_c_string().as_bytes(), b"");
        assert_eq!("VSMain".as_c_string().as_bytes(), b"VSMain");
    }

    #[test]
    fn errors_pass_in_every_build() {
        assert!(Level::Error <= default_level());
        assert!(Level::Warn <= default_level());
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging();
        init_logging();
        assert_eq!(log::max_level(), default_level());
    }
}
