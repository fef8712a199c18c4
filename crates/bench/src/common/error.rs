//! Error definitions for the runner and the bus transactors.
//!
//! This module defines the two error families of the crate. It provides:
//! 1. **Runner errors:** Configuration, catalog, discovery, and toolchain failures.
//! 2. **Transfer errors:** Timeout and handshake conditions raised by protocol drivers.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the runner: configuration loading, catalog lookup,
/// test discovery, and simulator toolchain invocation.
///
/// Toolchain variants carry the per-group log path so the user can inspect
/// the full simulator output after a failure.
#[derive(Error, Debug)]
pub enum BenchError {
    /// The configuration file could not be read.
    #[error("failed to read config file '{}': {source}", .path.display())]
    ConfigRead {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON or does not match the schema.
    #[error("failed to parse config file '{}': {source}", .path.display())]
    ConfigParse {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },

    /// A testbench name was requested that is not present in the catalog.
    #[error("unknown testbench '{0}'")]
    UnknownBench(String),

    /// A catalog entry lists no HDL source files.
    #[error("testbench '{0}' has no source files")]
    EmptySources(String),

    /// A catalog entry references an HDL source file that does not exist.
    #[error("testbench '{name}' source file not found: {}", .path.display())]
    MissingSource {
        /// Name of the testbench whose entry is broken.
        name: String,
        /// The missing source path.
        path: PathBuf,
    },

    /// A suite module name was requested that discovery did not find.
    #[error("unknown test suite '{0}'")]
    UnknownSuite(String),

    /// A test name was requested that is not declared in the selected suite.
    #[error("unknown test '{test}' in suite '{suite}'")]
    UnknownTest {
        /// The requested test-function name.
        test: String,
        /// The suite it was looked up in.
        suite: String,
    },

    /// The file-name search pattern could not be compiled.
    #[error("invalid search pattern '{pattern}': {source}")]
    Pattern {
        /// The offending glob pattern.
        pattern: String,
        /// Underlying pattern error.
        source: glob::PatternError,
    },

    /// A scan expression could not be compiled.
    #[error("invalid scan expression: {0}")]
    Scan(#[from] regex::Error),

    /// The simulator executable could not be spawned.
    #[error("failed to launch '{program}': {source}")]
    Launch {
        /// The program that was invoked.
        program: String,
        /// Underlying spawn error (typically `NotFound`).
        source: std::io::Error,
    },

    /// The toolchain exited nonzero while building a testbench.
    #[error("building '{name}' failed ({status}); see {}", .log.display())]
    BuildFailed {
        /// Testbench group that was being built.
        name: String,
        /// Exit status of the failing command.
        status: ExitStatus,
        /// Path to the captured build log.
        log: PathBuf,
    },

    /// The toolchain exited nonzero while running tests.
    #[error("test run for '{name}' failed ({status})")]
    RunFailed {
        /// Testbench group that was being run.
        name: String,
        /// Exit status of the simulation process.
        status: ExitStatus,
    },

    /// Any other I/O failure (reading test files, writing logs, menu I/O).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error conditions raised by the SPI transactors.
///
/// These mirror the two failure modes a clock-synchronized driver can
/// observe: a handshake flag that never changes within the polling budget,
/// and a flag that holds the wrong level after a transfer completes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// A polled signal did not reach the expected level in time.
    #[error("timed out after {cycles} cycles waiting for {waiting_for}")]
    Timeout {
        /// Human-readable description of the awaited condition.
        waiting_for: &'static str,
        /// Number of rising edges that were polled.
        cycles: u64,
    },

    /// The transfer completed but the valid flag never asserted.
    #[error("transfer completed but {flag} not asserted")]
    HandshakeMismatch {
        /// The signal that held the wrong level.
        flag: &'static str,
    },

    /// The word to send does not fit the DUT's shift register.
    #[error("data {data:#x} exceeds data width of {width} bits")]
    WidthExceeded {
        /// The offending word.
        data: u64,
        /// The DUT's data width in bits.
        width: u32,
    },
}
