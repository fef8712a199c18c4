//! Shared types used across the crate.
//!
//! Currently this holds the error definitions; menu and session code pull
//! [`BenchError`] from here, the transactors pull [`TransferError`].

/// Runner and transactor error types.
pub mod error;

pub use error::{BenchError, TransferError};
