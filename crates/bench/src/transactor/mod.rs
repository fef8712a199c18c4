//! Protocol transactors.
//!
//! Drivers that stimulate a simulated design through its pin-level
//! interface, synchronized to clock edges. The simulation scheduler itself
//! is an external collaborator; transactors only set signal levels, wait for
//! rising edges, and poll handshake flags against a bounded cycle budget.

/// SPI master/slave bus transactors.
pub mod spi;

pub use spi::{SpiDut, SpiMaster, SpiMode, SpiSlave};
