//! SPI master and slave transactors.
//!
//! Pin-level drivers for a DUT exposing the usual start/busy/valid transfer
//! handshake on the master side and a data-valid handshake on the slave
//! side. The drivers are written against the [`SpiDut`] trait so they run
//! identically over any clock-edge scheduler; tests bind them to a
//! behavioral model.
//!
//! A transfer from the master's point of view:
//! 1. present the word and pulse `start_transfer` for one cycle;
//! 2. wait for `master_busy` to assert, then to deassert (both bounded);
//! 3. after one settling edge, `master_valid` must be high;
//! 4. the exchanged word is read from `master_data_out`.

use crate::common::TransferError;

/// Default polling budget, in rising edges, for every handshake wait.
pub const DEFAULT_TIMEOUT: u64 = 1000;

/// Pin-level view of an SPI design under test.
///
/// Implementors provide signal accessors and a way to advance simulated
/// time to the next rising edge of the system clock. Setters take effect at
/// the following edge, the way a testbench drives registered inputs.
pub trait SpiDut {
    /// Width of the shift registers in bits.
    fn data_width(&self) -> u32;
    /// Advances the simulation to the next rising edge of the system clock.
    fn rising_edge(&mut self);

    /// Drives the synchronous reset line.
    fn set_rst(&mut self, high: bool);
    /// Drives the transfer-start strobe.
    fn set_start_transfer(&mut self, high: bool);
    /// Presents the word the master will shift out.
    fn set_master_data_in(&mut self, word: u64);
    /// Drives the clock-polarity select.
    fn set_cpol(&mut self, high: bool);
    /// Drives the clock-phase select.
    fn set_cpha(&mut self, high: bool);

    /// Whether a transfer is in flight.
    fn master_busy(&self) -> bool;
    /// Whether `master_data_out` holds a completed exchange.
    fn master_valid(&self) -> bool;
    /// The word the master shifted in.
    fn master_data_out(&self) -> u64;

    /// Presents the word the slave will answer with.
    fn set_slave_data_in(&mut self, word: u64);
    /// Whether `slave_data_out` holds a received word.
    fn slave_data_valid(&self) -> bool;
    /// The word the slave shifted in.
    fn slave_data_out(&self) -> u64;
}

/// The four SPI clocking modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpiMode {
    /// CPOL=0, CPHA=0.
    #[default]
    Mode0,
    /// CPOL=0, CPHA=1.
    Mode1,
    /// CPOL=1, CPHA=0.
    Mode2,
    /// CPOL=1, CPHA=1.
    Mode3,
}

impl SpiMode {
    /// Clock polarity for this mode.
    pub fn cpol(self) -> bool {
        matches!(self, Self::Mode2 | Self::Mode3)
    }

    /// Clock phase for this mode.
    pub fn cpha(self) -> bool {
        matches!(self, Self::Mode1 | Self::Mode3)
    }
}

/// Master-side transactor.
#[derive(Debug, Clone)]
pub struct SpiMaster {
    /// Polling budget, in rising edges, for each handshake wait.
    pub timeout: u64,
}

impl Default for SpiMaster {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SpiMaster {
    /// Creates a master transactor with a custom polling budget.
    pub fn with_timeout(timeout: u64) -> Self {
        Self { timeout }
    }

    /// Drives every master-side input to its idle level.
    pub fn init(&self, dut: &mut dyn SpiDut) {
        dut.set_start_transfer(false);
        dut.set_master_data_in(0);
        dut.set_cpol(false);
        dut.set_cpha(false);
    }

    /// Resets the DUT: reset asserted for two rising edges, then released.
    pub fn reset(&self, dut: &mut dyn SpiDut) {
        dut.set_rst(true);
        dut.rising_edge();
        dut.rising_edge();
        dut.set_rst(false);
        dut.rising_edge();
    }

    /// Selects the SPI clocking mode and lets it settle for one edge.
    pub fn configure_mode(&self, dut: &mut dyn SpiDut, mode: SpiMode) {
        dut.set_cpol(mode.cpol());
        dut.set_cpha(mode.cpha());
        dut.rising_edge();
    }

    /// Sends one word and returns the word shifted in from the slave.
    ///
    /// # Errors
    ///
    /// [`TransferError::WidthExceeded`] when the word does not fit the DUT's
    /// shift register, [`TransferError::Timeout`] when the busy handshake
    /// never moves, [`TransferError::HandshakeMismatch`] when the transfer
    /// completes without `master_valid` asserting.
    pub fn send_data(&self, dut: &mut dyn SpiDut, word: u64) -> Result<u64, TransferError> {
        let width = dut.data_width();
        if bit_length(word) > width {
            return Err(TransferError::WidthExceeded { data: word, width });
        }

        dut.set_master_data_in(word);
        dut.rising_edge();

        // One-cycle start strobe.
        dut.set_start_transfer(true);
        dut.rising_edge();
        dut.set_start_transfer(false);

        let mut asserted = false;
        for _ in 0..self.timeout {
            dut.rising_edge();
            if dut.master_busy() {
                asserted = true;
                break;
            }
        }
        if !asserted {
            return Err(TransferError::Timeout {
                waiting_for: "master_busy to assert",
                cycles: self.timeout,
            });
        }

        let mut completed = false;
        for _ in 0..self.timeout {
            dut.rising_edge();
            if !dut.master_busy() {
                completed = true;
                break;
            }
        }
        if !completed {
            return Err(TransferError::Timeout {
                waiting_for: "transfer to complete",
                cycles: self.timeout,
            });
        }

        // One settling edge before sampling the result.
        dut.rising_edge();

        if !dut.master_valid() {
            return Err(TransferError::HandshakeMismatch {
                flag: "master_valid",
            });
        }
        Ok(dut.master_data_out())
    }

    /// Sends a byte sequence, one transfer per byte, returning the bytes
    /// shifted in from the slave.
    ///
    /// # Errors
    ///
    /// The first [`send_data`](Self::send_data) failure aborts the sequence.
    pub fn send_bytes(&self, dut: &mut dyn SpiDut, data: &[u8]) -> Result<Vec<u8>, TransferError> {
        let mut received = Vec::with_capacity(data.len());
        for &byte in data {
            let word = self.send_data(dut, u64::from(byte))?;
            received.push(word as u8);
        }
        Ok(received)
    }
}

/// Slave-side transactor.
#[derive(Debug, Clone)]
pub struct SpiSlave {
    /// Polling budget, in rising edges, for the receive wait.
    pub timeout: u64,
}

impl Default for SpiSlave {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SpiSlave {
    /// Creates a slave transactor with a custom polling budget.
    pub fn with_timeout(timeout: u64) -> Self {
        Self { timeout }
    }

    /// Presents the word the slave will answer the next transfer with.
    pub fn load_response(&self, dut: &mut dyn SpiDut, word: u64) {
        dut.set_slave_data_in(word);
        dut.rising_edge();
    }

    /// Returns the word the slave received, polling `slave_data_valid` once
    /// per rising edge.
    ///
    /// # Errors
    ///
    /// [`TransferError::Timeout`] when no valid word arrives within the
    /// budget.
    pub fn received_data(&self, dut: &mut dyn SpiDut) -> Result<u64, TransferError> {
        for _ in 0..self.timeout {
            dut.rising_edge();
            if dut.slave_data_valid() {
                return Ok(dut.slave_data_out());
            }
        }
        Err(TransferError::Timeout {
            waiting_for: "slave_data_valid",
            cycles: self.timeout,
        })
    }
}

/// Number of significant bits in `word` (zero for zero).
fn bit_length(word: u64) -> u32 {
    u64::BITS - word.leading_zeros()
}
