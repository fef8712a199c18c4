//! HDL testbench runner library.
//!
//! This crate implements an interactive runner for GHDL cosimulation
//! testbenches with the following:
//! 1. **Catalog:** Named testbench groups mapping HDL sources to a top-level
//!    entity.
//! 2. **Discovery:** Recursive test-file search and textual scanning for
//!    framework test declarations.
//! 3. **Toolchain:** Build and run invocations against `ghdl`, with the
//!    cosimulation framework attached over VPI and steered via environment.
//! 4. **Session:** The nested testbench → suite → test menus.
//! 5. **Transactors:** SPI master/slave drivers synchronized to clock edges.

/// Testbench catalog (group name → sources + top-level entity).
pub mod catalog;
/// Shared types and error definitions.
pub mod common;
/// Runner configuration (defaults, hierarchical config structures).
pub mod config;
/// Test-file and test-function discovery.
pub mod discovery;
/// Menu input parsing and prompting.
pub mod menu;
/// The interactive session loop.
pub mod session;
/// Simulator toolchain trait and the GHDL backend.
pub mod toolchain;
/// Clock-edge-synchronized protocol drivers.
pub mod transactor;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Testbench catalog and entry types.
pub use crate::catalog::{Catalog, Testbench};
/// Runner error type.
pub use crate::common::BenchError;
/// The interactive session; construct with `Session::new`.
pub use crate::session::Session;
/// Toolchain seam and the GHDL backend.
pub use crate::toolchain::{Ghdl, Simulator};
