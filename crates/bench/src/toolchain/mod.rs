//! Simulator toolchain invocation.
//!
//! This module defines the seam between the runner and the external HDL
//! toolchain. It provides:
//! 1. **The [`Simulator`] trait:** Build and run operations the session loop
//!    calls against any backend.
//! 2. **The [`Ghdl`] backend:** Composes and spawns `ghdl` command lines and
//!    carries the cosimulation framework contract via environment variables.
//!
//! Keeping the trait at this seam lets the session be tested with a recorded
//! mock instead of a real toolchain install.

use crate::catalog::Testbench;
use crate::common::BenchError;
use crate::discovery::TestSuite;

/// HDL toolchain backend.
pub mod ghdl;

pub use ghdl::Ghdl;

/// A simulator toolchain that can build a testbench group and run selected
/// tests against it.
pub trait Simulator {
    /// Analyzes and elaborates the group's sources into its build directory.
    fn build(&self, name: &str, bench: &Testbench) -> Result<(), BenchError>;

    /// Runs the selected test cases of one suite against the built group.
    ///
    /// An empty `testcases` slice means "let the framework run everything in
    /// the module".
    fn run_tests(
        &self,
        name: &str,
        bench: &Testbench,
        suite: &TestSuite,
        testcases: &[String],
    ) -> Result<(), BenchError>;
}
