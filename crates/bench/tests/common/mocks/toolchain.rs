use std::cell::RefCell;
use std::io;

use mockall::mock;
use tbrun_core::catalog::Testbench;
use tbrun_core::common::BenchError;
use tbrun_core::discovery::TestSuite;
use tbrun_core::toolchain::Simulator;

mock! {
    pub Toolchain {}
    impl Simulator for Toolchain {
        fn build(&self, name: &str, bench: &Testbench) -> Result<(), BenchError>;
        fn run_tests(
            &self,
            name: &str,
            bench: &Testbench,
            suite: &TestSuite,
            testcases: &[String],
        ) -> Result<(), BenchError>;
    }
}

/// One recorded toolchain invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolchainCall {
    /// A `build` call for the named group.
    Build {
        /// Group name.
        name: String,
    },
    /// A `run_tests` call and its selection.
    Run {
        /// Group name.
        name: String,
        /// Suite module name.
        module: String,
        /// Selected test cases, in order.
        testcases: Vec<String>,
    },
}

/// A toolchain that records every call and succeeds or fails on demand.
///
/// Session code holds `&dyn Simulator`, so recording goes through a
/// `RefCell`; session tests are single-threaded.
#[derive(Debug, Default)]
pub struct RecordingToolchain {
    /// Every call, in order.
    pub calls: RefCell<Vec<ToolchainCall>>,
    /// When true, `build` fails with a launch error.
    pub fail_build: bool,
    /// When true, `run_tests` fails with a launch error.
    pub fail_run: bool,
}

impl RecordingToolchain {
    fn launch_error() -> BenchError {
        BenchError::Launch {
            program: "ghdl".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "mock"),
        }
    }

    /// The calls recorded so far.
    pub fn calls(&self) -> Vec<ToolchainCall> {
        self.calls.borrow().clone()
    }
}

impl Simulator for RecordingToolchain {
    fn build(&self, name: &str, _bench: &Testbench) -> Result<(), BenchError> {
        self.calls.borrow_mut().push(ToolchainCall::Build {
            name: name.to_string(),
        });
        if self.fail_build {
            return Err(Self::launch_error());
        }
        Ok(())
    }

    fn run_tests(
        &self,
        name: &str,
        _bench: &Testbench,
        suite: &TestSuite,
        testcases: &[String],
    ) -> Result<(), BenchError> {
        self.calls.borrow_mut().push(ToolchainCall::Run {
            name: name.to_string(),
            module: suite.module.clone(),
            testcases: testcases.to_vec(),
        });
        if self.fail_run {
            return Err(Self::launch_error());
        }
        Ok(())
    }
}
