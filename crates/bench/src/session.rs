//! Interactive session loop.
//!
//! Drives the nested menus of the runner: select a testbench group, select a
//! discovered suite, select a test (or all of them), then build and run.
//! Reader and writer are injected so whole sessions can be scripted in
//! tests; the binary passes locked stdin/stdout.
//!
//! Toolchain failures are deliberately non-fatal here: they are printed and
//! the menu continues, matching how the tool is used at a lab bench. Only
//! I/O failures on the menu streams end the session with an error.

use std::io::{BufRead, Write};

use tracing::warn;

use crate::catalog::Testbench;
use crate::common::BenchError;
use crate::config::Config;
use crate::discovery::{self, TestSuite};
use crate::menu::{Choice, prompt_choice};
use crate::toolchain::Simulator;

/// The interactive menu session.
///
/// Borrows the loaded configuration and a toolchain backend; owns no state
/// of its own beyond the dialogue position, which lives on the stack of
/// [`Session::run`].
pub struct Session<'a> {
    config: &'a Config,
    sim: &'a dyn Simulator,
}

impl<'a> Session<'a> {
    /// Creates a session over a configuration and a toolchain backend.
    pub fn new(config: &'a Config, sim: &'a dyn Simulator) -> Self {
        Self { config, sim }
    }

    /// Runs the menu loop until the user quits or input ends.
    ///
    /// Returns `Ok(())` on quit; the process maps that to exit code 0.
    ///
    /// # Errors
    ///
    /// Only I/O failures on the menu streams. Toolchain and discovery
    /// failures are reported to `out` and the loop continues.
    pub fn run<R, W>(&self, input: &mut R, out: &mut W) -> Result<(), BenchError>
    where
        R: BufRead,
        W: Write,
    {
        loop {
            let names: Vec<&str> = self.config.benches.names().collect();
            if names.is_empty() {
                writeln!(out, "No testbenches configured.")?;
                return Ok(());
            }

            writeln!(out, "\nTestbenches:")?;
            for (index, name) in names.iter().enumerate() {
                writeln!(out, "{}: {}", index + 1, name)?;
            }

            let name =
                match prompt_choice(input, out, "Select a testbench", names.len(), false, false)? {
                    Choice::Quit => return Ok(()),
                    Choice::Index(i) => names[i].to_string(),
                    Choice::All | Choice::Back => continue,
                };

            let bench = match self.config.benches.validate(&name) {
                Ok(bench) => bench.clone(),
                Err(e) => {
                    warn!(group = %name, error = %e, "testbench not runnable");
                    writeln!(out, "Testbench '{name}' is not runnable: {e}")?;
                    continue;
                }
            };

            let tests_dir = &self.config.general.tests_dir;
            let suites = match discovery::discover(tests_dir) {
                Ok(suites) => suites,
                Err(e) => {
                    writeln!(out, "Test discovery failed: {e}")?;
                    continue;
                }
            };
            if suites.is_empty() {
                writeln!(out, "No test files found in {}.", tests_dir.display())?;
                continue;
            }

            // With a single suite the menu would have one entry; go straight in.
            let suite = if suites.len() == 1 {
                suites[0].clone()
            } else {
                writeln!(out, "\nTest suites:")?;
                for (index, suite) in suites.iter().enumerate() {
                    writeln!(out, "{}: {}", index + 1, suite.module)?;
                }
                match prompt_choice(
                    input,
                    out,
                    "Select a suite (b for back)",
                    suites.len(),
                    false,
                    true,
                )? {
                    Choice::Quit => return Ok(()),
                    Choice::Index(i) => suites[i].clone(),
                    Choice::All | Choice::Back => continue,
                }
            };

            loop {
                if suite.tests.is_empty() {
                    writeln!(out, "No tests found in {}.", suite.module)?;
                    break;
                }

                writeln!(out, "\nTests in {}:", suite.module)?;
                for (index, test) in suite.tests.iter().enumerate() {
                    writeln!(out, "{}. {}", index + 1, test)?;
                }

                match prompt_choice(
                    input,
                    out,
                    "Select a test (a for all, b for back)",
                    suite.tests.len(),
                    true,
                    true,
                )? {
                    Choice::Quit => return Ok(()),
                    Choice::Back => break,
                    Choice::All => {
                        writeln!(out, "Running all tests in {}...", suite.module)?;
                        self.build_and_run(out, &name, &bench, &suite, &suite.tests)?;
                        break;
                    }
                    Choice::Index(i) => {
                        let test = suite.tests[i].clone();
                        writeln!(out, "Running test: {test}")?;
                        self.build_and_run(out, &name, &bench, &suite, std::slice::from_ref(&test))?;
                        break;
                    }
                }
            }
        }
    }

    /// Builds the group, then runs the selection; failures of either step
    /// are reported and swallowed so the menu survives a broken build.
    fn build_and_run<W: Write>(
        &self,
        out: &mut W,
        name: &str,
        bench: &Testbench,
        suite: &TestSuite,
        tests: &[String],
    ) -> Result<(), BenchError> {
        if let Err(e) = self.sim.build(name, bench) {
            writeln!(out, "Unable to build {name}: {e}")?;
            return Ok(());
        }
        writeln!(out, "Successfully built {name}\n")?;

        if let Err(e) = self.sim.run_tests(name, bench, suite, tests) {
            writeln!(out, "Unable to run tests: {e}")?;
        }
        Ok(())
    }
}
