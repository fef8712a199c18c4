//! GHDL toolchain backend.
//!
//! Composes and spawns the three `ghdl` invocations a testbench needs:
//! 1. **Import** (`ghdl -i`): analyze the group's sources into the work
//!    library.
//! 2. **Elaborate** (`ghdl -m`): make the top-level entity.
//! 3. **Run** (`ghdl -r`): simulate, with the cosimulation framework
//!    attached through its VPI plugin and steered via `MODULE` /
//!    `TESTCASE` / `TOPLEVEL` environment variables.
//!
//! Each group builds into its own `build_<group>` directory; combined
//! toolchain output is captured to `build.log` there, and test output can be
//! tee'd to `<group>_test.log`.
//!
//! The composed argument vectors and environment are exposed as methods so
//! tests can assert on invocations without a toolchain install.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use tracing::{debug, info};

use crate::catalog::Testbench;
use crate::common::BenchError;
use crate::config::{Config, ToolchainConfig};
use crate::discovery::TestSuite;
use crate::toolchain::Simulator;

/// GHDL backend for the [`Simulator`] trait.
#[derive(Debug, Clone)]
pub struct Ghdl {
    toolchain: ToolchainConfig,
    log_to_file: bool,
}

impl Ghdl {
    /// Creates a backend from the loaded configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            toolchain: config.toolchain.clone(),
            log_to_file: config.general.log_to_file,
        }
    }

    /// Build directory for a group (`<prefix><group>`).
    pub fn build_dir(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.toolchain.build_prefix, name))
    }

    /// Arguments for the import (analysis) step.
    pub fn import_args(&self, name: &str, bench: &Testbench) -> Vec<String> {
        let mut args = vec![
            "-i".to_string(),
            format!("--workdir={}", self.build_dir(name).display()),
            format!("--work={}", self.toolchain.work_lib),
        ];
        args.extend(
            bench
                .sources
                .iter()
                .map(|s| s.to_string_lossy().into_owned()),
        );
        args
    }

    /// Arguments for the elaboration (make) step.
    pub fn elaborate_args(&self, name: &str, bench: &Testbench) -> Vec<String> {
        vec![
            "-m".to_string(),
            format!("--workdir={}", self.build_dir(name).display()),
            format!("--work={}", self.toolchain.work_lib),
            bench.toplevel.clone(),
        ]
    }

    /// Arguments for the simulation step, including the VPI plugin and the
    /// waveform plusarg when those are configured.
    pub fn run_args(&self, name: &str, bench: &Testbench) -> Vec<String> {
        let mut args = vec![
            "-r".to_string(),
            format!("--workdir={}", self.build_dir(name).display()),
            format!("--work={}", self.toolchain.work_lib),
            bench.toplevel.clone(),
        ];
        if let Some(vpi) = &self.toolchain.vpi {
            args.push(format!("--vpi={}", vpi.display()));
        }
        if self.toolchain.waves {
            args.push(format!("--wave={name}.ghw"));
        }
        args
    }

    /// Environment the cosimulation framework reads: the module to import,
    /// the top-level entity, and (when a selection was made) the
    /// comma-joined test cases.
    pub fn run_env(&self, bench: &Testbench, suite: &TestSuite, testcases: &[String]) -> Vec<(String, String)> {
        let mut env = vec![
            ("MODULE".to_string(), suite.module.clone()),
            ("TOPLEVEL".to_string(), bench.toplevel.clone()),
        ];
        if !testcases.is_empty() {
            env.push(("TESTCASE".to_string(), testcases.join(",")));
        }
        env
    }

    /// Spawns one toolchain invocation and returns its status and combined
    /// stdout/stderr.
    fn invoke(
        &self,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<(ExitStatus, Vec<u8>), BenchError> {
        debug!(program = %self.toolchain.ghdl, ?args, "spawning toolchain");
        let output = Command::new(&self.toolchain.ghdl)
            .args(args)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|source| BenchError::Launch {
                program: self.toolchain.ghdl.clone(),
                source,
            })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        Ok((output.status, combined))
    }
}

impl Simulator for Ghdl {
    fn build(&self, name: &str, bench: &Testbench) -> Result<(), BenchError> {
        let dir = self.build_dir(name);
        if self.toolchain.clean && dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;

        info!(group = name, dir = %dir.display(), "building testbench");

        let log_path = dir.join("build.log");
        let mut log = Vec::new();
        let stages = [
            self.import_args(name, bench),
            self.elaborate_args(name, bench),
        ];
        for args in &stages {
            let (status, out) = self.invoke(args, &[])?;
            io::stdout().write_all(&out)?;
            log.extend_from_slice(&out);
            if !status.success() {
                fs::write(&log_path, &log)?;
                return Err(BenchError::BuildFailed {
                    name: name.to_string(),
                    status,
                    log: log_path,
                });
            }
        }
        fs::write(&log_path, &log)?;
        Ok(())
    }

    fn run_tests(
        &self,
        name: &str,
        bench: &Testbench,
        suite: &TestSuite,
        testcases: &[String],
    ) -> Result<(), BenchError> {
        let args = self.run_args(name, bench);
        let env = self.run_env(bench, suite, testcases);

        info!(group = name, module = %suite.module, cases = testcases.len(), "running tests");

        let (status, out) = self.invoke(&args, &env)?;
        io::stdout().write_all(&out)?;
        if self.log_to_file {
            fs::write(format!("{name}_test.log"), &out)?;
        }
        if !status.success() {
            return Err(BenchError::RunFailed {
                name: name.to_string(),
                status,
            });
        }
        Ok(())
    }
}
