//! Configuration system for the testbench runner.
//!
//! This module defines all configuration structures used to parameterize the
//! runner. It provides:
//! 1. **Defaults:** Baseline constants (tests directory, toolchain paths,
//!    build directory prefix).
//! 2. **Structures:** Hierarchical config for general options, the simulator
//!    toolchain, and the testbench catalog.
//!
//! Configuration is supplied as JSON (`--config bench.json`) or use
//! `Config::default()` for the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::common::BenchError;

/// Default configuration constants for the runner.
///
/// These values define the baseline behavior when not explicitly overridden
/// in a JSON configuration file.
mod defaults {
    /// Directory scanned for cosimulation test files.
    pub const TESTS_DIR: &str = "tests";

    /// Simulator toolchain executable invoked for analysis, elaboration,
    /// and simulation.
    pub const GHDL_BIN: &str = "ghdl";

    /// VHDL work library name handed to every toolchain invocation.
    pub const WORK_LIB: &str = "top";

    /// Prefix for per-group build directories (`build_<group>`).
    ///
    /// Keeping one directory per group lets two testbenches coexist without
    /// clobbering each other's analyzed units.
    pub const BUILD_PREFIX: &str = "build_";
}

/// Root configuration structure containing all runner settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use tbrun_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.toolchain.ghdl, "ghdl");
/// assert!(config.benches.get("spi").is_some());
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use tbrun_core::config::Config;
///
/// let json = r#"{
///     "general": {
///         "tests_dir": "verification",
///         "log_to_file": true
///     },
///     "toolchain": {
///         "ghdl": "/opt/ghdl/bin/ghdl",
///         "waves": false
///     },
///     "benches": {
///         "uart": {
///             "sources": ["vhdl/uart/rx.vhd", "vhdl/uart/tx.vhd", "vhdl/uart/top.vhd"],
///             "toplevel": "uart_top"
///         }
///     }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert!(config.general.log_to_file);
/// assert_eq!(config.benches.get("uart").unwrap().toplevel, "uart_top");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// General runner settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Simulator toolchain settings
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    /// Testbench catalog (group name → sources + top-level entity)
    #[serde(default = "Catalog::builtin")]
    pub benches: Catalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            toolchain: ToolchainConfig::default(),
            benches: Catalog::builtin(),
        }
    }
}

impl Config {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// [`BenchError::ConfigRead`] when the file cannot be read,
    /// [`BenchError::ConfigParse`] when it is not valid config JSON.
    pub fn from_json_file(path: &Path) -> Result<Self, BenchError> {
        let text = fs::read_to_string(path).map_err(|source| BenchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| BenchError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// General runner settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Directory scanned (recursively) for test files
    #[serde(default = "GeneralConfig::default_tests_dir")]
    pub tests_dir: PathBuf,

    /// Tee simulation output to `<group>_test.log` in addition to the console
    #[serde(default)]
    pub log_to_file: bool,
}

impl GeneralConfig {
    /// Returns the default test-file directory.
    fn default_tests_dir() -> PathBuf {
        PathBuf::from(defaults::TESTS_DIR)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            tests_dir: PathBuf::from(defaults::TESTS_DIR),
            log_to_file: false,
        }
    }
}

/// Simulator toolchain settings.
///
/// Everything the runner needs to compose `ghdl` invocations: the executable,
/// the work library, build-directory layout, waveform capture, and the
/// cosimulation framework's VPI plugin.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolchainConfig {
    /// Toolchain executable name or path
    #[serde(default = "ToolchainConfig::default_ghdl")]
    pub ghdl: String,

    /// VHDL work library name
    #[serde(default = "ToolchainConfig::default_work_lib")]
    pub work_lib: String,

    /// Prefix for per-group build directories
    #[serde(default = "ToolchainConfig::default_build_prefix")]
    pub build_prefix: String,

    /// Remove the build directory before building
    #[serde(default = "ToolchainConfig::default_clean")]
    pub clean: bool,

    /// Capture a `<group>.ghw` waveform during simulation
    #[serde(default = "ToolchainConfig::default_waves")]
    pub waves: bool,

    /// Path to the cosimulation framework's VPI plugin, passed to the
    /// simulator as `--vpi=<path>`. When unset the simulation runs without
    /// the framework attached.
    #[serde(default)]
    pub vpi: Option<PathBuf>,
}

impl ToolchainConfig {
    /// Returns the default toolchain executable.
    fn default_ghdl() -> String {
        defaults::GHDL_BIN.to_string()
    }

    /// Returns the default work library name.
    fn default_work_lib() -> String {
        defaults::WORK_LIB.to_string()
    }

    /// Returns the default build-directory prefix.
    fn default_build_prefix() -> String {
        defaults::BUILD_PREFIX.to_string()
    }

    /// Clean builds by default; stale analyzed units confuse elaboration.
    fn default_clean() -> bool {
        true
    }

    /// Waveform capture defaults to on.
    fn default_waves() -> bool {
        true
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            ghdl: defaults::GHDL_BIN.to_string(),
            work_lib: defaults::WORK_LIB.to_string(),
            build_prefix: defaults::BUILD_PREFIX.to_string(),
            clean: true,
            waves: true,
            vpi: None,
        }
    }
}
