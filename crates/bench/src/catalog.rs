//! Testbench catalog.
//!
//! The catalog is the runner's only persistent data model: a mapping from
//! testbench group name to the HDL sources and top-level entity that group
//! simulates. It provides:
//! 1. **Lookup:** Name-keyed access with unique keys and deterministic order.
//! 2. **Validation:** Existence checks on the listed HDL sources before a
//!    group is handed to the toolchain.
//!
//! Entries are built from the configuration at startup and live in memory
//! for the duration of the process.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::common::BenchError;

/// A single testbench group: the HDL sources to analyze and the entity to
/// elaborate.
///
/// Source order is the analysis order handed to the toolchain; files a unit
/// depends on come before the unit that instantiates them.
#[derive(Debug, Clone, Deserialize)]
pub struct Testbench {
    /// HDL source files, in analysis order.
    pub sources: Vec<PathBuf>,
    /// Name of the top-level entity to elaborate and simulate.
    pub toplevel: String,
}

/// Name-keyed collection of [`Testbench`] entries.
///
/// Keys are unique by construction and iteration is sorted by name, so the
/// numbered menu the session prints is stable across runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    benches: BTreeMap<String, Testbench>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog the original project shipped with: one SPI group wiring
    /// a master and a slave under a `spi_top` entity.
    pub fn builtin() -> Self {
        let mut benches = BTreeMap::new();
        let _ = benches.insert(
            "spi".to_string(),
            Testbench {
                sources: vec![
                    PathBuf::from("vhdl/spi/slave.vhd"),
                    PathBuf::from("vhdl/spi/master.vhd"),
                    PathBuf::from("vhdl/spi/top_level.vhd"),
                ],
                toplevel: "spi_top".to_string(),
            },
        );
        Self { benches }
    }

    /// Inserts or replaces a group, returning the previous entry if the name
    /// was already present.
    pub fn insert(&mut self, name: impl Into<String>, bench: Testbench) -> Option<Testbench> {
        self.benches.insert(name.into(), bench)
    }

    /// Returns the group registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Testbench> {
        self.benches.get(name)
    }

    /// Iterates group names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.benches.keys().map(String::as_str)
    }

    /// Number of registered groups.
    pub fn len(&self) -> usize {
        self.benches.len()
    }

    /// Whether the catalog has no groups.
    pub fn is_empty(&self) -> bool {
        self.benches.is_empty()
    }

    /// Looks up `name` and verifies the entry is runnable: it must list at
    /// least one source and every listed source must exist on disk.
    ///
    /// # Errors
    ///
    /// [`BenchError::UnknownBench`], [`BenchError::EmptySources`], or
    /// [`BenchError::MissingSource`] for the first source that is absent.
    pub fn validate(&self, name: &str) -> Result<&Testbench, BenchError> {
        let bench = self
            .benches
            .get(name)
            .ok_or_else(|| BenchError::UnknownBench(name.to_string()))?;

        if bench.sources.is_empty() {
            return Err(BenchError::EmptySources(name.to_string()));
        }
        for source in &bench.sources {
            if !source.exists() {
                return Err(BenchError::MissingSource {
                    name: name.to_string(),
                    path: source.clone(),
                });
            }
        }
        Ok(bench)
    }
}
