//! Test discovery.
//!
//! Finds cosimulation test files and the test functions they declare. It
//! performs:
//! 1. **File scan:** Recursive search of the tests directory for files named
//!    `test_*.py`.
//! 2. **Declaration scan:** A line scan of each file for the framework's
//!    test decorator followed by an `async def` declaration.
//! 3. **Module naming:** Derivation of the dotted module name the framework
//!    imports the suite by.
//!
//! Discovery never executes or parses the test files as a program; the
//! decorator match is purely textual, which is exactly what the framework's
//! own collection tolerates.

use std::fs;
use std::path::{Path, PathBuf};

use glob::glob;
use regex::Regex;
use tracing::debug;

use crate::common::BenchError;

/// A discovered test file: where it lives, what module name it imports as,
/// and which test functions it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSuite {
    /// Path of the test file.
    pub path: PathBuf,
    /// Dotted module name (e.g. `tests.spi.test_spi_master`).
    pub module: String,
    /// Test-function names declared in the file, in declaration order.
    pub tests: Vec<String>,
}

/// Finds all test files under `dir` and its subdirectories.
///
/// A test file is any regular file whose name starts with `test_` and ends
/// with `.py`. Results come back in alphabetical order (the glob walk is
/// ordered), so menu numbering is stable.
///
/// # Errors
///
/// [`BenchError::Pattern`] if `dir` cannot be turned into a search pattern.
pub fn find_test_files(dir: &Path) -> Result<Vec<PathBuf>, BenchError> {
    let pattern = dir.join("**").join("test_*.py");
    let pattern = pattern.to_string_lossy().into_owned();

    let walker = glob(&pattern).map_err(|source| BenchError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let files = walker
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    Ok(files)
}

/// Finds test functions declared in one file.
///
/// A line matching the framework's test decorator (with or without
/// parentheses) arms the scanner; the next `async def <name>(` line yields
/// `<name>`. A decorator with no following declaration before end of file
/// yields nothing. Commented-out decorators do not arm the scanner.
///
/// # Errors
///
/// I/O failure reading the file, or (never in practice) a scan-expression
/// compile failure.
pub fn find_tests(path: &Path) -> Result<Vec<String>, BenchError> {
    let decorator = Regex::new(r"^\s*@cocotb\.test\s*($|\()")?;
    let declaration = Regex::new(r"^\s*async\s+def\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(")?;

    let text = fs::read_to_string(path)?;
    let mut tests = Vec::new();
    let mut armed = false;

    for line in text.lines() {
        if armed {
            if let Some(caps) = declaration.captures(line) {
                tests.push(caps[1].to_string());
                armed = false;
                continue;
            }
        }
        if decorator.is_match(line) {
            armed = true;
        }
    }
    Ok(tests)
}

/// Scans `dir` and returns one [`TestSuite`] per discovered test file.
///
/// Files that declare no tests are still returned (with an empty test list)
/// so the caller can report them; an empty or missing directory yields an
/// empty vector, not an error.
///
/// # Errors
///
/// Propagates [`find_test_files`] and [`find_tests`] failures.
pub fn discover(dir: &Path) -> Result<Vec<TestSuite>, BenchError> {
    let mut suites = Vec::new();
    for path in find_test_files(dir)? {
        let tests = find_tests(&path)?;
        let module = module_name(dir, &path);
        debug!(file = %path.display(), module = %module, count = tests.len(), "discovered suite");
        suites.push(TestSuite {
            path,
            module,
            tests,
        });
    }
    Ok(suites)
}

/// Derives the dotted module name the framework imports a suite by.
///
/// The name is the path relative to the scan root with the extension
/// stripped and separators replaced by dots, prefixed with the scan root's
/// own directory name: `tests/spi/test_spi_master.py` becomes
/// `tests.spi.test_spi_master`.
fn module_name(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    let stem = rel.with_extension("");

    let mut parts: Vec<String> = Vec::new();
    if let Some(base) = root.file_name() {
        parts.push(base.to_string_lossy().into_owned());
    }
    parts.extend(
        stem.components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join(".")
}
