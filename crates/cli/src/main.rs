//! HDL testbench runner CLI.
//!
//! This binary provides a single entry point for all runner modes. It performs:
//! 1. **Interactive session:** Menu-driven testbench/suite/test selection (the default).
//! 2. **Direct run:** Build one group and run a test selection without the menus.
//! 3. **Listing:** Print the catalog and every discovered suite and test.

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use tbrun_core::config::Config;
use tbrun_core::discovery;
use tbrun_core::session::Session;
use tbrun_core::toolchain::{Ghdl, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "tbrun",
    author,
    version,
    about = "Interactive GHDL testbench runner",
    long_about = "Run GHDL cosimulation testbenches from a menu, a one-shot command, or a listing.\n\nConfiguration is JSON (see --config); without it the built-in catalog is used.\n\nExamples:\n  tbrun\n  tbrun run --bench spi --all\n  tbrun run --bench spi --suite tests.test_spi --test test_basic_transfer\n  tbrun list"
)]
struct Cli {
    /// JSON configuration file (defaults to the built-in configuration).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory scanned for test files (overrides the configuration).
    #[arg(long, global = true)]
    tests_dir: Option<PathBuf>,

    /// Disable waveform capture.
    #[arg(long, global = true)]
    no_waves: bool,

    /// Tee simulation output to <group>_test.log.
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build one testbench group and run a test selection without the menus.
    Run {
        /// Testbench group to build and run.
        #[arg(short, long)]
        bench: String,

        /// Suite module to run (defaults to the first discovered suite).
        #[arg(short, long)]
        suite: Option<String>,

        /// Test name to run; repeat for several. Mutually exclusive with --all.
        #[arg(short, long, conflicts_with = "all")]
        test: Vec<String>,

        /// Run every test in the suite.
        #[arg(short, long)]
        all: bool,
    },

    /// List testbench groups, discovered suites, and test names.
    List,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli);

    match cli.command {
        None => run_interactive(&config),
        Some(Commands::Run {
            bench,
            suite,
            test,
            all,
        }) => cmd_run(&config, &bench, suite.as_deref(), &test, all),
        Some(Commands::List) => cmd_list(&config),
    }
}

/// Loads the configuration (file or defaults) and applies the CLI overrides.
///
/// Exits the process with code 1 on a config error.
fn load_config(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            process::exit(1);
        }),
        None => Config::default(),
    };

    if let Some(dir) = &cli.tests_dir {
        config.general.tests_dir.clone_from(dir);
    }
    if cli.no_waves {
        config.toolchain.waves = false;
    }
    if cli.log_file {
        config.general.log_to_file = true;
    }
    config
}

/// Runs the interactive menu session on stdin/stdout; quit maps to exit 0.
fn run_interactive(config: &Config) {
    let ghdl = Ghdl::new(config);
    let session = Session::new(config, &ghdl);

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = session.run(&mut stdin.lock(), &mut stdout.lock()) {
        eprintln!("Session failed: {e}");
        process::exit(1);
    }
}

/// One-shot build-and-run of a selection, for scripts and CI.
fn cmd_run(config: &Config, name: &str, suite: Option<&str>, tests: &[String], all: bool) {
    let bench = config
        .benches
        .validate(name)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            process::exit(1);
        })
        .clone();

    let suites = discovery::discover(&config.general.tests_dir).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });
    if suites.is_empty() {
        eprintln!(
            "Error: no test files found in {}",
            config.general.tests_dir.display()
        );
        process::exit(1);
    }

    let suite = match suite {
        Some(module) => suites
            .iter()
            .find(|s| s.module == module)
            .unwrap_or_else(|| {
                eprintln!("Error: unknown test suite '{module}'");
                eprintln!("Discovered suites:");
                for s in &suites {
                    eprintln!("  {}", s.module);
                }
                process::exit(1);
            })
            .clone(),
        None => suites[0].clone(),
    };

    for test in tests {
        if !suite.tests.contains(test) {
            eprintln!("Error: unknown test '{}' in suite '{}'", test, suite.module);
            process::exit(1);
        }
    }
    let selected = if all || tests.is_empty() {
        suite.tests.clone()
    } else {
        tests.to_vec()
    };
    if selected.is_empty() {
        eprintln!("Error: no tests found in suite '{}'", suite.module);
        process::exit(1);
    }

    let ghdl = Ghdl::new(config);
    if let Err(e) = ghdl.build(name, &bench) {
        eprintln!("Unable to build {name}: {e}");
        process::exit(1);
    }
    println!("Successfully built {name}\n");
    if let Err(e) = ghdl.run_tests(name, &bench, &suite, &selected) {
        eprintln!("Unable to run tests: {e}");
        process::exit(1);
    }
}

/// Prints the catalog, then every discovered suite and its tests.
fn cmd_list(config: &Config) {
    println!("Testbenches:");
    if config.benches.is_empty() {
        println!("  (none configured)");
    }
    for name in config.benches.names() {
        println!("  {name}");
    }

    let dir = &config.general.tests_dir;
    match discovery::discover(dir) {
        Ok(suites) if suites.is_empty() => {
            println!("\nNo test files found in {}.", dir.display());
        }
        Ok(suites) => {
            println!("\nSuites in {}:", dir.display());
            for suite in suites {
                println!("  {} ({} tests)", suite.module, suite.tests.len());
                for test in &suite.tests {
                    println!("    {test}");
                }
            }
        }
        Err(e) => {
            eprintln!("Test discovery failed: {e}");
            process::exit(1);
        }
    }
}
