//! # Toolchain Tests
//!
//! Assertions on the composed `ghdl` invocations (no toolchain install
//! needed) plus build-directory and log handling against stand-in
//! executables.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tbrun_core::catalog::Testbench;
use tbrun_core::common::BenchError;
use tbrun_core::config::Config;
use tbrun_core::discovery::TestSuite;
use tbrun_core::toolchain::{Ghdl, Simulator};

fn spi_bench() -> Testbench {
    Testbench {
        sources: vec![
            PathBuf::from("vhdl/spi/slave.vhd"),
            PathBuf::from("vhdl/spi/master.vhd"),
            PathBuf::from("vhdl/spi/top_level.vhd"),
        ],
        toplevel: "spi_top".to_string(),
    }
}

fn spi_suite() -> TestSuite {
    TestSuite {
        path: PathBuf::from("tests/test_spi.py"),
        module: "tests.test_spi".to_string(),
        tests: vec!["test_basic_transfer".to_string()],
    }
}

#[test]
fn test_build_dir_uses_prefix() {
    let ghdl = Ghdl::new(&Config::default());
    assert_eq!(ghdl.build_dir("spi"), PathBuf::from("build_spi"));

    let mut config = Config::default();
    config.toolchain.build_prefix = "out/".to_string();
    let ghdl = Ghdl::new(&config);
    assert_eq!(ghdl.build_dir("spi"), PathBuf::from("out/spi"));
}

#[test]
fn test_import_args_list_sources_in_order() {
    let ghdl = Ghdl::new(&Config::default());
    let args = ghdl.import_args("spi", &spi_bench());

    assert_eq!(
        args,
        vec![
            "-i",
            "--workdir=build_spi",
            "--work=top",
            "vhdl/spi/slave.vhd",
            "vhdl/spi/master.vhd",
            "vhdl/spi/top_level.vhd",
        ]
    );
}

#[test]
fn test_elaborate_args_name_the_toplevel() {
    let ghdl = Ghdl::new(&Config::default());
    let args = ghdl.elaborate_args("spi", &spi_bench());

    assert_eq!(args, vec!["-m", "--workdir=build_spi", "--work=top", "spi_top"]);
}

#[test]
fn test_run_args_default_carry_wave_plusarg() {
    let ghdl = Ghdl::new(&Config::default());
    let args = ghdl.run_args("spi", &spi_bench());

    assert_eq!(
        args,
        vec![
            "-r",
            "--workdir=build_spi",
            "--work=top",
            "spi_top",
            "--wave=spi.ghw",
        ]
    );
}

#[test]
fn test_run_args_without_waves() {
    let mut config = Config::default();
    config.toolchain.waves = false;
    let ghdl = Ghdl::new(&config);

    let args = ghdl.run_args("spi", &spi_bench());
    assert!(!args.iter().any(|a| a.starts_with("--wave=")));
}

#[test]
fn test_run_args_with_vpi_plugin() {
    let mut config = Config::default();
    config.toolchain.vpi = Some(PathBuf::from("/usr/lib/cocotb/libcocotbvpi_ghdl.so"));
    let ghdl = Ghdl::new(&config);

    let args = ghdl.run_args("spi", &spi_bench());
    assert!(
        args.contains(&"--vpi=/usr/lib/cocotb/libcocotbvpi_ghdl.so".to_string())
    );
    // The plugin comes before the waveform plusarg.
    let vpi = args.iter().position(|a| a.starts_with("--vpi=")).unwrap();
    let wave = args.iter().position(|a| a.starts_with("--wave=")).unwrap();
    assert!(vpi < wave);
}

#[test]
fn test_run_env_carries_framework_contract() {
    let ghdl = Ghdl::new(&Config::default());
    let cases = vec![
        "test_basic_transfer".to_string(),
        "test_loopback".to_string(),
    ];

    let env = ghdl.run_env(&spi_bench(), &spi_suite(), &cases);
    assert_eq!(
        env,
        vec![
            ("MODULE".to_string(), "tests.test_spi".to_string()),
            ("TOPLEVEL".to_string(), "spi_top".to_string()),
            (
                "TESTCASE".to_string(),
                "test_basic_transfer,test_loopback".to_string()
            ),
        ]
    );
}

#[test]
fn test_run_env_omits_testcase_for_full_module() {
    let ghdl = Ghdl::new(&Config::default());

    let env = ghdl.run_env(&spi_bench(), &spi_suite(), &[]);
    assert!(!env.iter().any(|(k, _)| k == "TESTCASE"));
}

#[test]
fn test_build_succeeds_with_stub_toolchain() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    // `true` exits zero for both stages; the prefix keeps the build
    // directory inside the tempdir.
    config.toolchain.ghdl = "true".to_string();
    config.toolchain.build_prefix = format!("{}/build_", dir.path().display());
    let ghdl = Ghdl::new(&config);

    ghdl.build("spi", &spi_bench()).unwrap();

    let build_dir = dir.path().join("build_spi");
    assert!(build_dir.is_dir());
    assert!(build_dir.join("build.log").is_file());
}

#[test]
fn test_build_failure_carries_status_and_log() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.toolchain.ghdl = "false".to_string();
    config.toolchain.build_prefix = format!("{}/build_", dir.path().display());
    let ghdl = Ghdl::new(&config);

    let err = ghdl.build("spi", &spi_bench()).unwrap_err();
    match err {
        BenchError::BuildFailed { name, status, log } => {
            assert_eq!(name, "spi");
            assert!(!status.success());
            assert_eq!(log, dir.path().join("build_spi").join("build.log"));
            assert!(log.is_file());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_toolchain_is_a_launch_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.toolchain.ghdl = "tbrun-no-such-toolchain".to_string();
    config.toolchain.build_prefix = format!("{}/build_", dir.path().display());
    let ghdl = Ghdl::new(&config);

    let err = ghdl.build("spi", &spi_bench()).unwrap_err();
    assert!(matches!(err, BenchError::Launch { program, .. } if program == "tbrun-no-such-toolchain"));
}

#[test]
fn test_run_tests_reports_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.toolchain.ghdl = "false".to_string();
    config.toolchain.waves = false;
    config.toolchain.build_prefix = format!("{}/build_", dir.path().display());
    let ghdl = Ghdl::new(&config);

    let cases = vec!["test_basic_transfer".to_string()];
    let err = ghdl
        .run_tests("spi", &spi_bench(), &spi_suite(), &cases)
        .unwrap_err();
    assert!(matches!(err, BenchError::RunFailed { name, .. } if name == "spi"));
}

#[test]
fn test_clean_build_removes_stale_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.toolchain.ghdl = "true".to_string();
    config.toolchain.build_prefix = format!("{}/build_", dir.path().display());
    let ghdl = Ghdl::new(&config);

    let stale = dir.path().join("build_spi").join("stale.o");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, b"stale").unwrap();

    ghdl.build("spi", &spi_bench()).unwrap();
    assert!(!stale.exists());
}
