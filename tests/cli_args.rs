//! Integration tests for CLI argument handling
//!
//! Tests the --view flag and view parsing from the command line.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_demoras"))
        .args(args)
        .output()
        .expect("Failed to execute demoras")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("demoras"), "Help should mention demoras");
    assert!(stdout.contains("view"), "Help should mention --view flag");
    assert!(stdout.contains("demo"), "Help should mention --demo flag");
}

#[test]
fn test_invalid_view_prints_error_and_exits() {
    let output = run_cli(&["--view", "cockpit"]);
    assert!(!output.status.success(), "Expected invalid view to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid view") || stderr.contains("invalid"),
        "Should print error message about invalid view: {}",
        stderr
    );
}

#[test]
fn test_view_with_gates_is_valid() {
    // This test just verifies the argument is accepted (doesn't error immediately)
    // The actual state transition is tested in unit tests
    let output = run_cli(&["--view", "gates", "--help"]);
    // With --help, it should succeed regardless of other flags
    // This is a workaround since we can't easily test TUI apps
    assert!(output.status.success());
}

#[test]
fn test_demo_flag_is_accepted() {
    let output = run_cli(&["--demo", "--help"]);
    assert!(output.status.success());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use demoras::cli::{parse_view_arg, Cli, StartupConfig, View};

    #[test]
    fn test_cli_no_args_returns_none_view() {
        let cli = Cli::parse_from(["demoras"]);
        assert!(cli.view.is_none());
    }

    #[test]
    fn test_cli_view_flag_with_routes() {
        let cli = Cli::parse_from(["demoras", "--view", "routes"]);
        assert_eq!(cli.view.as_deref(), Some("routes"));
    }

    #[test]
    fn test_cli_refresh_and_demo_flags() {
        let cli = Cli::parse_from(["demoras", "--refresh", "--demo"]);
        assert!(cli.refresh);
        assert!(cli.demo);
    }

    #[test]
    fn test_parse_view_arg_gates_returns_gates() {
        let result = parse_view_arg("gates");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), View::Gates);
    }

    #[test]
    fn test_parse_view_arg_spanish_alias() {
        let result = parse_view_arg("rutas");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), View::Routes);
    }

    #[test]
    fn test_parse_view_arg_invalid_returns_error() {
        let result = parse_view_arg("cockpit");
        assert!(result.is_err());
    }

    #[test]
    fn test_startup_config_default_opens_overview() {
        let config = StartupConfig::default();
        assert!(config.initial_view.is_none());
        assert!(!config.demo);
    }

    #[test]
    fn test_startup_config_from_cli_no_view() {
        let cli = Cli::parse_from(["demoras"]);
        let config = StartupConfig::from_cli(&cli);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert!(config.initial_view.is_none());
        assert!(!config.force_refresh);
    }

    #[test]
    fn test_startup_config_from_cli_view_and_manifest_url() {
        let cli = Cli::parse_from([
            "demoras",
            "--view",
            "overview",
            "--manifest-url",
            "https://example.com/data/manifest.json",
        ]);
        let config = StartupConfig::from_cli(&cli);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.initial_view, Some(View::Overview));
        assert_eq!(
            config.manifest_url.as_deref(),
            Some("https://example.com/data/manifest.json")
        );
    }

    #[test]
    fn test_startup_config_from_cli_invalid_view() {
        let cli = Cli::parse_from(["demoras", "--view", "cockpit"]);
        let config = StartupConfig::from_cli(&cli);
        assert!(config.is_err());
    }
}
