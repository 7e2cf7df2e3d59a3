//! Integration tests for CLI commands

use std::io::Write;
use std::process::{Command, Stdio};

/// Helper to run apivet command
fn apivet(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_apivet"))
        .args(args)
        .output()
        .expect("Failed to execute apivet")
}

/// Helper to run apivet with `input` on stdin
fn apivet_stdin(args: &[&str], input: &str) -> std::process::Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_apivet"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn apivet");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    child.wait_with_output().expect("Failed to wait for apivet")
}

/// Get the fixtures path
fn fixtures_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures")
}

fn fixture(name: &str) -> String {
    format!("{}/{}", fixtures_path(), name)
}

mod detect_command {
    use super::*;

    #[test]
    fn test_removed_exit_code() {
        let output = apivet(&[
            "detect",
            &fixture("manifests/deployment-extensions-v1beta1.yaml"),
        ]);

        assert_eq!(output.status.code(), Some(3));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.starts_with("NAME"));
        assert!(stdout.contains("utilities"));
        assert!(stdout.contains("extensions/v1beta1"));
    }

    #[test]
    fn test_deprecated_exit_code() {
        let output = apivet(&[
            "detect",
            &fixture("manifests/deployment-extensions-v1beta1.yaml"),
            "-t",
            "k8s=v1.10.0",
        ]);

        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_ignore_deprecations() {
        let output = apivet(&[
            "detect",
            &fixture("manifests/deployment-extensions-v1beta1.yaml"),
            "--target-versions",
            "k8s=v1.10.0",
            "--ignore-deprecations",
        ]);

        assert_eq!(output.status.code(), Some(0));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("utilities"), "ignored findings are still shown");
    }

    #[test]
    fn test_unavailable_replacement_is_deprecated() {
        let output = apivet(&[
            "detect",
            &fixture("manifests/ingress-extensions-v1beta1.yaml"),
            "-t",
            "k8s=v1.16.0",
        ]);

        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_replacement_unavailable_exit_code() {
        let output = apivet(&[
            "detect",
            &fixture("manifests/ingress-extensions-v1beta1.yaml"),
            "-t",
            "k8s=v1.15.0",
            "--ignore-removals",
        ]);

        assert_eq!(output.status.code(), Some(4));
    }

    #[test]
    fn test_ignore_unavailable_replacements() {
        let output = apivet(&[
            "detect",
            &fixture("manifests/ingress-extensions-v1beta1.yaml"),
            "-t",
            "k8s=v1.15.0",
            "--ignore-unavailable-replacements",
        ]);

        assert_eq!(output.status.code(), Some(0));
    }

    #[test]
    fn test_clean_file() {
        let output = apivet(&["detect", &fixture("clean/deployment-apps-v1.yaml")]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(
            stdout.trim_end(),
            "There were no resources found with known deprecated apiVersions."
        );
    }

    #[test]
    fn test_filtered_to_nothing() {
        let output = apivet(&[
            "detect",
            &fixture("manifests/deployment-extensions-v1beta1.yaml"),
            "--components",
            "istio",
        ]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(stdout.trim_end(), "No output to display");
    }

    #[test]
    fn test_list_expands_items() {
        let output = apivet(&["detect", &fixture("manifests/list.json"), "-o", "wide"]);

        assert_eq!(output.status.code(), Some(3));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("node-exporter"));
        assert!(stdout.contains("PodDisruptionBudget"));
        assert!(stdout.contains("monitoring"));
        assert!(!stdout.contains(" List "));
    }

    #[test]
    fn test_json_output() {
        let output = apivet(&[
            "detect",
            &fixture("manifests/deployment-extensions-v1beta1.yaml"),
            "-o",
            "json",
        ]);

        assert_eq!(output.status.code(), Some(3));
        let stdout = String::from_utf8_lossy(&output.stdout);
        let json: serde_json::Value =
            serde_json::from_str(&stdout).expect("Output should be valid JSON");

        let item = &json["items"][0];
        assert_eq!(item["name"], "utilities");
        assert_eq!(item["namespace"], "tools");
        assert_eq!(item["api"]["version"], "extensions/v1beta1");
        assert_eq!(item["removed"], true);
        assert!(item["filePath"].as_str().unwrap().ends_with(".yaml"));
        assert_eq!(json["target-versions"]["k8s"], "v1.25.0");
    }

    #[test]
    fn test_stdin() {
        let output = apivet_stdin(
            &["detect", "-", "--no-headers"],
            "apiVersion: batch/v1beta1\nkind: CronJob\nmetadata:\n  name: nightly\n",
        );

        assert_eq!(output.status.code(), Some(3));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.starts_with("nightly"));
    }

    #[test]
    fn test_missing_file() {
        let output = apivet(&["detect", &fixture("manifests/nope.yaml")]);

        assert_eq!(output.status.code(), Some(5));
    }
}

mod configuration_errors {
    use super::*;

    #[test]
    fn test_custom_without_columns() {
        let output = apivet(&[
            "detect",
            &fixture("manifests/deployment-extensions-v1beta1.yaml"),
            "-o",
            "custom",
        ]);

        assert_eq!(output.status.code(), Some(1));
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("--columns"));
    }

    #[test]
    fn test_missing_component_target() {
        let output = apivet(&["list-versions", "--components", "bar"]);

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("target version missing for component bar"));
    }

    #[test]
    fn test_invalid_target_version() {
        let output = apivet(&["list-versions", "-t", "k8s=1.16"]);

        assert_eq!(output.status.code(), Some(1));
    }

    #[test]
    fn test_duplicate_overlay_rule() {
        let output = apivet(&[
            "detect",
            &fixture("manifests/deployment-extensions-v1beta1.yaml"),
            "-f",
            &fixture("versions/duplicate.yaml"),
        ]);

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains("duplicate cannot be added to defaults: Deployment extensions/v1beta1")
        );
    }

    #[test]
    fn test_unknown_column() {
        let output = apivet(&[
            "detect",
            &fixture("manifests/deployment-extensions-v1beta1.yaml"),
            "-o",
            "csv",
            "--columns",
            "name,colour",
        ]);

        assert_eq!(output.status.code(), Some(1));
    }
}

mod additional_versions {
    use super::*;

    #[test]
    fn test_overlay_rule_detected() {
        let output = apivet(&[
            "detect",
            &fixture("manifests/widget.yaml"),
            "--additional-versions",
            &fixture("versions/widgets.yaml"),
        ]);

        assert_eq!(output.status.code(), Some(3));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("gizmo"));
        assert!(stdout.contains("widgets.example.com/v1"));
    }

    #[test]
    fn test_unknown_kind_without_overlay() {
        let output = apivet(&["detect", &fixture("manifests/widget.yaml")]);

        assert!(output.status.success());
    }
}

mod detect_files_command {
    use super::*;

    #[test]
    fn test_walks_tree() {
        let output = apivet(&[
            "detect-files",
            "-d",
            &fixture("tree"),
            "-o",
            "custom",
            "--columns",
            "name,filepath,kind",
        ]);

        assert_eq!(output.status.code(), Some(3));
        let stdout = String::from_utf8_lossy(&output.stdout);
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines.len(), 3, "header plus two findings: {stdout}");
        assert!(lines[1].starts_with("api "));
        assert!(lines[1].contains("app/deployment.yaml"));
        assert!(lines[2].starts_with("nightly "));
        assert!(lines[2].contains("CronJob"));
    }

    #[test]
    fn test_clean_directory() {
        let output = apivet(&["detect-files", "--directory", &fixture("clean")]);

        assert!(output.status.success());
    }

    #[test]
    fn test_only_show_removed() {
        let output = apivet(&[
            "detect-files",
            "-d",
            &fixture("tree"),
            "-t",
            "k8s=v1.22.0",
            "-r",
            "-H",
        ]);

        // the CronJob is only deprecated in 1.22
        assert_eq!(output.status.code(), Some(3));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("api"));
        assert!(!stdout.contains("nightly"));
        assert!(!stdout.contains("NAME"));
    }

    #[test]
    fn test_missing_directory() {
        let output = apivet(&["detect-files", "-d", &fixture("does-not-exist")]);

        assert_eq!(output.status.code(), Some(5));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("specified path does not exist"));
    }

    #[test]
    fn test_markdown_output() {
        let output = apivet(&["detect-files", "-d", &fixture("tree"), "-o", "markdown"]);

        let stdout = String::from_utf8_lossy(&output.stdout);
        let lines: Vec<&str> = stdout.lines().collect();
        assert!(lines[0].starts_with('|'));
        assert!(lines[1].starts_with("|-"));
        assert_eq!(lines.len(), 4);
    }
}

mod list_versions_command {
    use super::*;

    #[test]
    fn test_table() {
        let output = apivet(&["list-versions"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.starts_with("KIND"));
        assert!(stdout.contains("PodDisruptionBudget"));
        assert!(stdout.contains("cert-manager"));
    }

    #[test]
    fn test_json() {
        let output = apivet(&["list-versions", "-o", "json"]);

        assert!(output.status.success());
        let json: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");
        let rules = json["deprecated-versions"].as_array().unwrap();
        assert!(
            rules
                .iter()
                .any(|r| r["kind"] == "Deployment" && r["version"] == "extensions/v1beta1")
        );
        assert_eq!(json["target-versions"]["istio"], "v1.6.0");
    }

    #[test]
    fn test_includes_overlay() {
        let output = apivet(&["list-versions", "-f", &fixture("versions/widgets.yaml")]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Widget"));
    }
}
