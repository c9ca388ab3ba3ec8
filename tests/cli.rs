//! Integration tests running the `kmeans-em` binary.
//!
//! # Tests
//! - `cluster_writes_error_and_labels`: table in, error line plus one label per row out
//! - `cluster_default_seeding_with_reseed`: range seeding separates the two groups when empty clusters are reseeded
//! - `generated_table_can_be_clustered`: `generate` output is valid `cluster` input
//! - `name_count_checked_before_input`: a name/k mismatch fails without touching the input
//! - `missing_input_fails`: non-existent input table gives a non-zero exit code

use std::{fs, path::Path, process::{Command, Output}};
use tempfile::TempDir;

const TWO_GROUPS: &str = "0,0\n0,1\n1,0\n10,10\n10,11\n11,10\n";

fn kmeans_em(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kmeans-em"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run kmeans-em")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path is not utf-8")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "kmeans-em failed.\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn assert_two_group_labels(result: &str) {
    let lines: Vec<&str> = result.lines().collect();
    assert_eq!(lines.len(), 7, "unexpected result:\n{}", result);
    assert_eq!(lines[0], "error = 3.924");
    assert_eq!(lines[1], lines[2]);
    assert_eq!(lines[2], lines[3]);
    assert_eq!(lines[4], lines[5]);
    assert_eq!(lines[5], lines[6]);
    assert_ne!(lines[1], lines[4]);
    assert!(lines[1..].iter().all(|l| *l == "near" || *l == "far"));
}

#[test]
fn cluster_writes_error_and_labels() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("data.csv");
    let output = temp_dir.path().join("result.txt");
    fs::write(&input, TWO_GROUPS).unwrap();

    let result = kmeans_em(&[
        "cluster", "-k", "2", "-n", "near,far", "-i", path_arg(&input), "-o", path_arg(&output),
        "--init", "sample", "--seed", "0",
    ]);
    assert_success(&result);
    assert_two_group_labels(&fs::read_to_string(&output).unwrap());
}

#[test]
fn cluster_default_seeding_with_reseed() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("data.csv");
    fs::write(&input, TWO_GROUPS).unwrap();

    for seed in ["0", "1", "2", "3"] {
        let output = temp_dir.path().join(format!("result-{}.txt", seed));
        let result = kmeans_em(&[
            "cluster", "-k", "2", "-n", "near,far", "-i", path_arg(&input), "-o", path_arg(&output),
            "--empty-clusters", "reseed", "--seed", seed,
        ]);
        assert_success(&result);
        assert_two_group_labels(&fs::read_to_string(&output).unwrap());
    }
}

#[test]
fn generated_table_can_be_clustered() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let table = temp_dir.path().join("gen.csv");
    let output = temp_dir.path().join("result.txt");

    let generated = kmeans_em(&["generate", "-d", "3", "-r", "200", "-o", path_arg(&table), "--seed", "5"]);
    assert_success(&generated);
    assert_eq!(fs::read_to_string(&table).unwrap().lines().count(), 200);

    let result = kmeans_em(&[
        "cluster", "-k", "4", "-n", "a,b,c,d", "-i", path_arg(&table), "-o", path_arg(&output),
        "--seed", "5", "--empty-clusters", "reseed",
    ]);
    assert_success(&result);
    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text.lines().count(), 201);
    assert!(text.starts_with("error = "));
    assert!(text.lines().skip(1).all(|l| ["a", "b", "c", "d"].contains(&l)));
}

#[test]
fn name_count_checked_before_input() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("does-not-exist.csv");
    let output = temp_dir.path().join("result.txt");

    let result = kmeans_em(&["cluster", "-k", "2", "-n", "only", "-i", path_arg(&input), "-o", path_arg(&output)]);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("invalid cluster names"), "stderr: {}", stderr);
    assert!(!stderr.contains("failed to load"), "stderr: {}", stderr);
    assert!(!output.exists());
}

#[test]
fn missing_input_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("does-not-exist.csv");
    let output = temp_dir.path().join("result.txt");

    let result = kmeans_em(&["cluster", "-k", "2", "-n", "a,b", "-i", path_arg(&input), "-o", path_arg(&output)]);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("failed to load"), "stderr: {}", stderr);
    assert!(!output.exists());
}
