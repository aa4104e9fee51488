//! Runs the `kmg` binary end to end.

use std::path::Path;
use std::process::{Command, Output};

fn kmg(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kmg"))
        .args(args)
        .output()
        .unwrap()
}

fn write(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path.display().to_string()
}

const POD: &str = r#"apiVersion: v1
kind: Pod
metadata:
  labels:
    app: application
spec:
  containers:
  - image: nginx:latest
    resources:
        limits:
            cpu: "500Mi"
            memory: "256m"
"#;

#[test]
fn resource_limit_text_output() {
    let dir = tempfile::tempdir().unwrap();
    let pod = write(dir.path(), "pod.yaml", POD);
    let out = kmg(&[
        "resource-limit",
        "--type",
        "limits",
        "--resource",
        "memory",
        "--max",
        "64m",
        &pod,
    ]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("spec.containers[0].resources.limits.memory"));
    assert!(stdout.contains("exceeds maximum of 64M"));
}

#[test]
fn annotation_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let pod = write(dir.path(), "pod.yaml", POD);
    let out = kmg(&[
        "--format",
        "json",
        "annotation",
        "--name",
        "mycompany.io/annotation",
        &pod,
    ]);
    assert_eq!(out.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["filesScanned"], 1);
    assert_eq!(report["findings"][0]["location"], "metadata");
    assert_eq!(
        report["findings"][0]["message"],
        "missing:mycompany.io/annotation"
    );
}

#[test]
fn scan_with_check_file_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let checks = write(
        dir.path(),
        "checks.yaml",
        "checks:\n  - kind: resource-limit\n    resourceValueType: limits\n    resourceType: memory\n    resourceLimit: 1Gi\n",
    );
    let manifests = dir.path().join("manifests");
    std::fs::create_dir(&manifests).unwrap();
    write(&manifests, "pod.yaml", POD);
    let out = kmg(&["scan", "--config", &checks, &manifests.display().to_string()]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Scanned 1 file(s), 1 document(s): 0 finding(s), 0 error(s)"));
}

#[test]
fn bad_check_file_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let checks = write(dir.path(), "checks.yaml", "checks:\n  - kind: unknown\n");
    let pod = write(dir.path(), "pod.yaml", POD);
    let out = kmg(&["scan", "--config", &checks, &pod]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8(out.stderr).unwrap().contains("failed to parse check file"));
}
