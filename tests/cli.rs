use assert_cmd::Command;
use predicates::prelude::*;

mod common;

fn segset() -> Command {
    Command::cargo_bin("segset").unwrap()
}

#[test]
fn runs() {
    segset().assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = segset();
    cmd.arg("-V");
    cmd.assert().success().stdout("segset 0.1.0\n");
}

// Process subcommand tests

#[test]
fn process_builds_records_and_reports_invalid_ones() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let raw = common::write_raw_project(temp.path());
    let out = temp.path().join("project.json");

    segset()
        .arg("process")
        .arg(&raw)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 annotation(s): 2 valid, 1 invalid"));

    let project = common::read_json(&out);
    let annotations = project["annotations"].as_array().expect("annotations");
    assert_eq!(annotations.len(), 3);
    assert_eq!(annotations[1]["point_count"], 6);
    assert_eq!(annotations[2]["validation"]["is_valid"], false);
}

#[test]
fn process_with_simplify_drops_jitter() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let raw = common::write_raw_project(temp.path());
    let out = temp.path().join("project.json");

    segset()
        .arg("process")
        .arg(&raw)
        .arg("-o")
        .arg(&out)
        .arg("--simplify")
        .assert()
        .success();

    let project = common::read_json(&out);
    assert_eq!(project["annotations"][1]["point_count"], 4);
}

#[test]
fn process_rejects_unknown_image() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let mut raw = common::raw_project_json();
    raw["annotations"][0]["image_id"] = 99.into();
    let path = temp.path().join("raw.json");
    common::write_json(&path, &raw);

    segset()
        .arg("process")
        .arg(&path)
        .arg("-o")
        .arg(temp.path().join("out.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("99"));
}

#[test]
fn process_reads_config_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let raw = common::write_raw_project(temp.path());
    let config = temp.path().join("segset.yaml");
    std::fs::write(&config, "min_points: 5\n").expect("write config");
    let out = temp.path().join("project.json");

    segset()
        .arg("--config")
        .arg(&config)
        .arg("process")
        .arg(&raw)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 valid, 2 invalid"));
}

#[test]
fn process_rejects_out_of_range_config() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let raw = common::write_raw_project(temp.path());
    let config = temp.path().join("segset.yaml");
    std::fs::write(&config, "min_area: -1.0\n").expect("write config");

    segset()
        .arg("--config")
        .arg(&config)
        .arg("process")
        .arg(&raw)
        .arg("-o")
        .arg(temp.path().join("project.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_area"));
}

// Validate subcommand tests

#[test]
fn validate_reports_self_intersection() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let project = common::processed_project(temp.path());

    segset()
        .arg("validate")
        .arg(&project)
        .assert()
        .failure()
        .stdout(predicate::str::contains("1 error(s)"))
        .stdout(predicate::str::contains("SelfIntersecting in annotation 3"));
}

#[test]
fn validate_json_output_format() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let project = common::processed_project(temp.path());

    segset()
        .arg("validate")
        .arg(&project)
        .args(["--output", "json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"error_count\": 1"))
        .stdout(predicate::str::contains("\"code\": \"SelfIntersecting\""));
}

#[test]
fn validate_clean_project_succeeds() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let mut raw = common::raw_project_json();
    raw["annotations"]
        .as_array_mut()
        .expect("annotations")
        .truncate(1);
    let raw_path = temp.path().join("raw.json");
    common::write_json(&raw_path, &raw);
    let project = temp.path().join("project.json");

    segset()
        .arg("process")
        .arg(&raw_path)
        .arg("-o")
        .arg(&project)
        .assert()
        .success();

    segset()
        .arg("validate")
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation passed"));
}

#[test]
fn validate_nonexistent_file_fails() {
    segset()
        .args(["validate", "nonexistent_project.json"])
        .assert()
        .failure();
}

// Simplify subcommand tests

#[test]
fn simplify_reports_reduction() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let project = common::processed_project(temp.path());
    let out = temp.path().join("simplified.json");

    segset()
        .arg("simplify")
        .arg(&project)
        .arg("-o")
        .arg(&out)
        .args(["--tolerance", "0.002"])
        .assert()
        .success()
        .stdout(predicate::str::contains("14 -> 12 points"));

    let simplified = common::read_json(&out);
    assert_eq!(simplified["annotations"][1]["point_count"], 4);
    assert_eq!(simplified["annotations"][1]["simplification"], 0.002);
}

#[test]
fn simplify_rejects_negative_tolerance() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let project = common::processed_project(temp.path());

    segset()
        .arg("simplify")
        .arg(&project)
        .arg("-o")
        .arg(temp.path().join("out.json"))
        .arg("--tolerance=-1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("tolerance"));
}

// Stats subcommand tests

#[test]
fn stats_text_lists_classes() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let project = common::processed_project(temp.path());

    segset()
        .arg("stats")
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("cell"))
        .stdout(predicate::str::contains("nucleus"));
}

#[test]
fn stats_json_counts_annotations() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let project = common::processed_project(temp.path());

    let output = segset()
        .arg("stats")
        .arg(&project)
        .args(["--output", "json"])
        .output()
        .expect("run stats");
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stats json");
    assert_eq!(stats["annotations"]["total"], 3);
    assert_eq!(stats["annotations"]["valid"], 2);
    assert_eq!(stats["images"]["total"], 2);
}

// Split subcommand tests

#[test]
fn split_is_reproducible_with_seed() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let project = common::processed_project(temp.path());
    let (a, b) = (temp.path().join("a.json"), temp.path().join("b.json"));

    for out in [&a, &b] {
        segset()
            .arg("split")
            .arg(&project)
            .arg("-o")
            .arg(out)
            .args(["--train", "0.5", "--val", "0.5", "--seed", "42"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 train, 1 val, 0 test"));
    }

    assert_eq!(
        std::fs::read(&a).expect("read a"),
        std::fs::read(&b).expect("read b")
    );
}

#[test]
fn split_rejects_ratios_over_one() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let project = common::processed_project(temp.path());

    segset()
        .arg("split")
        .arg(&project)
        .arg("-o")
        .arg(temp.path().join("out.json"))
        .args(["--train", "0.9", "--val", "0.5"])
        .assert()
        .failure();
}

// Export subcommand tests

#[test]
fn export_yolo_writes_archive() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let project = common::processed_project(temp.path());
    let archive = temp.path().join("out").join("dataset.zip");

    segset()
        .arg("export")
        .arg(&project)
        .args(["--format", "yolo"])
        .arg("-o")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 annotation(s) from 2 image(s) as yolo"))
        .stdout(predicate::str::contains("1 invalid"));

    let mut names = common::zip_entry_names(&archive);
    names.sort();
    assert_eq!(
        names,
        vec![
            "classes.txt",
            "dataset_info.json",
            "labels/train/slide_a.txt",
            "labels/train/slide_b.txt",
        ]
    );
}

#[test]
fn export_coco_with_images_dir() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let project = common::processed_project(temp.path());
    let images = temp.path().join("images");
    std::fs::create_dir_all(images.join("nested")).expect("mkdir");
    std::fs::write(images.join("nested/slide_a.png"), b"a").expect("write image");
    let archive = temp.path().join("dataset.zip");

    segset()
        .arg("export")
        .arg(&project)
        .args(["--format", "coco"])
        .arg("-o")
        .arg(&archive)
        .arg("--images-dir")
        .arg(&images)
        .assert()
        .success()
        .stdout(predicate::str::contains("Missing images: 1"));

    let names = common::zip_entry_names(&archive);
    assert!(names.iter().any(|n| n == "annotations.json"));
    assert!(names.iter().any(|n| n == "labels/train/instances.json"));
    assert!(names.iter().any(|n| n == "images/train/slide_a.png"));
    assert!(!names.iter().any(|n| n == "images/train/slide_b.png"));
}

#[test]
fn export_rejects_unknown_format() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let project = common::processed_project(temp.path());

    segset()
        .arg("export")
        .arg(&project)
        .args(["--format", "voc"])
        .arg("-o")
        .arg(temp.path().join("dataset.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("voc"));
}

#[test]
fn export_mark_exported_then_only_unexported() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let project = common::processed_project(temp.path());

    segset()
        .arg("export")
        .arg(&project)
        .arg("-o")
        .arg(temp.path().join("first.zip"))
        .arg("--mark-exported")
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked 2 annotation(s)"));

    segset()
        .arg("export")
        .arg(&project)
        .arg("-o")
        .arg(temp.path().join("second.zip"))
        .arg("--only-unexported")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 0 annotation(s)"))
        .stdout(predicate::str::contains("2 already exported"));
}
