#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

/// A raw project with one clean square, one noisy square and one bow-tie.
pub fn raw_project_json() -> serde_json::Value {
    json!({
        "name": "cells",
        "classes": [
            { "class_index": 0, "name": "cell", "color": "#FF0000" },
            { "class_index": 1, "name": "nucleus", "color": "#00FF00", "display_name": "Nucleus" }
        ],
        "images": [
            { "id": 1, "file_name": "slide_a.png", "width": 200, "height": 100 },
            { "id": 2, "file_name": "slide_b.png", "width": 200, "height": 100 }
        ],
        "annotations": [
            {
                "id": 1, "image_id": 1, "class_index": 0,
                "points": [[0, 0], [200, 0], [200, 100], [0, 100]]
            },
            {
                "id": 2, "image_id": 2, "class_index": 1,
                "points": [[20, 10], [100, 10.05], [180, 10], [180, 90], [100, 89.98], [20, 90]]
            },
            {
                "id": 3, "image_id": 2, "class_index": 0,
                "points": [[0, 0], [100, 100], [100, 0], [0, 50]]
            }
        ]
    })
}

pub fn write_json(path: &Path, value: &serde_json::Value) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    let text = serde_json::to_string_pretty(value).expect("serialize fixture");
    fs::write(path, text).expect("write fixture");
}

pub fn write_raw_project(dir: &Path) -> PathBuf {
    let path = dir.join("raw.json");
    write_json(&path, &raw_project_json());
    path
}

/// Runs `segset process` on the raw fixture and returns the project path.
pub fn processed_project(dir: &Path) -> PathBuf {
    let raw = write_raw_project(dir);
    let out = dir.join("project.json");
    assert_cmd::Command::cargo_bin("segset")
        .expect("segset binary")
        .args(["process"])
        .arg(&raw)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    out
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(path).expect("read json");
    serde_json::from_str(&text).expect("parse json")
}

pub fn zip_entry_names(path: &Path) -> Vec<String> {
    let file = fs::File::open(path).expect("open archive");
    let archive = zip::ZipArchive::new(file).expect("read archive");
    archive.file_names().map(str::to_string).collect()
}
