//! Command-line behavior of the `pdfdump` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use lopdf::{dictionary, Document, Object, Stream};
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a one-page PDF showing `line` and return its path.
fn write_pdf(dir: &Path, line: &str) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", line);
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join("input.pdf");
    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    fs::write(&path, buf).unwrap();
    path
}

fn pdfdump() -> Command {
    Command::cargo_bin("pdfdump").unwrap()
}

#[test]
fn test_json_flag_prints_only_json() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(dir.path(), "Hello");
    let output = dir.path().join("extracted");

    let assert = pdfdump()
        .arg("--json")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let stdout = &assert.get_output().stdout;
    let summary: serde_json::Value = serde_json::from_slice(stdout).unwrap();
    assert_eq!(summary["pages"], 1);
    assert_eq!(summary["image_files"], 0);
    assert!(output.join("extracted-text.txt").is_file());
}

#[test]
fn test_text_command_json_has_no_images_entry() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(dir.path(), "Plain");

    let assert = pdfdump()
        .args(["text", "--json", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out"))
        .assert()
        .success();

    let summary: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(summary["characters"], "\n\n=== PAGE 1 ===\nPlain".len());
    assert!(summary["image_files"].is_null());
}

#[test]
fn test_human_summary_without_json() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(dir.path(), "Hello");

    pdfdump()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("extracted"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Pages processed: 1"));
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    pdfdump()
        .arg("-i")
        .arg(dir.path().join("missing.pdf"))
        .arg("-o")
        .arg(dir.path().join("extracted"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("PDF not found at:"));
    assert!(!dir.path().join("extracted").exists());
}
