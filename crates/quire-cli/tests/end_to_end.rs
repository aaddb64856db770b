// SPDX-License-Identifier: MIT
//
// End-to-end runs of the quire binary against synthetic PDFs.

use std::path::Path;

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("quire").unwrap()
}

/// Build a PDF with one page per label.
fn write_sample_pdf(path: &Path, labels: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let page_tree_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => Object::Dictionary(dictionary! {
            "F1" => Object::Reference(font_id),
        }),
    });

    let mut kids = Vec::new();
    for label in labels {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*label)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            lopdf::Dictionary::new(),
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(page_tree_id),
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources_id),
            "MediaBox" => Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
        });
        kids.push(Object::Reference(page_id));
    }

    let page_tree = dictionary! {
        "Type" => "Pages",
        "Kids" => Object::Array(kids),
        "Count" => Object::Integer(labels.len() as i64),
    };
    doc.objects
        .insert(page_tree_id, Object::Dictionary(page_tree));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(page_tree_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.save(path).expect("fixture written");
}

fn page_count(path: &Path) -> usize {
    Document::load(path).expect("load output").get_pages().len()
}

#[test]
fn merge_concatenates_in_argument_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = dir.path().join("a.pdf");
    let b = dir.path().join("b.pdf");
    let out = dir.path().join("merged.pdf");
    write_sample_pdf(&a, &["a1", "a2", "a3"]);
    write_sample_pdf(&b, &["b1", "b2"]);

    cmd()
        .arg("merge")
        .arg(&a)
        .arg(&b)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(page_count(&out), 5);
}

#[test]
fn split_writes_one_file_per_page() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("doc.pdf");
    let out_dir = dir.path().join("parts");
    write_sample_pdf(&input, &["p1", "p2", "p3"]);

    cmd()
        .arg("split")
        .arg(&input)
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .success();

    for n in 1..=3 {
        let part = out_dir.join(format!("doc_page_{n:03}.pdf"));
        assert!(part.exists(), "missing {}", part.display());
        assert_eq!(page_count(&part), 1);
    }
}

#[test]
fn organize_deletes_rotates_and_reorders() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("doc.pdf");
    let out = dir.path().join("organized.pdf");
    write_sample_pdf(&input, &["p1", "p2", "p3"]);

    cmd()
        .arg("organize")
        .arg(&input)
        .args(["-o"])
        .arg(&out)
        .args(["--delete", "2", "--rotate", "1:90", "--order", "3,1"])
        .assert()
        .success();

    assert_eq!(page_count(&out), 2);
}

#[test]
fn organize_rejects_incomplete_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("doc.pdf");
    let out = dir.path().join("organized.pdf");
    write_sample_pdf(&input, &["p1", "p2", "p3"]);

    cmd()
        .arg("organize")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .args(["--order", "3,1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("surviving page"));
}

#[test]
fn watermark_keeps_page_count() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("doc.pdf");
    let out = dir.path().join("stamped.pdf");
    write_sample_pdf(&input, &["p1", "p2"]);

    cmd()
        .arg("watermark")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .args(["-t", "CONFIDENTIAL"])
        .assert()
        .success();

    assert_eq!(page_count(&out), 2);
}

#[test]
fn protect_then_unlock_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("doc.pdf");
    let locked = dir.path().join("locked.pdf");
    let unlocked = dir.path().join("unlocked.pdf");
    write_sample_pdf(&input, &["p1"]);

    cmd()
        .arg("protect")
        .arg(&input)
        .arg("-o")
        .arg(&locked)
        .args(["-p", "hunter2"])
        .assert()
        .success();
    assert!(
        Document::load(&locked).expect("load locked").is_encrypted(),
        "protect output must be encrypted"
    );

    cmd()
        .arg("unlock")
        .arg(&locked)
        .arg("-o")
        .arg(&unlocked)
        .args(["-p", "hunter2"])
        .assert()
        .success();
    assert_eq!(page_count(&unlocked), 1);
}

#[test]
fn metadata_set_then_show_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("doc.pdf");
    let out = dir.path().join("titled.pdf");
    write_sample_pdf(&input, &["p1"]);

    cmd()
        .arg("metadata")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .args(["--title", "Annual Report", "--author", "J. Doe"])
        .assert()
        .success();

    cmd()
        .arg("metadata")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Annual Report"))
        .stdout(predicate::str::contains("Author: J. Doe"));
}

#[test]
fn metadata_edit_without_output_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("doc.pdf");
    write_sample_pdf(&input, &["p1"]);

    cmd()
        .arg("metadata")
        .arg(&input)
        .args(["--title", "No Destination"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("output file"));
}

#[test]
fn convert_refuses_image_input_with_img2pdf_hint() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("photo.png");
    let out = dir.path().join("out.pdf");
    std::fs::write(&input, b"not really a png").expect("fixture written");

    cmd()
        .arg("convert")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("img2pdf"));
}

#[test]
fn convert_refuses_export_of_non_pdf_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("doc.docx");
    let out = dir.path().join("out.pptx");
    std::fs::write(&input, b"not really a docx").expect("fixture written");

    cmd()
        .arg("convert")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .args(["--to", "pptx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a PDF"));
}
