// ABOUTME: Integration tests for the tidings CLI binary.
// ABOUTME: Tests item file output, stdout printing, and fatal-error exit codes.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn tidings_cmd() -> Command {
    Command::cargo_bin("tidings").unwrap()
}

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta property="og:title" content="Launch Day"></head>
<body>
<article>
    <h1>Launch Day</h1>
    <p>Announcing the launch of a small tool.</p>
</article>
</body>
</html>"#;

#[test]
fn writes_item_file_for_html_source() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/post");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(PAGE);
    });

    let out_dir = TempDir::new().unwrap();

    tidings_cmd()
        .arg(server.url("/post"))
        .arg("--name")
        .arg("Example Blog")
        .arg("--tag")
        .arg("ai")
        .arg("--out-dir")
        .arg(out_dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("wrote 1 item(s)"));

    let entries: Vec<_> = fs::read_dir(out_dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1);
    let file_name = entries[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.ends_with(".json"));

    let written = fs::read_to_string(&entries[0]).unwrap();
    let item: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(item["title"], "Launch Day");
    assert_eq!(item["source_name"], "Example Blog");
    assert_eq!(item["status"], "pending");
    assert_eq!(item["tags"][0], "ai");
    // Empty optionals stay out of the serialized item.
    assert!(item.get("author").is_none());
}

#[test]
fn print_json_echoes_items_to_stdout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/post");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(PAGE);
    });

    let out_dir = TempDir::new().unwrap();

    tidings_cmd()
        .arg(server.url("/post"))
        .arg("--out-dir")
        .arg(out_dir.path())
        .arg("--print-json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Launch Day\""));
}

#[test]
fn feed_source_writes_one_file_per_entry() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/feed.xml");
        then.status(200)
            .header("content-type", "application/rss+xml")
            .body(
                r#"<?xml version="1.0"?>
                <rss version="2.0">
                    <channel>
                        <title>Blog</title>
                        <item>
                            <title>One</title>
                            <link>https://example.com/one</link>
                            <description>First body.</description>
                        </item>
                        <item>
                            <title>Two</title>
                            <link>https://example.com/two</link>
                            <description>Second body.</description>
                        </item>
                    </channel>
                </rss>"#,
            );
    });

    let out_dir = TempDir::new().unwrap();

    tidings_cmd()
        .arg(server.url("/feed.xml"))
        .arg("--source-type")
        .arg("feed")
        .arg("--out-dir")
        .arg(out_dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("wrote 2 item(s)"));

    assert_eq!(fs::read_dir(out_dir.path()).unwrap().count(), 2);
}

#[test]
fn fatal_fetch_error_exits_non_zero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/gone");
        then.status(404);
    });

    let out_dir = TempDir::new().unwrap();

    tidings_cmd()
        .arg(server.url("/gone"))
        .arg("--out-dir")
        .arg(out_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to normalize"));
}
