// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! End-to-end tests of the patchcheck binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn patch(path: &str, added: &str, trailers: &str) -> String {
    format!(
        "From 3f1c2d Mon Sep 17 00:00:00 2001\n\
From: Jane Doe <jane@example.com>\n\
Date: Mon, 1 Jun 2020 10:00:00 +0000\n\
Subject: [PATCH] MdePkg: Fix typo\n\
\n\
Fix a typo in the comment.\n\
{trailers}---\n \
{path} | 2 +-\n \
1 file changed, 1 insertion(+), 1 deletion(-)\n\
\n\
diff --git a/{path} b/{path}\n\
index 1111111..2222222 100644\n\
--- a/{path}\n\
+++ b/{path}\n\
@@ -1,2 +1,2 @@\n \
context\r\n\
-old\r\n\
+{added}\
-- \n\
2.25.1\n",
        path = path,
        added = added,
        trailers = trailers
    )
}

const SOB: &str = "\nSigned-off-by: Jane Doe <jane@example.com>\n";

fn write_patch(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, text).unwrap();
    path
}

fn patchcheck(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("patchcheck").unwrap();
    cmd.current_dir(dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_good_patch_passes() {
    let dir = TempDir::new().unwrap();
    let file = write_patch(&dir, "0001-good.patch", &patch("MdePkg/Foo.c", "new\r\n", SOB));

    patchcheck(dir.path())
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Checking patch file:"))
        .stdout(predicate::str::contains("MdePkg: Fix typo"))
        .stdout(predicate::str::contains(
            "The commit message format passed all checks.",
        ))
        .stdout(predicate::str::contains("The code passed all checks."));
}

#[test]
fn test_lf_source_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_patch(&dir, "0001-lf.patch", &patch("MdePkg/Foo.c", "new\n", SOB));

    patchcheck(dir.path())
        .arg(&file)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Code format is not valid:"))
        .stdout(predicate::str::contains(" * Line ending ('\\n') is not CRLF"))
        .stdout(predicate::str::contains("   File: MdePkg/Foo.c"));
}

#[test]
fn test_shell_script_lf_passes() {
    let dir = TempDir::new().unwrap();
    let file = write_patch(&dir, "0001-sh.patch", &patch("edksetup.sh", "new\n", SOB));

    patchcheck(dir.path()).arg(&file).assert().success();
}

#[test]
fn test_missing_signed_off_by_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_patch(&dir, "0001-nosob.patch", &patch("MdePkg/Foo.c", "new\r\n", ""));

    patchcheck(dir.path())
        .arg(&file)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "The commit message format is not valid:",
        ))
        .stdout(predicate::str::contains("Missing Signed-off-by!"))
        .stdout(predicate::str::contains("Commit-Message-Format"));
}

#[test]
fn test_oneline_output() {
    let dir = TempDir::new().unwrap();
    write_patch(&dir, "good.patch", &patch("MdePkg/Foo.c", "new\r\n", SOB));
    write_patch(&dir, "bad.patch", &patch("MdePkg/Foo.c", "\tnew\r\n", SOB));

    patchcheck(dir.path())
        .args(["--oneline", "good.patch", "bad.patch"])
        .assert()
        .code(1)
        .stdout("good.patch ok\nbad.patch bad diff content\n");
}

#[test]
fn test_silent_output() {
    let dir = TempDir::new().unwrap();
    write_patch(&dir, "bad.patch", &patch("MdePkg/Foo.c", "new\n", SOB));

    patchcheck(dir.path())
        .args(["--silent", "bad.patch"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_json_output() {
    let dir = TempDir::new().unwrap();
    write_patch(&dir, "bad.patch", &patch("MdePkg/Foo.c", "done  \r\n", SOB));

    let output = patchcheck(dir.path())
        .args(["--format", "json", "bad.patch"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["ok"], false);
    let patch = &value["patches"][0];
    assert_eq!(patch["name"], "bad.patch");
    assert_eq!(patch["subject"], "MdePkg: Fix typo");
    let diff = &patch["sections"][2];
    assert_eq!(diff["section"], "diff");
    assert_eq!(diff["findings"][0]["code"], "trailing-whitespace");
}

#[test]
fn test_stdin_patch() {
    let dir = TempDir::new().unwrap();

    patchcheck(dir.path())
        .args(["--oneline", "-"])
        .write_stdin(patch("MdePkg/Foo.c", "new\r\n", SOB))
        .assert()
        .success()
        .stdout("stdin ok\n");
}

#[test]
fn test_config_disables_whitespace_check() {
    let dir = TempDir::new().unwrap();
    write_patch(&dir, "ws.patch", &patch("MdePkg/Foo.c", "done  \r\n", SOB));
    std::fs::write(
        dir.path().join("patchcheck.toml"),
        "[diff]\ncheck_trailing_whitespace = false\n",
    )
    .unwrap();

    patchcheck(dir.path()).arg("ws.patch").assert().success();
}

#[test]
fn test_config_extra_lf_only_glob() {
    let dir = TempDir::new().unwrap();
    write_patch(&dir, "py.patch", &patch("BaseTools/Scripts/Foo.py", "new\n", SOB));
    std::fs::write(
        dir.path().join("ci.toml"),
        "[paths]\nlf_only = [\"**/*.py\"]\n",
    )
    .unwrap();

    patchcheck(dir.path())
        .args(["py.patch"])
        .assert()
        .code(1);

    patchcheck(dir.path())
        .args(["-c", "ci.toml", "py.patch"])
        .assert()
        .success();
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    write_patch(&dir, "good.patch", &patch("MdePkg/Foo.c", "new\r\n", SOB));
    std::fs::write(dir.path().join("bad.toml"), "[message\n").unwrap();

    patchcheck(dir.path())
        .args(["-c", "bad.toml", "good.patch"])
        .assert()
        .code(2)
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_oneline_and_silent_conflict() {
    let dir = TempDir::new().unwrap();
    patchcheck(dir.path())
        .args(["--oneline", "--silent"])
        .assert()
        .failure();
}

fn commit_repo(dir: &Path, message: &str) {
    let repo = git2::Repository::init(dir).unwrap();
    let sig = git2::Signature::now("Jane Doe", "jane@example.com").unwrap();
    std::fs::create_dir_all(dir.join("MdePkg")).unwrap();
    std::fs::write(dir.join("MdePkg/Foo.c"), "int x;\r\n").unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new("MdePkg/Foo.c")).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[])
        .unwrap();
}

#[test]
fn test_git_head_commit() {
    let dir = TempDir::new().unwrap();
    commit_repo(
        dir.path(),
        "MdePkg: Add Foo\n\nAdd a source file.\n\nSigned-off-by: Jane Doe <jane@example.com>\n",
    );

    patchcheck(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Checking git commit: HEAD"))
        .stdout(predicate::str::contains("MdePkg: Add Foo"))
        .stdout(predicate::str::contains("The code passed all checks."));
}

#[test]
fn test_unresolved_revision() {
    let dir = TempDir::new().unwrap();
    commit_repo(
        dir.path(),
        "MdePkg: Add Foo\n\nSigned-off-by: Jane Doe <jane@example.com>\n",
    );

    patchcheck(dir.path())
        .arg("no-such-branch")
        .assert()
        .code(1)
        .stdout("Couldn't find commit matching: 'no-such-branch'\n");
}

/// Commit one CRLF source file per subject, returning the commit ids in order.
fn commit_series(dir: &Path, subjects: &[&str]) -> Vec<String> {
    let repo = git2::Repository::init(dir).unwrap();
    let sig = git2::Signature::now("Jane Doe", "jane@example.com").unwrap();
    std::fs::create_dir_all(dir.join("MdePkg")).unwrap();

    let mut ids = Vec::new();
    let mut parent: Option<git2::Oid> = None;
    for (i, subject) in subjects.iter().enumerate() {
        let file = format!("MdePkg/File{}.c", i);
        std::fs::write(dir.join(&file), format!("int x{};\r\n", i)).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(&file)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

        let parents: Vec<git2::Commit<'_>> =
            parent.map(|p| repo.find_commit(p).unwrap()).into_iter().collect();
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
        let message = format!(
            "{}\n\nAdd a source file.\n\nSigned-off-by: Jane Doe <jane@example.com>\n",
            subject
        );
        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, &message, &tree, &parent_refs)
            .unwrap();
        ids.push(oid.to_string());
        parent = Some(oid);
    }
    ids
}

#[test]
fn test_commit_count_checks_oldest_first() {
    let dir = TempDir::new().unwrap();
    let ids = commit_series(dir.path(), &["MdePkg: Add One", "MdePkg: Add Two"]);

    let output = patchcheck(dir.path())
        .args(["--format", "json", "-2", "HEAD"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let patches = value["patches"].as_array().unwrap();
    assert_eq!(patches.len(), 2);

    // several commits are named by abbreviated id
    let first = patches[0]["name"].as_str().unwrap();
    let second = patches[1]["name"].as_str().unwrap();
    assert!(ids[0].starts_with(first), "{} vs {}", first, ids[0]);
    assert!(ids[1].starts_with(second), "{} vs {}", second, ids[1]);
    assert_ne!(first, "HEAD");
    assert_eq!(patches[0]["subject"], "MdePkg: Add One");
    assert_eq!(patches[1]["subject"], "MdePkg: Add Two");
    assert_eq!(patches[0]["source"], "git");
}

#[test]
fn test_single_commit_named_by_spec() {
    let dir = TempDir::new().unwrap();
    commit_series(dir.path(), &["MdePkg: Add One", "MdePkg: Add Two"]);

    let output = patchcheck(dir.path())
        .args(["--format", "json", "HEAD~1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let patches = value["patches"].as_array().unwrap();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0]["name"], "HEAD~1");
    assert_eq!(patches[0]["subject"], "MdePkg: Add One");
}
