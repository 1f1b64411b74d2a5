//! Drive the `blockseal` binary end to end on a temp directory.

use std::path::Path;
use std::process::{Command, Output};

use blockseal_core::io::read_headers_auto;
use blockseal_merkle::{CommitManifest, ProofDocument};

fn blockseal(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blockseal"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn p(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn simulate_commit_prove_verify() {
    let dir = tempfile::tempdir().unwrap();
    let headers = dir.path().join("chain.jsonl");
    let manifest = dir.path().join("manifest.json");
    let proof = dir.path().join("proof.cbor");

    let out = blockseal(&["simulate", "--count", "21", "--seed", "3", "--out", p(&headers)]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let chain = read_headers_auto(&headers).unwrap();
    assert_eq!(chain.len(), 21);

    let out = blockseal(&["--batch-size", "4", "commit", "--headers", p(&headers), "--out", p(&manifest)]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let m = CommitManifest::read_auto(&manifest).unwrap();
    assert_eq!(m.batch_size, 4);
    assert_eq!(m.trees.len(), 5);
    assert_eq!(m.pending, 1);
    assert_eq!((m.trees[2].first_number, m.trees[2].last_number), (8, 11));

    let target = &chain[9];
    let out = blockseal(&[
        "--batch-size", "4", "prove", "--headers", p(&headers), "--hash", &target.hash, "--out", p(&proof),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let doc = ProofDocument::read_auto(&proof).unwrap();
    assert_eq!((doc.sequence, doc.leaf_index), (2, 1));
    assert_eq!(doc.root, m.trees[2].root);
    assert_eq!(doc.proof.len(), 2);

    let out = blockseal(&["--batch-size", "4", "verify", "--headers", p(&headers), "--proof", p(&proof)]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("OK"));
}

#[test]
fn pending_header_cannot_be_proved() {
    let dir = tempfile::tempdir().unwrap();
    let headers = dir.path().join("chain.json");
    let proof = dir.path().join("proof.json");

    assert!(blockseal(&["simulate", "--count", "5", "--out", p(&headers)]).status.success());
    let last = read_headers_auto(&headers).unwrap().pop().unwrap();

    let out = blockseal(&[
        "--batch-size", "4", "prove", "--headers", p(&headers), "--hash", &last.hash, "--out", p(&proof),
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("not committed"));
    assert!(!proof.exists());
}

#[test]
fn tampered_proof_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let headers = dir.path().join("chain.jsonl");
    let proof = dir.path().join("proof.json");

    assert!(blockseal(&["simulate", "--count", "8", "--out", p(&headers)]).status.success());
    let chain = read_headers_auto(&headers).unwrap();
    let out = blockseal(&[
        "--batch-size", "8", "prove", "--headers", p(&headers), "--hash", &chain[3].hash, "--out", p(&proof),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let mut doc: serde_json::Value = serde_json::from_slice(&std::fs::read(&proof).unwrap()).unwrap();
    doc["proof"][0]["side"] = match doc["proof"][0]["side"].as_str().unwrap() {
        "left" => "right".into(),
        _ => "left".into(),
    };
    std::fs::write(&proof, serde_json::to_vec(&doc).unwrap()).unwrap();

    let out = blockseal(&["--batch-size", "8", "verify", "--headers", p(&headers), "--proof", p(&proof)]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("proof rejected"));
}

#[test]
fn zero_batch_size_is_a_config_error() {
    let out = blockseal(&["--batch-size", "0", "show-tree", "--headers", "missing.jsonl", "--sequence", "0"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("batch_size"));
}
