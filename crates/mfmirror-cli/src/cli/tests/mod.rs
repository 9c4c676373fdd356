//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

pub(super) fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn mirror_defaults() {
    match parse(&["mfmirror", "mirror", "--manifest", "book.json"]) {
        CliCommand::Mirror {
            manifest,
            out_root,
            concurrency,
            skip_existing,
        } => {
            assert_eq!(manifest, PathBuf::from("book.json"));
            assert_eq!(out_root, PathBuf::from("./local_www"));
            assert_eq!(concurrency, None);
            assert!(!skip_existing);
        }
        other => panic!("expected Mirror, got {:?}", other),
    }
}

#[test]
fn mirror_all_flags() {
    match parse(&[
        "mfmirror",
        "mirror",
        "--manifest",
        "book.json",
        "--out-root",
        "/srv/www",
        "--concurrency",
        "16",
        "--skip-existing",
    ]) {
        CliCommand::Mirror {
            out_root,
            concurrency,
            skip_existing,
            ..
        } => {
            assert_eq!(out_root, PathBuf::from("/srv/www"));
            assert_eq!(concurrency, Some(16));
            assert!(skip_existing);
        }
        other => panic!("expected Mirror, got {:?}", other),
    }
}

#[test]
fn mirror_requires_manifest() {
    assert!(Cli::try_parse_from(["mfmirror", "mirror"]).is_err());
}

#[test]
fn discover_parses() {
    match parse(&["mfmirror", "discover", "--manifest", "m.json"]) {
        CliCommand::Discover { manifest } => assert_eq!(manifest, PathBuf::from("m.json")),
        other => panic!("expected Discover, got {:?}", other),
    }
}

#[test]
fn import_har_optional_output() {
    match parse(&["mfmirror", "import-har", "m.json", "c.har"]) {
        CliCommand::ImportHar {
            manifest,
            har,
            output,
        } => {
            assert_eq!(manifest, PathBuf::from("m.json"));
            assert_eq!(har, PathBuf::from("c.har"));
            assert!(output.is_none());
        }
        other => panic!("expected ImportHar, got {:?}", other),
    }
    match parse(&["mfmirror", "import-har", "m.json", "c.har", "out.json"]) {
        CliCommand::ImportHar { output, .. } => {
            assert_eq!(output, Some(PathBuf::from("out.json")))
        }
        other => panic!("expected ImportHar, got {:?}", other),
    }
}
