mod common;

use common::Download;
use std::path::PathBuf;
use torrent_verify::output::{Collector, OutputFormat, Reporter};
use torrent_verify::torrent::MetadataError;
use torrent_verify::{verify_torrent, CheckConfig, PieceVerifier, Torrent, TorrentLayout};

fn check(download: &Download) -> Collector {
    let torrent = Torrent::open(&download.torrent_path).unwrap();
    let layout = TorrentLayout::from_torrent(&torrent).unwrap();
    let config = CheckConfig::default().with_root(download.root());

    let mut verifier = PieceVerifier::new(&layout, &config);
    let mut sink = Collector::default();
    verify_torrent(&mut verifier, &mut sink, &config).unwrap();
    sink
}

fn paths(sink: &Collector) -> Vec<PathBuf> {
    sink.files.iter().map(|(_, path)| path.clone()).collect()
}

#[test]
fn test_intact_download() {
    let download = Download::new("album", 16384, &[("a.bin", 24576), ("b.bin", 8192)]);
    let sink = check(&download);

    assert_eq!(
        paths(&sink),
        vec![
            PathBuf::from("album").join("a.bin"),
            PathBuf::from("album").join("b.bin")
        ]
    );
}

#[test]
fn test_corrupt_shared_piece_rejects_both_files() {
    let download = Download::new("album", 16384, &[("a.bin", 24576), ("b.bin", 8192)]);
    download.corrupt("b.bin", 0);

    let sink = check(&download);
    assert!(sink.files.is_empty());
}

#[test]
fn test_partial_download() {
    let download = Download::new(
        "show",
        1024,
        &[
            ("s01/e01.mkv", 3000),
            ("s01/e02.mkv", 2500),
            ("s01/e03.mkv", 4000),
            ("notes.txt", 100),
        ],
    );
    // e02 was never fetched.
    std::fs::remove_file(download.data_path("s01/e02.mkv")).unwrap();

    let sink = check(&download);
    let indices: Vec<usize> = sink.files.iter().map(|(i, _)| *i).collect();

    // e01 and e03 share their boundary pieces with e02. notes.txt only shares a piece with the
    // intact tail of e03.
    assert_eq!(indices, vec![3]);
}

#[test]
fn test_reporter_lists_indices() {
    let download = Download::new("set", 64, &[("one", 100), ("two", 28), ("three", 64)]);
    download.corrupt("three", 10);

    let torrent = Torrent::open(&download.torrent_path).unwrap();
    let layout = TorrentLayout::from_torrent(&torrent).unwrap();
    let config = CheckConfig::default().with_root(download.root());
    let mut verifier = PieceVerifier::new(&layout, &config);
    let mut reporter = Reporter::new(Vec::new(), OutputFormat::Indices, 3, false);

    let summary = verify_torrent(&mut verifier, &mut reporter, &config).unwrap();

    assert_eq!(reporter.finish().unwrap(), b"0\n1\n");
    assert_eq!(summary.files, 3);
    assert_eq!(summary.valid_files, 2);
}

#[test]
fn test_unparseable_torrent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.torrent");
    std::fs::write(&path, b"d4:infoi42ee").unwrap();

    let result = Torrent::open(&path);
    assert!(matches!(result, Err(MetadataError::BencodeDecoding(_))));
}
