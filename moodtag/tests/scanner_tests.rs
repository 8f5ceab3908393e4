//! Input folder discovery

use std::fs;
use std::path::{Path, PathBuf};

use moodtag::scanner::{FileScanner, ScanError};
use tempfile::TempDir;

fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, b"data").unwrap();
    path
}

fn default_scanner() -> FileScanner {
    FileScanner::new(&["mp3".to_string(), "flac".to_string()])
}

#[test]
fn test_recursive_scan_filters_and_sorts() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let expected = vec![
        touch(root, "a/deep/nested/01.mp3"),
        touch(root, "a/song.FLAC"),
        touch(root, "b/Track.Mp3"),
        touch(root, "top.mp3"),
    ];
    touch(root, "a/cover.jpg");
    touch(root, "b/notes.txt");
    touch(root, "b/clip.wav");
    touch(root, "mp3");

    let found = default_scanner().scan(root).unwrap();
    assert_eq!(found, expected);
}

#[test]
fn test_ignored_directories_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    touch(root, ".git/objects/blob.mp3");
    touch(root, ".svn/old.flac");
    let kept = touch(root, "album/track.mp3");

    assert_eq!(default_scanner().scan(root).unwrap(), vec![kept]);
}

#[test]
fn test_custom_extension_set() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    touch(root, "one.mp3");
    let wav = touch(root, "two.wav");

    let scanner = FileScanner::new(&[".WAV".to_string()]);
    assert_eq!(scanner.scan(root).unwrap(), vec![wav]);
}

#[test]
fn test_missing_root_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope");

    let err = default_scanner().scan(&missing).unwrap_err();
    assert!(matches!(err, ScanError::PathNotFound(_)));
    assert!(err.to_string().contains("nope"));
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_terminates() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    let track = touch(root, "album/track.mp3");
    std::os::unix::fs::symlink(root.join("album"), root.join("album/loop")).unwrap();

    let found = default_scanner().scan(root).unwrap();
    assert_eq!(found, vec![track]);
}
