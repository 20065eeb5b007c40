use super::*;
use std::cell::Cell;
use std::io::Cursor;

#[test]
fn test_known_digests() {
    assert_eq!(
        hash_reader(&mut Cursor::new(b"")).unwrap(),
        "d41d8cd98f00b204e9800998ecf8427e"
    );
    assert_eq!(
        hash_reader(&mut Cursor::new(b"abc")).unwrap(),
        "900150983cd24fb0d6963f7d28e17f72"
    );
}

#[test]
fn test_hash_spanning_multiple_chunks_is_stable() {
    // Three and a half chunks, so the last read is a partial one.
    let data: Vec<u8> = (0..(CHUNK_SIZE * 7 / 2)).map(|i| (i % 251) as u8).collect();

    let first = hash_reader(&mut Cursor::new(data.clone())).unwrap();
    let second = hash_reader(&mut Cursor::new(data.clone())).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, format!("{:x}", md5::compute(&data)));
}

#[test]
fn test_progress_reports_running_total() {
    let data = vec![0x5Au8; CHUNK_SIZE + 10];
    let last = Cell::new(0u64);
    let calls = Cell::new(0usize);
    hash_reader_with_progress(&mut Cursor::new(data), &|done| {
        last.set(done);
        calls.set(calls.get() + 1);
    })
    .unwrap();
    assert_eq!(last.get(), (CHUNK_SIZE + 10) as u64);
    assert!(calls.get() >= 2);
}

#[test]
fn test_hash_file_matches_reader() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("rom.bin");
    std::fs::write(&path, b"retro bytes").unwrap();
    assert_eq!(
        hash_file(&path).unwrap(),
        hash_reader(&mut Cursor::new(b"retro bytes")).unwrap()
    );
}

#[test]
fn test_hash_missing_file_is_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    assert!(hash_file(&tmp.path().join("missing.bin")).is_err());
}
