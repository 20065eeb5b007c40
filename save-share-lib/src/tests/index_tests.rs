use super::*;
use std::fs;
use tempfile::TempDir;

fn write_rom(root: &Path, system: &str, name: &str, data: &[u8]) -> PathBuf {
    let dir = root.join(system);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

#[test]
fn test_identical_content_gives_identical_hash() {
    let tmp = TempDir::new().unwrap();
    let roms = tmp.path().join("roms");
    write_rom(&roms, "snes", "zelda.sfc", b"same bytes");
    write_rom(&roms, "gba", "renamed copy.gba", b"same bytes");
    write_rom(&roms, "gba", "other.gba", b"different bytes");

    let mut index = ContentIndex::in_memory();
    let records = index
        .index_games(
            &roms,
            vec![
                GameEntry::new("snes", "Zelda", "zelda.sfc"),
                GameEntry::new("gba", "Copy", "renamed copy.gba"),
                GameEntry::new("gba", "Other", "other.gba"),
            ],
        )
        .unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].content_hash, records[1].content_hash);
    assert_ne!(records[0].content_hash, records[2].content_hash);
}

#[test]
fn test_relative_paths_resolve_under_system_folder() {
    let tmp = TempDir::new().unwrap();
    let roms = tmp.path().join("roms");
    let rom = write_rom(&roms, "snes", "zelda.sfc", b"zelda");

    let mut index = ContentIndex::in_memory();
    index
        .index_games(&roms, vec![GameEntry::new("snes", "Zelda", "./zelda.sfc")])
        .unwrap();

    let record = &index.records()[0];
    assert!(record.rom_path.is_absolute());
    assert_eq!(record.rom_path, absolute_normalized(&rom).unwrap());
    assert_eq!(record.content_hash, format!("{:x}", md5::compute(b"zelda")));
}

#[test]
fn test_absolute_paths_are_used_as_is() {
    let tmp = TempDir::new().unwrap();
    let elsewhere = write_rom(tmp.path(), "usb", "metroid.gba", b"metroid");

    let mut index = ContentIndex::in_memory();
    index
        .index_games(
            &tmp.path().join("roms"),
            vec![GameEntry::new(
                "gba",
                "Metroid",
                elsewhere.to_string_lossy().into_owned(),
            )],
        )
        .unwrap();

    assert_eq!(index.len(), 1);
    assert_eq!(index.records()[0].system, "gba");
    assert_eq!(index.records()[0].rom_path, absolute_normalized(&elsewhere).unwrap());
}

#[test]
fn test_missing_roms_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let roms = tmp.path().join("roms");
    write_rom(&roms, "snes", "zelda.sfc", b"zelda");
    fs::create_dir_all(roms.join("snes").join("folder.sfc")).unwrap();

    let mut index = ContentIndex::in_memory();
    index
        .index_games(
            &roms,
            vec![
                GameEntry::new("snes", "Gone", "gone.sfc"),
                GameEntry::new("snes", "A Directory", "folder.sfc"),
                GameEntry::new("snes", "Zelda", "zelda.sfc"),
            ],
        )
        .unwrap();

    assert_eq!(index.len(), 1);
    assert_eq!(index.records()[0].title, "Zelda");
}

#[test]
fn test_indexing_replaces_loaded_cache() {
    let tmp = TempDir::new().unwrap();
    let roms = tmp.path().join("roms");
    let cache = tmp.path().join("cache").join("cache.json");
    write_rom(&roms, "snes", "zelda.sfc", b"zelda");
    write_rom(&roms, "snes", "smw.sfc", b"mario");

    let mut first = ContentIndex::new(&cache);
    first
        .index_games(
            &roms,
            vec![
                GameEntry::new("snes", "Zelda", "zelda.sfc"),
                GameEntry::new("snes", "Mario", "smw.sfc"),
            ],
        )
        .unwrap();
    first.save_cache().unwrap();

    let mut second = ContentIndex::new(&cache);
    assert_eq!(second.load_cache().unwrap().len(), 2);
    second
        .index_games(&roms, vec![GameEntry::new("snes", "Zelda", "zelda.sfc")])
        .unwrap();

    assert_eq!(second.len(), 1);
    assert!(second.records().iter().all(|r| r.title != "Mario"));
}

// /proc/self/mem is a regular file whose first page is unmapped, so the
// first read fails with EIO.
#[cfg(target_os = "linux")]
#[test]
fn test_read_error_keeps_previous_working_set() {
    let tmp = TempDir::new().unwrap();
    let roms = tmp.path().join("roms");
    let cache = tmp.path().join("cache.json");
    write_rom(&roms, "snes", "zelda.sfc", b"zelda");

    let mut seeded = ContentIndex::new(&cache);
    seeded
        .index_games(&roms, vec![GameEntry::new("snes", "Zelda", "zelda.sfc")])
        .unwrap();
    seeded.save_cache().unwrap();

    let mut index = ContentIndex::new(&cache);
    assert_eq!(index.load_cache().unwrap().len(), 1);

    let unreadable = Path::new("/proc/self/mem");
    assert!(unreadable.is_file());
    let result = index.index_games(
        &roms,
        vec![
            GameEntry::new("snes", "Mario", "smw.sfc"),
            GameEntry::new("snes", "Broken", unreadable.to_string_lossy()),
        ],
    );

    match result {
        Err(IndexError::Hash { path, .. }) => assert_eq!(path, unreadable),
        other => panic!("expected hash error, got {other:?}"),
    }
    assert_eq!(index.len(), 1);
    assert_eq!(index.records()[0].title, "Zelda");
}

#[test]
fn test_cache_round_trip() {
    let tmp = TempDir::new().unwrap();
    let roms = tmp.path().join("roms");
    let cache = tmp.path().join("nested").join("dir").join("cache.json");
    write_rom(&roms, "snes", "zelda.sfc", b"zelda");
    write_rom(&roms, "n64", "mario64.z64", b"mario 64");

    let mut index = ContentIndex::new(&cache);
    index
        .index_games(
            &roms,
            vec![
                GameEntry::new("snes", "Zelda", "zelda.sfc"),
                GameEntry::new("n64", "Super Mario 64", "mario64.z64"),
            ],
        )
        .unwrap();
    index.save_cache().unwrap();

    let mut reloaded = ContentIndex::new(&cache);
    reloaded.load_cache().unwrap();

    let mut expected = index.records().to_vec();
    let mut actual = reloaded.records().to_vec();
    expected.sort_by(|a, b| a.rom_path.cmp(&b.rom_path));
    actual.sort_by(|a, b| a.rom_path.cmp(&b.rom_path));
    assert_eq!(expected, actual);
}

#[test]
fn test_cache_uses_shared_field_names() {
    let tmp = TempDir::new().unwrap();
    let cache = tmp.path().join("cache.json");
    fs::write(
        &cache,
        r#"{"roms": [{"system": "snes", "title": "Zelda", "rom_path": "/roms/snes/zelda.sfc", "rom_hash": "abc123"}]}"#,
    )
    .unwrap();

    let mut index = ContentIndex::new(&cache);
    let records = index.load_cache().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content_hash, "abc123");
    assert_eq!(records[0].rom_path, PathBuf::from("/roms/snes/zelda.sfc"));

    index.save_cache().unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&cache).unwrap()).unwrap();
    assert_eq!(written["roms"][0]["rom_hash"], "abc123");
    assert_eq!(written["roms"][0]["rom_path"], "/roms/snes/zelda.sfc");
}

#[test]
fn test_missing_cache_is_empty() {
    let tmp = TempDir::new().unwrap();
    let mut index = ContentIndex::new(tmp.path().join("absent.json"));
    assert!(index.load_cache().unwrap().is_empty());
}

#[test]
fn test_cache_without_roms_list_is_empty() {
    let tmp = TempDir::new().unwrap();
    let cache = tmp.path().join("cache.json");
    fs::write(&cache, r#"{"version": 3}"#).unwrap();

    let mut index = ContentIndex::new(&cache);
    assert!(index.load_cache().unwrap().is_empty());
}

#[test]
fn test_corrupt_cache_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let cache = tmp.path().join("cache.json");
    fs::write(&cache, "{ not json").unwrap();

    let mut index = ContentIndex::new(&cache);
    assert!(matches!(
        index.load_cache(),
        Err(IndexError::CacheParse { .. })
    ));
}

#[test]
fn test_clear_cache() {
    let tmp = TempDir::new().unwrap();
    let cache = tmp.path().join("cache.json");
    let index = ContentIndex::new(&cache);
    index.save_cache().unwrap();
    assert!(cache.exists());
    assert!(index.clear_cache().unwrap());
    assert!(!cache.exists());
    assert!(!index.clear_cache().unwrap());
}

#[test]
fn test_in_memory_index_never_touches_disk() {
    let mut index = ContentIndex::in_memory();
    assert!(index.load_cache().unwrap().is_empty());
    index.save_cache().unwrap();
    assert!(!index.clear_cache().unwrap());
}

#[test]
fn test_derived_views() {
    let tmp = TempDir::new().unwrap();
    let roms = tmp.path().join("roms");
    write_rom(&roms, "snes", "zelda.sfc", b"zelda");
    write_rom(&roms, "snes", "smw.sfc", b"mario");
    write_rom(&roms, "gba", "metroid.gba", b"metroid");

    let mut index = ContentIndex::in_memory();
    index
        .index_games(
            &roms,
            vec![
                GameEntry::new("snes", "Zelda", "zelda.sfc"),
                GameEntry::new("gba", "Metroid", "metroid.gba"),
                GameEntry::new("snes", "Mario", "smw.sfc"),
            ],
        )
        .unwrap();

    let by_system = index.by_system();
    assert_eq!(by_system.keys().copied().collect::<Vec<_>>(), vec!["gba", "snes"]);
    assert_eq!(by_system["snes"].len(), 2);
    assert_eq!(by_system["snes"][0].title, "Zelda");

    let lookup = index.as_lookup();
    assert_eq!(lookup.len(), 3);
    assert_eq!(lookup["snes:zelda.sfc"].title, "Zelda");
    assert_eq!(lookup["gba:metroid.gba"].title, "Metroid");

    let hash = lookup["snes:smw.sfc"].content_hash.clone();
    assert_eq!(index.find("snes", &hash).unwrap().title, "Mario");
    assert!(index.find("gba", &hash).is_none());
}

#[test]
fn test_progress_events() {
    use std::cell::RefCell;

    let tmp = TempDir::new().unwrap();
    let roms = tmp.path().join("roms");
    write_rom(&roms, "snes", "zelda.sfc", b"zelda");

    let events = RefCell::new(Vec::new());
    let mut index = ContentIndex::in_memory();
    index
        .index_games_with_progress(
            &roms,
            vec![
                GameEntry::new("snes", "Gone", "gone.sfc"),
                GameEntry::new("snes", "Zelda", "zelda.sfc"),
            ],
            &|event| {
                let tag = match event {
                    IndexProgress::Hashing { .. } => "hashing",
                    IndexProgress::Bytes { .. } => "bytes",
                    IndexProgress::Missing { .. } => "missing",
                    IndexProgress::Indexed { .. } => "indexed",
                };
                events.borrow_mut().push(tag);
            },
        )
        .unwrap();

    assert_eq!(*events.borrow(), vec!["missing", "hashing", "bytes", "indexed"]);
}
