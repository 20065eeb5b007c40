use save_share_catalog::{CatalogLoader, GAMELIST_FILE, GameEntry};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_gamelist(root: &Path, system: &str, games: &[(&str, &str)]) {
    let dir = root.join(system);
    fs::create_dir_all(&dir).unwrap();
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<gameList>\n");
    for (path, name) in games {
        xml.push_str(&format!(
            "  <game><path>{path}</path><name>{name}</name></game>\n"
        ));
    }
    xml.push_str("</gameList>\n");
    fs::write(dir.join(GAMELIST_FILE), xml).unwrap();
}

#[test]
fn systems_are_sorted_and_skip_files() {
    let tmp = TempDir::new().unwrap();
    for system in ["snes", "gba", "n64"] {
        fs::create_dir(tmp.path().join(system)).unwrap();
    }
    fs::write(tmp.path().join("readme.txt"), "not a system").unwrap();

    let loader = CatalogLoader::new(tmp.path());
    assert_eq!(loader.systems().unwrap(), vec!["gba", "n64", "snes"]);
}

#[test]
fn entries_follow_system_then_catalog_order() {
    let tmp = TempDir::new().unwrap();
    write_gamelist(tmp.path(), "snes", &[("./zelda.sfc", "Zelda"), ("./smw.sfc", "Mario")]);
    write_gamelist(tmp.path(), "gba", &[("./metroid.gba", "Metroid Fusion")]);

    let loader = CatalogLoader::new(tmp.path());
    let entries: Vec<GameEntry> = loader.entries().unwrap().collect();
    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Metroid Fusion", "Zelda", "Mario"]);
    assert_eq!(entries[0].system, "gba");
    assert_eq!(entries[1].system, "snes");
}

#[test]
fn system_without_catalog_yields_nothing() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("psx")).unwrap();
    write_gamelist(tmp.path(), "snes", &[("./zelda.sfc", "Zelda")]);

    let loader = CatalogLoader::new(tmp.path());
    assert!(loader.load_system("psx").unwrap().is_empty());
    assert_eq!(loader.entries().unwrap().count(), 1);
}

#[test]
fn broken_catalog_does_not_stop_other_systems() {
    let tmp = TempDir::new().unwrap();
    write_gamelist(tmp.path(), "gba", &[("./metroid.gba", "Metroid Fusion")]);
    fs::create_dir(tmp.path().join("n64")).unwrap();
    fs::write(
        tmp.path().join("n64").join(GAMELIST_FILE),
        "<gameList><game><path>./a.z64</name></game></gameList>",
    )
    .unwrap();
    write_gamelist(tmp.path(), "snes", &[("./zelda.sfc", "Zelda")]);

    let loader = CatalogLoader::new(tmp.path());
    assert!(loader.load_system("n64").is_err());

    let mut iter = loader.entries().unwrap();
    let systems: Vec<String> = iter.by_ref().map(|e| e.system).collect();
    assert_eq!(systems, vec!["gba", "snes"]);
    assert_eq!(iter.failed_systems(), ["n64".to_string()]);
}

#[test]
fn entries_are_restartable() {
    let tmp = TempDir::new().unwrap();
    write_gamelist(tmp.path(), "snes", &[("./zelda.sfc", "Zelda")]);

    let loader = CatalogLoader::new(tmp.path());
    let first: Vec<GameEntry> = loader.entries().unwrap().collect();
    let second: Vec<GameEntry> = loader.entries().unwrap().collect();
    assert_eq!(first, second);
}

#[test]
fn missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let loader = CatalogLoader::new(tmp.path().join("nope"));
    assert!(loader.systems().is_err());
    assert!(loader.entries().is_err());
}

#[test]
fn custom_catalog_file_name() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("snes")).unwrap();
    fs::write(
        tmp.path().join("snes").join("games.xml"),
        "<gameList><game><path>zelda.sfc</path><name>Zelda</name></game></gameList>",
    )
    .unwrap();

    let loader = CatalogLoader::new(tmp.path()).with_file_name("games.xml");
    assert_eq!(loader.entries().unwrap().count(), 1);
}
