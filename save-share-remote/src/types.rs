use serde::{Deserialize, Deserializer, Serialize};

use save_share_core::SaveKind;

/// Tags suggested by the CLI; any free-form tag is accepted.
pub const TAG_PRESETS: &[&str] = &["Boss", "100%", "All items", "Early", "Mid", "Late"];

/// Trim tags, drop empty and repeated ones, and spell presets the canonical
/// way (`"all ITEMS"` becomes `"All items"`). Order of first use is kept.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() {
            continue;
        }
        let tag = TAG_PRESETS
            .iter()
            .find(|preset| preset.eq_ignore_ascii_case(tag))
            .map_or_else(|| tag.to_string(), |preset| preset.to_string());
        if !out.iter().any(|seen| seen.eq_ignore_ascii_case(&tag)) {
            out.push(tag);
        }
    }
    out
}

/// A shared save as listed by the `saves_view` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSave {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub system: String,
    #[serde(rename = "rom_hash")]
    pub content_hash: String,
    #[serde(rename = "rom_name")]
    pub title: String,
    #[serde(rename = "save_type")]
    pub kind: SaveKind,
    #[serde(default)]
    pub core: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "uploader_nickname", default)]
    pub uploader: Option<String>,
    pub storage_path: String,
}

/// Row registered in the `saves` table before the binary is uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSave {
    pub id: String,
    pub game_id: String,
    #[serde(rename = "save_type")]
    pub kind: SaveKind,
    pub core: Option<String>,
    pub tags: Vec<String>,
    pub description: String,
    #[serde(rename = "uploader_nickname")]
    pub uploader: Option<String>,
    pub storage_path: String,
}

/// User-supplied details attached to an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadMeta {
    pub description: String,
    pub tags: Vec<String>,
    /// Emulator core; only kept for save-states.
    pub core: Option<String>,
    /// Device nickname shown to other users.
    pub uploader: Option<String>,
}

/// What an upload created on the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub game_id: String,
    pub save_id: String,
    pub storage_path: String,
    pub bytes: u64,
}

/// Row sent to the `games` table.
#[derive(Debug, Serialize)]
pub(crate) struct GameRow<'a> {
    pub system: &'a str,
    pub rom_hash: &'a str,
    pub rom_name: &'a str,
}

/// Any row of which only the id is needed.
#[derive(Debug, Deserialize)]
pub(crate) struct IdRow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

/// Ids may be UUID strings or integer keys depending on the table.
fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(d)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or numeric id, got {other}"
        ))),
    }
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(["  boss ", "", "all ITEMS", "Boss", "speedrun", "SPEEDRUN"]);
        assert_eq!(tags, vec!["Boss", "All items", "speedrun"]);
    }

    #[test]
    fn test_remote_save_from_view_row() {
        let row = r#"{
            "id": 42,
            "system": "snes",
            "rom_hash": "abc",
            "rom_name": "Zelda",
            "save_type": "state",
            "core": "snes9x",
            "tags": null,
            "description": null,
            "uploader_nickname": "knulli-user",
            "storage_path": "snes/abc/42.bin"
        }"#;
        let save: RemoteSave = serde_json::from_str(row).unwrap();
        assert_eq!(save.id, "42");
        assert_eq!(save.kind, SaveKind::SaveState);
        assert!(save.tags.is_empty());
        assert_eq!(save.description, "");
        assert_eq!(save.uploader.as_deref(), Some("knulli-user"));
    }

    #[test]
    fn test_new_save_uses_table_column_names() {
        let row = NewSave {
            id: "u".into(),
            game_id: "g".into(),
            kind: SaveKind::SaveMemory,
            core: None,
            tags: vec!["Boss".into()],
            description: "before the last dungeon".into(),
            uploader: Some("rg35xx".into()),
            storage_path: "snes/abc/u.bin".into(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["save_type"], "sram");
        assert_eq!(json["uploader_nickname"], "rg35xx");
        assert!(json["core"].is_null());
    }
}
