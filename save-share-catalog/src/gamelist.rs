use std::io::BufRead;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use save_share_core::GameEntry;

use crate::error::CatalogError;

// Element depths: <gameList> = 1, <game> = 2, <path>/<name> = 3.
const GAME_DEPTH: usize = 2;
const FIELD_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Path,
    Name,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"path" => Some(Self::Path),
            b"name" => Some(Self::Name),
            _ => None,
        }
    }
}

/// A `<game>` element as it is being read. `None` means the element was
/// never seen; `Some("")` means it was present but empty. Only the first
/// `<path>` and `<name>` count; later duplicates are ignored once the first
/// one has closed.
#[derive(Debug, Default)]
struct PartialGame {
    path: Option<String>,
    name: Option<String>,
    path_closed: bool,
    name_closed: bool,
}

impl PartialGame {
    fn slot(&mut self, field: Field) -> Option<&mut String> {
        let (slot, closed) = match field {
            Field::Path => (&mut self.path, self.path_closed),
            Field::Name => (&mut self.name, self.name_closed),
        };
        if closed {
            None
        } else {
            Some(slot.get_or_insert_with(String::new))
        }
    }

    /// Returns false when this field was already read.
    fn open(&mut self, field: Field) -> bool {
        self.slot(field).is_some()
    }

    fn push_text(&mut self, field: Field, text: &str) {
        if let Some(slot) = self.slot(field) {
            slot.push_str(text);
        }
    }

    fn close(&mut self, field: Field) {
        match field {
            Field::Path => self.path_closed = true,
            Field::Name => self.name_closed = true,
        }
    }

    fn into_entry(self, system: &str) -> Option<GameEntry> {
        let rom_path = self.path?.trim().to_string();
        let name = self.name?;
        if rom_path.is_empty() {
            return None;
        }
        let title = match name.trim() {
            "" => Path::new(&rom_path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| rom_path.clone()),
            trimmed => trimmed.to_string(),
        };
        Some(GameEntry::new(system, title, rom_path))
    }
}

/// Parse a `gamelist.xml` document into game entries for `system`.
///
/// Only `<game>` elements directly under the root are read. Entries without
/// a `<path>` or `<name>` element, or with an empty path, are skipped. An
/// empty name falls back to the ROM file name.
pub fn parse_gamelist<R: BufRead>(
    reader: R,
    system: &str,
) -> Result<Vec<GameEntry>, quick_xml::Error> {
    // No trim_text: whitespace next to CDATA belongs to the value.
    // `into_entry` trims each field once.
    let mut xml = Reader::from_reader(reader);

    let mut buf = Vec::new();
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut current_game: Option<PartialGame> = None;
    let mut current_field: Option<Field> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;
                let tag = e.name();
                if depth == GAME_DEPTH && tag.as_ref() == b"game" {
                    current_game = Some(PartialGame::default());
                } else if depth == FIELD_DEPTH {
                    if let (Some(game), Some(field)) =
                        (current_game.as_mut(), Field::from_tag(tag.as_ref()))
                    {
                        if game.open(field) {
                            current_field = Some(field);
                        }
                    }
                }
            }
            Event::Empty(ref e) => {
                // Self-closing <path/> or <name/>: present but empty.
                if depth + 1 == FIELD_DEPTH {
                    if let (Some(game), Some(field)) =
                        (current_game.as_mut(), Field::from_tag(e.name().as_ref()))
                    {
                        if game.open(field) {
                            game.close(field);
                        }
                    }
                }
            }
            Event::Text(ref e) => {
                if depth == FIELD_DEPTH {
                    if let (Some(game), Some(field)) = (current_game.as_mut(), current_field) {
                        let text = e.unescape()?;
                        game.push_text(field, &text);
                    }
                }
            }
            Event::CData(ref e) => {
                if depth == FIELD_DEPTH {
                    if let (Some(game), Some(field)) = (current_game.as_mut(), current_field) {
                        game.push_text(field, &String::from_utf8_lossy(e));
                    }
                }
            }
            Event::End(_) => {
                if depth == FIELD_DEPTH {
                    if let (Some(game), Some(field)) = (current_game.as_mut(), current_field.take()) {
                        game.close(field);
                    }
                } else if depth == GAME_DEPTH {
                    if let Some(entry) = current_game.take().and_then(|g| g.into_entry(system)) {
                        entries.push(entry);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

/// Parse a catalog file from disk. A missing file yields no entries.
pub fn parse_gamelist_file(path: &Path, system: &str) -> Result<Vec<GameEntry>, CatalogError> {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(CatalogError::io(path, e)),
    };
    let reader = std::io::BufReader::new(file);
    parse_gamelist(reader, system).map_err(|e| CatalogError::xml(path, e))
}

#[cfg(test)]
#[path = "tests/gamelist_tests.rs"]
mod tests;
