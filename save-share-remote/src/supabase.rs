//! [`RemoteStore`] backed by a Supabase project: PostgREST tables for the
//! metadata and a storage bucket for the save binaries.

use std::collections::BTreeSet;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};

use save_share_lib::RemoteSettings;

use crate::error::RemoteError;
use crate::store::RemoteStore;
use crate::types::{GameRow, IdRow, NewSave, RemoteSave};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP client for the save-share Supabase schema.
pub struct SupabaseStore {
    http: Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl SupabaseStore {
    pub fn new(settings: &RemoteSettings) -> Result<Self, RemoteError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            bucket: settings.bucket.clone(),
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn object_url(&self, storage_path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            storage_path.trim_start_matches('/')
        )
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn find_game(&self, system: &str, content_hash: &str) -> Result<Option<String>, RemoteError> {
        let url = self.rest_url("games");
        let resp = self
            .authed(self.http.get(&url))
            .query(&[
                ("select", "id".to_string()),
                ("system", format!("eq.{system}")),
                ("rom_hash", format!("eq.{content_hash}")),
            ])
            .send()?;
        let rows: Vec<IdRow> = check_status(resp, &url)?.json()?;
        Ok(rows.into_iter().next().map(|r| r.id))
    }
}

impl RemoteStore for SupabaseStore {
    fn upsert_game(
        &self,
        system: &str,
        content_hash: &str,
        title: &str,
    ) -> Result<String, RemoteError> {
        let url = self.rest_url("games");
        let body = [GameRow {
            system,
            rom_hash: content_hash,
            rom_name: title,
        }];
        let resp = self
            .authed(self.http.post(&url))
            .query(&[("on_conflict", "system,rom_hash")])
            .header("Prefer", "return=representation,resolution=merge-duplicates")
            .json(&body)
            .send()?;
        let rows: Vec<IdRow> = check_status(resp, &url)?.json()?;

        if let Some(row) = rows.into_iter().next() {
            log::debug!("Upserted game {system}/{content_hash} as {}", row.id);
            return Ok(row.id);
        }
        // Nothing echoed back: the row already existed.
        self.find_game(system, content_hash)?
            .ok_or_else(|| RemoteError::api(format!("no game id for {system}/{content_hash}")))
    }

    fn register_save(&self, save: &NewSave) -> Result<String, RemoteError> {
        let url = self.rest_url("saves");
        let resp = self
            .authed(self.http.post(&url))
            .header("Prefer", "return=representation")
            .json(save)
            .send()?;
        let rows: Vec<IdRow> = check_status(resp, &url)?.json()?;
        Ok(rows
            .into_iter()
            .next()
            .map(|r| r.id)
            .unwrap_or_else(|| save.id.clone()))
    }

    fn upload_object(&self, storage_path: &str, bytes: Vec<u8>) -> Result<(), RemoteError> {
        let url = self.object_url(storage_path);
        let size = bytes.len();
        let resp = self
            .authed(self.http.post(&url))
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()?;
        check_status(resp, &url)?;
        log::debug!("Uploaded {size} bytes to {url}");
        Ok(())
    }

    fn list_saves(&self, games: &[(&str, &str)]) -> Result<Vec<RemoteSave>, RemoteError> {
        if games.is_empty() {
            return Ok(Vec::new());
        }

        let systems: BTreeSet<&str> = games.iter().map(|(s, _)| *s).collect();
        let hashes: BTreeSet<&str> = games.iter().map(|(_, h)| *h).collect();
        let url = self.rest_url("saves_view");
        let resp = self
            .authed(self.http.get(&url))
            .query(&[
                ("system", in_filter(&systems)),
                ("rom_hash", in_filter(&hashes)),
            ])
            .send()?;
        let rows: Vec<RemoteSave> = check_status(resp, &url)?.json()?;

        // The two `in` filters select the cross product; keep requested pairs.
        let wanted: BTreeSet<(&str, &str)> = games.iter().copied().collect();
        Ok(rows
            .into_iter()
            .filter(|s| wanted.contains(&(s.system.as_str(), s.content_hash.as_str())))
            .collect())
    }

    fn download_object(&self, storage_path: &str) -> Result<Option<Vec<u8>>, RemoteError> {
        let url = self.object_url(storage_path);
        let resp = self.authed(self.http.get(&url)).send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let bytes = check_status(resp, &url)?.bytes()?;
        Ok(Some(bytes.to_vec()))
    }
}

/// PostgREST `in.(a,b,c)` filter value.
fn in_filter(values: &BTreeSet<&str>) -> String {
    let joined: Vec<&str> = values.iter().copied().collect();
    format!("in.({})", joined.join(","))
}

fn check_status(resp: Response, url: &str) -> Result<Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        url: url.to_string(),
        message: text.chars().take(200).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SupabaseStore {
        SupabaseStore::new(&RemoteSettings {
            url: "https://demo.supabase.co/".into(),
            api_key: "key".into(),
            bucket: "saves".into(),
        })
        .unwrap()
    }

    #[test]
    fn test_urls() {
        let store = store();
        assert_eq!(store.rest_url("saves_view"), "https://demo.supabase.co/rest/v1/saves_view");
        assert_eq!(
            store.object_url("snes/abc/1.bin"),
            "https://demo.supabase.co/storage/v1/object/saves/snes/abc/1.bin"
        );
    }

    #[test]
    fn test_in_filter_is_sorted() {
        let values: BTreeSet<&str> = ["snes", "gba", "n64"].into_iter().collect();
        assert_eq!(in_filter(&values), "in.(gba,n64,snes)");
    }

    #[test]
    fn test_empty_filter_skips_request() {
        assert!(store().list_saves(&[]).unwrap().is_empty());
    }
}
