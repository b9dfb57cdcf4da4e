//! # Image Lookup Client
//!
//! Implements `ImageLookup` against an HTTP+JSON endpoint that returns a list of
//! entries, each carrying a resource URL (by default the NASA Mars rover photos API).
//! No timeout: the call blocks the bot loop until the service answers.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde_json::Value;

use crate::domain::config::{ImageSelection, ImagesConfig};
use crate::domain::error::ImageLookupError;
use crate::domain::traits::ImageLookup;

pub struct HttpImageLookup {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    list_field: String,
    url_field: String,
    selection: ImageSelection,
}

impl HttpImageLookup {
    pub fn new(config: &ImagesConfig, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key,
            list_field: config.list_field.clone(),
            url_field: config.url_field.clone(),
            selection: config.selection.clone(),
        }
    }

    async fn fetch_urls(&self) -> Result<Vec<String>, ImageLookupError> {
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ImageLookupError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ImageLookupError::Status(status.as_u16()));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ImageLookupError::Body(e.to_string()))?;
        extract_urls(&body, &self.list_field, &self.url_field)
    }
}

#[async_trait]
impl ImageLookup for HttpImageLookup {
    async fn lookup(&self) -> Result<String, ImageLookupError> {
        let urls = self.fetch_urls().await?;
        tracing::debug!(count = urls.len(), "Image lookup returned candidates");
        select(&urls, &self.selection)
    }
}

/// Collects `body[list_field][*][url_field]`, skipping entries without a string URL.
pub fn extract_urls(
    body: &Value,
    list_field: &str,
    url_field: &str,
) -> Result<Vec<String>, ImageLookupError> {
    let entries = body
        .get(list_field)
        .and_then(Value::as_array)
        .ok_or_else(|| ImageLookupError::MissingList(list_field.to_string()))?;

    Ok(entries
        .iter()
        .filter_map(|entry| entry.get(url_field).and_then(Value::as_str))
        .map(str::to_string)
        .collect())
}

pub fn select(urls: &[String], selection: &ImageSelection) -> Result<String, ImageLookupError> {
    match selection {
        ImageSelection::Random => urls
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(ImageLookupError::Empty),
        ImageSelection::Index(_) if urls.is_empty() => Err(ImageLookupError::Empty),
        ImageSelection::Index(index) => urls.get(*index).cloned().ok_or(ImageLookupError::OutOfRange {
            index: *index,
            len: urls.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn photos() -> Value {
        json!({
            "photos": [
                {"id": 1, "img_src": "http://mars.test/1.jpg"},
                {"id": 2},
                {"id": 3, "img_src": "http://mars.test/3.jpg"}
            ]
        })
    }

    #[test]
    fn test_extract_skips_entries_without_url() {
        let urls = extract_urls(&photos(), "photos", "img_src").unwrap();
        assert_eq!(urls, vec!["http://mars.test/1.jpg", "http://mars.test/3.jpg"]);
    }

    #[test]
    fn test_extract_requires_list() {
        assert_eq!(
            extract_urls(&json!({"errors": "nope"}), "photos", "img_src"),
            Err(ImageLookupError::MissingList("photos".to_string()))
        );
    }

    #[test]
    fn test_selection_policies() {
        let urls = vec!["a".to_string(), "b".to_string()];
        assert_eq!(select(&urls, &ImageSelection::Index(1)).unwrap(), "b");
        assert_eq!(
            select(&urls, &ImageSelection::Index(2)),
            Err(ImageLookupError::OutOfRange { index: 2, len: 2 })
        );
        let picked = select(&urls, &ImageSelection::Random).unwrap();
        assert!(urls.contains(&picked));
        assert_eq!(select(&[], &ImageSelection::Random), Err(ImageLookupError::Empty));
        assert_eq!(select(&[], &ImageSelection::Index(0)), Err(ImageLookupError::Empty));
    }

    #[tokio::test]
    async fn test_lookup_passes_api_key_and_picks_url() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/photos")
                .query_param("sol", "1000")
                .query_param("api_key", "DEMO_KEY");
            then.status(200).json_body(photos());
        });

        let config = ImagesConfig {
            endpoint: format!("{}/photos?sol=1000", server.base_url()),
            selection: ImageSelection::Index(0),
            ..ImagesConfig::default()
        };
        let lookup = HttpImageLookup::new(&config, "DEMO_KEY".to_string());

        assert_eq!(lookup.lookup().await.unwrap(), "http://mars.test/1.jpg");
        mock.assert();
    }

    #[tokio::test]
    async fn test_lookup_reports_http_failure() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/photos");
            then.status(500);
        });

        let config = ImagesConfig {
            endpoint: format!("{}/photos", server.base_url()),
            ..ImagesConfig::default()
        };
        let lookup = HttpImageLookup::new(&config, "DEMO_KEY".to_string());

        assert_eq!(lookup.lookup().await, Err(ImageLookupError::Status(500)));
    }
}
