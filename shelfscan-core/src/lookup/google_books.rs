//! Google Books volumes API

use super::http::get_json;
use super::MetadataSource;
use crate::error::LookupError;
use crate::types::{Isbn, LookupRecord};
use async_trait::async_trait;
use serde::Deserialize;

pub const GOOGLE_BOOKS_BASE_URL: &str = "https://www.googleapis.com/books/v1";

/// Volumes search response
#[derive(Debug, Deserialize)]
pub struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub industry_identifiers: Vec<IndustryIdentifier>,
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
pub struct IndustryIdentifier {
    /// `ISBN_10`, `ISBN_13` or `OTHER`
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
}

impl VolumesResponse {
    /// Normalize the first volume, ignoring the rest
    pub fn into_first_record(self, query: &str) -> Result<LookupRecord, LookupError> {
        let info = self
            .items
            .into_iter()
            .next()
            .map(|v| v.volume_info)
            .ok_or_else(|| LookupError::NotFound(query.to_string()))?;

        let title = info
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| LookupError::Parse("first volume has no title".to_string()))?;

        Ok(LookupRecord {
            title,
            author: info.authors.into_iter().next(),
            category: info.categories.into_iter().next(),
            // The volumes API carries no library classification
            classification_code: None,
            cover_image_url: info
                .image_links
                .and_then(|links| links.thumbnail.or(links.small_thumbnail)),
            identifiers: info
                .industry_identifiers
                .into_iter()
                .filter(|id| id.kind.starts_with("ISBN"))
                .map(|id| id.identifier)
                .collect(),
        })
    }
}

/// Client for the Google Books volumes endpoint
pub struct GoogleBooksSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksSource {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self::with_base_url(client, GOOGLE_BOOKS_BASE_URL, api_key)
    }

    pub fn with_base_url(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn volumes_url(&self, query: &str) -> String {
        let mut url = format!("{}/volumes?q={}", self.base_url, query);
        if let Some(key) = &self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }

    pub fn isbn_url(&self, isbn: &Isbn) -> String {
        self.volumes_url(&format!("isbn:{}", isbn))
    }

    pub fn title_url(&self, title: &str) -> String {
        self.volumes_url(&urlencoding::encode(title))
    }
}

#[async_trait]
impl MetadataSource for GoogleBooksSource {
    fn name(&self) -> &str {
        "google-books"
    }

    async fn lookup_isbn(&self, isbn: &Isbn) -> Result<LookupRecord, LookupError> {
        let response: VolumesResponse = get_json(&self.client, &self.isbn_url(isbn)).await?;
        response.into_first_record(isbn.as_str())
    }

    async fn lookup_title(&self, title: &str) -> Result<LookupRecord, LookupError> {
        let response: VolumesResponse = get_json(&self.client, &self.title_url(title)).await?;
        response.into_first_record(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(api_key: Option<&str>) -> GoogleBooksSource {
        GoogleBooksSource::with_base_url(
            reqwest::Client::new(),
            "https://books.test/v1/",
            api_key.map(String::from),
        )
    }

    #[test]
    fn test_urls() {
        let isbn = Isbn::parse("9780441172719").unwrap();
        assert_eq!(
            source(None).isbn_url(&isbn),
            "https://books.test/v1/volumes?q=isbn:9780441172719"
        );
        assert_eq!(
            source(Some("k1")).title_url("Dune & Co"),
            "https://books.test/v1/volumes?q=Dune%20%26%20Co&key=k1"
        );
    }

    #[test]
    fn test_first_volume_is_used() {
        let body = r#"{
            "kind": "books#volumes",
            "totalItems": 2,
            "items": [
                {"volumeInfo": {
                    "title": "Dune",
                    "authors": ["Frank Herbert", "Someone Else"],
                    "categories": ["Fiction"],
                    "industryIdentifiers": [
                        {"type": "ISBN_10", "identifier": "0441172717"},
                        {"type": "ISBN_13", "identifier": "9780441172719"},
                        {"type": "OTHER", "identifier": "OCLC:123"}
                    ],
                    "imageLinks": {"smallThumbnail": "http://img/s", "thumbnail": "http://img/t"}
                }},
                {"volumeInfo": {"title": "Dune Messiah"}}
            ]
        }"#;
        let response: VolumesResponse = serde_json::from_str(body).unwrap();
        let record = response.into_first_record("Dune").unwrap();

        assert_eq!(record.title, "Dune");
        assert_eq!(record.author.as_deref(), Some("Frank Herbert"));
        assert_eq!(record.category.as_deref(), Some("Fiction"));
        assert_eq!(record.cover_image_url.as_deref(), Some("http://img/t"));
        assert_eq!(record.identifiers, vec!["0441172717", "9780441172719"]);
        assert!(record.classification_code.is_none());
    }

    #[test]
    fn test_missing_optional_fields() {
        let body = r#"{"items": [{"volumeInfo": {"title": "Anonymous Work"}}]}"#;
        let response: VolumesResponse = serde_json::from_str(body).unwrap();
        let book = response.into_first_record("x").unwrap().into_book();

        assert_eq!(book.author, "Unknown Author");
        assert_eq!(book.category, "General");
    }

    #[test]
    fn test_no_items_is_not_found() {
        let response: VolumesResponse =
            serde_json::from_str(r#"{"kind": "books#volumes", "totalItems": 0}"#).unwrap();
        assert!(matches!(
            response.into_first_record("nothing"),
            Err(LookupError::NotFound(q)) if q == "nothing"
        ));
    }

    #[test]
    fn test_untitled_volume_is_rejected() {
        let response: VolumesResponse =
            serde_json::from_str(r#"{"items": [{"volumeInfo": {"authors": ["A"]}}]}"#).unwrap();
        assert!(matches!(
            response.into_first_record("x"),
            Err(LookupError::Parse(_))
        ));
    }
}
