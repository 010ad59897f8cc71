//! Open Library search API

use super::http::get_json;
use super::MetadataSource;
use crate::error::LookupError;
use crate::types::{Isbn, LookupRecord};
use async_trait::async_trait;
use serde::Deserialize;

pub const OPEN_LIBRARY_BASE_URL: &str = "https://openlibrary.org";
const COVERS_BASE_URL: &str = "https://covers.openlibrary.org/b/id";
const SEARCH_FIELDS: &str = "title,author_name,subject,ddc,lcc,isbn,cover_i";

/// search.json response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchDoc {
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub subject: Vec<String>,
    /// Dewey Decimal numbers
    #[serde(default)]
    pub ddc: Vec<String>,
    /// Library of Congress call numbers
    #[serde(default)]
    pub lcc: Vec<String>,
    #[serde(default)]
    pub isbn: Vec<String>,
    pub cover_i: Option<i64>,
}

impl SearchDoc {
    /// Dewey when present, else LCC
    pub fn classification(&self) -> Option<String> {
        first_code(&self.ddc).or_else(|| first_code(&self.lcc))
    }
}

fn first_code(codes: &[String]) -> Option<String> {
    codes.first().filter(|c| !c.trim().is_empty()).cloned()
}

impl SearchResponse {
    /// Normalize the first document, ignoring the rest
    pub fn into_first_record(self, query: &str) -> Result<LookupRecord, LookupError> {
        let doc = self
            .docs
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound(query.to_string()))?;

        let classification_code = doc.classification();
        let title = doc
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| LookupError::Parse("first document has no title".to_string()))?;

        Ok(LookupRecord {
            title,
            author: doc.author_name.into_iter().next(),
            category: doc.subject.into_iter().next(),
            classification_code,
            cover_image_url: doc
                .cover_i
                .filter(|id| *id > 0)
                .map(|id| format!("{}/{}-M.jpg", COVERS_BASE_URL, id)),
            identifiers: doc.isbn,
        })
    }
}

/// Client for the Open Library search endpoint
pub struct OpenLibrarySource {
    client: reqwest::Client,
    base_url: String,
}

impl OpenLibrarySource {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, OPEN_LIBRARY_BASE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, param: &str, value: &str) -> String {
        format!(
            "{}/search.json?{}={}&fields={}&limit=1",
            self.base_url,
            param,
            urlencoding::encode(value),
            SEARCH_FIELDS
        )
    }

    pub fn isbn_url(&self, isbn: &Isbn) -> String {
        self.search_url("isbn", isbn.as_str())
    }

    pub fn title_url(&self, title: &str) -> String {
        self.search_url("title", title)
    }
}

#[async_trait]
impl MetadataSource for OpenLibrarySource {
    fn name(&self) -> &str {
        "open-library"
    }

    async fn lookup_isbn(&self, isbn: &Isbn) -> Result<LookupRecord, LookupError> {
        let response: SearchResponse = get_json(&self.client, &self.isbn_url(isbn)).await?;
        response.into_first_record(isbn.as_str())
    }

    async fn lookup_title(&self, title: &str) -> Result<LookupRecord, LookupError> {
        let response: SearchResponse = get_json(&self.client, &self.title_url(title)).await?;
        response.into_first_record(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let source = OpenLibrarySource::with_base_url(reqwest::Client::new(), "https://ol.test/");
        let isbn = Isbn::parse("0441172717").unwrap();

        assert_eq!(
            source.isbn_url(&isbn),
            "https://ol.test/search.json?isbn=9780441172719&fields=title,author_name,subject,ddc,lcc,isbn,cover_i&limit=1"
        );
        assert!(source
            .title_url("The Left Hand of Darkness")
            .starts_with("https://ol.test/search.json?title=The%20Left%20Hand%20of%20Darkness&"));
    }

    #[test]
    fn test_first_doc_with_dewey() {
        let body = r#"{
            "numFound": 2,
            "docs": [
                {
                    "title": "Dune",
                    "author_name": ["Frank Herbert"],
                    "subject": ["Science fiction", "Arrakis"],
                    "ddc": ["813.54"],
                    "lcc": ["PS-3558.00000000.E63 D8"],
                    "isbn": ["9780441172719"],
                    "cover_i": 11481354
                },
                {"title": "Dune Messiah", "ddc": ["999"]}
            ]
        }"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        let record = response.into_first_record("Dune").unwrap();

        assert_eq!(record.title, "Dune");
        assert_eq!(record.author.as_deref(), Some("Frank Herbert"));
        assert_eq!(record.category.as_deref(), Some("Science fiction"));
        assert_eq!(record.classification_code.as_deref(), Some("813.54"));
        assert_eq!(
            record.cover_image_url.as_deref(),
            Some("https://covers.openlibrary.org/b/id/11481354-M.jpg")
        );
    }

    #[test]
    fn test_lcc_used_without_dewey() {
        let doc = SearchDoc {
            lcc: vec!["PS-3558".to_string()],
            ..Default::default()
        };
        assert_eq!(doc.classification().as_deref(), Some("PS-3558"));
        assert_eq!(SearchDoc::default().classification(), None);

        let blank_dewey = SearchDoc {
            ddc: vec![" ".to_string()],
            lcc: vec!["PS-3558".to_string()],
            ..Default::default()
        };
        assert_eq!(blank_dewey.classification().as_deref(), Some("PS-3558"));
    }

    #[test]
    fn test_no_docs_is_not_found() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"numFound": 0, "docs": []}"#).unwrap();
        assert!(matches!(
            response.into_first_record("zzz"),
            Err(LookupError::NotFound(_))
        ));
    }
}
