//! HTTP client for the Firestore REST API.
//!
//! Collections are read with `documents.list`, following `nextPageToken` until
//! the backend reports no further pages. No server-side filtering is requested:
//! callers receive every document and filter locally.

use std::time::Duration;

use async_trait::async_trait;
use dadar_core::{RawDocument, StoreConfig};
use reqwest::{Client, Url};

use crate::error::StoreError;
use crate::types::{FirestoreDocument, ListDocumentsResponse};
use crate::value::decode_fields;
use crate::DocumentStore;

/// Maximum number of pages to fetch per collection before returning an error.
/// Prevents infinite loops on cycling page tokens.
pub(crate) const MAX_PAGES: usize = 500;

/// Client for one Firestore database.
///
/// Use [`FirestoreClient::new`] with the configured base URL, or
/// [`FirestoreClient::with_base_url`] to point at a mock server in tests.
pub struct FirestoreClient {
    pub(crate) client: Client,
    /// `{base}/projects/{project}/databases/{database}/documents/`
    pub(crate) documents_url: Url,
    pub(crate) api_key: Option<String>,
    pub(crate) id_token: Option<String>,
    pub(crate) page_size: u32,
}

impl FirestoreClient {
    /// Creates a client from store configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed, or [`StoreError::InvalidConfig`] if the base URL is invalid.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;

        let documents_url =
            Self::documents_url(&config.base_url, &config.project_id, &config.database)?;

        Ok(Self {
            client,
            documents_url,
            api_key: config.api_key.clone(),
            id_token: config.id_token.clone(),
            page_size: config.page_size.max(1),
        })
    }

    /// Creates a client for `project_id` against a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`FirestoreClient::new`].
    pub fn with_base_url(
        base_url: &str,
        project_id: &str,
        page_size: u32,
    ) -> Result<Self, StoreError> {
        Self::new(&StoreConfig {
            base_url: base_url.to_string(),
            project_id: project_id.to_string(),
            database: "(default)".to_string(),
            api_key: None,
            id_token: None,
            timeout_secs: 30,
            user_agent: "dadar/0.1 (directory-search)".to_string(),
            page_size,
        })
    }

    /// Sets the API key sent as the `key` query parameter.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the bearer token sent in the `Authorization` header.
    #[must_use]
    pub fn with_id_token(mut self, id_token: impl Into<String>) -> Self {
        self.id_token = Some(id_token.into());
        self
    }

    /// Fetches one page of a collection.
    ///
    /// # Errors
    ///
    /// - [`StoreError::PermissionDenied`] on HTTP 401/403.
    /// - [`StoreError::NotFound`] on HTTP 404.
    /// - [`StoreError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`StoreError::Http`] on network or TLS failure.
    /// - [`StoreError::Deserialize`] if the body is not a list response.
    pub async fn list_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, StoreError> {
        let url = self.list_url(collection, page_token)?;
        let body = self.send(self.client.get(url.clone()), &url).await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
            context: format!("list of '{collection}'"),
            source: e,
        })
    }

    /// Builds the `documents.list` URL for a collection with paging parameters.
    pub(crate) fn list_url(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<Url, StoreError> {
        let mut url = self.collection_url(collection)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("pageSize", &self.page_size.to_string());
            if let Some(token) = page_token {
                pairs.append_pair("pageToken", token);
            }
        }
        self.append_key(&mut url);
        Ok(url)
    }

    pub(crate) fn collection_url(&self, collection: &str) -> Result<Url, StoreError> {
        if collection.is_empty() || collection.contains('/') {
            return Err(StoreError::InvalidConfig(format!(
                "invalid collection name '{collection}'"
            )));
        }
        self.documents_url
            .join(collection)
            .map_err(|e| StoreError::InvalidConfig(format!("collection '{collection}': {e}")))
    }

    pub(crate) fn append_key(&self, url: &mut Url) {
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
    }

    /// Sends a request with auth applied, maps non-2xx statuses to typed
    /// errors, and returns the response body.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<String, StoreError> {
        let request = match &self.id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        // reqwest errors embed the request URL, which carries the API key.
        let response = request.send().await.map_err(reqwest::Error::without_url)?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(StoreError::PermissionDenied {
                status: status.as_u16(),
                url: redact_key(url),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                url: redact_key(url),
            });
        }

        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact_key(url),
            });
        }

        Ok(response.text().await.map_err(reqwest::Error::without_url)?)
    }

    fn documents_url(base_url: &str, project_id: &str, database: &str) -> Result<Url, StoreError> {
        if project_id.trim().is_empty() {
            return Err(StoreError::InvalidConfig("project id is empty".to_string()));
        }
        // Normalise: exactly one trailing slash so `join` appends rather than
        // replacing the last path segment.
        let normalised = format!(
            "{}/projects/{project_id}/databases/{database}/documents/",
            base_url.trim_end_matches('/')
        );
        Url::parse(&normalised)
            .map_err(|e| StoreError::InvalidConfig(format!("invalid base URL '{base_url}': {e}")))
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    fn backend_tag(&self) -> &'static str {
        "firestore"
    }

    /// Fetches every document of a collection by following page tokens.
    ///
    /// **All-or-nothing**: a failure on any page discards the pages already
    /// fetched and returns the error.
    async fn list_all(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError> {
        let mut documents: Vec<RawDocument> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(StoreError::PaginationLimit {
                    collection: collection.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            let page = self.list_page(collection, page_token.as_deref()).await?;
            tracing::debug!(
                collection,
                page = page_count,
                count = page.documents.len(),
                "fetched document page"
            );

            for doc in page.documents {
                documents.push(into_raw_document(collection, doc)?);
            }

            page_token = page.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() {
                break;
            }
        }

        Ok(documents)
    }
}

fn into_raw_document(collection: &str, doc: FirestoreDocument) -> Result<RawDocument, StoreError> {
    let id = doc.id().to_string();
    let fields = decode_fields(&doc.fields).map_err(|reason| StoreError::MalformedValue {
        context: format!("{collection}/{id}"),
        reason,
    })?;
    Ok(RawDocument { id, fields })
}

/// Strips the API key from a URL before it lands in an error message.
fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k == "key" {
                (k.into_owned(), "[redacted]".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();
    if pairs.is_empty() {
        return redacted.to_string();
    }
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
