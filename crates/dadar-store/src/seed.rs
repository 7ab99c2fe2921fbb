//! Atomic seeding of collections through `documents:commit`.

use dadar_core::SeedFile;
use rand::distr::Alphanumeric;
use rand::Rng;

use crate::client::FirestoreClient;
use crate::error::StoreError;
use crate::types::{CommitRequest, CommitResponse, FirestoreDocument, Write};
use crate::value::encode_fields;

/// Length of generated document ids, matching Firestore auto ids.
const AUTO_ID_LEN: usize = 20;

impl FirestoreClient {
    /// Writes every seed document in a single commit.
    ///
    /// The commit is atomic: either every document is written or none is.
    /// Documents without an explicit id receive a random 20-character id.
    /// Returns the number of documents written.
    ///
    /// # Errors
    ///
    /// - [`StoreError::MalformedValue`] if a field cannot be encoded.
    /// - Any error from the HTTP request (see [`FirestoreClient::list_page`]).
    /// - [`StoreError::Deserialize`] if the commit response is not valid JSON.
    pub async fn commit_seed(&self, seed: &SeedFile) -> Result<usize, StoreError> {
        let request = self.build_commit(seed)?;
        let count = request.writes.len();
        if count == 0 {
            tracing::info!("seed file has no documents; nothing to commit");
            return Ok(0);
        }

        let url = self.commit_url()?;
        let body = self
            .send(self.client.post(url.clone()).json(&request), &url)
            .await?;
        let response: CommitResponse =
            serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
                context: "commit response".to_string(),
                source: e,
            })?;

        tracing::info!(
            documents = count,
            acknowledged = response.write_results.len(),
            commit_time = response.commit_time.as_deref().unwrap_or("unknown"),
            "seed committed"
        );
        Ok(count)
    }

    pub(crate) fn build_commit(&self, seed: &SeedFile) -> Result<CommitRequest, StoreError> {
        let mut writes = Vec::with_capacity(seed.document_count());
        for collection in &seed.collections {
            for doc in &collection.documents {
                let id = doc.id.clone().unwrap_or_else(auto_id);
                let fields =
                    encode_fields(&doc.fields).map_err(|reason| StoreError::MalformedValue {
                        context: format!("{}/{id}", collection.name),
                        reason,
                    })?;
                writes.push(Write {
                    update: FirestoreDocument {
                        name: self.document_name(&collection.name, &id),
                        fields,
                        create_time: None,
                        update_time: None,
                    },
                });
            }
        }
        Ok(CommitRequest { writes })
    }

    /// Full resource name of a document, derived from the documents URL path.
    fn document_name(&self, collection: &str, id: &str) -> String {
        let path = self.documents_url.path();
        // The resource name starts at `projects/`, after the API version prefix.
        let root = path
            .find("projects/")
            .map_or(path, |start| &path[start..])
            .trim_end_matches('/');
        format!("{root}/{collection}/{id}")
    }

    fn commit_url(&self) -> Result<reqwest::Url, StoreError> {
        let documents = self.documents_url.as_str().trim_end_matches('/');
        let mut url = reqwest::Url::parse(&format!("{documents}:commit"))
            .map_err(|e| StoreError::InvalidConfig(format!("commit URL: {e}")))?;
        self.append_key(&mut url);
        Ok(url)
    }
}

fn auto_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LEN)
        .map(char::from)
        .collect()
}
