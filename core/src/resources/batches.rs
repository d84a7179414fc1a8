//! Batch operations: `/batches`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::{Client, Request};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::params::{BasicQueryParams, ExtendedQueryParams};
use crate::resource::{attached, require_id, segment, Link, ParentKeys, Resource};

const BATCHES_PATH: &str = "/batches";

fn batch_path(id: &str) -> String {
    format!("{BATCHES_PATH}/{}", segment(id))
}

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_PREPROCESSING: &str = "preprocessing";
pub const STATUS_STARTED: &str = "started";
pub const STATUS_FINALIZING: &str = "finalizing";
pub const STATUS_FINISHED: &str = "finished";

/// One queued API call inside a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOperation {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    /// JSON body of the queued call, as a string.
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOperationCreationRequest {
    pub operations: Vec<BatchOperation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListOfBatchOperations {
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    #[serde(rename = "batches")]
    pub batch_operations: Vec<BatchOperationResponse>,
}

impl Resource for ListOfBatchOperations {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.batch_operations.attach(client, parent);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BatchOperationResponse {
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub id: String,
    pub status: String,
    pub total_operations: i64,
    pub finished_operations: i64,
    pub errored_operations: i64,
    pub submitted_at: String,
    pub completed_at: String,
    pub response_body_url: String,

    #[serde(skip)]
    client: Option<Client>,
}

impl Resource for BatchOperationResponse {
    fn attach(&mut self, client: &Client, _parent: &ParentKeys) {
        self.client = Some(client.clone());
    }
}

impl BatchOperationResponse {
    pub fn is_finished(&self) -> bool {
        self.status == STATUS_FINISHED
    }

    /// Fetch the current state of this batch.
    pub async fn refresh(&self, cancel: &CancellationToken) -> Result<BatchOperationResponse, ApiError> {
        require_id("batch", "id", &self.id)?;
        attached(&self.client, "batch")?
            .get_batch_operation(cancel, &self.id, None)
            .await
    }

    pub async fn delete(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        require_id("batch", "id", &self.id)?;
        attached(&self.client, "batch")?
            .delete_batch_operation(cancel, &self.id)
            .await
    }
}

impl Client {
    pub async fn get_batch_operations(
        &self,
        cancel: &CancellationToken,
        params: Option<&ExtendedQueryParams>,
    ) -> Result<ListOfBatchOperations, ApiError> {
        self.fetch(cancel, Request::get(BATCHES_PATH).query(params)).await
    }

    pub async fn get_batch_operation(
        &self,
        cancel: &CancellationToken,
        id: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<BatchOperationResponse, ApiError> {
        require_id("batch", "id", id)?;
        self.fetch(cancel, Request::get(batch_path(id)).query(params)).await
    }

    pub async fn create_batch_operation(
        &self,
        cancel: &CancellationToken,
        body: &BatchOperationCreationRequest,
    ) -> Result<BatchOperationResponse, ApiError> {
        self.fetch(cancel, Request::post(BATCHES_PATH).json(body)?).await
    }

    pub async fn delete_batch_operation(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        require_id("batch", "id", id)?;
        self.execute_ok(cancel, HttpMethod::Delete, batch_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client, ENDPOINT};

    #[tokio::test]
    async fn created_batch_can_refresh_itself() {
        let (client, transport) = client();
        let cancel = CancellationToken::new();
        let body = BatchOperationCreationRequest {
            operations: vec![BatchOperation {
                method: "GET".to_string(),
                path: "/lists".to_string(),
                ..Default::default()
            }],
        };
        transport.push(200, r#"{"id":"b1","status":"pending","total_operations":1}"#);
        let batch = client.create_batch_operation(&cancel, &body).await.unwrap();
        assert!(!batch.is_finished());

        let sent: serde_json::Value = serde_json::from_str(transport.last().body.as_deref().unwrap()).unwrap();
        assert_eq!(sent["operations"][0]["path"], "/lists");
        assert!(sent["operations"][0].get("params").is_none());

        transport.push(200, r#"{"id":"b1","status":"finished","finished_operations":1}"#);
        let refreshed = batch.refresh(&cancel).await.unwrap();
        assert!(refreshed.is_finished());
        assert_eq!(transport.last().url, format!("{ENDPOINT}/batches/b1"));
    }
}
