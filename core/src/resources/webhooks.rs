//! List webhooks: `/lists/{list_id}/webhooks`.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::{Client, Request};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::resource::{attached, require_id, segment, Link, ParentKeys, Resource};
use crate::resources::lists::{list_path, MailingList};

fn webhooks_path(list_id: &str) -> String {
    format!("{}/webhooks", list_path(list_id))
}

fn webhook_path(list_id: &str, id: &str) -> String {
    format!("{}/{}", webhooks_path(list_id), segment(id))
}

fn require_webhook(list_id: &str, id: &str) -> Result<(), ApiError> {
    require_id("webhook", "list_id", list_id)?;
    require_id("webhook", "id", id)
}

/// Which list events fire the hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookEvents {
    pub subscribe: bool,
    pub unsubscribe: bool,
    pub profile: bool,
    pub cleaned: bool,
    pub upemail: bool,
    pub campaign: bool,
}

/// Which kinds of change fire the hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookSources {
    pub user: bool,
    pub admin: bool,
    pub api: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebHookRequest {
    pub url: String,
    pub events: HookEvents,
    pub sources: HookSources,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebHook {
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub id: String,
    pub list_id: String,
    pub url: String,
    pub events: HookEvents,
    pub sources: HookSources,

    #[serde(skip)]
    client: Option<Client>,
}

impl Resource for WebHook {
    fn attach(&mut self, client: &Client, _parent: &ParentKeys) {
        self.client = Some(client.clone());
    }
}

impl WebHook {
    pub async fn delete(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        require_webhook(&self.list_id, &self.id)?;
        attached(&self.client, "webhook")?
            .delete_webhook(cancel, &self.list_id, &self.id)
            .await
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListOfWebHooks {
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub list_id: String,
    pub webhooks: Vec<WebHook>,
}

impl Resource for ListOfWebHooks {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.webhooks.attach(client, parent);
    }
}

impl MailingList {
    pub async fn webhooks(&self, cancel: &CancellationToken) -> Result<ListOfWebHooks, ApiError> {
        self.can_make_request()?.get_webhooks(cancel, &self.id).await
    }

    pub async fn webhook(&self, cancel: &CancellationToken, id: &str) -> Result<WebHook, ApiError> {
        self.can_make_request()?.get_webhook(cancel, &self.id, id).await
    }

    pub async fn create_webhook(&self, cancel: &CancellationToken, body: &WebHookRequest) -> Result<WebHook, ApiError> {
        self.can_make_request()?.create_webhook(cancel, &self.id, body).await
    }

    pub async fn update_webhook(
        &self,
        cancel: &CancellationToken,
        id: &str,
        body: &WebHookRequest,
    ) -> Result<WebHook, ApiError> {
        self.can_make_request()?.update_webhook(cancel, &self.id, id, body).await
    }

    pub async fn delete_webhook(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        self.can_make_request()?.delete_webhook(cancel, &self.id, id).await
    }
}

impl Client {
    pub async fn get_webhooks(&self, cancel: &CancellationToken, list_id: &str) -> Result<ListOfWebHooks, ApiError> {
        require_id("list", "id", list_id)?;
        self.fetch(cancel, Request::get(webhooks_path(list_id))).await
    }

    pub async fn get_webhook(&self, cancel: &CancellationToken, list_id: &str, id: &str) -> Result<WebHook, ApiError> {
        require_webhook(list_id, id)?;
        self.fetch(cancel, Request::get(webhook_path(list_id, id))).await
    }

    pub async fn create_webhook(
        &self,
        cancel: &CancellationToken,
        list_id: &str,
        body: &WebHookRequest,
    ) -> Result<WebHook, ApiError> {
        require_id("list", "id", list_id)?;
        self.fetch(cancel, Request::post(webhooks_path(list_id)).json(body)?).await
    }

    pub async fn update_webhook(
        &self,
        cancel: &CancellationToken,
        list_id: &str,
        id: &str,
        body: &WebHookRequest,
    ) -> Result<WebHook, ApiError> {
        require_webhook(list_id, id)?;
        self.fetch(cancel, Request::patch(webhook_path(list_id, id)).json(body)?).await
    }

    pub async fn delete_webhook(&self, cancel: &CancellationToken, list_id: &str, id: &str) -> Result<bool, ApiError> {
        require_webhook(list_id, id)?;
        self.execute_ok(cancel, HttpMethod::Delete, webhook_path(list_id, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client, ENDPOINT};

    #[tokio::test]
    async fn list_creates_webhook_and_hook_deletes_itself() {
        let (client, transport) = client();
        let cancel = CancellationToken::new();
        transport.push(200, r#"{"id":"L1"}"#);
        let list = client.get_list(&cancel, "L1", None).await.unwrap();

        let body = WebHookRequest {
            url: "https://hooks.example.com/in".to_string(),
            events: HookEvents { subscribe: true, ..Default::default() },
            sources: HookSources { api: true, ..Default::default() },
        };
        transport.push(200, r#"{"id":"w1","list_id":"L1","url":"https://hooks.example.com/in","events":{"subscribe":true}}"#);
        let hook = list.create_webhook(&cancel, &body).await.unwrap();
        assert!(hook.events.subscribe);

        let sent: serde_json::Value = serde_json::from_str(transport.last().body.as_deref().unwrap()).unwrap();
        assert_eq!(sent["events"]["subscribe"], true);
        assert_eq!(sent["sources"]["api"], true);
        assert_eq!(sent["sources"]["user"], false);

        assert!(hook.delete(&cancel).await.unwrap());
        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Delete);
        assert_eq!(sent.url, format!("{ENDPOINT}/lists/L1/webhooks/w1"));
    }

    #[tokio::test]
    async fn client_level_webhook_ops_require_a_list_id() {
        let (client, transport) = client();
        let err = client.get_webhooks(&CancellationToken::new(), "").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(transport.count(), 0);
    }
}
