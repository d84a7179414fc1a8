//! Mailing lists (audiences): `/lists`.
//!
//! A fetched `MailingList` is the parent of its members, webhooks and
//! list-scoped member searches; those operations live next to their data
//! shapes in `members`, `webhooks` and `search`.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::{Client, Request};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::params::{BasicQueryParams, ListQueryParams};
use crate::resource::{attached, require_id, segment, Link, ParentKeys, Resource};

const LISTS_PATH: &str = "/lists";

pub(crate) fn list_path(id: &str) -> String {
    format!("{LISTS_PATH}/{}", segment(id))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListOfLists {
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub lists: Vec<MailingList>,
}

impl Resource for ListOfLists {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.lists.attach(client, parent);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub company: String,
    pub address1: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignDefaults {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListStats {
    pub member_count: i64,
    pub unsubscribe_count: i64,
    pub cleaned_count: i64,
    pub member_count_since_send: i64,
    pub unsubscribe_count_since_send: i64,
    pub cleaned_count_since_send: i64,
    pub campaign_count: i64,
    pub campaign_last_sent: String,
    pub merge_field_count: i64,
    pub avg_sub_rate: f64,
    pub avg_unsub_rate: f64,
    pub target_sub_rate: f64,
    pub open_rate: f64,
    pub click_rate: f64,
    pub last_sub_date: String,
    pub last_unsub_date: String,
}

/// Body for creating or updating a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListCreationRequest {
    pub name: String,
    pub contact: Contact,
    pub permission_reminder: String,
    pub use_archive_bar: bool,
    pub campaign_defaults: CampaignDefaults,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notify_on_subscribe: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notify_on_unsubscribe: String,
    pub email_type_option: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub visibility: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MailingList {
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub id: String,
    pub web_id: u64,
    pub name: String,
    pub contact: Contact,
    pub permission_reminder: String,
    pub use_archive_bar: bool,
    pub campaign_defaults: CampaignDefaults,
    pub notify_on_subscribe: String,
    pub notify_on_unsubscribe: String,
    pub date_created: String,
    pub list_rating: i64,
    pub email_type_option: bool,
    pub subscribe_url_short: String,
    pub subscribe_url_long: String,
    pub beamer_address: String,
    pub visibility: String,
    pub modules: Vec<String>,
    pub stats: ListStats,

    #[serde(skip)]
    client: Option<Client>,
}

impl Resource for MailingList {
    fn attach(&mut self, client: &Client, _parent: &ParentKeys) {
        self.client = Some(client.clone());
    }
}

impl MailingList {
    pub(crate) fn can_make_request(&self) -> Result<&Client, ApiError> {
        require_id("list", "id", &self.id)?;
        attached(&self.client, "list")
    }

    pub async fn update(
        &self,
        cancel: &CancellationToken,
        body: &ListCreationRequest,
    ) -> Result<MailingList, ApiError> {
        self.can_make_request()?.update_list(cancel, &self.id, body).await
    }

    pub async fn delete(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        self.can_make_request()?.delete_list(cancel, &self.id).await
    }
}

impl Client {
    pub async fn get_lists(
        &self,
        cancel: &CancellationToken,
        params: Option<&ListQueryParams>,
    ) -> Result<ListOfLists, ApiError> {
        self.fetch(cancel, Request::get(LISTS_PATH).query(params)).await
    }

    pub async fn get_list(
        &self,
        cancel: &CancellationToken,
        id: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<MailingList, ApiError> {
        require_id("list", "id", id)?;
        self.fetch(cancel, Request::get(list_path(id)).query(params)).await
    }

    pub async fn create_list(
        &self,
        cancel: &CancellationToken,
        body: &ListCreationRequest,
    ) -> Result<MailingList, ApiError> {
        self.fetch(cancel, Request::post(LISTS_PATH).json(body)?).await
    }

    pub async fn update_list(
        &self,
        cancel: &CancellationToken,
        id: &str,
        body: &ListCreationRequest,
    ) -> Result<MailingList, ApiError> {
        require_id("list", "id", id)?;
        self.fetch(cancel, Request::patch(list_path(id)).json(body)?).await
    }

    pub async fn delete_list(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        require_id("list", "id", id)?;
        self.execute_ok(cancel, HttpMethod::Delete, list_path(id)).await
    }
}
