//! List members: `/lists/{list_id}/members`.
//!
//! Members are addressed by a member key. The service accepts either the
//! MD5 hash of the lower-cased email address or the address itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::{Client, Request};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::params::{BasicQueryParams, MemberQueryParams};
use crate::resource::{attached, require_id, segment, Link, ParentKeys, Resource};
use crate::resources::lists::{list_path, MailingList};

pub const STATUS_SUBSCRIBED: &str = "subscribed";
pub const STATUS_UNSUBSCRIBED: &str = "unsubscribed";
pub const STATUS_CLEANED: &str = "cleaned";
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_TRANSACTIONAL: &str = "transactional";

fn members_path(list_id: &str) -> String {
    format!("{}/members", list_path(list_id))
}

fn member_path(list_id: &str, key: &str) -> String {
    format!("{}/{}", members_path(list_id), segment(key))
}

fn require_member(list_id: &str, key: &str) -> Result<(), ApiError> {
    require_id("member", "list_id", list_id)?;
    require_id("member", "id", key)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListOfMembers {
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub list_id: String,
    pub members: Vec<Member>,
}

impl Resource for ListOfMembers {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.members.attach(client, parent);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberStats {
    pub avg_open_rate: f64,
    pub avg_click_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub gmtoff: i64,
    pub dstoff: i64,
    pub country_code: String,
    pub timezone: String,
}

/// Body for adding or updating a member. Unset fields are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberRequest {
    pub email_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    /// Used by add-or-update when the address isn't on the list yet.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status_if_new: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub merge_fields: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub interests: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<MemberLocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Member {
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub id: String,
    pub list_id: String,
    pub email_address: String,
    pub unique_email_id: String,
    pub email_type: String,
    pub status: String,
    pub merge_fields: BTreeMap<String, serde_json::Value>,
    pub interests: BTreeMap<String, bool>,
    pub stats: MemberStats,
    pub ip_signup: String,
    pub timestamp_signup: String,
    pub ip_opt: String,
    pub timestamp_opt: String,
    pub member_rating: i64,
    pub last_changed: String,
    pub language: String,
    pub vip: bool,
    pub email_client: String,
    pub location: MemberLocation,

    #[serde(skip)]
    client: Option<Client>,
}

impl Resource for Member {
    fn attach(&mut self, client: &Client, _parent: &ParentKeys) {
        self.client = Some(client.clone());
    }
}

impl Member {
    fn can_make_request(&self) -> Result<&Client, ApiError> {
        require_member(&self.list_id, &self.id)?;
        attached(&self.client, "member")
    }

    pub async fn update(&self, cancel: &CancellationToken, body: &MemberRequest) -> Result<Member, ApiError> {
        self.can_make_request()?
            .update_member(cancel, &self.list_id, &self.id, body)
            .await
    }

    pub async fn delete(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        self.can_make_request()?
            .delete_member(cancel, &self.list_id, &self.id)
            .await
    }
}

impl MailingList {
    pub async fn members(
        &self,
        cancel: &CancellationToken,
        params: Option<&MemberQueryParams>,
    ) -> Result<ListOfMembers, ApiError> {
        self.can_make_request()?.get_members(cancel, &self.id, params).await
    }

    pub async fn member(&self, cancel: &CancellationToken, key: &str) -> Result<Member, ApiError> {
        self.can_make_request()?.get_member(cancel, &self.id, key, None).await
    }

    pub async fn add_member(&self, cancel: &CancellationToken, body: &MemberRequest) -> Result<Member, ApiError> {
        self.can_make_request()?.add_member(cancel, &self.id, body).await
    }

    pub async fn add_or_update_member(
        &self,
        cancel: &CancellationToken,
        key: &str,
        body: &MemberRequest,
    ) -> Result<Member, ApiError> {
        self.can_make_request()?
            .add_or_update_member(cancel, &self.id, key, body)
            .await
    }

    pub async fn delete_member(&self, cancel: &CancellationToken, key: &str) -> Result<bool, ApiError> {
        self.can_make_request()?.delete_member(cancel, &self.id, key).await
    }
}

impl Client {
    pub async fn get_members(
        &self,
        cancel: &CancellationToken,
        list_id: &str,
        params: Option<&MemberQueryParams>,
    ) -> Result<ListOfMembers, ApiError> {
        require_id("list", "id", list_id)?;
        self.fetch(cancel, Request::get(members_path(list_id)).query(params)).await
    }

    pub async fn get_member(
        &self,
        cancel: &CancellationToken,
        list_id: &str,
        key: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<Member, ApiError> {
        require_member(list_id, key)?;
        self.fetch(cancel, Request::get(member_path(list_id, key)).query(params)).await
    }

    pub async fn add_member(
        &self,
        cancel: &CancellationToken,
        list_id: &str,
        body: &MemberRequest,
    ) -> Result<Member, ApiError> {
        require_id("list", "id", list_id)?;
        self.fetch(cancel, Request::post(members_path(list_id)).json(body)?).await
    }

    pub async fn update_member(
        &self,
        cancel: &CancellationToken,
        list_id: &str,
        key: &str,
        body: &MemberRequest,
    ) -> Result<Member, ApiError> {
        require_member(list_id, key)?;
        self.fetch(cancel, Request::patch(member_path(list_id, key)).json(body)?).await
    }

    pub async fn add_or_update_member(
        &self,
        cancel: &CancellationToken,
        list_id: &str,
        key: &str,
        body: &MemberRequest,
    ) -> Result<Member, ApiError> {
        require_member(list_id, key)?;
        self.fetch(cancel, Request::put(member_path(list_id, key)).json(body)?).await
    }

    pub async fn delete_member(&self, cancel: &CancellationToken, list_id: &str, key: &str) -> Result<bool, ApiError> {
        require_member(list_id, key)?;
        self.execute_ok(cancel, HttpMethod::Delete, member_path(list_id, key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client, ENDPOINT};

    #[tokio::test]
    async fn list_adds_member_and_member_updates_itself() {
        let (client, transport) = client();
        let cancel = CancellationToken::new();
        transport.push(200, r#"{"id":"L1"}"#);
        let list = client.get_list(&cancel, "L1", None).await.unwrap();

        let body = MemberRequest {
            email_address: "a@example.com".to_string(),
            status: STATUS_SUBSCRIBED.to_string(),
            ..Default::default()
        };
        transport.push(200, r#"{"id":"h1","list_id":"L1","email_address":"a@example.com","status":"subscribed"}"#);
        let member = list.add_member(&cancel, &body).await.unwrap();
        assert_eq!(
            transport.last().body.as_deref(),
            Some(r#"{"email_address":"a@example.com","status":"subscribed"}"#)
        );

        let change = MemberRequest { vip: Some(true), ..body };
        member.update(&cancel, &change).await.unwrap();
        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.url, format!("{ENDPOINT}/lists/L1/members/h1"));
    }

    #[tokio::test]
    async fn member_missing_list_id_is_rejected() {
        let (client, transport) = client();
        let cancel = CancellationToken::new();
        transport.push(200, r#"{"id":"h1","list_id":""}"#);
        let member = client.get_member(&cancel, "L1", "h1", None).await.unwrap();
        let before = transport.count();
        assert!(member.delete(&cancel).await.unwrap_err().is_validation());
        assert_eq!(transport.count(), before);
    }

    #[tokio::test]
    async fn member_listing_uses_member_filters() {
        let (client, transport) = client();
        let params = MemberQueryParams { vip_only: true, ..Default::default() };
        transport.push(200, r#"{"list_id":"L1","members":[{"id":"h1","list_id":"L1"}],"total_items":1}"#);
        let members = client.get_members(&CancellationToken::new(), "L1", Some(&params)).await.unwrap();
        assert_eq!(members.members.len(), 1);
        assert_eq!(transport.last().url, format!("{ENDPOINT}/lists/L1/members?vip_only=true"));
    }

    #[tokio::test]
    async fn email_key_with_reserved_characters_stays_in_the_path() {
        let (client, transport) = client();
        let params = BasicQueryParams { fields: vec!["id".to_string()], ..Default::default() };
        transport.push(200, r#"{"id":"h2","list_id":"L1"}"#);
        client
            .get_member(&CancellationToken::new(), "L1", "first?last#x@example.com", Some(&params))
            .await
            .unwrap();
        assert_eq!(
            transport.last().url,
            format!("{ENDPOINT}/lists/L1/members/first%3Flast%23x@example.com?fields=id")
        );
    }
}
