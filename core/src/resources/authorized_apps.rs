//! Authorized OAuth applications: `/authorized-apps`.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::{Client, Request};
use crate::error::ApiError;
use crate::params::{BasicQueryParams, ExtendedQueryParams};
use crate::resource::{require_id, segment, Link, Resource};

const AUTHORIZED_APPS_PATH: &str = "/authorized-apps";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListOfAuthorizedApps {
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub apps: Vec<AuthorizedApp>,
}

impl Resource for ListOfAuthorizedApps {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthorizedApp {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub users: Vec<String>,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
}

impl Resource for AuthorizedApp {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorizedAppRequest {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthorizedAppCreateResponse {
    pub access_token: String,
    pub viewer_token: String,
}

impl Resource for AuthorizedAppCreateResponse {}

impl Client {
    pub async fn get_authorized_apps(
        &self,
        cancel: &CancellationToken,
        params: Option<&ExtendedQueryParams>,
    ) -> Result<ListOfAuthorizedApps, ApiError> {
        self.fetch(cancel, Request::get(AUTHORIZED_APPS_PATH).query(params)).await
    }

    pub async fn get_authorized_app(
        &self,
        cancel: &CancellationToken,
        id: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<AuthorizedApp, ApiError> {
        require_id("authorized app", "id", id)?;
        let path = format!("{AUTHORIZED_APPS_PATH}/{}", segment(id));
        self.fetch(cancel, Request::get(path).query(params)).await
    }

    /// Link an OAuth application to the account and receive its tokens.
    pub async fn create_authorized_app(
        &self,
        cancel: &CancellationToken,
        body: &AuthorizedAppRequest,
    ) -> Result<AuthorizedAppCreateResponse, ApiError> {
        self.fetch(cancel, Request::post(AUTHORIZED_APPS_PATH).json(body)?).await
    }
}
