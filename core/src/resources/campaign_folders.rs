//! Campaign folders: `/campaign-folders`.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::{Client, Request};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::params::{BasicQueryParams, ExtendedQueryParams};
use crate::resource::{attached, require_id, segment, Link, ParentKeys, Resource};

const CAMPAIGN_FOLDERS_PATH: &str = "/campaign-folders";

fn folder_path(id: &str) -> String {
    format!("{CAMPAIGN_FOLDERS_PATH}/{}", segment(id))
}

pub type CampaignFolderQueryParams = ExtendedQueryParams;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListOfCampaignFolders {
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub folders: Vec<CampaignFolder>,
}

impl Resource for ListOfCampaignFolders {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.folders.attach(client, parent);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CampaignFolder {
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub name: String,
    pub id: String,
    pub count: u64,

    #[serde(skip)]
    client: Option<Client>,
}

impl Resource for CampaignFolder {
    fn attach(&mut self, client: &Client, _parent: &ParentKeys) {
        self.client = Some(client.clone());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignFolderCreationRequest {
    pub name: String,
}

impl CampaignFolder {
    pub async fn rename(&self, cancel: &CancellationToken, name: &str) -> Result<CampaignFolder, ApiError> {
        require_id("campaign folder", "id", &self.id)?;
        let client = attached(&self.client, "campaign folder")?;
        let body = CampaignFolderCreationRequest { name: name.to_string() };
        client.update_campaign_folder(cancel, &self.id, &body).await
    }

    pub async fn delete(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        require_id("campaign folder", "id", &self.id)?;
        attached(&self.client, "campaign folder")?
            .delete_campaign_folder(cancel, &self.id)
            .await
    }
}

impl Client {
    pub async fn get_campaign_folders(
        &self,
        cancel: &CancellationToken,
        params: Option<&CampaignFolderQueryParams>,
    ) -> Result<ListOfCampaignFolders, ApiError> {
        self.fetch(cancel, Request::get(CAMPAIGN_FOLDERS_PATH).query(params)).await
    }

    pub async fn get_campaign_folder(
        &self,
        cancel: &CancellationToken,
        id: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<CampaignFolder, ApiError> {
        require_id("campaign folder", "id", id)?;
        self.fetch(cancel, Request::get(folder_path(id)).query(params)).await
    }

    pub async fn create_campaign_folder(
        &self,
        cancel: &CancellationToken,
        body: &CampaignFolderCreationRequest,
    ) -> Result<CampaignFolder, ApiError> {
        self.fetch(cancel, Request::post(CAMPAIGN_FOLDERS_PATH).json(body)?).await
    }

    pub async fn update_campaign_folder(
        &self,
        cancel: &CancellationToken,
        id: &str,
        body: &CampaignFolderCreationRequest,
    ) -> Result<CampaignFolder, ApiError> {
        require_id("campaign folder", "id", id)?;
        self.fetch(cancel, Request::patch(folder_path(id)).json(body)?).await
    }

    pub async fn delete_campaign_folder(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        require_id("campaign folder", "id", id)?;
        self.execute_ok(cancel, HttpMethod::Delete, folder_path(id)).await
    }
}
