//! Campaigns: `/campaigns` and its actions and content.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::{Client, Request};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::params::{BasicQueryParams, CampaignQueryParams};
use crate::resource::{attached, require_id, segment, Link, ParentKeys, Resource};
use crate::resources::conditions::SegmentCondition;

const CAMPAIGNS_PATH: &str = "/campaigns";

fn campaign_path(id: &str) -> String {
    format!("{CAMPAIGNS_PATH}/{}", segment(id))
}

pub const TYPE_REGULAR: &str = "regular";
pub const TYPE_PLAINTEXT: &str = "plaintext";
pub const TYPE_ABSPLIT: &str = "absplit";
pub const TYPE_RSS: &str = "rss";
pub const TYPE_VARIATE: &str = "variate";

pub const SEND_TYPE_HTML: &str = "html";
pub const SEND_TYPE_PLAINTEXT: &str = "plaintext";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListOfCampaigns {
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub campaigns: Vec<Campaign>,
}

impl Resource for ListOfCampaigns {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.campaigns.attach(client, parent);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_segment_id: Option<i64>,
    #[serde(default, rename = "match")]
    pub match_type: String,
    #[serde(default)]
    pub conditions: Vec<SegmentCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignCreationRecipients {
    pub list_id: String,
    #[serde(default, rename = "segment_opts", skip_serializing_if = "Option::is_none")]
    pub segment_options: Option<SegmentOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignCreationSettings {
    pub subject_line: String,
    pub preview_text: String,
    pub title: String,
    pub from_name: String,
    pub reply_to: String,
    pub use_conversation: bool,
    pub to_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub folder_id: String,
    pub authenticate: bool,
    pub auto_footer: bool,
    pub inline_css: bool,
    pub auto_tweet: bool,
    pub fb_comments: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<u64>,
}

/// Body for creating or updating a campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CampaignCreationRequest {
    #[serde(rename = "type")]
    pub campaign_type: String,
    pub recipients: CampaignCreationRecipients,
    pub settings: CampaignCreationSettings,
    pub tracking: CampaignTracking,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignResponseRecipients {
    pub list_id: String,
    pub list_name: String,
    pub segment_text: String,
    pub recipient_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignResponseSettings {
    pub subject_line: String,
    pub preview_text: String,
    pub title: String,
    pub from_name: String,
    pub reply_to: String,
    pub use_conversation: bool,
    pub to_name: String,
    pub folder_id: String,
    pub authenticate: bool,
    pub auto_footer: bool,
    pub inline_css: bool,
    pub auto_tweet: bool,
    pub fb_comments: bool,
    pub timewarp: bool,
    pub template_id: u64,
    pub drag_and_drop: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignTracking {
    pub opens: bool,
    pub html_clicks: bool,
    pub text_clicks: bool,
    pub goal_tracking: bool,
    pub ecomm360: bool,
    pub google_analytics: String,
    pub clicktale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignEcommerce {
    pub total_orders: i64,
    pub total_spent: f64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignReportSummary {
    pub opens: i64,
    pub unique_opens: i64,
    pub open_rate: f64,
    pub clicks: i64,
    pub subscriber_clicks: i64,
    pub click_rate: f64,
    pub ecommerce: CampaignEcommerce,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignDeliveryStatus {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Campaign {
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub id: String,
    pub web_id: u64,
    #[serde(rename = "type")]
    pub campaign_type: String,
    pub create_time: String,
    pub archive_url: String,
    pub long_archive_url: String,
    pub status: String,
    pub emails_sent: u64,
    pub send_time: String,
    pub content_type: String,
    pub needs_block_refresh: bool,
    pub recipients: CampaignResponseRecipients,
    pub settings: CampaignResponseSettings,
    pub tracking: CampaignTracking,
    pub report_summary: CampaignReportSummary,
    pub delivery_status: CampaignDeliveryStatus,

    #[serde(skip)]
    client: Option<Client>,
}

impl Resource for Campaign {
    fn attach(&mut self, client: &Client, _parent: &ParentKeys) {
        self.client = Some(client.clone());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEmailRequest {
    pub test_emails: Vec<String>,
    /// One of `SEND_TYPE_HTML` or `SEND_TYPE_PLAINTEXT`.
    pub send_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignContentTemplateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub sections: std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignContentUpdateRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub plain_text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub html: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<CampaignContentTemplateRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CampaignContent {
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub plain_text: String,
    pub html: String,
    pub archive_html: String,
}

impl Resource for CampaignContent {}

impl Campaign {
    fn can_make_request(&self) -> Result<&Client, ApiError> {
        require_id("campaign", "id", &self.id)?;
        attached(&self.client, "campaign")
    }

    pub async fn update(
        &self,
        cancel: &CancellationToken,
        body: &CampaignCreationRequest,
    ) -> Result<Campaign, ApiError> {
        self.can_make_request()?.update_campaign(cancel, &self.id, body).await
    }

    pub async fn delete(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        self.can_make_request()?.delete_campaign(cancel, &self.id).await
    }

    pub async fn send(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        self.can_make_request()?.send_campaign(cancel, &self.id).await
    }

    pub async fn send_test_email(
        &self,
        cancel: &CancellationToken,
        body: &TestEmailRequest,
    ) -> Result<bool, ApiError> {
        self.can_make_request()?.send_test_email(cancel, &self.id, body).await
    }

    pub async fn content(
        &self,
        cancel: &CancellationToken,
        params: Option<&BasicQueryParams>,
    ) -> Result<CampaignContent, ApiError> {
        self.can_make_request()?.get_campaign_content(cancel, &self.id, params).await
    }

    pub async fn update_content(
        &self,
        cancel: &CancellationToken,
        body: &CampaignContentUpdateRequest,
    ) -> Result<CampaignContent, ApiError> {
        self.can_make_request()?.update_campaign_content(cancel, &self.id, body).await
    }
}

impl Client {
    pub async fn get_campaigns(
        &self,
        cancel: &CancellationToken,
        params: Option<&CampaignQueryParams>,
    ) -> Result<ListOfCampaigns, ApiError> {
        self.fetch(cancel, Request::get(CAMPAIGNS_PATH).query(params)).await
    }

    pub async fn get_campaign(
        &self,
        cancel: &CancellationToken,
        id: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<Campaign, ApiError> {
        require_id("campaign", "id", id)?;
        self.fetch(cancel, Request::get(campaign_path(id)).query(params)).await
    }

    pub async fn create_campaign(
        &self,
        cancel: &CancellationToken,
        body: &CampaignCreationRequest,
    ) -> Result<Campaign, ApiError> {
        self.fetch(cancel, Request::post(CAMPAIGNS_PATH).json(body)?).await
    }

    pub async fn update_campaign(
        &self,
        cancel: &CancellationToken,
        id: &str,
        body: &CampaignCreationRequest,
    ) -> Result<Campaign, ApiError> {
        require_id("campaign", "id", id)?;
        self.fetch(cancel, Request::patch(campaign_path(id)).json(body)?).await
    }

    pub async fn delete_campaign(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        require_id("campaign", "id", id)?;
        self.execute_ok(cancel, HttpMethod::Delete, campaign_path(id)).await
    }

    pub async fn send_test_email(
        &self,
        cancel: &CancellationToken,
        id: &str,
        body: &TestEmailRequest,
    ) -> Result<bool, ApiError> {
        require_id("campaign", "id", id)?;
        let path = format!("{}/actions/test", campaign_path(id));
        self.execute(cancel, Request::post(path).json(body)?).await?;
        Ok(true)
    }

    pub async fn send_campaign(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        require_id("campaign", "id", id)?;
        self.execute_ok(cancel, HttpMethod::Post, format!("{}/actions/send", campaign_path(id)))
            .await
    }

    pub async fn get_campaign_content(
        &self,
        cancel: &CancellationToken,
        id: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<CampaignContent, ApiError> {
        require_id("campaign", "id", id)?;
        let path = format!("{}/content", campaign_path(id));
        self.fetch(cancel, Request::get(path).query(params)).await
    }

    pub async fn update_campaign_content(
        &self,
        cancel: &CancellationToken,
        id: &str,
        body: &CampaignContentUpdateRequest,
    ) -> Result<CampaignContent, ApiError> {
        require_id("campaign", "id", id)?;
        let path = format!("{}/content", campaign_path(id));
        self.fetch(cancel, Request::put(path).json(body)?).await
    }
}
