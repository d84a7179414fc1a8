//! Automations: workflows, their emails, email queues and removed
//! subscribers.
//!
//! An `AutomationEmail` is addressed by its own id plus the `workflow_id`
//! of the automation it belongs to; both must be set before any follow-on
//! call is made.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::{Client, Request};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::params::BasicQueryParams;
use crate::resource::{attached, require_id, segment, Link, ParentKeys, Resource};
use crate::resources::conditions::SegmentCondition;

const AUTOMATIONS_PATH: &str = "/automations";

fn automation_path(id: &str) -> String {
    format!("{AUTOMATIONS_PATH}/{}", segment(id))
}

fn emails_path(workflow_id: &str) -> String {
    format!("{}/emails", automation_path(workflow_id))
}

fn email_path(workflow_id: &str, email_id: &str) -> String {
    format!("{}/{}", emails_path(workflow_id), segment(email_id))
}

fn queue_path(workflow_id: &str, email_id: &str) -> String {
    format!("{}/queue", email_path(workflow_id, email_id))
}

fn removed_subscribers_path(workflow_id: &str) -> String {
    format!("{}/removed-subscribers", automation_path(workflow_id))
}

fn require_email(workflow_id: &str, email_id: &str) -> Result<(), ApiError> {
    require_id("automation email", "workflow_id", workflow_id)?;
    require_id("automation email", "id", email_id)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListOfAutomations {
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub automations: Vec<Automation>,
}

impl Resource for ListOfAutomations {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.automations.attach(client, parent);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationSegmentOptions {
    pub saved_segment_id: i64,
    #[serde(rename = "match")]
    pub match_type: String,
    pub conditions: Vec<SegmentCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationRecipient {
    pub list_id: String,
    pub segment_options: AutomationSegmentOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationSettingsShort {
    pub use_conversation: bool,
    pub to_name: String,
    pub title: String,
    pub from_name: String,
    pub reply_to: String,
    pub authenticate: bool,
    pub auto_footer: bool,
    pub inline_css: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationSettingsLong {
    pub title: String,
    pub from_name: String,
    pub reply_to: String,
    pub authenticate: bool,
    pub auto_footer: bool,
    pub inline_css: bool,
    pub subject_line: String,
    pub auto_tweet: bool,
    pub auto_fb_post: Vec<String>,
    pub fb_comments: bool,
    pub template_id: i64,
    pub drag_and_drop: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmTracking {
    pub campaign: bool,
    pub notes: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationTracking {
    pub opens: bool,
    pub html_clicks: bool,
    pub text_clicks: bool,
    pub goal_tracking: bool,
    pub ecomm360: bool,
    pub google_analytics: String,
    pub clicktale: String,
    pub salesforce: CrmTracking,
    pub highrise: CrmTracking,
    pub capsule: CrmTracking,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerSettings {
    pub workflow_type: String,
    pub workflow_title: String,
    pub workflow_emails_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSummary {
    pub opens: i64,
    pub unique_opens: i64,
    pub open_rate: f64,
    pub clicks: i64,
    pub subscriber_clicks: i64,
    pub click_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Automation {
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub id: String,
    pub create_time: String,
    pub start_time: String,
    pub status: String,
    pub emails_sent: i64,
    pub recipients: AutomationRecipient,
    pub settings: AutomationSettingsShort,
    pub tracking: AutomationTracking,
    pub trigger_settings: TriggerSettings,
    pub report_summary: ReportSummary,

    #[serde(skip)]
    client: Option<Client>,
}

impl Resource for Automation {
    fn attach(&mut self, client: &Client, _parent: &ParentKeys) {
        self.client = Some(client.clone());
    }
}

impl Automation {
    fn can_make_request(&self) -> Result<&Client, ApiError> {
        require_id("automation", "id", &self.id)?;
        attached(&self.client, "automation")
    }

    pub async fn pause_sending_all(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        self.can_make_request()?.pause_sending_all(cancel, &self.id).await
    }

    pub async fn start_sending_all(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        self.can_make_request()?.start_sending_all(cancel, &self.id).await
    }

    pub async fn emails(&self, cancel: &CancellationToken) -> Result<ListOfEmails, ApiError> {
        self.can_make_request()?.get_automation_emails(cancel, &self.id).await
    }

    pub async fn email(&self, cancel: &CancellationToken, email_id: &str) -> Result<AutomationEmail, ApiError> {
        self.can_make_request()?.get_automation_email(cancel, &self.id, email_id).await
    }

    pub async fn removed_subscribers(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ListOfRemovedSubscribers, ApiError> {
        self.can_make_request()?
            .get_automation_removed_subscribers(cancel, &self.id)
            .await
    }

    pub async fn remove_subscriber(
        &self,
        cancel: &CancellationToken,
        email_address: &str,
    ) -> Result<RemovedSubscriber, ApiError> {
        self.can_make_request()?
            .create_automation_removed_subscriber(cancel, &self.id, email_address)
            .await
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListOfEmails {
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub emails: Vec<AutomationEmail>,
}

impl Resource for ListOfEmails {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.emails.attach(client, parent);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialCard {
    pub image_url: String,
    pub description: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationDelay {
    pub amount: i64,
    #[serde(rename = "type")]
    pub delay_type: String,
    pub direction: String,
    pub action: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AutomationEmail {
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub id: String,
    pub workflow_id: String,
    pub position: i64,
    pub delay: AutomationDelay,
    pub create_time: String,
    pub start_time: String,
    pub archive_url: String,
    pub status: String,
    pub emails_sent: i64,
    pub send_time: String,
    pub content_type: String,
    pub recipients: AutomationRecipient,
    pub settings: AutomationSettingsLong,
    pub tracking: AutomationTracking,
    pub social_card: SocialCard,
    pub trigger_settings: TriggerSettings,
    pub report_summary: ReportSummary,

    #[serde(skip)]
    client: Option<Client>,
}

impl Resource for AutomationEmail {
    fn attach(&mut self, client: &Client, _parent: &ParentKeys) {
        self.client = Some(client.clone());
    }
}

impl AutomationEmail {
    fn can_make_request(&self) -> Result<&Client, ApiError> {
        require_email(&self.workflow_id, &self.id)?;
        attached(&self.client, "automation email")
    }

    pub async fn pause_sending(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        self.can_make_request()?
            .pause_sending(cancel, &self.workflow_id, &self.id)
            .await
    }

    pub async fn start_sending(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        self.can_make_request()?
            .start_sending(cancel, &self.workflow_id, &self.id)
            .await
    }

    pub async fn queues(&self, cancel: &CancellationToken) -> Result<ListOfAutomationQueues, ApiError> {
        self.can_make_request()?
            .get_automation_queues(cancel, &self.workflow_id, &self.id)
            .await
    }

    pub async fn queue(&self, cancel: &CancellationToken, subscriber_hash: &str) -> Result<AutomationQueue, ApiError> {
        self.can_make_request()?
            .get_automation_queue(cancel, &self.workflow_id, &self.id, subscriber_hash)
            .await
    }

    pub async fn add_to_queue(
        &self,
        cancel: &CancellationToken,
        email_address: &str,
    ) -> Result<AutomationQueue, ApiError> {
        self.can_make_request()?
            .create_automation_email_queue(cancel, &self.workflow_id, &self.id, email_address)
            .await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationQueueRequest {
    pub email_address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListOfAutomationQueues {
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub workflow_id: String,
    pub email_id: String,
    #[serde(rename = "queue")]
    pub queues: Vec<AutomationQueue>,
}

impl Resource for ListOfAutomationQueues {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AutomationQueue {
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub id: String,
    pub workflow_id: String,
    pub email_id: String,
    pub list_id: String,
    pub email_address: String,
    pub next_send: String,
}

impl Resource for AutomationQueue {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedSubscriberRequest {
    pub email_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListOfRemovedSubscribers {
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub workflow_id: String,
    pub subscribers: Vec<RemovedSubscriber>,
}

impl Resource for ListOfRemovedSubscribers {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemovedSubscriber {
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
    pub id: String,
    pub workflow_id: String,
    pub list_id: String,
    pub email_address: String,
}

impl Resource for RemovedSubscriber {}

impl Client {
    pub async fn get_automations(
        &self,
        cancel: &CancellationToken,
        params: Option<&BasicQueryParams>,
    ) -> Result<ListOfAutomations, ApiError> {
        self.fetch(cancel, Request::get(AUTOMATIONS_PATH).query(params)).await
    }

    pub async fn get_automation(&self, cancel: &CancellationToken, id: &str) -> Result<Automation, ApiError> {
        require_id("automation", "id", id)?;
        self.fetch(cancel, Request::get(automation_path(id))).await
    }

    pub async fn pause_sending_all(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        require_id("automation", "id", id)?;
        let path = format!("{}/actions/pause-all-emails", automation_path(id));
        self.execute_ok(cancel, HttpMethod::Post, path).await
    }

    pub async fn start_sending_all(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        require_id("automation", "id", id)?;
        let path = format!("{}/actions/start-all-emails", automation_path(id));
        self.execute_ok(cancel, HttpMethod::Post, path).await
    }

    pub async fn get_automation_emails(
        &self,
        cancel: &CancellationToken,
        workflow_id: &str,
    ) -> Result<ListOfEmails, ApiError> {
        require_id("automation", "id", workflow_id)?;
        self.fetch(cancel, Request::get(emails_path(workflow_id))).await
    }

    pub async fn get_automation_email(
        &self,
        cancel: &CancellationToken,
        workflow_id: &str,
        email_id: &str,
    ) -> Result<AutomationEmail, ApiError> {
        require_email(workflow_id, email_id)?;
        self.fetch(cancel, Request::get(email_path(workflow_id, email_id))).await
    }

    pub async fn pause_sending(
        &self,
        cancel: &CancellationToken,
        workflow_id: &str,
        email_id: &str,
    ) -> Result<bool, ApiError> {
        require_email(workflow_id, email_id)?;
        let path = format!("{}/actions/pause", email_path(workflow_id, email_id));
        self.execute_ok(cancel, HttpMethod::Post, path).await
    }

    pub async fn start_sending(
        &self,
        cancel: &CancellationToken,
        workflow_id: &str,
        email_id: &str,
    ) -> Result<bool, ApiError> {
        require_email(workflow_id, email_id)?;
        let path = format!("{}/actions/start", email_path(workflow_id, email_id));
        self.execute_ok(cancel, HttpMethod::Post, path).await
    }

    pub async fn get_automation_queues(
        &self,
        cancel: &CancellationToken,
        workflow_id: &str,
        email_id: &str,
    ) -> Result<ListOfAutomationQueues, ApiError> {
        require_email(workflow_id, email_id)?;
        self.fetch(cancel, Request::get(queue_path(workflow_id, email_id))).await
    }

    pub async fn get_automation_queue(
        &self,
        cancel: &CancellationToken,
        workflow_id: &str,
        email_id: &str,
        subscriber_hash: &str,
    ) -> Result<AutomationQueue, ApiError> {
        require_email(workflow_id, email_id)?;
        require_id("automation queue", "subscriber_hash", subscriber_hash)?;
        let path = format!("{}/{}", queue_path(workflow_id, email_id), segment(subscriber_hash));
        self.fetch(cancel, Request::get(path)).await
    }

    pub async fn create_automation_email_queue(
        &self,
        cancel: &CancellationToken,
        workflow_id: &str,
        email_id: &str,
        email_address: &str,
    ) -> Result<AutomationQueue, ApiError> {
        require_email(workflow_id, email_id)?;
        let body = AutomationQueueRequest { email_address: email_address.to_string() };
        self.fetch(cancel, Request::post(queue_path(workflow_id, email_id)).json(&body)?)
            .await
    }

    pub async fn get_automation_removed_subscribers(
        &self,
        cancel: &CancellationToken,
        workflow_id: &str,
    ) -> Result<ListOfRemovedSubscribers, ApiError> {
        require_id("automation", "id", workflow_id)?;
        self.fetch(cancel, Request::get(removed_subscribers_path(workflow_id))).await
    }

    pub async fn create_automation_removed_subscriber(
        &self,
        cancel: &CancellationToken,
        workflow_id: &str,
        email_address: &str,
    ) -> Result<RemovedSubscriber, ApiError> {
        require_id("automation", "id", workflow_id)?;
        let body = RemovedSubscriberRequest { email_address: email_address.to_string() };
        self.fetch(cancel, Request::post(removed_subscribers_path(workflow_id)).json(&body)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client, ENDPOINT};

    #[tokio::test]
    async fn automation_pauses_all_emails() {
        let (client, transport) = client();
        let cancel = CancellationToken::new();
        transport.push(200, r#"{"id":"wf1","status":"sending"}"#);
        let automation = client.get_automation(&cancel, "wf1").await.unwrap();

        transport.push(204, "");
        assert!(automation.pause_sending_all(&cancel).await.unwrap());
        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.url, format!("{ENDPOINT}/automations/wf1/actions/pause-all-emails"));
        assert!(sent.body.is_none());
    }

    #[tokio::test]
    async fn listed_emails_carry_their_client() {
        let (client, transport) = client();
        let cancel = CancellationToken::new();
        transport.push(200, r#"{"id":"wf1"}"#);
        let automation = client.get_automation(&cancel, "wf1").await.unwrap();

        transport.push(
            200,
            r#"{"total_items":2,"emails":[{"id":"e1","workflow_id":"wf1"},{"id":"e2","workflow_id":"wf1"}]}"#,
        );
        let emails = automation.emails(&cancel).await.unwrap();
        assert_eq!(emails.emails.len(), 2);

        emails.emails[1].start_sending(&cancel).await.unwrap();
        assert_eq!(
            transport.last().url,
            format!("{ENDPOINT}/automations/wf1/emails/e2/actions/start")
        );
    }

    #[tokio::test]
    async fn email_without_workflow_is_rejected_before_sending() {
        let (client, transport) = client();
        let cancel = CancellationToken::new();
        transport.push(200, r#"{"id":"e1","workflow_id":""}"#);
        let email = client.get_automation_email(&cancel, "wf1", "e1").await.unwrap();
        let before = transport.count();

        let err = email.pause_sending(&cancel).await.unwrap_err();
        assert!(err.is_validation());
        let err = email.add_to_queue(&cancel, "a@example.com").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(transport.count(), before);
    }

    #[tokio::test]
    async fn queue_entries_are_posted_as_email_address() {
        let (client, transport) = client();
        let cancel = CancellationToken::new();
        transport.push(200, r#"{"id":"e1","workflow_id":"wf1"}"#);
        let email = client.get_automation_email(&cancel, "wf1", "e1").await.unwrap();

        transport.push(200, r#"{"id":"h","email_address":"a@example.com","workflow_id":"wf1","email_id":"e1"}"#);
        let queued = email.add_to_queue(&cancel, "a@example.com").await.unwrap();
        assert_eq!(queued.email_address, "a@example.com");

        let sent = transport.last();
        assert_eq!(sent.url, format!("{ENDPOINT}/automations/wf1/emails/e1/queue"));
        assert_eq!(sent.body.as_deref(), Some(r#"{"email_address":"a@example.com"}"#));
    }

    #[tokio::test]
    async fn removed_subscribers_are_listed_under_the_workflow() {
        let (client, transport) = client();
        let cancel = CancellationToken::new();
        transport.push(200, r#"{"id":"wf1"}"#);
        let automation = client.get_automation(&cancel, "wf1").await.unwrap();

        transport.push(200, r#"{"workflow_id":"wf1","subscribers":[{"id":"h","email_address":"a@example.com"}]}"#);
        let removed = automation.removed_subscribers(&cancel).await.unwrap();
        assert_eq!(removed.subscribers[0].email_address, "a@example.com");
        assert_eq!(transport.last().url, format!("{ENDPOINT}/automations/wf1/removed-subscribers"));
    }
}
