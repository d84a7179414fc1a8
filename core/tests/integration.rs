//! End-to-end runs against the mock server over real HTTP.
//!
//! # Design
//! Each test starts the mock server on a random port and points a client at
//! it through `ClientConfig::with_endpoint`, so the default reqwest
//! transport, the dispatcher and the typed resources are exercised together.

use std::time::Duration;

use chimp_core::resources::campaign_folders::CampaignFolderCreationRequest;
use chimp_core::resources::campaigns::{
    CampaignContentUpdateRequest, CampaignCreationRecipients, CampaignCreationRequest, CampaignCreationSettings,
    TestEmailRequest, SEND_TYPE_HTML, TYPE_REGULAR,
};
use chimp_core::resources::ecommerce::{Product, Store, Variant};
use chimp_core::resources::lists::ListCreationRequest;
use chimp_core::resources::webhooks::{HookEvents, HookSources, WebHookRequest};
use chimp_core::{
    ApiError, CampaignQueryParams, CancellationToken, Client, ClientConfig, ExtendedQueryParams, TransportError,
};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

const API_KEY: &str = "integration-us1";

async fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { mock_server::run(listener, API_KEY).await });
    format!("http://{addr}/3.0")
}

fn client_for(endpoint: &str, api_key: &str) -> Client {
    Client::from_config(ClientConfig::new(api_key).with_endpoint(endpoint)).unwrap()
}

async fn client() -> Client {
    client_for(&start_server().await, API_KEY)
}

fn campaign_request(list_id: &str) -> CampaignCreationRequest {
    CampaignCreationRequest {
        campaign_type: TYPE_REGULAR.to_string(),
        recipients: CampaignCreationRecipients { list_id: list_id.to_string(), segment_options: None },
        settings: CampaignCreationSettings {
            subject_line: "Spring news".to_string(),
            title: "Spring".to_string(),
            from_name: "Shop".to_string(),
            reply_to: "shop@example.com".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn ping_reports_health() {
    let client = client().await;
    let ping = client.ping(&CancellationToken::new()).await.unwrap();
    assert_eq!(ping.health_status, mock_server::HEALTH_STATUS);
}

#[tokio::test]
async fn wrong_key_surfaces_structured_401() {
    let endpoint = start_server().await;
    let client = client_for(&endpoint, "wrong-us1");
    let err = client.ping(&CancellationToken::new()).await.unwrap_err();
    match &err {
        ApiError::Api { status, problem } => {
            assert_eq!(*status, 401);
            assert_eq!(problem.status, 401);
            assert_eq!(problem.title, "API Key Invalid");
            assert_eq!(problem.kind, mock_server::ERROR_DOCS);
        }
        other => panic!("expected structured API error, got {other:?}"),
    }
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn campaign_lifecycle() {
    let client = client().await;
    let cancel = CancellationToken::new();

    let created = client.create_campaign(&cancel, &campaign_request("L1")).await.unwrap();
    assert_eq!(created.status, "save");
    assert_eq!(created.campaign_type, TYPE_REGULAR);

    let drafts = CampaignQueryParams { status: "save".to_string(), ..Default::default() };
    let listed = client.get_campaigns(&cancel, Some(&drafts)).await.unwrap();
    assert_eq!(listed.total_items, 1);
    let campaign = &listed.campaigns[0];
    assert_eq!(campaign.id, created.id);

    let html = CampaignContentUpdateRequest { html: "<p>Hello</p>".to_string(), ..Default::default() };
    let content = campaign.update_content(&cancel, &html).await.unwrap();
    assert_eq!(content.html, "<p>Hello</p>");
    assert_eq!(campaign.content(&cancel, None).await.unwrap().archive_html, "<p>Hello</p>");

    let test_email = TestEmailRequest {
        test_emails: vec!["qa@example.com".to_string()],
        send_type: SEND_TYPE_HTML.to_string(),
    };
    assert!(campaign.send_test_email(&cancel, &test_email).await.unwrap());

    assert!(campaign.send(&cancel).await.unwrap());
    let sent = client.get_campaign(&cancel, &campaign.id, None).await.unwrap();
    assert_eq!(sent.status, "sent");

    let err = campaign.send(&cancel).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(err.problem().is_some());

    assert!(campaign.delete(&cancel).await.unwrap());
    let err = client.get_campaign(&cancel, &campaign.id, None).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn campaign_folders_page_and_rename() {
    let client = client().await;
    let cancel = CancellationToken::new();
    for name in ["a", "b", "c"] {
        let body = CampaignFolderCreationRequest { name: name.to_string() };
        client.create_campaign_folder(&cancel, &body).await.unwrap();
    }

    let page = ExtendedQueryParams { count: Some(2), offset: Some(1), ..Default::default() };
    let folders = client.get_campaign_folders(&cancel, Some(&page)).await.unwrap();
    assert_eq!(folders.total_items, 3);
    assert_eq!(folders.folders.len(), 2);
    assert_eq!(folders.folders[0].name, "b");

    let renamed = folders.folders[1].rename(&cancel, "archive").await.unwrap();
    assert_eq!(renamed.name, "archive");
    assert_eq!(renamed.id, folders.folders[1].id);
}

#[tokio::test]
async fn invalid_list_reports_field_errors() {
    let client = client().await;
    let err = client
        .create_list(&CancellationToken::new(), &ListCreationRequest::default())
        .await
        .unwrap_err();
    let problem = err.problem().unwrap();
    assert_eq!(problem.status, 400);
    assert_eq!(problem.errors.len(), 1);
    assert_eq!(problem.errors[0].field, "name");
}

#[tokio::test]
async fn list_webhooks_round_trip() {
    let client = client().await;
    let cancel = CancellationToken::new();
    let body = ListCreationRequest { name: "Newsletter".to_string(), ..Default::default() };
    let list = client.create_list(&cancel, &body).await.unwrap();

    let hook = WebHookRequest {
        url: "https://hooks.example.com/in".to_string(),
        events: HookEvents { subscribe: true, unsubscribe: true, ..Default::default() },
        sources: HookSources { api: true, ..Default::default() },
    };
    let created = list.create_webhook(&cancel, &hook).await.unwrap();
    assert_eq!(created.list_id, list.id);
    assert!(created.events.unsubscribe);

    let hooks = list.webhooks(&cancel).await.unwrap();
    assert_eq!(hooks.webhooks.len(), 1);
    assert!(hooks.webhooks[0].delete(&cancel).await.unwrap());

    let err = list.webhook(&cancel, &created.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn store_products_and_variants_are_wired_to_their_parents() {
    let client = client().await;
    let cancel = CancellationToken::new();
    let store = client
        .create_store(&cancel, &Store::new("s1", "L1", "USD", "Shop"))
        .await
        .unwrap();

    let product = store.create_product(&cancel, &Product::new("p1", "Mug")).await.unwrap();
    assert_eq!(product.store_id(), "s1");

    product.create_variant(&cancel, &Variant::new("v1", "Blue")).await.unwrap();

    let products = store.products(&cancel, None).await.unwrap();
    let listed = &products.products[0];
    assert_eq!(listed.store_id(), "s1");

    let variants = listed.variants(&cancel, None).await.unwrap();
    assert_eq!(variants.variants[0].product_id(), "p1");
    assert!(variants.variants[0].delete(&cancel).await.unwrap());
    assert!(listed.variants(&cancel, None).await.unwrap().variants.is_empty());
}

#[tokio::test]
async fn cancelling_aborts_the_in_flight_exchange() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/3.0", listener.local_addr().unwrap());
    let client = client_for(&endpoint, API_KEY);
    let cancel = CancellationToken::new();

    let call = tokio::spawn({
        let cancel = cancel.clone();
        async move { client.ping(&cancel).await }
    });

    // Accept the connection, read the request head and never answer.
    let (mut socket, _) = tokio::time::timeout(Duration::from_secs(5), listener.accept())
        .await
        .unwrap()
        .unwrap();
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "client hung up before sending the request");
        head.extend_from_slice(&buf[..n]);
    }
    assert!(head.starts_with(b"GET /3.0/ping"));
    cancel.cancel();

    let err = call.await.unwrap().unwrap_err();
    assert!(matches!(err, ApiError::Transport(TransportError::Cancelled)));

    // The client side hangs up once the exchange is dropped.
    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => continue,
            }
        }
    })
    .await;
    assert!(closed.is_ok(), "connection was left open after cancellation");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/3.0", listener.local_addr().unwrap());
    drop(listener);

    let err = client_for(&endpoint, API_KEY).ping(&CancellationToken::new()).await.unwrap_err();
    assert!(err.is_transport());
}
