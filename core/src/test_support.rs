//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

pub const API_KEY: &str = "apikey";
pub const ENDPOINT: &str = "http://mock.local/3.0";

/// Records every request and answers from a queue. An empty queue answers
/// `200` with an empty body.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
}

impl RecordingTransport {
    pub fn push(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }));
    }

    pub fn push_error(&self, err: TransportError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(HttpResponse { status: 200, headers: Vec::new(), body: String::new() })
        })
    }
}

pub fn client() -> (Client, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let config = ClientConfig::new(API_KEY).with_endpoint(ENDPOINT);
    let client = Client::with_transport(config, transport.clone()).unwrap();
    (client, transport)
}
