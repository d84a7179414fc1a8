//! Response classification.
//!
//! A completed exchange is either a success (with or without a body) or a
//! server error. Server errors are structured when the body parses as a
//! `ProblemDetail` and raw otherwise. Transport failures never reach this
//! module: without a status code there is nothing to classify.

use crate::error::{ApiError, ProblemDetail};
use crate::http::HttpResponse;

/// Raw error bodies longer than this are cut before being surfaced.
pub const MAX_RAW_ERROR_BODY: usize = 4096;

/// A successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx with a body still to be decoded.
    Body(String),
    /// 2xx with a zero-length body. Never parsed.
    Empty,
}

/// Map a response to an `Outcome`, or to the error it represents.
pub fn classify(response: HttpResponse) -> Result<Outcome, ApiError> {
    if response.is_success() {
        if response.body.is_empty() {
            return Ok(Outcome::Empty);
        }
        return Ok(Outcome::Body(response.body));
    }

    match serde_json::from_str::<ProblemDetail>(&response.body) {
        Ok(problem) => Err(ApiError::Api { status: response.status, problem }),
        Err(_) => Err(ApiError::Http {
            status: response.status,
            body: truncate(response.body, MAX_RAW_ERROR_BODY),
        }),
    }
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() <= max {
        return body;
    }
    let mut cut = max;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    body.truncate(cut);
    body
}
