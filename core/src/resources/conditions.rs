//! Segment conditions.
//!
//! The service accepts several condition shapes, discriminated by
//! `condition_type`. The common ones are modelled as `KnownCondition`;
//! anything else round-trips untouched through `SegmentCondition::Raw`.

use serde::{Deserialize, Serialize};

pub const MATCH_ANY: &str = "any";
pub const MATCH_ALL: &str = "all";

pub const OP_INTEREST_CONTAINS: &str = "interestcontains";
pub const OP_INTEREST_NOT_CONTAINS: &str = "interestnotcontains";
pub const OP_IS: &str = "is";
pub const OP_NOT: &str = "not";
pub const OP_CONTAINS: &str = "contains";
pub const OP_GREATER: &str = "greater";
pub const OP_LESS: &str = "less";
pub const OP_STATIC_IS: &str = "static_is";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SegmentCondition {
    Known(KnownCondition),
    /// A condition shape this crate doesn't model, passed through as-is.
    Raw(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "condition_type")]
pub enum KnownCondition {
    Interests { field: String, op: String, value: Vec<String> },
    EmailAddress { field: String, op: String, value: String },
    TextMerge { field: String, op: String, value: String },
    Date {
        field: String,
        op: String,
        #[serde(default)]
        value: String,
    },
    StaticSegment { field: String, op: String, value: i64 },
    Language { field: String, op: String, value: String },
}

impl SegmentCondition {
    /// Subscribers whose interests under `category` include any of `ids`.
    pub fn interests(category: impl Into<String>, ids: Vec<String>) -> Self {
        SegmentCondition::Known(KnownCondition::Interests {
            field: format!("interests-{}", category.into()),
            op: OP_INTEREST_CONTAINS.to_string(),
            value: ids,
        })
    }

    pub fn email_is(address: impl Into<String>) -> Self {
        SegmentCondition::Known(KnownCondition::EmailAddress {
            field: "EMAIL".to_string(),
            op: OP_IS.to_string(),
            value: address.into(),
        })
    }
}
