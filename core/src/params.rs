//! Query-parameter sources.
//!
//! # Design
//! Every options type implements `QueryParams`, whose only job is to
//! produce its contribution to the query string. Richer options embed a
//! simpler one and layer on top of it with `compose`: the embedded map is
//! built first and the outer type's keys overwrite it. Values that end up
//! as the empty string are dropped by `query_pairs`, so leaving a filter
//! unset is enough to keep it off the wire.

use std::collections::BTreeMap;

pub type ParamMap = BTreeMap<String, String>;

pub trait QueryParams: Send + Sync {
    fn params(&self) -> ParamMap;
}

/// Overlay `overlay` on `base`; keys present in both take the overlay value.
pub fn compose(mut base: ParamMap, overlay: ParamMap) -> ParamMap {
    base.extend(overlay);
    base
}

/// The non-empty key/value pairs of a parameter source, sorted by key.
pub fn query_pairs(source: &dyn QueryParams) -> Vec<(String, String)> {
    source
        .params()
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .collect()
}

/// Percent-encoded query string, or `None` when every value is empty.
pub fn encode_query(source: &dyn QueryParams) -> Option<String> {
    let pairs = query_pairs(source);
    if pairs.is_empty() {
        return None;
    }
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in &pairs {
        serializer.append_pair(k, v);
    }
    Some(serializer.finish())
}

fn join(values: &[String]) -> String {
    values.join(",")
}

fn number(value: Option<u32>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

fn map<const N: usize>(entries: [(&str, String); N]) -> ParamMap {
    entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

impl QueryParams for ParamMap {
    fn params(&self) -> ParamMap {
        self.clone()
    }
}

/// Field selection and sorting shared by every read endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicQueryParams {
    pub status: String,
    pub sort_field: String,
    pub sort_dir: String,
    pub fields: Vec<String>,
    pub exclude_fields: Vec<String>,
}

impl QueryParams for BasicQueryParams {
    fn params(&self) -> ParamMap {
        map([
            ("status", self.status.clone()),
            ("sort_field", self.sort_field.clone()),
            ("sort_dir", self.sort_dir.clone()),
            ("fields", join(&self.fields)),
            ("exclude_fields", join(&self.exclude_fields)),
        ])
    }
}

/// `BasicQueryParams` plus paging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedQueryParams {
    pub basic: BasicQueryParams,
    pub count: Option<u32>,
    pub offset: Option<u32>,
}

impl QueryParams for ExtendedQueryParams {
    fn params(&self) -> ParamMap {
        compose(
            self.basic.params(),
            map([("count", number(self.count)), ("offset", number(self.offset))]),
        )
    }
}

/// Filters for `GET /lists` and batch listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQueryParams {
    pub extended: ExtendedQueryParams,
    pub before_date_created: String,
    pub since_date_created: String,
    pub before_campaign_last_sent: String,
    pub since_campaign_last_sent: String,
    pub email: String,
}

impl QueryParams for ListQueryParams {
    fn params(&self) -> ParamMap {
        compose(
            self.extended.params(),
            map([
                ("before_date_created", self.before_date_created.clone()),
                ("since_date_created", self.since_date_created.clone()),
                ("before_campaign_last_sent", self.before_campaign_last_sent.clone()),
                ("since_campaign_last_sent", self.since_campaign_last_sent.clone()),
                ("email", self.email.clone()),
            ]),
        )
    }
}

/// Filters for `GET /campaigns`.
///
/// `status`, `sort_field` and `sort_dir` shadow the fields of the same name
/// in the embedded basic params.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignQueryParams {
    pub extended: ExtendedQueryParams,
    pub campaign_type: String,
    pub status: String,
    pub before_send_time: String,
    pub since_send_time: String,
    pub before_create_time: String,
    pub since_create_time: String,
    pub list_id: String,
    pub folder_id: String,
    pub sort_field: String,
    pub sort_dir: String,
}

impl QueryParams for CampaignQueryParams {
    fn params(&self) -> ParamMap {
        compose(
            self.extended.params(),
            map([
                ("type", self.campaign_type.clone()),
                ("status", self.status.clone()),
                ("before_send_time", self.before_send_time.clone()),
                ("since_send_time", self.since_send_time.clone()),
                ("before_create_time", self.before_create_time.clone()),
                ("since_create_time", self.since_create_time.clone()),
                ("list_id", self.list_id.clone()),
                ("folder_id", self.folder_id.clone()),
                ("sort_field", self.sort_field.clone()),
                ("sort_dir", self.sort_dir.clone()),
            ]),
        )
    }
}

/// Filters for `GET /lists/{id}/members`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberQueryParams {
    pub extended: ExtendedQueryParams,
    pub email_type: String,
    pub since_last_changed: String,
    pub before_last_changed: String,
    pub unique_email_id: String,
    pub vip_only: bool,
    pub interest_category_id: String,
    pub interest_ids: Vec<String>,
    pub interest_match: String,
}

impl QueryParams for MemberQueryParams {
    fn params(&self) -> ParamMap {
        compose(
            self.extended.params(),
            map([
                ("email_type", self.email_type.clone()),
                ("since_last_changed", self.since_last_changed.clone()),
                ("before_last_changed", self.before_last_changed.clone()),
                ("unique_email_id", self.unique_email_id.clone()),
                ("vip_only", if self.vip_only { "true".to_string() } else { String::new() }),
                ("interest_category_id", self.interest_category_id.clone()),
                ("interest_ids", join(&self.interest_ids)),
                ("interest_match", self.interest_match.clone()),
            ]),
        )
    }
}

/// Parameters for `GET /search-members`.
///
/// `list_id` is private: searches scoped to a list get it from the `MailingList`
/// entity that issues them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchMembersQueryParams {
    pub basic: BasicQueryParams,
    pub query: String,
    pub(crate) list_id: String,
}

impl SearchMembersQueryParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Default::default() }
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }
}

impl QueryParams for SearchMembersQueryParams {
    fn params(&self) -> ParamMap {
        compose(
            self.basic.params(),
            map([("query", self.query.clone()), ("list_id", self.list_id.clone())]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_are_never_emitted() {
        assert!(query_pairs(&BasicQueryParams::default()).is_empty());
        assert!(query_pairs(&ExtendedQueryParams::default()).is_empty());
        assert!(query_pairs(&ListQueryParams::default()).is_empty());
        assert!(query_pairs(&CampaignQueryParams::default()).is_empty());
        assert!(query_pairs(&MemberQueryParams::default()).is_empty());
        assert!(query_pairs(&SearchMembersQueryParams::default()).is_empty());
        assert_eq!(encode_query(&CampaignQueryParams::default()), None);
    }

    #[test]
    fn list_fields_are_comma_joined_under_one_key() {
        let params = BasicQueryParams {
            fields: vec!["marp".to_string(), "parm".to_string()],
            exclude_fields: vec!["red".to_string(), "fish".to_string()],
            ..Default::default()
        };
        assert_eq!(
            query_pairs(&params),
            vec![
                ("exclude_fields".to_string(), "red,fish".to_string()),
                ("fields".to_string(), "marp,parm".to_string()),
            ]
        );
        assert_eq!(
            encode_query(&params).as_deref(),
            Some("exclude_fields=red%2Cfish&fields=marp%2Cparm")
        );
    }

    #[test]
    fn overlay_wins_over_base() {
        let params = CampaignQueryParams {
            extended: ExtendedQueryParams {
                basic: BasicQueryParams {
                    status: "base".to_string(),
                    sort_dir: "ASC".to_string(),
                    ..Default::default()
                },
                count: Some(10),
                offset: None,
            },
            status: "sent".to_string(),
            sort_dir: "DESC".to_string(),
            ..Default::default()
        };
        let map = params.params();
        assert_eq!(map["status"], "sent");
        assert_eq!(map["sort_dir"], "DESC");
        assert_eq!(map["count"], "10");
        assert!(query_pairs(&params).iter().all(|(k, _)| k != "offset"));
    }

    #[test]
    fn empty_overlay_field_suppresses_base_value() {
        let params = CampaignQueryParams {
            extended: ExtendedQueryParams {
                basic: BasicQueryParams { status: "base".to_string(), ..Default::default() },
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(query_pairs(&params).is_empty());
    }

    #[test]
    fn compose_keeps_base_only_keys() {
        let base = map([("a", "1".to_string()), ("b", "2".to_string())]);
        let overlay = map([("b", "3".to_string()), ("c", "4".to_string())]);
        let composed = compose(base, overlay);
        assert_eq!(composed["a"], "1");
        assert_eq!(composed["b"], "3");
        assert_eq!(composed["c"], "4");
    }

    #[test]
    fn zero_count_is_still_sent() {
        let params = ExtendedQueryParams { count: Some(0), ..Default::default() };
        assert_eq!(query_pairs(&params), vec![("count".to_string(), "0".to_string())]);
    }

    #[test]
    fn search_params_carry_query_and_list() {
        let mut params = SearchMembersQueryParams::new("freddie@example.com");
        params.list_id = "57afe96172".to_string();
        assert_eq!(
            encode_query(&params).as_deref(),
            Some("list_id=57afe96172&query=freddie%40example.com")
        );
    }

    #[test]
    fn member_flags_only_appear_when_set() {
        let mut params = MemberQueryParams::default();
        assert!(query_pairs(&params).is_empty());
        params.vip_only = true;
        params.interest_ids = vec!["a".to_string(), "b".to_string()];
        let map = params.params();
        assert_eq!(map["vip_only"], "true");
        assert_eq!(map["interest_ids"], "a,b");
    }
}
