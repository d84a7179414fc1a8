//! Member search: `/search-members`.

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::client::{Client, Request};
use crate::error::ApiError;
use crate::params::SearchMembersQueryParams;
use crate::resource::{Link, ParentKeys, Resource};
use crate::resources::lists::MailingList;
use crate::resources::members::Member;

const SEARCH_MEMBERS_PATH: &str = "/search-members";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Matches {
    pub members: Vec<Member>,
    pub total_items: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchMembersResponse {
    pub exact_matches: Matches,
    pub full_search: Matches,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
}

impl Resource for SearchMembersResponse {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.exact_matches.members.attach(client, parent);
        self.full_search.members.attach(client, parent);
    }
}

impl Client {
    /// Search members across every list the account owns.
    pub async fn search_members(
        &self,
        cancel: &CancellationToken,
        params: &SearchMembersQueryParams,
    ) -> Result<SearchMembersResponse, ApiError> {
        self.fetch(cancel, Request::get(SEARCH_MEMBERS_PATH).params(params)).await
    }
}

impl MailingList {
    /// Search members of this list only. The caller's params are left as is.
    pub async fn search_members(
        &self,
        cancel: &CancellationToken,
        params: &SearchMembersQueryParams,
    ) -> Result<SearchMembersResponse, ApiError> {
        let client = self.can_make_request()?;
        let mut scoped = params.clone();
        scoped.list_id = self.id.clone();
        client.search_members(cancel, &scoped).await
    }
}
