//! Paginated account summary retrieval.
//!
//! The list endpoint pages with `start-index` (1-based). Pages are requested
//! until `startIndex + itemsPerPage` passes `totalResults`, and the items are
//! concatenated in order before indexing.

use gamgmt_core::summaries::AccountSummaries;
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::transport::{check_api_error, ManagementTransport};

pub const ACCOUNT_SUMMARIES_PATH: &str = "/analytics/v3/management/accountSummaries";

/// Cache key for the account summary list.
pub const CACHE_KEY: &str = "accountSummaries";

pub async fn fetch_account_summaries<T: ManagementTransport>(
    transport: &T,
    max_results: Option<u32>,
) -> ClientResult<AccountSummaries> {
    let mut items: Vec<Value> = Vec::new();
    let mut start_index: u64 = 1;
    let mut pages = 0usize;

    loop {
        let mut query = vec![("start-index", start_index.to_string())];
        if let Some(n) = max_results {
            query.push(("max-results", n.to_string()));
        }

        let mut resp = transport.get_json(ACCOUNT_SUMMARIES_PATH, &query).await?;
        pages += 1;
        check_api_error(&resp)?;

        let page = match resp.get_mut("items").map(Value::take) {
            Some(Value::Array(page)) => page,
            Some(other) => {
                return Err(ClientError::UnexpectedResponse(format!(
                    "account summary items is not an array: {other}"
                )))
            }
            None => return Err(ClientError::NoAccounts),
        };
        let page_len = page.len() as u64;
        items.extend(page);

        let page_start = resp.get("startIndex").and_then(Value::as_u64).unwrap_or(start_index);
        let per_page = resp.get("itemsPerPage").and_then(Value::as_u64).unwrap_or(page_len);
        let total = resp.get("totalResults").and_then(Value::as_u64).unwrap_or(0);

        if per_page == 0 || page_start + per_page > total {
            break;
        }
        start_index = page_start + per_page;
    }

    debug!(pages, accounts = items.len(), "fetched account summaries");
    Ok(AccountSummaries::from_items_json(Value::Array(items))?)
}
