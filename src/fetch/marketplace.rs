//! Reqwest-backed marketplace client.
//!
//! Assembles complete ledger and inventory snapshots from the marketplace's
//! paginated endpoints, with a fixed inter-request delay to stay under its
//! rate limits. No analysis happens here.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::models::{AccountId, HoldingItem, HoldingsSnapshot, LedgerSnapshot};

use super::LedgerSource;

const DEFAULT_BASE_URL: &str = "https://marketplace.example.com";
const DEFAULT_PAGE_SIZE: u32 = 100;
const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(1500);

/// One page of the market history endpoint. The ledger fields deserialize
/// straight into [`LedgerSnapshot`]; `success` is an envelope flag.
#[derive(Debug, Deserialize)]
struct LedgerPage {
    success: bool,
    #[serde(flatten)]
    snapshot: LedgerSnapshot,
}

/// One page of the inventory endpoint.
#[derive(Debug, Deserialize)]
struct InventoryPage {
    success: bool,
    #[serde(default)]
    items: Vec<HoldingItem>,
    #[serde(default)]
    more_items: bool,
    #[serde(default)]
    last_asset_id: Option<String>,
}

/// HTTP client for one account's marketplace data.
pub struct MarketplaceClient {
    client: Client,
    base_url: String,
    account_id: AccountId,
    game_id: String,
    context_id: String,
    page_size: u32,
    request_delay: Duration,
    session_cookie: Option<SecretString>,
}

impl MarketplaceClient {
    pub fn new(
        account_id: AccountId,
        game_id: impl Into<String>,
        context_id: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            account_id,
            game_id: game_id.into(),
            context_id: context_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
            request_delay: DEFAULT_REQUEST_DELAY,
            session_cookie: None,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_session_cookie(mut self, cookie: SecretString) -> Self {
        self.session_cookie = Some(cookie);
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut request = self.client.get(url);
        if let Some(cookie) = &self.session_cookie {
            request = request.header(
                reqwest::header::COOKIE,
                format!("session={}", cookie.expose_secret()),
            );
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("invalid response body from {url}"))
    }

    async fn throttle(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }
}

#[async_trait::async_trait]
impl LedgerSource for MarketplaceClient {
    fn name(&self) -> &str {
        "marketplace"
    }

    async fn fetch_ledger(&self) -> Result<LedgerSnapshot> {
        let mut snapshot = LedgerSnapshot::default();
        let mut start: u64 = 0;

        loop {
            let url = format!(
                "{}/market/myhistory?start={}&count={}",
                self.base_url, start, self.page_size
            );
            let page: LedgerPage = self.get_json(&url).await?;
            if !page.success {
                anyhow::bail!("marketplace rejected ledger page at start={start}");
            }

            let fetched = page
                .snapshot
                .purchases
                .as_ref()
                .map(|p| p.len() as u64)
                .unwrap_or(0);
            let total = page.snapshot.total_count;
            snapshot.merge_page(page.snapshot);

            debug!(start, fetched, ?total, "fetched ledger page");

            // An empty page means the feed is exhausted regardless of the
            // advertised total.
            if fetched == 0 {
                break;
            }
            start += fetched;
            match total {
                Some(total) if start < total => self.throttle().await,
                _ => break,
            }
        }

        if snapshot.purchases.is_none() {
            anyhow::bail!("marketplace returned no purchases collection");
        }
        Ok(snapshot)
    }

    async fn fetch_holdings(&self) -> Result<HoldingsSnapshot> {
        let mut items: Vec<HoldingItem> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/inventory/{}/{}/{}?count={}",
                self.base_url, self.account_id, self.game_id, self.context_id, self.page_size
            );
            if let Some(cursor) = &cursor {
                url.push_str(&format!("&start_asset_id={cursor}"));
            }

            let page: InventoryPage = self.get_json(&url).await?;
            if !page.success {
                anyhow::bail!("marketplace rejected inventory page");
            }

            debug!(fetched = page.items.len(), more = page.more_items, "fetched inventory page");
            items.extend(page.items);

            match (page.more_items, page.last_asset_id) {
                (true, Some(last)) => {
                    cursor = Some(last);
                    self.throttle().await;
                }
                _ => break,
            }
        }

        Ok(HoldingsSnapshot::new(items))
    }
}
