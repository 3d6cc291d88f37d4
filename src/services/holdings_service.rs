use async_trait::async_trait;
use serde::{ Deserialize, Deserializer, Serialize };
use serde_json::Value;

use crate::error::{ AppError, Result };
use super::scrape_proxy::{ RenderOptions, ScrapeProxy };

const PAGE_LIMIT: u32 = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub token_address: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// One token position of a wallet. Amounts stay as the decimal strings the
/// API sent; numbers are accepted and stringified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    #[serde(default)]
    pub token: TokenInfo,
    #[serde(default, deserialize_with = "decimal_string")]
    pub balance: String,
    #[serde(default, deserialize_with = "decimal_string")]
    pub usd_value: String,
    #[serde(default, deserialize_with = "decimal_string")]
    pub realized_profit: String,
    #[serde(default, deserialize_with = "decimal_string")]
    pub unrealized_profit: String,
    #[serde(default, deserialize_with = "decimal_string")]
    pub total_profit: String,
    #[serde(default, deserialize_with = "decimal_string")]
    pub total_profit_pnl: String,
    #[serde(default, deserialize_with = "decimal_string")]
    pub last_active_timestamp: String,
}

impl Holding {
    pub fn matches_address(&self, address: &str) -> bool {
        self.token.address == address || self.token.token_address == address
    }
}

fn decimal_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
    where D: Deserializer<'de>
{
    Ok(
        match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    )
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletPage {
    pub holdings: Vec<Holding>,
    /// Continuation cursor; `None` once the listing is exhausted.
    pub next: Option<String>,
}

impl WalletPage {
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    html: Option<String>,
    detail: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct HoldingsResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
    data: Option<HoldingsData>,
}

#[derive(Debug, Deserialize)]
struct HoldingsData {
    #[serde(default)]
    holdings: Vec<Holding>,
    #[serde(default)]
    next: Option<String>,
}

/// Unwraps the proxy envelope and decodes the holdings payload inside it.
pub fn parse_proxy_body(body: &str) -> Result<WalletPage> {
    let envelope: ProxyEnvelope = serde_json::from_str(body)?;

    let html = match envelope.html {
        Some(html) if !html.trim().is_empty() => html,
        _ => {
            let reason = match envelope.detail {
                Some(Value::String(s)) => s,
                Some(other) => other.to_string(),
                None => "empty proxy response".to_string(),
            };
            return Err(AppError::Upstream(reason));
        }
    };

    let response: HoldingsResponse = serde_json::from_str(&html)?;

    let data = response.data.ok_or_else(|| {
        let reason = if !response.reason.is_empty() { response.reason } else { response.message };
        AppError::Upstream(format!("code {}: {}", response.code, reason))
    })?;

    Ok(WalletPage {
        holdings: data.holdings,
        next: data.next.filter(|c| !c.is_empty()),
    })
}

/// URL of one holdings page, newest activity first.
pub fn holdings_url(api_url: &str, chain: &str, wallet: &str, cursor: Option<&str>) -> String {
    let mut url = format!(
        "{}/wallet_holdings/{}/{}?limit={}&orderby=last_active_timestamp&direction=desc&showsmall=true&sellout=true&tx30d=true",
        api_url,
        chain,
        wallet,
        PAGE_LIMIT
    );

    if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
        url.push_str("&cursor=");
        url.push_str(&urlencoding::encode(cursor));
    }

    url
}

#[async_trait]
pub trait HoldingsSource: Send + Sync {
    /// Fetch one page of a wallet's holdings, continuing from `cursor` when given.
    async fn fetch_holdings(&self, wallet: &str, cursor: Option<&str>) -> Result<WalletPage>;
}

pub struct GmgnHoldingsClient {
    proxy: ScrapeProxy,
    api_url: String,
    chain: String,
}

impl GmgnHoldingsClient {
    pub fn new(proxy: ScrapeProxy, api_url: &str, chain: &str) -> Self {
        Self {
            proxy,
            api_url: api_url.to_string(),
            chain: chain.to_string(),
        }
    }
}

#[async_trait]
impl HoldingsSource for GmgnHoldingsClient {
    async fn fetch_holdings(&self, wallet: &str, cursor: Option<&str>) -> Result<WalletPage> {
        let url = holdings_url(&self.api_url, &self.chain, wallet, cursor);

        let result = match self.proxy.fetch(&url, RenderOptions::default()).await {
            Ok(body) => parse_proxy_body(&body),
            Err(e) => Err(e),
        };

        match &result {
            Ok(page) =>
                tracing::debug!(
                    "Fetched {} holdings for {} (more: {})",
                    page.holdings.len(),
                    wallet,
                    !page.is_last()
                ),
            Err(e) => tracing::error!("Failed to fetch holdings for {}: {}", wallet, e),
        }

        result
    }
}

/// Holdings discovered so far in one browsing session, plus the cursor to
/// continue from. Grows as further pages are pulled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingsSnapshot {
    pub tokens: Vec<Holding>,
    pub cursor: Option<String>,
}

impl HoldingsSnapshot {
    pub async fn load(source: &dyn HoldingsSource, wallet: &str) -> Result<Self> {
        let page = source.fetch_holdings(wallet, None).await?;
        Ok(Self {
            tokens: page.holdings,
            cursor: page.next,
        })
    }

    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn position_of(&self, address: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t.matches_address(address))
    }

    /// Pulls the next upstream page, returning how many holdings it added.
    pub async fn fetch_next(&mut self, source: &dyn HoldingsSource, wallet: &str) -> Result<usize> {
        let Some(cursor) = self.cursor.clone() else {
            return Ok(0);
        };

        let page = source.fetch_holdings(wallet, Some(&cursor)).await?;
        let added = page.holdings.len();
        self.tokens.extend(page.holdings);
        self.cursor = page.next;
        Ok(added)
    }

    /// Fetches pages until more than `index` holdings are known, the cursor
    /// runs out, or `max_pages` requests were made.
    pub async fn ensure_beyond(
        &mut self,
        source: &dyn HoldingsSource,
        wallet: &str,
        index: usize,
        max_pages: usize
    ) -> Result<()> {
        let mut fetched = 0;
        while self.tokens.len() <= index && self.has_more() && fetched < max_pages {
            self.fetch_next(source, wallet).await?;
            fetched += 1;
        }
        Ok(())
    }

    /// Index of the holding with `address`, paging through the cursor as needed.
    ///
    /// `Ok(None)` means the listing was exhausted without a match;
    /// `HoldingsExhausted` means `max_pages` extra pages were scanned and the
    /// cursor is still live.
    pub async fn locate(
        &mut self,
        source: &dyn HoldingsSource,
        wallet: &str,
        address: &str,
        max_pages: usize
    ) -> Result<Option<usize>> {
        if let Some(index) = self.position_of(address) {
            return Ok(Some(index));
        }

        let mut fetched = 0;
        while self.has_more() {
            if fetched >= max_pages {
                return Err(AppError::HoldingsExhausted { pages: fetched });
            }

            let scanned_from = self.tokens.len();
            self.fetch_next(source, wallet).await?;
            fetched += 1;

            if
                let Some(offset) = self.tokens[scanned_from..]
                    .iter()
                    .position(|t| t.matches_address(address))
            {
                return Ok(Some(scanned_from + offset));
            }
        }

        Ok(None)
    }
}
