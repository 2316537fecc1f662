//! REST implementation of [`OrderGateway`] for the RIT client API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode};
use ritmm_core::{
    CaseState, CaseStatus, OpenOrder, OrderId, OrderRequest, Position, RawBook, Ticker,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::OrderGateway;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
struct CaseResponse {
    tick: u32,
    status: String,
}

#[derive(Debug, Deserialize)]
struct SecurityResponse {
    ticker: String,
    position: Decimal,
    #[serde(default)]
    vwap: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct PlacedOrderResponse {
    order_id: u64,
}

/// Gateway backed by the RIT client REST API.
pub struct RestGateway {
    client: Client,
    base_url: String,
    max_rate_limit_retries: u32,
    default_retry_wait: Duration,
}

impl RestGateway {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| GatewayError::InvalidConfig(format!("Invalid API key header: {e}")))?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| GatewayError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            max_rate_limit_retries: config.max_rate_limit_retries,
            default_retry_wait: config.default_retry_wait(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Send a request and decode the JSON body.
    ///
    /// HTTP 429 sleeps for the server hint and re-issues the identical
    /// request, up to `max_rate_limit_retries` times.
    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> GatewayResult<T> {
        let url = self.url(endpoint);
        let mut retries = 0u32;

        loop {
            let response = self
                .client
                .request(method.clone(), &url)
                .query(query)
                .send()
                .await
                .map_err(|e| GatewayError::Transport(format!("{method} {endpoint}: {e}")))?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED {
                error!(%method, endpoint, "Authentication failed");
                return Err(GatewayError::Auth);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let header_wait = retry_after_header(response.headers());
                let body = response.text().await.unwrap_or_default();
                let wait = header_wait
                    .or_else(|| retry_after_body(&body))
                    .unwrap_or(self.default_retry_wait);

                if retries >= self.max_rate_limit_retries {
                    return Err(GatewayError::RateLimited {
                        retry_after: wait,
                        attempts: retries,
                    });
                }
                retries += 1;
                warn!(
                    %method,
                    endpoint,
                    wait_ms = wait.as_millis() as u64,
                    retry = retries,
                    "Rate limited, waiting before retry"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            let body = response
                .text()
                .await
                .map_err(|e| GatewayError::Transport(format!("{method} {endpoint}: {e}")))?;

            if !status.is_success() {
                return Err(GatewayError::Rejected {
                    status: status.as_u16(),
                    body,
                });
            }

            debug!(%method, endpoint, status = status.as_u16(), "Response received");
            return serde_json::from_str(&body)
                .map_err(|e| GatewayError::Decode(format!("{endpoint}: {e}")));
        }
    }
}

/// `Retry-After` in (possibly fractional) seconds.
fn retry_after_header(headers: &HeaderMap) -> Option<Duration> {
    let secs: f64 = headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// `{"wait": seconds}` body hint.
fn retry_after_body(body: &str) -> Option<Duration> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let secs = value.get("wait")?.as_f64()?;
    Duration::try_from_secs_f64(secs).ok()
}

fn to_position(ticker: &Ticker, securities: Vec<SecurityResponse>) -> GatewayResult<Position> {
    let security = securities
        .into_iter()
        .find(|s| s.ticker == ticker.as_str())
        .ok_or_else(|| GatewayError::Decode(format!("securities: {ticker} not in response")))?;
    let net_quantity = security.position.round().to_i64().ok_or_else(|| {
        GatewayError::Decode(format!("securities: position out of range: {}", security.position))
    })?;

    Ok(Position {
        ticker: ticker.clone(),
        net_quantity,
        average_cost: security.vwap.unwrap_or(Decimal::ZERO),
    })
}

#[async_trait]
impl OrderGateway for RestGateway {
    async fn get_tick(&self) -> GatewayResult<CaseState> {
        let case: CaseResponse = self.send_json(Method::GET, "case", &[]).await?;
        Ok(CaseState {
            tick: case.tick,
            status: CaseStatus::from(case.status.as_str()),
        })
    }

    async fn get_book(&self, ticker: &Ticker, depth: usize) -> GatewayResult<RawBook> {
        self.send_json(
            Method::GET,
            "securities/book",
            &[
                ("ticker", ticker.to_string()),
                ("limit", depth.to_string()),
            ],
        )
        .await
    }

    async fn get_position(&self, ticker: &Ticker) -> GatewayResult<Position> {
        let securities: Vec<SecurityResponse> = self
            .send_json(Method::GET, "securities", &[("ticker", ticker.to_string())])
            .await?;
        to_position(ticker, securities)
    }

    async fn get_open_orders(&self, ticker: &Ticker) -> GatewayResult<Vec<OpenOrder>> {
        self.send_json(
            Method::GET,
            "orders",
            &[
                ("ticker", ticker.to_string()),
                ("status", "OPEN".to_string()),
            ],
        )
        .await
    }

    async fn place_order(&self, request: &OrderRequest) -> GatewayResult<OrderId> {
        let placed: PlacedOrderResponse = self
            .send_json(
                Method::POST,
                "orders",
                &[
                    ("ticker", request.ticker.to_string()),
                    ("type", request.order_type.as_str().to_string()),
                    ("quantity", request.quantity.to_string()),
                    ("price", request.price.to_string()),
                    ("action", request.side.as_action().to_string()),
                ],
            )
            .await?;
        Ok(OrderId(placed.order_id))
    }

    async fn cancel_order(&self, order_id: OrderId) -> GatewayResult<()> {
        let _: serde_json::Value = self
            .send_json(Method::DELETE, &format!("orders/{order_id}"), &[])
            .await?;
        Ok(())
    }

    async fn cancel_all(&self, ticker: &Ticker) -> GatewayResult<()> {
        let _: serde_json::Value = self
            .send_json(
                Method::POST,
                "commands/cancel",
                &[("ticker", ticker.to_string())],
            )
            .await?;
        Ok(())
    }
}
