//! reqwest-backed implementation of the remote API seams.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tonforge_boc::{Coins, TonAddress};
use url::Url;

use crate::api::{ApiError, BroadcastApi, Emulation, EmulationApi, RatesApi, WalletStateApi};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One HTTP client for every remote seam the pipeline needs.
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    /// `base_url` is the indexer root, e.g. `https://tonapi.io`.
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base_url })
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::Other(format!("bad endpoint path {path:?}: {err}")))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "api request");
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "api request");
        let response = self.client.post(url).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

#[derive(Deserialize)]
struct SeqnoResponse {
    seqno: u32,
}

#[derive(Deserialize)]
struct AccountResponse {
    balance: u128,
}

#[derive(Deserialize)]
struct TimeoutResponse {
    timeout: u64,
}

#[derive(Serialize)]
struct MessageRequest<'a> {
    boc: &'a str,
}

#[derive(Deserialize)]
struct EmulationResponse {
    description: String,
    fee: u128,
    risk_ton: u128,
    #[serde(default)]
    risk_nft_count: u32,
}

#[derive(Deserialize)]
struct RatesResponse {
    rates: HashMap<String, TokenRates>,
}

#[derive(Deserialize)]
struct TokenRates {
    prices: HashMap<String, f64>,
}

#[async_trait]
impl WalletStateApi for HttpApi {
    async fn seqno(&self, address: &TonAddress) -> Result<u32, ApiError> {
        let response: SeqnoResponse =
            self.get(&format!("v2/wallet/{}/seqno", address.to_raw())).await?;
        Ok(response.seqno)
    }

    async fn safe_timeout(&self) -> Result<u64, ApiError> {
        let response: TimeoutResponse = self.get("v2/message/timeout").await?;
        Ok(response.timeout)
    }

    async fn balance(&self, address: &TonAddress) -> Result<Coins, ApiError> {
        let response: AccountResponse =
            self.get(&format!("v2/accounts/{}", address.to_raw())).await?;
        Ok(Coins::from_nano(response.balance))
    }
}

#[async_trait]
impl EmulationApi for HttpApi {
    async fn emulate(&self, boc: &str) -> Result<Emulation, ApiError> {
        let response: EmulationResponse =
            self.post("v2/events/emulate", &MessageRequest { boc }).await?;
        Ok(Emulation {
            description: response.description,
            fee: Coins::from_nano(response.fee),
            risk_total: Coins::from_nano(response.risk_ton),
            risk_nft_count: response.risk_nft_count,
        })
    }
}

#[async_trait]
impl BroadcastApi for HttpApi {
    async fn broadcast(&self, boc: &str) -> Result<(), ApiError> {
        let url = self.endpoint("v2/blockchain/message")?;
        tracing::debug!(%url, "api request");
        let response = self.client.post(url).json(&MessageRequest { boc }).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl RatesApi for HttpApi {
    async fn ton_rate(&self, currency: &str) -> Result<Option<f64>, ApiError> {
        let response: Result<RatesResponse, ApiError> =
            self.get(&format!("v2/rates?tokens=ton&currencies={currency}")).await;
        match response {
            Ok(rates) => Ok(rates
                .rates
                .get("TON")
                .and_then(|token| token.prices.get(currency))
                .copied()),
            // A rate the endpoint does not carry is an absent rate, not a
            // failed attempt.
            Err(ApiError::Status(404)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
