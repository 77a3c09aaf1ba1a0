use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentActionBody<'a> {
    pub payment_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<&'a str>,
}

/// Status and body of a relay response. Non-JSON bodies are kept as strings.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct RelayClient {
    client: Client,
    relay_url: String,
}

impl RelayClient {
    pub fn new(relay_url: &str) -> Self {
        Self {
            client: Client::new(),
            relay_url: relay_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ask the relay to approve a payment the app just created.
    pub async fn approve(&self, payment_id: &str) -> Result<RelayResponse, reqwest::Error> {
        self.post("/payment/approve", &PaymentActionBody { payment_id, txid: None })
            .await
    }

    /// Report the blockchain transaction that settles a payment.
    pub async fn complete(
        &self,
        payment_id: &str,
        txid: &str,
    ) -> Result<RelayResponse, reqwest::Error> {
        self.post(
            "/payment/complete",
            &PaymentActionBody {
                payment_id,
                txid: Some(txid),
            },
        )
        .await
    }

    pub async fn cancel(&self, payment_id: &str) -> Result<RelayResponse, reqwest::Error> {
        self.post("/payment/cancel", &PaymentActionBody { payment_id, txid: None })
            .await
    }

    /// POST a raw body, for callers that build their own payloads.
    pub async fn post_raw(
        &self,
        path: &str,
        body: impl Into<reqwest::Body>,
    ) -> Result<RelayResponse, reqwest::Error> {
        let resp = self
            .client
            .post(format!("{}{}", self.relay_url, path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;
        Self::read(resp).await
    }

    /// Fetch the relay's HTML page.
    pub async fn index(&self) -> Result<(StatusCode, String), reqwest::Error> {
        let resp = self.client.get(format!("{}/", self.relay_url)).send().await?;
        let status = resp.status();
        Ok((status, resp.text().await?))
    }

    async fn post<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<RelayResponse, reqwest::Error> {
        let resp = self
            .client
            .post(format!("{}{}", self.relay_url, path))
            .json(body)
            .send()
            .await?;
        Self::read(resp).await
    }

    async fn read(resp: reqwest::Response) -> Result<RelayResponse, reqwest::Error> {
        let status = resp.status();
        let text = resp.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(RelayResponse { status, body })
    }
}
