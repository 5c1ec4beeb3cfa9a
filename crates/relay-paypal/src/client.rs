//! # PayPal Order Gateway
//!
//! `OrderGateway` implementation over the Orders v2 / Payments v2 REST
//! APIs. Every outbound call carries bearer auth from the token provider,
//! a bounded timeout, and (for writes) a fresh idempotency key.

use crate::config::PayPalConfig;
use crate::payload::{
    build_order_payload, extract_approval_url, first_capture_record, fresh_request_id,
    links_to_core, normalize_capture, provider_rejection, refund_to_result,
    AuthorizationCapturePayload, MoneyPayload, OrderResponse, RefundPayload, RefundResponse,
};
use crate::token::TokenProvider;
use async_trait::async_trait;
use relay_core::{
    Amount, CaptureOptions, CaptureResult, Currency, GatewayError, GatewayResult, Order,
    OrderGateway, OrderRequest, OrderStatus, PaymentSource, RefundOptions, RefundResult,
    ReturnUrls,
};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

/// PayPal implementation of the order lifecycle
pub struct PayPalGateway {
    config: PayPalConfig,
    urls: ReturnUrls,
    tokens: TokenProvider,
    client: Client,
}

impl PayPalGateway {
    /// Create a new gateway against the configured environment
    pub fn new(config: PayPalConfig, urls: ReturnUrls) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        let tokens = TokenProvider::new(config.clone(), client.clone());

        Self {
            config,
            urls,
            tokens,
            client,
        }
    }

    /// Create from environment variables
    pub fn from_env(urls: ReturnUrls) -> GatewayResult<Self> {
        let config = PayPalConfig::from_env()?;
        Ok(Self::new(config, urls))
    }

    pub fn config(&self) -> &PayPalConfig {
        &self.config
    }

    /// Send an authenticated request and return the raw status and body.
    /// Classification into the per-operation error kinds happens at the
    /// call sites, which know what they asked for.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        request_id: Option<&str>,
        body: Option<&B>,
    ) -> GatewayResult<(StatusCode, String)> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}{}", self.config.api_base_url, path);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(token)
            .header("Prefer", "return=representation");

        if let Some(id) = request_id {
            request = request.header("PayPal-Request-Id", id);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        debug!("Provider responded: {} {} -> {}", path, status, text.len());
        Ok((status, text))
    }

    fn parse<T: serde::de::DeserializeOwned>(body: &str, what: &str) -> GatewayResult<T> {
        serde_json::from_str(body).map_err(|e| {
            GatewayError::Serialization(format!("Failed to parse {} response: {}", what, e))
        })
    }

    fn refund_amount(&self, options: &RefundOptions) -> GatewayResult<Option<Amount>> {
        let Some(value) = &options.amount else {
            return Ok(None);
        };
        let currency = match &options.currency {
            Some(code) => Currency::parse(code)?,
            None => self.config.default_currency.clone(),
        };
        let amount = Amount::parse(value, currency)?;
        if !amount.is_positive() {
            return Err(GatewayError::InvalidRequest(
                "Refund amount must be positive".to_string(),
            ));
        }
        Ok(Some(amount))
    }
}

#[async_trait]
impl OrderGateway for PayPalGateway {
    #[instrument(skip(self, request), fields(source = ?std::mem::discriminant(&request.payment_source)))]
    async fn create_order(&self, request: &OrderRequest) -> GatewayResult<Order> {
        let resolved = request.resolve(&self.config.default_currency)?;
        let payload = build_order_payload(request, &resolved, &self.config, &self.urls)?;

        debug!(
            "Creating order: total={}, items={}",
            resolved.total,
            resolved.items.len()
        );

        let request_id = fresh_request_id();
        let (status, body) = self
            .send(
                Method::POST,
                "/v2/checkout/orders",
                Some(&request_id),
                Some(&payload),
            )
            .await?;

        if !status.is_success() {
            error!("Order creation rejected: status={}, body={}", status, body);
            let (message, body) = provider_rejection(status, &body);
            return Err(GatewayError::OrderCreation { message, body });
        }

        let response: OrderResponse = Self::parse(&body, "order")?;
        info!("Created order: id={}, status={}", response.id, response.status);

        let approval_url = match request.payment_source {
            PaymentSource::Paypal => {
                // The hosted flow is unusable without the redirect target
                let url = extract_approval_url(&response.links).ok_or_else(|| {
                    GatewayError::OrderCreation {
                        message: "Provider response carried no approve link".to_string(),
                        body: serde_json::from_str(&body).ok(),
                    }
                })?;
                Some(url)
            }
            _ => None,
        };

        let mut order = Order {
            id: response.id,
            status: response.status,
            approval_url,
            links: links_to_core(&response.links),
        };

        // Direct card flow: the card data authorizes payment at creation
        // time, so creation and capture are one logical operation.
        if matches!(request.payment_source, PaymentSource::Card { .. })
            && order.status != OrderStatus::Completed
        {
            let capture = self
                .capture_order(&order.id, &CaptureOptions::default())
                .await?;
            order.status = OrderStatus::from_provider(capture.status.as_str());
        }

        Ok(order)
    }

    #[instrument(skip(self, options), fields(order_id = %order_id))]
    async fn capture_order(
        &self,
        order_id: &str,
        options: &CaptureOptions,
    ) -> GatewayResult<CaptureResult> {
        let path = format!("/v2/checkout/orders/{}/capture", order_id);
        let request_id = fresh_request_id();
        let (status, body) = self
            .send(Method::POST, &path, Some(&request_id), Some(options))
            .await?;

        if !status.is_success() {
            error!("Capture rejected: status={}, body={}", status, body);
            let (message, body) = provider_rejection(status, &body);
            return Err(GatewayError::Capture { message, body });
        }

        let response: OrderResponse = Self::parse(&body, "capture")?;

        // A 2xx with a non-COMPLETED status is a successful call; the
        // caller decides whether the returned status is acceptable.
        let record = first_capture_record(&response).ok_or_else(|| {
            GatewayError::Serialization(format!(
                "Capture response for order {} carried no capture record",
                order_id
            ))
        })?;

        let result = normalize_capture(record, Some(&response.id), response.payer.as_ref())?;
        info!(
            "Captured order {}: capture_id={}, status={}",
            order_id, result.capture_id, result.status
        );
        Ok(result)
    }

    #[instrument(skip(self), fields(authorization_id = %authorization_id))]
    async fn capture_authorization(
        &self,
        authorization_id: &str,
        amount: &str,
        currency: Option<&str>,
        final_capture: bool,
    ) -> GatewayResult<CaptureResult> {
        let currency = match currency {
            Some(code) => Currency::parse(code)?,
            None => self.config.default_currency.clone(),
        };
        let amount = Amount::parse(amount, currency)?;
        if !amount.is_positive() {
            return Err(GatewayError::InvalidRequest(
                "Capture amount must be positive".to_string(),
            ));
        }

        let payload = AuthorizationCapturePayload {
            amount: MoneyPayload::from_amount(&amount),
            final_capture,
        };

        let path = format!("/v2/payments/authorizations/{}/capture", authorization_id);
        let request_id = fresh_request_id();
        let (status, body) = self
            .send(Method::POST, &path, Some(&request_id), Some(&payload))
            .await?;

        if !status.is_success() {
            error!(
                "Authorization capture rejected: status={}, body={}",
                status, body
            );
            let (message, body) = provider_rejection(status, &body);
            return Err(GatewayError::Capture { message, body });
        }

        // Authorization captures return the capture object directly
        let record = Self::parse(&body, "authorization capture")?;
        let result = normalize_capture(&record, None, None)?;
        info!(
            "Captured authorization {}: capture_id={}, status={}, final={}",
            authorization_id, result.capture_id, result.status, final_capture
        );
        Ok(result)
    }

    #[instrument(skip(self, options), fields(capture_id = %capture_id))]
    async fn refund_capture(
        &self,
        capture_id: &str,
        options: &RefundOptions,
    ) -> GatewayResult<RefundResult> {
        // An omitted amount refunds the full original capture
        let payload = RefundPayload {
            amount: self
                .refund_amount(options)?
                .as_ref()
                .map(MoneyPayload::from_amount),
            note_to_payer: options.note_to_payer.clone(),
        };

        let path = format!("/v2/payments/captures/{}/refund", capture_id);
        let request_id = fresh_request_id();
        let (status, body) = self
            .send(Method::POST, &path, Some(&request_id), Some(&payload))
            .await?;

        if !status.is_success() {
            error!("Refund rejected: status={}, body={}", status, body);
            let (message, body) = provider_rejection(status, &body);
            return Err(GatewayError::Refund { message, body });
        }

        let response: RefundResponse = Self::parse(&body, "refund")?;
        let result = refund_to_result(&response)?;
        info!(
            "Refunded capture {}: refund_id={}, status={}",
            capture_id, result.refund_id, result.status
        );
        Ok(result)
    }

    async fn get_order(&self, order_id: &str) -> GatewayResult<serde_json::Value> {
        let path = format!("/v2/checkout/orders/{}", order_id);
        let (status, body) = self
            .send::<()>(Method::GET, &path, None, None)
            .await?;

        if !status.is_success() {
            let (message, body) = provider_rejection(status, &body);
            return Err(GatewayError::Provider { message, body });
        }

        Self::parse(&body, "order")
    }

    async fn get_capture(&self, capture_id: &str) -> GatewayResult<serde_json::Value> {
        let path = format!("/v2/payments/captures/{}", capture_id);
        let (status, body) = self
            .send::<()>(Method::GET, &path, None, None)
            .await?;

        if !status.is_success() {
            let (message, body) = provider_rejection(status, &body);
            return Err(GatewayError::Provider { message, body });
        }

        Self::parse(&body, "capture")
    }

    fn provider_name(&self) -> &'static str {
        "paypal"
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Transport(format!("Request timed out: {}", e))
    } else {
        GatewayError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> PayPalGateway {
        PayPalGateway::new(
            PayPalConfig::new("id", "secret"),
            ReturnUrls::new("https://shop.example.com"),
        )
    }

    #[test]
    fn test_refund_amount_resolution() {
        let gateway = gateway();

        // Omitted amount means full refund
        assert!(gateway
            .refund_amount(&RefundOptions::default())
            .unwrap()
            .is_none());

        let options = RefundOptions {
            amount: Some("2.50".to_string()),
            ..Default::default()
        };
        let amount = gateway.refund_amount(&options).unwrap().unwrap();
        assert_eq!(amount.to_value_string(), "2.50");
        assert_eq!(amount.currency.as_str(), "USD");

        let options = RefundOptions {
            amount: Some("0.00".to_string()),
            ..Default::default()
        };
        assert!(gateway.refund_amount(&options).is_err());
    }

    #[tokio::test]
    async fn test_invalid_request_fails_before_any_network_call() {
        // Amount validation happens before the token exchange, so even a
        // gateway pointed at a dead host rejects locally.
        let gateway = PayPalGateway::new(
            PayPalConfig::new("id", "secret").with_api_base_url("http://127.0.0.1:1"),
            ReturnUrls::default(),
        );

        let err = gateway
            .create_order(&OrderRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));

        let err = gateway
            .capture_authorization("9XY", "-1.00", None, true)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
    }
}
