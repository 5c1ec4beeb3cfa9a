//! # Payload Shaping
//!
//! Plain data shaping between our `OrderRequest` and PayPal's wire format:
//! request bodies the Orders/Payments v2 APIs expect, response envelopes,
//! and the normalization of capture/refund responses. No SDK builders and
//! no HTTP concerns: everything here is pure and unit-testable.

use crate::config::PayPalConfig;
use relay_core::{
    Amount, CaptureResult, CaptureStatus, Currency, FeeBreakdown, GatewayResult, OrderLink,
    OrderRequest, OrderStatus, PayerIdentity, PaymentSource, RefundResult, ResolvedOrder,
    ReturnUrls,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billing-address country used when the caller omits one
const DEFAULT_COUNTRY_CODE: &str = "US";

/// Fresh idempotency key for one logical attempt.
///
/// Equal `PayPal-Request-Id` values make the provider replay the original
/// response instead of creating a new resource, so every attempt gets its
/// own key.
pub fn fresh_request_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Request body types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct MoneyPayload {
    pub currency_code: String,
    pub value: String,
}

impl MoneyPayload {
    pub fn from_amount(amount: &Amount) -> Self {
        Self {
            currency_code: amount.currency.as_str().to_string(),
            value: amount.to_value_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BreakdownPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_total: Option<MoneyPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_total: Option<MoneyPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handling: Option<MoneyPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance: Option<MoneyPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<MoneyPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_discount: Option<MoneyPayload>,
}

#[derive(Debug, Serialize)]
pub struct AmountPayload {
    pub currency_code: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BreakdownPayload>,
}

#[derive(Debug, Serialize)]
pub struct ItemPayload {
    pub name: String,
    pub unit_amount: MoneyPayload,
    /// The provider wants quantity as a string
    pub quantity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseUnitPayload {
    pub amount: AmountPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemPayload>,
}

#[derive(Debug, Serialize)]
pub struct ExperienceContextPayload {
    pub brand_name: String,
    pub locale: String,
    pub landing_page: String,
    pub shipping_preference: String,
    pub user_action: String,
    pub return_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Serialize)]
pub struct PaypalSourcePayload {
    pub experience_context: ExperienceContextPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddressPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_area_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_area_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub country_code: String,
}

#[derive(Debug, Serialize)]
pub struct CardSourcePayload {
    pub number: String,
    /// Normalized to `YYYY-MM`
    pub expiry: String,
    pub security_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub billing_address: AddressPayload,
}

#[derive(Debug, Serialize)]
pub struct TokenSourcePayload {
    pub id: String,
    #[serde(rename = "type")]
    pub token_type: String,
}

#[derive(Debug, Default, Serialize)]
pub struct PaymentSourcePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paypal: Option<PaypalSourcePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardSourcePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenSourcePayload>,
}

#[derive(Debug, Serialize)]
pub struct OrderPayload {
    pub intent: &'static str,
    pub purchase_units: Vec<PurchaseUnitPayload>,
    pub payment_source: PaymentSourcePayload,
}

#[derive(Debug, Serialize)]
pub struct AuthorizationCapturePayload {
    pub amount: MoneyPayload,
    pub final_capture: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct RefundPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<MoneyPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_to_payer: Option<String>,
}

// =============================================================================
// Request body builders
// =============================================================================

fn build_breakdown(resolved: &ResolvedOrder) -> Option<BreakdownPayload> {
    if !resolved.has_breakdown() {
        return None;
    }
    Some(BreakdownPayload {
        item_total: resolved.item_total.as_ref().map(MoneyPayload::from_amount),
        tax_total: resolved.tax.as_ref().map(MoneyPayload::from_amount),
        handling: resolved.handling.as_ref().map(MoneyPayload::from_amount),
        insurance: resolved.insurance.as_ref().map(MoneyPayload::from_amount),
        discount: resolved.discount.as_ref().map(MoneyPayload::from_amount),
        shipping_discount: resolved
            .shipping_discount
            .as_ref()
            .map(MoneyPayload::from_amount),
    })
}

fn build_payment_source(
    request: &OrderRequest,
    config: &PayPalConfig,
    urls: &ReturnUrls,
) -> GatewayResult<PaymentSourcePayload> {
    let mut source = PaymentSourcePayload::default();

    match &request.payment_source {
        PaymentSource::Paypal => {
            source.paypal = Some(PaypalSourcePayload {
                experience_context: ExperienceContextPayload {
                    brand_name: config.brand_name.clone(),
                    locale: config.locale.clone(),
                    landing_page: "NO_PREFERENCE".to_string(),
                    shipping_preference: "NO_SHIPPING".to_string(),
                    user_action: "PAY_NOW".to_string(),
                    return_url: urls.return_url(),
                    cancel_url: urls.cancel_url(),
                },
                email_address: request.customer_email.clone(),
            });
        }
        PaymentSource::Card { card } => {
            let billing = card.billing_address.clone().unwrap_or_default();
            source.card = Some(CardSourcePayload {
                number: card.number.clone(),
                expiry: card.normalized_expiry()?,
                security_code: card.security_code.clone(),
                name: card.name.clone(),
                billing_address: AddressPayload {
                    address_line_1: billing.street,
                    admin_area_2: billing.city,
                    admin_area_1: billing.region,
                    postal_code: billing.postal_code,
                    country_code: billing
                        .country
                        .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string()),
                },
            });
        }
        PaymentSource::VaultedToken { vault_id } => {
            source.token = Some(TokenSourcePayload {
                id: vault_id.clone(),
                token_type: "PAYMENT_METHOD_TOKEN".to_string(),
            });
        }
    }

    Ok(source)
}

/// Build the `POST /v2/checkout/orders` body: `intent = CAPTURE`, exactly
/// one purchase unit, and the caller's chosen payment source.
pub fn build_order_payload(
    request: &OrderRequest,
    resolved: &ResolvedOrder,
    config: &PayPalConfig,
    urls: &ReturnUrls,
) -> GatewayResult<OrderPayload> {
    let items = resolved
        .items
        .iter()
        .map(|item| ItemPayload {
            name: item.name.clone(),
            unit_amount: MoneyPayload::from_amount(&item.unit_amount),
            quantity: item.quantity.to_string(),
            description: item.description.clone(),
            sku: item.sku.clone(),
        })
        .collect();

    Ok(OrderPayload {
        intent: "CAPTURE",
        purchase_units: vec![PurchaseUnitPayload {
            amount: AmountPayload {
                currency_code: resolved.currency.as_str().to_string(),
                value: resolved.total.to_value_string(),
                breakdown: build_breakdown(resolved),
            },
            description: request.description.clone(),
            items,
        }],
        payment_source: build_payment_source(request, config, urls)?,
    })
}

// =============================================================================
// Response envelopes
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct MoneyResponse {
    pub currency_code: String,
    pub value: String,
}

impl MoneyResponse {
    pub fn to_amount(&self) -> GatewayResult<Amount> {
        let currency = Currency::parse(&self.currency_code)?;
        Amount::parse(&self.value, currency)
    }
}

#[derive(Debug, Deserialize)]
pub struct LinkResponse {
    pub rel: String,
    pub href: String,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SellerBreakdownResponse {
    #[serde(default)]
    pub paypal_fee: Option<MoneyResponse>,
    #[serde(default)]
    pub net_amount: Option<MoneyResponse>,
}

#[derive(Debug, Deserialize)]
pub struct CaptureRecordResponse {
    pub id: String,
    pub status: CaptureStatus,
    #[serde(default)]
    pub amount: Option<MoneyResponse>,
    #[serde(default)]
    pub seller_receivable_breakdown: Option<SellerBreakdownResponse>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentsResponse {
    #[serde(default)]
    pub captures: Vec<CaptureRecordResponse>,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseUnitResponse {
    #[serde(default)]
    pub payments: Option<PaymentsResponse>,
}

#[derive(Debug, Deserialize)]
pub struct PayerNameResponse {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PayerResponse {
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub payer_id: Option<String>,
    #[serde(default)]
    pub name: Option<PayerNameResponse>,
}

#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub links: Vec<LinkResponse>,
    #[serde(default)]
    pub purchase_units: Vec<PurchaseUnitResponse>,
    #[serde(default)]
    pub payer: Option<PayerResponse>,
}

#[derive(Debug, Deserialize)]
pub struct RefundResponse {
    pub id: String,
    pub status: CaptureStatus,
    #[serde(default)]
    pub amount: Option<MoneyResponse>,
}

// =============================================================================
// Response normalization
// =============================================================================

/// Pick the `approve`-relation link out of the provider's link collection
/// (`payer-action` is the same redirect under a different rel for some
/// payment sources).
pub fn extract_approval_url(links: &[LinkResponse]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel == "approve" || l.rel == "payer-action")
        .map(|l| l.href.clone())
}

pub fn links_to_core(links: &[LinkResponse]) -> Vec<OrderLink> {
    links
        .iter()
        .map(|l| OrderLink {
            rel: l.rel.clone(),
            href: l.href.clone(),
            method: l.method.clone(),
        })
        .collect()
}

fn payer_to_identity(payer: Option<&PayerResponse>) -> Option<PayerIdentity> {
    let payer = payer?;
    Some(PayerIdentity {
        email: payer.email_address.clone(),
        given_name: payer.name.as_ref().and_then(|n| n.given_name.clone()),
        surname: payer.name.as_ref().and_then(|n| n.surname.clone()),
        payer_id: payer.payer_id.clone(),
    })
}

/// Normalize one capture record into a `CaptureResult`
pub fn normalize_capture(
    record: &CaptureRecordResponse,
    order_id: Option<&str>,
    payer: Option<&PayerResponse>,
) -> GatewayResult<CaptureResult> {
    let amount = record.amount.as_ref().map(|m| m.to_amount()).transpose()?;

    let fee = match &record.seller_receivable_breakdown {
        Some(breakdown) => match (&breakdown.paypal_fee, &breakdown.net_amount) {
            (Some(fee), Some(net)) => Some(FeeBreakdown {
                provider_fee: fee.to_amount()?,
                net_amount: net.to_amount()?,
            }),
            _ => None,
        },
        None => None,
    };

    Ok(CaptureResult {
        capture_id: record.id.clone(),
        order_id: order_id.map(String::from),
        status: record.status.clone(),
        amount,
        fee,
        payer: payer_to_identity(payer),
    })
}

/// Extract the first capture record from the first purchase unit of an
/// order-capture response.
pub fn first_capture_record(order: &OrderResponse) -> Option<&CaptureRecordResponse> {
    order
        .purchase_units
        .first()
        .and_then(|pu| pu.payments.as_ref())
        .and_then(|p| p.captures.first())
}

pub fn refund_to_result(refund: &RefundResponse) -> GatewayResult<RefundResult> {
    Ok(RefundResult {
        refund_id: refund.id.clone(),
        status: refund.status.clone(),
        amount: refund.amount.as_ref().map(|m| m.to_amount()).transpose()?,
    })
}

// =============================================================================
// Provider error classification
// =============================================================================

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    debug_id: Option<String>,
}

/// Summarize a non-2xx provider response, preserving the original payload
pub fn provider_rejection(status: reqwest::StatusCode, body: &str) -> (String, Option<serde_json::Value>) {
    let preserved: Option<serde_json::Value> = serde_json::from_str(body).ok();

    let message = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(err) => {
            let name = err.name.unwrap_or_else(|| format!("HTTP {}", status));
            match (err.message, err.debug_id) {
                (Some(msg), Some(id)) => format!("{}: {} (debug_id {})", name, msg, id),
                (Some(msg), None) => format!("{}: {}", name, msg),
                _ => name,
            }
        }
        Err(_) => format!("HTTP {}: {}", status, body),
    };

    (message, preserved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::{BillingAddress, CardDetails, OrderItem};

    fn hosted_request() -> OrderRequest {
        OrderRequest {
            amount: Some("24.99".to_string()),
            currency: Some("USD".to_string()),
            description: Some("Annual plan".to_string()),
            ..Default::default()
        }
    }

    fn config() -> PayPalConfig {
        PayPalConfig::new("id", "secret").with_brand_name("Demo Shop")
    }

    fn urls() -> ReturnUrls {
        ReturnUrls::new("https://shop.example.com")
    }

    fn build(request: &OrderRequest) -> serde_json::Value {
        let resolved = request.resolve(&Currency::usd()).unwrap();
        let payload = build_order_payload(request, &resolved, &config(), &urls()).unwrap();
        serde_json::to_value(&payload).unwrap()
    }

    #[test]
    fn test_request_ids_differ_per_attempt() {
        assert_ne!(fresh_request_id(), fresh_request_id());
    }

    #[test]
    fn test_hosted_payload_shape() {
        let body = build(&hosted_request());

        assert_eq!(body["intent"], "CAPTURE");
        assert_eq!(body["purchase_units"].as_array().unwrap().len(), 1);
        assert_eq!(body["purchase_units"][0]["amount"]["value"], "24.99");
        assert_eq!(body["purchase_units"][0]["amount"]["currency_code"], "USD");

        let context = &body["payment_source"]["paypal"]["experience_context"];
        assert_eq!(context["brand_name"], "Demo Shop");
        assert_eq!(context["user_action"], "PAY_NOW");
        assert_eq!(context["return_url"], "https://shop.example.com/checkout/return");
        assert_eq!(context["cancel_url"], "https://shop.example.com/checkout/cancel");
        assert!(body["payment_source"].get("card").is_none());
    }

    #[test]
    fn test_breakdown_only_when_non_zero() {
        let body = build(&hosted_request());
        assert!(body["purchase_units"][0]["amount"].get("breakdown").is_none());

        let mut request = hosted_request();
        request.amount = None;
        request.items = vec![OrderItem {
            name: "Widget".to_string(),
            unit_amount: "1.50".to_string(),
            quantity: 2,
            description: None,
            sku: None,
        }];
        request.tax = Some("0.45".to_string());

        let body = build(&request);
        let breakdown = &body["purchase_units"][0]["amount"]["breakdown"];
        assert_eq!(breakdown["item_total"]["value"], "3.00");
        assert_eq!(breakdown["tax_total"]["value"], "0.45");
        assert!(breakdown.get("handling").is_none());
        assert_eq!(body["purchase_units"][0]["amount"]["value"], "3.45");
        assert_eq!(body["purchase_units"][0]["items"][0]["quantity"], "2");
    }

    #[test]
    fn test_itemless_extras_breakdown_sums_to_amount() {
        let mut request = hosted_request();
        request.amount = Some("10.00".to_string());
        request.tax = Some("0.45".to_string());

        let body = build(&request);
        let amount = &body["purchase_units"][0]["amount"];
        assert_eq!(amount["value"], "10.00");

        // item_total + tax_total must equal the amount or the provider
        // rejects the order as unprocessable
        let breakdown = &amount["breakdown"];
        assert_eq!(breakdown["item_total"]["value"], "9.55");
        assert_eq!(breakdown["tax_total"]["value"], "0.45");

        let sum = Amount::parse(breakdown["item_total"]["value"].as_str().unwrap(), Currency::usd())
            .unwrap()
            .checked_add(
                &Amount::parse(
                    breakdown["tax_total"]["value"].as_str().unwrap(),
                    Currency::usd(),
                )
                .unwrap(),
            )
            .unwrap();
        assert_eq!(sum.to_value_string(), "10.00");
    }

    #[test]
    fn test_card_payload_shape() {
        let mut request = hosted_request();
        request.payment_source = PaymentSource::Card {
            card: CardDetails {
                number: "4111111111111111".to_string(),
                expiry: "1/26".to_string(),
                security_code: "123".to_string(),
                name: Some("Jo Tester".to_string()),
                billing_address: Some(BillingAddress {
                    street: Some("1 Main St".to_string()),
                    city: Some("San Jose".to_string()),
                    region: Some("CA".to_string()),
                    postal_code: Some("95131".to_string()),
                    country: None,
                }),
            },
        };

        let body = build(&request);
        let card = &body["payment_source"]["card"];
        assert_eq!(card["expiry"], "2026-01");
        assert_eq!(card["billing_address"]["admin_area_2"], "San Jose");
        // Omitted country falls back to the default
        assert_eq!(card["billing_address"]["country_code"], "US");
        assert!(body["payment_source"].get("paypal").is_none());
    }

    #[test]
    fn test_vaulted_token_payload_shape() {
        let mut request = hosted_request();
        request.payment_source = PaymentSource::VaultedToken {
            vault_id: "8kk8451t".to_string(),
        };

        let body = build(&request);
        assert_eq!(body["payment_source"]["token"]["id"], "8kk8451t");
        assert_eq!(body["payment_source"]["token"]["type"], "PAYMENT_METHOD_TOKEN");
    }

    #[test]
    fn test_extract_approval_url() {
        let links = vec![
            LinkResponse {
                rel: "self".to_string(),
                href: "https://api-m.sandbox.paypal.com/v2/checkout/orders/5O1".to_string(),
                method: Some("GET".to_string()),
            },
            LinkResponse {
                rel: "approve".to_string(),
                href: "https://www.sandbox.paypal.com/checkoutnow?token=5O1".to_string(),
                method: Some("GET".to_string()),
            },
        ];

        assert_eq!(
            extract_approval_url(&links).unwrap(),
            "https://www.sandbox.paypal.com/checkoutnow?token=5O1"
        );
        assert!(extract_approval_url(&links[..1]).is_none());
    }

    #[test]
    fn test_normalize_capture_with_fees() {
        let body = r#"{
            "id": "3C679366HH",
            "status": "COMPLETED",
            "amount": {"currency_code": "USD", "value": "6.45"},
            "seller_receivable_breakdown": {
                "paypal_fee": {"currency_code": "USD", "value": "0.53"},
                "net_amount": {"currency_code": "USD", "value": "5.92"}
            }
        }"#;
        let record: CaptureRecordResponse = serde_json::from_str(body).unwrap();
        let payer = PayerResponse {
            email_address: Some("payer@example.com".to_string()),
            payer_id: Some("QYR5Z8XDVJNXQ".to_string()),
            name: Some(PayerNameResponse {
                given_name: Some("Jo".to_string()),
                surname: Some("Tester".to_string()),
            }),
        };

        let result = normalize_capture(&record, Some("5O190127TN"), Some(&payer)).unwrap();
        assert_eq!(result.capture_id, "3C679366HH");
        assert_eq!(result.order_id.as_deref(), Some("5O190127TN"));
        assert_eq!(result.status, CaptureStatus::Completed);
        assert_eq!(result.amount.unwrap().to_value_string(), "6.45");
        let fee = result.fee.unwrap();
        assert_eq!(fee.provider_fee.to_value_string(), "0.53");
        assert_eq!(fee.net_amount.to_value_string(), "5.92");
        assert_eq!(result.payer.unwrap().email.as_deref(), Some("payer@example.com"));
    }

    #[test]
    fn test_provider_rejection_classification() {
        let body = r#"{"name": "RESOURCE_NOT_FOUND", "message": "The specified resource does not exist.", "debug_id": "b6b9a374802ea"}"#;
        let (message, preserved) =
            provider_rejection(reqwest::StatusCode::NOT_FOUND, body);
        assert!(message.contains("RESOURCE_NOT_FOUND"));
        assert_eq!(preserved.unwrap()["name"], "RESOURCE_NOT_FOUND");

        let (message, preserved) =
            provider_rejection(reqwest::StatusCode::BAD_GATEWAY, "upstream choked");
        assert!(message.contains("502"));
        assert!(preserved.is_none());
    }
}
