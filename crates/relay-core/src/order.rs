//! # Order Types
//!
//! Order lifecycle types for order-relay: the caller-facing `OrderRequest`,
//! its validated/recomputed form, and the normalized provider results.

use crate::error::{GatewayError, GatewayResult};
use crate::money::{Amount, Currency};
use serde::{Deserialize, Serialize};

/// A line item in an order request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Item name (shown on the provider's review page)
    pub name: String,

    /// Unit price as a decimal string (e.g., "1.50")
    pub unit_amount: String,

    /// Quantity
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional SKU
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

/// Billing address for the direct card flow.
///
/// Every field is optional; absent fields are defaulted when the payload is
/// shaped (country defaults to "US", other fields are omitted).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Card details for the direct card flow
#[derive(Clone, Serialize, Deserialize)]
pub struct CardDetails {
    /// Card number (PAN)
    pub number: String,

    /// Expiry as `MM/YY` (also accepts `M/YY` and `MM/YYYY`)
    pub expiry: String,

    /// CVC / CVV
    pub security_code: String,

    /// Cardholder name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Billing address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<BillingAddress>,
}

// PAN and CVC never reach logs.
impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &"[redacted]")
            .field("expiry", &self.expiry)
            .field("security_code", &"[redacted]")
            .field("name", &self.name)
            .finish()
    }
}

impl CardDetails {
    /// Normalize the caller's expiry to the provider's `YYYY-MM` form.
    ///
    /// `"07/25"` → `"2025-07"`, `"1/26"` → `"2026-01"`. Two-digit years are
    /// expanded by prefixing `20`; four-digit years pass through.
    pub fn normalized_expiry(&self) -> GatewayResult<String> {
        let invalid = || {
            GatewayError::InvalidRequest(format!("Invalid card expiry: {:?}", self.expiry))
        };

        let (month, year) = self.expiry.trim().split_once('/').ok_or_else(invalid)?;
        let month: u32 = month.trim().parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        let year = year.trim();
        let year = match year.len() {
            2 if year.bytes().all(|b| b.is_ascii_digit()) => format!("20{}", year),
            4 if year.bytes().all(|b| b.is_ascii_digit()) => year.to_string(),
            _ => return Err(invalid()),
        };

        Ok(format!("{}-{:02}", year, month))
    }
}

/// Payment-source selector: which of the three creation flows the caller wants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PaymentSource {
    /// Hosted redirect flow: returns an approval URL the caller must
    /// redirect the end user to.
    Paypal,
    /// Direct card flow: creation and capture are fused into one operation.
    Card {
        #[serde(flatten)]
        card: CardDetails,
    },
    /// Vaulted-token flow: reuse a previously stored payment instrument.
    VaultedToken { vault_id: String },
}

impl Default for PaymentSource {
    fn default() -> Self {
        PaymentSource::Paypal
    }
}

/// An order creation request as callers supply it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Total amount as a decimal string. Required when `items` is empty;
    /// when items are present the recomputed item total is authoritative
    /// and a disagreeing amount is rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,

    /// 3-letter ISO currency code (falls back to the configured default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Order description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Line items (optional)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OrderItem>,

    /// Breakdown extras, each a decimal string, each only sent when non-zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handling: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_discount: Option<String>,

    /// Payment source (defaults to the hosted redirect flow)
    #[serde(default)]
    pub payment_source: PaymentSource,

    /// Customer email (optional, for prefill)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

/// A resolved line item with its amount parsed
#[derive(Debug, Clone)]
pub struct ResolvedItem {
    pub name: String,
    pub unit_amount: Amount,
    pub quantity: u32,
    pub description: Option<String>,
    pub sku: Option<String>,
}

/// A validated order with the authoritative total computed
#[derive(Debug, Clone)]
pub struct ResolvedOrder {
    pub currency: Currency,
    /// The authoritative order total
    pub total: Amount,
    /// Sum of `unit_amount × quantity` when items were supplied, or the
    /// amount net of extras when an itemless request carried extras (the
    /// provider requires the breakdown to sum to the total)
    pub item_total: Option<Amount>,
    pub items: Vec<ResolvedItem>,
    // Extras normalized: Some only when non-zero
    pub tax: Option<Amount>,
    pub handling: Option<Amount>,
    pub insurance: Option<Amount>,
    pub discount: Option<Amount>,
    pub shipping_discount: Option<Amount>,
}

impl ResolvedOrder {
    /// Whether the payload needs an amount breakdown block
    pub fn has_breakdown(&self) -> bool {
        self.item_total.is_some()
            || self.tax.is_some()
            || self.handling.is_some()
            || self.insurance.is_some()
            || self.discount.is_some()
            || self.shipping_discount.is_some()
    }
}

impl OrderRequest {
    /// Validate the request and compute the authoritative total.
    ///
    /// With items present the total is recomputed as
    /// `Σ unit × qty + tax + handling + insurance − discount − shipping_discount`
    /// and any caller-supplied amount must agree. Without items the caller's
    /// amount is required and must be a positive decimal.
    pub fn resolve(&self, default_currency: &Currency) -> GatewayResult<ResolvedOrder> {
        let currency = match &self.currency {
            Some(code) => Currency::parse(code)?,
            None => default_currency.clone(),
        };

        let parse_extra = |label: &str, value: &Option<String>| -> GatewayResult<Option<Amount>> {
            let Some(value) = value else { return Ok(None) };
            let amount = Amount::parse(value, currency.clone())
                .map_err(|_| GatewayError::InvalidRequest(format!("Invalid {}: {:?}", label, value)))?;
            if amount.minor < 0 {
                return Err(GatewayError::InvalidRequest(format!(
                    "{} must not be negative: {:?}",
                    label, value
                )));
            }
            // Zero-valued extras are dropped so they never reach the payload
            Ok(Some(amount).filter(|a| a.minor != 0))
        };

        let tax = parse_extra("tax", &self.tax)?;
        let handling = parse_extra("handling", &self.handling)?;
        let insurance = parse_extra("insurance", &self.insurance)?;
        let discount = parse_extra("discount", &self.discount)?;
        let shipping_discount = parse_extra("shipping_discount", &self.shipping_discount)?;

        let mut items = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if item.quantity == 0 {
                return Err(GatewayError::InvalidRequest(format!(
                    "Item {:?} has zero quantity",
                    item.name
                )));
            }
            let unit_amount = Amount::parse(&item.unit_amount, currency.clone())?;
            if !unit_amount.is_positive() {
                return Err(GatewayError::InvalidRequest(format!(
                    "Item {:?} unit amount must be positive",
                    item.name
                )));
            }
            items.push(ResolvedItem {
                name: item.name.clone(),
                unit_amount,
                quantity: item.quantity,
                description: item.description.clone(),
                sku: item.sku.clone(),
            });
        }

        let (total, item_total) = if items.is_empty() {
            let amount = self.amount.as_deref().ok_or_else(|| {
                GatewayError::InvalidRequest("Order amount is required".to_string())
            })?;
            let total = Amount::parse(amount, currency.clone())?;

            // Extras without items still need a breakdown that sums to the
            // total, so the item total is derived as the amount net of them.
            let has_extras = [&tax, &handling, &insurance, &discount, &shipping_discount]
                .iter()
                .any(|e| e.is_some());
            let item_total = if has_extras {
                let mut derived = total.clone();
                for extra in [&tax, &handling, &insurance] {
                    if let Some(extra) = extra {
                        derived = derived.checked_sub(extra)?;
                    }
                }
                for extra in [&discount, &shipping_discount] {
                    if let Some(extra) = extra {
                        derived = derived.checked_add(extra)?;
                    }
                }
                if !derived.is_positive() {
                    return Err(GatewayError::InvalidRequest(format!(
                        "Breakdown extras leave no item total: amount {} minus extras is {}",
                        total.to_value_string(),
                        derived.to_value_string()
                    )));
                }
                Some(derived)
            } else {
                None
            };

            (total, item_total)
        } else {
            let mut item_total = Amount::zero(currency.clone());
            for item in &items {
                item_total = item_total.checked_add(&item.unit_amount.checked_mul(item.quantity)?)?;
            }

            let mut total = item_total.clone();
            for extra in [&tax, &handling, &insurance] {
                if let Some(extra) = extra {
                    total = total.checked_add(extra)?;
                }
            }
            for extra in [&discount, &shipping_discount] {
                if let Some(extra) = extra {
                    total = total.checked_sub(extra)?;
                }
            }

            // The recomputed total is authoritative; a disagreeing
            // caller-supplied amount is a caller bug, not something to
            // silently overwrite.
            if let Some(claimed) = &self.amount {
                let claimed = Amount::parse(claimed, currency.clone())?;
                if claimed != total {
                    return Err(GatewayError::InvalidRequest(format!(
                        "Supplied amount {} does not match computed item total {}",
                        claimed.to_value_string(),
                        total.to_value_string()
                    )));
                }
            }

            (total, Some(item_total))
        };

        if !total.is_positive() {
            return Err(GatewayError::InvalidRequest(format!(
                "Order amount must be positive, got {}",
                total.to_value_string()
            )));
        }

        Ok(ResolvedOrder {
            currency,
            total,
            item_total,
            items,
            tax,
            handling,
            insurance,
            discount,
            shipping_discount,
        })
    }
}

/// Provider order status. Unknown values pass through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    Created,
    Saved,
    Approved,
    PayerActionRequired,
    Completed,
    Voided,
    Other(String),
}

impl OrderStatus {
    pub fn from_provider(s: &str) -> Self {
        match s {
            "CREATED" => OrderStatus::Created,
            "SAVED" => OrderStatus::Saved,
            "APPROVED" => OrderStatus::Approved,
            "PAYER_ACTION_REQUIRED" => OrderStatus::PayerActionRequired,
            "COMPLETED" => OrderStatus::Completed,
            "VOIDED" => OrderStatus::Voided,
            other => OrderStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Saved => "SAVED",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::PayerActionRequired => "PAYER_ACTION_REQUIRED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Voided => "VOIDED",
            OrderStatus::Other(s) => s,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(OrderStatus::from_provider(&s))
    }
}

/// Capture (and refund) status. Unknown values pass through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStatus {
    Completed,
    Declined,
    Pending,
    Voided,
    Refunded,
    PartiallyRefunded,
    Other(String),
}

impl CaptureStatus {
    pub fn from_provider(s: &str) -> Self {
        match s {
            "COMPLETED" => CaptureStatus::Completed,
            "DECLINED" => CaptureStatus::Declined,
            "PENDING" => CaptureStatus::Pending,
            "VOIDED" => CaptureStatus::Voided,
            "REFUNDED" => CaptureStatus::Refunded,
            "PARTIALLY_REFUNDED" => CaptureStatus::PartiallyRefunded,
            other => CaptureStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CaptureStatus::Completed => "COMPLETED",
            CaptureStatus::Declined => "DECLINED",
            CaptureStatus::Pending => "PENDING",
            CaptureStatus::Voided => "VOIDED",
            CaptureStatus::Refunded => "REFUNDED",
            CaptureStatus::PartiallyRefunded => "PARTIALLY_REFUNDED",
            CaptureStatus::Other(s) => s,
        }
    }

    /// A capture is final once completed, declined, or voided
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CaptureStatus::Completed | CaptureStatus::Declined | CaptureStatus::Voided
        )
    }
}

impl std::fmt::Display for CaptureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for CaptureStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CaptureStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(CaptureStatus::from_provider(&s))
    }
}

/// A hypermedia link from the provider's response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLink {
    pub rel: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// A created order as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Provider-assigned order id
    pub id: String,

    /// Order status
    pub status: OrderStatus,

    /// Redirect target for the hosted flow (the `approve` link)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_url: Option<String>,

    /// All links the provider returned
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<OrderLink>,
}

/// Payer identity extracted from a capture response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayerIdentity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_id: Option<String>,
}

/// Fee breakdown from a completed capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Fee retained by the provider
    pub provider_fee: Amount,
    /// Amount credited after fees
    pub net_amount: Amount,
}

/// Normalized result of a capture call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureResult {
    /// Provider capture id
    pub capture_id: String,

    /// Parent order id (absent for authorization captures)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Capture status
    pub status: CaptureStatus,

    /// Captured amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,

    /// Fee breakdown, when the provider reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<FeeBreakdown>,

    /// Payer identity, when the provider reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<PayerIdentity>,
}

/// Normalized result of a refund call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundResult {
    /// Provider refund id
    pub refund_id: String,

    /// Refund status
    pub status: CaptureStatus,

    /// Refunded amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
}

/// Optional pass-through fields for an order capture
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_to_payer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_capture: Option<bool>,
}

/// Refund parameters. An omitted amount refunds the full capture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefundOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_to_payer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(expiry: &str) -> CardDetails {
        CardDetails {
            number: "4111111111111111".to_string(),
            expiry: expiry.to_string(),
            security_code: "123".to_string(),
            name: Some("Jo Tester".to_string()),
            billing_address: None,
        }
    }

    #[test]
    fn test_expiry_normalization() {
        assert_eq!(card("07/25").normalized_expiry().unwrap(), "2025-07");
        assert_eq!(card("1/26").normalized_expiry().unwrap(), "2026-01");
        assert_eq!(card("12/2030").normalized_expiry().unwrap(), "2030-12");
        assert!(card("13/25").normalized_expiry().is_err());
        assert!(card("0725").normalized_expiry().is_err());
        assert!(card("07/2k5").normalized_expiry().is_err());
    }

    #[test]
    fn test_card_debug_redacts_pan() {
        let debug = format!("{:?}", card("07/25"));
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("123"));
    }

    #[test]
    fn test_item_total_recomputation() {
        let request = OrderRequest {
            items: vec![
                OrderItem {
                    name: "Widget".to_string(),
                    unit_amount: "1.50".to_string(),
                    quantity: 2,
                    description: None,
                    sku: None,
                },
                OrderItem {
                    name: "Gadget".to_string(),
                    unit_amount: "3.00".to_string(),
                    quantity: 1,
                    description: None,
                    sku: None,
                },
            ],
            tax: Some("0.45".to_string()),
            ..Default::default()
        };

        let resolved = request.resolve(&Currency::usd()).unwrap();
        assert_eq!(resolved.total.to_value_string(), "6.45");
        assert_eq!(resolved.item_total.as_ref().unwrap().to_value_string(), "6.00");
        assert!(resolved.has_breakdown());
    }

    #[test]
    fn test_amount_mismatch_rejected() {
        let request = OrderRequest {
            amount: Some("5.00".to_string()),
            items: vec![OrderItem {
                name: "Widget".to_string(),
                unit_amount: "3.00".to_string(),
                quantity: 2,
                description: None,
                sku: None,
            }],
            ..Default::default()
        };

        let err = request.resolve(&Currency::usd()).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
    }

    #[test]
    fn test_matching_amount_accepted() {
        let request = OrderRequest {
            amount: Some("6.00".to_string()),
            items: vec![OrderItem {
                name: "Widget".to_string(),
                unit_amount: "3.00".to_string(),
                quantity: 2,
                description: None,
                sku: None,
            }],
            ..Default::default()
        };

        let resolved = request.resolve(&Currency::usd()).unwrap();
        assert_eq!(resolved.total.to_value_string(), "6.00");
    }

    #[test]
    fn test_amount_required_without_items() {
        let request = OrderRequest::default();
        assert!(request.resolve(&Currency::usd()).is_err());

        let request = OrderRequest {
            amount: Some("0.00".to_string()),
            ..Default::default()
        };
        assert!(request.resolve(&Currency::usd()).is_err());

        let request = OrderRequest {
            amount: Some("10.00".to_string()),
            ..Default::default()
        };
        let resolved = request.resolve(&Currency::usd()).unwrap();
        assert_eq!(resolved.total.to_value_string(), "10.00");
        assert!(!resolved.has_breakdown());
    }

    #[test]
    fn test_itemless_extras_derive_item_total() {
        let request = OrderRequest {
            amount: Some("10.00".to_string()),
            tax: Some("0.45".to_string()),
            ..Default::default()
        };
        let resolved = request.resolve(&Currency::usd()).unwrap();
        assert_eq!(resolved.total.to_value_string(), "10.00");
        // Derived so the breakdown sums back to the amount
        assert_eq!(resolved.item_total.unwrap().to_value_string(), "9.55");

        // A discount adds back into the derived item total
        let request = OrderRequest {
            amount: Some("10.00".to_string()),
            tax: Some("0.45".to_string()),
            discount: Some("1.00".to_string()),
            ..Default::default()
        };
        let resolved = request.resolve(&Currency::usd()).unwrap();
        assert_eq!(resolved.item_total.unwrap().to_value_string(), "10.55");
    }

    #[test]
    fn test_itemless_extras_exceeding_amount_rejected() {
        let request = OrderRequest {
            amount: Some("1.00".to_string()),
            tax: Some("1.00".to_string()),
            ..Default::default()
        };
        let err = request.resolve(&Currency::usd()).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
    }

    #[test]
    fn test_zero_extras_dropped() {
        let request = OrderRequest {
            amount: Some("10.00".to_string()),
            tax: Some("0.00".to_string()),
            ..Default::default()
        };
        let resolved = request.resolve(&Currency::usd()).unwrap();
        assert!(resolved.tax.is_none());
        assert!(!resolved.has_breakdown());
    }

    #[test]
    fn test_discount_subtracted() {
        let request = OrderRequest {
            items: vec![OrderItem {
                name: "Widget".to_string(),
                unit_amount: "10.00".to_string(),
                quantity: 1,
                description: None,
                sku: None,
            }],
            discount: Some("2.50".to_string()),
            ..Default::default()
        };
        let resolved = request.resolve(&Currency::usd()).unwrap();
        assert_eq!(resolved.total.to_value_string(), "7.50");
    }

    #[test]
    fn test_status_passthrough() {
        assert_eq!(OrderStatus::from_provider("CREATED"), OrderStatus::Created);
        let status = OrderStatus::from_provider("PENDING_REVIEW");
        assert_eq!(status, OrderStatus::Other("PENDING_REVIEW".to_string()));
        assert_eq!(status.as_str(), "PENDING_REVIEW");
    }

    #[test]
    fn test_capture_status_terminal() {
        assert!(CaptureStatus::Completed.is_terminal());
        assert!(CaptureStatus::Declined.is_terminal());
        assert!(CaptureStatus::Voided.is_terminal());
        assert!(!CaptureStatus::Pending.is_terminal());
        assert!(!CaptureStatus::Other("IN_REVIEW".to_string()).is_terminal());
    }

    #[test]
    fn test_payment_source_deserialization() {
        let source: PaymentSource =
            serde_json::from_str(r#"{"type": "vaulted-token", "vault_id": "8kk8451t"}"#).unwrap();
        assert!(matches!(source, PaymentSource::VaultedToken { ref vault_id } if vault_id == "8kk8451t"));

        let source: PaymentSource = serde_json::from_str(
            r#"{"type": "card", "number": "4111111111111111", "expiry": "07/25", "security_code": "123"}"#,
        )
        .unwrap();
        assert!(matches!(source, PaymentSource::Card { .. }));
    }
}
