//! Shopify webhook topics and message data extraction.
//!
//! Each message-bearing topic maps to one built-in template. The extractor
//! flattens the webhook payload into the template's data record and picks
//! the customer's phone number as the WhatsApp recipient.

use std::fmt;

use serde_json::Value;

use crate::template::builtin::{
    ABANDONED_CHECKOUT, FULFILLMENT_CREATED, FULFILLMENT_UPDATED, ORDER_CANCELLED, ORDER_CREATED,
    ORDER_FULFILLED, ORDER_PAID,
};
use crate::template::DataRecord;

/// Webhook topics the relay understands
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShopifyTopic {
    OrdersCreate,
    OrdersPaid,
    OrdersCancelled,
    OrdersFulfilled,
    FulfillmentsCreate,
    FulfillmentsUpdate,
    CheckoutsCreate,
    CheckoutsUpdate,
    AppUninstalled,
    CustomersDataRequest,
    CustomersRedact,
    ShopRedact,
    /// Any other topic; relayed without a message
    Other(String),
}

impl ShopifyTopic {
    pub fn parse(topic: &str) -> Self {
        match topic {
            "orders/create" => Self::OrdersCreate,
            "orders/paid" => Self::OrdersPaid,
            "orders/cancelled" => Self::OrdersCancelled,
            "orders/fulfilled" => Self::OrdersFulfilled,
            "fulfillments/create" => Self::FulfillmentsCreate,
            "fulfillments/update" => Self::FulfillmentsUpdate,
            "checkouts/create" => Self::CheckoutsCreate,
            "checkouts/update" => Self::CheckoutsUpdate,
            "app/uninstalled" => Self::AppUninstalled,
            "customers/data_request" => Self::CustomersDataRequest,
            "customers/redact" => Self::CustomersRedact,
            "shop/redact" => Self::ShopRedact,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::OrdersCreate => "orders/create",
            Self::OrdersPaid => "orders/paid",
            Self::OrdersCancelled => "orders/cancelled",
            Self::OrdersFulfilled => "orders/fulfilled",
            Self::FulfillmentsCreate => "fulfillments/create",
            Self::FulfillmentsUpdate => "fulfillments/update",
            Self::CheckoutsCreate => "checkouts/create",
            Self::CheckoutsUpdate => "checkouts/update",
            Self::AppUninstalled => "app/uninstalled",
            Self::CustomersDataRequest => "customers/data_request",
            Self::CustomersRedact => "customers/redact",
            Self::ShopRedact => "shop/redact",
            Self::Other(topic) => topic,
        }
    }

    /// Template used to compose the customer message, if any
    pub fn template_key(&self) -> Option<&'static str> {
        match self {
            Self::OrdersCreate => Some(ORDER_CREATED),
            Self::OrdersPaid => Some(ORDER_PAID),
            Self::OrdersCancelled => Some(ORDER_CANCELLED),
            Self::OrdersFulfilled => Some(ORDER_FULFILLED),
            Self::FulfillmentsCreate => Some(FULFILLMENT_CREATED),
            Self::FulfillmentsUpdate => Some(FULFILLMENT_UPDATED),
            Self::CheckoutsCreate | Self::CheckoutsUpdate => Some(ABANDONED_CHECKOUT),
            _ => None,
        }
    }

    /// Mandatory GDPR topics
    pub fn is_compliance(&self) -> bool {
        matches!(
            self,
            Self::CustomersDataRequest | Self::CustomersRedact | Self::ShopRedact
        )
    }
}

impl fmt::Display for ShopifyTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to render and address one customer message
#[derive(Debug, Clone, PartialEq)]
pub struct MessageInput {
    pub template_key: &'static str,
    pub recipient: Option<String>,
    pub data: DataRecord,
}

/// Build the message input for a topic, or `None` for topics without a message.
pub fn extract_message_input(
    topic: &ShopifyTopic,
    shop: &str,
    payload: &Value,
) -> Option<MessageInput> {
    let template_key = topic.template_key()?;

    let (data, recipient) = match topic {
        ShopifyTopic::OrdersCreate | ShopifyTopic::OrdersPaid => {
            let mut data = order_fields(payload);
            put(&mut data, "storeName", Some(store_handle(shop).to_string()));
            put(&mut data, "orderStatusUrl", str_at(payload, "/order_status_url"));
            (data, order_phone(payload))
        }
        ShopifyTopic::OrdersCancelled => {
            let mut data = order_fields(payload);
            put(&mut data, "cancelReason", str_at(payload, "/cancel_reason"));
            (data, order_phone(payload))
        }
        ShopifyTopic::OrdersFulfilled => {
            let mut data = order_fields(payload);
            let latest = payload
                .get("fulfillments")
                .and_then(Value::as_array)
                .and_then(|f| f.last())
                .cloned()
                .unwrap_or(Value::Null);
            tracking_fields(&mut data, &latest);
            (data, order_phone(payload))
        }
        ShopifyTopic::FulfillmentsCreate | ShopifyTopic::FulfillmentsUpdate => {
            let mut data = DataRecord::new();
            put(&mut data, "orderNumber", fulfillment_order_number(payload));
            put(
                &mut data,
                "customerName",
                str_at(payload, "/destination/first_name"),
            );
            put(&mut data, "shipmentStatus", str_at(payload, "/shipment_status"));
            tracking_fields(&mut data, payload);
            (data, str_at(payload, "/destination/phone"))
        }
        ShopifyTopic::CheckoutsCreate | ShopifyTopic::CheckoutsUpdate => {
            let mut data = DataRecord::new();
            put(&mut data, "customerName", customer_name(payload));
            put(&mut data, "checkoutUrl", str_at(payload, "/abandoned_checkout_url"));
            put(&mut data, "totalPrice", str_at(payload, "/total_price"));
            put(&mut data, "currency", str_at(payload, "/currency"));
            put(&mut data, "storeName", Some(store_handle(shop).to_string()));
            let recipient = first_of(
                payload,
                &[
                    "/phone",
                    "/customer/phone",
                    "/billing_address/phone",
                    "/shipping_address/phone",
                ],
            );
            (data, recipient)
        }
        _ => return None,
    };

    Some(MessageInput {
        template_key,
        recipient,
        data,
    })
}

fn order_fields(payload: &Value) -> DataRecord {
    let mut data = DataRecord::new();
    put(&mut data, "customerName", customer_name(payload));
    put(&mut data, "orderNumber", order_number(payload));
    put(&mut data, "totalPrice", str_at(payload, "/total_price"));
    put(
        &mut data,
        "currency",
        first_of(payload, &["/currency", "/presentment_currency"]),
    );
    data
}

fn tracking_fields(data: &mut DataRecord, source: &Value) {
    put(data, "trackingCompany", str_at(source, "/tracking_company"));
    put(data, "trackingNumber", str_at(source, "/tracking_number"));
    put(data, "trackingUrl", str_at(source, "/tracking_url"));
}

fn customer_name(payload: &Value) -> Option<String> {
    first_of(
        payload,
        &[
            "/customer/first_name",
            "/billing_address/first_name",
            "/shipping_address/first_name",
        ],
    )
}

fn order_phone(payload: &Value) -> Option<String> {
    first_of(
        payload,
        &[
            "/customer/phone",
            "/shipping_address/phone",
            "/billing_address/phone",
            "/phone",
        ],
    )
}

/// `order_number`, falling back to the `#1001` style name.
fn order_number(payload: &Value) -> Option<String> {
    str_at(payload, "/order_number")
        .or_else(|| str_at(payload, "/name").map(|n| n.trim_start_matches('#').to_string()))
}

/// Fulfillment names look like `#1001.1`; the part before the dot is the order.
fn fulfillment_order_number(payload: &Value) -> Option<String> {
    let name = str_at(payload, "/name")?;
    let name = name.trim_start_matches('#');
    let order = name.split('.').next().unwrap_or(name);
    (!order.is_empty()).then(|| order.to_string())
}

/// `acme.myshopify.com` -> `acme`
fn store_handle(shop: &str) -> &str {
    shop.strip_suffix(".myshopify.com").unwrap_or(shop)
}

/// Scalar at a JSON pointer as a string; empty strings and non-scalars are absent.
fn str_at(value: &Value, pointer: &str) -> Option<String> {
    match value.pointer(pointer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_of(value: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|p| str_at(value, p))
}

/// Absent values are stored as null so their placeholders render empty.
fn put(data: &mut DataRecord, field: &str, value: Option<String>) {
    data.insert(
        field.to_string(),
        value.map(Value::String).unwrap_or(Value::Null),
    );
}
