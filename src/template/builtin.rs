//! Built-in WhatsApp message templates

use super::types::Template;

pub const ORDER_CREATED: &str = "ORDER_CREATED";
pub const ORDER_PAID: &str = "ORDER_PAID";
pub const ORDER_CANCELLED: &str = "ORDER_CANCELLED";
pub const ORDER_FULFILLED: &str = "ORDER_FULFILLED";
pub const FULFILLMENT_CREATED: &str = "FULFILLMENT_CREATED";
pub const FULFILLMENT_UPDATED: &str = "FULFILLMENT_UPDATED";
pub const ABANDONED_CHECKOUT: &str = "ABANDONED_CHECKOUT";

pub fn builtin_templates() -> Vec<Template> {
    vec![
        Template::new(
            ORDER_CREATED,
            "Hi {{customerName}}!
             Thank you for your order #{{orderNumber}}{{#storeName}} at {{storeName}}{{/storeName}}.
             Order total: {{currency}} {{totalPrice}}
             {{#orderStatusUrl}}View your order: {{orderStatusUrl}}{{/orderStatusUrl}}",
        )
        .required(&["customerName", "orderNumber", "totalPrice", "currency"])
        .optional(&["storeName", "orderStatusUrl"])
        .description("Order confirmation sent on orders/create"),
        Template::new(
            ORDER_PAID,
            "Hi {{customerName}}, we received your payment of {{currency}} {{totalPrice}}
             for order #{{orderNumber}}. We'll let you know when it ships.",
        )
        .required(&["customerName", "orderNumber", "totalPrice", "currency"])
        .description("Payment confirmation sent on orders/paid"),
        Template::new(
            ORDER_CANCELLED,
            "Hi {{customerName}}, your order #{{orderNumber}} has been cancelled.
             {{#cancelReason}}Reason: {{cancelReason}}.{{/cancelReason}}
             Reply to this message if you have any questions.",
        )
        .required(&["customerName", "orderNumber"])
        .optional(&["cancelReason"])
        .description("Cancellation notice sent on orders/cancelled"),
        Template::new(
            ORDER_FULFILLED,
            "Good news {{customerName}}! Your order #{{orderNumber}} has shipped.
             {{#trackingCompany}}Carrier: {{trackingCompany}}{{/trackingCompany}}
             {{#trackingNumber}}Tracking number: {{trackingNumber}}{{/trackingNumber}}
             {{#trackingUrl}}Track it here: {{trackingUrl}}{{/trackingUrl}}",
        )
        .required(&["customerName", "orderNumber"])
        .optional(&["trackingCompany", "trackingNumber", "trackingUrl"])
        .description("Shipping notice sent on orders/fulfilled"),
        Template::new(
            FULFILLMENT_CREATED,
            "{{#customerName}}Hi {{customerName}}, {{/customerName}}a shipment for order {{orderNumber}} is on its way.
             {{#trackingCompany}}Carrier: {{trackingCompany}}{{/trackingCompany}}
             {{#trackingNumber}}Tracking number: {{trackingNumber}}{{/trackingNumber}}
             {{#trackingUrl}}Track it here: {{trackingUrl}}{{/trackingUrl}}",
        )
        .required(&["orderNumber"])
        .optional(&["customerName", "trackingCompany", "trackingNumber", "trackingUrl"])
        .description("Shipment notice sent on fulfillments/create"),
        Template::new(
            FULFILLMENT_UPDATED,
            "{{#customerName}}Hi {{customerName}}, {{/customerName}}update on your shipment for order {{orderNumber}}: {{shipmentStatus}}.
             {{#trackingUrl}}Track it here: {{trackingUrl}}{{/trackingUrl}}",
        )
        .required(&["orderNumber", "shipmentStatus"])
        .optional(&["customerName", "trackingUrl"])
        .description("Shipment status update sent on fulfillments/update"),
        Template::new(
            ABANDONED_CHECKOUT,
            "Hi {{customerName}}, you left something in your cart{{#storeName}} at {{storeName}}{{/storeName}}!
             {{#totalPrice}}Cart total: {{currency}} {{totalPrice}}{{/totalPrice}}
             Complete your purchase: {{checkoutUrl}}",
        )
        .required(&["customerName", "checkoutUrl"])
        .optional(&["storeName", "totalPrice", "currency"])
        .description("Cart reminder sent on checkouts/create and checkouts/update"),
    ]
}
