//! The Mollie node: descriptor, form fields and credential references.
//!
//! Field metadata mirrors the hosted connector UI; visibility rules on
//! `resource`/`operation`/`authentication` disambiguate same-named
//! fields across operations.

use std::collections::HashMap;

use serde_json::json;

use crate::{
    model::{
        Connector, CredentialRef, DisplayRules, NodeDescriptor, NodeProperty, PropertyGroup, PropertyKind, PropertyOption, RequestDefaults,
        TypeOptions,
    },
    mollie::{credentials, operations, options},
};

/// The fully wired connector: descriptor, routing catalog and the two
/// credential schemas.
pub fn connector() -> Connector {
    Connector {
        descriptor: node_descriptor(),
        catalog: operations::catalog(),
        credentials: vec![credentials::api_key_schema(), credentials::oauth2_schema()],
    }
}

pub fn node_descriptor() -> NodeDescriptor {
    let mut properties = vec![authentication_selector(), resource_selector()];
    properties.extend(operation_selectors());
    properties.extend(balance_fields());
    properties.extend(payment_create_fields());
    properties.extend(capture_fields());
    properties.extend(refund_fields());
    properties.push(payment_get_field());
    properties.extend(payment_list_fields());
    properties.extend(payment_link_fields());

    NodeDescriptor {
        name: "mollie".to_string(),
        display_name: "Mollie".to_string(),
        description: "Interact with Mollie payment API".to_string(),
        version: 1,
        request_defaults: RequestDefaults {
            base_url: "https://api.mollie.com".to_string(),
            headers: HashMap::from([("Accept".to_string(), "application/json".to_string())]),
        },
        credentials: vec![credential_ref("mollieApi", "apiKey"), credential_ref("mollieOAuth2Api", "oAuth2")],
        properties,
    }
}

fn credential_ref(
    name: &str,
    authentication: &str,
) -> CredentialRef {
    CredentialRef {
        name: name.to_string(),
        required: true,
        display_rules: Some(DisplayRules {
            show: HashMap::from([("authentication".to_string(), vec![json!(authentication)])]),
        }),
    }
}

fn authentication_selector() -> NodeProperty {
    NodeProperty::new("authentication", "Authentication", PropertyKind::Options)
        .options(vec![PropertyOption::new("API Key", "apiKey"), PropertyOption::new("OAuth2", "oAuth2")])
        .default_value("apiKey")
        .describe("Authentication method to use")
}

fn resource_selector() -> NodeProperty {
    NodeProperty::new("resource", "Resource", PropertyKind::Options)
        .options(vec![
            PropertyOption::new("Balance", "balance"),
            PropertyOption::new("Payment", "payment"),
            PropertyOption::new("Payment Link", "paymentLink"),
        ])
        .default_value("payment")
}

/// One operation dropdown per resource, derived from the routing catalog
/// so form and catalog cannot drift apart.
fn operation_selectors() -> Vec<NodeProperty> {
    let catalog = operations::catalog();
    [("balance", "getTransactions"), ("payment", "getAll"), ("paymentLink", "create")]
        .into_iter()
        .map(|(resource, default)| {
            let choices = catalog
                .for_resource(resource)
                .into_iter()
                .map(|operation| PropertyOption::new(&operation.name, operation.value.as_str()).describe(&operation.description))
                .collect();
            NodeProperty::new("operation", "Operation", PropertyKind::Options)
                .options(choices)
                .default_value(default)
                .show("resource", &[resource])
        })
        .collect()
}

// Balance transaction fields

fn balance_fields() -> Vec<NodeProperty> {
    vec![
        // the balances dropdown needs an organization token
        NodeProperty::new("balanceId", "Balance", PropertyKind::Options)
            .required()
            .default_value("")
            .type_options(TypeOptions {
                load_options_method: Some("getBalances".to_string()),
                ..Default::default()
            })
            .describe("The balance to retrieve transactions for")
            .show("resource", &["balance"])
            .show("operation", &["getTransactions"])
            .show("authentication", &["oAuth2"]),
        NodeProperty::new("balanceId", "Balance ID", PropertyKind::String)
            .required()
            .default_value("")
            .placeholder("bal_gVMhHKqSSRYJyPsuoPNFH")
            .describe("The ID of the balance to retrieve transactions for. You can also use \"primary\" for your primary balance.")
            .show("resource", &["balance"])
            .show("operation", &["getTransactions"])
            .show("authentication", &["apiKey"]),
        NodeProperty::new("limit", "Limit", PropertyKind::Number)
            .required()
            .default_value(100)
            .type_options(TypeOptions {
                min_value: Some(1),
                max_value: Some(250),
                ..Default::default()
            })
            .describe("The maximum number of results to be worked with during one execution cycle")
            .show("resource", &["balance"])
            .show("operation", &["getTransactions"]),
        NodeProperty::new("from", "From", PropertyKind::String)
            .default_value("")
            .placeholder("baltr_QM24QwzUWR4ev4Xfgyt29A")
            .describe("Please enter a balance transaction ID to offset from")
            .show("resource", &["balance"])
            .show("operation", &["getTransactions"]),
    ]
}

// Payment create fields

fn payment_create_fields() -> Vec<NodeProperty> {
    vec![
        NodeProperty::new("amount", "Amount", PropertyKind::Number)
            .required()
            .default_value(0)
            .type_options(TypeOptions {
                min_value: Some(0),
                ..Default::default()
            })
            .describe("The amount in the selected currency")
            .show("resource", &["payment"])
            .show("operation", &["create"]),
        NodeProperty::new("currency", "Currency", PropertyKind::Options)
            .required()
            .default_value("EUR")
            .options(options::to_options(options::CURRENCIES))
            .describe("The currency for the payment")
            .show("resource", &["payment"])
            .show("operation", &["create"]),
        NodeProperty::new("description", "Description", PropertyKind::String)
            .required()
            .default_value("")
            .describe("A description of the payment")
            .show("resource", &["payment"])
            .show("operation", &["create"]),
        NodeProperty::new("redirectUrl", "Redirect URL", PropertyKind::String)
            .required()
            .default_value("")
            .describe("The URL to redirect to after payment")
            .show("resource", &["payment"])
            .show("operation", &["create"]),
        NodeProperty::new("profileId", "Profile", PropertyKind::Options)
            .required()
            .default_value("")
            .type_options(TypeOptions {
                load_options_method: Some("getProfiles".to_string()),
                ..Default::default()
            })
            .describe("The profile this payment belongs to (required for OAuth2)")
            .show("resource", &["payment"])
            .show("operation", &["create"])
            .show("authentication", &["oAuth2"]),
        NodeProperty::new("additionalFields", "Additional Fields", PropertyKind::Collection)
            .placeholder("Add Field")
            .default_value(json!({}))
            .items(vec![
                NodeProperty::new("webhookUrl", "Webhook URL", PropertyKind::String)
                    .default_value("")
                    .describe("Set the webhook URL, where you will receive payment status updates"),
                NodeProperty::new("captureMode", "Capture Mode", PropertyKind::Options)
                    .default_value("automatic")
                    .options(options::described_options(options::CAPTURE_MODES))
                    .describe("Whether to capture the payment automatically or manually. Manual mode requires later capture via the Create Capture operation."),
                NodeProperty::new("sequenceType", "Sequence Type", PropertyKind::Options)
                    .default_value("oneoff")
                    .options(options::to_options(options::SEQUENCE_TYPES))
                    .describe("Indicate which type of payment this is"),
                NodeProperty::new("locale", "Locale", PropertyKind::Options)
                    .default_value("")
                    .options(options::to_options(options::LOCALES))
                    .describe("Locale to use for the payment screen"),
                NodeProperty::new("method", "Method", PropertyKind::MultiOptions)
                    .default_value(json!([]))
                    .options(options::to_options(options::PAYMENT_METHODS))
                    .describe("Payment methods to use. Leave empty for all available methods."),
                NodeProperty::new("restrictPaymentMethodsToCountry", "Restrict Payment Methods To Country", PropertyKind::String)
                    .default_value("")
                    .placeholder("NL")
                    .describe("For digital goods, you must pass the customer's country. ISO 3166-1 alpha-2 country code."),
                NodeProperty::new("customerId", "Customer ID", PropertyKind::String)
                    .default_value("")
                    .describe("The ID of the customer for whom the payment is being created"),
                NodeProperty::new("mandateId", "Mandate ID", PropertyKind::String)
                    .default_value("")
                    .describe("When creating recurring payments, the ID of a specific mandate may be supplied"),
                NodeProperty::new("metadata", "Metadata", PropertyKind::String)
                    .default_value("")
                    .placeholder("{\"order_id\": \"12345\"}")
                    .describe("Provide any data you like in JSON format. You can use up to approximately 1kB."),
            ])
            .show("resource", &["payment"])
            .show("operation", &["create"]),
    ]
}

// Payment capture fields

fn capture_fields() -> Vec<NodeProperty> {
    vec![
        NodeProperty::new("paymentId", "Payment", PropertyKind::Options)
            .required()
            .default_value("")
            .type_options(TypeOptions {
                load_options_method: Some("getPayments".to_string()),
                ..Default::default()
            })
            .describe("The payment to capture. Note: Only works for payments created with captureMode: manual and status: authorized.")
            .show("resource", &["payment"])
            .show("operation", &["createCapture"]),
        NodeProperty::new("amount", "Amount", PropertyKind::Number)
            .default_value(0)
            .type_options(TypeOptions {
                min_value: Some(0),
                ..Default::default()
            })
            .describe("The amount to capture (optional - if not specified, the full authorized amount will be captured)")
            .show("resource", &["payment"])
            .show("operation", &["createCapture"]),
        NodeProperty::new("currency", "Currency", PropertyKind::Options)
            .default_value("EUR")
            .options(options::to_options(options::CURRENCIES))
            .describe("The currency for the capture (required when amount is specified)")
            .show("resource", &["payment"])
            .show("operation", &["createCapture"]),
        NodeProperty::new("description", "Description", PropertyKind::String)
            .default_value("")
            .describe("The description of the capture")
            .show("resource", &["payment"])
            .show("operation", &["createCapture"]),
        NodeProperty::new("metadata", "Metadata", PropertyKind::String)
            .default_value("")
            .placeholder("{\"capture_id\": \"12345\"}")
            .describe("Provide any data you like in JSON format")
            .show("resource", &["payment"])
            .show("operation", &["createCapture"]),
    ]
}

// Payment refund fields

fn refund_fields() -> Vec<NodeProperty> {
    vec![
        NodeProperty::new("paymentId", "Payment", PropertyKind::Options)
            .required()
            .default_value("")
            .type_options(TypeOptions {
                load_options_method: Some("getPayments".to_string()),
                ..Default::default()
            })
            .describe("The payment to refund")
            .show("resource", &["payment"])
            .show("operation", &["createRefund"]),
        NodeProperty::new("amount", "Amount", PropertyKind::Number)
            .required()
            .default_value(0)
            .type_options(TypeOptions {
                min_value: Some(0),
                ..Default::default()
            })
            .describe("The amount to refund")
            .show("resource", &["payment"])
            .show("operation", &["createRefund"]),
        NodeProperty::new("currency", "Currency", PropertyKind::Options)
            .required()
            .default_value("EUR")
            .options(options::to_options(options::CURRENCIES))
            .describe("The currency for the refund")
            .show("resource", &["payment"])
            .show("operation", &["createRefund"]),
        NodeProperty::new("description", "Description", PropertyKind::String)
            .default_value("")
            .describe("The description of the refund")
            .show("resource", &["payment"])
            .show("operation", &["createRefund"]),
        NodeProperty::new("additionalFields", "Additional Fields", PropertyKind::Collection)
            .placeholder("Add Field")
            .default_value(json!({}))
            .items(vec![
                NodeProperty::new("reverseRouting", "Reverse Routing", PropertyKind::Boolean)
                    .default_value(false)
                    .describe("Whether to reverse the routing. When creating partial refunds for split payments, you should instead use the Routing Reversals to set the amount that you want to pull back from the single routes."),
                NodeProperty::new("routingReversals", "Routing Reversals", PropertyKind::FixedCollection)
                    .default_value(json!({}))
                    .type_options(TypeOptions {
                        multiple_values: Some(true),
                        ..Default::default()
                    })
                    .groups(vec![PropertyGroup::new(
                        "reversalValues",
                        "Reversal",
                        vec![
                            NodeProperty::new("amountValue", "Amount Value", PropertyKind::Number)
                                .default_value(0)
                                .type_options(TypeOptions {
                                    min_value: Some(0),
                                    ..Default::default()
                                })
                                .describe("The amount value to reverse"),
                            NodeProperty::new("amountCurrency", "Amount Currency", PropertyKind::Options)
                                .default_value("EUR")
                                .options(options::to_options(options::REVERSAL_CURRENCIES))
                                .describe("The currency of the amount"),
                            NodeProperty::new("sourceType", "Source Type", PropertyKind::String)
                                .default_value("organization")
                                .describe("The type of source. Currently only \"organization\" is supported."),
                            NodeProperty::new("organizationId", "Organization ID", PropertyKind::String)
                                .default_value("")
                                .describe("The ID of the organization"),
                        ],
                    )])
                    .describe("Array of routing reversals for split payment refunds"),
                NodeProperty::new("metadata", "Metadata", PropertyKind::String)
                    .default_value("")
                    .placeholder("{\"bookkeeping_id\": \"12345\"}")
                    .describe("Provide any data you like in JSON format. You can use up to approximately 1kB."),
            ])
            .show("resource", &["payment"])
            .show("operation", &["createRefund"]),
    ]
}

// Payment get fields

fn payment_get_field() -> NodeProperty {
    NodeProperty::new("paymentId", "Payment", PropertyKind::Options)
        .required()
        .default_value("")
        .type_options(TypeOptions {
            load_options_method: Some("getPayments".to_string()),
            ..Default::default()
        })
        .describe("The payment to retrieve")
        .show("resource", &["payment"])
        .show("operation", &["get"])
}

// Payment list fields

fn payment_list_fields() -> Vec<NodeProperty> {
    vec![
        NodeProperty::new("returnAll", "Return All", PropertyKind::Boolean)
            .default_value(false)
            .describe("Whether to return all results or only up to a given limit")
            .show("resource", &["payment"])
            .show("operation", &["getAll"]),
        NodeProperty::new("limit", "Limit", PropertyKind::Number)
            .default_value(100)
            .type_options(TypeOptions {
                min_value: Some(1),
                max_value: Some(250),
                ..Default::default()
            })
            .describe("Max number of results to return")
            .show("resource", &["payment"])
            .show("operation", &["getAll"])
            .show("returnAll", &[false]),
        NodeProperty::new("filters", "Filters", PropertyKind::Collection)
            .placeholder("Add Filter")
            .default_value(json!({}))
            .items(vec![
                NodeProperty::new("status", "Status", PropertyKind::Options)
                    .default_value("")
                    .options(options::to_options(options::PAYMENT_STATUSES))
                    .describe("Filter payments by status"),
            ])
            .show("resource", &["payment"])
            .show("operation", &["getAll"]),
    ]
}

// Payment link fields

fn payment_link_fields() -> Vec<NodeProperty> {
    vec![
        NodeProperty::new("description", "Description", PropertyKind::String)
            .required()
            .default_value("")
            .describe("A description of the payment link")
            .show("resource", &["paymentLink"])
            .show("operation", &["create"]),
        NodeProperty::new("amount", "Amount", PropertyKind::Number)
            .required()
            .default_value(0)
            .type_options(TypeOptions {
                min_value: Some(0),
                ..Default::default()
            })
            .describe("The amount in the selected currency")
            .show("resource", &["paymentLink"])
            .show("operation", &["create"]),
        NodeProperty::new("currency", "Currency", PropertyKind::Options)
            .required()
            .default_value("EUR")
            .options(options::to_options(options::CURRENCIES))
            .describe("The currency for the payment")
            .show("resource", &["paymentLink"])
            .show("operation", &["create"]),
        NodeProperty::new("profileId", "Profile", PropertyKind::Options)
            .required()
            .default_value("")
            .type_options(TypeOptions {
                load_options_method: Some("getProfiles".to_string()),
                ..Default::default()
            })
            .describe("The profile this payment link belongs to (required for OAuth2)")
            .show("resource", &["paymentLink"])
            .show("operation", &["create"])
            .show("authentication", &["oAuth2"]),
        NodeProperty::new("redirectUrl", "Redirect URL", PropertyKind::String)
            .default_value("")
            .describe("The URL to redirect to after payment")
            .show("resource", &["paymentLink"])
            .show("operation", &["create"]),
        NodeProperty::new("webhookUrl", "Webhook URL", PropertyKind::String)
            .default_value("")
            .describe("The webhookUrl is optional, but without a webhook you will miss out on important status changes about your payment link")
            .show("resource", &["paymentLink"])
            .show("operation", &["create"]),
        NodeProperty::new("expiresAt", "Expires At", PropertyKind::DateTime)
            .default_value("")
            .describe("The date and time when the payment link expires")
            .show("resource", &["paymentLink"])
            .show("operation", &["create"]),
    ]
}
