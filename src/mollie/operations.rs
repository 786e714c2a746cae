//! The routing catalog: one data record per (resource, operation).
//!
//! Body templates use `{{$parameter.*}}` placeholders; a trailing `?`
//! drops the enclosing key when the value is unset and ` | money`
//! renders an amount with two decimals. Everything a template cannot
//! express lives in a pre-send hook.

use serde_json::json;

use crate::{
    model::{HttpMethod, Operation, OperationCatalog, OutputOptions, PostReceiveStep, RequestTemplate, Routing, SendOptions},
    mollie::hooks,
};

/// Every operation the node ships.
pub fn catalog() -> OperationCatalog {
    let mut catalog = OperationCatalog::new();
    for operation in [
        balance_get_transactions(),
        payment_create(),
        payment_create_capture(),
        payment_create_refund(),
        payment_get(),
        payment_get_all(),
        payment_link_create(),
    ] {
        catalog.insert(operation);
    }
    catalog
}

fn balance_get_transactions() -> Operation {
    Operation {
        resource: "balance".to_string(),
        value: "getTransactions".to_string(),
        name: "Get Many Transactions".to_string(),
        description: "Get many balance transactions".to_string(),
        action: "Get many balance transactions".to_string(),
        routing: Routing {
            request: RequestTemplate {
                method: HttpMethod::Get,
                url: "/v2/balances/{{$parameter.balanceId}}/transactions".to_string(),
                body: None,
            },
            send: SendOptions {
                paginate: true,
                pre_send: vec![hooks::shape_transaction_page, hooks::inject_test_mode],
            },
            output: OutputOptions {
                post_receive: vec![
                    PostReceiveStep::RootProperty("_embedded.balance_transactions".to_string()),
                    PostReceiveStep::ForEach(hooks::parse_created_at),
                ],
            },
        },
    }
}

fn payment_create() -> Operation {
    Operation {
        resource: "payment".to_string(),
        value: "create".to_string(),
        name: "Create".to_string(),
        description: "Create a payment".to_string(),
        action: "Create a payment".to_string(),
        routing: Routing {
            request: RequestTemplate {
                method: HttpMethod::Post,
                url: "/v2/payments".to_string(),
                body: Some(json!({
                    "amount": {
                        "value": "{{$parameter.amount | money}}",
                        "currency": "{{$parameter.currency}}",
                    },
                    "description": "{{$parameter.description}}",
                    "redirectUrl": "{{$parameter.redirectUrl}}",
                    // only visible (and therefore present) under OAuth2
                    "profileId": "{{$parameter.profileId?}}",
                    "webhookUrl": "{{$parameter.additionalFields.webhookUrl?}}",
                    "captureMode": "{{$parameter.additionalFields.captureMode?}}",
                    "sequenceType": "{{$parameter.additionalFields.sequenceType?}}",
                    "locale": "{{$parameter.additionalFields.locale?}}",
                    "method": "{{$parameter.additionalFields.method?}}",
                    "restrictPaymentMethodsToCountry": "{{$parameter.additionalFields.restrictPaymentMethodsToCountry?}}",
                    "customerId": "{{$parameter.additionalFields.customerId?}}",
                    "mandateId": "{{$parameter.additionalFields.mandateId?}}",
                    "metadata": "{{$parameter.additionalFields.metadata?}}",
                })),
            },
            send: SendOptions {
                paginate: false,
                pre_send: vec![hooks::inject_test_mode],
            },
            output: OutputOptions::default(),
        },
    }
}

fn payment_create_capture() -> Operation {
    Operation {
        resource: "payment".to_string(),
        value: "createCapture".to_string(),
        name: "Create Capture".to_string(),
        description: "Capture an authorized payment".to_string(),
        action: "Create a payment capture".to_string(),
        routing: Routing {
            request: RequestTemplate {
                method: HttpMethod::Post,
                url: "/v2/payments/{{$parameter.paymentId}}/captures".to_string(),
                // the amount/currency pair is attached by the hook, only
                // when an amount is given
                body: Some(json!({
                    "description": "{{$parameter.description?}}",
                    "metadata": "{{$parameter.metadata?}}",
                })),
            },
            send: SendOptions {
                paginate: false,
                pre_send: vec![hooks::shape_capture_amount, hooks::inject_test_mode],
            },
            output: OutputOptions::default(),
        },
    }
}

fn payment_create_refund() -> Operation {
    Operation {
        resource: "payment".to_string(),
        value: "createRefund".to_string(),
        name: "Create Refund".to_string(),
        description: "Create a payment refund".to_string(),
        action: "Create a payment refund".to_string(),
        routing: Routing {
            request: RequestTemplate {
                method: HttpMethod::Post,
                url: "/v2/payments/{{$parameter.paymentId}}/refunds".to_string(),
                body: Some(json!({
                    "amount": {
                        "value": "{{$parameter.amount | money}}",
                        "currency": "{{$parameter.currency}}",
                    },
                    "description": "{{$parameter.description?}}",
                    "reverseRouting": "{{$parameter.additionalFields.reverseRouting?}}",
                    "metadata": "{{$parameter.additionalFields.metadata?}}",
                })),
            },
            send: SendOptions {
                paginate: false,
                pre_send: vec![hooks::shape_routing_reversals, hooks::inject_test_mode],
            },
            output: OutputOptions::default(),
        },
    }
}

fn payment_get() -> Operation {
    Operation {
        resource: "payment".to_string(),
        value: "get".to_string(),
        name: "Get".to_string(),
        description: "Get a payment by ID".to_string(),
        action: "Get a payment".to_string(),
        routing: Routing {
            request: RequestTemplate {
                method: HttpMethod::Get,
                url: "/v2/payments/{{$parameter.paymentId}}".to_string(),
                body: None,
            },
            send: SendOptions {
                paginate: false,
                pre_send: vec![hooks::inject_test_mode],
            },
            output: OutputOptions::default(),
        },
    }
}

fn payment_get_all() -> Operation {
    Operation {
        resource: "payment".to_string(),
        value: "getAll".to_string(),
        name: "Get Many".to_string(),
        description: "Get many payments".to_string(),
        action: "Get many payments".to_string(),
        routing: Routing {
            request: RequestTemplate {
                method: HttpMethod::Get,
                url: "/v2/payments".to_string(),
                body: None,
            },
            send: SendOptions {
                paginate: false,
                pre_send: vec![hooks::shape_payment_list, hooks::inject_test_mode],
            },
            output: OutputOptions {
                post_receive: vec![PostReceiveStep::RootProperty("_embedded.payments".to_string())],
            },
        },
    }
}

fn payment_link_create() -> Operation {
    Operation {
        resource: "paymentLink".to_string(),
        value: "create".to_string(),
        name: "Create".to_string(),
        description: "Create a payment link".to_string(),
        action: "Create a payment link".to_string(),
        routing: Routing {
            request: RequestTemplate {
                method: HttpMethod::Post,
                url: "/v2/payment-links".to_string(),
                body: Some(json!({
                    "description": "{{$parameter.description}}",
                    "amount": {
                        "value": "{{$parameter.amount | money}}",
                        "currency": "{{$parameter.currency}}",
                    },
                    "profileId": "{{$parameter.profileId?}}",
                    "redirectUrl": "{{$parameter.redirectUrl?}}",
                    "webhookUrl": "{{$parameter.webhookUrl?}}",
                })),
            },
            send: SendOptions {
                paginate: false,
                pre_send: vec![hooks::normalize_expires_at, hooks::inject_test_mode],
            },
            output: OutputOptions::default(),
        },
    }
}
