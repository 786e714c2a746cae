//! Request and response shaping functions referenced by the routing
//! catalog. Pre-send hooks run after template rendering and may assume
//! the field values already passed validation.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};

use crate::{
    Result,
    runtime::{ExecutionContext, RequestOptions},
};

/// OAuth2 credentials carry an explicit test-mode flag; API keys imply
/// test or live by their prefix. When the flag is on, writes carry it in
/// the body and reads in the query string.
pub fn inject_test_mode(
    ctx: &ExecutionContext,
    mut options: RequestOptions,
) -> Result<RequestOptions> {
    if ctx.test_mode() {
        if options.method.is_write() {
            options.set_body_entry("testmode", true);
        } else {
            options.set_query("testmode", true);
        }
    }
    Ok(options)
}

/// Balance transaction paging: the limit is clamped to the API maximum
/// of 250 and the optional `from` cursor is attached when given.
pub fn shape_transaction_page(
    ctx: &ExecutionContext,
    mut options: RequestOptions,
) -> Result<RequestOptions> {
    let limit = ctx.param_or::<u64>("limit", 100);
    options.set_query("limit", limit.min(250));

    if let Some(from) = ctx.param::<String>("from").filter(|from| !from.is_empty()) {
        options.set_query("from", from);
    }
    Ok(options)
}

/// Payment list paging: the explicit limit or the documented default of
/// 100, plus the optional status filter.
pub fn shape_payment_list(
    ctx: &ExecutionContext,
    mut options: RequestOptions,
) -> Result<RequestOptions> {
    let limit = ctx.param::<u64>("limit").filter(|limit| *limit > 0).unwrap_or(100);
    options.set_query("limit", limit);

    if let Some(status) = ctx.param_path("filters.status").and_then(|v| v.as_str().map(str::to_string)) {
        if !status.is_empty() {
            options.set_query("status", status);
        }
    }
    Ok(options)
}

/// A capture without an amount captures the full authorized sum; the
/// amount object with its currency is attached only when one is given.
pub fn shape_capture_amount(
    ctx: &ExecutionContext,
    mut options: RequestOptions,
) -> Result<RequestOptions> {
    let amount = ctx.param_or::<f64>("amount", 0.0);
    if amount > 0.0 {
        let currency = ctx.param_or::<String>("currency", "EUR".to_string());
        options.set_body_entry("amount", json!({"value": format!("{:.2}", amount), "currency": currency}));
    }
    Ok(options)
}

/// Split-payment refunds: map the routing reversal rows into the API's
/// `[{amount: {value, currency}, source: {type, organizationId}}]`
/// shape with money-formatted values. Absent row fields take the
/// declared field defaults.
pub fn shape_routing_reversals(
    ctx: &ExecutionContext,
    mut options: RequestOptions,
) -> Result<RequestOptions> {
    let rows = match ctx.param_path("additionalFields.routingReversals.reversalValues") {
        Some(Value::Array(rows)) if !rows.is_empty() => rows,
        _ => return Ok(options),
    };

    let reversals: Vec<Value> = rows
        .iter()
        .map(|row| {
            let amount = row.get("amountValue").and_then(Value::as_f64).unwrap_or(0.0);
            let currency = row.get("amountCurrency").and_then(Value::as_str).unwrap_or("EUR");
            let source_type = row.get("sourceType").and_then(Value::as_str).unwrap_or("organization");
            let organization_id = row.get("organizationId").and_then(Value::as_str).unwrap_or_default();
            json!({
                "amount": {"value": format!("{:.2}", amount), "currency": currency},
                "source": {"type": source_type, "organizationId": organization_id},
            })
        })
        .collect();

    options.set_body_entry("routingReversals", reversals);
    Ok(options)
}

/// Payment links take an RFC 3339 expiry; the date field value is
/// normalized to UTC. Values chrono cannot parse pass through for the
/// API to judge.
pub fn normalize_expires_at(
    ctx: &ExecutionContext,
    mut options: RequestOptions,
) -> Result<RequestOptions> {
    let expires_at = match ctx.param::<String>("expiresAt").filter(|value| !value.is_empty()) {
        Some(expires_at) => expires_at,
        None => return Ok(options),
    };

    let normalized = DateTime::parse_from_rfc3339(&expires_at)
        .map(|parsed| parsed.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or(expires_at);
    options.set_body_entry("expiresAt", normalized);
    Ok(options)
}

/// Post-receive mapper for balance transactions: normalize the ISO
/// `createdAt` to UTC. Items whose value does not parse keep it as is.
pub fn parse_created_at(mut item: Value) -> Value {
    let created_at = item.get("createdAt").and_then(Value::as_str).map(str::to_string);
    if let Some(created_at) = created_at {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&created_at) {
            item["createdAt"] = json!(parsed.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true));
        }
    }
    item
}
