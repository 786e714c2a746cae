//! Option tables shared by several field definitions.

use crate::model::PropertyOption;

/// (label, wire value) pairs for every currency the payment endpoints
/// accept.
pub const CURRENCIES: &[(&str, &str)] = &[
    ("Euro", "EUR"),
    ("United States dollar", "USD"),
    ("Pound sterling", "GBP"),
    ("Swiss franc", "CHF"),
    ("Canadian dollar", "CAD"),
    ("Australian dollar", "AUD"),
    ("Japanese yen", "JPY"),
    ("Danish krone", "DKK"),
    ("Norwegian krone", "NOK"),
    ("Swedish krona", "SEK"),
    ("Polish złoty", "PLN"),
    ("Czech koruna", "CZK"),
    ("Hungarian forint", "HUF"),
    ("Romanian leu", "RON"),
    ("Bulgarian lev", "BGN"),
    ("Brazilian real", "BRL"),
    ("Mexican peso", "MXN"),
    ("South African rand", "ZAR"),
    ("Indian rupee", "INR"),
    ("Singapore dollar", "SGD"),
    ("Hong Kong dollar", "HKD"),
    ("New Zealand dollar", "NZD"),
    ("South Korean won", "KRW"),
    ("Turkish lira", "TRY"),
    ("Russian ruble", "RUB"),
    ("Israeli new shekel", "ILS"),
];

/// Routing reversals settle in a restricted currency set.
pub const REVERSAL_CURRENCIES: &[(&str, &str)] = &[
    ("Euro", "EUR"),
    ("United States dollar", "USD"),
    ("Pound sterling", "GBP"),
];

/// Locales the hosted payment screen renders in.
pub const LOCALES: &[(&str, &str)] = &[
    ("English (US)", "en_US"),
    ("English (GB)", "en_GB"),
    ("Dutch (NL)", "nl_NL"),
    ("Dutch (BE)", "nl_BE"),
    ("French (FR)", "fr_FR"),
    ("French (BE)", "fr_BE"),
    ("German (DE)", "de_DE"),
    ("German (AT)", "de_AT"),
    ("German (CH)", "de_CH"),
    ("Spanish (ES)", "es_ES"),
    ("Catalan (ES)", "ca_ES"),
    ("Portuguese (PT)", "pt_PT"),
    ("Italian (IT)", "it_IT"),
    ("Norwegian (NO)", "nb_NO"),
    ("Swedish (SE)", "sv_SE"),
    ("Finnish (FI)", "fi_FI"),
    ("Danish (DK)", "da_DK"),
    ("Icelandic (IS)", "is_IS"),
    ("Hungarian (HU)", "hu_HU"),
    ("Polish (PL)", "pl_PL"),
    ("Latvian (LV)", "lv_LV"),
    ("Lithuanian (LT)", "lt_LT"),
];

/// Selectable payment methods.
pub const PAYMENT_METHODS: &[(&str, &str)] = &[
    ("Apple Pay", "applepay"),
    ("Bancontact", "bancontact"),
    ("Bank Transfer", "banktransfer"),
    ("Belfius", "belfius"),
    ("Credit Card", "creditcard"),
    ("Direct Debit", "directdebit"),
    ("EPS", "eps"),
    ("Gift Card", "giftcard"),
    ("GiroPay", "giropay"),
    ("iDEAL", "ideal"),
    ("KBC", "kbc"),
    ("MyBank", "mybank"),
    ("PayPal", "paypal"),
    ("PaySafeCard", "paysafecard"),
    ("Przelewy24", "przelewy24"),
    ("Sofort", "sofort"),
];

/// Payment list status filter values; the empty value means no filter.
pub const PAYMENT_STATUSES: &[(&str, &str)] = &[
    ("All", ""),
    ("Open", "open"),
    ("Canceled", "canceled"),
    ("Pending", "pending"),
    ("Authorized", "authorized"),
    ("Expired", "expired"),
    ("Failed", "failed"),
    ("Paid", "paid"),
];

/// (label, wire value, description) triples for the capture mode.
pub const CAPTURE_MODES: &[(&str, &str, &str)] = &[
    ("Automatic", "automatic", "Capture payment automatically (default)"),
    (
        "Manual",
        "manual",
        "Authorization only - capture later using Create Capture operation",
    ),
];

pub const SEQUENCE_TYPES: &[(&str, &str)] = &[
    ("One Off", "oneoff"),
    ("First", "first"),
    ("Recurring", "recurring"),
];

/// OAuth2 scopes selectable on top of the fixed base scopes.
pub const ADDITIONAL_SCOPES: &[(&str, &str)] = &[
    ("Payments Read", "payments.read"),
    ("Payments Write", "payments.write"),
    ("Refunds Read", "refunds.read"),
    ("Refunds Write", "refunds.write"),
    ("Customers Read", "customers.read"),
    ("Customers Write", "customers.write"),
    ("Mandates Read", "mandates.read"),
    ("Mandates Write", "mandates.write"),
    ("Subscriptions Read", "subscriptions.read"),
    ("Subscriptions Write", "subscriptions.write"),
    ("Profiles Write", "profiles.write"),
    ("Invoices Read", "invoices.read"),
    ("Settlements Read", "settlements.read"),
    ("Orders Read", "orders.read"),
    ("Orders Write", "orders.write"),
    ("Shipments Read", "shipments.read"),
    ("Shipments Write", "shipments.write"),
    ("Organizations Write", "organizations.write"),
    ("Onboarding Read", "onboarding.read"),
    ("Onboarding Write", "onboarding.write"),
    ("Balances Read", "balances.read"),
];

/// Scopes preselected when an OAuth2 credential is created.
pub const DEFAULT_ADDITIONAL_SCOPES: &[&str] = &["payments.read", "payments.write", "refunds.read", "refunds.write"];

/// Build static dropdown options from a (label, value) table.
pub fn to_options(table: &[(&str, &str)]) -> Vec<PropertyOption> {
    table.iter().map(|(name, value)| PropertyOption::new(name, value)).collect()
}

/// Build options from a (label, value, description) table.
pub fn described_options(table: &[(&str, &str, &str)]) -> Vec<PropertyOption> {
    table
        .iter()
        .map(|(name, value, description)| PropertyOption::new(name, value).describe(description))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_table_sizes() {
        assert_eq!(CURRENCIES.len(), 26);
        assert_eq!(LOCALES.len(), 22);
        assert_eq!(PAYMENT_METHODS.len(), 16);
        assert_eq!(PAYMENT_STATUSES.len(), 8);
        assert_eq!(ADDITIONAL_SCOPES.len(), 21);
    }

    #[test]
    fn test_wire_values_unique() {
        for table in [CURRENCIES, LOCALES, PAYMENT_METHODS, PAYMENT_STATUSES, ADDITIONAL_SCOPES] {
            let values: HashSet<&str> = table.iter().map(|(_, value)| *value).collect();
            assert_eq!(values.len(), table.len());
        }
    }

    #[test]
    fn test_to_options_maps_label_and_value() {
        let options = to_options(REVERSAL_CURRENCIES);
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].name, "Euro");
        assert_eq!(options[0].value, serde_json::json!("EUR"));
    }

    #[test]
    fn test_described_options_carry_description() {
        let options = described_options(CAPTURE_MODES);
        assert_eq!(options[0].value, serde_json::json!("automatic"));
        assert_eq!(options[0].description.as_deref(), Some("Capture payment automatically (default)"));
    }
}
