//! Credential descriptors: the API-key schema and the OAuth2 schema.
//!
//! The OAuth2 token exchange is owned by the embedding host; this
//! module only declares the grant parameters, the user-facing fields
//! and how requests are authenticated with the stored values.

use crate::{
    MollieflowError, Result,
    model::{Authenticate, CredentialSchema, CredentialTestRequest, HttpMethod, NodeProperty, PropertyKind, TypeOptions},
    mollie::options,
};

/// Scopes every OAuth2 connection requests, regardless of selection.
pub const BASE_SCOPE: &str = "organizations.read profiles.read";
pub const AUTHORIZE_URL: &str = "https://www.mollie.com/oauth2/authorize";
pub const TOKEN_URL: &str = "https://api.mollie.com/oauth2/tokens";

const DOCUMENTATION_URL: &str = "https://docs.mollie.com/reference/authentication";

/// API-key credential: one masked key. Test and live mode are implied
/// by the key prefix, so there is no test-mode field.
pub fn api_key_schema() -> CredentialSchema {
    CredentialSchema {
        name: "mollieApi".to_string(),
        display_name: "Mollie API".to_string(),
        extends: None,
        documentation_url: Some(DOCUMENTATION_URL.to_string()),
        properties: vec![
            NodeProperty::new("apiKey", "API Key", PropertyKind::String)
                .required()
                .default_value("")
                .placeholder("test_xxxxxxxxxxxxxxxxxxxxxxxxxx")
                .describe("Your Mollie API key from the dashboard. Test keys (test_xxx) hit test mode, live keys (live_xxx) production; the mode is implied by the prefix.")
                .type_options(TypeOptions {
                    password: Some(true),
                    ..Default::default()
                }),
        ],
        authenticate: Some(Authenticate::bearer("{{$credentials.apiKey}}")),
        test: Some(CredentialTestRequest {
            base_url: "https://api.mollie.com".to_string(),
            url: "/v2/methods".to_string(),
            method: HttpMethod::Get,
        }),
    }
}

/// OAuth2 credential: authorization-code grant against the fixed Mollie
/// endpoints, with client credentials sent in the token-request body.
/// The scope string is assembled by [`assemble_scope`] from the fixed
/// base plus the selected additional scopes.
pub fn oauth2_schema() -> CredentialSchema {
    CredentialSchema {
        name: "mollieOAuth2Api".to_string(),
        display_name: "Mollie OAuth2 API".to_string(),
        extends: Some("oAuth2Api".to_string()),
        documentation_url: Some(DOCUMENTATION_URL.to_string()),
        properties: vec![
            NodeProperty::new("grantType", "Grant Type", PropertyKind::Hidden).default_value("authorizationCode"),
            NodeProperty::new("authUrl", "Authorization URL", PropertyKind::Hidden).default_value(AUTHORIZE_URL),
            NodeProperty::new("accessTokenUrl", "Access Token URL", PropertyKind::Hidden).default_value(TOKEN_URL),
            NodeProperty::new("authQueryParameters", "Auth URI Query Parameters", PropertyKind::Hidden).default_value("response_type=code"),
            NodeProperty::new("authentication", "Authentication", PropertyKind::Hidden).default_value("body"),
            NodeProperty::new("additionalScopes", "Additional Scopes", PropertyKind::MultiOptions)
                .default_value(options::DEFAULT_ADDITIONAL_SCOPES)
                .describe("Additional scopes added to the base scopes (organizations.read, profiles.read)")
                .options(options::to_options(options::ADDITIONAL_SCOPES)),
            NodeProperty::new("testMode", "Test Mode", PropertyKind::Boolean)
                .default_value(true)
                .describe("Whether to use test mode. Adds testmode=true to API requests."),
            NodeProperty::new("clientId", "Client ID", PropertyKind::String)
                .required()
                .default_value("")
                .describe("Client ID of your Mollie OAuth2 application"),
            NodeProperty::new("clientSecret", "Client Secret", PropertyKind::String)
                .required()
                .default_value("")
                .describe("Client secret of your Mollie OAuth2 application")
                .type_options(TypeOptions {
                    password: Some(true),
                    ..Default::default()
                }),
        ],
        authenticate: Some(Authenticate::bearer("{{$credentials.accessToken}}")),
        test: None,
    }
}

/// Scope string for the authorization request: the fixed base plus any
/// selected additional scopes.
pub fn assemble_scope(additional: &[String]) -> String {
    if additional.is_empty() {
        return BASE_SCOPE.to_string();
    }
    format!("{} {}", BASE_SCOPE, additional.join(" "))
}

/// Authorization endpoint with the code-response query applied. The
/// exchange of the resulting code for tokens is host-owned.
pub fn authorize_url(
    client_id: &str,
    redirect_uri: &str,
    additional: &[String],
) -> Result<String> {
    let url = reqwest::Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", &assemble_scope(additional)),
        ],
    )
    .map_err(|err| MollieflowError::Credential(format!("failed to build authorize url: {}", err)))?;
    Ok(url.to_string())
}
