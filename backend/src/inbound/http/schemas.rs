//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with recorded state, e.g. a reached claim limit.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing service is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Failed to claim deal. Please try again.")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients, e.g.
    /// `{"code": "claim_limit_reached", "limit": 1}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ClaimedDeal`].
///
/// One recorded redemption as returned to the claimant and the admin ledger.
#[derive(ToSchema)]
#[schema(as = crate::domain::ClaimedDeal)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ClaimedDealSchema {
    #[schema(value_type = String, example = "7d444840-9dc0-11d1-b245-5ffdce74fad2")]
    id: String,
    #[schema(rename = "userId", example = "123e4567-e89b-12d3-a456-426614174000")]
    user_id: String,
    #[schema(rename = "userEmail", example = "ada@example.com")]
    user_email: String,
    #[schema(rename = "restaurantId", example = "source")]
    restaurant_id: String,
    #[schema(rename = "restaurantName", example = "Source")]
    restaurant_name: String,
    #[schema(rename = "dealTitle", example = "Free dessert")]
    deal_title: String,
    #[schema(rename = "dealDescription")]
    deal_description: String,
    /// Restaurant prefix, a dash, then eight characters from `[0-9A-Z]`.
    #[schema(rename = "confirmationCode", example = "SOURC-4K9Z2QX1")]
    confirmation_code: String,
    #[schema(rename = "expiresAt", value_type = String, format = DateTime)]
    expires_at: String,
    #[schema(rename = "claimedAt", value_type = String, format = DateTime)]
    claimed_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_has_expected_name() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        let name = ErrorCodeSchema::name();
        // utoipa replaces :: with . in schema names
        assert_eq!(name, "crate.domain.ErrorCode");
        assert!(
            schema_json.contains("invalid_request"),
            "schema should contain error code variants"
        );
    }

    #[test]
    fn error_schema_has_expected_name() {
        let schema_json = schema_to_json::<ErrorSchema>();
        let name = ErrorSchema::name();
        // utoipa replaces :: with . in schema names
        assert_eq!(name, "crate.domain.Error");
        assert!(
            schema_json.contains("message"),
            "schema should contain message field"
        );
        assert!(
            schema_json.contains("traceId"),
            "schema should contain traceId field"
        );
    }

    #[test]
    fn claimed_deal_schema_uses_camel_case_fields() {
        let schema_json = schema_to_json::<ClaimedDealSchema>();
        assert_eq!(ClaimedDealSchema::name(), "crate.domain.ClaimedDeal");
        for field in ["confirmationCode", "expiresAt", "restaurantName", "userEmail"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
        assert!(!schema_json.contains("confirmation_code"));
    }

    #[test]
    fn error_code_schema_variants_match_domain() {
        // Verify the schema contains all expected error code variants
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        assert!(
            schema_json.contains("invalid_request"),
            "missing invalid_request"
        );
        assert!(schema_json.contains("unauthorized"), "missing unauthorized");
        assert!(schema_json.contains("forbidden"), "missing forbidden");
        assert!(schema_json.contains("not_found"), "missing not_found");
        assert!(schema_json.contains("conflict"), "missing conflict");
        assert!(
            schema_json.contains("service_unavailable"),
            "missing service_unavailable"
        );
        assert!(
            schema_json.contains("internal_error"),
            "missing internal_error"
        );
    }
}
