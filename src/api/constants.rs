//! API constants and endpoint builders for the Uspacy incoming-webhook API

/// Environment variable holding the default webhook token
pub const TOKEN_ENV_VAR: &str = "USPACY_WEBHOOK_TOKEN";

/// Per-request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection timeout in seconds
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Combinator applied when searching on multiple filters
pub const SEARCH_BOOLEAN_OPERATOR: &str = "AND";

/// Search always reads the first page only
pub const SEARCH_PAGE: &str = "1";

/// Fixed search page size; matches beyond it are not visible
pub const SEARCH_PAGE_SIZE: &str = "20";

/// Build the tenant- and token-scoped URL prefix all CRM calls go through
pub fn webhook_base(base_url: &str, token: &str) -> String {
    format!(
        "{}/company/v1/incoming_webhooks/run/{}",
        base_url.trim_end_matches('/'),
        token
    )
}

/// Build the field definitions endpoint URL
pub fn fields_endpoint(api_base: &str, entity: &str) -> String {
    format!("{}/crm/v1/entities/{}/fields", api_base, entity)
}

/// Build the entity search endpoint URL
pub fn entity_endpoint(api_base: &str, entity: &str) -> String {
    format!("{}/crm/v1/entities/{}/", api_base, entity)
}

/// Build the single-record endpoint URL used for updates
pub fn entity_record_endpoint(api_base: &str, entity: &str, id: &str) -> String {
    format!("{}/crm/v1/entities/{}/{}", api_base, entity, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_base_strips_trailing_slash() {
        assert_eq!(
            webhook_base("https://acme.uspacy.ua/", "tok123"),
            "https://acme.uspacy.ua/company/v1/incoming_webhooks/run/tok123"
        );
        assert_eq!(
            webhook_base("https://acme.uspacy.ua", "tok123"),
            "https://acme.uspacy.ua/company/v1/incoming_webhooks/run/tok123"
        );
    }

    #[test]
    fn endpoint_builders() {
        let base = "https://acme.uspacy.ua/company/v1/incoming_webhooks/run/tok";
        assert_eq!(
            fields_endpoint(base, "companies"),
            format!("{base}/crm/v1/entities/companies/fields")
        );
        assert_eq!(
            entity_endpoint(base, "companies"),
            format!("{base}/crm/v1/entities/companies/")
        );
        assert_eq!(
            entity_record_endpoint(base, "companies", "42"),
            format!("{base}/crm/v1/entities/companies/42")
        );
    }
}
