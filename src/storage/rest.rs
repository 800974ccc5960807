//! REST implementation of EnrollmentStore for hosted Postgres tables
//!
//! Talks to a PostgREST endpoint (as exposed by Supabase): one `POST` per
//! enrollment to `{url}/rest/v1/{table}`.

use super::{EnrollmentStore, StoreError};
use crate::config::StoreConfig;
use crate::core::EnrollmentRecord;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

/// Error body returned by PostgREST
#[derive(Debug, Default, Deserialize)]
struct RestErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

/// Store client for a hosted `enrollments` table
#[derive(Debug, Clone)]
pub struct RestEnrollmentStore {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl RestEnrollmentStore {
    /// Create a client for `table` under the project at `base_url`
    pub fn new(base_url: &str, api_key: &str, table: &str) -> Result<Self, StoreError> {
        let endpoint = format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table);
        let endpoint = Url::parse(&endpoint).map_err(|e| StoreError::Unavailable {
            reason: format!("invalid store url '{}': {}", base_url, e),
        })?;

        let client = Client::builder()
            .build()
            .map_err(|e| StoreError::Unavailable {
                reason: format!("failed to build http client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
        })
    }

    /// Create a client from the store section of the configuration
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let (Some(url), Some(key)) = (config.url.as_deref(), config.api_key.as_deref()) else {
            return Err(StoreError::Unavailable {
                reason: "credentials not configured".to_string(),
            });
        };
        Self::new(url, key, &config.table)
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

fn rejection(status: StatusCode, body: &str) -> StoreError {
    match serde_json::from_str::<RestErrorBody>(body) {
        Ok(parsed) => StoreError::Rejected {
            code: parsed.code,
            message: parsed.message.unwrap_or_else(|| status.to_string()),
            details: match (parsed.details, parsed.hint) {
                (Some(details), Some(hint)) => Some(format!("{} ({})", details, hint)),
                (details, hint) => details.or(hint),
            },
        },
        Err(_) => StoreError::Rejected {
            code: None,
            message: if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_string()
            },
            details: None,
        },
    }
}

#[async_trait]
impl EnrollmentStore for RestEnrollmentStore {
    async fn insert(&self, record: &EnrollmentRecord) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await
            .map_err(|e| StoreError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.map_err(|e| StoreError::Transport {
            message: format!("{} (failed to read response body: {})", status, e),
        })?;
        tracing::debug!(status = %status, "Store rejected insert");
        Err(rejection(status, &body))
    }

    fn backend(&self) -> &'static str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_table() {
        let store =
            RestEnrollmentStore::new("https://project.supabase.co/", "key", "enrollments").unwrap();
        assert_eq!(
            store.endpoint(),
            "https://project.supabase.co/rest/v1/enrollments"
        );
    }

    #[test]
    fn test_invalid_url_is_unavailable() {
        let err = RestEnrollmentStore::new("not a url", "key", "enrollments").unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let err = RestEnrollmentStore::from_config(&StoreConfig::default()).unwrap_err();
        assert!(err.to_string().contains("credentials not configured"));
    }

    #[test]
    fn test_rejection_parses_postgrest_body() {
        let body = r#"{"code":"23505","details":"Key (email)=(a@b.com) already exists.","hint":null,"message":"duplicate key value violates unique constraint \"enrollments_email_key\""}"#;
        let err = rejection(StatusCode::CONFLICT, body);

        assert_eq!(err.code(), Some("23505"));
        assert!(err.is_unique_violation());
        assert_eq!(err.violated_column(), Some("email"));
    }

    #[test]
    fn test_rejection_keeps_hint() {
        let body = r#"{"code":"42501","message":"permission denied","details":null,"hint":"check policies"}"#;
        let StoreError::Rejected { details, .. } = rejection(StatusCode::FORBIDDEN, body) else {
            panic!("expected a rejection");
        };
        assert_eq!(details.as_deref(), Some("check policies"));
    }

    #[test]
    fn test_rejection_with_plain_body() {
        let err = rejection(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "upstream down");
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_rejection_with_empty_body_uses_status() {
        let err = rejection(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.to_string(), "503 Service Unavailable");
    }
}
