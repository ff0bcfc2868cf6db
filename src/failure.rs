use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::store::StoreError;

/// What the client sees when a store call fails.
///
/// Failures are always logged. `Respond` then answers with the error's
/// status code. `LogOnly` reproduces the old behaviour of this app, where
/// the request was simply never answered; it is kept for side by side
/// comparisons and is almost certainly not what a deployment wants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    #[default]
    Respond,
    LogOnly,
}

impl FailurePolicy {
    /// Pass a successful store result through. On error, log it and apply
    /// the policy. Under `LogOnly` the returned future never resolves.
    pub async fn check<T>(self, action: &str, result: Result<T, StoreError>) -> AppResult<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::error!("An error occurred while trying to {}: {}", action, err);
                if self == FailurePolicy::LogOnly {
                    tracing::warn!("Failure policy is log-only, leaving request unanswered");
                    std::future::pending::<()>().await;
                }
                Err(AppError::Store(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn ok_passes_through_under_any_policy() {
        for policy in [FailurePolicy::Respond, FailurePolicy::LogOnly] {
            let value = policy.check("read", Ok::<_, StoreError>(7)).await.unwrap();
            assert_eq!(value, 7);
        }
    }

    #[tokio::test]
    async fn respond_returns_the_error() {
        let err = FailurePolicy::Respond
            .check::<()>("read", Err(StoreError::NotFound("abc".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn log_only_never_resolves() {
        let fut = FailurePolicy::LogOnly.check::<()>("read", Err(StoreError::NotFound("abc".into())));
        let outcome = tokio::time::timeout(Duration::from_millis(50), fut).await;
        assert!(outcome.is_err());
    }

    #[test]
    fn default_is_respond() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Respond);
    }
}
