use crate::error::AppError;
use futures::future::BoxFuture;
use tracing::{debug, warn};

/// A labelled, not yet started fetch.
pub type Attempt<'a, T> = (&'static str, BoxFuture<'a, Result<T, AppError>>);

/// Awaits `primary`, then each fallback in order, returning the first success.
/// When every attempt fails the last error is returned.
pub async fn fetch_with_fallback<'a, T>(primary: Attempt<'a, T>, fallbacks: Vec<Attempt<'a, T>>) -> Result<T, AppError> {
    let mut last_error = None;

    for (label, attempt) in std::iter::once(primary).chain(fallbacks) {
        match attempt.await {
            Ok(value) => {
                if last_error.is_some() {
                    debug!(strategy = label, "fallback fetch succeeded");
                }
                return Ok(value);
            }
            Err(e) => {
                warn!(strategy = label, "fetch failed: {}", e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or(AppError::Internal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[tokio::test]
    async fn test_primary_wins() {
        let out = fetch_with_fallback(
            ("primary", async { Ok::<_, AppError>(1) }.boxed()),
            vec![("fallback", async { Ok::<_, AppError>(2) }.boxed())],
        ).await;
        assert_eq!(out.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_falls_through_to_first_success() {
        let out = fetch_with_fallback(
            ("primary", async { Err(AppError::Internal) }.boxed()),
            vec![
                ("flat", async { Err(AppError::InternalWithMsg("nope".into())) }.boxed()),
                ("rpc", async { Ok::<_, AppError>("ok") }.boxed()),
            ],
        ).await;
        assert_eq!(out.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_returns_last_error() {
        let out: Result<u8, AppError> = fetch_with_fallback(
            ("primary", async { Err(AppError::Internal) }.boxed()),
            vec![("flat", async { Err(AppError::NotFound("gone".into())) }.boxed())],
        ).await;
        assert!(matches!(out, Err(AppError::NotFound(_))));
    }
}
