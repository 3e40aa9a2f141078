//! Connection establishment with exponential backoff.
//!
//! This is the only retry in the service. Once a pool exists, failed store
//! calls are surfaced to the caller as-is.

use std::future::Future;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::error::StoreError;

/// Default number of connection attempts.
pub const DEFAULT_ATTEMPTS: u32 = 5;

/// First backoff delay; doubles after each failed attempt (1s, 2s, 4s, ...).
const BASE_DELAY: Duration = Duration::from_secs(1);

/// Per-attempt pool acquire timeout.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Run `f` up to `attempts` times, sleeping `base * 2^n` between failures.
///
/// Returns the last error once attempts are exhausted. `attempts` of zero is
/// treated as one.
pub(crate) async fn with_backoff<F, Fut, T, E>(attempts: u32, base: Duration, f: F) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = attempts.max(1);
    for attempt in 0..attempts - 1 {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                let delay = base.saturating_mul(2u32.saturating_pow(attempt));
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    "database connection failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    f().await
}

/// Open a connection pool, retrying with exponential backoff.
pub async fn connect_with_retry(
    options: PgConnectOptions,
    attempts: u32,
) -> Result<PgPool, StoreError> {
    let attempts = attempts.max(1);
    let pool = with_backoff(attempts, BASE_DELAY, || {
        PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options.clone())
    })
    .await
    .map_err(|source| StoreError::ConnectExhausted { attempts, source })?;

    tracing::info!("connected to PostgreSQL");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn exhausts_all_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result: Result<(), String> = with_backoff(4, Duration::from_millis(1), || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err("refused".to_string())
            }
        })
        .await;

        assert_eq!(result.unwrap_err(), "refused");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn stops_on_first_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result: Result<u32, String> = with_backoff(5, Duration::from_millis(1), || {
            let c = c.clone();
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err("not yet".to_string())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let _: Result<(), &str> = with_backoff(0, Duration::from_millis(1), || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err("x")
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
