//! Credential providers.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use rustdyn_auth::Credentials;
use tracing::{debug, info};

use crate::client::TokenService;
use crate::error::StsError;

/// Future returned by credential sources.
pub type CredentialsFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Credentials, StsError>> + Send + 'a>>;

/// Supplies the credentials each request is signed with.
pub trait ProvideCredentials: Send + Sync + fmt::Debug {
    /// Return credentials that are valid now.
    fn provide_credentials(&self) -> CredentialsFuture<'_>;

    /// Drop any cached credentials so the next call fetches fresh ones.
    fn invalidate(&self) {}
}

/// Long-lived credentials used as-is.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Wrap `credentials`.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl ProvideCredentials for StaticCredentials {
    fn provide_credentials(&self) -> CredentialsFuture<'_> {
        let credentials = self.credentials.clone();
        Box::pin(async move { Ok(credentials) })
    }
}

/// Fetches session credentials from a [`TokenService`] and caches them until
/// they expire.
///
/// Concurrent callers that find the cache empty wait for a single fetch
/// instead of each issuing their own. A failed fetch leaves the cache
/// untouched.
pub struct SessionCredentialProvider {
    long_lived: Credentials,
    service: Arc<dyn TokenService>,
    cached: RwLock<Option<Credentials>>,
    refresh: tokio::sync::Mutex<()>,
}

impl fmt::Debug for SessionCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentialProvider")
            .field("access_key_id", &self.long_lived.access_key_id)
            .field("service", &self.service)
            .field("cached", &self.cached.read().is_some())
            .finish_non_exhaustive()
    }
}

impl SessionCredentialProvider {
    /// Create a provider that exchanges `long_lived` through `service`.
    #[must_use]
    pub fn new(long_lived: Credentials, service: Arc<dyn TokenService>) -> Self {
        Self {
            long_lived,
            service,
            cached: RwLock::new(None),
            refresh: tokio::sync::Mutex::new(()),
        }
    }

    /// Return cached credentials, fetching new ones when there are none or
    /// they have expired.
    pub async fn valid_credentials(&self) -> Result<Credentials, StsError> {
        if let Some(credentials) = self.cached_valid() {
            return Ok(credentials);
        }

        let _guard = self.refresh.lock().await;
        // Another caller may have refreshed while this one waited.
        if let Some(credentials) = self.cached_valid() {
            return Ok(credentials);
        }

        debug!(access_key_id = %self.long_lived.access_key_id, "fetching session credentials");
        let fresh = self.service.get_session_token(&self.long_lived).await?;
        info!(expiration = ?fresh.expiration, "cached session credentials");
        *self.cached.write() = Some(fresh.clone());
        Ok(fresh)
    }

    fn cached_valid(&self) -> Option<Credentials> {
        let now = Utc::now();
        self.cached
            .read()
            .as_ref()
            .filter(|credentials| !credentials.is_expired_at(now))
            .cloned()
    }
}

impl ProvideCredentials for SessionCredentialProvider {
    fn provide_credentials(&self) -> CredentialsFuture<'_> {
        Box::pin(self.valid_credentials())
    }

    fn invalidate(&self) {
        if self.cached.write().take().is_some() {
            debug!("evicted cached session credentials");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{Duration, Utc};
    use rustdyn_model::AmazonError;

    use super::*;

    #[derive(Debug)]
    struct CountingService {
        calls: AtomicUsize,
        lifetime: Duration,
        fail: bool,
    }

    impl CountingService {
        fn new(lifetime: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                lifetime,
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                lifetime: Duration::hours(1),
                fail: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TokenService for CountingService {
        fn get_session_token<'a>(&'a self, _credentials: &'a Credentials) -> CredentialsFuture<'a> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                if self.fail {
                    return Err(StsError::Service(AmazonError::new(
                        Some("InvalidClientTokenId"),
                        "bad key",
                        403,
                    )));
                }
                Ok(Credentials::new(format!("ASIA{n}"), "session-secret")
                    .with_session_token(format!("token-{n}"))
                    .with_expiration(Utc::now() + self.lifetime))
            })
        }
    }

    fn provider(service: Arc<CountingService>) -> SessionCredentialProvider {
        SessionCredentialProvider::new(Credentials::new("fakeKeyId", "secret"), service)
    }

    #[tokio::test]
    async fn test_should_reuse_unexpired_credentials() {
        let service = CountingService::new(Duration::hours(12));
        let provider = provider(service.clone());

        let first = provider.provide_credentials().await.unwrap();
        let second = provider.provide_credentials().await.unwrap();
        assert_eq!(first.session_token, second.session_token);
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_should_refetch_expired_credentials() {
        let service = CountingService::new(Duration::seconds(-1));
        let provider = provider(service.clone());

        let first = provider.provide_credentials().await.unwrap();
        let second = provider.provide_credentials().await.unwrap();
        assert_ne!(first.session_token, second.session_token);
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn test_should_not_cache_failures() {
        let service = CountingService::failing();
        let provider = provider(service.clone());

        assert!(matches!(
            provider.provide_credentials().await,
            Err(StsError::Service(err)) if err.error_type == "InvalidClientTokenId"
        ));
        assert!(provider.provide_credentials().await.is_err());
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn test_should_refetch_after_invalidate() {
        let service = CountingService::new(Duration::hours(12));
        let provider = provider(service.clone());

        provider.provide_credentials().await.unwrap();
        provider.invalidate();
        provider.provide_credentials().await.unwrap();
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn test_should_share_one_fetch_between_concurrent_callers() {
        let service = CountingService::new(Duration::hours(12));
        let provider = Arc::new(provider(service.clone()));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let provider = provider.clone();
                tokio::spawn(async move { provider.provide_credentials().await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_should_return_static_credentials() {
        let provider = StaticCredentials::new(
            Credentials::new("fakeKeyId", "secret").with_session_token("t"),
        );
        let credentials = provider.provide_credentials().await.unwrap();
        assert_eq!(credentials.access_key_id, "fakeKeyId");
        assert_eq!(credentials.session_token.as_deref(), Some("t"));
    }
}
