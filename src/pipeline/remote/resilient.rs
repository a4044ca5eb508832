//! Retry, backoff and breaker wiring around a remote extractor.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use super::{parse, CircuitBreaker, RemoteExtractor};
use crate::config::RemoteConfig;
use crate::models::NormalizedRecord;

/// Wraps a [`RemoteExtractor`] with per-attempt timeouts, bounded
/// retries with jittered exponential backoff, and a circuit breaker.
///
/// `None` means "no additional data": disabled, unconfigured, breaker
/// open, or all attempts exhausted. Callers never see an error.
pub struct ResilientExtractionClient<E> {
    config: RemoteConfig,
    extractor: E,
    breaker: CircuitBreaker,
}

impl<E: RemoteExtractor> ResilientExtractionClient<E> {
    pub fn new(config: RemoteConfig, extractor: E) -> Self {
        let breaker = CircuitBreaker::new(config.breaker_threshold, config.breaker_cooldown);
        Self {
            config,
            extractor,
            breaker,
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Best-effort remote extraction. Attempts run sequentially, never
    /// in parallel; the delay applies between attempts, not before the
    /// first.
    pub async fn extract_via_remote(
        &self,
        text: &str,
        source_file: Option<&str>,
    ) -> Option<NormalizedRecord> {
        if !self.config.usable() {
            return None;
        }
        if !self.breaker.try_acquire() {
            debug!("remote extraction skipped, circuit open");
            return None;
        }

        let attempts = self.config.max_retries.max(1);
        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.backoff_delay(attempt - 1);
                debug!(attempt, delay_ms = delay.as_millis() as u64, "remote retry backoff");
                tokio::time::sleep(delay).await;
                if !self.breaker.try_acquire() {
                    return None;
                }
            }

            match tokio::time::timeout(
                self.config.timeout,
                self.extractor.extract(text, source_file),
            )
            .await
            {
                Ok(Ok(value)) => {
                    if let Some(record) = parse::record_from_remote(&value, source_file) {
                        self.breaker.record_success();
                        debug!(attempt, "remote extraction succeeded");
                        return Some(record);
                    }
                    // Well-formed JSON without usable fields still counts
                    // as a failed attempt.
                    warn!(attempt, "remote response carried no usable record");
                    self.breaker.record_failure();
                }
                Ok(Err(err)) => {
                    warn!(attempt, error = %err, "remote extraction attempt failed");
                    self.breaker.record_failure();
                }
                Err(_) => {
                    warn!(
                        attempt,
                        timeout_ms = self.config.timeout.as_millis() as u64,
                        "remote extraction attempt timed out"
                    );
                    self.breaker.record_failure();
                }
            }
        }
        None
    }

    /// `base * 2^attempt`, clamped to the configured maximum, with up
    /// to ±10% random jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = self
            .config
            .backoff_base
            .saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX))
            .min(self.config.backoff_max);
        let jitter = rand::thread_rng().gen_range(0.9..=1.1);
        exp.mul_f64(jitter)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::pipeline::remote::{BreakerState, RemoteError};

    /// Scripted extractor: pops one canned response per call.
    struct MockRemoteExtractor {
        responses: Mutex<VecDeque<Result<serde_json::Value, ()>>>,
        calls: AtomicU32,
        last_source_file: Mutex<Option<String>>,
    }

    impl MockRemoteExtractor {
        fn new(responses: Vec<Result<serde_json::Value, ()>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicU32::new(0),
                last_source_file: Mutex::new(None),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_source_file(&self) -> Option<String> {
            self.last_source_file.lock().unwrap().clone()
        }
    }

    impl RemoteExtractor for MockRemoteExtractor {
        async fn extract(
            &self,
            _text: &str,
            source_file: Option<&str>,
        ) -> Result<serde_json::Value, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_source_file.lock().unwrap() = source_file.map(str::to_string);
            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(value)) => Ok(value),
                _ => Err(RemoteError::Http("mock failure".into())),
            }
        }
    }

    fn test_config(max_retries: u32, threshold: u32) -> RemoteConfig {
        RemoteConfig {
            enabled: true,
            endpoint: Some("http://localhost:9/extract".into()),
            timeout: Duration::from_millis(200),
            max_retries,
            backoff_base: Duration::from_millis(1),
            backoff_max: Duration::from_millis(4),
            breaker_threshold: threshold,
            breaker_cooldown: Duration::from_millis(30),
            ..RemoteConfig::default()
        }
    }

    fn good_response() -> serde_json::Value {
        json!({
            "acto_o_contrato": "PODER GENERAL",
            "otorgantes": [{"nombre": "PEREZ LOPEZ JUAN", "calidad": "MANDANTE"}]
        })
    }

    #[tokio::test]
    async fn disabled_client_returns_none_without_calling() {
        let mock = MockRemoteExtractor::new(vec![Ok(good_response())]);
        let client = ResilientExtractionClient::new(RemoteConfig::default(), mock);
        assert!(client.extract_via_remote("texto", None).await.is_none());
        assert_eq!(client.extractor.calls(), 0);
    }

    #[tokio::test]
    async fn success_on_first_attempt() {
        let mock = MockRemoteExtractor::new(vec![Ok(good_response())]);
        let client = ResilientExtractionClient::new(test_config(3, 5), mock);
        let record = client.extract_via_remote("texto", Some("a.pdf")).await.unwrap();
        assert_eq!(record.act_description.as_deref(), Some("PODER GENERAL"));
        assert_eq!(client.extractor.calls(), 1);
        assert_eq!(client.breaker().state(), BreakerState::Closed);
    }

    #[tokio::test]
    async fn source_file_is_forwarded_to_the_extractor() {
        let mock = MockRemoteExtractor::new(vec![Ok(good_response())]);
        let client = ResilientExtractionClient::new(test_config(1, 5), mock);
        client
            .extract_via_remote("texto", Some("escritura_2183.pdf"))
            .await
            .unwrap();
        assert_eq!(
            client.extractor.last_source_file().as_deref(),
            Some("escritura_2183.pdf")
        );
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let mock = MockRemoteExtractor::new(vec![Err(()), Err(()), Ok(good_response())]);
        let client = ResilientExtractionClient::new(test_config(3, 5), mock);
        assert!(client.extract_via_remote("texto", None).await.is_some());
        assert_eq!(client.extractor.calls(), 3);
    }

    #[tokio::test]
    async fn unusable_json_counts_as_failure() {
        let mock = MockRemoteExtractor::new(vec![Ok(json!({"otorgantes": []}))]);
        let client = ResilientExtractionClient::new(test_config(1, 5), mock);
        assert!(client.extract_via_remote("texto", None).await.is_none());
        assert_eq!(client.breaker().failures(), 1);
    }

    #[tokio::test]
    async fn breaker_opens_and_short_circuits() {
        let mock = MockRemoteExtractor::new(vec![]);
        let client = ResilientExtractionClient::new(test_config(3, 3), mock);

        assert!(client.extract_via_remote("texto", None).await.is_none());
        assert_eq!(client.breaker().state(), BreakerState::Open);
        assert_eq!(client.extractor.calls(), 3);

        // Open circuit: no further remote calls.
        assert!(client.extract_via_remote("texto", None).await.is_none());
        assert_eq!(client.extractor.calls(), 3);
    }

    #[tokio::test]
    async fn half_open_probe_recovers_after_cooldown() {
        let mock = MockRemoteExtractor::new(vec![Err(()), Ok(good_response())]);
        let client = ResilientExtractionClient::new(test_config(1, 1), mock);

        assert!(client.extract_via_remote("texto", None).await.is_none());
        assert_eq!(client.breaker().state(), BreakerState::Open);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(client.extract_via_remote("texto", None).await.is_some());
        assert_eq!(client.breaker().state(), BreakerState::Closed);
        assert_eq!(client.breaker().failures(), 0);
    }
}
