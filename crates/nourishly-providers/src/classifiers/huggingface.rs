// ABOUTME: Hugging Face Inference API zero-shot cuisine classifier
// ABOUTME: Retries model-loading and rate-limit statuses and caches results by input text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

use async_trait::async_trait;
use lru::LruCache;
use reqwest::Client;
use serde_json::{json, Value};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument, Span};

use crate::constants::classification::{
    CACHE_CAPACITY, DEFAULT_MODEL_ID, MAX_ALTERNATIVES, MIN_TEXT_LENGTH,
};
use crate::constants::endpoints::HUGGINGFACE_BASE_URL;
use crate::constants::provider_ids::HUGGINGFACE;
use crate::core::{CuisineClassifier, Provider, ProviderConfig};
use crate::errors::{NormalizationError, ProviderError, ProviderResult};
use crate::http_client::{health_check_client, shared_client};
use crate::models::{ClassificationResult, Cuisine, CuisineAlternative};
use crate::rate_limiter::RateLimiter;
use crate::utils::{ensure_success, read_json, send_with_retry, RetryConfig};

/// Option selecting the hosted model
pub const MODEL_ID_OPTION: &str = "model_id";

const HEALTH_CHECK_TEXT: &str = "test";
const HEALTH_CHECK_LABELS: [&str; 2] = ["Italian", "Chinese"];

const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(n) => n,
    None => unreachable!(),
};

/// Zero-shot classifier backed by a hosted NLI model
pub struct HuggingFaceClassifier {
    config: ProviderConfig,
    model_id: String,
    endpoint: String,
    client: Client,
    limiter: RateLimiter,
    retry: RetryConfig,
    cache: Mutex<LruCache<String, ClassificationResult>>,
    span: Span,
}

impl HuggingFaceClassifier {
    /// Build the classifier; performs no I/O
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        let model_id = config
            .option(MODEL_ID_OPTION)
            .unwrap_or(DEFAULT_MODEL_ID)
            .trim_matches('/')
            .to_owned();
        let endpoint = format!("{}/{model_id}", config.base_url_or(HUGGINGFACE_BASE_URL));
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(FALLBACK_CAPACITY);
        Self {
            limiter: RateLimiter::new(config.min_interval),
            span: info_span!("provider", provider = HUGGINGFACE, model = %model_id),
            client: shared_client().clone(),
            retry: RetryConfig::default(),
            cache: Mutex::new(LruCache::new(capacity)),
            endpoint,
            model_id,
            config,
        }
    }

    /// Replace the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Hosted model in use
    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Number of cached classifications
    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    async fn post(&self, text: &str, labels: &[&str]) -> ProviderResult<Value> {
        let token = self
            .config
            .api_key()
            .ok_or_else(|| ProviderError::configuration(HUGGINGFACE, "API token is not set"))?;
        let body = json!({
            "inputs": text,
            "parameters": { "candidate_labels": labels },
        });

        self.limiter.acquire().await;
        let response = send_with_retry(
            || self.client.post(&self.endpoint).bearer_auth(token).json(&body),
            HUGGINGFACE,
            &self.retry,
        )
        .await?;
        read_json(ensure_success(response, HUGGINGFACE).await?, HUGGINGFACE, "classification response").await
    }

    async fn classify_text(&self, text: &str) -> ProviderResult<ClassificationResult> {
        let text = text.trim();
        if text.chars().count() < MIN_TEXT_LENGTH {
            return Err(ProviderError::invalid_input(
                HUGGINGFACE,
                format!("text must be at least {MIN_TEXT_LENGTH} characters"),
            ));
        }

        if let Some(hit) = self.cache.lock().await.get(text).cloned() {
            debug!("Classification cache hit");
            return Ok(hit);
        }

        let raw = self.post(text, &Cuisine::candidate_labels()).await?;
        let result = self.normalize(&raw)?;
        info!(
            cuisine = %result.primary_cuisine,
            confidence = result.confidence,
            "Text classified"
        );
        self.cache.lock().await.put(text.to_owned(), result.clone());
        Ok(result)
    }
}

impl std::fmt::Debug for HuggingFaceClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceClassifier")
            .field("model_id", &self.model_id)
            .field("endpoint", &self.endpoint)
            .field("has_api_key", &self.config.api_key().is_some())
            .finish_non_exhaustive()
    }
}

/// Registry constructor
///
/// # Errors
///
/// Never fails; the signature matches the registry factory type
pub fn create(config: ProviderConfig) -> ProviderResult<Arc<dyn CuisineClassifier>> {
    Ok(Arc::new(HuggingFaceClassifier::new(config)))
}

/// Ranked `(label, score)` pairs from either response layout:
/// `{labels: [...], scores: [...]}` or `[{label, score}, ...]`
fn ranked_labels(raw: &Value) -> Option<Vec<(String, f64)>> {
    match raw {
        Value::Object(map) => {
            let labels = map.get("labels")?.as_array()?;
            let scores = map.get("scores")?.as_array()?;
            Some(
                labels
                    .iter()
                    .zip(scores)
                    .filter_map(|(l, s)| Some((l.as_str()?.to_owned(), s.as_f64()?)))
                    .collect(),
            )
        }
        Value::Array(items) => {
            let first = items.first()?;
            if first.get("labels").is_some() {
                return ranked_labels(first);
            }
            Some(
                items
                    .iter()
                    .filter_map(|item| {
                        let label = item.get("label")?.as_str()?;
                        let score = item.get("score")?.as_f64()?;
                        Some((label.to_owned(), score))
                    })
                    .collect(),
            )
        }
        _ => None,
    }
}

#[async_trait]
impl Provider for HuggingFaceClassifier {
    fn name(&self) -> &str {
        HUGGINGFACE
    }

    fn validate_config(&self) -> bool {
        self.config.api_key().is_some() && !self.model_id.is_empty()
    }

    async fn is_available(&self) -> bool {
        let Some(token) = self.config.api_key() else {
            return false;
        };
        let body = json!({
            "inputs": HEALTH_CHECK_TEXT,
            "parameters": { "candidate_labels": HEALTH_CHECK_LABELS },
        });
        let check = health_check_client()
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .instrument(self.span.clone())
            .await;
        match check {
            Ok(response) => {
                let ready = response.status().is_success();
                if !ready {
                    warn!(parent: &self.span, status = response.status().as_u16(), "Model not ready");
                }
                ready
            }
            Err(err) => {
                warn!(parent: &self.span, error = %err, "Availability check failed");
                false
            }
        }
    }
}

#[async_trait]
impl CuisineClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> ProviderResult<ClassificationResult> {
        self.classify_text(text).instrument(self.span.clone()).await
    }

    fn normalize(&self, raw: &Value) -> Result<ClassificationResult, NormalizationError> {
        let mut ranked = ranked_labels(raw)
            .ok_or_else(|| NormalizationError::new(HUGGINGFACE, "expected labels and scores", raw))?;
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        let Some((primary, confidence)) = ranked.first() else {
            return Err(NormalizationError::new(HUGGINGFACE, "no labels returned", raw));
        };
        let alternatives = ranked
            .iter()
            .skip(1)
            .take(MAX_ALTERNATIVES)
            .map(|(label, score)| CuisineAlternative::new(Cuisine::from_label(label), *score))
            .collect();

        Ok(
            ClassificationResult::new(Cuisine::from_label(primary), *confidence, HUGGINGFACE)
                .with_alternatives(alternatives)
                .with_reasoning(format!("Zero-shot classification via {}", self.model_id)),
        )
    }
}
