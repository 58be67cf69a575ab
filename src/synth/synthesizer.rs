use std::sync::Arc;
use std::time::Duration;

use crate::audit::PromptLog;
use crate::foundation::config::{PlaceholderSpec, RetryPolicy};
use crate::foundation::error::{PageError, PageResult};
use crate::render::raster::flat_fill;
use crate::synth::clock::Sleeper;
use crate::synth::deadline::{DeadlineOutcome, call_with_deadline};
use crate::synth::request::GenerationRequest;
use crate::synth::service::{ImageService, ServiceError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    EmptyResult,
    TransientError(String),
    Timeout,
}

/// What happened on one call to the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptRecord {
    /// 1-based tier index.
    pub tier: usize,
    /// 1-based attempt index within the tier.
    pub attempt_index: u32,
    pub outcome: AttemptOutcome,
}

#[derive(Clone, Debug)]
pub struct SynthesisResult {
    pub image: image::RgbaImage,
    /// A fallback tier or the placeholder produced `image`.
    pub degraded: bool,
    /// Tier that produced `image`; `None` for the placeholder.
    pub tier_used: Option<usize>,
    pub attempts: Vec<AttemptRecord>,
}

impl SynthesisResult {
    pub fn is_placeholder(&self) -> bool {
        self.tier_used.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynthesisPolicy {
    pub retry: RetryPolicy,
    pub placeholder: PlaceholderSpec,
}

/// Tiered, retrying, deadline-bounded image synthesis.
///
/// Every page yields an image: when all tiers are exhausted a flat
/// placeholder is returned. The only error is a precondition failure before
/// any attempt has been accepted (missing credentials, rejected key).
pub struct ImageSynthesizer {
    service: Arc<dyn ImageService>,
    sleeper: Box<dyn Sleeper>,
    audit: PromptLog,
    policy: SynthesisPolicy,
    calls_made: u64,
    preflight_passed: bool,
}

impl ImageSynthesizer {
    pub fn new(
        service: Arc<dyn ImageService>,
        sleeper: Box<dyn Sleeper>,
        audit: PromptLog,
        policy: SynthesisPolicy,
    ) -> PageResult<Self> {
        policy.retry.validate()?;
        Ok(Self {
            service,
            sleeper,
            audit,
            policy,
            calls_made: 0,
            preflight_passed: false,
        })
    }

    pub fn policy(&self) -> &SynthesisPolicy {
        &self.policy
    }

    /// Total service calls made by this synthesizer so far.
    pub fn calls_made(&self) -> u64 {
        self.calls_made
    }

    /// Tries each tier in order, up to `max_attempts_per_tier` times each.
    ///
    /// `tag` names the page in the audit log (`page_3`, `cover`); later tiers
    /// are logged as `<tag>.tier<k>`.
    #[tracing::instrument(skip(self, tiers), fields(service = self.service.name(), tiers = tiers.len()))]
    pub fn synthesize(
        &mut self,
        tag: &str,
        tiers: &[GenerationRequest],
    ) -> PageResult<SynthesisResult> {
        if !self.preflight_passed {
            self.service.preflight()?;
            self.preflight_passed = true;
        }

        let max_attempts = self.policy.retry.max_attempts_per_tier;
        let mut attempts = Vec::new();

        for (i, request) in tiers.iter().enumerate() {
            let tier = i + 1;
            let entry_tag = if tier == 1 {
                tag.to_string()
            } else {
                format!("{tag}.tier{tier}")
            };
            if let Err(err) = self.audit.record(&entry_tag, &request.full_text()) {
                tracing::warn!(tag = %entry_tag, error = %err, "failed to append prompt log entry");
            }

            for attempt_index in 1..=max_attempts {
                let first_call = self.calls_made == 0;
                self.calls_made += 1;

                match self.attempt(request) {
                    Ok(image) => {
                        attempts.push(AttemptRecord {
                            tier,
                            attempt_index,
                            outcome: AttemptOutcome::Success,
                        });
                        if tier > 1 {
                            tracing::warn!(tier, "image produced by fallback tier");
                        }
                        return Ok(SynthesisResult {
                            image,
                            degraded: tier > 1,
                            tier_used: Some(tier),
                            attempts,
                        });
                    }
                    Err(Failure::Unauthorized(msg)) if first_call => {
                        return Err(PageError::precondition(format!(
                            "{} rejected the credentials: {msg}",
                            self.service.name()
                        )));
                    }
                    Err(failure) => {
                        let outcome = failure.into_outcome();
                        tracing::warn!(tier, attempt = attempt_index, outcome = ?outcome, "image attempt failed");
                        attempts.push(AttemptRecord {
                            tier,
                            attempt_index,
                            outcome,
                        });
                    }
                }

                if attempt_index < max_attempts {
                    self.sleeper
                        .sleep(backoff(self.policy.retry.backoff_unit, attempt_index));
                }
            }
        }

        tracing::warn!(attempts = attempts.len(), "all tiers exhausted; using placeholder");
        Ok(SynthesisResult {
            image: flat_fill(self.policy.placeholder.size, self.policy.placeholder.color),
            degraded: true,
            tier_used: None,
            attempts,
        })
    }

    fn attempt(&self, request: &GenerationRequest) -> Result<image::RgbaImage, Failure> {
        let service = Arc::clone(&self.service);
        let request = request.clone();
        let outcome = call_with_deadline(self.policy.retry.per_attempt_timeout, move || {
            service.submit(&request)
        });

        match outcome {
            DeadlineOutcome::Completed(Ok(bytes)) if bytes.is_empty() => Err(Failure::Empty),
            DeadlineOutcome::Completed(Ok(bytes)) => image::load_from_memory(&bytes)
                .map(|decoded| decoded.to_rgba8())
                .map_err(|err| Failure::Transient(format!("undecodable image bytes: {err}"))),
            DeadlineOutcome::Completed(Err(ServiceError::Unauthorized(msg))) => {
                Err(Failure::Unauthorized(msg))
            }
            DeadlineOutcome::Completed(Err(ServiceError::Transient(msg))) => {
                Err(Failure::Transient(msg))
            }
            DeadlineOutcome::Expired => Err(Failure::Timeout),
            DeadlineOutcome::Abandoned(msg) => Err(Failure::Transient(msg)),
        }
    }
}

enum Failure {
    Empty,
    Transient(String),
    Unauthorized(String),
    Timeout,
}

impl Failure {
    fn into_outcome(self) -> AttemptOutcome {
        match self {
            Self::Empty => AttemptOutcome::EmptyResult,
            Self::Transient(msg) => AttemptOutcome::TransientError(msg),
            Self::Unauthorized(msg) => AttemptOutcome::TransientError(format!("unauthorized: {msg}")),
            Self::Timeout => AttemptOutcome::Timeout,
        }
    }
}

fn backoff(unit: Duration, attempt_index: u32) -> Duration {
    unit.saturating_mul(attempt_index)
}
