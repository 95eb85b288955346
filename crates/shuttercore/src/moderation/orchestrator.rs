//! Approval state machine
//!
//! A submission is Pending from `submit` until the first `decide` that finds
//! its token; from then on it is gone from the registry and every later press
//! for the same token is answered as expired. The record is taken out of the
//! registry at lookup time, so two presses racing on one token can never both
//! reach the channel.

use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

use crate::core::config::captions;
use crate::core::error::WatermarkError;
use crate::core::metrics;
use crate::core::types::{ChannelId, DecisionPressed, MessageRef, ModeratorId, SubmittedPhoto};
use crate::transport::Transport;
use crate::watermark::ImageTransform;

use super::decision::{Decision, DecisionAction, DecisionControls};
use super::registry::{Registry, SubmissionRecord, SubmissionToken};

/// Terminal result of one decision event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// Payload was not `approve_<token>` / `reject_<token>`; nothing happened
    Malformed,
    /// No pending submission under that token (already decided, expired or never issued)
    UnknownToken,
    Rejected,
    /// Posted with the watermark
    Posted,
    /// Watermarking failed, the original was posted
    PostedUnwatermarked,
    /// Original could not be downloaded; nothing was posted
    FetchFailed,
    /// Upload to the channel failed
    PostFailed,
}

impl DecisionOutcome {
    /// Metric label
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::Malformed => "malformed",
            DecisionOutcome::UnknownToken => "unknown_token",
            DecisionOutcome::Rejected => "rejected",
            DecisionOutcome::Posted => "posted",
            DecisionOutcome::PostedUnwatermarked => "posted_unwatermarked",
            DecisionOutcome::FetchFailed => "fetch_failed",
            DecisionOutcome::PostFailed => "post_failed",
        }
    }

    /// Whether something reached the channel
    pub fn is_posted(&self) -> bool {
        matches!(self, DecisionOutcome::Posted | DecisionOutcome::PostedUnwatermarked)
    }
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives submissions from arrival to a terminal state.
///
/// Cheap to clone; clones share the registry, transport and transform.
pub struct Orchestrator<T: Transport + ?Sized> {
    transport: Arc<T>,
    registry: Registry,
    channel: ChannelId,
    moderator: ModeratorId,
    transform: Arc<dyn ImageTransform>,
}

impl<T: Transport + ?Sized> Clone for Orchestrator<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            registry: self.registry.clone(),
            channel: self.channel.clone(),
            moderator: self.moderator,
            transform: Arc::clone(&self.transform),
        }
    }
}

impl<T: Transport + ?Sized> Orchestrator<T> {
    pub fn new(
        transport: Arc<T>,
        registry: Registry,
        channel: ChannelId,
        moderator: ModeratorId,
        transform: Arc<dyn ImageTransform>,
    ) -> Self {
        Self {
            transport,
            registry,
            channel,
            moderator,
            transform,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn moderator(&self) -> ModeratorId {
        self.moderator
    }

    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    /// Registers an inbound photo and puts it in front of the moderator.
    ///
    /// Never fails: if the moderator cannot be reached the record simply
    /// stays pending, and a failed acknowledgement is only logged.
    pub async fn submit(&self, photo: SubmittedPhoto) -> SubmissionToken {
        let SubmittedPhoto {
            submitter,
            chat,
            photo_ref,
        } = photo;

        let record = self.registry.register(photo_ref, submitter).await;
        metrics::SUBMISSIONS_TOTAL.inc();
        self.refresh_pending_gauge().await;
        log::info!("Photo from user {} pending as {}", submitter, record.token);

        let controls = DecisionControls::for_token(&record.token);
        if let Err(e) = self
            .transport
            .present_to_moderator(
                self.moderator,
                &record.photo_ref,
                &captions::review_card(submitter),
                &controls,
            )
            .await
        {
            metrics::record_transport_error("present");
            log::error!(
                "Failed to present submission {} to moderator {}: {}. It stays pending.",
                record.token,
                self.moderator,
                e
            );
        }

        if let Err(e) = self
            .transport
            .acknowledge_submitter(chat, captions::SUBMISSION_RECEIVED)
            .await
        {
            metrics::record_transport_error("acknowledge");
            log::warn!("Failed to acknowledge submission {} to user {}: {}", record.token, submitter, e);
        }

        record.token
    }

    /// Handles a decision button press.
    pub async fn decide(&self, event: DecisionPressed) -> DecisionOutcome {
        let outcome = self.resolve(event).await;
        metrics::DECISIONS_TOTAL.with_label_values(&[outcome.as_str()]).inc();
        outcome
    }

    async fn resolve(&self, event: DecisionPressed) -> DecisionOutcome {
        let Some(decision) = Decision::parse(&event.payload) else {
            log::warn!("Ignoring malformed decision payload {:?}", event.payload);
            return DecisionOutcome::Malformed;
        };

        let Some(record) = self.registry.remove(&decision.token).await else {
            log::info!("Decision {} for unknown or expired token {}", decision.action, decision.token);
            self.edit(event.message.as_ref(), captions::EXPIRED).await;
            return DecisionOutcome::UnknownToken;
        };
        self.refresh_pending_gauge().await;

        let outcome = match decision.action {
            DecisionAction::Reject => {
                self.edit(event.message.as_ref(), captions::REJECTED).await;
                DecisionOutcome::Rejected
            }
            DecisionAction::Approve => self.approve(&record, event.message.as_ref()).await,
        };

        log::info!(
            "Submission {} from user {} resolved: {}",
            record.token,
            record.submitter,
            outcome
        );
        outcome
    }

    async fn approve(&self, record: &SubmissionRecord, message: Option<&MessageRef>) -> DecisionOutcome {
        self.edit(message, captions::POSTING).await;

        let original = match self.transport.fetch_bytes(&record.photo_ref).await {
            Ok(bytes) => bytes,
            Err(e) => {
                metrics::record_transport_error("fetch");
                log::error!("Failed to download photo for submission {}: {}", record.token, e);
                self.edit(message, captions::FETCH_FAILED).await;
                return DecisionOutcome::FetchFailed;
            }
        };

        let (image, watermarked) = match self.stamp(original.clone()).await {
            Ok(stamped) => (Bytes::from(stamped), true),
            Err(e) => {
                metrics::WATERMARK_FAILURES_TOTAL.with_label_values(&[e.kind()]).inc();
                log::warn!("Watermark failed for submission {}, posting original: {}", record.token, e);
                (original, false)
            }
        };

        if let Err(e) = self
            .transport
            .post_to_channel(&self.channel, image, captions::POST_CAPTION)
            .await
        {
            metrics::record_transport_error("post");
            log::error!("Failed to post submission {} to {}: {}", record.token, self.channel, e);
            self.edit(message, captions::POST_FAILED).await;
            return DecisionOutcome::PostFailed;
        }

        if watermarked {
            self.edit(message, captions::POSTED).await;
            DecisionOutcome::Posted
        } else {
            self.edit(message, captions::POSTED_UNWATERMARKED).await;
            DecisionOutcome::PostedUnwatermarked
        }
    }

    /// Runs the transform on the blocking pool. A panicking transform is
    /// reported as `WatermarkError::Task`.
    async fn stamp(&self, original: Bytes) -> Result<Vec<u8>, WatermarkError> {
        let transform = Arc::clone(&self.transform);
        let _timer = metrics::WATERMARK_DURATION_SECONDS.start_timer();
        tokio::task::spawn_blocking(move || transform.apply(&original))
            .await
            .map_err(|e| WatermarkError::Task(e.to_string()))?
    }

    /// Best-effort edit of the review card; skipped when Telegram did not
    /// hand us an accessible message.
    async fn edit(&self, message: Option<&MessageRef>, text: &str) {
        let Some(message) = message else {
            log::debug!("Review card not accessible, skipping edit: {}", text);
            return;
        };
        if let Err(e) = self.transport.edit_caption(message, text).await {
            metrics::record_transport_error("edit");
            log::warn!("Failed to edit review card {}/{}: {}", message.chat, message.message_id, e);
        }
    }

    async fn refresh_pending_gauge(&self) {
        metrics::PENDING_SUBMISSIONS.set(self.registry.len().await as f64);
    }
}
