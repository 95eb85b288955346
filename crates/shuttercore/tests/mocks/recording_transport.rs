//! Transport that records calls instead of talking to Telegram
//!
//! Fetches are served from photos registered with `with_photo`; any
//! operation can be switched to fail.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use shuttercore::core::error::{TransportError, TransportResult};
use shuttercore::core::types::{ChannelId, ChatRef, MessageRef, ModeratorId, PhotoRef};
use shuttercore::moderation::DecisionControls;
use shuttercore::Transport;

/// Transport operation, used to inject failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Present,
    Acknowledge,
    Edit,
    Post,
    Fetch,
}

/// One recorded outbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Present {
        moderator: ModeratorId,
        photo: PhotoRef,
        caption: String,
        controls: DecisionControls,
    },
    Acknowledge {
        chat: ChatRef,
        text: String,
    },
    Edit {
        message: MessageRef,
        text: String,
    },
    Post {
        channel: ChannelId,
        image: Vec<u8>,
        caption: String,
    },
    Fetch {
        photo: PhotoRef,
    },
}

#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    photos: Mutex<HashMap<PhotoRef, Bytes>>,
    failing: Mutex<HashSet<Operation>>,
    fetch_delay: Mutex<Option<Duration>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `photo` downloadable with the given content
    pub fn with_photo(self, photo: &str, content: &[u8]) -> Self {
        self.photos
            .lock()
            .unwrap()
            .insert(PhotoRef(photo.to_string()), Bytes::copy_from_slice(content));
        self
    }

    /// Every call of `operation` returns an error from now on
    pub fn failing(self, operation: Operation) -> Self {
        self.failing.lock().unwrap().insert(operation);
        self
    }

    /// Holds every fetch for `delay`, to widen race windows
    pub fn with_fetch_delay(self, delay: Duration) -> Self {
        *self.fetch_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<(ChannelId, Vec<u8>, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Post {
                    channel,
                    image,
                    caption,
                } => Some((channel, image, caption)),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Edit { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn presented(&self) -> Vec<DecisionControls> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Present { controls, .. } => Some(controls),
                _ => None,
            })
            .collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Fetch { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, operation: Operation) -> TransportResult<()> {
        if self.failing.lock().unwrap().contains(&operation) {
            return Err(TransportError::Request(format!("{:?} failed (injected)", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn present_to_moderator(
        &self,
        moderator: ModeratorId,
        photo: &PhotoRef,
        caption: &str,
        controls: &DecisionControls,
    ) -> TransportResult<()> {
        self.record(Call::Present {
            moderator,
            photo: photo.clone(),
            caption: caption.to_string(),
            controls: controls.clone(),
        });
        self.check(Operation::Present)
    }

    async fn acknowledge_submitter(&self, chat: ChatRef, text: &str) -> TransportResult<()> {
        self.record(Call::Acknowledge {
            chat,
            text: text.to_string(),
        });
        self.check(Operation::Acknowledge)
    }

    async fn edit_caption(&self, message: &MessageRef, text: &str) -> TransportResult<()> {
        self.record(Call::Edit {
            message: *message,
            text: text.to_string(),
        });
        self.check(Operation::Edit)
    }

    async fn post_to_channel(&self, channel: &ChannelId, image: Bytes, caption: &str) -> TransportResult<()> {
        self.record(Call::Post {
            channel: channel.clone(),
            image: image.to_vec(),
            caption: caption.to_string(),
        });
        self.check(Operation::Post)
    }

    async fn fetch_bytes(&self, photo: &PhotoRef) -> TransportResult<Bytes> {
        self.record(Call::Fetch { photo: photo.clone() });
        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(&Operation::Fetch) {
            return Err(TransportError::Download("file is no longer available (injected)".to_string()));
        }
        self.photos
            .lock()
            .unwrap()
            .get(photo)
            .cloned()
            .ok_or_else(|| TransportError::Download(format!("unknown file {}", photo)))
    }
}
