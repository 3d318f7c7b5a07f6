use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use futures_util::stream::{self, StreamExt};
use sn_core::{ChatMessage, Error, FragmentStream, Result, TextGenerator};

const CANNED_ARTICLE: [&str; 5] = [
    "Shares of XYZ ",
    "drew steady interest today. ",
    "The company, XYZ, ",
    "kept investors watching as xyz stock ",
    "traded through the session.",
];

/// Offline generator that replays a scripted reply.
pub struct DummyModel {
    fragments: Vec<String>,
    failure: Option<String>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<ChatMessage>>,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel")
            .field("fragments", &self.fragments.len())
            .field("failure", &self.failure)
            .finish()
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new(CANNED_ARTICLE.iter().map(|s| s.to_string()).collect())
    }
}

impl DummyModel {
    pub fn new(fragments: Vec<String>) -> Self {
        Self {
            fragments,
            failure: None,
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    /// Replays `fragments`, then fails with `message`. With no fragments the
    /// failure happens before any stream is returned.
    pub fn failing(fragments: Vec<String>, message: impl Into<String>) -> Self {
        Self { failure: Some(message.into()), ..Self::new(fragments) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl TextGenerator for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn stream(&self, messages: &[ChatMessage]) -> Result<FragmentStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_messages.lock() {
            *last = messages.to_vec();
        }

        let mut items: Vec<Result<String>> = self.fragments.iter().cloned().map(Ok).collect();
        if let Some(message) = &self.failure {
            if items.is_empty() {
                return Err(Error::GenerationFailed(message.clone()));
            }
            items.push(Err(Error::GenerationFailed(message.clone())));
        }
        Ok(stream::iter(items).boxed())
    }
}
