use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::Serialize;

use crate::Result;

/// Ordered, finite sequence of text fragments produced for one request.
pub type FragmentStream = BoxStream<'static, Result<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync + std::fmt::Debug {
    /// Name of the backend, for logs
    fn name(&self) -> &str;

    /// Submit a conversation and receive the reply fragment by fragment
    async fn stream(&self, messages: &[ChatMessage]) -> Result<FragmentStream>;
}
