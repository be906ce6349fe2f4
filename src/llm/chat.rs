use crate::error::Result;
use crate::llm::prompts::chat_prompt;
use crate::llm::{describe_failure, TextModel};
use crate::render::to_markdown;
use crate::schema::{AnalyzedTable, ChatMessage};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub const GREETING: &str =
    "Hello! The statement is loaded. What would you like to know about it?";

/// Transcript of one Q&A session. Append-only; messages are never reordered
/// or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Starts a session with the assistant greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
        }
    }

    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}

/// Answers questions about one analyzed statement.
pub struct ChatAssistant<M> {
    model: M,
}

impl<M: TextModel> ChatAssistant<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Sends `question` with the full table and records the exchange.
    ///
    /// The question and the reply are appended as a pair. A model failure is
    /// recorded as the assistant's reply text. Only a missing credential is
    /// returned as an error, in which case nothing is appended.
    pub async fn ask<'c>(
        &self,
        conversation: &'c mut Conversation,
        table: &AnalyzedTable,
        question: &str,
    ) -> Result<&'c ChatMessage> {
        self.model.ensure_ready()?;

        conversation.push(ChatMessage::user(question));

        let prompt = chat_prompt(&to_markdown(table), question);
        debug!("Chat turn {} with {} byte prompt", conversation.len(), prompt.len());

        let reply = match self.model.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Chat request failed: {}", e);
                describe_failure("the chat", &e)
            }
        };

        conversation.push(ChatMessage::assistant(reply));
        Ok(&conversation.messages[conversation.messages.len() - 1])
    }
}
