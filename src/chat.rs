//! In-memory chat session: one document, an append-only transcript.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::engine::{self, EditOptions};
use crate::error::UploadError;
use crate::upload::{self, UploadKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionConfig {
    pub edit: EditOptions,
    /// Pause before each assistant reply is delivered.
    pub response_delay: Duration,
}

#[derive(Debug, Default)]
pub struct ChatSession {
    config: SessionConfig,
    document: String,
    messages: Vec<ChatMessage>,
    images: Vec<PathBuf>,
}

impl ChatSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn load_markup(&mut self, markup: impl Into<String>) {
        self.document = markup.into();
    }

    /// Accepts a diagram or a reference image. An unreadable diagram leaves
    /// the document empty; only unsupported file types are errors.
    pub fn load_file(&mut self, path: &Path) -> Result<UploadKind, UploadError> {
        let kind = upload::classify_upload(path)?;
        match kind {
            UploadKind::Diagram => {
                self.document = upload::read_diagram(path).unwrap_or_else(|e| {
                    warn!(error = %e, "diagram upload unreadable, starting empty");
                    String::new()
                });
                info!(path = %path.display(), bytes = self.document.len(), "diagram loaded");
            }
            UploadKind::Image => self.images.push(path.to_path_buf()),
        }
        Ok(kind)
    }

    /// Handles one user turn and returns the assistant's reply. Blank input is
    /// ignored.
    pub fn submit(&mut self, instruction: &str) -> Option<&ChatMessage> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return None;
        }
        self.push(Role::User, instruction.to_string());

        let outcome = engine::apply_instruction(&self.document, instruction, &self.config.edit);
        let text = engine::reply(&outcome, &self.document);
        if outcome.applied() {
            self.document = outcome.markup;
        }

        if !self.config.response_delay.is_zero() {
            std::thread::sleep(self.config.response_delay);
        }
        self.push(Role::Assistant, text);
        self.messages.last()
    }

    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|message| {
                let who = match message.role {
                    Role::User => "you",
                    Role::Assistant => "assistant",
                };
                format!("[{}] {who}: {}", message.timestamp.format("%H:%M:%S"), message.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push(&mut self, role: Role, text: String) {
        self.messages.push(ChatMessage {
            role,
            text,
            timestamp: Utc::now(),
        });
    }
}
