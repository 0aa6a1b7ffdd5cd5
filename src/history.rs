use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: &str) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: &str) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: &str) -> Self {
        Self::new("assistant", content)
    }

    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// In-memory chat transcript for one run, opened by the role's system prompt
#[derive(Debug, Clone)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new(system_prompt: &str) -> Self {
        Self {
            turns: vec![ChatTurn::system(system_prompt)],
        }
    }

    pub fn add_user(&mut self, content: &str) {
        self.turns.push(ChatTurn::user(content));
    }

    pub fn add_assistant(&mut self, content: &str) {
        self.turns.push(ChatTurn::assistant(content));
    }

    /// Drop the most recent turn if it is an unanswered user message
    pub fn discard_pending_user(&mut self) {
        if self.turns.len() > 1 && self.turns.last().map(|t| t.role.as_str()) == Some("user") {
            self.turns.pop();
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
