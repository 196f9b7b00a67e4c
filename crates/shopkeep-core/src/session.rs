// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use shopkeep_model::Message;
use tokio::sync::mpsc;
use tracing::warn;

use crate::{Agent, AgentEvent, TurnError, TurnRunner};

/// The running conversation: the active agent and the transcript.
///
/// The transcript never holds system messages; each request gets the
/// active agent's instructions prepended by the [`TurnRunner`].
#[derive(Debug)]
pub struct Conversation {
    agent: Arc<Agent>,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(agent: Arc<Agent>) -> Self {
        Self { agent, messages: Vec::new() }
    }

    pub fn agent(&self) -> &Arc<Agent> {
        &self.agent
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Append `input` as a user message and run one turn.
    ///
    /// On success the turn's messages are kept and the agent that ended the
    /// turn becomes active.  On failure the transcript and agent are left
    /// exactly as they were before the call.
    pub async fn submit(
        &mut self,
        runner: &TurnRunner,
        input: &str,
        tx: mpsc::Sender<AgentEvent>,
    ) -> Result<(), TurnError> {
        self.messages.push(Message::user(input));
        match runner.run(Arc::clone(&self.agent), &self.messages, tx).await {
            Ok(response) => {
                self.agent = response.agent;
                self.messages.extend(response.messages);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "turn failed; discarding it");
                self.messages.pop();
                Err(e)
            }
        }
    }
}
