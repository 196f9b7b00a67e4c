// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use shopkeep_model::{CompletionRequest, Message, ModelProvider, ToolCallRequest, ToolSchema};
use shopkeep_store::Store;
use shopkeep_tools::{ToolCall, ToolError, ToolOutcome, ToolRegistry};

use crate::{Agent, AgentEvent, AgentRegistry, TurnError};

/// Tool message content recorded when the conversation moves to `agent`.
pub fn transfer_confirmation(agent: &str) -> String {
    format!("Transferred to {agent}. Adopt persona immediately.")
}

/// Result of one completed turn.
#[derive(Debug, Clone)]
pub struct TurnResponse {
    /// The agent active when the turn ended.
    pub agent: Arc<Agent>,
    /// Messages appended during the turn, in order.  Never contains the
    /// synthesized system message nor the user message that started it.
    pub messages: Vec<Message>,
}

/// Drives the model ↔ tool loop for one user turn.
pub struct TurnRunner {
    model: Arc<dyn ModelProvider>,
    tools: Arc<ToolRegistry>,
    agents: Arc<AgentRegistry>,
    store: Arc<Store>,
}

impl TurnRunner {
    pub fn new(
        model: Arc<dyn ModelProvider>,
        tools: Arc<ToolRegistry>,
        agents: Arc<AgentRegistry>,
        store: Arc<Store>,
    ) -> Self {
        Self { model, tools, agents, store }
    }

    /// Run one turn starting with `agent`.  `transcript` is the conversation
    /// so far and ends with the new user message.
    ///
    /// Each iteration sends the active agent's instructions, the transcript
    /// plus everything appended so far, and the active agent's tool schemas.
    /// A reply without tool calls ends the turn.  Otherwise every call is run
    /// in order and its result appended as a tool message; a transfer switches
    /// the active agent for the rest of the turn.  The first failing call
    /// aborts the turn.
    pub async fn run(
        &self,
        agent: Arc<Agent>,
        transcript: &[Message],
        tx: mpsc::Sender<AgentEvent>,
    ) -> Result<TurnResponse, TurnError> {
        let mut active = agent;
        let mut appended: Vec<Message> = Vec::new();
        let mut rounds = 0u32;

        loop {
            rounds += 1;
            let tools = self.schemas_for(&active);

            let mut messages = Vec::with_capacity(transcript.len() + appended.len() + 1);
            messages.push(Message::system(active.instructions.as_str()));
            messages.extend_from_slice(transcript);
            messages.extend(appended.iter().cloned());

            debug!(
                agent = %active.name,
                model = %active.model,
                round = rounds,
                tool_count = tools.len(),
                "requesting completion"
            );
            let response = self
                .model
                .complete(CompletionRequest { model: active.model.clone(), messages, tools })
                .await
                .map_err(TurnError::Model)?;
            let reply = response.message;

            if let Some(text) = reply.as_text().filter(|t| !t.is_empty()) {
                let _ = tx
                    .send(AgentEvent::AssistantText {
                        agent: active.name.clone(),
                        text: text.to_string(),
                    })
                    .await;
            }

            let requests = reply.tool_calls().to_vec();
            appended.push(reply);
            if requests.is_empty() {
                break;
            }

            for request in &requests {
                let call = self.resolve(request)?;
                let _ = tx
                    .send(AgentEvent::ToolCallStarted {
                        agent: active.name.clone(),
                        call: call.clone(),
                    })
                    .await;

                let outcome = self
                    .tools
                    .execute(&self.store, &call)
                    .map_err(|source| TurnError::Tool { tool: call.name.clone(), source })?;

                let content = match outcome {
                    ToolOutcome::Data(text) => text,
                    ToolOutcome::Transfer(target) => {
                        let next = self
                            .agents
                            .get(&target)
                            .ok_or_else(|| TurnError::UnknownAgent(target.clone()))?;
                        info!(from = %active.name, to = %next.name, "agent transfer");
                        let _ = tx
                            .send(AgentEvent::AgentTransferred {
                                from: active.name.clone(),
                                to: next.name.clone(),
                            })
                            .await;
                        active = next;
                        transfer_confirmation(&active.name)
                    }
                };

                let _ = tx
                    .send(AgentEvent::ToolCallFinished {
                        call_id: call.id.clone(),
                        tool_name: call.name.clone(),
                        output: content.clone(),
                    })
                    .await;
                appended.push(Message::tool_result(call.id, content));
            }
        }

        let _ = tx.send(AgentEvent::TurnComplete).await;
        Ok(TurnResponse { agent: active, messages: appended })
    }

    /// Schemas offered while `agent` is active, in the agent's tool order.
    fn schemas_for(&self, agent: &Agent) -> Vec<ToolSchema> {
        self.tools
            .schemas_for(&agent.tools)
            .into_iter()
            .map(|s| ToolSchema {
                name: s.name,
                description: s.description,
                parameters: s.parameters,
            })
            .collect()
    }

    /// Look the call up in the full registry (not just the active agent's
    /// subset) and decode its arguments.
    fn resolve(&self, request: &ToolCallRequest) -> Result<ToolCall, TurnError> {
        let name = &request.function.name;
        if !self.tools.contains(name) {
            return Err(TurnError::Tool {
                tool: name.clone(),
                source: ToolError::UnknownTool(name.clone()),
            });
        }
        ToolCall::from_raw(&request.id, name, &request.function.arguments)
            .map_err(|source| TurnError::Tool { tool: name.clone(), source })
    }
}
