// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod agent;
mod agents;
mod error;
mod events;
mod prompts;
mod session;
mod turn;

pub use agent::Agent;
pub use agents::AgentRegistry;
pub use error::{RegistryError, TurnError};
pub use events::AgentEvent;
pub use prompts::builtin_agents;
pub use session::Conversation;
pub use turn::{transfer_confirmation, TurnResponse, TurnRunner};
