// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use shopkeep_config::AgentDefinition;
use shopkeep_tools::ToolRegistry;
use tracing::debug;

use crate::{builtin_agents, Agent, RegistryError};

/// Every agent persona, keyed by name, plus the one conversations start with.
#[derive(Debug)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<Agent>>,
    start: Arc<Agent>,
}

impl AgentRegistry {
    /// Build the registry from config definitions, falling back to
    /// [`builtin_agents`] when `definitions` is empty.
    ///
    /// Each entry in an agent's `transfers` is registered in `tools` as a
    /// `transfer_to_<target>` tool and appended to that agent's tool list.
    pub fn from_config(
        definitions: &[AgentDefinition],
        start_agent: &str,
        default_model: &str,
        tools: &mut ToolRegistry,
    ) -> Result<Self, RegistryError> {
        let builtin;
        let definitions = if definitions.is_empty() {
            builtin = builtin_agents();
            &builtin[..]
        } else {
            definitions
        };

        let mut names = HashSet::new();
        for def in definitions {
            if !names.insert(def.name.as_str()) {
                return Err(RegistryError::DuplicateAgent(def.name.clone()));
            }
        }

        let mut agents = HashMap::new();
        for def in definitions {
            let mut agent_tools = Vec::with_capacity(def.tools.len() + def.transfers.len());
            for tool in &def.tools {
                if !tools.contains(tool) {
                    return Err(RegistryError::UnknownTool {
                        agent: def.name.clone(),
                        tool: tool.clone(),
                    });
                }
                agent_tools.push(tool.clone());
            }
            for target in &def.transfers {
                if !names.contains(target.as_str()) {
                    return Err(RegistryError::UnknownTransferTarget {
                        agent: def.name.clone(),
                        target: target.clone(),
                    });
                }
                agent_tools.push(tools.register_transfer(target)?);
            }

            let agent = Agent {
                name: def.name.clone(),
                instructions: def.instructions.clone(),
                model: def.model.clone().unwrap_or_else(|| default_model.to_string()),
                tools: agent_tools,
            };
            debug!(agent = %agent.name, model = %agent.model, tools = ?agent.tools, "registered agent");
            agents.insert(agent.name.clone(), Arc::new(agent));
        }

        let start = agents
            .get(start_agent)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownStartAgent(start_agent.to_string()))?;

        Ok(Self { agents, start })
    }

    pub fn get(&self, name: &str) -> Option<Arc<Agent>> {
        self.agents.get(name).cloned()
    }

    /// The agent a new conversation starts with.
    pub fn start(&self) -> Arc<Agent> {
        Arc::clone(&self.start)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.agents.keys().cloned().collect();
        names.sort();
        names
    }
}
