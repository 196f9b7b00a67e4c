// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The interactive read-eval loop.
//!
//! One line of input is one user message.  While a turn runs, assistant text
//! and tool invocations are printed as `<agent>: ...` lines.  A failed turn is
//! reported and dropped; the loop keeps reading.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, error};

use shopkeep_core::{AgentEvent, Conversation, TurnRunner};

const PROMPT: &str = "User: ";
const STOP_WORD: &str = "stop";
const EVENT_BUFFER: usize = 64;

/// Read lines from `input` until `stop` or end of input.
pub async fn run<R, W>(
    conversation: &mut Conversation,
    runner: &TurnRunner,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line == STOP_WORD {
            break;
        }

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let (result, printed) =
            tokio::join!(conversation.submit(runner, line, tx), print_events(rx, out));
        printed?;

        if let Err(e) = result {
            error!(error = %e, "turn failed");
            writeln!(out, "Error: {e}")?;
        }
    }
    Ok(())
}

/// Print turn events until the sender side closes.
async fn print_events<W: Write>(mut rx: mpsc::Receiver<AgentEvent>, out: &mut W) -> io::Result<()> {
    while let Some(event) = rx.recv().await {
        match event {
            AgentEvent::AssistantText { agent, text } => writeln!(out, "{agent}: {text}")?,
            AgentEvent::ToolCallStarted { agent, call } => {
                writeln!(out, "{agent}: {}({})", call.name, call.args)?
            }
            AgentEvent::ToolCallFinished { call_id, tool_name, output } => {
                debug!(call_id = %call_id, tool = %tool_name, output = %output, "tool finished")
            }
            AgentEvent::AgentTransferred { from, to } => {
                debug!(from = %from, to = %to, "agent switched")
            }
            AgentEvent::TurnComplete => {}
        }
        out.flush()?;
    }
    Ok(())
}
