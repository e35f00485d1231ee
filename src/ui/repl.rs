use crate::agent::{ChatAgent, TurnReply};
use crate::error::ChatError;
use crate::events::AppEvent;
use crate::ui::commands::{get_help_text, interpret};
use crate::ui::panels;
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// What the loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Apply one event to the agent and print the outcome
pub async fn handle_event<W: Write>(
    agent: &mut ChatAgent,
    event: AppEvent,
    out: &mut W,
) -> Result<Flow> {
    match event {
        AppEvent::SubmitPrompt { text } => {
            let outcome = agent.submit_prompt(&text).await;
            print_outcome(outcome, out)?;
        }
        AppEvent::SubmitExample { index } => {
            let outcome = agent.submit_example(index).await;
            match outcome {
                Some(outcome) => print_outcome(outcome, out)?,
                None => writeln!(
                    out,
                    "No example #{index} in category '{}'.",
                    agent.sessions_mut().active_category()
                )?,
            }
        }
        AppEvent::SelectCategory { name } => {
            agent.select_category(&name);
            writeln!(out, "{}", panels::examples(&name))?;
        }
        AppEvent::ListCategories => {
            writeln!(out, "{}", panels::categories(agent.sessions_mut().active_category()))?;
        }
        AppEvent::ShowExamples => {
            writeln!(out, "{}", panels::examples(agent.sessions_mut().active_category()))?;
        }
        AppEvent::NewSession => {
            agent.new_session();
            writeln!(out, "♻️  New session: {}", agent.sessions_mut().session_id())?;
        }
        AppEvent::ShowRaw => writeln!(out, "{}", panels::raw_response(agent.sessions()))?,
        AppEvent::ShowData => writeln!(out, "{}", panels::secondary_data(agent.sessions()))?,
        AppEvent::ShowDebug => writeln!(out, "{}", panels::debug_info(agent.sessions()))?,
        AppEvent::ShowSession => writeln!(out, "Session ID: {}", agent.sessions_mut().session_id())?,
        AppEvent::ShowHistory => writeln!(out, "{}", panels::transcript(agent.sessions()))?,
        AppEvent::ShowHelp => writeln!(out, "{}", get_help_text())?,
        AppEvent::ExitRequest => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

fn print_outcome<W: Write>(
    outcome: std::result::Result<TurnReply, ChatError>,
    out: &mut W,
) -> Result<()> {
    match outcome {
        Ok(reply) => writeln!(out, "{}", panels::reply(&reply))?,
        // Blank input is dropped without a word
        Err(ChatError::EmptyInput) => {}
        Err(err) => writeln!(out, "❌ {err}")?,
    }
    Ok(())
}

/// Interactive loop over stdin until EOF or /bye
pub async fn run(agent: &mut ChatAgent) -> Result<()> {
    let mut stdout = std::io::stdout();
    let banner = panels::banner(agent.sessions_mut().session_id());
    writeln!(stdout, "{banner}\n")?;
    writeln!(stdout, "{}\n", panels::examples(agent.sessions_mut().active_category()))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(stdout, "👤 ")?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read user input")? else {
            writeln!(stdout)?;
            break;
        };

        let event = match interpret(&line) {
            Ok(event) => event,
            Err(message) => {
                writeln!(stdout, "{message}")?;
                continue;
            }
        };

        if handle_event(agent, event, &mut stdout).await? == Flow::Exit {
            writeln!(stdout, "👋 Bye!")?;
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::testing::ScriptedBackend;
    use serde_json::json;

    async fn run_events(agent: &mut ChatAgent, lines: &[&str]) -> (String, Flow) {
        let mut out = Vec::new();
        let mut flow = Flow::Continue;
        for line in lines {
            let event = interpret(line).unwrap();
            flow = handle_event(agent, event, &mut out).await.unwrap();
        }
        (String::from_utf8(out).unwrap(), flow)
    }

    #[tokio::test]
    async fn prompt_prints_normalized_reply() {
        let backend = ScriptedBackend::with(vec![Ok(json!([{"response": {"display_text": "Blue", "full_data": {"hex": "#009999"}}}]))]);
        let mut agent = ChatAgent::new(&Config::default(), backend);

        let (out, flow) = run_events(&mut agent, &["What color?", "/data"]).await;

        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("🤖 Blue"));
        assert!(out.contains("#009999"));
    }

    #[tokio::test]
    async fn blank_prompt_prints_nothing() {
        let backend = ScriptedBackend::with(vec![]);
        let mut agent = ChatAgent::new(&Config::default(), backend.clone());

        let (out, _) = run_events(&mut agent, &["   "]).await;
        assert!(out.is_empty());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn new_session_resets_state() {
        let backend = ScriptedBackend::with(vec![Ok(json!({"response": "a"}))]);
        let mut agent = ChatAgent::new(&Config::default(), backend);

        let (out, _) = run_events(&mut agent, &["q", "/new", "/raw"]).await;

        assert!(out.contains("New session"));
        assert!(out.ends_with(&format!("{}\n", panels::NO_RESPONSE_YET)));
        assert!(agent.sessions().messages().is_empty());
    }

    #[tokio::test]
    async fn category_switch_and_missing_example() {
        let backend = ScriptedBackend::with(vec![]);
        let mut agent = ChatAgent::new(&Config::default(), backend.clone());

        let (out, _) = run_events(&mut agent, &["/category Elsewhere", "/example 1"]).await;

        assert!(out.contains("no examples"));
        assert!(out.contains("No example #1 in category 'Elsewhere'"));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn history_lists_both_sides_of_each_turn() {
        let backend = ScriptedBackend::with(vec![Ok(json!({"response": "Teal"}))]);
        let mut agent = ChatAgent::new(&Config::default(), backend);

        let (out, _) = run_events(&mut agent, &["/history"]).await;
        assert_eq!(out, format!("{}\n", panels::NO_MESSAGES_YET));

        let (out, _) = run_events(&mut agent, &["Brand color?", "/history"]).await;
        assert!(out.ends_with("👤 Brand color?\n🤖 Teal\n"), "{out}");
    }

    #[tokio::test]
    async fn bye_exits() {
        let backend = ScriptedBackend::with(vec![]);
        let mut agent = ChatAgent::new(&Config::default(), backend);
        let (_, flow) = run_events(&mut agent, &["/bye"]).await;
        assert_eq!(flow, Flow::Exit);
    }
}
