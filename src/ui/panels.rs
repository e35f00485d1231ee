//! Plain-text panels printed by the REPL

use crate::agent::TurnReply;
use crate::events::ConversationRole;
use crate::prompts;
use crate::session::SessionManager;
use serde_json::Value;

pub const NO_RESPONSE_YET: &str = "No API response yet. Start by asking a question.";
pub const NO_MESSAGES_YET: &str = "No messages yet.";

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Greeting shown when the REPL starts
pub fn banner(session_id: &str) -> String {
    format!(
        "🤖 Knowledge Assistant\n\
         Ask questions, or try the example prompts for a use case category.\n\
         Your question and the conversation so far are sent to the orchestration\n\
         backend, which retrieves and reasons across the connected knowledge sources.\n\n\
         Session: {session_id}\n\
         Type /help for commands."
    )
}

pub fn categories(active: &str) -> String {
    let mut out = String::from("Use case categories:\n");
    for category in prompts::categories() {
        let marker = if category.key == active { "*" } else { " " };
        out.push_str(&format!(
            " {marker} {} - {}\n     {}\n",
            category.key, category.title, category.blurb
        ));
    }
    out.push_str("\nSelect one with /category <name>.");
    out
}

pub fn examples(active: &str) -> String {
    let mut out = format!("Example prompts for: {active}\n");
    let prompts = prompts::examples_for(active);
    if prompts.is_empty() {
        out.push_str("  (no examples for this category)");
        return out;
    }
    for (i, prompt) in prompts.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, prompt));
    }
    out.push_str("Send one with /example <n>.");
    out
}

pub fn reply(reply: &TurnReply) -> String {
    let mut out = format!("{} {}", role_icon(ConversationRole::Assistant), reply.display.display_text);
    if reply.from_cache {
        out.push_str("\n   (cached)");
    }
    if reply.display.secondary_data.is_some() {
        out.push_str("\n   (full data available: /data)");
    }
    out
}

pub fn role_icon(role: ConversationRole) -> &'static str {
    match role {
        ConversationRole::User => "👤",
        ConversationRole::Assistant => "🤖",
    }
}

/// Last raw backend response, as the sidebar shows it
pub fn raw_response(sessions: &SessionManager) -> String {
    match sessions.last_full_data() {
        Some(raw) => format!("Raw API Response\n{}", pretty(raw)),
        None => NO_RESPONSE_YET.to_string(),
    }
}

pub fn secondary_data(sessions: &SessionManager) -> String {
    match sessions.last_secondary_data() {
        Some(data) => pretty(data),
        None => "The last response carried no full_data.".to_string(),
    }
}

pub fn debug_info(sessions: &SessionManager) -> String {
    format!("Session State\n{}", pretty(&sessions.debug_state()))
}

/// Whole conversation, oldest first
pub fn transcript(sessions: &SessionManager) -> String {
    if sessions.messages().is_empty() {
        return NO_MESSAGES_YET.to_string();
    }
    sessions
        .messages()
        .iter()
        .map(|m| format!("{} {}", role_icon(m.role), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::DerivedDisplay;
    use serde_json::json;

    #[test]
    fn raw_panel_before_and_after_first_call() {
        let mut sessions = SessionManager::new("Brandville");
        sessions.init();
        assert_eq!(raw_response(&sessions), NO_RESPONSE_YET);

        sessions.begin_turn("q").unwrap();
        sessions.complete_turn(
            json!({"response": "a"}),
            DerivedDisplay {
                display_text: "a".into(),
                secondary_data: None,
            },
        );
        assert!(raw_response(&sessions).contains("\"response\": \"a\""));
        assert_eq!(transcript(&sessions), "👤 q\n🤖 a");
    }

    #[test]
    fn examples_panel_handles_unknown_category() {
        assert!(examples("Brandville").contains("1. What is the Siemens logo?"));
        assert!(examples("Other").contains("no examples"));
    }

    #[test]
    fn categories_panel_marks_active() {
        let text = categories("Brandville");
        assert!(text.contains("* Brandville"));
        assert!(text.contains("  DXCompetitiveInformation"));
    }

    #[test]
    fn reply_mentions_cache_and_data() {
        let text = reply(&TurnReply {
            display: DerivedDisplay {
                display_text: "Hi".into(),
                secondary_data: Some(json!({})),
            },
            from_cache: true,
            transport_failed: false,
        });
        assert!(text.starts_with("🤖 Hi"));
        assert!(text.contains("(cached)"));
        assert!(text.contains("/data"));
    }
}
