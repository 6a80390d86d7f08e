//! Fixed system instruction injected by the relay.

use crate::models::{ChatMessage, Role};

/// ExploreMore agency briefing sent ahead of every conversation.
pub const SYSTEM_PROMPT: &str = include_str!("system.md");

/// The system message placed at position 0 of every upstream request.
pub fn system_message() -> ChatMessage {
    ChatMessage::system(SYSTEM_PROMPT)
}

/// Prepend the system message to caller-supplied turns.
///
/// Caller turns are kept verbatim and in order, including any `system` turns
/// the caller chose to send.
pub fn with_system_prompt(turns: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(turns.len() + 1);
    messages.push(system_message());
    messages.extend(turns);
    messages
}

/// Whether `message` is the injected system instruction.
pub fn is_system_prompt(message: &ChatMessage) -> bool {
    message.role == Role::System && message.content == SYSTEM_PROMPT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mentions_agency() {
        assert!(SYSTEM_PROMPT.starts_with("Welcome to ExploreMore Travel Agency!"));
        assert!(SYSTEM_PROMPT.contains("support@exploremoretravel.com"));
    }

    #[test]
    fn prepends_exactly_one_system_message() {
        let turns = vec![ChatMessage::user("Hi"), ChatMessage::assistant("Hello")];
        let messages = with_system_prompt(turns.clone());
        assert_eq!(messages.len(), 3);
        assert!(is_system_prompt(&messages[0]));
        assert_eq!(&messages[1..], &turns[..]);
    }

    #[test]
    fn empty_turns_still_get_prompt() {
        let messages = with_system_prompt(Vec::new());
        assert_eq!(messages, vec![system_message()]);
    }
}
