//! Prompt assembly: system instruction, then history, then the new question.

use crate::history::HistoryWindow;
use crate::message::Message;

/// Assemble the outbound message sequence for one request.
///
/// The result is always `history.message_count() + 2` messages long: the
/// system prompt first (even when empty), the new user input last. Text is
/// copied verbatim.
pub fn build(system_prompt: &str, history: &HistoryWindow<'_>, user_input: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.message_count() + 2);
    messages.push(Message::system(system_prompt));
    messages.extend(history.messages());
    messages.push(Message::user(user_input));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::rehydrate;
    use crate::message::{Role, Turn};
    use crate::transcript::Transcript;

    #[test]
    fn empty_history() {
        let transcript = Transcript::new();
        let messages = build("", &rehydrate(&transcript, 5), "hi");
        assert_eq!(messages, vec![Message::system(""), Message::user("hi")]);
    }

    #[test]
    fn system_first_history_middle_input_last() {
        let transcript: Transcript = [
            Turn::new("h1", "a1"),
            Turn::new("h2", "a2"),
            Turn::new("h3", "a3"),
        ]
        .into_iter()
        .collect();
        let window = rehydrate(&transcript, 2);
        let messages = build("Be brief.", &window, "h4");

        assert_eq!(messages.len(), window.message_count() + 2);
        assert_eq!(messages[0], Message::system("Be brief."));
        assert_eq!(messages[1], Message::user("h2"));
        assert_eq!(messages[4], Message::assistant("a3"));
        assert_eq!(messages.last(), Some(&Message::user("h4")));
    }

    #[test]
    fn length_invariant_holds_for_all_windows() {
        let transcript: Transcript = (0..7).map(|i| Turn::new(format!("q{i}"), "a")).collect();
        for k in 1..=10 {
            let window = rehydrate(&transcript, k);
            let messages = build("sys", &window, "next");
            assert_eq!(messages.len(), window.message_count() + 2);
            assert_eq!(messages[0].role, Role::System);
            assert_eq!(messages.last().map(|m| m.role), Some(Role::User));
        }
    }

    #[test]
    fn build_is_idempotent() {
        let transcript: Transcript = [Turn::new("h1", "a1")].into_iter().collect();
        let window = rehydrate(&transcript, 3);
        assert_eq!(build("s", &window, "u"), build("s", &window, "u"));
    }

    #[test]
    fn text_is_not_escaped_or_truncated() {
        let long = "x".repeat(20_000);
        let system = "Use <b>tags</b> & \"quotes\"\n\tand tabs";
        let messages = build(system, &HistoryWindow::empty(), &long);
        assert_eq!(messages[0].content, system);
        assert_eq!(messages[1].content.len(), 20_000);
    }
}
