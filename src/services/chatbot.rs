use super::provider::{CompletionProvider, ProviderError};
use crate::config::ChatSettings;
use crate::message::ChatMessage;

/// Optional system instruction first, then the single user turn.
pub fn build_messages(system_prompt: Option<&str>, user_msg: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(prompt) = system_prompt {
        messages.push(ChatMessage::system(prompt));
    }
    messages.push(ChatMessage::user(user_msg));
    messages
}

/// Ask the provider for a reply to `user_msg`. Exactly one upstream call.
pub async fn generate_reply(
    provider: &dyn CompletionProvider,
    settings: &ChatSettings,
    user_msg: &str,
) -> Result<String, ProviderError> {
    let messages = build_messages(settings.system_prompt.as_deref(), user_msg);
    provider
        .complete(&settings.model, settings.temperature, &messages)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn system_turn_comes_first() {
        let messages = build_messages(Some("be terse"), "hello");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "be terse");
        assert_eq!(messages[1], ChatMessage::user("hello"));
    }

    #[test]
    fn no_system_turn_when_unset() {
        let messages = build_messages(None, "hello");
        assert_eq!(messages, vec![ChatMessage::user("hello")]);
    }
}
