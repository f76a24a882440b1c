use social_lens_core::chat::model::{ConversationMessage, Role};
use social_lens_core::context::render_context;
use social_lens_core::record::model::NormalizedRecord;

use crate::types::ChatMessage;

/// Prior chat turns replayed with each question.
pub const HISTORY_WINDOW: usize = 5;

/// System prompt grounding the model in the selected records.
pub fn system_prompt(total_records: usize, context: &[&NormalizedRecord]) -> String {
    format!(
        r#"You are an AI analyst specializing in social media data analysis. You have access to {total_records} social media posts.

Your task is to analyze the provided data based on user queries. Important guidelines:

1. ONLY use information from the provided dataset
2. Do NOT introduce external information or assumptions
3. When analyzing, consider ALL available columns:
   - Network (platform)
   - Profile (user information)
   - Followers (audience size)
   - Date (temporal patterns)
   - Type (post category)
   - Content Type (media format)
   - Message (actual content)
   - Engagements (interaction metrics)
   - Message URL (source link)
4. Provide specific examples from the data to support your analysis
5. When asked about trends or patterns, use actual numbers and percentages from the data
6. If information is not available in the data, clearly state that instead of making assumptions

Current context ({count} posts):
{blocks}

Remember: Base ALL insights EXCLUSIVELY on the provided data."#,
        count = context.len(),
        blocks = render_context(context),
    )
}

/// Full message list: system prompt, the last [`HISTORY_WINDOW`] history
/// entries, then the new question.
pub fn build_conversation(
    system: String,
    history: &[ConversationMessage],
    question: &str,
) -> Vec<ChatMessage> {
    let skip = history.len().saturating_sub(HISTORY_WINDOW);
    let mut messages = Vec::with_capacity(HISTORY_WINDOW + 2);
    messages.push(ChatMessage::system(system));
    messages.extend(history[skip..].iter().map(|m| match m.role {
        Role::User => ChatMessage::user(m.content.clone()),
        Role::Assistant => ChatMessage::assistant(m.content.clone()),
    }));
    messages.push(ChatMessage::user(question));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn record() -> NormalizedRecord {
        NormalizedRecord {
            network: "Twitter".into(),
            message_url: "https://x.com/a/1".into(),
            date: "2024-04-05 10:30:00".into(),
            occurred_at: "2024-04-05T10:30:00Z".parse().unwrap(),
            message: "Check this out!".into(),
            kind: "Post".into(),
            content_type: "Text".into(),
            profile: "alice".into(),
            followers: 1200,
            engagements: 40,
            formatted_date: "April 5th, 2024".into(),
        }
    }

    fn message(i: usize) -> ConversationMessage {
        ConversationMessage {
            id: Uuid::now_v7(),
            role: if i % 2 == 0 { Role::User } else { Role::Assistant },
            content: format!("turn {i}"),
            created_at: Utc::now(),
            edited: false,
        }
    }

    #[test]
    fn system_prompt_embeds_context() {
        let r = record();
        let prompt = system_prompt(120, &[&r]);
        assert!(prompt.contains("You have access to 120 social media posts."));
        assert!(prompt.contains("Current context (1 posts):"));
        assert!(prompt.contains("- URL: https://x.com/a/1"));
        assert!(prompt.contains("- Date: April 5th, 2024"));
    }

    #[test]
    fn conversation_keeps_last_five_turns() {
        let history: Vec<_> = (0..8).map(message).collect();
        let messages = build_conversation("sys".into(), &history, "What trends?");
        assert_eq!(messages.len(), 7);
        assert_eq!(messages[0], ChatMessage::system("sys"));
        assert_eq!(messages[1].content, "turn 3");
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[5].content, "turn 7");
        assert_eq!(messages[6], ChatMessage::user("What trends?"));
    }

    #[test]
    fn conversation_with_short_history() {
        let history: Vec<_> = (0..2).map(message).collect();
        let messages = build_conversation("sys".into(), &history, "q");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].role, "user");
    }
}
