/// A single "put this emoji on this message" call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionTask {
    pub message_id: String,
    pub emoji: String,
}

impl ReactionTask {
    pub fn new(message_id: impl Into<String>, emoji: impl Into<String>) -> ReactionTask {
        ReactionTask {
            message_id: message_id.into(),
            emoji: emoji.into(),
        }
    }

    /// Every emoji shows up `repeat_count` times in a row, in the order given.
    /// Discord treats a repeated reaction from the same user as a no-op, the
    /// repeats are still issued as separate calls.
    pub fn expand(message_id: &str, emojis: &[String], repeat_count: u32) -> Vec<ReactionTask> {
        emojis
            .iter()
            .flat_map(|emoji| {
                (0..repeat_count).map(move |_| ReactionTask::new(message_id, emoji.as_str()))
            })
            .collect()
    }
}
