//! Suggestion chips offered next to the input.

use crate::models::Thread;

use super::StreamState;

/// Starter prompts for an empty conversation.
pub const STARTER_PROMPTS: [&str; 4] = [
    "Build a 5-year career development strategy",
    "Diagnose structural risks in my current asset allocation",
    "Simulate how technology breakthroughs will hit my industry",
    "Design a cross-domain logical thinking framework",
];

/// Follow-up chips shown under a finished model reply.
pub const FOLLOW_UP_PROMPTS: [&str; 3] = ["Deep simulation", "Risk redirection", "Innovation paths"];

/// Which chips to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suggestions {
    None,
    Starters(&'static [&'static str]),
    FollowUps(&'static [&'static str]),
}

impl Suggestions {
    pub(crate) fn for_session(active: Option<&Thread>, state: StreamState) -> Self {
        if state == StreamState::Streaming {
            return Suggestions::None;
        }

        match active {
            None => Suggestions::Starters(&STARTER_PROMPTS),
            Some(thread) if thread.is_empty() => Suggestions::Starters(&STARTER_PROMPTS),
            Some(thread) => match thread.last_message() {
                Some(last) if last.is_model() => Suggestions::FollowUps(&FOLLOW_UP_PROMPTS),
                _ => Suggestions::None,
            },
        }
    }

    /// Chip texts, empty for [`Suggestions::None`]
    pub fn prompts(&self) -> &'static [&'static str] {
        match self {
            Suggestions::None => &[],
            Suggestions::Starters(prompts) | Suggestions::FollowUps(prompts) => prompts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prompts().is_empty()
    }
}
