// manigoal-core/src/quotes.rs

//! Canned content: the daily quote catalog and offline chat replies.

use crate::models::chat::AIResponse;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const QUOTE_AUTHOR: &str = "ManiGoal AI";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuoteResponse {
    pub quote_text: String,
    pub author: Option<String>,
    pub category: String,
}

const DAILY_QUOTES: [(&str, &str); 9] = [
    ("Every small step forward is progress. Your journey is uniquely yours, embrace it.", "Personal Growth"),
    ("Your goals are the compass that guide you through life's journey. Keep them close, but your determination closer.", "Success"),
    ("Success isn't about the destination, it's about the growth you experience along the way.", "Motivation"),
    ("The difference between a dream and a goal is the written plan and deadline you give it.", "Leadership"),
    ("Every expert was once a beginner. Your only competition is who you were yesterday.", "Mindfulness"),
    ("Build bridges of understanding, not walls of expectations.", "Relationships"),
    ("Your body is a temple, treat it with respect and it will serve you well.", "Health"),
    ("Innovation comes from questioning the ordinary and imagining the extraordinary.", "Creativity"),
    ("True wisdom lies not in knowing all the answers, but in asking the right questions.", "Wisdom"),
];

const MOCK_RESPONSES: [(&str, [&str; 3]); 3] = [
    (
        "I understand you're working towards your goals. Let's break this down into manageable steps.",
        ["Create a detailed action plan", "Set a specific milestone for this week", "Track your daily progress"],
    ),
    (
        "That's a great question about your progress. Let's focus on what you can do right now to move forward.",
        ["Review your current progress", "Identify any obstacles", "Plan your next action"],
    ),
    (
        "I hear your commitment to achieving this goal. Let's make sure we're taking the right steps.",
        ["Break down your next milestone", "Schedule dedicated time", "Measure your progress"],
    ),
];

/// A random quote from the catalog.
pub fn daily_quote() -> QuoteResponse {
    daily_quote_with(&mut rand::rng())
}

pub fn daily_quote_with<R: Rng + ?Sized>(rng: &mut R) -> QuoteResponse {
    let (text, category) = DAILY_QUOTES[rng.random_range(0..DAILY_QUOTES.len())];
    QuoteResponse {
        quote_text: text.to_string(),
        author: Some(QUOTE_AUTHOR.to_string()),
        category: category.to_string(),
    }
}

/// An offline reply, nudged toward the goal when `goal_context` is non-blank.
pub fn mock_response(goal_context: &str) -> AIResponse {
    mock_response_with(&mut rand::rng(), goal_context)
}

pub fn mock_response_with<R: Rng + ?Sized>(rng: &mut R, goal_context: &str) -> AIResponse {
    let (message, actions) = MOCK_RESPONSES[rng.random_range(0..MOCK_RESPONSES.len())];
    let message = if goal_context.trim().is_empty() {
        message.to_string()
    } else {
        format!("Based on your current goal progress, {}", message.to_lowercase())
    };
    AIResponse {
        message,
        suggested_actions: Some(actions.iter().map(|a| a.to_string()).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_daily_quote_comes_from_catalog() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let quote = daily_quote_with(&mut rng);
            assert_eq!(quote.author.as_deref(), Some(QUOTE_AUTHOR));
            assert!(DAILY_QUOTES
                .iter()
                .any(|(text, category)| *text == quote.quote_text && *category == quote.category));
        }
    }

    #[test]
    fn test_mock_response_without_context() {
        let response = mock_response("   ");
        assert!(MOCK_RESPONSES.iter().any(|(m, _)| *m == response.message));
        assert_eq!(response.suggested_actions.map(|a| a.len()), Some(3));
    }

    #[test]
    fn test_mock_response_with_context() {
        let mut rng = StdRng::seed_from_u64(1);
        let response = mock_response_with(&mut rng, "Current Goal: Run\nProgress: 10%");
        assert!(response.message.starts_with("Based on your current goal progress, "));
        let rest = &response.message["Based on your current goal progress, ".len()..];
        assert_eq!(rest, rest.to_lowercase());
    }
}
