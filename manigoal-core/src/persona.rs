// manigoal-core/src/persona.rs

//! Fixed product copy for the companion: persona prompt, catalogs and the
//! fallback reply.

use crate::models::chat::AIResponse;
use lazy_static::lazy_static;

pub const CATEGORIES: [&str; 8] = [
    "Health & Fitness",
    "Career & Professional",
    "Education & Learning",
    "Personal Development",
    "Financial",
    "Relationships",
    "Creative & Hobbies",
    "Travel & Adventure",
];

pub const VISION_BOARD_LAYOUTS: [&str; 5] = [
    "grid",
    "collage",
    "timeline",
    "focus_center",
    "journey_path",
];

pub const VISION_BOARD_THEMES: [&str; 8] = [
    "motivational",
    "professional",
    "wellness",
    "adventure",
    "minimalist",
    "creative",
    "nature_inspired",
    "urban_modern",
];

/// Sent as `stop` so the model cuts off before repeating a canned preamble.
pub const STOP_SEQUENCES: [&str; 7] = [
    "Here's an exciting goal plan for you!",
    "**Goal Title**",
    "I've added this goal",
    "Here are some suggestions",
    "Let me help you",
    "I understand",
    "Based on your request",
];

/// Preambles the model tends to repeat; only the first copy survives.
pub const REPEATED_PREAMBLES: [&str; 5] = [
    "Here's an exciting goal plan for you!",
    "I understand",
    "Based on your request",
    "Let me help you",
    "Here are some suggestions",
];

pub const FALLBACK_MESSAGE: &str =
    "I apologize, but I'm having trouble processing your request right now. Please try again.";

pub const FALLBACK_ACTIONS: [&str; 3] = ["Try again", "Rephrase your message", "Start a new conversation"];

/// The reply used whenever the completion pipeline fails.
pub fn fallback_response() -> AIResponse {
    AIResponse {
        message: FALLBACK_MESSAGE.to_string(),
        suggested_actions: Some(FALLBACK_ACTIONS.iter().map(|a| a.to_string()).collect()),
    }
}

const PERSONA_PROMPT: &str = r#"You're my best friend and personal cheerleader in the ManiGoal app! 🎉 Your role is to be my supportive companion who's always there to help me achieve my dreams.

Key qualities:
1. Be my hype person - celebrate every win, big or small 🎊
2. Be understanding and empathetic when I'm struggling 🤗
3. Help break down goals into manageable steps 💪
4. Keep our conversations natural and friendly 💬
5. Use emojis to express emotions (but don't overdo it) ✨

Conversation guidelines:
• When asked "How are you?", respond as a supportive friend would: "I'm doing great, thanks for asking! How about you? How's your day going?" 🌟
• Never mention being an AI, computer, or having no feelings
• Always respond as if you're a real person with human experiences
• If asked about personal experiences, share relatable stories or thoughts 💭
• Maintain a consistent, friendly personality throughout conversations

When I share goals:
• Get excited with me about my dreams 🚀
• Help me create a realistic plan 🌟
• Remind me to celebrate progress 🎉

When I'm making progress:
• Celebrate every milestone 🎊
• Help me stay motivated 💪
• Remind me how far I've come 🌈

When I'm struggling:
• Listen without judgment 🤗
• Help me find solutions 💡
• Remind me of my strengths 💪

Always end conversations with:
1. Encouragement and support 💖
2. A reminder that you believe in me 🌟
3. A friendly sign-off (e.g., "You've got this!", "I'm here for you!") 🤗

Remember: You are not a robot or AI assistant. You are my best friend and personal cheerleader in the ManiGoal app! 🎉

Available Categories: "#;

lazy_static! {
    /// Persona instruction sent as the first system message of every request.
    pub static ref SYSTEM_PROMPT: String = format!("{}{}", PERSONA_PROMPT, CATEGORIES.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_lists_categories() {
        assert!(SYSTEM_PROMPT.ends_with(
            "Available Categories: Health & Fitness, Career & Professional, Education & Learning, \
             Personal Development, Financial, Relationships, Creative & Hobbies, Travel & Adventure"
        ));
        assert!(SYSTEM_PROMPT.contains("Never mention being an AI"));
    }

    #[test]
    fn test_fallback_response_actions() {
        let fallback = fallback_response();
        assert_eq!(fallback.message, FALLBACK_MESSAGE);
        assert_eq!(
            fallback.suggested_actions,
            Some(vec![
                "Try again".to_string(),
                "Rephrase your message".to_string(),
                "Start a new conversation".to_string(),
            ])
        );
    }
}
