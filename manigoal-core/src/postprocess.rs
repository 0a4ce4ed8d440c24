// manigoal-core/src/postprocess.rs

//! Shapes raw completion text into the reply shown to the user.
//!
//! Steps run in a fixed order: collapse repeated preambles, annotate lines
//! with emoji, pull out the "Suggested Actions" section, then cap the length.

use crate::models::chat::AIResponse;
use crate::persona::REPEATED_PREAMBLES;
use lazy_static::lazy_static;
use regex::Regex;

pub const MAX_MESSAGE_CHARS: usize = 2000;
const ELLIPSIS: &str = "...";

pub const BULLET_MARKER: &str = "✨";
pub const NUMBERED_MARKER: &str = "🔸";
pub const GREETING_MARKER: &str = "👋";
pub const EXCLAMATION_MARKER: &str = "🌟";
pub const QUESTION_MARKER: &str = "💭";
pub const DEFAULT_MARKER: &str = "💫";

const ANNOTATION_MARKERS: [&str; 6] = [
    BULLET_MARKER,
    NUMBERED_MARKER,
    GREETING_MARKER,
    EXCLAMATION_MARKER,
    QUESTION_MARKER,
    DEFAULT_MARKER,
];

lazy_static! {
    static ref PREAMBLE_PATTERNS: Vec<Regex> = REPEATED_PREAMBLES
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", regex::escape(p))).expect("valid regex"))
        .collect();
    static ref EMOJI: Regex = Regex::new(r"[\x{1F300}-\x{1F9FF}]").expect("valid regex");
    static ref BULLET_START: Regex = Regex::new(r"^[•\-\*]").expect("valid regex");
    static ref DIGIT_START: Regex = Regex::new(r"^[0-9]").expect("valid regex");
    static ref GREETING_START: Regex = Regex::new(r"(?i)^(hi|hey|hello)").expect("valid regex");
    static ref SUGGESTED_ACTIONS: Regex =
        Regex::new(r"(?is)Suggested Actions?:?(.*?)(?:\n\n|$)").expect("valid regex");
    static ref ACTION_BULLET: Regex = Regex::new(r"^[•\-]\s*").expect("valid regex");
}

/// Runs the full pipeline over one completion.
pub fn process_completion(raw: &str) -> AIResponse {
    let text = collapse_repeated_preambles(raw.trim());
    let text = annotate_lines(&text);
    let (mut message, actions) = extract_suggested_actions(&text);

    if !actions.is_empty() {
        message.push_str(&format!("\n\n{} Next steps:\n", BULLET_MARKER));
        let lines: Vec<String> = actions
            .iter()
            .map(|a| format!("{} {}", EXCLAMATION_MARKER, a))
            .collect();
        message.push_str(&lines.join("\n"));
    }

    AIResponse {
        message: truncate_message(message),
        suggested_actions: if actions.is_empty() { None } else { Some(actions) },
    }
}

/// For each known preamble that shows up more than once, keeps only the
/// segment running from its first occurrence up to its second.
pub fn collapse_repeated_preambles(text: &str) -> String {
    let mut text = text.to_string();
    for pattern in PREAMBLE_PATTERNS.iter() {
        let starts: Vec<usize> = pattern.find_iter(&text).take(2).map(|m| m.start()).collect();
        if let [first, second] = starts[..] {
            text = text[first..second].to_string();
        }
    }
    text
}

/// Picks the emoji for a trimmed line that has none.
pub fn line_marker(trimmed: &str) -> &'static str {
    if BULLET_START.is_match(trimmed) {
        BULLET_MARKER
    } else if DIGIT_START.is_match(trimmed) {
        NUMBERED_MARKER
    } else if GREETING_START.is_match(trimmed) {
        GREETING_MARKER
    } else if trimmed.ends_with('!') {
        EXCLAMATION_MARKER
    } else if trimmed.ends_with('?') {
        QUESTION_MARKER
    } else {
        DEFAULT_MARKER
    }
}

fn annotate_line(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.is_empty() || EMOJI.is_match(trimmed) {
        return line.to_string();
    }
    format!("{} {}", line_marker(trimmed), trimmed)
}

/// Prefixes every non-blank, emoji-free line with a marker.
pub fn annotate_lines(text: &str) -> String {
    text.split('\n')
        .map(annotate_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_annotation(line: &str) -> &str {
    ANNOTATION_MARKERS
        .iter()
        .find_map(|m| line.strip_prefix(m))
        .map(str::trim_start)
        .unwrap_or(line)
}

/// Splits a "Suggested Actions" section off the message.
///
/// Returns the message with the section (header to end of text) removed and
/// the bulleted items in order. Without a section the text comes back as-is.
pub fn extract_suggested_actions(text: &str) -> (String, Vec<String>) {
    let caps = match SUGGESTED_ACTIONS.captures(text) {
        Some(caps) => caps,
        None => return (text.to_string(), Vec::new()),
    };
    let header_start = caps.get(0).map_or(0, |m| m.start());
    let block = caps.get(1).map_or("", |m| m.as_str());

    let actions: Vec<String> = block
        .split('\n')
        .map(|line| strip_annotation(line.trim()))
        .filter(|line| line.starts_with('-') || line.starts_with('•'))
        .map(|line| ACTION_BULLET.replace(line, "").trim().to_string())
        .collect();

    let mut body = text[..header_start].trim_end();
    // The header line's own annotation marker is left dangling once the header goes.
    if let Some(rest) = ANNOTATION_MARKERS.iter().find_map(|m| body.strip_suffix(m)) {
        if rest.is_empty() || rest.ends_with('\n') {
            body = rest;
        }
    }

    (body.trim().to_string(), actions)
}

/// Caps a message at [`MAX_MESSAGE_CHARS`] characters plus an ellipsis.
pub fn truncate_message(message: String) -> String {
    match message.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((cut, _)) => format!("{}{}", &message[..cut], ELLIPSIS),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_markers_by_priority() {
        assert_eq!(annotate_lines("Great job today"), "💫 Great job today");
        assert_eq!(annotate_lines("You did it!"), "🌟 You did it!");
        assert_eq!(annotate_lines("How was your run?"), "💭 How was your run?");
        assert_eq!(annotate_lines("- drink water"), "✨ - drink water");
        assert_eq!(annotate_lines("* stretch!"), "✨ * stretch!");
        assert_eq!(annotate_lines("1. Plan the week?"), "🔸 1. Plan the week?");
        assert_eq!(annotate_lines("Hey there!"), "👋 Hey there!");
        assert_eq!(annotate_lines("hello friend"), "👋 hello friend");
    }

    #[test]
    fn test_annotation_keeps_blank_and_emoji_lines() {
        let text = "  Keep going  \n\n🎉 Party time\n   ";
        assert_eq!(annotate_lines(text), "💫 Keep going\n\n🎉 Party time\n   ");
    }

    #[test]
    fn test_collapse_repeated_preamble() {
        let text = "I understand how you feel. I understand how you feel. I understand how you feel.";
        let collapsed = collapse_repeated_preambles(text);
        assert_eq!(collapsed.matches("I understand").count(), 1);
        assert_eq!(collapsed, "I understand how you feel. ");
    }

    #[test]
    fn test_collapse_is_case_insensitive_and_skips_single() {
        let text = "Let me help you with that. let me help you again.";
        assert_eq!(collapse_repeated_preambles(text), "Let me help you with that. ");

        let single = "Based on your request, here is a plan.";
        assert_eq!(collapse_repeated_preambles(single), single);
    }

    #[test]
    fn test_extract_suggested_actions() {
        let text = annotate_lines("You can do it\n\nSuggested Actions:\n- Drink water\n• Go for a walk");
        let (body, actions) = extract_suggested_actions(&text);
        assert_eq!(actions, vec!["Drink water".to_string(), "Go for a walk".to_string()]);
        assert_eq!(body, "💫 You can do it");
    }

    #[test]
    fn test_extract_stops_at_blank_line_but_removes_to_end() {
        let text = "Nice!\nSuggested action:\n- Rest\n\nSee you tomorrow";
        let (body, actions) = extract_suggested_actions(text);
        assert_eq!(actions, vec!["Rest".to_string()]);
        assert_eq!(body, "Nice!");
    }

    #[test]
    fn test_extract_without_section() {
        let (body, actions) = extract_suggested_actions("Just a chat");
        assert_eq!(body, "Just a chat");
        assert!(actions.is_empty());
    }

    #[test]
    fn test_process_completion_appends_next_steps() {
        let raw = "  You're crushing it!\n\nSuggested Actions:\n- Log today's run\n- Stretch for 10 minutes\n";
        let response = process_completion(raw);
        assert_eq!(
            response.suggested_actions,
            Some(vec![
                "Log today's run".to_string(),
                "Stretch for 10 minutes".to_string()
            ])
        );
        assert!(!response.message.contains("Suggested Actions"));
        assert_eq!(
            response.message,
            "🌟 You're crushing it!\n\n✨ Next steps:\n🌟 Log today's run\n🌟 Stretch for 10 minutes"
        );
    }

    #[test]
    fn test_process_completion_without_actions() {
        let response = process_completion("How are you?");
        assert_eq!(response.message, "💭 How are you?");
        assert!(response.suggested_actions.is_none());
    }

    #[test]
    fn test_truncation_length() {
        let raw = "a".repeat(2500);
        let response = process_completion(&raw);
        assert_eq!(response.message.chars().count(), MAX_MESSAGE_CHARS + 3);
        assert!(response.message.ends_with("..."));
        assert!(response.message.starts_with("💫 aaa"));
    }

    #[test]
    fn test_truncation_leaves_short_messages() {
        let exact = "b".repeat(MAX_MESSAGE_CHARS);
        assert_eq!(truncate_message(exact.clone()), exact);
    }
}
