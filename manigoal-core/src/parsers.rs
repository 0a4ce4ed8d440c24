// manigoal-core/src/parsers.rs

//! Best-effort scrapers for loosely labeled sections in model output, plus
//! the formatters that render the scraped structures back as companion copy.
//!
//! Nothing here is guaranteed against reformatted output: a parser returns
//! `None` unless its minimal set of labels is present.

use crate::models::goal::Goal;
use crate::models::suggestions::{
    GoalSuggestion, MotivationalResponse, ProgressUpdate, VisionBoardSuggestion,
};
use crate::persona::{VISION_BOARD_LAYOUTS, VISION_BOARD_THEMES};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    // Goal suggestion
    static ref GOAL_TITLE: Regex = Regex::new(r"(?i)Goal title:?\s*([^\n]+)").expect("valid regex");
    static ref GOAL_CATEGORY: Regex = Regex::new(r"(?i)Category:?\s*([^\n]+)").expect("valid regex");
    static ref GOAL_DESCRIPTION: Regex = Regex::new(r"(?i)Description:?\s*([^\n]+)").expect("valid regex");
    static ref GOAL_MILESTONES: Regex = Regex::new(r"(?i)Milestones?:?\s*((?:[^\n]|\n-)+)").expect("valid regex");
    static ref GOAL_DURATION: Regex = Regex::new(r"(?i)(?:Duration|Timeline|Deadline):?\s*([^\n]+)").expect("valid regex");

    // Progress update
    static ref PROGRESS_PERCENT: Regex = Regex::new(r"(?i)(?:progress|completion).*?(\d+)%").expect("valid regex");
    static ref COMPLETED: Regex = Regex::new(r"(?is)completed(?:\s+milestones)?:(.*?)(?:\n\n|$)").expect("valid regex");
    static ref PENDING: Regex = Regex::new(r"(?is)pending(?:\s+milestones)?:(.*?)(?:\n\n|$)").expect("valid regex");
    static ref NEXT: Regex = Regex::new(r"(?i)next(?:\s+milestone)?:(.*?)(?:\n|$)").expect("valid regex");
    static ref ACHIEVEMENTS: Regex = Regex::new(r"(?is)achievements?:(.*?)(?:\n\n|$)").expect("valid regex");
    static ref CHALLENGES: Regex = Regex::new(r"(?is)challenges?:(.*?)(?:\n\n|$)").expect("valid regex");

    // Motivational response
    static ref QUOTE: Regex = Regex::new(r#"(?i)(?:Quote|Inspiration):\s*["'](.+?)["']\s*(?:-|by|—)\s*(.+?)(?:\n|$)"#).expect("valid regex");
    static ref CONTEXT: Regex = Regex::new(r"(?i)Context:\s*([^\n]+)").expect("valid regex");
    static ref ENCOURAGEMENT: Regex = Regex::new(r"(?i)Encouragement:\s*([^\n]+)").expect("valid regex");
    static ref SUCCESS_STORY: Regex = Regex::new(r"(?i)Success Story:\s*((?:[^\n]|\n[^\n])+)").expect("valid regex");
    static ref TIPS: Regex = Regex::new(r"(?is)Tips?:(.*?)(?:\n\n|$)").expect("valid regex");

    // Vision board
    static ref KEYWORDS: Regex = Regex::new(r"(?i)Keywords?:(?:\s*[\n-])((?:\s*[-•]\s*[^\n]+\n?)+)").expect("valid regex");
    static ref LAYOUT: Regex = Regex::new(r"(?i)Layout:\s*([^\n]+)").expect("valid regex");
    static ref THEME: Regex = Regex::new(r"(?i)Theme:\s*([^\n]+)").expect("valid regex");
    static ref IMAGE_PROMPTS: Regex = Regex::new(r"(?i)Image Prompts?:(?:\s*[\n-])((?:\s*[-•]\s*[^\n]+\n?)+)").expect("valid regex");
    static ref CAPTIONS: Regex = Regex::new(r"(?i)Captions?:(?:\s*[\n-])((?:\s*[-•]\s*[^\n]+\n?)+)").expect("valid regex");
    static ref MOOD: Regex = Regex::new(r"(?i)Mood(?:\s+Description)?:\s*([^\n]+)").expect("valid regex");
}

fn group<'t>(caps: &Option<Captures<'t>>, index: usize) -> Option<&'t str> {
    caps.as_ref().and_then(|c| c.get(index)).map(|m| m.as_str())
}

fn trimmed(caps: &Option<Captures<'_>>) -> Option<String> {
    group(caps, 1).map(|s| s.trim().to_string())
}

/// Items of a block whose lines start with one of `bullets`, bullet dropped.
fn bullet_items(block: &str, bullets: &[char]) -> Vec<String> {
    block
        .split('\n')
        .map(str::trim)
        .filter_map(|line| {
            let mut chars = line.chars();
            match chars.next() {
                Some(c) if bullets.contains(&c) => Some(chars.as_str().trim().to_string()),
                _ => None,
            }
        })
        .collect()
}

fn dash_list(caps: &Option<Captures<'_>>) -> Option<Vec<String>> {
    group(caps, 1).map(|block| bullet_items(block, &['-']))
}

fn bullet_list(caps: &Option<Captures<'_>>) -> Vec<String> {
    group(caps, 1)
        .map(|block| bullet_items(block, &['-', '•']))
        .unwrap_or_default()
}

pub fn parse_goal_suggestion(content: &str) -> Option<GoalSuggestion> {
    let title = GOAL_TITLE.captures(content);
    let category = GOAL_CATEGORY.captures(content);
    if title.is_none() || category.is_none() {
        return None;
    }

    Some(GoalSuggestion {
        title: trimmed(&title).unwrap_or_default(),
        category: trimmed(&category).unwrap_or_default(),
        description: trimmed(&GOAL_DESCRIPTION.captures(content)).unwrap_or_default(),
        milestones: dash_list(&GOAL_MILESTONES.captures(content)).unwrap_or_default(),
        estimated_duration: trimmed(&GOAL_DURATION.captures(content)).unwrap_or_default(),
    })
}

/// `current_goal` supplies the percentage when the text states none.
pub fn parse_progress_update(content: &str, current_goal: Option<&Goal>) -> Option<ProgressUpdate> {
    let progress = PROGRESS_PERCENT.captures(content);
    let completed = COMPLETED.captures(content);
    let pending = PENDING.captures(content);
    if progress.is_none() && completed.is_none() && pending.is_none() {
        return None;
    }

    let stored = current_goal.map_or(0, |g| g.completion_percentage);
    let current_progress = group(&progress, 1)
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(stored);

    Some(ProgressUpdate {
        current_progress,
        completed_milestones: dash_list(&completed).unwrap_or_default(),
        pending_milestones: dash_list(&pending).unwrap_or_default(),
        next_milestone: trimmed(&NEXT.captures(content)),
        recent_achievements: dash_list(&ACHIEVEMENTS.captures(content)),
        challenges: dash_list(&CHALLENGES.captures(content)),
    })
}

pub fn parse_motivational_response(content: &str) -> Option<MotivationalResponse> {
    let quote = QUOTE.captures(content);
    let encouragement = ENCOURAGEMENT.captures(content);
    let success_story = SUCCESS_STORY.captures(content);
    if quote.is_none() && encouragement.is_none() && success_story.is_none() {
        return None;
    }

    Some(MotivationalResponse {
        quote: trimmed(&quote),
        author: group(&quote, 2).map(|a| a.trim().to_string()),
        context: trimmed(&CONTEXT.captures(content)),
        encouragement: trimmed(&encouragement),
        success_story: trimmed(&success_story),
        personalized_tips: dash_list(&TIPS.captures(content)),
    })
}

pub fn parse_vision_board_suggestion(content: &str) -> Option<VisionBoardSuggestion> {
    let keywords = KEYWORDS.captures(content);
    let prompts = IMAGE_PROMPTS.captures(content);
    if keywords.is_none() && prompts.is_none() {
        return None;
    }

    Some(VisionBoardSuggestion {
        keywords: bullet_list(&keywords),
        layout: trimmed(&LAYOUT.captures(content)).unwrap_or_else(|| VISION_BOARD_LAYOUTS[0].to_string()),
        theme: trimmed(&THEME.captures(content)).unwrap_or_else(|| VISION_BOARD_THEMES[0].to_string()),
        image_prompts: bullet_list(&prompts),
        captions: bullet_list(&CAPTIONS.captures(content)),
        mood_description: trimmed(&MOOD.captures(content)),
    })
}

fn prefixed_lines(items: &[String], marker: &str) -> String {
    items
        .iter()
        .map(|item| format!("{} {}", marker, item))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_goal_suggestion(suggestion: &GoalSuggestion) -> String {
    let description = if suggestion.description.is_empty() {
        String::new()
    } else {
        format!("💫 Description: {}", suggestion.description)
    };
    let timeline = if suggestion.estimated_duration.is_empty() {
        String::new()
    } else {
        format!("⏳ Timeline: {}", suggestion.estimated_duration)
    };

    format!(
        "✨ Here's an exciting goal plan for you! ✨\n\n\
         🎯 Goal: {}\n\
         📊 Category: {}\n\
         {}\n\
         {}\n\n\
         🌟 Key Milestones (You've got this! 💪):\n\
         {}\n\n\
         You're taking an amazing step forward! 🚀",
        suggestion.title,
        suggestion.category,
        description,
        timeline,
        prefixed_lines(&suggestion.milestones, "🎉"),
    )
}

fn progress_emoji(progress: u32) -> &'static str {
    if progress >= 75 {
        "🌟"
    } else if progress >= 50 {
        "🔥"
    } else if progress >= 25 {
        "💫"
    } else {
        "🌱"
    }
}

/// The progress line appears only when the parsed value differs from the goal's stored one.
pub fn format_progress_update(update: &ProgressUpdate, current_goal: Option<&Goal>) -> String {
    let mut message = String::from("📊 Progress Update (Keep going! 💪)\n");

    if current_goal.map(|g| g.completion_percentage) != Some(update.current_progress) {
        message.push_str(&format!(
            "\n{} Progress: {}% (Amazing work! 🎉)",
            progress_emoji(update.current_progress),
            update.current_progress
        ));
    }
    if !update.completed_milestones.is_empty() {
        message.push_str(&format!(
            "\n\n✅ Completed Milestones (Fantastic job! 🌟):\n{}",
            prefixed_lines(&update.completed_milestones, "🏆")
        ));
    }
    if !update.pending_milestones.is_empty() {
        message.push_str(&format!(
            "\n\n⏳ Coming Up (You've got this! 💪):\n{}",
            prefixed_lines(&update.pending_milestones, "🎯")
        ));
    }
    if let Some(next) = &update.next_milestone {
        message.push_str(&format!("\n\n🎯 Next Focus (Let's crush this! 💪):\n{}", next));
    }
    if let Some(achievements) = update.recent_achievements.as_ref().filter(|a| !a.is_empty()) {
        message.push_str(&format!(
            "\n\n🌟 Recent Achievements (So proud of you! 🎉):\n{}",
            prefixed_lines(achievements, "🏆")
        ));
    }
    if let Some(challenges) = update.challenges.as_ref().filter(|c| !c.is_empty()) {
        message.push_str(&format!(
            "\n\n💪 Challenges (You can overcome these! 🦸):\n{}",
            prefixed_lines(challenges, "🔥")
        ));
    }
    message
}

pub fn format_motivational_response(content: &MotivationalResponse) -> String {
    let mut message = String::new();

    if let Some(quote) = &content.quote {
        message.push_str(&format!("💫 \"{}\"", quote));
        if let Some(author) = &content.author {
            message.push_str(&format!("\n   - {} ✨", author));
        }
        message.push_str("\n\n");
    }
    if let Some(context) = &content.context {
        message.push_str(&format!("🌟 {}\n\n", context));
    }
    if let Some(encouragement) = &content.encouragement {
        message.push_str(&format!("🔥 {}\n\n", encouragement));
    }
    if let Some(story) = &content.success_story {
        message.push_str(&format!("📖 Success Story (Get inspired! 🌟):\n{}\n\n", story));
    }
    if let Some(tips) = content.personalized_tips.as_ref().filter(|t| !t.is_empty()) {
        message.push_str(&format!(
            "💡 Personalized Tips (You've got this! 💪):\n{}\n\n",
            prefixed_lines(tips, "✨")
        ));
    }
    message
}

pub fn format_vision_board_suggestion(suggestion: &VisionBoardSuggestion) -> String {
    let mut message = String::from("🎨 Vision Board Ideas (Let's make it amazing! ✨)\n\n");

    if !suggestion.keywords.is_empty() {
        message.push_str(&format!(
            "🔤 Keywords (Power words for your journey! 💫):\n{}\n\n",
            prefixed_lines(&suggestion.keywords, "💫")
        ));
    }
    message.push_str(&format!("📐 Layout: {} 🎯\n", suggestion.layout));
    message.push_str(&format!("🎭 Theme: {} ✨\n\n", suggestion.theme));
    if !suggestion.image_prompts.is_empty() {
        message.push_str(&format!(
            "🖼️ Image Ideas (Let's visualize success! 🌟):\n{}\n\n",
            prefixed_lines(&suggestion.image_prompts, "🎯")
        ));
    }
    if !suggestion.captions.is_empty() {
        message.push_str(&format!(
            "✍️ Inspiring Captions (Words to motivate! 💪):\n{}\n\n",
            prefixed_lines(&suggestion.captions, "💫")
        ));
    }
    if let Some(mood) = &suggestion.mood_description {
        message.push_str(&format!("🌟 Mood: {} ✨\n\n", mood));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal_at(percent: u32) -> Goal {
        Goal {
            id: "g1".to_string(),
            title: "Write a novel".to_string(),
            description: None,
            category: None,
            status: "active".to_string(),
            deadline: None,
            completion_percentage: percent,
            milestones: Vec::new(),
        }
    }

    #[test]
    fn test_parse_goal_suggestion() {
        let content = "Goal title: Run a 5k\nCategory: Health & Fitness\nDescription: Build up slowly\n\
                       Milestones:\n- Walk daily\n- Jog 1k\nTimeline: 8 weeks";
        let suggestion = parse_goal_suggestion(content).unwrap();
        assert_eq!(suggestion.title, "Run a 5k");
        assert_eq!(suggestion.category, "Health & Fitness");
        assert_eq!(suggestion.description, "Build up slowly");
        assert_eq!(suggestion.milestones, vec!["Walk daily", "Jog 1k"]);
        assert_eq!(suggestion.estimated_duration, "8 weeks");
    }

    #[test]
    fn test_parse_goal_suggestion_requires_title_and_category() {
        assert!(parse_goal_suggestion("Goal title: Something").is_none());
        assert!(parse_goal_suggestion("Category: Financial").is_none());

        let minimal = parse_goal_suggestion("goal title: Save\ncategory: Financial").unwrap();
        assert_eq!(minimal.description, "");
        assert!(minimal.milestones.is_empty());
    }

    #[test]
    fn test_parse_progress_update() {
        let content = "Your progress is at 60% now.\n\nCompleted milestones:\n- Outline\n- Chapter 1\n\n\
                       Pending:\n- Chapter 2\n\nNext milestone: Chapter 2 draft\nChallenges:\n- Time";
        let update = parse_progress_update(content, Some(&goal_at(40))).unwrap();
        assert_eq!(update.current_progress, 60);
        assert_eq!(update.completed_milestones, vec!["Outline", "Chapter 1"]);
        assert_eq!(update.pending_milestones, vec!["Chapter 2"]);
        assert_eq!(update.next_milestone.as_deref(), Some("Chapter 2 draft"));
        assert_eq!(update.challenges, Some(vec!["Time".to_string()]));
        assert!(update.recent_achievements.is_none());
    }

    #[test]
    fn test_parse_progress_update_falls_back_to_goal() {
        let update = parse_progress_update("Completed:\n- Outline", Some(&goal_at(35))).unwrap();
        assert_eq!(update.current_progress, 35);
        let update = parse_progress_update("Completed:\n- Outline", None).unwrap();
        assert_eq!(update.current_progress, 0);
        assert!(parse_progress_update("Nothing to see", None).is_none());
    }

    #[test]
    fn test_parse_motivational_response() {
        let content = "Quote: \"Stay hungry, stay foolish\" - Steve Jobs\nContext: Keep learning\n\
                       Tips:\n- Read daily\n- Ask questions";
        let response = parse_motivational_response(content).unwrap();
        assert_eq!(response.quote.as_deref(), Some("Stay hungry, stay foolish"));
        assert_eq!(response.author.as_deref(), Some("Steve Jobs"));
        assert_eq!(response.context.as_deref(), Some("Keep learning"));
        assert_eq!(
            response.personalized_tips,
            Some(vec!["Read daily".to_string(), "Ask questions".to_string()])
        );
        assert!(response.encouragement.is_none());
    }

    #[test]
    fn test_parse_success_story_spans_lines() {
        let content = "Success Story: She started small.\nThen she never stopped.\n\nThe end";
        let response = parse_motivational_response(content).unwrap();
        assert_eq!(
            response.success_story.as_deref(),
            Some("She started small.\nThen she never stopped.")
        );
        assert!(response.quote.is_none());
        assert!(parse_motivational_response("Context: only context").is_none());
    }

    #[test]
    fn test_parse_vision_board_suggestion() {
        let content = "Keywords:\n- Focus\n• Growth\nLayout: collage\nImage Prompts:\n- A sunrise over mountains\n\
                       Mood Description: calm and bold";
        let suggestion = parse_vision_board_suggestion(content).unwrap();
        assert_eq!(suggestion.keywords, vec!["Focus", "Growth"]);
        assert_eq!(suggestion.layout, "collage");
        assert_eq!(suggestion.theme, "motivational");
        assert_eq!(suggestion.image_prompts, vec!["A sunrise over mountains"]);
        assert!(suggestion.captions.is_empty());
        assert_eq!(suggestion.mood_description.as_deref(), Some("calm and bold"));
    }

    #[test]
    fn test_parse_vision_board_requires_lists() {
        assert!(parse_vision_board_suggestion("Layout: grid\nTheme: wellness").is_none());
    }

    #[test]
    fn test_format_goal_suggestion() {
        let suggestion = GoalSuggestion {
            title: "Run a 5k".to_string(),
            category: "Health & Fitness".to_string(),
            description: String::new(),
            milestones: vec!["Walk daily".to_string()],
            estimated_duration: "8 weeks".to_string(),
        };
        let text = format_goal_suggestion(&suggestion);
        assert!(text.starts_with("✨ Here's an exciting goal plan for you! ✨\n\n🎯 Goal: Run a 5k\n"));
        assert!(text.contains("⏳ Timeline: 8 weeks"));
        assert!(!text.contains("Description"));
        assert!(text.contains("🎉 Walk daily"));
    }

    #[test]
    fn test_format_progress_update() {
        let update = ProgressUpdate {
            current_progress: 80,
            completed_milestones: vec!["Outline".to_string()],
            pending_milestones: Vec::new(),
            next_milestone: None,
            recent_achievements: Some(Vec::new()),
            challenges: None,
        };
        let text = format_progress_update(&update, Some(&goal_at(40)));
        assert!(text.contains("🌟 Progress: 80% (Amazing work! 🎉)"));
        assert!(text.contains("🏆 Outline"));
        assert!(!text.contains("Recent Achievements"));

        let unchanged = format_progress_update(&update, Some(&goal_at(80)));
        assert!(!unchanged.contains("Progress: 80%"));

        let seedling = ProgressUpdate { current_progress: 10, ..update };
        assert!(format_progress_update(&seedling, None).contains("🌱 Progress: 10%"));
    }

    #[test]
    fn test_format_motivational_and_vision_board() {
        let motivation = MotivationalResponse {
            quote: Some("Keep going".to_string()),
            author: Some("Anon".to_string()),
            ..Default::default()
        };
        assert_eq!(format_motivational_response(&motivation), "💫 \"Keep going\"\n   - Anon ✨\n\n");

        let board = VisionBoardSuggestion {
            keywords: Vec::new(),
            layout: "grid".to_string(),
            theme: "wellness".to_string(),
            image_prompts: Vec::new(),
            captions: vec!["Breathe".to_string()],
            mood_description: None,
        };
        let text = format_vision_board_suggestion(&board);
        assert!(text.contains("📐 Layout: grid 🎯\n🎭 Theme: wellness ✨"));
        assert!(text.contains("💫 Breathe"));
        assert!(!text.contains("Keywords"));
    }
}
