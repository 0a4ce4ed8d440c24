// manigoal-core/src/models/goal.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress state of a single milestone.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Delayed,
}

impl MilestoneStatus {
    pub const ALL: [MilestoneStatus; 4] = [
        MilestoneStatus::Pending,
        MilestoneStatus::InProgress,
        MilestoneStatus::Completed,
        MilestoneStatus::Delayed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "pending",
            MilestoneStatus::InProgress => "in_progress",
            MilestoneStatus::Completed => "completed",
            MilestoneStatus::Delayed => "delayed",
        }
    }
}

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: MilestoneStatus,
}

/// A tracked goal with its milestones, as the backend hands it over.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_goal_status")]
    pub status: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub completion_percentage: u32,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

fn default_goal_status() -> String {
    "active".to_string()
}

impl Goal {
    /// Summary injected as an extra system message to ground the reply.
    pub fn context_text(&self) -> String {
        let deadline = self
            .deadline
            .map(|d| d.format("%m/%d/%Y").to_string())
            .unwrap_or_else(|| "No deadline".to_string());
        let mut context = format!(
            "Current Goal: {}\nProgress: {}%\nDeadline: {}",
            self.title, self.completion_percentage, deadline
        );
        if !self.milestones.is_empty() {
            let milestones: Vec<String> = self
                .milestones
                .iter()
                .map(|m| format!("{} ({})", m.title, m.status))
                .collect();
            context.push_str(&format!("\nMilestones: {}", milestones.join(", ")));
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_goal() -> Goal {
        Goal {
            id: "goal-1".to_string(),
            title: "Run a marathon".to_string(),
            description: None,
            category: Some("Health & Fitness".to_string()),
            status: "active".to_string(),
            deadline: NaiveDate::from_ymd_opt(2026, 11, 3),
            completion_percentage: 40,
            milestones: vec![
                Milestone {
                    id: "m1".to_string(),
                    title: "Run 10k".to_string(),
                    status: MilestoneStatus::Completed,
                },
                Milestone {
                    id: "m2".to_string(),
                    title: "Run a half".to_string(),
                    status: MilestoneStatus::InProgress,
                },
            ],
        }
    }

    #[test]
    fn test_context_text_with_milestones() {
        assert_eq!(
            sample_goal().context_text(),
            "Current Goal: Run a marathon\nProgress: 40%\nDeadline: 11/03/2026\n\
             Milestones: Run 10k (completed), Run a half (in_progress)"
        );
    }

    #[test]
    fn test_context_text_without_deadline_or_milestones() {
        let goal = Goal {
            deadline: None,
            milestones: Vec::new(),
            ..sample_goal()
        };
        assert_eq!(
            goal.context_text(),
            "Current Goal: Run a marathon\nProgress: 40%\nDeadline: No deadline"
        );
    }

    #[test]
    fn test_goal_deserializes_backend_row() {
        let goal: Goal = serde_json::from_str(
            r#"{"id": "g", "title": "Learn Rust", "deadline": "2026-12-31",
                "completion_percentage": 10,
                "milestones": [{"id": "m", "title": "Finish the book", "status": "delayed"}]}"#,
        )
        .unwrap();
        assert_eq!(goal.status, "active");
        assert_eq!(goal.milestones[0].status, MilestoneStatus::Delayed);
        assert_eq!(goal.deadline, NaiveDate::from_ymd_opt(2026, 12, 31));
    }
}
