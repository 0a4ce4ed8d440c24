// manigoal-cli/src/models/cli.rs
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

/// ManiGoal: a goal-setting companion that cheers you on.
/// Starts an interactive chat by default, or answers a single turn non-interactively.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase message verbosity.
    ///
    /// Specify multiple times for more verbose output:
    ///  -v:  INFO level
    ///  -vv: DEBUG level
    ///  -vvv: TRACE level (most verbose)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Send a single message non-interactively.
    #[arg(short, long)]
    pub turn: Option<String>,

    /// ID of the goal whose progress grounds the replies.
    #[arg(short, long, global = true)]
    pub goal: Option<String>,

    /// JSON file holding goals (defaults to goals.json in the project root).
    #[arg(long, global = true)]
    pub goals_file: Option<PathBuf>,

    /// Answer with canned replies instead of calling the completion endpoint.
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a motivational quote.
    Quote,
    /// List goals from the goals file.
    Goals,
    /// List saved conversations, newest first.
    List {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Show one saved conversation.
    View {
        id: Uuid,
        /// Print every message in full.
        #[arg(long)]
        full: bool,
    },
    /// Delete a saved conversation.
    Delete { id: Uuid },
    /// Continue a saved conversation.
    Resume {
        id: Uuid,
        /// Send a single message instead of starting the REPL.
        #[arg(short, long)]
        turn: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_turn_with_goal() {
        let cli = Cli::parse_from(["manigoal", "-vv", "--turn", "I ran today", "-g", "goal-1"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.turn.as_deref(), Some("I ran today"));
        assert_eq!(cli.goal.as_deref(), Some("goal-1"));
        assert!(!cli.offline);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_resume() {
        let id = Uuid::new_v4();
        let cli = Cli::parse_from(["manigoal", "resume", id.to_string().as_str(), "--offline", "-t", "hi"]);
        assert!(cli.offline);
        match cli.command {
            Some(Commands::Resume { id: parsed, turn }) => {
                assert_eq!(parsed, id);
                assert_eq!(turn.as_deref(), Some("hi"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_default_limit() {
        let cli = Cli::parse_from(["manigoal", "list"]);
        assert!(matches!(cli.command, Some(Commands::List { limit: 10 })));
    }
}
