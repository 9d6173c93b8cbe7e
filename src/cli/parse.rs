//! CLI parse: clap types for Tidbit. No behavior; definitions only.

use crate::types::{SnippetId, TopicId};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tidbit CLI - feedback-driven educational snippet generation
#[derive(Parser)]
#[command(name = "tidbit")]
#[command(about = "Generate short educational snippets per topic, steered by feedback")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the generation scheduler until interrupted
    Serve,
    /// Run one generation pass now
    Generate {
        /// Only generate for this topic
        #[arg(long)]
        topic: Option<TopicId>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show scheduler configuration and catalog summary
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the prompt the next pass would send for a topic
    Prompt {
        #[arg(long)]
        topic: TopicId,
    },
    /// Manage topics
    Topic {
        #[command(subcommand)]
        command: TopicCommands,
    },
    /// Browse snippets and record feedback
    Snippet {
        #[command(subcommand)]
        command: SnippetCommands,
    },
    /// Show feedback statistics
    Stats {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum TopicCommands {
    /// Create a topic
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List all topics
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one topic with its feedback summary
    Show {
        topic_id: TopicId,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Delete a topic and all of its snippets
    Remove { topic_id: TopicId },
}

#[derive(Subcommand)]
pub enum SnippetCommands {
    /// List snippets, newest first
    List {
        #[arg(long)]
        topic: Option<TopicId>,
        #[arg(long)]
        liked: Option<bool>,
        #[arg(long)]
        disliked: Option<bool>,
        #[arg(long)]
        deep_dive: Option<bool>,
        /// Page size (1-100)
        #[arg(long, default_value = "50")]
        limit: usize,
        #[arg(long, default_value = "0")]
        offset: usize,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Update feedback flags on a snippet
    Feedback {
        snippet_id: SnippetId,
        #[arg(long)]
        liked: Option<bool>,
        #[arg(long)]
        disliked: Option<bool>,
        #[arg(long)]
        deep_dive: Option<bool>,
    },
    /// Delete a snippet
    Remove { snippet_id: SnippetId },
}
