//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the twapi binary.

use clap::{Parser, Subcommand, ValueEnum};

/// Teamwork API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "twapi", about = "Teamwork API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Site address, e.g. `https://example.teamwork.com`.
    #[arg(long, global = true, env = "TEAMWORK_SERVER")]
    pub server: Option<String>,

    /// API token used as a bearer credential.
    #[arg(long, global = true, env = "TEAMWORK_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The numeric ID of the entity.
        id: i64,
    },

    /// List entities with optional filtering and pagination.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Page number (1-indexed).
        #[arg(long)]
        page: Option<u32>,

        /// Number of items per page.
        #[arg(long)]
        page_size: Option<u32>,

        /// Restrict to one project.
        #[arg(long)]
        project: Option<i64>,

        /// Restrict to one task (comments and time logs).
        #[arg(long)]
        task: Option<i64>,

        /// Free-text search term.
        #[arg(long)]
        search: Option<String>,

        /// Fetch every page instead of one.
        #[arg(long)]
        all: bool,
    },

    /// Delete an entity.
    Delete {
        /// The type of entity to delete.
        entity: Entity,

        /// The numeric ID of the entity.
        id: i64,
    },

    /// Show the authenticated user.
    Me,
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A client or partner company.
    #[value(alias = "companies")]
    Company,
    /// A project.
    #[value(alias = "projects")]
    Project,
    /// A task.
    #[value(alias = "tasks")]
    Task,
    /// A list of tasks inside a project.
    #[value(alias = "tasklists")]
    Tasklist,
    /// A project milestone.
    #[value(alias = "milestones")]
    Milestone,
    /// A tag.
    #[value(alias = "tags")]
    Tag,
    /// A comment.
    #[value(alias = "comments")]
    Comment,
    /// A time log entry.
    #[value(alias = "timelogs", alias = "time")]
    Timelog,
    /// A team.
    #[value(alias = "teams")]
    Team,
    /// A person.
    #[value(alias = "users", alias = "people", alias = "person")]
    User,
}
