//! CLI argument parsing tests.

use clap::Parser;
use twapi::cli::{Cli, Command, Entity};

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["twapi", "get", "company", "42"]);

    assert!(!cli.json);
    match cli.command {
        Command::Get { entity, id } => {
            assert_eq!(entity, Entity::Company);
            assert_eq!(id, 42);
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_rejects_non_numeric_id() {
    let result = Cli::try_parse_from(["twapi", "get", "task", "abc"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_parses_list_subcommand() {
    let cli = Cli::parse_from(["twapi", "list", "projects"]);

    assert!(!cli.json);
    match cli.command {
        Command::List { entity, all, .. } => {
            assert_eq!(entity, Entity::Project);
            assert!(!all);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_parses_delete_subcommand() {
    let cli = Cli::parse_from(["twapi", "delete", "timelog", "9"]);

    match cli.command {
        Command::Delete { entity, id } => {
            assert_eq!(entity, Entity::Timelog);
            assert_eq!(id, 9);
        }
        _ => panic!("Expected Delete command"),
    }
}

#[test]
fn test_cli_parses_me() {
    let cli = Cli::parse_from(["twapi", "me", "--json"]);
    assert!(cli.json);
    assert!(matches!(cli.command, Command::Me));
}

#[test]
fn test_global_json_flag() {
    // --json before subcommand
    let cli = Cli::parse_from(["twapi", "--json", "list", "projects"]);
    assert!(cli.json);

    // --json after subcommand (global flag)
    let cli = Cli::parse_from(["twapi", "list", "projects", "--json"]);
    assert!(cli.json);
}

#[test]
fn test_list_filter_args() {
    let cli = Cli::parse_from([
        "twapi",
        "list",
        "tasks",
        "--page",
        "2",
        "--page-size",
        "25",
        "--project",
        "7",
        "--search",
        "docs",
        "--all",
    ]);

    match cli.command {
        Command::List {
            page,
            page_size,
            project,
            task,
            search,
            all,
            ..
        } => {
            assert_eq!(page, Some(2));
            assert_eq!(page_size, Some(25));
            assert_eq!(project, Some(7));
            assert_eq!(task, None);
            assert_eq!(search.as_deref(), Some("docs"));
            assert!(all);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_entity_aliases() {
    let cases = [
        ("companies", Entity::Company),
        ("tasklists", Entity::Tasklist),
        ("milestones", Entity::Milestone),
        ("tags", Entity::Tag),
        ("comments", Entity::Comment),
        ("time", Entity::Timelog),
        ("teams", Entity::Team),
        ("people", Entity::User),
    ];

    for (name, expected) in cases {
        let cli = Cli::parse_from(["twapi", "list", name]);
        match cli.command {
            Command::List { entity, .. } => assert_eq!(entity, expected, "alias {name}"),
            _ => panic!("Expected List command"),
        }
    }
}

#[test]
fn test_connection_flags() {
    let cli = Cli::parse_from([
        "twapi",
        "me",
        "--server",
        "https://example.teamwork.com",
        "--token",
        "abc",
    ]);

    assert_eq!(cli.server.as_deref(), Some("https://example.teamwork.com"));
    assert_eq!(cli.token.as_deref(), Some("abc"));
}
