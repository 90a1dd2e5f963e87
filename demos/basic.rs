//! Basic example demonstrating the Teamwork API client.
//!
//! Run with:
//! ```
//! export TEAMWORK_SERVER=https://example.teamwork.com
//! export TEAMWORK_API_TOKEN=your-token
//! cargo run --example basic
//! ```

use std::time::Duration;

use twapi::{
    collect_all, execute, execute_with_cancel, Engine, Paginated, ProjectListRequest,
    TaskListRequest, TeamworkClient, TeamworkError, TimelogListRequest, UserMeRequest,
};

#[tokio::main]
async fn main() -> twapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Teamwork client...");
    let client = TeamworkClient::from_env()?;
    println!("Connected to: {}", client.server());

    let me = execute(&client, &UserMeRequest).await?;
    println!("Signed in as {} (#{})", me.person.full_name(), me.person.id);

    // List first page of projects
    println!("\n--- Listing Projects (first page) ---");
    let mut request = ProjectListRequest::new();
    request.filters.paging.page_size = 10;
    let projects = execute(&client, &request).await?;
    println!(
        "Found {} projects (more: {})",
        projects.projects.len(),
        projects.has_more()
    );

    for project in &projects.projects {
        println!("  - {} ({})", project.name, project.id);
    }

    if let Some(first) = projects.projects.first() {
        // Walk every page of the first project's tasks
        println!("\n--- Tasks in {} ---", first.name);
        let request = TaskListRequest::for_project(first.id);
        let tasks = collect_all(&client, request, |page| page.tasks).await?;
        println!("Found {} tasks", tasks.len());
        for task in tasks.iter().take(5) {
            let priority = task.priority.map_or("none".to_string(), |p| p.to_string());
            println!("  - {} [{}]", task.name, priority);
        }

        // Time logs, giving up after five seconds
        println!("\n--- Time Logged on {} ---", first.name);
        let timeout = tokio::time::sleep(Duration::from_secs(5));
        let request = TimelogListRequest::for_project(first.id);
        match execute_with_cancel(&client, &request, timeout).await {
            Ok(page) => {
                let minutes: i64 = page.timelogs.iter().map(|t| t.minutes).sum();
                println!("{}h {:02}m on the first page", minutes / 60, minutes % 60);
            }
            Err(TeamworkError::Cancelled) => println!("Gave up waiting for time logs"),
            Err(e) => return Err(e),
        }
    }

    println!("\nDone!");
    Ok(())
}
