//! Teamwork API CLI binary.
//!
//! A command-line interface for interacting with the Teamwork API.

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;
use twapi::cli::{Cli, Command, Entity};
use twapi::{
    collect_all, execute, Comment, CommentDeleteRequest, CommentGetRequest, CommentListRequest,
    CommentResource, Company, CompanyDeleteRequest, CompanyGetRequest, CompanyListRequest,
    Milestone, MilestoneDeleteRequest, MilestoneGetRequest, MilestoneListRequest, PageFilters,
    PagedRequest, Paginated, PrettyPrint, Project, ProjectDeleteRequest, ProjectGetRequest,
    ProjectListRequest, Tag, TagDeleteRequest, TagGetRequest, TagListRequest, Task,
    TaskDeleteRequest, TaskGetRequest, TaskListRequest, Tasklist, TasklistDeleteRequest,
    TasklistGetRequest, TasklistListRequest, Team, TeamDeleteRequest, TeamGetRequest,
    TeamListRequest, TeamworkClient, TeamworkError, Timelog, TimelogDeleteRequest,
    TimelogGetRequest, TimelogListRequest, User, UserDeleteRequest, UserGetRequest,
    UserListRequest, UserMeRequest, DEFAULT_PAGE_SIZE, FIRST_PAGE,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match connect(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set TEAMWORK_SERVER and TEAMWORK_API_TOKEN environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn connect(cli: &Cli) -> twapi::Result<TeamworkClient> {
    match (&cli.server, &cli.token) {
        (Some(server), Some(token)) => TeamworkClient::new(server, token),
        _ => TeamworkClient::from_env(),
    }
}

async fn run(client: &TeamworkClient, cli: Cli) -> twapi::Result<()> {
    match cli.command {
        Command::Get { entity, id } => handle_get(client, entity, id, cli.json).await,
        Command::List {
            entity,
            page,
            page_size,
            project,
            task,
            search,
            all,
        } => {
            let options = ListOptions {
                paging: PageFilters::for_page(
                    page.unwrap_or(FIRST_PAGE),
                    page_size.unwrap_or(DEFAULT_PAGE_SIZE),
                ),
                project,
                task,
                search,
                all,
            };
            handle_list(client, entity, options, cli.json).await
        }
        Command::Delete { entity, id } => handle_delete(client, entity, id, cli.json).await,
        Command::Me => {
            let me = execute(client, &UserMeRequest).await?;
            output_single(&me.person, cli.json)
        }
    }
}

async fn handle_get(
    client: &TeamworkClient,
    entity: Entity,
    id: i64,
    json: bool,
) -> twapi::Result<()> {
    match entity {
        Entity::Company => {
            let response = execute(client, &CompanyGetRequest::new(id)).await?;
            output_single(&response.company, json)
        }
        Entity::Project => {
            let response = execute(client, &ProjectGetRequest::new(id)).await?;
            output_single(&response.project, json)
        }
        Entity::Task => {
            let response = execute(client, &TaskGetRequest::new(id)).await?;
            output_single(&response.task, json)
        }
        Entity::Tasklist => {
            let response = execute(client, &TasklistGetRequest::new(id)).await?;
            output_single(&response.tasklist, json)
        }
        Entity::Milestone => {
            let response = execute(client, &MilestoneGetRequest::new(id)).await?;
            output_single(&response.milestone, json)
        }
        Entity::Tag => {
            let response = execute(client, &TagGetRequest::new(id)).await?;
            output_single(&response.tag, json)
        }
        Entity::Comment => {
            let response = execute(client, &CommentGetRequest::new(id)).await?;
            output_single(&response.comment, json)
        }
        Entity::Timelog => {
            let response = execute(client, &TimelogGetRequest::new(id)).await?;
            output_single(&response.timelog, json)
        }
        Entity::Team => {
            let response = execute(client, &TeamGetRequest::new(id)).await?;
            output_single(&response.team, json)
        }
        Entity::User => {
            let response = execute(client, &UserGetRequest::new(id)).await?;
            output_single(&response.person, json)
        }
    }
}

struct ListOptions {
    paging: PageFilters,
    project: Option<i64>,
    task: Option<i64>,
    search: Option<String>,
    all: bool,
}

async fn handle_list(
    client: &TeamworkClient,
    entity: Entity,
    options: ListOptions,
    json: bool,
) -> twapi::Result<()> {
    let all = options.all;

    match entity {
        Entity::Company => {
            let mut request = CompanyListRequest::new();
            request.filters.search_term = options.search;
            request.filters.paging = options.paging;
            let listing = fetch(client, request, all, |page| page.companies).await?;
            output_listing(&listing, json, |item| CompanyRow::from(item))
        }
        Entity::Project => {
            let mut request = ProjectListRequest::new();
            request.filters.search_term = options.search;
            request.filters.paging = options.paging;
            let listing = fetch(client, request, all, |page| page.projects).await?;
            output_listing(&listing, json, |item| ProjectRow::from(item))
        }
        Entity::Task => {
            let mut request = TaskListRequest::new();
            request.path.project_id = options.project;
            request.filters.search_term = options.search;
            request.filters.paging = options.paging;
            let listing = fetch(client, request, all, |page| page.tasks).await?;
            output_listing(&listing, json, |item| TaskRow::from(item))
        }
        Entity::Tasklist => {
            let mut request = TasklistListRequest::new();
            request.project_id = options.project;
            request.filters.search_term = options.search;
            request.filters.paging = options.paging;
            let listing = fetch(client, request, all, |page| page.tasklists).await?;
            output_listing(&listing, json, |item| TasklistRow::from(item))
        }
        Entity::Milestone => {
            let mut request = MilestoneListRequest::new();
            request.project_id = options.project;
            request.filters.search_term = options.search;
            request.filters.paging = options.paging;
            let listing = fetch(client, request, all, |page| page.milestones).await?;
            output_listing(&listing, json, |item| MilestoneRow::from(item))
        }
        Entity::Tag => {
            let mut request = TagListRequest::new();
            request.filters.project_ids = options.project.into_iter().collect();
            request.filters.search_term = options.search;
            request.filters.paging = options.paging;
            let listing = fetch(client, request, all, |page| page.tags).await?;
            output_listing(&listing, json, |item| TagRow::from(item))
        }
        Entity::Comment => {
            let mut request = match options.task {
                Some(task) => CommentListRequest::for_parent(CommentResource::Task, task),
                None => CommentListRequest::new(),
            };
            request.filters.search_term = options.search;
            request.filters.paging = options.paging;
            let listing = fetch(client, request, all, |page| page.comments).await?;
            output_listing(&listing, json, |item| CommentRow::from(item))
        }
        Entity::Timelog => {
            let mut request = TimelogListRequest::new();
            request.scope.task_id = options.task;
            request.scope.project_id = options.project;
            request.filters.paging = options.paging;
            let listing = fetch(client, request, all, |page| page.timelogs).await?;
            output_listing(&listing, json, |item| TimelogRow::from(item))
        }
        Entity::Team => {
            let mut request = TeamListRequest::new();
            request.project_id = options.project;
            request.filters.search_term = options.search;
            request.filters.paging = options.paging;
            let listing = fetch(client, request, all, |page| page.teams).await?;
            output_listing(&listing, json, |item| TeamRow::from(item))
        }
        Entity::User => {
            let mut request = UserListRequest::new();
            request.project_id = options.project;
            request.filters.search_term = options.search;
            request.filters.paging = options.paging;
            let listing = fetch(client, request, all, |page| page.people).await?;
            output_listing(&listing, json, |item| UserRow::from(item))
        }
    }
}

async fn handle_delete(
    client: &TeamworkClient,
    entity: Entity,
    id: i64,
    json: bool,
) -> twapi::Result<()> {
    match entity {
        Entity::Company => {
            execute(client, &CompanyDeleteRequest::new(id)).await?;
        }
        Entity::Project => {
            execute(client, &ProjectDeleteRequest::new(id)).await?;
        }
        Entity::Task => {
            execute(client, &TaskDeleteRequest::new(id)).await?;
        }
        Entity::Tasklist => {
            execute(client, &TasklistDeleteRequest::new(id)).await?;
        }
        Entity::Milestone => {
            execute(client, &MilestoneDeleteRequest::new(id)).await?;
        }
        Entity::Tag => {
            execute(client, &TagDeleteRequest::new(id)).await?;
        }
        Entity::Comment => {
            execute(client, &CommentDeleteRequest::new(id)).await?;
        }
        Entity::Timelog => {
            execute(client, &TimelogDeleteRequest::new(id)).await?;
        }
        Entity::Team => {
            execute(client, &TeamDeleteRequest::new(id)).await?;
        }
        Entity::User => {
            execute(client, &UserDeleteRequest::new(id)).await?;
        }
    }

    if json {
        println!("{}", to_json(&serde_json::json!({ "deleted": id }))?);
    } else {
        println!("Deleted {:?} {}", entity, id);
    }
    Ok(())
}

/// One page, or every page when `all` is set.
struct Listing<T> {
    items: Vec<T>,
    page: u32,
    has_more: bool,
    all: bool,
}

async fn fetch<R, T, F>(
    client: &TeamworkClient,
    request: R,
    all: bool,
    mut extract: F,
) -> twapi::Result<Listing<T>>
where
    R: PagedRequest,
    R::Response: Paginated<Request = R>,
    F: FnMut(R::Response) -> Vec<T>,
{
    let page = request.paging().page;

    if all {
        let items = collect_all(client, request, extract).await?;
        return Ok(Listing {
            items,
            page,
            has_more: false,
            all,
        });
    }

    let response = execute(client, &request).await?;
    let has_more = response.has_more();
    Ok(Listing {
        items: extract(response),
        page,
        has_more,
        all,
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> twapi::Result<String> {
    serde_json::to_string_pretty(value).map_err(TeamworkError::Encode)
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> twapi::Result<()> {
    if json {
        println!("{}", to_json(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_listing<T, R, F>(listing: &Listing<T>, json: bool, to_row: F) -> twapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", to_json(&listing.items)?);
    } else {
        let rows: Vec<R> = listing.items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        if listing.all {
            println!("\n{} items", listing.items.len());
        } else if listing.has_more {
            println!("\nPage {} (more available)", listing.page);
        } else {
            println!("\nPage {} (end)", listing.page);
        }
    }
    Ok(())
}

// Table row types for non-JSON output

fn or_blank(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

#[derive(Tabled)]
struct CompanyRow {
    id: i64,
    name: String,
    city: String,
    country: String,
    status: String,
}

impl From<&Company> for CompanyRow {
    fn from(c: &Company) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            city: or_blank(c.city.as_deref()),
            country: or_blank(c.country_code.as_deref()),
            status: or_blank(c.status.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct ProjectRow {
    id: i64,
    name: String,
    status: String,
    company: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            status: or_blank(p.status.as_deref()),
            company: p
                .company
                .as_ref()
                .map(|c| c.id.to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct TaskRow {
    id: i64,
    name: String,
    priority: String,
    progress: String,
    due: String,
}

impl From<&Task> for TaskRow {
    fn from(t: &Task) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            priority: t.priority.map(|p| p.to_string()).unwrap_or_default(),
            progress: t.progress.map(|p| format!("{p}%")).unwrap_or_default(),
            due: t
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct TasklistRow {
    id: i64,
    name: String,
    project: String,
}

impl From<&Tasklist> for TasklistRow {
    fn from(t: &Tasklist) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            project: t
                .project
                .as_ref()
                .map(|p| p.id.to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct MilestoneRow {
    id: i64,
    name: String,
    deadline: String,
    completed: String,
}

impl From<&Milestone> for MilestoneRow {
    fn from(m: &Milestone) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            deadline: m.deadline.map(|d| d.to_string()).unwrap_or_default(),
            completed: if m.completed == Some(true) { "yes" } else { "no" }.to_string(),
        }
    }
}

#[derive(Tabled)]
struct TagRow {
    id: i64,
    name: String,
    color: String,
    project: String,
}

impl From<&Tag> for TagRow {
    fn from(t: &Tag) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            color: or_blank(t.color.as_deref()),
            project: t.project_id.map(|p| p.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct CommentRow {
    id: i64,
    author: String,
    posted: String,
    body: String,
}

impl From<&Comment> for CommentRow {
    fn from(c: &Comment) -> Self {
        let mut body: String = c.body.chars().take(60).collect();
        if body.len() < c.body.len() {
            body.push('…');
        }
        Self {
            id: c.id,
            author: c.posted_by.map(|a| a.to_string()).unwrap_or_default(),
            posted: c
                .posted_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            body,
        }
    }
}

#[derive(Tabled)]
struct TimelogRow {
    id: i64,
    user: String,
    duration: String,
    billable: String,
    #[tabled(rename = "on")]
    target: String,
}

impl From<&Timelog> for TimelogRow {
    fn from(t: &Timelog) -> Self {
        let target = match (t.task_id, t.project_id) {
            (Some(task), _) => format!("task {task}"),
            (None, Some(project)) => format!("project {project}"),
            (None, None) => String::new(),
        };
        Self {
            id: t.id,
            user: t.user_id.map(|u| u.to_string()).unwrap_or_default(),
            duration: format!("{}h {:02}m", t.minutes / 60, t.minutes % 60),
            billable: if t.billable { "yes" } else { "no" }.to_string(),
            target,
        }
    }
}

#[derive(Tabled)]
struct TeamRow {
    id: i64,
    name: String,
    handle: String,
    members: usize,
}

impl From<&Team> for TeamRow {
    fn from(t: &Team) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            handle: or_blank(t.handle.as_deref()),
            members: t.members.len(),
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    #[tabled(rename = "type")]
    kind: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.full_name(),
            email: or_blank(u.email.as_deref()),
            kind: or_blank(u.kind.as_deref()),
        }
    }
}
