//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use chrono::{DateTime, Utc};

use crate::values::Relationship;
use crate::{Comment, Company, Milestone, Project, Tag, Task, Tasklist, Team, Timelog, User};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(kind: &str, name: &str, id: i64) -> Vec<String> {
    let title = format!("{kind} #{id}: {name}");
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn reference(rel: &Relationship) -> String {
    match rel.name {
        Some(ref name) => format!("{name} ({})", rel.id),
        None => rel.id.to_string(),
    }
}

fn ids(rels: &[Relationship]) -> String {
    rels.iter()
        .map(|r| r.id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl PrettyPrint for Company {
    fn pretty_print(&self) -> String {
        let mut lines = header("Company", &self.name, self.id);

        let address: Vec<&str> = [
            &self.address_one,
            &self.address_two,
            &self.city,
            &self.state,
            &self.zip,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect();
        if !address.is_empty() {
            lines.push(format!("Address:        {}", address.join(", ")));
        }

        if let Some(ref country) = self.country_code {
            lines.push(format!("Country:        {}", country));
        }

        if let Some(ref website) = self.website {
            lines.push(format!("Website:        {}", website));
        }

        if let Some(ref email) = self.email_one {
            lines.push(format!("Email:          {}", email));
        }

        if let Some(ref manager) = self.client_managed_by {
            lines.push(format!("Managed by:     {}", reference(manager)));
        }

        if !self.tags.is_empty() {
            lines.push(format!("Tags:           {}", ids(&self.tags)));
        }

        if let Some(ref status) = self.status {
            lines.push(format!("Status:         {}", status));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let mut lines = header("Project", &self.name, self.id);

        if let Some(ref status) = self.status {
            match self.sub_status {
                Some(ref sub) => lines.push(format!("Status:         {} ({})", status, sub)),
                None => lines.push(format!("Status:         {}", status)),
            }
        }

        if let Some(ref company) = self.company {
            lines.push(format!("Company:        {}", reference(company)));
        }

        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) => lines.push(format!("Dates:          {} to {}", start, end)),
            (Some(start), None) => lines.push(format!("Starts:         {}", start)),
            (None, Some(end)) => lines.push(format!("Ends:           {}", end)),
            (None, None) => {}
        }

        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", timestamp(created)));
        }

        if let Some(ref description) = self.description {
            if !description.is_empty() {
                lines.push(String::new());
                lines.push(description.clone());
            }
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Task {
    fn pretty_print(&self) -> String {
        let mut lines = header("Task", &self.name, self.id);

        if let Some(ref status) = self.status {
            lines.push(format!("Status:         {}", status));
        }

        if let Some(ref priority) = self.priority {
            lines.push(format!("Priority:       {}", priority));
        }

        if let Some(progress) = self.progress {
            lines.push(format!("Progress:       {}%", progress));
        }

        if let Some(ref tasklist) = self.tasklist {
            lines.push(format!("Tasklist:       {}", reference(tasklist)));
        }

        if let Some(ref due) = self.due_date {
            lines.push(format!("Due:            {}", due.format("%Y-%m-%d")));
        }

        if let Some(minutes) = self.estimate_minutes {
            lines.push(format!("Estimate:       {}h {:02}m", minutes / 60, minutes % 60));
        }

        if !self.assignees.is_empty() {
            lines.push(format!("Assignees:      {}", ids(&self.assignees)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Tasklist {
    fn pretty_print(&self) -> String {
        let mut lines = header("Tasklist", &self.name, self.id);

        if let Some(ref project) = self.project {
            lines.push(format!("Project:        {}", reference(project)));
        }

        if let Some(ref milestone) = self.milestone {
            lines.push(format!("Milestone:      {}", reference(milestone)));
        }

        if self.is_private == Some(true) {
            lines.push("Visibility:     private".to_string());
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Milestone {
    fn pretty_print(&self) -> String {
        let mut lines = header("Milestone", &self.name, self.id);

        if let Some(deadline) = self.deadline {
            lines.push(format!("Deadline:       {}", deadline));
        }

        lines.push(format!(
            "Completed:      {}",
            if self.completed == Some(true) { "yes" } else { "no" }
        ));

        if let Some(ref project) = self.project {
            lines.push(format!("Project:        {}", reference(project)));
        }

        if !self.responsible_parties.is_empty() {
            lines.push(format!("Responsible:    {}", ids(&self.responsible_parties)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Tag {
    fn pretty_print(&self) -> String {
        let mut lines = header("Tag", &self.name, self.id);

        if let Some(ref color) = self.color {
            lines.push(format!("Color:          {}", color));
        }

        match self.project_id {
            Some(project) => lines.push(format!("Project:        {}", project)),
            None => lines.push("Project:        (site-wide)".to_string()),
        }

        if let Some(count) = self.count {
            lines.push(format!("Used:           {} items", count));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Comment {
    fn pretty_print(&self) -> String {
        let mut lines = vec![format!("Comment #{}", self.id), "─".repeat(30)];

        if let Some(ref object) = self.object {
            let kind = object.kind.as_deref().unwrap_or("item");
            lines.push(format!("On:             {} {}", kind, object.id));
        }

        if let Some(author) = self.posted_by {
            lines.push(format!("Posted by:      {}", author));
        }

        if let Some(ref posted) = self.posted_at {
            lines.push(format!("Posted:         {}", timestamp(posted)));
        }

        lines.push(String::new());
        lines.push(self.body.clone());

        lines.join("\n")
    }
}

impl PrettyPrint for Timelog {
    fn pretty_print(&self) -> String {
        let mut lines = vec![format!("Time log #{}", self.id), "─".repeat(30)];

        lines.push(format!(
            "Duration:       {}h {:02}m",
            self.minutes / 60,
            self.minutes % 60
        ));
        lines.push(format!(
            "Billable:       {}",
            if self.billable { "yes" } else { "no" }
        ));

        if let Some(ref logged) = self.time_logged {
            lines.push(format!("Logged for:     {}", timestamp(logged)));
        }

        if let Some(user) = self.user_id {
            lines.push(format!("User:           {}", user));
        }

        if let Some(task) = self.task_id {
            lines.push(format!("Task:           {}", task));
        } else if let Some(project) = self.project_id {
            lines.push(format!("Project:        {}", project));
        }

        if let Some(ref description) = self.description {
            lines.push(format!("Description:    {}", description));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Team {
    fn pretty_print(&self) -> String {
        let mut lines = header("Team", &self.name, self.id);

        if let Some(ref handle) = self.handle {
            lines.push(format!("Handle:         @{}", handle));
        }

        if let Some(ref kind) = self.team_type {
            lines.push(format!("Type:           {}", kind));
        }

        lines.push(format!("Members:        {}", self.members.len()));

        lines.join("\n")
    }
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        let mut lines = header("User", &self.full_name(), self.id);

        if let Some(ref email) = self.email {
            lines.push(format!("Email:          {}", email));
        }

        if let Some(ref title) = self.title {
            lines.push(format!("Title:          {}", title));
        }

        if let Some(ref kind) = self.kind {
            lines.push(format!("Type:           {}", kind));
        }

        if let Some(ref company) = self.company {
            lines.push(format!("Company:        {}", reference(company)));
        }

        if self.is_admin {
            lines.push("Role:           administrator".to_string());
        }

        if let Some(ref last) = self.last_login {
            lines.push(format!("Last login:     {}", timestamp(last)));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_pretty_print_format() {
        let company: Company = serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "Acme",
            "city": "Cork",
            "countryCode": "IE",
            "tags": [{"id": 1}, {"id": 2}]
        }))
        .unwrap();

        let output = company.pretty_print();
        assert!(output.starts_with("Company #42: Acme"));
        assert!(output.contains("Address:        Cork"));
        assert!(output.contains("Tags:           1, 2"));
    }

    #[test]
    fn test_timelog_duration() {
        let timelog = Timelog {
            id: 3,
            minutes: 95,
            billable: true,
            ..Default::default()
        };
        let output = timelog.pretty_print();
        assert!(output.contains("Duration:       1h 35m"));
        assert!(output.contains("Billable:       yes"));
    }

    #[test]
    fn test_tag_without_project_is_site_wide() {
        let tag = Tag {
            id: 1,
            name: "urgent".to_string(),
            ..Default::default()
        };
        assert!(tag.pretty_print().contains("(site-wide)"));
    }
}
