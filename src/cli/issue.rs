//
//  redmine-cli
//  cli/issue.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue commands
//!
//! List, view, create and delete issues. Files passed with `--attach` are
//! uploaded first and attached through their upload tokens.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use crate::api::resources::{Enumeration, Issue, IssueInclude, Project, Tracker, Upload, User};
use crate::api::common::CustomFieldValue;
use crate::api::{Params, RedmineClient};
use crate::output::{
    format_date, format_status, format_timestamp, print_field, print_header, truncate,
    OutputFormat, TableOutput, TableRow,
};

use super::{GlobalOptions, PageArgs};

/// Manage issues
#[derive(Args, Debug)]
pub struct IssueCommand {
    #[command(subcommand)]
    pub command: IssueSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum IssueSubcommand {
    /// List issues
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View an issue
    View(ViewArgs),

    /// Create a new issue
    Create(CreateArgs),

    /// Delete an issue
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only issues of this project (and its sub-projects)
    #[arg(long, short = 'p')]
    pub project: Option<u64>,

    /// Status filter: open, closed, * or a status id
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Assignee filter: me or a user id
    #[arg(long, short = 'a')]
    pub assigned_to: Option<String>,

    /// Sort order, e.g. updated_on:desc
    #[arg(long)]
    pub sort: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Issue ID
    pub id: u64,

    /// Include the history
    #[arg(long, short = 'j')]
    pub journals: bool,

    /// Include related issues
    #[arg(long)]
    pub relations: bool,

    /// Include subtasks
    #[arg(long)]
    pub children: bool,

    /// Include attachments
    #[arg(long)]
    pub attachments: bool,

    /// Include repository changesets
    #[arg(long)]
    pub changesets: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project ID
    #[arg(long, short = 'p')]
    pub project: u64,

    /// Issue subject
    #[arg(long, short = 's')]
    pub subject: String,

    /// Issue description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Tracker ID
    #[arg(long, short = 't')]
    pub tracker: Option<u64>,

    /// Priority ID
    #[arg(long)]
    pub priority: Option<u64>,

    /// Assignee user ID
    #[arg(long, short = 'a')]
    pub assigned_to: Option<u64>,

    /// File to attach (repeatable)
    #[arg(long = "attach", value_name = "FILE")]
    pub attachments: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Issue ID
    pub id: u64,
}

// Display types

#[derive(Debug, Serialize)]
struct IssueListItem {
    id: u64,
    tracker: String,
    status: String,
    #[serde(skip)]
    is_closed: bool,
    priority: String,
    subject: String,
    assigned_to: Option<String>,
    updated_on: String,
}

impl From<&Issue> for IssueListItem {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.id,
            tracker: issue.tracker.as_ref().map(|t| t.name.clone()).unwrap_or_default(),
            status: issue.status.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
            is_closed: issue.status.as_ref().is_some_and(|s| s.is_closed),
            priority: issue.priority.as_ref().map(|p| p.name.clone()).unwrap_or_default(),
            subject: issue.subject.clone(),
            assigned_to: issue.assigned_to.as_deref().map(User::display_name),
            updated_on: format_timestamp(issue.updated_on),
        }
    }
}

impl TableRow for IssueListItem {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "TRACKER", "STATUS", "PRIORITY", "ASSIGNEE", "SUBJECT", "UPDATED"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            format!("#{}", self.id),
            self.tracker.clone(),
            format_status(&self.status, self.is_closed, color),
            self.priority.clone(),
            self.assigned_to.clone().unwrap_or_else(|| "-".to_string()),
            truncate(&self.subject, 60),
            self.updated_on.clone(),
        ]
    }
}

#[derive(Debug, Serialize)]
struct JournalDisplay {
    author: String,
    created_on: String,
    notes: String,
    changes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct IssueDetail {
    id: u64,
    subject: String,
    project: String,
    tracker: String,
    status: String,
    priority: String,
    author: String,
    assigned_to: Option<String>,
    category: Option<String>,
    target_version: Option<String>,
    parent_id: Option<u64>,
    start_date: String,
    due_date: String,
    done_ratio: u32,
    estimated_hours: f64,
    spent_hours: f64,
    description: String,
    custom_fields: Vec<(String, String)>,
    created_on: String,
    updated_on: String,
    journals: Vec<JournalDisplay>,
    relations: Vec<String>,
    children: Vec<String>,
    attachments: Vec<String>,
    changesets: Vec<String>,
}

impl From<&Issue> for IssueDetail {
    fn from(issue: &Issue) -> Self {
        fn name_of<T>(reference: &Option<Box<T>>, name: impl Fn(&T) -> String) -> String {
            reference.as_deref().map(name).unwrap_or_default()
        }

        Self {
            id: issue.id,
            subject: issue.subject.clone(),
            project: name_of(&issue.project, |p| p.name.clone()),
            tracker: name_of(&issue.tracker, |t| t.name.clone()),
            status: name_of(&issue.status, |s| s.name.clone()),
            priority: name_of(&issue.priority, |p| p.name.clone()),
            author: name_of(&issue.author, User::display_name),
            assigned_to: issue.assigned_to.as_deref().map(User::display_name),
            category: issue.category.as_ref().map(|c| c.name.clone()),
            target_version: issue.fixed_version.as_ref().map(|v| v.name.clone()),
            parent_id: issue.parent.as_ref().map(|p| p.id),
            start_date: format_date(issue.start_date),
            due_date: format_date(issue.due_date),
            done_ratio: issue.done_ratio,
            estimated_hours: issue.estimated_hours,
            spent_hours: issue.spent_hours,
            description: issue.description.clone(),
            custom_fields: issue
                .custom_fields
                .iter()
                .map(|f| {
                    let value = match &f.value {
                        CustomFieldValue::Single(v) => v.clone(),
                        CustomFieldValue::Multiple(vs) => vs.join(", "),
                    };
                    (f.name.clone(), value)
                })
                .collect(),
            created_on: format_timestamp(issue.created_on),
            updated_on: format_timestamp(issue.updated_on),
            journals: issue
                .journals
                .iter()
                .map(|j| JournalDisplay {
                    author: name_of(&j.user, User::display_name),
                    created_on: format_timestamp(j.created_on),
                    notes: j.notes.clone(),
                    changes: j
                        .details
                        .iter()
                        .map(|d| format!("{} {}: {} -> {}", d.property, d.name, d.old_value, d.new_value))
                        .collect(),
                })
                .collect(),
            relations: issue
                .relations
                .iter()
                .map(|r| {
                    let other = if r.issue_id == issue.id { r.issue_to_id } else { r.issue_id };
                    format!("{} #{}", r.kind().as_str(), other)
                })
                .collect(),
            children: issue
                .children
                .iter()
                .map(|c| format!("#{} {}", c.id, c.subject))
                .collect(),
            attachments: issue
                .attachments
                .iter()
                .map(|a| format!("{} ({} bytes) {}", a.filename, a.filesize, a.content_url))
                .collect(),
            changesets: issue
                .changesets
                .iter()
                .map(|c| format!("{} {}", c.revision, c.comments.lines().next().unwrap_or_default()))
                .collect(),
        }
    }
}

impl TableOutput for IssueDetail {
    fn print_table(&self, color: bool) {
        let heading = format!("{} #{}: {}", self.tracker, self.id, self.subject);
        print_header(&heading, color);

        print_field("Project", &self.project, color);
        print_field("Status", &self.status, color);
        print_field("Priority", &self.priority, color);
        print_field("Author", &self.author, color);
        print_field(
            "Assignee",
            self.assigned_to.as_deref().unwrap_or("Unassigned"),
            color,
        );
        print_field("Category", self.category.as_deref().unwrap_or_default(), color);
        print_field(
            "Target version",
            self.target_version.as_deref().unwrap_or_default(),
            color,
        );
        if let Some(parent) = self.parent_id {
            print_field("Parent", &format!("#{}", parent), color);
        }
        print_field("Start date", &self.start_date, color);
        print_field("Due date", &self.due_date, color);
        print_field("Done", &format!("{}%", self.done_ratio), color);
        if self.estimated_hours > 0.0 {
            print_field("Estimated", &format!("{:.2} h", self.estimated_hours), color);
        }
        if self.spent_hours > 0.0 {
            print_field("Spent", &format!("{:.2} h", self.spent_hours), color);
        }
        for (name, value) in &self.custom_fields {
            print_field(name, value, color);
        }
        print_field("Created", &self.created_on, color);
        print_field("Updated", &self.updated_on, color);

        if !self.description.is_empty() {
            println!();
            print_header("Description", color);
            println!("{}", self.description);
        }

        print_section("Subtasks", &self.children, color);
        print_section("Related issues", &self.relations, color);
        print_section("Attachments", &self.attachments, color);
        print_section("Changesets", &self.changesets, color);

        if !self.journals.is_empty() {
            println!();
            print_header("History", color);
            for journal in &self.journals {
                let author = if color {
                    style(&journal.author).cyan().bold().to_string()
                } else {
                    journal.author.clone()
                };
                println!("{} on {}:", author, journal.created_on);
                for change in &journal.changes {
                    println!("  * {}", change);
                }
                for line in journal.notes.lines() {
                    println!("  {}", line);
                }
                println!();
            }
        }
    }
}

fn print_section(title: &str, lines: &[String], color: bool) {
    if lines.is_empty() {
        return;
    }
    println!();
    print_header(title, color);
    for line in lines {
        println!("  {}", line);
    }
}

impl IssueCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            IssueSubcommand::List(args) => self.list(args, global).await,
            IssueSubcommand::View(args) => self.view(args, global).await,
            IssueSubcommand::Create(args) => self.create(args, global).await,
            IssueSubcommand::Delete(args) => self.delete(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let params = list_params(args);

        let (issues, page) = match args.project {
            Some(project_id) => client.list_project_issues(project_id, &params).await?,
            None => client.list_issues(&params).await?,
        };

        let items: Vec<IssueListItem> = issues.iter().map(IssueListItem::from).collect();
        global.writer().write_list(&items, &page)
    }

    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let include = IssueInclude {
            journals: args.journals,
            relations: args.relations,
            children: args.children,
            attachments: args.attachments,
            changesets: args.changesets,
            ..Default::default()
        };

        let issue = client.get_issue(args.id, &include).await?;
        global.writer().write(&IssueDetail::from(&issue))
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let writer = global.writer();

        let mut uploads = Vec::with_capacity(args.attachments.len());
        for path in &args.attachments {
            uploads.push(upload_attachment(&client, path).await?);
        }

        let issue = Issue {
            project: Some(Box::new(Project::with_id(args.project))),
            subject: args.subject.clone(),
            description: args.description.clone().unwrap_or_default(),
            tracker: args.tracker.map(|id| Box::new(Tracker::with_id(id))),
            priority: args.priority.map(|id| Box::new(Enumeration::with_id(id))),
            assigned_to: args.assigned_to.map(|id| Box::new(User::with_id(id))),
            ..Default::default()
        };

        let created = client.create_issue(&issue, &uploads).await?;
        if writer.format() == OutputFormat::Json {
            return writer.write(&IssueDetail::from(&created));
        }
        writer.write_success(&format!(
            "Created issue #{}: {}",
            created.id, created.subject
        ));
        print_issue_url(&client, created.id);
        Ok(())
    }

    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        client.delete_issue(args.id).await?;
        global
            .writer()
            .write_success(&format!("Deleted issue #{}", args.id));
        Ok(())
    }
}

fn list_params(args: &ListArgs) -> Params {
    let mut params = args.page.params();
    if let Some(sort) = &args.sort {
        params = params.sort(sort.as_str());
    }
    if let Some(status) = &args.status {
        params = params.filter("status_id", status.as_str());
    }
    if let Some(assignee) = &args.assigned_to {
        params = params.filter("assigned_to_id", assignee.as_str());
    }
    params
}

async fn upload_attachment(client: &RedmineClient, path: &Path) -> Result<Upload> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read attachment {}", path.display()))?;
    let token = client
        .upload_file(bytes)
        .await
        .with_context(|| format!("Failed to upload {}", path.display()))?;

    Ok(Upload {
        token,
        filename: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        ..Default::default()
    })
}

fn print_issue_url(client: &RedmineClient, id: u64) {
    if let Ok(url) = client.base_url().join(&format!("issues/{}", id)) {
        println!("  {}", style(url).dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resources::IssueStatus;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: IssueSubcommand,
    }

    #[test]
    fn test_list_params() {
        let cli = TestCli::try_parse_from([
            "issue", "list", "--status", "closed", "--assigned-to", "me", "--sort",
            "priority:desc", "--offset", "50",
        ])
        .unwrap();
        let IssueSubcommand::List(args) = cli.command else {
            panic!("expected list");
        };
        let params = list_params(&args);
        assert_eq!(params.get("status_id"), Some("closed"));
        assert_eq!(params.get("assigned_to_id"), Some("me"));
        assert_eq!(params.get("sort"), Some("priority:desc"));
        assert_eq!(params.get("offset"), Some("50"));
        assert_eq!(params.get("limit"), Some("25"));
    }

    #[test]
    fn test_create_collects_attachments() {
        let cli = TestCli::try_parse_from([
            "issue", "create", "-p", "3", "-s", "Crash", "--attach", "a.log", "--attach", "b.png",
        ])
        .unwrap();
        let IssueSubcommand::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.attachments.len(), 2);
        assert_eq!(args.project, 3);
    }

    #[test]
    fn test_list_item_marks_closed_status() {
        let issue = Issue {
            id: 7,
            status: Some(Box::new(IssueStatus {
                id: 5,
                name: "Closed".to_string(),
                is_closed: true,
                ..Default::default()
            })),
            ..Default::default()
        };
        let item = IssueListItem::from(&issue);
        assert!(item.is_closed);
        assert_eq!(item.row(false)[2], "Closed");
        assert_eq!(item.row(false)[4], "-");
    }

    #[tokio::test]
    async fn test_upload_attachment_uses_file_name() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/uploads.json")
            .with_status(201)
            .with_body(r#"{"upload": {"token": "7167.ed1c"}}"#)
            .create_async()
            .await;
        let client = RedmineClient::with_api_key(&server.url(), "test-key").unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("trace.log");
        std::fs::write(&path, b"stack").unwrap();

        let upload = upload_attachment(&client, &path).await.unwrap();
        assert_eq!(upload.token, "7167.ed1c");
        assert_eq!(upload.filename, "trace.log");
    }
}
