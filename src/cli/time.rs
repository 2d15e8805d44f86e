//
//  redmine-cli
//  cli/time.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Time tracking commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::{ArgGroup, Args, Subcommand};
use serde::Serialize;

use crate::api::resources::{Enumeration, Issue, Project, TimeEntry, User};
use crate::api::Params;
use crate::output::{format_date, truncate, TableOutput, TableRow};

use super::{GlobalOptions, PageArgs};

/// Track spent time
#[derive(Args, Debug)]
pub struct TimeCommand {
    #[command(subcommand)]
    pub command: TimeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TimeSubcommand {
    /// List time entries
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Log time on an issue or project
    Log(LogArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only entries of this project
    #[arg(long, short = 'p')]
    pub project: Option<u64>,

    /// Only entries of this user (or "me")
    #[arg(long, short = 'u')]
    pub user: Option<String>,

    /// Only entries spent on or after this date
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Only entries spent on or before this date
    #[arg(long)]
    pub to: Option<NaiveDate>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["issue", "project"])))]
pub struct LogArgs {
    /// Hours spent
    #[arg(long)]
    pub hours: f64,

    /// Issue ID
    #[arg(long, short = 'i')]
    pub issue: Option<u64>,

    /// Project ID
    #[arg(long, short = 'p')]
    pub project: Option<u64>,

    /// Activity ID (see time entry activities)
    #[arg(long, short = 'a')]
    pub activity: Option<u64>,

    /// Comment
    #[arg(long, short = 'c')]
    pub comments: Option<String>,

    /// Day the time was spent (YYYY-MM-DD), defaults to today on the server
    #[arg(long)]
    pub spent_on: Option<NaiveDate>,
}

impl LogArgs {
    fn entry(&self) -> TimeEntry {
        TimeEntry {
            hours: self.hours,
            issue: self.issue.map(|id| Box::new(Issue::with_id(id))),
            project: self.project.map(|id| Box::new(Project::with_id(id))),
            activity: self.activity.map(|id| Box::new(Enumeration::with_id(id))),
            comments: self.comments.clone().unwrap_or_default(),
            spent_on: self.spent_on,
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize)]
struct TimeEntryItem {
    id: u64,
    spent_on: String,
    user: String,
    project: String,
    issue_id: Option<u64>,
    activity: String,
    hours: f64,
    comments: String,
}

impl From<&TimeEntry> for TimeEntryItem {
    fn from(entry: &TimeEntry) -> Self {
        Self {
            id: entry.id,
            spent_on: format_date(entry.spent_on),
            user: entry.user.as_deref().map(User::display_name).unwrap_or_default(),
            project: entry.project.as_ref().map(|p| p.name.clone()).unwrap_or_default(),
            issue_id: entry.issue.as_ref().map(|i| i.id),
            activity: entry.activity.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
            hours: entry.hours,
            comments: entry.comments.clone(),
        }
    }
}

impl TableRow for TimeEntryItem {
    fn headers() -> Vec<&'static str> {
        vec!["DATE", "USER", "PROJECT", "ISSUE", "ACTIVITY", "HOURS", "COMMENT"]
    }

    fn row(&self, _color: bool) -> Vec<String> {
        vec![
            self.spent_on.clone(),
            self.user.clone(),
            self.project.clone(),
            self.issue_id.map(|id| format!("#{}", id)).unwrap_or_else(|| "-".to_string()),
            self.activity.clone(),
            format!("{:.2}", self.hours),
            truncate(&self.comments, 40),
        ]
    }
}

impl TableOutput for TimeEntryItem {
    fn print_table(&self, _color: bool) {
        let target = match self.issue_id {
            Some(id) => format!("issue #{}", id),
            None => self.project.clone(),
        };
        println!(
            "Logged {:.2} h on {} ({}) for {}",
            self.hours, target, self.activity, self.spent_on
        );
    }
}

impl TimeCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        match &self.command {
            TimeSubcommand::List(args) => {
                let (entries, page) = client.list_time_entries(&list_params(args)).await?;
                let items: Vec<TimeEntryItem> = entries.iter().map(TimeEntryItem::from).collect();
                let writer = global.writer();
                writer.write_list(&items, &page)?;
                if !global.json && !items.is_empty() {
                    let total: f64 = items.iter().map(|i| i.hours).sum();
                    println!("Total on this page: {:.2} h", total);
                }
                Ok(())
            }
            TimeSubcommand::Log(args) => {
                let created = client.create_time_entry(&args.entry()).await?;
                global.writer().write(&TimeEntryItem::from(&created))
            }
        }
    }
}

fn list_params(args: &ListArgs) -> Params {
    let mut params = args.page.params();
    if let Some(project) = args.project {
        params = params.filter("project_id", project.to_string());
    }
    if let Some(user) = &args.user {
        params = params.filter("user_id", user.as_str());
    }
    if let Some(from) = args.from {
        params = params.filter("from", from.to_string());
    }
    if let Some(to) = args.to {
        params = params.filter("to", to.to_string());
    }
    params
}
