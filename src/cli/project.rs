//
//  redmine-cli
//  cli/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project commands

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::api::resources::{Project, ProjectInclude};
use crate::output::{
    format_timestamp, print_field, print_header, truncate, TableOutput, TableRow,
};

use super::{GlobalOptions, PageArgs};

/// Browse projects
#[derive(Args, Debug)]
pub struct ProjectCommand {
    #[command(subcommand)]
    pub command: ProjectSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectSubcommand {
    /// List projects
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View project details with its trackers and issue categories
    View(ViewArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Project ID
    pub id: u64,
}

#[derive(Debug, Serialize)]
struct ProjectListItem {
    id: u64,
    identifier: String,
    name: String,
    parent: Option<String>,
    description: String,
}

impl From<&Project> for ProjectListItem {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            identifier: project.identifier.clone(),
            name: project.name.clone(),
            parent: project.parent.as_ref().map(|p| p.name.clone()),
            description: project.description.clone(),
        }
    }
}

impl TableRow for ProjectListItem {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "IDENTIFIER", "NAME", "PARENT", "DESCRIPTION"]
    }

    fn row(&self, _color: bool) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.identifier.clone(),
            self.name.clone(),
            self.parent.clone().unwrap_or_else(|| "-".to_string()),
            truncate(self.description.lines().next().unwrap_or_default(), 50),
        ]
    }
}

#[derive(Debug, Serialize)]
struct ProjectDetail {
    id: u64,
    identifier: String,
    name: String,
    homepage: String,
    parent: Option<String>,
    description: String,
    trackers: Vec<String>,
    issue_categories: Vec<String>,
    created_on: String,
    updated_on: String,
}

impl TableOutput for ProjectDetail {
    fn print_table(&self, color: bool) {
        print_header(&format!("{} ({})", self.name, self.identifier), color);
        print_field("ID", &self.id.to_string(), color);
        print_field("Parent", self.parent.as_deref().unwrap_or_default(), color);
        print_field("Homepage", &self.homepage, color);
        print_field("Trackers", &self.trackers.join(", "), color);
        print_field("Categories", &self.issue_categories.join(", "), color);
        print_field("Created", &self.created_on, color);
        print_field("Updated", &self.updated_on, color);
        if !self.description.is_empty() {
            println!();
            println!("{}", self.description);
        }
    }
}

impl ProjectCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ProjectSubcommand::List(args) => {
                let client = global.client()?;
                let (projects, page) = client.list_projects(&args.page.params()).await?;
                let items: Vec<ProjectListItem> =
                    projects.iter().map(ProjectListItem::from).collect();
                global.writer().write_list(&items, &page)
            }
            ProjectSubcommand::View(args) => {
                let client = global.client()?;
                let include = ProjectInclude {
                    trackers: true,
                    issue_categories: true,
                };
                let project = client.get_project(args.id, &include).await?;
                let detail = ProjectDetail {
                    id: project.id,
                    identifier: project.identifier,
                    name: project.name,
                    homepage: project.homepage,
                    parent: project.parent.map(|p| p.name),
                    description: project.description,
                    trackers: project.trackers.into_iter().map(|t| t.name).collect(),
                    issue_categories: project
                        .issue_categories
                        .into_iter()
                        .map(|c| c.name)
                        .collect(),
                    created_on: format_timestamp(project.created_on),
                    updated_on: format_timestamp(project.updated_on),
                };
                global.writer().write(&detail)
            }
        }
    }
}
