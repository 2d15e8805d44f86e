//
//  redmine-cli
//  cli/user.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! User commands

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::api::resources::{User, UserInclude};
use crate::output::{format_timestamp, print_field, print_header, TableOutput, TableRow};

use super::{GlobalOptions, PageArgs};

/// Browse users
#[derive(Args, Debug)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UserSubcommand {
    /// List users (administrators only)
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show the authenticated user
    Me,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by login, name or mail
    #[arg(long)]
    pub name: Option<String>,

    /// Only members of this group
    #[arg(long)]
    pub group: Option<u64>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Serialize)]
struct UserItem {
    id: u64,
    login: String,
    name: String,
    mail: String,
    groups: Vec<String>,
    projects: Vec<String>,
    created_on: String,
    last_login_on: String,
}

impl From<&User> for UserItem {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
            name: user.display_name(),
            mail: user.mail.clone(),
            groups: user.groups.iter().map(|g| g.name.clone()).collect(),
            projects: user
                .memberships
                .iter()
                .filter_map(|m| m.project.as_ref().map(|p| p.name.clone()))
                .collect(),
            created_on: format_timestamp(user.created_on),
            last_login_on: format_timestamp(user.last_login_on),
        }
    }
}

impl TableRow for UserItem {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "LOGIN", "NAME", "MAIL", "LAST LOGIN"]
    }

    fn row(&self, _color: bool) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.login.clone(),
            self.name.clone(),
            self.mail.clone(),
            self.last_login_on.clone(),
        ]
    }
}

impl TableOutput for UserItem {
    fn print_table(&self, color: bool) {
        print_header(&format!("{} ({})", self.name, self.login), color);
        print_field("ID", &self.id.to_string(), color);
        print_field("Mail", &self.mail, color);
        print_field("Groups", &self.groups.join(", "), color);
        print_field("Projects", &self.projects.join(", "), color);
        print_field("Created", &self.created_on, color);
        print_field("Last login", &self.last_login_on, color);
    }
}

impl UserCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        match &self.command {
            UserSubcommand::List(args) => {
                let mut params = args.page.params();
                if let Some(name) = &args.name {
                    params = params.filter("name", name.as_str());
                }
                if let Some(group) = args.group {
                    params = params.filter("group_id", group.to_string());
                }
                let (users, page) = client.list_users(&params).await?;
                let items: Vec<UserItem> = users.iter().map(UserItem::from).collect();
                global.writer().write_list(&items, &page)
            }
            UserSubcommand::Me => {
                let include = UserInclude {
                    memberships: true,
                    groups: true,
                };
                let user = client.get_current_user(&include).await?;
                global.writer().write(&UserItem::from(&user))
            }
        }
    }
}
