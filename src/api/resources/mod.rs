//
//  redmine-cli
//  api/resources/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Redmine resource kinds.
//!
//! Every module follows the same layout: the domain types decoded from the
//! wire, a private payload struct for the writable ones, and an
//! `impl RedmineClient` block with the operations.
//!
//! | Module | Collection path |
//! |--------|-----------------|
//! | [`issues`] | `issues.json`, `projects/<id>/issues.json` |
//! | [`projects`] | `projects.json` |
//! | [`users`] | `users.json`, `users/current.json` |
//! | [`groups`] | `groups.json` |
//! | [`memberships`] | `projects/<id>/memberships.json`, `memberships/<id>.json` |
//! | [`versions`] | `projects/<id>/versions.json`, `versions/<id>.json` |
//! | [`time_entries`] | `time_entries.json` |
//! | [`issue_categories`] | `projects/<id>/issue_categories.json`, `issue_categories/<id>.json` |
//! | [`relations`] | `issues/<id>/relations.json`, `relations/<id>.json` |
//! | [`wiki`] | `projects/<id>/wiki/index.json`, `projects/<id>/wiki/<title>.json` |
//! | [`attachments`] | `attachments/<id>.json` |
//! | [`uploads`] | `uploads.json` |
//! | [`news`] | `news.json`, `projects/<id>/news.json` |
//! | [`queries`] | `queries.json` |
//! | [`issue_statuses`] | `issue_statuses.json` |
//! | [`trackers`] | `trackers.json` |
//! | [`roles`] | `roles.json` |
//! | [`enumerations`] | `enumerations/<kind>.json` |

pub mod attachments;
pub mod enumerations;
pub mod groups;
pub mod issue_categories;
pub mod issue_statuses;
pub mod issues;
pub mod memberships;
pub mod news;
pub mod projects;
pub mod queries;
pub mod relations;
pub mod roles;
pub mod time_entries;
pub mod trackers;
pub mod uploads;
pub mod users;
pub mod versions;
pub mod wiki;

pub use attachments::*;
pub use enumerations::*;
pub use groups::*;
pub use issue_categories::*;
pub use issue_statuses::*;
pub use issues::*;
pub use memberships::*;
pub use news::*;
pub use projects::*;
pub use queries::*;
pub use relations::*;
pub use roles::*;
pub use time_entries::*;
pub use trackers::*;
pub use uploads::*;
pub use users::*;
pub use versions::*;
pub use wiki::*;
