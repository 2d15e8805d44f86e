//
//  redmine-cli
//  api/resources/relations.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue relations API types and operations.
//!
//! A relation links `issue_id` to `issue_to_id`. Relations are created
//! under the source issue and addressed by their own id afterwards.
//!
//! # Relation Types
//!
//! | Type | Inverse |
//! |------|---------|
//! | `relates` | `relates` |
//! | `duplicates` | `duplicated` |
//! | `blocks` | `blocked` |
//! | `precedes` | `follows` |
//! | `copied_to` | `copied_from` |
//!
//! `delay` (in days) only applies to `precedes` and `follows`.

use serde::{Deserialize, Serialize};

use crate::api::common::codec::{decode_list, decode_single, envelope, is_zero, nullable};
use crate::api::common::{ApiResult, Pagination, Params};
use crate::api::RedmineClient;

/// Kind of an issue relation. Unknown values decode as `Relates`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Duplicates,
    Duplicated,
    Blocks,
    Blocked,
    Precedes,
    Follows,
    CopiedTo,
    CopiedFrom,
    #[default]
    #[serde(other)]
    Relates,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relates => "relates",
            Self::Duplicates => "duplicates",
            Self::Duplicated => "duplicated",
            Self::Blocks => "blocks",
            Self::Blocked => "blocked",
            Self::Precedes => "precedes",
            Self::Follows => "follows",
            Self::CopiedTo => "copied_to",
            Self::CopiedFrom => "copied_from",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IssueRelation {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub issue_id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub issue_to_id: u64,
    #[serde(default)]
    pub relation_type: Option<RelationType>,
    #[serde(default, deserialize_with = "nullable")]
    pub delay: i64,
}

impl IssueRelation {
    /// The relation type, defaulting to `Relates` when unset.
    pub fn kind(&self) -> RelationType {
        self.relation_type.unwrap_or_default()
    }

    fn encode(&self) -> IssueRelationPayload {
        IssueRelationPayload {
            issue_to_id: self.issue_to_id,
            relation_type: self.relation_type,
            delay: self.delay,
        }
    }
}

#[derive(Debug, Serialize)]
struct IssueRelationPayload {
    #[serde(skip_serializing_if = "is_zero")]
    issue_to_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    relation_type: Option<RelationType>,
    #[serde(skip_serializing_if = "is_zero")]
    delay: i64,
}

impl RedmineClient {
    /// Lists the relations of an issue.
    pub async fn list_issue_relations(
        &self,
        issue_id: u64,
        params: &Params,
    ) -> ApiResult<(Vec<IssueRelation>, Pagination)> {
        let body = self
            .get(&format!("issues/{}/relations.json", issue_id), params)
            .await?;
        decode_list(&body, "relations")
    }

    pub async fn get_issue_relation(&self, id: u64) -> ApiResult<IssueRelation> {
        let body = self
            .get(&format!("relations/{}.json", id), &Params::new())
            .await?;
        decode_single(&body, "relation")
    }

    /// Creates a relation from `relation.issue_id` to `relation.issue_to_id`.
    pub async fn create_issue_relation(&self, relation: &IssueRelation) -> ApiResult<IssueRelation> {
        let body = self
            .post(
                &format!("issues/{}/relations.json", relation.issue_id),
                &envelope("relation", relation.encode()),
            )
            .await?;
        decode_single(&body, "relation")
    }

    pub async fn delete_issue_relation(&self, id: u64) -> ApiResult<()> {
        self.delete(&format!("relations/{}.json", id), &Params::new())
            .await
    }
}
