//
//  redmine-cli
//  cli/upload.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Upload command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::output::OutputFormat;

use super::GlobalOptions;

/// Upload a file and print the token to attach it with
#[derive(Args, Debug)]
pub struct UploadCommand {
    /// File to upload
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct UploadResult<'a> {
    token: &'a str,
    filename: String,
}

impl UploadCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let bytes = std::fs::read(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let client = global.client()?;
        let token = client.upload_file(bytes).await?;

        if global.writer().format() == OutputFormat::Json {
            let result = UploadResult {
                token: &token,
                filename: self
                    .file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", token);
        }
        Ok(())
    }
}
