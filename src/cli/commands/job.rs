//! Catalog posting CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::adapters::sqlite::SqliteJobCatalog;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{JobPosting, JobPostingState};
use crate::domain::ports::JobCatalog;

#[derive(Args, Debug)]
pub struct JobArgs {
    #[command(subcommand)]
    pub command: JobCommands,
}

#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// Add a posting to the catalog
    Add {
        /// Job title
        title: String,
        /// Company name
        company: String,
        /// Job location
        #[arg(short, long)]
        location: Option<String>,
        /// Seniority level
        #[arg(long)]
        level: Option<String>,
    },
    /// List catalog postings
    List {
        /// Maximum number of postings to display
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },
    /// Show posting details
    Show {
        /// Posting ID
        id: Uuid,
    },
    /// Pause a posting; paused postings reject new referrals
    Pause {
        /// Posting ID
        id: Uuid,
    },
    /// Close a posting permanently
    Close {
        /// Posting ID
        id: Uuid,
    },
    /// Reactivate a paused posting
    Activate {
        /// Posting ID
        id: Uuid,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct PostingListOutput {
    pub postings: Vec<JobPosting>,
    pub total: usize,
}

impl CommandOutput for PostingListOutput {
    fn to_human(&self) -> String {
        if self.postings.is_empty() {
            return "No postings found.".to_string();
        }

        format!(
            "Found {} posting(s):\n{}",
            self.total,
            TableFormatter::new().format_postings(&self.postings)
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct PostingDetailOutput {
    pub posting: JobPosting,
}

impl CommandOutput for PostingDetailOutput {
    fn to_human(&self) -> String {
        let posting = &self.posting;
        let mut lines = vec![
            format!("Posting: {}", posting.title),
            format!("ID: {}", posting.id),
            format!("Company: {}", posting.company),
            format!("State: {}", posting.state),
        ];

        if let Some(location) = &posting.location {
            lines.push(format!("Location: {location}"));
        }
        if let Some(level) = &posting.level {
            lines.push(format!("Level: {level}"));
        }
        lines.push(format!(
            "Created at: {}",
            posting.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct PostingActionOutput {
    pub success: bool,
    pub message: String,
    pub posting: Option<JobPosting>,
}

impl CommandOutput for PostingActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: JobArgs, json_mode: bool) -> Result<()> {
    let (_config, pool) = super::open_database().await?;
    let catalog = SqliteJobCatalog::new(pool);

    match args.command {
        JobCommands::Add {
            title,
            company,
            location,
            level,
        } => {
            let mut posting = JobPosting::new(title, company);
            if let Some(location) = location {
                posting = posting.with_location(location);
            }
            if let Some(level) = level {
                posting = posting.with_level(level);
            }

            catalog.insert(&posting).await?;

            let out = PostingActionOutput {
                success: true,
                message: format!("Posting created: {}", posting.id),
                posting: Some(posting),
            };
            output(&out, json_mode);
        }

        JobCommands::List { limit } => {
            let postings = catalog.list(Some(limit)).await?;
            let out = PostingListOutput {
                total: postings.len(),
                postings,
            };
            output(&out, json_mode);
        }

        JobCommands::Show { id } => {
            let posting = catalog
                .get(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Posting not found: {}", id))?;

            let out = PostingDetailOutput { posting };
            output(&out, json_mode);
        }

        JobCommands::Pause { id } => {
            set_state(&catalog, id, JobPostingState::Paused, "paused", json_mode).await?;
        }

        JobCommands::Close { id } => {
            set_state(&catalog, id, JobPostingState::Closed, "closed", json_mode).await?;
        }

        JobCommands::Activate { id } => {
            set_state(&catalog, id, JobPostingState::Active, "activated", json_mode).await?;
        }
    }

    Ok(())
}

async fn set_state(
    catalog: &SqliteJobCatalog,
    id: Uuid,
    state: JobPostingState,
    verb: &str,
    json_mode: bool,
) -> Result<()> {
    catalog.set_state(id, state).await?;
    let posting = catalog
        .get(id)
        .await
        .context("Failed to reload posting")?;

    let out = PostingActionOutput {
        success: true,
        message: format!("Posting {verb}: {id}"),
        posting,
    };
    output(&out, json_mode);
    Ok(())
}
