//! Batch application creation CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::sqlite::{SqliteApplicationRepository, SqliteJobCatalog};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{ExternalJob, JobApplication};
use crate::domain::ports::AllowAllEntitlements;
use crate::services::{
    BatchApplicationCreator, EventBus, ProxyBatchRequest, ReferralBatchRequest,
};

#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(subcommand)]
    pub command: ApplyCommands,
}

#[derive(Subcommand, Debug)]
pub enum ApplyCommands {
    /// Create one referral application per (student, catalog job) pair
    Referral {
        /// Student IDs (comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        students: Vec<Uuid>,

        /// Catalog posting IDs (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        jobs: Vec<Uuid>,

        /// Staff member recommending the jobs
        #[arg(short, long)]
        recommended_by: Uuid,
    },

    /// Create one proxy application per (student, external job) pair
    Proxy {
        /// Student IDs (comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        students: Vec<Uuid>,

        /// YAML file holding a list of external job payloads
        #[arg(short = 'f', long)]
        jobs_file: PathBuf,

        /// Staff member applying on the students' behalf
        #[arg(short, long)]
        created_by: Uuid,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct BatchOutput {
    pub success: bool,
    pub message: String,
    pub total: usize,
    pub applications: Vec<JobApplication>,
}

impl CommandOutput for BatchOutput {
    fn to_human(&self) -> String {
        format!(
            "{}\n{}",
            self.message,
            TableFormatter::new().format_applications(&self.applications)
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ApplyArgs, json_mode: bool) -> Result<()> {
    let (config, pool) = super::open_database().await?;

    let applications = Arc::new(SqliteApplicationRepository::new(pool.clone()));
    let catalog = Arc::new(SqliteJobCatalog::new(pool));
    let entitlements = Arc::new(AllowAllEntitlements::new());
    let events = Arc::new(EventBus::new(config.events.channel_capacity));
    let creator = BatchApplicationCreator::new(applications, catalog, entitlements, events)
        .with_config(config.batch);

    match args.command {
        ApplyCommands::Referral {
            students,
            jobs,
            recommended_by,
        } => {
            let created = creator
                .create_referral_batch(ReferralBatchRequest {
                    student_ids: students,
                    job_ids: jobs,
                    recommended_by,
                })
                .await?;

            let out = BatchOutput {
                success: true,
                message: format!("Created {} referral application(s):", created.len()),
                total: created.len(),
                applications: created,
            };
            output(&out, json_mode);
        }

        ApplyCommands::Proxy {
            students,
            jobs_file,
            created_by,
        } => {
            let content = tokio::fs::read_to_string(&jobs_file)
                .await
                .with_context(|| format!("Failed to read {jobs_file:?}"))?;
            let jobs: Vec<ExternalJob> = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse job payloads from {jobs_file:?}"))?;

            let created = creator
                .create_proxy_batch(ProxyBatchRequest {
                    student_ids: students,
                    jobs,
                    created_by,
                })
                .await?;

            let out = BatchOutput {
                success: true,
                message: format!("Created {} proxy application(s):", created.len()),
                total: created.len(),
                applications: created,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
