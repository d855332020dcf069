//! Application CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::sqlite::SqliteApplicationRepository;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{
    ApplicationHistory, ApplicationStatus, ApplicationType, JobApplication, JobReference,
};
use crate::domain::ports::{ApplicationFilter, ApplicationRepository};
use crate::services::{EventBus, RollbackService, TransitionService};

#[derive(Args, Debug)]
pub struct ApplicationArgs {
    #[command(subcommand)]
    pub command: ApplicationCommands,
}

#[derive(Subcommand, Debug)]
pub enum ApplicationCommands {
    /// List applications
    List {
        /// Filter by student ID
        #[arg(short, long)]
        student: Option<Uuid>,

        /// Filter by status
        #[arg(short = 'S', long)]
        status: Option<String>,

        /// Filter by application type
        #[arg(short = 't', long = "type")]
        application_type: Option<String>,

        /// Maximum number of applications to display
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },

    /// Show application details and its ledger
    Show {
        /// Application ID
        id: Uuid,
    },

    /// Show an application's status ledger
    History {
        /// Application ID
        id: Uuid,
    },

    /// Move an application to a new status
    SetStatus {
        /// Application ID
        id: Uuid,

        /// Target status
        status: String,

        /// Acting staff member ID
        #[arg(short, long)]
        actor: Uuid,

        /// Free-text reason recorded in the ledger
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Assign a mentor to a referral application
    AssignMentor {
        /// Application ID
        id: Uuid,

        /// Mentor ID
        mentor: Uuid,

        /// Acting staff member ID
        #[arg(short, long)]
        actor: Uuid,
    },

    /// Revert an application to the status before its last change
    Rollback {
        /// Application ID
        id: Uuid,

        /// Acting staff member ID
        #[arg(short, long)]
        actor: Uuid,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct ApplicationListOutput {
    pub applications: Vec<JobApplication>,
    pub total: usize,
}

impl CommandOutput for ApplicationListOutput {
    fn to_human(&self) -> String {
        if self.applications.is_empty() {
            return "No applications found.".to_string();
        }

        format!(
            "Found {} application(s):\n{}",
            self.total,
            TableFormatter::new().format_applications(&self.applications)
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ApplicationDetailOutput {
    pub application: JobApplication,
    pub history: Vec<ApplicationHistory>,
}

impl CommandOutput for ApplicationDetailOutput {
    fn to_human(&self) -> String {
        let application = &self.application;
        let job_kind = match &application.job {
            JobReference::Catalog(_) => "catalog",
            JobReference::External(_) => "external",
        };

        let mut lines = vec![
            format!("Application: {}", application.id),
            format!("Student: {}", application.student_id),
            format!("Type: {}", application.application_type),
            format!("Status: {}", application.status),
            format!("Job: {} at {}", application.job_title, application.company),
            format!("Job reference: {} {}", job_kind, application.job.key()),
        ];

        if let Some(location) = &application.location {
            lines.push(format!("Location: {location}"));
        }
        if let Some(level) = &application.level {
            lines.push(format!("Level: {level}"));
        }
        if let Some(mentor_id) = application.mentor_id {
            lines.push(format!("Mentor: {mentor_id}"));
        }
        lines.push(format!("Recommended by: {}", application.recommended_by));
        lines.push(format!(
            "Recommended at: {}",
            application.recommended_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        if let Some(submitted_at) = application.submitted_at {
            lines.push(format!(
                "Submitted at: {}",
                submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
        lines.push(format!(
            "Updated at: {}",
            application.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        if !self.history.is_empty() {
            lines.push("\nHistory:".to_string());
            lines.push(TableFormatter::new().format_history(&self.history));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryOutput {
    pub application_id: Uuid,
    pub entries: Vec<ApplicationHistory>,
    pub total: usize,
}

impl CommandOutput for HistoryOutput {
    fn to_human(&self) -> String {
        format!(
            "History for application {} ({} row(s)):\n{}",
            self.application_id,
            self.total,
            TableFormatter::new().format_history(&self.entries)
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ApplicationActionOutput {
    pub success: bool,
    pub message: String,
    pub application: Option<JobApplication>,
}

impl CommandOutput for ApplicationActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ApplicationArgs, json_mode: bool) -> Result<()> {
    let (config, pool) = super::open_database().await?;

    let applications = Arc::new(SqliteApplicationRepository::new(pool));
    let events = Arc::new(EventBus::new(config.events.channel_capacity));
    let transitions = TransitionService::new(applications.clone(), events.clone());
    let rollback = RollbackService::new(applications.clone(), events);

    match args.command {
        ApplicationCommands::List {
            student,
            status,
            application_type,
            limit,
        } => {
            let status = status.map(|s| parse_status(&s)).transpose()?;
            let application_type = application_type
                .map(|t| {
                    ApplicationType::from_str(&t).ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid application type: {}. Valid: direct, proxy, referral, bd",
                            t
                        )
                    })
                })
                .transpose()?;

            let filter = ApplicationFilter {
                student_id: student,
                status,
                application_type,
                limit: Some(limit),
            };

            let found = applications.list(filter).await?;
            let out = ApplicationListOutput {
                total: found.len(),
                applications: found,
            };
            output(&out, json_mode);
        }

        ApplicationCommands::Show { id } => {
            let application = applications
                .get(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Application not found: {}", id))?;
            let history = applications.history_for(id).await?;

            let out = ApplicationDetailOutput {
                application,
                history,
            };
            output(&out, json_mode);
        }

        ApplicationCommands::History { id } => {
            let entries = applications.history_for(id).await?;
            if entries.is_empty() {
                return Err(anyhow::anyhow!("Application not found: {}", id));
            }

            let out = HistoryOutput {
                application_id: id,
                total: entries.len(),
                entries,
            };
            output(&out, json_mode);
        }

        ApplicationCommands::SetStatus {
            id,
            status,
            actor,
            reason,
        } => {
            let target = parse_status(&status)?;
            let application = transitions.update_status(id, target, actor, reason).await?;

            let out = ApplicationActionOutput {
                success: true,
                message: format!("Application {} moved to {}", id, application.status),
                application: Some(application),
            };
            output(&out, json_mode);
        }

        ApplicationCommands::AssignMentor { id, mentor, actor } => {
            let application = transitions.assign_mentor(id, mentor, actor).await?;

            let out = ApplicationActionOutput {
                success: true,
                message: format!("Mentor {mentor} assigned to application {id}"),
                application: Some(application),
            };
            output(&out, json_mode);
        }

        ApplicationCommands::Rollback { id, actor } => {
            let application = rollback.rollback(id, actor).await?;

            let out = ApplicationActionOutput {
                success: true,
                message: format!("Application {} rolled back to {}", id, application.status),
                application: Some(application),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}

fn parse_status(s: &str) -> Result<ApplicationStatus> {
    ApplicationStatus::from_str(s).ok_or_else(|| {
        let valid: Vec<&str> = ApplicationStatus::ALL
            .iter()
            .map(ApplicationStatus::as_str)
            .collect();
        anyhow::anyhow!("Invalid status: {}. Valid: {}", s, valid.join(", "))
    })
}
