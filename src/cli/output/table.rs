//! Table output formatting for CLI commands
//!
//! Formats applications, postings, and ledger entries with comfy-table.
//! Color use respects NO_COLOR and dumb terminals.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{ApplicationHistory, ApplicationStatus, JobApplication, JobPosting, JobPostingState};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<usize>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub fn with_config(use_colors: bool, max_width: Option<usize>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format a list of applications as a table
    pub fn format_applications(&self, applications: &[JobApplication]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Student").add_attribute(Attribute::Bold),
            Cell::new("Type").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Job").add_attribute(Attribute::Bold),
            Cell::new("Company").add_attribute(Attribute::Bold),
        ]);

        for application in applications {
            let id_short = &application.id.to_string()[..8];
            let student_short = &application.student_id.to_string()[..8];

            table.add_row(vec![
                Cell::new(id_short),
                Cell::new(student_short),
                Cell::new(application.application_type.to_string()),
                self.status_cell(application.status),
                Cell::new(truncate_text(&application.job_title, 32)),
                Cell::new(truncate_text(&application.company, 24)),
            ]);
        }

        table.to_string()
    }

    /// Format a list of catalog postings as a table
    pub fn format_postings(&self, postings: &[JobPosting]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Company").add_attribute(Attribute::Bold),
            Cell::new("Location").add_attribute(Attribute::Bold),
            Cell::new("State").add_attribute(Attribute::Bold),
        ]);

        for posting in postings {
            let id_short = &posting.id.to_string()[..8];
            let state_cell = if self.use_colors {
                Cell::new(posting.state.to_string()).fg(posting_state_color(posting.state))
            } else {
                Cell::new(posting.state.to_string())
            };

            table.add_row(vec![
                Cell::new(id_short),
                Cell::new(truncate_text(&posting.title, 32)),
                Cell::new(truncate_text(&posting.company, 24)),
                Cell::new(posting.location.as_deref().unwrap_or("-")),
                state_cell,
            ]);
        }

        table.to_string()
    }

    /// Format an application's ledger as a table, oldest row first
    pub fn format_history(&self, history: &[ApplicationHistory]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Seq").add_attribute(Attribute::Bold),
            Cell::new("From").add_attribute(Attribute::Bold),
            Cell::new("To").add_attribute(Attribute::Bold),
            Cell::new("Actor").add_attribute(Attribute::Bold),
            Cell::new("Reason").add_attribute(Attribute::Bold),
            Cell::new("At").add_attribute(Attribute::Bold),
        ]);

        for entry in history {
            let actor_short = &entry.changed_by.to_string()[..8];
            let from = entry
                .previous_status
                .map_or_else(|| "-".to_string(), |s| s.to_string());

            table.add_row(vec![
                Cell::new(entry.seq.to_string()),
                Cell::new(from),
                self.status_cell(entry.new_status),
                Cell::new(actor_short),
                Cell::new(truncate_text(entry.change_reason.as_deref().unwrap_or("-"), 28)),
                Cell::new(entry.created_at.format("%Y-%m-%d %H:%M").to_string()),
            ]);
        }

        table.to_string()
    }

    fn status_cell(&self, status: ApplicationStatus) -> Cell {
        if self.use_colors {
            Cell::new(status.to_string()).fg(status_color(status))
        } else {
            Cell::new(status.to_string())
        }
    }

    /// Create a base table with consistent styling
    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width as u16);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}

/// Map application status to color
fn status_color(status: ApplicationStatus) -> Color {
    match status {
        ApplicationStatus::Recommended => Color::Cyan,
        ApplicationStatus::Interested => Color::Yellow,
        ApplicationStatus::NotInterested => Color::DarkGrey,
        ApplicationStatus::Revoked => Color::DarkGrey,
        ApplicationStatus::MentorAssigned => Color::Magenta,
        ApplicationStatus::Submitted => Color::Blue,
        ApplicationStatus::Interviewed => Color::Cyan,
        ApplicationStatus::GotOffer => Color::Green,
        ApplicationStatus::Rejected => Color::Red,
    }
}

/// Map posting state to color
fn posting_state_color(state: JobPostingState) -> Color {
    match state {
        JobPostingState::Active => Color::Green,
        JobPostingState::Paused => Color::Yellow,
        JobPostingState::Closed => Color::DarkGrey,
    }
}

/// Truncate text to fit within a cell.
///
/// Counts characters, not bytes, matching the field limits the domain
/// enforces, and so never cuts inside a multibyte character.
fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
