use tabled::{settings::Style, Table, Tabled};

use crate::model::Application;
use crate::query::PipelineStats;

#[derive(Tabled)]
pub struct ApplicationRow {
    #[tabled(rename = "Id")]
    pub id: i64,
    #[tabled(rename = "Company")]
    pub company: String,
    #[tabled(rename = "Role")]
    pub role: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Applied")]
    pub applied: String,
    #[tabled(rename = "Prio")]
    pub priority: i64,
    #[tabled(rename = "Last action")]
    pub last_action: String,
}

impl From<&Application> for ApplicationRow {
    fn from(app: &Application) -> Self {
        Self {
            id: app.id,
            company: app.company.clone(),
            role: app.role.clone(),
            status: app.status.as_str().to_string(),
            applied: app.date_applied.to_string(),
            priority: app.priority.as_int(),
            last_action: app.last_action.clone().unwrap_or_default(),
        }
    }
}

/// Render a record list as a rounded table
pub fn application_table(applications: &[Application]) -> String {
    if applications.is_empty() {
        return String::new();
    }
    let rows: Vec<ApplicationRow> = applications.iter().map(Into::into).collect();
    Table::new(&rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the per-status counts of the pipeline as a Metric/Value table.
/// Aggregate totals are printed separately below the table.
pub fn stats_table(stats: &PipelineStats) -> String {
    let mut builder = TableBuilder::new();
    for (status, count) in &stats.by_status {
        builder.add_row(status.as_str(), &count.to_string());
    }
    builder.build()
}
