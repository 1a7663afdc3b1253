//! Reply templates.

use crate::command::domain::CommandUsage;
use crate::error::ErrorKind;
use crate::job::domain::{DashboardSummary, EmployeeLoad, Job, JobStatus};
use chrono::{DateTime, Utc};
use minijinja::{Environment, context};
use serde::Serialize;

const JOB_LIST: &str = "job_list";
const JOB_DETAIL: &str = "job_detail";
const JOB_UPDATE: &str = "job_update";
const PHOTO_LIST: &str = "photo_list";
const DASHBOARD: &str = "dashboard";
const HELP: &str = "help";
const ERROR: &str = "error";

const TEMPLATES: &[(&str, &str)] = &[
    (
        JOB_LIST,
        r#"{{ title }}
{% for job in jobs %}
- {{ job.site }} [{{ job.status }}]{{ " OVERDUE" if job.overdue else "" }}{{ " - " ~ job.assignee if job.assignee else "" }} ({{ job.id }})
{% else %}
No jobs.
{% endfor %}"#,
    ),
    (
        JOB_DETAIL,
        r#"{{ job.site }} ({{ job.id }})
Status: {{ job.status }}{{ " (overdue)" if job.overdue else "" }}
Day: {{ job.day }}
Assignee: {{ job.assignee or "unassigned" }}
{% if job.address %}
Address: {{ job.address }}
{% endif %}
{% if job.area %}
Area: {{ job.area }}
{% endif %}
{% if job.gate_code %}
Gate code: {{ job.gate_code }}
{% endif %}
{% if job.contact %}
Contact: {{ job.contact }}
{% endif %}
{% if job.map_link %}
Map: {{ job.map_link }}
{% endif %}
Photos: {{ job.photos }}/{{ job.photo_limit }}
{% if job.started_at %}
Started: {{ job.started_at }}
{% endif %}
{% if job.finished_at %}
Finished: {{ job.finished_at }}
{% endif %}
{% if job.duration_minutes is not none %}
Duration: {{ job.duration_minutes }} min
{% endif %}
{% if job.director_notes %}
Director notes: {{ job.director_notes }}
{% endif %}
{% if job.notes %}
Notes:
{% for note in job.notes %}
- {{ note.author }} ({{ note.role }}, {{ note.at }}): {{ note.text }}
{% endfor %}
{% endif %}"#,
    ),
    (
        JOB_UPDATE,
        r#"{{ headline }}
{{ job.site }} [{{ job.status }}] on {{ job.day }}{{ " - " ~ job.assignee if job.assignee else "" }} ({{ job.id }})"#,
    ),
    (
        PHOTO_LIST,
        r"Photos for {{ job.site }} ({{ job.id }}): {{ job.photos }}/{{ job.photo_limit }}
{% for photo in photos %}
{{ loop.index }}. {{ photo }}
{% else %}
No photos yet.
{% endfor %}",
    ),
    (
        DASHBOARD,
        r"Dashboard for {{ day }}
Total: {{ total }}
{% for row in statuses %}
{{ row.status }}: {{ row.count }}
{% endfor %}
Overdue: {{ overdue }}
Photos: {{ photos }}
{% if employees %}
By employee:
{% for row in employees %}
- {{ row.name }}: {{ row.assigned }} assigned, {{ row.in_progress }} in progress, {{ row.completed }} completed
{% endfor %}
{% endif %}",
    ),
    (
        HELP,
        r"Commands:
{% for entry in commands %}
{{ entry.syntax }} - {{ entry.summary }}
{% endfor %}",
    ),
    (
        ERROR,
        r#"{% if kind == "validation" %}
That didn't look right: {{ detail }}
Send /help for the command list.
{% elif kind == "not_found" %}
Not found: {{ detail }}
{% elif kind == "conflict" %}
Someone got there first: {{ detail }}
{% elif kind == "capacity" %}
Limit reached: {{ detail }}
{% elif kind == "invalid_transition" %}
That status change is not allowed: {{ detail }}
{% elif kind == "invalid_state" %}
Not possible right now: {{ detail }}
{% elif kind == "permission_denied" %}
Not allowed: {{ detail }}
{% else %}
The job board is unavailable right now. Please try again later.
{% endif %}"#,
    ),
];

/// Renders reply text from the built-in templates.
#[derive(Debug)]
pub struct ReplyRenderer {
    env: Environment<'static>,
}

impl ReplyRenderer {
    /// Compiles the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`minijinja::Error`] when a template fails to compile.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub(crate) fn job_list(&self, title: &str, jobs: &[JobView]) -> Result<String, minijinja::Error> {
        self.render(JOB_LIST, context! { title, jobs })
    }

    pub(crate) fn job_detail(&self, job: &JobView) -> Result<String, minijinja::Error> {
        self.render(JOB_DETAIL, context! { job })
    }

    pub(crate) fn job_update(&self, headline: &str, job: &JobView) -> Result<String, minijinja::Error> {
        self.render(JOB_UPDATE, context! { headline, job })
    }

    pub(crate) fn photo_list(&self, job: &JobView, photos: &[&str]) -> Result<String, minijinja::Error> {
        self.render(PHOTO_LIST, context! { job, photos })
    }

    pub(crate) fn dashboard(&self, view: &DashboardView) -> Result<String, minijinja::Error> {
        self.render(DASHBOARD, view)
    }

    pub(crate) fn help<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a CommandUsage>,
    ) -> Result<String, minijinja::Error> {
        let commands: Vec<HelpEntry> = entries
            .into_iter()
            .map(|entry| HelpEntry {
                syntax: entry.syntax,
                summary: entry.summary,
            })
            .collect();
        self.render(HELP, context! { commands })
    }

    pub(crate) fn error(&self, kind: ErrorKind, detail: &str) -> Result<String, minijinja::Error> {
        self.render(ERROR, context! { kind => kind.as_str(), detail })
    }

    fn render(&self, name: &str, ctx: impl Serialize) -> Result<String, minijinja::Error> {
        let rendered = self.env.get_template(name)?.render(ctx)?;
        Ok(rendered.trim_end().to_owned())
    }
}

#[derive(Debug, Serialize)]
struct HelpEntry {
    syntax: &'static str,
    summary: &'static str,
}

/// Template view of one job.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct JobView {
    id: String,
    site: String,
    status: &'static str,
    day: String,
    assignee: Option<String>,
    overdue: bool,
    photos: usize,
    photo_limit: usize,
    address: Option<String>,
    area: Option<String>,
    gate_code: Option<String>,
    contact: Option<String>,
    map_link: Option<String>,
    director_notes: Option<String>,
    notes: Vec<NoteView>,
    started_at: Option<String>,
    finished_at: Option<String>,
    duration_minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
struct NoteView {
    author: String,
    role: &'static str,
    at: String,
    text: String,
}

impl JobView {
    pub(crate) fn new(job: &Job, assignee: Option<String>, photo_limit: usize) -> Self {
        let details = job.details();
        Self {
            id: job.id().to_string(),
            site: details.site_name().to_owned(),
            status: job.status().as_str(),
            day: job.scheduled_day().to_string(),
            assignee,
            overdue: job.is_overdue(),
            photos: job.photo_count(),
            photo_limit,
            address: details.address().map(str::to_owned),
            area: details.area().map(str::to_owned),
            gate_code: details.gate_code().map(str::to_owned),
            contact: details.contact().map(str::to_owned),
            map_link: details.map_link().map(str::to_owned),
            director_notes: job.director_notes().map(str::to_owned),
            notes: job
                .notes()
                .iter()
                .map(|note| NoteView {
                    author: note.author_name().to_owned(),
                    role: note.author_role().as_str(),
                    at: timestamp(note.created_at()),
                    text: note.text().to_owned(),
                })
                .collect(),
            started_at: job.started_at().map(timestamp),
            finished_at: job.finished_at().map(timestamp),
            duration_minutes: job.duration().map(|duration| duration.num_minutes()),
        }
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Template view of the daily dashboard.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct DashboardView {
    day: String,
    total: usize,
    statuses: Vec<StatusCount>,
    overdue: usize,
    photos: usize,
    employees: Vec<EmployeeRow>,
}

#[derive(Debug, Clone, Serialize)]
struct StatusCount {
    status: &'static str,
    count: usize,
}

#[derive(Debug, Clone, Serialize)]
struct EmployeeRow {
    name: String,
    assigned: usize,
    in_progress: usize,
    completed: usize,
}

impl DashboardView {
    /// Builds the view from the summary and named per-employee loads.
    pub(crate) fn new(summary: &DashboardSummary, employees: &[(String, EmployeeLoad)]) -> Self {
        Self {
            day: summary.day().to_string(),
            total: summary.total(),
            statuses: JobStatus::ALL
                .iter()
                .map(|status| StatusCount {
                    status: status.as_str(),
                    count: summary.count(*status),
                })
                .collect(),
            overdue: summary.overdue(),
            photos: summary.photos(),
            employees: employees
                .iter()
                .map(|(name, load)| EmployeeRow {
                    name: name.clone(),
                    assigned: load.assigned,
                    in_progress: load.in_progress,
                    completed: load.completed,
                })
                .collect(),
        }
    }
}
