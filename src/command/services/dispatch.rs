//! Request boundary: turns inbound text into service calls and replies.

use super::render::{DashboardView, JobView, ReplyRenderer};
use crate::assignment::{
    ports::AssignmentRepository,
    services::{AssignmentCoordinator, AssignmentError},
};
use crate::command::domain::{COMMANDS, Command, CommandParseError, NewJob, Reply};
use crate::error::ErrorKind;
use crate::job::{
    domain::{Job, JobId, PhotoRef},
    ports::JobRepository,
    services::{CreateJobRequest, JobRegistryError},
};
use crate::reset::domain::ResetBoundary;
use crate::staff::{
    domain::{Actor, Capability, EmployeeId, PermissionDenied},
    ports::EmployeeRepository,
    services::StaffError,
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

const FALLBACK_REPLY: &str = "Something went wrong. Please try again later.";

/// Errors raised while handling a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The text could not be parsed.
    #[error(transparent)]
    Parse(#[from] CommandParseError),

    /// The caller could not be resolved.
    #[error(transparent)]
    Staff(#[from] StaffError),

    /// The caller may not see the job.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// A job registry operation failed.
    #[error(transparent)]
    Job(#[from] JobRegistryError),

    /// An assignment operation failed.
    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    /// A reply template failed to render.
    #[error("reply rendering failed: {0}")]
    Render(#[from] minijinja::Error),
}

impl CommandError {
    /// Classifies the error for the reply.
    ///
    /// Rendering failures are reported like storage outages: the user is
    /// asked to try again.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(err) => err.kind(),
            Self::Staff(err) => err.kind(),
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::Job(err) => err.kind(),
            Self::Assignment(err) => err.kind(),
            Self::Render(_) => ErrorKind::Storage,
        }
    }
}

type CommandResult<T> = Result<T, CommandError>;

/// Dispatches parsed commands to the services.
pub struct CommandDispatcher<J, A, S, C>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    C: Clock + Send + Sync,
{
    coordinator: AssignmentCoordinator<J, A, S, C>,
    renderer: Arc<ReplyRenderer>,
    clock: Arc<C>,
    boundary: ResetBoundary,
}

impl<J, A, S, C> Clone for CommandDispatcher<J, A, S, C>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            coordinator: self.coordinator.clone(),
            renderer: Arc::clone(&self.renderer),
            clock: Arc::clone(&self.clock),
            boundary: self.boundary,
        }
    }
}

impl<J, A, S, C> CommandDispatcher<J, A, S, C>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher; "today" follows a midnight boundary.
    #[must_use]
    pub fn new(
        coordinator: AssignmentCoordinator<J, A, S, C>,
        renderer: Arc<ReplyRenderer>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            coordinator,
            renderer,
            clock,
            boundary: ResetBoundary::MIDNIGHT,
        }
    }

    /// Sets the boundary used to decide the current business day.
    #[must_use]
    pub const fn with_boundary(mut self, boundary: ResetBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Returns the current business day.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.boundary
            .business_day(self.clock.local().naive_local())
    }

    /// Handles one inbound message from `user_id`.
    ///
    /// Failures never escape: each error kind becomes a user-facing reply,
    /// and storage failures ask the user to try again later.
    pub async fn handle(&self, user_id: i64, text: &str) -> Reply {
        match self.execute(user_id, text).await {
            Ok(reply) => Reply::ok(reply),
            Err(err) => self.failure(user_id, &err),
        }
    }

    fn failure(&self, user_id: i64, err: &CommandError) -> Reply {
        let kind = err.kind();
        if kind.is_transient() {
            tracing::error!(user_id, kind = %kind, error = %err, "command failed");
        } else {
            tracing::info!(user_id, kind = %kind, error = %err, "command rejected");
        }
        let text = self
            .renderer
            .error(kind, &err.to_string())
            .unwrap_or_else(|render_err| {
                tracing::error!(error = %render_err, "error reply failed to render");
                FALLBACK_REPLY.to_owned()
            });
        Reply::failed(kind, text)
    }

    async fn execute(&self, user_id: i64, text: &str) -> CommandResult<String> {
        let actor = self.coordinator.staff().resolve_actor(user_id).await?;
        let command = Command::parse(text)?;
        tracing::debug!(
            user_id,
            role = %actor.role(),
            command = command.name(),
            "command received"
        );
        match command {
            Command::Help => Ok(self.renderer.help(
                COMMANDS
                    .iter()
                    .filter(|entry| entry.capability.is_none_or(|needed| actor.can(needed))),
            )?),
            Command::Create(new_job) => self.create(&actor, new_job).await,
            Command::Assign {
                job_id,
                employee_id,
                day,
            } => self.assign(&actor, job_id, employee_id, day).await,
            Command::Unassign {
                job_id,
                employee_id,
            } => {
                let job = self.coordinator.unassign(&actor, employee_id, job_id).await?;
                self.update("Job released back to pending.", &job).await
            }
            Command::Start { job_id } => {
                let job = self.coordinator.jobs().start_job(&actor, job_id).await?;
                self.update("Job started.", &job).await
            }
            Command::Finish { job_id } => {
                let job = self.coordinator.finish_job(&actor, job_id).await?;
                let headline = job.duration().map_or_else(
                    || "Job completed.".to_owned(),
                    |duration| format!("Job completed in {} min.", duration.num_minutes()),
                );
                self.update(&headline, &job).await
            }
            Command::Photo { job_id, reference } => {
                let jobs = self.coordinator.jobs();
                let job = jobs.attach_photo(&actor, job_id, reference).await?;
                let headline = format!("Photo {}/{} saved.", job.photo_count(), jobs.photo_limit());
                self.update(&headline, &job).await
            }
            Command::Photos { job_id } => self.photos(&actor, job_id).await,
            Command::Note { job_id, text: note } => {
                let job = self.coordinator.jobs().add_note(&actor, job_id, note).await?;
                self.update("Note added.", &job).await
            }
            Command::DirectorNote { job_id, text: notes } => {
                let job = self
                    .coordinator
                    .jobs()
                    .set_director_notes(&actor, job_id, notes)
                    .await?;
                let headline = if job.director_notes().is_some() {
                    "Director notes updated."
                } else {
                    "Director notes cleared."
                };
                self.update(headline, &job).await
            }
            Command::Override { job_id, status } => {
                let job = self
                    .coordinator
                    .jobs()
                    .transition(&actor, job_id, status)
                    .await?;
                self.update(&format!("Status set to {status}."), &job).await
            }
            Command::Jobs { day } => self.jobs(&actor, day.unwrap_or_else(|| self.today())).await,
            Command::Crew { employee_id, day } => {
                self.crew(&actor, employee_id, day.unwrap_or_else(|| self.today()))
                    .await
            }
            Command::Show { job_id } => self.show(&actor, job_id).await,
            Command::Dashboard { day } => {
                self.dashboard(&actor, day.unwrap_or_else(|| self.today()))
                    .await
            }
            Command::Unassigned => {
                let jobs = self.coordinator.jobs().list_unassigned(&actor).await?;
                self.list("Unassigned jobs", &jobs).await
            }
        }
    }

    async fn create(&self, actor: &Actor, new_job: NewJob) -> CommandResult<String> {
        let mut request = CreateJobRequest::new(new_job.day, new_job.site);
        if let Some(address) = new_job.address {
            request = request.with_address(address);
        }
        if let Some(area) = new_job.area {
            request = request.with_area(area);
        }
        if let Some(gate_code) = new_job.gate_code {
            request = request.with_gate_code(gate_code);
        }
        if let Some(contact) = new_job.contact {
            request = request.with_contact(contact);
        }
        if let Some(map_link) = new_job.map_link {
            request = request.with_map_link(map_link);
        }
        if let Some(notes) = new_job.director_notes {
            request = request.with_director_notes(notes);
        }
        let job = self.coordinator.jobs().create_job(actor, request).await?;
        self.update("Job created.", &job).await
    }

    async fn assign(
        &self,
        actor: &Actor,
        job_id: JobId,
        employee_id: EmployeeId,
        requested_day: Option<NaiveDate>,
    ) -> CommandResult<String> {
        let pending = self.coordinator.jobs().get(job_id).await?;
        let day = requested_day.unwrap_or_else(|| pending.scheduled_day());
        self.coordinator
            .assign(actor, employee_id, job_id, day)
            .await?;
        let job = self.coordinator.jobs().get(job_id).await?;
        let name = self.employee_name(employee_id).await?;
        self.update(&format!("Assigned to {name} for {day}."), &job)
            .await
    }

    async fn jobs(&self, actor: &Actor, day: NaiveDate) -> CommandResult<String> {
        if actor.can(Capability::ViewAllJobs) {
            let jobs = self.coordinator.jobs().list_by_day(actor, day).await?;
            return self.list(&format!("Jobs for {day}"), &jobs).await;
        }
        let listing = self
            .coordinator
            .list_for_employee(actor.employee_id(), day)
            .await?;
        let jobs: Vec<Job> = listing.iter().cloned().collect();
        self.list(&format!("Your jobs for {day}"), &jobs).await
    }

    async fn crew(&self, actor: &Actor, employee_id: EmployeeId, day: NaiveDate) -> CommandResult<String> {
        actor.require(Capability::ViewAllJobs)?;
        let employee = self.coordinator.staff().require_active(employee_id).await?;
        let listing = self.coordinator.list_for_employee(employee_id, day).await?;
        let jobs: Vec<Job> = listing.iter().cloned().collect();
        self.list(&format!("Jobs for {} on {day}", employee.display_name()), &jobs)
            .await
    }

    async fn photos(&self, actor: &Actor, job_id: JobId) -> CommandResult<String> {
        let job = self.coordinator.jobs().get(job_id).await?;
        actor.require_assignee(job.assignee())?;
        let view = self.view(&job).await?;
        let photos: Vec<&str> = job.photos().iter().map(PhotoRef::as_str).collect();
        Ok(self.renderer.photo_list(&view, &photos)?)
    }

    async fn show(&self, actor: &Actor, job_id: JobId) -> CommandResult<String> {
        let job = self.coordinator.jobs().get(job_id).await?;
        actor.require_assignee(job.assignee())?;
        let view = self.view(&job).await?;
        Ok(self.renderer.job_detail(&view)?)
    }

    async fn dashboard(&self, actor: &Actor, day: NaiveDate) -> CommandResult<String> {
        let summary = self.coordinator.jobs().dashboard(actor, day).await?;
        let mut employees = Vec::new();
        for (employee_id, load) in summary.employee_loads() {
            employees.push((self.employee_name(employee_id).await?, load));
        }
        Ok(self
            .renderer
            .dashboard(&DashboardView::new(&summary, &employees))?)
    }

    async fn list(&self, title: &str, jobs: &[Job]) -> CommandResult<String> {
        let mut views = Vec::with_capacity(jobs.len());
        for job in jobs {
            views.push(self.view(job).await?);
        }
        Ok(self.renderer.job_list(title, &views)?)
    }

    async fn update(&self, headline: &str, job: &Job) -> CommandResult<String> {
        let view = self.view(job).await?;
        Ok(self.renderer.job_update(headline, &view)?)
    }

    async fn view(&self, job: &Job) -> CommandResult<JobView> {
        let mut assignee = None;
        if let Some(employee_id) = job.assignee() {
            assignee = Some(self.employee_name(employee_id).await?);
        }
        Ok(JobView::new(
            job,
            assignee,
            self.coordinator.jobs().photo_limit(),
        ))
    }

    async fn employee_name(&self, employee_id: EmployeeId) -> CommandResult<String> {
        let found = self.coordinator.staff().find(employee_id).await?;
        Ok(found.map_or_else(
            || employee_id.to_string(),
            |employee| employee.display_name().to_string(),
        ))
    }
}
