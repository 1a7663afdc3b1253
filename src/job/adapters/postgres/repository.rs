//! `PostgreSQL` repository implementation for job storage.

use super::{models::JobRow, schema::jobs};
use crate::db::{GroundcrewPgPool, PersistenceFailure, run_blocking};
use crate::job::{
    domain::{Job, JobId, JobStatus, PersistedJobData},
    ports::{JobRepository, JobRepositoryError, JobRepositoryResult},
};
use crate::staff::domain::EmployeeId;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed job repository.
#[derive(Debug, Clone)]
pub struct PostgresJobRepository {
    pool: GroundcrewPgPool,
}

impl PostgresJobRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: GroundcrewPgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for JobRepositoryError {
    fn persistence_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn store(&self, job: &Job) -> JobRepositoryResult<()> {
        let job_id = job.id();
        let row = to_row(job)?;
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(jobs::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        JobRepositoryError::DuplicateJob(job_id)
                    }
                    _ => JobRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, job: &Job) -> JobRepositoryResult<()> {
        let job_id = job.id();
        let row = to_row(job)?;
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(jobs::table.filter(jobs::id.eq(job_id.into_inner())))
                .set(&row)
                .execute(connection)
                .map_err(JobRepositoryError::persistence)?;
            if updated == 0 {
                return Err(JobRepositoryError::NotFound(job_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        run_blocking(&self.pool, move |connection| {
            let row = jobs::table
                .filter(jobs::id.eq(id.into_inner()))
                .select(JobRow::as_select())
                .first::<JobRow>(connection)
                .optional()
                .map_err(JobRepositoryError::persistence)?;
            row.map(row_to_job).transpose()
        })
        .await
    }

    async fn list_scheduled_on(&self, day: NaiveDate) -> JobRepositoryResult<Vec<Job>> {
        run_blocking(&self.pool, move |connection| {
            let rows = jobs::table
                .filter(jobs::scheduled_day.eq(day))
                .order((jobs::created_at.asc(), jobs::id.asc()))
                .select(JobRow::as_select())
                .load::<JobRow>(connection)
                .map_err(JobRepositoryError::persistence)?;
            rows.into_iter().map(row_to_job).collect()
        })
        .await
    }

    async fn list_open_before(&self, day: NaiveDate) -> JobRepositoryResult<Vec<Job>> {
        run_blocking(&self.pool, move |connection| {
            let rows = jobs::table
                .filter(jobs::scheduled_day.lt(day))
                .filter(jobs::status.ne(JobStatus::Archived.as_str()))
                .order((jobs::scheduled_day.asc(), jobs::created_at.asc(), jobs::id.asc()))
                .select(JobRow::as_select())
                .load::<JobRow>(connection)
                .map_err(JobRepositoryError::persistence)?;
            rows.into_iter().map(row_to_job).collect()
        })
        .await
    }

    async fn list_unassigned(&self) -> JobRepositoryResult<Vec<Job>> {
        run_blocking(&self.pool, move |connection| {
            let rows = jobs::table
                .filter(jobs::status.eq(JobStatus::Pending.as_str()))
                .order((jobs::scheduled_day.asc(), jobs::created_at.asc(), jobs::id.asc()))
                .select(JobRow::as_select())
                .load::<JobRow>(connection)
                .map_err(JobRepositoryError::persistence)?;
            rows.into_iter().map(row_to_job).collect()
        })
        .await
    }
}

fn to_row(job: &Job) -> JobRepositoryResult<JobRow> {
    Ok(JobRow {
        id: job.id().into_inner(),
        details: serde_json::to_value(job.details()).map_err(JobRepositoryError::persistence)?,
        status: job.status().as_str().to_owned(),
        assignee_id: job.assignee().map(EmployeeId::value),
        scheduled_day: job.scheduled_day(),
        photos: serde_json::to_value(job.photos()).map_err(JobRepositoryError::persistence)?,
        director_notes: job.director_notes().map(str::to_owned),
        notes: serde_json::to_value(job.notes()).map_err(JobRepositoryError::persistence)?,
        overdue: job.is_overdue(),
        started_at: job.started_at(),
        finished_at: job.finished_at(),
        created_at: job.created_at(),
        updated_at: job.updated_at(),
    })
}

fn row_to_job(row: JobRow) -> JobRepositoryResult<Job> {
    let JobRow {
        id,
        details,
        status,
        assignee_id,
        scheduled_day,
        photos,
        director_notes,
        notes,
        overdue,
        started_at,
        finished_at,
        created_at,
        updated_at,
    } = row;

    let data = PersistedJobData {
        id: JobId::from_uuid(id),
        details: serde_json::from_value(details).map_err(JobRepositoryError::persistence)?,
        status: JobStatus::try_from(status.as_str()).map_err(JobRepositoryError::persistence)?,
        assignee: assignee_id
            .map(EmployeeId::new)
            .transpose()
            .map_err(JobRepositoryError::persistence)?,
        scheduled_day,
        photos: serde_json::from_value(photos).map_err(JobRepositoryError::persistence)?,
        notes: serde_json::from_value(notes).map_err(JobRepositoryError::persistence)?,
        director_notes,
        overdue,
        started_at,
        finished_at,
        created_at,
        updated_at,
    };
    Ok(Job::from_persisted(data))
}

#[cfg(test)]
mod tests {
    use super::{row_to_job, to_row};
    use crate::job::domain::{Job, JobNote, PhotoRef, SiteDetails};
    use crate::staff::domain::{EmployeeId, Role};
    use chrono::NaiveDate;
    use mockable::DefaultClock;

    #[test]
    fn job_survives_row_conversion() {
        let clock = DefaultClock;
        let details = SiteDetails::new("Riverside Park")
            .expect("valid site")
            .with_gate_code("4411")
            .with_map_link("https://maps.example/riverside");
        let day = NaiveDate::from_ymd_opt(2026, 10, 12).expect("valid date");
        let employee = EmployeeId::new(42).expect("valid id");
        let mut job = Job::new(details, day, &clock);
        job.assign_to(employee, day, &clock).expect("pending job assigns");
        job.attach_photo(PhotoRef::new("file-1").expect("valid ref"), 25, &clock)
            .expect("photo fits");
        let note = JobNote::new(employee, "Sam", Role::Employee, "Gate sticks", clock_now())
            .expect("valid note");
        job.add_note(note, &clock).expect("note appends");

        let restored = row_to_job(to_row(&job).expect("row")).expect("job");

        assert_eq!(restored, job);
    }

    #[test]
    fn unknown_status_is_a_persistence_error() {
        let clock = DefaultClock;
        let day = NaiveDate::from_ymd_opt(2026, 10, 12).expect("valid date");
        let job = Job::new(SiteDetails::new("Depot").expect("valid site"), day, &clock);
        let mut row = to_row(&job).expect("row");
        row.status = "mowing".to_owned();

        assert!(row_to_job(row).is_err());
    }

    fn clock_now() -> chrono::DateTime<chrono::Utc> {
        mockable::Clock::utc(&DefaultClock)
    }
}
