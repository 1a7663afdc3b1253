//! Storage behaviour of the Diesel adapters.

use super::helpers::TemporaryDatabase;
use crate::test_helpers::day;
use chrono::{TimeZone, Utc};
use groundcrew::assignment::{
    adapters::postgres::PostgresAssignmentRepository,
    domain::{Assignment, AssignmentStatus},
    ports::{AssignmentRepository, AssignmentRepositoryError},
};
use groundcrew::job::{
    adapters::postgres::PostgresJobRepository,
    domain::{Job, JobId, JobStatus, SiteDetails},
    ports::{JobRepository, JobRepositoryError},
};
use groundcrew::reset::{
    adapters::postgres::PostgresResetLedger, domain::ResetRun, ports::ResetLedger,
};
use groundcrew::staff::{
    adapters::postgres::PostgresEmployeeRepository,
    domain::{DisplayName, Employee, EmployeeId, Role},
    ports::EmployeeRepository,
};
use mockable::DefaultClock;
use rstest::rstest;

fn id(value: i64) -> EmployeeId {
    EmployeeId::new(value).expect("valid id")
}

fn employee(value: i64, name: &str) -> Employee {
    Employee::new(
        id(value),
        DisplayName::new(name).expect("valid name"),
        Role::Employee,
        &DefaultClock,
    )
}

fn job(site: &str, d: u32) -> Job {
    Job::new(SiteDetails::new(site).expect("valid site"), day(d), &DefaultClock)
}

async fn crew(database: &TemporaryDatabase) -> PostgresEmployeeRepository {
    let employees = PostgresEmployeeRepository::new(database.pool().clone());
    for (value, name) in [(1, "Andy"), (2, "Alex")] {
        employees
            .upsert(&employee(value, name))
            .await
            .expect("employee stored");
    }
    employees
}

async fn stored(jobs: &PostgresJobRepository, site: &str, d: u32) -> JobId {
    let fresh = job(site, d);
    jobs.store(&fresh).await.expect("job stored");
    fresh.id()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employee_upsert_replaces_the_existing_row() {
    let Some(database) = TemporaryDatabase::create().await else {
        return;
    };
    let employees = crew(&database).await;
    let mut andy = employee(1, "Andy");
    assert!(andy.deactivate(&DefaultClock));

    employees.upsert(&andy).await.expect("employee updated");

    let found = employees
        .find_by_id(id(1))
        .await
        .expect("lookup")
        .expect("employee exists");
    assert!(!found.is_active());
    assert_eq!(found.display_name().to_string(), "Andy");
    assert_eq!(employees.list_all().await.expect("listing").len(), 2);
    assert!(employees.find_by_id(id(3)).await.expect("lookup").is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn job_updates_round_trip_through_the_row() {
    let Some(database) = TemporaryDatabase::create().await else {
        return;
    };
    crew(&database).await;
    let jobs = PostgresJobRepository::new(database.pool().clone());
    let mut elm = job("Elm Street", 12);
    jobs.store(&elm).await.expect("job stored");
    assert!(matches!(
        jobs.store(&elm).await,
        Err(JobRepositoryError::DuplicateJob(dup)) if dup == elm.id()
    ));

    elm.assign_to(id(1), day(13), &DefaultClock).expect("assigns");
    jobs.update(&elm).await.expect("job updated");

    let found = jobs
        .find_by_id(elm.id())
        .await
        .expect("lookup")
        .expect("job exists");
    assert_eq!(found.status(), JobStatus::Assigned);
    assert_eq!(found.assignee(), Some(id(1)));
    assert_eq!(found.scheduled_day(), day(13));
    assert_eq!(found.details().site_name(), "Elm Street");
    let missing = job("Oak Court", 12);
    assert!(matches!(
        jobs.update(&missing).await,
        Err(JobRepositoryError::NotFound(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_jobs_before_a_day_skip_archived_and_later_work() {
    let Some(database) = TemporaryDatabase::create().await else {
        return;
    };
    crew(&database).await;
    let jobs = PostgresJobRepository::new(database.pool().clone());
    let open = stored(&jobs, "Oak Court", 11).await;
    stored(&jobs, "Pine Row", 12).await;
    let mut done = job("Elm Street", 11);
    done.assign_to(id(1), day(11), &DefaultClock).expect("assigns");
    done.transition_to(JobStatus::InProgress, &DefaultClock).expect("starts");
    done.transition_to(JobStatus::Completed, &DefaultClock).expect("finishes");
    done.archive(&DefaultClock).expect("archives");
    jobs.store(&done).await.expect("job stored");

    let listed: Vec<JobId> = jobs
        .list_open_before(day(12))
        .await
        .expect("listing")
        .iter()
        .map(Job::id)
        .collect();

    assert_eq!(listed, vec![open]);
    assert_eq!(jobs.list_scheduled_on(day(11)).await.expect("listing").len(), 2);
    assert_eq!(jobs.list_unassigned().await.expect("listing").len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn active_bookings_are_unique_per_employee_day_and_job() {
    let Some(database) = TemporaryDatabase::create().await else {
        return;
    };
    crew(&database).await;
    let jobs = PostgresJobRepository::new(database.pool().clone());
    let assignments = PostgresAssignmentRepository::new(database.pool().clone());
    let elm = stored(&jobs, "Elm Street", 12).await;
    let oak = stored(&jobs, "Oak Court", 12).await;
    let mut first = Assignment::new(id(1), elm, day(12), &DefaultClock);
    assignments.insert(&first).await.expect("first booking");

    let same_day = assignments
        .insert(&Assignment::new(id(1), oak, day(12), &DefaultClock))
        .await;
    let same_job = assignments
        .insert(&Assignment::new(id(2), elm, day(12), &DefaultClock))
        .await;

    assert!(
        matches!(same_day, Err(AssignmentRepositoryError::ActiveAssignmentExists { .. })),
        "{same_day:?}"
    );
    assert!(
        matches!(same_job, Err(AssignmentRepositoryError::JobAlreadyBound(job_id)) if job_id == elm),
        "{same_job:?}"
    );

    first.release(&DefaultClock).expect("releases");
    assignments.update(&first).await.expect("booking released");
    assignments
        .insert(&Assignment::new(id(1), oak, day(12), &DefaultClock))
        .await
        .expect("employee free again");

    let booked = assignments
        .find_active_for_employee(id(1), day(12))
        .await
        .expect("lookup")
        .expect("active booking");
    assert_eq!(booked.job_id(), oak);
    assert!(assignments.find_active_for_job(elm).await.expect("lookup").is_none());
    let history = assignments
        .list_for_employee(id(1), day(12))
        .await
        .expect("listing");
    let statuses: Vec<AssignmentStatus> = history.iter().map(Assignment::status).collect();
    assert_eq!(statuses, vec![AssignmentStatus::Released, AssignmentStatus::Active]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ledger_keeps_the_latest_run_per_day() {
    let Some(database) = TemporaryDatabase::create().await else {
        return;
    };
    let ledger = PostgresResetLedger::new(database.pool().clone());
    assert!(ledger.last_run().await.expect("lookup").is_none());
    let run = |d: u32, archived: u32| ResetRun {
        business_day: day(d),
        completed_at: Utc
            .with_ymd_and_hms(2026, 10, d, 0, 0, 5)
            .single()
            .expect("valid instant"),
        archived,
        carried_forward: 1,
        released: 0,
    };

    ledger.record(&run(13, 2)).await.expect("recorded");
    ledger.record(&run(12, 4)).await.expect("recorded");
    ledger.record(&run(13, 3)).await.expect("re-recorded");

    let last = ledger.last_run().await.expect("lookup").expect("a run");
    assert_eq!(last, run(13, 3));
}
