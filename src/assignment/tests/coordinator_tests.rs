//! Service tests for the assignment coordinator.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::assignment::{
    adapters::memory::InMemoryAssignmentRepository,
    ports::AssignmentRepository,
    services::{AssignmentCoordinator, AssignmentError, CarryOutcome},
};
use crate::error::ErrorKind;
use crate::job::{
    adapters::memory::InMemoryJobRepository,
    domain::{Job, JobId, JobStatus},
    ports::{JobRepository, JobRepositoryResult},
    services::{CreateJobRequest, JobRegistryService},
};
use crate::retry::RetryPolicy;
use crate::staff::{
    adapters::memory::InMemoryEmployeeRepository,
    domain::{Actor, DisplayName, EmployeeId, Role, RosterEntry},
    services::StaffDirectory,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::rstest;

type TestCoordinator = AssignmentCoordinator<
    InMemoryJobRepository,
    InMemoryAssignmentRepository,
    InMemoryEmployeeRepository,
    DefaultClock,
>;

struct Harness {
    coordinator: TestCoordinator,
    assignments: Arc<InMemoryAssignmentRepository>,
    director: Actor,
}

const DIRECTOR: i64 = 900;
const ANDY: i64 = 1;
const ALEX: i64 = 2;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).expect("valid date")
}

fn id(value: i64) -> EmployeeId {
    EmployeeId::new(value).expect("valid id")
}

fn entry(value: i64, name: &str, role: Role) -> RosterEntry {
    RosterEntry::new(id(value), DisplayName::new(name).expect("valid name"), role)
}

async fn harness() -> Harness {
    let clock = Arc::new(DefaultClock);
    let staff = StaffDirectory::new(Arc::new(InMemoryEmployeeRepository::new()), Arc::clone(&clock));
    staff
        .sync_roster(&[
            entry(DIRECTOR, "Dana", Role::Director),
            entry(ANDY, "Andy", Role::Employee),
            entry(ALEX, "Alex", Role::Employee),
        ])
        .await
        .expect("roster sync");
    let director = staff.resolve_actor(DIRECTOR).await.expect("director resolves");
    let jobs = JobRegistryService::new(Arc::new(InMemoryJobRepository::new()), Arc::clone(&clock))
        .with_retry_policy(RetryPolicy::immediate(2));
    let assignments = Arc::new(InMemoryAssignmentRepository::new());
    let coordinator = AssignmentCoordinator::new(jobs, staff, Arc::clone(&assignments), clock)
        .with_retry_policy(RetryPolicy::immediate(2));
    Harness {
        coordinator,
        assignments,
        director,
    }
}

impl Harness {
    async fn create_job(&self, site: &str) -> JobId {
        self.coordinator
            .jobs()
            .create_job(&self.director, CreateJobRequest::new(day(12), site))
            .await
            .expect("job created")
            .id()
    }
}

fn employee(value: i64) -> Actor {
    Actor::new(
        id(value),
        DisplayName::new(format!("user-{value}")).expect("valid name"),
        Role::Employee,
        Role::Employee.capabilities(false),
    )
}

fn kind<T>(result: Result<T, AssignmentError>) -> Option<ErrorKind> {
    result.err().map(|err| err.kind())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assign_moves_job_to_assigned_on_the_day() {
    let h = harness().await;
    let job_id = h.create_job("Elm Street").await;

    let assignment = h
        .coordinator
        .assign(&h.director, id(ANDY), job_id, day(13))
        .await
        .expect("assignment succeeds");

    assert!(assignment.is_active());
    let job = h.coordinator.jobs().get(job_id).await.expect("job");
    assert_eq!(job.status(), JobStatus::Assigned);
    assert_eq!(job.assignee(), Some(id(ANDY)));
    assert_eq!(job.scheduled_day(), day(13));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employee_with_a_job_that_day_cannot_take_another() {
    let h = harness().await;
    let first = h.create_job("Elm Street").await;
    let second = h.create_job("Oak Court").await;
    h.coordinator
        .assign(&h.director, id(ANDY), first, day(12))
        .await
        .expect("first assignment");

    let result = h.coordinator.assign(&h.director, id(ANDY), second, day(12)).await;

    assert!(matches!(result, Err(AssignmentError::EmployeeBusy { .. })));
    let job = h.coordinator.jobs().get(second).await.expect("job");
    assert_eq!(job.status(), JobStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigned_job_cannot_be_assigned_again() {
    let h = harness().await;
    let job_id = h.create_job("Elm Street").await;
    h.coordinator
        .assign(&h.director, id(ANDY), job_id, day(12))
        .await
        .expect("first assignment");

    let result = h.coordinator.assign(&h.director, id(ALEX), job_id, day(12)).await;

    assert_eq!(kind(result), Some(ErrorKind::Conflict));
}

#[rstest]
#[case(ANDY, false)]
#[case(404, true)]
#[tokio::test(flavor = "multi_thread")]
async fn missing_employee_or_job_is_not_found(#[case] employee_id: i64, #[case] job_exists: bool) {
    let h = harness().await;
    let job_id = if job_exists {
        h.create_job("Elm Street").await
    } else {
        JobId::new()
    };

    let result = h.coordinator.assign(&h.director, id(employee_id), job_id, day(12)).await;

    assert_eq!(kind(result), Some(ErrorKind::NotFound));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employees_cannot_assign_jobs() {
    let h = harness().await;
    let job_id = h.create_job("Elm Street").await;
    let andy = employee(ANDY);

    let result = h.coordinator.assign(&andy, id(ANDY), job_id, day(12)).await;

    assert_eq!(kind(result), Some(ErrorKind::PermissionDenied));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_assignments_of_one_job_have_one_winner() {
    let h = harness().await;
    let job_id = h.create_job("Elm Street").await;

    let first = {
        let coordinator = h.coordinator.clone();
        let director = h.director.clone();
        tokio::spawn(async move { coordinator.assign(&director, id(ANDY), job_id, day(12)).await })
    };
    let second = {
        let coordinator = h.coordinator.clone();
        let director = h.director.clone();
        tokio::spawn(async move { coordinator.assign(&director, id(ALEX), job_id, day(12)).await })
    };
    let results = [
        first.await.expect("task finishes"),
        second.await.expect("task finishes"),
    ];

    let winners = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(winners, 1);
    let loser = results.into_iter().find_map(Result::err).expect("one request loses");
    assert_eq!(loser.kind(), ErrorKind::Conflict);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unassign_frees_the_employee_for_another_job() {
    let h = harness().await;
    let first = h.create_job("Elm Street").await;
    let second = h.create_job("Oak Court").await;
    h.coordinator
        .assign(&h.director, id(ANDY), first, day(12))
        .await
        .expect("assignment");

    let job = h
        .coordinator
        .unassign(&h.director, id(ANDY), first)
        .await
        .expect("unassign succeeds");

    assert_eq!(job.status(), JobStatus::Pending);
    assert_eq!(job.assignee(), None);
    h.coordinator
        .assign(&h.director, id(ANDY), second, day(12))
        .await
        .expect("employee is free again");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn started_job_cannot_be_unassigned() {
    let h = harness().await;
    let job_id = h.create_job("Elm Street").await;
    h.coordinator
        .assign(&h.director, id(ANDY), job_id, day(12))
        .await
        .expect("assignment");
    let andy = employee(ANDY);
    h.coordinator
        .jobs()
        .start_job(&andy, job_id)
        .await
        .expect("assignee starts");

    let result = h.coordinator.unassign(&h.director, id(ANDY), job_id).await;

    assert_eq!(kind(result), Some(ErrorKind::InvalidState));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unassign_without_assignment_is_not_found() {
    let h = harness().await;
    let job_id = h.create_job("Elm Street").await;

    let result = h.coordinator.unassign(&h.director, id(ANDY), job_id).await;

    assert!(matches!(result, Err(AssignmentError::NoActiveAssignment { .. })));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn finishing_a_job_completes_its_assignment() {
    let h = harness().await;
    let first = h.create_job("Elm Street").await;
    let second = h.create_job("Oak Court").await;
    h.coordinator
        .assign(&h.director, id(ANDY), first, day(12))
        .await
        .expect("assignment");
    let andy = employee(ANDY);
    h.coordinator.jobs().start_job(&andy, first).await.expect("starts");

    h.coordinator.finish_job(&andy, first).await.expect("finishes");

    let active = h
        .assignments
        .find_active_for_employee(id(ANDY), day(12))
        .await
        .expect("lookup");
    assert!(active.is_none());
    h.coordinator
        .assign(&h.director, id(ANDY), second, day(12))
        .await
        .expect("employee takes the next job");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn override_back_to_pending_allows_reassignment() {
    let h = harness().await;
    let job_id = h.create_job("Elm Street").await;
    h.coordinator
        .assign(&h.director, id(ANDY), job_id, day(12))
        .await
        .expect("assignment");
    h.coordinator
        .jobs()
        .transition(&h.director, job_id, JobStatus::Pending)
        .await
        .expect("override to pending");

    let assignment = h
        .coordinator
        .assign(&h.director, id(ALEX), job_id, day(12))
        .await
        .expect("reassignment succeeds");

    assert_eq!(assignment.employee_id(), id(ALEX));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_is_restartable_and_excludes_other_employees() {
    let h = harness().await;
    let mine = h.create_job("Elm Street").await;
    let theirs = h.create_job("Oak Court").await;
    h.coordinator
        .assign(&h.director, id(ANDY), mine, day(12))
        .await
        .expect("assignment");
    h.coordinator
        .assign(&h.director, id(ALEX), theirs, day(12))
        .await
        .expect("assignment");

    let listing = h
        .coordinator
        .list_for_employee(id(ANDY), day(12))
        .await
        .expect("listing");

    let first_pass: Vec<JobId> = listing.iter().map(|job| job.id()).collect();
    let second_pass: Vec<JobId> = (&listing).into_iter().map(|job| job.id()).collect();
    assert_eq!(first_pass, vec![mine]);
    assert_eq!(first_pass, second_pass);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn carried_assigned_job_keeps_its_assignee() {
    let h = harness().await;
    let job_id = h.create_job("Elm Street").await;
    h.coordinator
        .assign(&h.director, id(ANDY), job_id, day(12))
        .await
        .expect("assignment");

    let outcome = h
        .coordinator
        .carry_forward(job_id, day(13))
        .await
        .expect("carry succeeds");

    assert_eq!(outcome, CarryOutcome::Carried);
    let job = h.coordinator.jobs().get(job_id).await.expect("job");
    assert_eq!(job.scheduled_day(), day(13));
    assert!(job.is_overdue());
    assert_eq!(job.assignee(), Some(id(ANDY)));
    let active = h
        .assignments
        .find_active_for_employee(id(ANDY), day(13))
        .await
        .expect("lookup")
        .expect("assignment re-dated");
    assert_eq!(active.job_id(), job_id);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn carried_job_is_released_when_assignee_is_booked() {
    let h = harness().await;
    let stale = h.create_job("Elm Street").await;
    let fresh = h.create_job("Oak Court").await;
    h.coordinator
        .assign(&h.director, id(ANDY), stale, day(12))
        .await
        .expect("assignment on the 12th");
    h.coordinator
        .assign(&h.director, id(ANDY), fresh, day(13))
        .await
        .expect("assignment on the 13th");

    let outcome = h
        .coordinator
        .carry_forward(stale, day(13))
        .await
        .expect("carry succeeds");

    assert_eq!(outcome, CarryOutcome::Released);
    let job = h.coordinator.jobs().get(stale).await.expect("job");
    assert_eq!(job.status(), JobStatus::Pending);
    assert_eq!(job.assignee(), None);
    assert!(job.is_overdue());
    assert!(
        h.assignments
            .find_active_for_job(stale)
            .await
            .expect("lookup")
            .is_none()
    );
}

/// Job store that counts day scans and can delay its updates.
#[derive(Debug, Default)]
struct InstrumentedJobRepository {
    inner: InMemoryJobRepository,
    update_delay: Duration,
    day_scans: AtomicUsize,
}

impl InstrumentedJobRepository {
    fn slow(update_delay: Duration) -> Self {
        Self {
            update_delay,
            ..Self::default()
        }
    }
}

#[async_trait]
impl JobRepository for InstrumentedJobRepository {
    async fn store(&self, job: &Job) -> JobRepositoryResult<()> {
        self.inner.store(job).await
    }

    async fn update(&self, job: &Job) -> JobRepositoryResult<()> {
        tokio::time::sleep(self.update_delay).await;
        self.inner.update(job).await
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        self.inner.find_by_id(id).await
    }

    async fn list_scheduled_on(&self, day: NaiveDate) -> JobRepositoryResult<Vec<Job>> {
        self.day_scans.fetch_add(1, Ordering::SeqCst);
        self.inner.list_scheduled_on(day).await
    }

    async fn list_open_before(&self, day: NaiveDate) -> JobRepositoryResult<Vec<Job>> {
        self.inner.list_open_before(day).await
    }

    async fn list_unassigned(&self) -> JobRepositoryResult<Vec<Job>> {
        self.inner.list_unassigned().await
    }
}

type InstrumentedCoordinator = AssignmentCoordinator<
    InstrumentedJobRepository,
    InMemoryAssignmentRepository,
    InMemoryEmployeeRepository,
    DefaultClock,
>;

async fn instrumented(
    repository: Arc<InstrumentedJobRepository>,
    sites: [&str; 2],
) -> (InstrumentedCoordinator, Actor, [JobId; 2]) {
    let clock = Arc::new(DefaultClock);
    let staff = StaffDirectory::new(Arc::new(InMemoryEmployeeRepository::new()), Arc::clone(&clock));
    staff
        .sync_roster(&[entry(DIRECTOR, "Dana", Role::Director), entry(ANDY, "Andy", Role::Employee)])
        .await
        .expect("roster sync");
    let director = staff.resolve_actor(DIRECTOR).await.expect("director resolves");
    let jobs = JobRegistryService::new(repository, Arc::clone(&clock));
    let coordinator =
        AssignmentCoordinator::new(jobs, staff, Arc::new(InMemoryAssignmentRepository::new()), clock);
    let mut ids = Vec::new();
    for site in sites {
        let job = coordinator
            .jobs()
            .create_job(&director, CreateJobRequest::new(day(12), site))
            .await
            .expect("job created");
        ids.push(job.id());
    }
    let [first, second] = ids.as_slice() else {
        panic!("two jobs expected");
    };
    (coordinator, director, [*first, *second])
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn booking_still_being_saved_blocks_a_second_job() {
    let repository = Arc::new(InstrumentedJobRepository::slow(Duration::from_millis(100)));
    let (coordinator, director, [first, second]) =
        instrumented(repository, ["Elm Street", "Oak Court"]).await;

    let (left, right) = tokio::join!(
        coordinator.assign(&director, id(ANDY), first, day(12)),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            coordinator.assign(&director, id(ANDY), second, day(12)).await
        },
    );

    assert!(left.is_ok(), "{left:?}");
    assert!(matches!(right, Err(AssignmentError::EmployeeBusy { .. })), "{right:?}");
    let listing = coordinator
        .list_for_employee(id(ANDY), day(12))
        .await
        .expect("listing");
    let listed: Vec<JobId> = listing.iter().map(|job| job.id()).collect();
    assert_eq!(listed, vec![first]);
    let loser = coordinator.jobs().get(second).await.expect("job");
    assert_eq!(loser.status(), JobStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_follows_bookings_without_scanning_the_day() {
    let repository = Arc::new(InstrumentedJobRepository::default());
    let (coordinator, director, [done, open]) =
        instrumented(Arc::clone(&repository), ["Elm Street", "Oak Court"]).await;
    coordinator
        .assign(&director, id(ANDY), done, day(12))
        .await
        .expect("assignment");
    coordinator.jobs().start_job(&employee(ANDY), done).await.expect("starts");
    coordinator.finish_job(&employee(ANDY), done).await.expect("finishes");
    coordinator
        .assign(&director, id(ANDY), open, day(12))
        .await
        .expect("assignment");

    let listing = coordinator
        .list_for_employee(id(ANDY), day(12))
        .await
        .expect("listing");

    let listed: Vec<JobId> = listing.iter().map(|job| job.id()).collect();
    assert_eq!(listed, vec![done, open]);
    assert_eq!(repository.day_scans.load(Ordering::SeqCst), 0);
}
