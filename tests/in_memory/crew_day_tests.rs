//! A working day driven entirely through text commands.

use crate::test_helpers::{ALEX, ANDY, DEVI, DIRECTOR, at, config, day, test_bed};
use groundcrew::error::ErrorKind;
use groundcrew::reset::{domain::ResetOutcome, services::TickOutcome};

#[tokio::test(flavor = "multi_thread")]
async fn job_runs_from_creation_to_archive() {
    let bed = test_bed(&config(&[])).await;
    let job = bed.create(day(12), "Elm Street").await;

    bed.ok(DIRECTOR, &format!("/assign {job} {ANDY}")).await;
    bed.ok(ANDY, &format!("/start {job}")).await;
    bed.clock.set(at(12, 9, 30));
    bed.ok(ANDY, &format!("/photo {job} AgADBAAD")).await;
    bed.ok(ANDY, &format!("/note {job} side gate was locked")).await;
    let finished = bed.ok(ANDY, &format!("/finish {job}")).await;
    assert!(finished.starts_with("Job completed in 90 min."), "{finished}");

    let dashboard = bed.ok(DIRECTOR, "/dashboard").await;
    assert!(dashboard.contains("completed: 1"), "{dashboard}");
    assert!(dashboard.contains("Photos: 1"), "{dashboard}");

    let report = bed
        .app
        .reset()
        .run_reset(at(13, 0, 5))
        .await
        .expect("reset runs");
    assert_eq!(report.outcome, ResetOutcome::Completed);
    assert_eq!(report.archived.len(), 1);

    let listing = bed.ok(DIRECTOR, "/jobs 2026-10-12").await;
    assert!(listing.contains("Elm Street [archived]"), "{listing}");
    let own = bed.ok(ANDY, "/jobs 2026-10-12").await;
    assert!(!own.contains("Elm Street"), "{own}");
}

#[tokio::test(flavor = "multi_thread")]
async fn unfinished_work_follows_the_employee_into_the_next_day() {
    let bed = test_bed(&config(&[])).await;
    let job = bed.create(day(12), "Birch Lane").await;
    bed.ok(DIRECTOR, &format!("/assign {job} {ALEX}")).await;

    bed.clock.set(at(13, 7, 0));
    bed.app
        .reset()
        .run_reset(at(13, 0, 1))
        .await
        .expect("reset runs");

    let listing = bed.ok(ALEX, "/jobs").await;
    assert!(listing.starts_with("Your jobs for 2026-10-13"), "{listing}");
    assert!(listing.contains("Birch Lane [assigned] OVERDUE"), "{listing}");
}

#[tokio::test(flavor = "multi_thread")]
async fn an_employee_cannot_be_booked_twice_in_one_day() {
    let bed = test_bed(&config(&[])).await;
    let first = bed.create(day(14), "Oak Court").await;
    let second = bed.create(day(14), "Pine Row").await;
    bed.ok(DIRECTOR, &format!("/assign {first} {ANDY}")).await;

    let reply = bed.say(DIRECTOR, &format!("/assign {second} {ANDY}")).await;

    assert_eq!(reply.error(), Some(ErrorKind::Conflict));
    let pending = bed.ok(DIRECTOR, "/unassigned").await;
    assert!(pending.contains("Pine Row [pending]"), "{pending}");
}

#[tokio::test(flavor = "multi_thread")]
async fn developers_act_as_employees_outside_developer_mode() {
    let bed = test_bed(&config(&[])).await;

    let reply = bed.say(DEVI, "/create 2026-10-14 Cedar Way").await;

    assert_eq!(reply.error(), Some(ErrorKind::PermissionDenied));
}

#[tokio::test(flavor = "multi_thread")]
async fn developer_mode_grants_developers_every_command() {
    let bed = test_bed(&config(&[("GROUNDCREW_DEVELOPER_MODE", Some("true"))])).await;

    let created = bed.ok(DEVI, "/create 2026-10-14 Cedar Way").await;
    assert!(created.starts_with("Job created."), "{created}");
    let help = bed.ok(DEVI, "/help").await;
    assert!(help.contains("/override"), "{help}");
}

#[tokio::test(flavor = "multi_thread")]
async fn employees_removed_from_the_roster_lose_access() {
    let bed = test_bed(&config(&[])).await;
    bed.ok(ALEX, "/jobs").await;

    let trimmed = config(&[("GROUNDCREW_EMPLOYEES", Some("1:Andy"))]);
    let active = bed.app.sync_roster(&trimmed).await.expect("roster syncs");

    assert_eq!(active.len(), 3);
    let reply = bed.say(ALEX, "/jobs").await;
    assert_eq!(reply.error(), Some(ErrorKind::PermissionDenied));
}

#[tokio::test(flavor = "multi_thread")]
async fn photo_limit_comes_from_configuration() {
    let bed = test_bed(&config(&[("GROUNDCREW_PHOTO_LIMIT", Some("2"))])).await;
    let job = bed.create(day(12), "Maple Drive").await;
    bed.ok(DIRECTOR, &format!("/assign {job} {ANDY}")).await;
    bed.ok(ANDY, &format!("/start {job}")).await;

    bed.ok(ANDY, &format!("/photo {job} first")).await;
    let second = bed.ok(ANDY, &format!("/photo {job} second")).await;
    let third = bed.say(ANDY, &format!("/photo {job} third")).await;

    assert!(second.starts_with("Photo 2/2 saved."), "{second}");
    assert_eq!(third.error(), Some(ErrorKind::Capacity));
}

#[tokio::test(flavor = "multi_thread")]
async fn scheduler_follows_the_configured_reset_time() {
    let bed = test_bed(&config(&[("GROUNDCREW_RESET_TIME", Some("02:30"))])).await;
    bed.create(day(12), "Ash Grove").await;

    bed.clock.set(at(13, 2, 0));
    let before = bed.app.scheduler().tick().await;
    bed.clock.set(at(13, 2, 45));
    let after = bed.app.scheduler().tick().await;

    assert!(
        matches!(&before, TickOutcome::Ran(report) if report.business_day == day(12)),
        "{before:?}"
    );
    assert!(
        matches!(&after, TickOutcome::Ran(report)
            if report.business_day == day(13) && report.carried_forward.len() == 1),
        "{after:?}"
    );
}
