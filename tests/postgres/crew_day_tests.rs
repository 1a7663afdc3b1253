//! The assembled application with every store in `PostgreSQL`.

use super::helpers::TemporaryDatabase;
use crate::test_helpers::{ALEX, ANDY, DIRECTOR, ManualClock, at, config, day, job_id};
use groundcrew::app::{App, PostgresRepositories};
use groundcrew::error::ErrorKind;
use groundcrew::reset::domain::ResetOutcome;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread")]
async fn crew_day_survives_on_postgres() {
    let Some(database) = TemporaryDatabase::create().await else {
        return;
    };
    let settings = config(&[]);
    let clock = Arc::new(ManualClock::at(at(12, 8, 0)));
    let app = App::assemble(
        &settings,
        PostgresRepositories::postgres(database.pool()),
        Arc::clone(&clock),
    )
    .expect("application assembles");
    app.sync_roster(&settings).await.expect("roster syncs");
    let dispatcher = app.dispatcher();
    let say = move |user_id: i64, text: String| async move { dispatcher.handle(user_id, &text).await };

    let created = say(DIRECTOR, format!("/create {} Elm Street", day(12))).await;
    let job = job_id(created.text());
    let spare = job_id(say(DIRECTOR, format!("/create {} Oak Court", day(12))).await.text());
    say(DIRECTOR, format!("/assign {job} {ANDY}")).await;
    let double = say(DIRECTOR, format!("/assign {spare} {ANDY}")).await;
    say(ANDY, format!("/start {job}")).await;
    say(ANDY, format!("/photo {job} AgADBAAD")).await;
    clock.set(at(12, 9, 0));
    let finished = say(ANDY, format!("/finish {job}")).await;

    assert_eq!(double.error(), Some(ErrorKind::Conflict));
    assert!(finished.text().starts_with("Job completed in 60 min."), "{}", finished.text());
    let photos = say(DIRECTOR, format!("/photos {job}")).await;
    assert!(photos.text().contains("1. AgADBAAD"), "{}", photos.text());

    let report = app.reset().run_reset(at(13, 0, 5)).await.expect("reset runs");
    let repeat = app.reset().run_reset(at(13, 0, 10)).await.expect("reset runs");

    assert_eq!(report.outcome, ResetOutcome::Completed);
    assert_eq!(report.archived.len(), 1);
    assert_eq!(report.carried_forward.len(), 1);
    assert!(repeat.already_ran());
    let own = say(ANDY, format!("/jobs {}", day(12))).await;
    assert!(!own.text().contains("Elm Street"), "{}", own.text());
    let carried = say(DIRECTOR, format!("/assign {spare} {ALEX}")).await;
    assert!(carried.text().starts_with("Assigned to Alex for 2026-10-13."), "{}", carried.text());
}
