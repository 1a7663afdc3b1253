//! Given steps for crew behaviour scenarios.

use super::world::{CrewWorld, run_async};
use crate::test_helpers::{DIRECTOR, config, day, job_id, test_bed};
use rstest_bdd_macros::given;

#[given("the standard crew roster")]
fn standard_crew_roster(world: &mut CrewWorld) {
    world.bed = Some(run_async(test_bed(&config(&[]))));
}

#[given(r#"a job at "{site}" scheduled for {when}"#)]
fn job_scheduled(world: &mut CrewWorld, site: String, when: String) -> Result<(), eyre::Report> {
    let scheduled = match when.as_str() {
        "today" => day(12),
        "tomorrow" => day(13),
        other => return Err(eyre::eyre!("unsupported day in scenario: {other}")),
    };
    let reply = run_async(
        world
            .bed()?
            .say(DIRECTOR, &format!("/create {scheduled} {site}")),
    );
    if reply.is_error() {
        return Err(eyre::eyre!("job creation failed: {}", reply.text()));
    }
    world.jobs.insert(site, job_id(reply.text()));
    Ok(())
}
