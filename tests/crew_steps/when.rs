//! When steps for crew behaviour scenarios.

use super::world::{CrewWorld, run_async};
use crate::test_helpers::{DIRECTOR, at};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the director assigns "{site}" to employee {employee:i64}"#)]
fn director_assigns(world: &mut CrewWorld, site: String, employee: i64) -> Result<(), eyre::Report> {
    let command = format!("/assign {} {employee}", world.job(&site)?);
    let reply = run_async(world.bed()?.say(DIRECTOR, &command));
    world.last_reply = Some(reply);
    Ok(())
}

#[when(r#"employee {employee:i64} sends "{command}" for "{site}""#)]
fn employee_sends(
    world: &mut CrewWorld,
    employee: i64,
    command: String,
    site: String,
) -> Result<(), eyre::Report> {
    let text = format!("{command} {}", world.job(&site)?);
    let reply = run_async(world.bed()?.say(employee, &text));
    world.last_reply = Some(reply);
    Ok(())
}

#[when("the daily reset runs for tomorrow")]
fn reset_runs_for_tomorrow(world: &mut CrewWorld) -> Result<(), eyre::Report> {
    let bed = world.bed()?;
    bed.clock.set(at(13, 7, 0));
    let report = run_async(bed.app.reset().run_reset(at(13, 0, 5)))
        .wrap_err("run daily reset in scenario")?;
    world.reports.push(report);
    Ok(())
}
