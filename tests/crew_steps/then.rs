//! Then steps for crew behaviour scenarios.

use super::world::CrewWorld;
use rstest_bdd_macros::then;

#[then(r#""{site}" has status "{status}""#)]
fn job_has_status(world: &CrewWorld, site: String, status: String) -> Result<(), eyre::Report> {
    let detail = world.detail(&site)?;
    if !detail.contains(&format!("Status: {status}")) {
        return Err(eyre::eyre!("expected {site} to be {status}, got:\n{detail}"));
    }
    Ok(())
}

#[then(r#""{site}" is overdue"#)]
fn job_is_overdue(world: &CrewWorld, site: String) -> Result<(), eyre::Report> {
    let detail = world.detail(&site)?;
    if !detail.contains("(overdue)") {
        return Err(eyre::eyre!("expected {site} to be overdue, got:\n{detail}"));
    }
    Ok(())
}

#[then(r#"the last reply starts with "{prefix}""#)]
fn last_reply_starts_with(world: &CrewWorld, prefix: String) -> Result<(), eyre::Report> {
    let reply = world.last_reply()?;
    if !reply.text().starts_with(&prefix) {
        return Err(eyre::eyre!(
            "expected reply starting with {prefix:?}, got {:?}",
            reply.text()
        ));
    }
    Ok(())
}

#[then(r#"the last reply is a "{kind}" error"#)]
fn last_reply_is_error(world: &CrewWorld, kind: String) -> Result<(), eyre::Report> {
    let reply = world.last_reply()?;
    match reply.error() {
        Some(found) if found.as_str() == kind => Ok(()),
        other => Err(eyre::eyre!(
            "expected a {kind} error, got {other:?}: {}",
            reply.text()
        )),
    }
}

#[then("the reset archived {archived:usize} and carried {carried:usize} jobs")]
fn reset_counts(world: &CrewWorld, archived: usize, carried: usize) -> Result<(), eyre::Report> {
    let report = world
        .reports
        .last()
        .ok_or_else(|| eyre::eyre!("no reset has run"))?;
    if report.archived.len() != archived || report.carried_forward.len() != carried {
        return Err(eyre::eyre!(
            "expected {archived} archived and {carried} carried, got {report:?}"
        ));
    }
    Ok(())
}

#[then("the second reset was skipped")]
fn second_reset_skipped(world: &CrewWorld) -> Result<(), eyre::Report> {
    match world.reports.as_slice() {
        [first, second] if !first.already_ran() && second.already_ran() => Ok(()),
        reports => Err(eyre::eyre!("expected one run then one skip, got {reports:?}")),
    }
}
