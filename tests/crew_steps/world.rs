//! Shared world state for crew behaviour scenarios.

use std::collections::HashMap;

use crate::test_helpers::{DIRECTOR, TestBed};
use groundcrew::command::domain::Reply;
use groundcrew::reset::domain::ResetReport;
use rstest::fixture;

/// Scenario world for crew behaviour tests.
#[derive(Default)]
pub struct CrewWorld {
    pub bed: Option<TestBed>,
    pub jobs: HashMap<String, String>,
    pub last_reply: Option<Reply>,
    pub reports: Vec<ResetReport>,
}

impl CrewWorld {
    /// Returns the running application or fails the step.
    pub fn bed(&self) -> Result<&TestBed, eyre::Report> {
        self.bed
            .as_ref()
            .ok_or_else(|| eyre::eyre!("crew roster was not set up in scenario world"))
    }

    /// Returns the id of the job created for `site`.
    pub fn job(&self, site: &str) -> Result<&str, eyre::Report> {
        self.jobs
            .get(site)
            .map(String::as_str)
            .ok_or_else(|| eyre::eyre!("no job created for {site}"))
    }

    /// Returns the director's detail view of the job at `site`.
    pub fn detail(&self, site: &str) -> Result<String, eyre::Report> {
        let command = format!("/job {}", self.job(site)?);
        let reply = run_async(self.bed()?.say(DIRECTOR, &command));
        if reply.is_error() {
            return Err(eyre::eyre!("`{command}` failed: {}", reply.text()));
        }
        Ok(reply.into_text())
    }

    /// Returns the most recent reply.
    pub fn last_reply(&self) -> Result<&Reply, eyre::Report> {
        self.last_reply
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no command has been sent yet"))
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> CrewWorld {
    CrewWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
