//! Text command parser.

use super::CommandParseError;
use crate::job::domain::{JobId, JobStatus};
use crate::staff::domain::{Capability, EmployeeId};
use chrono::NaiveDate;
use std::str::FromStr;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Site details supplied with `/create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    /// Day the job is scheduled for.
    pub day: NaiveDate,
    /// Site name.
    pub site: String,
    /// Street address.
    pub address: Option<String>,
    /// Area or neighbourhood.
    pub area: Option<String>,
    /// Gate or access code.
    pub gate_code: Option<String>,
    /// On-site contact.
    pub contact: Option<String>,
    /// Map link.
    pub map_link: Option<String>,
    /// Initial director notes.
    pub director_notes: Option<String>,
}

/// A parsed inbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/help`
    Help,
    /// `/create <day> <site> [key=value ...]`
    Create(NewJob),
    /// `/assign <job> <employee> [day]`
    Assign {
        /// Job to assign.
        job_id: JobId,
        /// Employee receiving the job.
        employee_id: EmployeeId,
        /// Day of the assignment; defaults to the job's scheduled day.
        day: Option<NaiveDate>,
    },
    /// `/unassign <job> <employee>`
    Unassign {
        /// Job to release.
        job_id: JobId,
        /// Employee currently holding the job.
        employee_id: EmployeeId,
    },
    /// `/start <job>`
    Start {
        /// Job to start.
        job_id: JobId,
    },
    /// `/finish <job>`
    Finish {
        /// Job to finish.
        job_id: JobId,
    },
    /// `/photo <job> <ref>`
    Photo {
        /// Job the photo belongs to.
        job_id: JobId,
        /// Stored photo reference.
        reference: String,
    },
    /// `/photos <job>`
    Photos {
        /// Job whose photos to list.
        job_id: JobId,
    },
    /// `/note <job> <text>`
    Note {
        /// Job to annotate.
        job_id: JobId,
        /// Note text.
        text: String,
    },
    /// `/dnote <job> <text>`
    DirectorNote {
        /// Job to annotate.
        job_id: JobId,
        /// Replacement director notes; blank clears them.
        text: String,
    },
    /// `/override <job> <status>`
    Override {
        /// Job to move.
        job_id: JobId,
        /// Target status.
        status: JobStatus,
    },
    /// `/jobs [day]`
    Jobs {
        /// Day to list; defaults to today.
        day: Option<NaiveDate>,
    },
    /// `/crew <employee> [day]`
    Crew {
        /// Employee whose jobs to list.
        employee_id: EmployeeId,
        /// Day to list; defaults to today.
        day: Option<NaiveDate>,
    },
    /// `/job <id>`
    Show {
        /// Job to show.
        job_id: JobId,
    },
    /// `/dashboard [day]`
    Dashboard {
        /// Day to summarise; defaults to today.
        day: Option<NaiveDate>,
    },
    /// `/unassigned`
    Unassigned,
}

/// Help entry for one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandUsage {
    /// Invocation syntax.
    pub syntax: &'static str,
    /// One-line description.
    pub summary: &'static str,
    /// Capability needed to use the command, if any.
    pub capability: Option<Capability>,
}

/// Every command, in the order `/help` lists them.
pub const COMMANDS: &[CommandUsage] = &[
    usage("/jobs [YYYY-MM-DD]", "list jobs for a day", None),
    usage("/job <job>", "show one job", None),
    usage("/start <job>", "start work on your job", Some(Capability::StartJob)),
    usage("/photo <job> <ref>", "attach a photo", Some(Capability::UploadPhoto)),
    usage("/photos <job>", "list a job's photos", None),
    usage("/note <job> <text>", "add a note", Some(Capability::AddNote)),
    usage("/finish <job>", "mark your job completed", Some(Capability::CompleteJob)),
    usage(
        "/create <YYYY-MM-DD> <site> [address=.. area=.. gate=.. contact=.. map=.. notes=..]",
        "create a job",
        Some(Capability::CreateJob),
    ),
    usage(
        "/assign <job> <employee> [YYYY-MM-DD]",
        "assign a job",
        Some(Capability::AssignJob),
    ),
    usage(
        "/unassign <job> <employee>",
        "release a job back to pending",
        Some(Capability::AssignJob),
    ),
    usage(
        "/dnote <job> <text>",
        "set director notes",
        Some(Capability::EditDirectorNotes),
    ),
    usage(
        "/override <job> <status>",
        "force a job status",
        Some(Capability::OverrideTransition),
    ),
    usage("/unassigned", "list pending jobs", Some(Capability::ViewAllJobs)),
    usage(
        "/crew <employee> [YYYY-MM-DD]",
        "list one employee's jobs",
        Some(Capability::ViewAllJobs),
    ),
    usage(
        "/dashboard [YYYY-MM-DD]",
        "daily summary",
        Some(Capability::ViewDashboard),
    ),
    usage("/help", "show this list", None),
];

const fn usage(
    syntax: &'static str,
    summary: &'static str,
    capability: Option<Capability>,
) -> CommandUsage {
    CommandUsage {
        syntax,
        summary,
        capability,
    }
}

impl Command {
    /// Parses `/<command> args...` input.
    ///
    /// A `@botname` suffix on the command word is ignored. Note texts keep
    /// the raw remainder of the line; other arguments are whitespace
    /// separated and may be double-quoted.
    ///
    /// # Errors
    ///
    /// Returns [`CommandParseError`] when the input is empty, unknown, or
    /// has missing or malformed arguments.
    pub fn parse(raw_input: &str) -> Result<Self, CommandParseError> {
        let trimmed = raw_input.trim();
        if trimmed.is_empty() {
            return Err(CommandParseError::EmptyInput);
        }
        let (head, rest) = split_word(trimmed);
        let name = head
            .strip_prefix('/')
            .ok_or(CommandParseError::MissingLeadingSlash)?;
        let command_name = name.split_once('@').map_or(name, |(stripped, _)| stripped);
        let normalized = command_name.to_ascii_lowercase();

        match normalized.as_str() {
            "help" | "start" if rest.is_empty() => Ok(Self::Help),
            "create" => parse_create(rest),
            "assign" => {
                let mut args = Args::new("assign", rest)?;
                let job_id = args.job_id()?;
                let employee_id = args.employee_id()?;
                let day = args.optional_day()?;
                args.finish()?;
                Ok(Self::Assign {
                    job_id,
                    employee_id,
                    day,
                })
            }
            "unassign" => {
                let mut args = Args::new("unassign", rest)?;
                let job_id = args.job_id()?;
                let employee_id = args.employee_id()?;
                args.finish()?;
                Ok(Self::Unassign {
                    job_id,
                    employee_id,
                })
            }
            "start" => single_job("start", rest).map(|job_id| Self::Start { job_id }),
            "finish" => single_job("finish", rest).map(|job_id| Self::Finish { job_id }),
            "job" => single_job("job", rest).map(|job_id| Self::Show { job_id }),
            "photos" => single_job("photos", rest).map(|job_id| Self::Photos { job_id }),
            "photo" => {
                let mut args = Args::new("photo", rest)?;
                let job_id = args.job_id()?;
                let reference = args.required("photo reference")?;
                args.finish()?;
                Ok(Self::Photo { job_id, reference })
            }
            "note" => {
                let (job_id, text) = job_and_text("note", rest)?;
                Ok(Self::Note { job_id, text })
            }
            "dnote" => {
                let (job_id, text) = job_and_text("dnote", rest)?;
                Ok(Self::DirectorNote { job_id, text })
            }
            "override" => {
                let mut args = Args::new("override", rest)?;
                let job_id = args.job_id()?;
                let raw = args.required("status")?;
                let status =
                    JobStatus::try_from(raw.as_str()).map_err(|err| CommandParseError::InvalidArgument {
                        command: "override",
                        argument: "status",
                        value: raw.clone(),
                        reason: err.to_string(),
                    })?;
                args.finish()?;
                Ok(Self::Override { job_id, status })
            }
            "jobs" => {
                let mut args = Args::new("jobs", rest)?;
                let day = args.optional_day()?;
                args.finish()?;
                Ok(Self::Jobs { day })
            }
            "crew" => {
                let mut args = Args::new("crew", rest)?;
                let employee_id = args.employee_id()?;
                let day = args.optional_day()?;
                args.finish()?;
                Ok(Self::Crew { employee_id, day })
            }
            "dashboard" => {
                let mut args = Args::new("dashboard", rest)?;
                let day = args.optional_day()?;
                args.finish()?;
                Ok(Self::Dashboard { day })
            }
            "unassigned" => {
                Args::new("unassigned", rest)?.finish()?;
                Ok(Self::Unassigned)
            }
            "help" => Err(CommandParseError::UnexpectedArgument {
                command: "help",
                token: rest.to_owned(),
            }),
            _ => Err(CommandParseError::UnknownCommand(normalized)),
        }
    }

    /// Returns the command name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Create(_) => "create",
            Self::Assign { .. } => "assign",
            Self::Unassign { .. } => "unassign",
            Self::Start { .. } => "start",
            Self::Finish { .. } => "finish",
            Self::Photo { .. } => "photo",
            Self::Photos { .. } => "photos",
            Self::Note { .. } => "note",
            Self::DirectorNote { .. } => "dnote",
            Self::Override { .. } => "override",
            Self::Jobs { .. } => "jobs",
            Self::Crew { .. } => "crew",
            Self::Show { .. } => "job",
            Self::Dashboard { .. } => "dashboard",
            Self::Unassigned => "unassigned",
        }
    }
}

fn parse_create(rest: &str) -> Result<Command, CommandParseError> {
    let mut args = Args::new("create", rest)?;
    let day = args.day()?;
    let mut job = NewJob {
        day,
        site: String::new(),
        address: None,
        area: None,
        gate_code: None,
        contact: None,
        map_link: None,
        director_notes: None,
    };
    let mut site_words = Vec::new();
    for token in args {
        let Some((key, value)) = token.split_once('=') else {
            site_words.push(token);
            continue;
        };
        let slot = match key.to_ascii_lowercase().as_str() {
            "address" => &mut job.address,
            "area" => &mut job.area,
            "gate" | "gate_code" => &mut job.gate_code,
            "contact" => &mut job.contact,
            "map" | "map_link" => &mut job.map_link,
            "notes" => &mut job.director_notes,
            _ => return Err(CommandParseError::UnknownDetail(key.to_owned())),
        };
        *slot = Some(value.to_owned());
    }
    if site_words.is_empty() {
        return Err(CommandParseError::MissingArgument {
            command: "create",
            argument: "site name",
        });
    }
    job.site = site_words.join(" ");
    Ok(Command::Create(job))
}

fn single_job(command: &'static str, rest: &str) -> Result<JobId, CommandParseError> {
    let mut args = Args::new(command, rest)?;
    let job_id = args.job_id()?;
    args.finish()?;
    Ok(job_id)
}

fn job_and_text(command: &'static str, rest: &str) -> Result<(JobId, String), CommandParseError> {
    let (raw_job, text) = split_word(rest);
    if raw_job.is_empty() {
        return Err(CommandParseError::MissingArgument {
            command,
            argument: "job id",
        });
    }
    let job_id = parse_job_id(command, raw_job)?;
    if text.is_empty() && command != "dnote" {
        return Err(CommandParseError::MissingArgument {
            command,
            argument: "note text",
        });
    }
    Ok((job_id, text.to_owned()))
}

fn split_word(input: &str) -> (&str, &str) {
    input
        .split_once(char::is_whitespace)
        .map_or((input, ""), |(head, rest)| (head, rest.trim()))
}

fn parse_job_id(command: &'static str, raw: &str) -> Result<JobId, CommandParseError> {
    JobId::from_str(raw).map_err(|err| CommandParseError::InvalidArgument {
        command,
        argument: "job id",
        value: raw.to_owned(),
        reason: err.to_string(),
    })
}

/// Positional argument cursor for one command.
struct Args {
    command: &'static str,
    tokens: std::vec::IntoIter<String>,
}

impl Args {
    fn new(command: &'static str, rest: &str) -> Result<Self, CommandParseError> {
        Ok(Self {
            command,
            tokens: tokenize(rest)?.into_iter(),
        })
    }

    fn required(&mut self, argument: &'static str) -> Result<String, CommandParseError> {
        self.tokens
            .next()
            .ok_or(CommandParseError::MissingArgument {
                command: self.command,
                argument,
            })
    }

    fn job_id(&mut self) -> Result<JobId, CommandParseError> {
        let raw = self.required("job id")?;
        parse_job_id(self.command, &raw)
    }

    fn employee_id(&mut self) -> Result<EmployeeId, CommandParseError> {
        let raw = self.required("employee id")?;
        EmployeeId::from_str(&raw).map_err(|err| CommandParseError::InvalidArgument {
            command: self.command,
            argument: "employee id",
            value: raw.clone(),
            reason: err.to_string(),
        })
    }

    fn day(&mut self) -> Result<NaiveDate, CommandParseError> {
        let raw = self.required("day")?;
        self.parse_day(&raw)
    }

    fn optional_day(&mut self) -> Result<Option<NaiveDate>, CommandParseError> {
        self.tokens
            .next()
            .map(|raw| self.parse_day(&raw))
            .transpose()
    }

    fn parse_day(&self, raw: &str) -> Result<NaiveDate, CommandParseError> {
        NaiveDate::parse_from_str(raw, DAY_FORMAT).map_err(|err| {
            CommandParseError::InvalidArgument {
                command: self.command,
                argument: "day",
                value: raw.to_owned(),
                reason: err.to_string(),
            }
        })
    }

    fn finish(mut self) -> Result<(), CommandParseError> {
        let command = self.command;
        self.tokens.next().map_or(Ok(()), |token| {
            Err(CommandParseError::UnexpectedArgument { command, token })
        })
    }
}

impl Iterator for Args {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.next()
    }
}

fn tokenize(input: &str) -> Result<Vec<String>, CommandParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut escaped = false;

    for character in input.chars() {
        if quoted {
            if escaped {
                current.push(character);
                escaped = false;
                continue;
            }
            match character {
                '\\' => escaped = true,
                '"' => quoted = false,
                _ => current.push(character),
            }
            continue;
        }

        match character {
            '"' => quoted = true,
            _ if character.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(character),
        }
    }

    if quoted || escaped {
        return Err(CommandParseError::UnterminatedQuotedValue);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}
