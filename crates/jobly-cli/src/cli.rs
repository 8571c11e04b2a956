use anyhow::Context;
use jobly::{CompanyFilter, JobFilter};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Companies,
    Jobs,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Run(RunArgs),
}

#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    /// `None` means the default `jobly.toml`, which may be absent.
    pub config: Option<PathBuf>,
    pub database: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RunArgs {
    pub global: GlobalArgs,
    pub resource: Resource,
}

#[derive(Debug, Clone)]
pub enum Resource {
    Companies(CompanyCommand),
    Jobs(JobCommand),
}

#[derive(Debug, Clone)]
pub enum CompanyCommand {
    List(CompanyFilter),
    Get(String),
    Create { data: String },
    Update { handle: String, data: String },
    Delete(String),
}

#[derive(Debug, Clone)]
pub enum JobCommand {
    List(JobFilter),
    Get(i32),
    Create { data: String },
    Update { id: i32, data: String },
    Delete(i32),
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "companies" => parse_companies(it.map(|s| s.as_str())),
        "jobs" => parse_jobs(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Split `--flag=value` into its parts; other tokens pass through unchanged.
fn split_flag(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
        _ => (token, None),
    }
}

fn flag_value<'a>(
    flag: &str,
    inline: Option<&'a str>,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<&'a str> {
    match inline.or_else(|| it.next()) {
        Some(v) => Ok(v),
        None => anyhow::bail!("{flag} requires a value"),
    }
}

fn parse_number(flag: &str, v: &str) -> anyhow::Result<i64> {
    v.trim()
        .parse()
        .with_context(|| format!("{flag} expects an integer, got {v:?}"))
}

fn parse_job_id(v: &str) -> anyhow::Result<i32> {
    v.trim()
        .parse()
        .with_context(|| format!("invalid job id: {v:?}"))
}

/// Positional words after the resource: an action and at most one target.
#[derive(Default)]
struct Positionals<'a> {
    action: Option<&'a str>,
    target: Option<&'a str>,
}

impl<'a> Positionals<'a> {
    fn push(&mut self, token: &'a str) -> anyhow::Result<()> {
        if self.action.is_none() {
            self.action = Some(token);
        } else if self.target.is_none() {
            self.target = Some(token);
        } else {
            anyhow::bail!("unexpected argument: {token}");
        }
        Ok(())
    }

    fn target(&self, usage: &str) -> anyhow::Result<&'a str> {
        self.target
            .ok_or_else(|| anyhow::anyhow!("missing argument; usage: {usage}"))
    }

    fn no_target(&self) -> anyhow::Result<()> {
        match self.target {
            Some(t) => anyhow::bail!("unexpected argument: {t}"),
            None => Ok(()),
        }
    }
}

fn parse_companies<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut pos = Positionals::default();
    let mut global = GlobalArgs::default();
    let mut data: Option<String> = None;
    let mut filter = CompanyFilter::default();

    while let Some(token) = it.next() {
        let (flag, inline) = split_flag(token);
        match flag {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Companies)),
            "--config" => global.config = Some(PathBuf::from(flag_value(flag, inline, &mut it)?)),
            "--database" => global.database = Some(flag_value(flag, inline, &mut it)?.to_string()),
            "--data" => data = Some(flag_value(flag, inline, &mut it)?.to_string()),
            "--name" => filter.name = Some(flag_value(flag, inline, &mut it)?.to_string()),
            "--min-employees" => {
                filter.min_employees = Some(parse_number(flag, flag_value(flag, inline, &mut it)?)?)
            }
            "--max-employees" => {
                filter.max_employees = Some(parse_number(flag, flag_value(flag, inline, &mut it)?)?)
            }
            other if other.starts_with('-') => anyhow::bail!("unknown argument: {other}"),
            _ => pos.push(token)?,
        }
    }

    let Some(action) = pos.action else {
        return Ok(Command::Help(HelpTopic::Companies));
    };
    if action != "list" && !filter.is_empty() {
        anyhow::bail!("search options are only valid for `companies list`");
    }
    if !matches!(action, "create" | "update") && data.is_some() {
        anyhow::bail!("--data is only valid for `companies create` and `companies update`");
    }
    let require_data = |data: Option<String>| {
        data.ok_or_else(|| anyhow::anyhow!("`companies {action}` requires --data <JSON>"))
    };

    let cmd = match action {
        "list" => {
            pos.no_target()?;
            CompanyCommand::List(filter)
        }
        "get" => CompanyCommand::Get(pos.target("jobly companies get <HANDLE>")?.to_string()),
        "create" => {
            pos.no_target()?;
            CompanyCommand::Create {
                data: require_data(data)?,
            }
        }
        "update" => CompanyCommand::Update {
            handle: pos
                .target("jobly companies update <HANDLE> --data <JSON>")?
                .to_string(),
            data: require_data(data)?,
        },
        "delete" => {
            CompanyCommand::Delete(pos.target("jobly companies delete <HANDLE>")?.to_string())
        }
        other => anyhow::bail!("unknown subcommand: {other}"),
    };

    Ok(Command::Run(RunArgs {
        global,
        resource: Resource::Companies(cmd),
    }))
}

fn parse_jobs<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut pos = Positionals::default();
    let mut global = GlobalArgs::default();
    let mut data: Option<String> = None;
    let mut filter = JobFilter::default();

    while let Some(token) = it.next() {
        let (flag, inline) = split_flag(token);
        match flag {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Jobs)),
            "--config" => global.config = Some(PathBuf::from(flag_value(flag, inline, &mut it)?)),
            "--database" => global.database = Some(flag_value(flag, inline, &mut it)?.to_string()),
            "--data" => data = Some(flag_value(flag, inline, &mut it)?.to_string()),
            "--title" => filter.title = Some(flag_value(flag, inline, &mut it)?.to_string()),
            "--min-salary" => {
                filter.min_salary = Some(parse_number(flag, flag_value(flag, inline, &mut it)?)?)
            }
            "--has-equity" => {
                let v = match inline {
                    None => true,
                    Some(v) => v
                        .parse()
                        .with_context(|| format!("--has-equity expects true or false, got {v:?}"))?,
                };
                filter.has_equity = Some(v);
            }
            other if other.starts_with('-') => anyhow::bail!("unknown argument: {other}"),
            _ => pos.push(token)?,
        }
    }

    let Some(action) = pos.action else {
        return Ok(Command::Help(HelpTopic::Jobs));
    };
    if action != "list" && !filter.is_empty() {
        anyhow::bail!("search options are only valid for `jobs list`");
    }
    if !matches!(action, "create" | "update") && data.is_some() {
        anyhow::bail!("--data is only valid for `jobs create` and `jobs update`");
    }
    let require_data = |data: Option<String>| {
        data.ok_or_else(|| anyhow::anyhow!("`jobs {action}` requires --data <JSON>"))
    };

    let cmd = match action {
        "list" => {
            pos.no_target()?;
            JobCommand::List(filter)
        }
        "get" => JobCommand::Get(parse_job_id(pos.target("jobly jobs get <ID>")?)?),
        "create" => {
            pos.no_target()?;
            JobCommand::Create {
                data: require_data(data)?,
            }
        }
        "update" => JobCommand::Update {
            id: parse_job_id(pos.target("jobly jobs update <ID> --data <JSON>")?)?,
            data: require_data(data)?,
        },
        "delete" => JobCommand::Delete(parse_job_id(pos.target("jobly jobs delete <ID>")?)?),
        other => anyhow::bail!("unknown subcommand: {other}"),
    };

    Ok(Command::Run(RunArgs {
        global,
        resource: Resource::Jobs(cmd),
    }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
jobly - companies and the jobs they post

USAGE:
  jobly <COMMAND> <ACTION> [OPTIONS]

COMMANDS:
  companies     List, inspect and edit companies
  jobs          List, inspect and edit jobs

GLOBAL OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml)
  --database <URL>      Override database.url from config
  -h, --help            Print help

Run `jobly <command> --help` for more."
            );
        }
        HelpTopic::Companies => {
            println!(
                "\
USAGE:
  jobly companies list [--name <TEXT>] [--min-employees <N>] [--max-employees <N>]
  jobly companies get <HANDLE>
  jobly companies create --data <JSON>
  jobly companies update <HANDLE> --data <JSON>
  jobly companies delete <HANDLE>

LIST OPTIONS:
  --name <TEXT>           Case-insensitive substring of the name
  --min-employees <N>     At least N employees
  --max-employees <N>     At most N employees

DATA:
  create: {{\"handle\", \"name\", \"description\", \"numEmployees\"?, \"logoUrl\"?}}
  update: any of \"name\", \"description\", \"numEmployees\", \"logoUrl\"

GLOBAL OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml)
  --database <URL>      Override database.url from config
  -h, --help            Print help"
            );
        }
        HelpTopic::Jobs => {
            println!(
                "\
USAGE:
  jobly jobs list [--title <TEXT>] [--min-salary <N>] [--has-equity]
  jobly jobs get <ID>
  jobly jobs create --data <JSON>
  jobly jobs update <ID> --data <JSON>
  jobly jobs delete <ID>

LIST OPTIONS:
  --title <TEXT>        Case-insensitive substring of the title
  --min-salary <N>      Salary of at least N
  --has-equity          Only jobs offering equity

DATA:
  create: {{\"title\", \"salary\"?, \"equity\"?, \"company_handle\"}}
  update: any of \"title\", \"salary\", \"equity\"

GLOBAL OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml)
  --database <URL>      Override database.url from config
  -h, --help            Print help"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("jobly")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn no_arguments_prints_root_help() {
        let cmd = parse_args(&args(&[])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Root)));
    }

    #[test]
    fn resource_without_action_prints_its_help() {
        let cmd = parse_args(&args(&["jobs"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Jobs)));
    }

    #[test]
    fn parse_companies_list_with_filter() {
        let cmd = parse_args(&args(&[
            "companies",
            "list",
            "--name",
            "net",
            "--min-employees=10",
            "--max-employees",
            "500",
            "--config",
            "dev.toml",
        ]))
        .unwrap();
        let Command::Run(run) = cmd else {
            panic!("expected run");
        };
        let Resource::Companies(CompanyCommand::List(filter)) = run.resource else {
            panic!("expected companies list");
        };

        assert_eq!(filter.name.as_deref(), Some("net"));
        assert_eq!(filter.min_employees, Some(10));
        assert_eq!(filter.max_employees, Some(500));
        assert_eq!(run.global.config, Some(PathBuf::from("dev.toml")));
    }

    #[test]
    fn parse_company_update() {
        let cmd = parse_args(&args(&[
            "companies",
            "update",
            "c1",
            "--data",
            r#"{"numEmployees": 5}"#,
            "--database=postgres://localhost/jobly",
        ]))
        .unwrap();
        let Command::Run(run) = cmd else {
            panic!("expected run");
        };
        let Resource::Companies(CompanyCommand::Update { handle, data }) = run.resource else {
            panic!("expected companies update");
        };

        assert_eq!(handle, "c1");
        assert_eq!(data, r#"{"numEmployees": 5}"#);
        assert_eq!(
            run.global.database.as_deref(),
            Some("postgres://localhost/jobly")
        );
    }

    #[test]
    fn parse_jobs_list_flags() {
        let cmd = parse_args(&args(&["jobs", "list", "--min-salary", "1000", "--has-equity"]))
            .unwrap();
        let Command::Run(run) = cmd else {
            panic!("expected run");
        };
        let Resource::Jobs(JobCommand::List(filter)) = run.resource else {
            panic!("expected jobs list");
        };

        assert_eq!(filter.min_salary, Some(1000));
        assert_eq!(filter.has_equity, Some(true));
        assert_eq!(filter.title, None);
    }

    #[test]
    fn parse_has_equity_false() {
        let cmd = parse_args(&args(&["jobs", "list", "--has-equity=false"])).unwrap();
        let Command::Run(run) = cmd else {
            panic!("expected run");
        };
        let Resource::Jobs(JobCommand::List(filter)) = run.resource else {
            panic!("expected jobs list");
        };
        assert_eq!(filter.has_equity, Some(false));
    }

    #[test]
    fn parse_job_get_and_delete() {
        let Command::Run(run) = parse_args(&args(&["jobs", "get", "42"])).unwrap() else {
            panic!("expected run");
        };
        assert!(matches!(run.resource, Resource::Jobs(JobCommand::Get(42))));

        let Command::Run(run) = parse_args(&args(&["jobs", "delete", "7"])).unwrap() else {
            panic!("expected run");
        };
        assert!(matches!(run.resource, Resource::Jobs(JobCommand::Delete(7))));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&args(&["jobs", "get", "abc"])).is_err());
        assert!(parse_args(&args(&["jobs", "get"])).is_err());
        assert!(parse_args(&args(&["jobs", "update", "1"])).is_err());
        assert!(parse_args(&args(&["jobs", "get", "1", "--title", "x"])).is_err());
        assert!(parse_args(&args(&["companies", "list", "--min-employees", "many"])).is_err());
        assert!(parse_args(&args(&["companies", "list", "--bogus"])).is_err());
        assert!(parse_args(&args(&["companies", "create"])).is_err());
        assert!(parse_args(&args(&["companies", "fire", "c1"])).is_err());
        assert!(parse_args(&args(&["companies", "list", "--name"])).is_err());
        assert!(parse_args(&args(&["widgets"])).is_err());
    }
}
