use crate::kerberos::env::{CCNAME_ENVVAR, CCNEW_ENVVAR};
use crate::transfer::Request;
use clap::{command, Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

pub fn command() -> Command {
    command!()
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("source-cache")
                .long("source-cache")
                .short('c')
                .value_name("CCACHE")
                .help(format!(
                    "Source cache. Defaults to ${} or the per-user default cache",
                    CCNAME_ENVVAR
                )),
        )
        .arg(
            Arg::new("target-cache")
                .long("target-cache")
                .short('n')
                .value_name("CCACHE")
                .env(CCNEW_ENVVAR)
                .help("Target cache (e.g. DIR:/run/user/1000/krb5cc)"),
        )
        .arg(
            Arg::new("force")
                .long("force")
                .short('f')
                .action(ArgAction::SetTrue)
                .help("Write into the target even if it already holds a principal"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .short('l')
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .default_value("info")
                .help("Diagnostic verbosity on stderr"),
        )
}

#[derive(Debug)]
pub struct Arguments {
    pub source_cache: Option<String>,
    pub target_cache: Option<String>,
    pub force: bool,
    pub log_level: LevelFilter,
}

impl Arguments {
    pub fn to_request(&self) -> Request {
        Request {
            source: self.source_cache.clone(),
            target: self.target_cache.clone(),
            force: self.force,
        }
    }
}

pub struct ArgumentsParser<'a> {
    matches: &'a ArgMatches,
}

impl<'a> ArgumentsParser<'a> {
    pub fn parse(matches: &'a ArgMatches) -> Arguments {
        let parser = Self { matches };
        parser._parse()
    }

    fn _parse(&self) -> Arguments {
        Arguments {
            source_cache: self.parse_cache("source-cache"),
            target_cache: self.parse_cache("target-cache"),
            force: self.matches.get_flag("force"),
            log_level: self.parse_log_level(),
        }
    }

    fn parse_cache(&self, name: &str) -> Option<String> {
        self.matches
            .get_one::<String>(name)
            .filter(|s| !s.is_empty())
            .cloned()
    }

    fn parse_log_level(&self) -> LevelFilter {
        self.matches
            .get_one::<String>("log-level")
            .and_then(|s| s.parse().ok())
            .unwrap_or(LevelFilter::Info)
    }
}
