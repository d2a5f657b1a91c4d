use std::{env, path::Path};

use log::LevelFilter;
use tsp_hs_derive::{CliOptions, CliValue, KvDisplay};

use crate::{
    Error, FirstCity, OperatorSet, Result, SearchConfig, algo::search::DEFAULT_POPULATION_SIZE,
};

/// Runtime options for the search and its I/O shell.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct SolverOptions {
    /// Number of tours kept in the population.
    #[cli(long = "population-size")]
    pub population_size: usize,
    /// Master seed. `None` draws one from entropy when the search starts.
    #[cli(long = "seed", parse_with = "parse_seed")]
    #[kv(fmt = "opt")]
    pub seed: Option<u64>,
    /// Perturbations evaluated per step: `pair` or `extended`.
    #[cli(long = "operators", parse_with = "OperatorSet::parse")]
    pub operators: OperatorSet,
    /// Input layout for the first city: `read` or `origin`.
    #[cli(long = "first-city", parse_with = "FirstCity::parse")]
    pub first_city: FirstCity,
    /// Structured logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    #[cli(long = "log-output")]
    pub log_output: String,
    /// Optional input file path for cities. Empty means stdin.
    #[cli(long = "input")]
    pub input: String,
    /// Optional output file path for improvement lines. Empty means stdout.
    #[cli(long = "output")]
    pub output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            seed: None,
            operators: OperatorSet::Pair,
            first_city: FirstCity::Read,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);

            if options.apply_cli_option(&name, value.clone())? {
                continue;
            }

            match name.as_str() {
                "log-timestamp" => {
                    options.log_timestamp = match value {
                        Some(v) => parse_bool(&name, &v)?,
                        None => true,
                    };
                }
                "no-log-timestamp" => {
                    if value.is_some() {
                        return Err(Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    options.log_timestamp = false;
                }
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        Ok(options)
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-hs [options] [--input cities.txt]\n",
            "  tsp-hs [options] < cities.txt\n\n",
            "Input:\n",
            "  <count>\n",
            "  <x> <y> <name>   (one record per city)\n\n",
            "Options:\n",
            "  --population-size <usize>\n",
            "  --seed <u64>\n",
            "  --operators <pair|extended>\n",
            "  --first-city <read|origin>\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  tsp-hs --seed 7 --log-level info < cities.txt\n",
            "  tsp-hs --input cities.txt --output progress.txt\n",
            "  tsp-hs --operators=extended --population-size=200 < cities.txt\n",
            "  tsp-hs --first-city=origin --log-level=debug --log-format=pretty < cities.txt\n",
        )
    }

    /// Search parameters for this run, drawing a fresh seed if none was given.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            population_size: self.population_size,
            seed: self.seed.unwrap_or_else(rand::random),
            operators: self.operators,
        }
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.log_output)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_stdio_path(&self.input)
    }
}

/// Empty and `-` select the standard stream.
fn non_stdio_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}

fn parse_seed(raw: &str) -> Result<Option<u64>> {
    raw.parse::<u64>()
        .map(Some)
        .map_err(|e| Error::invalid_input(format!("Invalid value for --seed: {raw} ({e})")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}
