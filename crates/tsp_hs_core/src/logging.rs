use std::{fs::File, io::Write};

use env_logger::{Builder, Target, fmt::Formatter};
use log::{Level, Record};

use crate::{Error, LogFormat, Result, SolverOptions};

pub fn init_logger(options: &SolverOptions) -> Result<()> {
    logger_builder(options)?
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

fn logger_builder(options: &SolverOptions) -> Result<Builder> {
    let log_format = options.log_format;
    let log_timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(env_logger::WriteStyle::Never)
        .format(move |buf: &mut Formatter, record| {
            if log_timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            writeln!(buf, "{}", render(log_format, record))
        });

    if let Some(log_path) = options.log_output_path() {
        let log_file = File::create(log_path).map_err(|e| {
            Error::other(format!(
                "failed to create log output file {}: {e}",
                log_path.display()
            ))
        })?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    Ok(builder)
}

fn render(log_format: LogFormat, record: &Record<'_>) -> String {
    match log_format {
        LogFormat::Compact => format!("{} {}", level_tag(record.level()), record.args()),
        LogFormat::Pretty => format!(
            "{} [{}] {}",
            level_tag(record.level()),
            record.target(),
            record.args()
        ),
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

#[cfg(test)]
mod tests {
    use log::{Level, Record};

    use super::{level_tag, logger_builder, render};
    use crate::{LogFormat, SolverOptions};

    #[test]
    fn level_tags_are_upper_case() {
        assert_eq!(level_tag(Level::Warn), "WARN");
        assert_eq!(level_tag(Level::Debug), "DEBUG");
    }

    fn rendered(log_format: LogFormat) -> String {
        render(
            log_format,
            &Record::builder()
                .args(format_args!("search: init n=4"))
                .level(Level::Info)
                .target("tsp_hs_core::algo::search")
                .build(),
        )
    }

    #[test]
    fn compact_and_pretty_render_differently() {
        assert_eq!(rendered(LogFormat::Compact), "INFO search: init n=4");
        assert_eq!(
            rendered(LogFormat::Pretty),
            "INFO [tsp_hs_core::algo::search] search: init n=4"
        );
    }

    #[test]
    fn logger_builder_reports_unwritable_log_output() {
        let options = SolverOptions {
            log_output: "/nonexistent-dir/tsp-hs/run.log".to_string(),
            ..SolverOptions::default()
        };
        let err = logger_builder(&options).expect_err("missing directory should fail");
        assert!(err.to_string().contains("failed to create log output file"));
    }

    #[test]
    fn logger_builder_defaults_to_stderr() {
        assert!(logger_builder(&SolverOptions::default()).is_ok());
    }
}
