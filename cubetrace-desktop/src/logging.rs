//! Logging. And terminal progress bars. And their cooperation.

use std::sync::LazyLock;

use anyhow::Context as _;
use log::Log as _;

/// A [`clap::Args`] struct for options controlling log output to stderr.
#[derive(Clone, Debug, clap::Args)]
#[expect(clippy::module_name_repetitions)]
pub struct LoggingArgs {
    /// Additional logging to stderr.
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Remove timestamps from logs so that they are closer to deterministic.
    /// (Note that some logs will still contain timing data.)
    ///
    /// This option is intended for internal tests only.
    #[arg(long = "simplify-log-format", hide = true)]
    pub(crate) simplify_log_format: bool,
}

/// Install a [`log`] global logger based on user-provided `options`.
pub fn install(options: &LoggingArgs) -> Result<(), anyhow::Error> {
    use log::LevelFilter::{Debug, Error, Info, Off};

    let &LoggingArgs {
        verbose,
        simplify_log_format,
    } = options;

    let stderr_logger = simplelog::WriteLogger::new(
        if verbose { Debug } else { Info },
        // Note: This has no target filters because `CubetraceLogger` calls
        // `standard_filter` to do it.
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .set_time_level(if simplify_log_format { Off } else { Error })
            .build(),
        std::io::stderr(),
    );
    let max_level = simplelog::SharedLogger::level(&*stderr_logger);

    log::set_boxed_logger(Box::new(CubetraceLogger { stderr_logger }))
        .context("failed to initialize logging")?;
    log::set_max_level(max_level);
    Ok(())
}

/// Below [`log::Level::Info`], only messages from our own crates are shown, since the
/// ones from dependencies (such as `png`) are not of interest to users of this program.
fn standard_filter(metadata: &log::Metadata<'_>) -> bool {
    metadata.level() <= log::Level::Info || metadata.target().starts_with("cubetrace")
}

/// [`log::Log`] implementation that [`install()`] registers globally.
struct CubetraceLogger {
    stderr_logger: Box<simplelog::WriteLogger<std::io::Stderr>>,
}

impl log::Log for CubetraceLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        standard_filter(metadata) && self.stderr_logger.enabled(metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        if standard_filter(record.metadata()) {
            suspend_indicatif_in(|| self.stderr_logger.log(record));
        }
    }

    fn flush(&self) {
        suspend_indicatif_in(|| self.stderr_logger.flush())
    }
}

fn suspend_indicatif_in<R>(f: impl FnOnce() -> R) -> R {
    COOPERATIVE_PROGRESS.suspend(f)
}

pub(crate) static COOPERATIVE_PROGRESS: LazyLock<indicatif::MultiProgress> =
    LazyLock::new(indicatif::MultiProgress::new);

/// Constructs a progress bar which cooperates with logging to share stderr cleanly.
///
/// As opposed to the defaults, it:
///
/// * will have been added to a shared [`indicatif::MultiProgress`], and
/// * has the style [`common_progress_style()`].
pub fn new_progress_bar(len: u64) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new(len).with_style(common_progress_style());
    COOPERATIVE_PROGRESS.add(pb)
}

/// [`indicatif::ProgressStyle`] for progress bars we display.
pub fn common_progress_style() -> indicatif::ProgressStyle {
    #![allow(clippy::literal_string_with_formatting_args)]
    indicatif::ProgressStyle::default_bar()
        .template("{prefix:8} [{elapsed}] {wide_bar} {pos:>6}/{len:6} {msg:30}")
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter() {
        let meta = |level, target| log::Metadata::builder().level(level).target(target).build();
        assert!(standard_filter(&meta(log::Level::Debug, "cubetrace_render::scheduler")));
        assert!(standard_filter(&meta(log::Level::Info, "png::encoder")));
        assert!(!standard_filter(&meta(log::Level::Debug, "png::encoder")));
        assert!(!standard_filter(&meta(log::Level::Trace, "rayon_core")));
    }
}
