use std::path::PathBuf;

use clap::Parser;

/// Embed a directory of static web assets into C source code.
///
/// Generates `<PREFIX>.h` and `<PREFIX>.c` containing one byte array per file
/// plus a lookup table keyed by web path.
///
/// The exit code is 0 if successful (skipped files are reported but do not
/// fail the run) and 1 if a fatal error occurred.
#[derive(Parser)]
#[command(version)]
pub(crate) struct Args {
    /// Asset root directory, e.g. the `dist` folder of an SPA build.
    pub(crate) input: PathBuf,
    /// Output filename prefix; `.h` and `.c` are appended.
    #[arg(short, long, value_name = "PREFIX", default_value = "static_files")]
    pub(crate) output: PathBuf,
    /// Disable gzip compression.
    #[arg(long)]
    pub(crate) no_gzip: bool,
    /// Log details of every converted file.
    #[arg(short, long, conflicts_with = "quiet")]
    pub(crate) verbose: bool,
    /// Only log warnings and errors.
    #[arg(short, long)]
    pub(crate) quiet: bool,
}

impl Args {
    pub(crate) fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Warn
        } else {
            log::LevelFilter::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["spa-embed", "dist"]).unwrap();
        assert_eq!(args.input, PathBuf::from("dist"));
        assert_eq!(args.output, PathBuf::from("static_files"));
        assert!(!args.no_gzip);
        assert_eq!(args.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn flags() {
        let args =
            Args::try_parse_from(["spa-embed", "-o", "out/web", "--no-gzip", "-q", "dist"]).unwrap();
        assert_eq!(args.output, PathBuf::from("out/web"));
        assert!(args.no_gzip);
        assert_eq!(args.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["spa-embed", "-v", "-q", "dist"]).is_err());
    }

    #[test]
    fn missing_input() {
        assert!(Args::try_parse_from(["spa-embed"]).is_err());
    }
}
