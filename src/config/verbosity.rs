//! Output verbosity, chosen once at startup and passed to whoever needs it.

/// How much the scanner and the CLI report while working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Results only, one compact line each.
    Quiet,
    /// Header, result table and summary.
    #[default]
    Normal,
    /// Adds a progress bar and per-port info logs.
    Verbose,
    /// Adds debug logs for every probe.
    Debug,
    /// Everything, including trace-level transport logs.
    Trace,
}

impl Verbosity {
    /// Build from `-q` and the number of `-v` flags. `-q` wins.
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// Default `tracing` filter directive for this level.
    pub fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Whether a progress bar should be drawn.
    pub fn shows_progress(self) -> bool {
        self >= Self::Verbose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, 2), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, 7), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(true, 3), Verbosity::Quiet);
    }

    #[test]
    fn test_progress_threshold() {
        assert!(!Verbosity::Quiet.shows_progress());
        assert!(!Verbosity::Normal.shows_progress());
        assert!(Verbosity::Verbose.shows_progress());
        assert_eq!(Verbosity::Debug.log_filter(), "debug");
    }
}
