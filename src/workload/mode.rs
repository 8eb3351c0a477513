//! Benchmark mode definitions

/// Supported benchmark modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Single-threaded integer increment loop
    Simple,
    /// Single-threaded JSON serialization loop
    Json,
    /// OS threads contending on a blocking mutex, swept over oversubscription
    Thread,
    /// Tokio tasks contending on an async mutex, swept over oversubscription
    Async,
    /// Child processes contending on a file lock, swept over oversubscription
    Process,
    /// One trial of every workload (contended ones at oversubscription 1)
    All,
}

impl Mode {
    /// Parse mode from its command-line name (exact match)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "simple" => Some(Self::Simple),
            "json" => Some(Self::Json),
            "thread" => Some(Self::Thread),
            "async" => Some(Self::Async),
            "process" => Some(Self::Process),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Get command-line name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Json => "json",
            Self::Thread => "thread",
            Self::Async => "async",
            Self::Process => "process",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!(Mode::parse("simple"), Some(Mode::Simple));
        assert_eq!(Mode::parse("json"), Some(Mode::Json));
        assert_eq!(Mode::parse("thread"), Some(Mode::Thread));
        assert_eq!(Mode::parse("async"), Some(Mode::Async));
        assert_eq!(Mode::parse("all"), Some(Mode::All));
        assert_eq!(Mode::parse("process"), Some(Mode::Process));
        assert_eq!(Mode::parse("processes"), None);
        assert_eq!(Mode::parse("SIMPLE"), None);
    }

    #[test]
    fn test_display_round_trips_name() {
        for mode in [
            Mode::Simple,
            Mode::Json,
            Mode::Thread,
            Mode::Async,
            Mode::Process,
            Mode::All,
        ] {
            assert_eq!(Mode::parse(&mode.to_string()), Some(mode));
        }
    }
}
