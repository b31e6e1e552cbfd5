use std::fmt;

/// Severity of a reading against a warn/critical pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Level {
    #[default]
    Normal,
    High,
    Critical,
}

impl Level {
    /// `value >= crit` is critical, `value >= warn` is high.
    pub fn classify(value: f64, warn: f64, crit: f64) -> Self {
        if value >= crit {
            Self::Critical
        } else if value >= warn {
            Self::High
        } else {
            Self::Normal
        }
    }

    /// Suffix appended to a readout; empty for normal readings.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Normal   => "",
            Self::High     => " [high]",
            Self::Critical => " [critical]",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal   => "normal",
            Self::High     => "high",
            Self::Critical => "critical",
        })
    }
}
