use std::fmt;
use std::str::FromStr;

/// Editor modes that own a binding table under `[keys.<mode>]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum Mode {
    Normal,
    Insert,
    Select,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Normal, Mode::Insert, Mode::Select];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Insert => "insert",
            Mode::Select => "select",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Mode::Normal),
            "insert" => Ok(Mode::Insert),
            "select" => Ok(Mode::Select),
            other => Err(format!("unknown mode `{}`", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("normal".parse::<Mode>(), Ok(Mode::Normal));
        assert_eq!("select".parse::<Mode>(), Ok(Mode::Select));
        assert!("visual".parse::<Mode>().is_err());
    }

    #[test]
    fn test_mode_display_round_trips() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>(), Ok(mode));
        }
    }
}
