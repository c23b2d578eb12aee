//! Configuration options for the engine
use anyhow::{bail, Context, Result};
use std::str::FromStr;

/// Seed for the engine's random source; `random` lets the build decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seed {
    #[default]
    Random,
    Fixed(u64),
}

impl Seed {
    pub fn value(self) -> Option<u64> {
        match self {
            Seed::Random => None,
            Seed::Fixed(seed) => Some(seed),
        }
    }
}

impl FromStr for Seed {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" | "none" => Ok(Seed::Random),
            _ => Ok(Seed::Fixed(s.parse().with_context(|| format!("Invalid seed: {}", s))?)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Whether a failing command stops the session
    pub strict_mode: bool,
    /// Seed for random turns and playouts
    pub seed: Seed,
    /// Whether played turns are checked against the generated turn list
    pub verify: bool,
    /// Most turns a playout may take before it is abandoned
    pub playout_limit: usize,
}

impl EngineOptions {
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "strictmode" => self.strict_mode = value.parse()?,
            "seed" => self.seed = value.parse()?,
            "verify" => self.verify = value.parse()?,
            "playoutlimit" => self.playout_limit = value.parse()?,
            _ => bail!("Unknown option: {}", name),
        }

        Ok(())
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            strict_mode: false,
            seed: Seed::Random,
            verify: true,
            playout_limit: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_set_option() {
        let mut options = EngineOptions::default();
        options.set_option("strictmode", "true").unwrap();
        options.set_option("seed", "42").unwrap();
        options.set_option("verify", "false").unwrap();
        options.set_option("playoutlimit", "20").unwrap();
        assert!(options.strict_mode);
        assert_eq!(options.seed, Seed::Fixed(42));
        assert!(!options.verify);
        assert_eq!(options.playout_limit, 20);

        options.set_option("seed", "random").unwrap();
        assert_eq!(options.seed.value(), None);
    }

    #[test_case("strictmode", "yes"; "bad bool")]
    #[test_case("seed", "-1"; "bad seed")]
    #[test_case("playoutlimit", "many"; "bad limit")]
    #[test_case("spells", "true"; "unknown option")]
    fn test_set_option_errors(name: &str, value: &str) {
        assert!(EngineOptions::default().set_option(name, value).is_err());
    }
}
