use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sim86-sim", version, about = "Simulate raw 8086 machine code")]
pub struct Config {
    /// The binary file to simulate
    pub binary: PathBuf,

    /// Only print the state after the last instruction
    #[arg(short, long)]
    pub quiet: bool,

    /// Log more, repeat for even more
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let config = Config::try_parse_from(["sim86-sim", "listing_0043", "-vv"]).unwrap();
        assert_eq!(config.binary, PathBuf::from("listing_0043"));
        assert!(!config.quiet);
        assert_eq!(config.log_level(), tracing::Level::DEBUG);

        let config = Config::try_parse_from(["sim86-sim", "--quiet", "listing_0043"]).unwrap();
        assert!(config.quiet);
        assert_eq!(config.log_level(), tracing::Level::WARN);

        // Nothing is logged below debug, more flags don't add anything.
        let config = Config::try_parse_from(["sim86-sim", "-vvvv", "listing_0043"]).unwrap();
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn binary_is_required() {
        assert!(Config::try_parse_from(["sim86-sim"]).is_err());
    }
}
