//! Command-line override parsing
//!
//! `--name value` sets `name` to the string `value`; `--name` followed by
//! another flag (or nothing) sets it to `true`. Everything else is a
//! positional argument.

use std::collections::HashSet;

use crate::store::OverrideStore;
use crate::value::RawValue;

/// Token that switches on performance-test mode when present anywhere.
pub const PERFORMANCE_FLAG: &str = "--performance";

const FLAG_PREFIX: &str = "--";

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandLine {
    flags: Vec<(String, RawValue)>,
    overridden: HashSet<String>,
    positional: Vec<String>,
    performance: bool,
}

impl CommandLine {
    /// Parse raw arguments (without the program name).
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut parsed = Self {
            performance: tokens.iter().any(|t| t == PERFORMANCE_FLAG),
            ..Self::default()
        };

        let mut iter = tokens.into_iter().peekable();
        while let Some(token) = iter.next() {
            match token.strip_prefix(FLAG_PREFIX) {
                Some(name) => {
                    let value = match iter.next_if(|next| !next.starts_with(FLAG_PREFIX)) {
                        Some(value) => RawValue::from(value.as_str()),
                        None => RawValue::from(true),
                    };
                    parsed.overridden.insert(name.to_string());
                    parsed.flags.push((name.to_string(), value));
                }
                None => parsed.positional.push(token),
            }
        }

        parsed
    }

    /// Flags in command-line order. A repeated flag appears once per use.
    pub fn flags(&self) -> &[(String, RawValue)] {
        &self.flags
    }

    /// Whether `name` was given explicitly as a flag.
    pub fn is_overridden(&self, name: &str) -> bool {
        self.overridden.contains(name)
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn is_performance_test(&self) -> bool {
        self.performance
    }

    /// Write every flag into the store; later flags win.
    pub fn apply_to(&self, store: &mut OverrideStore) {
        for (name, value) in &self.flags {
            store.insert(name.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flag_consumes_following_value() {
        let cmd = CommandLine::parse(["--port", "8080", "input.txt"]);
        assert_eq!(cmd.flags(), &[("port".to_string(), RawValue::from("8080"))]);
        assert_eq!(cmd.positional(), &["input.txt".to_string()]);
        assert!(cmd.is_overridden("port"));
    }

    #[test]
    fn flag_before_flag_is_boolean() {
        let cmd = CommandLine::parse(["--verbose", "--level", "3"]);
        assert_eq!(
            cmd.flags(),
            &[
                ("verbose".to_string(), RawValue::from(true)),
                ("level".to_string(), RawValue::from("3")),
            ]
        );
    }

    #[test]
    fn trailing_flag_is_boolean() {
        let cmd = CommandLine::parse(["a", "--dry-run"]);
        assert_eq!(cmd.flags(), &[("dry-run".to_string(), RawValue::from(true))]);
        assert_eq!(cmd.positional(), &["a".to_string()]);
    }

    #[test]
    fn single_dash_values_are_consumed() {
        let cmd = CommandLine::parse(["--offset", "-5"]);
        assert_eq!(cmd.flags(), &[("offset".to_string(), RawValue::from("-5"))]);
        assert!(cmd.positional().is_empty());
    }

    #[test]
    fn performance_flag_is_detected() {
        assert!(CommandLine::parse(["x", "--performance"]).is_performance_test());
        assert!(!CommandLine::parse(["--perf"]).is_performance_test());
    }

    #[test]
    fn apply_to_lets_last_flag_win() {
        let cmd = CommandLine::parse(["--k", "1", "--k", "2"]);
        let mut store = OverrideStore::new();
        cmd.apply_to(&mut store);
        assert_eq!(store.get("k"), Some(&RawValue::from("2")));
    }
}
