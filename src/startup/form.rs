//! Startup form: collects the exclusion list and idle time limit once
//!
//! The form blocks on the console until both fields are answered. Pressing
//! Enter on the last field confirms it.

use std::io::{self, BufRead, Stdin, Stdout, Write};

use crate::core::config::ConfigError;
use crate::core::exclusions::ExclusionSet;

/// Values gathered before the poll loop starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Baseline plus user-supplied names
    pub exclusions: ExclusionSet,
    pub idle_threshold_secs: u64,
}

/// One-shot source of the startup configuration.
pub trait ConfigProvider {
    fn collect(&mut self) -> Result<StartupConfig, ConfigError>;
}

/// Split a comma-separated answer into trimmed, non-empty names.
pub fn parse_exclusions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Parse the idle time field. A blank answer keeps the pre-filled default.
pub fn parse_threshold(raw: &str, default_secs: u64) -> Result<u64, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default_secs);
    }
    raw.parse::<u64>()
        .map_err(|_| ConfigError::InvalidThreshold(raw.to_string()))
}

/// Console rendition of the startup form.
pub struct ConsoleForm<R, W> {
    input: R,
    output: W,
    baseline: ExclusionSet,
    default_threshold_secs: u64,
}

impl ConsoleForm<io::StdinLock<'static>, Stdout> {
    /// Form bound to the process's stdin/stdout.
    pub fn stdio(baseline: ExclusionSet, default_threshold_secs: u64) -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout(), baseline, default_threshold_secs)
    }
}

impl<R: BufRead, W: Write> ConsoleForm<R, W> {
    pub fn new(input: R, output: W, baseline: ExclusionSet, default_threshold_secs: u64) -> Self {
        Self {
            input,
            output,
            baseline,
            default_threshold_secs,
        }
    }

    fn ask(&mut self, label: &str) -> Result<String, ConfigError> {
        write!(self.output, "{}", label).map_err(ConfigError::Console)?;
        self.output.flush().map_err(ConfigError::Console)?;

        // EOF reads as an empty answer
        let mut line = String::new();
        self.input.read_line(&mut line).map_err(ConfigError::Console)?;
        Ok(line)
    }
}

impl<R: BufRead, W: Write> ConfigProvider for ConsoleForm<R, W> {
    fn collect(&mut self) -> Result<StartupConfig, ConfigError> {
        writeln!(self.output, "=== Idle Reaper ===").map_err(ConfigError::Console)?;

        let names = self.ask("Excluded processes (comma-separated): ")?;
        let label = format!("Idle time limit (seconds) [{}]: ", self.default_threshold_secs);
        let threshold = self.ask(&label)?;

        let idle_threshold_secs = parse_threshold(&threshold, self.default_threshold_secs)?;
        let mut exclusions = self.baseline.clone();
        exclusions.extend(parse_exclusions(&names));

        Ok(StartupConfig {
            exclusions,
            idle_threshold_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_form(input: &str) -> (Result<StartupConfig, ConfigError>, String) {
        let mut output = Vec::new();
        let result = {
            let mut form = ConsoleForm::new(
                Cursor::new(input.as_bytes().to_vec()),
                &mut output,
                ExclusionSet::from_names(["dwm.exe"]),
                600,
            );
            form.collect()
        };
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_parse_exclusions() {
        assert_eq!(
            parse_exclusions(" slack.exe, code.exe ,,"),
            vec!["slack.exe".to_string(), "code.exe".to_string()]
        );
        assert!(parse_exclusions("").is_empty());
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("120\n", 600).unwrap(), 120);
        assert_eq!(parse_threshold("   ", 600).unwrap(), 600);
        assert_eq!(parse_threshold("0", 600).unwrap(), 0);
        assert!(matches!(
            parse_threshold("-5", 600),
            Err(ConfigError::InvalidThreshold(_))
        ));
        assert!(matches!(
            parse_threshold("ten", 600),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_form_merges_with_baseline() {
        let (result, output) = run_form("Slack.exe, code.exe\n300\n");
        let config = result.unwrap();

        assert_eq!(config.idle_threshold_secs, 300);
        assert!(config.exclusions.contains("dwm.exe"));
        assert!(config.exclusions.contains("slack.exe"));
        assert!(config.exclusions.contains("code.exe"));
        assert!(output.contains("Idle time limit (seconds) [600]"));
    }

    #[test]
    fn test_form_defaults_on_blank_answers() {
        let (result, _) = run_form("\n\n");
        let config = result.unwrap();
        assert_eq!(config.idle_threshold_secs, 600);
        assert_eq!(config.exclusions.len(), 1);
    }

    #[test]
    fn test_form_rejects_bad_threshold() {
        let (result, _) = run_form("\nsoon\n");
        assert!(matches!(result, Err(ConfigError::InvalidThreshold(raw)) if raw == "soon"));
    }
}
