//! The on-disk layout of a release note file.
//!
//! Lines whose trimmed form starts with `#` are the header and survive every
//! update verbatim. Everything else is the body, which an update replaces.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::error::ValidationError;

pub const HEADER_MARKER: char = '#';

/// The original input field only accepted this many characters.
pub const MAX_SEQUENCE_LEN: usize = 10;

pub fn is_header_line(line: &str) -> bool {
    line.trim().starts_with(HEADER_MARKER)
}

/// Collects the header lines in order, each with its original line ending.
pub fn header_block(content: &str) -> Vec<&str> {
    content
        .split_inclusive('\n')
        .filter(|line| is_header_line(line))
        .collect()
}

/// The non-header lines, trimmed as a whole.
pub fn body_text(content: &str) -> String {
    let body: String = content
        .split_inclusive('\n')
        .filter(|line| !is_header_line(line))
        .collect();
    body.trim().to_string()
}

/// Release stage of a version stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::One => "1",
            Stage::Two => "2",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "1" => Some(Stage::One),
            "2" => Some(Stage::Two),
            _ => None,
        }
    }
}

/// Target environment of a version stamp: development, test or production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    D,
    T,
    P,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::D => "D",
            Environment::T => "T",
            Environment::P => "P",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "D" => Some(Environment::D),
            "T" => Some(Environment::T),
            "P" => Some(Environment::P),
            _ => None,
        }
    }
}

/// Rendered as `[stage].[sequence].[environment]`, e.g. `[1].[007].[T]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionStamp {
    pub stage: Stage,
    pub sequence: String,
    pub environment: Environment,
}

impl VersionStamp {
    pub fn new(stage: Stage, sequence: impl Into<String>, environment: Environment) -> Self {
        Self {
            stage,
            sequence: sequence.into(),
            environment,
        }
    }

    /// Returns a copy with a trimmed sequence, or the reason it is unusable.
    pub fn validated(&self) -> Result<Self, ValidationError> {
        let sequence = self.sequence.trim();
        if sequence.is_empty() {
            return Err(ValidationError::EmptySequence);
        }
        if sequence.chars().count() > MAX_SEQUENCE_LEN {
            return Err(ValidationError::SequenceTooLong {
                max: MAX_SEQUENCE_LEN,
            });
        }
        Ok(Self::new(self.stage, sequence, self.environment))
    }

    /// Parses a whole line as a stamp.
    pub fn parse_line(line: &str) -> Option<Self> {
        let caps = stamp_pattern().captures(line.trim())?;
        Some(Self::new(
            Stage::parse(&caps[1])?,
            &caps[2],
            Environment::parse(&caps[3])?,
        ))
    }
}

impl fmt::Display for VersionStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}].[{}].[{}]",
            self.stage.as_str(),
            self.sequence,
            self.environment.as_str()
        )
    }
}

fn stamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\[([12])\]\.\[([^\]\r\n]+)\]\.\[([DTP])\]$").expect("stamp pattern is valid")
    })
}

/// The last stamp found in the body, i.e. the file's current version.
pub fn latest_stamp(content: &str) -> Option<VersionStamp> {
    content
        .lines()
        .filter(|line| !is_header_line(line))
        .filter_map(VersionStamp::parse_line)
        .last()
}

/// Lays out the new file: header, one blank line, stamp, body, newline.
pub fn compose(header: &[&str], stamp: &VersionStamp, body: &str) -> String {
    let mut out: String = header.concat();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&stamp.to_string());
    out.push('\n');
    out.push_str(body.trim());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(sequence: &str) -> VersionStamp {
        VersionStamp::new(Stage::One, sequence, Environment::T)
    }

    #[test]
    fn test_header_block_keeps_indented_markers_and_line_endings() {
        let content = "# Title\nold body\n   # owner: ops\r\nmore\n#last";
        assert_eq!(
            header_block(content),
            vec!["# Title\n", "   # owner: ops\r\n", "#last"]
        );
    }

    #[test]
    fn test_body_text_drops_header_lines() {
        let content = "# Title\n\n[1].[1].[D]\nhello\n# note\nworld\n";
        assert_eq!(body_text(content), "[1].[1].[D]\nhello\nworld");
    }

    #[test]
    fn test_stamp_display_uses_bracketed_pattern() {
        assert_eq!(stamp("007").to_string(), "[1].[007].[T]");
        assert_eq!(
            VersionStamp::new(Stage::Two, "12", Environment::P).to_string(),
            "[2].[12].[P]"
        );
    }

    #[test]
    fn test_validated_trims_and_rejects() {
        assert_eq!(stamp("  42 ").validated().unwrap().sequence, "42");
        assert_eq!(
            stamp("   ").validated(),
            Err(ValidationError::EmptySequence)
        );
        assert_eq!(
            stamp("12345678901").validated(),
            Err(ValidationError::SequenceTooLong { max: 10 })
        );
    }

    #[test]
    fn test_latest_stamp_picks_last_body_stamp() {
        let content = "# [1].[9].[P]\n\n[1].[001].[D]\nfirst\n[2].[002].[T]\nsecond\n";
        assert_eq!(
            latest_stamp(content),
            Some(VersionStamp::new(Stage::Two, "002", Environment::T))
        );
        assert_eq!(latest_stamp("no stamps here"), None);
        assert_eq!(latest_stamp("[3].[1].[D]"), None);
    }

    #[test]
    fn test_compose_without_header_starts_with_blank_line() {
        assert_eq!(compose(&[], &stamp("5"), "  body  \n"), "\n[1].[5].[T]\nbody\n");
    }

    #[test]
    fn test_compose_terminates_unterminated_header() {
        let composed = compose(&["# a\n", "# b"], &stamp("5"), "body");
        insta::assert_snapshot!(composed, @r"
        # a
        # b

        [1].[5].[T]
        body
        ");
    }
}
