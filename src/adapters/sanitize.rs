//! Log sanitization for clinical values and personal identifiers.
//!
//! Formatted log lines pass through `SanitizingMakeWriter` before reaching
//! the sink. Redacted:
//! - Clinical measurements written as `name=value` / `name: value`
//!   (any of the nine form features)
//! - UUIDs, emails and phone numbers
//!
//! Callers should still avoid logging feature values; this is the backstop.
//! Each line is capped at `Settings::sanitize_max_bytes` (default 16 KiB,
//! `HEARTRISK_SANITIZE_MAX_BYTES`).

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::DEFAULT_SANITIZE_MAX_BYTES;
use crate::domain::FEATURE_NAMES;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

struct Rule {
    regex: Regex,
    replacement: String,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Rule>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn get_patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        let clinical = format!(
            r"(?i)\b({})\b(\s*[:=]\s*)-?\d+(?:\.\d+)?",
            FEATURE_NAMES.join("|")
        );
        let rules: Vec<(String, &str)> = vec![
            (clinical, "${1}${2}[REDACTED]"),
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}"
                    .to_string(),
                "[REDACTED-UUID]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b"
                    .to_string(),
                "[REDACTED-EMAIL]",
            ),
            (
                r"\b(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s][0-9]{3}[-.\s][0-9]{4}\b".to_string(),
                "[REDACTED-PHONE]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| p.as_str())).expect("Valid regex set");
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(&pattern).expect("Valid regex"),
                replacement: replacement.to_string(),
            })
            .collect();

        Patterns { set, rules }
    })
}

/// Redact clinical values and identifiers, keeping at most `max_bytes` of
/// the input.
#[must_use]
pub fn sanitize(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule
            .regex
            .replace_all(&result, rule.replacement.as_str())
            .into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}


/// A `tracing_subscriber` writer wrapper that sanitizes each formatted log
/// line before it is written to the underlying sink.
#[derive(Debug)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
    max_bytes: usize,
}

impl<M> SanitizingMakeWriter<M> {
    /// Wrap `inner`, capping each sanitized line at `max_bytes` (0 means default).
    #[must_use]
    pub fn with_limit(inner: M, max_bytes: usize) -> Self {
        let max_bytes = if max_bytes == 0 {
            DEFAULT_SANITIZE_MAX_BYTES
        } else {
            max_bytes
        };
        Self { inner, max_bytes }
    }
}

impl<M: Clone> Clone for SanitizingMakeWriter<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            max_bytes: self.max_bytes,
        }
    }
}

pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    buffer: Vec<u8>,
    max_bytes: usize,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn new(inner: W, max_bytes: usize) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            max_bytes,
        }
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let sanitized = sanitize(&String::from_utf8_lossy(&line), self.max_bytes);
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A formatter writing one huge line must not buffer without bound.
        let hard_cap = self.max_bytes.saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer), self.max_bytes);
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;

        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer), self.max_bytes);
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }

        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer(), self.max_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LIMIT: usize = DEFAULT_SANITIZE_MAX_BYTES;

    #[test]
    fn test_redacts_clinical_values() {
        let sanitized = sanitize("submitted age=63 chol: 233.5 thalach = 150", LIMIT);
        assert_eq!(
            sanitized,
            "submitted age=[REDACTED] chol: [REDACTED] thalach = [REDACTED]"
        );
    }

    #[test]
    fn test_leaves_prediction_logs_alone() {
        let line = "Assessment complete: prediction=3, level=3, severity=High";
        assert_eq!(sanitize(line, LIMIT), line);
    }

    #[test]
    fn test_redacts_identifiers() {
        let sanitized = sanitize("id 550e8400-e29b-41d4-a716-446655440000 by doc@clinic.org", LIMIT);
        assert!(sanitized.contains("[REDACTED-UUID]"));
        assert!(sanitized.contains("[REDACTED-EMAIL]"));
        assert!(!sanitized.contains("550e8400"));

        let sanitized = sanitize("call (555) 123-4567", LIMIT);
        assert!(sanitized.contains("[REDACTED-PHONE]"));
    }

    #[test]
    fn test_truncates_large_inputs() {
        let sanitized = sanitize("age=63 and a lot more text", 6);
        assert_eq!(sanitized, "age=[REDACTED] [TRUNCATED]");
    }

    #[test]
    fn test_writer_sanitizes_per_line() {
        let mut out = Vec::new();
        {
            let mut w = SanitizingWriter::new(&mut out, LIMIT);
            w.write_all(b"first age=5").expect("write");
            w.write_all(b"0\nsecond line\n").expect("write");
            w.flush().expect("flush");
        }
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "first age=[REDACTED]\nsecond line\n");
    }

    #[test]
    fn test_make_writer_applies_configured_limit() {
        let make = SanitizingMakeWriter::with_limit(|| Vec::<u8>::new(), 6);
        assert_eq!(make.max_bytes, 6);
        assert_eq!(
            SanitizingMakeWriter::with_limit(|| Vec::<u8>::new(), 0).max_bytes,
            LIMIT
        );

        let mut out = Vec::new();
        {
            let mut w = SanitizingWriter::new(&mut out, make.max_bytes);
            w.write_all(b"age=63 and a lot more text\n").expect("write");
        }
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "age=[REDACTED] [TRUNCATED]");
    }
}
