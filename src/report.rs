//! Console output for migration runs.

use std::io::Write;

use crate::migration::Reporter;

/// Writes run messages line by line. Output errors are logged and otherwise
/// ignored.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write report line");
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn header(&mut self, text: &str) {
        let rule = "=".repeat(text.chars().count());
        self.write_line(text);
        self.write_line(&rule);
    }

    fn info(&mut self, text: &str) {
        self.write_line(text);
    }

    fn progress(&mut self, text: &str) {
        self.write_line(&format!("  {text}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_reporter_channels() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.header("Title");
        reporter.info("Found 2");
        reporter.progress("0.0% of 2 id: 7");

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(out, "Title\n=====\nFound 2\n  0.0% of 2 id: 7\n");
    }
}
