//! Build progress reporting on stderr.
//!
//! Keeps stdout free; every line the build prints goes through [`Output`].

use console::{Style, Term};

/// Writes build progress lines, styled by outcome.
pub(crate) struct Output {
    term: Term,
    published: Style,
    notice: Style,
    failed: Style,
    summary: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            published: Style::new().green(),
            notice: Style::new().yellow(),
            failed: Style::new().red(),
            summary: Style::new().cyan().bold(),
        }
    }

    /// Unstyled line, used for the resolved source and output directories.
    pub(crate) fn info(&self, msg: &str) {
        self.line(msg, None);
    }

    /// A language whose artifacts were published.
    pub(crate) fn success(&self, msg: &str) {
        self.line(msg, Some(&self.published));
    }

    /// Run-wide notice such as a dry run.
    pub(crate) fn warning(&self, msg: &str) {
        self.line(msg, Some(&self.notice));
    }

    /// A language that failed to build or publish.
    pub(crate) fn error(&self, msg: &str) {
        self.line(msg, Some(&self.failed));
    }

    /// Final summary once every language succeeded.
    pub(crate) fn highlight(&self, msg: &str) {
        self.line(msg, Some(&self.summary));
    }

    fn line(&self, msg: &str, style: Option<&Style>) {
        // Best effort: a closed stderr does not fail the build.
        let _ = match style {
            Some(style) => self.term.write_line(&style.apply_to(msg).to_string()),
            None => self.term.write_line(msg),
        };
    }
}
