//! Colored terminal output.

use console::{Style, Term};

/// Status messages go to stderr so stdout carries only the rendered page.
pub(crate) struct Output {
    status: Term,
    page: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            page: Term::stdout(),
        }
    }

    fn styled(&self, style: &Style, msg: &str) {
        // A closed stderr leaves nowhere to report the failure
        let _ = self.status.write_line(&style.apply_to(msg).to_string());
    }

    /// Plain status line.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.status.write_line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.styled(&Style::new().green(), msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.styled(&Style::new().yellow(), msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.styled(&Style::new().red(), msg);
    }

    /// Dry-run plans and other results worth spotting at a glance.
    pub(crate) fn highlight(&self, msg: &str) {
        self.styled(&Style::new().cyan().bold(), msg);
    }

    /// Write the rendered page to stdout.
    pub(crate) fn document(&self, body: &str) -> std::io::Result<()> {
        self.page.write_line(body)
    }
}
