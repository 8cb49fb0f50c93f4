//! Terminal output for the `quire` binary.

use console::{Style, Term};

/// Status messages go to stderr, command results (tree listings, JSON) to
/// stdout so they can be piped.
pub(crate) struct Output {
    status: Term,
    results: Term,
    ok: Style,
    failure: Style,
    muted: Style,
    accent: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            results: Term::stdout(),
            ok: Style::new().green(),
            failure: Style::new().red(),
            muted: Style::new().dim(),
            accent: Style::new().cyan().bold(),
        }
    }

    fn status_line(&self, style: Option<&Style>, msg: &str) {
        let line = match style {
            Some(style) => style.apply_to(msg).to_string(),
            None => msg.to_owned(),
        };
        let _ = self.status.write_line(&line);
    }

    pub(crate) fn info(&self, msg: &str) {
        self.status_line(None, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.status_line(Some(&self.ok), msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.status_line(Some(&self.failure), msg);
    }

    /// Write one line of command output to stdout.
    pub(crate) fn print(&self, line: &str) {
        let _ = self.results.write_line(line);
    }

    pub(crate) fn dimmed(&self, text: &str) -> String {
        self.muted.apply_to(text).to_string()
    }

    pub(crate) fn highlighted(&self, text: &str) -> String {
        self.accent.apply_to(text).to_string()
    }
}
