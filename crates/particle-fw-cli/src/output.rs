//! Status and failure output for particle-fw-upload (GitHub Actions or terminal)

use colored::Colorize;
use particle_fw_client::Reporter;

/// How lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    /// Workflow commands understood by a GitHub Actions runner
    Actions,
    /// Plain lines, colored unless disabled
    Terminal,
}

impl OutputStyle {
    /// `Actions` when running inside a GitHub Actions job
    pub fn detect() -> Self {
        match std::env::var("GITHUB_ACTIONS") {
            Ok(v) if v == "true" => Self::Actions,
            _ => Self::Terminal,
        }
    }
}

/// Reporter writing to stdout, the way the invoking environment expects
pub struct OutputContext {
    pub style: OutputStyle,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(style: OutputStyle, no_color: bool, quiet: bool) -> Self {
        if no_color || style == OutputStyle::Actions {
            colored::control::set_override(false);
        }
        Self { style, quiet }
    }

    /// Render the failure line
    pub fn format_failure(&self, msg: &str) -> String {
        match self.style {
            OutputStyle::Actions => format!("::error::{}", escape_data(msg)),
            OutputStyle::Terminal => msg.red().to_string(),
        }
    }
}

impl Reporter for OutputContext {
    fn info(&mut self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    fn set_failed(&mut self, message: &str) {
        match self.style {
            OutputStyle::Actions => println!("{}", self.format_failure(message)),
            OutputStyle::Terminal => eprintln!("{}", self.format_failure(message)),
        }
    }
}

/// Escape a workflow command message so it stays on one line
pub fn escape_data(msg: &str) -> String {
    msg.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("plain"), "plain");
        assert_eq!(escape_data("100%\r\ndone"), "100%25%0D%0Adone");
    }

    #[test]
    fn test_actions_failure_is_workflow_command() {
        let ctx = OutputContext::new(OutputStyle::Actions, false, false);
        assert_eq!(
            ctx.format_failure("Input required and not supplied: firmware-path"),
            "::error::Input required and not supplied: firmware-path"
        );
        assert_eq!(
            ctx.format_failure("line one\nline two"),
            "::error::line one%0Aline two"
        );
    }

    #[test]
    fn test_terminal_failure_without_color() {
        let ctx = OutputContext::new(OutputStyle::Terminal, true, false);
        assert_eq!(ctx.format_failure("invalid title"), "invalid title");
    }
}
