//! Terminal output and prompts
//!
//! The core never writes to stdout directly; it reports through the
//! [`Terminal`] trait so output styling and interactivity stay out of the
//! resolution and installation logic.

use std::cell::RefCell;
use std::io::IsTerminal;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::Confirm;

use crate::error::Result;

/// Output and prompt capabilities used by the core
pub trait Terminal {
    /// Print a line
    fn writeln(&self, message: &str);

    /// Print a warning line
    fn warn(&self, message: &str);

    /// Ask a yes/no question
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Start a spinner with `message`
    fn spinner_start(&self, message: &str);

    /// Stop the spinner, marking success
    fn spinner_ok(&self);

    /// Stop the spinner, marking failure
    fn spinner_fail(&self);
}

/// Terminal backed by the process's stdio
pub struct ConsoleTerminal {
    spinner: RefCell<Option<ProgressBar>>,
    interactive: bool,
}

impl ConsoleTerminal {
    pub fn new() -> Self {
        Self {
            spinner: RefCell::new(None),
            interactive: std::io::stdin().is_terminal() && std::io::stderr().is_terminal(),
        }
    }

    /// The active spinner, if it is being drawn
    fn visible_spinner(&self) -> Option<ProgressBar> {
        self.spinner
            .borrow()
            .as_ref()
            .filter(|pb| !pb.is_hidden())
            .cloned()
    }

    fn finish_spinner(&self, status: &str) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            let message = pb.message();
            pb.finish_and_clear();
            eprintln!("{message} ... [{status}]");
        }
    }
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for ConsoleTerminal {
    fn writeln(&self, message: &str) {
        match self.visible_spinner() {
            Some(pb) => pb.suspend(|| println!("{message}")),
            None => println!("{message}"),
        }
    }

    fn warn(&self, message: &str) {
        let line = style(message).cyan().to_string();
        match self.visible_spinner() {
            Some(pb) => pb.println(line),
            None => eprintln!("{line}"),
        }
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if !self.interactive {
            return Ok(default);
        }

        let suspended = self.spinner.borrow().clone();
        if let Some(pb) = &suspended {
            pb.disable_steady_tick();
        }

        let answer = match &suspended {
            Some(pb) => pb.suspend(|| Confirm::new(prompt).with_default(default).prompt()),
            None => Confirm::new(prompt).with_default(default).prompt(),
        };

        if let Some(pb) = &suspended {
            pb.enable_steady_tick(Duration::from_millis(100));
        }

        Ok(answer?)
    }

    fn spinner_start(&self, message: &str) {
        self.finish_spinner("OK");

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(message.to_string());
        if self.interactive {
            pb.enable_steady_tick(Duration::from_millis(100));
        }
        *self.spinner.borrow_mut() = Some(pb);
    }

    fn spinner_ok(&self) {
        self.finish_spinner(&style("OK").green().to_string());
    }

    fn spinner_fail(&self) {
        self.finish_spinner(&style("FAIL").red().to_string());
    }
}
