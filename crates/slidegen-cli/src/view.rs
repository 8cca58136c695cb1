//! Terminal implementation of the `FormView` port
//!
//! One-shot mode only renders. Interactive mode also reads prompt lines
//! from stdin on a background thread and turns them into form events.

use colored::Colorize;
use dialoguer::Confirm;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

use slidegen::{EventSender, FormEvent, FormView, StatusDisplay};

/// Rough pixel height of one prompt line, for input sizing
const LINE_HEIGHT: u32 = 24;

pub const CLEAR_COMMAND: &str = "/clear";
pub const QUIT_COMMAND: &str = "/quit";

pub struct TerminalView {
    destination: String,
    read_stdin: bool,
    offer_reset: bool,
    prompt: Arc<Mutex<String>>,
    restart_requested: AtomicBool,
}

impl TerminalView {
    /// Render-only view for a single submission
    pub fn one_shot(destination: impl Into<String>, offer_reset: bool) -> Self {
        Self {
            destination: destination.into(),
            read_stdin: false,
            offer_reset,
            prompt: Arc::new(Mutex::new(String::new())),
            restart_requested: AtomicBool::new(false),
        }
    }

    /// View that reads one prompt per line until `/quit` or EOF
    pub fn interactive(destination: impl Into<String>) -> Self {
        Self {
            read_stdin: true,
            ..Self::one_shot(destination, false)
        }
    }

    /// Whether the user asked for another presentation (resets the flag)
    pub fn take_restart(&self) -> bool {
        self.restart_requested.swap(false, Ordering::SeqCst)
    }
}

/// Translate one stdin line into form events
pub fn events_for_line(line: &str) -> Vec<FormEvent> {
    match line.trim() {
        "" => Vec::new(),
        CLEAR_COMMAND => vec![FormEvent::Clear],
        QUIT_COMMAND => vec![FormEvent::Close],
        _ => vec![
            FormEvent::InputChanged(line.to_string()),
            FormEvent::Submit(line.to_string()),
        ],
    }
}

fn read_lines(events: EventSender, prompt: Arc<Mutex<String>>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };

        if !line.trim().starts_with('/') && !line.trim().is_empty() {
            *prompt.lock().unwrap_or_else(|e| e.into_inner()) = line.clone();
        }

        for event in events_for_line(&line) {
            let closing = event == FormEvent::Close;
            if events.send(event).is_err() || closing {
                return;
            }
        }
    }
    let _ = events.send(FormEvent::Close);
}

impl FormView for TerminalView {
    fn bind(&self, events: EventSender) {
        if !self.read_stdin {
            return;
        }
        let prompt = Arc::clone(&self.prompt);
        std::thread::spawn(move || read_lines(events, prompt));
    }

    fn render(&self, display: &StatusDisplay) {
        let submit_label = &display.submit.label;
        let submit_state = if display.submit.enabled { "enabled" } else { "disabled" };
        debug!("Submit control: {} ({})", submit_label, submit_state);

        if display.status_visible {
            println!("{} Generating presentation...", "⏳".yellow());
        } else if display.success_visible {
            println!(
                "{} Presentation generated and downloaded to {}",
                "✓".green(),
                self.destination.cyan()
            );
        } else if display.error_visible {
            let message = display.error_message.as_deref().unwrap_or_default();
            println!("{} {}", "✗".red(), message.red());
        }
    }

    fn set_char_count(&self, label: &str) {
        if self.read_stdin {
            println!("  {}", label.dimmed());
        }
    }

    fn content_height(&self) -> u32 {
        let prompt = self.prompt.lock().unwrap_or_else(|e| e.into_inner());
        prompt.lines().count().max(1) as u32 * LINE_HEIGHT
    }

    fn set_input_height(&self, height: Option<u32>) {
        debug!("Input height: {:?}", height);
    }

    fn set_prompt(&self, text: &str) {
        *self.prompt.lock().unwrap_or_else(|e| e.into_inner()) = text.to_string();
    }

    fn focus_prompt(&self) {
        if self.read_stdin {
            print!("{} ", ">".cyan().bold());
            let _ = io::stdout().flush();
        }
    }

    fn pulse_prompt(&self) {
        println!("{}", "Form cleared".dimmed());
    }

    fn show_busy(&self) {
        println!(
            "{}",
            "Still generating the previous presentation, prompt ignored".dimmed()
        );
    }

    fn confirm_new_submission(&self) -> bool {
        if !self.offer_reset {
            return false;
        }

        let again = Confirm::new()
            .with_prompt("Would you like to create another presentation?")
            .default(false)
            .interact()
            .unwrap_or(false);

        self.restart_requested.store(again, Ordering::SeqCst);
        again
    }
}
