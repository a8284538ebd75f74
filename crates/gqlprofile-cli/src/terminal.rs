//! Terminal prompts and the terminal login surface.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use gqlprofile_core::auth::login::submit_label;
use gqlprofile_core::auth::LoginView;

/// Login form drawn on stdout/stderr
#[derive(Debug, Default)]
pub struct TerminalLoginView {
    submitting: bool,
}

impl TerminalLoginView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }
}

impl LoginView for TerminalLoginView {
    fn render_form(&mut self) {
        println!("\n=== gqlprofile Login ===\n");
    }

    fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
        if submitting {
            println!("{}", submit_label(true));
        }
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("Error: {}\n", message);
    }
}

/// What to do after a failed dashboard load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Retry,
    Logout,
    Quit,
}

pub fn parse_choice(input: &str) -> Option<Choice> {
    match input.trim().to_lowercase().as_str() {
        "" | "r" | "retry" => Some(Choice::Retry),
        "l" | "logout" => Some(Choice::Logout),
        "q" | "quit" => Some(Choice::Quit),
        _ => None,
    }
}

/// Read one trimmed line. A closed stdin is an error.
pub fn read_line_from(reader: &mut impl BufRead) -> Result<String> {
    let mut input = String::new();
    let read = reader.read_line(&mut input).context("Failed to read from stdin")?;
    if read == 0 {
        bail!("stdin closed");
    }
    Ok(input.trim().to_string())
}

pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    read_line_from(&mut io::stdin().lock())
}

/// Prompt for the username, offering `default` on empty input
pub fn prompt_username(default: Option<&str>) -> Result<String> {
    match default.filter(|d| !d.is_empty()) {
        Some(default) => {
            let input = prompt_line(&format!("Username or email [{}]: ", default))?;
            if input.is_empty() {
                Ok(default.to_string())
            } else {
                Ok(input)
            }
        }
        None => prompt_line("Username or email: "),
    }
}

pub fn prompt_password() -> Result<String> {
    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
    Ok(password)
}

pub fn prompt_choice() -> Result<Choice> {
    loop {
        let input = prompt_line("[R]etry, [l]ogout or [q]uit? ")?;
        match parse_choice(&input) {
            Some(choice) => return Ok(choice),
            None => eprintln!("Unknown choice: {}", input),
        }
    }
}
