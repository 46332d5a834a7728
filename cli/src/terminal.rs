use crate::error::Result;
use dialoguer::{Input, theme::ColorfulTheme};
use std::io::{self, Read};

/// Interactive side of a command: confirmation prompts and piped input
pub trait Terminal {
    /// Ask `prompt` and report whether the user typed `yes`
    fn confirm(&self, prompt: &str) -> Result<bool>;

    /// Read everything piped into stdin
    fn read_pipe(&self) -> Result<Vec<u8>>;
}

pub struct Console;

impl Terminal for Console {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let answer: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer.trim() == "yes")
    }

    fn read_pipe(&self) -> Result<Vec<u8>> {
        let mut content = Vec::new();
        io::stdin().lock().read_to_end(&mut content)?;
        tracing::debug!(bytes = content.len(), "read piped content");
        Ok(content)
    }
}
