// Terminal prompt adapter - Line input from stdin, messages to stdout

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::domain::errors::*;
use crate::ports::*;

/// Prompt adapter on the process terminal
pub struct StdioPromptAdapter {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdioPromptAdapter {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for StdioPromptAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptPort for StdioPromptAdapter {
    async fn read_line(&self, prompt: &str) -> Result<Option<String>, DomainError> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let mut lines = self.lines.lock().await;
        Ok(lines.next_line().await?)
    }

    async fn say(&self, message: &str) {
        println!("{}", message);
    }
}
