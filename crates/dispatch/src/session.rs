//! The voice session loop: greet, then listen and dispatch until told to
//! stop or the input runs dry.

use crate::router::{CommandRouter, Outcome};
use async_trait::async_trait;
use chrono::{Local, Timelike};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::{debug, info, warn};

/// Time-of-day greeting for an hour in `0..24`.
pub fn greeting_for(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good Morning sir!",
        12..=17 => "Good Afternoon sir!",
        _ => "Good Evening sir!",
    }
}

/// Where utterances come from.
#[async_trait]
pub trait UtteranceSource: Send {
    /// The next utterance, or `None` once input is exhausted. An empty
    /// string means nothing was recognised.
    async fn listen(&mut self) -> Option<String>;
}

/// Reads one utterance per line.
pub struct LineSource<R> {
    lines: tokio::io::Lines<R>,
    prompt: Option<String>,
}

impl LineSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            prompt: None,
        }
    }

    /// Print `prompt` before each read.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> UtteranceSource for LineSource<R> {
    async fn listen(&mut self) -> Option<String> {
        if let Some(prompt) = &self.prompt {
            print!("{prompt}");
            let _ = std::io::stdout().flush();
        }
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to read input");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Exit,
    EndOfInput,
}

/// Greet, then dispatch utterances until the exit intent or end of input.
pub async fn run_session(router: &CommandRouter, source: &mut dyn UtteranceSource) -> SessionEnd {
    router.speak(greeting_for(Local::now().hour())).await;

    while let Some(utterance) = source.listen().await {
        let utterance = utterance.trim().to_lowercase();
        if utterance.is_empty() {
            debug!("Nothing recognised, listening again");
            continue;
        }

        info!(utterance = %utterance, "Utterance received");
        if router.dispatch(&utterance).await == Outcome::Exit {
            return SessionEnd::Exit;
        }
    }

    SessionEnd::EndOfInput
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_boundaries() {
        assert_eq!(greeting_for(0), "Good Morning sir!");
        assert_eq!(greeting_for(11), "Good Morning sir!");
        assert_eq!(greeting_for(12), "Good Afternoon sir!");
        assert_eq!(greeting_for(17), "Good Afternoon sir!");
        assert_eq!(greeting_for(18), "Good Evening sir!");
        assert_eq!(greeting_for(23), "Good Evening sir!");
    }

    #[tokio::test]
    async fn line_source_yields_lines_then_none() {
        let mut source = LineSource::new(&b"open youtube\n\ngoodbye\n"[..]);
        assert_eq!(source.listen().await.as_deref(), Some("open youtube"));
        assert_eq!(source.listen().await.as_deref(), Some(""));
        assert_eq!(source.listen().await.as_deref(), Some("goodbye"));
        assert_eq!(source.listen().await, None);
    }
}
