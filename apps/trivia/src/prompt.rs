//! Terminal implementations of the controller's notifier and confirmer.

use async_trait::async_trait;
use client_core::{Confirmer, Notifier};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::warn;

pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}

pub struct StdinConfirmer {
    assume_yes: bool,
}

impl StdinConfirmer {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Confirmer for StdinConfirmer {
    async fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        ask(
            &mut tokio::io::stderr(),
            BufReader::new(tokio::io::stdin()),
            prompt,
        )
        .await
    }
}

/// Writes the prompt and reads one answer line. A prompt that may not have
/// reached the terminal counts as a "no".
async fn ask<W, R>(out: &mut W, mut input: R, prompt: &str) -> bool
where
    W: AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
{
    if let Err(error) = out.write_all(format!("{prompt} [y/N] ").as_bytes()).await {
        warn!(%error, "failed to write confirmation prompt");
        return false;
    }
    if let Err(error) = out.flush().await {
        warn!(%error, "failed to flush confirmation prompt");
        return false;
    }

    let mut line = String::new();
    match input.read_line(&mut line).await {
        Ok(_) => parse_answer(&line),
        Err(error) => {
            warn!(%error, "failed to read confirmation answer");
            false
        }
    }
}

fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io,
        pin::Pin,
        task::{Context, Poll},
    };

    struct BrokenFlush(Vec<u8>);

    impl AsyncWrite for BrokenFlush {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            self.0.extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed")))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(parse_answer("y\n"));
        assert!(parse_answer("  YES \r\n"));
        assert!(!parse_answer("\n"));
        assert!(!parse_answer("no"));
        assert!(!parse_answer("yep"));
    }

    #[tokio::test]
    async fn assume_yes_skips_the_prompt() {
        assert!(StdinConfirmer::new(true).confirm("delete?").await);
    }

    #[tokio::test]
    async fn prompt_is_written_and_answer_read() {
        let mut out = Vec::new();
        assert!(ask(&mut out, &b"yes\n"[..], "delete the question?").await);
        assert_eq!(out, b"delete the question? [y/N] ");

        let mut out = Vec::new();
        assert!(!ask(&mut out, &b"\n"[..], "delete the question?").await);
    }

    #[tokio::test]
    async fn failed_flush_declines() {
        let mut out = BrokenFlush(Vec::new());
        assert!(!ask(&mut out, &b"y\n"[..], "delete the question?").await);
        assert_eq!(out.0, b"delete the question? [y/N] ");
    }
}
