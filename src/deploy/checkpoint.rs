// ABOUTME: Pause point between cloning and building.
// ABOUTME: Lets an operator edit configuration in freshly cloned repositories.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stderr};
use tokio::sync::Mutex;

/// Blocks the run until an external party confirms it may continue.
#[async_trait]
pub trait Checkpoint: Send + Sync {
    async fn wait(&self, prompt: &str);
}

/// Continues immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct Proceed;

#[async_trait]
impl Checkpoint for Proceed {
    async fn wait(&self, prompt: &str) {
        tracing::debug!("Skipping checkpoint: {}", prompt);
    }
}

/// Asks the operator to press Enter before continuing.
///
/// The prompt goes to `output` so it never mixes with machine-readable
/// records on stdout.
pub struct Prompt<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl Prompt<BufReader<Stdin>, Stderr> {
    /// Read confirmations from stdin and prompt on stderr.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input.into_inner(), self.output.into_inner())
    }
}

#[async_trait]
impl<R, W> Checkpoint for Prompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn wait(&self, prompt: &str) {
        {
            let mut output = self.output.lock().await;
            let line = format!("{prompt} (press Enter to continue)\n");
            if let Err(e) = output.write_all(line.as_bytes()).await {
                tracing::warn!("Could not show confirmation prompt: {}", e);
            }
            let _ = output.flush().await;
        }

        let mut line = String::new();
        if let Err(e) = self.input.lock().await.read_line(&mut line).await {
            tracing::warn!("Could not read confirmation, continuing: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prompt_writes_to_its_output_and_waits_for_a_line() {
        let prompt = Prompt::new(&b"\nleftover\n"[..], Vec::new());

        prompt.wait("Edit configs").await;

        let (mut rest, written) = prompt.into_parts();
        assert_eq!(
            String::from_utf8(written).unwrap(),
            "Edit configs (press Enter to continue)\n"
        );
        let mut remaining = String::new();
        rest.read_line(&mut remaining).await.unwrap();
        assert_eq!(remaining, "leftover\n");
    }

    #[tokio::test]
    async fn closed_input_does_not_block() {
        let prompt = Prompt::new(&b""[..], Vec::new());

        prompt.wait("Edit configs").await;

        let (_, written) = prompt.into_parts();
        assert!(!written.is_empty());
    }

    #[tokio::test]
    async fn stdio_prompt_uses_stderr() {
        fn output_type<R, W>(_: &Prompt<R, W>) -> &'static str {
            std::any::type_name::<W>()
        }
        let prompt = Prompt::stdio();
        assert_eq!(output_type(&prompt), std::any::type_name::<Stderr>());
    }
}
