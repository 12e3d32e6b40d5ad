use crate::conf::{Config, InputSource};
use crate::transform::MessageTransformer;
use anyhow::{Context, Result};
use std::io::{Read, Write};
use tracing::{info, warn};

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The input was empty; nothing was written.
    NoInput,
    Transformed,
}

/// Read the raw message bytes from the configured source.
///
/// `stdin` is only consulted for [`InputSource::Stdin`].
///
/// # Errors
/// Returns an error if the file or stream cannot be read.
pub fn read_input<R: Read>(source: &InputSource, mut stdin: R) -> Result<Vec<u8>> {
    match source {
        InputSource::File(path) => {
            let input = std::fs::read(path)
                .with_context(|| format!("Failed to read input file {}", path.display()))?;
            info!(
                event = "input_read",
                source = %source,
                "Reading input from file: {}",
                path.display()
            );
            Ok(input)
        }
        InputSource::Stdin => {
            info!(
                event = "input_waiting",
                source = %source,
                "Reading input from stdin. Enter JSON and press Ctrl+D (Unix) / Ctrl+Z Enter (Windows) to finish"
            );
            let mut input = Vec::new();
            stdin
                .read_to_end(&mut input)
                .context("Failed to read from stdin")?;
            Ok(input)
        }
    }
}

/// Read one message, transform it and write the original and transformed
/// forms to `stdout`.
///
/// # Errors
/// Returns an error if the input cannot be read, the transformer rejects it,
/// or the report cannot be written.
pub fn run<T, R, W>(config: &Config, transformer: &T, stdin: R, mut stdout: W) -> Result<Outcome>
where
    T: MessageTransformer + ?Sized,
    R: Read,
    W: Write,
{
    info!(
        event = "application_starting",
        input = %config.input,
        "Message transformer started"
    );

    let input = read_input(&config.input, stdin)?;

    if input.is_empty() {
        warn!(event = "no_input", "No input received, exiting");
        return Ok(Outcome::NoInput);
    }

    info!(
        event = "message_received",
        bytes = input.len(),
        content = %message_preview(&input),
        "Received message"
    );

    let output = transformer
        .transform(&input)
        .context("Failed to transform message")?;

    write_report(&mut stdout, &input, &output).context("Failed to write output")?;

    info!(
        event = "application_finished",
        bytes = output.len(),
        "Message transformer finished"
    );

    Ok(Outcome::Transformed)
}

fn write_report<W: Write>(out: &mut W, original: &[u8], transformed: &[u8]) -> std::io::Result<()> {
    writeln!(out, "\n--- Original Message ---")?;
    out.write_all(original)?;
    writeln!(out)?;
    writeln!(out, "\n--- Transformed Message ---")?;
    out.write_all(transformed)?;
    writeln!(out)?;
    out.flush()
}

/// Printable preview of a message for logs: UTF-8 text truncated to a fixed
/// number of characters, or a size marker for binary data.
pub fn message_preview(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(s) => match s.char_indices().nth(PREVIEW_CHARS) {
            Some((cut, _)) => format!("{}...", &s[..cut]),
            None => s.to_string(),
        },
        Err(_) => format!("<binary data, {} bytes>", data.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_previewed_verbatim() {
        assert_eq!(message_preview(br#"{"id":"a"}"#), r#"{"id":"a"}"#);
    }

    #[test]
    fn long_text_is_truncated_on_char_boundary() {
        let text = "é".repeat(PREVIEW_CHARS + 5);
        let preview = message_preview(text.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn exactly_limit_is_not_truncated() {
        let text = "a".repeat(PREVIEW_CHARS);
        assert_eq!(message_preview(text.as_bytes()), text);
    }

    #[test]
    fn binary_data_reports_size() {
        assert_eq!(message_preview(&[0xff, 0xfe, 0x00]), "<binary data, 3 bytes>");
    }

    #[test]
    fn stdin_source_reads_the_stream() {
        let input = read_input(&InputSource::Stdin, &b"{\"id\":\"x\"}"[..]).unwrap();
        assert_eq!(input, b"{\"id\":\"x\"}");
    }

    #[test]
    fn report_layout() {
        let mut out = Vec::new();
        write_report(&mut out, b"in", b"out").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\n--- Original Message ---\nin\n\n--- Transformed Message ---\nout\n"
        );
    }
}
