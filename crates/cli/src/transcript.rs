//! Streams agent output to a writer as it arrives.

use crate::error::Result;
use crate::format::{FormatterState, format_message};
use futures::{Stream, StreamExt};
use runtime::Chunk;
use std::io::Write;

/// Write every chunk of `chunks` to `out`, flushing after each, then a final
/// newline.
///
/// A stream error stops the transcript; whatever was written before it stays
/// written.
pub async fn print_stream<S, W>(chunks: S, out: &mut W) -> Result<()>
where
    S: Stream<Item = runtime::Result<Chunk>>,
    W: Write,
{
    let mut state = FormatterState::new();
    let mut chunks = std::pin::pin!(chunks);

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        write!(out, "{}", format_message(&chunk, &mut state))?;
        out.flush()?;
    }

    writeln!(out)?;
    out.flush()?;
    Ok(())
}
