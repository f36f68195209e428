//! Built-in `help` command.

use crate::sink::{self, Close, Open, write_frame};

use super::command::help_lines;

/// Publish the help listing as one sink session.
///
/// Opens `sink`, writes the header and one frame per command in table
/// order, then closes it. A failure at any step aborts the session; the
/// stream is dropped without being closed.
pub fn publish<S: Open>(sink: &mut S) -> Result<(), sink::Error> {
    trace!("publishing help");
    let mut stream = sink.open()?;
    let mut frames = 0usize;

    for line in help_lines() {
        write_frame(&mut stream, &line)?;
        frames += 1;
    }

    stream.close()?;
    debug!("published {} help frames", frames);
    Ok(())
}
