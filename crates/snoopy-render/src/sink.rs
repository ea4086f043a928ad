//! Output sinks for rendered text.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use snoopy_core::SnoopError;

/// Where rendered text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    /// Plain text snapshot, overwritten if it exists.
    File(PathBuf),
}

impl Sink {
    pub fn write(&self, text: &str) -> Result<(), SnoopError> {
        match self {
            Sink::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(text.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|source| SnoopError::Io {
                        path: PathBuf::from("<stdout>"),
                        source,
                    })
            }
            Sink::File(path) => {
                fs::write(path, text).map_err(|source| SnoopError::Io {
                    path: path.clone(),
                    source,
                })?;
                debug!(path = %path.display(), bytes = text.len(), "wrote snapshot");
                Ok(())
            }
        }
    }
}

/// Write `text` to `sink`.
pub fn write_to(sink: &Sink, text: &str) -> Result<(), SnoopError> {
    sink.write(text)
}
