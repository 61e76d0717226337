//! Where identifiers come from.
//!
//! A source blocks until a tag is presented. Its errors say whether the loop can keep waiting
//! (`is_fatal() == false`) or must stop.

use crate::identifier::{Identifier, IdentifierError};
use std::{
    collections::VecDeque,
    fs::File,
    io::{self, BufRead, BufReader},
    mem,
    path::Path,
    thread,
    time::Duration,
};

#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("identifier source unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("failed to read identifier: {0}")]
    ReadFailed(#[source] io::Error),
    #[error("malformed identifier: {0}")]
    Malformed(#[from] IdentifierError),
    #[error("identifier of {len} bytes is not a standard tag length")]
    NonStandardLength { len: usize },
}

impl AcquisitionError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, AcquisitionError::Unavailable { .. })
    }
}

pub trait IdentifierSource {
    /// Blocks until the next identifier is available. `Ok(None)` means the source has closed
    /// and will produce nothing more.
    fn next_identifier(&mut self) -> Result<Option<Identifier>, AcquisitionError>;

    fn describe(&self) -> String;
}

impl<I: IdentifierSource + ?Sized> IdentifierSource for Box<I> {
    fn next_identifier(&mut self) -> Result<Option<Identifier>, AcquisitionError> {
        (**self).next_identifier()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// A fixed list of identifiers, presented in order.
#[derive(Debug, Clone, Default)]
pub struct ListSource {
    identifiers: VecDeque<Identifier>,
}

impl ListSource {
    pub fn new(identifiers: impl IntoIterator<Item = Identifier>) -> Self {
        Self {
            identifiers: identifiers.into_iter().collect(),
        }
    }
}

impl IdentifierSource for ListSource {
    fn next_identifier(&mut self) -> Result<Option<Identifier>, AcquisitionError> {
        Ok(self.identifiers.pop_front())
    }

    fn describe(&self) -> String {
        format!("list of {} identifiers", self.identifiers.len())
    }
}

/// One hex identifier per line, as printed by a reader bridge or typed at a terminal. Blank
/// lines and lines starting with `#` are skipped.
pub struct LineSource<R> {
    reader: R,
    name: String,
    line: String,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            line: String::new(),
        }
    }
}

impl LineSource<BufReader<File>> {
    /// Opens a file, fifo or character device.
    pub fn open(path: &Path) -> Result<Self, AcquisitionError> {
        let file = File::open(path).map_err(|err| AcquisitionError::Unavailable {
            reason: format!("{}: {}", path.display(), err),
        })?;
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl LineSource<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), "stdin")
    }
}

/// How long a non-blocking reader with nothing to offer is left alone before it is read again.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Interrupted and would-block reads never get here; they mean "no identifier yet".
fn classify_read_error(err: io::Error) -> AcquisitionError {
    match err.kind() {
        io::ErrorKind::InvalidData => AcquisitionError::ReadFailed(err),
        _ => AcquisitionError::Unavailable {
            reason: err.to_string(),
        },
    }
}

impl<R: BufRead> IdentifierSource for LineSource<R> {
    fn next_identifier(&mut self) -> Result<Option<Identifier>, AcquisitionError> {
        loop {
            // a partial line survives an interrupted or would-block read
            let read = match self.reader.read_line(&mut self.line) {
                Ok(read) => read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(POLL_INTERVAL);
                    continue;
                }
                Err(err) => return Err(classify_read_error(err)),
            };
            if read == 0 && self.line.is_empty() {
                return Ok(None);
            }
            let line = mem::take(&mut self.line);
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            return Ok(Some(line.parse()?));
        }
    }

    fn describe(&self) -> String {
        format!("lines from {}", self.name)
    }
}
