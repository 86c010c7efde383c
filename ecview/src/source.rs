//! Where samples come from. The loop polls; a source only reports its current state.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use crate::error::ReadError;
use crate::sample::Sample;

/// Default file the agent rewrites once per step.
pub const DEFAULT_SOURCE_PATH: &str = "/tmp/libec_daemon_demo";

/// Returns the latest sample on demand. Implementations must not block for
/// long: the loop runs on a single thread and input handling waits on it.
pub trait SampleSource {
    fn read(&mut self) -> Result<Sample, ReadError>;
}

impl<F> SampleSource for F
where
    F: FnMut() -> Result<Sample, ReadError>,
{
    fn read(&mut self) -> Result<Sample, ReadError> {
        self()
    }
}

/// Reads the first line of a file on every poll. Anything after it is never read.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SampleSource for FileSource {
    fn read(&mut self) -> Result<Sample, ReadError> {
        let mut line = String::new();
        BufReader::new(File::open(&self.path)?).read_line(&mut line)?;
        line.parse()
    }
}
