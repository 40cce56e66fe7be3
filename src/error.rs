use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("input elf not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("elf image is not valid: {0}")]
    MalformedBinary(&'static str),
    #[error("expected exactly one loadable segment, found {0}")]
    UnexpectedSegmentCount(usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
