mod elf;
mod error;
mod fit;
mod payload;

pub use elf::{read_image, FirmwareImage, LoadSegment};
pub use error::Error;
pub use fit::FitSource;
pub use payload::{payload_name, write_payloads};
