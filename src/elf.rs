use std::fs;
use std::io;
use std::path::Path;

use xmas_elf::program::{SegmentData, Type};
use xmas_elf::ElfFile;

use crate::Error;

/// Read a whole input binary into memory.
pub fn read_image(path: &Path) -> Result<Vec<u8>, Error> {
    match fs::read(path) {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(Error::InputNotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

pub struct FirmwareImage<'a> {
    elf: ElfFile<'a>,
}

impl<'a> FirmwareImage<'a> {
    pub fn from_data(data: &'a [u8]) -> Result<Self, Error> {
        let elf = ElfFile::new(data).map_err(Error::MalformedBinary)?;
        Ok(FirmwareImage { elf })
    }

    /// PT_LOAD segments in program header table order.
    pub fn segments(&self) -> Result<Vec<LoadSegment<'a>>, Error> {
        let mut segments = Vec::new();
        for header in self.elf.program_iter() {
            if header.get_type() != Ok(Type::Load) {
                continue;
            }
            log::debug!(
                "segment paddr: {:#010x} filesz: {:#x} memsz: {:#x} offset: {:#x}",
                header.physical_addr(),
                header.file_size(),
                header.mem_size(),
                header.offset()
            );
            let data = match header.get_data(&self.elf) {
                Ok(SegmentData::Undefined(data)) => data,
                Ok(_) => return Err(Error::MalformedBinary("unsupported segment data")),
                Err(e) => return Err(Error::MalformedBinary(e)),
            };
            segments.push(LoadSegment {
                addr: header.physical_addr(),
                size: header.file_size(),
                data,
            });
        }
        Ok(segments)
    }

    /// Load address of a single-segment image such as u-boot proper.
    pub fn load_addr(&self) -> Result<u64, Error> {
        let segments = self.segments()?;
        match segments.as_slice() {
            [segment] => Ok(segment.addr),
            _ => Err(Error::UnexpectedSegmentCount(segments.len())),
        }
    }
}

/// A loadable segment from the source elf
#[derive(Debug)]
pub struct LoadSegment<'a> {
    pub addr: u64,
    pub size: u64,
    pub data: &'a [u8],
}
