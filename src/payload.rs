use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{Error, LoadSegment};

/// File name a segment's raw bytes are stored under, referenced from the
/// image tree by /incbin/.
pub fn payload_name(addr: u64) -> String {
    format!("bl31_0x{:08x}.bin", addr)
}

/// Write each segment's bytes next to the descriptor for the packager to
/// pick up. Existing files are overwritten.
pub fn write_payloads(dir: &Path, segments: &[LoadSegment]) -> Result<Vec<PathBuf>, Error> {
    let mut written = Vec::with_capacity(segments.len());
    for segment in segments {
        let path = dir.join(payload_name(segment.addr));
        let mut file = File::create(&path)?;
        file.write_all(segment.data)?;
        log::info!("Wrote {} ({} bytes)", path.display(), segment.size);
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn segment(addr: u64, data: &'static [u8]) -> LoadSegment<'static> {
        LoadSegment {
            addr,
            size: data.len() as u64,
            data,
        }
    }

    #[test]
    fn payload_names_are_deterministic() {
        assert_eq!(payload_name(0x0004_0000), "bl31_0x00040000.bin");
        assert_eq!(payload_name(0x0004_0000), payload_name(0x0004_0000));
        assert_ne!(payload_name(0x0004_0000), payload_name(0x0006_0000));
    }

    #[test]
    fn writes_one_file_per_segment() {
        let dir = tempfile::tempdir().unwrap();
        let segments = [segment(0x0004_0000, b"first"), segment(0x0006_0000, b"second")];
        let written = write_payloads(dir.path(), &segments).unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("bl31_0x00040000.bin"),
                dir.path().join("bl31_0x00060000.bin"),
            ]
        );
        assert_eq!(fs::read(&written[0]).unwrap(), b"first");
        assert_eq!(fs::read(&written[1]).unwrap(), b"second");
    }

    #[test]
    fn overwrites_existing_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bl31_0x00040000.bin");
        fs::write(&path, b"stale").unwrap();
        write_payloads(dir.path(), &[segment(0x0004_0000, b"fresh")]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"fresh");
    }
}
