//! Reading files out of tar archives returned by the container runtime

use std::io::{self, Read};
use tar::{Archive, EntryType};
use thiserror::Error;

/// Largest file accepted out of an archive
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive contains no file entries")]
    NoEntries,

    #[error("failed to read archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Returns the content of the first regular file in a tar stream.
///
/// Directory entries are skipped and anything after the first file is never read.
/// Files over [`MAX_FILE_SIZE`] and bodies shorter than their header claims are
/// reported as I/O errors.
pub fn first_file<R: Read>(reader: R) -> Result<Vec<u8>, ArchiveError> {
    let mut archive = Archive::new(reader);

    for entry in archive.entries()? {
        let entry = entry?;
        if entry.header().entry_type() == EntryType::Directory {
            continue;
        }

        let size = entry.size();
        if size > MAX_FILE_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file entry of {} bytes exceeds {} bytes", size, MAX_FILE_SIZE),
            )
            .into());
        }

        let mut buf = Vec::new();
        entry.take(size).read_to_end(&mut buf)?;
        if (buf.len() as u64) < size {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file entry truncated at {} of {} bytes", buf.len(), size),
            )
            .into());
        }
        return Ok(buf);
    }

    Err(ArchiveError::NoEntries)
}
