use std::{
    io::Write,
    path::{Path, PathBuf},
};

use md5::{Digest, Md5};
use tempfile::Builder;

use crate::{error::PagecountError, month::MonthPartition, remote::RemoteArchive};

/// How a downloaded payload is checked before it is committed to disk.
#[derive(Clone, Copy, Debug)]
pub enum Verification<'a> {
    /// Lowercase hex MD5 digest from the month's manifest.
    Expected(&'a str),
    /// The month published no checksums and the caller opted in to taking files anyway.
    Unverified,
}

pub fn md5_hex(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

/// Download `file_name`, check it, and only then place it at `target_dir/file_name`.
///
/// Nothing is left at the final path on a network or integrity failure.
pub fn download_and_verify<RA: RemoteArchive>(
    remote: &RA,
    month: MonthPartition,
    file_name: &str,
    target_dir: &Path,
    verification: Verification,
) -> Result<PathBuf, PagecountError> {
    let data = remote.retrieve_remote_file(month, file_name)?;

    match verification {
        Verification::Expected(expected) => {
            let actual = md5_hex(&data);
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(PagecountError::Integrity {
                    file: file_name.to_owned(),
                    expected: expected.to_owned(),
                    actual,
                });
            }
        }
        Verification::Unverified => {
            log::warn!("No checksum available, saving {} unverified", file_name);
        }
    }

    write_atomically(target_dir, file_name, &data)
}

/// Write to a hidden temporary in the same directory, then rename over the final name.
pub fn write_atomically(dir: &Path, file_name: &str, data: &[u8]) -> Result<PathBuf, PagecountError> {
    let final_path = dir.join(file_name);

    let mut tmp = Builder::new()
        .prefix(".")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|err| PagecountError::io(dir, err))?;

    tmp.write_all(data)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|err| PagecountError::io(tmp.path(), err))?;

    tmp.persist(&final_path)
        .map_err(|err| PagecountError::io(&final_path, err.error))?;

    log::debug!("Saved {:?}", final_path);
    Ok(final_path)
}
