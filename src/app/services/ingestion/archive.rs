//! Extraction of telemetry logs from ZIP archives

use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use zip::ZipArchive;
use zip::result::ZipResult;

use super::upload::FileKind;
use crate::error::{ObdError, Result};

/// A telemetry log member of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    pub index: usize,

    /// Full member name inside the archive
    pub name: String,
}

/// Open a ZIP archive on disk
pub fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    Ok(ZipArchive::new(File::open(path)?)?)
}

/// Members that are telemetry logs, in central directory order
pub fn telemetry_members<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> ZipResult<Vec<ArchiveMember>> {
    let mut members = Vec::new();
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if !entry.is_dir() && FileKind::from_name(entry.name()) == Some(FileKind::TelemetryLog) {
            members.push(ArchiveMember {
                index,
                name: entry.name().to_string(),
            });
        }
    }
    Ok(members)
}

/// Extract one member below `scratch`, returning the extracted file path
///
/// Member names that would escape the scratch directory are refused.
pub fn extract_member<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    member: &ArchiveMember,
    scratch: &Path,
) -> Result<PathBuf> {
    let mut entry = archive.by_index(member.index)?;
    let relative = entry.enclosed_name().ok_or_else(|| {
        ObdError::invalid_request(format!("unsafe member path '{}'", member.name))
    })?;

    let target = scratch.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut output = File::create(&target)?;
    io::copy(&mut entry, &mut output)?;
    Ok(target)
}
