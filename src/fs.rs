//! Moving the edited instruction list into place.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
#[error("failed to {step} while moving {} to {}: {source}", src.display(), dst.display())]
pub struct ReplaceError {
    pub step: ReplaceStep,
    pub src: PathBuf,
    pub dst: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl ReplaceError {
    fn new(step: ReplaceStep, src: &Path, dst: &Path, source: std::io::Error) -> Self {
        Self {
            step,
            src: src.to_owned(),
            dst: dst.to_owned(),
            source,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReplaceStep {
    Rename,
    ReadMetadata,
    Copy,
    Sync,
    SetPermissions,
    RemoveSource,
}

impl std::fmt::Display for ReplaceStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let step = match self {
            Self::Rename => "rename",
            Self::ReadMetadata => "read metadata",
            Self::Copy => "copy contents",
            Self::Sync => "flush contents",
            Self::SetPermissions => "set permissions",
            Self::RemoveSource => "remove source",
        };
        f.write_str(step)
    }
}

/// Move `src` over `dst`, copying when they live on different devices.
pub fn replace(src: &Path, dst: &Path) -> Result<(), ReplaceError> {
    replace_with(
        |src, dst| std::fs::rename(src, dst),
        is_cross_device,
        |src| std::fs::remove_file(src),
        src,
        dst,
    )
}

/// [`replace`] with the filesystem calls supplied by the caller.
///
/// `remove` only runs on the copy path, after `dst` holds the new content.
pub fn replace_with(
    rename: impl FnOnce(&Path, &Path) -> std::io::Result<()>,
    is_cross_device: impl FnOnce(&std::io::Error) -> bool,
    remove: impl FnOnce(&Path) -> std::io::Result<()>,
    src: &Path,
    dst: &Path,
) -> Result<(), ReplaceError> {
    let err = match rename(src, dst) {
        Ok(()) => {
            log::trace!("Renamed {} to {}", src.display(), dst.display());
            return Ok(());
        }
        Err(err) => err,
    };
    if !is_cross_device(&err) {
        return Err(ReplaceError::new(ReplaceStep::Rename, src, dst, err));
    }

    log::debug!(
        "{} and {} are on different devices, copying",
        src.display(),
        dst.display()
    );
    let fail = |step: ReplaceStep| move |err: std::io::Error| ReplaceError::new(step, src, dst, err);

    let metadata = std::fs::metadata(src).map_err(fail(ReplaceStep::ReadMetadata))?;

    let mut reader = std::fs::File::open(src).map_err(fail(ReplaceStep::Copy))?;
    let mut writer = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dst)
        .map_err(fail(ReplaceStep::Copy))?;
    std::io::copy(&mut reader, &mut writer).map_err(fail(ReplaceStep::Copy))?;
    writer.sync_all().map_err(fail(ReplaceStep::Sync))?;
    drop(writer);

    std::fs::set_permissions(dst, metadata.permissions())
        .map_err(fail(ReplaceStep::SetPermissions))?;
    remove(src).map_err(fail(ReplaceStep::RemoveSource))?;

    Ok(())
}

pub fn is_cross_device(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::CrossesDevices
}
