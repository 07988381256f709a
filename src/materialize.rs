use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::error::DownloadError;

/// Persists the payload under `final_path`. The bytes go to a scratch
/// `.part` file first and are renamed into place, so the final path either
/// holds the full payload or nothing. The scratch file is removed on any
/// failure before the error propagates.
pub async fn save(payload: &[u8], final_path: &Path) -> Result<(), DownloadError> {
    let part_path = part_path_for(final_path);
    match write_and_rename(payload, &part_path, final_path).await {
        Ok(()) => Ok(()),
        Err(err) => {
            let _ = fs::remove_file(&part_path).await;
            Err(err)
        }
    }
}

async fn write_and_rename(
    payload: &[u8],
    part_path: &Path,
    final_path: &Path,
) -> Result<(), DownloadError> {
    let mut file = File::create(part_path)
        .await
        .map_err(DownloadError::MaterializeFailed)?;
    file.write_all(payload)
        .await
        .map_err(DownloadError::MaterializeFailed)?;
    file.flush()
        .await
        .map_err(DownloadError::MaterializeFailed)?;
    drop(file);

    fs::rename(part_path, final_path)
        .await
        .map_err(DownloadError::MaterializeFailed)
}

fn part_path_for(final_path: &Path) -> PathBuf {
    let mut part_path = final_path.to_path_buf();
    if let Some(extension) = final_path.extension() {
        let mut ext = extension.to_os_string();
        ext.push(".part");
        part_path.set_extension(ext);
    } else {
        part_path.set_extension("part");
    }
    part_path
}
