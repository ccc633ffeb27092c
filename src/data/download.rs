//! Fetching TU benchmark archives into the local cache

use std::fs::{self, File};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use tracing::info;
use zip::ZipArchive;

use crate::{HgnnError, Result};

/// Where the TU Dortmund collection publishes `NAME.zip`
pub const TU_BASE_URL: &str = "https://www.chrsmrrs.com/graphkerneldatasets";

/// Upper bound on an archive download; MUTAG is well under 1 MiB
const MAX_ARCHIVE_BYTES: u64 = 512 * 1024 * 1024;

/// Download `NAME.zip` from `base_url` and unpack it into `<cache_dir>/NAME/raw`.
///
/// Returns the directory holding the extracted files.
pub fn download_tu(name: &str, cache_dir: &Path, base_url: &str) -> Result<PathBuf> {
    let url = format!("{}/{}.zip", base_url.trim_end_matches('/'), name);
    info!(%url, "Downloading dataset");

    let response = ureq::get(&url)
        .call()
        .map_err(|e| HgnnError::Download(format!("GET {}: {}", url, e)))?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_ARCHIVE_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| HgnnError::Download(format!("reading {}: {}", url, e)))?;

    let raw = cache_dir.join(name).join("raw");
    let extracted = unpack_archive(&bytes, &raw)?;
    info!(files = extracted, dir = %raw.display(), "Unpacked dataset");
    Ok(raw)
}

/// Extract every file of a zip archive into `dest`, dropping its folder prefix.
///
/// TU archives wrap their files in a `NAME/` folder; flattening puts them
/// where the loader looks. Entries escaping the archive root are skipped.
pub fn unpack_archive(bytes: &[u8], dest: &Path) -> Result<usize> {
    let zip_err = |e: zip::result::ZipError| HgnnError::Download(format!("bad archive: {}", e));
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(zip_err)?;
    fs::create_dir_all(dest)?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(zip_err)?;
        if entry.is_dir() {
            continue;
        }
        let file_name = match entry.enclosed_name().and_then(|p| p.file_name()) {
            Some(f) => f.to_owned(),
            None => continue,
        };
        let mut out = File::create(dest.join(file_name))?;
        io::copy(&mut entry, &mut out)?;
        extracted += 1;
    }

    if extracted == 0 {
        return Err(HgnnError::Download("archive contains no files".to_string()));
    }
    Ok(extracted)
}
