use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use super::errors::DownloadError;

/// Location of a remote file inside the cache: `<cache>/<task>/<md5 of url>-<file name>`.
pub(crate) fn cache_path<P: AsRef<Path>>(cache_dir: P, task: &str, url: &str) -> PathBuf {
    let digest = md5::compute(url.as_bytes());
    let name = url.rsplit('/').next().unwrap_or("data");
    let name = name.strip_suffix(".gz").unwrap_or(name);
    cache_dir
        .as_ref()
        .join(task)
        .join(format!("{:x}-{name}", digest))
}

/// Read-through cache: returns the cached copy of `url`, downloading it first if needed.
pub(crate) fn fetch_cached<P: AsRef<Path>>(
    cache_dir: P,
    task: &str,
    url: &str,
    md5: Option<&str>,
) -> Result<PathBuf, DownloadError> {
    let path = cache_path(cache_dir, task, url);
    if path.exists() {
        log::debug!("Using cached {} for {url}", path.display());
        return Ok(path);
    }

    let root = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(root)?;

    let compressed = download(url)?;

    if let Some(md5) = md5 {
        log::info!("Verifying hash is {md5}");
        let digest = format!("{:x}", md5::compute(&compressed));
        if digest != md5 {
            return Err(DownloadError::Md5Mismatch {
                url: url.to_owned(),
                expected: md5.to_owned(),
                found: digest,
            });
        }
    }

    let payload = if url.ends_with(".gz") {
        log::info!("Deflating {} bytes", compressed.len());
        let mut uncompressed = Vec::new();
        let mut decoder = flate2::read::GzDecoder::new(&compressed[..]);
        decoder.read_to_end(&mut uncompressed)?;
        uncompressed
    } else {
        compressed
    };

    // An interrupted write must not leave a cache hit behind.
    let tmp = path.with_extension("partial");
    log::info!("Writing {} bytes to {}", payload.len(), path.display());
    {
        let mut o = BufWriter::new(File::create(&tmp)?);
        o.write_all(&payload)?;
        o.flush()?;
    }
    std::fs::rename(&tmp, &path)?;
    Ok(path)
}

#[cfg(feature = "download")]
fn download(url: &str) -> Result<Vec<u8>, DownloadError> {
    use curl::easy::Easy;

    let mut body = Vec::new();
    let mut easy = Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.fail_on_error(true)?;
    easy.progress(true)?;

    log::info!("Downloading {url}");
    {
        let mut dl = easy.transfer();
        let pb = indicatif::ProgressBar::new(1);
        dl.progress_function(move |total_dl, cur_dl, _, _| {
            pb.set_length(total_dl as u64);
            pb.set_position(cur_dl as u64);
            true
        })?;
        dl.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        dl.perform()?;
    }
    Ok(body)
}

#[cfg(not(feature = "download"))]
fn download(url: &str) -> Result<Vec<u8>, DownloadError> {
    Err(DownloadError::Disabled {
        url: url.to_owned(),
    })
}
