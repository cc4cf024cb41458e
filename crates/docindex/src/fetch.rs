use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::source::Source;

/// Read the text of a script, downloading (and caching) remote ones.
pub fn load_source(source: &Source, use_cache: bool) -> Result<String> {
    match source {
        Source::Path(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        Source::Url(url) => fetch_script(url, use_cache),
    }
}

fn fetch_script(url: &str, use_cache: bool) -> Result<String> {
    let data = match get_cache_dir() {
        Ok(cache_dir) if use_cache => match load_from_cache(&cache_dir, url) {
            Ok(data) => data,
            Err(_) => download_and_cache(&cache_dir, url)?,
        },
        _ => download_script(url)?,
    };

    String::from_utf8(data).context("Script is not valid UTF-8")
}

/// Get the cache directory path for downloaded scripts
fn get_cache_dir() -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from("", "", "docindex").context("Failed to determine cache directory")?;
    Ok(proj_dirs.cache_dir().to_path_buf())
}

/// Get the cache file path for a URL
fn get_cache_path(cache_dir: &Path, url: &str) -> PathBuf {
    cache_dir.join(format!("{}.zst", cache_key(url)))
}

/// Longest readable part of a cache key, well below the usual 255-byte file name limit.
const MAX_KEY_PREFIX: usize = 120;

/// Flatten a URL into a file name: `https://docs.rs/a/b.js` -> `docs.rs_a_b.js-<hash>`.
/// The hash of the full URL keeps keys apart that flatten to the same text.
fn cache_key(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let flat: String = without_scheme
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_KEY_PREFIX)
        .collect();
    format!("{flat}-{:016x}", fnv1a(url.as_bytes()))
}

/// 64-bit FNV-1a. Stable across builds, unlike `DefaultHasher`.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Load a cached script and decompress it
fn load_from_cache(cache_dir: &Path, url: &str) -> Result<Vec<u8>> {
    let cache_path = get_cache_path(cache_dir, url);
    let compressed = fs::read(&cache_path).context("Cache miss")?;
    tracing::debug!(path = %cache_path.display(), "cache hit");
    zstd::decode_all(&compressed[..]).context("Failed to decompress cached script")
}

/// Compress and save a script to the cache
fn save_to_cache(cache_dir: &Path, url: &str, data: &[u8]) -> Result<()> {
    let cache_path = get_cache_path(cache_dir, url);
    fs::create_dir_all(cache_dir)?;

    let compressed = zstd::encode_all(data, 0).context("Failed to compress script")?;
    fs::write(&cache_path, compressed).context("Failed to save to cache")?;
    tracing::info!(path = %cache_path.display(), "saved to cache");
    Ok(())
}

fn download_script(url: &str) -> Result<Vec<u8>> {
    tracing::info!(%url, "fetching script");

    let mut response = ureq::get(url).call()?;
    let status = response.status();

    if status != 200 {
        anyhow::bail!("Failed to fetch {} (status: {})", url, status);
    }

    let mut data = Vec::new();
    response.body_mut().as_reader().read_to_end(&mut data)?;
    tracing::info!(bytes = data.len(), "downloaded script");

    Ok(data)
}

fn download_and_cache(cache_dir: &Path, url: &str) -> Result<Vec<u8>> {
    let data = download_script(url)?;

    // Caching is best-effort
    if let Err(e) = save_to_cache(cache_dir, url, &data) {
        tracing::warn!("Failed to cache script: {}", e);
    }

    Ok(data)
}

/// Clear the entire cache directory. Returns false when there was nothing to clear.
pub fn clear_cache() -> Result<bool> {
    let cache_dir = get_cache_dir()?;

    if cache_dir.exists() {
        fs::remove_dir_all(&cache_dir).context("Failed to clear cache")?;
        tracing::info!(path = %cache_dir.display(), "cache cleared");
        Ok(true)
    } else {
        Ok(false)
    }
}
