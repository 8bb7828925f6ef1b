//! Content addressed asset downloads.
//!
//! Every asset maps to a stable key that is also the stem of its file on
//! disk, so listing a directory tells which assets are already there.
//! Avatars are keyed `{userID}_{avatarHash}`, emojis `{emojiID}` and
//! anything else by the first 32 hex chars of the SHA-512 of its url.

use super::progress::Progress;
use crate::errors::{Error, Result};

use db::structs::{EmojiRecord, UserRecord, CDN_URL};
use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use reqwest::StatusCode;
use serenity::async_trait;
use sha2::{Digest, Sha512};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Pause after every request that actually hit the network.
pub const DOWNLOAD_DELAY: Duration = Duration::from_millis(250);
/// Upper bound on one asset request, a stalled response fails that asset.
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

const URL_KEY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub key: String,
    pub file_name: String,
    pub url: String,
}

impl Asset {
    fn new(key: String, extension: Option<&str>, url: String) -> Asset {
        let file_name = match extension {
            Some(ext) => format!("{key}.{ext}"),
            None => key.clone(),
        };
        Asset {
            key,
            file_name,
            url,
        }
    }

    pub fn avatar(user: &UserRecord) -> Option<Asset> {
        let key = user.avatar_key()?;
        let url = user.avatar_url()?;
        let ext = extension_of(&url).ok().flatten();
        Some(Asset::new(key, ext.as_deref(), url))
    }

    pub fn emoji(emoji: &EmojiRecord) -> Asset {
        Asset::new(emoji.id.to_string(), Some(emoji.extension()), emoji.url())
    }

    pub fn attachment(url: &str) -> Result<Asset> {
        let ext = extension_of(url)?;
        Ok(Asset::new(url_key(url), ext.as_deref(), url.to_string()))
    }
}

pub fn url_key(url: &str) -> String {
    let digest = Sha512::digest(url.as_bytes());
    let mut key = hex::encode(digest);
    key.truncate(URL_KEY_LEN);
    key
}

/// Extension of the last path segment, ignoring query and fragment.
pub fn extension_of(url: &str) -> Result<Option<String>> {
    let parsed = Url::parse(url)?;
    let last = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    Ok(match last.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_lowercase()),
        _ => None,
    })
}

/// The canonical CDN location of an attachment, built from the
/// `{channelID}/{attachmentID}/{filename}` tail of any attachment url.
/// `None` when the url has no such tail or already is the canonical one.
pub fn fallback_url(url: &str) -> Option<String> {
    lazy_static! {
        static ref ATTACHMENT_PATH: Regex =
            Regex::new(r"/attachments/(\d+)/(\d+)/([^/?#]+)").unwrap();
    }
    let caps = ATTACHMENT_PATH.captures(url)?;
    let alternate = format!(
        "{CDN_URL}/attachments/{}/{}/{}",
        &caps[1], &caps[2], &caps[3]
    );
    if alternate == url {
        None
    } else {
        Some(alternate)
    }
}

/// Keys of every file already in `dir`. Taken once per batch, files that
/// show up later are only seen by the next batch.
pub async fn materialized_keys(dir: &Path) -> Result<HashSet<String>> {
    let mut keys = HashSet::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        // in-flight downloads are dot files, their key comes out empty
        let key = name.split('.').next().unwrap_or_default();
        if key.is_empty() {
            continue;
        }
        if entry.metadata().await?.len() == 0 {
            debug!("ignoring empty asset file {name}");
            continue;
        }
        keys.insert(key.to_string());
    }
    Ok(keys)
}

#[inline]
fn partial_name(file_name: &str) -> String {
    format!(".{file_name}.part")
}

#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Body of `url`. Non success statuses surface as `Error::HttpStatus`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<HttpFetcher> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status));
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadReport {
    pub total: usize,
    pub cached: usize,
    pub downloaded: usize,
    pub failed: usize,
}

pub struct Downloader<F> {
    fetcher: F,
    delay: Duration,
}

impl<F: AssetFetcher> Downloader<F> {
    pub const fn new(fetcher: F, delay: Duration) -> Downloader<F> {
        Downloader { fetcher, delay }
    }

    /// Materializes every asset into `dir`, one request at a time. Assets
    /// whose key is already on disk cost nothing. A failed asset is logged
    /// and skipped, only a directory that can't be created or listed fails
    /// the batch.
    pub async fn download_all(&self, dir: &Path, assets: Vec<Asset>) -> Result<DownloadReport> {
        tokio::fs::create_dir_all(dir).await?;
        let present = materialized_keys(dir).await?;

        let mut seen = HashSet::new();
        let assets: Vec<Asset> = assets
            .into_iter()
            .filter(|a| seen.insert(a.key.clone()))
            .collect();

        let mut report = DownloadReport {
            total: assets.len(),
            ..DownloadReport::default()
        };
        let mut progress = Progress::new("Assets", Some(report.total));

        for asset in &assets {
            if present.contains(&asset.key) {
                report.cached += 1;
                progress.advance(1);
                continue;
            }

            match self.download(dir, asset).await {
                Ok(()) => report.downloaded += 1,
                Err(why) => {
                    warn!("failed to download {}: {why}", asset.url);
                    report.failed += 1;
                }
            }
            progress.advance(1);
            tokio::time::sleep(self.delay).await;
        }
        progress.finish();

        info!(
            "{} assets in {}: {} downloaded, {} already present, {} failed",
            report.total,
            dir.display(),
            report.downloaded,
            report.cached,
            report.failed
        );
        Ok(report)
    }

    async fn download(&self, dir: &Path, asset: &Asset) -> Result<()> {
        let bytes = match self.fetcher.fetch(&asset.url).await {
            Err(Error::HttpStatus(status)) if status == StatusCode::UNSUPPORTED_MEDIA_TYPE => {
                match fallback_url(&asset.url) {
                    Some(alternate) => {
                        debug!("{} refused, retrying as {alternate}", asset.url);
                        self.fetcher.fetch(&alternate).await?
                    }
                    None => return Err(Error::HttpStatus(status)),
                }
            }
            fetched => fetched?,
        };

        // an interrupted write must never leave a file under the final name
        let partial = dir.join(partial_name(&asset.file_name));
        tokio::fs::write(&partial, bytes).await?;
        tokio::fs::rename(&partial, dir.join(&asset.file_name)).await?;
        Ok(())
    }
}
