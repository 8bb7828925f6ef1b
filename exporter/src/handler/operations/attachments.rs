use super::{Export, ATTACHMENTS_DIR};
use crate::errors::Result;
use crate::handler::assets::{Asset, AssetFetcher, DownloadReport, Downloader};
use crate::handler::menu;

use db::structs::MessageRecord;
use db::{Database, ReadOnlyDb};
use log::warn;
use std::path::Path;

pub async fn log_attachments(export: &Export<'_>) -> Result<()> {
    let report = download_attachments(
        export.database,
        export.downloader,
        &export.asset_dir(ATTACHMENTS_DIR),
    )
    .await?;
    menu::success(&format!(
        "Downloaded {} attachments, {} already present, {} failed",
        report.downloaded, report.cached, report.failed
    ));
    Ok(())
}

/// Attachments and embed images of every stored message.
pub async fn download_attachments<F: AssetFetcher>(
    database: &Database,
    downloader: &Downloader<F>,
    dir: &Path,
) -> Result<DownloadReport> {
    let messages = database.read_only_db_call(|db| db.get_all::<MessageRecord>())?;
    downloader.download_all(dir, attachment_assets(&messages)).await
}

fn attachment_assets(messages: &[MessageRecord]) -> Vec<Asset> {
    messages
        .iter()
        .flat_map(MessageRecord::asset_urls)
        .filter_map(|url| match Asset::attachment(url) {
            Ok(asset) => Some(asset),
            Err(why) => {
                warn!("skipping attachment {url}: {why}");
                None
            }
        })
        .collect()
}
