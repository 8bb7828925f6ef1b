use super::{store, Export, EMOJIS_DIR};
use crate::errors::Result;
use crate::handler::assets::Asset;
use crate::handler::menu;

pub async fn log_emojis(export: &Export<'_>) -> Result<()> {
    let emojis = export.platform.emojis(export.guild).await?;
    let written = store(export.database, &emojis)?;
    menu::success(&format!("Logged {written} emojis"));

    let assets = emojis.iter().map(Asset::emoji).collect();
    let report = export
        .downloader
        .download_all(&export.asset_dir(EMOJIS_DIR), assets)
        .await?;
    menu::success(&format!(
        "Downloaded {} emojis, {} already present",
        report.downloaded, report.cached
    ));
    Ok(())
}
