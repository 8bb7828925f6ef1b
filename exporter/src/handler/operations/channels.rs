use super::{store, Export};
use crate::errors::Result;
use crate::handler::menu;

/// Every channel of the guild, readable or not, categories included.
pub async fn log_channels(export: &Export<'_>) -> Result<()> {
    let channels = export.platform.channels(export.guild).await?;
    let written = store(export.database, &channels)?;
    menu::success(&format!("Logged {written} channels"));
    Ok(())
}
