use super::{store, Export};
use crate::errors::Result;
use crate::handler::menu;

pub async fn log_roles(export: &Export<'_>) -> Result<()> {
    let roles = export.platform.roles(export.guild).await?;
    let written = store(export.database, &roles)?;
    menu::success(&format!("Logged {written} roles"));
    Ok(())
}
