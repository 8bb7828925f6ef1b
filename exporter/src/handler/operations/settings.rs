use super::{store, Export};
use crate::errors::Result;
use crate::handler::menu;

use db::WriteableDb;
use log::info;

/// Stores the guild record and binds the database to the guild, which is
/// what later runs auto-resume from.
pub async fn log_settings(export: &Export<'_>) -> Result<()> {
    let guild = export.platform.guild(export.guild).await?;
    store(export.database, &[guild])?;

    let guild_id = *export.guild.as_u64();
    export
        .database
        .writable_db_call(|db| db.set_guild_identity(guild_id))?;
    info!("database {} bound to guild {guild_id}", export.database.name());

    menu::success("Logged server settings");
    Ok(())
}
