//! The leaf passes of the export menu. Every pass reads from the platform,
//! upserts what it saw and returns to the menu. Store failures bubble up as
//! fatal errors, platform failures as recoverable ones.

mod attachments;
mod channels;
mod emojis;
mod messages;
mod roles;
mod settings;
mod users;

use super::assets::{Downloader, HttpFetcher};
use super::platform::Platform;
use crate::errors::Result;
use crate::structs::Operation;

use db::structs::Document;
use db::{Database, WriteableDb};
use log::info;
use serenity::model::id::GuildId;
use std::path::PathBuf;

const AVATARS_DIR: &str = "avatars";
const EMOJIS_DIR: &str = "emojis";
const ATTACHMENTS_DIR: &str = "attachments";

/// Everything one pass needs, borrowed from the session for its duration.
pub struct Export<'a> {
    pub database: &'a Database,
    pub platform: &'a Platform,
    pub downloader: &'a Downloader<HttpFetcher>,
    pub guild: GuildId,
    /// `{export root}/{guildID}`
    pub guild_dir: PathBuf,
}

impl Export<'_> {
    pub async fn run(&self, op: Operation) -> Result<()> {
        info!(
            "running '{op}' for guild {} into {}",
            self.guild,
            self.database.name()
        );
        match op {
            Operation::Messages => messages::log_messages(self).await,
            Operation::Roles => roles::log_roles(self).await,
            Operation::Channels => channels::log_channels(self).await,
            Operation::Emojis => emojis::log_emojis(self).await,
            Operation::Users => users::log_users(self).await,
            Operation::Settings => settings::log_settings(self).await,
            Operation::Attachments => attachments::log_attachments(self).await,
        }
    }

    #[inline]
    fn asset_dir(&self, kind: &str) -> PathBuf {
        self.guild_dir.join(kind)
    }
}

/// Upserts one batch of records, returning how many were written.
fn store<T: Document>(database: &Database, records: &[T]) -> Result<usize> {
    Ok(database.writable_db_call(|mut db| db.upsert_batch(records))?)
}

#[cfg(test)]
pub(crate) mod tests {
    use db::structs::{AttachmentRecord, MessageRecord};

    pub(crate) fn message(id: u64, channel_id: u64, attachments: &[&str]) -> MessageRecord {
        MessageRecord {
            id,
            channel_id,
            author: 1000 + id % 3,
            content: format!("message {id}"),
            timestamp: id as i64 * 1000,
            edited_timestamp: None,
            mention_everyone: false,
            mentions: vec![],
            mention_roles: vec![],
            mention_channels: vec![],
            attachments: attachments
                .iter()
                .enumerate()
                .map(|(i, url)| AttachmentRecord {
                    id: id * 10 + i as u64,
                    filename: String::from("file"),
                    filesize: 1,
                    height: None,
                    width: None,
                    content_type: None,
                    url: url.to_string(),
                    proxy_url: url.to_string(),
                })
                .collect(),
            embeds: vec![],
            reactions: vec![],
            pinned: false,
            tts: false,
            webhook_id: None,
            kind: 0,
        }
    }
}
