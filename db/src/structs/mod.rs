mod channel;
mod emoji;
mod guild;
mod message;
mod role;
mod user;

pub use channel::{ChannelRecord, OverwriteRecord};
pub use emoji::EmojiRecord;
pub use guild::GuildRecord;
pub use message::{
    AttachmentRecord, EmbedAuthorRecord, EmbedFieldRecord, EmbedFooterRecord, EmbedMediaRecord,
    EmbedProviderRecord, EmbedRecord, MessageRecord, ReactionEmojiRecord, ReactionRecord,
};
pub use role::RoleRecord;
pub use user::UserRecord;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Base url of the platform CDN that serves avatars, emojis and attachments.
pub const CDN_URL: &str = "https://cdn.discordapp.com";

/// A normalized, storage ready record. Every collection is keyed by the
/// platform snowflake, which doubles as the unique key for upserts.
pub trait Document: Serialize + DeserializeOwned {
    /// Name of the table holding this collection.
    const COLLECTION: &'static str;

    /// Whether the table also stores `channel_id` and `timestamp` columns
    /// for indexed lookups. Only messages are looked up that way.
    const INDEXED: bool = false;

    fn id(&self) -> u64;

    /// Owning channel, stored when the collection is indexed.
    #[inline(always)]
    fn channel_id(&self) -> Option<u64> {
        None
    }

    /// Creation time in unix millis, stored when the collection is indexed.
    #[inline(always)]
    fn timestamp(&self) -> Option<i64> {
        None
    }
}

// serenity models its numeric enums with serde impls that write the raw
// api number, which is exactly what we want to persist
pub(crate) fn enum_number<T: Serialize>(value: &T) -> u64 {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_u64())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::model::channel::ChannelType;

    #[test]
    fn test_enum_number() {
        assert_eq!(enum_number(&ChannelType::Text), 0);
        assert_eq!(enum_number(&ChannelType::Category), 4);
        assert_eq!(enum_number(&"not a number"), 0);
    }
}
