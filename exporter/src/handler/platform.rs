use super::pagination::PageSource;
use crate::errors::Result;

use db::structs::{
    ChannelRecord, EmojiRecord, GuildRecord, MessageRecord, RoleRecord, UserRecord,
};
use log::{debug, trace};
use serenity::async_trait;
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::channel::{ChannelType, GuildChannel};
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use serenity::model::Permissions;
use std::sync::Arc;

/// Most messages the platform serves per request.
pub const MESSAGE_PAGE_SIZE: u64 = 100;
/// Most guild members the platform serves per request.
pub const MEMBER_PAGE_SIZE: u64 = 1000;

/// The live platform session. Cheap to clone, every clone shares the same
/// http client (and its rate limiter) and gateway cache.
#[derive(Clone)]
pub struct Platform {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl Platform {
    pub const fn new(http: Arc<Http>, cache: Arc<Cache>) -> Platform {
        Platform { http, cache }
    }

    /// Name of the guild, or `None` if the bot is not a member of it.
    pub fn guild_name(&self, guild: GuildId) -> Option<String> {
        self.cache.guild(guild).map(|g| g.name)
    }

    fn can_read(&self, channel: &GuildChannel) -> bool {
        let required = Permissions::VIEW_CHANNEL | Permissions::READ_MESSAGE_HISTORY;
        match channel.permissions_for_user(&self.cache, self.cache.current_user_id()) {
            Ok(permissions) => permissions.contains(required),
            Err(why) => {
                debug!("couldn't resolve permissions in #{}: {why}", channel.name);
                false
            }
        }
    }

    /// Text channels of the guild the bot is allowed to read history of,
    /// in sidebar order.
    pub async fn readable_text_channels(&self, guild: GuildId) -> Result<Vec<GuildChannel>> {
        let mut channels: Vec<GuildChannel> = guild
            .channels(&self.http)
            .await?
            .into_values()
            .filter(|c| matches!(c.kind, ChannelType::Text | ChannelType::News))
            .filter(|c| self.can_read(c))
            .collect();
        channels.sort_by_key(|c| (c.position, *c.id.as_u64()));
        Ok(channels)
    }

    pub async fn channels(&self, guild: GuildId) -> Result<Vec<ChannelRecord>> {
        let mut channels: Vec<ChannelRecord> = guild
            .channels(&self.http)
            .await?
            .values()
            .map(ChannelRecord::from)
            .collect();
        channels.sort_by_key(|c| c.id);
        Ok(channels)
    }

    pub async fn roles(&self, guild: GuildId) -> Result<Vec<RoleRecord>> {
        let mut roles: Vec<RoleRecord> = guild
            .roles(&self.http)
            .await?
            .values()
            .map(RoleRecord::from)
            .collect();
        roles.sort_by_key(|r| r.id);
        Ok(roles)
    }

    pub async fn emojis(&self, guild: GuildId) -> Result<Vec<EmojiRecord>> {
        Ok(guild
            .emojis(&self.http)
            .await?
            .iter()
            .map(EmojiRecord::from)
            .collect())
    }

    pub async fn guild(&self, guild: GuildId) -> Result<GuildRecord> {
        let partial = guild.to_partial_guild(&self.http).await?;
        Ok(GuildRecord::from(&partial))
    }

    pub async fn user(&self, user_id: u64) -> Result<UserRecord> {
        let user = self.http.get_user(user_id).await?;
        Ok(UserRecord::from(&user))
    }

    pub fn messages(&self, channel: ChannelId) -> ChannelMessages {
        ChannelMessages {
            http: self.http.clone(),
            channel,
        }
    }

    pub fn members(&self, guild: GuildId) -> GuildMembers {
        GuildMembers {
            http: self.http.clone(),
            guild,
        }
    }
}

/// Message history of one channel, normalized page by page.
pub struct ChannelMessages {
    http: Arc<Http>,
    channel: ChannelId,
}

#[async_trait]
impl PageSource for ChannelMessages {
    type Item = MessageRecord;

    fn page_size(&self) -> u64 {
        MESSAGE_PAGE_SIZE
    }

    async fn fetch_page(&self, after: u64) -> Result<Vec<MessageRecord>> {
        trace!("fetching messages in {} after {after}", self.channel);
        let messages = self
            .channel
            .messages(&self.http, |retriever| {
                retriever.after(MessageId(after)).limit(MESSAGE_PAGE_SIZE)
            })
            .await?;
        Ok(messages.iter().map(MessageRecord::from).collect())
    }

    fn cursor_of(&self, item: &MessageRecord) -> u64 {
        item.id
    }
}

/// Member list of one guild, ordered by user id.
pub struct GuildMembers {
    http: Arc<Http>,
    guild: GuildId,
}

#[async_trait]
impl PageSource for GuildMembers {
    type Item = UserRecord;

    fn page_size(&self) -> u64 {
        MEMBER_PAGE_SIZE
    }

    async fn fetch_page(&self, after: u64) -> Result<Vec<UserRecord>> {
        trace!("fetching members of {} after {after}", self.guild);
        let members = self
            .guild
            .members(&self.http, Some(MEMBER_PAGE_SIZE), UserId(after))
            .await?;
        Ok(members.iter().map(|m| UserRecord::from(&m.user)).collect())
    }

    fn cursor_of(&self, item: &UserRecord) -> u64 {
        item.id
    }
}
