use super::{enum_number, Document};

use serde::{Deserialize, Serialize};
use serenity::model::channel::{GuildChannel, PermissionOverwrite, PermissionOverwriteType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    pub id: u64,
    pub name: String,
    pub topic: Option<String>,
    #[serde(rename = "type")]
    pub kind: u64,
    pub position: i64,
    pub nsfw: bool,
    pub bitrate: Option<u64>,
    pub user_limit: Option<u64>,
    #[serde(rename = "parentID")]
    pub parent_id: Option<u64>,
    pub permission_overwrites: Vec<OverwriteRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverwriteRecord {
    pub id: u64,
    // "role" or "member"
    #[serde(rename = "type")]
    pub kind: String,
    pub allow: u64,
    pub deny: u64,
}

impl Document for ChannelRecord {
    const COLLECTION: &'static str = "channel";

    #[inline(always)]
    fn id(&self) -> u64 {
        self.id
    }
}

impl From<&GuildChannel> for ChannelRecord {
    fn from(channel: &GuildChannel) -> ChannelRecord {
        ChannelRecord {
            id: *channel.id.as_u64(),
            name: channel.name.clone(),
            topic: channel.topic.clone(),
            kind: enum_number(&channel.kind),
            position: channel.position,
            nsfw: channel.nsfw,
            bitrate: channel.bitrate,
            user_limit: channel.user_limit,
            parent_id: channel.parent_id.map(|p| *p.as_u64()),
            permission_overwrites: channel
                .permission_overwrites
                .iter()
                .map(OverwriteRecord::from)
                .collect(),
        }
    }
}

impl From<&PermissionOverwrite> for OverwriteRecord {
    fn from(overwrite: &PermissionOverwrite) -> OverwriteRecord {
        let (id, kind) = match overwrite.kind {
            PermissionOverwriteType::Member(user) => (*user.as_u64(), "member"),
            PermissionOverwriteType::Role(role) => (*role.as_u64(), "role"),
            _ => (0, "unknown"),
        };

        OverwriteRecord {
            id,
            kind: kind.to_string(),
            allow: overwrite.allow.bits(),
            deny: overwrite.deny.bits(),
        }
    }
}
