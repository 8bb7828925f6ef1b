use super::{enum_number, Document};

use serde::{Deserialize, Serialize};
use serenity::model::channel::{
    Attachment, Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedImage, EmbedProvider,
    EmbedThumbnail, EmbedVideo, Message, MessageReaction, ReactionType,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: u64,
    #[serde(rename = "channelID")]
    pub channel_id: u64,
    pub author: u64,
    pub content: String,
    // unix millis
    pub timestamp: i64,
    pub edited_timestamp: Option<i64>,
    pub mention_everyone: bool,
    pub mentions: Vec<u64>,
    pub mention_roles: Vec<u64>,
    pub mention_channels: Vec<u64>,
    pub attachments: Vec<AttachmentRecord>,
    pub embeds: Vec<EmbedRecord>,
    pub reactions: Vec<ReactionRecord>,
    pub pinned: bool,
    pub tts: bool,
    #[serde(rename = "webhookID")]
    pub webhook_id: Option<u64>,
    #[serde(rename = "type")]
    pub kind: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRecord {
    pub id: u64,
    pub filename: String,
    pub filesize: u64,
    pub height: Option<u64>,
    pub width: Option<u64>,
    pub content_type: Option<String>,
    pub url: String,
    #[serde(rename = "proxyURL")]
    pub proxy_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedRecord {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub timestamp: Option<String>,
    pub color: Option<u32>,
    pub fields: Vec<EmbedFieldRecord>,
    pub footer: Option<EmbedFooterRecord>,
    pub image: Option<EmbedMediaRecord>,
    pub thumbnail: Option<EmbedMediaRecord>,
    pub video: Option<EmbedMediaRecord>,
    pub provider: Option<EmbedProviderRecord>,
    pub author: Option<EmbedAuthorRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFieldRecord {
    pub inline: bool,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooterRecord {
    pub text: String,
    #[serde(rename = "iconURL")]
    pub icon_url: Option<String>,
    #[serde(rename = "proxyIconURL")]
    pub proxy_icon_url: Option<String>,
}

/// Shared shape of embed images, thumbnails and videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedMediaRecord {
    pub url: String,
    #[serde(rename = "proxyURL")]
    pub proxy_url: Option<String>,
    pub height: Option<u64>,
    pub width: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedProviderRecord {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAuthorRecord {
    pub name: String,
    pub url: Option<String>,
    #[serde(rename = "iconURL")]
    pub icon_url: Option<String>,
    #[serde(rename = "proxyIconURL")]
    pub proxy_icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub count: u64,
    pub me: bool,
    pub emoji: ReactionEmojiRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEmojiRecord {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub animated: bool,
}

impl MessageRecord {
    /// Every remote binary referenced by this message, attachments first
    /// then embed images and thumbnails, in message order.
    pub fn asset_urls(&self) -> Vec<&str> {
        let attachments = self.attachments.iter().map(|a| a.url.as_str());
        let embeds = self.embeds.iter().flat_map(|e| {
            e.image
                .iter()
                .chain(e.thumbnail.iter())
                .map(|media| media.url.as_str())
        });
        attachments.chain(embeds).collect()
    }
}

impl Document for MessageRecord {
    const COLLECTION: &'static str = "message";
    const INDEXED: bool = true;

    #[inline(always)]
    fn id(&self) -> u64 {
        self.id
    }

    #[inline(always)]
    fn channel_id(&self) -> Option<u64> {
        Some(self.channel_id)
    }

    #[inline(always)]
    fn timestamp(&self) -> Option<i64> {
        Some(self.timestamp)
    }
}

impl From<&Message> for MessageRecord {
    fn from(msg: &Message) -> MessageRecord {
        MessageRecord {
            id: *msg.id.as_u64(),
            channel_id: *msg.channel_id.as_u64(),
            author: *msg.author.id.as_u64(),
            content: msg.content.clone(),
            timestamp: msg.timestamp.timestamp_millis(),
            edited_timestamp: msg.edited_timestamp.map(|ts| ts.timestamp_millis()),
            mention_everyone: msg.mention_everyone,
            mentions: msg.mentions.iter().map(|u| *u.id.as_u64()).collect(),
            mention_roles: msg.mention_roles.iter().map(|r| *r.as_u64()).collect(),
            mention_channels: msg
                .mention_channels
                .iter()
                .map(|c| *c.id.as_u64())
                .collect(),
            attachments: msg.attachments.iter().map(AttachmentRecord::from).collect(),
            embeds: msg.embeds.iter().map(EmbedRecord::from).collect(),
            reactions: msg.reactions.iter().map(ReactionRecord::from).collect(),
            pinned: msg.pinned,
            tts: msg.tts,
            webhook_id: msg.webhook_id.map(|w| *w.as_u64()),
            kind: enum_number(&msg.kind),
        }
    }
}

impl From<&Attachment> for AttachmentRecord {
    fn from(a: &Attachment) -> AttachmentRecord {
        AttachmentRecord {
            id: *a.id.as_u64(),
            filename: a.filename.clone(),
            filesize: a.size,
            height: a.height,
            width: a.width,
            content_type: a.content_type.clone(),
            url: a.url.clone(),
            proxy_url: a.proxy_url.clone(),
        }
    }
}

impl From<&Embed> for EmbedRecord {
    fn from(e: &Embed) -> EmbedRecord {
        EmbedRecord {
            title: e.title.clone(),
            kind: e.kind.clone(),
            description: e.description.clone(),
            url: e.url.clone(),
            timestamp: e.timestamp.clone(),
            color: e.colour.map(|c| c.0),
            fields: e.fields.iter().map(EmbedFieldRecord::from).collect(),
            footer: e.footer.as_ref().map(EmbedFooterRecord::from),
            image: e.image.as_ref().map(EmbedMediaRecord::from),
            thumbnail: e.thumbnail.as_ref().map(EmbedMediaRecord::from),
            video: e.video.as_ref().map(EmbedMediaRecord::from),
            provider: e.provider.as_ref().map(EmbedProviderRecord::from),
            author: e.author.as_ref().map(EmbedAuthorRecord::from),
        }
    }
}

impl From<&EmbedField> for EmbedFieldRecord {
    fn from(f: &EmbedField) -> EmbedFieldRecord {
        EmbedFieldRecord {
            inline: f.inline,
            name: f.name.clone(),
            value: f.value.clone(),
        }
    }
}

impl From<&EmbedFooter> for EmbedFooterRecord {
    fn from(f: &EmbedFooter) -> EmbedFooterRecord {
        EmbedFooterRecord {
            text: f.text.clone(),
            icon_url: f.icon_url.clone(),
            proxy_icon_url: f.proxy_icon_url.clone(),
        }
    }
}

impl From<&EmbedImage> for EmbedMediaRecord {
    fn from(i: &EmbedImage) -> EmbedMediaRecord {
        EmbedMediaRecord {
            url: i.url.clone(),
            proxy_url: i.proxy_url.clone(),
            height: i.height,
            width: i.width,
        }
    }
}

impl From<&EmbedThumbnail> for EmbedMediaRecord {
    fn from(t: &EmbedThumbnail) -> EmbedMediaRecord {
        EmbedMediaRecord {
            url: t.url.clone(),
            proxy_url: t.proxy_url.clone(),
            height: t.height,
            width: t.width,
        }
    }
}

impl From<&EmbedVideo> for EmbedMediaRecord {
    fn from(v: &EmbedVideo) -> EmbedMediaRecord {
        EmbedMediaRecord {
            url: v.url.clone(),
            proxy_url: v.proxy_url.clone(),
            height: v.height,
            width: v.width,
        }
    }
}

impl From<&EmbedProvider> for EmbedProviderRecord {
    fn from(p: &EmbedProvider) -> EmbedProviderRecord {
        EmbedProviderRecord {
            name: p.name.clone(),
            url: p.url.clone(),
        }
    }
}

impl From<&EmbedAuthor> for EmbedAuthorRecord {
    fn from(a: &EmbedAuthor) -> EmbedAuthorRecord {
        EmbedAuthorRecord {
            name: a.name.clone(),
            url: a.url.clone(),
            icon_url: a.icon_url.clone(),
            proxy_icon_url: a.proxy_icon_url.clone(),
        }
    }
}

impl From<&MessageReaction> for ReactionRecord {
    fn from(r: &MessageReaction) -> ReactionRecord {
        let emoji = match &r.reaction_type {
            ReactionType::Custom { animated, id, name } => ReactionEmojiRecord {
                id: Some(*id.as_u64()),
                name: name.clone(),
                animated: *animated,
            },
            ReactionType::Unicode(name) => ReactionEmojiRecord {
                id: None,
                name: Some(name.clone()),
                animated: false,
            },
            _ => ReactionEmojiRecord {
                id: None,
                name: None,
                animated: false,
            },
        };

        ReactionRecord {
            count: r.count,
            me: r.me,
            emoji,
        }
    }
}
