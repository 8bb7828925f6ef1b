use super::{Document, CDN_URL};

use serde::{Deserialize, Serialize};
use serenity::model::guild::Emoji;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmojiRecord {
    pub id: u64,
    pub name: String,
    pub managed: bool,
    pub animated: bool,
    pub available: bool,
    pub require_colons: bool,
    pub roles: Vec<u64>,
}

impl EmojiRecord {
    #[inline(always)]
    pub const fn extension(&self) -> &'static str {
        if self.animated {
            "gif"
        } else {
            "png"
        }
    }

    pub fn url(&self) -> String {
        format!("{CDN_URL}/emojis/{}.{}", self.id, self.extension())
    }
}

impl Document for EmojiRecord {
    const COLLECTION: &'static str = "emoji";

    #[inline(always)]
    fn id(&self) -> u64 {
        self.id
    }
}

impl From<&Emoji> for EmojiRecord {
    fn from(emoji: &Emoji) -> EmojiRecord {
        EmojiRecord {
            id: *emoji.id.as_u64(),
            name: emoji.name.clone(),
            managed: emoji.managed,
            animated: emoji.animated,
            available: emoji.available,
            require_colons: emoji.require_colons,
            roles: emoji.roles.iter().map(|r| *r.as_u64()).collect(),
        }
    }
}
