use super::{enum_number, Document};

use serde::{Deserialize, Serialize};
use serenity::model::guild::PartialGuild;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildRecord {
    pub id: u64,
    pub name: String,
    pub name_acronym: String,
    pub icon: Option<String>,
    pub splash: Option<String>,
    pub banner: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "ownerID")]
    pub owner_id: u64,
    #[serde(rename = "afkChannelID")]
    pub afk_channel_id: Option<u64>,
    pub afk_timeout: u64,
    #[serde(rename = "systemChannelID")]
    pub system_channel_id: Option<u64>,
    pub verification_level: u64,
    pub mfa_level: u64,
    pub default_message_notifications: u64,
    pub premium_tier: u64,
    pub features: Vec<String>,
}

/// Short form of a guild name, the first character of every word with
/// whitespace dropped, e.g. "Rust Programming Language" -> "RPL".
pub fn name_acronym(name: &str) -> String {
    let mut acronym = String::new();
    let mut in_word = false;
    for c in name.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && !in_word {
            acronym.push(c);
        } else if !is_word && !c.is_whitespace() {
            acronym.push(c);
        }
        in_word = is_word;
    }
    acronym
}

impl Document for GuildRecord {
    const COLLECTION: &'static str = "guild";

    #[inline(always)]
    fn id(&self) -> u64 {
        self.id
    }
}

impl From<&PartialGuild> for GuildRecord {
    fn from(guild: &PartialGuild) -> GuildRecord {
        GuildRecord {
            id: *guild.id.as_u64(),
            name: guild.name.clone(),
            name_acronym: name_acronym(&guild.name),
            icon: guild.icon.clone(),
            splash: guild.splash.clone(),
            banner: guild.banner.clone(),
            description: guild.description.clone(),
            owner_id: *guild.owner_id.as_u64(),
            afk_channel_id: guild.afk_channel_id.map(|c| *c.as_u64()),
            afk_timeout: guild.afk_timeout,
            system_channel_id: guild.system_channel_id.map(|c| *c.as_u64()),
            verification_level: enum_number(&guild.verification_level),
            mfa_level: enum_number(&guild.mfa_level),
            default_message_notifications: enum_number(&guild.default_message_notifications),
            premium_tier: enum_number(&guild.premium_tier),
            features: guild.features.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_acronym() {
        assert_eq!(name_acronym("Rust Programming Language"), "RPL");
        assert_eq!(name_acronym("single"), "s");
        assert_eq!(name_acronym("  spaced   out  "), "so");
        assert_eq!(name_acronym("Cats & Dogs"), "C&D");
        assert_eq!(name_acronym(""), "");
    }

    fn guild_fixture() -> PartialGuild {
        serde_json::from_value(serde_json::json!({
            "id": "100000000000000001",
            "name": "Rust Programming Language",
            "icon": "iconhash",
            "splash": null,
            "discovery_splash": null,
            "banner": "bannerhash",
            "description": "systems programming",
            "owner": false,
            "owner_id": "700000000000000003",
            "permissions": null,
            "afk_channel_id": "800000000000000009",
            "afk_timeout": 300,
            "widget_enabled": false,
            "widget_channel_id": null,
            "verification_level": 2,
            "default_message_notifications": 1,
            "explicit_content_filter": 2,
            "roles": [],
            "emojis": [],
            "stickers": [],
            "features": ["COMMUNITY", "NEWS"],
            "mfa_level": 1,
            "application_id": null,
            "system_channel_id": "800000000000000001",
            "system_channel_flags": 0,
            "rules_channel_id": null,
            "public_updates_channel_id": null,
            "vanity_url_code": null,
            "premium_tier": 2,
            "premium_subscription_count": 9,
            "preferred_locale": "en-US",
            "nsfw_level": 0,
            "max_members": 500000,
            "max_video_channel_users": 25,
            "welcome_screen": null,
            "premium_progress_bar_enabled": false
        }))
        .unwrap()
    }

    #[test]
    fn test_guild_normalization() {
        let record = GuildRecord::from(&guild_fixture());

        assert_eq!(record.id, 100000000000000001);
        assert_eq!(record.name_acronym, "RPL");
        assert_eq!(record.icon.as_deref(), Some("iconhash"));
        assert_eq!(record.splash, None);
        assert_eq!(record.banner.as_deref(), Some("bannerhash"));
        assert_eq!(record.owner_id, 700000000000000003);
        assert_eq!(record.afk_channel_id, Some(800000000000000009));
        assert_eq!(record.afk_timeout, 300);
        assert_eq!(record.system_channel_id, Some(800000000000000001));
        assert_eq!(record.features, vec!["COMMUNITY", "NEWS"]);
    }

    #[test]
    fn test_guild_levels_are_stored_as_numbers() {
        let record = GuildRecord::from(&guild_fixture());

        assert_eq!(record.verification_level, 2);
        assert_eq!(record.mfa_level, 1);
        assert_eq!(record.default_message_notifications, 1);
        assert_eq!(record.premium_tier, 2);

        let doc = serde_json::to_value(&record).unwrap();
        assert_eq!(doc["ownerID"], 700000000000000003u64);
        assert_eq!(doc["verificationLevel"], 2);
    }
}
