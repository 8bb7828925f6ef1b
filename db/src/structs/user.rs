use super::{Document, CDN_URL};

use serde::{Deserialize, Serialize};
use serenity::model::user::User;

const DELETED_USERNAME: &str = "Deleted User";
const DELETED_USERNAME_PREFIX: &str = "deleted_user_";
const DELETED_DISCRIMINATOR: &str = "0000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub discriminator: String,
    pub bot: bool,
    pub avatar: Option<String>,
}

impl UserRecord {
    /// Returns true if the record looks like the placeholder the platform
    /// serves once an account has been deleted. A placeholder must never
    /// overwrite a real record captured earlier.
    pub fn is_deleted_placeholder(&self) -> bool {
        self.discriminator == DELETED_DISCRIMINATOR
            && self.avatar.is_none()
            && (self.username == DELETED_USERNAME
                || self.username.starts_with(DELETED_USERNAME_PREFIX))
    }

    /// Filename key of the avatar asset, `{userID}_{avatarHash}`.
    pub fn avatar_key(&self) -> Option<String> {
        self.avatar
            .as_ref()
            .map(|hash| format!("{}_{}", self.id, hash))
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.avatar.as_ref().map(|hash| {
            let ext = if hash.starts_with("a_") { "gif" } else { "png" };
            format!("{CDN_URL}/avatars/{}/{hash}.{ext}", self.id)
        })
    }
}

impl Document for UserRecord {
    const COLLECTION: &'static str = "user";

    #[inline(always)]
    fn id(&self) -> u64 {
        self.id
    }
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> UserRecord {
        UserRecord {
            id: *user.id.as_u64(),
            username: user.name.clone(),
            discriminator: format!("{:04}", user.discriminator),
            bot: user.bot,
            avatar: user.avatar.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(username: &str, discriminator: &str, avatar: Option<&str>) -> UserRecord {
        UserRecord {
            id: 42,
            username: username.to_string(),
            discriminator: discriminator.to_string(),
            bot: false,
            avatar: avatar.map(String::from),
        }
    }

    #[test]
    fn test_from_serenity_user() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "123456789012345678",
            "username": "bob",
            "discriminator": "0007",
            "avatar": "a_deadbeef",
            "bot": true
        }))
        .unwrap();

        let rec = UserRecord::from(&user);
        assert_eq!(rec.id, 123456789012345678);
        assert_eq!(rec.username, "bob");
        assert_eq!(rec.discriminator, "0007");
        assert!(rec.bot);
        assert_eq!(rec.avatar.as_deref(), Some("a_deadbeef"));
    }

    #[test]
    fn test_deleted_placeholder() {
        assert!(record("Deleted User", "0000", None).is_deleted_placeholder());
        assert!(record("deleted_user_1a2b3c4d", "0000", None).is_deleted_placeholder());
    }

    #[test]
    fn test_real_users_are_not_placeholders() {
        assert!(!record("alice", "0001", None).is_deleted_placeholder());
        assert!(!record("Deleted User", "0001", None).is_deleted_placeholder());
        assert!(!record("Deleted User", "0000", Some("abc")).is_deleted_placeholder());
    }

    #[test]
    fn test_avatar_key_and_url() {
        let still = record("alice", "0001", Some("abc"));
        assert_eq!(still.avatar_key().as_deref(), Some("42_abc"));
        assert_eq!(
            still.avatar_url().as_deref(),
            Some("https://cdn.discordapp.com/avatars/42/abc.png")
        );

        let animated = record("alice", "0001", Some("a_abc"));
        assert_eq!(
            animated.avatar_url().as_deref(),
            Some("https://cdn.discordapp.com/avatars/42/a_abc.gif")
        );

        let none = record("alice", "0001", None);
        assert_eq!(none.avatar_key(), None);
        assert_eq!(none.avatar_url(), None);
    }
}
