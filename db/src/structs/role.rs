use super::Document;

use serde::{Deserialize, Serialize};
use serenity::model::guild::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: u64,
    pub name: String,
    pub color: u32,
    pub hoist: bool,
    pub position: i64,
    pub permissions: u64,
    pub managed: bool,
    pub mentionable: bool,
}

impl Document for RoleRecord {
    const COLLECTION: &'static str = "role";

    #[inline(always)]
    fn id(&self) -> u64 {
        self.id
    }
}

impl From<&Role> for RoleRecord {
    fn from(role: &Role) -> RoleRecord {
        RoleRecord {
            id: *role.id.as_u64(),
            name: role.name.clone(),
            color: role.colour.0,
            hoist: role.hoist,
            position: role.position,
            permissions: role.permissions.bits(),
            managed: role.managed,
            mentionable: role.mentionable,
        }
    }
}
