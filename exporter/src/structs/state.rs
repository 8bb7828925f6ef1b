use std::fmt::{self, Display};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Messages,
    Roles,
    Channels,
    Emojis,
    Users,
    Settings,
    Attachments,
}

impl Operation {
    /// Menu order.
    pub const ALL: [Operation; 7] = [
        Operation::Messages,
        Operation::Roles,
        Operation::Channels,
        Operation::Emojis,
        Operation::Users,
        Operation::Settings,
        Operation::Attachments,
    ];

    pub const fn key(self) -> char {
        match self {
            Operation::Messages => '1',
            Operation::Roles => '2',
            Operation::Channels => '3',
            Operation::Emojis => '4',
            Operation::Users => '5',
            Operation::Settings => '6',
            Operation::Attachments => '7',
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Operation::Messages => "log messages",
            Operation::Roles => "log roles",
            Operation::Channels => "log channels",
            Operation::Emojis => "log emojis",
            Operation::Users => "log users",
            Operation::Settings => "log server settings",
            Operation::Attachments => "download attachments",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Run(Operation),
    ChangeDatabase,
    ChangeServer,
    Quit,
}

impl FromStr for MenuChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<MenuChoice, ()> {
        let mut chars = s.trim().chars();
        let choice = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_ascii_lowercase(),
            _ => return Err(()),
        };

        match choice {
            'd' => Ok(MenuChoice::ChangeDatabase),
            's' => Ok(MenuChoice::ChangeServer),
            'q' => Ok(MenuChoice::Quit),
            c => Operation::ALL
                .into_iter()
                .find(|op| op.key() == c)
                .map(MenuChoice::Run)
                .ok_or(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    SelectDatabase,
    SelectServer,
    SelectOperation,
    Running(Operation),
    Exit,
}

/// The guild the current database exports. Owned by the session, never
/// attached to platform objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildBinding {
    pub guild_id: u64,
    pub name: String,
    /// No settings pass has bound this guild to the database yet.
    pub is_first_run: bool,
}

impl GuildBinding {
    pub fn new(guild_id: u64, name: String, stored: Option<u64>) -> GuildBinding {
        GuildBinding {
            guild_id,
            name,
            is_first_run: is_first_run(stored, guild_id),
        }
    }
}

/// A guild is on its first run unless the database already records it as
/// its identity.
#[inline]
pub fn is_first_run(stored: Option<u64>, selected: u64) -> bool {
    stored != Some(selected)
}

/// Where selecting `selected` leads, given the guild the database is bound
/// to. A database bound to another guild is refused with that guild's id,
/// an unbound one logs the guild's settings before anything else.
pub fn bind_server(stored: Option<u64>, selected: u64) -> Result<State, u64> {
    match stored {
        Some(bound) if bound != selected => Err(bound),
        _ if is_first_run(stored, selected) => Ok(State::Running(Operation::Settings)),
        _ => Ok(State::SelectOperation),
    }
}

/// Where control returns to after a recoverable failure. Until a settings
/// pass has bound the guild no other pass may write to the database.
pub fn recovery_state(has_database: bool, guild: Option<&GuildBinding>) -> State {
    match guild {
        _ if !has_database => State::SelectDatabase,
        Some(binding) if !binding.is_first_run => State::SelectOperation,
        _ => State::SelectServer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_menu_choices() {
        assert_eq!("1".parse::<MenuChoice>(), Ok(MenuChoice::Run(Operation::Messages)));
        assert_eq!(" 7 ".parse::<MenuChoice>(), Ok(MenuChoice::Run(Operation::Attachments)));
        assert_eq!("D".parse::<MenuChoice>(), Ok(MenuChoice::ChangeDatabase));
        assert_eq!("s".parse::<MenuChoice>(), Ok(MenuChoice::ChangeServer));
        assert_eq!("q".parse::<MenuChoice>(), Ok(MenuChoice::Quit));
    }

    #[test]
    fn test_bad_menu_choices() {
        assert_eq!("".parse::<MenuChoice>(), Err(()));
        assert_eq!("8".parse::<MenuChoice>(), Err(()));
        assert_eq!("12".parse::<MenuChoice>(), Err(()));
        assert_eq!("quit".parse::<MenuChoice>(), Err(()));
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<char> = Operation::ALL.iter().map(|op| op.key()).collect();
        assert_eq!(keys.len(), Operation::ALL.len());
        assert!(!keys.contains(&'d') && !keys.contains(&'s') && !keys.contains(&'q'));
    }

    #[test]
    fn test_first_run() {
        assert!(is_first_run(None, 5));
        assert!(is_first_run(Some(4), 5));
        assert!(!is_first_run(Some(5), 5));

        let binding = GuildBinding::new(5, String::from("guild"), Some(5));
        assert!(!binding.is_first_run);
    }

    #[test]
    fn test_unbound_database_logs_settings_first() {
        assert_eq!(bind_server(None, 5), Ok(State::Running(Operation::Settings)));
    }

    #[test]
    fn test_bound_database_resumes() {
        assert_eq!(bind_server(Some(5), 5), Ok(State::SelectOperation));
    }

    #[test]
    fn test_database_of_another_guild_is_refused() {
        assert_eq!(bind_server(Some(4), 5), Err(4));
    }

    #[test]
    fn test_recovery_state() {
        let bound = GuildBinding::new(5, String::from("guild"), Some(5));
        let unbound = GuildBinding::new(5, String::from("guild"), None);

        assert_eq!(recovery_state(false, Some(&bound)), State::SelectDatabase);
        assert_eq!(recovery_state(true, None), State::SelectServer);
        // a failed first settings pass must not open the operation menu
        assert_eq!(recovery_state(true, Some(&unbound)), State::SelectServer);
        assert_eq!(recovery_state(true, Some(&bound)), State::SelectOperation);
    }
}
