pub mod state;

pub use state::{GuildBinding, MenuChoice, Operation, State};
