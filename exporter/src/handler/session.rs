use super::assets::{Downloader, HttpFetcher, DOWNLOAD_DELAY};
use super::menu;
use super::operations::Export;
use super::platform::Platform;
use crate::config::{self, Config};
use crate::errors::{Error, Result};
use crate::structs::state::{bind_server, is_first_run, recovery_state};
use crate::structs::{GuildBinding, MenuChoice, Operation, State};

use db::{Database, ReadOnlyDb};
use log::{error, info, warn};
use serenity::model::id::GuildId;
use std::sync::Arc;

/// One interactive export session. Holds the live platform connection and
/// whichever database and guild are currently bound; rebinding either
/// keeps the platform connection.
pub struct Session {
    config: Arc<Config>,
    platform: Platform,
    downloader: Downloader<HttpFetcher>,
    database: Option<Database>,
    guild: Option<GuildBinding>,
}

impl Session {
    pub fn new(config: Arc<Config>, platform: Platform) -> Result<Session> {
        Ok(Session {
            config,
            platform,
            downloader: Downloader::new(HttpFetcher::new()?, DOWNLOAD_DELAY),
            database: None,
            guild: None,
        })
    }

    /// Drives the menu until the user quits or a fatal error occurs.
    pub async fn run(mut self) -> Result<()> {
        let mut state = State::SelectDatabase;
        loop {
            let step = match state {
                State::SelectDatabase => self.select_database().await,
                State::SelectServer => self.select_server().await,
                State::SelectOperation => self.select_operation().await,
                State::Running(op) => self.run_operation(op).await,
                State::Exit => {
                    info!("exiting");
                    return Ok(());
                }
            };

            state = match step {
                Ok(next) => next,
                Err(why) if why.is_fatal() => {
                    error!("fatal error, stopping: {why}");
                    return Err(why);
                }
                Err(why) => {
                    warn!("{why}");
                    menu::error(&why.to_string());
                    recovery_state(self.database.is_some(), self.guild.as_ref())
                }
            };
        }
    }

    async fn select_database(&mut self) -> Result<State> {
        let name = match menu::prompt("Database name").await? {
            Some(name) => name,
            None => return Ok(State::Exit),
        };
        if !config::valid_database_name(&name) {
            menu::error("Database names may only contain letters, digits, '-' and '_'.");
            return Ok(State::SelectDatabase);
        }

        tokio::fs::create_dir_all(&self.config.export_root).await?;
        let database = Database::open(self.config.database_path(&name))?;
        let stored = database.read_only_db_call(|db| db.get_guild_identity())?;
        info!("bound database {name}");
        self.database = Some(database);
        self.guild = None;

        // a database remembers its guild, skip straight to the menu when the
        // bot can still see it
        if let Some(guild_id) = stored {
            if let Some(name) = self.platform.guild_name(GuildId(guild_id)) {
                menu::info(&format!("Resuming export of {name}"));
                self.guild = Some(GuildBinding::new(guild_id, name, stored));
                return Ok(State::SelectOperation);
            }
            warn!("database is bound to guild {guild_id}, which the bot can't see");
        }
        Ok(State::SelectServer)
    }

    async fn select_server(&mut self) -> Result<State> {
        let input = match menu::prompt("Server ID").await? {
            Some(input) => input,
            None => return Ok(State::Exit),
        };
        let guild_id: u64 = match input.parse() {
            Ok(id) => id,
            Err(_) => {
                menu::error("Server IDs are numeric.");
                return Ok(State::SelectServer);
            }
        };
        let name = match self.platform.guild_name(GuildId(guild_id)) {
            Some(name) => name,
            None => {
                menu::error("Server does not exist, or bot is not in the server.");
                return Ok(State::SelectServer);
            }
        };

        let stored = self.database()?.read_only_db_call(|db| db.get_guild_identity())?;
        let next = match bind_server(stored, guild_id) {
            Ok(next) => next,
            Err(bound) => {
                warn!("refusing to export guild {guild_id} into a database of guild {bound}");
                menu::error(&format!(
                    "This database already holds server {bound}, pick another database for {name}."
                ));
                return Ok(State::SelectDatabase);
            }
        };

        if next == State::Running(Operation::Settings) {
            menu::info("First export of this server, logging its settings first.");
        }
        self.guild = Some(GuildBinding::new(guild_id, name, stored));
        Ok(next)
    }

    async fn select_operation(&self) -> Result<State> {
        let guild = self.guild()?;
        menu::print_menu(&self.database()?.name(), &guild.name);

        let input = match menu::prompt("Choice").await? {
            Some(input) => input,
            None => return Ok(State::Exit),
        };
        Ok(match input.parse::<MenuChoice>() {
            Ok(MenuChoice::Run(op)) => State::Running(op),
            Ok(MenuChoice::ChangeDatabase) => State::SelectDatabase,
            Ok(MenuChoice::ChangeServer) => State::SelectServer,
            Ok(MenuChoice::Quit) => State::Exit,
            Err(()) => {
                menu::error(&format!("Unknown choice '{input}'."));
                State::SelectOperation
            }
        })
    }

    async fn run_operation(&mut self, op: Operation) -> Result<State> {
        let database = self.database()?;
        let guild = self.guild()?;
        let export = Export {
            database,
            platform: &self.platform,
            downloader: &self.downloader,
            guild: GuildId(guild.guild_id),
            guild_dir: self.config.guild_dir(guild.guild_id),
        };
        export.run(op).await?;

        if op == Operation::Settings {
            let stored = database.read_only_db_call(|db| db.get_guild_identity())?;
            if let Some(binding) = self.guild.as_mut() {
                binding.is_first_run = is_first_run(stored, binding.guild_id);
            }
        }
        Ok(State::SelectOperation)
    }

    fn database(&self) -> Result<&Database> {
        self.database
            .as_ref()
            .ok_or(Error::ConstStr("No database selected."))
    }

    fn guild(&self) -> Result<&GuildBinding> {
        self.guild
            .as_ref()
            .ok_or(Error::ConstStr("No server selected."))
    }
}
