mod assets;
mod menu;
mod operations;
mod pagination;
mod platform;
mod progress;
mod session;

use crate::config::Config;
use platform::Platform;
use session::Session;

use log::{error, info};
use serenity::{
    async_trait,
    model::{gateway::Ready, id::GuildId},
    prelude::*,
};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Gateway event handler. Its only job is to start the interactive session
/// once the cache knows which guilds the bot is in.
pub struct Handler {
    config: Arc<Config>,
    started: AtomicBool,
}

impl Handler {
    pub fn new(config: Config) -> Handler {
        Handler {
            config: Arc::new(config),
            started: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _: Context, ready: Ready) {
        info!(
            "{} is connected, member of {} guilds",
            ready.user.name,
            ready.guilds.len()
        );
    }

    async fn cache_ready(&self, ctx: Context, guilds: Vec<GuildId>) {
        // fires again on reconnect, the session must only start once
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("cache ready with {} guilds", guilds.len());

        let platform = Platform::new(ctx.http.clone(), ctx.cache.clone());
        let session = match Session::new(self.config.clone(), platform) {
            Ok(session) => session,
            Err(why) => {
                error!("couldn't start the export session: {why}");
                process::exit(1);
            }
        };
        tokio::spawn(async move {
            match session.run().await {
                Ok(()) => process::exit(0),
                Err(why) => {
                    error!("export stopped: {why}");
                    process::exit(1);
                }
            }
        });
    }
}
