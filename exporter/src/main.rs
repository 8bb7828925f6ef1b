#![warn(
    clippy::cognitive_complexity,
    clippy::missing_const_for_fn,
    clippy::option_if_let_else
)]

mod config;
mod errors;
mod handler;
mod structs;

use log::error;
use log::LevelFilter;
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use simple_logger::SimpleLogger;

use std::process;

use config::Config;
use handler::Handler;

#[tokio::main]
async fn main() {
    let level = config::log_level();
    if let Err(why) = SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .with_module_level("exporter", level)
        .with_module_level("db", level)
        .init()
    {
        eprintln!("failed to start logger: {why}");
        process::exit(1);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(why) => {
            error!("{why}");
            process::exit(1);
        }
    };
    let token = config.token.clone();

    let intents = GatewayIntents::GUILDS
        .union(GatewayIntents::GUILD_MEMBERS)
        .union(GatewayIntents::GUILD_MESSAGES)
        .union(GatewayIntents::MESSAGE_CONTENT);

    let mut client = match Client::builder(&token, intents)
        .event_handler(Handler::new(config))
        .await
    {
        Ok(client) => client,
        Err(why) => {
            error!("Err creating client: {why}");
            process::exit(1);
        }
    };

    // a rejected token surfaces here, and nothing else can be done without one
    if let Err(why) = client.start().await {
        error!("Client error: {why:?}");
        process::exit(1);
    }
}
