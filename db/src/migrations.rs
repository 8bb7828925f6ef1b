use super::queries;
use log::{info, trace};

use rusqlite::{Connection, Result};

macro_rules! migration {
    ( $n:literal, $( $x:literal ),* ) => {
        paste::item! {
            fn [< migration_$n >] (conn: &Connection) -> Result<()> {
                trace!("running migration {}", $n);

                $(
                    conn.execute($x, [])?;
                )*
                queries::set_version(conn, $n)?;
                trace!("finished migration {}", $n);
                Ok(())
            }
        }
    };
}

// Every collection stores the snowflake as unique key and the normalized
// record as a json document. Messages also keep their channel and creation
// time in columns so resume lookups stay on an index.
migration![
    1,
    "CREATE TABLE message (
        id INTEGER PRIMARY KEY,
        channel_id INTEGER NOT NULL,
        timestamp INTEGER NOT NULL,
        doc TEXT NOT NULL
    );",
    "CREATE TABLE role (
        id INTEGER PRIMARY KEY,
        doc TEXT NOT NULL
    );",
    "CREATE TABLE channel (
        id INTEGER PRIMARY KEY,
        doc TEXT NOT NULL
    );",
    "CREATE TABLE emoji (
        id INTEGER PRIMARY KEY,
        doc TEXT NOT NULL
    );",
    "CREATE TABLE user (
        id INTEGER PRIMARY KEY,
        doc TEXT NOT NULL
    );",
    "CREATE TABLE guild (
        id INTEGER PRIMARY KEY,
        doc TEXT NOT NULL
    );",
    // singleton binding this database to the guild it snapshots
    "CREATE TABLE guild_identity (
        key INTEGER PRIMARY KEY CHECK (key = 0),
        guild_id INTEGER NOT NULL,
        bound_at NUMERIC NOT NULL
    );",
    "CREATE INDEX idx_message_resume ON message (channel_id, timestamp DESC, id DESC);"
];

pub fn migrate(conn: &mut Connection) -> Result<()> {
    // be sure to increment this everytime a new migration is added
    const FINAL_VER: u32 = 1;

    let ver = queries::get_version(conn)?;
    info!("database version is currently: {ver} with target ver {FINAL_VER}");
    if ver == FINAL_VER {
        return Ok(());
    }

    let tx = conn.transaction()?;

    trace!("starting migration transaction");

    if ver < 1 {
        migration_1(&tx)?;
    }

    trace!("commiting migration transaction");
    tx.commit()?;
    trace!("successfully commited migration transaction");

    info!("migration successful");
    Ok(())
}
