mod migrations;
mod queries;
mod read_only_db;
pub mod structs;
mod writeable_db;

pub use read_only_db::ReadOnlyDb;
pub use writeable_db::WriteableDb;

use log::debug;
use rusqlite::{Connection, OpenFlags, Result};
use std::path::{Path, PathBuf};

/// Cursor value meaning "no message captured yet, start from the beginning".
pub const BEGINNING: u64 = 0;

pub(crate) mod connections {
    use rusqlite::{Connection, Params, Result};

    pub trait GetConnectionImmutable {
        fn get_connection(&self) -> &Connection;

        #[inline(always)]
        fn execute<P: Params>(&self, sql: &str, params: P) -> Result<()> {
            self.get_connection().execute(sql, params)?;
            Ok(())
        }
    }

    pub trait GetConnectionMutable {
        fn get_mutable_connection(&mut self) -> &mut Connection;
    }
}

pub struct ReadOnlyConn {
    conn: Connection,
}

impl connections::GetConnectionImmutable for ReadOnlyConn {
    #[inline]
    fn get_connection(&self) -> &Connection {
        &self.conn
    }
}

impl ReadOnlyDb for ReadOnlyConn {}

pub struct WriteableConn {
    conn: Connection,
}

impl connections::GetConnectionImmutable for WriteableConn {
    #[inline]
    fn get_connection(&self) -> &Connection {
        &self.conn
    }
}

impl connections::GetConnectionMutable for WriteableConn {
    #[inline]
    fn get_mutable_connection(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl ReadOnlyDb for WriteableConn {}

impl WriteableDb for WriteableConn {}

impl WriteableConn {
    /// A migrated, private in-memory database. Dropping the connection
    /// drops the data.
    #[inline]
    pub fn open_in_memory() -> Result<WriteableConn> {
        let mut conn = Connection::open_in_memory()?;
        migrations::migrate(&mut conn)?;
        Ok(WriteableConn { conn })
    }
}

/// A storage namespace backed by one database file. Every database holds
/// the snapshot of exactly one guild.
///
/// Connections are opened per call rather than held, so a `Database` can be
/// shared across awaits freely and rebound by simply replacing it.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Opens (creating if needed) and migrates the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Database> {
        let path = path.as_ref().to_path_buf();
        debug!("opening database at {}", path.display());
        migrations::migrate(&mut Connection::open(&path)?)?;
        Ok(Database { path })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Database name, the file stem of the backing file.
    #[inline]
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    #[inline]
    pub fn get_read_only_db(&self) -> Result<ReadOnlyConn> {
        Ok(ReadOnlyConn {
            conn: Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?,
        })
    }

    #[inline]
    pub fn get_writeable_db(&self) -> Result<WriteableConn> {
        Ok(WriteableConn {
            conn: Connection::open(&self.path)?,
        })
    }

    #[inline]
    pub fn writable_db_call<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(WriteableConn) -> Result<T>,
    {
        f(self.get_writeable_db()?)
    }

    #[inline]
    pub fn read_only_db_call<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(ReadOnlyConn) -> Result<T>,
    {
        f(self.get_read_only_db()?)
    }
}
