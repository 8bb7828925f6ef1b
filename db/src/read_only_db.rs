use crate::connections::GetConnectionImmutable;
use crate::queries;
use crate::structs::{Document, MessageRecord};

use rusqlite::{OptionalExtension, Result};

pub trait ReadOnlyDb: GetConnectionImmutable {
    #[inline]
    fn get_document<T: Document>(&self, id: u64) -> Result<Option<T>> {
        queries::get_document(self.get_connection(), id)
    }

    /// The locally known newest message of a channel. Ties on timestamp
    /// are broken by the larger id.
    #[inline]
    fn get_newest_message(&self, channel_id: u64) -> Result<Option<MessageRecord>> {
        let doc: Option<String> = self
            .get_connection()
            .query_row(
                "SELECT doc FROM message
                WHERE channel_id=(?1)
                ORDER BY timestamp DESC, id DESC
                LIMIT 1",
                [channel_id],
                |row| row.get(0),
            )
            .optional()?;

        doc.map(|d| queries::decode(&d)).transpose()
    }

    #[inline]
    fn get_all<T: Document>(&self) -> Result<Vec<T>> {
        let mut stmt = self
            .get_connection()
            .prepare(&format!("SELECT doc FROM {} ORDER BY id", T::COLLECTION))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(queries::decode(&row?)?);
        }
        Ok(records)
    }

    #[inline]
    fn count<T: Document>(&self) -> Result<u64> {
        self.get_connection().query_row(
            &format!("SELECT COUNT(*) FROM {}", T::COLLECTION),
            [],
            |row| row.get(0),
        )
    }

    #[inline]
    fn count_channel_messages(&self, channel_id: u64) -> Result<u64> {
        self.get_connection().query_row(
            "SELECT COUNT(*) FROM message WHERE channel_id=(?1)",
            [channel_id],
            |row| row.get(0),
        )
    }

    /// Distinct author ids across every captured message.
    #[inline]
    fn get_message_authors(&self) -> Result<Vec<u64>> {
        let mut stmt = self.get_connection().prepare(
            "SELECT DISTINCT json_extract(doc, '$.author') AS author
            FROM message
            WHERE json_extract(doc, '$.author') IS NOT NULL
            ORDER BY author",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut authors = Vec::new();
        for row in rows {
            authors.push(row?)
        }
        Ok(authors)
    }

    /// Guild this database was bound to on its first run, if any.
    #[inline]
    fn get_guild_identity(&self) -> Result<Option<u64>> {
        self.get_connection()
            .query_row(
                "SELECT guild_id FROM guild_identity WHERE key=0",
                [],
                |row| row.get(0),
            )
            .optional()
    }
}
