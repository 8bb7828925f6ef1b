use crate::connections::GetConnectionMutable;
use crate::queries;
use crate::structs::{Document, UserRecord};
use crate::ReadOnlyDb;

use chrono::Utc;
use log::{debug, info};
use rusqlite::Result;

pub trait WriteableDb: GetConnectionMutable + ReadOnlyDb {
    /// Inserts every record, replacing whatever is stored under the same id.
    /// The batch runs in one transaction, any failing record rolls back the
    /// whole batch. Returns the number of records written.
    #[inline]
    fn upsert_batch<T: Document>(&mut self, records: &[T]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let tx = self.get_mutable_connection().transaction()?;
        {
            let mut stmt = tx.prepare(&queries::insert_sql::<T>(true))?;
            for record in records {
                queries::insert_record(&mut stmt, record)?;
            }
        }
        tx.commit()?;

        debug!("upserted {} records into {}", records.len(), T::COLLECTION);
        Ok(records.len())
    }

    /// Inserts records whose id is not stored yet, existing records are left
    /// untouched. Returns the number of records actually inserted.
    #[inline]
    fn insert_if_absent_batch<T: Document>(&mut self, records: &[T]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let tx = self.get_mutable_connection().transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&queries::insert_sql::<T>(false))?;
            for record in records {
                inserted += queries::insert_record(&mut stmt, record)?;
            }
        }
        tx.commit()?;

        Ok(inserted)
    }

    /// Writes users, never letting a deleted-account placeholder replace a
    /// record captured while the account still existed.
    #[inline]
    fn write_users(&mut self, users: &[UserRecord]) -> Result<usize> {
        let (placeholders, real): (Vec<UserRecord>, Vec<UserRecord>) = users
            .iter()
            .cloned()
            .partition(UserRecord::is_deleted_placeholder);

        let written = self.upsert_batch(&real)?;
        let inserted = self.insert_if_absent_batch(&placeholders)?;
        if !placeholders.is_empty() {
            debug!(
                "{} of {} deleted user placeholders were new",
                inserted,
                placeholders.len()
            );
        }

        Ok(written + inserted)
    }

    #[inline]
    fn set_guild_identity(&self, guild_id: u64) -> Result<()> {
        let count = self.get_connection().execute(
            "INSERT INTO guild_identity (key, guild_id, bound_at) VALUES ( 0, ?1, ?2 )
            ON CONFLICT(key) DO UPDATE SET
                guild_id=excluded.guild_id,
                bound_at=excluded.bound_at
            WHERE (guild_identity.guild_id != excluded.guild_id)",
            (guild_id, Utc::now()),
        )?;

        if count > 0 {
            info!("bound database to guild {guild_id}");
        }
        Ok(())
    }
}
