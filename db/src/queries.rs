use crate::structs::Document;

use rusqlite::types::Type;
use rusqlite::{Connection, Error, OptionalExtension, Result, Statement, ToSql};

#[inline(always)]
pub fn get_version(conn: &Connection) -> Result<u32> {
    conn.query_row("SELECT user_version FROM pragma_user_version;", [], |row| {
        row.get(0)
    })
}

#[inline(always)]
pub fn set_version(conn: &Connection, version: u32) -> Result<()> {
    conn.pragma_update(None, "user_version", version)
}

#[inline(always)]
pub fn encode<T: Document>(record: &T) -> Result<String> {
    serde_json::to_string(record).map_err(|err| Error::ToSqlConversionFailure(Box::new(err)))
}

#[inline(always)]
pub fn decode<T: Document>(doc: &str) -> Result<T> {
    serde_json::from_str(doc).map_err(|err| Error::FromSqlConversionFailure(0, Type::Text, Box::new(err)))
}

#[inline(always)]
pub fn get_document<T: Document>(conn: &Connection, id: u64) -> Result<Option<T>> {
    let doc: Option<String> = conn
        .query_row(
            &format!("SELECT doc FROM {} WHERE id=(?1)", T::COLLECTION),
            [id],
            |row| row.get(0),
        )
        .optional()?;

    doc.map(|d| decode(&d)).transpose()
}

/// `INSERT` for one record of `T`. With `replace` a stored record under the
/// same id is overwritten, without it the stored record wins.
pub fn insert_sql<T: Document>(replace: bool) -> String {
    let (columns, values, update) = if T::INDEXED {
        (
            "id, channel_id, timestamp, doc",
            "?1, ?2, ?3, ?4",
            "channel_id=excluded.channel_id, timestamp=excluded.timestamp, doc=excluded.doc",
        )
    } else {
        ("id, doc", "?1, ?2", "doc=excluded.doc")
    };
    let on_conflict = if replace {
        format!("DO UPDATE SET {update}")
    } else {
        String::from("DO NOTHING")
    };

    format!(
        "INSERT INTO {} ({columns}) VALUES ( {values} ) ON CONFLICT(id) {on_conflict}",
        T::COLLECTION
    )
}

/// Runs a statement built by [`insert_sql`] for `record`, returning the
/// number of rows changed.
pub fn insert_record<T: Document>(stmt: &mut Statement<'_>, record: &T) -> Result<usize> {
    let id = record.id();
    let channel_id = record.channel_id();
    let timestamp = record.timestamp();
    let doc = encode(record)?;

    let mut params: Vec<&dyn ToSql> = vec![&id];
    if T::INDEXED {
        params.push(&channel_id);
        params.push(&timestamp);
    }
    params.push(&doc);
    stmt.execute(params.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::{MessageRecord, RoleRecord};

    #[test]
    fn test_insert_sql() {
        assert_eq!(
            insert_sql::<RoleRecord>(false),
            "INSERT INTO role (id, doc) VALUES ( ?1, ?2 ) ON CONFLICT(id) DO NOTHING"
        );
        assert_eq!(
            insert_sql::<MessageRecord>(true),
            "INSERT INTO message (id, channel_id, timestamp, doc) VALUES ( ?1, ?2, ?3, ?4 ) \
             ON CONFLICT(id) DO UPDATE SET \
             channel_id=excluded.channel_id, timestamp=excluded.timestamp, doc=excluded.doc"
        );
    }
}
