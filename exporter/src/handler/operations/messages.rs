use super::{store, Export};
use crate::errors::Result;
use crate::handler::menu;
use crate::handler::pagination::{PageCursor, PageSource};
use crate::handler::progress::Progress;

use db::structs::MessageRecord;
use db::{Database, ReadOnlyDb, BEGINNING};
use log::{debug, info};

pub async fn log_messages(export: &Export<'_>) -> Result<()> {
    let channels = export.platform.readable_text_channels(export.guild).await?;
    info!("{} readable text channels", channels.len());

    let mut total = 0;
    for channel in &channels {
        menu::info(&format!("Logging #{}", channel.name));
        let source = export.platform.messages(channel.id);
        total += log_channel(export.database, *channel.id.as_u64(), source).await?;
    }

    menu::success(&format!(
        "Logged {total} new messages across {} channels",
        channels.len()
    ));
    Ok(())
}

/// Captures everything in a channel newer than what the database already
/// holds. Returns how many messages were written.
pub async fn log_channel<S>(database: &Database, channel_id: u64, source: S) -> Result<usize>
where
    S: PageSource<Item = MessageRecord>,
{
    let resume_from = database
        .read_only_db_call(|db| db.get_newest_message(channel_id))?
        .map_or(BEGINNING, |newest| newest.id);
    debug!("resuming channel {channel_id} after {resume_from}");

    let mut cursor = PageCursor::new(source, resume_from);
    let mut progress = Progress::new("Messages", None);
    while let Some(page) = cursor.next_page().await {
        progress.advance(store(database, &page)?);
    }
    debug!("channel {channel_id} exhausted at {}", cursor.position());

    let written = progress.done();
    progress.finish();
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::operations::tests::message;
    use crate::handler::pagination::tests::FakeSource;

    use db::WriteableDb;

    fn history(ids: std::ops::RangeInclusive<u64>) -> Vec<MessageRecord> {
        ids.map(|id| message(id, 1, &[])).collect()
    }

    fn open(dir: &tempfile::TempDir) -> Database {
        Database::open(dir.path().join("test.db3")).unwrap()
    }

    #[tokio::test]
    async fn test_captures_whole_channel() {
        let dir = tempfile::tempdir().unwrap();
        let database = open(&dir);
        let source = FakeSource::new(history(1..=250), 100, |m: &MessageRecord| m.id);

        let written = log_channel(&database, 1, &source).await.unwrap();

        assert_eq!(written, 250);
        let stored = database
            .read_only_db_call(|db| db.count_channel_messages(1))
            .unwrap();
        assert_eq!(stored, 250);
    }

    #[tokio::test]
    async fn test_resume_captures_only_new_messages() {
        let dir = tempfile::tempdir().unwrap();
        let database = open(&dir);
        let source = FakeSource::new(history(1..=40), 100, |m: &MessageRecord| m.id);
        log_channel(&database, 1, &source).await.unwrap();

        let source = FakeSource::new(history(1..=55), 10, |m: &MessageRecord| m.id);
        let written = log_channel(&database, 1, &source).await.unwrap();

        assert_eq!(written, 15);
        assert_eq!(source.requested.lock().unwrap()[0], 40);
        let stored = database
            .read_only_db_call(|db| db.count_channel_messages(1))
            .unwrap();
        assert_eq!(stored, 55);
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let database = open(&dir);
        let source = FakeSource::new(history(1..=30), 100, |m: &MessageRecord| m.id);
        log_channel(&database, 1, &source).await.unwrap();
        let before = database
            .read_only_db_call(|db| db.get_all::<MessageRecord>())
            .unwrap();

        let written = log_channel(&database, 1, &source).await.unwrap();

        assert_eq!(written, 0);
        let after = database
            .read_only_db_call(|db| db.get_all::<MessageRecord>())
            .unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_channels_resume_independently() {
        let dir = tempfile::tempdir().unwrap();
        let database = open(&dir);
        database
            .writable_db_call(|mut db| db.upsert_batch(&[message(500, 2, &[])]))
            .unwrap();

        let source = FakeSource::new(history(1..=5), 100, |m: &MessageRecord| m.id);
        let written = log_channel(&database, 1, &source).await.unwrap();

        assert_eq!(written, 5);
        assert_eq!(*source.requested.lock().unwrap(), vec![BEGINNING]);
    }
}
