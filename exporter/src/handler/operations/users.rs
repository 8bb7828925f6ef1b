use super::{Export, AVATARS_DIR};
use crate::errors::Result;
use crate::handler::assets::{Asset, AssetFetcher, DownloadReport, Downloader};
use crate::handler::menu;
use crate::handler::pagination::PageCursor;
use crate::handler::progress::Progress;

use db::structs::UserRecord;
use db::{Database, ReadOnlyDb, WriteableDb, BEGINNING};
use log::warn;
use std::collections::HashSet;
use std::path::Path;

/// Captures every current member plus every message author who has since
/// left, then downloads their avatars.
pub async fn log_users(export: &Export<'_>) -> Result<()> {
    let mut users = Vec::new();
    let mut cursor = PageCursor::new(export.platform.members(export.guild), BEGINNING);
    let mut progress = Progress::new("Members", None);
    while let Some(page) = cursor.next_page().await {
        progress.advance(page.len());
        users.extend(page);
    }
    progress.finish();

    let authors = export
        .database
        .read_only_db_call(|db| db.get_message_authors())?;
    let departed = departed_authors(&authors, &users);
    let mut progress = Progress::new("Former members", Some(departed.len()));
    for id in departed {
        match export.platform.user(id).await {
            Ok(user) => users.push(user),
            Err(why) => warn!("couldn't fetch user {id}: {why}"),
        }
        progress.advance(1);
    }
    progress.finish();

    let written = export
        .database
        .writable_db_call(|mut db| db.write_users(&users))?;
    menu::success(&format!("Logged {written} users"));

    let report =
        download_avatars(export.database, export.downloader, &export.asset_dir(AVATARS_DIR))
            .await?;
    menu::success(&format!(
        "Downloaded {} avatars, {} already present",
        report.downloaded, report.cached
    ));
    Ok(())
}

/// Authors with no member record among `members`, in ascending id order.
fn departed_authors(authors: &[u64], members: &[UserRecord]) -> Vec<u64> {
    let known: HashSet<u64> = members.iter().map(|m| m.id).collect();
    let mut departed: Vec<u64> = authors
        .iter()
        .copied()
        .filter(|id| !known.contains(id))
        .collect();
    departed.sort_unstable();
    departed.dedup();
    departed
}

/// Avatars of every stored user that has one.
pub async fn download_avatars<F: AssetFetcher>(
    database: &Database,
    downloader: &Downloader<F>,
    dir: &Path,
) -> Result<DownloadReport> {
    let users = database.read_only_db_call(|db| db.get_all::<UserRecord>())?;
    let assets = users.iter().filter_map(Asset::avatar).collect();
    downloader.download_all(dir, assets).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::assets::tests::FakeFetcher;
    use std::time::Duration;

    fn user(id: u64, avatar: Option<&str>) -> UserRecord {
        UserRecord {
            id,
            username: format!("user{id}"),
            discriminator: String::from("0001"),
            bot: false,
            avatar: avatar.map(String::from),
        }
    }

    #[test]
    fn test_departed_authors() {
        let members = vec![user(1, None), user(3, None)];
        assert_eq!(departed_authors(&[5, 1, 2, 3, 5], &members), vec![2, 5]);
        assert!(departed_authors(&[], &members).is_empty());
    }

    #[tokio::test]
    async fn test_download_avatars() {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::open(dir.path().join("test.db3")).unwrap();
        database
            .writable_db_call(|mut db| {
                db.write_users(&[user(1, Some("aaa")), user(2, None), user(3, Some("a_bbb"))])
            })
            .unwrap();
        let avatars = dir.path().join("avatars");
        std::fs::create_dir(&avatars).unwrap();
        std::fs::write(avatars.join("1_aaa.png"), b"avatar").unwrap();

        let fetcher = FakeFetcher::default();
        let downloader = Downloader::new(&fetcher, Duration::ZERO);
        let report = download_avatars(&database, &downloader, &avatars)
            .await
            .unwrap();

        assert_eq!(
            fetcher.calls(),
            vec![String::from("https://cdn.discordapp.com/avatars/3/a_bbb.gif")]
        );
        assert_eq!(report.total, 2);
        assert_eq!(report.cached, 1);
        assert!(avatars.join("3_a_bbb.gif").exists());
    }
}
