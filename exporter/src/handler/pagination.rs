//! Cursor based paging through platform collections.
//!
//! The platform returns at most `page_size` items created after a given
//! snowflake. Snowflakes are time ordered, so the highest id of a page is
//! the cursor for the next one. A short page means the collection is
//! exhausted, which assumes nobody writes into already paged history while
//! the export runs.

use crate::errors::Result;

use log::{trace, warn};
use serenity::async_trait;

#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;

    fn page_size(&self) -> u64;

    /// Up to `page_size` items with an id greater than `after`.
    async fn fetch_page(&self, after: u64) -> Result<Vec<Self::Item>>;

    fn cursor_of(&self, item: &Self::Item) -> u64;
}

#[derive(Debug)]
pub struct PageCursor<S> {
    source: S,
    after: u64,
    exhausted: bool,
}

impl<S: PageSource> PageCursor<S> {
    pub const fn new(source: S, resume_from: u64) -> PageCursor<S> {
        PageCursor {
            source,
            after: resume_from,
            exhausted: false,
        }
    }

    #[inline]
    pub const fn position(&self) -> u64 {
        self.after
    }

    /// Fetches the next page, or `None` once the source is exhausted. Once
    /// exhausted the cursor never touches the source again.
    ///
    /// A failed fetch is treated as the end of the collection, so a
    /// transient platform error truncates this pass. The next run resumes
    /// from what was stored.
    pub async fn next_page(&mut self) -> Option<Vec<S::Item>> {
        if self.exhausted {
            return None;
        }

        let page = match self.source.fetch_page(self.after).await {
            Ok(page) => page,
            Err(why) => {
                warn!(
                    "fetching page after {} failed, treating as end of history: {why}",
                    self.after
                );
                self.exhausted = true;
                return None;
            }
        };
        trace!("fetched {} items after {}", page.len(), self.after);

        if (page.len() as u64) < self.source.page_size() {
            self.exhausted = true;
        }

        match page.iter().map(|item| self.source.cursor_of(item)).max() {
            Some(next) if next > self.after => self.after = next,
            // a page that doesn't move the cursor would be fetched forever
            _ => self.exhausted = true,
        }

        if page.is_empty() {
            None
        } else {
            Some(page)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::errors::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In memory collection served the way the platform pages it.
    pub(crate) struct FakeSource<T> {
        pub items: Vec<T>,
        pub page_size: u64,
        pub id_of: fn(&T) -> u64,
        pub fail_after: Option<usize>,
        pub calls: AtomicUsize,
        pub requested: Mutex<Vec<u64>>,
    }

    impl<T> FakeSource<T> {
        pub fn new(items: Vec<T>, page_size: u64, id_of: fn(&T) -> u64) -> FakeSource<T> {
            FakeSource {
                items,
                page_size,
                id_of,
                fail_after: None,
                calls: AtomicUsize::new(0),
                requested: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<'a, T: Clone + Send + Sync> PageSource for &'a FakeSource<T> {
        type Item = T;

        fn page_size(&self) -> u64 {
            self.page_size
        }

        async fn fetch_page(&self, after: u64) -> Result<Vec<T>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(after);
            if self.fail_after.map_or(false, |n| call >= n) {
                return Err(Error::ConstStr("platform unavailable"));
            }

            let mut page: Vec<T> = self
                .items
                .iter()
                .filter(|item| (self.id_of)(item) > after)
                .cloned()
                .collect();
            page.sort_by_key(self.id_of);
            page.truncate(self.page_size as usize);
            // the platform hands pages back newest first
            page.reverse();
            Ok(page)
        }

        fn cursor_of(&self, item: &T) -> u64 {
            (self.id_of)(item)
        }
    }

    fn ids(count: u64) -> Vec<u64> {
        (1..=count).collect()
    }

    async fn drain<S: PageSource>(cursor: &mut PageCursor<S>) -> Vec<Vec<S::Item>> {
        let mut pages = Vec::new();
        while let Some(page) = cursor.next_page().await {
            pages.push(page);
        }
        pages
    }

    #[tokio::test]
    async fn test_walks_every_page() {
        let source = FakeSource::new(ids(25), 10, |id| *id);
        let mut cursor = PageCursor::new(&source, 0);

        let pages = drain(&mut cursor).await;

        assert_eq!(pages.iter().map(Vec::len).collect::<Vec<_>>(), vec![10, 10, 5]);
        assert_eq!(*source.requested.lock().unwrap(), vec![0, 10, 20]);
        assert_eq!(cursor.position(), 25);
        assert!(cursor.next_page().await.is_none());
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_short_page_terminates_exactly_once() {
        let source = FakeSource::new(ids(5), 10, |id| *id);
        let mut cursor = PageCursor::new(&source, 0);

        assert_eq!(cursor.next_page().await.map(|p| p.len()), Some(5));
        assert!(cursor.next_page().await.is_none());
        assert!(cursor.next_page().await.is_none());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_full_last_page_needs_one_empty_fetch() {
        let source = FakeSource::new(ids(20), 10, |id| *id);
        let mut cursor = PageCursor::new(&source, 0);

        let pages = drain(&mut cursor).await;

        assert_eq!(pages.len(), 2);
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_resumes_from_cursor() {
        let source = FakeSource::new(ids(30), 10, |id| *id);
        let mut cursor = PageCursor::new(&source, 27);

        let pages = drain(&mut cursor).await;

        assert_eq!(pages.concat(), vec![30, 29, 28]);
    }

    #[tokio::test]
    async fn test_fetch_error_ends_pass() {
        let mut source = FakeSource::new(ids(50), 10, |id| *id);
        source.fail_after = Some(2);
        let mut cursor = PageCursor::new(&source, 0);

        let pages = drain(&mut cursor).await;

        assert_eq!(pages.len(), 2);
        assert!(cursor.next_page().await.is_none());
        assert_eq!(source.calls(), 3);
    }
}
