//! Cached feed state shared by every handle of a `PostRepository`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::sync::watch;

use crate::domain::Post;

/// The cached post list plus the loading flag.
///
/// Every fetch takes a ticket with a sequence number. A response is only
/// applied if its ticket is newer than the last applied one, so a slow
/// fetch cannot overwrite a fresher list.
pub(crate) struct FeedState {
    posts: watch::Sender<Arc<[Post]>>,
    loading: watch::Sender<bool>,
    issued: AtomicU64,
    applied: AtomicU64,
    in_flight: AtomicUsize,
}

impl FeedState {
    pub(crate) fn new() -> Self {
        let (posts, _) = watch::channel(Arc::<[Post]>::from(Vec::new()));
        let (loading, _) = watch::channel(false);
        Self {
            posts,
            loading,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn snapshot(&self) -> Arc<[Post]> {
        self.posts.borrow().clone()
    }

    pub(crate) fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub(crate) fn subscribe_posts(&self) -> watch::Receiver<Arc<[Post]>> {
        self.posts.subscribe()
    }

    pub(crate) fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Start a fetch: bump the sequence and raise the loading flag.
    pub(crate) fn begin_fetch(&self) -> FetchTicket<'_> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        // The counter is only touched under the watch lock.
        self.loading.send_modify(|flag| {
            self.in_flight.fetch_add(1, Ordering::Relaxed);
            *flag = true;
        });
        FetchTicket { feed: self, seq }
    }
}

/// An in-flight fetch. Dropping it lowers the loading flag once no other
/// fetch is outstanding.
pub(crate) struct FetchTicket<'a> {
    feed: &'a FeedState,
    seq: u64,
}

impl FetchTicket<'_> {
    /// Replace the cache with `posts` unless a newer fetch already landed.
    /// Returns the cache as it stands afterwards.
    pub(crate) fn apply(&self, posts: Vec<Post>) -> Arc<[Post]> {
        let seq = self.seq;
        let applied = self.feed.posts.send_if_modified(|current| {
            if seq <= self.feed.applied.load(Ordering::SeqCst) {
                return false;
            }
            self.feed.applied.store(seq, Ordering::SeqCst);
            *current = Arc::from(posts);
            true
        });

        if !applied {
            tracing::debug!(seq, "Discarding stale feed response");
        }
        self.feed.snapshot()
    }
}

impl Drop for FetchTicket<'_> {
    fn drop(&mut self) {
        let in_flight = &self.feed.in_flight;
        self.feed.loading.send_modify(|flag| {
            let remaining = in_flight.fetch_sub(1, Ordering::Relaxed) - 1;
            *flag = remaining > 0;
        });
    }
}
