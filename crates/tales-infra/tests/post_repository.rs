//! End-to-end repository scenarios over the in-memory adapters.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use tales_core::domain::{AuthorProfile, PostDraft, PostPatch};
use tales_core::search;
use tales_core::{ErrorKind, PostRepository};
use tales_infra::{BroadcastNotifier, InMemoryPostStore, SessionIdentity};

struct Harness {
    repo: PostRepository,
    session: Arc<SessionIdentity>,
    store: Arc<InMemoryPostStore>,
    notifier: Arc<BroadcastNotifier>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryPostStore::new());
    let session = Arc::new(SessionIdentity::new());
    let notifier = Arc::new(BroadcastNotifier::new(16));
    let repo = PostRepository::new(store.clone(), session.clone(), notifier.clone());
    Harness {
        repo,
        session,
        store,
        notifier,
    }
}

async fn sign_in_as(h: &Harness, name: &str) -> Uuid {
    let user = Uuid::new_v4();
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    h.store
        .upsert_profile(user, AuthorProfile::new(name, email))
        .await;
    h.session.sign_in(user).await;
    user
}

#[tokio::test]
async fn test_create_then_list_includes_exactly_one_new_post() {
    let h = harness();
    let user = sign_in_as(&h, "John Doe").await;
    let started = Utc::now();

    let created = h
        .repo
        .create(PostDraft::new("Adventures in the Swiss Alps", "Hiking above Interlaken.").with_destination("Switzerland"))
        .await
        .unwrap();

    let feed = h.repo.list_all().await.unwrap();
    let matching: Vec<_> = feed
        .iter()
        .filter(|p| p.title == "Adventures in the Swiss Alps" && p.content == "Hiking above Interlaken.")
        .collect();

    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, created.id);
    assert_eq!(matching[0].author_id, user);
    assert!(matching[0].created_at >= started);
    assert_eq!(matching[0].author_name(), Some("John Doe"));
}

#[tokio::test]
async fn test_create_signed_out_fails_and_leaves_cache() {
    let h = harness();
    sign_in_as(&h, "Jane Smith").await;
    h.repo
        .create(PostDraft::new("Northern Lights", "Aurora over Iceland."))
        .await
        .unwrap();
    h.session.sign_out().await;
    let mut notifications = h.notifier.subscribe();

    let err = h
        .repo
        .create(PostDraft::new("Ghost post", "Nobody wrote this."))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Unauthenticated);
    assert_eq!(h.repo.posts().len(), 1);
    assert!(notifications.recv().await.unwrap().is_error());
}

#[tokio::test]
async fn test_delete_removes_post_and_strangers_cannot_delete() {
    let h = harness();
    sign_in_as(&h, "John Doe").await;
    let post = h
        .repo
        .create(PostDraft::new("Sunset in Santorini", "Blue domes."))
        .await
        .unwrap();

    sign_in_as(&h, "Mike Johnson").await;
    let err = h.repo.delete(post.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(h.repo.list_all().await.unwrap().len(), 1);

    h.session.sign_in(post.author_id).await;
    h.repo.delete(post.id).await.unwrap();

    let feed = h.repo.list_all().await.unwrap();
    assert!(feed.iter().all(|p| p.id != post.id));
}

#[tokio::test]
async fn test_update_title_changes_nothing_else() {
    let h = harness();
    sign_in_as(&h, "Jane Smith").await;
    let post = h
        .repo
        .create(
            PostDraft::new("Temples of Kyoto", "Bamboo forest walks.")
                .with_destination("Japan")
                .with_image_url("https://example.com/kyoto.jpg"),
        )
        .await
        .unwrap();

    let updated = h
        .repo
        .update(post.id, PostPatch::new().title("Temples and Gardens of Kyoto"))
        .await
        .unwrap();

    assert_eq!(updated.title, "Temples and Gardens of Kyoto");
    assert_eq!(updated.content, post.content);
    assert_eq!(updated.destination, post.destination);
    assert_eq!(updated.image_url, post.image_url);
    assert_eq!(updated.author_id, post.author_id);
    assert_eq!(updated.created_at, post.created_at);
    assert_eq!(updated.id, post.id);
}

#[tokio::test]
async fn test_list_by_unknown_author_is_empty() {
    let h = harness();
    sign_in_as(&h, "John Doe").await;
    h.repo
        .create(PostDraft::new("Fjords", "Ferry rides."))
        .await
        .unwrap();

    assert!(h.repo.list_by_author(Uuid::new_v4()).await.is_empty());
}

#[tokio::test]
async fn test_dashboard_lists_only_own_posts_newest_first() {
    let h = harness();
    let john = sign_in_as(&h, "John Doe").await;
    h.repo
        .create(PostDraft::new("First trip", "Zurich."))
        .await
        .unwrap();
    h.repo
        .create(PostDraft::new("Second trip", "Lucerne."))
        .await
        .unwrap();
    sign_in_as(&h, "Jane Smith").await;
    h.repo
        .create(PostDraft::new("Jane's trip", "Reykjavik."))
        .await
        .unwrap();

    let mine: Vec<_> = h
        .repo
        .list_by_author(john)
        .await
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(mine, ["Second trip", "First trip"]);
}

#[tokio::test]
async fn test_search_over_feed_matches_destination_and_author() {
    let h = harness();
    sign_in_as(&h, "John Doe").await;
    h.repo
        .create(PostDraft::new("Adventures in the Alps", "Mountain huts.").with_destination("Switzerland"))
        .await
        .unwrap();
    sign_in_as(&h, "Jane Smith").await;
    h.repo
        .create(PostDraft::new("Northern Lights", "Geysers and waterfalls.").with_destination("Iceland"))
        .await
        .unwrap();

    let feed = h.repo.posts();

    let swiss = search::filter_posts("switzerland", &feed);
    assert_eq!(swiss.len(), 1);
    assert_eq!(swiss[0].destination.as_deref(), Some("Switzerland"));

    let jane = h.repo.search("jane");
    assert_eq!(jane.len(), 1);
    assert_eq!(jane[0].title, "Northern Lights");

    assert_eq!(search::filter_posts("", &feed).len(), feed.len());
    assert_eq!(
        search::popular_destinations(&feed, 6),
        ["Iceland", "Switzerland"]
    );
}

#[tokio::test]
async fn test_signed_out_update_and_delete_are_unauthenticated() {
    let h = harness();
    sign_in_as(&h, "John Doe").await;
    let post = h
        .repo
        .create(PostDraft::new("Cliffs of Moher", "Wind and rain."))
        .await
        .unwrap();
    h.session.sign_out().await;

    let err = h
        .repo
        .update(post.id, PostPatch::new().title("Cliffs of Nowhere"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);

    let err = h.repo.delete(post.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);

    let feed = h.repo.list_all().await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].title, "Cliffs of Moher");
}
