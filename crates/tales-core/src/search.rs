//! Feed search over the cached post list.
//!
//! Plain case-insensitive substring matching over title, content,
//! destination and author name. No tokenizing, ranking or paging: the
//! input is the in-memory feed.

use std::collections::HashMap;

use crate::domain::Post;

/// Posts whose searchable fields contain `query`, in input order.
///
/// An empty query returns every post.
pub fn filter_posts<'a>(query: &str, posts: &'a [Post]) -> Vec<&'a Post> {
    if query.is_empty() {
        return posts.iter().collect();
    }
    let needle = query.to_lowercase();
    posts.iter().filter(|post| matches(post, &needle)).collect()
}

/// Whether `post` contains the already-lowercased `needle`.
pub fn matches(post: &Post, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(&post.title)
        || contains(&post.content)
        || post.destination.as_deref().is_some_and(contains)
        || post.author_name().is_some_and(contains)
}

/// Destinations ranked by how many posts mention them.
///
/// Ties keep the order in which a destination first appears in `posts`.
pub fn popular_destinations(posts: &[Post], limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, destination) in posts.iter().filter_map(|p| p.destination.as_deref()).enumerate()
    {
        counts.entry(destination).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
        count_b.cmp(count_a).then(first_a.cmp(first_b))
    });
    ranked
        .into_iter()
        .take(limit)
        .map(|(destination, _)| destination.to_string())
        .collect()
}
