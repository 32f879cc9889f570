use std::collections::HashMap;

use serde_json::Value;

use crate::extract::extract_hashtags;

/// Running hashtag tally of one run.
///
/// Every extracted hashtag increments its own entry, so a tag used twice in
/// one post counts twice. `posts_with_hashtags` counts each post that
/// produced at least one hashtag once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashtagCounts {
    counts: HashMap<String, u64>,
    posts_with_hashtags: usize,
}

impl HashtagCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts the hashtags of `post` and counts them.
    pub fn add_post(&mut self, post: &Value) {
        self.add_hashtags(extract_hashtags(post));
    }

    /// Counts the hashtags of one post.
    pub fn add_hashtags<I>(&mut self, hashtags: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut any = false;
        for hashtag in hashtags {
            *self.counts.entry(hashtag).or_insert(0) += 1;
            any = true;
        }
        if any {
            self.posts_with_hashtags += 1;
        }
    }

    /// Folds another tally into this one.
    pub fn merge(&mut self, other: HashtagCounts) {
        for (hashtag, count) in other.counts {
            *self.counts.entry(hashtag).or_insert(0) += count;
        }
        self.posts_with_hashtags += other.posts_with_hashtags;
    }

    pub fn get(&self, hashtag: &str) -> Option<u64> {
        self.counts.get(hashtag).copied()
    }

    pub fn counts(&self) -> &HashMap<String, u64> {
        &self.counts
    }

    pub fn posts_with_hashtags(&self) -> usize {
        self.posts_with_hashtags
    }

    /// Number of distinct hashtags.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Sum over all counts.
    pub fn total_uses(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

///Counts the hashtags of all `posts`, in order.
/// # Example
/// ```
/// use mastodon_hashtags::aggregate;
/// let post = serde_json::json!({"tag": [{"type": "Hashtag", "name": "mastodon"}]});
/// let counts = aggregate(vec![&post, &post]);
/// assert_eq!(counts.get("mastodon"), Some(2));
/// assert_eq!(counts.posts_with_hashtags(), 2);
/// ```
pub fn aggregate<'a, I>(posts: I) -> HashtagCounts
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut counts = HashtagCounts::new();
    for post in posts {
        counts.add_post(post);
    }
    counts
}
