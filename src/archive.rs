//! Locating archive files and streaming posts out of them.
//!
//! An outbox export can be several gigabytes, so the outer collection is
//! never decoded into one [`Value`] tree. The deserializer walks the top-level
//! array (or the `orderedItems`/`items` array of a collection object) and
//! hands each post to the caller as soon as it is complete.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::error::{HashtagError, Result};

/// Keys of a collection object that hold its posts.
const ITEM_KEYS: [&str; 2] = ["orderedItems", "items"];

/// Resolves `path` into the list of JSON files to read.
///
/// A file is returned as is. For a directory, every `*.json` file directly
/// inside it (or anywhere below it with `recursive`) is returned, sorted by
/// path. A missing path or a directory without JSON files is a
/// configuration error.
pub fn discover_json_files(path: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(HashtagError::Configuration(format!(
            "archive path {} does not exist",
            path.display()
        )));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let files: Vec<PathBuf> = WalkDir::new(path)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_json(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    if files.is_empty() {
        return Err(HashtagError::Configuration(format!(
            "no JSON files found in {}",
            path.display()
        )));
    }
    debug!("Discovered {} JSON file(s) in {}", files.len(), path.display());
    Ok(files)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Streams every post of one archive file into `on_post` and returns how
/// many posts were read.
///
/// Accepted shapes: a top-level array of posts, a collection object with an
/// `orderedItems` or `items` array, or a lone post object. Array entries
/// that are not objects are ignored. Posts handed out before a syntax error
/// further down the file have already been delivered; callers that need
/// all-or-nothing semantics must buffer.
pub fn for_each_post<F>(path: &Path, mut on_post: F) -> Result<usize>
where
    F: FnMut(Value),
{
    let parse_error = |source: serde_json::Error| HashtagError::FileParse {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| HashtagError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(file));
    let mut posts = 0;
    let mut sink = |post: Value| {
        posts += 1;
        on_post(post);
    };
    ArchiveSeed { on_post: &mut sink }
        .deserialize(&mut deserializer)
        .map_err(parse_error)?;
    deserializer.end().map_err(parse_error)?;
    Ok(posts)
}

/// Reads all posts of one archive file into memory.
pub fn load_posts(path: &Path) -> Result<Vec<Value>> {
    let mut posts = Vec::new();
    for_each_post(path, |post| posts.push(post))?;
    Ok(posts)
}

/// Top level of an archive document.
struct ArchiveSeed<'a, F> {
    on_post: &'a mut F,
}

impl<'de, F> DeserializeSeed<'de> for ArchiveSeed<'_, F>
where
    F: FnMut(Value),
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de, F> Visitor<'de> for ArchiveSeed<'_, F>
where
    F: FnMut(Value),
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of posts or an outbox collection object")
    }

    fn visit_seq<A>(self, seq: A) -> std::result::Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        ItemsSeed {
            on_post: self.on_post,
        }
        .visit_seq(seq)
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        // Kept until an items array shows up, in case the object is a lone post.
        let mut fields = Map::new();
        let mut found_items = false;

        while let Some(key) = map.next_key::<String>()? {
            if !found_items && ITEM_KEYS.contains(&key.as_str()) {
                map.next_value_seed(ItemsSeed {
                    on_post: &mut *self.on_post,
                })?;
                found_items = true;
                fields.clear();
            } else if found_items {
                map.next_value::<de::IgnoredAny>()?;
            } else {
                fields.insert(key, map.next_value()?);
            }
        }

        if !found_items {
            (self.on_post)(Value::Object(fields));
        }
        Ok(())
    }
}

/// An array whose object entries are posts.
struct ItemsSeed<'a, F> {
    on_post: &'a mut F,
}

impl<'de, F> DeserializeSeed<'de> for ItemsSeed<'_, F>
where
    F: FnMut(Value),
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, F> Visitor<'de> for ItemsSeed<'_, F>
where
    F: FnMut(Value),
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of posts")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        while let Some(item) = seq.next_element::<Value>()? {
            if item.is_object() {
                (self.on_post)(item);
            }
        }
        Ok(())
    }
}
