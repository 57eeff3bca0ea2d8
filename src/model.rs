//! Wire types for the followers timeline and the records harvested from it.
//!
//! The response envelope is deeply nested:
//! `data.user.result.timeline.timeline.instructions[].entries[]`. Entries are
//! discriminated by `content.entryType`; the shapes of user items and cursor
//! markers overlap, so field absence is never used to tell them apart.

use std::fmt;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Pagination cursor as a (floor, ceiling) pair.
///
/// On the wire the two halves travel joined by [`Cursor::SEPARATOR`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub floor: String,
    pub ceiling: String,
}

impl Cursor {
    pub const SEPARATOR: char = '|';

    pub fn new(floor: impl Into<String>, ceiling: impl Into<String>) -> Self {
        Self {
            floor: floor.into(),
            ceiling: ceiling.into(),
        }
    }

    /// Parse a marker value into its two halves.
    ///
    /// The value must contain exactly one separator and both halves must be
    /// non-empty.
    pub fn parse(value: &str) -> Result<Self> {
        let (floor, ceiling) = value
            .split_once(Self::SEPARATOR)
            .ok_or_else(|| Error::malformed_cursor(format!("no separator in '{}'", value)))?;

        if ceiling.contains(Self::SEPARATOR) {
            return Err(Error::malformed_cursor(format!(
                "more than two halves in '{}'",
                value
            )));
        }
        if floor.is_empty() || ceiling.is_empty() {
            return Err(Error::malformed_cursor(format!(
                "empty half in '{}'",
                value
            )));
        }

        Ok(Self::new(floor, ceiling))
    }

    /// The transport-level token, `floor|ceiling`.
    pub fn token(&self) -> String {
        format!("{}{}{}", self.floor, Self::SEPARATOR, self.ceiling)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

/// A harvested follower.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "rest_id", default)]
    pub id: String,
    #[serde(rename = "is_blue_verified", default)]
    pub is_verified: bool,
    #[serde(default)]
    pub legacy: LegacyProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LegacyProfile {
    pub followed_by: bool,
    pub following: bool,
    pub description: String,
    pub followers_count: u64,
    pub friends_count: u64,
    pub screen_name: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FollowersResponse {
    pub data: ResponseData,
}

#[derive(Debug, Deserialize)]
pub struct ResponseData {
    pub user: UserNode,
}

#[derive(Debug, Deserialize)]
pub struct UserNode {
    pub result: UserResultNode,
}

#[derive(Debug, Deserialize)]
pub struct UserResultNode {
    pub timeline: TimelineNode,
}

#[derive(Debug, Deserialize)]
pub struct TimelineNode {
    pub timeline: Timeline,
}

#[derive(Debug, Default, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Deserialize)]
pub struct Instruction {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    #[serde(rename = "entryId", default)]
    pub entry_id: String,
    #[serde(rename = "sortIndex", default)]
    pub sort_index: String,
    pub content: EntryContent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "entryType")]
pub enum EntryContent {
    #[serde(rename = "TimelineTimelineItem")]
    Item {
        #[serde(rename = "itemContent", default)]
        item_content: ItemContent,
    },
    #[serde(rename = "TimelineTimelineCursor")]
    Cursor {
        value: String,
        #[serde(rename = "cursorType", default)]
        cursor_type: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemContent {
    pub user_results: Option<UserResults>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserResults {
    pub result: Option<UserRecord>,
}

impl Entry {
    /// The raw `floor|ceiling` value if this entry is a cursor marker.
    pub fn cursor_value(&self) -> Option<&str> {
        match &self.content {
            EntryContent::Cursor { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The nested user record if this entry is a user item carrying one.
    ///
    /// Unavailable accounts come back with an empty `user_results` or a
    /// result without `rest_id`; those yield `None`.
    pub fn user(&self) -> Option<&UserRecord> {
        match &self.content {
            EntryContent::Item { item_content } => item_content
                .user_results
                .as_ref()
                .and_then(|r| r.result.as_ref())
                .filter(|u| !u.id.is_empty()),
            _ => None,
        }
    }
}

/// One decoded page: the entries of the timeline's entry group.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub entries: Vec<Entry>,
}

impl Page {
    /// Pages carry their cursor markers as the final two entries.
    pub const MIN_ENTRIES: usize = 2;

    /// Split into (user entries, bottom marker, top marker).
    ///
    /// Returns `None` when the page has fewer than [`Page::MIN_ENTRIES`]
    /// entries, in which case it holds no cursor.
    pub fn split_markers(&self) -> Option<(&[Entry], &Entry, &Entry)> {
        match self.entries.as_slice() {
            [users @ .., bottom, top] => Some((users, bottom, top)),
            _ => None,
        }
    }
}

impl From<FollowersResponse> for Page {
    /// Takes the first `TimelineAddEntries` instruction, falling back to the
    /// first instruction of any type. No instructions yields an empty page.
    fn from(response: FollowersResponse) -> Self {
        let mut instructions = response.data.user.result.timeline.timeline.instructions;
        let index = instructions
            .iter()
            .position(|i| i.kind == "TimelineAddEntries")
            .unwrap_or(0);

        if index < instructions.len() {
            Page {
                entries: instructions.swap_remove(index).entries,
            }
        } else {
            Page::default()
        }
    }
}
