//! Rebuilds per-index sub-records from flatly named player keys.
//!
//! `getplayerinfo` reports weapon, vehicle, class and army statistics as
//! `<prefix><metric>-<index>` keys, e.g. `wkl-3` is the kill count of weapon 3.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::normalize::Record;

/// Indices above this are left ungrouped to bound the sparse list.
pub const MAX_GROUP_INDEX: usize = 4_096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupCategory {
    Army,
    Class,
    Vehicle,
    Weapon,
}

impl GroupCategory {
    pub const ALL: [Self; 4] = [Self::Army, Self::Class, Self::Vehicle, Self::Weapon];

    pub const fn prefix(self) -> char {
        match self {
            Self::Army => 'a',
            Self::Class => 'k',
            Self::Vehicle => 'v',
            Self::Weapon => 'w',
        }
    }
}

/// One recovered sub-record, e.g. the stats of a single weapon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedRecord {
    pub id: usize,
    pub metrics: Record,
}

impl GroupedRecord {
    fn new(id: usize) -> Self {
        Self {
            id,
            metrics: Record::new(),
        }
    }
}

impl Serialize for GroupedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metrics.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for (key, value) in self.metrics.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Sparse per-index list; unseen indices stay `None` and serialize as `null`.
pub type GroupedList = Vec<Option<GroupedRecord>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedStats {
    pub armies: GroupedList,
    pub classes: GroupedList,
    pub vehicles: GroupedList,
    pub weapons: GroupedList,
}

/// Runs one independent pass per category over a player record.
pub fn group_player(player: &Record) -> GroupedStats {
    GroupedStats {
        armies: group_by_category(player, GroupCategory::Army),
        classes: group_by_category(player, GroupCategory::Class),
        vehicles: group_by_category(player, GroupCategory::Vehicle),
        weapons: group_by_category(player, GroupCategory::Weapon),
    }
}

pub fn group_by_category(player: &Record, category: GroupCategory) -> GroupedList {
    let mut grouped = GroupedList::new();

    for (key, value) in player.iter() {
        let Some((metric, index)) = scan_key(key, category.prefix()) else {
            continue;
        };
        if metric == "id" {
            continue;
        }

        if grouped.len() <= index {
            grouped.resize(index + 1, None);
        }
        grouped[index]
            .get_or_insert_with(|| GroupedRecord::new(index))
            .metrics
            .insert(metric, value);
    }

    grouped
}

/// Accepts exactly `<prefix><ASCII letters>-<ASCII digits>`.
fn scan_key(key: &str, prefix: char) -> Option<(&str, usize)> {
    let rest = key.strip_prefix(prefix)?;
    let letters = rest
        .find(|ch: char| !ch.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    if letters == 0 {
        return None;
    }

    let (metric, tail) = rest.split_at(letters);
    let digits = tail.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let index = digits.parse::<usize>().ok()?;
    (index <= MAX_GROUP_INDEX).then_some((metric, index))
}
