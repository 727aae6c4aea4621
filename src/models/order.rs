//! Ordering for lists of texts.
//!
//! A [`Comparator`] answers "is `a` ordered before `b`?" and a [`Direction`]
//! says whether to use it as-is or with its arguments swapped.
//!
//! Sorting is not stable: texts the comparator considers equal (e.g. two
//! texts logged at the same instant) may come back in a different relative
//! order from one call to the next.

use super::Text;
use std::cmp::Ordering;

/// Binary predicate: returns true if `a` sorts before `b`.
pub type Comparator = fn(&Text, &Text) -> bool;

/// Sort direction applied on top of a [`Comparator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Use the comparator directly.
    #[default]
    Ascending,
    /// Use the comparator with its arguments swapped.
    Descending,
}

impl Direction {
    /// Applies `comparator` to `a` and `b` in this direction.
    #[must_use]
    pub fn before(self, comparator: Comparator, a: &Text, b: &Text) -> bool {
        match self {
            Self::Ascending => comparator(a, b),
            Self::Descending => comparator(b, a),
        }
    }
}

/// Orders texts by timestamp; unset timestamps sort first.
#[must_use]
pub fn timestamps(a: &Text, b: &Text) -> bool {
    a.timestamp < b.timestamp
}

/// Sorts `texts` in place by `comparator` in `direction`.
pub fn sort(texts: &mut [Text], comparator: Comparator, direction: Direction) {
    texts.sort_unstable_by(|a, b| {
        if direction.before(comparator, a, b) {
            Ordering::Less
        } else if direction.before(comparator, b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TextId;
    use chrono::{TimeZone, Utc};

    fn at(id: &str, hour: u32) -> Text {
        Text {
            id: TextId::new(id),
            timestamp: Some(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()),
            ..Text::default()
        }
    }

    fn ids(texts: &[Text]) -> Vec<&str> {
        texts.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_ascending() {
        let mut texts = vec![at("b", 2), at("c", 3), at("a", 1)];
        sort(&mut texts, timestamps, Direction::Ascending);
        assert_eq!(ids(&texts), ["a", "b", "c"]);
    }

    #[test]
    fn test_descending_swaps_arguments() {
        let mut texts = vec![at("b", 2), at("a", 1), at("c", 3)];
        sort(&mut texts, timestamps, Direction::Descending);
        assert_eq!(ids(&texts), ["c", "b", "a"]);
    }

    #[test]
    fn test_unset_timestamp_sorts_first() {
        let mut texts = vec![at("a", 1), Text::default()];
        sort(&mut texts, timestamps, Direction::Ascending);
        assert!(texts[0].timestamp.is_none());
    }

    #[test]
    fn test_empty_and_single() {
        let mut empty: Vec<Text> = Vec::new();
        sort(&mut empty, timestamps, Direction::Descending);
        assert!(empty.is_empty());

        let mut one = vec![at("a", 1)];
        sort(&mut one, timestamps, Direction::Descending);
        assert_eq!(ids(&one), ["a"]);
    }
}
