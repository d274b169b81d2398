//! Dormancy ordering: the accounts most likely abandoned come first.
//!
//! 1. no post, not protected (including failed lookups)
//! 2. no post, protected
//! 3. with a post, oldest first
//!
//! The sort is stable, so ties keep follow-list order.
use crate::model::EnrichedFollower;
use std::cmp::Ordering;

/// Comparator implementing the dormancy order.
pub fn dormancy_order(a: &EnrichedFollower, b: &EnrichedFollower) -> Ordering {
    match (a.latest_post(), b.latest_post()) {
        (Some(pa), Some(pb)) => pa.created_at.cmp(&pb.created_at),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => a.is_protected().cmp(&b.is_protected()),
    }
}

pub fn rank(followers: &mut [EnrichedFollower]) {
    followers.sort_by(dormancy_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{post, user};

    fn active(id: &str, unix: i64) -> EnrichedFollower {
        EnrichedFollower::new(user(id, &format!("u{id}"), false), Some(post("p", id, unix)))
    }

    fn silent(id: &str, protected: bool) -> EnrichedFollower {
        EnrichedFollower::new(user(id, &format!("u{id}"), protected), None)
    }

    fn ids(list: &[EnrichedFollower]) -> Vec<&str> {
        list.iter().map(|f| f.user().id.as_str()).collect()
    }

    #[test]
    fn classes_then_timestamps() {
        let mut list = vec![
            active("a", 300),
            silent("p", true),
            active("b", 100),
            silent("n", false),
            EnrichedFollower::unavailable(user("f", "uf", false), "timeout"),
            active("c", 200),
        ];
        rank(&mut list);
        assert_eq!(ids(&list), ["n", "f", "p", "b", "c", "a"]);
    }

    #[test]
    fn dated_entries_are_non_decreasing() {
        let mut list: Vec<_> = [50, 10, 40, 10, 30, 20]
            .iter()
            .enumerate()
            .map(|(i, ts)| active(&i.to_string(), *ts))
            .collect();
        rank(&mut list);
        for pair in list.windows(2) {
            let a = pair[0].latest_post().unwrap().created_at;
            let b = pair[1].latest_post().unwrap().created_at;
            assert!(a <= b);
        }
    }

    #[test]
    fn protected_sorts_between_silent_and_dated() {
        let mut list = vec![active("d", 0), silent("p", true), silent("n", false)];
        rank(&mut list);
        assert_eq!(ids(&list), ["n", "p", "d"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let mut list = vec![
            silent("x", false),
            silent("y", false),
            active("t1", 5),
            active("t2", 5),
        ];
        rank(&mut list);
        assert_eq!(ids(&list), ["x", "y", "t1", "t2"]);
    }
}
