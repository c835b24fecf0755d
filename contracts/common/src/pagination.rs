//! Index vectors are append-only in creation order, so walking them backwards
//! yields newest-first pages.

use core::iter::Rev;
use core::ops::Range;

use soroban_sdk::{Env, IntoVal, TryFromVal, Val, Vec};

/// Caps a requested page size. A `max` of zero leaves `limit` untouched.
pub fn clamp_limit(limit: u32, max: u32) -> u32 {
    if max == 0 {
        limit
    } else {
        limit.min(max)
    }
}

/// Positions of a newest-first page over a list of `len` items, skipping the
/// `offset` newest ones.
pub fn newest_window(len: u32, offset: u32, limit: u32) -> Rev<Range<u32>> {
    let upper = len.saturating_sub(offset);
    let lower = upper.saturating_sub(limit);
    (lower..upper).rev()
}

/// Returns up to `limit` items of `index`, newest first, skipping the
/// `offset` newest ones.
pub fn newest_first<T>(env: &Env, index: &Vec<T>, offset: u32, limit: u32) -> Vec<T>
where
    T: IntoVal<Env, Val> + TryFromVal<Env, Val>,
{
    let mut page = Vec::new(env);
    for i in newest_window(index.len(), offset, limit) {
        if let Some(item) = index.get(i) {
            page.push_back(item);
        }
    }
    page
}

/// Removes the first occurrence of `item` from `index`.
/// Returns `false` when the item was not present.
pub fn remove_item<T>(index: &mut Vec<T>, item: &T) -> bool
where
    T: IntoVal<Env, Val> + TryFromVal<Env, Val>,
{
    match index.first_index_of(item) {
        Some(pos) => {
            index.remove(pos);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::vec;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(10, 50), 10);
        assert_eq!(clamp_limit(80, 50), 50);
        assert_eq!(clamp_limit(80, 0), 80);
    }

    #[test]
    fn test_newest_window_positions() {
        assert!(newest_window(5, 0, 2).eq([4, 3]));
        assert!(newest_window(5, 4, 10).eq([0]));
        assert_eq!(newest_window(5, 5, 10).count(), 0);
        assert_eq!(newest_window(3, 9, 2).count(), 0);
        assert_eq!(newest_window(3, 0, 0).count(), 0);
    }

    #[test]
    fn test_newest_first_windows() {
        let env = Env::default();
        let index: Vec<u64> = vec![&env, 1, 2, 3, 4, 5];

        assert_eq!(newest_first(&env, &index, 0, 2), vec![&env, 5u64, 4]);
        assert_eq!(newest_first(&env, &index, 2, 2), vec![&env, 3u64, 2]);
        assert_eq!(newest_first(&env, &index, 4, 10), vec![&env, 1u64]);
        assert!(newest_first(&env, &index, 5, 10).is_empty());
        assert!(newest_first(&env, &index, 0, 0).is_empty());
    }

    #[test]
    fn test_remove_item() {
        let env = Env::default();
        let mut index: Vec<u64> = vec![&env, 7, 8, 9];

        assert!(remove_item(&mut index, &8));
        assert_eq!(index, vec![&env, 7u64, 9]);
        assert!(!remove_item(&mut index, &8));
    }
}
