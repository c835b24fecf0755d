//! Append-only lists stored one item per persistent key.
//!
//! The list `prefix` owned by `owner` keeps its length at `(prefix, owner)`
//! and item `n` at `(prefix, owner, n)`. An append writes two small entries no
//! matter how long the list is, and a page reads only the keys it returns.

use soroban_sdk::{Address, Env, IntoVal, Symbol, TryFromVal, Val};

use crate::extend_persistent;

fn len_key(prefix: &Symbol, owner: &Address) -> (Symbol, Address) {
    (prefix.clone(), owner.clone())
}

fn item_key(prefix: &Symbol, owner: &Address, n: u32) -> (Symbol, Address, u32) {
    (prefix.clone(), owner.clone(), n)
}

pub fn seq_len(env: &Env, prefix: &Symbol, owner: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&len_key(prefix, owner))
        .unwrap_or(0)
}

/// Appends `item` and returns its position.
pub fn seq_push<T: IntoVal<Env, Val>>(
    env: &Env,
    prefix: &Symbol,
    owner: &Address,
    item: &T,
) -> u32 {
    let n = seq_len(env, prefix, owner);

    let key = item_key(prefix, owner, n);
    env.storage().persistent().set(&key, item);
    extend_persistent(env, &key);

    let key = len_key(prefix, owner);
    env.storage().persistent().set(&key, &n.saturating_add(1));
    extend_persistent(env, &key);
    n
}

pub fn seq_get<T: TryFromVal<Env, Val>>(
    env: &Env,
    prefix: &Symbol,
    owner: &Address,
    n: u32,
) -> Option<T> {
    env.storage().persistent().get(&item_key(prefix, owner, n))
}
