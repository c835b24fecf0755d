use soroban_sdk::{Env, String};

/// Copies `s` into a stack buffer of `N` bytes and hands the bytes to `f`.
/// Returns `None` when the string is longer than `N`.
pub fn with_bytes<const N: usize, R>(s: &String, f: impl FnOnce(&[u8]) -> R) -> Option<R> {
    let len = s.len() as usize;
    if len > N {
        return None;
    }
    let mut buf = [0u8; N];
    s.copy_into_slice(&mut buf[..len]);
    Some(f(&buf[..len]))
}

/// Returns whether every byte of `s` satisfies `pred`.
/// Strings longer than `N` bytes never match.
pub fn all_bytes<const N: usize>(s: &String, pred: impl Fn(u8) -> bool) -> bool {
    with_bytes::<N, _>(s, |bytes| bytes.iter().all(|&b| pred(b))).unwrap_or(false)
}

/// Printable ASCII, space through tilde.
pub fn is_printable(b: u8) -> bool {
    (32..=126).contains(&b)
}

fn map_ascii<const N: usize>(env: &Env, s: &String, f: impl FnOnce(&mut [u8])) -> Option<String> {
    let len = s.len() as usize;
    if len > N {
        return None;
    }
    let mut buf = [0u8; N];
    s.copy_into_slice(&mut buf[..len]);
    f(&mut buf[..len]);
    Some(String::from_bytes(env, &buf[..len]))
}

/// Returns `s` with ASCII letters lowercased.
/// Returns `None` when the string is longer than `N` bytes.
pub fn to_ascii_lowercase<const N: usize>(env: &Env, s: &String) -> Option<String> {
    map_ascii::<N>(env, s, |bytes| bytes.make_ascii_lowercase())
}

/// Returns `s` with ASCII letters uppercased.
/// Returns `None` when the string is longer than `N` bytes.
pub fn to_ascii_uppercase<const N: usize>(env: &Env, s: &String) -> Option<String> {
    map_ascii::<N>(env, s, |bytes| bytes.make_ascii_uppercase())
}
