//! `SAMPLEX_*` environment overrides.

use std::str::FromStr;

/// Parse `name` as `T`; unset or unparsable values read as `None`.
pub(crate) fn parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Boolean switch: anything but `0`/`false` (any case) counts as on.
pub(crate) fn flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| flag_value(&v))
}

fn flag_value(v: &str) -> bool {
    let v = v.trim();
    !(v == "0" || v.eq_ignore_ascii_case("false"))
}
