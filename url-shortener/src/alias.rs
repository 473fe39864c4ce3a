use rand::Rng;
use rand::distributions::Alphanumeric;

/// Paths the router serves itself; an alias with one of these names would be unreachable.
const RESERVED: [&str; 2] = ["urls", "admin"];
const MAX_ALIAS_LENGTH: usize = 64;

pub fn random_alias(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Checks a caller-chosen alias. Returns the reason it is unusable.
pub fn check_alias(alias: &str) -> Result<(), &'static str> {
    if alias.len() > MAX_ALIAS_LENGTH {
        return Err("alias is too long");
    }
    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err("alias may only contain letters, digits, '-' and '_'");
    }
    if RESERVED.contains(&alias) {
        return Err("alias is reserved");
    }
    Ok(())
}
