use std::env::var;
use std::str::FromStr;

use anyhow::Context;
use anyhow::Result;

/// Get the value of ENV var, or a default
///
/// Only when:
/// - It is set
/// - It is not empty
pub fn env_var_or_else(var_name: &'static str, or_else: fn() -> String) -> String {
    if let Ok(value) = var(var_name) {
        if !value.is_empty() {
            return value;
        }
    }

    or_else()
}

/// Read an ENV var, empty values count as unset
pub fn env_lookup(var_name: &str) -> Option<String> {
    var(var_name).ok().filter(|value| !value.is_empty())
}

/// Parse a variable found through `lookup`, or use a default when it is unset or empty
///
/// A value that is set but does not parse is an error, not a silent fallback
pub fn parse_var_or<T, L>(lookup: L, var_name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    L: Fn(&str) -> Option<String>,
{
    match lookup(var_name).filter(|value| !value.is_empty()) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value for `{var_name}`: {value}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(value: &'static str) -> impl Fn(&str) -> Option<String> {
        move |_| Some(value.to_string())
    }

    #[test]
    fn test_parse_var_or_default() {
        assert_eq!(10_u32, parse_var_or(|_| None, "DB_CONNECTION_LIMIT", 10).unwrap());
        assert_eq!(10_u32, parse_var_or(lookup(""), "DB_CONNECTION_LIMIT", 10).unwrap());
    }

    #[test]
    fn test_parse_var_or_value() {
        assert_eq!(25_u32, parse_var_or(lookup(" 25 "), "DB_CONNECTION_LIMIT", 10).unwrap());
    }

    #[test]
    fn test_parse_var_or_invalid_value() {
        let err = parse_var_or::<u16, _>(lookup("many"), "DB_PORT", 3306).unwrap_err();

        assert_eq!("Invalid value for `DB_PORT`: many", err.to_string());
    }
}
