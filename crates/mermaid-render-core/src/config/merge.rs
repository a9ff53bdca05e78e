//! Layering of partial TOML documents
//!
//! Each source is parsed as a raw table and laid over the previous result, so
//! a file only overrides the keys it actually sets. Nested tables merge
//! recursively; arrays and scalars are replaced wholesale.

use toml::{Table, Value};

/// Lay `overlay` over `base`; keys in `overlay` win.
pub(super) fn merge_tables(base: Table, overlay: Table) -> Table {
    overlay.into_iter().fold(base, |mut merged, (key, value)| {
        let value = match (merged.remove(&key), value) {
            (Some(Value::Table(inner)), Value::Table(over)) => {
                Value::Table(merge_tables(inner, over))
            }
            (_, value) => value,
        };
        merged.insert(key, value);
        merged
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(source: &str) -> Table {
        source.parse().unwrap_or_default()
    }

    #[test]
    fn test_overlay_wins_for_scalars() {
        let merged = merge_tables(table("port = 1\nhost = \"a\""), table("port = 2"));
        assert_eq!(merged.get("port"), Some(&Value::Integer(2)));
        assert_eq!(merged.get("host"), Some(&Value::String("a".into())));
    }

    #[test]
    fn test_nested_tables_merge_recursively() {
        let base = table("[renderer]\ncommand = \"mmdc\"\ntimeout_secs = 30");
        let over = table("[renderer]\ntimeout_secs = 5");
        let merged = merge_tables(base, over);

        let renderer = merged.get("renderer").and_then(Value::as_table);
        assert_eq!(
            renderer.and_then(|t| t.get("command")),
            Some(&Value::String("mmdc".into()))
        );
        assert_eq!(
            renderer.and_then(|t| t.get("timeout_secs")),
            Some(&Value::Integer(5))
        );
    }

    #[test]
    fn test_arrays_are_replaced_not_appended() {
        let merged = merge_tables(table("args = [\"a\", \"b\"]"), table("args = [\"c\"]"));
        assert_eq!(
            merged.get("args"),
            Some(&Value::Array(vec![Value::String("c".into())]))
        );
    }
}
