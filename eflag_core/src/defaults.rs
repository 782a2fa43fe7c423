//! Flag values read from a TOML file before the command line is parsed.
//!
//! Each top-level key names a flag:
//!
//! ```toml
//! count = 7
//! name = "bob"
//! verbose = true
//! ```
use std::{collections::BTreeMap, path::Path};

use tracing::debug;

use crate::{
    error::{DefaultsError, Error},
    flagset::{FlagSet, SlotId},
};

/// Sets every flag named in `content`, returning how many were set.
///
/// Every entry is checked before any is applied, so on error no flag has been
/// touched. Two keys naming the same field are rejected, since a table has no
/// order in which one could override the other.
pub fn apply_defaults_str(flags: &mut FlagSet<'_>, content: &str) -> Result<usize, DefaultsError> {
    let table: toml::Table = toml::from_str(content)?;
    let mut pending = Vec::with_capacity(table.len());
    let mut by_slot: BTreeMap<SlotId, String> = BTreeMap::new();
    for (key, value) in table {
        let raw = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            _ => return Err(DefaultsError::UnsupportedValue { key }),
        };
        let flag = flags
            .lookup(&key)
            .ok_or_else(|| Error::NoSuchFlag(key.clone()))?;
        if let Some(first) = by_slot.insert(flag.slot, key.clone()) {
            return Err(DefaultsError::SameField { first, second: key });
        }
        if let Some(field) = flags.value(flag) {
            field.check(&raw).map_err(|source| Error::InvalidValue {
                name: key.clone(),
                value: raw.clone(),
                source,
            })?;
        }
        pending.push((key, raw));
    }

    for (key, raw) in &pending {
        flags.set(key, raw)?;
        debug!(flag = key.as_str(), value = %raw, "applied default");
    }
    Ok(pending.len())
}

pub fn apply_defaults_file(
    flags: &mut FlagSet<'_>,
    path: impl AsRef<Path>,
) -> Result<usize, DefaultsError> {
    let path = path.as_ref();
    if path.extension().and_then(|s| s.to_str()) != Some("toml") {
        return Err(DefaultsError::UnsupportedFormat(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| DefaultsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "reading flag defaults");
    apply_defaults_str(flags, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_then_command_line() {
        let mut count = 5i32;
        let mut name: Option<String> = None;
        let mut verbose = false;
        let mut flags = FlagSet::new("test");
        flags.var(&mut count, "c", "").unwrap();
        flags.var(&mut name, "n", "").unwrap();
        flags.var(&mut verbose, "v", "").unwrap();

        let applied = apply_defaults_str(
            &mut flags,
            r#"
c = 7
n = "bob"
v = true
"#,
        )
        .unwrap();
        assert_eq!(applied, 3);
        assert_eq!(flags.n_flag(), 3);
        flags.parse(["-c", "8"]).unwrap();
        drop(flags);

        assert_eq!(count, 8);
        assert_eq!(name.as_deref(), Some("bob"));
        assert!(verbose);
    }

    #[test]
    fn test_unknown_flag() {
        let mut flags = FlagSet::new("test");
        let err = apply_defaults_str(&mut flags, "missing = 1").unwrap_err();
        assert!(matches!(err, DefaultsError::Flag(Error::NoSuchFlag(name)) if name == "missing"));
    }

    #[test]
    fn test_unsupported_value() {
        let mut ratio = 0i32;
        let mut flags = FlagSet::new("test");
        flags.var(&mut ratio, "ratio", "").unwrap();
        let err = apply_defaults_str(&mut flags, "ratio = 0.5").unwrap_err();
        assert!(matches!(err, DefaultsError::UnsupportedValue { key } if key == "ratio"));
    }

    #[test]
    fn test_value_that_does_not_convert() {
        let mut small = 0u8;
        let mut flags = FlagSet::new("test");
        flags.var(&mut small, "small", "").unwrap();
        let err = apply_defaults_str(&mut flags, "small = 300").unwrap_err();
        assert!(matches!(err, DefaultsError::Flag(Error::InvalidValue { .. })));
    }

    #[test]
    fn test_bad_entry_applies_nothing() {
        let mut a = 0i32;
        let mut b = 0i32;
        let mut flags = FlagSet::new("test");
        flags.var(&mut a, "a", "").unwrap();
        flags.var(&mut b, "b", "").unwrap();
        let err = apply_defaults_str(&mut flags, "a = 7\nb = \"x\"").unwrap_err();
        assert!(matches!(err, DefaultsError::Flag(Error::InvalidValue { ref name, .. }) if name == "b"));
        assert_eq!(flags.n_flag(), 0);

        let err = apply_defaults_str(&mut flags, "a = 7\nzz = 1").unwrap_err();
        assert!(matches!(err, DefaultsError::Flag(Error::NoSuchFlag(_))));
        assert_eq!(flags.n_flag(), 0);
        drop(flags);
        assert_eq!(a, 0);
        assert_eq!(b, 0);
    }

    #[test]
    fn test_two_aliases_of_one_field() {
        let mut count = 0i32;
        let mut flags = FlagSet::new("test");
        flags
            .var_aliased(&mut count, &["c", "count"], "")
            .unwrap();
        let err = apply_defaults_str(&mut flags, "c = 1\ncount = 2").unwrap_err();
        assert!(matches!(
            err,
            DefaultsError::SameField { ref first, ref second } if first == "c" && second == "count"
        ));
        assert_eq!(
            err.to_string(),
            "defaults set the same field twice: c and count"
        );
        drop(flags);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_duration_from_string() {
        let mut timeout = std::time::Duration::from_secs(1);
        let mut flags = FlagSet::new("test");
        flags.var(&mut timeout, "timeout", "").unwrap();
        apply_defaults_str(&mut flags, "timeout = \"1m30s\"").unwrap();
        drop(flags);
        assert_eq!(timeout, std::time::Duration::from_secs(90));
    }

    #[test]
    fn test_invalid_toml() {
        let mut flags = FlagSet::new("test");
        let err = apply_defaults_str(&mut flags, "c = ").unwrap_err();
        assert!(matches!(err, DefaultsError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("defaults.toml");
        fs::write(&file_path, "c = 11\n").unwrap();

        let mut count = 0i64;
        let mut flags = FlagSet::new("test");
        flags.var(&mut count, "c", "").unwrap();
        assert_eq!(apply_defaults_file(&mut flags, &file_path).unwrap(), 1);
        drop(flags);
        assert_eq!(count, 11);
    }

    #[test]
    fn test_from_file_unsupported_format() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("defaults.yaml");
        fs::write(&file_path, "c: 1").unwrap();

        let mut flags = FlagSet::new("test");
        let err = apply_defaults_file(&mut flags, &file_path).unwrap_err();
        assert!(err.to_string().contains("only .toml files are supported"));
    }

    #[test]
    fn test_from_file_nonexistent() {
        let mut flags = FlagSet::new("test");
        let err = apply_defaults_file(&mut flags, "nonexistent.toml").unwrap_err();
        assert!(matches!(err, DefaultsError::Io { .. }));
    }
}
