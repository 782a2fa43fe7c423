use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt,
};

use tracing::debug;

use crate::{
    error::{Error, Result},
    value::{Field, IntoField},
};

/// Handle of one registered value. Every alias of a field shares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One registered flag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    pub usage: String,
    /// The value's rendering at registration time.
    pub def_value: String,
    pub slot: SlotId,
}

pub type UsageFn = fn(&FlagSet<'_>) -> String;

/// A set of flags backed by borrowed struct fields.
///
/// The set holds `&'a mut` borrows of every bound field, so the fields can be
/// read again once the set has been dropped.
pub struct FlagSet<'a> {
    name: String,
    values: Vec<Field<'a>>,
    formal: BTreeMap<String, Flag>,
    actual: BTreeSet<String>,
    args: Vec<String>,
    parsed: bool,
    usage: Option<UsageFn>,
}

impl<'a> FlagSet<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            formal: BTreeMap::new(),
            actual: BTreeSet::new(),
            args: Vec::new(),
            parsed: false,
            usage: None,
        }
    }

    /// A set named after the running program (`argv[0]`).
    pub fn from_env() -> Self {
        Self::new(std::env::args().next().unwrap_or_default())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers `value` under a single name.
    pub fn var(&mut self, value: impl IntoField<'a>, name: &str, usage: &str) -> Result<SlotId> {
        self.var_aliased(value, &[name], usage)
    }

    /// Registers `value` once and makes every name in `names` refer to it.
    ///
    /// All names are validated first; on error nothing is registered.
    pub fn var_aliased(
        &mut self,
        value: impl IntoField<'a>,
        names: &[&str],
        usage: &str,
    ) -> Result<SlotId> {
        if names.is_empty() {
            return Err(Error::BadName(String::new()));
        }
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() || name.starts_with('-') || name.contains('=') {
                return Err(Error::BadName((*name).to_string()));
            }
            if self.formal.contains_key(*name) || names.iter().take(i).any(|n| n == name) {
                return Err(Error::Redefined((*name).to_string()));
            }
        }

        let value = value.into_field();
        let slot = SlotId(self.values.len());
        let def_value = value.to_string();
        self.values.push(value);
        for name in names {
            debug!(flag = name, slot = slot.0, default = %def_value, "registered flag");
            self.formal.insert(
                (*name).to_string(),
                Flag {
                    name: (*name).to_string(),
                    usage: usage.to_string(),
                    def_value: def_value.clone(),
                    slot,
                },
            );
        }
        Ok(slot)
    }

    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.formal.get(name)
    }

    /// The value a flag of this set writes to.
    pub fn value(&self, flag: &Flag) -> Option<&Field<'a>> {
        self.values.get(flag.slot.0)
    }

    /// Calls `f` for every flag, in lexicographical order of name.
    pub fn visit_all(&self, mut f: impl FnMut(&Flag)) {
        for flag in self.formal.values() {
            f(flag);
        }
    }

    /// Calls `f` for every flag that has been set, in lexicographical order.
    pub fn visit(&self, mut f: impl FnMut(&Flag)) {
        for name in &self.actual {
            if let Some(flag) = self.formal.get(name) {
                f(flag);
            }
        }
    }

    /// Sets the named flag as if it had been given on the command line.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let field = self
            .field_mut(name)
            .ok_or_else(|| Error::NoSuchFlag(name.to_string()))?;
        field.set(value).map_err(|source| Error::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            source,
        })?;
        self.actual.insert(name.to_string());
        Ok(())
    }

    /// Parses flags from `arguments`, which must not include the program name.
    ///
    /// Parsing stops at the first argument that is not a flag, or right after
    /// `--`. Whatever is left is available through [`FlagSet::args`].
    pub fn parse<I, S>(&mut self, arguments: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parsed = true;
        let mut args: VecDeque<String> = arguments.into_iter().map(Into::into).collect();
        while self.parse_one(&mut args)? {}
        self.args = args.into();
        Ok(())
    }

    fn parse_one(&mut self, args: &mut VecDeque<String>) -> Result<bool> {
        let arg = match args.front() {
            Some(arg) if arg.len() >= 2 && arg.starts_with('-') => arg.clone(),
            _ => return Ok(false),
        };
        args.pop_front();

        let mut body = arg.strip_prefix('-').unwrap_or(&arg);
        if let Some(rest) = body.strip_prefix('-') {
            if rest.is_empty() {
                // "--" terminates the flags
                return Ok(false);
            }
            body = rest;
        }
        if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
            return Err(Error::BadSyntax(arg));
        }

        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let Some(slot) = self.formal.get(name).map(|flag| flag.slot) else {
            if name == "help" || name == "h" {
                return Err(Error::Help);
            }
            return Err(Error::Undefined(name.to_string()));
        };
        let is_bool = self.values.get(slot.0).is_some_and(Field::is_bool_flag);

        let value = match inline {
            Some(value) => value.to_string(),
            None if args
                .front()
                .is_some_and(|next| !is_bool || !next.starts_with('-')) =>
            {
                args.pop_front().unwrap_or_default()
            }
            None if is_bool => "true".to_string(),
            None => return Err(Error::MissingArgument(name.to_string())),
        };

        let Some(field) = self.values.get_mut(slot.0) else {
            return Err(Error::Undefined(name.to_string()));
        };
        if let Err(source) = field.set(&value) {
            let (name, value) = (name.to_string(), value);
            return Err(if is_bool {
                Error::InvalidBool { name, value, source }
            } else {
                Error::InvalidValue { name, value, source }
            });
        }
        debug!(flag = name, value = %value, "flag set");
        self.actual.insert(name.to_string());
        Ok(true)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Field<'a>> {
        let slot = self.formal.get(name)?.slot;
        self.values.get_mut(slot.0)
    }

    /// Arguments left over after the flags.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }

    pub fn n_arg(&self) -> usize {
        self.args.len()
    }

    /// Number of flags that have been set.
    pub fn n_flag(&self) -> usize {
        self.actual.len()
    }

    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Replaces the text returned by [`FlagSet::usage`].
    pub fn set_usage(&mut self, usage: UsageFn) {
        self.usage = Some(usage);
    }

    pub fn usage(&self) -> String {
        match self.usage {
            Some(usage) => usage(self),
            None if self.name.is_empty() => format!("Usage:\n{}", self.defaults()),
            None => format!("Usage of {}:\n{}", self.name, self.defaults()),
        }
    }

    /// One entry per flag name, with its value placeholder, usage and default.
    ///
    /// Defaults equal to the zero value of the field's type are left out.
    pub fn defaults(&self) -> String {
        let mut out = String::new();
        for flag in self.formal.values() {
            let Some(value) = self.values.get(flag.slot.0) else {
                continue;
            };
            let mut line = format!("  -{}", flag.name);
            let (placeholder, usage) = unquote_usage(&flag.usage, value);
            if !placeholder.is_empty() {
                line.push(' ');
                line.push_str(&placeholder);
            }
            // "  -x" fits before the tab stop
            if line.len() <= 4 {
                line.push('\t');
            } else {
                line.push_str("\n    \t");
            }
            line.push_str(&usage.replace('\n', "\n    \t"));
            if flag.def_value != value.zero_text() {
                line.push_str(&format!(" (default {})", flag.def_value));
            }
            line.push('\n');
            out.push_str(&line);
        }
        out
    }
}

impl fmt::Debug for FlagSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("values", &self.values)
            .field("formal", &self.formal)
            .field("actual", &self.actual)
            .field("args", &self.args)
            .field("parsed", &self.parsed)
            .finish_non_exhaustive()
    }
}

/// Splits a usage string into a value placeholder and the text to print.
///
/// A name in back quotes (`` `path` ``) becomes the placeholder and loses its
/// quotes in the text. Otherwise the placeholder comes from the field's type.
pub fn unquote_usage(usage: &str, value: &Field<'_>) -> (String, String) {
    if let Some((before, rest)) = usage.split_once('`') {
        if let Some((name, after)) = rest.split_once('`') {
            return (name.to_string(), format!("{before}{name}{after}"));
        }
    }
    (value.placeholder().to_string(), usage.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn test_parse_forms() {
        let mut count = 5i32;
        let mut name = String::new();
        let mut verbose = true;
        let mut flags = FlagSet::new("test");
        flags.var(&mut count, "c", "a count").unwrap();
        flags.var(&mut name, "name", "a name").unwrap();
        flags.var(&mut verbose, "v", "verbose").unwrap();

        flags
            .parse(["-c", "7", "--name=bob", "-v=false", "rest", "-c", "9"])
            .unwrap();
        assert!(flags.parsed());
        assert_eq!(flags.n_flag(), 3);
        assert_eq!(flags.args(), ["rest", "-c", "9"]);
        assert_eq!(flags.arg(0), Some("rest"));
        assert_eq!(flags.arg(3), None);
        drop(flags);

        assert_eq!(count, 7);
        assert_eq!(name, "bob");
        assert!(!verbose);
    }

    #[test]
    fn test_bool_flag_alone_means_true() {
        let mut verbose = false;
        let mut quiet = false;
        let mut flags = FlagSet::new("test");
        flags.var(&mut verbose, "v", "").unwrap();
        flags.var(&mut quiet, "q", "").unwrap();
        flags.parse(["-v", "-q"]).unwrap();
        drop(flags);
        assert!(verbose);
        assert!(quiet);
    }

    #[test]
    fn test_bool_flag_takes_following_value() {
        let mut verbose = true;
        let mut flags = FlagSet::new("test");
        flags.var(&mut verbose, "v", "").unwrap();
        flags.parse(["-v", "false", "file"]).unwrap();
        assert_eq!(flags.args(), ["file"]);
        drop(flags);
        assert!(!verbose);
    }

    #[test]
    fn test_bool_flag_rejects_non_bool_value() {
        let mut verbose = false;
        let mut flags = FlagSet::new("test");
        flags.var(&mut verbose, "flag", "").unwrap();
        let err = flags.parse(["-flag", "notabool"]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidBool {
                source: ParseError::Syntax,
                ..
            }
        ));
        assert_eq!(flags.n_flag(), 0);
        drop(flags);
        assert!(!verbose);
    }

    #[test]
    fn test_double_dash_stops_parsing() {
        let mut n = 0u32;
        let mut flags = FlagSet::new("test");
        flags.var(&mut n, "n", "").unwrap();
        flags.parse(["-n=3", "--", "-n", "4"]).unwrap();
        assert_eq!(flags.args(), ["-n", "4"]);

        let mut flags = FlagSet::new("test");
        flags.parse(["-", "x"]).unwrap();
        assert_eq!(flags.args(), ["-", "x"]);
    }

    #[test]
    fn test_parse_errors() {
        let mut n = 1i64;
        let mut flags = FlagSet::new("test");
        flags.var(&mut n, "n", "").unwrap();

        assert!(matches!(flags.parse(["-x"]), Err(Error::Undefined(name)) if name == "x"));
        assert!(matches!(flags.parse(["-n"]), Err(Error::MissingArgument(name)) if name == "n"));
        assert!(matches!(flags.parse(["---n"]), Err(Error::BadSyntax(_))));
        assert!(matches!(flags.parse(["-=1"]), Err(Error::BadSyntax(_))));
        assert!(matches!(flags.parse(["-h"]), Err(Error::Help)));
        assert!(matches!(flags.parse(["-help"]), Err(Error::Help)));
        assert!(matches!(
            flags.parse(["-n", "99999999999999999999"]),
            Err(Error::InvalidValue {
                source: ParseError::Range,
                ..
            })
        ));
        drop(flags);
        assert_eq!(n, 1);
    }

    #[test]
    fn test_registration_errors() {
        let mut a = 0i32;
        let mut b = 0i32;
        let mut c = 0i32;
        let mut flags = FlagSet::new("test");
        flags.var(&mut a, "a", "").unwrap();
        assert!(matches!(flags.var(&mut b, "a", ""), Err(Error::Redefined(name)) if name == "a"));
        assert!(matches!(flags.var_aliased(&mut c, &["x", "x"], ""), Err(Error::Redefined(_))));
        let mut d = 0i32;
        assert!(matches!(flags.var(&mut d, "-d", ""), Err(Error::BadName(_))));
        let mut e = 0i32;
        assert!(matches!(flags.var(&mut e, "e=1", ""), Err(Error::BadName(_))));
        let mut f = 0i32;
        assert!(matches!(flags.var_aliased(&mut f, &[], ""), Err(Error::BadName(_))));
        assert!(flags.lookup("x").is_none());
        assert_eq!(flags.formal.len(), 1);
        assert_eq!(flags.values.len(), 1);
    }

    #[test]
    fn test_aliases_share_a_slot_and_last_write_wins() {
        let mut count = 0i32;
        let mut flags = FlagSet::new("test");
        let slot = flags
            .var_aliased(&mut count, &["c", "count"], "a count")
            .unwrap();
        assert_eq!(flags.lookup("c").map(|f| f.slot), Some(slot));
        assert_eq!(flags.lookup("count").map(|f| f.slot), Some(slot));
        flags.parse(["-count", "1", "-c", "2"]).unwrap();
        drop(flags);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_set_and_visit() {
        let mut a = 0i32;
        let mut b = false;
        let mut flags = FlagSet::new("test");
        flags.var(&mut a, "a", "").unwrap();
        flags.var(&mut b, "b", "").unwrap();
        flags.set("b", "true").unwrap();
        assert!(matches!(flags.set("zz", "1"), Err(Error::NoSuchFlag(_))));
        assert!(matches!(flags.set("a", "x"), Err(Error::InvalidValue { .. })));

        let mut visited = Vec::new();
        flags.visit(|f| visited.push(f.name.clone()));
        assert_eq!(visited, ["b"]);
        let mut all = Vec::new();
        flags.visit_all(|f| all.push(f.name.clone()));
        assert_eq!(all, ["a", "b"]);

        // defaults are captured at registration
        assert_eq!(flags.lookup("b").unwrap().def_value, "false");
        let current = flags.value(flags.lookup("b").unwrap()).unwrap();
        assert_eq!(current.to_string(), "true");
    }

    #[test]
    fn test_defaults_listing() {
        let mut count = 5i32;
        let mut zero = 0i32;
        let mut name = String::from("x");
        let mut verbose = false;
        let mut path: Option<String> = None;
        let mut flags = FlagSet::new("prog");
        flags.var(&mut count, "count", "how many").unwrap();
        flags.var(&mut zero, "z", "zero").unwrap();
        flags.var(&mut name, "name", "who").unwrap();
        flags.var(&mut verbose, "v", "chatty").unwrap();
        flags.var(&mut path, "path", "`file` to read").unwrap();

        let expected = "Usage of prog:\n\
            \x20 -count i32\n    \thow many (default 5)\n\
            \x20 -name string\n    \twho (default \"x\")\n\
            \x20 -path file\n    \tfile to read\n\
            \x20 -v\tchatty\n\
            \x20 -z i32\n    \tzero\n";
        assert_eq!(flags.usage(), expected);
    }

    #[test]
    fn test_duration_flags() {
        let mut timeout = std::time::Duration::from_secs(90);
        let mut idle = std::time::Duration::ZERO;
        let mut flags = FlagSet::new("prog");
        flags.var(&mut timeout, "timeout", "how long to wait").unwrap();
        flags.var(&mut idle, "idle", "idle cutoff").unwrap();
        assert_eq!(
            flags.defaults(),
            "  -idle duration\n    \tidle cutoff\n\
             \x20 -timeout duration\n    \thow long to wait (default 1m 30s)\n"
        );
        flags.parse(["-timeout", "2h", "-idle=45s"]).unwrap();
        drop(flags);
        assert_eq!(timeout, std::time::Duration::from_secs(7200));
        assert_eq!(idle, std::time::Duration::from_secs(45));
    }

    #[test]
    fn test_custom_usage() {
        fn short(flags: &FlagSet<'_>) -> String {
            format!("{} [flags]", flags.name())
        }
        let mut flags = FlagSet::new("prog");
        flags.set_usage(short);
        assert_eq!(flags.usage(), "prog [flags]");
    }

    #[test]
    fn test_unquote_usage() {
        let mut n = 0u8;
        let field = (&mut n).into_field();
        assert_eq!(
            unquote_usage("a `level` of noise", &field),
            ("level".to_string(), "a level of noise".to_string())
        );
        assert_eq!(
            unquote_usage("unbalanced ` quote", &field),
            ("u8".to_string(), "unbalanced ` quote".to_string())
        );
    }
}
