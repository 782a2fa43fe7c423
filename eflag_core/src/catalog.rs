use std::{collections::BTreeMap, io};

use serde::Serialize;

use crate::flagset::{FlagSet, SlotId};

/// One catalog entry: a bound value and every name that refers to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arg {
    pub names: Vec<String>,
    pub usage: String,
    pub def_value: String,
    pub type_name: String,
}

/// Every flag of `flags`, with aliases of the same value folded into one
/// [`Arg`].
///
/// Names within an entry are sorted, and entries are sorted by their first
/// name. Usage and default come from the first name seen; aliases bound
/// through [`bind_struct`](crate::bind_struct) always agree on both.
pub fn declared_args(flags: &FlagSet<'_>) -> Vec<Arg> {
    let mut by_slot: BTreeMap<SlotId, Arg> = BTreeMap::new();
    flags.visit_all(|flag| {
        let type_name = flags.value(flag).map_or("", |value| value.type_name());
        by_slot
            .entry(flag.slot)
            .or_insert_with(|| Arg {
                names: Vec::new(),
                usage: flag.usage.clone(),
                def_value: flag.def_value.clone(),
                type_name: type_name.to_string(),
            })
            .names
            .push(flag.name.clone());
    });

    let mut args: Vec<Arg> = by_slot
        .into_values()
        .map(|mut arg| {
            arg.names.sort();
            arg
        })
        .collect();
    args.sort_by(|a, b| a.names.first().cmp(&b.names.first()));
    args
}

/// Usage text listing each catalog entry with all of its names.
///
/// ```text
/// Usage: prog
///
///     -c -count
///         a count (default: 5) [i32]
/// ```
pub fn posix_style(flags: &FlagSet<'_>) -> String {
    let mut out = format!("Usage: {}\n\n", flags.name());
    for arg in declared_args(flags) {
        out.push('\t');
        for name in &arg.names {
            out.push_str(&format!("-{name} "));
        }
        let def_value = if arg.def_value.is_empty() {
            String::new()
        } else {
            format!("(default: {})", arg.def_value)
        };
        out.push_str(&format!(
            "\n\t\t{} {} [{}]\n\n",
            arg.usage, def_value, arg.type_name
        ));
    }
    out
}

pub fn write_posix_style(flags: &FlagSet<'_>, mut out: impl io::Write) -> io::Result<()> {
    out.write_all(posix_style(flags).as_bytes())
}
