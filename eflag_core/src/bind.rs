use tracing::{debug, trace};

use crate::{
    error::Result,
    flagset::FlagSet,
    value::{Field, IntoField},
};

/// A struct whose fields can be bound to flags.
///
/// Usually derived with `#[derive(Flags)]`, which describes every `pub` field
/// carrying a `#[flag(...)]` attribute.
pub trait Flags {
    fn fields(&mut self) -> Vec<FieldSpec<'_>>;
}

/// Description of one bindable struct field.
#[derive(Debug)]
pub struct FieldSpec<'a> {
    /// The Rust field name, used for logging only.
    pub ident: &'static str,
    /// Comma-separated flag names, e.g. `"c,count"`.
    pub names: &'static str,
    pub desc: &'static str,
    pub value: Field<'a>,
}

impl<'a> FieldSpec<'a> {
    pub fn new(
        ident: &'static str,
        names: &'static str,
        desc: &'static str,
        value: impl IntoField<'a>,
    ) -> Self {
        Self {
            ident,
            names,
            desc,
            value: value.into_field(),
        }
    }

    /// The declared names, in order, without empty entries.
    pub fn flag_names(&self) -> Vec<&'static str> {
        self.names
            .split(',')
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Help text for the flag. For `Option` fields the inner type is put in
    /// back quotes in front, so usage listings show it as the value name.
    pub fn usage(&self) -> String {
        if self.value.is_optional() {
            format!("`{}` {}", self.value.inner_type_name(), self.desc)
        } else {
            self.desc.to_string()
        }
    }
}

/// Registers one flag per declared name of every field of `dest`.
///
/// The names of a field all share the field's value, so the last one given on
/// the command line wins. A field is registered completely or not at all; the
/// first failing field stops binding and its error is returned.
pub fn bind_struct<'a, T>(flags: &mut FlagSet<'a>, dest: &'a mut T) -> Result<()>
where
    T: Flags + ?Sized,
{
    for spec in dest.fields() {
        let names = spec.flag_names();
        if names.is_empty() {
            trace!(field = spec.ident, "no flag names, skipping");
            continue;
        }
        let usage = spec.usage();
        let slot = flags.var_aliased(spec.value, &names, &usage)?;
        debug!(field = spec.ident, ?names, slot = slot.index(), "bound field");
    }
    Ok(())
}

impl<'a> FlagSet<'a> {
    /// See [`bind_struct`].
    pub fn bind<T>(&mut self, dest: &'a mut T) -> Result<()>
    where
        T: Flags + ?Sized,
    {
        bind_struct(self, dest)
    }
}
