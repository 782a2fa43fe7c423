//! Runtime behind `eflag`.
//!
//! A [`FlagSet`] owns named flags, each writing through a [`Field`]: a mutable
//! borrow of one struct field. [`bind_struct`] registers the fields described
//! by a [`Flags`] implementation, [`declared_args`] folds aliases back into one
//! entry per field for usage output, and [`apply_defaults_file`] layers a TOML
//! file between the struct's own values and the command line.
pub mod bind;
pub mod catalog;
pub mod defaults;
pub mod error;
pub mod flagset;
pub mod value;

pub use bind::{FieldSpec, Flags, bind_struct};
pub use catalog::{Arg, declared_args, posix_style, write_posix_style};
pub use defaults::{apply_defaults_file, apply_defaults_str};
pub use error::{DefaultsError, Error, ParseError, Result};
pub use flagset::{Flag, FlagSet, SlotId, UsageFn};
pub use value::{Field, Int, IntoField, OptInt};
