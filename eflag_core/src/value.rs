use std::{
    fmt,
    num::{IntErrorKind, ParseIntError},
    str::FromStr,
    time::Duration,
};

use crate::error::ParseError;

/// Conversion from a mutable borrow of a struct field into a [`Field`].
///
/// Implemented for `&mut T` and `&mut Option<T>` where `T` is `bool`, `String`,
/// `Duration` or one of the integer primitives.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be bound to a command-line flag",
    note = "supported field types are `bool`, `String`, `Duration`, the integer primitives, and `Option` of any of these"
)]
pub trait IntoField<'a> {
    fn into_field(self) -> Field<'a>;
}

/// A borrowed struct field that the flag set can write to and render.
///
/// Plain variants are overwritten in place. `Opt*` variants start out as
/// `None` ("not given") and become `Some` once a value is set.
#[derive(Debug)]
pub enum Field<'a> {
    Bool(&'a mut bool),
    Str(&'a mut String),
    Int(Int<'a>),
    Duration(&'a mut Duration),
    OptBool(&'a mut Option<bool>),
    OptStr(&'a mut Option<String>),
    OptInt(OptInt<'a>),
    OptDuration(&'a mut Option<Duration>),
}

macro_rules! int_fields {
    ($($variant:ident => $ty:ident),* $(,)?) => {
        /// Borrow of an integer field, tagged with its width and signedness.
        #[derive(Debug)]
        pub enum Int<'a> {
            $($variant(&'a mut $ty),)*
        }

        #[derive(Debug)]
        pub enum OptInt<'a> {
            $($variant(&'a mut Option<$ty>),)*
        }

        impl Int<'_> {
            fn set(&mut self, raw: &str) -> Result<(), ParseError> {
                match self {
                    $(Int::$variant(v) => **v = parse_int::<$ty>(raw)?,)*
                }
                Ok(())
            }

            fn check(&self, raw: &str) -> Result<(), ParseError> {
                match self {
                    $(Int::$variant(_) => parse_int::<$ty>(raw).map(drop),)*
                }
            }

            fn render(&self) -> String {
                match self {
                    $(Int::$variant(v) => v.to_string(),)*
                }
            }

            fn type_name(&self) -> &'static str {
                match self {
                    $(Int::$variant(_) => stringify!($ty),)*
                }
            }
        }

        impl OptInt<'_> {
            fn set(&mut self, raw: &str) -> Result<(), ParseError> {
                match self {
                    $(OptInt::$variant(v) => **v = Some(parse_int::<$ty>(raw)?),)*
                }
                Ok(())
            }

            fn check(&self, raw: &str) -> Result<(), ParseError> {
                match self {
                    $(OptInt::$variant(_) => parse_int::<$ty>(raw).map(drop),)*
                }
            }

            fn render(&self) -> String {
                match self {
                    $(OptInt::$variant(v) => match **v {
                        Some(n) => n.to_string(),
                        None => String::new(),
                    },)*
                }
            }

            fn type_name(&self) -> &'static str {
                match self {
                    $(OptInt::$variant(_) => concat!("Option<", stringify!($ty), ">"),)*
                }
            }

            fn inner_type_name(&self) -> &'static str {
                match self {
                    $(OptInt::$variant(_) => stringify!($ty),)*
                }
            }
        }

        $(
            impl<'a> IntoField<'a> for &'a mut $ty {
                fn into_field(self) -> Field<'a> {
                    Field::Int(Int::$variant(self))
                }
            }

            impl<'a> IntoField<'a> for &'a mut Option<$ty> {
                fn into_field(self) -> Field<'a> {
                    Field::OptInt(OptInt::$variant(self))
                }
            }
        )*
    };
}

int_fields! {
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    I128 => i128,
    Isize => isize,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    U128 => u128,
    Usize => usize,
}

impl<'a> IntoField<'a> for &'a mut bool {
    fn into_field(self) -> Field<'a> {
        Field::Bool(self)
    }
}

impl<'a> IntoField<'a> for &'a mut String {
    fn into_field(self) -> Field<'a> {
        Field::Str(self)
    }
}

impl<'a> IntoField<'a> for &'a mut Option<bool> {
    fn into_field(self) -> Field<'a> {
        Field::OptBool(self)
    }
}

impl<'a> IntoField<'a> for &'a mut Option<String> {
    fn into_field(self) -> Field<'a> {
        Field::OptStr(self)
    }
}

impl<'a> IntoField<'a> for &'a mut Duration {
    fn into_field(self) -> Field<'a> {
        Field::Duration(self)
    }
}

impl<'a> IntoField<'a> for &'a mut Option<Duration> {
    fn into_field(self) -> Field<'a> {
        Field::OptDuration(self)
    }
}

impl<'a> IntoField<'a> for Field<'a> {
    fn into_field(self) -> Field<'a> {
        self
    }
}

impl Field<'_> {
    /// Converts `raw` and stores it in the field.
    ///
    /// The field is left untouched when `raw` does not convert.
    pub fn set(&mut self, raw: &str) -> Result<(), ParseError> {
        match self {
            Field::Bool(v) => **v = parse_bool(raw)?,
            Field::Str(v) => **v = raw.to_owned(),
            Field::Int(v) => v.set(raw)?,
            Field::Duration(v) => **v = parse_duration(raw)?,
            Field::OptBool(v) => **v = Some(parse_bool(raw)?),
            Field::OptStr(v) => **v = Some(raw.to_owned()),
            Field::OptInt(v) => v.set(raw)?,
            Field::OptDuration(v) => **v = Some(parse_duration(raw)?),
        }
        Ok(())
    }

    /// Whether `raw` would convert, without storing it.
    pub fn check(&self, raw: &str) -> Result<(), ParseError> {
        match self {
            Field::Bool(_) | Field::OptBool(_) => parse_bool(raw).map(drop),
            Field::Str(_) | Field::OptStr(_) => Ok(()),
            Field::Int(v) => v.check(raw),
            Field::OptInt(v) => v.check(raw),
            Field::Duration(_) | Field::OptDuration(_) => parse_duration(raw).map(drop),
        }
    }

    /// Whether `-name` alone is enough to set the flag.
    pub fn is_bool_flag(&self) -> bool {
        matches!(self, Field::Bool(_) | Field::OptBool(_))
    }

    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            Field::OptBool(_) | Field::OptStr(_) | Field::OptInt(_) | Field::OptDuration(_)
        )
    }

    /// The field's type as it is written in the struct, e.g. `Option<i64>`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Field::Bool(_) => "bool",
            Field::Str(_) => "String",
            Field::Int(v) => v.type_name(),
            Field::Duration(_) => "Duration",
            Field::OptBool(_) => "Option<bool>",
            Field::OptStr(_) => "Option<String>",
            Field::OptInt(v) => v.type_name(),
            Field::OptDuration(_) => "Option<Duration>",
        }
    }

    /// The field's type with any `Option` stripped.
    pub fn inner_type_name(&self) -> &'static str {
        match self {
            Field::Bool(_) | Field::OptBool(_) => "bool",
            Field::Str(_) | Field::OptStr(_) => "String",
            Field::Int(v) => v.type_name(),
            Field::OptInt(v) => v.inner_type_name(),
            Field::Duration(_) | Field::OptDuration(_) => "Duration",
        }
    }

    /// How the zero value of this field's type renders.
    ///
    /// A default equal to this text is not worth showing in help output.
    pub fn zero_text(&self) -> &'static str {
        match self {
            Field::Bool(_) => "false",
            Field::Str(_) => "\"\"",
            Field::Int(_) => "0",
            Field::Duration(_) => "0s",
            Field::OptBool(_) | Field::OptStr(_) | Field::OptInt(_) | Field::OptDuration(_) => "",
        }
    }

    /// Value name shown after the flag in the default usage listing.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Bool(_) | Field::OptBool(_) => "",
            Field::Str(_) | Field::OptStr(_) => "string",
            Field::Int(_) | Field::OptInt(_) => self.inner_type_name(),
            Field::Duration(_) | Field::OptDuration(_) => "duration",
        }
    }
}

impl fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Bool(v) => write!(f, "{v}"),
            Field::Str(v) => write!(f, "\"{v}\""),
            Field::Int(v) => f.write_str(&v.render()),
            Field::Duration(v) => write!(f, "{}", humantime::format_duration(**v)),
            Field::OptBool(v) => match **v {
                Some(b) => write!(f, "{b}"),
                None => Ok(()),
            },
            Field::OptStr(v) => match v.as_deref() {
                Some(s) => write!(f, "\"{s}\""),
                None => Ok(()),
            },
            Field::OptInt(v) => f.write_str(&v.render()),
            Field::OptDuration(v) => match **v {
                Some(d) => write!(f, "{}", humantime::format_duration(d)),
                None => Ok(()),
            },
        }
    }
}

/// Parses the boolean spellings accepted on the command line.
pub fn parse_bool(raw: &str) -> Result<bool, ParseError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParseError::Syntax),
    }
}

fn parse_int<T>(raw: &str) -> Result<T, ParseError>
where
    T: FromStr<Err = ParseIntError>,
{
    raw.parse::<T>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ParseError::Range,
        _ => ParseError::Syntax,
    })
}

/// Durations are written as unit-suffixed numbers, e.g. `1h30m` or `250ms`.
fn parse_duration(raw: &str) -> Result<Duration, ParseError> {
    humantime::parse_duration(raw).map_err(|e| match e {
        humantime::DurationError::NumberOverflow => ParseError::Range,
        _ => ParseError::Syntax,
    })
}
