use std::process::ExitCode;

use eflag::{Error, FlagSet, Flags};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Fish settings: several names per field, a few optional values.
#[derive(Debug, Default, Serialize, Flags)]
pub struct SimpleSettings {
    /// name of one fish
    #[flag("one,1,theonlyone")]
    pub one_fish_name: String,
    // a flag needs names, the description is optional
    #[flag("2,two")]
    pub two_fish_name: String,
    #[flag("3,three", desc = "name of three fish")]
    pub three_fish_name: Option<String>,
    /// is it a fish? -f alone is enough
    #[flag("f,isafish")]
    pub is_a_fish: Option<bool>,
    #[flag("w,wormcount", desc = "number of worms you have")]
    pub worm_count: i64,
    #[flag("b,B", desc = "this is a boolean value")]
    pub boool: bool,
    // not pub, so never a flag
    #[flag("h")]
    #[serde(skip)]
    hidden_fish: String,
}

impl SimpleSettings {
    /// The compile-time defaults used by the `fish` binary.
    pub fn with_defaults() -> Self {
        Self {
            one_fish_name: "Wally 'The Default' Walleye".to_string(),
            two_fish_name: "Tod 'The Default' Cod".to_string(),
            ..Default::default()
        }
    }

    pub fn hidden_fish(&self) -> &str {
        &self.hidden_fish
    }
}

/// One field of every supported kind, plus two that are never bound.
#[derive(Debug, Default, Serialize, Flags)]
pub struct AllKinds {
    pub no_metadata: i32,
    #[serde(skip)]
    non_exported_field: i32,
    #[flag("s,someint", desc = "an integer")]
    pub some_integer_flag: isize,
    #[flag("spi,somepointer", desc = "stays null unless given")]
    pub some_pointer_to_int: Option<isize>,
    #[flag("ss,somestring", desc = "a string, empty unless given")]
    pub some_string_flag: String,
    #[flag("sps,somepointertostring", desc = "an optional string")]
    pub some_pointer_to_string: Option<String>,
    #[flag("sb,somebool", desc = "a boolean")]
    pub some_bool: bool,
    #[flag("spb,somepointertobool", desc = "an optional boolean")]
    pub some_pointer_to_bool: Option<bool>,
    #[flag("bi,bigint", desc = "a big i64")]
    pub big_int: i64,
    #[flag("pbi,bigintpointer", desc = "an optional big i64")]
    pub big_int_pointer: Option<i64>,
    #[flag("port", desc = "a port number")]
    pub port: u16,
}

impl AllKinds {
    /// The compile-time defaults used by the `kinds` binary.
    pub fn with_defaults() -> Self {
        Self {
            some_integer_flag: 34,
            some_pointer_to_string: Some("default pointer to string".to_string()),
            some_bool: true,
            big_int: 314_159_265,
            port: 8080,
            ..Default::default()
        }
    }

    pub fn non_exported_field(&self) -> i32 {
        self.non_exported_field
    }
}

/// Logs to stderr, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parses `args`, printing the usage text when that fails.
///
/// `-h`/`-help` exits successfully and any other error exits with status 2.
pub fn parse_or_exit<I, S>(flags: &mut FlagSet<'_>, args: I) -> Result<(), ExitCode>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    match flags.parse(args) {
        Ok(()) => Ok(()),
        Err(Error::Help) => {
            eprint!("{}", flags.usage());
            Err(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{err}");
            eprint!("{}", flags.usage());
            Err(ExitCode::from(2))
        }
    }
}

pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}
