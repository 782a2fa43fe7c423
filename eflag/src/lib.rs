// Licensed under the MIT license
// (see LICENSE or <http://opensource.org/licenses/MIT>) All files in the project carrying such
//! > eflag turns the public fields of a plain struct into command-line flags. You declare flag names and help text on the fields, and the values the struct already holds become the defaults.
//!
//! # How it works
//!
//! 1- Annotate a struct: derive `Flags` and give each field you want on the command line a `#[flag(...)]` attribute with a comma-separated list of names. Every name becomes a `-name` flag that writes to the same field.
//!
//! ```text
//! use eflag::Flags;
//!
//! #[derive(Flags)]
//! struct Settings {
//!     #[flag(names = "c,count", desc = "a count")]
//!     pub count: i32,
//!     /// who to greet
//!     #[flag("n,name")]
//!     pub name: Option<String>,
//!     #[flag("v")]
//!     pub verbose: bool,
//! }
//! ```
//!
//! 2- Bind and parse: set the defaults on the struct, bind it to a `FlagSet`, and parse. `Option` fields stay `None` unless the flag is given.
//!
//! ```text
//! let mut settings = Settings { count: 5, name: None, verbose: false };
//! let mut flags = eflag::FlagSet::from_env();
//! flags.bind(&mut settings)?;
//! flags.parse(std::env::args().skip(1))?;
//! drop(flags);
//! println!("{}", settings.count);
//! ```
//!
//! Flags are written `-name value`, `-name=value`, or just `-name` for booleans. Parsing stops at the first argument that is not a flag, or after `--`.
//!
//! 3- Usage: `posix_style` lists each field once with all of its names, its description, the default it had when bound, and its type.
//!
//! ```text
//! Usage: prog
//!
//! 	-c -count
//! 		a count (default: 5) [i32]
//!
//! 	-n -name
//! 		`String` who to greet  [Option<String>]
//!
//! 	-v
//! 		 (default: false) [bool]
//! ```
//!
//! Only `pub` fields are bound. Supported types are `bool`, `String`, `Duration`, the integer primitives, and `Option` of any of these. Durations are written with units, as in `-timeout 1h30m` or `-retry=250ms`.
//!
//! ```
//! use std::time::Duration;
//!
//! #[derive(eflag::Flags)]
//! struct Limits {
//!     #[flag("l,limit")]
//!     pub limit: u32,
//!     #[flag("t,timeout")]
//!     pub timeout: Duration,
//!     #[flag("retry")]
//!     pub retry: Option<Duration>,
//! }
//!
//! let mut limits = Limits { limit: 1, timeout: Duration::from_secs(5), retry: None };
//! let mut flags = eflag::FlagSet::new("limits");
//! flags.bind(&mut limits).unwrap();
//! flags.parse(["-t", "1h30m", "-l=3"]).unwrap();
//! drop(flags);
//! assert_eq!(limits.timeout, Duration::from_secs(5400));
//! assert_eq!(limits.retry, None);
//! ```
//!
//! Any other type is rejected when the struct is compiled:
//!
//! ```compile_fail,E0277
//! #[derive(eflag::Flags)]
//! struct Settings {
//!     #[flag("n,names")]
//!     pub names: Vec<String>,
//! }
//! ```
//!
//! ```compile_fail,E0277
//! #[derive(eflag::Flags)]
//! struct Settings {
//!     #[flag("r,ratio")]
//!     pub ratio: f64,
//! }
//! ```
pub use eflag_core::*;
pub use eflag_derive::Flags;
