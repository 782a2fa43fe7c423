use std::process::ExitCode;

use eflag::FlagSet;
use example::{SimpleSettings, init_tracing, parse_or_exit, to_json};

fn main() -> ExitCode {
    init_tracing();

    let mut settings = SimpleSettings::with_defaults();

    let mut flags = FlagSet::from_env();
    flags.set_usage(eflag::posix_style);
    if let Err(err) = flags.bind(&mut settings) {
        eprintln!("{err}");
        return ExitCode::from(2);
    }
    if let Err(code) = parse_or_exit(&mut flags, std::env::args().skip(1)) {
        return code;
    }
    drop(flags);

    println!("{}", to_json(&settings));
    ExitCode::SUCCESS
}
