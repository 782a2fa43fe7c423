use std::process::ExitCode;

use eflag::FlagSet;
use example::{AllKinds, SimpleSettings, init_tracing, parse_or_exit, to_json};
use tracing::info;

fn main() -> ExitCode {
    init_tracing();

    let mut kinds = AllKinds::with_defaults();
    let mut fish = SimpleSettings::default();
    let before_kinds = to_json(&kinds);
    let before_fish = to_json(&fish);

    let mut flags = FlagSet::from_env();
    flags.set_usage(eflag::posix_style);
    if let Err(err) = flags.bind(&mut kinds) {
        eprintln!("{err}");
        return ExitCode::from(2);
    }
    if let Err(err) = flags.bind(&mut fish) {
        eprintln!("{err}");
        return ExitCode::from(2);
    }
    if let Ok(path) = std::env::var("EFLAG_DEFAULTS") {
        match eflag::apply_defaults_file(&mut flags, &path) {
            Ok(applied) => info!(path = %path, applied, "applied defaults file"),
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::from(2);
            }
        }
    }
    if let Err(code) = parse_or_exit(&mut flags, std::env::args().skip(1)) {
        return code;
    }
    let rest = flags.args().to_vec();
    drop(flags);

    println!("{before_kinds}");
    println!("{}", to_json(&kinds));
    println!("{before_fish}");
    println!("{}", to_json(&fish));
    if !rest.is_empty() {
        println!("remaining arguments: {rest:?}");
    }
    ExitCode::SUCCESS
}
