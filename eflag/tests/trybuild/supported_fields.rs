use std::time::Duration;

use eflag::{FlagSet, Flags, declared_args};

#[derive(Debug, Default, Flags)]
struct Everything {
    #[flag("b")]
    pub b: bool,
    #[flag("s")]
    pub s: String,
    #[flag("i8")]
    pub i8: i8,
    #[flag("i16")]
    pub i16: i16,
    #[flag("i32")]
    pub i32: i32,
    #[flag("i64")]
    pub i64: i64,
    #[flag("i128")]
    pub i128: i128,
    #[flag("isize")]
    pub isize: isize,
    #[flag("u8")]
    pub u8: u8,
    #[flag("u16")]
    pub u16: u16,
    #[flag("u32")]
    pub u32: u32,
    #[flag("u64")]
    pub u64: u64,
    #[flag("u128")]
    pub u128: u128,
    #[flag("usize")]
    pub usize: usize,
    #[flag("d")]
    pub d: Duration,
    #[flag("ob")]
    pub ob: Option<bool>,
    #[flag("os")]
    pub os: Option<String>,
    #[flag("oi")]
    pub oi: Option<i64>,
    #[flag("ou")]
    pub ou: Option<u16>,
    #[flag("od")]
    pub od: Option<Duration>,
}

fn main() {
    let mut everything = Everything::default();
    let mut flags = FlagSet::new("everything");
    flags.bind(&mut everything).unwrap();
    assert_eq!(declared_args(&flags).len(), 20);
}
