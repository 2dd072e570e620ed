use log::LevelFilter;
use std::io::Write;

/// Sends diagnostics to stderr as `LEVEL: message` lines.
pub fn init(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .try_init();
}
