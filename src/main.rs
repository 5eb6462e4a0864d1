use tracing_subscriber::EnvFilter;

use connectivity_test::cli::{info_request, process_flags};
use connectivity_test::{App, Reporter};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let (verbosity, positional) = process_flags(std::env::args_os().skip(1));
    if let Some(e) = info_request(&positional) {
        e.exit();
    }

    let code = App::new(Reporter::stdout(verbosity)).run(&positional);
    std::process::exit(code);
}
