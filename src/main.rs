mod app;

use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(err) = app::run() {
        eprintln!("{}", app::error_report(&err));
        std::process::exit(1);
    }
}
