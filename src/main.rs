use bauble::Config;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = bauble::window::run(Config::default()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
