use verlet_life::{app, config};

fn main() {
    env_logger::init();

    if let Err(err) = app::run(config::DEFAULT_RUN_FRAMES) {
        log::error!("fatal: {err}");
        std::process::exit(1);
    }
}
