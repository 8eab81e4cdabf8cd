//! Main application entry point (native).

/// Environment variable naming a JSON configuration file.
#[cfg(feature = "native")]
const CONFIG_ENV: &str = "TAGKIT_CONFIG";

#[cfg(feature = "native")]
fn main() {
    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => match tagkit_core::AppConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        Err(_) => tagkit_core::AppConfig::default(),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter)).init();
    log::info!("Starting tagkit");

    match tagkit_app::run_showcase(&config) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
