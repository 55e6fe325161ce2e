use tracing_subscriber::EnvFilter;

mod config;
mod driver;

use config::HarnessConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = HarnessConfig::load();
    config.validate();

    let base_seed = if config.run.seed == 0 {
        rand::random::<u64>()
    } else {
        config.run.seed
    };

    tracing::info!(
        sessions = config.run.sessions,
        base_seed,
        tick_hz = config.run.tick_hz,
        win_chance = config.run.win_chance,
        "lava quest harness starting"
    );

    for i in 0..config.run.sessions {
        let seed = base_seed.wrapping_add(u64::from(i));
        let (_commands, handle) = driver::spawn_session(&config, seed);
        match handle.await {
            Ok(summary) => match serde_json::to_string(&summary) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!(error = %e, "failed to encode run summary"),
            },
            Err(e) => tracing::error!(error = %e, "session task failed"),
        }
    }
}
