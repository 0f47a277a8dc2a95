use squeezit_api::{setup, telemetry};
use squeezit_core::Config;

// Use mimalloc as the global allocator for lower fragmentation under many
// short-lived image buffers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    telemetry::init_telemetry();

    let config = Config::from_env()?;

    let (_state, router) = setup::initialize_app(config.clone())?;

    setup::server::start_server(&config, router).await?;

    Ok(())
}
