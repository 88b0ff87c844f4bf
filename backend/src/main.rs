use backend::build_rocket;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚀 Starting poll server");

    let _rocket = build_rocket(rocket::Config::figment())?.launch().await?;
    Ok(())
}
