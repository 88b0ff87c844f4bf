pub mod config;
pub mod processor;
pub mod routes;
pub mod quick_poll;
pub mod store;
pub mod error;
pub mod catchers;
pub mod render;
pub use shared::{models::*, validation::*, Poll, PollEntry, Tally, CandidateTally};

use rocket::figment::Figment;
use rocket::{catchers, routes, Build, Rocket};
use tracing::info;

use crate::catchers::{bad_request, internal_error, not_found, unprocessable};
use crate::config::{AppConfig, PollMode};
use crate::error::StartupError;
use crate::render::Templates;
use crate::routes::AppState;
use crate::store::QuickPoll;

/// Assembles the server for whichever mode the figment selects.
pub fn build_rocket(figment: Figment) -> Result<Rocket<Build>, StartupError> {
    let config: AppConfig = figment.extract()?;
    let templates = Templates::load()?;

    let rocket = rocket::custom(figment)
        .manage(templates)
        .register("/", catchers![bad_request, not_found, unprocessable, internal_error]);

    let rocket = match config.mode {
        PollMode::File => {
            std::fs::create_dir_all(&config.data_dir)?;
            info!(
                "📋 Serving file-backed poll: candidates in {}, votes in {}",
                config.candidates_path().display(),
                config.votes_path().display()
            );
            rocket.manage(AppState::from_config(&config)).mount(
                "/",
                routes![
                    routes::ballot,
                    routes::manage,
                    routes::add_candidate,
                    routes::vote,
                    routes::thanks,
                    routes::results,
                    routes::api_candidates,
                    routes::api_results
                ],
            )
        }
        PollMode::Memory => {
            info!("📋 Serving in-memory poll; votes are lost on restart");
            rocket.manage(QuickPoll::default()).mount(
                "/",
                routes![
                    quick_poll::home,
                    quick_poll::start_poll,
                    quick_poll::ballot,
                    quick_poll::vote
                ],
            )
        }
    };

    Ok(rocket)
}
