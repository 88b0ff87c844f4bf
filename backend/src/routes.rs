use minijinja::context;
use rocket::form::Form;
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Flash, Redirect};
use rocket::serde::json::Json;
use rocket::{get, post, FromForm, Responder, State};
use shared::models::*;
use tracing::instrument;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::processor::PollProcessor;
use crate::render::{Notice, Templates};
use crate::store::{CandidateStore, FileVoteLog, JsonCandidateStore, VoteLog};

pub struct AppState {
    pub candidates: Box<dyn CandidateStore>,
    pub votes: Box<dyn VoteLog>,
}

impl AppState {
    pub fn new(candidates: impl CandidateStore + 'static, votes: impl VoteLog + 'static) -> Self {
        Self {
            candidates: Box::new(candidates),
            votes: Box::new(votes),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            JsonCandidateStore::new(config.candidates_path()),
            FileVoteLog::new(config.votes_path()),
        )
    }
}

/// Either a rendered page or a bare redirect.
#[derive(Responder)]
pub enum Page {
    Html(RawHtml<String>),
    Redirect(Redirect),
}

#[derive(Debug, FromForm)]
pub struct CandidateForm {
    name: Option<String>,
    description: Option<String>,
}

#[get("/")]
pub async fn ballot(
    state: &State<AppState>,
    templates: &State<Templates>,
    flash: Option<FlashMessage<'_>>,
) -> Result<Page, ApiError> {
    let candidates = state.candidates.load().await?;
    if candidates.is_empty() {
        return Ok(Page::Redirect(Redirect::to("/manage")));
    }

    let notice = flash.map(Notice::from);
    templates
        .render("ballot.html", context! { candidates, notice })
        .map(Page::Html)
}

#[get("/manage")]
pub async fn manage(
    state: &State<AppState>,
    templates: &State<Templates>,
    flash: Option<FlashMessage<'_>>,
) -> Result<RawHtml<String>, ApiError> {
    let candidates = state.candidates.load().await?;
    let notice = flash.map(Notice::from);
    templates.render("manage.html", context! { candidates, notice })
}

#[instrument(skip(state, form))]
#[post("/add_candidate", data = "<form>")]
pub async fn add_candidate(
    state: &State<AppState>,
    form: Form<CandidateForm>,
) -> Result<Flash<Redirect>, ApiError> {
    let form = form.into_inner();
    let name = form.name.as_deref().unwrap_or_default();
    let description = form.description.as_deref().unwrap_or_default();

    match PollProcessor::add_candidate(state.candidates.as_ref(), name, description).await {
        Ok(candidate) => Ok(Flash::success(
            Redirect::to("/manage"),
            format!("Candidate '{}' added successfully!", candidate.name),
        )),
        Err(ApiError::Validation(e)) => Ok(Flash::error(Redirect::to("/manage"), e.to_string())),
        Err(e) => Err(e),
    }
}

#[instrument(skip(state))]
#[get("/vote?<candidate>")]
pub async fn vote(
    state: &State<AppState>,
    candidate: Option<String>,
) -> Result<Flash<Redirect>, ApiError> {
    let result = PollProcessor::cast_vote(
        state.candidates.as_ref(),
        state.votes.as_ref(),
        candidate.as_deref(),
    )
    .await;

    match result {
        Ok(_) => Ok(Flash::success(Redirect::to("/thanks"), "Your vote has been recorded.")),
        Err(ApiError::Validation(e)) => Ok(Flash::error(Redirect::to("/"), e.to_string())),
        Err(e) => Err(e),
    }
}

#[get("/thanks")]
pub fn thanks(
    templates: &State<Templates>,
    flash: Option<FlashMessage<'_>>,
) -> Result<RawHtml<String>, ApiError> {
    let notice = flash.map(Notice::from);
    templates.render("thanks.html", context! { notice })
}

#[get("/results")]
pub async fn results(
    state: &State<AppState>,
    templates: &State<Templates>,
) -> Result<RawHtml<String>, ApiError> {
    let tally = PollProcessor::tally(state.candidates.as_ref(), state.votes.as_ref()).await?;
    let total_votes = tally.total_votes();
    let results = tally.into_entries();
    templates.render("results.html", context! { results, total_votes })
}

#[get("/api/candidates")]
pub async fn api_candidates(state: &State<AppState>) -> Result<Json<Vec<Candidate>>, ApiError> {
    Ok(Json(state.candidates.load().await?))
}

#[get("/api/results")]
pub async fn api_results(state: &State<AppState>) -> Result<Json<ResultsResponse>, ApiError> {
    let tally = PollProcessor::tally(state.candidates.as_ref(), state.votes.as_ref()).await?;
    Ok(Json(tally.into()))
}
