//! Routes for `memory` mode: one poll held in process memory, replaced
//! wholesale whenever the entry form is submitted.

use minijinja::context;
use rocket::form::Form;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::{get, post, FromForm, State};

use crate::error::ApiError;
use crate::processor::PollProcessor;
use crate::render::Templates;
use crate::routes::Page;
use crate::store::QuickPoll;

#[derive(Debug, FromForm)]
pub struct PollSetupForm {
    candidates: Option<String>,
}

#[derive(Debug, FromForm)]
pub struct PollVoteForm {
    candidate: Option<String>,
}

#[get("/")]
pub fn home(templates: &State<Templates>) -> Result<RawHtml<String>, ApiError> {
    templates.render("quick_home.html", context! {})
}

#[post("/", data = "<form>")]
pub fn start_poll(
    poll: &State<QuickPoll>,
    templates: &State<Templates>,
    form: Form<PollSetupForm>,
) -> Result<Page, ApiError> {
    match form.into_inner().candidates.filter(|names| !names.is_empty()) {
        Some(names) => {
            PollProcessor::reset_poll(poll, &names)?;
            Ok(Page::Redirect(Redirect::to("/vote")))
        }
        None => templates.render("quick_home.html", context! {}).map(Page::Html),
    }
}

#[get("/vote")]
pub fn ballot(poll: &State<QuickPoll>, templates: &State<Templates>) -> Result<Page, ApiError> {
    let poll = PollProcessor::snapshot(poll)?;
    if poll.is_empty() {
        return Ok(Page::Redirect(Redirect::to("/")));
    }

    let candidates: Vec<&str> = poll.names().collect();
    templates
        .render("quick_vote.html", context! { candidates })
        .map(Page::Html)
}

#[post("/vote", data = "<form>")]
pub fn vote(
    poll: &State<QuickPoll>,
    templates: &State<Templates>,
    form: Form<PollVoteForm>,
) -> Result<RawHtml<String>, ApiError> {
    let form = form.into_inner();
    let poll = PollProcessor::record_poll_vote(poll, form.candidate.as_deref())?;
    templates.render("quick_results.html", context! { results => poll.entries() })
}
