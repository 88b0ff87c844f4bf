use minijinja::context;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::{catch, Request};

use crate::render::Templates;

fn error_page(req: &Request, status: Status, message: &str) -> RawHtml<String> {
    req.rocket()
        .state::<Templates>()
        .and_then(|templates| {
            templates
                .render("error.html", context! { code => status.code, reason => status.reason(), message })
                .ok()
        })
        .unwrap_or_else(|| RawHtml(format!("<h1>{status}</h1><p>{message}</p>")))
}

#[catch(400)]
pub fn bad_request(req: &Request) -> RawHtml<String> {
    error_page(req, Status::BadRequest, "Invalid request parameters.")
}

#[catch(404)]
pub fn not_found(req: &Request) -> RawHtml<String> {
    error_page(req, Status::NotFound, "The requested page was not found.")
}

#[catch(422)]
pub fn unprocessable(req: &Request) -> RawHtml<String> {
    error_page(req, Status::UnprocessableEntity, "The submitted form could not be read.")
}

#[catch(500)]
pub fn internal_error(req: &Request) -> RawHtml<String> {
    error_page(req, Status::InternalServerError, "An internal server error occurred.")
}
