use include_dir::{include_dir, Dir};
use minijinja::Environment;
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use serde::Serialize;
use tracing::warn;

use crate::error::ApiError;

static TEMPLATE_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Compiled page templates, embedded in the binary at build time.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn load() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for file in TEMPLATE_DIR.files() {
            let (Some(name), Some(source)) = (file.path().to_str(), file.contents_utf8()) else {
                warn!("Skipping unreadable template {}", file.path().display());
                continue;
            };
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<RawHtml<String>, ApiError> {
        let html = self.env.get_template(name)?.render(ctx)?;
        Ok(RawHtml(html))
    }
}

/// A one-shot notice carried across a redirect.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub kind: String,
    pub message: String,
}

impl From<FlashMessage<'_>> for Notice {
    fn from(flash: FlashMessage<'_>) -> Self {
        Self {
            kind: flash.kind().to_string(),
            message: flash.message().to_string(),
        }
    }
}
