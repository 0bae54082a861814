//! Embedded HTML templates.
//!
//! The Jinja sources are compiled into the binary and parsed once at
//! startup, so a broken template fails `AppState::new` instead of a request.
//! Every template is HTML auto-escaped; variables not supplied at render
//! time expand to nothing.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use httpdummy_core::error::{HttpDummyError, Result};

const SOURCES: &[(&str, &str)] = &[
    ("index", include_str!("../templates/index.html.j2")),
    ("404", include_str!("../templates/404.html.j2")),
    ("routes", include_str!("../templates/routes.html.j2")),
    ("error", include_str!("../templates/error.html.j2")),
    ("slow_pre", include_str!("../templates/slow_pre.html.j2")),
    ("slow_post", include_str!("../templates/slow_post.html.j2")),
];

/// The parsed template set, read-only after startup.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Parse every embedded template.
    pub fn load() -> Result<Self> {
        Self::from_sources(SOURCES)
    }

    pub fn from_sources(sources: &[(&'static str, &'static str)]) -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_keep_trailing_newline(true);
        for (name, src) in sources {
            env.add_template(*name, *src)
                .map_err(|e| HttpDummyError::Template(format!("{name}: {e}")))?;
        }
        Ok(Self { env })
    }

    /// Render `name` with `ctx`, usually built with `minijinja::context!`.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|t| t.render(ctx))
            .map_err(|e| HttpDummyError::Template(format!("{name}: {e}")))
    }
}
