use tera::{Context, Tera};

use crate::dashboard::Dashboard;
use crate::error::WebError;

const PAGE: &str = "page.html";

/// Compiled page templates, embedded in the binary.
#[derive(Debug, Clone)]
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, WebError> {
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE, include_str!("../templates/page.html"))?;
        Ok(Self { tera })
    }

    pub fn render_page(&self, dashboard: &Dashboard) -> Result<String, WebError> {
        let context = Context::from_serialize(dashboard)?;
        Ok(self.tera.render(PAGE, &context)?)
    }
}
