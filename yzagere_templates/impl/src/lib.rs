use std::sync::Arc;

use tera::Tera;
use yzagere_templates_contracts::{Template, TemplateService, TEMPLATES};

#[derive(Debug, Clone)]
pub struct TemplateServiceImpl {
    state: State,
}

#[derive(Debug, Clone)]
struct State(Arc<Tera>);

impl TemplateServiceImpl {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.add_raw_templates(TEMPLATES.iter().copied())?;

        tracing::debug!(count = TEMPLATES.len(), "loaded templates");

        Ok(Self {
            state: State(tera.into()),
        })
    }
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<String> {
        let context = tera::Context::from_serialize(template)?;
        self.state.0.render(T::NAME, &context).map_err(Into::into)
    }
}
