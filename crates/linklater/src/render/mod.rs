//! Draft and email template rendering.

use anyhow::Result;
use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

use crate::enrichment::LinkRecord;

const TEMPLATE_NAMES: [&str; 2] = ["draft", "email"];

/// Data handed to the templates.
#[derive(Debug, Clone, Serialize)]
pub struct DraftContext {
    pub handle: String,
    pub max_age_days: u32,
    pub generated_at: DateTime<Utc>,
    pub link_count: usize,
    pub links: Vec<LinkRecord>,
}

impl DraftContext {
    #[must_use]
    pub fn new(handle: impl Into<String>, max_age_days: u32, links: Vec<LinkRecord>) -> Self {
        Self {
            handle: handle.into(),
            max_age_days,
            generated_at: Utc::now(),
            link_count: links.len(),
            links,
        }
    }
}

/// Renders harvested links with Handlebars templates.
pub struct DraftRenderer {
    handlebars: Handlebars<'static>,
}

impl DraftRenderer {
    /// Create a renderer with the embedded templates.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);

        handlebars.register_template_string("draft", DRAFT_TEMPLATE)?;
        handlebars.register_template_string("email", EMAIL_TEMPLATE)?;

        Ok(Self { handlebars })
    }

    /// Create a renderer, overriding embedded templates with `<name>.hbs` files in `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut renderer = Self::new()?;

        for name in TEMPLATE_NAMES {
            let path = dir.join(format!("{name}.hbs"));
            if path.exists() {
                let content = std::fs::read_to_string(&path)?;
                renderer.handlebars.register_template_string(name, &content)?;
                tracing::debug!(template = name, path = %path.display(), "Loaded template override");
            }
        }

        Ok(renderer)
    }

    /// Render the draft post body (HTML).
    pub fn render_draft(&self, context: &DraftContext) -> Result<String> {
        Ok(self.handlebars.render("draft", context)?)
    }

    /// Render the notification email body (plain text).
    pub fn render_email(&self, context: &DraftContext) -> Result<String> {
        Ok(self.handlebars.render("email", context)?)
    }
}

/// Draft post body.
const DRAFT_TEMPLATE: &str = r#"{{#each links}}
<div class="link">
    {{#if image}}<a href="{{url}}"><img src="{{image}}" alt=""></a>{{/if}}
    <h2><a href="{{url}}">{{#if title}}{{title}}{{else}}{{url}}{{/if}}</a></h2>
    {{#if description}}<p class="description">{{description}}</p>{{/if}}
    <p class="via">
        <a href="{{tweet_url}}">{{#if tweeted_by}}via @{{tweeted_by}}{{else}}via @{{../handle}}{{/if}}</a>:
        {{tweet_text}}
    </p>
</div>
{{/each}}
"#;

/// Notification email body.
const EMAIL_TEMPLATE: &str = r"A new Linklater draft is ready.

{{link_count}} links shared by @{{handle}} in the last {{max_age_days}} days:

{{#each links}}
* {{#if title}}{{{title}}}{{else}}{{{url}}}{{/if}}
  {{{url}}}
{{/each}}
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::status_url;

    fn link(url: &str, title: Option<&str>, tweeted_by: Option<&str>) -> LinkRecord {
        LinkRecord {
            url: url.to_string(),
            title: title.map(str::to_string),
            description: None,
            image: None,
            tweet_text: "worth a read & more".to_string(),
            tweet_url: status_url(tweeted_by.unwrap_or("acme"), "1"),
            tweeted_by: tweeted_by.map(str::to_string),
        }
    }

    #[test]
    fn test_render_draft() {
        let renderer = DraftRenderer::new().unwrap();
        let context = DraftContext::new(
            "acme",
            7,
            vec![
                link("https://example.com/a", Some("Story A"), None),
                link("https://example.com/b", None, Some("orig")),
            ],
        );

        let html = renderer.render_draft(&context).unwrap();
        assert!(html.contains(r#"<a href="https://example.com/a">Story A</a>"#));
        assert!(html.contains(r#"<a href="https://example.com/b">https://example.com/b</a>"#));
        assert!(html.contains("via @acme"));
        assert!(html.contains("via @orig"));
        assert!(html.contains("worth a read &amp; more"));
    }

    #[test]
    fn test_render_email() {
        let renderer = DraftRenderer::new().unwrap();
        let context = DraftContext::new(
            "acme",
            7,
            vec![link("https://example.com/a", Some("Story A"), None)],
        );

        let text = renderer.render_email(&context).unwrap();
        assert!(text.contains("1 links shared by @acme in the last 7 days"));
        assert!(text.contains("* Story A"));
    }

    #[test]
    fn test_from_dir_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("email.hbs"), "{{handle}} has {{link_count}}").unwrap();

        let renderer = DraftRenderer::from_dir(dir.path()).unwrap();
        let context = DraftContext::new("acme", 7, vec![]);

        assert_eq!(renderer.render_email(&context).unwrap(), "acme has 0");
        // Draft falls back to the embedded template.
        assert!(renderer.render_draft(&context).unwrap().trim().is_empty());
    }
}
