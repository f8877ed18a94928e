//! Prompt templates rendered with Handlebars. Email content is untrusted
//! input, so no helpers are registered and strict mode turns a missing
//! variable into an error instead of an empty string.

use std::fmt;

use handlebars::Handlebars;

#[derive(Debug)]
pub enum Prompt {
    EmailSummary,
    DraftReply,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const EMAIL_SUMMARY_PROMPT: &str = "Summarize this email in 2 sentences:

{{content}}";

const DRAFT_REPLY_PROMPT: &str = "Draft a short, professional reply to this email. Tone: {{tone}}.

Email:
{{content}}";

pub fn templates<'a>() -> Result<Handlebars<'a>, handlebars::TemplateError> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    // Prompts are plain text, HTML escaping would mangle quotes and
    // angle brackets in addresses
    registry.register_escape_fn(handlebars::no_escape);
    registry.register_template_string(&Prompt::EmailSummary.to_string(), EMAIL_SUMMARY_PROMPT)?;
    registry.register_template_string(&Prompt::DraftReply.to_string(), DRAFT_REPLY_PROMPT)?;
    Ok(registry)
}
