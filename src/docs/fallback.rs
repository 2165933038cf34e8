//! Synthesized documentation for projects without a readable document.

use crate::catalog::ProjectRecord;
use crate::i18n::LocaleService;
use crate::utils::html_escape;

/// Build the fallback block: a notice followed by the project's description,
/// highlights and tech stack. Empty sections are left out.
pub fn synthesize_fallback(project: &ProjectRecord, i18n: &LocaleService) -> String {
    let locale = i18n.current();
    let description = project.description.resolve(locale);
    let highlights = project.highlights.resolve(locale);

    let mut html = String::from(r#"<div class="readme-fallback">"#);
    html.push_str(&format!(
        r#"<p class="readme-fallback-notice">{}</p>"#,
        html_escape(&i18n.translate("projectDetail.noReadme"))
    ));

    if !description.is_empty() {
        html.push_str(&format!(
            r#"<div class="readme-fallback-description"><h3>{}</h3><p>{}</p></div>"#,
            html_escape(&i18n.translate("projectDetail.projectOverview")),
            html_escape(&description)
        ));
    }

    if !highlights.is_empty() {
        let items: String = highlights
            .iter()
            .map(|h| format!("<li>{}</li>", html_escape(h)))
            .collect();
        html.push_str(&format!(
            r#"<div class="readme-fallback-highlights"><h3>{}</h3><ul>{}</ul></div>"#,
            html_escape(&i18n.translate("projectDetail.highlights")),
            items
        ));
    }

    if !project.tech_stack.is_empty() {
        let tags: String = project
            .tech_stack
            .iter()
            .map(|t| format!(r#"<span class="tech-tag">{}</span>"#, html_escape(t)))
            .collect();
        html.push_str(&format!(
            r#"<div class="readme-fallback-tech"><h3>{}</h3><div class="tech-tags">{}</div></div>"#,
            html_escape(&i18n.translate("projectDetail.techStack")),
            tags
        ));
    }

    html.push_str("</div>");
    html
}
