//! Default LLM prompts for title and meta description rewrites.

use crate::llm::Tone;
use crate::models::{KeywordImportance, PageSummary};

/// Default system message.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert SEO copywriter.";

/// Default per-page prompt.
///
/// Placeholders: {url}, {current_title}, {current_meta}, {primary_keywords},
/// {secondary_keywords}, {tone}.
pub const DEFAULT_PAGE_PROMPT: &str = r#"You are a professional SEO copywriter.

Your task:
Generate an optimized SEO Title (max 60 characters) and Meta Description (max 160 characters) for the following webpage.

Page URL: {url}

Current Title:
"{current_title}"

Current Meta Description:
"{current_meta}"

Here are the keywords and their importance:

Primary Keywords:
{primary_keywords}

Secondary Keywords:
{secondary_keywords}

Guidelines:
- Primary keywords must appear in the Title and Meta Description.
- Secondary keywords should be included if they fit naturally, but are not mandatory.
- The Title should be attractive and encourage clicks.
- The Meta Description should be compelling and clearly explain the page's purpose.
- Keep the writing clear, natural, and reader-friendly.
- Do not exceed character limits.
- Writing Tone: {tone}

Please return your response in this format:

Title: ...
Meta Description: ..."#;

fn bullet_list(keywords: &[&str]) -> String {
    if keywords.is_empty() {
        "None".to_string()
    } else {
        keywords
            .iter()
            .map(|kw| format!("- {}", kw))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Fill a page prompt template for one summary.
///
/// Placeholders are resolved in a single pass, so braces inside scraped
/// titles or descriptions are copied through untouched. Unknown `{name}`
/// tokens are left as written.
pub fn render_page_prompt(template: &str, summary: &PageSummary, tone: Tone) -> String {
    let primary = bullet_list(&summary.keywords_with(KeywordImportance::Primary));
    let secondary = bullet_list(&summary.keywords_with(KeywordImportance::Secondary));

    let lookup = |name: &str| match name {
        "url" => Some(summary.page.as_str()),
        "current_title" => Some(summary.current_title.as_str()),
        "current_meta" => Some(summary.current_meta.as_str()),
        "primary_keywords" => Some(primary.as_str()),
        "secondary_keywords" => Some(secondary.as_str()),
        "tone" => Some(tone.instruction()),
        _ => None,
    };

    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}').and_then(|close| Some((close, lookup(&after[..close])?))) {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> PageSummary {
        PageSummary {
            url_id: 1,
            page: "https://shop.example/shoes".to_string(),
            keywords: vec!["running shoes".into(), "trail shoes".into()],
            keyword_importance: vec![KeywordImportance::Primary, KeywordImportance::Primary],
            current_title: "Shoes".to_string(),
            current_meta: String::new(),
            suggested_title: None,
            suggested_meta: None,
        }
    }

    #[test]
    fn test_prompt_lists_keywords_by_tier() {
        let prompt = render_page_prompt(DEFAULT_PAGE_PROMPT, &summary(), Tone::Friendly);

        assert!(prompt.contains("Page URL: https://shop.example/shoes"));
        assert!(prompt.contains("Primary Keywords:\n- running shoes\n- trail shoes"));
        assert!(prompt.contains("Secondary Keywords:\nNone"));
        assert!(prompt.contains(Tone::Friendly.instruction()));
        assert!(prompt.contains("\"Shoes\""));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_custom_template() {
        let prompt = render_page_prompt("{url} | {tone}", &summary(), Tone::Professional);
        assert_eq!(
            prompt,
            format!("https://shop.example/shoes | {}", Tone::Professional.instruction())
        );
    }

    #[test]
    fn test_braces_in_scraped_fields_are_kept() {
        let mut page = summary();
        page.current_title = "Sale {tone}".to_string();
        page.current_meta = "Meta {primary_keywords}".to_string();

        let prompt = render_page_prompt(DEFAULT_PAGE_PROMPT, &page, Tone::Friendly);

        assert!(prompt.contains("\"Sale {tone}\""));
        assert!(prompt.contains("\"Meta {primary_keywords}\""));
        assert_eq!(prompt.matches(Tone::Friendly.instruction()).count(), 1);
    }

    #[test]
    fn test_unknown_placeholders_untouched() {
        let prompt = render_page_prompt("{url} {nope} {", &summary(), Tone::Professional);
        assert_eq!(prompt, "https://shop.example/shoes {nope} {");
    }
}
