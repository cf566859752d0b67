//! Fetches an edital page and reduces it to readable text. Government
//! portals are flaky and some block default HTTP clients, so requests
//! retry with a rotating browser user agent.

use std::time::Duration;

use scraper::{Html, Node};
use tracing::warn;

use super::LoaderError;

const FETCH_ATTEMPTS: u32 = 5;
const FETCH_RETRY_DELAY: Duration = Duration::from_secs(3);

const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
];

fn user_agent_for(attempt: u32) -> &'static str {
    USER_AGENTS[attempt as usize % USER_AGENTS.len()]
}

/// Downloads `url` and returns its visible text. A page that loads but
/// carries no text (fully scripted portals) is treated as unavailable.
pub async fn fetch_url_text(client: &reqwest::Client, url: &str) -> Result<String, LoaderError> {
    for attempt in 0..FETCH_ATTEMPTS {
        if attempt > 0 {
            tokio::time::sleep(FETCH_RETRY_DELAY).await;
        }

        let request = client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent_for(attempt));

        match request.send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => {
                    let text = html_to_text(&body);
                    if text.is_empty() {
                        return Err(LoaderError::SiteUnavailable);
                    }
                    return Ok(text);
                }
                Err(e) => {
                    warn!(attempt = attempt + 1, error = %e, url, "failed to read response body");
                }
            },
            Ok(response) => {
                let status = response.status();
                warn!(attempt = attempt + 1, %status, url, "fetch returned non-success status");
            }
            Err(e) => {
                warn!(attempt = attempt + 1, error = %e, url, "fetch failed");
            }
        }
    }

    Err(LoaderError::SiteUnavailable)
}

const SKIPPED_TAGS: [&str; 7] =
    ["script", "style", "noscript", "head", "template", "iframe", "svg"];

const BLOCK_TAGS: [&str; 20] = [
    "p", "div", "br", "li", "ul", "ol", "tr", "table", "h1", "h2", "h3", "h4", "h5", "h6",
    "section", "article", "header", "footer", "form", "blockquote",
];

/// Flattens an HTML document into plain text, one line per block element,
/// with script and style subtrees dropped.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    collect_text(document.tree.root(), &mut raw);
    tidy(&raw)
}

fn collect_text(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    if let Node::Text(text) = node.value() {
        out.push_str(&text);
        return;
    }

    let mut block = false;
    if let Node::Element(element) = node.value() {
        if SKIPPED_TAGS.contains(&element.name()) {
            return;
        }
        block = BLOCK_TAGS.contains(&element.name());
    }

    if block {
        out.push('\n');
    }
    for child in node.children() {
        collect_text(child, out);
    }
    if block {
        out.push('\n');
    }
}

/// Trims each line, collapses internal whitespace and squeezes runs of
/// blank lines down to a single paragraph break.
fn tidy(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = true;
    for line in raw.lines() {
        let compact = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if compact.is_empty() {
            if !previous_blank {
                lines.push(String::new());
                previous_blank = true;
            }
        } else {
            lines.push(compact);
            previous_blank = false;
        }
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_and_styles_are_dropped() {
        let html = "<html><head><style>body { color: red }</style></head>\
                    <body><script>var x = 1;</script><p>Edital aberto</p></body></html>";
        assert_eq!(html_to_text(html), "Edital aberto");
    }

    #[test]
    fn test_block_elements_split_lines() {
        let html = "<body><h1>Edital 12/2025</h1><p>Inscri\u{e7}\u{f5}es at\u{e9} maio.</p>\
                    <ul><li>Categoria A</li><li>Categoria B</li></ul></body>";
        let text = html_to_text(html);
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            vec![
                "Edital 12/2025",
                "Inscri\u{e7}\u{f5}es at\u{e9} maio.",
                "Categoria A",
                "Categoria B"
            ]
        );
    }

    #[test]
    fn test_inline_markup_stays_on_one_line() {
        let html = "<body><p>Valor de <strong>R$ 50.000</strong> por projeto</p></body>";
        assert_eq!(html_to_text(html), "Valor de R$ 50.000 por projeto");
    }

    #[test]
    fn test_blank_runs_collapse_to_one_paragraph_break() {
        let html = "<body><div><div><p>Primeiro</p></div></div><div></div><p>Segundo</p></body>";
        assert_eq!(html_to_text(html), "Primeiro\n\nSegundo");
    }

    #[test]
    fn test_user_agents_rotate_and_wrap() {
        assert_ne!(user_agent_for(0), user_agent_for(1));
        assert_eq!(user_agent_for(0), user_agent_for(USER_AGENTS.len() as u32));
    }
}
