//! Page templates for pager outcomes

use serde::Serialize;

use suitepager_common::{PageOutcome, Result, SessionState};

/// Renders a [`PageOutcome`] into a full HTML document
#[derive(Debug, Clone)]
pub struct PageTemplates {
    title: String,
}

impl PageTemplates {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn render(&self, outcome: &PageOutcome) -> Result<String> {
        match outcome {
            PageOutcome::Done { session } => self.render_done(session),
            PageOutcome::Suite {
                elements,
                tags,
                session,
            } => self.render_suite(elements, tags, session),
        }
    }

    fn render_suite(&self, elements: &[String], tags: &str, session: &SessionState) -> Result<String> {
        #[derive(Serialize)]
        struct Bootstrap<'a> {
            done: bool,
            tags: &'a str,
            session: &'a SessionState,
        }

        let bootstrap = script_json(&Bootstrap {
            done: false,
            tags,
            session,
        })?;

        let mut html = format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<html>\n",
                "<head>\n",
                "<meta charset=\"utf-8\">\n",
                "<title>{} - {}</title>\n",
                "<script type=\"text/javascript\">window.testRunner = {};</script>\n",
            ),
            escape_html(&self.title),
            escape_html(tags),
            bootstrap
        );
        for element in elements {
            html.push_str(element);
            html.push('\n');
        }
        html.push_str(&format!(
            concat!(
                "</head>\n",
                "<body data-template=\"suite-page\" data-tags=\"{}\" data-test-index=\"{}\">\n",
                "</body>\n",
                "</html>\n",
            ),
            escape_html(tags),
            session.test_index
        ));
        Ok(html)
    }

    fn render_done(&self, session: &SessionState) -> Result<String> {
        #[derive(Serialize)]
        struct Bootstrap<'a> {
            done: bool,
            session: &'a SessionState,
        }

        let bootstrap = script_json(&Bootstrap {
            done: true,
            session,
        })?;

        Ok(format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<html>\n",
                "<head>\n",
                "<meta charset=\"utf-8\">\n",
                "<title>{} - done</title>\n",
                "<script type=\"text/javascript\">window.testRunner = {};</script>\n",
                "</head>\n",
                "<body data-template=\"done\">\n",
                "<p>All suites served for session <code>{}</code>.</p>\n",
                "</body>\n",
                "</html>\n",
            ),
            escape_html(&self.title),
            bootstrap,
            escape_html(&session.test_runner_session)
        ))
    }
}

impl Default for PageTemplates {
    fn default() -> Self {
        Self::new("SuitePager")
    }
}

/// JSON safe to inline in a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn session() -> SessionState {
        SessionState {
            test_runner_session: "1700000000000".to_string(),
            test_index: 1,
            env: Some("prod".to_string()),
            reporter_url: "http://r/report?testRunnerSession=1700000000000&testIndex=1".to_string(),
            extra: BTreeMap::from([("note".to_string(), "</script>".to_string())]),
        }
    }

    #[test]
    fn test_suite_page_keeps_element_order() {
        let outcome = PageOutcome::Suite {
            elements: vec!["<link id=\"first\"/>".to_string(), "<div id=\"second\"></div>".to_string()],
            tags: "smoke, header".to_string(),
            session: session(),
        };
        let html = PageTemplates::default().render(&outcome).unwrap();

        let first = html.find("id=\"first\"").unwrap();
        let second = html.find("id=\"second\"").unwrap();
        assert!(first < second);
        assert!(html.contains("data-tags=\"smoke, header\""));
        assert!(html.contains("data-test-index=\"1\""));
        assert!(html.contains("\"testRunnerSession\":\"1700000000000\""));
    }

    #[test]
    fn test_bootstrap_cannot_close_script() {
        let html = PageTemplates::default()
            .render(&PageOutcome::Done { session: session() })
            .unwrap();
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains("\\u003c/script>"));
        assert!(html.contains("data-template=\"done\""));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
    }
}
