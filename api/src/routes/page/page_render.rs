//! Server-rendered Q&A page.

use std::fmt::Write as _;

use crate::session::{Phase, SessionView};

const STYLE: &str = "body{font-family:sans-serif;max-width:860px;margin:2rem auto;padding:0 1rem;line-height:1.5}\
input[type=text]{width:78%;padding:.4rem}button{padding:.4rem .9rem}\
.error{background:#fdecea;border:1px solid #f5c2c0;padding:.75rem;border-radius:4px}\
pre{white-space:pre-wrap;background:#f6f8fa;padding:.75rem}";

const HOW_IT_WORKS: &str = r#"<h2>How does it work?</h2>
<p>The Q&amp;A app exposes a dataset of management training articles. Ask questions like
<em>"How should I structure a performance management conversation?"</em> or
<em>"What are the key characteristics of a manager?"</em>, and get answers!</p>
<p>There are 3 main steps:</p>
<ol>
<li>The embedding model converts the input question into a query vector (embedding).</li>
<li>Vector search identifies relevant articles in order to create a prompt.</li>
<li>The generative model answers the question given the prompt and context.</li>
</ol>
<p>The <em>Default Response</em> is the same model answering without any retrieved context, for comparison.</p>"#;

/// Escapes text for HTML element content and double-quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

/// Renders the whole page for one session view.
///
/// An error replaces the answer sections; answers are only shown in the
/// `Displaying` phase.
pub fn render_page(view: &SessionView) -> String {
    let question = view.question.as_deref().unwrap_or_default();

    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Q&amp;A Application</title>\n");
    let _ = writeln!(html, "<style>{STYLE}</style>");
    html.push_str("</head>\n<body>\n<h1>Q&amp;A Application</h1>\n");

    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"/ask\">\n\
<label for=\"question\">Ask management-related questions</label><br>\n\
<input type=\"text\" id=\"question\" name=\"question\" value=\"{}\" autofocus>\n\
<button type=\"submit\">Ask</button>\n</form>",
        escape_html(question)
    );

    if let Some(err) = &view.error {
        let _ = writeln!(
            html,
            "<div class=\"error\" role=\"alert\">{}</div>",
            escape_html(err)
        );
    } else if view.phase == Phase::Displaying {
        render_answers(&mut html, view);
    }

    html.push_str("<hr>\n");
    html.push_str(HOW_IT_WORKS);
    html.push_str("\n</body>\n</html>\n");
    html
}

fn render_answers(html: &mut String, view: &SessionView) {
    let answer = view.answer.as_deref().unwrap_or_default();
    let baseline = view.baseline_answer.as_deref().unwrap_or_default();

    let _ = writeln!(
        html,
        "<h3>Informed Response</h3>\n<p class=\"answer\">{}</p>",
        escape_html(answer)
    );

    html.push_str("<details>\n<summary>Show Q&amp;A Context Documents</summary>\n");
    if !view.context.is_empty() {
        let _ = writeln!(html, "<pre>{}</pre>", escape_html(&view.context_text()));
    }
    html.push_str("</details>\n");

    let _ = writeln!(
        html,
        "<h3>Default Response</h3>\n<p class=\"baseline\">{}</p>",
        escape_html(baseline)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn displaying() -> SessionView {
        SessionView {
            phase: Phase::Displaying,
            question: Some("What is <b>management</b>?".into()),
            answer: Some("Setting goals & coaching".into()),
            context: vec!["doc one".into(), "doc two".into()],
            baseline_answer: Some("\"It depends\"".into()),
            error: None,
        }
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn displaying_page_shows_both_answers_and_context() {
        let html = render_page(&displaying());

        assert!(html.contains("Informed Response"));
        assert!(html.contains("Setting goals &amp; coaching"));
        assert!(html.contains("Show Q&amp;A Context Documents"));
        assert!(html.contains("<pre>doc one\ndoc two</pre>"));
        assert!(html.contains("<h3>Default Response</h3>"));
        assert!(html.contains("&quot;It depends&quot;"));
        assert!(html.contains("value=\"What is &lt;b&gt;management&lt;/b&gt;?\""));
        assert!(!html.contains("<b>management</b>"));
    }

    #[test]
    fn error_replaces_answers() {
        let mut view = displaying();
        view.error = Some("Connection error: refused".into());

        let html = render_page(&view);

        assert!(html.contains("class=\"error\""));
        assert!(html.contains("Connection error: refused"));
        assert!(!html.contains("Informed Response"));
    }

    #[test]
    fn idle_page_has_form_and_explainer_only() {
        let view = SessionView {
            phase: Phase::Idle,
            question: None,
            answer: None,
            context: Vec::new(),
            baseline_answer: None,
            error: None,
        };
        let html = render_page(&view);

        assert!(html.contains("<form method=\"post\" action=\"/ask\">"));
        assert!(html.contains("How does it work?"));
        assert!(!html.contains("<h3>Default Response</h3>"));
    }
}
