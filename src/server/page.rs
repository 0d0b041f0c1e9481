//! HTML rendering for the translator form

use std::fmt::Write;

/// What one render of the page shows
#[derive(Debug, Default, Clone, Copy)]
pub struct PageView<'a> {
    /// Current contents of the text field
    pub input: &'a str,
    /// Last successful translation, empty when there is none
    pub result: &'a str,
    pub error: Option<&'a str>,
}

const STYLE: &str = r#"
    body { font-family: sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; }
    input[type=text] { width: 100%; box-sizing: border-box; font-size: 18px; padding: 12px; }
    button { font-size: 18px; padding: 12px 24px; margin-top: 12px; }
    .result { background: #e8f5e9; border-radius: 6px; padding: 12px; margin-top: 16px; }
    .error { background: #fdecea; border-radius: 6px; padding: 12px; margin-top: 16px; }
    @media (max-width: 600px) {
        input[type=text] { font-size: 16px; }
        button { font-size: 16px; }
    }
"#;

/// Render the whole page
pub fn render(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(2048);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>English ↔ Roman Urdu Translator</title>\n");
    let _ = write!(html, "<style>{}</style>\n", STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str("<h1>🧠 Smart Language Translator</h1>\n");
    html.push_str("<h3>Your Bridge Between English and Roman Urdu</h3>\n");

    html.push_str("<form method=\"post\" action=\"/\">\n");
    html.push_str("<label for=\"text\">Enter text to translate</label>\n");
    let _ = write!(
        html,
        "<input type=\"text\" id=\"text\" name=\"text\" value=\"{}\" onchange=\"this.form.submit()\" autofocus>\n",
        escape_html(view.input)
    );
    html.push_str("<button type=\"submit\" name=\"action\" value=\"translate\">Translate</button>\n");
    html.push_str("</form>\n");

    if let Some(error) = view.error {
        let _ = write!(
            html,
            "<div class=\"error\" role=\"alert\">{}</div>\n",
            escape_html(error)
        );
    }

    if !view.result.is_empty() {
        let _ = write!(
            html,
            "<div class=\"result\"><p>Translation:</p><p><strong id=\"result\">{}</strong></p></div>\n",
            escape_html(view.result)
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Escape text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
