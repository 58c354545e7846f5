use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Standalone page shell. Output files are opened straight from disk or an
/// email client, so styles are inlined rather than linked.
pub fn desktop_layout(title: &str, styles: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(BASE_CSS)) (PreEscaped(styles)) }
            }
            body {
                (content)
            }
        }
    }
}

const BASE_CSS: &str = r#"
body { font-family: Arial, sans-serif; margin: 20px; color: #333; line-height: 1.5; }
.header { background: #1976d2; color: white; padding: 20px; text-align: center; border-radius: 5px; }
.summary { background: #e3f2fd; padding: 15px; margin: 20px 0; border-radius: 5px; }
.card { border: 1px solid #ddd; margin: 15px 0; padding: 15px; border-radius: 5px; }
a { color: #1976d2; text-decoration: none; }
a:hover { text-decoration: underline; }
.btn { display: inline-block; background: #1976d2; color: white; padding: 6px 12px; margin: 4px 4px 0 0; border-radius: 4px; font-size: 14px; }
.btn:hover { background: #125aa0; text-decoration: none; }
"#;
