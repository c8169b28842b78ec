//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::config::{CopyButtonConfig, HighlightConfig};
use crate::error::ContentError;
use crate::helpers::html_escape;

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
    copy_button: CopyButtonConfig,
}

impl MarkdownRenderer {
    /// Create a renderer; fails when the configured theme is not a syntect default
    pub fn new(config: &HighlightConfig) -> Result<Self, ContentError> {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(&config.theme)
            .ok_or_else(|| ContentError::UnknownTheme(config.theme.clone()))?;

        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers: config.line_number,
            copy_button: config.copy_button.clone(),
        })
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String, ContentError> {
        // YAML metadata blocks stay off: front-matter is split off beforehand
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        // (language, collected source) while inside a code block
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split(|c: char| c.is_whitespace() || c == ',')
                            .next()
                            .filter(|l| !l.is_empty())
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let rendered = self.render_code_block(&code, lang.as_deref())?;
                        events.push(Event::Html(CowStr::from(rendered)));
                    }
                }
                Event::Text(text) => match code_block.as_mut() {
                    Some((_, code)) => code.push_str(&text),
                    None => events.push(Event::Text(text)),
                },
                other => {
                    if code_block.is_none() {
                        events.push(other);
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block and wrap it with its copy button
    fn render_code_block(&self, code: &str, lang: Option<&str>) -> Result<String, ContentError> {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut body = String::with_capacity(code.len() * 2);
        for (i, line) in LinesWithEndings::from(code).enumerate() {
            let regions = highlighter.highlight_line(line, &self.syntax_set)?;
            let html = styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)?;
            if self.line_numbers {
                body.push_str(&format!(
                    r#"<span class="line" data-line="{}">{}</span>"#,
                    i + 1,
                    html
                ));
            } else {
                body.push_str(&html);
            }
        }

        let background = self
            .theme
            .settings
            .background
            .map(|c| format!(r#" style="background-color:#{:02x}{:02x}{:02x};""#, c.r, c.g, c.b))
            .unwrap_or_default();
        let lang = html_escape(lang);
        let pre_class = if self.line_numbers {
            "highlight line-numbers"
        } else {
            "highlight"
        };

        let mut figure = format!(
            r#"<figure class="code-block" data-language="{}">"#,
            lang
        );
        if self.copy_button.enable {
            figure.push_str(&self.copy_button(code));
        }
        figure.push_str(&format!(
            r#"<pre class="{}"{}><code class="language-{}">{}</code></pre></figure>"#,
            pre_class, background, lang, body
        ));
        figure.push('\n');

        Ok(figure)
    }

    /// Button that copies the raw block source and flips to "Copied" for a while
    fn copy_button(&self, code: &str) -> String {
        let ms = self.copy_button.feedback_duration;
        format!(
            concat!(
                r#"<button type="button" class="copy-button copy-{}" title="Copy code" aria-label="Copy code" "#,
                r#"data-code="{}" data-feedback-duration="{}" "#,
                r#"onclick="var b=this;navigator.clipboard.writeText(b.dataset.code);b.classList.add('copied');"#,
                r#"window.setTimeout(function(){{b.classList.remove('copied')}},{})">"#,
                r#"<span class="copy-ready">Copy</span><span class="copy-done">Copied!</span></button>"#
            ),
            self.copy_button.visibility.as_str(),
            html_escape(code),
            ms,
            ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CopyVisibility;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::new(&HighlightConfig::default()).unwrap()
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = renderer().render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block_has_copy_button() {
        let html = renderer()
            .render("```rust\nfn main() {}\n```")
            .unwrap();
        assert!(html.contains(r#"<figure class="code-block" data-language="rust">"#));
        assert!(html.contains(r#"class="copy-button copy-always""#));
        assert!(html.contains(r#"data-code="fn main() {}"#));
        assert!(html.contains("3000"));
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert_eq!(html.matches("<button").count(), 1);
    }

    #[test]
    fn test_one_button_per_block() {
        let md = "```\nplain\n```\n\ntext\n\n    indented\n\n```js\nlet a = 1;\n```\n";
        let html = renderer().render(md).unwrap();
        assert_eq!(html.matches("<button").count(), 3);
        assert_eq!(html.matches("<figure").count(), 3);
        assert!(html.contains("<p>text</p>"));
    }

    #[test]
    fn test_copy_payload_is_escaped() {
        let html = renderer()
            .render("```html\n<a href=\"x\">&</a>\n```")
            .unwrap();
        assert!(html.contains("data-code=\"&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;\n\""));
    }

    #[test]
    fn test_copy_button_options() {
        let mut config = HighlightConfig::default();
        config.copy_button.visibility = CopyVisibility::Hover;
        config.copy_button.feedback_duration = 1500;
        let html = MarkdownRenderer::new(&config)
            .unwrap()
            .render("```\nx\n```")
            .unwrap();
        assert!(html.contains("copy-hover"));
        assert!(html.contains(r#"data-feedback-duration="1500""#));

        config.copy_button.enable = false;
        let html = MarkdownRenderer::new(&config)
            .unwrap()
            .render("```\nx\n```")
            .unwrap();
        assert!(!html.contains("<button"));
    }

    #[test]
    fn test_line_numbers() {
        let config = HighlightConfig {
            line_number: true,
            ..Default::default()
        };
        let html = MarkdownRenderer::new(&config)
            .unwrap()
            .render("```\na\nb\n```")
            .unwrap();
        assert!(html.contains("line-numbers"));
        assert!(html.contains(r#"data-line="1""#));
        assert!(html.contains(r#"data-line="2""#));
    }

    #[test]
    fn test_unknown_theme() {
        let config = HighlightConfig {
            theme: "no-such-theme".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            MarkdownRenderer::new(&config),
            Err(ContentError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_render_is_deterministic() {
        let md = "# T\n\n```python\nprint('hi')\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        let r = renderer();
        assert_eq!(r.render(md).unwrap(), r.render(md).unwrap());
    }
}
