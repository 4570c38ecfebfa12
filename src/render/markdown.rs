use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use syntect::html::{ClassedHTMLGenerator, ClassStyle};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::{error, warn};

/// Language names that show up in plugin descriptions but have no
/// grammar in the default syntax set. These fall back to content-based
/// detection without being treated as anomalies.
const KNOWN_UNSUPPORTED: &[&str] = &[
    "angular2",
    "bitex",
    "commandline",
    "math",
    "mermaid",
    "{important}",
    "{note}",
    "{warning}",
];

/// Markdown-to-HTML renderer with class-based code highlighting.
pub struct MarkdownRenderer {
    syntaxes: SyntaxSet,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Render GitHub-flavored markdown to HTML.
    ///
    /// Code blocks are routed through [`Self::render_code_block`];
    /// indented blocks are treated as fenced blocks with no declared
    /// language, so both forms render identically.
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code = String::new();
        let mut language = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code.clear();
                    language = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .unwrap_or("")
                            .to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    let rendered = self.render_code_block(&code, &language);
                    events.push(Event::Html(rendered.into()));
                }
                Event::Text(text) if in_code_block => code.push_str(&text),
                other => events.push(other),
            }
        }

        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        out
    }

    /// Highlight one code block and wrap it in `<pre><code>`.
    ///
    /// Never fails: if the highlighter errors the code is emitted
    /// escaped and unhighlighted.
    pub fn render_code_block(&self, code: &str, language: &str) -> String {
        let syntax = self.resolve_syntax(code, language);
        match self.highlight(code, syntax) {
            Ok(body) => format!("<pre><code>{body}</code></pre>\n"),
            Err(e) => {
                error!("Highlighting failed ({}), emitting plain code: {}", syntax.name, e);
                format!("<pre><code>{}</code></pre>\n", escape_html(code))
            }
        }
    }

    fn resolve_syntax(&self, code: &str, language: &str) -> &SyntaxReference {
        if language.is_empty() {
            warn!("No language declared, guessing from content");
            return self.guess_syntax(code);
        }
        match self.syntaxes.find_syntax_by_token(language) {
            Some(syntax) => syntax,
            None => {
                if KNOWN_UNSUPPORTED.contains(&language) {
                    warn!("No grammar for {}, guessing from content", language);
                } else {
                    error!("Unknown language {}, guessing from content", language);
                }
                self.guess_syntax(code)
            }
        }
    }

    fn guess_syntax(&self, code: &str) -> &SyntaxReference {
        code.lines()
            .next()
            .and_then(|first| self.syntaxes.find_syntax_by_first_line(first))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }

    fn highlight(&self, code: &str, syntax: &SyntaxReference) -> Result<String, syntect::Error> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Some *emphasis* and a [link](https://example.org).");
        assert!(html.contains("<em>emphasis</em>"));
        assert!(html.contains("<a href=\"https://example.org\">link</a>"));
    }

    #[test]
    fn fenced_and_indented_blocks_render_identically() {
        let renderer = MarkdownRenderer::new();
        let fenced = renderer.render("```\nlet x = 1;\n```\n");
        let indented = renderer.render("    let x = 1;\n");
        assert_eq!(fenced, indented);
    }

    #[test]
    fn code_content_is_escaped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_code_block("<script>alert(1)</script>", "");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;"));
    }

    #[test]
    fn unknown_language_falls_back_without_panicking() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_code_block("print('hi')", "mermaid");
        assert!(html.starts_with("<pre><code>"));
        assert!(html.contains("print"));
    }

    #[test]
    fn declared_language_is_used() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```python\nimport os\n```\n");
        // Class-based output marks highlighted spans.
        assert!(html.contains("<span class="));
    }

    #[test]
    fn render_is_deterministic() {
        let renderer = MarkdownRenderer::new();
        let md = "# Title\n\n```python\nimport os\n```\n\ntext";
        assert_eq!(renderer.render(md), renderer.render(md));
    }
}
