//! Markdown → styled terminal text.
//!
//! Agent replies are markdown with newline-significant text: a single
//! newline is a real line break, not a soft-wrap hint, so `SoftBreak` starts
//! a new line. Fenced code blocks are colored through syntect; the language
//! comes from the fence tag, with first-line auto-detection when the tag is
//! missing or unknown, and a plain monochrome fallback after that.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-eighties.dark";
const CODE_GUTTER: &str = "▎ ";

/// Render markdown into owned styled text, using `base` as the body color.
pub fn render(source: &str, base: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let mut renderer = Renderer::new(base);
    for event in Parser::new_ext(source, opts) {
        renderer.event(event);
    }
    renderer.finish()
}

struct Renderer {
    base: Color,
    lines: Vec<Line<'static>>,
    /// Spans of the line under construction.
    current: Vec<Span<'static>>,
    /// Style overlays from open inline tags, innermost last.
    inline: Vec<Style>,
    /// Ordered-list counters; `None` marks an unordered level.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    /// Fence tag and accumulated body of the code block being collected.
    code: Option<(String, String)>,
    /// URL of the link currently open, appended after its text closes.
    link: Option<String>,
    /// A blank separator line is owed before the next block.
    pending_gap: bool,
}

impl Renderer {
    fn new(base: Color) -> Self {
        Self {
            base,
            lines: Vec::new(),
            current: Vec::new(),
            inline: Vec::new(),
            lists: Vec::new(),
            quote_depth: 0,
            code: None,
            link: None,
            pending_gap: false,
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.flush_current();
        Text::from(self.lines)
    }

    // -- line assembly ---------------------------------------------------

    fn style(&self) -> Style {
        let mut style = Style::default().fg(self.base);
        if self.quote_depth > 0 {
            style = style.add_modifier(Modifier::DIM);
        }
        for overlay in &self.inline {
            style = style.patch(*overlay);
        }
        style
    }

    /// Close the line under construction, prepending blockquote bars.
    fn break_line(&mut self) {
        let mut spans = Vec::new();
        for _ in 0..self.quote_depth {
            spans.push(Span::styled("┃ ", Style::default().fg(Color::DarkGray)));
        }
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn flush_current(&mut self) {
        if !self.current.is_empty() {
            self.break_line();
        }
    }

    fn gap(&mut self) {
        if self.pending_gap && !self.lines.is_empty() {
            self.break_line();
        }
        self.pending_gap = false;
    }

    // -- event dispatch --------------------------------------------------

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(text) => self.text(text),
            Event::Code(code) => self.inline_code(code),
            // Newline-significant text: both break kinds start a new line
            Event::SoftBreak | Event::HardBreak => self.break_line(),
            Event::Rule => {
                self.gap();
                self.flush_current();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(32),
                    Style::default().fg(Color::DarkGray),
                )));
                self.pending_gap = true;
            }
            _ => {} // HTML, footnotes, math
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.gap();
                }
            }
            Tag::Heading { level, .. } => {
                self.gap();
                self.flush_current();
                self.inline.push(heading_style(level));
            }
            Tag::BlockQuote(_) => {
                self.gap();
                self.flush_current();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.gap();
                self.flush_current();
                let lang = match kind {
                    CodeBlockKind::Fenced(tag) => tag.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some((lang, String::new()));
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.gap();
                    self.flush_current();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush_current();
                let depth = self.lists.len().saturating_sub(1);
                let indent = "  ".repeat(depth);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.current
                    .push(Span::styled(marker, Style::default().fg(Color::DarkGray)));
            }
            Tag::Emphasis => self.inline.push(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.inline.push(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => self
                .inline
                .push(Style::default().add_modifier(Modifier::CROSSED_OUT)),
            Tag::Link { dest_url, .. } => {
                self.link = Some(dest_url.to_string());
                self.inline.push(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            _ => {} // tables, images, definitions
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_current();
                if self.lists.is_empty() {
                    self.pending_gap = true;
                }
            }
            TagEnd::Heading(_) => {
                self.flush_current();
                self.inline.pop();
                self.pending_gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.flush_current();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.pending_gap = true;
            }
            TagEnd::CodeBlock => {
                self.flush_code();
                self.pending_gap = true;
            }
            TagEnd::List(_) => {
                self.flush_current();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.pending_gap = true;
                }
            }
            TagEnd::Item => self.flush_current(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.inline.pop();
            }
            TagEnd::Link => {
                self.inline.pop();
                if let Some(url) = self.link.take() {
                    self.current.push(Span::styled(
                        format!(" ({url})"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            _ => {}
        }
    }

    // -- content ---------------------------------------------------------

    fn text(&mut self, cow: CowStr<'_>) {
        if let Some((_, body)) = &mut self.code {
            body.push_str(&cow);
            return;
        }
        // ratatui renders \t as zero-width
        let text = cow.replace('\t', "    ");
        let style = self.style();
        self.current.push(Span::styled(text, style));
    }

    fn inline_code(&mut self, cow: CowStr<'_>) {
        self.current.push(Span::styled(
            cow.to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }

    /// Emit the collected code block: a dim language label (when tagged),
    /// then one gutter-prefixed line per source line, syntect-colored when a
    /// grammar is available.
    fn flush_code(&mut self) {
        let Some((lang, body)) = self.code.take() else {
            return;
        };

        let gutter = || Span::styled(CODE_GUTTER, Style::default().fg(Color::DarkGray));

        if !lang.is_empty() {
            self.lines.push(Line::from(vec![
                gutter(),
                Span::styled(
                    lang.clone(),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ),
            ]));
        }

        match pick_syntax(&lang, &body) {
            Some(syntax) => {
                let theme = &THEMES.themes[CODE_THEME];
                let mut highlighter = HighlightLines::new(syntax, theme);
                for line in LinesWithEndings::from(body.as_str()) {
                    let mut spans = vec![gutter()];
                    if let Ok(regions) = highlighter.highlight_line(line, &SYNTAXES) {
                        for (region_style, fragment) in regions {
                            let cleaned =
                                fragment.trim_end_matches('\n').replace('\t', "    ");
                            if cleaned.is_empty() {
                                continue;
                            }
                            let fg = Color::Rgb(
                                region_style.foreground.r,
                                region_style.foreground.g,
                                region_style.foreground.b,
                            );
                            spans.push(Span::styled(cleaned, Style::default().fg(fg)));
                        }
                    }
                    self.lines.push(Line::from(spans));
                }
            }
            None => {
                for line in body.lines() {
                    self.lines.push(Line::from(vec![
                        gutter(),
                        Span::styled(
                            line.replace('\t', "    "),
                            Style::default().fg(Color::White),
                        ),
                    ]));
                }
            }
        }
    }
}

// -- helpers -----------------------------------------------------------------

/// Grammar lookup: fence tag first, then first-line detection (shebangs,
/// XML preludes), then none.
fn pick_syntax(lang: &str, body: &str) -> Option<&'static SyntaxReference> {
    if !lang.is_empty()
        && let Some(syntax) = SYNTAXES.find_syntax_by_token(lang)
    {
        return Some(syntax);
    }
    let first_line = body.lines().next().unwrap_or("");
    SYNTAXES.find_syntax_by_first_line(first_line)
}

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default()
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}
