use scraper::{ElementRef, Html, Node};

// ============================================================================
// Markup to text blocks to laid-out pages
// ============================================================================

/// A4 portrait, in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

pub const MARGIN: f32 = 40.0;

pub const TITLE_SIZE: f32 = 20.0;
/// Title baseline, measured from the top edge
pub const TITLE_TOP: f32 = 40.0;

pub const BODY_SIZE: f32 = 11.0;
pub const BODY_LEADING: f32 = 15.0;
/// First body line on page one, measured from the top edge
pub const BODY_TOP_FIRST: f32 = 60.0;
/// First body line on following pages
pub const BODY_TOP: f32 = MARGIN;

pub const FOOTER_SIZE: f32 = 10.0;
/// Footer baseline, measured from the bottom edge
pub const FOOTER_BOTTOM: f32 = 20.0;

/// Block-level elements that start a new paragraph.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "header", "footer", "ul", "ol", "table", "tr",
    "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "hr",
];

/// A paragraph of plain text with its style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub size: f32,
    pub bold: bool,
}

/// One positioned line. `y` is measured from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub size: f32,
    pub bold: bool,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub lines: Vec<Line>,
}

/// Convert rendered markup into paragraphs.
///
/// The markup is parsed the way a browser parses it, so a stray `<` or `&`
/// in running text stays text. Headings become bold blocks, list items get a
/// bullet, `<br>` breaks a line, everything else inside a block is joined as
/// running text.
pub fn blocks_from_html(html: &str) -> Vec<TextBlock> {
    let fragment = Html::parse_fragment(html);
    let mut builder = BlockBuilder::default();
    builder.walk(fragment.root_element());
    builder.flush();
    builder.blocks
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<TextBlock>,
    current: String,
    heading: Option<u8>,
}

impl BlockBuilder {
    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push_text(text),
                Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(child) {
                        self.element(el);
                    }
                }
                _ => {}
            }
        }
    }

    fn element(&mut self, el: ElementRef<'_>) {
        match el.value().name() {
            "script" | "style" | "template" | "head" => {}
            "br" => self.flush(),
            "li" => {
                self.flush();
                self.current.push_str("\u{2022} ");
                self.walk(el);
                self.flush();
            }
            "td" | "th" => {
                self.walk(el);
                self.current.push_str("  ");
            }
            name if BLOCK_TAGS.contains(&name) => {
                self.flush();
                let outer = self.heading;
                if let Some(level) = heading_level(name) {
                    self.heading = Some(level);
                }
                self.walk(el);
                self.flush();
                self.heading = outer;
            }
            _ => self.walk(el),
        }
    }

    /// Append text, collapsing whitespace runs the way rendered markup does.
    fn push_text(&mut self, raw: &str) {
        for c in raw.chars() {
            if !c.is_whitespace() {
                self.current.push(c);
            } else if !self.current.is_empty() && !self.current.ends_with(' ') {
                self.current.push(' ');
            }
        }
    }

    fn flush(&mut self) {
        let text = self.current.trim().to_string();
        self.current.clear();
        if text.is_empty() || text == "\u{2022}" {
            return;
        }
        let size = match self.heading {
            Some(1) => 18.0,
            Some(2) => 16.0,
            Some(3) => 14.0,
            Some(_) => 12.0,
            None => BODY_SIZE,
        };
        self.blocks.push(TextBlock {
            text,
            size,
            bold: self.heading.is_some(),
        });
    }
}

fn heading_level(name: &str) -> Option<u8> {
    match name.as_bytes() {
        [b'h', d @ b'1'..=b'6'] => Some(d - b'0'),
        _ => None,
    }
}

// ============================================================================
// Measuring and wrapping
// ============================================================================

/// Approximate Helvetica advance width of `text` at `size`.
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_units(c, bold)).sum();
    units as f32 * size / 1000.0
}

fn glyph_units(c: char, bold: bool) -> u32 {
    let base = match c {
        ' ' | '.' | ',' | ':' | ';' | '!' | '\'' | '|' => 278,
        'i' | 'j' | 'l' => 222,
        'f' | 'r' | 't' | 'I' | '(' | ')' | '[' | ']' | '-' => 333,
        'm' | 'M' | 'W' => 833,
        'w' => 722,
        'A'..='Z' => 667,
        _ => 556,
    };
    if bold { base + base / 20 } else { base }
}

/// Greedy word wrap to `max_width`. Words longer than a line are split.
pub fn wrap(text: &str, size: f32, bold: bool, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", line, word)
        };

        if text_width(&candidate, size, bold) <= max_width {
            line = candidate;
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }

        let mut piece = String::new();
        for c in word.chars() {
            piece.push(c);
            if text_width(&piece, size, bold) > max_width && piece.chars().count() > 1 {
                piece.pop();
                lines.push(std::mem::take(&mut piece));
                piece.push(c);
            }
        }
        line = piece;
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Lay blocks out on as many pages as they need. Always yields at least one page.
pub fn paginate(blocks: &[TextBlock]) -> Vec<LaidOutPage> {
    let max_width = PAGE_WIDTH - 2.0 * MARGIN;
    let bottom_limit = PAGE_HEIGHT - MARGIN;

    let mut pages = vec![LaidOutPage::default()];
    let mut y = BODY_TOP_FIRST;

    for block in blocks {
        let leading = BODY_LEADING.max(block.size * 1.3);
        for text in wrap(&block.text, block.size, block.bold, max_width) {
            if y + leading > bottom_limit {
                pages.push(LaidOutPage::default());
                y = BODY_TOP;
            }
            y += leading;
            if let Some(page) = pages.last_mut() {
                page.lines.push(Line {
                    text,
                    size: block.size,
                    bold: block.bold,
                    x: MARGIN,
                    y,
                });
            }
        }
        // paragraph gap
        y += leading * 0.4;
    }

    pages
}
