//! Font capability and line layout.
//!
//! Glyph outlines come from a [`Font`] implementation. Everything else here
//! (line wrapping, alignment and the outline cache) is generic over it.

use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::num::NonZeroUsize;
use tracing::trace;
use verso_geometry::{shapes, DrawingInstruction, PathData};

const SOFT_HYPHEN: char = '\u{AD}';

// ==================== Options ====================

/// Horizontal alignment of wrapped lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Offset of a line's start. Without a box width, alignment is around
    /// the text origin.
    pub fn line_start(self, width: Option<f64>, line_width: f64) -> f64 {
        match (self, width) {
            (TextAlign::Left, _) => 0.0,
            (TextAlign::Center, Some(w)) => (w - line_width) / 2.0,
            (TextAlign::Center, None) => -line_width / 2.0,
            (TextAlign::Right, Some(w)) => w - line_width,
            (TextAlign::Right, None) => -line_width,
        }
    }
}

/// Text shaping and layout options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextOptions {
    pub font_size: f64,
    /// Family name for backends that draw text natively.
    pub font_family: Option<String>,
    /// Distance between baselines, defaults to the font size.
    pub line_height: Option<f64>,
    pub letter_spacing: f64,
    pub kerning: bool,
    pub align: TextAlign,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            font_family: None,
            line_height: None,
            letter_spacing: 0.0,
            kerning: true,
            align: TextAlign::Left,
        }
    }
}

impl TextOptions {
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }

    pub fn line_height(mut self, line_height: f64) -> Self {
        self.line_height = Some(line_height);
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn letter_spacing(mut self, spacing: f64) -> Self {
        self.letter_spacing = spacing;
        self
    }

    pub fn kerning(mut self, kerning: bool) -> Self {
        self.kerning = kerning;
        self
    }

    pub fn resolved_line_height(&self) -> f64 {
        self.line_height.unwrap_or(self.font_size)
    }

    /// The fields that change glyph outlines.
    fn shape_key(&self) -> (u64, u64, bool) {
        (
            self.font_size.to_bits(),
            self.letter_spacing.to_bits(),
            self.kerning,
        )
    }
}

/// One laid-out line, positioned relative to the text origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f64,
    /// Baseline offset.
    pub y: f64,
}

/// Vertical font metrics in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub ascender: f64,
    /// Negative below the baseline.
    pub descender: f64,
    pub units_per_em: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            ascender: 800.0,
            descender: -200.0,
            units_per_em: 1000.0,
        }
    }
}

// ==================== Font ====================

/// A font able to measure and outline text.
pub trait Font {
    fn name(&self) -> &str;

    /// Advance width of `text` in user units.
    fn advance_width(&self, text: &str, options: &TextOptions) -> f64;

    /// Glyph outlines for `text` with its baseline starting at `(x, y)`.
    fn convert_to_commands(
        &self,
        text: &str,
        x: f64,
        y: f64,
        options: &TextOptions,
    ) -> Vec<DrawingInstruction>;

    fn metrics(&self) -> FontMetrics {
        FontMetrics::default()
    }

    /// Outlines as geometry, for callers that measure or sample the text.
    fn convert_to_path(&self, text: &str, x: f64, y: f64, options: &TextOptions) -> PathData {
        PathData::from_instructions(&self.convert_to_commands(text, x, y, options))
    }

    /// Wrap `text` into a box of the given size. Lines are broken at
    /// whitespace and soft hyphens, and always after a newline. Lines that
    /// would overflow `height` are dropped.
    fn lines(
        &self,
        text: &str,
        options: &TextOptions,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Vec<TextLine> {
        wrap_lines(self, text, options, width, height)
    }
}

struct Segment<'a> {
    text: &'a str,
    required: bool,
}

/// Split after whitespace runs and soft hyphens. A newline always ends its
/// segment and forces a break after it.
fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let mut end = i + c.len_utf8();
        let mut required = c == '\n';

        if c == SOFT_HYPHEN {
            // break opportunity right after it
        } else if c.is_whitespace() && !required {
            while let Some(&(j, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                chars.next();
                end = j + next.len_utf8();
                if next == '\n' {
                    required = true;
                    break;
                }
            }
        } else if !required {
            continue;
        }

        out.push(Segment {
            text: &text[start..end],
            required,
        });
        start = end;
    }

    if start < text.len() {
        out.push(Segment {
            text: &text[start..],
            required: false,
        });
    }
    out
}

fn wrap_lines<F: Font + ?Sized>(
    font: &F,
    text: &str,
    options: &TextOptions,
    width: Option<f64>,
    height: Option<f64>,
) -> Vec<TextLine> {
    let size = options.font_size;
    if size <= 0.0 {
        return Vec::new();
    }

    let metrics = font.metrics();
    let line_height = options.resolved_line_height();
    let em = metrics.units_per_em.max(1.0);
    let content_height = (metrics.ascender - metrics.descender).abs() / em;
    let half_leading = (line_height / size - content_height) / 2.0;

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut y = size * (metrics.ascender / em + half_leading);
    let mut hyphenate = false;
    let mut break_after = false;

    let fits = |count: usize| height.map_or(true, |h| count as f64 * line_height <= h);

    for segment in segments(text) {
        let can_hyphenate = segment.text.ends_with(SOFT_HYPHEN);
        let word = segment.text.replace(SOFT_HYPHEN, "");
        let candidate = format!("{line}{word}");
        let candidate_width = font.advance_width(&candidate, options);
        let overflows = !line.is_empty() && width.is_some_and(|w| candidate_width > w);

        if break_after || overflows {
            if !fits(lines.len() + 1) {
                trace!(lines = lines.len(), "text box full");
                return lines;
            }

            let mut finished = line.trim_end().to_string();
            if hyphenate {
                finished.push('-');
            }
            let finished_width = font.advance_width(&finished, options);
            lines.push(TextLine {
                text: finished,
                x: options.align.line_start(width, finished_width),
                y,
            });

            line = word.trim_start().to_string();
            y += line_height;
            hyphenate = can_hyphenate;
        } else {
            line = candidate;
            hyphenate = can_hyphenate;
        }

        break_after = segment.required;
    }

    if !line.is_empty() && fits(lines.len() + 1) {
        let finished = line.trim_end().to_string();
        let line_width = font.advance_width(&finished, options);
        lines.push(TextLine {
            text: finished,
            x: options.align.line_start(width, line_width),
            y,
        });
    }
    lines
}

// ==================== Box Font ====================

/// Fixed-advance font that outlines every visible glyph as its em box.
///
/// Needs no font file, so layouts can be previewed before real fonts are
/// loaded.
#[derive(Debug, Clone)]
pub struct BoxFont {
    name: String,
    /// Advance per character as a fraction of the font size.
    advance: f64,
}

impl BoxFont {
    pub fn new(advance: f64) -> Self {
        Self {
            name: "Box".to_string(),
            advance,
        }
    }
}

impl Default for BoxFont {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl Font for BoxFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn advance_width(&self, text: &str, options: &TextOptions) -> f64 {
        let count = text.chars().count() as f64;
        if count == 0.0 {
            return 0.0;
        }
        count * self.advance * options.font_size + (count - 1.0) * options.letter_spacing
    }

    fn convert_to_commands(
        &self,
        text: &str,
        x: f64,
        y: f64,
        options: &TextOptions,
    ) -> Vec<DrawingInstruction> {
        let metrics = self.metrics();
        let size = options.font_size;
        let step = self.advance * size + options.letter_spacing;
        let top = y - size * metrics.ascender / metrics.units_per_em;
        let glyph_height = size * (metrics.ascender - metrics.descender) / metrics.units_per_em;

        text.chars()
            .enumerate()
            .filter(|(_, c)| !c.is_whitespace())
            .flat_map(|(i, _)| {
                let left = x + i as f64 * step;
                shapes::rectangle_path(left, top, self.advance * size, glyph_height)
                    .to_instructions()
            })
            .collect()
    }
}

// ==================== Cached Font ====================

/// Outline cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

type OutlineKey = (String, u64, u64, (u64, u64, bool));

/// Wraps a font with an LRU cache of glyph outlines.
///
/// Entries are keyed by text, origin and the shaping options, so repeated
/// frames of the same text skip outline generation.
pub struct CachedFont<F> {
    inner: F,
    cache: RefCell<LruCache<OutlineKey, Vec<DrawingInstruction>>>,
    stats: RefCell<CacheStats>,
}

impl<F: Font> CachedFont<F> {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new(inner: F) -> Self {
        Self::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: F, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: RefCell::new(LruCache::new(capacity)),
            stats: RefCell::new(CacheStats::default()),
        }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        *self.stats.borrow()
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
        *self.stats.borrow_mut() = CacheStats::default();
    }
}

impl<F: Font> Font for CachedFont<F> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn advance_width(&self, text: &str, options: &TextOptions) -> f64 {
        self.inner.advance_width(text, options)
    }

    fn convert_to_commands(
        &self,
        text: &str,
        x: f64,
        y: f64,
        options: &TextOptions,
    ) -> Vec<DrawingInstruction> {
        let key = (text.to_string(), x.to_bits(), y.to_bits(), options.shape_key());

        if let Some(hit) = self.cache.borrow_mut().get(&key) {
            self.stats.borrow_mut().hits += 1;
            return hit.clone();
        }

        self.stats.borrow_mut().misses += 1;
        let commands = self.inner.convert_to_commands(text, x, y, options);
        self.cache.borrow_mut().put(key, commands.clone());
        commands
    }

    fn metrics(&self) -> FontMetrics {
        self.inner.metrics()
    }

    fn lines(
        &self,
        text: &str,
        options: &TextOptions,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Vec<TextLine> {
        self.inner.lines(text, options, width, height)
    }
}
