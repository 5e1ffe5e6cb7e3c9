//! Styled text with position-tagged ANSI escape markers.
//!
//! A [`StyledText`] keeps its text and its style changes apart. Each
//! [`StyleMarker`] records an escape code and the byte offset where it takes
//! effect, so the text can be trimmed, concatenated and measured without
//! parsing escapes back out of it.

use std::fmt;

/// Escape code that resets all styling.
pub const CLEAR: &str = "\x1b[0m";

/// Foreground color. The discriminant is the ANSI color index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}

/// How strongly a [`Color`] is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
    /// Normal weight, standard palette (`30..=37`).
    Dim,
    /// Normal weight, bright palette (`90..=97`).
    Intense,
    /// Bold weight, bright palette.
    Bold,
}

/// Returns the SGR escape sequence for a color/intensity pair.
pub fn escape_code(color: Color, intensity: Intensity) -> String {
    let index = color as u8;
    match intensity {
        Intensity::Dim => format!("\x1b[0;{}m", 30 + index),
        Intensity::Intense => format!("\x1b[0;{}m", 90 + index),
        Intensity::Bold => format!("\x1b[1;{}m", 90 + index),
    }
}

/// How escape codes are embedded when a [`StyledText`] is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Embedding {
    /// Wrap each escape in `%{ %}` so zsh excludes it from width accounting.
    #[default]
    Zsh,
    /// Emit escapes as-is.
    Raw,
}

impl Embedding {
    fn wrap(self, out: &mut String, code: &str) {
        match self {
            Embedding::Zsh => {
                out.push_str("%{");
                out.push_str(code);
                out.push_str("%}");
            }
            Embedding::Raw => out.push_str(code),
        }
    }
}

/// A style change at a byte offset in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleMarker {
    pub escape_code: String,
    pub pos: usize,
}

/// Text plus sorted style markers.
///
/// Invariants:
/// - markers are sorted by `pos`, with at most one marker per position
/// - no two adjacent markers share an escape code
/// - marker positions are char boundaries of `text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledText {
    text: String,
    markers: Vec<StyleMarker>,
}

impl Default for StyledText {
    fn default() -> Self {
        Self::new()
    }
}

impl StyledText {
    /// Creates an empty text that starts with a clear marker.
    pub fn new() -> Self {
        StyledText {
            text: String::new(),
            markers: vec![StyleMarker {
                escape_code: CLEAR.to_string(),
                pos: 0,
            }],
        }
    }

    /// Creates a text written entirely in one style.
    pub fn stylized(text: &str, color: Color, intensity: Intensity) -> Self {
        let mut styled = Self::new();
        styled.style(color, intensity);
        styled.write(text);
        styled
    }

    /// Number of codepoints in the text. Escapes never count.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn markers(&self) -> &[StyleMarker] {
        &self.markers
    }

    /// Returns the text without any escapes.
    pub fn plain_text(&self) -> &str {
        &self.text
    }

    pub fn write(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Switches to a new style for text written after this point.
    pub fn style(&mut self, color: Color, intensity: Intensity) {
        let pos = self.text.len();
        self.push_marker(escape_code(color, intensity), pos);
    }

    /// Resets to the terminal's default style for text written after this point.
    pub fn clear_style(&mut self) {
        let pos = self.text.len();
        self.push_marker(CLEAR.to_string(), pos);
    }

    /// Concatenates `other` onto this text, rebasing its markers.
    pub fn append(&mut self, other: &StyledText) {
        let offset = self.text.len();
        self.text.push_str(&other.text);
        for marker in &other.markers {
            self.push_marker(marker.escape_code.clone(), marker.pos + offset);
        }
    }

    /// Removes the first `n` bytes of text.
    ///
    /// A cut inside a multi-byte character removes that whole character. The
    /// style in effect at the cut point is kept as a marker at position 0.
    pub fn trim_first(&mut self, n: usize) {
        let mut cut = n.min(self.text.len());
        while !self.text.is_char_boundary(cut) {
            cut += 1;
        }
        self.text.drain(..cut);

        let split = self.markers.partition_point(|marker| marker.pos <= cut);
        let mut markers = Vec::with_capacity(self.markers.len() - split + 1);
        if let Some(leading) = split.checked_sub(1).map(|i| &self.markers[i]) {
            markers.push(StyleMarker {
                escape_code: leading.escape_code.clone(),
                pos: 0,
            });
        }
        markers.extend(self.markers.drain(split..).map(|marker| StyleMarker {
            escape_code: marker.escape_code,
            pos: marker.pos - cut,
        }));
        self.markers = markers;
    }

    /// Removes the last `n` bytes of text.
    ///
    /// A cut inside a multi-byte character removes that whole character.
    /// Markers past the new end are dropped.
    pub fn trim_last(&mut self, n: usize) {
        let mut end = self.text.len() - n.min(self.text.len());
        while !self.text.is_char_boundary(end) {
            end -= 1;
        }
        self.text.truncate(end);
        self.markers.retain(|marker| marker.pos <= end);
    }

    /// Serializes the text with escapes embedded per `embedding`.
    ///
    /// The output always ends with a clear code so styles never leak into
    /// whatever the shell prints next.
    pub fn render(&self, embedding: Embedding) -> String {
        let mut out = String::with_capacity(self.text.len() + self.markers.len() * 12);
        let mut next = 0;
        for marker in &self.markers {
            debug_assert!(marker.pos >= next, "style markers out of order");
            out.push_str(&self.text[next..marker.pos]);
            next = marker.pos;
            embedding.wrap(&mut out, &marker.escape_code);
        }
        out.push_str(&self.text[next..]);
        embedding.wrap(&mut out, CLEAR);
        out
    }

    fn push_marker(&mut self, escape_code: String, pos: usize) {
        if let Some(last) = self.markers.last() {
            if last.pos == pos {
                self.markers.pop();
                return self.push_marker(escape_code, pos);
            }
            if last.escape_code == escape_code {
                return;
            }
        }
        self.markers.push(StyleMarker { escape_code, pos });
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Embedding::Zsh))
    }
}
