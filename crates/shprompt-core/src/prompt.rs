//! Prompt, secondary prompt and window title assembly.

use std::fmt::Write as _;

use chrono::NaiveDateTime;

use crate::layout::{self, DEFAULT_MIN_PATH_WIDTH};
use crate::style::{Color, Embedding, Intensity, StyledText};

/// Timestamp format used when none is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d %H:%M";

/// Everything a render needs, as plain values.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub timestamp: NaiveDateTime,
    pub home: String,
    pub pwd: String,
    /// Hostname as reported by the system; shortened at render time.
    pub hostname: String,
    pub over_ssh: bool,
    /// Annotation shown in brackets before the path (usually VCS status).
    pub info: String,
    /// Annotation for the secondary (right) prompt.
    pub info2: String,
    /// Shown on the input line, just before the prompt symbol.
    pub flag: StyledText,
    pub exit_code: i32,
    /// Maximum display width in codepoints. May be negative.
    pub width: i32,
}

/// Knobs that shape the rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// `chrono` strftime format for the timestamp segment.
    pub date_format: String,
    pub prompt_symbol: String,
    pub min_path_width: i64,
    pub embedding: Embedding,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            prompt_symbol: "$ ".to_string(),
            min_path_width: DEFAULT_MIN_PATH_WIDTH,
            embedding: Embedding::Zsh,
        }
    }
}

/// The three strings handed back to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub prompt: String,
    /// `None` when there is no secondary annotation.
    pub secondary: Option<String>,
    pub title: String,
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Renders all three outputs for one request.
    pub fn render(&self, req: &PromptRequest) -> RenderedOutput {
        let embedding = self.options.embedding;
        let secondary = self.render_secondary(req);
        RenderedOutput {
            prompt: self.render_prompt(req).render(embedding),
            secondary: (!secondary.is_empty()).then(|| secondary.render(embedding)),
            title: self.render_title(req),
        }
    }

    /// Builds the main prompt.
    ///
    /// The first line holds the timestamp, host, info, path and exit code.
    /// If the path would be squeezed below the minimum width it moves to a
    /// line of its own. The last line holds the flag and the prompt symbol.
    pub fn render_prompt(&self, req: &PromptRequest) -> StyledText {
        let before = self.before_path(req);
        let after = after_path(req.exit_code);

        let pwd = layout::collapse_home(&req.pwd, &req.home);
        let placement = layout::negotiate(
            i64::from(req.width),
            before.len(),
            after.len(),
            self.options.min_path_width,
        );
        let pwd = layout::truncate_path(&pwd, placement.budget);

        let mut prompt = StyledText::new();
        prompt.append(&before);
        if placement.own_line {
            // `after` brings its own separator.
            if !after.is_empty() {
                prompt.trim_last(1);
            }
            prompt.append(&after);
            prompt.write("\n");
            prompt.clear_style();
            prompt.write(&pwd);
        } else {
            // No path squeezed in, so the head's trailing space separates `after`.
            if pwd.is_empty() && !after.is_empty() {
                prompt.trim_last(1);
            }
            prompt.clear_style();
            prompt.write(&pwd);
            prompt.append(&after);
        }
        prompt.write("\n");
        prompt.append(&req.flag);
        prompt.style(Color::Yellow, Intensity::Bold);
        prompt.write(&self.options.prompt_symbol);
        prompt
    }

    /// Builds the right-hand prompt. Empty when there is no secondary info.
    pub fn render_secondary(&self, req: &PromptRequest) -> StyledText {
        let mut secondary = StyledText::new();
        if !req.info2.is_empty() {
            secondary.clear_style();
            secondary.write(&req.info2);
        }
        secondary
    }

    /// Builds the window title: `[info]` followed by the path, no escapes.
    pub fn render_title(&self, req: &PromptRequest) -> String {
        let info = if req.info.is_empty() {
            String::new()
        } else {
            format!("[{}]", req.info)
        };
        let budget = (i64::from(req.width) - info.chars().count() as i64).max(0);
        let pwd = layout::collapse_home(&req.pwd, &req.home);
        let pwd = layout::truncate_path(&pwd, budget as usize);
        format!("{info}{pwd}")
    }

    /// A malformed date format falls back to the default one instead of
    /// failing the whole prompt.
    fn timestamp(&self, req: &PromptRequest) -> String {
        let mut stamp = String::new();
        if write!(stamp, "{}", req.timestamp.format(&self.options.date_format)).is_ok() {
            return stamp;
        }
        tracing::warn!(format = %self.options.date_format, "invalid date format");
        req.timestamp.format(DEFAULT_DATE_FORMAT).to_string()
    }

    fn before_path(&self, req: &PromptRequest) -> StyledText {
        let mut before = StyledText::new();

        before.style(Color::Cyan, Intensity::Bold);
        before.write(&self.timestamp(req));
        before.write(" ");

        if req.over_ssh {
            before.style(Color::Yellow, Intensity::Dim);
            before.write("(");
        }
        before.style(Color::Magenta, Intensity::Bold);
        before.write(short_hostname(&req.hostname));
        if req.over_ssh {
            before.style(Color::Yellow, Intensity::Dim);
            before.write(")");
        }
        before.write(" ");

        if !req.info.is_empty() {
            before.style(Color::White, Intensity::Dim);
            before.write("[");
            before.style(Color::White, Intensity::Bold);
            before.write(&req.info);
            before.style(Color::White, Intensity::Dim);
            before.write("] ");
        }
        before
    }
}

fn after_path(exit_code: i32) -> StyledText {
    let mut after = StyledText::new();
    if exit_code != 0 {
        after.style(Color::Red, Intensity::Bold);
        after.write(&format!(" [{exit_code}]"));
    }
    after
}

/// First label of a possibly fully-qualified hostname.
fn short_hostname(hostname: &str) -> &str {
    hostname.split('.').next().unwrap_or(hostname)
}
