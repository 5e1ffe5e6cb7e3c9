//! Render command handler.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Result, bail};
use shprompt_core::cache::Cache;
use shprompt_core::config::Config;
use shprompt_core::env::request_from_env;
use shprompt_core::prompt::{RenderedOutput, Renderer};
use shprompt_core::shell::EnvironMod;
use shprompt_core::vcs::{self, Adapter, ProbeContext};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Shell script exporting PROMPT, RPROMPT and TERM_TITLE
    Script,
    /// The main prompt only
    Prompt,
    /// The right-hand prompt only
    Secondary,
    /// The window title only
    Title,
}

pub struct RenderRunOptions<'a> {
    pub config: &'a Config,
    pub width: Option<i32>,
    pub exit_code: i32,
    pub format: Format,
    pub update_cache: bool,
    pub secondary: Option<String>,
}

pub async fn run(options: RenderRunOptions<'_>) -> Result<()> {
    let Some(width) = options.width else {
        bail!("--width must be specified (or COLUMNS set)");
    };

    let started = Instant::now();
    let mut request = request_from_env(width, options.exit_code);
    request.info2 = options.secondary.unwrap_or_default();

    let cache = Mutex::new(Cache::load());
    let pwd = PathBuf::from(&request.pwd);
    let ctx = ProbeContext {
        pwd: &pwd,
        update_cache: options.update_cache,
        command_timeout: options.config.command_timeout(),
        expensive_timeout: options.config.expensive_timeout(),
        cache: &cache,
    };
    let adapters = Adapter::enabled(&options.config.vcs);
    if let Some(found) = vcs::probe_all(&adapters, &ctx).await {
        request.apply_match(found);
    }

    if let Err(err) = cache.into_inner().save() {
        tracing::warn!(error = %format!("{err:#}"), "failed to save cache");
    }

    let rendered = Renderer::new(options.config.render_options()).render(&request);
    tracing::debug!(
        elapsed_ms = started.elapsed().as_millis(),
        "prompt rendered"
    );

    match options.format {
        Format::Script => print!("{}", script(&rendered)),
        Format::Prompt => print!("{}", rendered.prompt),
        Format::Secondary => print!("{}", rendered.secondary.unwrap_or_default()),
        Format::Title => print!("{}", rendered.title),
    }
    Ok(())
}

fn script(rendered: &RenderedOutput) -> String {
    let mut environ = EnvironMod::new();
    environ.set_var("PROMPT", rendered.prompt.as_str());
    match &rendered.secondary {
        Some(secondary) => environ.set_var("RPROMPT", secondary.as_str()),
        None => environ.unset_var("RPROMPT"),
    }
    environ.set_var("TERM_TITLE", rendered.title.as_str());
    environ.to_script()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_unsets_missing_secondary() {
        let rendered = RenderedOutput {
            prompt: "p$ ".to_string(),
            secondary: None,
            title: "t".to_string(),
        };
        let script = script(&rendered);
        assert!(script.contains("export PROMPT='p$ '"), "{script}");
        assert!(script.contains("unset RPROMPT"));
        assert!(script.contains("export TERM_TITLE=t"));
    }

    #[test]
    fn test_script_exports_secondary() {
        let rendered = RenderedOutput {
            prompt: "p".to_string(),
            secondary: Some("right".to_string()),
            title: "t".to_string(),
        };
        assert!(script(&rendered).contains("export RPROMPT=right"));
    }
}
