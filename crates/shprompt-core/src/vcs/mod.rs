//! Version control detection.
//!
//! Each [`Adapter`] recognizes one kind of repository. Adapters are probed
//! concurrently and the first one in declaration order that recognizes the
//! working directory decorates the prompt.

pub mod command;
pub mod git;
pub mod hg;

use std::path::Path;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tokio::sync::Mutex;

use crate::cache::Cache;
use crate::config::VcsConfig;
use crate::prompt::PromptRequest;
use crate::style::{Color, Intensity, StyledText};

/// What a matching adapter contributes to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsMatch {
    /// Repository summary shown in brackets before the path.
    pub info: String,
    /// Short styled tag on the input line.
    pub flag: StyledText,
    /// Working directory relative to the repository root.
    pub pwd: String,
}

impl PromptRequest {
    /// Decorates the request with a repository match.
    pub fn apply_match(&mut self, vcs: VcsMatch) {
        self.info = vcs.info;
        self.flag = vcs.flag;
        self.pwd = vcs.pwd;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adapter {
    Git,
    Hg,
}

/// Shared inputs for a round of probes.
pub struct ProbeContext<'a> {
    pub pwd: &'a Path,
    /// Refresh cached facts that need a remote round trip.
    pub update_cache: bool,
    pub command_timeout: Duration,
    pub expensive_timeout: Duration,
    pub cache: &'a Mutex<Cache>,
}

impl Adapter {
    /// Adapters enabled by `config`, in probe priority order.
    pub fn enabled(config: &VcsConfig) -> Vec<Self> {
        let mut adapters = Vec::new();
        if config.git {
            adapters.push(Self::Git);
        }
        if config.hg {
            adapters.push(Self::Hg);
        }
        adapters
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Hg => "hg",
        }
    }

    /// Returns a match if `ctx.pwd` is inside a repository of this kind.
    pub async fn probe(self, ctx: &ProbeContext<'_>) -> Option<VcsMatch> {
        match self {
            Self::Git => probe_git(ctx).await,
            Self::Hg => probe_hg(ctx).await,
        }
    }
}

/// Probes every adapter concurrently and returns the highest-priority match.
pub async fn probe_all(adapters: &[Adapter], ctx: &ProbeContext<'_>) -> Option<VcsMatch> {
    let probes = adapters.iter().map(|&adapter| async move {
        let started = Instant::now();
        let found = adapter.probe(ctx).await;
        tracing::debug!(
            adapter = adapter.description(),
            matched = found.is_some(),
            elapsed_ms = started.elapsed().as_millis(),
            "vcs probe finished"
        );
        found
    });
    join_all(probes).await.into_iter().flatten().next()
}

async fn probe_git(ctx: &ProbeContext<'_>) -> Option<VcsMatch> {
    let info = match git::git_info(ctx.pwd, ctx.command_timeout).await {
        Ok(info) => info,
        Err(err) => {
            tracing::trace!(error = %format!("{err:#}"), "git: no match");
            return None;
        }
    };
    Some(VcsMatch {
        info: info.info_string(),
        flag: StyledText::stylized("git", Color::Red, Intensity::Intense),
        pwd: info.relative_pwd,
    })
}

async fn probe_hg(ctx: &ProbeContext<'_>) -> Option<VcsMatch> {
    let info = match hg::hg_info(ctx.pwd, ctx.command_timeout).await {
        Ok(info) => info,
        Err(err) => {
            tracing::trace!(error = %format!("{err:#}"), "hg: no match");
            return None;
        }
    };

    let expensive = if ctx.update_cache {
        refresh_hg_cache(ctx, &info.repo_path).await
    } else {
        ctx.cache
            .lock()
            .await
            .get::<hg::ExpensiveHgInfo>(&info.repo_path)
    };

    Some(VcsMatch {
        info: hg::info_string(&info, expensive),
        flag: StyledText::stylized("hg", Color::Magenta, Intensity::Bold),
        pwd: info.relative_pwd,
    })
}

async fn refresh_hg_cache(
    ctx: &ProbeContext<'_>,
    repo_path: &str,
) -> Option<hg::ExpensiveHgInfo> {
    match hg::expensive_hg_info(ctx.pwd, ctx.expensive_timeout).await {
        Ok(expensive) => {
            if let Err(err) = ctx.cache.lock().await.set(repo_path, &expensive) {
                tracing::warn!(error = %format!("{err:#}"), "failed to cache hg outgoing state");
            }
            Some(expensive)
        }
        Err(err) => {
            tracing::warn!(repo = repo_path, error = %format!("{err:#}"), "hg outgoing failed");
            ctx.cache.lock().await.get(repo_path)
        }
    }
}
