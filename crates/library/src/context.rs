use crate::error::{ErrorKind, Result};
use crate::organize::{ReportSink, TracingSink};
use crate::template::{Prompt, Resolver};
use darkroom_config::GalleryConfig;
use darkroom_storage::Tree;
use exn::{OptionExt, ResultExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything an organize call needs, prepared once per run.
///
/// Building a context is where the configuration is accepted: it is validated,
/// the prompt is parsed, and the destination (and backup) roots are opened.
/// After that the context is only ever read, so lanes can share it by
/// reference.
pub struct Context {
    config: GalleryConfig,
    prompt: Prompt,
    resolver: Resolver,
    gallery: Tree,
    backup: Option<Tree>,
    sink: Arc<dyn ReportSink>,
}

impl Context {
    /// # Errors
    ///
    /// - [`ErrorKind::Configuration`] if the configuration is invalid.
    /// - [`ErrorKind::Gallery`] if the destination or backup location exists
    ///   but is not a directory, or cannot be created.
    pub fn new(config: GalleryConfig) -> Result<Self> {
        config.validate().map_err(ErrorKind::configuration)?;
        let destination = config
            .destination()
            .ok_or_raise(|| ErrorKind::Gallery(PathBuf::new()))
            .and_then(absolute)?;
        let gallery = Tree::new(&destination).or_raise(|| ErrorKind::Gallery(destination.clone()))?;
        let backup = match config.backup() {
            Some(location) => {
                let location = absolute(location)?;
                Some(Tree::new(&location).or_raise(|| ErrorKind::Gallery(location))?)
            },
            None => None,
        };

        let Ok(prompt) = config.organization_prompt.parse::<Prompt>();
        if prompt.is_empty() {
            tracing::warn!(prompt = %config.organization_prompt, "Prompt has no recognised tokens, files will land in the gallery root");
        }
        let resolver = Resolver::new(gallery.root())
            .with_custom_format(config.custom_prompt.clone().filter(|c| !c.is_empty()))
            .with_placeholders(config.placeholders);
        tracing::debug!(%prompt, gallery = %gallery.root().display(), backup = backup.is_some(), "Accepted configuration");

        Ok(Self { config, prompt, resolver, gallery, backup, sink: Arc::new(TracingSink) })
    }

    /// Replaces the default [`TracingSink`].
    pub fn with_sink(mut self, sink: impl ReportSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    pub(crate) fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn gallery(&self) -> &Tree {
        &self.gallery
    }

    pub fn backup(&self) -> Option<&Tree> {
        self.backup.as_ref()
    }

    pub(crate) fn sink(&self) -> &dyn ReportSink {
        self.sink.as_ref()
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).or_raise(|| ErrorKind::Gallery(path.to_path_buf()))
}
