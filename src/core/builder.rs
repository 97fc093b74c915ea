use std::sync::Arc;

use super::config::Config;
use super::emitter::Emitter;
use crate::loggers::{Logger, TracingLogger};

/// Builder for constructing an [`Emitter`] with a custom logger.
pub struct EmitterBuilder {
    cfg: Config,
    logger: Option<Arc<dyn Logger>>,
}

impl EmitterBuilder {
    /// Creates a new builder with the given configuration and the default [`TracingLogger`].
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            logger: Some(Arc::new(TracingLogger)),
        }
    }

    /// Sets the sink for reported errors.
    pub fn with_logger(mut self, logger: impl Logger) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Disables error reporting entirely.
    pub fn without_logger(mut self) -> Self {
        self.logger = None;
        self
    }

    /// Builds and returns the emitter.
    ///
    /// The emitter starts in [`RunState::Started`](crate::RunState::Started) with no channels.
    pub fn build(self) -> Emitter {
        Emitter::from_parts(self.cfg, self.logger)
    }
}
