/// Structured feedback emitted while a sync run progresses.
///
/// The orchestrator never prints. Callers decide how to present feedback
/// by handing it a [`FeedbackSink`] (the CLI prints to stderr, tests collect
/// into a vector, library consumers can log or ignore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Informational message (progress, status updates).
    Info(String),
    /// Warning - operation continued but something noteworthy occurred.
    Warning(String),
    /// Error - something failed (may or may not be fatal depending on context).
    Error(String),
}

impl Feedback {
    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::Warning(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info(msg) => write!(f, "{msg}"),
            Self::Warning(msg) => write!(f, "warning: {msg}"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Destination for [`Feedback`] produced by concurrently running jobs.
pub trait FeedbackSink: Send + Sync {
    fn emit(&self, feedback: Feedback);
}

impl<F> FeedbackSink for F
where
    F: Fn(Feedback) + Send + Sync,
{
    fn emit(&self, feedback: Feedback) {
        self(feedback)
    }
}

/// A sink that drops everything.
pub struct Silent;

impl FeedbackSink for Silent {
    fn emit(&self, _feedback: Feedback) {}
}
