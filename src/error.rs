use thiserror::Error;

/// Why an action did not complete. The interpreter picks its next move from
/// the variant: skip the action, drop the record, or abort the site.
#[derive(Debug, Error)]
pub enum ActionError {
    /// A browser call failed or timed out. The action is skipped.
    #[error("interaction failed: {0:#}")]
    Interaction(anyhow::Error),
    /// A locator matched nothing. The current record is abandoned.
    #[error("extraction miss: {0}")]
    Miss(String),
    /// Anything unexpected. The rest of the site's steps are abandoned.
    #[error(transparent)]
    Site(#[from] anyhow::Error),
}

pub type ActionResult<T = ()> = std::result::Result<T, ActionError>;
