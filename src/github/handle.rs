//! Identity wrappers and the request-scoped repository handle.

use super::error::BotError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `BotError::InvalidPayload` when the supplied string is blank.
    pub fn new(value: &str) -> Result<Self, BotError> {
        if value.is_empty() {
            return Err(BotError::InvalidPayload {
                message: "repository owner is empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the repository name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `BotError::InvalidPayload` when the supplied string is blank.
    pub fn new(value: &str) -> Result<Self, BotError> {
        if value.is_empty() {
            return Err(BotError::InvalidPayload {
                message: "repository name is empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Branch name wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(String);

impl BranchName {
    /// Wraps a branch name, rejecting blank values.
    ///
    /// # Errors
    ///
    /// Returns `BotError::InvalidPayload` when the supplied string is blank.
    pub fn new(value: &str) -> Result<Self, BotError> {
        if value.is_empty() {
            return Err(BotError::InvalidPayload {
                message: "branch name is empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the branch name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Configuration` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, BotError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BotError::Configuration {
                message: "personal access token is required".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Request-scoped view of the repository a comment event targets.
///
/// All file and ref reads performed through a gateway are scoped to
/// `working_branch`. The handle starts on the repository's default branch;
/// [`RepositoryHandle::redirect_working_branch`] is the only way to point it
/// elsewhere, which keeps branch redirection an explicit, auditable step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    owner: RepositoryOwner,
    name: RepositoryName,
    default_branch: BranchName,
    working_branch: BranchName,
}

impl RepositoryHandle {
    /// Creates a handle scoped to the repository's default branch.
    #[must_use]
    pub fn new(owner: RepositoryOwner, name: RepositoryName, default_branch: BranchName) -> Self {
        let working_branch = default_branch.clone();
        Self {
            owner,
            name,
            default_branch,
            working_branch,
        }
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// The repository's default branch.
    #[must_use]
    pub const fn default_branch(&self) -> &BranchName {
        &self.default_branch
    }

    /// The branch all reads are currently scoped to.
    #[must_use]
    pub const fn working_branch(&self) -> &BranchName {
        &self.working_branch
    }

    /// `owner/name` form used in log lines and reply text.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.as_str(), self.name.as_str())
    }

    /// Redirects subsequent reads to `branch`.
    ///
    /// Called when a prior work-in-progress branch for the same contributor
    /// is discovered, so the request resumes from that branch's state.
    pub fn redirect_working_branch(&mut self, branch: BranchName) {
        tracing::info!(
            repository = %self.full_name(),
            branch = branch.as_str(),
            "redirecting working branch"
        );
        self.working_branch = branch;
    }

    /// Whether the handle still reads from the default branch.
    #[must_use]
    pub fn is_on_default_branch(&self) -> bool {
        self.working_branch == self.default_branch
    }
}
