use serde::Serialize;

/// Branch checked out in the workspace directory. Only built when HEAD is a
/// symbolic ref to `refs/heads/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitState {
    pub branch: String,
}

impl GitState {
    /// Trimmed branch name. Empty names and names carrying control
    /// characters (never valid in a ref) yield `None`.
    pub fn new(branch: impl Into<String>) -> Option<Self> {
        let branch = branch.into();
        let branch = branch.trim();
        if branch.is_empty() || branch.chars().any(char::is_control) {
            None
        } else {
            Some(Self {
                branch: branch.to_string(),
            })
        }
    }

    /// Suffix appended to the line: `" | <branch>"`.
    pub fn suffix(&self) -> String {
        format!(" | {}", self.branch)
    }
}
