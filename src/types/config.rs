use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ApplyMode {
    #[default]
    DryRun,
    Commit,
}

/// Settings for one pass. Built once at startup and owned by the `Delinker`
/// for the whole run; nothing mutates it afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub root: PathBuf,
    pub dry_run: bool,
    pub auto_confirm: bool,
}

impl RunConfig {
    pub fn new(root: impl AsRef<Path>, dry_run: bool, auto_confirm: bool) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            dry_run,
            auto_confirm,
        }
    }

    #[must_use]
    pub fn mode(&self) -> ApplyMode {
        if self.dry_run {
            ApplyMode::DryRun
        } else {
            ApplyMode::Commit
        }
    }

    /// Whether the operator has to approve the pass before anything is mutated.
    #[must_use]
    pub fn needs_confirmation(&self) -> bool {
        !self.dry_run && !self.auto_confirm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_never_needs_confirmation() {
        let cfg = RunConfig::new("/tmp", true, false);
        assert_eq!(cfg.mode(), ApplyMode::DryRun);
        assert!(!cfg.needs_confirmation());
    }

    #[test]
    fn commit_without_yes_needs_confirmation() {
        assert!(RunConfig::new("/tmp", false, false).needs_confirmation());
        assert!(!RunConfig::new("/tmp", false, true).needs_confirmation());
        assert_eq!(RunConfig::new("/tmp", false, true).mode(), ApplyMode::Commit);
    }
}
