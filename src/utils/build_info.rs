use std::fmt;

/// What `build.rs` recorded about the binary; fields fall back to `unknown` outside cargo.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

macro_rules! build_env {
    ($name:literal) => {
        match option_env!($name) {
            Some(value) => value,
            None => "unknown",
        }
    };
}

pub const BUILD: BuildMetadata = BuildMetadata {
    version: env!("CARGO_PKG_VERSION"),
    git_hash: build_env!("BUDGET_PLANNER_BUILD_HASH"),
    git_status: build_env!("BUDGET_PLANNER_BUILD_STATUS"),
    timestamp: build_env!("BUDGET_PLANNER_BUILD_TIMESTAMP"),
    target: build_env!("BUDGET_PLANNER_BUILD_TARGET"),
    profile: build_env!("BUDGET_PLANNER_BUILD_PROFILE"),
    rustc: build_env!("BUDGET_PLANNER_BUILD_RUSTC"),
};

pub fn current() -> BuildMetadata {
    BUILD
}

/// `0.1.0 (abc1234)`, with `, dirty` when the tree had local changes.
impl fmt::Display for BuildMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.version, self.git_hash)?;
        if self.git_status == "dirty" {
            f.write_str(", dirty")?;
        }
        f.write_str(")")
    }
}
