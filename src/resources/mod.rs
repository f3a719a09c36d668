//! Idempotent resource primitives (check + apply pattern).
//!
//! Script commands that move whole files or drive the service manager
//! describe the desired state as a [`Resource`] and hand it to [`process`],
//! which decides (from [`ProcessOpts`]) whether the observed state is left
//! alone or fixed, and honours dry-run.
pub mod helpers;
pub mod network;
pub mod service;
pub mod template;

use anyhow::Result;

use crate::logging::Log;

/// State of a resource.
///
/// # Examples
///
/// ```
/// use confctl::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let wrong = ResourceState::Incorrect { current: "off".into() };
///
/// assert_ne!(missing, ResourceState::Correct);
/// assert_ne!(wrong, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// Description of the current state.
        current: String,
    },
    /// Resource cannot be brought to the desired state.
    Invalid {
        /// Why it cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was left alone.
    Skipped {
        /// Why it was skipped.
        reason: String,
    },
}

/// A piece of install-tree or host state that can be checked and applied.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined.
    fn current_state(&self) -> Result<ResourceState>;

    /// Bring the resource to the desired state.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be applied.
    fn apply(&self) -> Result<ResourceChange>;
}

/// How [`process`] treats each observed state.
///
/// # Examples
///
/// ```
/// use confctl::resources::ProcessOpts;
///
/// let init = ProcessOpts::init("copy");
/// assert!(init.fix_missing && !init.fix_incorrect);
///
/// let converge = ProcessOpts::converge("copy");
/// assert!(converge.fix_missing && converge.fix_incorrect);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ProcessOpts<'a> {
    /// Verb for log messages (e.g. "copy", "enable").
    pub verb: &'a str,
    /// Apply when the resource is `Incorrect`; otherwise leave it alone.
    pub fix_incorrect: bool,
    /// Apply when the resource is `Missing`; otherwise leave it alone.
    pub fix_missing: bool,
}

impl<'a> ProcessOpts<'a> {
    /// Create what is missing; never touch what the operator already has.
    #[must_use]
    pub const fn init(verb: &'a str) -> Self {
        Self {
            verb,
            fix_incorrect: false,
            fix_missing: true,
        }
    }

    /// Create what is missing and correct what differs.
    #[must_use]
    pub const fn converge(verb: &'a str) -> Self {
        Self {
            verb,
            fix_incorrect: true,
            fix_missing: true,
        }
    }
}

/// What [`process`] did with a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processed {
    /// The change was applied.
    Applied,
    /// Dry run: the change would have been applied.
    WouldApply,
    /// Already in the desired state.
    AlreadyCorrect,
    /// Left alone (state not fixable under the options, or invalid).
    Skipped {
        /// Why it was left alone.
        reason: String,
    },
}

/// Check `resource` and apply it if `opts` allow fixing its state.
///
/// # Errors
///
/// Propagates errors from `current_state()` and `apply()`.
pub fn process<R: Resource + ?Sized>(
    resource: &R,
    opts: &ProcessOpts<'_>,
    dry_run: bool,
    log: &dyn Log,
) -> Result<Processed> {
    let desc = resource.description();
    let state = resource.current_state()?;
    log.debug(&format!("{desc}: {state:?}"));
    match state {
        ResourceState::Correct => Ok(Processed::AlreadyCorrect),
        ResourceState::Invalid { reason } => Ok(Processed::Skipped { reason }),
        ResourceState::Missing if !opts.fix_missing => Ok(Processed::Skipped {
            reason: "missing".to_string(),
        }),
        ResourceState::Incorrect { current } if !opts.fix_incorrect => Ok(Processed::Skipped {
            reason: format!("currently {current}"),
        }),
        state @ (ResourceState::Missing | ResourceState::Incorrect { .. }) => {
            if dry_run {
                let msg = if let ResourceState::Incorrect { current } = state {
                    format!("would {} {desc} (currently {current})", opts.verb)
                } else {
                    format!("would {}: {desc}", opts.verb)
                };
                log.dry_run(&msg);
                return Ok(Processed::WouldApply);
            }
            match resource.apply()? {
                ResourceChange::Applied => {
                    log.debug(&format!("{}: {desc}", opts.verb));
                    Ok(Processed::Applied)
                }
                ResourceChange::AlreadyCorrect => Ok(Processed::AlreadyCorrect),
                ResourceChange::Skipped { reason } => Ok(Processed::Skipped { reason }),
            }
        }
    }
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::tests_support::RecordingLog;
    use std::cell::Cell;

    struct TestResource {
        state: ResourceState,
        applied: Cell<bool>,
    }

    impl TestResource {
        fn new(state: ResourceState) -> Self {
            Self {
                state,
                applied: Cell::new(false),
            }
        }
    }

    impl Resource for TestResource {
        fn description(&self) -> String {
            "test resource".to_string()
        }

        fn current_state(&self) -> Result<ResourceState> {
            Ok(self.state.clone())
        }

        fn apply(&self) -> Result<ResourceChange> {
            self.applied.set(true);
            Ok(ResourceChange::Applied)
        }
    }

    fn incorrect() -> ResourceState {
        ResourceState::Incorrect {
            current: "off".to_string(),
        }
    }

    #[test]
    fn missing_is_applied_by_init() {
        let r = TestResource::new(ResourceState::Missing);
        let log = RecordingLog::new();
        let got = process(&r, &ProcessOpts::init("copy"), false, &log).unwrap();
        assert_eq!(got, Processed::Applied);
        assert!(r.applied.get());
    }

    #[test]
    fn incorrect_is_left_alone_by_init() {
        let r = TestResource::new(incorrect());
        let log = RecordingLog::new();
        let got = process(&r, &ProcessOpts::init("copy"), false, &log).unwrap();
        assert!(matches!(got, Processed::Skipped { .. }));
        assert!(!r.applied.get());
    }

    #[test]
    fn incorrect_is_fixed_by_converge() {
        let r = TestResource::new(incorrect());
        let log = RecordingLog::new();
        let got = process(&r, &ProcessOpts::converge("move"), false, &log).unwrap();
        assert_eq!(got, Processed::Applied);
    }

    #[test]
    fn correct_is_never_applied() {
        let r = TestResource::new(ResourceState::Correct);
        let log = RecordingLog::new();
        let got = process(&r, &ProcessOpts::converge("copy"), false, &log).unwrap();
        assert_eq!(got, Processed::AlreadyCorrect);
        assert!(!r.applied.get());
    }

    #[test]
    fn invalid_is_skipped_with_reason() {
        let r = TestResource::new(ResourceState::Invalid {
            reason: "both files exist".to_string(),
        });
        let log = RecordingLog::new();
        let got = process(&r, &ProcessOpts::converge("copy"), false, &log).unwrap();
        assert_eq!(
            got,
            Processed::Skipped {
                reason: "both files exist".to_string()
            }
        );
    }

    #[test]
    fn dry_run_logs_instead_of_applying() {
        let r = TestResource::new(incorrect());
        let log = RecordingLog::new();
        let got = process(&r, &ProcessOpts::converge("move"), true, &log).unwrap();
        assert_eq!(got, Processed::WouldApply);
        assert!(!r.applied.get());
        assert_eq!(
            log.dry_run_lines(),
            ["would move test resource (currently off)"]
        );
    }
}
