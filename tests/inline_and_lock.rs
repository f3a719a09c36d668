#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Inline `--exec` statements, parse failures and the write lock.

mod common;

use std::sync::Arc;

use common::*;
use confctl::config::layout::ConfigState;
use confctl::config::lock::LockGuard;
use confctl::error::ConfError;

fn tree() -> InstallTree {
    InstallTreeBuilder::new()
        .with_node_template("[general]\nauto_online=false\n")
        .with_node_config("[general]\nauto_online=false\n")
        .with_network_template("Backbone", "[general]\nid=0x1\n")
        .build()
}

#[test]
fn inline_statements_run_in_order() {
    let tree = tree();

    let log = tree
        .run_inline(
            "config cellframe-node general auto_online ensure true and network Backbone ensure on",
        )
        .unwrap();

    assert!(tree.node_config().contains("auto_online=true"));
    assert!(tree.path("Backbone", ConfigState::On).exists());
    assert_eq!(log.entries().len(), 2);
}

#[test]
fn inline_parse_error_names_the_statement() {
    let tree = tree();
    let before = tree.snapshot();

    let err = tree
        .run_inline("network Backbone ensure on and network Unknown ensure on")
        .unwrap_err();

    assert!(matches!(err, ConfError::Parse { line: 2, .. }));
    assert_eq!(tree.snapshot(), before);
}

#[test]
fn script_failure_reports_its_line() {
    let tree = tree();
    std::fs::remove_file(tree.path("cellframe-node", ConfigState::On)).unwrap();
    let log = Arc::new(RecordingLog::default());

    let err = tree
        .try_run_script(
            "# comment\nconfig cellframe-node general auto_online ensure true\n",
            false,
            &log,
        )
        .unwrap_err();

    assert!(format!("{err:#}").starts_with("setup line 2 <<config cellframe-node"));
}

#[test]
fn held_lock_blocks_writes() {
    let tree = tree();
    let _held = LockGuard::acquire(&tree.lock_path()).unwrap();
    let before = tree.node_config();
    let log = Arc::new(RecordingLog::default());

    let err = tree
        .try_run_script(
            "config cellframe-node general auto_online ensure true\n",
            false,
            &log,
        )
        .unwrap_err();

    assert!(
        err.chain()
            .any(|e| matches!(e.downcast_ref::<ConfError>(), Some(ConfError::LockFailure { .. })))
    );
    assert_eq!(tree.node_config(), before);
}

#[test]
fn dry_run_ignores_a_held_lock() {
    let tree = tree();
    let _held = LockGuard::acquire(&tree.lock_path()).unwrap();
    let log = Arc::new(RecordingLog::default());

    tree.try_run_script(
        "config cellframe-node general auto_online ensure true\n",
        true,
        &log,
    )
    .unwrap();

    assert!(tree.node_config().contains("auto_online=false"));
}

#[test]
fn lock_is_released_after_a_write() {
    let tree = tree();

    tree.run_script("config cellframe-node general auto_online ensure true\n", false);

    assert!(tree.lock_path().exists());
    LockGuard::acquire(&tree.lock_path()).unwrap();
}
