use milestone::errors::MilestoneResult;
use std::sync::atomic::{AtomicUsize, Ordering};

// this binary holds a single test so clearing the environment cannot race
// with other tests

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_default_manager_without_cargo_environment() {
    std::env::remove_var("MILESTONE_APP_VERSION");
    std::env::remove_var("CARGO_PKG_VERSION");

    let manager = milestone::migration_manager!("int-test-default").unwrap();
    assert_eq!(
        manager.current_version().unwrap().as_str(),
        env!("CARGO_PKG_VERSION")
    );

    let runs = AtomicUsize::new(0);
    let action = || -> MilestoneResult<()> {
        runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    };
    assert!(manager.run_migration("0.1", action).unwrap());
    assert!(!manager.run_migration("0.1", action).unwrap());
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let default = milestone::migration_manager!().unwrap();
    assert!(default.run_migration("0.1.0", || Ok(())).unwrap());
}
