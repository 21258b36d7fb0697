use milestone::errors::{ErrorKind, MilestoneError, MilestoneResult};
use milestone::migration::{MigrationListener, MigrationManager};
use milestone::version::FixedVersionProvider;
use milestone_fjall_adapter::FjallPreferenceStore;
use std::path::Path;
use std::time::{Duration, Instant};
use std::{env, fs, thread};

/// Runs a test against a fresh database directory, retrying a few times
/// before giving up. `after` runs whether or not the test failed.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(&TestContext) -> MilestoneResult<()> + std::panic::RefUnwindSafe,
    B: Fn() -> MilestoneResult<TestContext> + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> MilestoneResult<()> + std::panic::RefUnwindSafe,
{
    const MAX_RETRIES: u32 = 3;
    let mut last_error: Option<String> = None;

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        let result = std::panic::catch_unwind(|| {
            let ctx = before().map_err(|e| format!("Before run failed: {:?}", e))?;
            let test_result = test(&ctx);
            let after_result = after(ctx);
            match (test_result, after_result) {
                (Ok(_), Ok(_)) => Ok(()),
                (Err(e), _) => Err(format!("Test failed: {:?}", e)),
                (Ok(_), Err(e)) => Err(format!("After run failed: {:?}", e)),
            }
        });

        let error = match result {
            Ok(Ok(_)) => return,
            Ok(Err(e)) => e,
            Err(panic_err) => {
                if let Some(s) = panic_err.downcast_ref::<&str>() {
                    format!("Panic: {}", s)
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    format!("Panic: {}", s)
                } else {
                    "Panic: unknown payload".to_string()
                }
            }
        };

        if attempt < MAX_RETRIES {
            eprintln!(
                "\n========== Test Attempt {}/{} Failed (took {:?}) ==========",
                attempt,
                MAX_RETRIES,
                start_time.elapsed()
            );
            eprintln!("Error: {}", error);
            thread::sleep(Duration::from_millis(100 * attempt as u64));
        }
        last_error = Some(error);
    }

    panic!(
        "Test failed after {} attempts. Last error: {}",
        MAX_RETRIES,
        last_error.unwrap_or_default()
    );
}

/// A database directory that tests open and reopen to simulate application
/// restarts. Stores are never cached so every `open_store` sees only what
/// earlier runs persisted.
pub struct TestContext {
    path: String,
}

impl TestContext {
    pub fn new(path: String) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn open_store(&self) -> MilestoneResult<FjallPreferenceStore> {
        FjallPreferenceStore::with_config()
            .db_path(&self.path)
            .low_memory_preset()
            .build()
    }

    /// Simulates one application launch running `version`.
    pub fn launch(
        &self,
        namespace: &str,
        version: &str,
        listener: Option<MigrationListener>,
    ) -> MilestoneResult<MigrationManager> {
        let mut builder = MigrationManager::builder()
            .namespace(namespace)
            .version_provider(FixedVersionProvider::new(version)?)
            .store(self.open_store()?);
        if let Some(listener) = listener {
            builder = builder.listener(listener);
        }
        builder.build()
    }
}

pub fn random_path() -> String {
    let id = uuid::Uuid::new_v4();
    let temp_dir = env::temp_dir();
    temp_dir
        .join(format!("milestone-{}", id))
        .to_string_lossy()
        .into_owned()
}

pub fn create_test_context() -> MilestoneResult<TestContext> {
    let path = random_path();
    if Path::new(&path).exists() {
        fs::remove_dir_all(&path)?;
    }
    Ok(TestContext::new(path))
}

pub fn cleanup(ctx: TestContext) -> MilestoneResult<()> {
    let path = ctx.path().to_string();
    drop(ctx);

    // fjall may still be releasing file handles right after the last drop
    let mut attempts = 0;
    loop {
        match fs::remove_dir_all(&path) {
            Ok(_) => return Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) if attempts >= 5 => {
                return Err(MilestoneError::new(
                    &format!("Failed to remove test directory {}: {}", path, e),
                    ErrorKind::IOError,
                ))
            }
            Err(_) => {
                attempts += 1;
                thread::sleep(Duration::from_millis(20 * attempts));
            }
        }
    }
}
