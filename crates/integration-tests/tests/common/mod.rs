//! Stub queue-client executables for end-to-end tests
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use queueburst_core::port::time_provider::SystemTimeProvider;
use queueburst_infra_system::AwsCli;

/// Scratch directory holding a stub client and whatever it records
pub struct StubClient {
    pub dir: PathBuf,
    pub program: PathBuf,
}

impl StubClient {
    /// Write `body` as an executable shell script. `$DIR` in the body is
    /// replaced with the scratch directory.
    pub fn new(body: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("queueburst-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();

        let program = dir.join("aws");
        let script = format!("#!/bin/sh\n{}\n", body.replace("$DIR", &dir.display().to_string()));
        fs::write(&program, script).unwrap();
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();

        Self { dir, program }
    }

    /// Records its argv (one per line) and prints a send-message reply
    pub fn recording() -> Self {
        Self::new(
            r#"printf '%s\n' "$@" > "$DIR/call-$$.tmp" && mv "$DIR/call-$$.tmp" "$DIR/call-$$.args"
printf '{"MD5OfMessageBody": "0", "MessageId": "stub-%s"}\n' "$$""#,
        )
    }

    /// Fails the way the client does for an unknown queue
    pub fn failing() -> Self {
        Self::new(
            r#"echo "An error occurred (AWS.SimpleQueueService.NonExistentQueue) when calling the SendMessage operation" >&2
exit 255"#,
        )
    }

    /// Never answers within a test's patience
    pub fn hanging() -> Self {
        Self::new("exec sleep 30")
    }

    pub fn cli(&self) -> AwsCli {
        AwsCli::new(Arc::new(SystemTimeProvider)).with_program(self.program.display().to_string())
    }

    /// Argument vectors recorded so far
    pub fn recorded_calls(&self) -> Vec<Vec<String>> {
        let mut calls: Vec<Vec<String>> = fs::read_dir(&self.dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map_or(false, |ext| ext == "args"))
            .map(|path| read_lines(&path))
            .collect();
        calls.sort();
        calls
    }

    /// Poll until `count` calls were recorded or `limit` passes
    pub fn wait_for_calls(&self, count: usize, limit: Duration) -> Vec<Vec<String>> {
        let deadline = Instant::now() + limit;
        loop {
            let calls = self.recorded_calls();
            if calls.len() >= count || Instant::now() >= deadline {
                return calls;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }
}

impl Drop for StubClient {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
