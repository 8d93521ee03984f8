use assert_cmd::Command;
use tempfile::TempDir;

/// One isolated CLI environment per test: its own working directory and its
/// own database file, wired up through the RIPPLE_* env overrides.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    pub fn ripple(&self) -> Command {
        let mut cmd = Command::cargo_bin("ripple").expect("ripple binary should build");
        cmd.current_dir(self.dir.path())
            .env("RIPPLE_DATABASE", self.dir.path().join("tasks.db"))
            .env("USER", "tester")
            .env_remove("RUST_LOG");
        cmd
    }
}

/// Pulls the first UUID out of (possibly colour-coded) CLI output.
pub fn extract_task_id(output: &str) -> String {
    for (i, _) in output.char_indices() {
        if let Some(candidate) = output.get(i..i + 36) {
            if is_uuid(candidate) {
                return candidate.to_string();
            }
        }
    }
    panic!("no task id found in output: {output}");
}

fn is_uuid(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, &c)| match i {
        8 | 13 | 18 | 23 => c == b'-',
        _ => c.is_ascii_hexdigit(),
    })
}
