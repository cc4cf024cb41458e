use std::path::PathBuf;

/// The rustdoc output tree shared with the `rustdoc-index` tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../rustdoc-index/tests/fixtures/doc")
}

pub fn fixture(rel: &str) -> String {
    fixtures_dir().join(rel).display().to_string()
}

/// A file in the temp dir that is removed when dropped.
pub struct TempFile(pub PathBuf);

impl TempFile {
    pub fn new(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!("docindex-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        Self(path)
    }

    pub fn path(&self) -> String {
        self.0.display().to_string()
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

pub fn run_cli(args: &[&str]) -> (String, String, bool) {
    let args: Vec<&str> = ["--color", "never"].into_iter().chain(args.iter().copied()).collect();
    match docindex::run_cli(&args) {
        Ok(stdout) => (normalize_output(&stdout), String::new(), true),
        Err(error) => (
            normalize_output(&error.output),
            normalize_output(&error.message),
            false,
        ),
    }
}

/// Replace machine-specific paths with placeholders
fn normalize_output(output: &str) -> String {
    let fixtures = fixtures_dir().display().to_string();
    let temp = std::env::temp_dir().join(format!("docindex-{}-", std::process::id()));
    output
        .replace(&fixtures, "[FIXTURES]")
        .replace(&temp.display().to_string(), "[TEMP]/")
}
