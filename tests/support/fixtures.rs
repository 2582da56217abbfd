use std::path::PathBuf;
use std::process::{Command, Output};

pub fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

pub fn labqc_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_labqc"))
}

/// Run labqc in `dir` with a clean HOME so no global config leaks in.
pub fn run_labqc(dir: &std::path::Path, args: &[&str]) -> Output {
    Command::new(labqc_binary())
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("LABQC_QUIET")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run labqc {:?}: {}", args, e))
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
