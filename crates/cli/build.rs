use std::process::Command;

fn main() {
    // Short git sha for `psi --version`
    let git_sha = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|sha| sha.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=PSI_GIT_SHA={}", git_sha);
    println!("cargo:rerun-if-changed=.git/HEAD");
}
