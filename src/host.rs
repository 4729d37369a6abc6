//! Host platform naming
//!
//! Release artifacts and package binaries are named with Go-style
//! operating system and architecture identifiers (`darwin`, `amd64`, ...),
//! which differ from Rust's `std::env::consts` names.

/// Operating system name as used in release artifact names
#[must_use]
pub fn os_name() -> &'static str {
    go_os(std::env::consts::OS)
}

/// Architecture name as used in release artifact names
#[must_use]
pub fn arch_name() -> &'static str {
    go_arch(std::env::consts::ARCH)
}

/// Suffix appended to downloaded binaries (`.exe` on Windows)
#[must_use]
pub fn binary_suffix() -> &'static str {
    if cfg!(windows) { ".exe" } else { "" }
}

/// Executable suffixes tried when looking up package commands.
///
/// The empty suffix is always tried first.
#[must_use]
pub fn executable_suffixes() -> &'static [&'static str] {
    if cfg!(windows) {
        &["", ".exe", ".bat", ".cmd", ".com", ".jar"]
    } else {
        &[""]
    }
}

fn go_os(os: &'static str) -> &'static str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn go_arch(arch: &'static str) -> &'static str {
    match arch {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "s390x" => "s390x",
        other => other,
    }
}
