//! Access to the fixture files shipped with the testkit crate.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory holding the fixture files.
pub fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Absolute path of a fixture, e.g. `config/logger-options.valid.json`.
pub fn fixture_path(relative: &str) -> PathBuf {
    fixtures_root().join(relative)
}

/// Read a fixture into a string.
pub fn read_fixture(relative: &str) -> io::Result<String> {
    fs::read_to_string(fixture_path(relative))
}
