#![cfg(unix)]

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// A fake Debian system: shell scripts standing in for dpkg-query and
/// apt-cache, plus a few real files for the file listing.
struct FakeSystem {
    root: TempDir,
}

impl FakeSystem {
    fn new() -> Self {
        let system = FakeSystem {
            root: tempdir().unwrap(),
        };
        fs::create_dir_all(system.bin_dir()).unwrap();
        fs::create_dir_all(system.files_dir()).unwrap();

        fs::write(system.files_dir().join("curl"), vec![0u8; 300]).unwrap();
        fs::write(system.files_dir().join("libcurl.so.4"), vec![0u8; 200]).unwrap();
        std::os::unix::fs::symlink(
            system.files_dir().join("libcurl.so.4"),
            system.files_dir().join("libcurl.so"),
        )
        .unwrap();
        fs::write(system.files_dir().join("unowned.txt"), b"notes").unwrap();

        system.install_tools("");
        system
    }

    fn bin_dir(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    fn files_dir(&self) -> PathBuf {
        self.root.path().join("files")
    }

    fn path(&self, name: &str) -> String {
        self.files_dir().join(name).display().to_string()
    }

    /// Write both tool scripts. `extra_status` adds `--status` cases.
    fn install_tools(&self, extra_status: &str) {
        let dpkg_query = format!(
            r#"#!/bin/sh
case "$1" in
  --status)
    case "$2" in
      curl) printf 'Package: curl\nStatus: install ok installed\nArchitecture: amd64\nVersion: 7.88.1\nDepends: libcurl4 (= 7.88.1), ghost-lib\nDescription: command line tool\n more text\n' ;;
      libcurl4) printf 'Package: libcurl4\nStatus: install ok installed\nVersion: 7.88.1\n' ;;
      oldpkg) printf 'Package: oldpkg\nStatus: deinstall ok config-files\nVersion: 1.0\n' ;;
{extra_status}
      *) echo "dpkg-query: package '$2' is not installed" >&2; exit 1 ;;
    esac ;;
  --listfiles)
    case "$2" in
      curl) printf '/.\n{files}\n{curl}\n{vanished}\n' ;;
      libcurl4) printf '{libcurl}\n{libcurl_link}\n' ;;
      *) exit 1 ;;
    esac ;;
  --search)
    if [ "$2" = "{curl}" ]; then echo "curl: $2"; else echo "dpkg-query: no path found matching pattern $2" >&2; exit 1; fi ;;
  *) exit 2 ;;
esac
"#,
            files = self.files_dir().display(),
            curl = self.path("curl"),
            vanished = self.path("vanished"),
            libcurl = self.path("libcurl.so.4"),
            libcurl_link = self.path("libcurl.so"),
        );
        let apt_cache = r#"#!/bin/sh
case "$2" in
  libcurl4) printf 'libcurl4\nReverse Depends:\n  curl\n |python3-pycurl\n' ;;
  *) printf '%s\nReverse Depends:\n' "$2" ;;
esac
"#;
        write_script(&self.bin_dir().join("dpkg-query"), &dpkg_query);
        write_script(&self.bin_dir().join("apt-cache"), apt_cache);
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(cargo::cargo_bin!("debinsight"));
        cmd.env("PATH", self.bin_dir())
            .env("NO_COLOR", "1")
            .env_remove("DEBINSIGHT_DPKG_QUERY")
            .env_remove("DEBINSIGHT_APT_CACHE")
            .current_dir(self.root.path());
        cmd
    }
}

fn write_script(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::new(cargo::cargo_bin!("debinsight"));
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("debinsight V"));

    let mut cmd = Command::new(cargo::cargo_bin!("debinsight"));
    cmd.arg("-v").assert().success();
}

#[test]
fn test_no_target_is_usage_error() {
    let system = FakeSystem::new();
    system
        .command()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("at least one TARGET"))
        .stdout(predicate::str::contains("Found").not());
}

#[test]
fn test_unknown_flag_exits_one() {
    let system = FakeSystem::new();
    system.command().args(["--bogus", "curl"]).assert().code(1);
}

#[test]
fn test_missing_tools() {
    let empty = tempdir().unwrap();
    let mut cmd = Command::new(cargo::cargo_bin!("debinsight"));
    cmd.env("PATH", empty.path())
        .env_remove("DEBINSIGHT_DPKG_QUERY")
        .env_remove("DEBINSIGHT_APT_CACHE")
        .arg("curl")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found on the system"));
}

#[test]
fn test_single_package_report() {
    let system = FakeSystem::new();
    system
        .command()
        .arg("curl")
        .assert()
        .success()
        .stdout(predicate::str::contains("Package curl found."))
        .stdout(predicate::str::contains(
            "Package: curl  Version: 7.88.1  Architecture: amd64",
        ))
        .stdout(predicate::str::contains("    libcurl4 (= 7.88.1)"))
        .stdout(predicate::str::contains(format!(
            "    {}  300 B",
            system.path("curl")
        )))
        .stdout(predicate::str::contains("vanished").not())
        .stdout(predicate::str::contains("Package: libcurl4").not())
        .stdout(predicate::str::contains("Total installed size: 300 B (1 package)"));
}

#[test]
fn test_follow_depend_with_json_dump() {
    let system = FakeSystem::new();
    let json_path = system.root.path().join("dump.json");

    system
        .command()
        .args(["--follow-depend", "--json"])
        .arg(&json_path)
        .arg("curl")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dropping ghost-lib: not installed."))
        .stdout(predicate::str::contains("Package: libcurl4  Version: 7.88.1"))
        .stdout(predicate::str::contains("    curl [installed]"))
        .stdout(predicate::str::contains("    python3-pycurl [not installed]"))
        .stdout(predicate::str::contains("Total installed size: 500 B (2 packages)"));

    let dump: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    let packages: Vec<&String> = dump.as_object().unwrap().keys().collect();
    assert_eq!(packages, vec!["curl", "libcurl4"]);
    assert_eq!(dump["curl"]["version"], "7.88.1");
    assert_eq!(
        dump["curl"]["depends"],
        serde_json::json!([
            {"package": "libcurl4", "version": "= 7.88.1"},
            {"package": "ghost-lib"}
        ])
    );
    assert_eq!(dump["curl"]["installed"], 300);
    assert_eq!(
        dump["libcurl4"]["rdepend"],
        serde_json::json!([
            {"package": "curl", "installed": true},
            {"package": "python3-pycurl", "installed": false}
        ])
    );
    assert_eq!(
        dump["libcurl4"]["files"],
        serde_json::json!({ system.path("libcurl.so.4"): 200 })
    );
}

#[test]
fn test_drop_not_installed_and_suppressed_sections() {
    let system = FakeSystem::new();
    system
        .command()
        .args(["--drop-not-installed", "--no-files", "--no-depend", "libcurl4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("python3-pycurl").not())
        .stdout(predicate::str::contains("Files:").not())
        .stdout(predicate::str::contains("  Depends:").not())
        .stdout(predicate::str::contains("Installed size: 200 B (1 file)"));
}

#[test]
fn test_file_target() {
    let system = FakeSystem::new();
    system
        .command()
        .arg("files/curl")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Found {} in package curl",
            system.path("curl")
        )))
        .stdout(predicate::str::contains("Package: curl  Version: 7.88.1"));
}

#[test]
fn test_unowned_file_target() {
    let system = FakeSystem::new();
    system
        .command()
        .arg(system.path("unowned.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("is not owned by any installed package"))
        .stdout(predicate::str::contains("No installed packages found."));
}

#[test]
fn test_missing_and_removed_packages_are_reported() {
    let system = FakeSystem::new();
    system
        .command()
        .args(["ghost", "oldpkg", "libcurl4"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Failed to locate package ghost on the system.",
        ))
        .stdout(predicate::str::contains(
            "Failed to locate package oldpkg on the system.",
        ))
        .stdout(predicate::str::contains("Package: libcurl4"));
}

#[test]
fn test_malformed_output_aborts_without_dump() {
    let system = FakeSystem::new();
    system.install_tools("      libbroken) echo 'garbage without fields' ;;");
    let json_path = system.root.path().join("dump.json");

    system
        .command()
        .arg("--json")
        .arg(&json_path)
        .args(["libcurl4", "libbroken"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unexpected output from dpkg-query"))
        .stdout(predicate::str::contains("Total installed size").not());

    assert!(!json_path.exists());
}
