//! Integration tests for configuration module

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::{ConfigDiscovery, ConfigFiles, ConfigManager, LOCAL_CONFIG, PROJECT_CONFIG};

#[test]
fn test_full_config_workflow() {
    let tmp = TempDir::new().unwrap();
    let checkout = tmp.path().join("checkout");
    let build = checkout.join("build");
    fs::create_dir_all(&build).unwrap();

    fs::write(
        checkout.join(PROJECT_CONFIG),
        r#"
[build]
use_cmake = true

[remote]
host = "buildbox"
sync_root = "/mnt/ssd/work/macosx.sync"
sync_options = ["-avzh"]
exclude = ["DerivedData", ".svn", ".git"]
"#,
    )
    .unwrap();
    fs::write(
        checkout.join(LOCAL_CONFIG),
        r#"
[tools]
cxx = "g++-4.8"

[remote]
user = "dev"
exclude = ["llvm-build/Release+Asserts"]
"#,
    )
    .unwrap();

    let files = ConfigDiscovery::discover_from(&build, None, None);
    let config = ConfigManager::load_files(&files).unwrap();

    assert!(config.build.use_cmake);
    let names = config.tool_names(config.build.use_cmake);
    assert_eq!(names.make, "ninja");
    assert_eq!(names.cxx, "g++-4.8");

    let remote = config.remote.unwrap();
    assert_eq!(remote.user.as_deref(), Some("dev"));
    assert_eq!(remote.host.as_deref(), Some("buildbox"));
    assert_eq!(remote.sync_root, Some(PathBuf::from("/mnt/ssd/work/macosx.sync")));
    assert_eq!(remote.exclude.len(), 4);
}

#[test]
fn test_invalid_config_validation() {
    let tmp = TempDir::new().unwrap();
    let config_file = tmp.path().join("config.toml");
    fs::write(
        &config_file,
        r#"
[tools]
make = ""
"#,
    )
    .unwrap();

    let files = ConfigFiles {
        cli: Some(config_file),
        ..ConfigFiles::default()
    };
    let result = ConfigManager::load_files(&files);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("cannot be empty"));
}

#[test]
fn test_missing_cli_config_is_an_error() {
    let files = ConfigFiles {
        cli: Some(Path::new("/nonexistent/tcwrap.toml").to_path_buf()),
        ..ConfigFiles::default()
    };

    let result = ConfigManager::load_files(&files);

    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Config file not found"));
}

#[test]
fn test_render_round_trips_through_loader() {
    let tmp = TempDir::new().unwrap();
    let config_file = tmp.path().join("config.toml");
    fs::write(
        &config_file,
        r#"
source_root = "/work"

[tools]
make = "gmake"

[remote]
host = "buildbox"
"#,
    )
    .unwrap();

    let files = ConfigFiles {
        cli: Some(config_file.clone()),
        ..ConfigFiles::default()
    };
    let config = ConfigManager::load_files(&files).unwrap();
    let rendered = ConfigManager::render(&config).unwrap();

    assert!(rendered.contains("source_root = \"/work\""));
    assert!(rendered.contains("make = \"gmake\""));
    assert!(rendered.contains("host = \"buildbox\""));

    fs::write(&config_file, &rendered).unwrap();
    assert_eq!(ConfigManager::load_files(&files).unwrap(), config);
}
