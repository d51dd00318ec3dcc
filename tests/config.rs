use tasksh::config::{Config, Error, MAX_CONFIG_FILE};
use tasksh::storage::ram::RamFs;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert!(config.echo);
    assert_eq!(config.port, 80);
    assert_eq!(config.upload_path, "/upload");
    assert_eq!(config.firmware_path, "/firmware.bin");
    assert_eq!(config.connect_retries, 20);
}

#[test]
fn test_from_json_overrides_given_keys() {
    let config = Config::from_json(
        r#"{"host":"192.168.1.20","port":8080,"firmware_path":"/bin/app.bin","connect_retries":3}"#,
    )
    .unwrap();
    assert_eq!(config.host, "192.168.1.20");
    assert_eq!(config.port, 8080);
    assert_eq!(config.firmware_path, "/bin/app.bin");
    assert_eq!(config.connect_retries, 3);
    assert_eq!(config.upload_path, "/upload");
    assert!(config.echo);
}

#[test]
fn test_from_json_rejects_garbage() {
    assert_eq!(Config::from_json("{\"port\":"), Err(Error::Malformed));
    assert_eq!(Config::from_json(r#"{"port":"eighty"}"#), Err(Error::Malformed));
}

#[test]
fn test_load_from_store() {
    let mut fs = RamFs::new();
    fs.insert("/shell.json", br#"{"echo":false,"host":"files.local"}"#);

    let config = Config::load(&mut fs, "shell.json").unwrap();
    assert!(!config.echo);
    assert_eq!(config.host, "files.local");
}

#[test]
fn test_load_missing_file() {
    let mut fs = RamFs::new();
    assert_eq!(Config::load(&mut fs, "/shell.json"), Err(Error::Unreadable));
}

#[test]
fn test_load_oversized_file() {
    let mut fs = RamFs::new();
    let padding = " ".repeat(MAX_CONFIG_FILE);
    fs.insert("/shell.json", format!("{{{padding}}}").as_bytes());
    assert_eq!(Config::load(&mut fs, "/shell.json"), Err(Error::TooLarge));
}
