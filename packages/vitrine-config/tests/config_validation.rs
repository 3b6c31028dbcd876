use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use vitrine_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = r#"
[collection]
id = "sample"
metadata_root = "ipfs://bafybeigdyrsample/metadata"
total_count = 10000

[gateways]
primary = "https://gateway.example.org/ipfs/"
thumb_base = "https://thumbs.example.org/sample"

[resolver]
concurrency = 4
timeout_ms = 10000
max_attempts = 3
base_backoff_ms = 500

[browse]
page_size = 30
excluded_trait_types = ["Score"]
"#;

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("vitrine_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> Result<Config, Error> {
	let path = write_temp_config(payload);
	let result = vitrine_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

#[test]
fn loads_sample_config() {
	let cfg = load_payload(SAMPLE_CONFIG_TOML.to_string()).expect("Expected config to load.");

	assert_eq!(cfg.collection.total_count, 10_000);
	assert_eq!(cfg.gateways.primary.as_deref(), Some("https://gateway.example.org/ipfs/"));
	assert_eq!(cfg.resolver.concurrency, 4);
	assert_eq!(cfg.browse.page_size, 30);
	assert_eq!(cfg.browse.excluded_trait_types, vec!["Score".to_string()]);
	assert!(!cfg.bundle.is_configured());
}

#[test]
fn defaults_apply_when_sections_are_omitted() {
	let payload = r#"
[collection]
id = "sample"
metadata_root = "bafybeigdyrsample"
total_count = 100
"#;
	let cfg = load_payload(payload.to_string()).expect("Expected config to load.");

	assert_eq!(cfg.resolver.concurrency, 4);
	assert_eq!(cfg.resolver.max_attempts, 3);
	assert_eq!(cfg.resolver.base_backoff_ms, 500);
	assert_eq!(cfg.browse.page_size, 30);
	assert!(cfg.gateways.primary.is_none());
}

#[test]
fn rejects_zero_total_count() {
	let payload = SAMPLE_CONFIG_TOML.replace("total_count = 10000", "total_count = 0");
	let err = load_payload(payload).expect_err("Expected total_count validation error.");

	assert!(err.to_string().contains("collection.total_count"));
}

#[test]
fn rejects_zero_page_size() {
	let payload = SAMPLE_CONFIG_TOML.replace("page_size = 30", "page_size = 0");
	let err = load_payload(payload).expect_err("Expected page_size validation error.");

	assert!(err.to_string().contains("browse.page_size"));
}

#[test]
fn rejects_zero_concurrency() {
	let payload = SAMPLE_CONFIG_TOML.replace("concurrency = 4", "concurrency = 0");
	let err = load_payload(payload).expect_err("Expected concurrency validation error.");

	assert!(err.to_string().contains("resolver.concurrency"));
}

#[test]
fn rejects_partial_bundle() {
	let payload = format!(
		"{SAMPLE_CONFIG_TOML}\n[bundle]\nrecords_url = \"https://static.example.org/records.json\"\n"
	);
	let err = load_payload(payload).expect_err("Expected bundle validation error.");

	assert!(err.to_string().contains("bundle requires"));
}

#[test]
fn normalizes_blank_optionals() {
	let payload = SAMPLE_CONFIG_TOML.replace(
		"primary = \"https://gateway.example.org/ipfs/\"",
		"primary = \"  \"",
	);
	let cfg = load_payload(payload).expect("Expected config to load.");

	assert!(cfg.gateways.primary.is_none());
}

#[test]
fn rejects_blank_metadata_root() {
	let payload = SAMPLE_CONFIG_TOML
		.replace("metadata_root = \"ipfs://bafybeigdyrsample/metadata\"", "metadata_root = \" \"");
	let err = load_payload(payload).expect_err("Expected metadata_root validation error.");

	assert!(err.to_string().contains("collection.metadata_root"));
}
