use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn test_cli_writes_step_views() {
    let payload = std::fs::canonicalize("../../tests/fixtures/payload-ok.json").unwrap();

    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let views_path = std::env::temp_dir().join(format!("tracewalk-views-{}.json", nonce));
    let _ = std::fs::remove_file(&views_path);

    let output = Command::new(env!("CARGO_BIN_EXE_tracewalk"))
        .args([
            "--payload",
            payload.to_str().unwrap(),
            "--dump-views",
            views_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute tracewalk");

    assert!(output.status.success());
    assert!(views_path.exists());

    let content = std::fs::read_to_string(&views_path).unwrap();
    let views: serde_json::Value = serde_json::from_str(&content).unwrap();
    let views = views.as_array().unwrap();
    assert_eq!(views.len(), 4);

    // First step is the prologue capture; its active line is the sentinel.
    assert_eq!(views[0]["label"], "main params");
    assert_eq!(views[0]["active_line"], -1);
    assert_eq!(views[0]["editor_line"], serde_json::Value::Null);

    // Last step resolves to the printf block on line 11.
    assert_eq!(views[3]["active_line"], 11);
    assert_eq!(views[3]["editor_line"], 11);
    assert_eq!(views[3]["updated"][0], "x");

    let _ = std::fs::remove_file(&views_path);
}
