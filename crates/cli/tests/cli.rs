use assert_cmd::Command;

const DB_VARS: [&str; 6] = [
    "DB_HOST",
    "DB_PORT",
    "DB_USER",
    "DB_NAME",
    "DB_PASSWORD",
    "DB_SSLMODE",
];

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("bookshelf-cli").unwrap();
    for var in DB_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn missing_env_file_fails() {
    cli()
        .args(["config", "--env-file", "/nonexistent/bookshelf/.env"])
        .assert()
        .failure();
}

#[test]
fn config_reads_env_file_and_masks_password() {
    let path = std::env::temp_dir().join(format!("bookshelf-cli-{}.env", std::process::id()));
    std::fs::write(
        &path,
        "DB_HOST=db.example\nDB_PORT=5433\nDB_USER=books\nDB_NAME=library\nDB_PASSWORD=topsecret\nDB_SSLMODE=disable\n",
    )
    .unwrap();

    let output = cli()
        .args(["config", "--env-file"])
        .arg(&path)
        .output()
        .unwrap();
    std::fs::remove_file(&path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("bind: 0.0.0.0:3000"));
    assert!(stdout.contains(
        "host=db.example port=5433 user=books dbname=library password=***** sslmode=disable"
    ));
    assert!(!stdout.contains("topsecret"));
}
