//! Runs the demo binary with command-line overrides.

use anyhow::{Result, ensure};
use assert_cmd::Command;
use rstest::rstest;

#[rstest]
fn prints_merged_configuration() -> Result<()> {
    #[expect(deprecated, reason = "cargo_bin is the standard assert_cmd API")]
    let mut cmd = Command::cargo_bin("hello_config")?;
    cmd.env("HELLO_CONFIG_FILE", "definitely-absent.toml")
        .env("RUST_LOG", "off")
        .arg("-serverConfig.port=9000")
        .arg("-dbConfig.poolSize=not-a-number");
    let output = cmd.output()?;
    ensure!(output.status.success(), "demo failed: {output:?}");

    let stdout = String::from_utf8(output.stdout)?;
    let value: layerconf::serde_json::Value = layerconf::serde_json::from_str(&stdout)?;
    ensure!(value.pointer("/serverConfig/port") == Some(&9000.into()), "got {stdout}");
    ensure!(value.pointer("/dbConfig/poolSize") == Some(&4.into()), "got {stdout}");
    ensure!(
        value.pointer("/dbConfig/url") == Some(&"sqlite://hello.db".into()),
        "got {stdout}"
    );
    Ok(())
}
