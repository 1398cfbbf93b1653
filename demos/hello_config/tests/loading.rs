//! The generated loader applies defaults, the file and arguments in order.

use anyhow::{Result, ensure};
use hello_config::load_with;
use layerconf::SourceLayer;
use rstest::rstest;
use test_helpers::jail::with_files;

#[rstest]
fn arguments_override_declared_defaults() -> Result<()> {
    let loaded = load_with("absent.toml", ["-serverConfig.port=9000"])?;
    let settings = loaded.settings();
    ensure!(settings.server_config.port == 9000);
    ensure!(settings.server_config.host == "127.0.0.1");
    ensure!(settings.db_config.url == "sqlite://hello.db");
    ensure!(loaded.get_string("dbConfig.poolSize") == Some("4"));
    ensure!(loaded.report().issues().len() == 1, "missing file should be reported");
    Ok(())
}

#[rstest]
fn file_values_sit_between_defaults_and_arguments() -> Result<()> {
    let file = "\
[serverConfig]
host = \"0.0.0.0\"
port = 7000

[serverConfig.tls]
enabled = true
cert = \"/etc/hello/cert.pem\"

[dbConfig]
url = \"\"
";
    with_files(&[("hello_config.toml", file)], |_| {
        let loaded = load_with("hello_config.toml", ["--serverConfig.port=7100"])?;
        let server = &loaded.settings().server_config;
        ensure!(server.host == "0.0.0.0");
        ensure!(server.port == 7100);
        ensure!(server.tls.enabled);
        ensure!(server.tls.certificate.as_deref() == Some("/etc/hello/cert.pem"));
        ensure!(
            loaded.settings().db_config.url == "sqlite://hello.db",
            "a blank file value must not erase the default"
        );
        ensure!(loaded.report().applied().contains(&SourceLayer::File));
        Ok(())
    })
}

#[rstest]
fn whole_value_defaults_come_from_the_declared_function() -> Result<()> {
    let loaded = load_with("absent.toml", Vec::<String>::new())?;
    ensure!(loaded.settings().server_config == hello_config::config::server::default_server());
    let disabled = layerconf::serde_json::Value::Bool(false);
    ensure!(loaded.get_config("serverConfig.tls.enabled") == Some(&disabled));
    Ok(())
}
