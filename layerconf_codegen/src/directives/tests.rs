//! Tests for directive ordering and resolution.

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};

use super::{AssignedValue, resolve};
use crate::aggregate::Aggregate;
use crate::graph::TypeGraph;
use crate::model::{
    DefaultDecl, DefaultSource, FieldDescriptor, HookDecl, HookTarget, TypeDescriptor,
};
use crate::{GenerateError, Origin};

fn field(name: &str, ty: &str, nested: bool) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_owned(),
        ty: ty.to_owned(),
        tag_key: name.to_owned(),
        is_nested: nested,
    }
}

#[fixture]
fn types() -> Vec<TypeDescriptor> {
    vec![
        TypeDescriptor {
            name: String::from("ServerConfig"),
            alias: String::from("serverConfig"),
            fields: vec![field("port", "u16", false), field("tls", "TlsConfig", true)],
            module: Some(String::from("server")),
            origin: Origin::new("server.rs", 2),
        },
        TypeDescriptor {
            name: String::from("TlsConfig"),
            alias: String::from("tlsConfig"),
            fields: vec![field("cert", "String", false)],
            module: Some(String::from("server")),
            origin: Origin::new("server.rs", 8),
        },
    ]
}

fn expression(expr: &str, key: &str, line: usize) -> DefaultDecl {
    DefaultDecl {
        source: DefaultSource::Expression {
            expr: expr.to_owned(),
            key: key.to_owned(),
        },
        origin: Origin::new("defaults.rs", line),
    }
}

fn function(name: &str, returns: &str, line: usize) -> DefaultDecl {
    DefaultDecl {
        source: DefaultSource::Function {
            module: Some(String::from("defaults")),
            name: name.to_owned(),
            returns: returns.to_owned(),
        },
        origin: Origin::new("defaults.rs", line),
    }
}

#[rstest]
fn whole_values_precede_expressions_shallowest_first(types: Vec<TypeDescriptor>) -> Result<()> {
    let graph = TypeGraph::build(&types)?;
    let aggregate = Aggregate::from_graph("ApplicationConfig", &graph)?;
    let decls = [
        expression("8080", "serverConfig.port", 1),
        function("default_tls", "TlsConfig", 3),
        function("default_server", "ServerConfig", 7),
        expression("String::from(\"cert.pem\")", "serverConfig.tls.cert", 11),
    ];
    let directives = resolve(&decls, &[], &aggregate, &graph)?;
    let chains: Vec<String> = directives
        .defaults
        .iter()
        .map(|assignment| assignment.chain.join("."))
        .collect();
    ensure!(
        chains
            == [
                "server_config",
                "server_config.tls",
                "server_config.port",
                "server_config.tls.cert",
            ],
        "got {chains:?}"
    );
    let first = directives
        .defaults
        .first()
        .ok_or_else(|| anyhow!("no defaults resolved"))?;
    ensure!(
        first.value
            == AssignedValue::Call {
                module: Some(String::from("defaults")),
                name: String::from("default_server"),
            }
    );
    Ok(())
}

#[rstest]
#[case::unknown_type(function("default_cache", "CacheConfig", 1))]
#[case::unknown_key(expression("1", "serverConfig.timeout", 1))]
#[case::nested_type_alias(expression("1", "tlsConfig.cert", 1))]
fn unresolvable_defaults_are_rejected(
    types: Vec<TypeDescriptor>,
    #[case] decl: DefaultDecl,
) -> Result<()> {
    let graph = TypeGraph::build(&types)?;
    let aggregate = Aggregate::from_graph("ApplicationConfig", &graph)?;
    let Err(err) = resolve(&[decl], &[], &aggregate, &graph) else {
        return Err(anyhow!("expected an invalid directive"));
    };
    ensure!(
        matches!(err, GenerateError::InvalidDirective { .. }),
        "unexpected error: {err}"
    );
    Ok(())
}

#[rstest]
fn hooks_keep_order_and_report_config_use(types: Vec<TypeDescriptor>) -> Result<()> {
    let graph = TypeGraph::build(&types)?;
    let aggregate = Aggregate::from_graph("ApplicationConfig", &graph)?;
    let quiet = HookDecl {
        target: HookTarget::Function {
            module: None,
            name: String::from("warm_up"),
            takes_config: false,
        },
        origin: Origin::new("mod.rs", 4),
    };
    let directives = resolve(&[], &[quiet.clone()], &aggregate, &graph)?;
    ensure!(!directives.hooks_use_config());

    let closure = HookDecl {
        target: HookTarget::Expression(String::from("|config| drop(config)")),
        origin: Origin::new("mod.rs", 9),
    };
    let both = resolve(&[], &[quiet, closure], &aggregate, &graph)?;
    ensure!(both.hooks_use_config());
    ensure!(matches!(
        both.hooks.first().map(|hook| &hook.target),
        Some(HookTarget::Function { .. })
    ));
    Ok(())
}
