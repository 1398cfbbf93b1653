//! Tests for root selection, cycle detection and uniqueness checks.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;

use super::TypeGraph;
use crate::model::{FieldDescriptor, TypeDescriptor, default_alias};
use crate::{GenerateError, Origin};

fn descriptor(name: &str, nested: &[&str]) -> TypeDescriptor {
    TypeDescriptor {
        name: name.to_owned(),
        alias: default_alias(name),
        fields: nested
            .iter()
            .map(|child| FieldDescriptor {
                name: child.to_lowercase(),
                ty: (*child).to_owned(),
                tag_key: child.to_lowercase(),
                is_nested: true,
            })
            .collect(),
        module: None,
        origin: Origin::new("mod.rs", 1),
    }
}

fn names(types: &[&TypeDescriptor]) -> Vec<String> {
    types.iter().map(|ty| ty.name.clone()).collect()
}

#[rstest]
fn roots_are_exactly_the_unnested_types() -> Result<()> {
    let types = vec![
        descriptor("App", &["Db", "Cache"]),
        descriptor("Db", &["Pool"]),
        descriptor("Pool", &[]),
        descriptor("Logging", &[]),
        descriptor("Cache", &[]),
    ];
    let graph = TypeGraph::build(&types)?;
    ensure!(names(&graph.roots()) == ["App", "Logging"], "got {:?}", names(&graph.roots()));
    let parents: Vec<_> = graph.parents("Pool").collect();
    ensure!(parents == ["Db"], "got {parents:?}");
    ensure!(graph.parents("App").next().is_none());
    Ok(())
}

#[rstest]
fn shared_child_has_two_parents_and_is_not_a_root() -> Result<()> {
    let types = vec![
        descriptor("A", &["Shared"]),
        descriptor("B", &["Shared"]),
        descriptor("Shared", &[]),
    ];
    let graph = TypeGraph::build(&types)?;
    ensure!(names(&graph.roots()) == ["A", "B"]);
    ensure!(graph.parents("Shared").count() == 2);
    Ok(())
}

#[rstest]
#[case::mutual(vec![descriptor("A", &["B"]), descriptor("B", &["A"])], "A -> B -> A")]
#[case::self_nesting(vec![descriptor("Node", &["Node"])], "Node -> Node")]
#[case::deep(
    vec![
        descriptor("Top", &["A"]),
        descriptor("A", &["B"]),
        descriptor("B", &["C"]),
        descriptor("C", &["A"]),
    ],
    "A -> B -> C -> A"
)]
fn cycles_are_rejected(#[case] types: Vec<TypeDescriptor>, #[case] expected: &str) -> Result<()> {
    let Err(err) = TypeGraph::build(&types) else {
        return Err(anyhow!("expected a cycle"));
    };
    let GenerateError::GraphCycle { cycle } = err else {
        return Err(anyhow!("unexpected error: {err}"));
    };
    ensure!(cycle == expected, "got {cycle}");
    Ok(())
}

#[rstest]
fn duplicate_type_names_are_rejected() -> Result<()> {
    let mut repeat = descriptor("Db", &[]);
    repeat.origin = Origin::new("other.rs", 9);
    let types = vec![descriptor("Db", &[]), repeat];
    let Err(GenerateError::DuplicateType { name, first, second }) = TypeGraph::build(&types) else {
        return Err(anyhow!("expected a duplicate type error"));
    };
    ensure!(name == "Db");
    ensure!(first.file == "mod.rs" && second.file == "other.rs");
    Ok(())
}

#[rstest]
#[case::same_alias("db", "db")]
#[case::same_field("dbConfig", "db_config")]
fn clashing_root_aliases_are_rejected(#[case] left: &str, #[case] right: &str) -> Result<()> {
    let mut primary = descriptor("Primary", &[]);
    primary.alias = left.to_owned();
    let mut replica = descriptor("Replica", &[]);
    replica.alias = right.to_owned();
    let types = vec![primary, replica];
    ensure!(
        matches!(
            TypeGraph::build(&types),
            Err(GenerateError::DuplicateAlias { .. })
        ),
        "aliases {left} and {right} should clash"
    );
    Ok(())
}

#[rstest]
fn nested_types_may_share_aliases_with_roots() -> Result<()> {
    let mut child = descriptor("Inner", &[]);
    child.alias = String::from("outer");
    let types = vec![descriptor("Outer", &["Inner"]), child];
    ensure!(TypeGraph::build(&types).is_ok());
    Ok(())
}
