//! Tests for skeleton validation and rendering.

use anyhow::{Result, ensure};
use rstest::rstest;

use super::{DEFAULT_TEMPLATE, Template, check_parses};
use crate::synth::Fragments;
use crate::{GenerateError, Slot, TemplateError};

const MINIMAL: &str = "\
// @generate:merge
impl Root {
    // @generate:defaults
    // @generate:auto_execute
}
";

fn fragments() -> Fragments {
    Fragments {
        merge: "pub struct Root ;\n\npub type RootConfig = Root ;".to_owned(),
        defaults: "fn apply_defaults (& mut self) { }".to_owned(),
        auto_execute: "fn auto_execute () { }".to_owned(),
    }
}

#[rstest]
fn built_in_skeleton_is_valid() -> Result<()> {
    let template = Template::parse(DEFAULT_TEMPLATE)?;
    for slot in Slot::ALL {
        ensure!(template.line_of(slot).is_some(), "{slot} not located");
    }
    Ok(())
}

#[rstest]
fn render_places_fragments_after_their_markers() -> Result<()> {
    let rendered = Template::parse(MINIMAL)?.render(&fragments());
    let expected = "\
// @generate:merge
pub struct Root ;

pub type RootConfig = Root ;
impl Root {
    // @generate:defaults
    fn apply_defaults (& mut self) { }
    // @generate:auto_execute
    fn auto_execute () { }
}
";
    ensure!(rendered == expected, "got:\n{rendered}");
    Ok(())
}

#[rstest]
#[case::merge(Slot::Merge)]
#[case::defaults(Slot::Defaults)]
#[case::auto_execute(Slot::AutoExecute)]
fn missing_markers_are_named(#[case] slot: Slot) -> Result<()> {
    let text: String = MINIMAL
        .lines()
        .filter(|line| line.trim() != slot.marker())
        .map(|line| format!("{line}\n"))
        .collect();
    ensure!(Template::parse(&text) == Err(TemplateError::Missing { slot }));
    Ok(())
}

#[rstest]
fn repeated_markers_report_both_lines() -> Result<()> {
    let text = format!("{MINIMAL}// @generate:defaults\n");
    ensure!(
        Template::parse(&text)
            == Err(TemplateError::Duplicate {
                slot: Slot::Defaults,
                first: 3,
                second: 6,
            })
    );
    Ok(())
}

#[rstest]
#[case::two_markers("// @generate:defaults // @generate:auto_execute")]
#[case::code_before("fn x() {} // @generate:defaults")]
#[case::text_after("// @generate:defaults here")]
fn markers_must_stand_alone(#[case] line: &str) -> Result<()> {
    let text = format!("// @generate:merge\n{line}\n// @generate:auto_execute\n");
    ensure!(
        Template::parse(&text)
            == Err(TemplateError::Conflict {
                line: 2,
                text: line.to_owned(),
            })
    );
    Ok(())
}

#[rstest]
fn unknown_slot_names_are_rejected() -> Result<()> {
    let text = format!("{MINIMAL}    // @generate:validate\n");
    ensure!(
        Template::parse(&text)
            == Err(TemplateError::Unknown {
                line: 6,
                name: "validate".to_owned(),
            })
    );
    Ok(())
}

#[rstest]
fn unparsable_output_is_reported() -> Result<()> {
    ensure!(check_parses("pub struct Unit;").is_ok());
    let err = check_parses("pub struct {").err();
    ensure!(
        matches!(
            err,
            Some(GenerateError::Template(TemplateError::Unparsable { .. }))
        ),
        "got {err:?}"
    );
    Ok(())
}
