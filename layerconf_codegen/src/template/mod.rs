//! Skeleton validation and fragment splicing.
//!
//! A skeleton is plain Rust text holding one line per slot marker. Slots are
//! located once by [`Template::parse`]; rendering never searches the text
//! again.

use crate::synth::Fragments;
use crate::{GenerateResult, Slot, TemplateError};

/// The skeleton used when no custom template is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("skeleton.rs.txt");

const MARKER_PREFIX: &str = "@generate:";

/// A validated skeleton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    lines: Vec<String>,
    slots: Vec<SlotPosition>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct SlotPosition {
    slot: Slot,
    index: usize,
    indent: String,
}

impl Template {
    /// Validate `text` and record the position of every slot marker.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] when a marker is missing or repeated,
    /// shares its line with other text, or names an unknown slot.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let lines: Vec<String> = text.lines().map(str::to_owned).collect();
        let mut slots: Vec<SlotPosition> = Vec::with_capacity(Slot::ALL.len());
        for (index, line) in lines.iter().enumerate() {
            let Some(slot) = marker_on(line, index + 1)? else {
                continue;
            };
            if let Some(first) = slots.iter().find(|position| position.slot == slot) {
                return Err(TemplateError::Duplicate {
                    slot,
                    first: first.index + 1,
                    second: index + 1,
                });
            }
            let indent_len = line.len() - line.trim_start().len();
            slots.push(SlotPosition {
                slot,
                index,
                indent: line.chars().take(indent_len).collect(),
            });
        }
        if let Some(slot) = Slot::ALL
            .into_iter()
            .find(|slot| slots.iter().all(|position| position.slot != *slot))
        {
            return Err(TemplateError::Missing { slot });
        }
        Ok(Self { lines, slots })
    }

    /// Line number (one-based) of `slot`'s marker.
    #[must_use]
    pub fn line_of(&self, slot: Slot) -> Option<usize> {
        self.slots
            .iter()
            .find(|position| position.slot == slot)
            .map(|position| position.index + 1)
    }

    /// Splice `fragments` into the skeleton.
    ///
    /// Each fragment follows its marker line, indented like the marker. The
    /// markers stay in place so an artifact shows where each part came from.
    #[must_use]
    pub fn render(&self, fragments: &Fragments) -> String {
        let mut out = String::new();
        for (index, line) in self.lines.iter().enumerate() {
            out.push_str(line);
            out.push('\n');
            let Some(position) = self.slots.iter().find(|position| position.index == index) else {
                continue;
            };
            for fragment_line in fragments.get(position.slot).lines() {
                if !fragment_line.trim().is_empty() {
                    out.push_str(&position.indent);
                    out.push_str(fragment_line);
                }
                out.push('\n');
            }
        }
        out
    }
}

/// Check the assembled text parses as a Rust source file.
///
/// # Errors
///
/// Returns [`TemplateError::Unparsable`] with the parser's diagnostic.
pub(crate) fn check_parses(text: &str) -> GenerateResult<()> {
    syn::parse_file(text).map(drop).map_err(|err| {
        TemplateError::Unparsable {
            message: err.to_string(),
        }
        .into()
    })
}

/// Classify one skeleton line.
fn marker_on(line: &str, number: usize) -> Result<Option<Slot>, TemplateError> {
    let occurrences = line.matches(MARKER_PREFIX).count();
    if occurrences == 0 {
        return Ok(None);
    }
    let conflict = || TemplateError::Conflict {
        line: number,
        text: line.trim().to_owned(),
    };
    if occurrences > 1 {
        return Err(conflict());
    }
    let Some(rest) = line
        .trim()
        .strip_prefix("//")
        .map(str::trim_start)
        .and_then(|comment| comment.strip_prefix(MARKER_PREFIX))
    else {
        return Err(conflict());
    };
    let name = rest.trim_end();
    if name.contains(char::is_whitespace) {
        return Err(conflict());
    }
    Slot::ALL
        .into_iter()
        .find(|slot| slot.name() == name)
        .map(Some)
        .ok_or_else(|| TemplateError::Unknown {
            line: number,
            name: name.to_owned(),
        })
}

#[cfg(test)]
mod tests;
