//! Containment graph over configuration types.
//!
//! An edge runs from a type to every configuration type it nests. Types that
//! no other type nests are the roots composing the aggregate.

use std::collections::{BTreeMap, BTreeSet};

use heck::ToSnakeCase;

use crate::model::TypeDescriptor;
use crate::{GenerateError, GenerateResult};

/// Validated containment graph.
#[derive(Debug)]
pub struct TypeGraph<'a> {
    types: Vec<&'a TypeDescriptor>,
    index: BTreeMap<&'a str, usize>,
    inbound: BTreeMap<&'a str, BTreeSet<&'a str>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    Visiting,
    Done,
}

impl<'a> TypeGraph<'a> {
    /// Build the graph and reject duplicate names, clashing root aliases and
    /// containment cycles.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::DuplicateType`],
    /// [`GenerateError::DuplicateAlias`] or [`GenerateError::GraphCycle`].
    pub fn build(descriptors: &'a [TypeDescriptor]) -> GenerateResult<Self> {
        let mut index = BTreeMap::new();
        for (position, descriptor) in descriptors.iter().enumerate() {
            if let Some(&previous) = index.get(descriptor.name.as_str()) {
                let first = descriptors
                    .get(previous)
                    .map(|earlier: &TypeDescriptor| earlier.origin.clone())
                    .unwrap_or_else(|| descriptor.origin.clone());
                return Err(GenerateError::DuplicateType {
                    name: descriptor.name.clone(),
                    first,
                    second: descriptor.origin.clone(),
                });
            }
            index.insert(descriptor.name.as_str(), position);
        }

        let mut inbound: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for parent in descriptors {
            for field in parent.nested_fields() {
                inbound
                    .entry(field.ty.as_str())
                    .or_default()
                    .insert(parent.name.as_str());
            }
        }

        let graph = Self {
            types: descriptors.iter().collect(),
            index,
            inbound,
        };
        graph.reject_cycles()?;
        graph.reject_alias_clashes()?;
        Ok(graph)
    }

    /// Every descriptor, in discovery order.
    #[must_use]
    pub fn types(&self) -> &[&'a TypeDescriptor] {
        &self.types
    }

    /// Look a descriptor up by type name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a TypeDescriptor> {
        self.index
            .get(name)
            .and_then(|&position| self.types.get(position))
            .copied()
    }

    /// Names of the types that nest `name`.
    pub fn parents(&self, name: &str) -> impl Iterator<Item = &'a str> + '_ {
        self.inbound
            .get(name)
            .into_iter()
            .flat_map(|parents| parents.iter().copied())
    }

    /// Types with no inbound edge, in discovery order.
    #[must_use]
    pub fn roots(&self) -> Vec<&'a TypeDescriptor> {
        self.types
            .iter()
            .copied()
            .filter(|descriptor| !self.inbound.contains_key(descriptor.name.as_str()))
            .collect()
    }

    fn children(&self, name: &str) -> impl Iterator<Item = &'a str> + '_ {
        self.get(name)
            .into_iter()
            .flat_map(|descriptor| descriptor.nested_fields().map(|field| field.ty.as_str()))
    }

    fn reject_cycles(&self) -> GenerateResult<()> {
        let mut state: BTreeMap<&'a str, Visit> = self
            .types
            .iter()
            .map(|descriptor| (descriptor.name.as_str(), Visit::Pending))
            .collect();
        let mut stack = Vec::new();
        for descriptor in self.types.iter().copied() {
            self.visit(descriptor.name.as_str(), &mut state, &mut stack)?;
        }
        Ok(())
    }

    fn visit(
        &self,
        name: &'a str,
        state: &mut BTreeMap<&'a str, Visit>,
        stack: &mut Vec<&'a str>,
    ) -> GenerateResult<()> {
        match state.get(name).copied().unwrap_or(Visit::Done) {
            Visit::Done => return Ok(()),
            Visit::Visiting => {
                let start = stack.iter().position(|entry| *entry == name).unwrap_or(0);
                let mut cycle: Vec<&str> = stack.iter().skip(start).copied().collect();
                cycle.push(name);
                return Err(GenerateError::GraphCycle {
                    cycle: cycle.join(" -> "),
                });
            }
            Visit::Pending => {}
        }
        state.insert(name, Visit::Visiting);
        stack.push(name);
        for child in self.children(name) {
            self.visit(child, state, stack)?;
        }
        stack.pop();
        state.insert(name, Visit::Done);
        Ok(())
    }

    /// Root aliases become both aggregate keys and field names, so neither
    /// may repeat.
    fn reject_alias_clashes(&self) -> GenerateResult<()> {
        let mut keys: BTreeMap<String, &str> = BTreeMap::new();
        let mut fields: BTreeMap<String, &str> = BTreeMap::new();
        for root in self.roots() {
            let name = root.name.as_str();
            if let Some(first) = keys.insert(root.alias.clone(), name) {
                return Err(GenerateError::DuplicateAlias {
                    alias: root.alias.clone(),
                    first: first.to_owned(),
                    second: root.name.clone(),
                });
            }
            if let Some(first) = fields.insert(root.alias.to_snake_case(), name) {
                return Err(GenerateError::DuplicateAlias {
                    alias: root.alias.clone(),
                    first: first.to_owned(),
                    second: root.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
