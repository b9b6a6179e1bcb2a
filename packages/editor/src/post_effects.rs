//! # Post-Effect System
//!
//! Mutations trigger cascading effects to keep the document consistent.
//!
//! ## Design
//!
//! After a mutation produces a new document, each registered effect compares
//! the before and after states and may ask for secondary mutations. These
//! are applied in the same commit as the primary mutation, so observers never
//! see the intermediate state.
//!
//! Post-effects are:
//! - **Deterministic**: same input documents, same secondary mutations
//! - **Minimal**: only touch what the primary mutation broke

use crate::mutations::{Mutation, Target};
use ednotes_blocks::{Block, Document};

/// Post-effect that can be triggered by a mutation
pub trait PostEffect: std::fmt::Debug {
    /// Analyze the mutation and generate secondary mutations if needed
    fn analyze(&self, mutation: &Mutation, before: &Document, after: &Document) -> Vec<Mutation>;
}

/// Repoint a `tabs` block's `defaultValue` at its first tab when a delete
/// removes the tab it named. Cleared once no tabs remain. Other blocks, and
/// values set by the mutation itself, are left alone.
#[derive(Debug)]
pub struct RetargetDefaultTab;

impl PostEffect for RetargetDefaultTab {
    fn analyze(&self, mutation: &Mutation, before: &Document, after: &Document) -> Vec<Mutation> {
        let path = match mutation {
            Mutation::Delete {
                target: Target::Path(path),
            } if path.is_tab() => path,
            _ => return vec![],
        };
        let Some((owner, _)) = path.split_last() else {
            return vec![];
        };

        let named = match before.get(&owner) {
            Some(Block::Tabs {
                default_value: Some(value),
                ..
            }) => value,
            _ => return vec![],
        };
        if before.get_tab(path).map(|tab| &tab.value) != Some(named) {
            return vec![];
        }

        match after.get(&owner) {
            Some(Block::Tabs { tabs, .. }) if !tabs.iter().any(|tab| &tab.value == named) => {
                vec![Mutation::Replace {
                    target: Target::Path(owner),
                    block: Block::Tabs {
                        default_value: tabs.first().map(|tab| tab.value.clone()),
                        tabs: tabs.clone(),
                    },
                }]
            }
            _ => vec![],
        }
    }
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(RetargetDefaultTab)],
        }
    }

    /// Engine with no effects registered
    pub fn empty() -> Self {
        Self { effects: vec![] }
    }

    pub fn register(&mut self, effect: impl PostEffect + 'static) {
        self.effects.push(Box::new(effect));
    }

    /// Analyze a mutation and generate all secondary mutations
    pub fn analyze(&self, mutation: &Mutation, before: &Document, after: &Document) -> Vec<Mutation> {
        let mut secondary_mutations = Vec::new();

        for effect in &self.effects {
            let mut effect_mutations = effect.analyze(mutation, before, after);
            secondary_mutations.append(&mut effect_mutations);
        }

        secondary_mutations
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}
