//! Tree builder linking flat argument records into a hierarchy.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::{ArgumentTree, NodeData};
use crate::domain::entities::ArgumentRecord;
use crate::domain::error::HierarchyError;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, HierarchyError>;

/// Recoverable linkage problems.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildWarning {
    #[error("line {line}: duplicate id {id}, earlier argument replaced")]
    DuplicateId { id: String, line: usize },

    #[error("line {line}: argument {id} references unknown parent {parent_id}")]
    UnresolvedParent {
        id: String,
        parent_id: String,
        line: usize,
    },

    #[error("argument {id} is not reachable from the root")]
    Unreachable { id: String },
}

/// A built tree plus everything that did not link cleanly.
#[derive(Debug)]
pub struct BuildOutput {
    pub tree: ArgumentTree,
    pub warnings: Vec<BuildWarning>,
}

/// Constructs argument trees from parsed records.
///
/// The first record is always the root, whatever its own parent column says.
/// By default duplicate ids are resolved last-write-wins and unknown parents
/// leave the argument detached; `strict` turns both into errors.
#[derive(Debug, Default, Clone)]
pub struct HierarchyBuilder {
    strict: bool,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(strict: bool) -> Self {
        Self { strict }
    }

    #[instrument(level = "debug", skip(self, records), fields(records = records.len(), strict = self.strict))]
    pub fn build(&self, records: &[ArgumentRecord]) -> TreeResult<BuildOutput> {
        let first = records.first().ok_or(HierarchyError::RootNotFound)?;
        let mut tree = ArgumentTree::new();
        let mut warnings = Vec::new();

        // Pass 1: one node per record, later ids replace earlier ones
        let mut indices: Vec<Index> = Vec::with_capacity(records.len());
        for record in records {
            let (idx, previous) = tree.insert_node(NodeData::from(record));
            if let Some(previous) = previous {
                if self.strict {
                    return Err(HierarchyError::DuplicateId {
                        id: record.id.clone(),
                        line: record.line,
                    });
                }
                tree.discard_node(previous);
                let warning = BuildWarning::DuplicateId {
                    id: record.id.clone(),
                    line: record.line,
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
            indices.push(idx);
        }

        let root = tree.find(&first.id).ok_or(HierarchyError::RootNotFound)?;
        tree.set_root(root);

        // Pass 2: link children to parents in input order
        let live: Vec<(&ArgumentRecord, Index)> = records
            .iter()
            .zip(indices)
            .filter(|(record, idx)| tree.find(&record.id) == Some(*idx))
            .collect();

        for &(record, idx) in &live {
            if idx == root {
                continue;
            }
            let Some(parent_id) = record.parent_id.as_deref() else {
                continue;
            };
            match tree.find(parent_id) {
                Some(parent_idx) => {
                    tree.attach(parent_idx, idx);
                }
                None if self.strict => {
                    return Err(HierarchyError::UnresolvedParent {
                        id: record.id.clone(),
                        parent_id: parent_id.to_string(),
                    });
                }
                None => {
                    let warning = BuildWarning::UnresolvedParent {
                        id: record.id.clone(),
                        parent_id: parent_id.to_string(),
                        line: record.line,
                    };
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        let reachable: HashSet<Index> = tree.iter().map(|(idx, _)| idx).collect();
        for &(record, idx) in &live {
            if !reachable.contains(&idx) {
                debug!("unreachable: {}", record.id);
                warnings.push(BuildWarning::Unreachable {
                    id: record.id.clone(),
                });
            }
        }

        debug!(
            "built tree: {} arguments, {} reachable",
            tree.len(),
            reachable.len()
        );
        Ok(BuildOutput { tree, warnings })
    }
}
