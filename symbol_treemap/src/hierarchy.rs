use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::error::TreemapError;
use crate::model::{PathGroup, Rgb, SymbolLeaf, SymbolRecord, TreeNode};

/// Normalized source path (relative, `/`-separated) to the symbols attributed to it.
/// The empty key holds symbols that belong to the enclosing node itself.
pub type PathEntries = BTreeMap<String, Vec<SymbolRecord>>;

pub const ROOT_NAME: &str = "root";

/// Fill colors for tree nodes, drawn from an explicit generator so a seed reproduces them.
#[derive(Debug, Clone)]
pub struct ColorSource {
    rng: StdRng,
}

impl ColorSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn next_color(&mut self) -> Rgb {
        Rgb {
            red: self.rng.gen_range(0.0..1.0),
            green: self.rng.gen_range(0.0..1.0),
            blue: self.rng.gen_range(0.0..1.0),
        }
    }
}

pub struct HierarchyBuilder {
    colors: ColorSource,
}

impl HierarchyBuilder {
    pub fn new(colors: ColorSource) -> Self {
        Self { colors }
    }

    /// Groups `entries` by leading path segment into a tree rooted at `root_name`.
    ///
    /// Every `(path, record)` pair becomes exactly one leaf. Children of a node are
    /// its direct symbols (input order) followed by its subdirectories (sorted by name).
    pub fn build(
        &mut self,
        root_name: &str,
        entries: PathEntries,
    ) -> Result<TreeNode, TreemapError> {
        let tree = self.build_group(root_name.to_string(), "", entries)?;
        debug!(
            nodes = tree.node_count(),
            leaves = tree.leaf_count(),
            bytes = tree.size(),
            "built symbol hierarchy"
        );
        Ok(tree)
    }

    fn build_group(
        &mut self,
        name: String,
        prefix: &str,
        entries: PathEntries,
    ) -> Result<TreeNode, TreemapError> {
        trace!(segment = %name, "path node");
        let color = self.colors.next_color();

        let mut children = Vec::new();
        let mut is_file = false;
        let mut subdirectories: BTreeMap<String, PathEntries> = BTreeMap::new();

        for (relative_path, records) in entries {
            if relative_path.is_empty() {
                is_file = true;
                children.extend(records.into_iter().map(|record| self.leaf(record)));
                continue;
            }

            let (head, rest) = split_first_segment(&relative_path).map_err(|reason| {
                TreemapError::malformed(&join_path(prefix, &relative_path), reason)
            })?;
            subdirectories
                .entry(head.to_string())
                .or_default()
                .entry(rest.to_string())
                .or_default()
                .extend(records);
        }

        for (head, sub_entries) in subdirectories {
            let child_prefix = join_path(prefix, &head);
            children.push(self.build_group(head, &child_prefix, sub_entries)?);
        }

        Ok(TreeNode::Path(PathGroup::new(name, children, is_file, color)))
    }

    fn leaf(&mut self, record: SymbolRecord) -> TreeNode {
        trace!(symbol = %record.name, kind = %record.kind, size = record.size, "symbol leaf");
        TreeNode::Symbol(SymbolLeaf {
            color: self.colors.next_color(),
            record,
        })
    }
}

fn split_first_segment(relative_path: &str) -> Result<(&str, &str), &'static str> {
    let (head, rest) = match relative_path.split_once('/') {
        None => (relative_path, ""),
        Some((_, "")) => return Err("trailing path separator"),
        Some(split) => split,
    };
    if head.is_empty() {
        return Err("empty path segment");
    }
    if head == "." {
        return Err("unresolved '.' segment");
    }
    Ok((head, rest))
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}/{segment}")
    }
}
