use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum SymbolKind {
    Function,
    Object,
    Other,
}

impl SymbolKind {
    /// Maps a `readelf` symbol type column onto the three kinds the treemap knows.
    pub fn from_symbol_type(symbol_type: &str) -> Self {
        match symbol_type {
            "FUNC" => Self::Function,
            "OBJECT" => Self::Object,
            _ => Self::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Function => "FUNC",
            Self::Object => "OBJECT",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub name: String,
    pub line: String,
    pub size: u64,
    pub kind: SymbolKind,
    pub binding: String,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
    };
    pub const WHITE: Rgb = Rgb {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
    };

    pub fn to_hex(self) -> String {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }
}

/// One node of the size hierarchy: a symbol leaf or a path segment.
#[derive(Debug, Clone)]
pub enum TreeNode {
    Symbol(SymbolLeaf),
    Path(PathGroup),
}

#[derive(Debug, Clone)]
pub struct SymbolLeaf {
    pub record: SymbolRecord,
    pub color: Rgb,
}

/// Internal node for one path segment.
///
/// `is_file` is set when symbols are attributed to this exact path; such a node
/// may still have subdirectory children.
#[derive(Debug, Clone)]
pub struct PathGroup {
    name: String,
    children: Vec<TreeNode>,
    is_file: bool,
    color: Rgb,
    size: OnceLock<u64>,
}

impl PathGroup {
    pub fn new(name: String, children: Vec<TreeNode>, is_file: bool, color: Rgb) -> Self {
        Self {
            name,
            children,
            is_file,
            color,
            size: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn size(&self) -> u64 {
        *self
            .size
            .get_or_init(|| self.children.iter().map(TreeNode::size).sum())
    }
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Symbol(leaf) => &leaf.record.name,
            Self::Path(group) => group.name(),
        }
    }

    /// Bytes covered by this subtree. Memoized for internal nodes on first read.
    pub fn size(&self) -> u64 {
        match self {
            Self::Symbol(leaf) => leaf.record.size,
            Self::Path(group) => group.size(),
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Self::Symbol(leaf) => leaf.color,
            Self::Path(group) => group.color(),
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            Self::Symbol(_) => &[],
            Self::Path(group) => group.children(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::Path(group) if group.is_file())
    }

    pub fn symbol(&self) -> Option<&SymbolRecord> {
        match self {
            Self::Symbol(leaf) => Some(&leaf.record),
            Self::Path(_) => None,
        }
    }

    pub fn find_child(&self, name: &str) -> Option<&TreeNode> {
        self.children().iter().find(|child| child.name() == name)
    }

    /// Follows `segments` from this node, one child name per step.
    pub fn descend<'a>(&'a self, segments: &[&str]) -> Option<&'a TreeNode> {
        let mut current = self;
        for segment in segments {
            current = current.find_child(segment)?;
        }
        Some(current)
    }

    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(TreeNode::node_count).sum::<usize>()
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Symbol(_) => 1,
            Self::Path(group) => group.children().iter().map(TreeNode::leaf_count).sum(),
        }
    }
}
