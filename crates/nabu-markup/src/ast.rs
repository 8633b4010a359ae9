use std::fmt;

// ── ElementKind ───────────────────────────────────────────────────────────

/// The closed set of element kinds the compiler knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Nested render surface (`<Canvas>`).
    Surface,
    Panel,
    Text,
    Button,
    Image,
    /// Scrollable container; children go into its inner content node.
    ScrollArea,
    ProgressBar,
    ToggleGroup,
    Toggle,
    InputField,
    Dropdown,
    HorizontalLayout,
    VerticalLayout,
    GridLayout,
}

impl ElementKind {
    pub const ALL: [ElementKind; 14] = [
        ElementKind::Surface,
        ElementKind::Panel,
        ElementKind::Text,
        ElementKind::Button,
        ElementKind::Image,
        ElementKind::ScrollArea,
        ElementKind::ProgressBar,
        ElementKind::ToggleGroup,
        ElementKind::Toggle,
        ElementKind::InputField,
        ElementKind::Dropdown,
        ElementKind::HorizontalLayout,
        ElementKind::VerticalLayout,
        ElementKind::GridLayout,
    ];

    /// Resolve a tag name, ignoring ASCII case. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        const TAGS: &[(&str, ElementKind)] = &[
            ("canvas",           ElementKind::Surface),
            ("surface",          ElementKind::Surface),
            ("panel",            ElementKind::Panel),
            ("text",             ElementKind::Text),
            ("button",           ElementKind::Button),
            ("image",            ElementKind::Image),
            ("scrollview",       ElementKind::ScrollArea),
            ("scrollarea",       ElementKind::ScrollArea),
            ("progressbar",      ElementKind::ProgressBar),
            ("togglegroup",      ElementKind::ToggleGroup),
            ("toggle",           ElementKind::Toggle),
            ("inputfield",       ElementKind::InputField),
            ("dropdown",         ElementKind::Dropdown),
            ("horizontallayout", ElementKind::HorizontalLayout),
            ("verticallayout",   ElementKind::VerticalLayout),
            ("gridlayout",       ElementKind::GridLayout),
        ];
        TAGS.iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(tag))
            .map(|(_, kind)| *kind)
    }

    /// Dense index in `0..ALL.len()`, used for per-kind tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Surface          => "Surface",
            ElementKind::Panel            => "Panel",
            ElementKind::Text             => "Text",
            ElementKind::Button           => "Button",
            ElementKind::Image            => "Image",
            ElementKind::ScrollArea       => "ScrollArea",
            ElementKind::ProgressBar      => "ProgressBar",
            ElementKind::ToggleGroup      => "ToggleGroup",
            ElementKind::Toggle           => "Toggle",
            ElementKind::InputField       => "InputField",
            ElementKind::Dropdown         => "Dropdown",
            ElementKind::HorizontalLayout => "HorizontalLayout",
            ElementKind::VerticalLayout   => "VerticalLayout",
            ElementKind::GridLayout       => "GridLayout",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Attr ──────────────────────────────────────────────────────────────────

/// A single `key="value"` attribute on an element. Values are always raw
/// strings; typing happens later in the runtime's attribute resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: String,
}

// ── MarkupNode ────────────────────────────────────────────────────────────

/// An element in the document tree.
///
/// ```uiml
/// <Button name="save" text="Save" size="160,40" onClick="saveFile" />
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupNode {
    /// Tag name exactly as written: `"Button"`, `"ScrollView"`.
    pub tag: String,
    /// Attributes in document order.
    pub attrs: Vec<Attr>,
    /// Child elements in document order.
    pub children: Vec<MarkupNode>,
    /// 1-based line of the opening `<`.
    pub line: usize,
    /// 1-based column of the opening `<`.
    pub col: usize,
}

impl MarkupNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), attrs: Vec::new(), children: Vec::new(), line: 0, col: 0 }
    }

    /// Builder-style attribute append, mostly for constructing trees in code.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attr { key: key.into(), value: value.into() });
        self
    }

    pub fn with_child(mut self, child: MarkupNode) -> Self {
        self.children.push(child);
        self
    }

    /// Look up a raw attribute value. Keys are case-sensitive.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.iter().find(|a| a.key == key).map(|a| a.value.as_str())
    }

    /// The element kind for this tag, if it is one the runtime knows.
    pub fn kind(&self) -> Option<ElementKind> {
        ElementKind::from_tag(&self.tag)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(MarkupNode::subtree_len).sum::<usize>()
    }
}

// ── MarkupDocument ────────────────────────────────────────────────────────

/// The top-level parse result for a `.uiml` source string.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupDocument {
    pub root: MarkupNode,
}
