//! Capability table.
//!
//! Model members are classified by the marker types they implement. The
//! classification that picks how a member is synthesized is a static,
//! priority-ordered rule list rather than a chain of type checks.

use mirror_config::ApiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    FormField,
    CompositeField,
    ValueField,
    FormFieldMenu,
    CompositeFieldExtension,
    Table,
    Column,
    TableExtension,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::FormField,
        Capability::CompositeField,
        Capability::ValueField,
        Capability::FormFieldMenu,
        Capability::CompositeFieldExtension,
        Capability::Table,
        Capability::Column,
        Capability::TableExtension,
    ];

    /// Qualified name of the marker type that grants this capability.
    pub fn marker(self, api: &ApiConfig) -> &str {
        match self {
            Capability::FormField => &api.form_field,
            Capability::CompositeField => &api.composite_field,
            Capability::ValueField => &api.value_field,
            Capability::FormFieldMenu => &api.form_field_menu,
            Capability::CompositeFieldExtension => &api.composite_field_extension,
            Capability::Table => &api.table,
            Capability::Column => &api.column,
            Capability::TableExtension => &api.table_extension,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub const EMPTY: CapabilitySet = CapabilitySet(0);

    pub fn with(mut self, capability: Capability) -> Self {
        self.insert(capability);
        self
    }

    pub fn insert(&mut self, capability: Capability) {
        self.0 |= capability.bit();
    }

    pub fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = CapabilitySet::EMPTY;
        for capability in iter {
            set.insert(capability);
        }
        set
    }
}

/// How a created member is synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestedKind {
    /// Holds table rows: row data plus the typed row accessors.
    TableContainer,
    /// Holds nested field-like members.
    Composite,
    Plain,
}

/// What a unit of each kind is filled with, in fill order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Content {
    Properties,
    Children,
    Rows,
}

impl NestedKind {
    pub fn content(self) -> &'static [Content] {
        match self {
            NestedKind::TableContainer => &[Content::Properties, Content::Rows],
            NestedKind::Composite => &[Content::Properties, Content::Children],
            NestedKind::Plain => &[Content::Properties],
        }
    }
}

/// Facts about one member that the kind rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInput {
    pub capabilities: CapabilitySet,
    pub top_level: bool,
    /// The configured super type is a table data type.
    pub table_data: bool,
}

struct KindRule {
    kind: NestedKind,
    applies: fn(&KindInput) -> bool,
}

fn holds_table_data(input: &KindInput) -> bool {
    input.table_data
}

fn is_composite_template(input: &KindInput) -> bool {
    input.top_level
        || (input.capabilities.contains(Capability::CompositeField)
            && !input.capabilities.contains(Capability::ValueField))
}

const KIND_RULES: &[KindRule] = &[
    KindRule {
        kind: NestedKind::TableContainer,
        applies: holds_table_data,
    },
    KindRule {
        kind: NestedKind::Composite,
        applies: is_composite_template,
    },
];

/// The first matching rule wins; members no rule matches are [`NestedKind::Plain`].
pub fn nested_kind(input: &KindInput) -> NestedKind {
    KIND_RULES
        .iter()
        .find(|rule| (rule.applies)(input))
        .map_or(NestedKind::Plain, |rule| rule.kind)
}

/// Members whose nested field-like children are flattened into the unit
/// being built when the member itself gets no unit of its own.
pub fn is_composite(capabilities: CapabilitySet) -> bool {
    capabilities.contains(Capability::CompositeField)
}
