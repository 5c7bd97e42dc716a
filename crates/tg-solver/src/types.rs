//! Type data.
//!
//! `TypeData` is the structural description of a type; the interner maps
//! each distinct `TypeData` to one `TypeId`.

use std::hash::{Hash, Hasher};
use tg_common::Atom;

/// Interned type handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const MIXED: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const NUMBER: TypeId = TypeId(2);
    pub const STRING: TypeId = TypeId(3);
    pub const BOOLEAN: TypeId = TypeId(4);
    pub const UNDEFINED: TypeId = TypeId(5);
    pub const NULL: TypeId = TypeId(6);
    pub const VOID: TypeId = TypeId(7);
    pub const NEVER: TypeId = TypeId(8);
    pub const SYMBOL: TypeId = TypeId(9);
    pub const BIGINT: TypeId = TypeId(10);

    /// First id handed out for non-intrinsic types.
    pub const FIRST_USER: u32 = 11;

    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Mixed,
    Unknown,
    Number,
    String,
    Boolean,
    Undefined,
    Null,
    Void,
    Never,
    Symbol,
    BigInt,
}

impl IntrinsicKind {
    /// Intrinsics in `TypeId` order.
    pub const ALL: [IntrinsicKind; 11] = [
        IntrinsicKind::Mixed,
        IntrinsicKind::Unknown,
        IntrinsicKind::Number,
        IntrinsicKind::String,
        IntrinsicKind::Boolean,
        IntrinsicKind::Undefined,
        IntrinsicKind::Null,
        IntrinsicKind::Void,
        IntrinsicKind::Never,
        IntrinsicKind::Symbol,
        IntrinsicKind::BigInt,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Mixed => "mixed",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::Number => "number",
            IntrinsicKind::String => "string",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Null => "null",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Never => "never",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::BigInt => "bigint",
        }
    }

    pub const fn type_id(self) -> TypeId {
        TypeId(self as u32)
    }
}

/// `f64` with bitwise equality so number literals can be interned.
#[derive(Clone, Copy, Debug)]
pub struct OrderedFloat(pub f64);

impl OrderedFloat {
    fn bits(self) -> u64 {
        // -0.0 and 0.0 are the same literal type.
        if self.0 == 0.0 { 0 } else { self.0.to_bits() }
    }
}

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for OrderedFloat {}

impl Hash for OrderedFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    Number(OrderedFloat),
    String(Atom),
    Boolean(bool),
}

impl LiteralValue {
    /// The primitive this literal narrows.
    pub const fn base_type(self) -> TypeId {
        match self {
            LiteralValue::Number(_) => TypeId::NUMBER,
            LiteralValue::String(_) => TypeId::STRING,
            LiteralValue::Boolean(_) => TypeId::BOOLEAN,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: Atom,
    pub type_id: TypeId,
}

impl PropertyInfo {
    pub fn new(name: Atom, type_id: TypeId) -> Self {
        Self { name, type_id }
    }
}

/// Object shape. Properties are kept sorted by name so structurally equal
/// objects intern to the same id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectShape {
    pub properties: Vec<PropertyInfo>,
}

impl ObjectShape {
    pub fn property(&self, name: Atom) -> Option<&PropertyInfo> {
        self.properties
            .binary_search_by_key(&name, |p| p.name)
            .ok()
            .map(|i| &self.properties[i])
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub name: Option<Atom>,
    pub type_id: TypeId,
    pub optional: bool,
}

impl ParamInfo {
    pub fn required(type_id: TypeId) -> Self {
        Self {
            name: None,
            type_id,
            optional: false,
        }
    }

    pub fn optional(type_id: TypeId) -> Self {
        Self {
            name: None,
            type_id,
            optional: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
}

impl FunctionShape {
    /// Number of parameters that must be supplied.
    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|p| !p.optional).count()
    }
}

/// A type parameterized over `type_params` (each a `TypeData::TypeParameter`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenericShape {
    pub type_params: Vec<TypeId>,
    pub subordinate: TypeId,
}

/// Type parameter. `id` keeps two parameters that share a name distinct.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamInfo {
    pub id: u32,
    pub name: Atom,
    pub constraint: Option<TypeId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    Object(ObjectShape),
    Function(FunctionShape),
    Generic(GenericShape),
    TypeParameter(TypeParamInfo),
    /// Flattened, deduplicated, at least two members.
    Union(Vec<TypeId>),
    /// `object[index]`, kept deferred while either side mentions a type
    /// parameter and evaluated on instantiation.
    IndexedAccess {
        object: TypeId,
        index: TypeId,
    },
}
