//! Structured ABI type descriptors.
//!
//! A `TypeDescriptor` is parsed once from a declared type name (plus the
//! `components` list for tuples) and is immutable afterwards. Whether a type
//! is dynamic, and how many head words it occupies, is computed at
//! construction so the decode engine never has to walk the tree to find out.

use crate::abi::AbiParam;
use crate::error::TypeError;
use std::fmt;

/// Size of one ABI word in bytes.
pub const WORD: usize = 32;

/// Deepest array or tuple nesting accepted by the parser.
pub const MAX_NESTING: usize = 64;

/// Leaf ABI types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Elementary {
    /// Unsigned integer. Width in bits.
    Uint(u16),
    /// Signed integer. Width in bits.
    Int(u16),
    Address,
    Bool,
    /// `bytes1` .. `bytes32`. Length in bytes.
    FixedBytes(u8),
    /// External function pointer: 20-byte address followed by a 4-byte selector.
    Function,
    Bytes,
    String,
}

impl Elementary {
    /// `bytes` and `string` are the only dynamic leaves.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Elementary::Bytes | Elementary::String)
    }

    fn parse(ty: &str) -> Result<Self, TypeError> {
        match ty {
            "address" => return Ok(Elementary::Address),
            "bool" => return Ok(Elementary::Bool),
            "string" => return Ok(Elementary::String),
            "bytes" => return Ok(Elementary::Bytes),
            "function" => return Ok(Elementary::Function),
            "uint" => return Ok(Elementary::Uint(256)),
            "int" => return Ok(Elementary::Int(256)),
            _ => {}
        }

        if let Some(width) = ty.strip_prefix("uint") {
            return parse_int_width(ty, width).map(Elementary::Uint);
        }
        if let Some(width) = ty.strip_prefix("int") {
            return parse_int_width(ty, width).map(Elementary::Int);
        }
        if let Some(size) = ty.strip_prefix("bytes") {
            let n = parse_digits(size).ok_or_else(|| TypeError::UnknownType { ty: ty.into() })?;
            if !(1..=32).contains(&n) {
                return Err(TypeError::InvalidBytesWidth { ty: ty.into() });
            }
            return Ok(Elementary::FixedBytes(n as u8));
        }

        Err(TypeError::UnknownType { ty: ty.into() })
    }
}

impl fmt::Display for Elementary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Elementary::Uint(bits) => write!(f, "uint{bits}"),
            Elementary::Int(bits) => write!(f, "int{bits}"),
            Elementary::Address => write!(f, "address"),
            Elementary::Bool => write!(f, "bool"),
            Elementary::FixedBytes(n) => write!(f, "bytes{n}"),
            Elementary::Function => write!(f, "function"),
            Elementary::Bytes => write!(f, "bytes"),
            Elementary::String => write!(f, "string"),
        }
    }
}

/// One named member of a tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Declared name; empty for inline tuple syntax.
    pub name: String,
    /// Type name as declared (e.g. `tuple`, `uint256[]`).
    pub type_name: String,
    pub ty: TypeDescriptor,
}

/// Shape of an ABI type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Elementary(Elementary),
    FixedArray {
        element: Box<TypeDescriptor>,
        len: usize,
    },
    DynamicArray(Box<TypeDescriptor>),
    Tuple(Vec<Component>),
}

/// A parsed ABI type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    kind: TypeKind,
    dynamic: bool,
    head_words: usize,
}

impl TypeDescriptor {
    pub fn elementary(e: Elementary) -> Self {
        Self {
            kind: TypeKind::Elementary(e),
            dynamic: e.is_dynamic(),
            head_words: 1,
        }
    }

    pub fn fixed_array(element: TypeDescriptor, len: usize) -> Self {
        let dynamic = element.dynamic;
        let head_words = if dynamic {
            1
        } else {
            element.head_words.saturating_mul(len)
        };
        Self {
            kind: TypeKind::FixedArray {
                element: Box::new(element),
                len,
            },
            dynamic,
            head_words,
        }
    }

    pub fn dynamic_array(element: TypeDescriptor) -> Self {
        Self {
            kind: TypeKind::DynamicArray(Box::new(element)),
            dynamic: true,
            head_words: 1,
        }
    }

    pub fn tuple(components: Vec<Component>) -> Self {
        let dynamic = components.iter().any(|c| c.ty.dynamic);
        let head_words = if dynamic {
            1
        } else {
            components
                .iter()
                .fold(0usize, |acc, c| acc.saturating_add(c.ty.head_words))
        };
        Self {
            kind: TypeKind::Tuple(components),
            dynamic,
            head_words,
        }
    }

    /// Parse a declared type name.
    ///
    /// `components` is only consulted for `tuple` (and its array forms); it
    /// is the `components` list of the declaring parameter.
    pub fn parse(ty: &str, components: &[AbiParam]) -> Result<Self, TypeError> {
        Self::parse_nested(ty, components, 0)
    }

    fn parse_nested(ty: &str, components: &[AbiParam], depth: usize) -> Result<Self, TypeError> {
        let ty = ty.trim();
        if depth > MAX_NESTING {
            return Err(TypeError::TooDeep {
                ty: ty.chars().take(64).collect(),
                max: MAX_NESTING,
            });
        }

        // Array suffixes are stripped right-to-left: the last group is the
        // outermost array, so `uint256[3][]` is a dynamic array of `uint256[3]`.
        if let Some(stripped) = ty.strip_suffix(']') {
            let open = stripped
                .rfind('[')
                .ok_or_else(|| TypeError::InvalidArrayLength { ty: ty.into() })?;
            let element = Self::parse_nested(&stripped[..open], components, depth + 1)?;
            let size = &stripped[open + 1..];
            if size.is_empty() {
                return Ok(Self::dynamic_array(element));
            }
            return match parse_digits(size) {
                Some(len) if len > 0 => Ok(Self::fixed_array(element, len)),
                _ => Err(TypeError::InvalidArrayLength { ty: ty.into() }),
            };
        }

        if ty.starts_with('(') {
            return parse_inline_tuple(ty, depth);
        }

        if ty == "tuple" {
            if components.is_empty() {
                return Err(TypeError::MissingComponents { ty: ty.into() });
            }
            let components = components
                .iter()
                .map(|p| {
                    Ok(Component {
                        name: p.name.clone(),
                        type_name: p.type_name.clone(),
                        ty: Self::parse_nested(&p.type_name, &p.components, depth + 1)?,
                    })
                })
                .collect::<Result<Vec<_>, TypeError>>()?;
            return Ok(Self::tuple(components));
        }

        Elementary::parse(ty).map(Self::elementary)
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// True for `bytes`, `string`, dynamic arrays, and any tuple or fixed
    /// array containing one of those.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Words this type occupies in the head of its enclosing tuple: one
    /// offset word for dynamic types, the full inline size for static ones.
    pub fn head_words(&self) -> usize {
        self.head_words
    }

    /// Returns the leaf type if this descriptor is elementary.
    pub fn as_elementary(&self) -> Option<Elementary> {
        match self.kind {
            TypeKind::Elementary(e) => Some(e),
            _ => None,
        }
    }
}

/// Canonical type string as used in signatures: tuples expand to their
/// parenthesised component list, integer aliases are widened.
impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Elementary(e) => write!(f, "{e}"),
            TypeKind::FixedArray { element, len } => write!(f, "{element}[{len}]"),
            TypeKind::DynamicArray(element) => write!(f, "{element}[]"),
            TypeKind::Tuple(components) => {
                f.write_str("(")?;
                for (i, c) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", c.ty)?;
                }
                f.write_str(")")
            }
        }
    }
}

fn parse_digits(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_int_width(ty: &str, width: &str) -> Result<u16, TypeError> {
    let bits = parse_digits(width).ok_or_else(|| TypeError::UnknownType { ty: ty.into() })?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(TypeError::InvalidIntWidth { ty: ty.into() });
    }
    Ok(bits as u16)
}

/// `(address,(uint256,bool)[])`: components come from the string itself.
fn parse_inline_tuple(ty: &str, depth: usize) -> Result<TypeDescriptor, TypeError> {
    let inner = ty
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| TypeError::Unbalanced { ty: ty.into() })?;

    let mut parts = Vec::new();
    let mut paren_depth = 0i32;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => paren_depth += 1,
            ')' => {
                paren_depth -= 1;
                if paren_depth < 0 {
                    return Err(TypeError::Unbalanced { ty: ty.into() });
                }
            }
            ',' if paren_depth == 0 => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if paren_depth != 0 {
        return Err(TypeError::Unbalanced { ty: ty.into() });
    }
    if !inner.trim().is_empty() {
        parts.push(&inner[start..]);
    }

    let components = parts
        .into_iter()
        .map(|part| {
            let part = part.trim();
            Ok(Component {
                name: String::new(),
                type_name: part.to_string(),
                ty: TypeDescriptor::parse_nested(part, &[], depth + 1)?,
            })
        })
        .collect::<Result<Vec<_>, TypeError>>()?;
    Ok(TypeDescriptor::tuple(components))
}
