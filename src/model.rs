//! Data model for the type graph the oracle hands to the generator.
//!
//! The nodes mirror Go's type grammar. The graph is read-only input: the
//! naming engine walks it but never mutates it.

use serde::Deserialize;

/// Identity of a package as declared at its definition site.
///
/// `path` is the canonical import path and may still carry a `vendor/`
/// prefix; the registry strips it before using the path as identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageRef {
    pub path: String,
    /// Short name the package declares for itself.
    pub name: String,
}

impl PackageRef {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Channel directionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChanDir {
    #[default]
    Both,
    Send,
    Recv,
}

/// One field of an anonymous struct type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StructField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeNode,
}

/// One parameter or result of a function signature. The name is absent for
/// unnamed entries; the Go blank identifier `_` is treated as unnamed too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Param {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeNode,
}

impl Param {
    pub fn unnamed(ty: TypeNode) -> Self {
        Self { name: None, ty }
    }

    pub fn named(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }
}

/// A function signature. When `variadic` is set the final parameter's type
/// is a slice whose element is the variadic element type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub results: Vec<Param>,
    #[serde(default)]
    pub variadic: bool,
}

/// A named method with its signature.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(flatten)]
    pub sig: Signature,
}

/// One node in the recursive description of a parameter/result type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeNode {
    /// A predeclared scalar (`int`, `string`, `byte`, ...).
    Basic { name: String },
    /// A declared type. `package` is `None` for universe-scope names such
    /// as `error` and `any`.
    Named {
        #[serde(default)]
        package: Option<PackageRef>,
        name: String,
        #[serde(default)]
        type_args: Vec<TypeNode>,
    },
    Pointer {
        elem: Box<TypeNode>,
    },
    Array {
        len: u64,
        elem: Box<TypeNode>,
    },
    Slice {
        elem: Box<TypeNode>,
    },
    Map {
        key: Box<TypeNode>,
        value: Box<TypeNode>,
    },
    Chan {
        #[serde(default)]
        dir: ChanDir,
        elem: Box<TypeNode>,
    },
    /// An anonymous struct appearing inline in a signature.
    Struct {
        #[serde(default)]
        fields: Vec<StructField>,
    },
    /// An anonymous interface appearing inline in a signature.
    Interface {
        #[serde(default)]
        methods: Vec<Method>,
        #[serde(default)]
        embedded: Vec<TypeNode>,
    },
    Func {
        #[serde(flatten)]
        sig: Signature,
    },
}

impl TypeNode {
    pub fn basic(name: impl Into<String>) -> Self {
        Self::Basic { name: name.into() }
    }

    /// A named type from the given package, without type arguments.
    pub fn named(package: Option<PackageRef>, name: impl Into<String>) -> Self {
        Self::Named {
            package,
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    pub fn pointer(elem: TypeNode) -> Self {
        Self::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: TypeNode) -> Self {
        Self::Slice {
            elem: Box::new(elem),
        }
    }
}

/// One declared interface with its ordered method list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InterfaceDef {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
}
