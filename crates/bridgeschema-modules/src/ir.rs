//! Intermediate representation handed to native code generators.
//!
//! The set of [`TypeAnnotation`] variants is closed: anything a module
//! interface declares is either expressible here or rejected with a
//! [`ParserError`](crate::error::ParserError).

use crate::nullable::Nullable;
use indexmap::IndexMap;
use serde::Serialize;

/// A type annotation together with its nullability.
pub type NullableAnnotation = Nullable<TypeAnnotation>;

/// A named, possibly optional entry (object member, function parameter, module method).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedShape<T> {
    pub name: String,
    pub optional: bool,
    pub type_annotation: T,
}

impl<T> NamedShape<T> {
    pub fn new(name: impl Into<String>, optional: bool, type_annotation: T) -> Self {
        Self {
            name: name.into(),
            optional,
            type_annotation,
        }
    }
}

/// Member kind of an enum declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnumMemberType {
    #[serde(rename = "NumberTypeAnnotation")]
    Number,
    #[serde(rename = "StringTypeAnnotation")]
    String,
}

/// Member kind shared by every member of a literal union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnionMemberType {
    #[serde(rename = "NumberTypeAnnotation")]
    Number,
    #[serde(rename = "StringTypeAnnotation")]
    String,
    #[serde(rename = "ObjectTypeAnnotation")]
    Object,
}

impl UnionMemberType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "NumberTypeAnnotation",
            Self::String => "StringTypeAnnotation",
            Self::Object => "ObjectTypeAnnotation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FunctionTypeAnnotation", rename_all = "camelCase")]
pub struct FunctionTypeAnnotation {
    pub params: Vec<NamedShape<NullableAnnotation>>,
    pub return_type_annotation: Box<NullableAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ObjectTypeAnnotation")]
pub struct ObjectTypeAnnotation {
    pub properties: Vec<NamedShape<NullableAnnotation>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TypeAnnotation {
    #[serde(rename = "BooleanTypeAnnotation")]
    Boolean,
    #[serde(rename = "NumberTypeAnnotation")]
    Number,
    #[serde(rename = "Int32TypeAnnotation")]
    Int32,
    #[serde(rename = "DoubleTypeAnnotation")]
    Double,
    #[serde(rename = "FloatTypeAnnotation")]
    Float,
    #[serde(rename = "StringTypeAnnotation")]
    String,
    #[serde(rename = "StringishTypeAnnotation")]
    Stringish,
    #[serde(rename = "ArrayTypeAnnotation", rename_all = "camelCase")]
    Array {
        /// Absent when the element type could not be translated.
        #[serde(skip_serializing_if = "Option::is_none")]
        element_type: Option<Box<NullableAnnotation>>,
    },
    #[serde(rename = "PromiseTypeAnnotation")]
    Promise,
    #[serde(rename = "VoidTypeAnnotation")]
    Void,
    #[serde(rename = "RootTagTypeAnnotation")]
    RootTag,
    #[serde(rename = "EnumDeclaration", rename_all = "camelCase")]
    Enum { member_type: EnumMemberType },
    #[serde(rename = "UnionTypeAnnotation", rename_all = "camelCase")]
    Union { member_type: UnionMemberType },
    #[serde(rename = "GenericObjectTypeAnnotation")]
    GenericObject,
    #[serde(rename = "MixedTypeAnnotation")]
    Mixed,
    /// Reference to an entry of the module's [`AliasMap`].
    #[serde(rename = "TypeAliasTypeAnnotation")]
    TypeAlias { name: String },
    // Both structs carry their own tag.
    #[serde(untagged)]
    Object(ObjectTypeAnnotation),
    #[serde(untagged)]
    Function(FunctionTypeAnnotation),
}

impl TypeAnnotation {
    /// Name of the variant as it appears in serialized output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Boolean => "BooleanTypeAnnotation",
            Self::Number => "NumberTypeAnnotation",
            Self::Int32 => "Int32TypeAnnotation",
            Self::Double => "DoubleTypeAnnotation",
            Self::Float => "FloatTypeAnnotation",
            Self::String => "StringTypeAnnotation",
            Self::Stringish => "StringishTypeAnnotation",
            Self::Object(_) => "ObjectTypeAnnotation",
            Self::Array { .. } => "ArrayTypeAnnotation",
            Self::Function(_) => "FunctionTypeAnnotation",
            Self::Promise => "PromiseTypeAnnotation",
            Self::Void => "VoidTypeAnnotation",
            Self::RootTag => "RootTagTypeAnnotation",
            Self::Enum { .. } => "EnumDeclaration",
            Self::Union { .. } => "UnionTypeAnnotation",
            Self::GenericObject => "GenericObjectTypeAnnotation",
            Self::Mixed => "MixedTypeAnnotation",
            Self::TypeAlias { .. } => "TypeAliasTypeAnnotation",
        }
    }

    pub fn array(element_type: Option<NullableAnnotation>) -> Self {
        Self::Array {
            element_type: element_type.map(Box::new),
        }
    }
}

/// Named object shapes referenced through [`TypeAnnotation::TypeAlias`].
pub type AliasMap = IndexMap<String, ObjectTypeAnnotation>;

/// One exposed module method.
pub type PropertyShape = NamedShape<Nullable<FunctionTypeAnnotation>>;

/// Platforms a module can be excluded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Platform {
    #[serde(rename = "iOS")]
    Ios,
    #[serde(rename = "android")]
    Android,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "android",
        }
    }
}

/// Schema of one native module spec file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename = "NativeModule", rename_all = "camelCase")]
pub struct NativeModuleSchema {
    pub aliases: AliasMap,
    pub properties: Vec<PropertyShape>,
    pub module_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_platforms: Option<Vec<Platform>>,
}

impl NativeModuleSchema {
    /// Empty schema carrying the facts derived before the member fold.
    pub fn new(module_names: Vec<String>, excluded_platforms: Vec<Platform>) -> Self {
        Self {
            aliases: AliasMap::new(),
            properties: Vec::new(),
            module_names,
            excluded_platforms: (!excluded_platforms.is_empty()).then_some(excluded_platforms),
        }
    }

    /// Extend the schema with one folded member. Aliases already present keep
    /// their first registration.
    pub fn with_property(mut self, aliases: AliasMap, property: PropertyShape) -> Self {
        for (name, object) in aliases {
            self.aliases.entry(name).or_insert(object);
        }
        self.properties.push(property);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyShape> {
        self.properties.iter().find(|p| p.name == name)
    }
}
