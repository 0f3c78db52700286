//! Declaration vocabulary: modifiers, visibility, type references and
//! container kinds as handed over by front-ends.

use smol_str::SmolStr;

use crate::graph::EntityKind;

/// Access level of a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    /// No access modifier (package-private).
    Package,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Package => "package",
            Visibility::Private => "private",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "public" => Visibility::Public,
            "protected" => Visibility::Protected,
            "package" => Visibility::Package,
            "private" => Visibility::Private,
            _ => return None,
        })
    }
}

/// Non-access modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    Abstract,
    Static,
    Final,
    Synchronized,
    Native,
    Transient,
    Volatile,
    Strictfp,
    Default,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Strictfp => "strictfp",
            Modifier::Default => "default",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "abstract" => Modifier::Abstract,
            "static" => Modifier::Static,
            "final" => Modifier::Final,
            "synchronized" => Modifier::Synchronized,
            "native" => Modifier::Native,
            "transient" => Modifier::Transient,
            "volatile" => Modifier::Volatile,
            "strictfp" => Modifier::Strictfp,
            "default" => Modifier::Default,
            _ => return None,
        })
    }
}

/// Built-in types. They are addressed directly and never need resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "boolean" => Primitive::Boolean,
            "byte" => Primitive::Byte,
            "char" => Primitive::Char,
            "short" => Primitive::Short,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            "void" => Primitive::Void,
            _ => return None,
        })
    }
}

/// A type as written at a declaration site.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JavaType {
    Primitive(Primitive),
    /// A class-like type by raw name, simple (`List`) or qualified
    /// (`java.util.List`). Generic arguments are already erased.
    Reference(SmolStr),
    Array {
        component: Box<JavaType>,
        dimensions: u8,
    },
}

impl JavaType {
    /// Parse a front-end type spelling such as `int`, `String[]`,
    /// `java.util.Map<K, V>` or `p.Outer.Inner[][]`.
    pub fn named(raw: &str) -> Self {
        let mut text = raw.trim();
        let mut dimensions = 0u8;
        while let Some(rest) = text.strip_suffix("[]") {
            dimensions = dimensions.saturating_add(1);
            text = rest.trim_end();
        }
        let erased = match text.find('<') {
            Some(start) => text[..start].trim_end(),
            None => text,
        };
        let component = match Primitive::parse(erased) {
            Some(primitive) => JavaType::Primitive(primitive),
            None => JavaType::Reference(SmolStr::new(erased)),
        };
        JavaType::array(component, dimensions)
    }

    /// Wrap `component` in `dimensions` array levels. Nested arrays are
    /// flattened; zero dimensions returns the component unchanged.
    pub fn array(component: JavaType, dimensions: u8) -> Self {
        if dimensions == 0 {
            return component;
        }
        match component {
            JavaType::Array {
                component,
                dimensions: inner,
            } => JavaType::Array {
                component,
                dimensions: inner.saturating_add(dimensions),
            },
            component => JavaType::Array {
                component: Box::new(component),
                dimensions,
            },
        }
    }
}

impl From<Primitive> for JavaType {
    fn from(primitive: Primitive) -> Self {
        JavaType::Primitive(primitive)
    }
}

/// The kind of an opened container with its kind-specific declaration data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    Class {
        extends: Option<JavaType>,
        implements: Vec<JavaType>,
    },
    Interface {
        extends: Vec<JavaType>,
    },
    Enumeration {
        implements: Vec<JavaType>,
        elements: Vec<SmolStr>,
    },
}

impl ContainerKind {
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            ContainerKind::Class { .. } => EntityKind::Class,
            ContainerKind::Interface { .. } => EntityKind::Interface,
            ContainerKind::Enumeration { .. } => EntityKind::Enumeration,
        }
    }

    /// Every extended or implemented type, in declaration order.
    pub fn supertypes(&self) -> impl Iterator<Item = &JavaType> {
        let (first, rest): (Option<&JavaType>, &[JavaType]) = match self {
            ContainerKind::Class { extends, implements } => (extends.as_ref(), implements),
            ContainerKind::Interface { extends } => (None, extends),
            ContainerKind::Enumeration { implements, .. } => (None, implements),
        };
        first.into_iter().chain(rest)
    }
}
