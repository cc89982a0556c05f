//! Nullability wrapper for IR values.

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// A value paired with a nullability flag.
///
/// Nullability markers never nest: the resolver collapses every `null`,
/// `undefined` and nullable alias on the way to a type into one flag, which is
/// applied once with [`wrap_nullable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Nullable<T> {
    pub nullable: bool,
    pub value: T,
}

/// Wrap a bare value.
pub fn wrap_nullable<T>(nullable: bool, value: T) -> Nullable<T> {
    Nullable { nullable, value }
}

/// Split a wrapped value into the bare value and its flag.
pub fn unwrap_nullable<T>(wrapped: Nullable<T>) -> (T, bool) {
    (wrapped.value, wrapped.nullable)
}

impl<T> Nullable<T> {
    pub fn non_null(value: T) -> Self {
        wrap_nullable(false, value)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Nullable<U> {
        Nullable {
            nullable: self.nullable,
            value: f(self.value),
        }
    }

    pub fn as_ref(&self) -> Nullable<&T> {
        Nullable {
            nullable: self.nullable,
            value: &self.value,
        }
    }
}

/// Nullable values serialize as `{"type": "NullableTypeAnnotation", "typeAnnotation": ...}`;
/// non-null values serialize as the bare value.
impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.nullable {
            let mut state = serializer.serialize_struct("NullableTypeAnnotation", 2)?;
            state.serialize_field("type", "NullableTypeAnnotation")?;
            state.serialize_field("typeAnnotation", &self.value)?;
            state.end()
        } else {
            self.value.serialize(serializer)
        }
    }
}
