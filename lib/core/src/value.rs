//! Feature values
//!
//! Every type that can sit in an annotated field implements [`FeatureValue`].
//! The trait carries the static type description used at synthesis time and
//! the capability views used by generic and capability visitor operations.

use crate::types::{Capability, TypeDesc};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Typed accessor from a record to one of its values
pub type Getter<R, T> = Arc<dyn Fn(&R) -> &T + Send + Sync>;

/// Build a [`Getter`] from a closure.
///
/// Going through this function gives the closure its higher-ranked
/// signature; `Arc::new(|r| &r.field)` alone does not infer one.
pub fn getter<R, T, F>(f: F) -> Getter<R, T>
where
    R: 'static,
    T: ?Sized + 'static,
    F: Fn(&R) -> &T + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A value that can be visited as a feature
pub trait FeatureValue: fmt::Debug + Send + Sync + 'static {
    /// Static description of the type
    fn type_desc() -> TypeDesc
    where
        Self: Sized;

    fn as_number(&self) -> Option<f64> {
        None
    }

    fn as_text(&self) -> Option<Cow<'_, str>> {
        None
    }

    fn as_bool(&self) -> Option<bool> {
        None
    }

    /// Elements of a sequence value
    fn elements(&self) -> Option<Vec<&dyn FeatureValue>> {
        None
    }

    /// Dense accessor for fields holding a dense numeric sequence
    #[doc(hidden)]
    fn dense_accessor<R: 'static>(_get: Getter<R, Self>) -> Option<DenseAccessor<R>>
    where
        Self: Sized,
    {
        None
    }

    /// Dense accessor for slices of this element type
    #[doc(hidden)]
    fn slice_accessor<R: 'static>(_get: Getter<R, [Self]>) -> Option<DenseAccessor<R>>
    where
        Self: Sized,
    {
        None
    }
}

/// Element types allowed in dense namespaces
pub trait DenseElement: FeatureValue + Copy {
    fn wrap(values: &[Self]) -> DenseSlice<'_>;
}

/// Borrowed dense values, tagged by element type
#[derive(Debug, Clone, Copy)]
pub enum DenseSlice<'a> {
    F64(&'a [f64]),
    F32(&'a [f32]),
    I16(&'a [i16]),
    I32(&'a [i32]),
    I64(&'a [i64]),
}

impl<'a> DenseSlice<'a> {
    pub fn len(&self) -> usize {
        match self {
            DenseSlice::F64(v) => v.len(),
            DenseSlice::F32(v) => v.len(),
            DenseSlice::I16(v) => v.len(),
            DenseSlice::I32(v) => v.len(),
            DenseSlice::I64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        match self {
            DenseSlice::F64(v) => v.get(index).copied(),
            DenseSlice::F32(v) => v.get(index).map(|x| *x as f64),
            DenseSlice::I16(v) => v.get(index).map(|x| *x as f64),
            DenseSlice::I32(v) => v.get(index).map(|x| *x as f64),
            DenseSlice::I64(v) => v.get(index).map(|x| *x as f64),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + 'a {
        let values = *self;
        (0..values.len()).filter_map(move |i| values.get(i))
    }

    pub fn element_type(&self) -> TypeDesc {
        match self {
            DenseSlice::F64(_) => f64::type_desc(),
            DenseSlice::F32(_) => f32::type_desc(),
            DenseSlice::I16(_) => i16::type_desc(),
            DenseSlice::I32(_) => i32::type_desc(),
            DenseSlice::I64(_) => i64::type_desc(),
        }
    }
}

/// Typed accessor to a dense field, tagged by element type
pub enum DenseAccessor<R> {
    F64(Getter<R, [f64]>),
    F32(Getter<R, [f32]>),
    I16(Getter<R, [i16]>),
    I32(Getter<R, [i32]>),
    I64(Getter<R, [i64]>),
}

impl<R> Clone for DenseAccessor<R> {
    fn clone(&self) -> Self {
        match self {
            DenseAccessor::F64(get) => DenseAccessor::F64(get.clone()),
            DenseAccessor::F32(get) => DenseAccessor::F32(get.clone()),
            DenseAccessor::I16(get) => DenseAccessor::I16(get.clone()),
            DenseAccessor::I32(get) => DenseAccessor::I32(get.clone()),
            DenseAccessor::I64(get) => DenseAccessor::I64(get.clone()),
        }
    }
}

macro_rules! numeric_value {
    (@body $t:ty, $kind:expr) => {
        fn type_desc() -> TypeDesc {
            TypeDesc::scalar::<$t>(&[$kind, Capability::Numeric, Capability::Text])
        }

        fn as_number(&self) -> Option<f64> {
            Some(*self as f64)
        }

        fn as_text(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Owned(self.to_string()))
        }
    };
    ($($t:ty => $kind:expr),* $(,)?) => {
        $(
            impl FeatureValue for $t {
                numeric_value!(@body $t, $kind);
            }
        )*
    };
}

macro_rules! dense_value {
    ($($t:ty => $kind:expr, $variant:ident),* $(,)?) => {
        $(
            impl FeatureValue for $t {
                numeric_value!(@body $t, $kind);

                fn slice_accessor<R: 'static>(get: Getter<R, [Self]>) -> Option<DenseAccessor<R>> {
                    Some(DenseAccessor::$variant(get))
                }
            }

            impl DenseElement for $t {
                fn wrap(values: &[Self]) -> DenseSlice<'_> {
                    DenseSlice::$variant(values)
                }
            }
        )*
    };
}

numeric_value! {
    i8 => Capability::Integral,
    u8 => Capability::Integral,
    u16 => Capability::Integral,
    u32 => Capability::Integral,
    u64 => Capability::Integral,
    usize => Capability::Integral,
    isize => Capability::Integral,
}

dense_value! {
    f64 => Capability::Floating, F64,
    f32 => Capability::Floating, F32,
    i16 => Capability::Integral, I16,
    i32 => Capability::Integral, I32,
    i64 => Capability::Integral, I64,
}

impl FeatureValue for bool {
    fn type_desc() -> TypeDesc {
        TypeDesc::scalar::<bool>(&[Capability::Boolean, Capability::Text])
    }

    fn as_bool(&self) -> Option<bool> {
        Some(*self)
    }

    fn as_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(if *self { "True" } else { "False" }))
    }
}

impl FeatureValue for char {
    fn type_desc() -> TypeDesc {
        TypeDesc::scalar::<char>(&[Capability::Text])
    }

    fn as_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.to_string()))
    }
}

impl FeatureValue for String {
    fn type_desc() -> TypeDesc {
        TypeDesc::scalar::<String>(&[Capability::Text])
    }

    fn as_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl FeatureValue for &'static str {
    fn type_desc() -> TypeDesc {
        TypeDesc::scalar::<&'static str>(&[Capability::Text])
    }

    fn as_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(*self))
    }
}

impl<E: FeatureValue> FeatureValue for Vec<E> {
    fn type_desc() -> TypeDesc {
        TypeDesc::sequence::<Vec<E>>(E::type_desc())
    }

    fn elements(&self) -> Option<Vec<&dyn FeatureValue>> {
        Some(self.iter().map(|e| e as &dyn FeatureValue).collect())
    }

    fn dense_accessor<R: 'static>(get: Getter<R, Self>) -> Option<DenseAccessor<R>> {
        E::slice_accessor(getter(move |r: &R| get(r).as_slice()))
    }
}

impl<E: FeatureValue> FeatureValue for Box<[E]> {
    fn type_desc() -> TypeDesc {
        TypeDesc::sequence::<Box<[E]>>(E::type_desc())
    }

    fn elements(&self) -> Option<Vec<&dyn FeatureValue>> {
        Some(self.iter().map(|e| e as &dyn FeatureValue).collect())
    }

    fn dense_accessor<R: 'static>(get: Getter<R, Self>) -> Option<DenseAccessor<R>> {
        E::slice_accessor(getter(move |r: &R| &**get(r)))
    }
}

impl<E: FeatureValue, const N: usize> FeatureValue for [E; N] {
    fn type_desc() -> TypeDesc {
        TypeDesc::sequence::<[E; N]>(E::type_desc())
    }

    fn elements(&self) -> Option<Vec<&dyn FeatureValue>> {
        Some(self.iter().map(|e| e as &dyn FeatureValue).collect())
    }

    fn dense_accessor<R: 'static>(get: Getter<R, Self>) -> Option<DenseAccessor<R>> {
        E::slice_accessor(getter(move |r: &R| get(r).as_slice()))
    }
}
