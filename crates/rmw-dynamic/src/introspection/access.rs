// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field accessors: typed closures standing in for raw byte offsets.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A single field value lifted out of (or destined for) a native message.
///
/// Variants follow the Rust storage type, not the rosidl kind: `byte`,
/// `char` and `uint8` all travel as [`FieldValue::U8`], and the marshaler
/// decides the container kind from the member description.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    String(String),
}

/// Native scalar types a message field may be stored as.
pub trait NativeValue: Clone + Default + Send + Sync + 'static {
    fn to_field(&self) -> FieldValue;
    fn from_field(value: FieldValue) -> Option<Self>;
}

macro_rules! native_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl NativeValue for $ty {
                fn to_field(&self) -> FieldValue {
                    FieldValue::$variant(*self)
                }

                fn from_field(value: FieldValue) -> Option<Self> {
                    match value {
                        FieldValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

native_value! {
    bool => Bool,
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}

impl NativeValue for String {
    fn to_field(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }

    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(v) => Some(v),
            _ => None,
        }
    }
}

type SizeFn = Arc<dyn Fn(&dyn Any) -> Option<usize> + Send + Sync>;
type FetchFn = Arc<dyn Fn(&dyn Any, usize) -> Option<FieldValue> + Send + Sync>;
type AssignFn = Arc<dyn Fn(&mut dyn Any, usize, FieldValue) -> bool + Send + Sync>;
type ResizeFn = Arc<dyn Fn(&mut dyn Any, usize) -> bool + Send + Sync>;
type NestedFn = Arc<dyn for<'a> Fn(&'a dyn Any, usize) -> Option<&'a dyn Any> + Send + Sync>;
type NestedMutFn =
    Arc<dyn for<'a> Fn(&'a mut dyn Any, usize) -> Option<&'a mut dyn Any> + Send + Sync>;

fn nested_fn<F>(f: F) -> NestedFn
where
    F: for<'a> Fn(&'a dyn Any, usize) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn nested_mut_fn<F>(f: F) -> NestedMutFn
where
    F: for<'a> Fn(&'a mut dyn Any, usize) -> Option<&'a mut dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Read/write access to one field of a native message.
///
/// Scalars are addressed as index 0; arrays and sequences by element index.
/// Every operation returns `None`/`false` when the message is not of the
/// type the accessor was built for, or when the index is out of range.
#[derive(Clone)]
pub struct Accessor {
    size: SizeFn,
    fetch: FetchFn,
    assign: AssignFn,
    resize: ResizeFn,
    nested: NestedFn,
    nested_mut: NestedMutFn,
}

impl Accessor {
    /// Accessor that never resolves. Used for members that carry no data.
    pub fn none() -> Self {
        Self {
            size: Arc::new(|_: &dyn Any| None),
            fetch: Arc::new(|_: &dyn Any, _: usize| None),
            assign: Arc::new(|_: &mut dyn Any, _: usize, _: FieldValue| false),
            resize: Arc::new(|_: &mut dyn Any, _: usize| false),
            nested: nested_fn(|_, _| None),
            nested_mut: nested_mut_fn(|_, _| None),
        }
    }

    /// Scalar field of native type `T`, including strings.
    pub fn scalar<M, T, G, S>(get: G, get_mut: S) -> Self
    where
        M: Any,
        T: NativeValue,
        G: Fn(&M) -> &T + Copy + Send + Sync + 'static,
        S: Fn(&mut M) -> &mut T + Copy + Send + Sync + 'static,
    {
        Self {
            size: Arc::new(|msg: &dyn Any| msg.downcast_ref::<M>().map(|_| 1_usize)),
            fetch: Arc::new(move |msg: &dyn Any, index: usize| {
                let msg = msg.downcast_ref::<M>()?;
                (index == 0).then(|| get(msg).to_field())
            }),
            assign: Arc::new(move |msg: &mut dyn Any, index: usize, value: FieldValue| {
                match (msg.downcast_mut::<M>(), T::from_field(value)) {
                    (Some(msg), Some(value)) if index == 0 => {
                        *get_mut(msg) = value;
                        true
                    }
                    _ => false,
                }
            }),
            resize: Arc::new(|_: &mut dyn Any, _: usize| false),
            nested: nested_fn(|_, _| None),
            nested_mut: nested_mut_fn(|_, _| None),
        }
    }

    /// Fixed-length array field `[T; N]`.
    pub fn array<M, T, G, S, const N: usize>(get: G, get_mut: S) -> Self
    where
        M: Any,
        T: NativeValue,
        G: Fn(&M) -> &[T; N] + Copy + Send + Sync + 'static,
        S: Fn(&mut M) -> &mut [T; N] + Copy + Send + Sync + 'static,
    {
        Self {
            size: Arc::new(|msg: &dyn Any| msg.downcast_ref::<M>().map(|_| N)),
            fetch: Arc::new(move |msg: &dyn Any, index: usize| {
                let msg = msg.downcast_ref::<M>()?;
                get(msg).get(index).map(NativeValue::to_field)
            }),
            assign: Arc::new(move |msg: &mut dyn Any, index: usize, value: FieldValue| {
                let slot = msg
                    .downcast_mut::<M>()
                    .and_then(|msg| get_mut(msg).get_mut(index));
                match (slot, T::from_field(value)) {
                    (Some(slot), Some(value)) => {
                        *slot = value;
                        true
                    }
                    _ => false,
                }
            }),
            resize: Arc::new(|msg: &mut dyn Any, len: usize| {
                msg.downcast_mut::<M>().is_some() && len == N
            }),
            nested: nested_fn(|_, _| None),
            nested_mut: nested_mut_fn(|_, _| None),
        }
    }

    /// Sequence field `Vec<T>`, bounded or not.
    pub fn sequence<M, T, G, S>(get: G, get_mut: S) -> Self
    where
        M: Any,
        T: NativeValue,
        G: Fn(&M) -> &Vec<T> + Copy + Send + Sync + 'static,
        S: Fn(&mut M) -> &mut Vec<T> + Copy + Send + Sync + 'static,
    {
        Self {
            size: Arc::new(move |msg: &dyn Any| msg.downcast_ref::<M>().map(|m| get(m).len())),
            fetch: Arc::new(move |msg: &dyn Any, index: usize| {
                let msg = msg.downcast_ref::<M>()?;
                get(msg).get(index).map(NativeValue::to_field)
            }),
            assign: Arc::new(move |msg: &mut dyn Any, index: usize, value: FieldValue| {
                let slot = msg
                    .downcast_mut::<M>()
                    .and_then(|msg| get_mut(msg).get_mut(index));
                match (slot, T::from_field(value)) {
                    (Some(slot), Some(value)) => {
                        *slot = value;
                        true
                    }
                    _ => false,
                }
            }),
            resize: Arc::new(move |msg: &mut dyn Any, len: usize| {
                msg.downcast_mut::<M>()
                    .map(|msg| get_mut(msg).resize(len, T::default()))
                    .is_some()
            }),
            nested: nested_fn(|_, _| None),
            nested_mut: nested_mut_fn(|_, _| None),
        }
    }

    /// Nested message field.
    pub fn message<M, N, G, S>(get: G, get_mut: S) -> Self
    where
        M: Any,
        N: Any,
        G: Fn(&M) -> &N + Copy + Send + Sync + 'static,
        S: Fn(&mut M) -> &mut N + Copy + Send + Sync + 'static,
    {
        Self {
            size: Arc::new(|msg: &dyn Any| msg.downcast_ref::<M>().map(|_| 1_usize)),
            fetch: Arc::new(|_: &dyn Any, _: usize| None),
            assign: Arc::new(|_: &mut dyn Any, _: usize, _: FieldValue| false),
            resize: Arc::new(|_: &mut dyn Any, _: usize| false),
            nested: nested_fn(move |msg, index| {
                let msg = msg.downcast_ref::<M>()?;
                (index == 0).then(|| get(msg) as &dyn Any)
            }),
            nested_mut: nested_mut_fn(move |msg, index| {
                let msg = msg.downcast_mut::<M>()?;
                if index == 0 {
                    Some(get_mut(msg) as &mut dyn Any)
                } else {
                    None
                }
            }),
        }
    }

    /// Fixed-length array of nested messages `[N; LEN]`.
    pub fn message_array<M, N, G, S, const LEN: usize>(get: G, get_mut: S) -> Self
    where
        M: Any,
        N: Any,
        G: Fn(&M) -> &[N; LEN] + Copy + Send + Sync + 'static,
        S: Fn(&mut M) -> &mut [N; LEN] + Copy + Send + Sync + 'static,
    {
        Self {
            size: Arc::new(|msg: &dyn Any| msg.downcast_ref::<M>().map(|_| LEN)),
            fetch: Arc::new(|_: &dyn Any, _: usize| None),
            assign: Arc::new(|_: &mut dyn Any, _: usize, _: FieldValue| false),
            resize: Arc::new(|msg: &mut dyn Any, len: usize| {
                msg.downcast_mut::<M>().is_some() && len == LEN
            }),
            nested: nested_fn(move |msg, index| {
                let msg = msg.downcast_ref::<M>()?;
                get(msg).get(index).map(|n| n as &dyn Any)
            }),
            nested_mut: nested_mut_fn(move |msg, index| {
                let msg = msg.downcast_mut::<M>()?;
                get_mut(msg).get_mut(index).map(|n| n as &mut dyn Any)
            }),
        }
    }

    /// Sequence of nested messages `Vec<N>`.
    pub fn message_sequence<M, N, G, S>(get: G, get_mut: S) -> Self
    where
        M: Any,
        N: Any + Default,
        G: Fn(&M) -> &Vec<N> + Copy + Send + Sync + 'static,
        S: Fn(&mut M) -> &mut Vec<N> + Copy + Send + Sync + 'static,
    {
        Self {
            size: Arc::new(move |msg: &dyn Any| msg.downcast_ref::<M>().map(|m| get(m).len())),
            fetch: Arc::new(|_: &dyn Any, _: usize| None),
            assign: Arc::new(|_: &mut dyn Any, _: usize, _: FieldValue| false),
            resize: Arc::new(move |msg: &mut dyn Any, len: usize| {
                msg.downcast_mut::<M>()
                    .map(|msg| get_mut(msg).resize_with(len, N::default))
                    .is_some()
            }),
            nested: nested_fn(move |msg, index| {
                let msg = msg.downcast_ref::<M>()?;
                get(msg).get(index).map(|n| n as &dyn Any)
            }),
            nested_mut: nested_mut_fn(move |msg, index| {
                let msg = msg.downcast_mut::<M>()?;
                get_mut(msg).get_mut(index).map(|n| n as &mut dyn Any)
            }),
        }
    }

    /// Element count of the field (1 for scalars and single messages).
    pub fn size(&self, msg: &dyn Any) -> Option<usize> {
        (self.size)(msg)
    }

    pub fn fetch(&self, msg: &dyn Any, index: usize) -> Option<FieldValue> {
        (self.fetch)(msg, index)
    }

    pub fn assign(&self, msg: &mut dyn Any, index: usize, value: FieldValue) -> bool {
        (self.assign)(msg, index, value)
    }

    /// Resize a sequence; fixed arrays only accept their own length.
    pub fn resize(&self, msg: &mut dyn Any, len: usize) -> bool {
        (self.resize)(msg, len)
    }

    pub fn nested<'a>(&self, msg: &'a dyn Any, index: usize) -> Option<&'a dyn Any> {
        (self.nested)(msg, index)
    }

    pub fn nested_mut<'a>(&self, msg: &'a mut dyn Any, index: usize) -> Option<&'a mut dyn Any> {
        (self.nested_mut)(msg, index)
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor { .. }")
    }
}
