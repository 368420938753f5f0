//! Datatype model for ezy.
//!
//! A `Datatype` pairs a base type with nullability/pointer/const flags and,
//! for compound bases, a single extension payload (array/struct/union/
//! function descriptor). Only one extension is ever meaningful for a given
//! base; `DatatypeExt` encodes that as a Rust enum instead of the source's
//! tagged union over raw pointers.

/// Base type, mirroring the source language's closed set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Base {
    Invalid,
    Void,
    Null,
    Var,
    /// Sentinel meaning "derive this from the initializer"; valid only in
    /// the pre-transpile AST (see `Datatype::is_infer`).
    Infer,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Bool,
    Char,
    String,
    Array,
    Struct,
    Union,
    Function,
}

/// Descriptor for a compound base type. Reserved for `struct`/`union`/array
/// types, which the parser recognizes but does not fully implement (see
/// `parser.rs`); kept as a distinct type so adding real descriptors later
/// doesn't disturb `Datatype`'s shape.
#[derive(Debug, Clone, PartialEq)]
pub enum DatatypeExt {
    None,
    Array { element: Box<Datatype>, length: Option<usize> },
    Struct { field_names: Vec<String>, field_types: Vec<Datatype> },
    Union { variant_types: Vec<Datatype> },
    Function { params: Vec<Datatype>, ret: Box<Datatype> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Datatype {
    pub base: Base,
    pub nullable: bool,
    pub is_ptr: bool,
    pub is_const: bool,
    pub ext: DatatypeExt,
}

impl Datatype {
    pub fn simple(base: Base) -> Self {
        Datatype {
            base,
            nullable: false,
            is_ptr: false,
            is_const: false,
            ext: DatatypeExt::None,
        }
    }

    pub fn infer() -> Self {
        Self::simple(Base::Infer)
    }

    pub fn is_infer(&self) -> bool {
        self.base == Base::Infer
    }

    /// The C type spelling for this datatype, per the transpiler's mapping
    /// table (see `transpiler.rs`). `None` for bases the transpiler does not
    /// know how to emit (struct/union/array/function extensions, which
    /// remain reserved-but-stubbed per spec).
    pub fn c_type(&self) -> Option<String> {
        let base = match self.base {
            Base::Int8 => "int8_t",
            Base::Int16 => "int16_t",
            Base::Int32 => "int32_t",
            Base::Int64 => "int64_t",
            Base::Uint8 => "uint8_t",
            Base::Uint16 => "uint16_t",
            Base::Uint32 => "uint32_t",
            Base::Uint64 => "uint64_t",
            Base::Float32 => "float",
            Base::Float64 => "double",
            Base::Bool => "bool",
            Base::Char => "char",
            Base::String => "char*",
            Base::Void => "void",
            _ => return None,
        };
        let mut out = String::new();
        if self.is_const {
            out.push_str("const ");
        }
        out.push_str(base);
        if self.is_ptr {
            out.push_str(" *");
        }
        Some(out)
    }
}
