//! Generated OpAMP protobuf message types plus a handful of hand-written
//! trait impls that prost does not produce for us.

#![allow(clippy::large_enum_variant)]

pub mod anyvalue {
    include!("anyvalue.rs");
}

pub mod opamp {
    include!("opamp.rs");
}

mod impls;

pub use anyvalue::*;
pub use opamp::*;
