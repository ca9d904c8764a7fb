//! Forces dynamic linking of `nornspr_internal` when the `dynamic_linking` feature is enabled.

#![allow(clippy::single_component_path_imports)]

#[allow(unused_imports)]
use nornspr_internal;
