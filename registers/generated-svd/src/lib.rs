// Licensed under the Apache-2.0 license

//! Register accessors generated from `demo.svd` at build time.

pub mod demo {
    include!(concat!(env!("OUT_DIR"), "/demo.rs"));
}
