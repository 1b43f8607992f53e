//! This module defines the [`Bvh`], its construction strategies and its
//! queries.

mod build;
mod bvh_impl;
mod bvh_node;
mod insert;
mod query;

pub use build::BvhBuildConfig;
pub use bvh_impl::Bvh;
pub use bvh_node::{Node, NodeId};
