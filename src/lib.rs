//! Enumerate and search for common unfoldings ("nets") of rectangular boxes.
//!
//! A net is a way of cutting a box's surface along a spanning tree of its
//! face-adjacency graph so the whole surface unfolds flat without overlap.
//! This crate builds that face graph ([`box_graph`]), enumerates every
//! spanning tree of it ([`spanning_tree`]), unfolds each one into a
//! canonical bitmap ([`net`]), and checks whether a bitmap can be folded
//! back onto one or more target boxes ([`validator`]). [`worker`] drives
//! both the exhaustive and heuristic search modes that the two binaries in
//! this workspace expose.

pub mod box_graph;
pub mod config;
pub mod dims;
pub mod error;
pub mod net;
pub mod spanning_tree;
pub mod validator;
pub mod worker;

pub use config::Config;
pub use dims::Dimensions;
pub use error::{BoxNetError, Result};
