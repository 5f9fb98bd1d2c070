//! Sample command line application built on `cascade-dispatch`.
//!
//! The engine crate routes argv through the command tree; everything
//! user-facing lives here: the tree definition in [`app`] and the
//! help/version rendering in [`help`].

pub mod app;
pub mod help;
