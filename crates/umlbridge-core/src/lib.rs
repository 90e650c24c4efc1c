//! umlbridge Core Types and Definitions
//!
//! This crate provides the vocabulary shared by the umlbridge parser, layout
//! engine and serializer. It includes:
//!
//! - **Identifiers**: String-interned alias identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Integer diagram geometry ([`geometry`] module)
//! - **Model**: UML model elements and relationships ([`model`] module)
//! - **View**: Diagrams, views and relationship views ([`view`] module)
//! - **Store**: Collaborator traits and an in-memory workspace ([`store`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod model;
pub mod store;
pub mod view;
