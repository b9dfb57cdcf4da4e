//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (Transport, ImageLookup).

pub mod images;
pub mod slack;
