// SPDX-License-Identifier: MPL-2.0
//! `case_designer` composes custom phone-case designs.
//!
//! A customer picks a product, the matching template is sized onto a stage,
//! their photo is placed on top (clipped to the template silhouette and kept
//! covering the canvas) and the result is flattened into a PNG that travels
//! inside a cart line item.
//!
//! The [`session::DesignSession`] state machine ties the pieces together;
//! [`session::Designer`] drives it from async code.

#![doc(html_root_url = "https://docs.rs/case_designer/0.3.0")]

pub mod cart;
pub mod catalog;
pub mod compositor;
pub mod config;
pub mod domain;
pub mod error;
pub mod media;
pub mod session;

#[cfg(test)]
pub(crate) mod test_utils;
