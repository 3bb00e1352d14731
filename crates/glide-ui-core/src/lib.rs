//! `glide-ui-core` provides the building blocks behind the `glide-ui` component catalog.
//!
//! The catalog is a design system rendered into terminal buffers: every component resolves a small
//! set of named variant options into presentation attributes, turns one data record into an
//! [`view::ItemView`], and paints that view into a `ratatui` buffer. This crate owns those shared
//! pieces so component crates stay thin.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - No async runtime: every operation completes within one call.
//! - Outward communication through returned action values; components never reach into
//!   host state.
//! - Clipboard integration is opt-in: widgets emit [`selection::SelectionAction::CopyRequested`]
//!   and the `clipboard` feature provides a logging adapter.
//!
//! ## Getting started
//!
//! Most users should depend on the facade crate `glide-ui`. Use this crate directly if you are
//! writing your own components on top of the same variant and view model.
//!
//! Useful entry points:
//! - [`variant::Recipe`]: axis mappings plus compound rules, resolved into [`variant::Attrs`].
//! - [`interaction::Interaction`]: link / action / static resolution for one record.
//! - [`view::ItemView`]: measurable, paintable description of one rendered record.
//! - [`collection::CollectionState`]: cursor and scrolling for a grid of item views.
//! - [`datagrid::view::GridView`]: virtualized 2D grid.
pub mod error;
pub mod theme;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

#[cfg(feature = "clipboard")]
pub mod clipboard;

pub mod render;
pub mod viewport;
pub mod wrapping;

pub mod interaction;
pub mod variant;

pub mod collection;
pub mod media;
pub mod view;

pub mod datagrid;
pub mod input;
pub mod keymap;
pub mod line_input;
pub mod reorder;
pub mod selection;

pub use error::Error;
pub use error::Result;
