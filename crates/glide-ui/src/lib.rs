//! `glide-ui` is a design-system component catalog for terminal UIs built on `ratatui`.
//!
//! Each component follows the same shape: a small options struct of named variant axes, an item
//! record type, and a collection wrapper that lays items out in a grid. Stateful composites (table,
//! data grid, tabs, fields) own a working copy of their data and report changes by returning
//! action values from `handle_event`.
//!
//! ## Quick start
//!
//! ```
//! use glide_ui::card::{CardCollection, CardCollectionProps, CardItem};
//! use glide_ui::theme::Theme;
//! use ratatui::buffer::Buffer;
//! use ratatui::layout::Rect;
//!
//! let mut cards = CardCollection::new(
//!     vec![
//!         CardItem::new("Ship faster").description("Deploy in minutes").href("/ship"),
//!         CardItem::new("Scale").description("Grows with you"),
//!     ],
//!     CardCollectionProps::default(),
//! );
//! let area = Rect::new(0, 0, 60, 16);
//! let mut buf = Buffer::empty(area);
//! cards.render(area, &mut buf, &Theme::default());
//! ```
//!
//! ## Features
//!
//! - `crossterm`: convert crossterm events into [`input::InputEvent`].
//! - `clipboard`: `clipboard::copy_or_log` for `CopyRequested` actions.
//! - `serde`: deserialize [`datagrid::ColumnDefinition`] and [`data::Value`].

pub use glide_ui_core::collection;
pub use glide_ui_core::error;
pub use glide_ui_core::input;
pub use glide_ui_core::interaction;
pub use glide_ui_core::keymap;
pub use glide_ui_core::line_input;
pub use glide_ui_core::reorder;
pub use glide_ui_core::render;
pub use glide_ui_core::selection;
pub use glide_ui_core::theme;
pub use glide_ui_core::variant;
pub use glide_ui_core::variant_axis;
pub use glide_ui_core::view;
pub use glide_ui_core::viewport;
pub use glide_ui_core::wrapping;

#[cfg(feature = "clipboard")]
pub use glide_ui_core::clipboard;
#[cfg(feature = "crossterm")]
pub use glide_ui_core::crossterm_input;

pub use glide_ui_core::Error;
pub use glide_ui_core::Result;

pub mod item;

pub mod big_number;
pub mod card;
pub mod list;
pub mod title;

pub mod container;
pub mod spacer;
pub mod text;

pub mod data;
pub mod datagrid;
pub mod table;

pub mod fields;
pub mod tabs;

pub mod media;
pub mod nav;
