//! Floor-plan document model and booth-to-booth routing.
//!
//! The crate keeps an editable list of floor-plan elements (booths, labels,
//! shapes, doors, furniture) with selection, z-ordering and undo/redo, and
//! computes walking routes between two booths that steer around everything
//! else on the plan. It has no rendering or I/O of its own; a host UI or the
//! `boothmap` CLI drives it.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`editor`] | [`editor::EditorCore`]: document, route session and viewport behind one click handler |
//! | [`doc`] | Element types and the [`doc::DocStore`] with history |
//! | [`history`] | Bounded undo/redo snapshot stacks |
//! | [`session`] | Route session state machine ([`session::PathController`]) |
//! | [`grid`] | Walkability grid and rasterizer |
//! | [`path`] | A* search and polyline helpers |
//! | [`hit`] | Element lookup under a canvas or screen point |
//! | [`geom`] | Points, sizes, rectangles and the viewport transform |
//! | [`error`] | Document error type |
//! | [`consts`] | Canvas, grid and history defaults |

pub mod consts;
pub mod doc;
pub mod editor;
pub mod error;
pub mod geom;
pub mod grid;
pub mod history;
pub mod hit;
pub mod path;
pub mod session;
