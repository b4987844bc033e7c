//! SVG chart rendering. The charts are value-configured (no ambient
//! global style): construct a chart struct, then `render` to an
//! in-memory document or `save` to a file.

pub mod axes;
pub mod histogram;
pub mod theme;
pub mod timeline;
