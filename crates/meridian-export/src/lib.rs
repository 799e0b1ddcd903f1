//! Markdown and HTML renderers for a finished [`meridian_core::Report`].
//!
//! Rendering is pure: the same report always produces the same bytes.
//! [`write_report`] is the only function here that touches the filesystem.

pub mod error;
pub mod html;
pub mod layout;
pub mod markdown;

mod writer;

pub use error::ExportError;
pub use html::render_html;
pub use layout::OutputLayout;
pub use markdown::render_markdown;
pub use writer::{write_report, WrittenFiles};
