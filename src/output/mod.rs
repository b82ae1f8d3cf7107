//! The CHTML output: boxes, fonts, the wrapper tree laying out a [`MmlTree`](crate::tree::MmlTree)
//! and the jax turning it into HTML elements and CSS.

pub mod bbox;
pub mod chtml;
pub mod font;
pub mod html;
pub mod wrapper;
mod wrappers;

pub use self::bbox::BBox;
pub use self::chtml::{Chtml, ChtmlOptions, Metrics};
pub use self::font::{FontData, TexFont};
pub use self::html::{CssStyles, Element, Html};
pub use self::wrapper::{WrapperId, WrapperTree};
