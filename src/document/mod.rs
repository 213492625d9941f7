/*!
 * Document container and XML model.
 *
 * This module owns everything that touches the compound document itself:
 * - `package`: ZIP container codec (open/write, part ordering)
 * - `xml_model`: arena-style XML tree with byte-exact round-trip
 * - `locator`: translatable span collection in document order
 */

pub mod locator;
pub mod package;
pub mod xml_model;

pub use locator::{Span, locate_spans};
pub use package::{Package, Part, is_text_bearing};
pub use xml_model::{NodeId, XmlNode, XmlTree};
