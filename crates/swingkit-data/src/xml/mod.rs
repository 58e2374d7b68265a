//! Swing parameter XML interchange.
//!
//! The wire contract is fixed by the consuming engine's tooling: a
//! `<struct>` root wrapping, in order, one `size`-annotated list per
//! fixed kind name (`swingbones, spheres, ovals, ellipsoids, capsules,
//! planes, connections`), then one additional top-level list per group,
//! keyed by the group's name. Struct entries are `<struct index="i">`
//! elements; scalars are typed leaves (`float`, `int`, `sbyte`,
//! `hash40`) whose `hash` attribute carries the schema field name and
//! whose text carries the value. Empty lists serialize as self-closing
//! `size="0"` lists, never omitted.
//!
//! Any top-level tag that is not one of the seven fixed list names is a
//! group — the format's sole extension point — and round-trips into a
//! [`Group`](crate::param::Group) named after the tag with members in
//! document order.

mod reader;
mod writer;

#[cfg(test)]
mod tests;

use std::fs;
use std::path::Path;

use crate::document::Document;
use crate::error::Result;

pub use reader::from_xml;
pub use writer::to_xml;

/// Leaf element tags, one per scalar wire type.
pub(crate) mod leaf {
    pub const FLOAT: &str = "float";
    pub const INT: &str = "int";
    pub const SBYTE: &str = "sbyte";
    pub const HASH40: &str = "hash40";

    /// True for the four scalar leaf tags.
    pub fn is_leaf_tag(tag: &str) -> bool {
        matches!(tag, FLOAT | INT | SBYTE | HASH40)
    }
}

/// Schema field names shared by the reader and the writer. Both sides
/// must spell these identically or round-trips silently degrade to
/// zero-filled fields, so they live in one place.
pub(crate) mod field {
    pub const NAME: &str = "name";
    pub const START_BONENAME: &str = "start_bonename";
    pub const END_BONENAME: &str = "end_bonename";
    pub const BONENAME: &str = "bonename";

    // SwingBone
    pub const PARAMS: &str = "params";
    pub const ISSKIRT: &str = "isskirt";
    pub const ROTATEORDER: &str = "rotateorder";
    pub const CURVEROTATEX: &str = "curverotatex";
    pub const UNK: &str = "unk";

    // BoneParams
    pub const AIRRESISTANCE: &str = "airresistance";
    pub const WATERRESISTANCE: &str = "waterresistance";
    pub const MINANGLEZ: &str = "minanglez";
    pub const MAXANGLEZ: &str = "maxanglez";
    pub const MINANGLEY: &str = "minangley";
    pub const MAXANGLEY: &str = "maxangley";
    pub const COLLISIONSIZETIP: &str = "collisionsizetip";
    pub const COLLISIONSIZEROOT: &str = "collisionsizeroot";
    pub const FRICTIONRATE: &str = "frictionrate";
    pub const GOALSTRENGTH: &str = "goalstrength";
    pub const INERTIA: &str = "inertia";
    pub const LOCALGRAVITY: &str = "localgravity";
    pub const FALLSPEEDSCALE: &str = "fallspeedscale";
    pub const GROUNDHIT: &str = "groundhit";
    pub const WINDAFFECT: &str = "windaffect";
    pub const COLLISIONS: &str = "collisions";

    // Shapes
    pub const CX: &str = "cx";
    pub const CY: &str = "cy";
    pub const CZ: &str = "cz";
    pub const RADIUS: &str = "radius";
    pub const START_OFFSET_X: &str = "start_offset_x";
    pub const START_OFFSET_Y: &str = "start_offset_y";
    pub const START_OFFSET_Z: &str = "start_offset_z";
    pub const END_OFFSET_X: &str = "end_offset_x";
    pub const END_OFFSET_Y: &str = "end_offset_y";
    pub const END_OFFSET_Z: &str = "end_offset_z";
    pub const RX: &str = "rx";
    pub const RY: &str = "ry";
    pub const RZ: &str = "rz";
    pub const SX: &str = "sx";
    pub const SY: &str = "sy";
    pub const SZ: &str = "sz";
    pub const START_RADIUS: &str = "start_radius";
    pub const END_RADIUS: &str = "end_radius";
    pub const NX: &str = "nx";
    pub const NY: &str = "ny";
    pub const NZ: &str = "nz";
    pub const DISTANCE: &str = "distance";

    // Connection
    pub const LENGTH: &str = "length";
}

/// Reads and deserializes a swing parameter XML file. Blocking, no
/// retry: a failed load leaves prior state untouched.
pub fn read_file(path: impl AsRef<Path>) -> Result<Document> {
    let text = fs::read_to_string(path.as_ref())?;
    from_xml(&text)
}

/// Serializes a document and writes it to `path`.
pub fn write_file(doc: &Document, path: impl AsRef<Path>) -> Result<()> {
    let text = to_xml(doc)?;
    fs::write(path.as_ref(), text)?;
    Ok(())
}
