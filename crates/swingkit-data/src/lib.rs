//! Swing Parameter Data Library
//!
//! This crate provides the data model, XML interchange, and label
//! tooling for a game's swing bone physics parameters: the secondary
//! motion chains (hair, cloth, tails) and the collision geometry they
//! interact with.
//!
//! # Overview
//!
//! A [`Document`] holds one ordered collection per struct kind:
//!
//! - **SwingBone**: a chain with per-segment simulation params
//! - **Shapes**: spheres, ovals, ellipsoids, capsules, planes
//! - **Connection**: inter-chain constraints
//! - **Group**: named collision reference lists
//!
//! Documents round-trip through the engine's XML dialect with exact
//! structural fidelity, including entry order and the per-segment
//! params order the simulation depends on. Bone names are 40-bit hash
//! references in the engine; here they are carried as label strings and
//! checked on demand against a CSV-loaded [`LabelDictionary`].
//!
//! # Example
//!
//! ```
//! use swingkit_data::{Document, StructKind, to_xml, from_xml};
//!
//! let mut doc = Document::new();
//! doc.add(StructKind::Sphere, false);
//! doc.spheres[0].name = "headcol".to_string();
//! doc.spheres[0].radius = 3.5;
//!
//! let xml = to_xml(&doc).unwrap();
//! let parsed = from_xml(&xml).unwrap();
//! assert_eq!(parsed, doc);
//! ```
//!
//! # Modules
//!
//! - [`param`]: struct kinds and their field schemas
//! - [`document`]: per-document storage, selection, and queries
//! - [`xml`]: serializer and deserializer for the wire dialect
//! - [`labels`]: hash-label dictionary and closest-label lookup
//! - [`validate`]: hash reference validation
//! - [`transfer`]: cross-document struct transfer
//! - [`groups`]: collision group generation
//! - [`registry`]: open-document registry and shared label state
//! - [`viz`]: visualization sink seam for host editors

pub mod document;
pub mod error;
pub mod groups;
pub mod labels;
pub mod param;
pub mod registry;
pub mod transfer;
pub mod validate;
pub mod viz;
pub mod xml;

// Re-export commonly used types at the crate root
pub use document::{Document, MoveDir};
pub use error::{Result, SwingError};
pub use groups::{generate_collision_groups, GroupSummary};
pub use labels::LabelDictionary;
pub use param::{
    BoneParams, Capsule, Connection, Ellipsoid, Group, Oval, Plane, Sphere, StructKind, SwingBone,
};
pub use registry::Registry;
pub use transfer::{
    transfer_connection, transfer_connection_pattern, transfer_struct, transfer_swing_bone,
};
pub use validate::{validate_document, ReferenceConflict, ValidationOutcome};
pub use viz::{NullSink, VisualId, VisualSink};
pub use xml::{from_xml, read_file, to_xml, write_file};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Load, generate, validate, transfer: the full editing flow.
    #[test]
    fn test_end_to_end_editing_flow() {
        let xml = r#"<struct>
  <swingbones size="1">
    <struct index="0">
      <hash40 hash="name">s_hair</hash40>
      <hash40 hash="start_bonename">s_hair1</hash40>
      <hash40 hash="end_bonename">s_hair2</hash40>
      <params size="2">
        <struct index="0">
          <float hash="airresistance">1.5</float>
          <collisions size="1">
            <hash40 index="0">headcol</hash40>
          </collisions>
        </struct>
        <struct index="1">
          <collisions size="0"/>
        </struct>
      </params>
      <sbyte hash="isskirt">0</sbyte>
      <int hash="rotateorder">0</int>
      <sbyte hash="curverotatex">0</sbyte>
      <sbyte hash="unk">0</sbyte>
    </struct>
  </swingbones>
  <spheres size="1">
    <struct index="0">
      <hash40 hash="name">headcol</hash40>
      <hash40 hash="bonename">head</hash40>
      <float hash="cx">0</float>
      <float hash="cy">0</float>
      <float hash="cz">0</float>
      <float hash="radius">2</float>
    </struct>
  </spheres>
</struct>"#;
        let mut doc = from_xml(xml).unwrap();
        assert_eq!(doc.swingbones[0].params.len(), 2);
        assert_eq!(doc.swingbones[0].params[0].airresistance, 1.5);

        // Generate groups: only the param with collisions yields one.
        let summary = generate_collision_groups(&mut doc, &LabelDictionary::new());
        assert_eq!(summary.created, 1);
        assert_eq!(doc.groups[0].name, "s_hair1col");

        // Validate against a table missing the generated group name.
        let csv = "hash,label\n0x1,s_hair\n0x2,s_hair1\n0x3,s_hair2\n0x4,headcol\n0x5,head\n";
        let labels = LabelDictionary::from_csv_reader(csv.as_bytes()).unwrap();
        let outcome = validate_document(&doc, &labels);
        let values: Vec<&str> = outcome.conflicts().iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["s_hair1col"]);

        // Transfer the chain with its shape closure into a fresh doc.
        let mut other = Document::new();
        transfer::transfer_swing_bone(&mut other, &doc, "s_hair", true).unwrap();
        assert_eq!(other.swingbones.len(), 1);
        assert_eq!(other.spheres.len(), 1);

        // And the result still round-trips.
        let reparsed = from_xml(&to_xml(&other).unwrap()).unwrap();
        assert_eq!(reparsed, other);
    }
}
