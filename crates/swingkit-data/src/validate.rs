//! Hash reference validation.
//!
//! Walks every hash-bearing field of a document and reports the values
//! that do not resolve against the loaded label table. Conflicts are
//! collected, never raised: a batch validation always completes.

use crate::document::Document;
use crate::labels::LabelDictionary;
use crate::param::StructKind;

/// One unresolved hash reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceConflict {
    /// Kind of the owning struct.
    pub kind: StructKind,
    /// Path to the field: owning struct name plus nested collection
    /// indices, e.g. `swingbones[s_hair].params[2].collisions[0]`.
    pub field_path: String,
    /// The unresolved hash-string.
    pub value: String,
}

/// Result of validating a document.
///
/// `NotAttempted` is distinct from an empty conflict list: with no
/// labels loaded nothing can be checked, and callers must not read that
/// as "all references resolve".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// No labels are loaded; validation did not run.
    NotAttempted,
    /// Validation ran; the list holds every unresolved reference.
    Checked(Vec<ReferenceConflict>),
}

impl ValidationOutcome {
    /// True when validation ran and found nothing.
    pub fn is_clean(&self) -> bool {
        matches!(self, ValidationOutcome::Checked(c) if c.is_empty())
    }

    /// The conflicts, empty when validation did not run.
    pub fn conflicts(&self) -> &[ReferenceConflict] {
        match self {
            ValidationOutcome::NotAttempted => &[],
            ValidationOutcome::Checked(c) => c,
        }
    }
}

struct Walker<'a> {
    labels: &'a LabelDictionary,
    conflicts: Vec<ReferenceConflict>,
}

impl<'a> Walker<'a> {
    fn check(&mut self, kind: StructKind, path: String, value: &str) {
        if !self.labels.contains(value) {
            self.conflicts.push(ReferenceConflict {
                kind,
                field_path: path,
                value: value.to_string(),
            });
        }
    }
}

/// Validates every hash-bearing field of `doc` against `labels`.
///
/// Returns [`ValidationOutcome::NotAttempted`] when no labels are
/// loaded. Every field is checked literally, empty strings included: an
/// unset reference in a document under validation is a real conflict.
pub fn validate_document(doc: &Document, labels: &LabelDictionary) -> ValidationOutcome {
    if labels.is_empty() {
        return ValidationOutcome::NotAttempted;
    }

    let mut w = Walker {
        labels,
        conflicts: Vec::new(),
    };

    for bone in &doc.swingbones {
        let base = format!("swingbones[{}]", bone.name);
        w.check(StructKind::Bone, format!("{base}.name"), &bone.name);
        w.check(
            StructKind::Bone,
            format!("{base}.start_bonename"),
            &bone.start_bonename,
        );
        w.check(
            StructKind::Bone,
            format!("{base}.end_bonename"),
            &bone.end_bonename,
        );
        for (i, params) in bone.params.iter().enumerate() {
            for (j, col) in params.collisions.iter().enumerate() {
                w.check(
                    StructKind::Bone,
                    format!("{base}.params[{i}].collisions[{j}]"),
                    col,
                );
            }
        }
    }

    for sphere in &doc.spheres {
        let base = format!("spheres[{}]", sphere.name);
        w.check(StructKind::Sphere, format!("{base}.name"), &sphere.name);
        w.check(
            StructKind::Sphere,
            format!("{base}.bonename"),
            &sphere.bonename,
        );
    }

    for oval in &doc.ovals {
        let base = format!("ovals[{}]", oval.name);
        w.check(StructKind::Oval, format!("{base}.name"), &oval.name);
        w.check(
            StructKind::Oval,
            format!("{base}.start_bonename"),
            &oval.start_bonename,
        );
        w.check(
            StructKind::Oval,
            format!("{base}.end_bonename"),
            &oval.end_bonename,
        );
    }

    for ellipsoid in &doc.ellipsoids {
        let base = format!("ellipsoids[{}]", ellipsoid.name);
        w.check(
            StructKind::Ellipsoid,
            format!("{base}.name"),
            &ellipsoid.name,
        );
        w.check(
            StructKind::Ellipsoid,
            format!("{base}.bonename"),
            &ellipsoid.bonename,
        );
    }

    for capsule in &doc.capsules {
        let base = format!("capsules[{}]", capsule.name);
        w.check(StructKind::Capsule, format!("{base}.name"), &capsule.name);
        w.check(
            StructKind::Capsule,
            format!("{base}.start_bonename"),
            &capsule.start_bonename,
        );
        w.check(
            StructKind::Capsule,
            format!("{base}.end_bonename"),
            &capsule.end_bonename,
        );
    }

    for plane in &doc.planes {
        let base = format!("planes[{}]", plane.name);
        w.check(StructKind::Plane, format!("{base}.name"), &plane.name);
        w.check(
            StructKind::Plane,
            format!("{base}.bonename"),
            &plane.bonename,
        );
    }

    for (i, conn) in doc.connections.iter().enumerate() {
        // Connections are anonymous; the path carries the index.
        let base = format!("connections[{i}]");
        w.check(
            StructKind::Connection,
            format!("{base}.start_bonename"),
            &conn.start_bonename,
        );
        w.check(
            StructKind::Connection,
            format!("{base}.end_bonename"),
            &conn.end_bonename,
        );
    }

    for group in &doc.groups {
        let base = format!("groups[{}]", group.name);
        w.check(StructKind::Group, format!("{base}.name"), &group.name);
        for (i, member) in group.members.iter().enumerate() {
            w.check(StructKind::Group, format!("{base}.members[{i}]"), member);
        }
    }

    ValidationOutcome::Checked(w.conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{BoneParams, Group, Sphere, SwingBone};
    use pretty_assertions::assert_eq;

    fn labels(names: &[&str]) -> LabelDictionary {
        let mut csv = String::from("hash,label\n");
        for (i, n) in names.iter().enumerate() {
            csv.push_str(&format!("0x{i:x},{n}\n"));
        }
        LabelDictionary::from_csv_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_not_attempted_without_labels() {
        let doc = Document::new();
        let outcome = validate_document(&doc, &LabelDictionary::new());
        assert_eq!(outcome, ValidationOutcome::NotAttempted);
        assert!(!outcome.is_clean());
    }

    #[test]
    fn test_clean_document_yields_empty_checked() {
        let mut doc = Document::new();
        doc.swingbones.push(SwingBone {
            name: "s_hair".into(),
            start_bonename: "s_hair1".into(),
            end_bonename: "s_hair2".into(),
            params: vec![BoneParams::default()],
            ..SwingBone::zeroed()
        });
        let dict = labels(&["s_hair", "s_hair1", "s_hair2"]);
        let outcome = validate_document(&doc, &dict);
        assert_eq!(outcome, ValidationOutcome::Checked(Vec::new()));
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_conflict_paths_encode_nesting() {
        let mut doc = Document::new();
        let mut bone = SwingBone {
            name: "s_hair".into(),
            start_bonename: "s_hair1".into(),
            end_bonename: "s_hair2".into(),
            params: vec![BoneParams::default(), BoneParams::default()],
            ..SwingBone::zeroed()
        };
        bone.params[1].collisions.push("bogus_col".into());
        doc.swingbones.push(bone);

        let dict = labels(&["s_hair", "s_hair1", "s_hair2"]);
        let outcome = validate_document(&doc, &dict);
        let conflicts = outcome.conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, StructKind::Bone);
        assert_eq!(
            conflicts[0].field_path,
            "swingbones[s_hair].params[1].collisions[0]"
        );
        assert_eq!(conflicts[0].value, "bogus_col");
    }

    #[test]
    fn test_every_kind_is_walked() {
        let mut doc = Document::new();
        doc.spheres.push(Sphere {
            name: "headcol".into(),
            bonename: "head".into(),
            ..Sphere::zeroed()
        });
        doc.groups.push(Group {
            name: "s_haircol".into(),
            members: vec!["headcol".into(), "ghost".into()],
        });

        let dict = labels(&["headcol", "head", "s_haircol"]);
        let outcome = validate_document(&doc, &dict);
        let conflicts = outcome.conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, StructKind::Group);
        assert_eq!(conflicts[0].field_path, "groups[s_haircol].members[1]");
    }

    #[test]
    fn test_empty_reference_is_a_conflict() {
        let mut doc = Document::new();
        doc.connections.push(crate::param::Connection::zeroed());
        let dict = labels(&["s_hair"]);
        let outcome = validate_document(&doc, &dict);
        assert_eq!(outcome.conflicts().len(), 2);
        assert_eq!(
            outcome.conflicts()[0].field_path,
            "connections[0].start_bonename"
        );
    }
}
