//! Collision group generation.
//!
//! Builds one group per (chain, param) pair carrying collision
//! references, named by the chain's segment naming convention and
//! optionally repaired against the label dictionary's collision-name
//! subset.

use tracing::{debug, info, warn};

use crate::document::Document;
use crate::labels::LabelDictionary;
use crate::param::Group;

/// Counters summarizing one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupSummary {
    /// Groups created fresh.
    pub created: usize,
    /// Existing same-named groups overwritten.
    pub overwritten: usize,
    /// Candidate names replaced by their closest known collision label.
    pub repaired: usize,
    /// Params skipped because they reference no collisions.
    pub skipped: usize,
}

/// Generates collision groups for every swing bone chain in `doc`.
///
/// Per param index `i` of a chain, the candidate group name is
/// `start_bonename + "col"` for single-segment chains (start == end),
/// otherwise `start_bonename` with its last character replaced by
/// segment number `i + 1`, plus `"col"`. When `labels` holds collision
/// names and the candidate is not among them, the closest known
/// collision name is used instead.
///
/// The group's members are the param's collision references verbatim. A
/// param without collisions produces no group: an empty collision group
/// is a production fault. A same-named existing group is overwritten,
/// keeping generation idempotent.
pub fn generate_collision_groups(doc: &mut Document, labels: &LabelDictionary) -> GroupSummary {
    let mut summary = GroupSummary::default();
    let mut generated: Vec<Group> = Vec::new();

    for bone in &doc.swingbones {
        let single_segment = bone.start_bonename == bone.end_bonename;
        for (i, params) in bone.params.iter().enumerate() {
            if params.collisions.is_empty() {
                debug!(chain = %bone.name, param = i, "no collisions; skipping");
                summary.skipped += 1;
                continue;
            }

            let candidate = if single_segment {
                format!("{}col", bone.start_bonename)
            } else {
                segment_candidate(&bone.start_bonename, i + 1)
            };

            let name = repair_name(candidate, labels, &mut summary);
            generated.push(Group {
                name,
                members: params.collisions.clone(),
            });
        }
    }

    for group in generated {
        match doc.groups.iter_mut().find(|g| g.name == group.name) {
            Some(existing) => {
                debug!(group = %group.name, "overwriting existing group");
                *existing = group;
                summary.overwritten += 1;
            }
            None => {
                doc.groups.push(group);
                summary.created += 1;
            }
        }
    }

    doc.update();
    info!(
        created = summary.created,
        overwritten = summary.overwritten,
        repaired = summary.repaired,
        skipped = summary.skipped,
        "collision group generation"
    );
    summary
}

/// Candidate name for segment `n`: start bone name with its last
/// character replaced by the segment number, plus `col`.
fn segment_candidate(start_bonename: &str, n: usize) -> String {
    let mut stem = start_bonename.to_string();
    stem.pop();
    format!("{stem}{n}col")
}

fn repair_name(candidate: String, labels: &LabelDictionary, summary: &mut GroupSummary) -> String {
    let known = labels.collision_names();
    if known.is_empty() || known.iter().any(|l| *l == candidate) {
        return candidate;
    }
    match LabelDictionary::closest_in(known, &candidate, 1).first() {
        Some(best) => {
            warn!(candidate = %candidate, repaired = %best, "unknown group name repaired");
            summary.repaired += 1;
            (*best).to_string()
        }
        None => candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{BoneParams, SwingBone};
    use pretty_assertions::assert_eq;

    fn chain(name: &str, start: &str, end: &str, params: Vec<BoneParams>) -> SwingBone {
        SwingBone {
            name: name.into(),
            start_bonename: start.into(),
            end_bonename: end.into(),
            params,
            ..SwingBone::zeroed()
        }
    }

    fn params_with(collisions: &[&str]) -> BoneParams {
        BoneParams {
            collisions: collisions.iter().map(|s| s.to_string()).collect(),
            ..BoneParams::default()
        }
    }

    fn collision_labels(names: &[&str]) -> LabelDictionary {
        let mut csv = String::from("hash,label\n");
        for (i, n) in names.iter().enumerate() {
            csv.push_str(&format!("0x{i:x},{n}\n"));
        }
        LabelDictionary::from_csv_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_multi_segment_naming() {
        let mut doc = Document::new();
        doc.swingbones.push(chain(
            "s_hair",
            "s_hair1",
            "s_hair3",
            vec![
                params_with(&["headcol"]),
                params_with(&["headcol", "bustcol"]),
            ],
        ));
        let summary = generate_collision_groups(&mut doc, &LabelDictionary::new());
        assert_eq!(summary.created, 2);
        assert_eq!(doc.groups.len(), 2);
        assert_eq!(doc.groups[0].name, "s_hair1col");
        assert_eq!(doc.groups[1].name, "s_hair2col");
        assert_eq!(doc.groups[1].members, ["headcol", "bustcol"]);
    }

    #[test]
    fn test_single_segment_naming() {
        let mut doc = Document::new();
        doc.swingbones.push(chain(
            "s_bang",
            "s_bang",
            "s_bang",
            vec![params_with(&["headcol"])],
        ));
        generate_collision_groups(&mut doc, &LabelDictionary::new());
        assert_eq!(doc.groups[0].name, "s_bangcol");
    }

    #[test]
    fn test_param_without_collisions_yields_no_group() {
        let mut doc = Document::new();
        doc.swingbones.push(chain(
            "s_hair",
            "s_hair1",
            "s_hair2",
            vec![params_with(&[]), params_with(&["headcol"])],
        ));
        let summary = generate_collision_groups(&mut doc, &LabelDictionary::new());
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.created, 1);
        assert!(doc.groups.iter().all(|g| !g.members.is_empty()));
        assert_eq!(doc.groups[0].name, "s_hair2col");
    }

    #[test]
    fn test_unknown_candidate_is_repaired_to_closest_collision_label() {
        let mut doc = Document::new();
        doc.swingbones.push(chain(
            "s_hair",
            "s_hair1",
            "s_hair3",
            vec![params_with(&["headcol"])],
        ));
        // Candidate "s_hair1col" is absent; "s_haircol" is the closest
        // collision label.
        let labels = collision_labels(&["s_haircol", "headcol", "s_hair1"]);
        let summary = generate_collision_groups(&mut doc, &labels);
        assert_eq!(summary.repaired, 1);
        assert_eq!(doc.groups[0].name, "s_haircol");
    }

    #[test]
    fn test_known_candidate_is_kept_verbatim() {
        let mut doc = Document::new();
        doc.swingbones.push(chain(
            "s_hair",
            "s_hair1",
            "s_hair3",
            vec![params_with(&["headcol"])],
        ));
        let labels = collision_labels(&["s_hair1col", "s_haircol"]);
        let summary = generate_collision_groups(&mut doc, &labels);
        assert_eq!(summary.repaired, 0);
        assert_eq!(doc.groups[0].name, "s_hair1col");
    }

    #[test]
    fn test_regeneration_overwrites_same_named_group() {
        let mut doc = Document::new();
        doc.swingbones.push(chain(
            "s_hair",
            "s_hair1",
            "s_hair3",
            vec![params_with(&["headcol"])],
        ));
        generate_collision_groups(&mut doc, &LabelDictionary::new());

        doc.swingbones[0].params[0].collisions = vec!["bustcol".into()];
        let summary = generate_collision_groups(&mut doc, &LabelDictionary::new());
        assert_eq!(summary.overwritten, 1);
        assert_eq!(summary.created, 0);
        assert_eq!(doc.groups.len(), 1);
        assert_eq!(doc.groups[0].members, ["bustcol"]);
    }
}
