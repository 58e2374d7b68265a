//! Cross-document struct transfer.
//!
//! Every transfer deep-copies out of the source document; the source is
//! never mutated. Copies land detached from any visualization object,
//! since visuals belong to the document they were created for.

use tracing::{debug, info};

use crate::document::Document;
use crate::error::{Result, SwingError};
use crate::param::{Connection, StructKind};

/// Deep-copies one struct of `kind` at `index` from `source` into a new
/// entry appended to `target`.
///
/// # Errors
///
/// Returns [`SwingError::NotFound`] when `index` is out of range.
pub fn transfer_struct(
    target: &mut Document,
    source: &Document,
    kind: StructKind,
    index: usize,
) -> Result<()> {
    if index >= source.len(kind) {
        return Err(SwingError::NotFound(format!(
            "{kind} index {index} (source has {})",
            source.len(kind)
        )));
    }
    match kind {
        StructKind::Bone => target.swingbones.push(source.swingbones[index].clone()),
        StructKind::Sphere => {
            let mut s = source.spheres[index].clone();
            s.visual = None;
            target.spheres.push(s);
        }
        StructKind::Oval => {
            let mut o = source.ovals[index].clone();
            o.visual = None;
            target.ovals.push(o);
        }
        StructKind::Ellipsoid => {
            let mut e = source.ellipsoids[index].clone();
            e.visual = None;
            target.ellipsoids.push(e);
        }
        StructKind::Capsule => {
            let mut c = source.capsules[index].clone();
            c.visual = None;
            target.capsules.push(c);
        }
        StructKind::Plane => {
            let mut p = source.planes[index].clone();
            p.visual = None;
            target.planes.push(p);
        }
        StructKind::Connection => target.connections.push(source.connections[index].clone()),
        StructKind::Group => target.groups.push(source.groups[index].clone()),
    }
    target.update();
    Ok(())
}

/// Copies one connection, de-duplicated on the unordered endpoint pair:
/// a no-op when `target` already holds a connection between the same
/// two bones in either direction. Returns whether a copy was made.
///
/// # Errors
///
/// Returns [`SwingError::NotFound`] when `index` is out of range.
pub fn transfer_connection(
    target: &mut Document,
    source: &Document,
    index: usize,
) -> Result<bool> {
    let conn = source.connections.get(index).ok_or_else(|| {
        SwingError::NotFound(format!(
            "connection index {index} (source has {})",
            source.connections.len()
        ))
    })?;
    Ok(push_connection_unique(target, conn))
}

fn push_connection_unique(target: &mut Document, conn: &Connection) -> bool {
    if target
        .connections
        .iter()
        .any(|c| c.same_endpoints(conn))
    {
        debug!(
            start = %conn.start_bonename,
            end = %conn.end_bonename,
            "connection already present; skipping"
        );
        return false;
    }
    target.connections.push(conn.clone());
    target.update();
    true
}

/// Transfers every source connection whose start and/or end bone name
/// (per the check flags) contains `pattern` as a substring, each
/// de-duplicated on the unordered endpoint pair. Returns the number of
/// connections copied. With both flags false nothing matches.
pub fn transfer_connection_pattern(
    target: &mut Document,
    source: &Document,
    pattern: &str,
    check_start: bool,
    check_end: bool,
) -> usize {
    let mut copied = 0;
    for conn in &source.connections {
        let hit = (check_start && conn.start_bonename.contains(pattern))
            || (check_end && conn.end_bonename.contains(pattern));
        if hit && push_connection_unique(target, conn) {
            copied += 1;
        }
    }
    info!(pattern, copied, "connection pattern transfer");
    copied
}

/// Transfers the swing bone chain named `chain_name` from `source` into
/// `target`, overwriting a same-named target chain or appending a new
/// one. BoneParams order is preserved verbatim.
///
/// With `transfer_shapes` set, also pulls the chain's collision
/// dependencies across first: the collision names referenced by the
/// chain's params select the source groups referencing any of them, and
/// those groups select the shapes they reference. Only names absent
/// from `target` are copied, groups before shapes. The closure is one
/// hop deep by design; the schema has no group-in-group references, so
/// nothing reachable is missed.
///
/// # Errors
///
/// Returns [`SwingError::NotFound`] when `source` has no chain named
/// `chain_name`.
pub fn transfer_swing_bone(
    target: &mut Document,
    source: &Document,
    chain_name: &str,
    transfer_shapes: bool,
) -> Result<()> {
    let src_index = source
        .find(StructKind::Bone, chain_name, false)
        .ok_or_else(|| SwingError::NotFound(format!("swing bone chain '{chain_name}'")))?;
    let chain = &source.swingbones[src_index];

    if transfer_shapes {
        transfer_chain_dependencies(target, source, src_index);
    }

    match target.find(StructKind::Bone, chain_name, false) {
        Some(i) => {
            info!(chain = chain_name, "overwriting existing target chain");
            target.swingbones[i] = chain.clone();
        }
        None => target.swingbones.push(chain.clone()),
    }
    target.update();
    Ok(())
}

fn transfer_chain_dependencies(target: &mut Document, source: &Document, src_index: usize) {
    let chain = &source.swingbones[src_index];

    // Hop 1: collision names the chain's params reference.
    let collisions: Vec<&str> = chain
        .params
        .iter()
        .flat_map(|p| p.collisions.iter().map(String::as_str))
        .collect();

    // Hop 2: source groups involved with any of those collisions. In
    // the usual data shape a param's collision reference names a group
    // outright; a group can also bundle a referenced shape as a member.
    let groups: Vec<&crate::param::Group> = source
        .groups
        .iter()
        .filter(|g| {
            collisions.contains(&g.name.as_str())
                || g.members.iter().any(|m| collisions.contains(&m.as_str()))
        })
        .collect();

    // Hop 3: shape names those groups reference. The group name itself
    // is a collision name too and may directly name a shape.
    let mut shape_names: Vec<&str> = Vec::new();
    for group in &groups {
        for member in &group.members {
            if !shape_names.contains(&member.as_str()) {
                shape_names.push(member);
            }
        }
    }
    for col in &collisions {
        if !shape_names.contains(col) {
            shape_names.push(col);
        }
    }

    // Groups before shapes, each only when the target lacks the name.
    for group in groups {
        if target.find(StructKind::Group, &group.name, true).is_none() {
            debug!(group = %group.name, "transferring group");
            target.groups.push(group.clone());
        }
    }
    for name in shape_names {
        if target.find_shape(name).is_some() {
            continue;
        }
        let Some((kind, i)) = source.find_shape(name) else {
            continue;
        };
        debug!(shape = name, %kind, "transferring shape");
        match kind {
            StructKind::Sphere => {
                let mut s = source.spheres[i].clone();
                s.visual = None;
                target.spheres.push(s);
            }
            StructKind::Oval => {
                let mut o = source.ovals[i].clone();
                o.visual = None;
                target.ovals.push(o);
            }
            StructKind::Ellipsoid => {
                let mut e = source.ellipsoids[i].clone();
                e.visual = None;
                target.ellipsoids.push(e);
            }
            StructKind::Capsule => {
                let mut c = source.capsules[i].clone();
                c.visual = None;
                target.capsules.push(c);
            }
            StructKind::Plane => {
                let mut p = source.planes[i].clone();
                p.visual = None;
                target.planes.push(p);
            }
            _ => {}
        }
    }
    target.update();
}
