//! Per-document struct store.
//!
//! A [`Document`] owns one ordered collection per [`StructKind`] plus a
//! per-kind active index used by editing front ends. All mutation goes
//! through the command-style operations here; names are not required to
//! be unique within a kind and lookups return the first match.

use tracing::debug;

use crate::param::{
    BoneParams, Capsule, Connection, Ellipsoid, Group, Oval, Plane, Sphere, StructKind, SwingBone,
};
use crate::viz::{VisualId, VisualSink};

/// Direction for [`Document::move_active`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDir {
    /// One slot towards the front, wrapping to the back from slot 0.
    Up,
    /// One slot towards the back, wrapping to the front from the last slot.
    Down,
    /// Straight to the front.
    Top,
    /// Straight to the back.
    Bottom,
}

/// One swing parameter document: typed collections plus active-index
/// bookkeeping per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub swingbones: Vec<SwingBone>,
    pub spheres: Vec<Sphere>,
    pub ovals: Vec<Oval>,
    pub ellipsoids: Vec<Ellipsoid>,
    pub capsules: Vec<Capsule>,
    pub planes: Vec<Plane>,
    pub connections: Vec<Connection>,
    pub groups: Vec<Group>,
    active: [usize; StructKind::COUNT],
}

fn insert_entry<T: Clone + Default>(list: &mut Vec<T>, active: usize, copy_active: bool) -> usize {
    if copy_active && !list.is_empty() {
        let idx = active.min(list.len() - 1);
        let copy = list[idx].clone();
        list.insert(idx + 1, copy);
        idx + 1
    } else {
        list.push(T::default());
        list.len() - 1
    }
}

fn relocate<T>(list: &mut [T], from: usize, to: usize) {
    // Relocation, not a swap: Up from slot 0 rotates the entry to the
    // back and shifts everything else forward by one.
    if from < to {
        list[from..=to].rotate_left(1);
    } else {
        list[to..=from].rotate_right(1);
    }
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of structs of `kind`.
    pub fn len(&self, kind: StructKind) -> usize {
        match kind {
            StructKind::Bone => self.swingbones.len(),
            StructKind::Sphere => self.spheres.len(),
            StructKind::Oval => self.ovals.len(),
            StructKind::Ellipsoid => self.ellipsoids.len(),
            StructKind::Capsule => self.capsules.len(),
            StructKind::Plane => self.planes.len(),
            StructKind::Connection => self.connections.len(),
            StructKind::Group => self.groups.len(),
        }
    }

    /// True when the document holds no structs of any kind.
    pub fn is_empty(&self) -> bool {
        StructKind::all().iter().all(|k| self.len(*k) == 0)
    }

    /// Active index for `kind`, clamped to the current list. `None` when
    /// the list is empty.
    pub fn active_index(&self, kind: StructKind) -> Option<usize> {
        let len = self.len(kind);
        if len == 0 {
            None
        } else {
            Some(self.active[kind.index()].min(len - 1))
        }
    }

    /// Sets the active index for `kind`, clamping into `[0, len-1]`.
    pub fn set_active(&mut self, kind: StructKind, index: usize) {
        let len = self.len(kind);
        self.active[kind.index()] = if len == 0 { 0 } else { index.min(len - 1) };
    }

    /// Appends a default struct of `kind`, or, with `copy_active` and a
    /// non-empty list, inserts a deep copy immediately after the active
    /// entry (name copied verbatim; duplicates are allowed). The new
    /// entry becomes active. Returns its index.
    ///
    /// Copies of shapes never inherit the source's visualization handle:
    /// that handle is non-owning and belongs to the original.
    pub fn add(&mut self, kind: StructKind, copy_active: bool) -> usize {
        let active = self.active[kind.index()];
        let idx = match kind {
            StructKind::Bone => insert_entry(&mut self.swingbones, active, copy_active),
            StructKind::Sphere => insert_entry(&mut self.spheres, active, copy_active),
            StructKind::Oval => insert_entry(&mut self.ovals, active, copy_active),
            StructKind::Ellipsoid => insert_entry(&mut self.ellipsoids, active, copy_active),
            StructKind::Capsule => insert_entry(&mut self.capsules, active, copy_active),
            StructKind::Plane => insert_entry(&mut self.planes, active, copy_active),
            StructKind::Connection => insert_entry(&mut self.connections, active, copy_active),
            StructKind::Group => insert_entry(&mut self.groups, active, copy_active),
        };
        self.detach_visual(kind, idx);
        self.active[kind.index()] = idx;
        idx
    }

    /// Removes the struct at `index` (the active one when `None`).
    /// Shape removal releases the shape's visualization object through
    /// `sink`. Returns false when there is nothing to remove.
    pub fn remove(
        &mut self,
        kind: StructKind,
        index: Option<usize>,
        sink: &mut dyn VisualSink,
    ) -> bool {
        let len = self.len(kind);
        if len == 0 {
            return false;
        }
        let idx = match index {
            Some(i) if i < len => i,
            Some(_) => return false,
            None => self.active[kind.index()].min(len - 1),
        };
        if let Some(id) = self.take_visual(kind, idx) {
            sink.release(id);
        }
        match kind {
            StructKind::Bone => {
                self.swingbones.remove(idx);
            }
            StructKind::Sphere => {
                self.spheres.remove(idx);
            }
            StructKind::Oval => {
                self.ovals.remove(idx);
            }
            StructKind::Ellipsoid => {
                self.ellipsoids.remove(idx);
            }
            StructKind::Capsule => {
                self.capsules.remove(idx);
            }
            StructKind::Plane => {
                self.planes.remove(idx);
            }
            StructKind::Connection => {
                self.connections.remove(idx);
            }
            StructKind::Group => {
                self.groups.remove(idx);
            }
        }
        self.clamp_active(kind);
        true
    }

    /// Moves the active struct of `kind`. Up/Down rotate circularly with
    /// wraparound; Top/Bottom relocate to the list ends. The moved entry
    /// stays active. Returns its new index, or `None` on an empty list.
    pub fn move_active(&mut self, kind: StructKind, dir: MoveDir) -> Option<usize> {
        let len = self.len(kind);
        if len == 0 {
            return None;
        }
        let from = self.active[kind.index()].min(len - 1);
        let to = match dir {
            MoveDir::Up => {
                if from == 0 {
                    len - 1
                } else {
                    from - 1
                }
            }
            MoveDir::Down => {
                if from + 1 == len {
                    0
                } else {
                    from + 1
                }
            }
            MoveDir::Top => 0,
            MoveDir::Bottom => len - 1,
        };
        if from != to {
            match kind {
                StructKind::Bone => relocate(&mut self.swingbones, from, to),
                StructKind::Sphere => relocate(&mut self.spheres, from, to),
                StructKind::Oval => relocate(&mut self.ovals, from, to),
                StructKind::Ellipsoid => relocate(&mut self.ellipsoids, from, to),
                StructKind::Capsule => relocate(&mut self.capsules, from, to),
                StructKind::Plane => relocate(&mut self.planes, from, to),
                StructKind::Connection => relocate(&mut self.connections, from, to),
                StructKind::Group => relocate(&mut self.groups, from, to),
            }
        }
        self.active[kind.index()] = to;
        Some(to)
    }

    /// Name of the struct at `index`, if the kind carries one.
    /// Connections are anonymous.
    pub fn entry_name(&self, kind: StructKind, index: usize) -> Option<&str> {
        match kind {
            StructKind::Bone => self.swingbones.get(index).map(|s| s.name.as_str()),
            StructKind::Sphere => self.spheres.get(index).map(|s| s.name.as_str()),
            StructKind::Oval => self.ovals.get(index).map(|s| s.name.as_str()),
            StructKind::Ellipsoid => self.ellipsoids.get(index).map(|s| s.name.as_str()),
            StructKind::Capsule => self.capsules.get(index).map(|s| s.name.as_str()),
            StructKind::Plane => self.planes.get(index).map(|s| s.name.as_str()),
            StructKind::Connection => None,
            StructKind::Group => self.groups.get(index).map(|g| g.name.as_str()),
        }
    }

    /// First struct of `kind` whose name matches, or `None`. Connections
    /// never match (they are anonymous).
    pub fn find(&self, kind: StructKind, name: &str, case_sensitive: bool) -> Option<usize> {
        (0..self.len(kind)).find(|&i| {
            self.entry_name(kind, i).is_some_and(|n| {
                if case_sensitive {
                    n == name
                } else {
                    n.eq_ignore_ascii_case(name)
                }
            })
        })
    }

    /// Removes every struct of every kind, releasing shape
    /// visualization objects through `sink`.
    pub fn clear(&mut self, sink: &mut dyn VisualSink) {
        for kind in [
            StructKind::Sphere,
            StructKind::Oval,
            StructKind::Ellipsoid,
            StructKind::Capsule,
            StructKind::Plane,
        ] {
            for idx in 0..self.len(kind) {
                if let Some(id) = self.take_visual(kind, idx) {
                    sink.release(id);
                }
            }
        }
        self.swingbones.clear();
        self.spheres.clear();
        self.ovals.clear();
        self.ellipsoids.clear();
        self.capsules.clear();
        self.planes.clear();
        self.connections.clear();
        self.groups.clear();
        self.active = [0; StructKind::COUNT];
    }

    /// Re-clamps every active index after external mutation of the
    /// public collections.
    pub fn update(&mut self) {
        for kind in StructKind::all() {
            self.clamp_active(*kind);
        }
    }

    fn clamp_active(&mut self, kind: StructKind) {
        let len = self.len(kind);
        let a = &mut self.active[kind.index()];
        *a = if len == 0 { 0 } else { (*a).min(len - 1) };
    }

    /// Attaches an externally created visualization handle to a shape.
    /// Returns false when `kind` is not a shape or `index` is out of
    /// bounds.
    pub fn attach_visual(&mut self, kind: StructKind, index: usize, id: VisualId) -> bool {
        match self.visual_slot(kind, index) {
            Some(slot) => {
                *slot = Some(id);
                true
            }
            None => false,
        }
    }

    fn detach_visual(&mut self, kind: StructKind, index: usize) {
        if let Some(slot) = self.visual_slot(kind, index) {
            *slot = None;
        }
    }

    fn take_visual(&mut self, kind: StructKind, index: usize) -> Option<VisualId> {
        self.visual_slot(kind, index).and_then(|slot| slot.take())
    }

    fn visual_slot(&mut self, kind: StructKind, index: usize) -> Option<&mut Option<VisualId>> {
        match kind {
            StructKind::Sphere => self.spheres.get_mut(index).map(|s| &mut s.visual),
            StructKind::Oval => self.ovals.get_mut(index).map(|s| &mut s.visual),
            StructKind::Ellipsoid => self.ellipsoids.get_mut(index).map(|s| &mut s.visual),
            StructKind::Capsule => self.capsules.get_mut(index).map(|s| &mut s.visual),
            StructKind::Plane => self.planes.get_mut(index).map(|s| &mut s.visual),
            _ => None,
        }
    }

    /// First shape of any kind whose name matches, case-insensitively.
    pub fn find_shape(&self, name: &str) -> Option<(StructKind, usize)> {
        for kind in [
            StructKind::Sphere,
            StructKind::Oval,
            StructKind::Ellipsoid,
            StructKind::Capsule,
            StructKind::Plane,
        ] {
            if let Some(idx) = self.find(kind, name, false) {
                return Some((kind, idx));
            }
        }
        None
    }

    /// Per-segment bone names for a chain.
    ///
    /// When `start_bonename` ends in a decimal digit the chain is
    /// multi-segment and segment `i` is named `stem + (digit + i)`.
    /// Otherwise the chain is a single segment named by the literal
    /// start/end pair (one name when they coincide).
    pub fn calc_param_names(bone: &SwingBone) -> Vec<String> {
        let start = bone.start_bonename.as_str();
        if let Some(last) = start.chars().last().filter(|c| c.is_ascii_digit()) {
            let stem = &start[..start.len() - last.len_utf8()];
            let first = last.to_digit(10).unwrap_or(0);
            return (0..bone.params.len())
                .map(|i| format!("{}{}", stem, first + i as u32))
                .collect();
        }
        if bone.start_bonename == bone.end_bonename {
            vec![bone.start_bonename.clone()]
        } else {
            vec![bone.start_bonename.clone(), bone.end_bonename.clone()]
        }
    }

    /// Resolves an arbitrary bone name to `(chain index, param index)`,
    /// case-insensitively. This is the address-resolution primitive
    /// behind every per-bone operation; a miss is a normal `None`.
    pub fn find_bone_params_by_name(&self, name: &str) -> Option<(usize, usize)> {
        for (bone_idx, bone) in self.swingbones.iter().enumerate() {
            if bone.params.is_empty() {
                continue;
            }
            let names = Self::calc_param_names(bone);
            if let Some(pos) = names.iter().position(|n| n.eq_ignore_ascii_case(name)) {
                let param_idx = pos.min(bone.params.len() - 1);
                debug!(chain = %bone.name, bone = name, segment = param_idx, "resolved bone name");
                return Some((bone_idx, param_idx));
            }
        }
        None
    }

    /// Resolves a bone name to the owning chain and its segment params.
    pub fn bone_params(&self, name: &str) -> Option<(&SwingBone, &BoneParams)> {
        let (bone_idx, param_idx) = self.find_bone_params_by_name(name)?;
        let bone = &self.swingbones[bone_idx];
        Some((bone, &bone.params[param_idx]))
    }
}
