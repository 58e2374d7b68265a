//! Swing parameter data model.
//!
//! The closed set of struct kinds the interchange format knows about,
//! and the typed structs behind each kind. All bone references and names
//! are hash-strings: opaque engine identifiers carried as text and
//! resolved offline against a label table (see [`crate::labels`]).
//!
//! `Default` impls seed newly created entries with neutral simulation
//! values the way the source editor does; the deserializer instead
//! starts from [`zeroed`](BoneParams::zeroed) structs so a missing leaf
//! recovers to the field's zero value, not an editing default.

use crate::viz::VisualId;

/// The closed set of struct kinds in a swing parameter document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructKind {
    /// A physics-driven bone chain (`swingbones` list).
    Bone,
    /// Sphere collision shape.
    Sphere,
    /// Oval collision shape (sphere pair swept between two bones).
    Oval,
    /// Ellipsoid collision shape.
    Ellipsoid,
    /// Capsule collision shape.
    Capsule,
    /// Infinite plane collision shape.
    Plane,
    /// Chain-to-chain collision connection.
    Connection,
    /// Named batch of hash-string references.
    Group,
}

impl StructKind {
    /// Number of struct kinds.
    pub const COUNT: usize = 8;

    /// All kinds, in document order.
    pub fn all() -> &'static [StructKind] {
        &[
            StructKind::Bone,
            StructKind::Sphere,
            StructKind::Oval,
            StructKind::Ellipsoid,
            StructKind::Capsule,
            StructKind::Plane,
            StructKind::Connection,
            StructKind::Group,
        ]
    }

    /// The seven kinds serialized as fixed, ordered lists. Groups are
    /// excluded: each group serializes as its own named top-level list.
    pub fn fixed() -> &'static [StructKind] {
        &StructKind::all()[..7]
    }

    /// Returns the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StructKind::Bone => "swingbone",
            StructKind::Sphere => "sphere",
            StructKind::Oval => "oval",
            StructKind::Ellipsoid => "ellipsoid",
            StructKind::Capsule => "capsule",
            StructKind::Plane => "plane",
            StructKind::Connection => "connection",
            StructKind::Group => "group",
        }
    }

    /// Wire tag of the kind's document-level list, for the seven fixed
    /// kinds. Groups have no shared list.
    pub fn list_name(&self) -> Option<&'static str> {
        match self {
            StructKind::Bone => Some("swingbones"),
            StructKind::Sphere => Some("spheres"),
            StructKind::Oval => Some("ovals"),
            StructKind::Ellipsoid => Some("ellipsoids"),
            StructKind::Capsule => Some("capsules"),
            StructKind::Plane => Some("planes"),
            StructKind::Connection => Some("connections"),
            StructKind::Group => None,
        }
    }

    /// Resolves a document-level list tag back to its kind. Any tag that
    /// is not one of the seven fixed list names is a group by contract.
    pub fn from_list_name(tag: &str) -> Option<StructKind> {
        StructKind::fixed()
            .iter()
            .copied()
            .find(|k| k.list_name() == Some(tag))
    }

    /// Position of this kind in per-kind bookkeeping arrays.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// True for the five collision shape kinds.
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            StructKind::Sphere
                | StructKind::Oval
                | StructKind::Ellipsoid
                | StructKind::Capsule
                | StructKind::Plane
        )
    }
}

impl std::fmt::Display for StructKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StructKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StructKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown struct kind: {}", s))
    }
}

/// Per-segment simulation tuning values for one chain segment.
///
/// Field order matches the wire schema and is load-bearing: segment
/// order maps to physical chain order and must survive round-trips.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneParams {
    pub airresistance: f32,
    pub waterresistance: f32,
    pub minanglez: f32,
    pub maxanglez: f32,
    pub minangley: f32,
    pub maxangley: f32,
    pub collisionsizetip: f32,
    pub collisionsizeroot: f32,
    pub frictionrate: f32,
    pub goalstrength: f32,
    pub inertia: f32,
    pub localgravity: f32,
    pub fallspeedscale: f32,
    pub groundhit: i8,
    pub windaffect: f32,
    /// Ordered collision shape/group references for this segment.
    pub collisions: Vec<String>,
}

impl BoneParams {
    /// All-zero params, the recovery value for missing input leaves.
    pub fn zeroed() -> Self {
        Self {
            airresistance: 0.0,
            waterresistance: 0.0,
            minanglez: 0.0,
            maxanglez: 0.0,
            minangley: 0.0,
            maxangley: 0.0,
            collisionsizetip: 0.0,
            collisionsizeroot: 0.0,
            frictionrate: 0.0,
            goalstrength: 0.0,
            inertia: 0.0,
            localgravity: 0.0,
            fallspeedscale: 0.0,
            groundhit: 0,
            windaffect: 0.0,
            collisions: Vec::new(),
        }
    }
}

impl Default for BoneParams {
    /// Neutral editing defaults for a freshly added segment.
    fn default() -> Self {
        Self {
            airresistance: 1.0,
            waterresistance: 1.0,
            minanglez: -45.0,
            maxanglez: 45.0,
            minangley: -45.0,
            maxangley: 45.0,
            collisionsizetip: 0.05,
            collisionsizeroot: 0.05,
            frictionrate: 1.0,
            goalstrength: 0.0,
            inertia: 0.5,
            localgravity: 1.0,
            fallspeedscale: 1.0,
            groundhit: 1,
            windaffect: 1.0,
            collisions: Vec::new(),
        }
    }
}

/// A bone chain driven by secondary physics.
#[derive(Debug, Clone, PartialEq)]
pub struct SwingBone {
    pub name: String,
    pub start_bonename: String,
    pub end_bonename: String,
    /// Per-segment params, in chain order.
    pub params: Vec<BoneParams>,
    pub isskirt: i8,
    pub rotateorder: i32,
    pub curverotatex: i8,
    /// Reserved engine field, round-tripped verbatim.
    pub unk: i8,
}

impl SwingBone {
    /// All-zero chain, the deserializer's starting point.
    pub fn zeroed() -> Self {
        Self {
            name: String::new(),
            start_bonename: String::new(),
            end_bonename: String::new(),
            params: Vec::new(),
            isskirt: 0,
            rotateorder: 0,
            curverotatex: 0,
            unk: 0,
        }
    }
}

impl Default for SwingBone {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Sphere collision shape, centered on one bone.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub name: String,
    pub bonename: String,
    pub cx: f32,
    pub cy: f32,
    pub cz: f32,
    pub radius: f32,
    /// Non-owning viewport handle, never serialized.
    pub visual: Option<VisualId>,
}

impl Sphere {
    pub fn zeroed() -> Self {
        Self {
            name: String::new(),
            bonename: String::new(),
            cx: 0.0,
            cy: 0.0,
            cz: 0.0,
            radius: 0.0,
            visual: None,
        }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            radius: 0.05,
            ..Self::zeroed()
        }
    }
}

/// Oval collision shape swept between two bones.
#[derive(Debug, Clone, PartialEq)]
pub struct Oval {
    pub name: String,
    pub start_bonename: String,
    pub end_bonename: String,
    pub radius: f32,
    pub start_offset_x: f32,
    pub start_offset_y: f32,
    pub start_offset_z: f32,
    pub end_offset_x: f32,
    pub end_offset_y: f32,
    pub end_offset_z: f32,
    /// Non-owning viewport handle, never serialized.
    pub visual: Option<VisualId>,
}

impl Oval {
    pub fn zeroed() -> Self {
        Self {
            name: String::new(),
            start_bonename: String::new(),
            end_bonename: String::new(),
            radius: 0.0,
            start_offset_x: 0.0,
            start_offset_y: 0.0,
            start_offset_z: 0.0,
            end_offset_x: 0.0,
            end_offset_y: 0.0,
            end_offset_z: 0.0,
            visual: None,
        }
    }
}

impl Default for Oval {
    fn default() -> Self {
        Self {
            radius: 0.05,
            ..Self::zeroed()
        }
    }
}

/// Ellipsoid collision shape with per-axis radius and scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipsoid {
    pub name: String,
    pub bonename: String,
    pub cx: f32,
    pub cy: f32,
    pub cz: f32,
    pub rx: f32,
    pub ry: f32,
    pub rz: f32,
    pub sx: f32,
    pub sy: f32,
    pub sz: f32,
    /// Non-owning viewport handle, never serialized.
    pub visual: Option<VisualId>,
}

impl Ellipsoid {
    pub fn zeroed() -> Self {
        Self {
            name: String::new(),
            bonename: String::new(),
            cx: 0.0,
            cy: 0.0,
            cz: 0.0,
            rx: 0.0,
            ry: 0.0,
            rz: 0.0,
            sx: 0.0,
            sy: 0.0,
            sz: 0.0,
            visual: None,
        }
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self {
            sx: 1.0,
            sy: 1.0,
            sz: 1.0,
            ..Self::zeroed()
        }
    }
}

/// Capsule collision shape between two bones with per-end offsets and radii.
#[derive(Debug, Clone, PartialEq)]
pub struct Capsule {
    pub name: String,
    pub start_bonename: String,
    pub end_bonename: String,
    pub start_offset_x: f32,
    pub start_offset_y: f32,
    pub start_offset_z: f32,
    pub end_offset_x: f32,
    pub end_offset_y: f32,
    pub end_offset_z: f32,
    pub start_radius: f32,
    pub end_radius: f32,
    /// Non-owning viewport handle, never serialized.
    pub visual: Option<VisualId>,
}

impl Capsule {
    pub fn zeroed() -> Self {
        Self {
            name: String::new(),
            start_bonename: String::new(),
            end_bonename: String::new(),
            start_offset_x: 0.0,
            start_offset_y: 0.0,
            start_offset_z: 0.0,
            end_offset_x: 0.0,
            end_offset_y: 0.0,
            end_offset_z: 0.0,
            start_radius: 0.0,
            end_radius: 0.0,
            visual: None,
        }
    }
}

impl Default for Capsule {
    fn default() -> Self {
        Self {
            start_radius: 0.05,
            end_radius: 0.05,
            ..Self::zeroed()
        }
    }
}

/// Infinite plane collision shape anchored to one bone.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub name: String,
    pub bonename: String,
    pub nx: f32,
    pub ny: f32,
    pub nz: f32,
    pub distance: f32,
    /// Non-owning viewport handle, never serialized.
    pub visual: Option<VisualId>,
}

impl Plane {
    pub fn zeroed() -> Self {
        Self {
            name: String::new(),
            bonename: String::new(),
            nx: 0.0,
            ny: 0.0,
            nz: 0.0,
            distance: 0.0,
            visual: None,
        }
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            ny: 1.0,
            ..Self::zeroed()
        }
    }
}

/// Chain-to-chain collision connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub start_bonename: String,
    pub end_bonename: String,
    pub radius: f32,
    pub length: f32,
}

impl Connection {
    pub fn zeroed() -> Self {
        Self {
            start_bonename: String::new(),
            end_bonename: String::new(),
            radius: 0.0,
            length: 0.0,
        }
    }

    /// Unordered endpoint key used for de-duplication: two connections
    /// collide when they join the same pair of bones in either order.
    pub fn same_endpoints(&self, other: &Connection) -> bool {
        (self.start_bonename == other.start_bonename && self.end_bonename == other.end_bonename)
            || (self.start_bonename == other.end_bonename
                && self.end_bonename == other.start_bonename)
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self {
            radius: 0.05,
            ..Self::zeroed()
        }
    }
}

/// Named batch of hash-string references, usually bundling the collision
/// shapes for one chain segment.
///
/// A group with zero members is a production fault; nothing in this
/// crate ever constructs one (see [`crate::groups`]).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub name: String,
    /// Ordered member references.
    pub members: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_list_names() {
        assert_eq!(StructKind::Bone.list_name(), Some("swingbones"));
        assert_eq!(StructKind::Connection.list_name(), Some("connections"));
        assert_eq!(StructKind::Group.list_name(), None);
        assert_eq!(StructKind::from_list_name("spheres"), Some(StructKind::Sphere));
        assert_eq!(StructKind::from_list_name("s_haircol"), None);
    }

    #[test]
    fn test_kind_str_round_trip() {
        for kind in StructKind::all() {
            let parsed: StructKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, *kind);
        }
        assert!("nonsense".parse::<StructKind>().is_err());
    }

    #[test]
    fn test_kind_index_is_dense() {
        for (i, kind) in StructKind::all().iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_shape_kinds() {
        assert!(StructKind::Sphere.is_shape());
        assert!(StructKind::Plane.is_shape());
        assert!(!StructKind::Bone.is_shape());
        assert!(!StructKind::Group.is_shape());
    }

    #[test]
    fn test_zeroed_differs_from_default() {
        let zero = BoneParams::zeroed();
        let fresh = BoneParams::default();
        assert_eq!(zero.airresistance, 0.0);
        assert_eq!(fresh.airresistance, 1.0);
        assert_eq!(zero.groundhit, 0);
        assert_eq!(fresh.groundhit, 1);
    }

    #[test]
    fn test_connection_same_endpoints_is_unordered() {
        let a = Connection {
            start_bonename: "s_hair1".into(),
            end_bonename: "s_hair2".into(),
            ..Connection::zeroed()
        };
        let b = Connection {
            start_bonename: "s_hair2".into(),
            end_bonename: "s_hair1".into(),
            ..Connection::zeroed()
        };
        assert!(a.same_endpoints(&b));
        let c = Connection {
            start_bonename: "s_hair1".into(),
            end_bonename: "s_hair3".into(),
            ..Connection::zeroed()
        };
        assert!(!a.same_endpoints(&c));
    }
}
