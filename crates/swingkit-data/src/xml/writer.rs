//! Document → canonical swing parameter XML.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::document::Document;
use crate::error::{Result, SwingError};
use crate::param::{
    BoneParams, Capsule, Connection, Ellipsoid, Group, Oval, Plane, Sphere, StructKind, SwingBone,
};

use super::{field, leaf};

struct XmlOut {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    fn event(&mut self, event: Event) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| SwingError::XmlWrite(e.to_string()))
    }

    /// Opens a `size`-annotated list, or emits it self-closing when
    /// empty. Returns whether the list was opened (and needs closing).
    fn open_list(&mut self, tag: &str, size: usize) -> Result<bool> {
        let mut el = BytesStart::new(tag);
        el.push_attribute(("size", size.to_string().as_str()));
        if size == 0 {
            self.event(Event::Empty(el))?;
            Ok(false)
        } else {
            self.event(Event::Start(el))?;
            Ok(true)
        }
    }

    fn close(&mut self, tag: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(tag)))
    }

    fn open_entry(&mut self, index: usize) -> Result<()> {
        let mut el = BytesStart::new("struct");
        el.push_attribute(("index", index.to_string().as_str()));
        self.event(Event::Start(el))
    }

    fn scalar(&mut self, tag: &str, name: &str, value: &str) -> Result<()> {
        let mut el = BytesStart::new(tag);
        el.push_attribute(("hash", name));
        self.event(Event::Start(el))?;
        self.event(Event::Text(BytesText::new(value)))?;
        self.close(tag)
    }

    fn float(&mut self, name: &str, value: f32) -> Result<()> {
        self.scalar(leaf::FLOAT, name, &value.to_string())
    }

    fn int(&mut self, name: &str, value: i32) -> Result<()> {
        self.scalar(leaf::INT, name, &value.to_string())
    }

    fn sbyte(&mut self, name: &str, value: i8) -> Result<()> {
        self.scalar(leaf::SBYTE, name, &value.to_string())
    }

    fn hash40(&mut self, name: &str, value: &str) -> Result<()> {
        self.scalar(leaf::HASH40, name, value)
    }

    /// An indexed, anonymous hash40 list member.
    fn hash40_member(&mut self, index: usize, value: &str) -> Result<()> {
        let mut el = BytesStart::new(leaf::HASH40);
        el.push_attribute(("index", index.to_string().as_str()));
        self.event(Event::Start(el))?;
        self.event(Event::Text(BytesText::new(value)))?;
        self.close(leaf::HASH40)
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner().into_inner())
            .map_err(|e| SwingError::XmlWrite(format!("invalid UTF-8 in generated XML: {e}")))
    }
}

/// Serializes a document to the engine's swing parameter XML dialect.
///
/// # Errors
///
/// Only on writer failure; a well-formed [`Document`] always serializes.
pub fn to_xml(doc: &Document) -> Result<String> {
    let mut out = XmlOut::new();
    out.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    out.event(Event::Start(BytesStart::new("struct")))?;

    write_swingbones(&mut out, &doc.swingbones)?;
    write_shape_list(&mut out, StructKind::Sphere, doc.spheres.len(), |o, i| {
        write_sphere(o, &doc.spheres[i])
    })?;
    write_shape_list(&mut out, StructKind::Oval, doc.ovals.len(), |o, i| {
        write_oval(o, &doc.ovals[i])
    })?;
    write_shape_list(&mut out, StructKind::Ellipsoid, doc.ellipsoids.len(), |o, i| {
        write_ellipsoid(o, &doc.ellipsoids[i])
    })?;
    write_shape_list(&mut out, StructKind::Capsule, doc.capsules.len(), |o, i| {
        write_capsule(o, &doc.capsules[i])
    })?;
    write_shape_list(&mut out, StructKind::Plane, doc.planes.len(), |o, i| {
        write_plane(o, &doc.planes[i])
    })?;
    write_connections(&mut out, &doc.connections)?;
    for group in &doc.groups {
        write_group(&mut out, group)?;
    }

    out.close("struct")?;
    out.finish()
}

fn list_tag(kind: StructKind) -> &'static str {
    // Only called for the seven fixed kinds.
    kind.list_name().unwrap_or("struct")
}

fn write_shape_list(
    out: &mut XmlOut,
    kind: StructKind,
    len: usize,
    mut write_entry: impl FnMut(&mut XmlOut, usize) -> Result<()>,
) -> Result<()> {
    let tag = list_tag(kind);
    if out.open_list(tag, len)? {
        for i in 0..len {
            out.open_entry(i)?;
            write_entry(out, i)?;
            out.close("struct")?;
        }
        out.close(tag)?;
    }
    Ok(())
}

fn write_swingbones(out: &mut XmlOut, bones: &[SwingBone]) -> Result<()> {
    let tag = list_tag(StructKind::Bone);
    if out.open_list(tag, bones.len())? {
        for (i, bone) in bones.iter().enumerate() {
            out.open_entry(i)?;
            out.hash40(field::NAME, &bone.name)?;
            out.hash40(field::START_BONENAME, &bone.start_bonename)?;
            out.hash40(field::END_BONENAME, &bone.end_bonename)?;
            write_params(out, &bone.params)?;
            out.sbyte(field::ISSKIRT, bone.isskirt)?;
            out.int(field::ROTATEORDER, bone.rotateorder)?;
            out.sbyte(field::CURVEROTATEX, bone.curverotatex)?;
            out.sbyte(field::UNK, bone.unk)?;
            out.close("struct")?;
        }
        out.close(tag)?;
    }
    Ok(())
}

fn write_params(out: &mut XmlOut, params: &[BoneParams]) -> Result<()> {
    if out.open_list(field::PARAMS, params.len())? {
        for (i, p) in params.iter().enumerate() {
            out.open_entry(i)?;
            out.float(field::AIRRESISTANCE, p.airresistance)?;
            out.float(field::WATERRESISTANCE, p.waterresistance)?;
            out.float(field::MINANGLEZ, p.minanglez)?;
            out.float(field::MAXANGLEZ, p.maxanglez)?;
            out.float(field::MINANGLEY, p.minangley)?;
            out.float(field::MAXANGLEY, p.maxangley)?;
            out.float(field::COLLISIONSIZETIP, p.collisionsizetip)?;
            out.float(field::COLLISIONSIZEROOT, p.collisionsizeroot)?;
            out.float(field::FRICTIONRATE, p.frictionrate)?;
            out.float(field::GOALSTRENGTH, p.goalstrength)?;
            out.float(field::INERTIA, p.inertia)?;
            out.float(field::LOCALGRAVITY, p.localgravity)?;
            out.float(field::FALLSPEEDSCALE, p.fallspeedscale)?;
            out.sbyte(field::GROUNDHIT, p.groundhit)?;
            out.float(field::WINDAFFECT, p.windaffect)?;
            if out.open_list(field::COLLISIONS, p.collisions.len())? {
                for (j, col) in p.collisions.iter().enumerate() {
                    out.hash40_member(j, col)?;
                }
                out.close(field::COLLISIONS)?;
            }
            out.close("struct")?;
        }
        out.close(field::PARAMS)?;
    }
    Ok(())
}

fn write_sphere(out: &mut XmlOut, s: &Sphere) -> Result<()> {
    out.hash40(field::NAME, &s.name)?;
    out.hash40(field::BONENAME, &s.bonename)?;
    out.float(field::CX, s.cx)?;
    out.float(field::CY, s.cy)?;
    out.float(field::CZ, s.cz)?;
    out.float(field::RADIUS, s.radius)
}

fn write_oval(out: &mut XmlOut, o: &Oval) -> Result<()> {
    out.hash40(field::NAME, &o.name)?;
    out.hash40(field::START_BONENAME, &o.start_bonename)?;
    out.hash40(field::END_BONENAME, &o.end_bonename)?;
    out.float(field::RADIUS, o.radius)?;
    out.float(field::START_OFFSET_X, o.start_offset_x)?;
    out.float(field::START_OFFSET_Y, o.start_offset_y)?;
    out.float(field::START_OFFSET_Z, o.start_offset_z)?;
    out.float(field::END_OFFSET_X, o.end_offset_x)?;
    out.float(field::END_OFFSET_Y, o.end_offset_y)?;
    out.float(field::END_OFFSET_Z, o.end_offset_z)
}

fn write_ellipsoid(out: &mut XmlOut, e: &Ellipsoid) -> Result<()> {
    out.hash40(field::NAME, &e.name)?;
    out.hash40(field::BONENAME, &e.bonename)?;
    out.float(field::CX, e.cx)?;
    out.float(field::CY, e.cy)?;
    out.float(field::CZ, e.cz)?;
    out.float(field::RX, e.rx)?;
    out.float(field::RY, e.ry)?;
    out.float(field::RZ, e.rz)?;
    out.float(field::SX, e.sx)?;
    out.float(field::SY, e.sy)?;
    out.float(field::SZ, e.sz)
}

fn write_capsule(out: &mut XmlOut, c: &Capsule) -> Result<()> {
    out.hash40(field::NAME, &c.name)?;
    out.hash40(field::START_BONENAME, &c.start_bonename)?;
    out.hash40(field::END_BONENAME, &c.end_bonename)?;
    out.float(field::START_OFFSET_X, c.start_offset_x)?;
    out.float(field::START_OFFSET_Y, c.start_offset_y)?;
    out.float(field::START_OFFSET_Z, c.start_offset_z)?;
    out.float(field::END_OFFSET_X, c.end_offset_x)?;
    out.float(field::END_OFFSET_Y, c.end_offset_y)?;
    out.float(field::END_OFFSET_Z, c.end_offset_z)?;
    out.float(field::START_RADIUS, c.start_radius)?;
    out.float(field::END_RADIUS, c.end_radius)
}

fn write_plane(out: &mut XmlOut, p: &Plane) -> Result<()> {
    out.hash40(field::NAME, &p.name)?;
    out.hash40(field::BONENAME, &p.bonename)?;
    out.float(field::NX, p.nx)?;
    out.float(field::NY, p.ny)?;
    out.float(field::NZ, p.nz)?;
    out.float(field::DISTANCE, p.distance)
}

fn write_connections(out: &mut XmlOut, connections: &[Connection]) -> Result<()> {
    let tag = list_tag(StructKind::Connection);
    if out.open_list(tag, connections.len())? {
        for (i, c) in connections.iter().enumerate() {
            out.open_entry(i)?;
            out.hash40(field::START_BONENAME, &c.start_bonename)?;
            out.hash40(field::END_BONENAME, &c.end_bonename)?;
            out.float(field::RADIUS, c.radius)?;
            out.float(field::LENGTH, c.length)?;
            out.close("struct")?;
        }
        out.close(tag)?;
    }
    Ok(())
}

fn write_group(out: &mut XmlOut, group: &Group) -> Result<()> {
    if out.open_list(&group.name, group.members.len())? {
        for (i, member) in group.members.iter().enumerate() {
            out.hash40_member(i, member)?;
        }
        out.close(&group.name)?;
    }
    Ok(())
}
