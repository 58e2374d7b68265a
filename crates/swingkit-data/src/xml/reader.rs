//! Swing parameter XML → Document.
//!
//! Malformed XML is a hard parse error and the caller's prior state is
//! left untouched. A missing mandatory leaf is not: the field recovers
//! to its zero value and the miss is logged, so real-world files with
//! dropped fields still load.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::warn;

use crate::document::Document;
use crate::error::{Result, SwingError};
use crate::param::{
    BoneParams, Capsule, Connection, Ellipsoid, Group, Oval, Plane, Sphere, StructKind, SwingBone,
};

use super::{field, leaf};

/// Deserializes the engine's swing parameter XML dialect.
///
/// # Errors
///
/// Returns [`SwingError::XmlParse`] (or a more specific variant) on
/// malformed input. Missing leaves are recovered, not errors.
pub fn from_xml(text: &str) -> Result<Document> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    loop {
        match read(&mut reader)? {
            Event::Start(ref e) if e.name().as_ref() == b"struct" => {
                return parse_document(&mut reader);
            }
            Event::Start(ref e) | Event::Empty(ref e) => {
                return Err(SwingError::invalid_element(tag_of(e), "document root"));
            }
            Event::Eof => {
                return Err(SwingError::XmlParse("missing root struct element".into()));
            }
            _ => {}
        }
    }
}

fn read<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Event<'a>> {
    reader
        .read_event()
        .map_err(|e| SwingError::XmlParse(e.to_string()))
}

fn tag_of(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn parse_document(reader: &mut Reader<&[u8]>) -> Result<Document> {
    let mut doc = Document::new();

    loop {
        match read(reader)? {
            Event::Start(ref e) => {
                let tag = tag_of(e);
                match StructKind::from_list_name(&tag) {
                    Some(StructKind::Bone) => {
                        doc.swingbones
                            .extend(parse_entries(reader, &tag, parse_swingbone)?);
                    }
                    Some(StructKind::Sphere) => {
                        doc.spheres
                            .extend(parse_entries(reader, &tag, parse_sphere)?);
                    }
                    Some(StructKind::Oval) => {
                        doc.ovals.extend(parse_entries(reader, &tag, parse_oval)?);
                    }
                    Some(StructKind::Ellipsoid) => {
                        doc.ellipsoids
                            .extend(parse_entries(reader, &tag, parse_ellipsoid)?);
                    }
                    Some(StructKind::Capsule) => {
                        doc.capsules
                            .extend(parse_entries(reader, &tag, parse_capsule)?);
                    }
                    Some(StructKind::Plane) => {
                        doc.planes
                            .extend(parse_entries(reader, &tag, parse_plane)?);
                    }
                    Some(StructKind::Connection) => {
                        doc.connections
                            .extend(parse_entries(reader, &tag, parse_connection)?);
                    }
                    // Unrecognized top-level tags are groups by contract:
                    // the format's sole extension point.
                    Some(StructKind::Group) | None => {
                        let members = parse_hash_members(reader, &tag)?;
                        doc.groups.push(Group { name: tag, members });
                    }
                }
            }
            Event::Empty(ref e) => {
                let tag = tag_of(e);
                if StructKind::from_list_name(&tag).is_none() {
                    // A zero-member group is a production fault upstream,
                    // but round-trip fidelity wins over repair here.
                    warn!(group = %tag, "empty group list in input");
                    doc.groups.push(Group {
                        name: tag,
                        members: Vec::new(),
                    });
                }
                // An empty fixed list deserializes to an empty (not
                // absent) collection, which the document already holds.
            }
            Event::End(ref e) if e.name().as_ref() == b"struct" => break,
            Event::Eof => {
                return Err(SwingError::XmlParse(
                    "unexpected EOF inside root struct".into(),
                ));
            }
            _ => {}
        }
    }

    doc.update();
    Ok(doc)
}

/// Parses the `<struct index="i">` entries of one list. Entry order in
/// the input is authoritative; `index` attributes are decorative.
fn parse_entries<T>(
    reader: &mut Reader<&[u8]>,
    list_tag: &str,
    mut parse_entry: impl FnMut(&mut Reader<&[u8]>, bool) -> Result<T>,
) -> Result<Vec<T>> {
    let mut items = Vec::new();
    loop {
        match read(reader)? {
            Event::Start(ref e) if e.name().as_ref() == b"struct" => {
                items.push(parse_entry(reader, false)?);
            }
            Event::Empty(ref e) if e.name().as_ref() == b"struct" => {
                // An entry with every leaf missing still recovers.
                items.push(parse_entry(reader, true)?);
            }
            Event::Start(ref e) | Event::Empty(ref e) => {
                return Err(SwingError::invalid_element(
                    tag_of(e),
                    format!("list '{list_tag}'"),
                ));
            }
            Event::End(ref e) if e.name().as_ref() == list_tag.as_bytes() => break,
            Event::Eof => {
                return Err(SwingError::XmlParse(format!(
                    "unexpected EOF in list '{list_tag}'"
                )));
            }
            _ => {}
        }
    }
    Ok(items)
}

/// Ordered `<hash40>` members of a group or collisions list.
fn parse_hash_members(reader: &mut Reader<&[u8]>, end_tag: &str) -> Result<Vec<String>> {
    let mut members = Vec::new();
    loop {
        match read(reader)? {
            Event::Start(ref e) if e.name().as_ref() == leaf::HASH40.as_bytes() => {
                members.push(read_leaf_text(reader, leaf::HASH40)?);
            }
            Event::Empty(ref e) if e.name().as_ref() == leaf::HASH40.as_bytes() => {
                members.push(String::new());
            }
            Event::Start(ref e) | Event::Empty(ref e) => {
                return Err(SwingError::invalid_element(
                    tag_of(e),
                    format!("hash40 list '{end_tag}'"),
                ));
            }
            Event::End(ref e) if e.name().as_ref() == end_tag.as_bytes() => break,
            Event::Eof => {
                return Err(SwingError::XmlParse(format!(
                    "unexpected EOF in hash40 list '{end_tag}'"
                )));
            }
            _ => {}
        }
    }
    Ok(members)
}

/// Text content of a leaf up to its end tag.
fn read_leaf_text(reader: &mut Reader<&[u8]>, tag: &str) -> Result<String> {
    let mut text = String::new();
    loop {
        match read(reader)? {
            Event::Text(t) => {
                let piece = t
                    .unescape()
                    .map_err(|e| SwingError::XmlParse(e.to_string()))?;
                text.push_str(&piece);
            }
            Event::End(ref e) if e.name().as_ref() == tag.as_bytes() => break,
            Event::Start(ref e) | Event::Empty(ref e) => {
                return Err(SwingError::invalid_element(
                    tag_of(e),
                    format!("leaf '{tag}'"),
                ));
            }
            Event::Eof => {
                return Err(SwingError::XmlParse(format!(
                    "unexpected EOF in leaf '{tag}'"
                )));
            }
            _ => {}
        }
    }
    Ok(text)
}

/// Skips an element and everything inside it, tolerating same-named
/// nesting.
fn skip_element(reader: &mut Reader<&[u8]>, name: &[u8]) -> Result<()> {
    let mut depth = 1usize;
    loop {
        match read(reader)? {
            Event::Start(ref e) if e.name().as_ref() == name => depth += 1,
            Event::End(ref e) if e.name().as_ref() == name => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(SwingError::XmlParse(format!(
                    "unexpected EOF while skipping '{}'",
                    String::from_utf8_lossy(name)
                )));
            }
            _ => {}
        }
    }
}

/// Collected scalar leaves of one struct entry: field name → (leaf tag,
/// text). Typed extraction recovers missing fields to zero with a
/// logged diagnostic; unparseable values are hard errors.
struct FieldBag {
    context: &'static str,
    fields: HashMap<String, (String, String)>,
}

impl FieldBag {
    fn new(context: &'static str) -> Self {
        Self {
            context,
            fields: HashMap::new(),
        }
    }

    fn insert(&mut self, name: String, tag: String, text: String) {
        if self.fields.insert(name.clone(), (tag, text)).is_some() {
            warn!(field = %name, context = self.context, "duplicate leaf; last value wins");
        }
    }

    fn missing(&self, name: &str) {
        warn!(
            field = name,
            context = self.context,
            "missing leaf; defaulting to zero"
        );
    }

    fn take_f32(&mut self, name: &'static str) -> Result<f32> {
        match self.fields.remove(name) {
            Some((tag, text)) => text
                .trim()
                .parse()
                .map_err(|_| SwingError::invalid_value(name, tag, format!("not a float: {text}"))),
            None => {
                self.missing(name);
                Ok(0.0)
            }
        }
    }

    fn take_i32(&mut self, name: &'static str) -> Result<i32> {
        match self.fields.remove(name) {
            Some((tag, text)) => text.trim().parse().map_err(|_| {
                SwingError::invalid_value(name, tag, format!("not an int: {text}"))
            }),
            None => {
                self.missing(name);
                Ok(0)
            }
        }
    }

    fn take_i8(&mut self, name: &'static str) -> Result<i8> {
        match self.fields.remove(name) {
            Some((tag, text)) => text.trim().parse().map_err(|_| {
                SwingError::invalid_value(name, tag, format!("not an sbyte: {text}"))
            }),
            None => {
                self.missing(name);
                Ok(0)
            }
        }
    }

    fn take_hash(&mut self, name: &'static str) -> String {
        match self.fields.remove(name) {
            Some((_, text)) => text,
            None => {
                self.missing(name);
                String::new()
            }
        }
    }

    fn finish(self) {
        for name in self.fields.keys() {
            warn!(field = %name, context = self.context, "unknown leaf ignored");
        }
    }
}

/// Reads the scalar leaves of one `<struct>` entry into `bag`,
/// delegating nested lists to `on_list`. `on_list` returns false to
/// have the list skipped.
fn read_entry_leaves(
    reader: &mut Reader<&[u8]>,
    bag: &mut FieldBag,
    mut on_list: impl FnMut(&mut Reader<&[u8]>, &str) -> Result<bool>,
) -> Result<()> {
    loop {
        match read(reader)? {
            Event::Start(ref e) => {
                let tag = tag_of(e);
                if leaf::is_leaf_tag(&tag) {
                    let name = leaf_field_name(e, &tag, bag.context)?;
                    let text = read_leaf_text(reader, &tag)?;
                    bag.insert(name, tag, text);
                } else if !on_list(reader, &tag)? {
                    warn!(list = %tag, context = bag.context, "unknown nested list ignored");
                    skip_element(reader, tag.as_bytes())?;
                }
            }
            Event::Empty(ref e) => {
                let tag = tag_of(e);
                if leaf::is_leaf_tag(&tag) {
                    let name = leaf_field_name(e, &tag, bag.context)?;
                    bag.insert(name, tag, String::new());
                }
                // An empty nested list needs no handling: the owning
                // collection is already empty.
            }
            Event::End(ref e) if e.name().as_ref() == b"struct" => break,
            Event::Eof => {
                return Err(SwingError::XmlParse(format!(
                    "unexpected EOF in {} entry",
                    bag.context
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

/// The `hash` attribute naming a leaf's schema field. Its absence is
/// malformed input, not a recoverable miss.
fn leaf_field_name(e: &BytesStart, tag: &str, context: &str) -> Result<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"hash" {
            return Ok(String::from_utf8_lossy(&attr.value).into_owned());
        }
    }
    Err(SwingError::invalid_element(
        format!("{tag} without hash attribute"),
        context.to_string(),
    ))
}

fn parse_swingbone(reader: &mut Reader<&[u8]>, empty: bool) -> Result<SwingBone> {
    let mut bag = FieldBag::new("swingbone");
    let mut params: Vec<BoneParams> = Vec::new();
    if !empty {
        read_entry_leaves(reader, &mut bag, |reader, tag| {
            if tag == field::PARAMS {
                params = parse_entries(reader, field::PARAMS, parse_bone_params)?;
                Ok(true)
            } else {
                Ok(false)
            }
        })?;
    }
    let bone = SwingBone {
        name: bag.take_hash(field::NAME),
        start_bonename: bag.take_hash(field::START_BONENAME),
        end_bonename: bag.take_hash(field::END_BONENAME),
        params,
        isskirt: bag.take_i8(field::ISSKIRT)?,
        rotateorder: bag.take_i32(field::ROTATEORDER)?,
        curverotatex: bag.take_i8(field::CURVEROTATEX)?,
        unk: bag.take_i8(field::UNK)?,
    };
    bag.finish();
    Ok(bone)
}

fn parse_bone_params(reader: &mut Reader<&[u8]>, empty: bool) -> Result<BoneParams> {
    let mut bag = FieldBag::new("params");
    let mut collisions: Vec<String> = Vec::new();
    if !empty {
        read_entry_leaves(reader, &mut bag, |reader, tag| {
            if tag == field::COLLISIONS {
                collisions = parse_hash_members(reader, field::COLLISIONS)?;
                Ok(true)
            } else {
                Ok(false)
            }
        })?;
    }
    let params = BoneParams {
        airresistance: bag.take_f32(field::AIRRESISTANCE)?,
        waterresistance: bag.take_f32(field::WATERRESISTANCE)?,
        minanglez: bag.take_f32(field::MINANGLEZ)?,
        maxanglez: bag.take_f32(field::MAXANGLEZ)?,
        minangley: bag.take_f32(field::MINANGLEY)?,
        maxangley: bag.take_f32(field::MAXANGLEY)?,
        collisionsizetip: bag.take_f32(field::COLLISIONSIZETIP)?,
        collisionsizeroot: bag.take_f32(field::COLLISIONSIZEROOT)?,
        frictionrate: bag.take_f32(field::FRICTIONRATE)?,
        goalstrength: bag.take_f32(field::GOALSTRENGTH)?,
        inertia: bag.take_f32(field::INERTIA)?,
        localgravity: bag.take_f32(field::LOCALGRAVITY)?,
        fallspeedscale: bag.take_f32(field::FALLSPEEDSCALE)?,
        groundhit: bag.take_i8(field::GROUNDHIT)?,
        windaffect: bag.take_f32(field::WINDAFFECT)?,
        collisions,
    };
    bag.finish();
    Ok(params)
}

fn flat_bag(
    reader: &mut Reader<&[u8]>,
    context: &'static str,
    empty: bool,
) -> Result<FieldBag> {
    let mut bag = FieldBag::new(context);
    if !empty {
        read_entry_leaves(reader, &mut bag, |_, _| Ok(false))?;
    }
    Ok(bag)
}

fn parse_sphere(reader: &mut Reader<&[u8]>, empty: bool) -> Result<Sphere> {
    let mut bag = flat_bag(reader, "sphere", empty)?;
    let sphere = Sphere {
        name: bag.take_hash(field::NAME),
        bonename: bag.take_hash(field::BONENAME),
        cx: bag.take_f32(field::CX)?,
        cy: bag.take_f32(field::CY)?,
        cz: bag.take_f32(field::CZ)?,
        radius: bag.take_f32(field::RADIUS)?,
        visual: None,
    };
    bag.finish();
    Ok(sphere)
}

fn parse_oval(reader: &mut Reader<&[u8]>, empty: bool) -> Result<Oval> {
    let mut bag = flat_bag(reader, "oval", empty)?;
    let oval = Oval {
        name: bag.take_hash(field::NAME),
        start_bonename: bag.take_hash(field::START_BONENAME),
        end_bonename: bag.take_hash(field::END_BONENAME),
        radius: bag.take_f32(field::RADIUS)?,
        start_offset_x: bag.take_f32(field::START_OFFSET_X)?,
        start_offset_y: bag.take_f32(field::START_OFFSET_Y)?,
        start_offset_z: bag.take_f32(field::START_OFFSET_Z)?,
        end_offset_x: bag.take_f32(field::END_OFFSET_X)?,
        end_offset_y: bag.take_f32(field::END_OFFSET_Y)?,
        end_offset_z: bag.take_f32(field::END_OFFSET_Z)?,
        visual: None,
    };
    bag.finish();
    Ok(oval)
}

fn parse_ellipsoid(reader: &mut Reader<&[u8]>, empty: bool) -> Result<Ellipsoid> {
    let mut bag = flat_bag(reader, "ellipsoid", empty)?;
    let ellipsoid = Ellipsoid {
        name: bag.take_hash(field::NAME),
        bonename: bag.take_hash(field::BONENAME),
        cx: bag.take_f32(field::CX)?,
        cy: bag.take_f32(field::CY)?,
        cz: bag.take_f32(field::CZ)?,
        rx: bag.take_f32(field::RX)?,
        ry: bag.take_f32(field::RY)?,
        rz: bag.take_f32(field::RZ)?,
        sx: bag.take_f32(field::SX)?,
        sy: bag.take_f32(field::SY)?,
        sz: bag.take_f32(field::SZ)?,
        visual: None,
    };
    bag.finish();
    Ok(ellipsoid)
}

fn parse_capsule(reader: &mut Reader<&[u8]>, empty: bool) -> Result<Capsule> {
    let mut bag = flat_bag(reader, "capsule", empty)?;
    let capsule = Capsule {
        name: bag.take_hash(field::NAME),
        start_bonename: bag.take_hash(field::START_BONENAME),
        end_bonename: bag.take_hash(field::END_BONENAME),
        start_offset_x: bag.take_f32(field::START_OFFSET_X)?,
        start_offset_y: bag.take_f32(field::START_OFFSET_Y)?,
        start_offset_z: bag.take_f32(field::START_OFFSET_Z)?,
        end_offset_x: bag.take_f32(field::END_OFFSET_X)?,
        end_offset_y: bag.take_f32(field::END_OFFSET_Y)?,
        end_offset_z: bag.take_f32(field::END_OFFSET_Z)?,
        start_radius: bag.take_f32(field::START_RADIUS)?,
        end_radius: bag.take_f32(field::END_RADIUS)?,
        visual: None,
    };
    bag.finish();
    Ok(capsule)
}

fn parse_plane(reader: &mut Reader<&[u8]>, empty: bool) -> Result<Plane> {
    let mut bag = flat_bag(reader, "plane", empty)?;
    let plane = Plane {
        name: bag.take_hash(field::NAME),
        bonename: bag.take_hash(field::BONENAME),
        nx: bag.take_f32(field::NX)?,
        ny: bag.take_f32(field::NY)?,
        nz: bag.take_f32(field::NZ)?,
        distance: bag.take_f32(field::DISTANCE)?,
        visual: None,
    };
    bag.finish();
    Ok(plane)
}

fn parse_connection(reader: &mut Reader<&[u8]>, empty: bool) -> Result<Connection> {
    let mut bag = flat_bag(reader, "connection", empty)?;
    let connection = Connection {
        start_bonename: bag.take_hash(field::START_BONENAME),
        end_bonename: bag.take_hash(field::END_BONENAME),
        radius: bag.take_f32(field::RADIUS)?,
        length: bag.take_f32(field::LENGTH)?,
    };
    bag.finish();
    Ok(connection)
}
