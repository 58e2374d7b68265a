use pretty_assertions::assert_eq;

use crate::document::Document;
use crate::error::SwingError;
use crate::param::{
    BoneParams, Capsule, Connection, Ellipsoid, Group, Oval, Plane, Sphere, SwingBone,
};

use super::{from_xml, to_xml};

fn sample_document() -> Document {
    let mut doc = Document::new();
    doc.swingbones.push(SwingBone {
        name: "s_hair".into(),
        start_bonename: "s_hair1".into(),
        end_bonename: "s_hair3".into(),
        params: vec![
            BoneParams {
                collisions: vec!["headcol".into(), "bustcol".into()],
                ..BoneParams::default()
            },
            BoneParams::default(),
        ],
        isskirt: 0,
        rotateorder: 2,
        curverotatex: 1,
        unk: 0,
    });
    doc.spheres.push(Sphere {
        name: "headcol".into(),
        bonename: "head".into(),
        cx: 0.5,
        cy: -1.25,
        cz: 0.0,
        radius: 3.5,
        visual: None,
    });
    doc.ovals.push(Oval {
        name: "neckcol".into(),
        start_bonename: "neck".into(),
        end_bonename: "head".into(),
        radius: 1.5,
        ..Oval::zeroed()
    });
    doc.ellipsoids.push(Ellipsoid {
        name: "bustcol".into(),
        bonename: "bust".into(),
        sx: 1.0,
        sy: 2.0,
        sz: 0.5,
        ..Ellipsoid::zeroed()
    });
    doc.capsules.push(Capsule {
        name: "armcol".into(),
        start_bonename: "shoulder".into(),
        end_bonename: "elbow".into(),
        start_radius: 1.0,
        end_radius: 0.75,
        ..Capsule::zeroed()
    });
    doc.planes.push(Plane {
        name: "floorcol".into(),
        bonename: "trans".into(),
        ny: 1.0,
        distance: 0.0,
        ..Plane::zeroed()
    });
    doc.connections.push(Connection {
        start_bonename: "s_hair1".into(),
        end_bonename: "s_skirt1".into(),
        radius: 2.0,
        length: 4.5,
    });
    doc.groups.push(Group {
        name: "s_haircol".into(),
        members: vec!["headcol".into(), "bustcol".into()],
    });
    doc.update();
    doc
}

#[test]
fn test_round_trip_preserves_document() {
    let doc = sample_document();
    let xml = to_xml(&doc).unwrap();
    let parsed = from_xml(&xml).unwrap();
    assert_eq!(parsed, doc);
}

#[test]
fn test_round_trip_is_textually_stable() {
    let xml = to_xml(&sample_document()).unwrap();
    let again = to_xml(&from_xml(&xml).unwrap()).unwrap();
    assert_eq!(again, xml);
}

#[test]
fn test_empty_document_serializes_all_fixed_lists() {
    let xml = to_xml(&Document::new()).unwrap();
    for tag in [
        "swingbones",
        "spheres",
        "ovals",
        "ellipsoids",
        "capsules",
        "planes",
        "connections",
    ] {
        assert!(
            xml.contains(&format!("<{tag} size=\"0\"/>")),
            "missing empty list {tag} in:\n{xml}"
        );
    }
    let parsed = from_xml(&xml).unwrap();
    assert_eq!(parsed, Document::new());
}

#[test]
fn test_entry_order_is_preserved() {
    let mut doc = Document::new();
    for name in ["b", "a", "c"] {
        doc.spheres.push(Sphere {
            name: name.into(),
            ..Sphere::zeroed()
        });
    }
    let parsed = from_xml(&to_xml(&doc).unwrap()).unwrap();
    let names: Vec<&str> = parsed.spheres.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["b", "a", "c"]);
}

#[test]
fn test_params_field_order_is_canonical() {
    let mut doc = Document::new();
    doc.swingbones.push(SwingBone {
        name: "s_tail".into(),
        params: vec![BoneParams::default()],
        ..SwingBone::zeroed()
    });
    let xml = to_xml(&doc).unwrap();
    let order = [
        "airresistance",
        "waterresistance",
        "minanglez",
        "maxanglez",
        "minangley",
        "maxangley",
        "collisionsizetip",
        "collisionsizeroot",
        "frictionrate",
        "goalstrength",
        "inertia",
        "localgravity",
        "fallspeedscale",
        "groundhit",
        "windaffect",
    ];
    let mut last = 0;
    for name in order {
        let pos = xml
            .find(&format!("hash=\"{name}\""))
            .unwrap_or_else(|| panic!("field {name} missing"));
        assert!(pos > last, "field {name} out of order");
        last = pos;
    }
    // groundhit is the lone integral parameter field.
    assert!(xml.contains("<sbyte hash=\"groundhit\">"));
}

#[test]
fn test_unknown_top_level_tag_parses_as_group() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<struct>
  <swingbones size="0"/>
  <future_section size="2">
    <hash40 index="0">alpha</hash40>
    <hash40 index="1">beta</hash40>
  </future_section>
</struct>"#;
    let doc = from_xml(xml).unwrap();
    assert_eq!(doc.groups.len(), 1);
    assert_eq!(doc.groups[0].name, "future_section");
    assert_eq!(doc.groups[0].members, ["alpha", "beta"]);
}

#[test]
fn test_group_round_trips_under_its_own_tag() {
    let mut doc = Document::new();
    doc.groups.push(Group {
        name: "s_skirtcol".into(),
        members: vec!["hipcol".into()],
    });
    let xml = to_xml(&doc).unwrap();
    assert!(xml.contains("<s_skirtcol size=\"1\">"));
    let parsed = from_xml(&xml).unwrap();
    assert_eq!(parsed.groups, doc.groups);
}

#[test]
fn test_missing_leaf_recovers_to_zero() {
    // radius and cz are absent; the entry still loads.
    let xml = r#"<struct>
  <spheres size="1">
    <struct index="0">
      <hash40 hash="name">headcol</hash40>
      <hash40 hash="bonename">head</hash40>
      <float hash="cx">1.5</float>
      <float hash="cy">2.5</float>
    </struct>
  </spheres>
</struct>"#;
    let doc = from_xml(xml).unwrap();
    assert_eq!(doc.spheres.len(), 1);
    let s = &doc.spheres[0];
    assert_eq!(s.name, "headcol");
    assert_eq!(s.cx, 1.5);
    assert_eq!(s.cz, 0.0);
    assert_eq!(s.radius, 0.0);
}

#[test]
fn test_empty_struct_entry_recovers_fully_zeroed() {
    let xml = r#"<struct><connections size="1"><struct index="0"/></connections></struct>"#;
    let doc = from_xml(xml).unwrap();
    assert_eq!(doc.connections, [Connection::zeroed()]);
}

#[test]
fn test_unknown_leaf_is_ignored() {
    let xml = r#"<struct>
  <planes size="1">
    <struct index="0">
      <hash40 hash="name">floorcol</hash40>
      <hash40 hash="bonename">trans</hash40>
      <float hash="nx">0</float>
      <float hash="ny">1</float>
      <float hash="nz">0</float>
      <float hash="distance">0</float>
      <float hash="bounciness">9.5</float>
    </struct>
  </planes>
</struct>"#;
    let doc = from_xml(xml).unwrap();
    assert_eq!(doc.planes[0].ny, 1.0);
}

#[test]
fn test_malformed_xml_is_a_hard_error() {
    let err = from_xml("<struct><spheres size=\"1\">").unwrap_err();
    assert!(matches!(err, SwingError::XmlParse(_)));
}

#[test]
fn test_missing_root_is_a_hard_error() {
    let err = from_xml("<?xml version=\"1.0\"?>").unwrap_err();
    assert!(matches!(err, SwingError::XmlParse(_)));
}

#[test]
fn test_wrong_root_tag_is_a_hard_error() {
    let err = from_xml("<params></params>").unwrap_err();
    assert!(matches!(err, SwingError::InvalidElement { .. }));
}

#[test]
fn test_unparseable_value_is_a_hard_error() {
    let xml = r#"<struct>
  <spheres size="1">
    <struct index="0">
      <float hash="radius">not_a_number</float>
    </struct>
  </spheres>
</struct>"#;
    let err = from_xml(xml).unwrap_err();
    assert!(matches!(err, SwingError::InvalidValue { .. }));
}

#[test]
fn test_leaf_text_is_unescaped() {
    let xml = r#"<struct>
  <groups size="1">
    <hash40 index="0">a&amp;b</hash40>
  </groups>
</struct>"#;
    // "groups" is not a fixed list name, so this reads as a group
    // literally named "groups".
    let doc = from_xml(xml).unwrap();
    assert_eq!(doc.groups[0].members, ["a&b"]);
}

#[test]
fn test_size_attribute_is_advisory() {
    // Entry count wins over a stale size attribute.
    let xml = r#"<struct>
  <connections size="7">
    <struct index="0">
      <hash40 hash="start_bonename">a</hash40>
      <hash40 hash="end_bonename">b</hash40>
      <float hash="radius">1</float>
      <float hash="length">2</float>
    </struct>
  </connections>
</struct>"#;
    let doc = from_xml(xml).unwrap();
    assert_eq!(doc.connections.len(), 1);
}
