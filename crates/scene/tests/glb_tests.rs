//! GLB container encoding tests.

use blockmodel::{Face, FaceMaterials, Material, Texture, FALLBACK_TINT};
use glam::IVec3;
use scene::{serialize_glb, AssembleStats, CubeGeometry, MeshInstance, SceneGraph};
use serde_json::Value;
use std::sync::Arc;

fn scene_with(instances: Vec<MeshInstance>) -> SceneGraph {
    SceneGraph {
        geometry: CubeGeometry::unit(),
        instances,
        stats: AssembleStats::default(),
    }
}

fn texture(name: &str) -> Arc<Texture> {
    Arc::new(Texture {
        name: name.to_string(),
        image: image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 200, 30, 255])),
    })
}

fn textured_set(texture: &Arc<Texture>) -> Arc<FaceMaterials> {
    let mut materials = FaceMaterials::uniform_fallback();
    for face in Face::iter() {
        materials.set(face, Material::Texture(texture.clone()));
    }
    Arc::new(materials)
}

fn instance(x: i32, materials: &Arc<FaceMaterials>) -> MeshInstance {
    MeshInstance {
        position: IVec3::new(x, 0, 0),
        materials: materials.clone(),
    }
}

/// Validate header and chunk framing, return the parsed JSON and BIN payload
fn parse_container(glb: &[u8]) -> (Value, Vec<u8>) {
    assert_eq!(&glb[0..4], b"glTF");
    assert_eq!(u32::from_le_bytes(glb[4..8].try_into().unwrap()), 2);
    let total = u32::from_le_bytes(glb[8..12].try_into().unwrap()) as usize;
    assert_eq!(total, glb.len());

    let json_len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
    assert_eq!(&glb[16..20], b"JSON");
    assert_eq!(json_len % 4, 0);
    let json_chunk = &glb[20..20 + json_len];

    let bin_header = 20 + json_len;
    let bin_len = u32::from_le_bytes(glb[bin_header..bin_header + 4].try_into().unwrap()) as usize;
    assert_eq!(&glb[bin_header + 4..bin_header + 8], b"BIN\0");
    assert_eq!(bin_len % 4, 0);
    let bin = glb[bin_header + 8..bin_header + 8 + bin_len].to_vec();
    assert_eq!(bin_header + 8 + bin_len, total);

    (serde_json::from_slice(json_chunk).unwrap(), bin)
}

#[test]
fn test_empty_scene_container() {
    let glb = serialize_glb(&scene_with(vec![])).unwrap();
    let (json, bin) = parse_container(&glb);

    assert_eq!(json["asset"]["version"], "2.0");
    assert_eq!(json["buffers"][0]["byteLength"], bin.len() as u64);
    // Geometry template: positions, normals, uvs, six index runs
    assert_eq!(json["accessors"].as_array().unwrap().len(), 9);
    // Empty collections are omitted, not serialized as []
    assert!(json.get("nodes").is_none());
    assert!(json.get("meshes").is_none());
    assert!(json.get("textures").is_none());
}

#[test]
fn test_fallback_instance_gets_tinted_material() {
    let materials = Arc::new(FaceMaterials::uniform_fallback());
    let glb = serialize_glb(&scene_with(vec![instance(0, &materials)])).unwrap();
    let (json, _) = parse_container(&glb);

    assert_eq!(json["nodes"].as_array().unwrap().len(), 1);
    assert_eq!(json["meshes"].as_array().unwrap().len(), 1);

    // All six face primitives share the single tinted material
    let materials_doc = json["materials"].as_array().unwrap();
    assert_eq!(materials_doc.len(), 1);
    let factor = materials_doc[0]["pbrMetallicRoughness"]["baseColorFactor"]
        .as_array()
        .unwrap();
    for (channel, expected) in factor.iter().zip(FALLBACK_TINT) {
        assert!((channel.as_f64().unwrap() - f64::from(expected)).abs() < 1e-6);
    }
    assert!(json.get("images").is_none());

    let primitives = json["meshes"][0]["primitives"].as_array().unwrap();
    assert_eq!(primitives.len(), 6);
    for primitive in primitives {
        assert_eq!(primitive["material"], 0);
    }
}

#[test]
fn test_shared_material_set_shares_one_mesh() {
    let materials = Arc::new(FaceMaterials::uniform_fallback());
    let glb = serialize_glb(&scene_with(vec![
        instance(0, &materials),
        instance(1, &materials),
        instance(2, &materials),
    ]))
    .unwrap();
    let (json, _) = parse_container(&glb);

    assert_eq!(json["meshes"].as_array().unwrap().len(), 1);
    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[1]["mesh"], 0);
    assert_eq!(nodes[2]["translation"][0], 2.0);
}

#[test]
fn test_texture_embedded_once_and_referenced() {
    let shared = texture("block/stone");
    let glb = serialize_glb(&scene_with(vec![instance(0, &textured_set(&shared))])).unwrap();
    let (json, bin) = parse_container(&glb);

    // Six primitives, one texture, one image, one material
    assert_eq!(json["materials"].as_array().unwrap().len(), 1);
    assert_eq!(json["textures"].as_array().unwrap().len(), 1);
    let images = json["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["mimeType"], "image/png");

    // The embedded payload really is a PNG stream
    let view = images[0]["bufferView"].as_u64().unwrap() as usize;
    let offset = json["bufferViews"][view]["byteOffset"].as_u64().unwrap() as usize;
    assert_eq!(&bin[offset..offset + 4], &[0x89, b'P', b'N', b'G']);
}

#[test]
fn test_distinct_sets_reuse_texture_by_name() {
    let shared = texture("block/stone");
    let glb = serialize_glb(&scene_with(vec![
        instance(0, &textured_set(&shared)),
        instance(1, &textured_set(&shared)),
    ]))
    .unwrap();
    let (json, _) = parse_container(&glb);

    // Two material sets mean two meshes, but the texture embeds once
    assert_eq!(json["meshes"].as_array().unwrap().len(), 2);
    assert_eq!(json["images"].as_array().unwrap().len(), 1);
    assert_eq!(json["materials"].as_array().unwrap().len(), 1);
}

#[test]
fn test_meshes_share_geometry_accessors() {
    let first = Arc::new(FaceMaterials::uniform_fallback());
    let second = textured_set(&texture("block/dirt"));
    let glb = serialize_glb(&scene_with(vec![
        instance(0, &first),
        instance(1, &second),
    ]))
    .unwrap();
    let (json, _) = parse_container(&glb);

    let meshes = json["meshes"].as_array().unwrap();
    assert_eq!(meshes.len(), 2);
    let attrs = |mesh: usize| &meshes[mesh]["primitives"][0]["attributes"];
    assert_eq!(attrs(0)["POSITION"], attrs(1)["POSITION"]);
    assert_eq!(attrs(0)["NORMAL"], attrs(1)["NORMAL"]);
    assert_eq!(attrs(0)["TEXCOORD_0"], attrs(1)["TEXCOORD_0"]);
}

#[test]
fn test_mixed_set_keeps_fallback_on_unresolved_faces() {
    let mut materials = FaceMaterials::uniform_fallback();
    materials.set(Face::Up, Material::Texture(texture("block/grass_top")));
    let glb = serialize_glb(&scene_with(vec![instance(0, &Arc::new(materials))])).unwrap();
    let (json, _) = parse_container(&glb);

    // One textured and one tinted material
    assert_eq!(json["materials"].as_array().unwrap().len(), 2);
    let primitives = json["meshes"][0]["primitives"].as_array().unwrap();
    let up = &primitives[Face::Up.index()];
    let down = &primitives[Face::Down.index()];
    assert_ne!(up["material"], down["material"]);
}

#[test]
fn test_position_bounds_cover_unit_cube() {
    let glb = serialize_glb(&scene_with(vec![])).unwrap();
    let (json, _) = parse_container(&glb);

    // The position accessor is the first written and carries min/max
    let position = &json["accessors"][0];
    assert_eq!(position["type"], "VEC3");
    for axis in 0..3 {
        assert_eq!(position["min"][axis], 0.0);
        assert_eq!(position["max"][axis], 1.0);
    }
}
