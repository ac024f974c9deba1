//! Model conversion: one mesh per OBJ group, all in one shared buffer

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use das_common::{BinString, Mesh, MeshGroup, Model, Node, PackedBuffer, Scene, save_model};
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::error::ConvertError;
use crate::mesh::{Diagnostic, GroupGeometry, MeshStats, assemble_mesh, process_group};
use crate::obj::{Group, Object, load_obj};

/// Conversion settings
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Average normals for every corner, replacing source normals
    pub smooth_normals: bool,
    /// Convert groups concurrently
    pub parallel: bool,
    pub author: String,
    pub comment: String,
}

/// What happened during a conversion, in group order.
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub meshes: Vec<MeshStats>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ConversionReport {
    pub fn vertex_count(&self) -> u64 {
        self.meshes.iter().map(|m| m.vertex_count as u64).sum()
    }

    pub fn index_count(&self) -> u64 {
        self.meshes.iter().map(|m| m.index_count as u64).sum()
    }
}

/// Result of in-memory conversion
#[derive(Debug, Clone)]
pub struct ConvertedModel {
    pub model: Model,
    pub report: ConversionReport,
}

fn convert_group(
    object: &Object,
    group: &Group,
    options: &ConvertOptions,
    buffer: &Mutex<&mut PackedBuffer>,
    buffer_id: u32,
) -> Result<(Mesh, GroupGeometry), ConvertError> {
    let geometry = process_group(object, group, options.smooth_normals)?;
    // Hold the lock for the whole mesh so its arrays stay contiguous
    let mesh = assemble_mesh(&geometry.unified, &mut buffer.lock(), buffer_id)?;

    tracing::info!(
        "Converted group '{}': {} vertices, {} indices",
        group.name,
        mesh.vertex_count,
        mesh.draw_count
    );
    Ok((mesh, geometry))
}

/// Convert every group of `object` into a [`Model`].
///
/// Any group failure fails the whole conversion.
pub fn convert_object(
    object: &Object,
    options: &ConvertOptions,
) -> Result<ConvertedModel, ConvertError> {
    let mut model = Model::new();
    model.header.author = BinString::truncated(&options.author);
    model.header.comment = BinString::truncated(&options.comment);
    model.header.default_scene_index = 0;

    // Every group shares one buffer
    let buffer_id = model.add_buffer();
    let converted: Vec<(Mesh, GroupGeometry)> = {
        let buffer = Mutex::new(&mut model.buffers[buffer_id as usize]);
        let convert = |group: &Group| convert_group(object, group, options, &buffer, buffer_id);
        if options.parallel {
            object.groups.par_iter().map(convert).collect::<Result<_, _>>()?
        } else {
            object.groups.iter().map(convert).collect::<Result<_, _>>()?
        }
    };

    let mut report = ConversionReport::default();
    for (mesh, geometry) in converted {
        model.meshes.push(mesh);
        report.meshes.push(geometry.stats);
        report.diagnostics.extend(geometry.diagnostics);
    }

    let name = BinString::truncated(&object.name);
    model.mesh_groups.push(MeshGroup {
        name: name.clone(),
        meshes: (0..model.meshes.len() as u32).collect(),
    });
    model.nodes.push(Node {
        name: name.clone(),
        mesh_group_id: 0,
        ..Default::default()
    });
    model.scenes.push(Scene {
        name,
        root_nodes: vec![0],
    });
    model.update_header_counts();

    tracing::debug!(
        "Model '{}': {} meshes, {} vertices, {} buffer bytes",
        object.name,
        model.header.mesh_count,
        model.header.vertices_count,
        model.buffers[buffer_id as usize].size()
    );

    Ok(ConvertedModel { model, report })
}

/// Convert an OBJ file to an in-memory model
pub fn convert_obj_to_memory(input: &Path, options: &ConvertOptions) -> Result<ConvertedModel> {
    let object = load_obj(input).with_context(|| format!("Failed to read OBJ: {:?}", input))?;
    convert_object(&object, options).with_context(|| format!("Failed to convert {:?}", input))
}

/// Convert an OBJ file and write the `.das` container to `output`
pub fn convert_obj(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<ConversionReport> {
    let converted = convert_obj_to_memory(input, options)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    save_model(output, &converted.model)
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    tracing::info!(
        "Converted OBJ model: {} meshes, {} vertices, {} indices",
        converted.report.meshes.len(),
        converted.report.vertex_count(),
        converted.report.index_count()
    );

    Ok(converted.report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Attribute;
    use crate::obj::{Corner, Face};
    use das_common::NO_ID;
    use glam::{Vec2, Vec3};

    fn quad(name: &str, base: u32) -> Group {
        Group {
            name: name.into(),
            faces: vec![Face::new(
                (0..4).map(|i| Corner::new(base + i, Some(i), None)),
            )],
        }
    }

    fn two_quads() -> Object {
        Object {
            name: "pair".into(),
            positions: vec![
                Vec3::ZERO,
                Vec3::X,
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::Y,
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
            ],
            uvs: vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y],
            normals: vec![],
            groups: vec![quad("front", 0), quad("back", 4)],
        }
    }

    #[test]
    fn test_one_mesh_per_group() {
        let options = ConvertOptions {
            author: "tester".into(),
            ..Default::default()
        };
        let converted = convert_object(&two_quads(), &options).unwrap();
        let model = &converted.model;

        assert_eq!(model.meshes.len(), 2);
        assert_eq!(model.buffers.len(), 1);
        assert!(model.meshes.iter().all(|m| m.positions.buffer_id == 0));
        assert!(model.meshes[0].positions.offset < model.meshes[1].positions.offset);

        assert_eq!(model.header.mesh_count, 2);
        assert_eq!(model.header.vertices_count, 8);
        assert_eq!(model.header.author.as_str(), "tester");
        assert!(model.header.is_valid());

        assert_eq!(model.mesh_groups[0].meshes, vec![0, 1]);
        assert_eq!(model.nodes[0].mesh_group_id, 0);
        assert_eq!(model.nodes[0].skeleton_id, NO_ID);
        assert_eq!(model.scenes[0].root_nodes, vec![0]);
        assert!(model.find_dangling_reference().is_none());

        let names: Vec<_> = converted.report.meshes.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["front", "back"]);
        assert_eq!(converted.report.index_count(), 12);
    }

    #[test]
    fn test_meshes_reference_allocated_buffer() {
        for parallel in [false, true] {
            let options = ConvertOptions {
                parallel,
                ..Default::default()
            };
            let mut model = convert_object(&two_quads(), &options).unwrap().model;

            assert_eq!(model.buffers.len(), 1);
            let buffer_id = (model.buffers.len() - 1) as u32;
            for mesh in &model.meshes {
                let spans = mesh.buffer_spans();
                assert_eq!(spans.len(), 4);
                assert!(spans.iter().all(|s| s.reference.buffer_id == buffer_id));
            }
            // The allocator continues past the shared buffer
            assert_eq!(model.add_buffer(), buffer_id + 1);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let object = two_quads();
        let sequential = convert_object(&object, &ConvertOptions::default()).unwrap();
        let parallel = convert_object(
            &object,
            &ConvertOptions {
                parallel: true,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(parallel.model.meshes.len(), sequential.model.meshes.len());
        for (a, b) in parallel.model.meshes.iter().zip(&sequential.model.meshes) {
            assert_eq!(a.draw_count, b.draw_count);
            assert_eq!(a.vertex_count, b.vertex_count);
            let read = |model: &Model, mesh: &Mesh| {
                model.buffers[0]
                    .read::<Vec3>(mesh.positions.offset, mesh.vertex_count as usize)
                    .unwrap()
            };
            assert_eq!(read(&parallel.model, a), read(&sequential.model, b));
        }
        assert_eq!(
            parallel.model.buffers[0].size(),
            sequential.model.buffers[0].size()
        );
    }

    #[test]
    fn test_group_failure_fails_conversion() {
        let mut object = two_quads();
        object.groups[1].faces[0].corners[2].position = 99;

        for parallel in [false, true] {
            let options = ConvertOptions {
                parallel,
                ..Default::default()
            };
            let result = convert_object(&object, &options);
            assert!(matches!(
                result,
                Err(ConvertError::IndexOutOfRange {
                    attribute: Attribute::Position,
                    index: 99,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_empty_object() {
        let object = Object {
            name: "empty".into(),
            ..Default::default()
        };
        let converted = convert_object(&object, &ConvertOptions::default()).unwrap();

        assert!(converted.model.meshes.is_empty());
        assert!(converted.model.mesh_groups[0].meshes.is_empty());
        assert!(converted.model.buffers[0].is_empty());
        assert_eq!(converted.model.header.vertices_count, 0);
    }
}
