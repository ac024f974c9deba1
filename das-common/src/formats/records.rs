//! [`Record`] implementations for every structure kind.

use std::io::{Read, Write};

use super::serialization::{ByteReader, ByteWriter, Record, read_section, write_section};
use crate::buffer::PackedBuffer;
use crate::error::FormatError;
use crate::structures::*;

impl Record for PackedBuffer {
    const IDENTIFIER: StructureIdentifier = StructureIdentifier::Buffer;

    fn write_body<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError> {
        w.u32(self.size())?;
        w.bytes(self.as_bytes())
    }

    fn read_body<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError> {
        let len = r.u32()? as usize;
        Ok(PackedBuffer::from_bytes(r.bytes(len)?)?)
    }
}

impl Record for MorphTarget {
    const IDENTIFIER: StructureIdentifier = StructureIdentifier::MorphTarget;

    fn write_body<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError> {
        w.buffer_ref(self.indices)?;
        w.buffer_ref(self.positions)?;
        w.buffer_ref(self.normals)?;
        for uv in &self.uvs {
            w.buffer_ref(*uv)?;
        }
        w.buffer_ref(self.color_multiplier)
    }

    fn read_body<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError> {
        let indices = r.buffer_ref()?;
        let positions = r.buffer_ref()?;
        let normals = r.buffer_ref()?;
        let mut uvs = [BufferRef::NONE; MAX_UV_CHANNELS];
        for uv in &mut uvs {
            *uv = r.buffer_ref()?;
        }
        Ok(MorphTarget {
            indices,
            positions,
            normals,
            uvs,
            color_multiplier: r.buffer_ref()?,
        })
    }
}

impl Record for Mesh {
    const IDENTIFIER: StructureIdentifier = StructureIdentifier::Mesh;

    fn write_body<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError> {
        w.buffer_ref(self.indices)?;
        w.u32(self.draw_count)?;
        w.u32(self.vertex_count)?;
        w.buffer_ref(self.positions)?;
        w.buffer_ref(self.normals)?;
        for r in self
            .uvs
            .iter()
            .chain(std::iter::once(&self.color_multiplier))
            .chain(&self.joint_indices)
            .chain(&self.joint_weights)
        {
            w.buffer_ref(*r)?;
        }
        w.u8(self.material_type as u8)?;
        w.u32(self.material_id)?;
        write_section(w, &self.morph_targets)?;
        write_section(w, &self.lods)
    }

    fn read_body<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError> {
        let mut mesh = Mesh {
            indices: r.buffer_ref()?,
            draw_count: r.u32()?,
            vertex_count: r.u32()?,
            positions: r.buffer_ref()?,
            normals: r.buffer_ref()?,
            ..Default::default()
        };
        for uv in &mut mesh.uvs {
            *uv = r.buffer_ref()?;
        }
        mesh.color_multiplier = r.buffer_ref()?;
        for joint in &mut mesh.joint_indices {
            *joint = r.buffer_ref()?;
        }
        for weight in &mut mesh.joint_weights {
            *weight = r.buffer_ref()?;
        }
        let material = r.u8()?;
        mesh.material_type = MaterialType::from_u8(material).ok_or(FormatError::InvalidEnum {
            kind: "material type",
            value: material,
        })?;
        mesh.material_id = r.u32()?;
        mesh.morph_targets = read_section(r)?;
        mesh.lods = read_section(r)?;
        Ok(mesh)
    }
}

impl Record for MeshGroup {
    const IDENTIFIER: StructureIdentifier = StructureIdentifier::MeshGroup;

    fn write_body<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError> {
        w.string(&self.name)?;
        w.ids(&self.meshes)
    }

    fn read_body<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError> {
        Ok(MeshGroup {
            name: r.string()?,
            meshes: r.ids()?,
        })
    }
}

impl Record for Node {
    const IDENTIFIER: StructureIdentifier = StructureIdentifier::Node;

    fn write_body<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError> {
        w.string(&self.name)?;
        w.ids(&self.children)?;
        w.u32(self.mesh_group_id)?;
        w.u32(self.skeleton_id)?;
        w.mat4(&self.custom_transform)?;
        w.quat(self.rotation)?;
        w.vec3(self.translation)?;
        w.f32(self.scale)
    }

    fn read_body<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError> {
        Ok(Node {
            name: r.string()?,
            children: r.ids()?,
            mesh_group_id: r.u32()?,
            skeleton_id: r.u32()?,
            custom_transform: r.mat4()?,
            rotation: r.quat()?,
            translation: r.vec3()?,
            scale: r.f32()?,
        })
    }
}

impl Record for Scene {
    const IDENTIFIER: StructureIdentifier = StructureIdentifier::Scene;

    fn write_body<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError> {
        w.string(&self.name)?;
        w.ids(&self.root_nodes)
    }

    fn read_body<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError> {
        Ok(Scene {
            name: r.string()?,
            root_nodes: r.ids()?,
        })
    }
}

impl Record for SkeletonJoint {
    const IDENTIFIER: StructureIdentifier = StructureIdentifier::SkeletonJoint;

    fn write_body<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError> {
        w.string(&self.name)?;
        w.ids(&self.children)?;
        w.mat4(&self.inverse_bind_pose)?;
        w.quat(self.rotation)?;
        w.vec3(self.translation)?;
        w.f32(self.scale)
    }

    fn read_body<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError> {
        Ok(SkeletonJoint {
            name: r.string()?,
            children: r.ids()?,
            inverse_bind_pose: r.mat4()?,
            rotation: r.quat()?,
            translation: r.vec3()?,
            scale: r.f32()?,
        })
    }
}

impl Record for Skeleton {
    const IDENTIFIER: StructureIdentifier = StructureIdentifier::Skeleton;

    fn write_body<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError> {
        w.string(&self.name)?;
        w.u32(self.parent)?;
        w.ids(&self.joints)
    }

    fn read_body<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError> {
        Ok(Skeleton {
            name: r.string()?,
            parent: r.u32()?,
            joints: r.ids()?,
        })
    }
}

impl Record for Animation {
    const IDENTIFIER: StructureIdentifier = StructureIdentifier::Animation;

    fn write_body<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError> {
        w.string(&self.name)?;
        w.ids(&self.channels)
    }

    fn read_body<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError> {
        Ok(Animation {
            name: r.string()?,
            channels: r.ids()?,
        })
    }
}

fn write_value<W: Write>(w: &mut ByteWriter<W>, value: &ChannelValue) -> Result<(), FormatError> {
    match value {
        ChannelValue::Weights(weights) => w.f32s(weights),
        ChannelValue::Translation(t) => w.vec3(*t),
        ChannelValue::Rotation(q) => w.quat(*q),
        ChannelValue::Scale(s) => w.f32(*s),
    }
}

fn read_value<R: Read>(
    r: &mut ByteReader<R>,
    target: AnimationTarget,
    weight_count: u32,
) -> Result<ChannelValue, FormatError> {
    Ok(match target {
        AnimationTarget::Weights => ChannelValue::Weights(
            (0..weight_count)
                .map(|_| r.f32())
                .collect::<Result<_, _>>()?,
        ),
        AnimationTarget::Translation => ChannelValue::Translation(r.vec3()?),
        AnimationTarget::Rotation => ChannelValue::Rotation(r.quat()?),
        AnimationTarget::Scale => ChannelValue::Scale(r.f32()?),
        AnimationTarget::Unknown => return Err(FormatError::ChannelMismatch(target)),
    })
}

impl Record for AnimationChannel {
    const IDENTIFIER: StructureIdentifier = StructureIdentifier::AnimationChannel;

    fn write_body<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError> {
        w.u32(self.node_id)?;
        w.u32(self.joint_id)?;
        w.u8(self.target() as u8)?;
        w.u8(self.interpolation as u8)?;
        w.u32(self.keyframe_count())?;
        w.u32(self.weight_count())?;
        w.f32s(self.keyframes())?;
        for value in self.values() {
            write_value(w, value)?;
        }
        w.u32(self.tangents().len() as u32)?;
        for triple in self.tangents() {
            for value in triple {
                write_value(w, value)?;
            }
        }
        Ok(())
    }

    fn read_body<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError> {
        let node_id = r.u32()?;
        let joint_id = r.u32()?;
        let target = r.u8()?;
        let target = AnimationTarget::from_u8(target).ok_or(FormatError::InvalidEnum {
            kind: "animation target",
            value: target,
        })?;
        let interpolation = r.u8()?;
        let interpolation =
            InterpolationType::from_u8(interpolation).ok_or(FormatError::InvalidEnum {
                kind: "interpolation type",
                value: interpolation,
            })?;
        let keyframe_count = r.u32()?;
        let weight_count = r.u32()?;

        let mut channel = match target {
            AnimationTarget::Weights => {
                AnimationChannel::with_weights(weight_count, interpolation)
            }
            _ if weight_count != 0 => return Err(FormatError::ChannelMismatch(target)),
            _ => AnimationChannel::new(target, interpolation),
        };
        channel.node_id = node_id;
        channel.joint_id = joint_id;

        let times = (0..keyframe_count)
            .map(|_| r.f32())
            .collect::<Result<Vec<_>, _>>()?;
        let values = (0..keyframe_count)
            .map(|_| read_value(r, target, weight_count))
            .collect::<Result<Vec<_>, _>>()?;

        let tangent_count = r.u32()?;
        if tangent_count == 0 {
            for (time, value) in times.into_iter().zip(values) {
                channel.push_keyframe(time, value)?;
            }
        } else if tangent_count == keyframe_count {
            for (time, value) in times.into_iter().zip(values) {
                let tangents = [
                    read_value(r, target, weight_count)?,
                    read_value(r, target, weight_count)?,
                    read_value(r, target, weight_count)?,
                ];
                channel.push_spline_keyframe(time, value, tangents)?;
            }
        } else {
            return Err(FormatError::MixedKeyframes);
        }

        Ok(channel)
    }
}

impl Record for MaterialPhong {
    const IDENTIFIER: StructureIdentifier = StructureIdentifier::MaterialPhong;

    fn write_body<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError> {
        w.string(&self.name)?;
        w.vec4(self.diffuse)?;
        w.vec4(self.specular)?;
        w.vec4(self.emission)?;
        w.string(&self.diffuse_map_uri)?;
        w.string(&self.specular_map_uri)?;
        w.string(&self.emission_map_uri)
    }

    fn read_body<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError> {
        Ok(MaterialPhong {
            name: r.string()?,
            diffuse: r.vec4()?,
            specular: r.vec4()?,
            emission: r.vec4()?,
            diffuse_map_uri: r.string()?,
            specular_map_uri: r.string()?,
            emission_map_uri: r.string()?,
        })
    }
}

impl Record for MaterialPbr {
    const IDENTIFIER: StructureIdentifier = StructureIdentifier::MaterialPbr;

    fn write_body<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), FormatError> {
        w.string(&self.name)?;
        w.vec4(self.albedo_factor)?;
        w.vec4(self.emissive_factor)?;
        w.f32(self.roughness)?;
        w.f32(self.metallic)?;
        w.f32(self.ambient_occlusion)?;
        w.string(&self.albedo_map_uri)?;
        w.string(&self.emission_map_uri)?;
        w.string(&self.roughness_map_uri)?;
        w.string(&self.metallic_map_uri)?;
        w.string(&self.ambient_occlusion_map_uri)
    }

    fn read_body<R: Read>(r: &mut ByteReader<R>) -> Result<Self, FormatError> {
        Ok(MaterialPbr {
            name: r.string()?,
            albedo_factor: r.vec4()?,
            emissive_factor: r.vec4()?,
            roughness: r.f32()?,
            metallic: r.f32()?,
            ambient_occlusion: r.f32()?,
            albedo_map_uri: r.string()?,
            emission_map_uri: r.string()?,
            roughness_map_uri: r.string()?,
            metallic_map_uri: r.string()?,
            ambient_occlusion_map_uri: r.string()?,
        })
    }
}
