use glam::Vec4;

use crate::BinString;

/// Classic diffuse/specular/emission material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialPhong {
    pub name: BinString,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub emission: Vec4,
    pub diffuse_map_uri: BinString,
    pub specular_map_uri: BinString,
    pub emission_map_uri: BinString,
}

impl Default for MaterialPhong {
    fn default() -> Self {
        Self {
            name: BinString::default(),
            diffuse: Vec4::W,
            specular: Vec4::W,
            emission: Vec4::W,
            diffuse_map_uri: BinString::default(),
            specular_map_uri: BinString::default(),
            emission_map_uri: BinString::default(),
        }
    }
}

/// Metallic/roughness material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialPbr {
    pub name: BinString,
    pub albedo_factor: Vec4,
    pub emissive_factor: Vec4,
    pub roughness: f32,
    pub metallic: f32,
    pub ambient_occlusion: f32,
    pub albedo_map_uri: BinString,
    pub emission_map_uri: BinString,
    pub roughness_map_uri: BinString,
    pub metallic_map_uri: BinString,
    pub ambient_occlusion_map_uri: BinString,
}

impl Default for MaterialPbr {
    fn default() -> Self {
        Self {
            name: BinString::default(),
            albedo_factor: Vec4::ONE,
            emissive_factor: Vec4::W,
            roughness: 0.0,
            metallic: 0.0,
            ambient_occlusion: 1.0,
            albedo_map_uri: BinString::default(),
            emission_map_uri: BinString::default(),
            roughness_map_uri: BinString::default(),
            metallic_map_uri: BinString::default(),
            ambient_occlusion_map_uri: BinString::default(),
        }
    }
}
