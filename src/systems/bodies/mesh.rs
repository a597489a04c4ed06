use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy::render::mesh::Indices;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::PrimitiveTopology;
use rand::Rng;

// points on a flat circle in the XZ plane
pub fn circle_points(radius: f32, segments: usize) -> Vec<Vec3> {
    (0..segments)
        .map(|i| {
            let t = i as f32 / segments as f32 * TAU;
            Vec3::new(t.cos() * radius, 0.0, t.sin() * radius)
        })
        .collect()
}

// line mesh from a series of points, wraps around to close the loop
pub fn line_loop_mesh(points: &[Vec3]) -> Mesh {
    let positions: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();

    let mut indices = Vec::with_capacity(points.len() * 2);
    for i in 0..points.len() {
        let next_i = (i + 1) % points.len(); // wrap
        indices.push(i as u32);
        indices.push(next_i as u32);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(Indices::U32(indices));

    mesh
}

/// Random points on a thick shell between half and full `radius`.
pub fn starfield_points(rng: &mut impl Rng, count: usize, radius: f32) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            // uniform over the sphere, not clumped at the poles
            let phi = (2.0 * rng.random::<f32>() - 1.0).acos();
            let theta = TAU * rng.random::<f32>();
            let r = radius * (0.5 + 0.5 * rng.random::<f32>());

            Vec3::new(
                r * phi.sin() * theta.cos(),
                r * phi.cos(),
                r * phi.sin() * theta.sin(),
            )
        })
        .collect()
}

pub fn point_cloud_mesh(points: &[Vec3]) -> Mesh {
    let positions: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);

    mesh
}

// ico spheres can fail on absurd subdivisions, uv spheres can't
pub fn sphere_mesh(radius: f32, subdivisions: u32) -> Mesh {
    Sphere::new(radius)
        .mesh()
        .ico(subdivisions)
        .unwrap_or_else(|_| Sphere::new(radius).mesh().uv(48, 36))
}
