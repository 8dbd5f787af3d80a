use glam::{Vec2, Vec3};

use crate::geometry::VertexAttributes;

/// Indexed triangle list built from [`VertexAttributes`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<VertexAttributes>,
    pub indices: Vec<u32>,
}

/// Looks up a built-in mesh by the name used in scene files.
pub fn by_name(name: &str) -> Option<Mesh> {
    match name {
        "plane" => Some(plane()),
        "cube" => Some(cube()),
        "tetrahedron" => Some(tetrahedron()),
        _ => None,
    }
}

/// Unit quad in the XZ plane facing +Y.
pub fn plane() -> Mesh {
    let corners = [
        (Vec3::new(-1.0, 0.0, 1.0), Vec2::new(0.0, 0.0)),
        (Vec3::new(1.0, 0.0, 1.0), Vec2::new(1.0, 0.0)),
        (Vec3::new(1.0, 0.0, -1.0), Vec2::new(1.0, 1.0)),
        (Vec3::new(-1.0, 0.0, -1.0), Vec2::new(0.0, 1.0)),
    ];
    Mesh {
        vertices: corners
            .iter()
            .map(|&(position, uv)| VertexAttributes::new(position, Vec3::Y, uv))
            .collect(),
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

/// Cube of edge 1 centred at the origin with flat per-face normals.
pub fn cube() -> Mesh {
    // Each face: outward normal, then the two in-plane axes (u, v).
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    ];
    let corners = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    let mut mesh = Mesh::default();
    for (face, &(normal, u, v)) in faces.iter().enumerate() {
        for uv in corners {
            let position = normal * 0.5 + u * (uv.x - 0.5) + v * (uv.y - 0.5);
            mesh.vertices.push(VertexAttributes::new(position, normal, uv));
        }
        let base = face as u32 * 4;
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Regular tetrahedron centred at the origin with its apex on +Y.
pub fn tetrahedron() -> Mesh {
    let corners = [
        Vec3::new(0.0, -0.57735, -1.1547),
        Vec3::new(-1.0, -0.57735, 0.57735),
        Vec3::new(1.0, -0.57735, 0.57735),
        Vec3::new(0.0, 1.1547, 0.0),
    ];
    let faces = [[0, 2, 1], [0, 1, 3], [3, 2, 0], [2, 3, 1]];
    let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.5, 1.0)];

    let mut mesh = Mesh::default();
    for face in faces {
        let [a, b, c] = face.map(|i| corners[i]);
        let normal = (b - a).cross(c - a).normalize();
        let base = mesh.vertices.len() as u32;
        for (position, uv) in [a, b, c].into_iter().zip(uvs) {
            mesh.vertices.push(VertexAttributes::new(position, normal, uv));
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
    mesh
}
