//! Conversions between LS3D's stored conventions and [`glam`] types.

use glam::Quat;

/// Builds a [`Quat`] from the component order rotations are stored in inside
/// scene files.
///
/// LS3D keeps the scalar component first, `(w, x, y, z)`, and uses the
/// opposite handedness to ours. The vector part carries over as-is and the
/// scalar's sign is flipped.
pub fn rotation_from_stored([w, x, y, z]: [f32; 4]) -> Quat {
    Quat::from_xyzw(x, y, z, -w)
}

#[cfg(test)]
mod tests {
    use super::rotation_from_stored;

    #[test]
    pub fn stored_rotation_reorders_components() {
        let quat = rotation_from_stored([0.5, 0.1, 0.2, 0.3]);
        assert_eq!(quat.x, 0.1);
        assert_eq!(quat.y, 0.2);
        assert_eq!(quat.z, 0.3);
        assert_eq!(quat.w, -0.5);
    }
}
