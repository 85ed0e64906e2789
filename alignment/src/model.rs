//! Alignment model trait and the built-in single-point model

use crate::vector::TelescopeDirectionVector;
use std::f64::consts::PI;

/// One correspondence handed to an alignment model: the apparent direction
/// computed from catalog coordinates and the mount direction recorded for the
/// same moment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePair {
    pub apparent: TelescopeDirectionVector,
    pub mount: TelescopeDirectionVector,
}

/// Transforms between apparent (computed) and mount direction vectors.
///
/// Implementations decide how many reference pairs they need. Until
/// `initialise` has succeeded the transform methods return `None` and the
/// caller falls back to an approximate conversion.
pub trait AlignmentModel: Send {
    /// Rebuild the model from reference pairs. Returns false when there are
    /// not enough pairs for this model, leaving it unavailable.
    fn initialise(&mut self, pairs: &[ReferencePair]) -> bool;

    /// Map an apparent direction to the mount direction
    fn mount_from_apparent(
        &self,
        apparent: &TelescopeDirectionVector,
    ) -> Option<TelescopeDirectionVector>;

    /// Map a mount direction back to the apparent direction
    fn apparent_from_mount(
        &self,
        mount: &TelescopeDirectionVector,
    ) -> Option<TelescopeDirectionVector>;
}

/// Axis-angle rotation applied in Rodrigues form
#[derive(Debug, Clone, Copy)]
struct Rotation {
    axis: TelescopeDirectionVector,
    angle_radians: f64,
}

impl Rotation {
    /// Minimal rotation taking `from` onto `to`
    fn between(from: &TelescopeDirectionVector, to: &TelescopeDirectionVector) -> Self {
        let from = from.normalized();
        let to = to.normalized();
        let cos_angle = from.dot(&to).clamp(-1.0, 1.0);
        let axis = from.cross(&to);
        if axis.length() < 1e-9 {
            if cos_angle > 0.0 {
                return Self {
                    axis: TelescopeDirectionVector::new(0.0, 0.0, 1.0),
                    angle_radians: 0.0,
                };
            }
            // Opposite directions: half a turn around any perpendicular axis
            return Self {
                axis: perpendicular_to(&from),
                angle_radians: PI,
            };
        }
        Self {
            axis: axis.normalized(),
            angle_radians: cos_angle.acos(),
        }
    }

    fn apply(&self, vector: &TelescopeDirectionVector) -> TelescopeDirectionVector {
        rotate(vector, &self.axis, self.angle_radians)
    }

    fn apply_inverse(&self, vector: &TelescopeDirectionVector) -> TelescopeDirectionVector {
        rotate(vector, &self.axis, -self.angle_radians)
    }
}

/// Rotate `vector` around the unit `axis` by `angle` radians.
///
/// v' = v cos a + (k x v) sin a + k (k . v)(1 - cos a)
fn rotate(
    vector: &TelescopeDirectionVector,
    axis: &TelescopeDirectionVector,
    angle: f64,
) -> TelescopeDirectionVector {
    let (sin_angle, cos_angle) = angle.sin_cos();
    let cross = axis.cross(vector);
    let dot = axis.dot(vector);
    TelescopeDirectionVector {
        x: vector.x * cos_angle + cross.x * sin_angle + axis.x * dot * (1.0 - cos_angle),
        y: vector.y * cos_angle + cross.y * sin_angle + axis.y * dot * (1.0 - cos_angle),
        z: vector.z * cos_angle + cross.z * sin_angle + axis.z * dot * (1.0 - cos_angle),
    }
}

/// Some unit vector perpendicular to `vector`
fn perpendicular_to(vector: &TelescopeDirectionVector) -> TelescopeDirectionVector {
    let basis = if vector.x.abs() < 0.9 {
        TelescopeDirectionVector::new(1.0, 0.0, 0.0)
    } else {
        TelescopeDirectionVector::new(0.0, 1.0, 0.0)
    };
    vector.cross(&basis).normalized()
}

/// Alignment model that derives one rigid rotation from the most recent
/// reference pair.
///
/// Corrects a constant pointing offset. Flexure and axis misalignment need a
/// multi-point model behind the same trait.
#[derive(Debug, Default)]
pub struct SinglePointModel {
    rotation: Option<Rotation>,
}

impl SinglePointModel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlignmentModel for SinglePointModel {
    fn initialise(&mut self, pairs: &[ReferencePair]) -> bool {
        match pairs.last() {
            Some(pair) => {
                self.rotation = Some(Rotation::between(&pair.apparent, &pair.mount));
                true
            }
            None => {
                self.rotation = None;
                false
            }
        }
    }

    fn mount_from_apparent(
        &self,
        apparent: &TelescopeDirectionVector,
    ) -> Option<TelescopeDirectionVector> {
        Some(self.rotation.as_ref()?.apply(apparent))
    }

    fn apparent_from_mount(
        &self,
        mount: &TelescopeDirectionVector,
    ) -> Option<TelescopeDirectionVector> {
        Some(self.rotation.as_ref()?.apply_inverse(mount))
    }
}
