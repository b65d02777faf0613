use nalgebra::{Quaternion, UnitQuaternion};

use super::body::PhysicsBody;
use crate::vehicle::BehaviorFlags;

// ---------------------------------------------------------------------------
// Rotation limiter
// ---------------------------------------------------------------------------

/// Clamp roll/pitch against the roll reference frame, or lock them.
///
/// Works on the raw quaternion X/Y components, the way scripted vehicles
/// expect. Returns `true` when the body orientation was rewritten.
pub fn limit_rotation<B>(roll_frame: &UnitQuaternion<f64>, behavior: BehaviorFlags, body: &mut B) -> bool
where
    B: PhysicsBody + ?Sized,
{
    let current = *body.orientation().quaternion();
    let (mut x, mut y) = (current.i, current.j);

    if *roll_frame.quaternion() != Quaternion::identity() {
        let limit = roll_frame.quaternion();
        if current.i >= limit.i {
            x = current.i - limit.i / 2.0;
        }
        if current.j >= limit.j {
            y = current.j - limit.j / 2.0;
        }
        if current.i <= -limit.i {
            x = current.i + limit.i / 2.0;
        }
        if current.j <= -limit.j {
            y = current.j + limit.j / 2.0;
        }
    }

    if behavior.contains(BehaviorFlags::LOCK_ROTATION) {
        x = 0.0;
        y = 0.0;
    }

    if x == current.i && y == current.j {
        return false;
    }

    // A pure roll/pitch rotation locked flat has nothing left to normalize.
    match UnitQuaternion::try_new(Quaternion::new(current.w, x, y, current.k), 1e-9) {
        Some(limited) => {
            body.set_orientation(limited);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RigidBody;
    use nalgebra::Vector3;

    fn body_with(rot: UnitQuaternion<f64>) -> RigidBody {
        let mut b = RigidBody::at(Vector3::zeros());
        b.orientation = rot;
        b
    }

    #[test]
    fn identity_frame_without_lock_leaves_orientation() {
        let rot = UnitQuaternion::from_euler_angles(0.4, 0.2, 1.0);
        let mut body = body_with(rot);
        let changed = limit_rotation(&UnitQuaternion::identity(), BehaviorFlags::empty(), &mut body);
        assert!(!changed);
        assert_eq!(body.orientation, rot);
    }

    #[test]
    fn lock_rotation_keeps_only_yaw() {
        let rot = UnitQuaternion::from_euler_angles(0.4, -0.3, 1.0);
        let mut body = body_with(rot);
        assert!(limit_rotation(&UnitQuaternion::identity(), BehaviorFlags::LOCK_ROTATION, &mut body));
        let q = body.orientation.quaternion();
        assert!(q.i.abs() < 1e-12);
        assert!(q.j.abs() < 1e-12);
        assert!((q.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn lock_rotation_on_level_body_writes_nothing() {
        let rot = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.7);
        let mut body = body_with(rot);
        assert!(!limit_rotation(&UnitQuaternion::identity(), BehaviorFlags::LOCK_ROTATION, &mut body));
        assert_eq!(body.orientation, rot);
    }

    #[test]
    fn roll_beyond_frame_is_pulled_back() {
        let frame = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.2);
        let rolled = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.8);
        let mut body = body_with(rolled);
        assert!(limit_rotation(&frame, BehaviorFlags::empty(), &mut body));
        assert!(body.orientation.quaternion().i < rolled.quaternion().i);
    }

    fn expected(q: &UnitQuaternion<f64>, dx: f64, dy: f64) -> UnitQuaternion<f64> {
        let q = q.quaternion();
        UnitQuaternion::new_normalize(Quaternion::new(q.w, q.i + dx, q.j + dy, q.k))
    }

    #[test]
    fn negative_roll_beyond_frame_is_pushed_back_by_half_limit() {
        let frame = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.2);
        let rolled = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -0.8);
        let mut body = body_with(rolled);
        assert!(limit_rotation(&frame, BehaviorFlags::empty(), &mut body));

        let want = expected(&rolled, frame.quaternion().i / 2.0, 0.0);
        let got = body.orientation.quaternion();
        assert!((got.i - want.quaternion().i).abs() < 1e-12);
        assert!(got.i > rolled.quaternion().i);
        assert!(got.j.abs() < 1e-12);
    }

    #[test]
    fn pitch_beyond_frame_is_pulled_back_by_half_limit() {
        let frame = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.3);
        let pitched = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.9);
        let mut body = body_with(pitched);
        assert!(limit_rotation(&frame, BehaviorFlags::empty(), &mut body));

        let want = expected(&pitched, 0.0, -frame.quaternion().j / 2.0);
        let got = body.orientation.quaternion();
        assert!((got.j - want.quaternion().j).abs() < 1e-12);
        assert!(got.j < pitched.quaternion().j);
        assert!(got.i.abs() < 1e-12);
    }

    #[test]
    fn negative_pitch_beyond_frame_is_pushed_back() {
        let frame = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.3);
        let pitched = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -0.9);
        let mut body = body_with(pitched);
        assert!(limit_rotation(&frame, BehaviorFlags::empty(), &mut body));

        let want = expected(&pitched, 0.0, frame.quaternion().j / 2.0);
        assert!((body.orientation.quaternion().j - want.quaternion().j).abs() < 1e-12);
    }

    #[test]
    fn roll_inside_frame_is_untouched() {
        let frame = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.6);
        let rolled = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.1);
        let mut body = body_with(rolled);
        assert!(!limit_rotation(&frame, BehaviorFlags::empty(), &mut body));
        assert_eq!(body.orientation, rolled);
    }
}
