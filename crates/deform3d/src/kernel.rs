//! Per-vertex displacement kernel.
//!
//! Pure functions with no hidden state: each vertex is displaced
//! independently from the immutable contact set, making the pass
//! embarrassingly parallel.

use glam::Vec3;
use rayon::prelude::*;

/// Displace a single vertex against a batch of contact points.
///
/// Contacts are tested in input order against the vertex's working position,
/// which is re-read after each update, so the last satisfying contact wins.
/// A triggered vertex is always reset to `original - (0, force, 0)` — depth
/// comes from the triggering batch's force alone, never accumulated.
///
/// The squared distance is compared against the raw radius, not radius
/// squared: the effective reach is `sqrt(radius)`.
#[inline]
pub fn displace(original: Vec3, current: Vec3, contacts: &[Vec3], radius: f32, force: f32) -> Vec3 {
    let mut result = current;
    for contact in contacts {
        let dist_sq = result.distance_squared(*contact);
        if dist_sq < radius {
            result = original + Vec3::NEG_Y * force;
        }
    }
    result
}

/// Run the displacement kernel over every vertex in parallel.
///
/// `working` is both source and destination: each index reads only its own
/// slot, so there are no cross-index writes. Empty inputs are a no-op.
pub fn displace_all(
    original: &[Vec3],
    working: &mut [Vec3],
    contacts: &[Vec3],
    radius: f32,
    force: f32,
) {
    if original.is_empty() || working.is_empty() || contacts.is_empty() {
        return;
    }
    debug_assert_eq!(original.len(), working.len());

    working.par_iter_mut().enumerate().for_each(|(i, vertex)| {
        *vertex = displace(original[i], *vertex, contacts, radius, force);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_in_range_is_indented() {
        let original = Vec3::new(1.0, 0.0, 1.0);
        let contact = Vec3::new(1.0, 0.0, 1.5);
        let result = displace(original, original, &[contact], 1.0, 0.5);
        assert_eq!(result, Vec3::new(1.0, -0.5, 1.0));
    }

    #[test]
    fn test_vertex_out_of_range_unchanged() {
        let original = Vec3::new(0.0, 0.0, 0.0);
        let contact = Vec3::new(5.0, 0.0, 0.0);
        let result = displace(original, original, &[contact], 1.0, 0.5);
        assert_eq!(result, original);
    }

    #[test]
    fn test_radius_is_compared_against_squared_distance() {
        // Distance 1.2 from contact: squared distance 1.44. With radius 1.4
        // the vertex stays put even though the plain distance is smaller
        // than the radius — reach is sqrt(radius), not radius.
        let original = Vec3::ZERO;
        let contact = Vec3::new(1.2, 0.0, 0.0);
        assert_eq!(displace(original, original, &[contact], 1.4, 1.0), original);
        // Bumping the radius past the squared distance triggers it.
        assert_eq!(
            displace(original, original, &[contact], 1.5, 1.0),
            Vec3::new(0.0, -1.0, 0.0)
        );
    }

    #[test]
    fn test_depth_not_accumulated() {
        let original = Vec3::ZERO;
        let contact = Vec3::ZERO;
        let once = displace(original, original, &[contact], 1.0, 0.3);
        let twice = displace(original, once, &[contact], 1.0, 0.3);
        assert_eq!(once, twice);
        assert_eq!(twice.y, -0.3);
    }

    #[test]
    fn test_later_force_resets_depth() {
        // A second triggering pass with a smaller force lifts the vertex
        // back toward the surface: depth tracks the most recent batch.
        let original = Vec3::ZERO;
        let contact = Vec3::ZERO;
        let deep = displace(original, original, &[contact], 1.0, 2.0);
        assert_eq!(deep.y, -2.0);
        let shallow = displace(original, deep, &[contact], 1.0, 0.5);
        assert_eq!(shallow.y, -0.5);
    }

    #[test]
    fn test_last_satisfying_contact_wins() {
        // Both contacts are in range; processing order means the result is
        // written twice and the final value is the same indentation.
        let original = Vec3::ZERO;
        let contacts = [Vec3::new(0.1, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.1)];
        let result = displace(original, original, &contacts, 1.0, 0.7);
        assert_eq!(result, Vec3::new(0.0, -0.7, 0.0));
    }

    #[test]
    fn test_earlier_contact_write_feeds_later_test() {
        // First contact indents the vertex; the second contact's range test
        // then sees the indented position, not the input.
        let original = Vec3::ZERO;
        let first = Vec3::ZERO;
        // In range only of the *indented* position (0, -1, 0).
        let second = Vec3::new(0.0, -1.1, 0.0);
        let result = displace(original, original, &[first, second], 0.5, 1.0);
        // Second contact triggered too (dist_sq 0.01 < 0.5), same target.
        assert_eq!(result, Vec3::new(0.0, -1.0, 0.0));

        // Without the first contact the second never fires.
        let alone = displace(original, original, &[second], 0.5, 1.0);
        assert_eq!(alone, original);
    }

    #[test]
    fn test_displace_all_empty_inputs_noop() {
        let original = [Vec3::ZERO, Vec3::X];
        let mut working = original;
        displace_all(&original, &mut working, &[], 1.0, 1.0);
        assert_eq!(working, original);

        let mut empty: Vec<Vec3> = Vec::new();
        displace_all(&[], &mut empty, &[Vec3::ZERO], 1.0, 1.0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_displace_all_matches_scalar_kernel() {
        let original: Vec<Vec3> = (0..32)
            .map(|i| Vec3::new(i as f32 * 0.25, 0.0, (i % 5) as f32))
            .collect();
        let contacts = [Vec3::new(2.0, 0.0, 1.0), Vec3::new(6.0, 0.0, 3.0)];

        let mut parallel = original.clone();
        displace_all(&original, &mut parallel, &contacts, 1.5, 0.4);

        let scalar: Vec<Vec3> = original
            .iter()
            .map(|&v| displace(v, v, &contacts, 1.5, 0.4))
            .collect();
        assert_eq!(parallel, scalar);
    }

    #[test]
    fn test_deterministic() {
        let original: Vec<Vec3> = (0..64)
            .map(|i| Vec3::new((i % 8) as f32, 0.0, (i / 8) as f32))
            .collect();
        let contacts = [Vec3::new(3.3, 0.0, 4.1)];

        let mut a = original.clone();
        let mut b = original.clone();
        displace_all(&original, &mut a, &contacts, 2.0, 0.8);
        displace_all(&original, &mut b, &contacts, 2.0, 0.8);
        // Bit-identical: no randomness, no time dependence.
        assert_eq!(a, b);
    }
}
