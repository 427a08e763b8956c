//! D2Q9 lattice constants
//!
//! Nine velocity directions on the square lattice:
//! ```text
//!   6   2   5
//!    \  |  /
//!   3 - 0 - 1
//!    /  |  \
//!   7   4   8
//! ```
//!
//! Distributions are stored cell-major: the 9 values of one cell are
//! contiguous, cells are row-major with row 0 at the bottom of the tunnel.

/// Directions per cell
pub const Q: usize = 9;

/// Lattice vectors e[d] = (ex, ey)
pub const E: [[i32; 2]; Q] = [
    [0, 0],   // 0: rest
    [1, 0],   // 1: east
    [0, 1],   // 2: north
    [-1, 0],  // 3: west
    [0, -1],  // 4: south
    [1, 1],   // 5: northeast
    [-1, 1],  // 6: northwest
    [-1, -1], // 7: southwest
    [1, -1],  // 8: southeast
];

/// Quadrature weights
pub const W: [f32; Q] = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// Opposite direction, used by every bounce-back rule
pub const OPP: [usize; Q] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

/// Lower bound of the post-streaming clamp
pub const F_MIN: f32 = 1e-5;
/// Upper bound of the post-streaming clamp
pub const F_MAX: f32 = 1.0;

/// f_eq[d] = w[d] ρ (1 + 3(e·u) + 4.5(e·u)² - 1.5|u|²)
#[inline(always)]
pub fn equilibrium(d: usize, rho: f32, ux: f32, uy: f32) -> f32 {
    let eu = E[d][0] as f32 * ux + E[d][1] as f32 * uy;
    let uu = ux * ux + uy * uy;
    W[d] * rho * (1.0 + 3.0 * eu + 4.5 * eu * eu - 1.5 * uu)
}

/// All nine equilibrium values for one cell
#[inline]
pub fn equilibrium_cell(rho: f32, ux: f32, uy: f32) -> [f32; Q] {
    std::array::from_fn(|d| equilibrium(d, rho, ux, uy))
}

/// Density and velocity of one cell: (ρ, ux, uy)
///
/// A cell with zero density reports zero velocity.
#[inline(always)]
pub fn moments(f: &[f32]) -> (f32, f32, f32) {
    let mut rho = 0.0;
    let mut jx = 0.0;
    let mut jy = 0.0;
    for d in 0..Q {
        rho += f[d];
        jx += f[d] * E[d][0] as f32;
        jy += f[d] * E[d][1] as f32;
    }
    if rho == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    (rho, jx / rho, jy / rho)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for d in 0..Q {
            assert_eq!(OPP[OPP[d]], d);
            assert_eq!(E[OPP[d]][0], -E[d][0]);
            assert_eq!(E[OPP[d]][1], -E[d][1]);
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let sum: f32 = W.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn equilibrium_reproduces_its_moments() {
        let feq = equilibrium_cell(1.2, 0.08, -0.03);
        let (rho, ux, uy) = moments(&feq);
        assert!((rho - 1.2).abs() < 1e-5);
        assert!((ux - 0.08).abs() < 1e-5);
        assert!((uy + 0.03).abs() < 1e-5);
    }

    #[test]
    fn empty_cell_has_zero_velocity() {
        assert_eq!(moments(&[0.0; Q]), (0.0, 0.0, 0.0));
    }
}
