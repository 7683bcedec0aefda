use arrayvec::ArrayVec;
use std::f64::consts::PI;

/// Relative distance below which two roots are considered identical.
///
/// A double root is only determined to about the square root of machine
/// precision, so the tolerance cannot be much tighter.
const ROOT_TOLERANCE: f64 = 1e-7;
/// Relative size of the discriminant below which it is treated as zero.
const DISCRIMINANT_TOLERANCE: f64 = 1e-14;

/// All real roots of $x^3+c_2x^2+c_1x+c_0=0$ in ascending order.
///
/// The roots are obtained in closed form. For $p>0$ in the depressed cubic
/// there is exactly one real root, given by the hyperbolic solution. For
/// $p<0$ Cardano's formula is used if the discriminant is positive (one real
/// root), the trigonometric solution otherwise. Roots that coincide within a
/// relative tolerance are merged, so a (numerically) double root is reported
/// once.
pub fn solve_cubic(c2: f64, c1: f64, c0: f64) -> ArrayVec<f64, 3> {
    // depressed cubic t^3 + p t + q = 0 with x = t - c2/3
    let shift = -c2 / 3.0;
    let p = c1 - c2 * c2 / 3.0;
    let q = 2.0 * c2.powi(3) / 27.0 - c2 * c1 / 3.0 + c0;
    let discriminant = (0.5 * q).powi(2) + (p / 3.0).powi(3);
    let one_real_root = discriminant > DISCRIMINANT_TOLERANCE * q.powi(2).max(1.0);

    let mut roots = ArrayVec::new();
    if p.abs() < DISCRIMINANT_TOLERANCE {
        if one_real_root {
            roots.push(cardano(q, discriminant) + shift);
        } else {
            // triple root
            roots.push(shift);
        }
        return roots;
    }
    if p > 0.0 {
        // monotonic, stable for vanishing discriminant
        let m = 2.0 * (p / 3.0).sqrt();
        let arg = 1.5 * q / p * (3.0 / p).sqrt();
        roots.push(-m * (arg.asinh() / 3.0).sinh() + shift);
        return roots;
    }
    if one_real_root {
        roots.push(cardano(q, discriminant) + shift);
        return roots;
    }

    let m = 2.0 * (-p / 3.0).sqrt();
    let theta = (3.0 * q / (p * m)).clamp(-1.0, 1.0).acos() / 3.0;
    let mut candidates: [f64; 3] =
        [0.0, 1.0, 2.0].map(|k| m * (theta - 2.0 * PI * k / 3.0).cos() + shift);
    candidates.sort_by(|a, b| a.total_cmp(b));

    for x in candidates {
        match roots.last() {
            Some(&last) if (x - last).abs() <= ROOT_TOLERANCE * x.abs().max(1.0) => (),
            _ => roots.push(x),
        }
    }
    roots
}

fn cardano(q: f64, discriminant: f64) -> f64 {
    let sqrt_d = discriminant.max(0.0).sqrt();
    (-0.5 * q + sqrt_d).cbrt() + (-0.5 * q - sqrt_d).cbrt()
}
