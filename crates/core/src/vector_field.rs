//! Dense 2D vector field sampled once per pixel.
//!
//! A [`VectorField`] stores one [`DVec2`] per integer coordinate in
//! `[0, width) x [0, height)` using row-major layout. The grid is filled once
//! from a [`FieldPolicy`] and only read afterwards. Unlike a toroidal grid,
//! out-of-range lookups clamp to the nearest edge cell.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Amplitude applied to the sinusoidal flow pattern.
const FLOW_AMPLITUDE: f64 = 10.0;
/// Downward gravity in pixel units.
const DEFAULT_GRAVITY: DVec2 = DVec2::new(0.0, 9.8);
/// Default mix between the x-driven and y-driven flow terms.
const DEFAULT_DAMPING: f64 = 0.8;
/// Default spatial wavelength of the flow pattern, in pixels.
const DEFAULT_WAVELENGTH: f64 = 50.0;

/// All recognized policy names.
const POLICY_NAMES: &[&str] = &["constant", "sinusoidal"];

/// How the field is populated at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldPolicy {
    /// Every cell holds the same vector.
    Constant { x: f64, y: f64 },
    /// Smooth swirling flow built from sine/cosine terms.
    ///
    /// `damping` (k) blends the x-driven term against the y-driven term and
    /// `wavelength` (L) sets the spatial period.
    Sinusoidal { damping: f64, wavelength: f64 },
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self::gravity()
    }
}

impl FieldPolicy {
    /// Constant downward gravity `(0, 9.8)`.
    pub fn gravity() -> Self {
        Self::Constant {
            x: DEFAULT_GRAVITY.x,
            y: DEFAULT_GRAVITY.y,
        }
    }

    /// Sinusoidal flow with `k = 0.8` and `L = 50`.
    pub fn flow() -> Self {
        Self::Sinusoidal {
            damping: DEFAULT_DAMPING,
            wavelength: DEFAULT_WAVELENGTH,
        }
    }

    /// Constructs the default policy of the given kind.
    ///
    /// Returns `SimError::UnknownPolicy` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, SimError> {
        match name {
            "constant" => Ok(Self::gravity()),
            "sinusoidal" => Ok(Self::flow()),
            _ => Err(SimError::UnknownPolicy(name.to_string())),
        }
    }

    /// Returns a slice of all recognized policy names.
    pub fn list_names() -> &'static [&'static str] {
        POLICY_NAMES
    }

    /// The name this policy is known by.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "constant",
            Self::Sinusoidal { .. } => "sinusoidal",
        }
    }

    /// Checks that the policy parameters produce a finite field.
    pub fn validate(&self) -> Result<(), SimError> {
        match *self {
            Self::Constant { x, y } => {
                if !x.is_finite() || !y.is_finite() {
                    return Err(SimError::invalid_param(
                        "gravity",
                        "components must be finite",
                    ));
                }
            }
            Self::Sinusoidal {
                damping,
                wavelength,
            } => {
                if !(0.0..=1.0).contains(&damping) {
                    return Err(SimError::invalid_param(
                        "damping",
                        format!("must lie in [0, 1], got {damping}"),
                    ));
                }
                if !wavelength.is_finite() || wavelength <= 0.0 {
                    return Err(SimError::invalid_param(
                        "wavelength",
                        format!("must be finite and positive, got {wavelength}"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Evaluates the closed-form field at `(x, y)`.
    pub fn evaluate(&self, x: f64, y: f64) -> DVec2 {
        match *self {
            Self::Constant { x: cx, y: cy } => DVec2::new(cx, cy),
            Self::Sinusoidal {
                damping: k,
                wavelength: l,
            } => {
                let sx = (x / l).sin();
                DVec2::new(
                    (1.0 - k) * sx + k * (y / l).sin(),
                    (1.0 - k) * sx - k * (y / l).cos(),
                ) * FLOW_AMPLITUDE
            }
        }
    }
}

/// A `width x height` grid of force samples.
#[derive(Debug, Clone)]
pub struct VectorField {
    width: usize,
    height: usize,
    data: Vec<DVec2>,
}

impl VectorField {
    /// Fills a new field by evaluating `policy` at every integer coordinate.
    ///
    /// Returns `SimError::InvalidDimensions` if either dimension is zero, or
    /// `width * height` overflows or cannot be allocated, and
    /// `SimError::InvalidParam` if the policy does not validate.
    pub fn generate(width: usize, height: usize, policy: &FieldPolicy) -> Result<Self, SimError> {
        let len = cell_count(width, height)?;
        policy.validate()?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| SimError::InvalidDimensions)?;
        for y in 0..height {
            for x in 0..width {
                data.push(policy.evaluate(x as f64, y as f64));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wraps a prebuilt row-major grid, validating that
    /// `data.len() == width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<DVec2>) -> Result<Self, SimError> {
        let expected = cell_count(width, height)?;
        if data.len() != expected {
            return Err(SimError::DimensionMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Field width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[DVec2] {
        &self.data
    }

    /// Returns the vector stored nearest to `(x, y)`.
    ///
    /// Coordinates are clamped to `[0, width - 1]` and `[0, height - 1]`, so
    /// any pair of integers is a valid query.
    pub fn sample(&self, x: isize, y: isize) -> DVec2 {
        let xi = clamp_index(x, self.width);
        let yi = clamp_index(y, self.height);
        self.data[yi * self.width + xi]
    }

    /// Samples the cell nearest to a continuous position.
    pub fn sample_at(&self, position: DVec2) -> DVec2 {
        // `as` saturates on overflow and maps NaN to 0.
        self.sample(position.x.round() as isize, position.y.round() as isize)
    }

    /// Largest vector length in the field.
    pub fn max_magnitude(&self) -> f64 {
        self.data.iter().map(|v| v.length()).fold(0.0, f64::max)
    }

    /// Iterates over all cells yielding `(x, y, vector)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, DVec2)> + '_ {
        self.data.iter().enumerate().map(|(i, &v)| {
            let x = i % self.width;
            let y = i / self.width;
            (x, y, v)
        })
    }
}

fn cell_count(width: usize, height: usize) -> Result<usize, SimError> {
    if width == 0 || height == 0 {
        return Err(SimError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(SimError::InvalidDimensions)
}

fn clamp_index(value: isize, len: usize) -> usize {
    if value <= 0 {
        0
    } else {
        (value as usize).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn assert_close(got: DVec2, expected: DVec2) {
        assert!(
            (got - expected).length() < EPS,
            "expected {expected:?}, got {got:?}"
        );
    }

    // -- FieldPolicy --

    #[test]
    fn sinusoidal_at_origin_matches_closed_form() {
        let policy = FieldPolicy::Sinusoidal {
            damping: 0.8,
            wavelength: 30.0,
        };
        assert_close(policy.evaluate(0.0, 0.0), DVec2::new(0.0, -8.0));
    }

    #[test]
    fn sinusoidal_off_origin_matches_closed_form() {
        let policy = FieldPolicy::Sinusoidal {
            damping: 0.25,
            wavelength: 20.0,
        };
        let (x, y) = (37.0_f64, 11.0_f64);
        let expected = DVec2::new(
            0.75 * (x / 20.0).sin() + 0.25 * (y / 20.0).sin(),
            0.75 * (x / 20.0).sin() - 0.25 * (y / 20.0).cos(),
        ) * 10.0;
        assert_close(policy.evaluate(x, y), expected);
    }

    #[test]
    fn constant_policy_ignores_position() {
        let policy = FieldPolicy::gravity();
        assert_close(policy.evaluate(0.0, 0.0), DVec2::new(0.0, 9.8));
        assert_close(policy.evaluate(600.0, 10.0), DVec2::new(0.0, 9.8));
    }

    #[test]
    fn from_name_recognizes_all_listed_names() {
        for name in FieldPolicy::list_names() {
            let policy = FieldPolicy::from_name(name).unwrap();
            assert_eq!(policy.name(), *name);
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        assert!(matches!(
            FieldPolicy::from_name("spiral"),
            Err(SimError::UnknownPolicy(_))
        ));
    }

    #[test]
    fn validate_rejects_damping_out_of_range() {
        let policy = FieldPolicy::Sinusoidal {
            damping: 1.5,
            wavelength: 30.0,
        };
        assert!(matches!(
            policy.validate(),
            Err(SimError::InvalidParam { .. })
        ));
    }

    #[test]
    fn validate_rejects_non_positive_wavelength() {
        for wavelength in [0.0, -3.0, f64::INFINITY] {
            let policy = FieldPolicy::Sinusoidal {
                damping: 0.5,
                wavelength,
            };
            assert!(policy.validate().is_err(), "accepted L = {wavelength}");
        }
    }

    #[test]
    fn validate_rejects_non_finite_gravity() {
        let policy = FieldPolicy::Constant {
            x: f64::NAN,
            y: 9.8,
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn policy_serializes_as_tagged_variant() {
        let json = serde_json::to_value(FieldPolicy::flow()).unwrap();
        assert_eq!(json["kind"], "sinusoidal");
        assert_eq!(json["damping"], 0.8);
        let back: FieldPolicy = serde_json::from_value(json).unwrap();
        assert_eq!(back, FieldPolicy::flow());
    }

    // -- VectorField construction --

    #[test]
    fn generate_fills_every_cell() {
        let field = VectorField::generate(4, 3, &FieldPolicy::gravity()).unwrap();
        assert_eq!(field.width(), 4);
        assert_eq!(field.height(), 3);
        assert_eq!(field.data().len(), 12);
        assert!(field
            .data()
            .iter()
            .all(|v| (*v - DVec2::new(0.0, 9.8)).length() < EPS));
    }

    #[test]
    fn generate_uses_row_major_coordinates() {
        let policy = FieldPolicy::flow();
        let field = VectorField::generate(8, 5, &policy).unwrap();
        assert_close(field.sample(6, 2), policy.evaluate(6.0, 2.0));
        assert_close(field.data()[2 * 8 + 6], policy.evaluate(6.0, 2.0));
    }

    #[test]
    fn generate_with_zero_dimension_returns_error() {
        let policy = FieldPolicy::gravity();
        assert!(matches!(
            VectorField::generate(0, 5, &policy),
            Err(SimError::InvalidDimensions)
        ));
        assert!(matches!(
            VectorField::generate(5, 0, &policy),
            Err(SimError::InvalidDimensions)
        ));
    }

    #[test]
    fn generate_with_overflow_dimensions_returns_error() {
        assert!(VectorField::generate(usize::MAX, 2, &FieldPolicy::gravity()).is_err());
    }

    #[test]
    fn generate_with_unallocatable_dimensions_returns_error() {
        let result = VectorField::generate(1_000_000_000, 1_000_000_000, &FieldPolicy::gravity());
        assert!(matches!(result, Err(SimError::InvalidDimensions)));
    }

    #[test]
    fn generate_rejects_invalid_policy() {
        let policy = FieldPolicy::Sinusoidal {
            damping: -0.1,
            wavelength: 30.0,
        };
        assert!(VectorField::generate(4, 4, &policy).is_err());
    }

    #[test]
    fn from_data_rejects_wrong_length() {
        let result = VectorField::from_data(2, 2, vec![DVec2::ZERO; 3]);
        assert!(matches!(
            result,
            Err(SimError::DimensionMismatch {
                expected: 4,
                got: 3
            })
        ));
    }

    // -- Sampling --

    #[test]
    fn sample_clamps_negative_and_overflowing_coordinates() {
        let data = (0..6).map(|i| DVec2::new(i as f64, 0.0)).collect();
        let field = VectorField::from_data(3, 2, data).unwrap();
        assert_eq!(field.sample(-4, 0), field.sample(0, 0));
        assert_eq!(field.sample(99, 0), field.sample(2, 0));
        assert_eq!(field.sample(1, -1), field.sample(1, 0));
        assert_eq!(field.sample(1, 7), field.sample(1, 1));
        assert_eq!(field.sample(isize::MAX, isize::MIN), field.sample(2, 0));
    }

    #[test]
    fn sample_at_rounds_to_nearest_cell() {
        let data = (0..9).map(|i| DVec2::new(i as f64, 0.0)).collect();
        let field = VectorField::from_data(3, 3, data).unwrap();
        assert_eq!(field.sample_at(DVec2::new(0.6, 1.4)), field.sample(1, 1));
        assert_eq!(field.sample_at(DVec2::new(1.49, 0.5)), field.sample(1, 1));
    }

    #[test]
    fn sample_at_boundary_position_stays_in_range() {
        let field = VectorField::generate(640, 480, &FieldPolicy::flow()).unwrap();
        assert_eq!(
            field.sample_at(DVec2::new(640.0, 480.0)),
            field.sample(639, 479)
        );
        assert_eq!(
            field.sample_at(DVec2::new(f64::NAN, -1e300)),
            field.sample(0, 0)
        );
    }

    #[test]
    fn max_magnitude_of_gravity_field() {
        let field = VectorField::generate(3, 3, &FieldPolicy::gravity()).unwrap();
        assert!((field.max_magnitude() - 9.8).abs() < EPS);
    }

    #[test]
    fn iter_yields_all_triples_in_row_major_order() {
        let field = VectorField::generate(3, 2, &FieldPolicy::gravity()).unwrap();
        let coords: Vec<(usize, usize)> = field.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn dimension() -> impl Strategy<Value = usize> {
            1_usize..=48
        }

        fn any_coord() -> impl Strategy<Value = isize> {
            -1000_isize..=1000
        }

        fn any_policy() -> impl Strategy<Value = FieldPolicy> {
            prop_oneof![
                (-50.0_f64..50.0, -50.0_f64..50.0).prop_map(|(x, y)| FieldPolicy::Constant { x, y }),
                (0.0_f64..=1.0, 1.0_f64..200.0).prop_map(|(damping, wavelength)| {
                    FieldPolicy::Sinusoidal {
                        damping,
                        wavelength,
                    }
                }),
            ]
        }

        proptest! {
            #[test]
            fn sampling_is_deterministic(
                policy in any_policy(),
                w in dimension(),
                h in dimension(),
                x in any_coord(),
                y in any_coord(),
            ) {
                let field = VectorField::generate(w, h, &policy).unwrap();
                let first = field.sample(x, y);
                let second = field.sample(x, y);
                prop_assert_eq!(first.x.to_bits(), second.x.to_bits());
                prop_assert_eq!(first.y.to_bits(), second.y.to_bits());

                let rebuilt = VectorField::generate(w, h, &policy).unwrap();
                prop_assert_eq!(rebuilt.sample(x, y), first);
            }

            #[test]
            fn out_of_range_x_matches_clamped_x(
                policy in any_policy(),
                w in dimension(),
                h in dimension(),
                x in any_coord(),
                y in any_coord(),
            ) {
                let field = VectorField::generate(w, h, &policy).unwrap();
                let clamped = x.clamp(0, w as isize - 1);
                prop_assert_eq!(field.sample(x, y), field.sample(clamped, y));
            }

            #[test]
            fn sinusoidal_magnitude_is_bounded(
                damping in 0.0_f64..=1.0,
                wavelength in 1.0_f64..200.0,
                x in -1000.0_f64..1000.0,
                y in -1000.0_f64..1000.0,
            ) {
                let policy = FieldPolicy::Sinusoidal { damping, wavelength };
                let v = policy.evaluate(x, y);
                prop_assert!(v.x.abs() <= 10.0 + 1e-9);
                prop_assert!(v.y.abs() <= 10.0 + 1e-9);
            }
        }
    }
}
