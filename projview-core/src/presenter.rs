/// Fixed-precision formatting of the transform matrix
use crate::transform::TransformMatrix;

/// Four rows of four formatted cells
pub type MatrixGrid = [[String; 4]; 4];

/// Decimal places shown per cell
pub const PRECISION: usize = 2;

/// Format one value with two decimals.
///
/// Rounds half away from zero. Scaling happens in f64, so the half-way test
/// sees the stored binary value: `1.005f32` (stored slightly below 1.005)
/// shows as `1.00`, and large finite values never overflow to `inf`.
/// Results that round to zero print `0.00` rather than `-0.00`. Non-finite
/// values print as `NaN`, `inf` or `-inf`.
pub fn format_cell(value: f32) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let rounded = (f64::from(value) * 100.0).round() / 100.0;
    // Adding zero turns -0.0 into 0.0
    format!("{:.*}", PRECISION, rounded + 0.0)
}

/// Format a matrix row by row
pub fn format_matrix(matrix: &TransformMatrix) -> MatrixGrid {
    let rows = *matrix.rows();
    rows.map(|row| row.map(format_cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Axes3, Transform, TransformParameters};

    #[test]
    fn test_format_identity() {
        let grid = format_matrix(&TransformMatrix::identity());
        assert_eq!(grid[0], ["1.00", "0.00", "0.00", "0.00"]);
        assert_eq!(grid[3], ["0.00", "0.00", "0.00", "1.00"]);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(format_cell(0.125), "0.13");
        assert_eq!(format_cell(-0.125), "-0.13");
        assert_eq!(format_cell(2.375), "2.38");
        assert_eq!(format_cell(0.124), "0.12");
        // Stored as 1.00499999..., so it is below the half-way point
        assert_eq!(format_cell(1.005), "1.00");
        assert_eq!(format_cell(-1.005), "-1.00");
    }

    #[test]
    fn test_large_finite_values_stay_finite() {
        let cell = format_cell(1.0e37);
        assert!(cell.ends_with(".00"));
        let parsed: f64 = cell.parse().unwrap();
        assert!((parsed / 1.0e37 - 1.0).abs() < 1e-6);

        let params = TransformParameters {
            translation: Axes3::new(1.0e37, 0.0, -f32::MAX),
            ..TransformParameters::IDENTITY
        };
        let grid = format_matrix(&Transform::compose(&params));
        assert!(!grid[0][3].contains("inf"));
        assert!(grid[2][3].starts_with('-'));
        assert!(!grid[2][3].contains("inf"));
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(format_cell(-0.0), "0.00");
        assert_eq!(format_cell(-0.001), "0.00");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_cell(f32::NAN), "NaN");
        assert_eq!(format_cell(f32::INFINITY), "inf");
        assert_eq!(format_cell(f32::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_format_composed_matrix() {
        let params = TransformParameters {
            scale: Axes3::new(2.0, 1.0, 1.0),
            rotation: Axes3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            translation: Axes3::new(3.0, -1.0, 2.0),
        };
        let grid = format_matrix(&Transform::compose(&params));
        assert_eq!(grid[0], ["0.00", "-1.00", "0.00", "3.00"]);
        assert_eq!(grid[1], ["2.00", "0.00", "0.00", "-1.00"]);
        assert_eq!(grid[2], ["0.00", "0.00", "1.00", "2.00"]);
        assert_eq!(grid[3], ["0.00", "0.00", "0.00", "1.00"]);
    }
}
