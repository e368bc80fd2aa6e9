use serde::{Deserialize, Serialize};

use super::{safe_asin, safe_atan2, wrap_degrees, Equatorial};

/// Altitude / azimuth for an observer, in degrees.
///
/// Azimuth is measured from north through east on `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCoords {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

impl HorizontalCoords {
    pub fn new(altitude_deg: f64, azimuth_deg: f64) -> Self {
        Self {
            altitude_deg: altitude_deg.clamp(-90.0, 90.0),
            azimuth_deg: wrap_degrees(azimuth_deg),
        }
    }

    /// Horizontal position of an equatorial direction.
    ///
    /// # Arguments
    /// * `ra_deg`, `dec_deg` - equatorial position
    /// * `latitude_deg` - observer latitude
    /// * `lst_deg` - local sidereal time expressed as an angle
    ///
    /// At the zenith and at the poles the azimuth is undefined; it is reported
    /// as 0 there rather than NaN.
    pub fn from_equatorial(ra_deg: f64, dec_deg: f64, latitude_deg: f64, lst_deg: f64) -> Self {
        let hour_angle = (lst_deg - ra_deg).to_radians();
        let dec = dec_deg.to_radians();
        let lat = latitude_deg.to_radians();

        let sin_alt = dec.sin() * lat.sin() + dec.cos() * lat.cos() * hour_angle.cos();
        let altitude = safe_asin(sin_alt);

        let y = -dec.cos() * hour_angle.sin();
        let x = dec.sin() * lat.cos() - dec.cos() * lat.sin() * hour_angle.cos();
        let azimuth = safe_atan2(y, x);

        Self {
            altitude_deg: altitude.to_degrees(),
            azimuth_deg: wrap_degrees(azimuth.to_degrees()),
        }
    }

    /// Inverse of [`HorizontalCoords::from_equatorial`] for the same observer.
    pub fn to_equatorial(&self, latitude_deg: f64, lst_deg: f64) -> Equatorial {
        let alt = self.altitude_deg.to_radians();
        let az = self.azimuth_deg.to_radians();
        let lat = latitude_deg.to_radians();

        let sin_dec = alt.sin() * lat.sin() + alt.cos() * lat.cos() * az.cos();
        let dec = safe_asin(sin_dec);

        let y = -az.sin() * alt.cos();
        let x = alt.sin() * lat.cos() - alt.cos() * lat.sin() * az.cos();
        let hour_angle = safe_atan2(y, x).to_degrees();

        Equatorial {
            ra: wrap_degrees(lst_deg - hour_angle),
            dec: dec.to_degrees(),
        }
    }

    pub fn is_above_horizon(&self) -> bool {
        self.altitude_deg > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn angular_diff(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[rstest]
    #[case(10.0, 20.0, 40.0, 100.0)]
    #[case(250.0, -35.0, -33.9, 12.0)]
    #[case(0.0, 0.0, 0.0, 0.0)]
    #[case(359.0, 75.0, 51.5, 200.0)]
    #[case(180.0, -80.0, 10.0, 300.0)]
    fn test_horizontal_round_trip(
        #[case] ra: f64,
        #[case] dec: f64,
        #[case] lat: f64,
        #[case] lst: f64,
    ) {
        let hz = HorizontalCoords::from_equatorial(ra, dec, lat, lst);
        let eq = hz.to_equatorial(lat, lst);
        assert!(angular_diff(eq.ra, ra) < 1e-7, "RA {ra} -> {}", eq.ra);
        assert_relative_eq!(eq.dec, dec, epsilon = 1e-7);
    }

    #[rstest]
    #[case(0.0)]
    #[case(90.0)]
    #[case(237.5)]
    fn test_pole_altitude_equals_declination(#[case] lst: f64) {
        for (ra, dec) in [(10.0, 45.0), (200.0, -20.0), (300.0, 89.0)] {
            let hz = HorizontalCoords::from_equatorial(ra, dec, 90.0, lst);
            assert_relative_eq!(hz.altitude_deg, dec, epsilon = 1e-9);
            assert!(hz.azimuth_deg.is_finite());
            assert!((0.0..360.0).contains(&hz.azimuth_deg));
        }
    }

    #[test]
    fn test_zenith_azimuth_is_finite() {
        // Star at the zenith: dec == lat and hour angle 0
        let hz = HorizontalCoords::from_equatorial(50.0, 40.0, 40.0, 50.0);
        assert_relative_eq!(hz.altitude_deg, 90.0, epsilon = 1e-6);
        assert!(hz.azimuth_deg.is_finite());
    }

    #[test]
    fn test_meridian_transit_faces_south() {
        // Northern observer, southern star on the meridian
        let hz = HorizontalCoords::from_equatorial(100.0, 0.0, 40.0, 100.0);
        assert_relative_eq!(hz.altitude_deg, 50.0, epsilon = 1e-9);
        assert_relative_eq!(hz.azimuth_deg, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rising_star_is_east() {
        // Equatorial star six hours before transit rises due east
        let hz = HorizontalCoords::from_equatorial(90.0, 0.0, 40.0, 0.0);
        assert_relative_eq!(hz.altitude_deg, 0.0, epsilon = 1e-9);
        assert_relative_eq!(hz.azimuth_deg, 90.0, epsilon = 1e-9);
        assert!(!hz.is_above_horizon());
    }
}
