use hydra_irrigation::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use hydra_irrigation::reading::RawReading;

fn grid() -> Vec<RawReading> {
    let mut readings = Vec::new();
    for temperature in [0.0, 12.5, 25.0, 50.0] {
        for humidity in [0.0, 60.0, 100.0] {
            for (wind_speed, wind_gust) in [(0.0, 0.0), (5.0, 10.0), (50.0, 80.0)] {
                for pressure in [80.0, 101.3, 120.0] {
                    for soil_ph in [0.0, 3.5, 7.0, 14.0] {
                        readings.push(RawReading::new(
                            temperature,
                            humidity,
                            wind_speed,
                            wind_gust,
                            pressure,
                            soil_ph,
                        ));
                    }
                }
            }
        }
    }
    readings
}

#[test]
fn example_reading_matches_known_vector() {
    let reading = RawReading::new(25.0, 60.0, 5.0, 10.0, 101.3, 7.0);
    let fv = FeatureVector::from_reading(&reading);
    let expected = [25.0, 5.0, 60.0, 10.0, 101.3, 7.0, 625.0, 40.0, 50.0, 10.13, 0.0];

    assert_eq!(fv.len(), FEATURE_COUNT);
    for (i, (got, want)) in fv.as_slice().iter().zip(expected.iter()).enumerate() {
        assert!(
            (got - want).abs() < 1e-9,
            "feature {} ({}) = {got}, expected {want}",
            i,
            FEATURE_NAMES[i]
        );
    }
}

#[test]
fn derived_features_hold_across_valid_domain() {
    for reading in grid() {
        assert!(reading.validate().is_ok(), "{reading:?} should be valid");
        let fv = FeatureVector::from_reading(&reading);
        let v = fv.as_slice();

        assert_eq!(v.len(), 11);
        assert_eq!(v[0], reading.temperature);
        assert_eq!(v[1], reading.wind_speed);
        assert_eq!(v[2], reading.humidity);
        assert_eq!(v[3], reading.wind_gust);
        assert_eq!(v[4], reading.pressure);
        assert_eq!(v[5], reading.soil_ph);
        assert_eq!(v[6], v[0] * v[0]);
        assert_eq!(v[7], 100.0 - v[2]);
        assert_eq!(v[8], v[1] * v[3]);
        assert_eq!(v[9], v[4] * 0.1);
        assert_eq!(v[10], (v[5] - 7.0).abs());
    }
}

#[test]
fn transform_is_bit_for_bit_deterministic() {
    for reading in grid() {
        let a = FeatureVector::from_reading(&reading);
        let b = FeatureVector::from_reading(&reading);
        let a_bits: Vec<u64> = a.as_slice().iter().map(|v| v.to_bits()).collect();
        let b_bits: Vec<u64> = b.as_slice().iter().map(|v| v.to_bits()).collect();
        assert_eq!(a_bits, b_bits);
    }
}
