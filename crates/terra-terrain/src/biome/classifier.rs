//! Biome classifier: warped temperature/rainfall noise into a hard biome choice plus
//! continuously blended terrain parameters.

use glam::DVec2;

use super::{BiomeCorner, BiomeId, BiomeTable, Rainfall, Temperature, TerrainParams};
use crate::noise_field::NoiseField;

/// Climate values below this return the low corner's value unmodified.
pub const BLEND_LOW: f64 = 0.45;
/// Climate values above this return the high corner's value unmodified.
pub const BLEND_HIGH: f64 = 0.55;

/// Piecewise interpolation that is flat outside `[BLEND_LOW, BLEND_HIGH]` and linear inside.
pub fn abrupt_lerp(a: f64, b: f64, t: f64) -> f64 {
    if t < BLEND_LOW {
        return a;
    }
    if t > BLEND_HIGH {
        return b;
    }
    let s = (t - BLEND_LOW) / (BLEND_HIGH - BLEND_LOW);
    if s >= 1.0 { b } else { a + (b - a) * s }
}

/// Temperature and rainfall at a world coordinate, both in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateSample {
    /// Temperature quantile.
    pub temperature: f64,
    /// Rainfall quantile.
    pub rainfall: f64,
}

/// Result of classifying one world coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    /// Nearest-corner biome.
    pub biome: BiomeId,
    /// Parameters for height synthesis at this coordinate.
    pub params: TerrainParams,
}

/// Classifies world coordinates against a [`BiomeTable`] using two warped climate fields.
#[derive(Clone, Debug)]
pub struct BiomeClassifier {
    field: NoiseField,
    table: BiomeTable,
    /// Base scale of the climate noise. Larger values produce broader biomes.
    pub climate_scale: f64,
    /// Octave count of the climate noise.
    pub climate_octaves: u32,
}

impl BiomeClassifier {
    /// Default base scale of the climate fields.
    pub const DEFAULT_CLIMATE_SCALE: f64 = 1000.0;
    /// Default octave count of the climate fields.
    pub const DEFAULT_CLIMATE_OCTAVES: u32 = 4;

    /// Creates a classifier over `table`, sampling climate from `field`.
    pub fn new(field: NoiseField, table: BiomeTable) -> Self {
        Self {
            field,
            table,
            climate_scale: Self::DEFAULT_CLIMATE_SCALE,
            climate_octaves: Self::DEFAULT_CLIMATE_OCTAVES,
        }
    }

    /// Overrides the climate noise scale and octave count.
    pub fn with_climate(mut self, scale: f64, octaves: u32) -> Self {
        self.climate_scale = scale;
        self.climate_octaves = octaves;
        self
    }

    /// The table this classifier reads profiles from.
    pub fn table(&self) -> &BiomeTable {
        &self.table
    }

    /// Samples both climate fields. The two origins decorrelate temperature from rainfall.
    pub fn climate(
        &self,
        x: f64,
        z: f64,
        temperature_origin: DVec2,
        rainfall_origin: DVec2,
    ) -> ClimateSample {
        ClimateSample {
            temperature: self.field.warped(
                x,
                z,
                self.climate_octaves,
                temperature_origin,
                self.climate_scale,
            ),
            rainfall: self.field.warped(
                x,
                z,
                self.climate_octaves,
                rainfall_origin,
                self.climate_scale,
            ),
        }
    }

    /// Classifies a world coordinate.
    pub fn classify(
        &self,
        x: f64,
        z: f64,
        temperature_origin: DVec2,
        rainfall_origin: DVec2,
    ) -> Classification {
        self.classify_climate(self.climate(x, z, temperature_origin, rainfall_origin))
    }

    /// Classifies an already-sampled climate.
    ///
    /// Identity is the nearest corner. Scale, frequency, amplitude and persistence are
    /// blended with [`abrupt_lerp`] along temperature for each rainfall side and then
    /// along rainfall. Octaves and lacunarity are discrete and come from the nearest corner.
    pub fn classify_climate(&self, climate: ClimateSample) -> Classification {
        let corner = BiomeCorner::nearest(climate.temperature, climate.rainfall);
        let nearest = self.table.get(corner).params;

        let blend = |get: fn(&TerrainParams) -> f64| {
            self.blend(climate.temperature, climate.rainfall, get)
        };

        Classification {
            biome: BiomeId::of(corner),
            params: TerrainParams {
                scale: blend(|p| p.scale),
                frequency: blend(|p| p.frequency),
                amplitude: blend(|p| p.amplitude),
                persistence: blend(|p| p.persistence),
                octaves: nearest.octaves,
                lacunarity: nearest.lacunarity,
            },
        }
    }

    fn blend(&self, t: f64, r: f64, get: fn(&TerrainParams) -> f64) -> f64 {
        let value = |temperature, rainfall| {
            get(&self.table.get(BiomeCorner::new(temperature, rainfall)).params)
        };
        let dry = abrupt_lerp(
            value(Temperature::Cold, Rainfall::Dry),
            value(Temperature::Hot, Rainfall::Dry),
            t,
        );
        let wet = abrupt_lerp(
            value(Temperature::Cold, Rainfall::Wet),
            value(Temperature::Hot, Rainfall::Wet),
            t,
        );
        abrupt_lerp(dry, wet, r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::default_biome_profiles;

    fn classifier() -> BiomeClassifier {
        let table = BiomeTable::new(default_biome_profiles()).unwrap();
        BiomeClassifier::new(NoiseField::new(42), table)
    }

    fn params_at(corner: BiomeCorner) -> TerrainParams {
        classifier().table().get(corner).params
    }

    #[test]
    fn test_abrupt_lerp_clamps_outside_band() {
        assert_eq!(abrupt_lerp(2.0, 8.0, 0.0), 2.0);
        assert_eq!(abrupt_lerp(2.0, 8.0, 0.4499), 2.0);
        assert_eq!(abrupt_lerp(2.0, 8.0, 0.5501), 8.0);
        assert_eq!(abrupt_lerp(2.0, 8.0, 1.0), 8.0);
        assert_eq!(abrupt_lerp(2.0, 8.0, BLEND_LOW), 2.0);
        assert_eq!(abrupt_lerp(2.0, 8.0, BLEND_HIGH), 8.0);
        assert!((abrupt_lerp(2.0, 8.0, 0.5) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_blend_monotonic_across_temperature_band() {
        let c = classifier();
        let cold = params_at(BiomeCorner::new(Temperature::Cold, Rainfall::Dry));
        let hot = params_at(BiomeCorner::new(Temperature::Hot, Rainfall::Dry));
        let (lo, hi) = (cold.amplitude.min(hot.amplitude), cold.amplitude.max(hot.amplitude));
        let increasing = hot.amplitude >= cold.amplitude;

        let mut prev: Option<f64> = None;
        for i in 0..=100 {
            let t = 0.40 + 0.2 * i as f64 / 100.0;
            let amp = c
                .classify_climate(ClimateSample {
                    temperature: t,
                    rainfall: 0.1,
                })
                .params
                .amplitude;
            assert!(
                amp >= lo - 1e-12 && amp <= hi + 1e-12,
                "Blended amplitude {amp} overshoots [{lo}, {hi}] at t={t}"
            );
            if let Some(p) = prev {
                if increasing {
                    assert!(amp >= p - 1e-12, "Not monotonic at t={t}");
                } else {
                    assert!(amp <= p + 1e-12, "Not monotonic at t={t}");
                }
            }
            prev = Some(amp);
        }
    }

    #[test]
    fn test_biome_interiors_use_corner_values_exactly() {
        let c = classifier();
        for corner in BiomeCorner::ALL {
            let t = match corner.temperature {
                Temperature::Cold => 0.1,
                Temperature::Hot => 0.9,
            };
            let r = match corner.rainfall {
                Rainfall::Dry => 0.2,
                Rainfall::Wet => 0.8,
            };
            let class = c.classify_climate(ClimateSample {
                temperature: t,
                rainfall: r,
            });
            assert_eq!(class.biome, BiomeId::of(corner));
            assert_eq!(class.params, params_at(corner), "interior of {corner}");
        }
    }

    #[test]
    fn test_identity_is_hard_but_params_are_blended() {
        let c = classifier();
        let class = c.classify_climate(ClimateSample {
            temperature: 0.52,
            rainfall: 0.1,
        });
        let hot = params_at(BiomeCorner::new(Temperature::Hot, Rainfall::Dry));
        let cold = params_at(BiomeCorner::new(Temperature::Cold, Rainfall::Dry));
        assert_eq!(
            class.biome,
            BiomeId::of(BiomeCorner::new(Temperature::Hot, Rainfall::Dry))
        );
        assert_ne!(class.params.scale, hot.scale);
        assert_ne!(class.params.scale, cold.scale);
        assert_eq!(class.params.octaves, hot.octaves);
        assert_eq!(class.params.lacunarity, hot.lacunarity);
    }

    #[test]
    fn test_classify_deterministic() {
        let a = classifier();
        let b = classifier();
        let t_origin = DVec2::new(-812.0, 4410.0);
        let r_origin = DVec2::new(3301.0, -27.0);
        for i in 0..100 {
            let x = i as f64 * 37.0 - 1500.0;
            let z = i as f64 * -53.0 + 200.0;
            assert_eq!(
                a.classify(x, z, t_origin, r_origin),
                b.classify(x, z, t_origin, r_origin)
            );
        }
    }

    #[test]
    fn test_climate_axes_decorrelated_by_origin() {
        let c = classifier();
        let t_origin = DVec2::new(100.0, 200.0);
        let r_origin = DVec2::new(-5000.0, 7000.0);
        let differs = (0..50).any(|i| {
            let x = i as f64 * 250.0;
            let s = c.climate(x, -x, t_origin, r_origin);
            (s.temperature - s.rainfall).abs() > 1e-9
        });
        assert!(differs, "Distinct origins should give distinct climate fields");
    }
}
