//! Biome table: exactly one [`BiomeProfile`] per climate corner, indexed by [`BiomeId`].

use super::{BiomeCorner, BiomeProfile};

/// Identifier of a classified biome: the index of its climate corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(pub u8);

impl BiomeId {
    /// The identifier of the biome occupying `corner`.
    pub const fn of(corner: BiomeCorner) -> Self {
        Self(corner.index() as u8)
    }

    /// The corner this identifier refers to.
    ///
    /// # Panics
    ///
    /// Panics if the identifier is not in `0..4`.
    pub fn corner(self) -> BiomeCorner {
        BiomeCorner::ALL[self.0 as usize]
    }
}

/// Errors that can occur when building a [`BiomeTable`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BiomeTableError {
    /// No profile was supplied for this corner.
    #[error("no biome profile registered for the {0} corner")]
    MissingCorner(BiomeCorner),
    /// More than one profile claims this corner.
    #[error("more than one biome profile registered for the {0} corner")]
    DuplicateCorner(BiomeCorner),
    /// A parameter is negative, non-finite, or (for octaves) zero.
    #[error("biome `{biome}` has an invalid `{field}` parameter")]
    InvalidParameter {
        /// Name of the offending biome.
        biome: String,
        /// Name of the offending field.
        field: &'static str,
    },
}

/// The complete 2x2 classification grid.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeTable {
    profiles: [BiomeProfile; 4],
}

impl BiomeTable {
    /// Builds a table from a set of profiles.
    ///
    /// # Errors
    ///
    /// Every corner must be claimed by exactly one profile, and every profile's
    /// parameters must be finite and non-negative with at least one octave.
    pub fn new(profiles: impl IntoIterator<Item = BiomeProfile>) -> Result<Self, BiomeTableError> {
        let mut slots: [Option<BiomeProfile>; 4] = Default::default();

        for profile in profiles {
            validate_params(&profile)?;
            let slot = &mut slots[profile.corner.index()];
            if slot.is_some() {
                return Err(BiomeTableError::DuplicateCorner(profile.corner));
            }
            *slot = Some(profile);
        }

        let [a, b, c, d] = slots;
        let take = |slot: Option<BiomeProfile>, corner: BiomeCorner| {
            slot.ok_or(BiomeTableError::MissingCorner(corner))
        };
        Ok(Self {
            profiles: [
                take(a, BiomeCorner::ALL[0])?,
                take(b, BiomeCorner::ALL[1])?,
                take(c, BiomeCorner::ALL[2])?,
                take(d, BiomeCorner::ALL[3])?,
            ],
        })
    }

    /// The profile at `corner`.
    pub fn get(&self, corner: BiomeCorner) -> &BiomeProfile {
        &self.profiles[corner.index()]
    }

    /// The profile for a classified biome.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn profile(&self, id: BiomeId) -> &BiomeProfile {
        &self.profiles[id.0 as usize]
    }

    /// Looks up a biome by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<BiomeId> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .map(|p| BiomeId::of(p.corner))
    }

    /// Surface texture layer of each biome, indexed by [`BiomeId`].
    pub fn surface_layers(&self) -> [u16; 4] {
        self.profiles.each_ref().map(|p| p.layer_index)
    }

    /// Iterates over all profiles in corner order.
    pub fn iter(&self) -> impl Iterator<Item = &BiomeProfile> {
        self.profiles.iter()
    }
}

fn validate_params(profile: &BiomeProfile) -> Result<(), BiomeTableError> {
    let p = &profile.params;
    let fields = [
        ("scale", p.scale),
        ("frequency", p.frequency),
        ("amplitude", p.amplitude),
        ("persistence", p.persistence),
        ("lacunarity", p.lacunarity),
    ];
    for (field, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(BiomeTableError::InvalidParameter {
                biome: profile.name.clone(),
                field,
            });
        }
    }
    if p.octaves == 0 {
        return Err(BiomeTableError::InvalidParameter {
            biome: profile.name.clone(),
            field: "octaves",
        });
    }
    Ok(())
}
