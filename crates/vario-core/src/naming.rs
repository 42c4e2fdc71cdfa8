//! Staged-artifact naming.
//!
//! Identifiers come from a cryptographically secure random source and
//! never from request data, so a client cannot influence where anything
//! lands on disk or in the remote store.

use rand::RngCore;

/// Length in bytes of the random identifier (hex-encoded to twice this).
const ID_BYTES: usize = 8;

/// The transient, server-generated identity of one uploaded resource:
/// a random hex identifier plus the extension derived from its content
/// type. The staged file and every variant destination are named from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedArtifact {
    id: String,
    extension: String,
}

impl StagedArtifact {
    /// Generate an artifact identity from the OS random source.
    pub fn generate(extension: &str) -> Self {
        Self::from_rng(&mut rand::rng(), extension)
    }

    /// Generate from an explicit random source. Tests pass a seeded RNG
    /// for deterministic identifiers.
    pub fn from_rng<R: RngCore>(rng: &mut R, extension: &str) -> Self {
        let mut raw = [0u8; ID_BYTES];
        rng.fill_bytes(&mut raw);
        StagedArtifact {
            id: hex::encode(raw),
            extension: extension.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Name of the staged file in transient storage.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, self.extension)
    }

    /// Remote destination path for one resized variant:
    /// `<id>_<r>x<r>.<extension>`.
    pub fn variant_path(&self, resolution: u32) -> String {
        format!(
            "{}_{}x{}.{}",
            self.id, resolution, resolution, self.extension
        )
    }
}
