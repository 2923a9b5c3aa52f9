use crate::providers::Failure;

/// Failures a fetch path records into `Snapshot::last_error`.
///
/// Per-match enrichment failures are not represented here; they fall back to
/// the innocent role and never surface to the user.
#[derive(Debug, thiserror::Error)]
pub enum HomeError {
    #[error("Error al cargar los datos del usuario: {0}")]
    ProfileFetch(Failure),

    #[error("Error al cargar los amigos: {0}")]
    FriendFetch(Failure),

    #[error("Error al cargar las partidas: {0}")]
    MatchFetch(Failure),

    #[error("Error al cerrar sesión: {0}")]
    SessionEnd(Failure),
}

impl From<HomeError> for String {
    fn from(e: HomeError) -> Self {
        e.to_string()
    }
}
