mod model;
mod repository;

pub use model::{NewObservationDB, ObservationDB};
pub use repository::ObservationRepository;
